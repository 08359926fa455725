//! Style text inlining
//!
//! This module rewrites stylesheets and inline style declarations so that
//! every `@import` is replaced by the imported rules and every `url(...)`
//! reference points at an embedded payload or an absolute URL.

// Sub-modules
pub mod rewriter;
pub mod scanner;
pub mod types;

// Re-exports for public API
pub use rewriter::CssRewriter;
pub use types::{InliningError, InliningResult, ResourceType, RewrittenCss};
