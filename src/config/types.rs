//! Core configuration types for static page snapshots

use serde::{Deserialize, Serialize};

use crate::utils::{
    CHROME_USER_AGENT, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_IMPORT_DEPTH,
    DEFAULT_MAX_RESOURCE_SIZE,
};

/// Configuration for one snapshot run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Timeout in milliseconds for each individual fetch
    ///
    /// A fetch that has not settled in time counts as a failed resource: the
    /// reference falls back to its absolute URL and the pipeline moves on.
    /// The pipeline as a whole has no deadline.
    ///
    /// Default: 30 000 ms
    pub(crate) fetch_timeout_ms: u64,

    /// User agent sent by the HTTP fetcher
    pub(crate) user_agent: String,

    /// Hard cap in bytes on any fetched body (stylesheets, frames, media)
    ///
    /// Default: 10MB
    pub(crate) max_resource_size: usize,

    /// Maximum size in bytes for embedding a resource as a data URI.
    /// Larger resources stay external references.
    /// Default is None (everything under `max_resource_size` is embedded).
    pub(crate) max_inline_size: Option<usize>,

    /// Maximum `@import` nesting followed before an import is dropped
    ///
    /// Default: 16
    pub(crate) max_import_depth: usize,

    /// Replace `<iframe src>` with sanitized static `srcdoc` markup
    ///
    /// Default: true
    pub(crate) inline_iframes: bool,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_SECS * 1000,
            user_agent: CHROME_USER_AGENT.to_string(),
            max_resource_size: DEFAULT_MAX_RESOURCE_SIZE,
            max_inline_size: None,
            max_import_depth: DEFAULT_MAX_IMPORT_DEPTH,
            inline_iframes: true,
        }
    }
}
