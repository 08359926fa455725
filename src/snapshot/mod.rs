//! Static page snapshots
//!
//! Turns a live HTML document into a single self-contained file: external
//! images, stylesheets, fonts and frames are embedded, scripts and event
//! handlers are stripped, and every remaining reference is made absolute.

pub mod dom;
pub mod packager;
pub mod pipeline;
pub mod sanitizer;
pub mod serializer;
pub mod types;
pub mod walker;

pub use dom::parse_document;
pub use packager::{Artifact, artifact_file_name};
pub use pipeline::{snapshot_document, snapshot_html};
pub use sanitizer::{remove_event_handlers, remove_scripts};
pub use serializer::{decode_numeric_entities, render_document, serialize_document};
pub use types::{SnapshotError, SnapshotOutput, SnapshotReport};
pub use walker::{
    absolutize_links, decode_text_entities, ensure_charset_meta, inline_iframes, inline_images,
    inline_style_attributes, inline_stylesheets, render_sub_document,
};
