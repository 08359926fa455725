pub mod config;
pub mod fetcher;
pub mod inline_css;
pub mod snapshot;
pub mod utils;

pub use config::{ConfigError, SnapshotConfig, SnapshotConfigBuilder};
pub use fetcher::{
    FetchError, FetchedResource, HttpFetcher, MemoryFetcher, Payload, ResourceFetcher,
    fetch_as_payload, fetch_text,
};
pub use inline_css::{CssRewriter, InliningError, InliningResult, ResourceType, RewrittenCss};
pub use snapshot::{
    Artifact, SnapshotError, SnapshotOutput, SnapshotReport, parse_document, snapshot_document,
    snapshot_html,
};
pub use utils::{ResolvedUrl, resolve_url};
