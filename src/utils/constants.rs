//! Shared configuration constants for static page snapshots
//!
//! Default values used by `SnapshotConfig` and the fetchers so limits and
//! headers stay consistent across the pipeline.

/// Per-fetch timeout: 30 seconds
///
/// A fetch that has not settled by then is treated as a failed resource and
/// the reference falls back to its absolute URL.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Maximum size of any single fetched resource: 10MB
///
/// Large enough for web fonts and hero images, small enough that one bad
/// reference cannot blow up the snapshot.
pub const DEFAULT_MAX_RESOURCE_SIZE: usize = 10 * 1024 * 1024;

/// Maximum nesting of `@import` chains
pub const DEFAULT_MAX_IMPORT_DEPTH: usize = 16;

/// Prefix of every generated file name
pub const FILE_NAME_PREFIX: &str = "static_page";

/// Media type of the produced artifact
pub const HTML_MEDIA_TYPE: &str = "text/html;charset=utf-8";

/// Fallback media type for payloads nothing else could identify
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Chrome user agent string
///
/// Updated: 2025-01-29 to Chrome 132 (current stable)
///
/// Some CDNs refuse font and stylesheet requests without a browser-like
/// agent, so the HTTP fetcher always sends one.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
