//! Type definitions for resource fetching

use std::future::Future;

use url::Url;

/// A retrieved resource, before any re-encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedResource {
    /// Final URL of the resource (after redirects, when the fetcher follows them)
    pub url: Url,
    /// Raw `Content-Type` header value, if the source supplied one
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FetchedResource {
    /// Body decoded as UTF-8, replacing invalid sequences
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Reasons a resource could not be retrieved
///
/// None of these abort a snapshot: callers fall back to the absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The server answered with a non-success status
    #[error("Request to {url} failed with status: {status}")]
    Status { url: String, status: u16 },

    /// Connection, TLS or body read failure
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// The body exceeded a size limit
    #[error("Resource {url} too large: {size} bytes exceeds limit of {limit} bytes")]
    TooLarge { url: String, size: u64, limit: usize },

    /// The fetch did not settle within the configured timeout
    #[error("Request to {url} timed out after {timeout_ms} ms")]
    Timeout { url: String, timeout_ms: u64 },

    /// The fetcher cannot retrieve this kind of URL
    #[error("Unsupported URL scheme '{scheme}' for {url}")]
    UnsupportedScheme { url: String, scheme: String },

    /// The in-memory fetcher has nothing registered under this URL
    #[error("No resource registered for {0}")]
    NotFound(String),

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

/// Capability to retrieve a resource by absolute URL
///
/// Implementations perform exactly one retrieval per call: no retries, no
/// caching. They do not need to enforce timeouts; the pipeline wraps every
/// call in its own.
pub trait ResourceFetcher {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<FetchedResource, FetchError>>;
}

impl<T: ResourceFetcher + ?Sized> ResourceFetcher for &T {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<FetchedResource, FetchError>> {
        (**self).fetch(url)
    }
}
