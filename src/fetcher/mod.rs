//! Resource fetching
//!
//! Every network access of the pipeline goes through the [`ResourceFetcher`]
//! capability, so the same pipeline runs against a live HTTP client or an
//! in-memory double. The free functions in [`payload`] are the only call
//! sites: they apply the per-fetch timeout and the size cap, and turn every
//! failure into a value the caller can fall back from.

pub mod http;
pub mod memory;
pub mod payload;
pub mod types;

pub use http::HttpFetcher;
pub use memory::MemoryFetcher;
pub use payload::{
    Payload, detect_media_type, fetch_as_payload, fetch_resource, fetch_text, try_fetch_payload,
    try_fetch_text,
};
pub use types::{FetchError, FetchedResource, ResourceFetcher};
