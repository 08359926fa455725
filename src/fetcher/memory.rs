//! In-memory fetcher
//!
//! Serves registered bodies by absolute URL without touching the network.
//! Every request is recorded, which makes it the test double for the
//! pipeline and a replay source for previously captured pages.

use std::cell::RefCell;
use std::collections::HashMap;

use url::Url;

use super::types::{FetchError, FetchedResource, ResourceFetcher};

#[derive(Debug, Clone)]
enum MemoryEntry {
    Body {
        content_type: Option<String>,
        body: Vec<u8>,
    },
    Status(u16),
    /// Never settles; only a timeout gets the caller past it
    Hang,
}

#[derive(Debug, Default)]
pub struct MemoryFetcher {
    entries: HashMap<String, MemoryEntry>,
    requests: RefCell<Vec<String>>,
}

/// Keys are stored in serialized URL form so `https://h` and `https://h/` match
fn normalize_key(url: &str) -> String {
    Url::parse(url).map_or_else(|_| url.to_string(), String::from)
}

impl MemoryFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binary body
    #[must_use]
    pub fn with_resource(
        mut self,
        url: &str,
        content_type: Option<&str>,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        self.entries.insert(
            normalize_key(url),
            MemoryEntry::Body {
                content_type: content_type.map(str::to_string),
                body: body.into(),
            },
        );
        self
    }

    /// Register a text body
    #[must_use]
    pub fn with_text(self, url: &str, content_type: &str, text: &str) -> Self {
        self.with_resource(url, Some(content_type), text.as_bytes())
    }

    /// Register a non-success status
    #[must_use]
    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.entries
            .insert(normalize_key(url), MemoryEntry::Status(status));
        self
    }

    /// Register a URL whose fetch never completes
    #[must_use]
    pub fn with_hanging(mut self, url: &str) -> Self {
        self.entries.insert(normalize_key(url), MemoryEntry::Hang);
        self
    }

    /// All requested URLs, in request order
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    /// How often a URL was requested
    #[must_use]
    pub fn request_count(&self, url: &str) -> usize {
        let key = normalize_key(url);
        self.requests.borrow().iter().filter(|u| **u == key).count()
    }
}

impl ResourceFetcher for MemoryFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedResource, FetchError> {
        self.requests.borrow_mut().push(url.to_string());

        match self.entries.get(url.as_str()).cloned() {
            Some(MemoryEntry::Body { content_type, body }) => Ok(FetchedResource {
                url: url.clone(),
                content_type,
                body,
            }),
            Some(MemoryEntry::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
            Some(MemoryEntry::Hang) => futures::future::pending().await,
            None => Err(FetchError::NotFound(url.to_string())),
        }
    }
}
