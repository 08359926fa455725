//! HTTP fetcher built on reqwest
//!
//! Downloads are streamed with a hard size limit: `Content-Length` is checked
//! before the body is read, and the running total is checked again while
//! streaming for servers that omit or misreport it.

use futures::StreamExt;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use url::Url;

use super::types::{FetchError, FetchedResource, ResourceFetcher};
use crate::config::SnapshotConfig;

/// Fetches `http` and `https` resources with browser-like headers
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_resource_size: usize,
}

impl HttpFetcher {
    /// Build a client from the snapshot configuration
    pub fn new(config: &SnapshotConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent())
            .timeout(config.fetch_timeout())
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self::with_client(client, config))
    }

    /// Reuse an existing client (it already shares its pool internally)
    #[must_use]
    pub fn with_client(client: Client, config: &SnapshotConfig) -> Self {
        Self {
            client,
            max_resource_size: config.max_resource_size(),
        }
    }

    async fn download(&self, url: &Url) -> Result<FetchedResource, FetchError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::UnsupportedScheme {
                url: url.to_string(),
                scheme: url.scheme().to_string(),
            });
        }

        let transport = |e: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "*/*")
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // Enforce the limit BEFORE downloading
        let expected_size = response.content_length().unwrap_or(0);
        if expected_size > self.max_resource_size as u64 {
            return Err(FetchError::TooLarge {
                url: url.to_string(),
                size: expected_size,
                limit: self.max_resource_size,
            });
        }

        let mut buffer = if expected_size > 0 {
            Vec::with_capacity(expected_size as usize)
        } else {
            Vec::new()
        };

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(transport)?;

            let new_total = buffer.len() + chunk.len();
            if new_total > self.max_resource_size {
                return Err(FetchError::TooLarge {
                    url: url.to_string(),
                    size: new_total as u64,
                    limit: self.max_resource_size,
                });
            }
            buffer.extend_from_slice(&chunk);
        }

        log::debug!("Downloaded {} bytes from {final_url}", buffer.len());

        Ok(FetchedResource {
            url: final_url,
            content_type,
            body: buffer,
        })
    }
}

impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedResource, FetchError> {
        self.download(url).await
    }
}
