//! Embeddable payloads and the timeout-guarded fetch entry points
//!
//! ## Architecture
//!
//! - `fetch_resource()` - one guarded call into a [`ResourceFetcher`]
//! - `try_fetch_payload()` / `fetch_as_payload()` - bytes re-encoded as a data URI
//! - `try_fetch_text()` / `fetch_text()` - bodies consumed as text (CSS, frames)
//!
//! The `try_` variants keep the error for reporting; the others collapse
//! every failure to `None` so call sites can fall back to the absolute URL.

use base64::Engine;
use url::Url;

use super::types::{FetchError, FetchedResource, ResourceFetcher};
use crate::config::SnapshotConfig;
use crate::utils::OCTET_STREAM;

/// File signatures checked before falling back to the URL extension
const MAGIC_SIGNATURES: &[(&[u8], &str)] = &[
    (b"\x89PNG\r\n\x1a\n", "image/png"),
    (b"\xFF\xD8\xFF", "image/jpeg"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"wOF2", "font/woff2"),
    (b"wOFF", "font/woff"),
    (b"OTTO", "font/otf"),
    (b"\x00\x01\x00\x00", "font/ttf"),
    (b"<svg", "image/svg+xml"),
];

/// A fetched resource in self-contained form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    media_type: String,
    bytes: Vec<u8>,
}

impl Payload {
    #[must_use]
    pub fn new(media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            media_type: media_type.into(),
            bytes,
        }
    }

    #[must_use]
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Render as `data:<media type>;base64,<bytes>`
    #[must_use]
    pub fn to_data_uri(&self) -> String {
        let encoded_capacity = base64::encoded_len(self.bytes.len(), true).unwrap_or(0);
        let mut encoded = String::with_capacity(encoded_capacity + 13 + self.media_type.len());

        encoded.push_str("data:");
        encoded.push_str(&self.media_type);
        encoded.push_str(";base64,");
        base64::engine::general_purpose::STANDARD.encode_string(&self.bytes, &mut encoded);

        encoded
    }
}

/// Determine the media type of a fetched body
///
/// The declared `Content-Type` wins unless it is missing or generic; then
/// the magic bytes, then the URL path extension decide.
#[must_use]
pub fn detect_media_type(content_type: Option<&str>, body: &[u8], url: &Url) -> String {
    if let Some(declared) = content_type.map(str::trim).filter(|ct| !ct.is_empty()) {
        let declared = declared.to_ascii_lowercase();
        let essence = declared.split(';').next().unwrap_or_default().trim();
        if essence != OCTET_STREAM && essence.contains('/') {
            return declared;
        }
    }

    for (signature, media_type) in MAGIC_SIGNATURES {
        if body.starts_with(signature) {
            return (*media_type).to_string();
        }
    }
    if body.len() >= 12 && body.starts_with(b"RIFF") && &body[8..12] == b"WEBP" {
        return "image/webp".to_string();
    }

    media_type_by_extension(url.path()).to_string()
}

fn media_type_by_extension(path: &str) -> &'static str {
    let extension = path
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff2" => "font/woff2",
        "woff" => "font/woff",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "css" => "text/css",
        "html" | "htm" => "text/html",
        _ => OCTET_STREAM,
    }
}

/// Fetch once, bounded by the configured timeout and size cap
///
/// Failures are logged here, once, so callers only decide on the fallback.
pub async fn fetch_resource<F: ResourceFetcher>(
    fetcher: &F,
    url: &Url,
    config: &SnapshotConfig,
) -> Result<FetchedResource, FetchError> {
    let timeout = config.fetch_timeout();

    let result = match tokio::time::timeout(timeout, fetcher.fetch(url)).await {
        Ok(result) => result,
        Err(_) => Err(FetchError::Timeout {
            url: url.to_string(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }),
    };

    let result = result.and_then(|resource| {
        if resource.body.len() > config.max_resource_size() {
            Err(FetchError::TooLarge {
                url: url.to_string(),
                size: resource.body.len() as u64,
                limit: config.max_resource_size(),
            })
        } else {
            Ok(resource)
        }
    });

    if let Err(ref e) = result {
        log::warn!("Failed to fetch {url}: {e}");
    }
    result
}

/// Fetch and re-encode as a payload, keeping the failure reason
pub async fn try_fetch_payload<F: ResourceFetcher>(
    fetcher: &F,
    url: &Url,
    config: &SnapshotConfig,
) -> Result<Payload, FetchError> {
    let resource = fetch_resource(fetcher, url, config).await?;

    if let Some(max_size) = config.max_inline_size()
        && resource.body.len() > max_size
    {
        log::debug!(
            "Resource size ({} bytes) exceeds max_inline_size ({} bytes), keeping as external URL: {}",
            resource.body.len(),
            max_size,
            url
        );
        return Err(FetchError::TooLarge {
            url: url.to_string(),
            size: resource.body.len() as u64,
            limit: max_size,
        });
    }

    let media_type = detect_media_type(resource.content_type.as_deref(), &resource.body, url);
    Ok(Payload::new(media_type, resource.body))
}

/// Fetch and re-encode as a payload; `None` on any failure
pub async fn fetch_as_payload<F: ResourceFetcher>(
    fetcher: &F,
    url: &Url,
    config: &SnapshotConfig,
) -> Option<Payload> {
    try_fetch_payload(fetcher, url, config).await.ok()
}

/// Fetch a body as text, keeping the failure reason
pub async fn try_fetch_text<F: ResourceFetcher>(
    fetcher: &F,
    url: &Url,
    config: &SnapshotConfig,
) -> Result<String, FetchError> {
    fetch_resource(fetcher, url, config)
        .await
        .map(|resource| resource.text())
}

/// Fetch a body as text; `None` on any failure
pub async fn fetch_text<F: ResourceFetcher>(
    fetcher: &F,
    url: &Url,
    config: &SnapshotConfig,
) -> Option<String> {
    try_fetch_text(fetcher, url, config).await.ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::MemoryFetcher;
    use std::time::Duration;

    fn url(s: &str) -> Url {
        Url::parse(s).expect("valid url")
    }

    #[test]
    fn test_data_uri_encoding() {
        let payload = Payload::new("image/png", vec![0x89, b'P', b'N', b'G']);
        assert_eq!(payload.to_data_uri(), "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_declared_content_type_wins() {
        let media_type =
            detect_media_type(Some("Image/PNG"), b"whatever", &url("https://h/a.bin"));
        assert_eq!(media_type, "image/png");
    }

    #[test]
    fn test_octet_stream_falls_back_to_sniffing() {
        let media_type = detect_media_type(
            Some("application/octet-stream"),
            b"wOF2\x00\x01",
            &url("https://h/font"),
        );
        assert_eq!(media_type, "font/woff2");
    }

    #[test]
    fn test_extension_fallback() {
        assert_eq!(
            detect_media_type(None, b"??", &url("https://h/x/photo.JPEG?v=2")),
            "image/jpeg"
        );
        assert_eq!(detect_media_type(None, b"??", &url("https://h/x")), OCTET_STREAM);
    }

    #[test]
    fn test_webp_signature() {
        let body = b"RIFF\x00\x00\x00\x00WEBPVP8 ";
        assert_eq!(detect_media_type(None, body, &url("https://h/i")), "image/webp");
    }

    #[tokio::test]
    async fn test_fetch_as_payload_success_and_failure() {
        let fetcher = MemoryFetcher::new()
            .with_resource("https://h/pic.png", Some("image/png"), vec![1, 2, 3])
            .with_status("https://h/missing.png", 404);
        let config = SnapshotConfig::default();

        let payload = fetch_as_payload(&fetcher, &url("https://h/pic.png"), &config)
            .await
            .expect("payload");
        assert_eq!(payload.to_data_uri(), "data:image/png;base64,AQID");

        assert!(
            fetch_as_payload(&fetcher, &url("https://h/missing.png"), &config)
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_hanging_fetch_times_out() {
        let fetcher = MemoryFetcher::new().with_hanging("https://h/slow.css");
        let config = SnapshotConfig::builder()
            .fetch_timeout(Duration::from_millis(20))
            .build()
            .expect("valid config");

        let err = try_fetch_text(&fetcher, &url("https://h/slow.css"), &config)
            .await
            .expect_err("must time out");
        assert!(matches!(err, FetchError::Timeout { timeout_ms: 20, .. }));
    }

    #[tokio::test]
    async fn test_inline_size_limit_rejects_payload() {
        let fetcher =
            MemoryFetcher::new().with_resource("https://h/big.png", Some("image/png"), vec![0; 64]);
        let config = SnapshotConfig::builder()
            .max_inline_size(16)
            .build()
            .expect("valid config");

        let err = try_fetch_payload(&fetcher, &url("https://h/big.png"), &config)
            .await
            .expect_err("too large to inline");
        assert!(matches!(err, FetchError::TooLarge { size: 64, limit: 16, .. }));
    }
}
