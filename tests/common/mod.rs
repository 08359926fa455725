//! Test utilities shared by the snapshot integration tests

use kodegen_tools_static_page::SnapshotConfig;
use std::time::Duration;
use url::Url;

/// Parse a URL that the test itself spells out
#[allow(dead_code)]
pub fn url(s: &str) -> Url {
    Url::parse(s).expect("test URL is valid")
}

/// Configuration with a short timeout so hanging fetches fail fast
#[allow(dead_code)]
pub fn fast_config() -> SnapshotConfig {
    SnapshotConfig::builder()
        .fetch_timeout(Duration::from_millis(50))
        .build()
        .expect("valid config")
}

/// Creates a test HTML document with specified head and body content
#[allow(dead_code)]
pub fn create_test_html(title: &str, head: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <title>{}</title>
    {}
</head>
<body>
    {}
</body>
</html>"#,
        html_escape::encode_text(title),
        head,
        body
    )
}

/// A small but valid PNG signature followed by filler bytes
#[allow(dead_code)]
pub fn png_bytes() -> Vec<u8> {
    let mut bytes = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    bytes.extend_from_slice(&[0, 0, 0, 13]);
    bytes
}
