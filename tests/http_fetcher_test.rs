//! HttpFetcher behavior against a local mock server

use kodegen_tools_static_page::fetcher::fetch_resource;
use kodegen_tools_static_page::{
    FetchError, HttpFetcher, ResourceFetcher, SnapshotConfig, fetch_as_payload, snapshot_html,
};
use mockito::Server;

mod common;
use common::{png_bytes, url};

#[tokio::test]
async fn test_fetch_returns_body_and_content_type() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/img/logo.png")
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body(png_bytes())
        .expect(1)
        .create_async()
        .await;

    let config = SnapshotConfig::default();
    let fetcher = HttpFetcher::new(&config).expect("client builds");
    let resource = fetcher
        .fetch(&url(&format!("{}/img/logo.png", server.url())))
        .await
        .expect("fetch succeeds");

    assert_eq!(resource.content_type.as_deref(), Some("image/png"));
    assert_eq!(resource.body, png_bytes());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_non_success_status_is_an_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/gone.css")
        .with_status(404)
        .create_async()
        .await;

    let config = SnapshotConfig::default();
    let fetcher = HttpFetcher::new(&config).expect("client builds");
    let target = url(&format!("{}/gone.css", server.url()));

    let result = fetcher.fetch(&target).await;
    assert_eq!(
        result,
        Err(FetchError::Status {
            url: target.to_string(),
            status: 404
        })
    );
    assert!(fetch_as_payload(&fetcher, &target, &config).await.is_none());
}

#[tokio::test]
async fn test_body_over_limit_is_rejected() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/huge.jpg")
        .with_status(200)
        .with_header("content-type", "image/jpeg")
        .with_body(vec![0u8; 4096])
        .create_async()
        .await;

    let config = SnapshotConfig::builder()
        .max_resource_size(1024)
        .build()
        .expect("valid config");
    let fetcher = HttpFetcher::new(&config).expect("client builds");

    let result = fetcher
        .fetch(&url(&format!("{}/huge.jpg", server.url())))
        .await;
    assert!(
        matches!(result, Err(FetchError::TooLarge { size: 4096, limit: 1024, .. })),
        "got {result:?}"
    );
}

#[tokio::test]
async fn test_non_http_scheme_is_unsupported() {
    let config = SnapshotConfig::default();
    let fetcher = HttpFetcher::new(&config).expect("client builds");

    let result = fetcher.fetch(&url("ftp://files.example.com/a.png")).await;
    assert!(
        matches!(result, Err(FetchError::UnsupportedScheme { ref scheme, .. }) if scheme == "ftp"),
        "got {result:?}"
    );
}

#[tokio::test]
async fn test_redirect_reports_final_url() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/old/page.html")
        .with_status(301)
        .with_header("location", "/new/page.html")
        .create_async()
        .await;
    server
        .mock("GET", "/new/page.html")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<p>moved</p>")
        .create_async()
        .await;

    let config = SnapshotConfig::default();
    let fetcher = HttpFetcher::new(&config).expect("client builds");
    let resource = fetch_resource(
        &fetcher,
        &url(&format!("{}/old/page.html", server.url())),
        &config,
    )
    .await
    .expect("fetch succeeds");

    assert_eq!(resource.url.path(), "/new/page.html");
    assert_eq!(resource.text(), "<p>moved</p>");
}

#[tokio::test]
async fn test_snapshot_over_http() {
    let mut server = Server::new_async().await;
    let base = server.url();
    server
        .mock("GET", "/site.css")
        .with_status(200)
        .with_header("content-type", "text/css")
        .with_body("h1{background:url(/hero.png)}")
        .create_async()
        .await;
    server
        .mock("GET", "/hero.png")
        .with_status(200)
        .with_header("content-type", "image/png")
        .with_body(png_bytes())
        .create_async()
        .await;

    let config = SnapshotConfig::default();
    let fetcher = HttpFetcher::new(&config).expect("client builds");
    let output = snapshot_html(
        r#"<html><head><link rel="stylesheet" href="site.css"></head><body><h1>Hi</h1></body></html>"#,
        &url(&format!("{base}/index.html")),
        &fetcher,
        &config,
    )
    .await
    .expect("snapshot succeeds");

    let html = String::from_utf8(output.artifact.into_bytes()).expect("utf-8 output");
    assert!(html.contains("<style>h1{background:url('data:image/png;base64,"));
    assert!(!html.contains("<link"));
    assert_eq!(output.report.total_failures(), 0);
}
