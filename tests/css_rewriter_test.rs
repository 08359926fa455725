//! Stylesheet rewriting against an in-memory fetcher
//!
//! Covers recursive `@import` inlining, resolution of references inside
//! imported sheets, and the guards against cycles and runaway nesting.

use kodegen_tools_static_page::{CssRewriter, MemoryFetcher, ResourceType, SnapshotConfig};

mod common;
use common::{fast_config, url};

#[tokio::test]
async fn test_import_chain_is_inlined_in_order() {
    let fetcher = MemoryFetcher::new()
        .with_text("https://h/css/a.css", "text/css", "@import 'b.css';.a{}")
        .with_text("https://h/css/b.css", "text/css", ".b{}")
        .with_text("https://h/css/c.css", "text/css", ".c{}");
    let config = SnapshotConfig::default();
    let rewriter = CssRewriter::new(&fetcher, &config);

    let rewritten = rewriter
        .rewrite_stylesheet(
            "@import url(a.css);\n@import \"c.css\";\nmain{}",
            &url("https://h/css/s.css"),
        )
        .await;

    assert_eq!(rewritten.text, ".b{}.a{}\n.c{}\nmain{}");
    assert!(!rewritten.text.contains("@import"));
    assert_eq!(rewritten.result.successes, 3);
    assert!(!rewritten.result.has_failures());
}

#[tokio::test]
async fn test_imported_sheet_resolves_against_its_own_location() {
    let fetcher = MemoryFetcher::new()
        .with_text(
            "https://h/theme/dark.css",
            "text/css",
            "h1{background:url(stars.png)} h2{cursor:url(hand.cur)}",
        )
        .with_resource("https://h/img/x.png", Some("image/png"), vec![1, 2, 3])
        .with_status("https://h/theme/stars.png", 404);
    let config = SnapshotConfig::default();
    let rewriter = CssRewriter::new(&fetcher, &config);

    let rewritten = rewriter
        .rewrite_stylesheet(
            "@import '../theme/dark.css'; body{background:url(../img/x.png)}",
            &url("https://h/css/s.css"),
        )
        .await;

    assert_eq!(
        rewritten.text,
        "h1{background:url('https://h/theme/stars.png')} h2{cursor:url('https://h/theme/hand.cur')} \
body{background:url('data:image/png;base64,AQID')}"
    );
    // The import and the png were embedded; stars.png fell back to its absolute URL.
    assert_eq!(rewritten.result.successes, 2);
    assert_eq!(rewritten.result.failures.len(), 1);
    assert_eq!(rewritten.result.failures[0].url, "https://h/theme/stars.png");
    assert_eq!(rewritten.result.failures[0].resource_type, ResourceType::Image);
    // Non-embeddable extensions are never fetched.
    assert_eq!(fetcher.request_count("https://h/theme/hand.cur"), 0);
}

#[tokio::test]
async fn test_media_list_wraps_inlined_body() {
    let fetcher = MemoryFetcher::new().with_text("https://h/print.css", "text/css", "p{color:black}");
    let config = SnapshotConfig::default();
    let rewriter = CssRewriter::new(&fetcher, &config);

    let rewritten = rewriter
        .rewrite_stylesheet("@import url('print.css') print;", &url("https://h/main.css"))
        .await;

    assert_eq!(rewritten.text, "@media print {\np{color:black}\n}");
}

#[tokio::test]
async fn test_import_cycle_terminates() {
    let fetcher = MemoryFetcher::new()
        .with_text("https://h/a.css", "text/css", "@import 'b.css';.a{}")
        .with_text("https://h/b.css", "text/css", "@import 'a.css';.b{}");
    let config = SnapshotConfig::default();
    let rewriter = CssRewriter::new(&fetcher, &config);

    let rewritten = rewriter
        .rewrite_stylesheet("@import 'b.css';.a{}", &url("https://h/a.css"))
        .await;

    assert_eq!(rewritten.text, ".b{}.a{}");
    assert_eq!(fetcher.request_count("https://h/b.css"), 1);
    assert_eq!(fetcher.request_count("https://h/a.css"), 0);
    assert_eq!(rewritten.result.failures.len(), 1);
    assert_eq!(rewritten.result.failures[0].resource_type, ResourceType::Import);
}

#[tokio::test]
async fn test_self_import_is_dropped() {
    let fetcher = MemoryFetcher::new();
    let config = SnapshotConfig::default();
    let rewriter = CssRewriter::new(&fetcher, &config);

    let rewritten = rewriter
        .rewrite_stylesheet("@import 'self.css';p{}", &url("https://h/self.css"))
        .await;

    assert_eq!(rewritten.text, "p{}");
    assert!(fetcher.requests().is_empty());
}

#[tokio::test]
async fn test_import_depth_is_bounded() {
    let mut fetcher = MemoryFetcher::new();
    for level in 1..=10 {
        fetcher = fetcher.with_text(
            &format!("https://h/{level}.css"),
            "text/css",
            &format!("@import '{}.css';.l{level}{{}}", level + 1),
        );
    }
    let config = SnapshotConfig::builder()
        .max_import_depth(3)
        .build()
        .expect("valid config");
    let rewriter = CssRewriter::new(&fetcher, &config);

    let rewritten = rewriter
        .rewrite_stylesheet("@import '1.css';", &url("https://h/0.css"))
        .await;

    assert_eq!(rewritten.text, ".l3{}.l2{}.l1{}");
    assert_eq!(fetcher.requests().len(), 3);
    assert_eq!(rewritten.result.successes, 3);
    assert_eq!(rewritten.result.failures.len(), 1);
    assert_eq!(rewritten.result.failures[0].url, "https://h/4.css");
}

#[tokio::test]
async fn test_single_import_level_for_linked_and_embedded_sheets() {
    let fetcher = MemoryFetcher::new()
        .with_text("https://h/b.css", "text/css", "@import 'c.css';.b{}")
        .with_text("https://h/c.css", "text/css", ".c{}");
    let config = SnapshotConfig::builder()
        .max_import_depth(1)
        .build()
        .expect("valid config");
    let rewriter = CssRewriter::new(&fetcher, &config);
    let base = url("https://h/a.css");

    let linked = rewriter
        .rewrite_stylesheet("@import 'b.css';.a{}", &base)
        .await;
    let embedded = rewriter.rewrite_embedded("@import 'b.css';.a{}", &base).await;

    for rewritten in [&linked, &embedded] {
        assert_eq!(rewritten.text, ".b{}.a{}");
        assert_eq!(rewritten.result.successes, 1);
        assert_eq!(rewritten.result.failures.len(), 1);
        assert_eq!(rewritten.result.failures[0].error, "import depth limit exceeded");
    }
    assert_eq!(fetcher.request_count("https://h/c.css"), 0);
}

#[tokio::test]
async fn test_failed_import_becomes_absolute() {
    let fetcher = MemoryFetcher::new().with_status("https://h/css/missing.css", 500);
    let config = SnapshotConfig::default();
    let rewriter = CssRewriter::new(&fetcher, &config);

    let rewritten = rewriter
        .rewrite_stylesheet(
            "@import \"missing.css\" screen;\n@import url(gone.css);",
            &url("https://h/css/s.css"),
        )
        .await;

    assert_eq!(
        rewritten.text,
        "@import url('https://h/css/missing.css') screen;\n@import url('https://h/css/gone.css');"
    );
    assert_eq!(rewritten.result.failures.len(), 2);
}

#[tokio::test]
async fn test_hanging_font_falls_back_after_timeout() {
    let fetcher = MemoryFetcher::new()
        .with_hanging("https://h/fonts/slow.woff2")
        .with_resource("https://h/fonts/fast.woff", Some("font/woff"), b"wOFF".to_vec());
    let config = fast_config();
    let rewriter = CssRewriter::new(&fetcher, &config);

    let rewritten = rewriter
        .rewrite_stylesheet(
            "@font-face{src:url(slow.woff2) format('woff2'),url(fast.woff) format('woff')}",
            &url("https://h/fonts/f.css"),
        )
        .await;

    assert_eq!(
        rewritten.text,
        "@font-face{src:url('https://h/fonts/slow.woff2') format('woff2'),\
url('data:font/woff;base64,d09GRg==') format('woff')}"
    );
    assert_eq!(rewritten.result.failures[0].resource_type, ResourceType::Font);
}

#[tokio::test]
async fn test_identical_references_each_fetched() {
    let fetcher =
        MemoryFetcher::new().with_resource("https://h/dot.gif", Some("image/gif"), b"GIF89a".to_vec());
    let config = SnapshotConfig::default();
    let rewriter = CssRewriter::new(&fetcher, &config);

    let rewritten = rewriter
        .rewrite_stylesheet(".a{background:url(dot.gif)}.b{background:url(dot.gif)}", &url("https://h/s.css"))
        .await;

    let embedded = "url('data:image/gif;base64,R0lGODlh')";
    assert_eq!(rewritten.text, format!(".a{{background:{embedded}}}.b{{background:{embedded}}}"));
    assert_eq!(fetcher.request_count("https://h/dot.gif"), 2);
}
