//! Document walking and mutation
//!
//! Each step selects the elements it treats, fans their work out
//! concurrently and returns only once every handler has settled. Handlers
//! touch disjoint elements, so their relative order does not matter.

use futures::future::join_all;
use kuchiki::traits::*;
use kuchiki::{ElementData, NodeDataRef, NodeRef};
use url::Url;

use super::dom::{
    all_elements, attribute, create_element, elements_named, parse_document, remove_attribute,
    set_attribute, set_text_content,
};
use super::sanitizer::{remove_event_handlers, remove_scripts};
use super::serializer::serialize_document;
use super::types::SnapshotError;
use crate::config::SnapshotConfig;
use crate::fetcher::{ResourceFetcher, try_fetch_payload, try_fetch_text};
use crate::inline_css::{CssRewriter, InliningError, InliningResult, ResourceType};
use crate::utils::{ResolvedUrl, is_absolute_reference, is_data_uri, resolve_url};

/// Elements whose text is not markup and must not be entity-decoded
const RAW_TEXT_ELEMENTS: &[&str] = &["style", "script", "textarea"];

fn tally(outcomes: Vec<Result<(), InliningError>>) -> InliningResult {
    let mut result = InliningResult::default();
    for outcome in outcomes {
        match outcome {
            Ok(()) => result.record_success(),
            Err(failure) => result.record_failure(failure),
        }
    }
    result
}

fn merge_all(results: Vec<InliningResult>) -> InliningResult {
    let mut merged = InliningResult::default();
    for result in results {
        merged.merge(result);
    }
    merged
}

/// Non-empty attribute value, if present
fn non_empty_attribute(element: &NodeDataRef<ElementData>, name: &str) -> Option<String> {
    attribute(element, name).filter(|value| !value.trim().is_empty())
}

fn declares_content_type(meta: &NodeDataRef<ElementData>) -> bool {
    attribute(meta, "http-equiv")
        .is_some_and(|value| value.trim().eq_ignore_ascii_case("content-type"))
}

/// Declare UTF-8 with a `<meta charset>` leading `<head>`
///
/// The serialized artifact is always UTF-8. An existing declaration is
/// rewritten in place and moved to the front; other charset declarations,
/// including `http-equiv` content types, are dropped. Returns whether a new
/// element had to be inserted.
pub fn ensure_charset_meta(root: &NodeRef) -> bool {
    let Some(head) = elements_named(root, &["head"]).into_iter().next() else {
        return false;
    };

    let mut declared = None;
    for meta in elements_named(root, &["meta"]) {
        if declares_content_type(&meta) {
            meta.as_node().detach();
        } else if meta.attributes.borrow().contains("charset") {
            if declared.is_none() {
                declared = Some(meta);
            } else {
                meta.as_node().detach();
            }
        }
    }

    if let Some(meta) = declared {
        if attribute(&meta, "charset").as_deref() != Some("UTF-8") {
            log::debug!("Rewriting charset declaration to UTF-8");
            set_attribute(&meta, "charset", "UTF-8".to_string());
        }
        head.as_node().prepend(meta.as_node().clone());
        return false;
    }

    let Some(meta) = create_element(r#"<meta charset="UTF-8">"#, "meta") else {
        return false;
    };
    head.as_node().prepend(meta);
    true
}

// ============================================================================
// IMAGES
// ============================================================================

/// Embed every `<img src>` under `root` as a data URI
pub async fn inline_images<F: ResourceFetcher>(
    root: &NodeRef,
    base: &Url,
    fetcher: &F,
    config: &SnapshotConfig,
) -> InliningResult {
    let futures = elements_named(root, &["img"])
        .into_iter()
        .filter_map(|img| {
            let src = non_empty_attribute(&img, "src")?;
            if is_data_uri(&src) {
                return None;
            }
            Some(inline_image(img, src, base, fetcher, config))
        })
        .collect::<Vec<_>>();

    let result = tally(join_all(futures).await);
    log::info!(
        "Images: {} embedded, {} left external",
        result.successes,
        result.failures.len()
    );
    result
}

async fn inline_image<F: ResourceFetcher>(
    img: NodeDataRef<ElementData>,
    src: String,
    base: &Url,
    fetcher: &F,
    config: &SnapshotConfig,
) -> Result<(), InliningError> {
    let absolute = match resolve_url(&src, base) {
        ResolvedUrl::Absolute(url) => url,
        ResolvedUrl::Unresolved(raw) => {
            return Err(InliningError::new(
                raw,
                ResourceType::Image,
                "unresolvable image reference",
            ));
        }
    };

    match try_fetch_payload(fetcher, &absolute, config).await {
        Ok(payload) => {
            log::debug!("Embedded image {absolute}");
            set_attribute(&img, "src", payload.to_data_uri());
            Ok(())
        }
        Err(e) => {
            set_attribute(&img, "src", absolute.to_string());
            Err(InliningError::new(absolute.as_str(), ResourceType::Image, e))
        }
    }
}

// ============================================================================
// STYLESHEETS
// ============================================================================

/// `rel` lists `stylesheet` and is not an alternate sheet
fn is_stylesheet_link(link: &NodeDataRef<ElementData>) -> bool {
    let Some(rel) = attribute(link, "rel") else {
        return false;
    };
    let mut tokens = rel.split_ascii_whitespace();
    let is_stylesheet = tokens
        .clone()
        .any(|token| token.eq_ignore_ascii_case("stylesheet"));
    is_stylesheet && !tokens.any(|token| token.eq_ignore_ascii_case("alternate"))
}

/// Replace every `<link rel=stylesheet>` with an equivalent `<style>` and
/// rewrite the bodies of existing `<style>` elements
pub async fn inline_stylesheets<F: ResourceFetcher>(
    root: &NodeRef,
    base: &Url,
    fetcher: &F,
    config: &SnapshotConfig,
) -> InliningResult {
    let rewriter = &CssRewriter::new(fetcher, config);

    // Collect both lists before anything is replaced, so generated <style>
    // elements are not rewritten a second time.
    let embedded = elements_named(root, &["style"]);
    let links: Vec<_> = elements_named(root, &["link"])
        .into_iter()
        .filter(is_stylesheet_link)
        .collect();

    let embedded_futures = embedded
        .into_iter()
        .map(|style| rewrite_style_element(style, base, rewriter));
    let link_futures = links.into_iter().filter_map(|link| {
        let href = non_empty_attribute(&link, "href")?;
        Some(inline_stylesheet_link(link, href, base, rewriter, fetcher, config))
    });

    let (embedded_results, link_results) =
        futures::join!(join_all(embedded_futures), join_all(link_futures));

    let mut result = merge_all(embedded_results);
    result.merge(merge_all(link_results));
    log::info!(
        "Stylesheets: {} resources embedded, {} left external",
        result.successes,
        result.failures.len()
    );
    result
}

async fn rewrite_style_element<F: ResourceFetcher>(
    style: NodeDataRef<ElementData>,
    base: &Url,
    rewriter: &CssRewriter<'_, F>,
) -> InliningResult {
    let css = style.as_node().text_contents();
    let rewritten = rewriter.rewrite_embedded(&css, base).await;
    if rewritten.text != css {
        set_text_content(style.as_node(), rewritten.text);
    }
    rewritten.result
}

async fn inline_stylesheet_link<F: ResourceFetcher>(
    link: NodeDataRef<ElementData>,
    href: String,
    base: &Url,
    rewriter: &CssRewriter<'_, F>,
    fetcher: &F,
    config: &SnapshotConfig,
) -> InliningResult {
    let mut result = InliningResult::default();

    let ResolvedUrl::Absolute(sheet_url) = resolve_url(&href, base) else {
        result.record_failure(InliningError::new(
            href,
            ResourceType::Stylesheet,
            "unresolvable stylesheet reference",
        ));
        return result;
    };

    let css = match try_fetch_text(fetcher, &sheet_url, config).await {
        Ok(css) => css,
        Err(e) => {
            result.record_failure(InliningError::new(
                sheet_url.as_str(),
                ResourceType::Stylesheet,
                e,
            ));
            return result;
        }
    };

    let rewritten = rewriter.rewrite_stylesheet(&css, &sheet_url).await;

    let Some(style) = create_element("<style></style>", "style") else {
        result.record_failure(InliningError::new(
            sheet_url.as_str(),
            ResourceType::Stylesheet,
            "could not create style element",
        ));
        return result;
    };
    if let (Some(media), Some(element)) = (attribute(&link, "media"), style.as_element()) {
        element.attributes.borrow_mut().insert("media", media);
    }
    style.append(NodeRef::new_text(rewritten.text));

    let node = link.as_node();
    node.insert_before(style);
    node.detach();

    log::debug!("Replaced stylesheet link with inline style: {href} (resolved to {sheet_url})");
    result.record_success();
    result.merge(rewritten.result);
    result
}

// ============================================================================
// STYLE ATTRIBUTES
// ============================================================================

/// Rewrite `url(...)` references in every `style` attribute under `root`
pub async fn inline_style_attributes<F: ResourceFetcher>(
    root: &NodeRef,
    base: &Url,
    fetcher: &F,
    config: &SnapshotConfig,
) -> InliningResult {
    let rewriter = &CssRewriter::new(fetcher, config);

    let futures = all_elements(root)
        .into_iter()
        .filter_map(|element| {
            let style = non_empty_attribute(&element, "style")?;
            Some(async move {
                let rewritten = rewriter.rewrite_declarations(&style, base).await;
                set_attribute(&element, "style", rewritten.text);
                rewritten.result
            })
        })
        .collect::<Vec<_>>();

    let result = merge_all(join_all(futures).await);
    log::info!(
        "Style attributes: {} resources embedded, {} left external",
        result.successes,
        result.failures.len()
    );
    result
}

// ============================================================================
// SUB-DOCUMENTS
// ============================================================================

/// Run the reduced pipeline over a frame's markup and serialize it
///
/// Scripts are removed first, then images and inline styles are embedded
/// and remaining links made absolute against the frame's own URL, then
/// event handlers are stripped. A `srcdoc` document inherits the parent's
/// base URL, so no relative reference may survive.
pub async fn render_sub_document<F: ResourceFetcher>(
    markup: &str,
    base: &Url,
    fetcher: &F,
    config: &SnapshotConfig,
) -> Result<(String, InliningResult), SnapshotError> {
    let document = parse_document(markup);
    remove_scripts(&document);

    let mut result = inline_images(&document, base, fetcher, config).await;
    result.merge(inline_style_attributes(&document, base, fetcher, config).await);
    absolutize_links(&document, base);

    remove_event_handlers(&document);
    let html = serialize_document(&document)?;
    Ok((html, result))
}

/// Replace every `<iframe src>` with sanitized static `srcdoc` content
///
/// A frame whose markup cannot be fetched keeps a live `src` pointing at
/// its absolute URL.
pub async fn inline_iframes<F: ResourceFetcher>(
    root: &NodeRef,
    base: &Url,
    fetcher: &F,
    config: &SnapshotConfig,
) -> InliningResult {
    let frames = elements_named(root, &["iframe"]);

    if !config.inline_iframes() {
        for frame in &frames {
            if let Some(src) = non_empty_attribute(frame, "src")
                && let ResolvedUrl::Absolute(url) = resolve_url(&src, base)
            {
                set_attribute(frame, "src", url.into());
            }
        }
        return InliningResult::default();
    }

    let futures = frames
        .into_iter()
        .filter_map(|frame| {
            let src = non_empty_attribute(&frame, "src")?;
            Some(inline_iframe(frame, src, base, fetcher, config))
        })
        .collect::<Vec<_>>();

    let result = merge_all(join_all(futures).await);
    log::info!(
        "Frames: {} resources embedded, {} left external",
        result.successes,
        result.failures.len()
    );
    result
}

async fn inline_iframe<F: ResourceFetcher>(
    frame: NodeDataRef<ElementData>,
    src: String,
    base: &Url,
    fetcher: &F,
    config: &SnapshotConfig,
) -> InliningResult {
    let mut result = InliningResult::default();

    let ResolvedUrl::Absolute(frame_url) = resolve_url(&src, base) else {
        result.record_failure(InliningError::new(
            src,
            ResourceType::Frame,
            "unresolvable frame reference",
        ));
        return result;
    };

    let rendered = match try_fetch_text(fetcher, &frame_url, config).await {
        Ok(markup) => render_sub_document(&markup, &frame_url, fetcher, config)
            .await
            .map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };

    match rendered {
        Ok((html, nested)) => {
            set_attribute(&frame, "srcdoc", html);
            remove_attribute(&frame, "src");
            log::debug!("Replaced frame {frame_url} with static content");
            result.record_success();
            result.merge(nested);
        }
        Err(error) => {
            set_attribute(&frame, "src", frame_url.to_string());
            result.record_failure(InliningError::new(
                frame_url.as_str(),
                ResourceType::Frame,
                error,
            ));
        }
    }
    result
}

// ============================================================================
// POST-PASSES
// ============================================================================

/// Rewrite relative `href`/`src` values of `a`, `link` and `img` to absolute form
pub fn absolutize_links(root: &NodeRef, base: &Url) -> usize {
    let mut rewritten = 0;
    for element in elements_named(root, &["a", "link", "img"]) {
        let name = if &*element.name.local == "img" {
            "src"
        } else {
            "href"
        };
        let Some(value) = non_empty_attribute(&element, name) else {
            continue;
        };
        if is_data_uri(&value) || is_absolute_reference(&value) {
            continue;
        }
        if let ResolvedUrl::Absolute(url) = resolve_url(&value, base) {
            set_attribute(&element, name, url.into());
            rewritten += 1;
        }
    }
    rewritten
}

/// Decode HTML entities left in text nodes under `<body>`
pub fn decode_text_entities(root: &NodeRef) -> usize {
    let Some(body) = elements_named(root, &["body"]).into_iter().next() else {
        return 0;
    };

    let mut decoded_count = 0;
    for text in body.as_node().inclusive_descendants().text_nodes() {
        let in_raw_text = text
            .as_node()
            .parent()
            .and_then(|parent| {
                parent
                    .as_element()
                    .map(|e| RAW_TEXT_ELEMENTS.contains(&&*e.name.local))
            })
            .unwrap_or(false);
        if in_raw_text {
            continue;
        }

        let current = text.borrow().clone();
        let decoded = html_escape::decode_html_entities(&current);
        if decoded != current {
            *text.borrow_mut() = decoded.into_owned();
            decoded_count += 1;
        }
    }
    decoded_count
}
