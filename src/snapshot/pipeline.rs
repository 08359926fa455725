//! Snapshot orchestration
//!
//! Steps run in a fixed order and each one finishes before the next starts:
//! later steps observe the mutations of earlier ones (images embedded before
//! links are absolutized, scripts removed after frames are rendered).

use kuchiki::NodeRef;
use url::Url;

use super::dom::parse_document;
use super::packager::Artifact;
use super::sanitizer::{remove_event_handlers, remove_scripts};
use super::serializer::render_document;
use super::types::{SnapshotError, SnapshotOutput, SnapshotReport};
use super::walker::{
    absolutize_links, decode_text_entities, ensure_charset_meta, inline_iframes, inline_images,
    inline_style_attributes, inline_stylesheets,
};
use crate::config::SnapshotConfig;
use crate::fetcher::ResourceFetcher;

/// Snapshot a parsed document in place
///
/// `location` is the document's own URL and the base for every relative
/// reference. The document is mutated; the returned artifact holds its
/// final serialization.
pub async fn snapshot_document<F: ResourceFetcher>(
    document: &NodeRef,
    location: &Url,
    fetcher: &F,
    config: &SnapshotConfig,
) -> Result<SnapshotOutput, SnapshotError> {
    log::info!("Snapshotting {location}");

    let mut report = SnapshotReport {
        charset_inserted: ensure_charset_meta(document),
        ..SnapshotReport::default()
    };

    report.images = inline_images(document, location, fetcher, config).await;
    report.stylesheets = inline_stylesheets(document, location, fetcher, config).await;
    report.style_attributes = inline_style_attributes(document, location, fetcher, config).await;
    report.iframes = inline_iframes(document, location, fetcher, config).await;

    report.links_absolutized = absolutize_links(document, location);
    report.scripts_removed = remove_scripts(document);
    report.handlers_removed = remove_event_handlers(document);
    report.text_nodes_decoded = decode_text_entities(document);

    for failure in report
        .images
        .failures
        .iter()
        .chain(&report.stylesheets.failures)
        .chain(&report.style_attributes.failures)
        .chain(&report.iframes.failures)
    {
        log::debug!("Left external: {} {} ({})", failure.resource_type, failure.url, failure.error);
    }

    let html = render_document(document)?;
    let artifact = Artifact::new(html, location);
    log::info!("Snapshot of {location} complete: {report}");

    Ok(SnapshotOutput { artifact, report })
}

/// Parse `html` and snapshot it
pub async fn snapshot_html<F: ResourceFetcher>(
    html: &str,
    location: &Url,
    fetcher: &F,
    config: &SnapshotConfig,
) -> Result<SnapshotOutput, SnapshotError> {
    let document = parse_document(html);
    snapshot_document(&document, location, fetcher, config).await
}
