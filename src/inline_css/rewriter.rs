//! Style text rewriting
//!
//! Stylesheets get their `@import` rules replaced by the fully rewritten
//! imported bodies and every `url(...)` reference replaced by either an
//! embedded payload or the absolute URL. Inline `style` attributes get the
//! same `url(...)` treatment without import handling.
//!
//! All fetches of one stylesheet run concurrently; results are spliced back
//! by span once every fetch has settled.

use futures::FutureExt;
use futures::future::{LocalBoxFuture, join_all};
use url::Url;

use super::scanner::{ImportRule, UrlToken, scan_imports, scan_urls, splice};
use super::types::{InliningError, InliningResult, ResourceType, RewrittenCss};
use crate::config::SnapshotConfig;
use crate::fetcher::{ResourceFetcher, try_fetch_payload, try_fetch_text};
use crate::utils::{ResolvedUrl, is_data_uri, resolve_url};

/// Extensions fetched and embedded when referenced from `url(...)`
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp"];
const FONT_EXTENSIONS: &[&str] = &["woff2", "woff", "ttf", "otf"];

/// Classify a resolved reference by the extension of its path
fn embeddable_type(url: &Url) -> Option<ResourceType> {
    let (_, extension) = url.path().rsplit_once('.')?;
    let extension = extension.to_ascii_lowercase();
    if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        Some(ResourceType::Image)
    } else if FONT_EXTENSIONS.contains(&extension.as_str()) {
        Some(ResourceType::Font)
    } else {
        None
    }
}

/// Wrap a reference as `url('...')`, keeping the quoting intact
fn quoted_url(reference: &str) -> String {
    format!("url('{}')", reference.replace('\'', "%27"))
}

/// Wrap an inlined import body in its media condition, if it had one
fn wrap_media(body: &str, media: &str) -> String {
    let condition = media.trim();
    if condition.is_empty() {
        return body.to_string();
    }
    let lowered = condition.to_ascii_lowercase();
    if lowered.starts_with("layer") || lowered.starts_with("supports") {
        log::debug!("Inlining @import without its '{condition}' condition");
        return body.to_string();
    }
    format!("@media {condition} {{\n{body}\n}}")
}

/// Rewrites style text against a fetcher and configuration
pub struct CssRewriter<'a, F> {
    fetcher: &'a F,
    config: &'a SnapshotConfig,
}

impl<'a, F: ResourceFetcher> CssRewriter<'a, F> {
    pub fn new(fetcher: &'a F, config: &'a SnapshotConfig) -> Self {
        Self { fetcher, config }
    }

    /// Rewrite a complete stylesheet whose own location is `base`
    pub async fn rewrite_stylesheet(&self, css: &str, base: &Url) -> RewrittenCss {
        self.rewrite_sheet(css, base, &[base.to_string()], 0).await
    }

    /// Rewrite the body of an embedded `<style>` element
    ///
    /// `base` is the document location; it does not count as an import
    /// ancestor, so a stylesheet importing the page URL is still followed.
    pub async fn rewrite_embedded(&self, css: &str, base: &Url) -> RewrittenCss {
        self.rewrite_sheet(css, base, &[], 0).await
    }

    /// Rewrite a declaration list such as an inline `style` attribute
    pub async fn rewrite_declarations(&self, style: &str, base: &Url) -> RewrittenCss {
        let tokens = scan_urls(style, &[]);
        let (edits, result) = self.rewrite_urls(tokens, base).await;
        RewrittenCss {
            text: splice(style, edits),
            result,
        }
    }

    /// `ancestors` holds the URLs of every stylesheet on the import chain
    /// leading here and guards against cycles; `depth` counts the imports
    /// already followed to reach this sheet.
    fn rewrite_sheet<'s>(
        &'s self,
        css: &'s str,
        base: &'s Url,
        ancestors: &'s [String],
        depth: usize,
    ) -> LocalBoxFuture<'s, RewrittenCss> {
        async move {
            let imports = scan_imports(css);
            let import_spans: Vec<_> = imports.iter().map(|i| i.span.clone()).collect();
            let tokens = scan_urls(css, &import_spans);

            let import_futures = imports
                .into_iter()
                .map(|import| self.expand_import(import, base, ancestors, depth));

            let (expanded, (mut edits, mut result)) = futures::join!(
                join_all(import_futures),
                self.rewrite_urls(tokens, base)
            );

            for (edit, import_result) in expanded {
                edits.push(edit);
                result.merge(import_result);
            }

            RewrittenCss {
                text: splice(css, edits),
                result,
            }
        }
        .boxed_local()
    }

    async fn expand_import(
        &self,
        import: ImportRule,
        base: &Url,
        ancestors: &[String],
        depth: usize,
    ) -> ((std::ops::Range<usize>, String), InliningResult) {
        let mut result = InliningResult::default();

        let import_url = match resolve_url(&import.href, base) {
            ResolvedUrl::Absolute(url) => url,
            ResolvedUrl::Unresolved(raw) => {
                result.record_failure(InliningError::new(
                    raw,
                    ResourceType::Import,
                    "unresolvable import reference",
                ));
                let kept = format!("@import {}{};", quoted_url(&import.href), import.media);
                return ((import.span, kept), result);
            }
        };

        let key = import_url.to_string();
        if ancestors.contains(&key) {
            log::warn!("Dropping cyclic @import of {key}");
            result.record_failure(InliningError::new(key, ResourceType::Import, "import cycle"));
            return ((import.span, String::new()), result);
        }
        if depth >= self.config.max_import_depth() {
            log::warn!(
                "Dropping @import of {key}: nesting exceeds {} levels",
                self.config.max_import_depth()
            );
            result.record_failure(InliningError::new(
                key,
                ResourceType::Import,
                "import depth limit exceeded",
            ));
            return ((import.span, String::new()), result);
        }

        match try_fetch_text(self.fetcher, &import_url, self.config).await {
            Ok(imported_css) => {
                log::debug!("Inlining @import {key} ({} chars)", imported_css.len());
                let mut chain = ancestors.to_vec();
                chain.push(key);

                let rewritten = self
                    .rewrite_sheet(&imported_css, &import_url, &chain, depth + 1)
                    .await;
                result.record_success();
                result.merge(rewritten.result);
                let body = wrap_media(&rewritten.text, &import.media);
                ((import.span, body), result)
            }
            Err(e) => {
                result.record_failure(InliningError::new(key, ResourceType::Import, e));
                let kept = format!("@import {}{};", quoted_url(import_url.as_str()), import.media);
                ((import.span, kept), result)
            }
        }
    }

    async fn rewrite_urls(
        &self,
        tokens: Vec<UrlToken>,
        base: &Url,
    ) -> (Vec<(std::ops::Range<usize>, String)>, InliningResult) {
        let futures = tokens
            .into_iter()
            .filter(|token| !token.value.is_empty() && !is_data_uri(&token.value))
            .map(|token| self.rewrite_url_token(token, base));

        let mut edits = Vec::new();
        let mut result = InliningResult::default();
        for (edit, outcome) in join_all(futures).await {
            edits.push(edit);
            match outcome {
                Some(Ok(())) => result.record_success(),
                Some(Err(failure)) => result.record_failure(failure),
                None => {}
            }
        }
        (edits, result)
    }

    /// `None` outcome: nothing was fetched for this token
    async fn rewrite_url_token(
        &self,
        token: UrlToken,
        base: &Url,
    ) -> (
        (std::ops::Range<usize>, String),
        Option<Result<(), InliningError>>,
    ) {
        let absolute = match resolve_url(&token.value, base) {
            ResolvedUrl::Absolute(url) => url,
            ResolvedUrl::Unresolved(raw) => return ((token.span, quoted_url(&raw)), None),
        };

        let Some(resource_type) = embeddable_type(&absolute) else {
            return ((token.span, quoted_url(absolute.as_str())), None);
        };

        match try_fetch_payload(self.fetcher, &absolute, self.config).await {
            Ok(payload) => {
                log::debug!("Embedded {resource_type} {absolute}");
                ((token.span, quoted_url(&payload.to_data_uri())), Some(Ok(())))
            }
            Err(e) => (
                (token.span, quoted_url(absolute.as_str())),
                Some(Err(InliningError::new(
                    absolute.as_str(),
                    resource_type,
                    e,
                ))),
            ),
        }
    }
}
