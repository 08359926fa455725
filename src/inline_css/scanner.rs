//! Span-based scanning of style text
//!
//! The scanner finds `@import` rules and `url(...)` tokens together with
//! their byte spans. Rewriting then splices replacements into those spans in
//! one pass, so replacement text is never scanned again and two identical
//! tokens at different offsets are rewritten independently.

use std::ops::Range;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    // These patterns are hardcoded and syntactically valid.
    // If they fail to compile, it indicates a compile-time bug in the pattern strings.
    static ref IMPORT_RULE: Regex = Regex::new(
        r#"(?i)@import\s*(?:url\(\s*(?:"([^"]*)"|'([^']*)'|([^)"'\s]*))\s*\)|"([^"]*)"|'([^']*)')([^;]*);"#
    )
    .expect("BUG: hardcoded @import pattern is invalid - this is a compile-time bug");

    static ref URL_TOKEN: Regex = Regex::new(
        r#"(?i)\burl\(\s*(?:"([^"]*)"|'([^']*)'|([^)"'\s]*))\s*\)"#
    )
    .expect("BUG: hardcoded url() pattern is invalid - this is a compile-time bug");
}

/// One `@import` rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRule {
    /// Byte span of the whole rule, terminating `;` included
    pub span: Range<usize>,
    /// Imported reference with quotes and `url()` stripped
    pub href: String,
    /// Everything between the reference and the `;`, verbatim
    pub media: String,
}

/// One `url(...)` token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlToken {
    pub span: Range<usize>,
    /// Reference with quotes stripped
    pub value: String,
}

fn first_group(captures: &Captures<'_>, groups: Range<usize>) -> String {
    groups
        .filter_map(|i| captures.get(i))
        .map(|m| m.as_str().trim().to_string())
        .next()
        .unwrap_or_default()
}

/// Find every `@import` rule, in source order
#[must_use]
pub fn scan_imports(css: &str) -> Vec<ImportRule> {
    IMPORT_RULE
        .captures_iter(css)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            Some(ImportRule {
                span: whole.range(),
                href: first_group(&captures, 1..6),
                media: captures
                    .get(6)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
            })
        })
        .collect()
}

/// Find every `url(...)` token outside the given spans, in source order
#[must_use]
pub fn scan_urls(css: &str, skip: &[Range<usize>]) -> Vec<UrlToken> {
    URL_TOKEN
        .captures_iter(css)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            let inside_skipped = skip
                .iter()
                .any(|s| whole.start() >= s.start && whole.end() <= s.end);
            if inside_skipped {
                return None;
            }
            Some(UrlToken {
                span: whole.range(),
                value: first_group(&captures, 1..4),
            })
        })
        .collect()
}

/// Replace each span with its text, leaving everything else untouched
///
/// Edits must not overlap; they are applied in offset order.
#[must_use]
pub fn splice(css: &str, mut edits: Vec<(Range<usize>, String)>) -> String {
    edits.sort_by_key(|(span, _)| span.start);

    let mut out = String::with_capacity(css.len());
    let mut cursor = 0;
    for (span, replacement) in edits {
        if span.start < cursor {
            log::debug!("Skipping overlapping style edit at {}..{}", span.start, span.end);
            continue;
        }
        out.push_str(&css[cursor..span.start]);
        out.push_str(&replacement);
        cursor = span.end;
    }
    out.push_str(&css[cursor..]);
    out
}
