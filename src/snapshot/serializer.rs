//! Serialization of the finished tree

use std::borrow::Cow;

use kuchiki::NodeRef;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::types::SnapshotError;

lazy_static! {
    static ref NUMERIC_REFERENCE: Regex = Regex::new(r"&#(?:[xX]([0-9a-fA-F]{1,6})|([0-9]{1,7}));")
        .expect("BUG: hardcoded numeric reference pattern is invalid - this is a compile-time bug");
}

/// Characters that would change the markup if written literally
const MARKUP_SIGNIFICANT: &[char] = &['<', '>', '&', '"', '\''];

/// Serialize a tree (document or element) to HTML text
pub fn serialize_document(root: &NodeRef) -> Result<String, SnapshotError> {
    let mut html_output = Vec::new();
    root.serialize(&mut html_output)
        .map_err(SnapshotError::Serialize)?;

    Ok(String::from_utf8(html_output)?)
}

/// Replace numeric character references with the characters they name
///
/// References to markup-significant characters, to NUL and to invalid code
/// points are kept as written so the text still parses to the same tree.
#[must_use]
pub fn decode_numeric_entities(html: &str) -> Cow<'_, str> {
    NUMERIC_REFERENCE.replace_all(html, |captures: &Captures<'_>| {
        let code_point = match (captures.get(1), captures.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (None, Some(decimal)) => decimal.as_str().parse::<u32>().ok(),
            (None, None) => None,
        };

        match code_point.and_then(char::from_u32) {
            Some(c) if c != '\0' && !MARKUP_SIGNIFICANT.contains(&c) => c.to_string(),
            _ => captures[0].to_string(),
        }
    })
}

/// Serialize and normalize numeric references in one step
pub fn render_document(root: &NodeRef) -> Result<String, SnapshotError> {
    let html = serialize_document(root)?;
    Ok(decode_numeric_entities(&html).into_owned())
}
