//! URL resolution for references found in markup and stylesheets.
//!
//! Resolution never fails: a reference that cannot be resolved is carried
//! through unchanged so callers can still write it back.

use url::Url;

/// Outcome of resolving a reference against a base location
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedUrl {
    /// The reference resolved to an absolute URL
    Absolute(Url),
    /// The reference was malformed; the original text is kept as-is
    Unresolved(String),
}

impl ResolvedUrl {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            ResolvedUrl::Absolute(url) => url.as_str(),
            ResolvedUrl::Unresolved(raw) => raw,
        }
    }

    /// The absolute URL, if resolution succeeded
    #[must_use]
    pub fn url(&self) -> Option<&Url> {
        match self {
            ResolvedUrl::Absolute(url) => Some(url),
            ResolvedUrl::Unresolved(_) => None,
        }
    }

    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            ResolvedUrl::Absolute(url) => url.into(),
            ResolvedUrl::Unresolved(raw) => raw,
        }
    }
}

impl std::fmt::Display for ResolvedUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve a potentially relative reference against a base URL
///
/// Leading and trailing whitespace is ignored the same way browsers ignore
/// it in attribute values. A malformed reference comes back as
/// [`ResolvedUrl::Unresolved`] holding the original text.
pub fn resolve_url(reference: &str, base: &Url) -> ResolvedUrl {
    match base.join(reference.trim()) {
        Ok(url) => ResolvedUrl::Absolute(url),
        Err(e) => {
            log::debug!("Leaving unresolvable reference '{reference}' as-is: {e}");
            ResolvedUrl::Unresolved(reference.to_string())
        }
    }
}

/// Check if a reference is already an embedded `data:` payload
#[must_use]
pub fn is_data_uri(reference: &str) -> bool {
    reference
        .trim_start()
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// Check if a reference stands on its own without a base
///
/// Anything that parses as an absolute URL counts, whatever its scheme
/// (`https:`, `mailto:`, `data:`, `javascript:`).
#[must_use]
pub fn is_absolute_reference(reference: &str) -> bool {
    Url::parse(reference.trim()).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/css/site.css").expect("valid base")
    }

    #[test]
    fn test_resolves_parent_relative_reference() {
        let resolved = resolve_url("../img/x.jpg", &base());
        assert_eq!(resolved.as_str(), "https://example.com/img/x.jpg");
        assert!(resolved.url().is_some());
    }

    #[test]
    fn test_absolute_reference_passes_through() {
        let resolved = resolve_url("https://cdn.example.net/a.png", &base());
        assert_eq!(resolved.as_str(), "https://cdn.example.net/a.png");
    }

    #[test]
    fn test_fragment_only_reference_resolves_against_base() {
        let resolved = resolve_url("#icon", &base());
        assert_eq!(resolved.as_str(), "https://example.com/css/site.css#icon");
    }

    #[test]
    fn test_malformed_reference_is_kept() {
        let resolved = resolve_url("http://[::1", &base());
        assert_eq!(resolved, ResolvedUrl::Unresolved("http://[::1".to_string()));
        assert_eq!(resolved.into_string(), "http://[::1");
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let resolved = resolve_url("  pic.png\n", &base());
        assert_eq!(resolved.as_str(), "https://example.com/css/pic.png");
    }

    #[test]
    fn test_data_uri_detection() {
        assert!(is_data_uri("data:image/png;base64,AAAA"));
        assert!(is_data_uri("DATA:text/plain,hi"));
        assert!(!is_data_uri("pic.png"));
        assert!(!is_data_uri("dat"));
    }

    #[test]
    fn test_absolute_reference_detection() {
        assert!(is_absolute_reference("https://example.com/"));
        assert!(is_absolute_reference("mailto:someone@example.com"));
        assert!(!is_absolute_reference("/about"));
        assert!(!is_absolute_reference("page.html"));
        assert!(!is_absolute_reference("#top"));
    }
}
