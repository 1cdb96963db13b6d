//! URL canonicalization primitives for absolute observed URLs.
//!
//! The canonical form is scheme + authority + path + query with the
//! fragment stripped. Parsing goes through the `url` crate, which also
//! normalizes scheme/host case, default ports, and path escapes.

use url::Url;

/// Canonicalize an absolute URL and strip its fragment.
///
/// Returns `None` when the input does not parse as an absolute URL.
pub fn canonicalize(raw: &str) -> Option<String> {
    let mut parsed = Url::parse(raw).ok()?;
    parsed.set_fragment(None);
    Some(parsed.into())
}

/// Canonicalize, falling back to the raw string when parsing fails.
///
/// Map keys are built with this so a malformed stored URL and a
/// malformed lookup can still match each other.
pub fn canonical_or_raw(raw: &str) -> String {
    canonicalize(raw).unwrap_or_else(|| raw.to_string())
}

/// Resolve a possibly-relative reference (e.g. a `Location` header
/// value) against a base URL, returning the canonical absolute URL.
pub fn resolve_relative(base: &str, reference: &str) -> Option<String> {
    let mut resolved = Url::parse(base).ok()?.join(reference).ok()?;
    resolved.set_fragment(None);
    Some(resolved.into())
}

/// Extract the host of an absolute URL.
pub fn host_of(raw: &str) -> Option<String> {
    Url::parse(raw)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_strips_fragment() {
        assert_eq!(
            canonicalize("http://example.com/a?q=1#frag").as_deref(),
            Some("http://example.com/a?q=1")
        );
    }

    #[test]
    fn test_canonicalize_normalizes_authority() {
        assert_eq!(
            canonicalize("HTTP://Example.COM:80/a").as_deref(),
            Some("http://example.com/a")
        );
    }

    #[test]
    fn test_canonicalize_rejects_relative() {
        assert_eq!(canonicalize("/just/a/path"), None);
        assert_eq!(canonicalize("not a url"), None);
    }

    #[test]
    fn test_canonical_or_raw_falls_back() {
        assert_eq!(canonical_or_raw("%%garbage%%"), "%%garbage%%");
        assert_eq!(
            canonical_or_raw("http://example.com/#x"),
            "http://example.com/"
        );
    }

    #[test]
    fn test_resolve_relative() {
        assert_eq!(
            resolve_relative("http://example.com/a/b", "../c").as_deref(),
            Some("http://example.com/c")
        );
        assert_eq!(
            resolve_relative("http://example.com/a", "http://other.com/x#y").as_deref(),
            Some("http://other.com/x")
        );
        assert_eq!(resolve_relative("no base", "/x"), None);
    }

    #[test]
    fn test_host_of() {
        assert_eq!(
            host_of("https://www.example.com/path").as_deref(),
            Some("www.example.com")
        );
        assert_eq!(host_of("garbage"), None);
    }
}
