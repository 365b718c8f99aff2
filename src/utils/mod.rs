//! Common utilities and helper functions
//!
//! Small text and IRI helpers shared by the graph and migration modules.

use url::Url;

/// Truncate text to at most `max_len` characters, marking the cut with `...`
///
/// Lengths are counted in characters, so multi-byte labels are never split
/// inside a code point.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

/// Whether `text` is a syntactically valid absolute URL with a host
pub fn is_valid_url(text: &str) -> bool {
    if text.is_empty() || text.contains(char::is_whitespace) {
        return false;
    }

    match Url::parse(text) {
        Ok(url) => url.has_host(),
        Err(_) => false,
    }
}

/// Final path or fragment segment of an IRI
///
/// `http://schema.org/hasPart` -> `hasPart`, `http://x.org/ont#Thing` -> `Thing`.
pub fn local_name(iri: &str) -> &str {
    let trimmed = iri.trim_end_matches(['/', '#']);
    match trimmed.rfind(['/', '#']) {
        Some(pos) => &trimmed[pos + 1..],
        None => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("very long text here", 10), "very lo...");
    }

    #[test]
    fn test_truncate_text_counts_chars() {
        let text = "가".repeat(12);
        let truncated = truncate_text(&text, 10);
        assert_eq!(truncated.chars().count(), 10);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("http://example.org"));
        assert!(is_valid_url("https://github.com/OPEN-NEXT/LOSH"));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url("example.org"));
        assert!(!is_valid_url(""));
        assert!(!is_valid_url("urn:isbn:0451450523"));
        assert!(!is_valid_url(" http://example.org "));
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name("http://schema.org/hasPart"), "hasPart");
        assert_eq!(local_name("http://example.org/ont#Thing"), "Thing");
        assert_eq!(local_name("http://example.org/ont/"), "ont");
        assert_eq!(local_name("plain"), "plain");
    }
}
