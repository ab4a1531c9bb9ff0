//! Article source links.
//!
//! Editors type sources as free text, one per line or comma-separated. The stored field keeps
//! that raw form; links are derived on render.

/// Split the raw `sources` field into individual entries.
///
/// Entries are separated by commas or newlines, trimmed, and blank entries are dropped.
pub fn parse_sources(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Prefix `http://` unless the URL already names an HTTP(S) scheme.
pub fn ensure_protocol(url: &str) -> String {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url.to_owned()
    } else {
        format!("http://{url}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sources_splits_on_commas_and_newlines() {
        let raw = "https://a.example, b.example\n\n  https://c.example/path  ,\r\n,";
        assert_eq!(
            parse_sources(raw),
            vec!["https://a.example", "b.example", "https://c.example/path"]
        );
    }

    #[test]
    fn test_parse_sources_empty() {
        assert!(parse_sources("").is_empty());
        assert!(parse_sources(" ,\n, ").is_empty());
    }

    #[test]
    fn test_ensure_protocol() {
        assert_eq!(ensure_protocol("example.com"), "http://example.com");
        assert_eq!(ensure_protocol("http://example.com"), "http://example.com");
        assert_eq!(ensure_protocol("HTTPS://Example.com"), "HTTPS://Example.com");
        assert_eq!(ensure_protocol("ftp://x"), "http://ftp://x");
        assert_eq!(ensure_protocol("ab"), "http://ab");
    }

    #[test]
    fn test_ensure_protocol_handles_multibyte_prefix() {
        assert_eq!(ensure_protocol("пример.рф"), "http://пример.рф");
    }
}
