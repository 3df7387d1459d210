// URL classification - single item vs. collection
//
// Pure string inspection, no network. Single-item markers take precedence
// over collection markers, and anything unrecognized is a collection.

use regex::Regex;
use tracing::debug;

use super::models::{CollectionId, UrlKind};

lazy_static::lazy_static! {
    static ref SINGLE_RE: Regex = Regex::new(r"(watch\?(?:[^#]*&)?v=|youtu\.be/)").unwrap();
    static ref COLLECTION_RE: Regex =
        Regex::new(r"(/channel/|[?&]list=|/playlist|/c/|/user/|/@)").unwrap();
    static ref CHANNEL_ID_RE: Regex = Regex::new(r"/channel/([^/?#&]+)").unwrap();
    static ref HANDLE_RE: Regex = Regex::new(r"/(@[^/?#&]+)").unwrap();
}

/// Decide whether `url` denotes a single item or a collection
pub fn classify(url: &str) -> UrlKind {
    if SINGLE_RE.is_match(url) {
        return UrlKind::Single;
    }
    if !has_collection_marker(url) {
        debug!("[Classifier] No marker in {}, treating as collection", url);
    }
    UrlKind::Collection
}

/// Whether the URL carries an explicit collection marker at all
pub fn has_collection_marker(url: &str) -> bool {
    COLLECTION_RE.is_match(url)
}

/// Pull the explicit `/channel/<id>` segment, if any
pub fn extract_collection_id(url: &str) -> Option<CollectionId> {
    CHANNEL_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Pull the `/@handle` alias segment, including the `@`, percent-decoded
pub fn extract_handle(url: &str) -> Option<String> {
    let raw = HANDLE_RE.captures(url)?.get(1)?.as_str();
    match urlencoding::decode(raw) {
        Ok(decoded) => Some(decoded.into_owned()),
        Err(_) => Some(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_markers() {
        for url in [
            "https://www.youtube.com/watch?v=abc123",
            "https://youtu.be/abc123",
            "https://www.youtube.com/watch?feature=share&v=abc123",
            "https://example.com/watch?v=abc123",
        ] {
            assert_eq!(classify(url), UrlKind::Single, "{}", url);
        }
    }

    #[test]
    fn test_collection_markers() {
        for url in [
            "https://www.youtube.com/channel/UCVjlpEjEY9GpksqbEesJnNA",
            "https://www.youtube.com/playlist?list=PL123",
            "https://www.youtube.com/@muni_gurume",
            "https://www.youtube.com/c/SomeName",
            "https://www.youtube.com/user/legacy",
        ] {
            assert_eq!(classify(url), UrlKind::Collection, "{}", url);
        }
    }

    #[test]
    fn test_single_marker_wins() {
        let url = "https://www.youtube.com/watch?v=abc123&list=PL123";
        assert!(has_collection_marker(url));
        assert_eq!(classify(url), UrlKind::Single);
    }

    #[test]
    fn test_unrecognized_defaults_to_collection() {
        assert_eq!(classify("https://example.org/something"), UrlKind::Collection);
        assert!(!has_collection_marker("https://example.org/something"));
    }

    #[test]
    fn test_extract_collection_id() {
        assert_eq!(
            extract_collection_id("https://www.youtube.com/channel/XYZ/videos"),
            Some("XYZ".to_string())
        );
        assert_eq!(
            extract_collection_id("https://www.youtube.com/channel/XYZ?view=0"),
            Some("XYZ".to_string())
        );
        assert_eq!(extract_collection_id("https://www.youtube.com/@Hasida"), None);
    }

    #[test]
    fn test_extract_handle() {
        assert_eq!(
            extract_handle("https://www.youtube.com/@Hasida/videos"),
            Some("@Hasida".to_string())
        );
        assert_eq!(extract_handle("https://www.youtube.com/channel/XYZ"), None);
    }

    #[test]
    fn test_extract_handle_decodes_percent_escapes() {
        assert_eq!(
            extract_handle(
                "https://www.youtube.com/@%E9%81%A0%E8%97%A4%E3%82%8A%E3%82%87%E3%81%86-m9s/videos"
            ),
            Some("@遠藤りょう-m9s".to_string())
        );
        // Invalid UTF-8 after decoding keeps the raw segment
        assert_eq!(
            extract_handle("https://www.youtube.com/@%FFbad"),
            Some("@%FFbad".to_string())
        );
    }
}
