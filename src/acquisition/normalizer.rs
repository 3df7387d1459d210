// Record normalizer - one total adapter per strategy result shape

use serde_json::Value;
use time::Date;

use super::models::{ApiItem, Record, SingleItemInfo, StrategyOrigin, DESCRIPTION_MAX_CHARS};

/// A raw result tagged with the strategy that produced it
pub enum RawItem<'a> {
    Api(&'a ApiItem),
    Single { info: &'a SingleItemInfo, url: &'a str },
    Scraped(&'a Value),
}

/// Map any raw result into the canonical Record. Never fails; missing
/// fields become empty or absent.
pub fn normalize(raw: RawItem<'_>) -> Record {
    match raw {
        RawItem::Api(item) => from_api_item(item),
        RawItem::Single { info, url } => from_single_item(info, url),
        RawItem::Scraped(value) => from_scraped_file(value),
    }
}

pub fn from_api_item(item: &ApiItem) -> Record {
    let item_id = item.id.video_id.clone().unwrap_or_default();
    let snippet = &item.snippet;

    Record {
        source_url: watch_url(&item_id),
        item_id,
        title: snippet.title.clone().unwrap_or_default(),
        collection_id: snippet.channel_id.clone().unwrap_or_default(),
        collection_title: snippet.channel_title.clone().unwrap_or_default(),
        duration_seconds: None,
        view_count: None,
        like_count: None,
        published_at: snippet.published_at.clone(),
        description: truncate_description(snippet.description.as_deref().unwrap_or("")),
        strategy_origin: StrategyOrigin::StructuredApi,
    }
}

pub fn from_single_item(info: &SingleItemInfo, url: &str) -> Record {
    Record {
        item_id: info.video_id.clone().unwrap_or_default(),
        title: info.title.clone().unwrap_or_default(),
        collection_id: info.channel_id.clone().unwrap_or_default(),
        collection_title: info.author.clone().unwrap_or_default(),
        duration_seconds: info.length_seconds,
        view_count: info.views,
        like_count: info.likes,
        published_at: info.publish_date.as_deref().map(normalize_date),
        source_url: url.to_string(),
        description: truncate_description(info.description.as_deref().unwrap_or("")),
        strategy_origin: StrategyOrigin::SingleItem,
    }
}

/// Adapter for a yt-dlp `.info.json` document
pub fn from_scraped_file(md: &Value) -> Record {
    let item_id = text(md, "id").unwrap_or_default();
    let source_url = text(md, "webpage_url").unwrap_or_else(|| watch_url(&item_id));

    Record {
        title: text(md, "title").unwrap_or_default(),
        collection_id: text(md, "channel_id").unwrap_or_default(),
        collection_title: text(md, "channel")
            .or_else(|| text(md, "uploader"))
            .unwrap_or_default(),
        duration_seconds: coerce_count(&md["duration"]),
        view_count: coerce_count(&md["view_count"]),
        like_count: coerce_count(&md["like_count"]),
        published_at: text(md, "upload_date").map(|d| normalize_date(&d)),
        source_url,
        description: truncate_description(md["description"].as_str().unwrap_or("")),
        strategy_origin: StrategyOrigin::GenericScrape,
        item_id,
    }
}

/// Cut to at most `DESCRIPTION_MAX_CHARS` characters
pub fn truncate_description(text: &str) -> String {
    match text.char_indices().nth(DESCRIPTION_MAX_CHARS) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}

/// Integers, floats (rounded) and numeric strings become `u64`
pub fn coerce_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f.round() as u64)),
        Value::String(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',' && *c != '_').collect();
            cleaned.parse::<u64>().ok().or_else(|| {
                cleaned
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f.round() as u64)
            })
        }
        _ => None,
    }
}

/// `YYYYMMDD` becomes `YYYY-MM-DD`; anything else is kept as given
pub fn normalize_date(raw: &str) -> String {
    let trimmed = raw.trim();
    let Ok(compact) = time::format_description::parse("[year][month][day]") else {
        return trimmed.to_string();
    };
    match Date::parse(trimmed, &compact) {
        Ok(date) => date.to_string(),
        Err(_) => trimmed.to_string(),
    }
}

fn text(md: &Value, key: &str) -> Option<String> {
    match &md[key] {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn watch_url(item_id: &str) -> String {
    if item_id.is_empty() {
        String::new()
    } else {
        format!("https://www.youtube.com/watch?v={}", item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::models::{ApiItemId, ApiSnippet};
    use serde_json::json;

    #[test]
    fn test_truncation_boundary() {
        let short = "a".repeat(DESCRIPTION_MAX_CHARS - 1);
        assert_eq!(truncate_description(&short), short);

        let exact = "b".repeat(DESCRIPTION_MAX_CHARS);
        assert_eq!(truncate_description(&exact), exact);

        let long = "c".repeat(DESCRIPTION_MAX_CHARS + 57);
        assert_eq!(truncate_description(&long).chars().count(), DESCRIPTION_MAX_CHARS);
    }

    #[test]
    fn test_truncation_counts_characters() {
        let long = "グルメ".repeat(100);
        let cut = truncate_description(&long);
        assert_eq!(cut.chars().count(), DESCRIPTION_MAX_CHARS);
        assert!(long.starts_with(&cut));
    }

    #[test]
    fn test_coerce_count() {
        assert_eq!(coerce_count(&json!(1234)), Some(1234));
        assert_eq!(coerce_count(&json!(212.6)), Some(213));
        assert_eq!(coerce_count(&json!("98765")), Some(98765));
        assert_eq!(coerce_count(&json!("1,024")), Some(1024));
        assert_eq!(coerce_count(&json!(-4)), None);
        assert_eq!(coerce_count(&json!("n/a")), None);
        assert_eq!(coerce_count(&Value::Null), None);
    }

    #[test]
    fn test_normalize_date() {
        assert_eq!(normalize_date("20240115"), "2024-01-15");
        assert_eq!(normalize_date("2024-01-15T10:00:00Z"), "2024-01-15T10:00:00Z");
        assert_eq!(normalize_date("20241399"), "20241399");
    }

    #[test]
    fn test_api_item_shape() {
        let item = ApiItem {
            id: ApiItemId {
                kind: "youtube#video".to_string(),
                video_id: Some("vid1".to_string()),
            },
            snippet: ApiSnippet {
                title: Some("First".to_string()),
                description: Some("x".repeat(300)),
                published_at: Some("2024-03-01T00:00:00Z".to_string()),
                channel_id: Some("XYZ".to_string()),
                channel_title: Some("Channel".to_string()),
            },
        };

        let record = normalize(RawItem::Api(&item));
        assert_eq!(record.item_id, "vid1");
        assert_eq!(record.source_url, "https://www.youtube.com/watch?v=vid1");
        assert_eq!(record.description.len(), DESCRIPTION_MAX_CHARS);
        assert_eq!(record.strategy_origin, StrategyOrigin::StructuredApi);
        assert!(record.view_count.is_none());
    }

    #[test]
    fn test_single_item_shape() {
        let info = SingleItemInfo {
            video_id: Some("abc123".to_string()),
            title: Some("Ramen".to_string()),
            author: Some("muni".to_string()),
            views: Some(10),
            publish_date: Some("20230704".to_string()),
            ..Default::default()
        };
        let url = "https://example.com/watch?v=abc123";

        let record = normalize(RawItem::Single { info: &info, url });
        assert_eq!(record.item_id, "abc123");
        assert_eq!(record.collection_title, "muni");
        assert_eq!(record.published_at.as_deref(), Some("2023-07-04"));
        assert_eq!(record.source_url, url);
        assert_eq!(record.strategy_origin, StrategyOrigin::SingleItem);
    }

    #[test]
    fn test_scraped_shape_is_total() {
        let record = normalize(RawItem::Scraped(&json!({"unexpected": true})));
        assert!(!record.has_item_id());
        assert_eq!(record.strategy_origin, StrategyOrigin::GenericScrape);

        let md = json!({
            "id": "s1",
            "title": "Street food",
            "channel_id": "UC1",
            "uploader": "Uploader",
            "duration": 61.0,
            "view_count": "5000",
            "like_count": 40,
            "upload_date": "20240102",
            "description": null
        });
        let record = normalize(RawItem::Scraped(&md));
        assert_eq!(record.item_id, "s1");
        assert_eq!(record.collection_title, "Uploader");
        assert_eq!(record.duration_seconds, Some(61));
        assert_eq!(record.view_count, Some(5000));
        assert_eq!(record.published_at.as_deref(), Some("2024-01-02"));
        assert_eq!(record.source_url, "https://www.youtube.com/watch?v=s1");
        assert_eq!(record.description, "");
    }
}
