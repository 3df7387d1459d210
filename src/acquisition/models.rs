// Common data models for acquisition

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum description length kept in a Record, in characters
pub const DESCRIPTION_MAX_CHARS: usize = 200;

/// Opaque identifier of a channel-like collection, used as the cache key
pub type CollectionId = String;

/// Opaque change token (HTTP entity tag) returned by the search API
pub type VersionTag = String;

/// What an input URL points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UrlKind {
    Single,
    Collection,
}

/// Strategy that produced a Record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyOrigin {
    StructuredApi,
    SingleItem,
    GenericScrape,
}

impl StrategyOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StructuredApi => "StructuredApi",
            Self::SingleItem => "SingleItem",
            Self::GenericScrape => "GenericScrape",
        }
    }
}

impl fmt::Display for StrategyOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical normalized metadata for one item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub item_id: String,
    pub title: String,
    pub collection_id: String,
    pub collection_title: String,
    pub duration_seconds: Option<u64>,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    pub published_at: Option<String>,
    pub source_url: String,
    pub description: String,
    pub strategy_origin: StrategyOrigin,
}

impl Record {
    /// Records without an item id never reach the output set
    pub fn has_item_id(&self) -> bool {
        !self.item_id.trim().is_empty()
    }
}

/// Per-URL result of one strategy call
#[derive(Debug, Clone, PartialEq)]
pub enum AcquisitionOutcome {
    /// Non-empty, ordered as the backend returned them
    Fetched(Vec<Record>),
    /// Collection unchanged since the cached version tag
    Unchanged,
    /// No usable data; the caller falls back
    Failed,
}

/// Terminal state of an input URL within one run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Disposition {
    Recorded(usize),
    Skipped,
    Deferred,
}

/// One video entry of a search API listing
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiItem {
    #[serde(default)]
    pub id: ApiItemId,
    #[serde(default)]
    pub snippet: ApiSnippet,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiItemId {
    #[serde(default)]
    pub kind: String,
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSnippet {
    pub title: Option<String>,
    pub description: Option<String>,
    pub published_at: Option<String>,
    pub channel_id: Option<String>,
    pub channel_title: Option<String>,
}

/// Metadata returned by the single-item backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SingleItemInfo {
    pub video_id: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub channel_id: Option<String>,
    pub views: Option<u64>,
    pub likes: Option<u64>,
    pub length_seconds: Option<u64>,
    pub publish_date: Option<String>,
    pub description: Option<String>,
}

/// Summary of a finished run
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub records: Vec<Record>,
    pub dispositions: Vec<(String, Disposition)>,
    pub scraped_files: usize,
    pub malformed_files: usize,
}

impl RunReport {
    pub fn count(&self, wanted: fn(&Disposition) -> bool) -> usize {
        self.dispositions.iter().filter(|(_, d)| wanted(d)).count()
    }

    pub fn recorded(&self) -> usize {
        self.count(|d| matches!(d, Disposition::Recorded(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|d| matches!(d, Disposition::Skipped))
    }

    pub fn deferred(&self) -> usize {
        self.count(|d| matches!(d, Disposition::Deferred))
    }
}
