// Backend traits - the three external collaborators behind each strategy

use async_trait::async_trait;
use std::path::Path;

use super::errors::AcquisitionError;
use super::models::{ApiItem, CollectionId, SingleItemInfo, VersionTag};

/// Query for the most recent items of one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub collection_id: CollectionId,
    pub max_results: u32,
    /// Cached tag sent as a "fetch only if changed" precondition
    pub if_none_match: Option<VersionTag>,
}

/// What the search API answered
#[derive(Debug, Clone)]
pub enum SearchResponse {
    NotModified,
    Listing {
        version_tag: Option<VersionTag>,
        items: Vec<ApiItem>,
    },
}

/// Remote paginated search API
#[async_trait]
pub trait SearchApi: Send + Sync {
    /// Name of the backend (for logging)
    fn name(&self) -> &'static str;

    /// Check if this backend can be used at all
    fn is_available(&self) -> bool;

    /// One request, no retry
    async fn search_recent(&self, request: &SearchRequest) -> Result<SearchResponse, AcquisitionError>;

    /// Look up the collection id behind an `@handle`
    async fn resolve_handle(&self, handle: &str) -> Result<Option<CollectionId>, AcquisitionError>;
}

/// Single-item metadata library
#[async_trait]
pub trait SingleItemSource: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_available(&self) -> bool;

    async fn fetch(&self, url: &str) -> Result<SingleItemInfo, AcquisitionError>;
}

/// Metadata scraping subprocess
///
/// Leaves one `.info.json` file per processed item in `working_dir`; nothing
/// else of its output is consumed.
#[async_trait]
pub trait ScrapeRunner: Send + Sync {
    fn name(&self) -> &'static str;

    fn is_available(&self) -> bool;

    async fn scrape(&self, url: &str, working_dir: &Path) -> Result<(), AcquisitionError>;
}
