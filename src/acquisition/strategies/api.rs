// Structured-API strategy - YouTube Data API search with ETag change detection
//
// One conditional request per collection. A 304 means the cached tag is
// still current and nothing is fetched; a fresh listing replaces the tag.

use async_trait::async_trait;
use reqwest::header::{ETAG, IF_NONE_MATCH};
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::acquisition::cache::VersionTagCache;
use crate::acquisition::config::AcquisitionConfig;
use crate::acquisition::errors::AcquisitionError;
use crate::acquisition::models::{AcquisitionOutcome, ApiItem, CollectionId, Record};
use crate::acquisition::normalizer::{normalize, RawItem};
use crate::acquisition::proxy::ProxySelector;
use crate::acquisition::traits::{SearchApi, SearchRequest, SearchResponse};

const VIDEO_KIND: &str = "youtube#video";

pub struct StructuredApiStrategy {
    api: Box<dyn SearchApi>,
    max_results: u32,
}

impl StructuredApiStrategy {
    pub fn new(api: Box<dyn SearchApi>, max_results: u32) -> Self {
        Self { api, max_results }
    }

    pub fn is_available(&self) -> bool {
        self.api.is_available()
    }

    /// Fetch the newest items of `collection_id`, honoring the cached tag
    pub async fn fetch_collection(
        &self,
        collection_id: &str,
        cache: &mut VersionTagCache,
    ) -> AcquisitionOutcome {
        let request = SearchRequest {
            collection_id: collection_id.to_string(),
            max_results: self.max_results,
            if_none_match: cache.get(collection_id).cloned(),
        };

        debug!(
            "[ApiStrategy] {} search for {} (cached tag: {:?})",
            self.api.name(),
            collection_id,
            request.if_none_match
        );

        match self.api.search_recent(&request).await {
            Ok(SearchResponse::NotModified) => {
                info!("[ApiStrategy] Channel {}: tag unchanged, no new data", collection_id);
                AcquisitionOutcome::Unchanged
            }
            Ok(SearchResponse::Listing { version_tag, items }) => {
                match version_tag {
                    Some(tag) => cache.put(collection_id, tag),
                    None => warn!("[ApiStrategy] Channel {}: response carried no ETag", collection_id),
                }

                let total = items.len();
                let records = listing_records(&items);
                if records.len() < total {
                    debug!(
                        "[ApiStrategy] Dropped {} items without a video id",
                        total - records.len()
                    );
                }

                if records.is_empty() {
                    info!("[ApiStrategy] Channel {}: listing has no videos", collection_id);
                    AcquisitionOutcome::Unchanged
                } else {
                    info!(
                        "[ApiStrategy] Channel {}: {} recent videos",
                        collection_id,
                        records.len()
                    );
                    AcquisitionOutcome::Fetched(records)
                }
            }
            Err(e) => {
                if e.is_quota_or_auth() {
                    warn!("[ApiStrategy] Quota or credential failure for {}: {}", collection_id, e);
                } else {
                    warn!("[ApiStrategy] Search failed for {}: {}", collection_id, e);
                }
                AcquisitionOutcome::Failed
            }
        }
    }

    /// Translate an `@handle` into a collection id, one extra API call
    pub async fn resolve_handle(&self, handle: &str) -> Option<CollectionId> {
        match self.api.resolve_handle(handle).await {
            Ok(Some(id)) => {
                info!("[ApiStrategy] Resolved {} -> {}", handle, id);
                Some(id)
            }
            Ok(None) => {
                warn!("[ApiStrategy] Handle {} did not resolve", handle);
                None
            }
            Err(e) => {
                warn!("[ApiStrategy] Handle lookup for {} failed: {}", handle, e);
                None
            }
        }
    }
}

/// Video entries in API order; entries without a video id are dropped
fn listing_records(items: &[ApiItem]) -> Vec<Record> {
    items
        .iter()
        .filter(|it| it.id.kind.is_empty() || it.id.kind == VIDEO_KIND)
        .map(|it| normalize(RawItem::Api(it)))
        .filter(Record::has_item_id)
        .collect()
}

/// HTTP client for the YouTube Data API v3
pub struct YouTubeDataApi {
    base_url: String,
    api_key: Option<String>,
    proxy: Arc<dyn ProxySelector>,
}

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    etag: Option<String>,
    #[serde(default)]
    items: Vec<ApiItem>,
}

#[derive(Debug, Deserialize)]
struct ChannelListResponse {
    #[serde(default)]
    items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    reason: Option<String>,
}

impl YouTubeDataApi {
    pub fn new(config: &AcquisitionConfig, proxy: Arc<dyn ProxySelector>) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key().map(str::to_string),
            proxy,
        }
    }

    /// Client for one call, routed through the selected proxy
    fn client(&self) -> Result<reqwest::Client, AcquisitionError> {
        let builder = reqwest::Client::builder();
        let builder = match self.proxy.select() {
            Some(proxy_url) => {
                debug!("[YouTubeDataApi] Using proxy {}", proxy_url);
                builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?)
            }
            None => builder.no_proxy(),
        };
        Ok(builder.build()?)
    }

    fn key(&self) -> Result<&str, AcquisitionError> {
        self.api_key.as_deref().ok_or_else(|| AcquisitionError::Api {
            status: 401,
            reason: Some("keyMissing".to_string()),
            message: "No API key configured".to_string(),
        })
    }

    async fn error_from(response: reqwest::Response) -> AcquisitionError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();

        match serde_json::from_str::<ErrorEnvelope>(&text) {
            Ok(envelope) => AcquisitionError::Api {
                status,
                reason: envelope.error.errors.into_iter().find_map(|d| d.reason),
                message: envelope.error.message.unwrap_or_default(),
            },
            Err(_) => AcquisitionError::Api {
                status,
                reason: None,
                message: text.chars().take(200).collect(),
            },
        }
    }
}

#[async_trait]
impl SearchApi for YouTubeDataApi {
    fn name(&self) -> &'static str {
        "youtube-data-api"
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn search_recent(&self, request: &SearchRequest) -> Result<SearchResponse, AcquisitionError> {
        let max_results = request.max_results.to_string();
        let mut call = self
            .client()?
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("part", "snippet"),
                ("channelId", request.collection_id.as_str()),
                ("maxResults", max_results.as_str()),
                ("order", "date"),
                ("type", "video"),
                ("key", self.key()?),
            ]);
        if let Some(tag) = &request.if_none_match {
            call = call.header(IF_NONE_MATCH, tag.as_str());
        }

        let response = call.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_MODIFIED {
            return Ok(SearchResponse::NotModified);
        }
        if !status.is_success() {
            return Err(Self::error_from(response).await);
        }

        let header_tag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = response.text().await?;
        let body: SearchListResponse = serde_json::from_str(&text)
            .map_err(|e| AcquisitionError::Parse(format!("Invalid search response: {}", e)))?;

        Ok(SearchResponse::Listing {
            version_tag: header_tag.or(body.etag),
            items: body.items,
        })
    }

    async fn resolve_handle(&self, handle: &str) -> Result<Option<CollectionId>, AcquisitionError> {
        let response = self
            .client()?
            .get(format!("{}/channels", self.base_url))
            .query(&[("part", "id"), ("forHandle", handle), ("key", self.key()?)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let text = response.text().await?;
        let body: ChannelListResponse = serde_json::from_str(&text)
            .map_err(|e| AcquisitionError::Parse(format!("Invalid channels response: {}", e)))?;

        Ok(body.items.into_iter().map(|c| c.id).find(|id| !id.is_empty()))
    }
}
