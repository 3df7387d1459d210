// Orchestrator with tiered fallback
//
// Per URL: classify, run the cheapest strategy that applies, and queue the
// URL for the scraper when that strategy fails. Scraped results are read back
// from disk in a sweep after every URL has been handled.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use super::cache::VersionTagCache;
use super::classifier::{classify, extract_collection_id, extract_handle};
use super::config::{AcquisitionConfig, HandleResolution};
use super::errors::AcquisitionError;
use super::input::InputLink;
use super::models::{AcquisitionOutcome, CollectionId, Disposition, Record, RunReport, UrlKind};
use super::proxy::selector_for;
use super::strategies::{
    GenericScrapeStrategy, SingleItemStrategy, StructuredApiStrategy, YouTubeDataApi,
    YtDlpInfoSource, YtDlpScraper,
};
use super::tools::YtDlpCommand;
use super::traits::{ScrapeRunner, SearchApi, SingleItemSource};

/// Which strategies may be dispatched to, resolved once at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub structured_api: bool,
    pub single_item: bool,
    pub generic_scrape: bool,
}

pub struct Orchestrator {
    config: AcquisitionConfig,
    capabilities: Capabilities,
    api: StructuredApiStrategy,
    single: SingleItemStrategy,
    scrape: GenericScrapeStrategy,
}

impl Orchestrator {
    pub fn new(
        config: &AcquisitionConfig,
        api: Box<dyn SearchApi>,
        single: Box<dyn SingleItemSource>,
        scraper: Box<dyn ScrapeRunner>,
    ) -> Self {
        let api = StructuredApiStrategy::new(api, config.max_results);
        let single = SingleItemStrategy::new(single);
        let scrape = GenericScrapeStrategy::new(scraper, config.output_dir.clone());

        let capabilities = Capabilities {
            structured_api: config.api_enabled() && api.is_available(),
            single_item: single.is_available(),
            generic_scrape: scrape.is_available(),
        };
        info!("[Orchestrator] Capabilities: {:?}", capabilities);

        if config.use_api && !capabilities.structured_api {
            warn!("[Orchestrator] API use requested but the API backend is unavailable (missing key?)");
        }

        Self {
            config: config.clone(),
            capabilities,
            api,
            single,
            scrape,
        }
    }

    /// Wire the production backends: YouTube Data API and yt-dlp
    pub fn from_config(config: &AcquisitionConfig) -> Self {
        let proxy = selector_for(&config.proxies);
        let ytdlp = YtDlpCommand::detect(config.python_override.as_deref());
        match &ytdlp {
            Some(cmd) => info!("[Orchestrator] yt-dlp via {}", cmd.tool_type.as_str()),
            None => warn!("[Orchestrator] yt-dlp not found; single-item and scrape disabled"),
        }

        Self::new(
            config,
            Box::new(YouTubeDataApi::new(config, proxy.clone())),
            Box::new(YtDlpInfoSource::new(
                ytdlp.clone(),
                config.single_item_timeout_seconds,
            )),
            Box::new(YtDlpScraper::new(ytdlp, proxy)),
        )
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Process every URL in order, then scrape the deferred ones, persist the
    /// version tags and sweep scraped files.
    pub async fn run(&self, urls: &[String]) -> Result<RunReport, AcquisitionError> {
        let links: Vec<InputLink> = urls.iter().cloned().map(InputLink::from).collect();
        self.run_links(&links).await
    }

    /// Same as [`Orchestrator::run`], with input labels carried into the logs
    pub async fn run_links(&self, links: &[InputLink]) -> Result<RunReport, AcquisitionError> {
        if links.is_empty() {
            return Err(AcquisitionError::NoInput("input list is empty".to_string()));
        }

        let mut cache = VersionTagCache::load(&self.config.cache_path);
        let mut report = RunReport::default();
        let mut deferred: Vec<&str> = Vec::new();
        let mut queued: HashSet<&str> = HashSet::new();

        for link in links {
            let url = link.url.as_str();
            info!("[Orchestrator] Processing link: {}", link);
            let disposition = self.process_url(url, &mut cache, &mut report.records).await;
            debug!("[Orchestrator] {} -> {:?}", link, disposition);

            // Repeated URLs are scraped once
            if disposition == Disposition::Deferred && queued.insert(url) {
                deferred.push(url);
            }
            report.dispositions.push((link.url.clone(), disposition));
        }

        if !deferred.is_empty() {
            if self.capabilities.generic_scrape {
                for url in &deferred {
                    self.scrape.scrape(url).await;
                }
            } else {
                warn!(
                    "[Orchestrator] Scraper unavailable; {} deferred URLs produce no records",
                    deferred.len()
                );
            }
        }

        if let Err(e) = cache.save() {
            warn!(
                "[Orchestrator] Could not save version tags to {}: {}",
                cache.path().display(),
                e
            );
        }

        if self.config.collect_scraped {
            let sweep = self.scrape.sweep();
            report.scraped_files = sweep.files;
            report.malformed_files = sweep.malformed;
            report.records.extend(sweep.records);
        }

        info!(
            "[Orchestrator] Done: {} recorded, {} skipped, {} deferred, {} records total",
            report.recorded(),
            report.skipped(),
            report.deferred(),
            report.records.len()
        );
        Ok(report)
    }

    async fn process_url(
        &self,
        url: &str,
        cache: &mut VersionTagCache,
        records: &mut Vec<Record>,
    ) -> Disposition {
        match classify(url) {
            UrlKind::Single => self.process_single(url, records).await,
            UrlKind::Collection => self.process_collection(url, cache, records).await,
        }
    }

    async fn process_single(&self, url: &str, records: &mut Vec<Record>) -> Disposition {
        if !self.capabilities.single_item {
            debug!("[Orchestrator] Single-item backend unavailable, deferring {}", url);
            return Disposition::Deferred;
        }

        match self.single.fetch_single(url).await {
            Some(record) => {
                records.push(record);
                Disposition::Recorded(1)
            }
            None => Disposition::Deferred,
        }
    }

    async fn process_collection(
        &self,
        url: &str,
        cache: &mut VersionTagCache,
        records: &mut Vec<Record>,
    ) -> Disposition {
        if !self.capabilities.structured_api {
            return Disposition::Deferred;
        }

        let Some(collection_id) = self.collection_id_for(url).await else {
            debug!("[Orchestrator] No collection id in {}, deferring", url);
            return Disposition::Deferred;
        };

        match self.api.fetch_collection(&collection_id, cache).await {
            AcquisitionOutcome::Fetched(fetched) => {
                let count = fetched.len();
                records.extend(fetched);
                Disposition::Recorded(count)
            }
            AcquisitionOutcome::Unchanged => Disposition::Skipped,
            AcquisitionOutcome::Failed => Disposition::Deferred,
        }
    }

    async fn collection_id_for(&self, url: &str) -> Option<CollectionId> {
        if let Some(id) = extract_collection_id(url) {
            return Some(id);
        }

        match (self.config.handle_resolution, extract_handle(url)) {
            (HandleResolution::ResolveViaApi, Some(handle)) => self.api.resolve_handle(&handle).await,
            _ => None,
        }
    }
}
