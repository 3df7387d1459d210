// Run configuration, built once at startup and passed by reference

use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// What to do with `/@handle` collection URLs when the API is in use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleResolution {
    /// Handles cannot yield a collection id; the URL goes to the scraper
    #[default]
    Fallback,
    /// Spend one extra API call to look the handle up
    ResolveViaApi,
}

/// Configuration for one acquisition run
#[derive(Debug, Clone)]
pub struct AcquisitionConfig {
    /// Use the structured search API for collection URLs
    pub use_api: bool,
    /// API keys; only the first one is used
    pub api_keys: Vec<String>,
    pub api_base_url: String,
    /// Most recent items requested per collection
    pub max_results: u32,
    /// Version-tag cache file
    pub cache_path: PathBuf,
    /// Scrape working directory (`.info.json` files)
    pub output_dir: PathBuf,
    /// Sweep scraped files into the record set at the end of the run
    pub collect_scraped: bool,
    pub handle_resolution: HandleResolution,
    /// Timeout for the single-item fast path
    pub single_item_timeout_seconds: u32,
    /// Python interpreter used to run the yt_dlp module
    pub python_override: Option<String>,
    /// Proxy pool; one is picked per call
    pub proxies: Vec<String>,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            use_api: false,
            api_keys: Vec::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            max_results: 10,
            cache_path: PathBuf::from("data/channel_etags.json"),
            output_dir: PathBuf::from("data/output"),
            collect_scraped: false,
            handle_resolution: HandleResolution::Fallback,
            single_item_timeout_seconds: 30,
            python_override: None,
            proxies: Vec::new(),
        }
    }
}

impl AcquisitionConfig {
    pub fn with_api(mut self, enabled: bool) -> Self {
        self.use_api = enabled;
        self
    }

    /// Accepts a comma-separated key list
    pub fn with_api_keys(mut self, raw: &str) -> Self {
        self.api_keys = split_list(raw);
        self
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_max_results(mut self, max: u32) -> Self {
        self.max_results = max;
        self
    }

    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = path.into();
        self
    }

    pub fn with_output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = path.into();
        self
    }

    pub fn with_collect_scraped(mut self, enabled: bool) -> Self {
        self.collect_scraped = enabled;
        self
    }

    pub fn with_handle_resolution(mut self, mode: HandleResolution) -> Self {
        self.handle_resolution = mode;
        self
    }

    pub fn with_single_item_timeout(mut self, seconds: u32) -> Self {
        self.single_item_timeout_seconds = seconds;
        self
    }

    pub fn with_python(mut self, python: Option<String>) -> Self {
        self.python_override = python;
        self
    }

    pub fn with_proxies(mut self, proxies: Vec<String>) -> Self {
        self.proxies = proxies
            .iter()
            .flat_map(|p| split_list(p))
            .collect();
        self
    }

    /// The key actually sent to the API
    pub fn api_key(&self) -> Option<&str> {
        self.api_keys.first().map(String::as_str)
    }

    /// API use requested and a key is present
    pub fn api_enabled(&self) -> bool {
        self.use_api && self.api_key().is_some()
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
