// Generic-scrape strategy - yt-dlp writes `.info.json` files, a later sweep reads them
//
// The subprocess is the only backend that does not hand structured data back
// to the caller, so its results are collected from disk after the main pass.

use async_trait::async_trait;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::acquisition::errors::AcquisitionError;
use crate::acquisition::models::Record;
use crate::acquisition::normalizer::{normalize, RawItem};
use crate::acquisition::proxy::ProxySelector;
use crate::acquisition::tools::YtDlpCommand;
use crate::acquisition::traits::ScrapeRunner;
use crate::acquisition::utils::{last_line, run_output};

pub const INFO_JSON_SUFFIX: &str = ".info.json";

pub struct GenericScrapeStrategy {
    runner: Box<dyn ScrapeRunner>,
    working_dir: PathBuf,
}

/// What a sweep of the working directory produced
#[derive(Debug, Default)]
pub struct SweepResult {
    pub records: Vec<Record>,
    pub files: usize,
    pub malformed: usize,
}

impl GenericScrapeStrategy {
    pub fn new(runner: Box<dyn ScrapeRunner>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            working_dir: working_dir.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.runner.is_available()
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Run the scraper against one URL. Failures are logged, never returned.
    pub async fn scrape(&self, url: &str) {
        if let Err(e) = fs::create_dir_all(&self.working_dir) {
            warn!(
                "[Scrape] Cannot create {}: {}",
                self.working_dir.display(),
                e
            );
            return;
        }

        info!("[Scrape] {} -> {}", url, self.working_dir.display());
        match self.runner.scrape(url, &self.working_dir).await {
            Ok(()) => debug!("[Scrape] {} finished for {}", self.runner.name(), url),
            Err(e) => warn!("[Scrape] {} reported failure for {}: {}", self.runner.name(), url, e),
        }
    }

    pub fn sweep(&self) -> SweepResult {
        sweep_dir(&self.working_dir)
    }
}

/// Collect every `.info.json` in `dir`, in file-name order
pub fn sweep_dir(dir: &Path) -> SweepResult {
    let mut result = SweepResult::default();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("[Sweep] Nothing to sweep in {}: {}", dir.display(), e);
            return result;
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |n| n.ends_with(INFO_JSON_SUFFIX))
        })
        .collect();
    paths.sort();

    for path in paths {
        result.files += 1;

        let md = match fs::read_to_string(&path)
            .map_err(AcquisitionError::from)
            .and_then(|raw| serde_json::from_str::<Value>(&raw).map_err(AcquisitionError::from))
        {
            Ok(md) if md.is_object() => md,
            Ok(_) => {
                warn!("[Sweep] Skipping non-object {}", path.display());
                result.malformed += 1;
                continue;
            }
            Err(e) => {
                warn!("[Sweep] Skipping malformed {}: {}", path.display(), e);
                result.malformed += 1;
                continue;
            }
        };

        // collection-level summary written next to its entries
        if md["_type"].as_str() == Some("playlist") {
            debug!("[Sweep] Skipping collection summary {}", path.display());
            continue;
        }

        let record = normalize(RawItem::Scraped(&md));
        if record.has_item_id() {
            result.records.push(record);
        } else {
            warn!("[Sweep] {} has no video id", path.display());
        }
    }

    info!(
        "[Sweep] {} files, {} records, {} malformed",
        result.files,
        result.records.len(),
        result.malformed
    );
    result
}

/// yt-dlp in metadata-only mode
pub struct YtDlpScraper {
    command: Option<YtDlpCommand>,
    proxy: Arc<dyn ProxySelector>,
}

impl YtDlpScraper {
    pub fn new(command: Option<YtDlpCommand>, proxy: Arc<dyn ProxySelector>) -> Self {
        Self { command, proxy }
    }

    fn build_args(url: &str, working_dir: &Path, proxy: Option<String>) -> Vec<String> {
        let mut args = vec![
            "--skip-download".to_string(),
            "--write-info-json".to_string(),
            "--ignore-errors".to_string(),
            "--no-warnings".to_string(),
            "--output".to_string(),
            format!("{}/%(title)s [%(id)s].%(ext)s", working_dir.display()),
        ];

        if let Some(proxy) = proxy {
            args.push("--proxy".to_string());
            args.push(proxy);
        }

        args.push(url.to_string());
        args
    }
}

#[async_trait]
impl ScrapeRunner for YtDlpScraper {
    fn name(&self) -> &'static str {
        "yt-dlp-info-json"
    }

    fn is_available(&self) -> bool {
        self.command.is_some()
    }

    async fn scrape(&self, url: &str, working_dir: &Path) -> Result<(), AcquisitionError> {
        let command = self
            .command
            .as_ref()
            .ok_or_else(|| AcquisitionError::ToolNotFound("yt-dlp".to_string()))?;

        let proxy = self.proxy.select();
        let proxied = proxy.is_some();
        let args = command.args(Self::build_args(url, working_dir, proxy));
        debug!("[Scrape] Running: {} {}", command.program(), args.join(" "));

        // No timeout: a hung yt-dlp hangs the run
        let output = run_output(command.program(), args, None)
            .await
            .map_err(AcquisitionError::Execution)?;

        if !output.status.success() {
            let error = AcquisitionError::from(String::from_utf8_lossy(&output.stderr).to_string());
            warn!(
                "[Scrape] yt-dlp exited with {}: {}{}",
                output.status,
                last_line(&output.stderr),
                error
                    .blocking_hint(proxied)
                    .map(|hint| format!(" ({})", hint))
                    .unwrap_or_default()
            );
            return Err(error);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::models::StrategyOrigin;
    use crate::acquisition::proxy::FixedProxy;
    use serde_json::json;

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_sweep_skips_malformed_and_summaries() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "B video [b1].info.json",
            &json!({"id": "b1", "title": "B", "view_count": 7}).to_string(),
        );
        write(
            dir.path(),
            "A video [a1].info.json",
            &json!({"id": "a1", "title": "A", "description": "x".repeat(250)}).to_string(),
        );
        write(dir.path(), "Broken [zz].info.json", "{ truncated");
        write(dir.path(), "Scalar [yy].info.json", "42");
        write(
            dir.path(),
            "Channel [UC1].info.json",
            &json!({"_type": "playlist", "id": "UC1", "title": "Channel"}).to_string(),
        );
        write(dir.path(), "No id [nn].info.json", &json!({"title": "orphan"}).to_string());
        write(dir.path(), "notes.txt", "ignored");

        let result = sweep_dir(dir.path());

        assert_eq!(result.files, 6);
        assert_eq!(result.malformed, 2);
        let ids: Vec<&str> = result.records.iter().map(|r| r.item_id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "b1"]);
        assert!(result
            .records
            .iter()
            .all(|r| r.strategy_origin == StrategyOrigin::GenericScrape));
        assert_eq!(result.records[0].description.chars().count(), 200);
    }

    #[test]
    fn test_sweep_missing_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let result = sweep_dir(&dir.path().join("absent"));
        assert_eq!(result.files, 0);
        assert!(result.records.is_empty());
    }

    #[test]
    fn test_scrape_args() {
        let args = YtDlpScraper::build_args(
            "https://www.youtube.com/channel/XYZ",
            Path::new("data/output"),
            FixedProxy("socks5h://127.0.0.1:1080".to_string()).select(),
        );

        for flag in ["--skip-download", "--write-info-json", "--ignore-errors"] {
            assert!(args.iter().any(|a| a == flag), "missing {}", flag);
        }
        assert!(args.contains(&"data/output/%(title)s [%(id)s].%(ext)s".to_string()));
        let proxy_at = args.iter().position(|a| a == "--proxy").unwrap();
        assert_eq!(args[proxy_at + 1], "socks5h://127.0.0.1:1080");
        assert_eq!(args.last().unwrap(), "https://www.youtube.com/channel/XYZ");
    }
}
