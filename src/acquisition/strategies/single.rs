// Single-item strategy - one yt-dlp `--dump-json` call per video URL
//
// The fast path for watch links. Any failure is reported as "absent" and the
// orchestrator queues the URL for the scraper instead.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::acquisition::errors::AcquisitionError;
use crate::acquisition::models::{Record, SingleItemInfo};
use crate::acquisition::normalizer::{coerce_count, normalize, RawItem};
use crate::acquisition::tools::YtDlpCommand;
use crate::acquisition::traits::SingleItemSource;
use crate::acquisition::utils::{last_line, run_output};

pub struct SingleItemStrategy {
    source: Box<dyn SingleItemSource>,
}

impl SingleItemStrategy {
    pub fn new(source: Box<dyn SingleItemSource>) -> Self {
        Self { source }
    }

    pub fn is_available(&self) -> bool {
        self.source.is_available()
    }

    /// Metadata for one URL, or `None` when the caller should fall back
    pub async fn fetch_single(&self, url: &str) -> Option<Record> {
        match self.source.fetch(url).await {
            Ok(info) => {
                let record = normalize(RawItem::Single { info: &info, url });
                if record.has_item_id() {
                    info!("[SingleItem] {} -> {}", url, record.item_id);
                    Some(record)
                } else {
                    warn!("[SingleItem] {} returned no video id", self.source.name());
                    None
                }
            }
            Err(e) => {
                // The dump is never proxied
                match e.blocking_hint(false) {
                    Some(hint) => warn!(
                        "[SingleItem] {} failed for {}: {} ({})",
                        self.source.name(),
                        url,
                        e,
                        hint
                    ),
                    None => warn!("[SingleItem] {} failed for {}: {}", self.source.name(), url, e),
                }
                None
            }
        }
    }
}

/// yt-dlp metadata dump, run through the Python module or the binary
pub struct YtDlpInfoSource {
    command: Option<YtDlpCommand>,
    timeout_seconds: u32,
}

impl YtDlpInfoSource {
    pub fn new(command: Option<YtDlpCommand>, timeout_seconds: u32) -> Self {
        Self {
            command,
            timeout_seconds,
        }
    }

    /// Build command arguments
    fn build_args(&self, url: &str) -> Vec<String> {
        vec![
            "--dump-json".to_string(),
            "--skip-download".to_string(),
            "--no-playlist".to_string(),
            "--no-warnings".to_string(),
            "--socket-timeout".to_string(),
            self.timeout_seconds.to_string(),
            url.to_string(),
        ]
    }

    /// Parse the dump into the library's item shape
    pub fn parse_json(stdout: &[u8]) -> Result<SingleItemInfo, AcquisitionError> {
        let json_str = String::from_utf8_lossy(stdout);
        let json: Value = serde_json::from_str(json_str.trim())
            .map_err(|e| AcquisitionError::Parse(format!("Invalid JSON: {}", e)))?;

        let text = |key: &str| json[key].as_str().filter(|s| !s.is_empty()).map(str::to_string);

        Ok(SingleItemInfo {
            video_id: text("id"),
            title: text("title"),
            author: text("channel").or_else(|| text("uploader")),
            channel_id: text("channel_id"),
            views: coerce_count(&json["view_count"]),
            likes: coerce_count(&json["like_count"]),
            length_seconds: coerce_count(&json["duration"]),
            publish_date: text("upload_date"),
            description: text("description"),
        })
    }
}

#[async_trait]
impl SingleItemSource for YtDlpInfoSource {
    fn name(&self) -> &'static str {
        "yt-dlp-dump-json"
    }

    fn is_available(&self) -> bool {
        self.command.is_some()
    }

    async fn fetch(&self, url: &str) -> Result<SingleItemInfo, AcquisitionError> {
        let command = self
            .command
            .as_ref()
            .ok_or_else(|| AcquisitionError::ToolNotFound("yt-dlp".to_string()))?;

        let args = command.args(self.build_args(url));
        debug!("[SingleItem] Running: {} {}", command.program(), args.join(" "));

        let output = run_output(
            command.program(),
            args,
            Some(self.timeout_seconds as u64),
        )
        .await
        .map_err(AcquisitionError::Execution)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            debug!("[SingleItem] stderr: {}", last_line(&output.stderr));
            return Err(AcquisitionError::from(stderr));
        }

        Self::parse_json(&output.stdout)
    }
}
