use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use youtube_harvester::acquisition::export::{write_csv, write_json};
use youtube_harvester::acquisition::input::load_links;
use youtube_harvester::acquisition::tools::ToolManager;
use youtube_harvester::acquisition::{AcquisitionConfig, HandleResolution, Orchestrator};

/// Harvest metadata for YouTube videos, channels and playlists
#[derive(Parser, Debug)]
#[command(name = "youtube-harvester", version)]
struct Cli {
    /// File with YouTube links (one per line, or a JSON array)
    #[arg(long, default_value = "data/input_links.txt")]
    input_file: PathBuf,

    /// Where yt-dlp writes its .info.json files
    #[arg(long, default_value = "data/output")]
    output_dir: PathBuf,

    /// Merge all found metadata into a single JSON file
    #[arg(long)]
    dump_json: Option<PathBuf>,

    /// Merge all found metadata into a CSV file
    #[arg(long)]
    dump_csv: Option<PathBuf>,

    /// Use the Data API for channel links when a channel id is found
    #[arg(long)]
    use_api: bool,

    /// Data API key(s), comma-separated; the first one is used
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true, default_value = "")]
    api_key: String,

    /// ETag cache file
    #[arg(long, default_value = "data/channel_etags.json")]
    cache_path: PathBuf,

    /// Proxy URL; repeat or comma-separate for a random pick per call
    #[arg(long = "proxy", env = "HARVEST_PROXIES", value_delimiter = ',')]
    proxies: Vec<String>,

    /// Resolve @handle URLs through the API (one extra call each)
    #[arg(long)]
    resolve_handles: bool,

    /// Python interpreter with the yt_dlp module installed
    #[arg(long = "python", env = "YTDLP_PYTHON")]
    python: Option<String>,

    /// Timeout for single-video lookups, in seconds
    #[arg(long, default_value_t = 30)]
    single_timeout: u32,

    /// Report yt-dlp availability and exit
    #[arg(long)]
    check_tools: bool,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> AcquisitionConfig {
        let handle_resolution = if self.resolve_handles {
            HandleResolution::ResolveViaApi
        } else {
            HandleResolution::Fallback
        };

        AcquisitionConfig::default()
            .with_api(self.use_api)
            .with_api_keys(&self.api_key)
            .with_cache_path(&self.cache_path)
            .with_output_dir(&self.output_dir)
            .with_collect_scraped(self.dump_json.is_some() || self.dump_csv.is_some())
            .with_handle_resolution(handle_resolution)
            .with_single_item_timeout(self.single_timeout)
            .with_python(self.python.clone())
            .with_proxies(self.proxies.clone())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "youtube_harvester=debug"
    } else {
        "youtube_harvester=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = cli.config();

    if cli.check_tools {
        for tool in ToolManager::new(config.python_override.as_deref()).get_all_tools() {
            println!(
                "{:<18} {:<10} {}",
                tool.name,
                if tool.is_available { "available" } else { "missing" },
                tool.version.unwrap_or_default()
            );
        }
        return Ok(());
    }

    // Fatal before any network or subprocess activity
    let links = match load_links(&cli.input_file) {
        Ok(links) => links,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };
    info!("Loaded {} links from {}", links.len(), cli.input_file.display());

    let orchestrator = Orchestrator::from_config(&config);
    let report = orchestrator.run_links(&links).await?;

    if let Some(path) = &cli.dump_json {
        write_json(&report.records, path)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    if let Some(path) = &cli.dump_csv {
        write_csv(&report.records, path).with_context(|| format!("writing {}", path.display()))?;
    }

    info!(
        "Done: {} records ({} scraped files, {} malformed)",
        report.records.len(),
        report.scraped_files,
        report.malformed_files
    );
    Ok(())
}
