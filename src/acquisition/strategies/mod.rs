// Acquisition strategies
//
// - Structured API: YouTube Data API search, skipped when the ETag is unchanged
// - Single item: yt-dlp metadata dump for one video
// - Generic scrape: yt-dlp writing `.info.json` files, swept after the run

pub mod api;
pub mod diagnostics;
pub mod scrape;
pub mod single;

pub use api::{StructuredApiStrategy, YouTubeDataApi};
pub use diagnostics::{diagnose_error, BlockingReason};
pub use scrape::{sweep_dir, GenericScrapeStrategy, SweepResult, YtDlpScraper};
pub use single::{SingleItemStrategy, YtDlpInfoSource};
