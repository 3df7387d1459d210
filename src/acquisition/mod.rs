// Acquisition module - metadata harvesting across three strategies

pub mod cache;
pub mod classifier;
pub mod config;
pub mod errors;
pub mod export;
pub mod input;
pub mod models;
pub mod normalizer;
pub mod orchestrator;
pub mod proxy;
pub mod strategies;
pub mod tools;
pub mod traits;
pub mod utils;

pub use cache::VersionTagCache;
pub use config::{AcquisitionConfig, HandleResolution};
pub use errors::AcquisitionError;
pub use input::InputLink;
pub use models::{AcquisitionOutcome, Disposition, Record, RunReport, StrategyOrigin, UrlKind};
pub use orchestrator::{Capabilities, Orchestrator};
pub use traits::{ScrapeRunner, SearchApi, SingleItemSource};
