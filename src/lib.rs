pub mod acquisition;

pub use acquisition::{
    AcquisitionConfig, AcquisitionError, Orchestrator, Record, RunReport, StrategyOrigin,
};
