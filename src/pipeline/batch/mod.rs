//! Batch Orchestrator — N ingested files in, exactly N independently
//! settled results out.

pub mod runner;
pub mod types;

pub use runner::{pending_results, run_batch};
pub use types::{BatchSnapshot, ProcessedResult};
