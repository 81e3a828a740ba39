//! ChartLab Runner — batch orchestration.
//!
//! Drives the per-identifier pipeline (validate, fetch, store, load,
//! chart) with per-item failure isolation, then composes and renders the
//! comparison charts exactly once over the successful subset.

pub mod config;
pub mod pipeline;
pub mod progress;

pub use config::{prepare_layout, OutputLayout, RunConfig, SetupError};
pub use pipeline::{run_batch, BatchSummary, ItemError, ItemReport};
pub use progress::{BatchProgress, StdoutProgress};
