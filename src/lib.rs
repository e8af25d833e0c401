//! District-level daily COVID-19 series for Portugal.
//!
//! Municipality records are paged out of the public ArcGIS feature service,
//! summed per district, and turned from cumulative counters into cleaned daily
//! deltas cut off at the run date's report lag.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod pipeline;

pub use error::PipelineError;
pub use pipeline::{get_and_process_data, get_dataset, process_records};
