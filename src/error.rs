//! Error types for the fetch/aggregate/normalize pipeline.

use std::path::PathBuf;

use chrono::NaiveDate;
use polars::error::PolarsError;
use thiserror::Error;

/// Terminating errors surfaced to callers of the pipeline.
///
/// Transport and decode failures while paging are not represented here: the
/// fetcher treats them as end-of-data and stops.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("feature {index} is missing required attribute '{field}'")]
    MissingAttribute { index: usize, field: &'static str },

    #[error("feature {index} has attribute '{field}' with unexpected value {value}")]
    InvalidAttribute {
        index: usize,
        field: &'static str,
        value: String,
    },

    #[error("timestamp {0} ms is outside the representable date range")]
    TimestampOutOfRange(i64),

    #[error("counter sum for district '{district}' on {date} overflows")]
    CounterOverflow { district: String, date: NaiveDate },

    #[error("page size must be greater than zero")]
    InvalidPageSize,

    #[error("page budget of {max_pages} pages exhausted with {records} records fetched and no end of data")]
    PageBudgetExhausted { max_pages: usize, records: usize },

    #[error("failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("failed to assemble output frame")]
    Frame(#[from] PolarsError),

    #[error("I/O error on '{0}'")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("CSV error on '{0}'")]
    Csv(PathBuf, #[source] csv::Error),
}
