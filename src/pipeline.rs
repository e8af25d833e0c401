//! One-call composition of fetch, district roll-up and normalisation.

use chrono::NaiveDate;
use polars::prelude::DataFrame;
use tracing::{info, instrument};

use crate::{
    data::{
        aggregate,
        arcgis::{self, ArcGisClient, FeatureTransport, FetchOptions},
        normalize,
        records::{DistrictDailyRow, RawRecord},
        store,
    },
    error::PipelineError,
};

/// Roll already-fetched municipality records up to districts and normalise them.
pub fn process_records(
    records: &[RawRecord],
    run_date: NaiveDate,
) -> Result<Vec<DistrictDailyRow>, PipelineError> {
    let cumulative = aggregate::aggregate(records)?;
    info!(districts_days = cumulative.len(), "aggregated records by district");
    Ok(normalize::normalize(&cumulative, run_date))
}

/// Fetch the full dataset through `transport` and return the daily series usable
/// as of `run_date`.
#[instrument(skip(transport, options), fields(page_size = options.page_size))]
pub fn get_dataset<T: FeatureTransport + ?Sized>(
    transport: &T,
    run_date: NaiveDate,
    options: &FetchOptions,
) -> Result<Vec<DistrictDailyRow>, PipelineError> {
    let records = arcgis::fetch_all(transport, options)?;
    process_records(&records, run_date)
}

/// Fetch from the public feature service with default options and return the
/// normalised series as a frame.
pub fn get_and_process_data(run_date: NaiveDate) -> Result<DataFrame, PipelineError> {
    let options = FetchOptions::default();
    let client = ArcGisClient::new(&options)?;
    let rows = get_dataset(&client, run_date, &options)?;
    store::to_frame(&rows)
}
