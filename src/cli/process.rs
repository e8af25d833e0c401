//! CLI entry-point for producing the daily district series.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    config::Settings,
    data::{
        arcgis::ArcGisClient,
        store::{self, OutputFormat},
    },
    pipeline,
};

/// Args for the `process` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Date the analysis runs on; data from this date onward is dropped.
    #[arg(long)]
    pub run_date: Option<NaiveDate>,
    /// Process a cached raw CSV instead of fetching.
    #[arg(long)]
    pub raw: Option<PathBuf>,
    /// Output file format.
    #[arg(long, default_value = "csv", value_enum)]
    pub format: OutputFormat,
    /// Records requested per page.
    #[arg(long)]
    pub page_size: Option<usize>,
    /// Maximum pages requested before giving up.
    #[arg(long)]
    pub max_pages: Option<usize>,
}

#[instrument(skip(settings))]
pub fn run(args: Args, settings: Settings) -> Result<()> {
    let run_date = args.run_date.unwrap_or_else(|| Utc::now().date_naive());

    let rows = match &args.raw {
        Some(path) => {
            let records = store::read_raw(path).with_context(|| format!("read {path:?}"))?;
            pipeline::process_records(&records, run_date).context("build district series")?
        }
        None => {
            let options = settings.fetch_options(args.page_size, args.max_pages);
            let client = ArcGisClient::new(&options)?;
            pipeline::get_dataset(&client, run_date, &options).context("build district series")?
        }
    };

    let mut frame = store::to_frame(&rows)?;
    let out = settings.join_output(format!(
        "district_daily_{run_date}.{}",
        args.format.extension()
    ));
    store::write_series(&out, &mut frame, args.format)
        .with_context(|| format!("write {out:?}"))?;
    info!(%run_date, rows = rows.len(), path = %out.display(), "district series ready");
    Ok(())
}
