//! CLI entry-point for downloading raw municipality records.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    config::Settings,
    data::{
        arcgis::{self, ArcGisClient},
        store,
    },
};

/// Args for the `fetch` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Records requested per page.
    #[arg(long)]
    pub page_size: Option<usize>,
    /// Maximum pages requested before giving up.
    #[arg(long)]
    pub max_pages: Option<usize>,
    /// Destination CSV (defaults to `<DATA_DIR>/raw/concelhos.csv`).
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[instrument(skip(settings))]
pub fn run(args: Args, settings: Settings) -> Result<()> {
    let options = settings.fetch_options(args.page_size, args.max_pages);
    let client = ArcGisClient::new(&options)?;

    info!(url = %options.service_url, "fetching municipality records");
    let records = arcgis::fetch_all(&client, &options).context("fetch municipality records")?;

    let out = args
        .out
        .unwrap_or_else(|| settings.join_data("raw/concelhos.csv"));
    store::write_raw(&out, &records).with_context(|| format!("cache records to {out:?}"))?;
    Ok(())
}
