//! On-disk artefacts: the raw-record CSV cache and the district series outputs.

use std::{fs::File, path::Path};

use clap::ValueEnum;
use polars::prelude::{CsvWriter, DataFrame, NamedFrom, ParquetWriter, SerWriter, Series};
use tracing::info;

use crate::{
    data::records::{DistrictDailyRow, RawRecord},
    error::PipelineError,
};

/// Output file format for the processed series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Csv,
    Parquet,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }
}

fn ensure_parent(path: &Path) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| PipelineError::Io(parent.to_path_buf(), e))?;
    }
    Ok(())
}

pub fn write_raw(path: &Path, records: &[RawRecord]) -> Result<(), PipelineError> {
    ensure_parent(path)?;
    let csv_err = |e: csv::Error| PipelineError::Csv(path.to_path_buf(), e);
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    for record in records {
        writer.serialize(record).map_err(csv_err)?;
    }
    writer
        .flush()
        .map_err(|e| PipelineError::Io(path.to_path_buf(), e))?;
    info!(path = %path.display(), rows = records.len(), "wrote raw municipality records");
    Ok(())
}

pub fn read_raw(path: &Path) -> Result<Vec<RawRecord>, PipelineError> {
    let csv_err = |e: csv::Error| PipelineError::Csv(path.to_path_buf(), e);
    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    let mut records = Vec::new();
    for result in reader.deserialize() {
        let record: RawRecord = result.map_err(csv_err)?;
        records.push(record);
    }
    info!(path = %path.display(), rows = records.len(), "loaded raw municipality records");
    Ok(records)
}

/// Tabular form of the daily series: `region`, `date`, `positive`, `total`.
pub fn to_frame(rows: &[DistrictDailyRow]) -> Result<DataFrame, PipelineError> {
    let regions: Vec<String> = rows.iter().map(|r| r.district.clone()).collect();
    let dates: Vec<chrono::NaiveDate> = rows.iter().map(|r| r.date).collect();
    let positive: Vec<u64> = rows.iter().map(|r| r.positive).collect();
    let total: Vec<u64> = rows.iter().map(|r| r.total).collect();
    let df = DataFrame::new(vec![
        Series::new("region".into(), regions),
        Series::new("date".into(), dates),
        Series::new("positive".into(), positive),
        Series::new("total".into(), total),
    ])?;
    Ok(df)
}

pub fn write_series(
    path: &Path,
    frame: &mut DataFrame,
    format: OutputFormat,
) -> Result<(), PipelineError> {
    ensure_parent(path)?;
    let mut file = File::create(path).map_err(|e| PipelineError::Io(path.to_path_buf(), e))?;
    match format {
        OutputFormat::Csv => {
            CsvWriter::new(&mut file).finish(frame)?;
        }
        OutputFormat::Parquet => {
            ParquetWriter::new(file).finish(frame)?;
        }
    }
    info!(path = %path.display(), rows = frame.height(), "wrote district series");
    Ok(())
}
