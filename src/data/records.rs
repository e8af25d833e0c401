//! Record types flowing through the pipeline and feature attribute decoding.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PipelineError;

pub const FIELD_MUNICIPALITY: &str = "Concelho";
pub const FIELD_DISTRICT: &str = "Distrito";
pub const FIELD_REPORTED_AT: &str = "Data_Conc";
pub const FIELD_CONFIRMED: &str = "ConfirmadosAcumulado";
pub const FIELD_AWAITING_RESULTS: &str = "AguardarResultadosLab";

/// One municipality-day observation as published by the feature service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub municipality: String,
    pub district: String,
    /// Report timestamp, milliseconds since the Unix epoch.
    pub reported_at_ms: i64,
    /// UTC calendar date of `reported_at_ms`.
    pub date: NaiveDate,
    pub confirmed_cumulative: i64,
    pub awaiting_results_cumulative: i64,
}

impl RawRecord {
    /// Decode a feature's `attributes` object. `index` is the feature's position
    /// in the overall fetch and only feeds error messages.
    pub fn from_attributes(index: usize, attrs: &Map<String, Value>) -> Result<Self, PipelineError> {
        let municipality = text_attr(index, attrs, FIELD_MUNICIPALITY)?;
        let district = text_attr(index, attrs, FIELD_DISTRICT)?;
        let reported_at_ms = match required(index, attrs, FIELD_REPORTED_AT)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().and_then(float_to_i64))
                .ok_or_else(|| invalid(index, FIELD_REPORTED_AT, &Value::Number(n.clone())))?,
            other => return Err(invalid(index, FIELD_REPORTED_AT, other)),
        };
        let date = date_from_millis(reported_at_ms)?;

        Ok(Self {
            municipality,
            district,
            reported_at_ms,
            date,
            confirmed_cumulative: count_attr(index, attrs, FIELD_CONFIRMED)?,
            awaiting_results_cumulative: count_attr(index, attrs, FIELD_AWAITING_RESULTS)?,
        })
    }
}

/// Convert an epoch-millisecond timestamp into its UTC calendar date.
pub fn date_from_millis(ms: i64) -> Result<NaiveDate, PipelineError> {
    DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.date_naive())
        .ok_or(PipelineError::TimestampOutOfRange(ms))
}

fn required<'a>(
    index: usize,
    attrs: &'a Map<String, Value>,
    field: &'static str,
) -> Result<&'a Value, PipelineError> {
    attrs
        .get(field)
        .ok_or(PipelineError::MissingAttribute { index, field })
}

fn invalid(index: usize, field: &'static str, value: &Value) -> PipelineError {
    PipelineError::InvalidAttribute {
        index,
        field,
        value: value.to_string(),
    }
}

fn text_attr(
    index: usize,
    attrs: &Map<String, Value>,
    field: &'static str,
) -> Result<String, PipelineError> {
    match required(index, attrs, field)? {
        Value::String(s) => Ok(s.trim().to_string()),
        other => Err(invalid(index, field, other)),
    }
}

/// Round a JSON float to an integer, rejecting values an `i64` cannot hold.
fn float_to_i64(f: f64) -> Option<i64> {
    let rounded = f.round();
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range.
    (rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < i64::MAX as f64)
        .then_some(rounded as i64)
}

// Null counters are summed as zero.
fn count_attr(
    index: usize,
    attrs: &Map<String, Value>,
    field: &'static str,
) -> Result<i64, PipelineError> {
    match required(index, attrs, field)? {
        Value::Null => Ok(0),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(float_to_i64))
            .ok_or_else(|| invalid(index, field, &Value::Number(n.clone()))),
        other => Err(invalid(index, field, other)),
    }
}

/// Summed cumulative counts for one (district, date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictDailyCumulative {
    pub district: String,
    pub date: NaiveDate,
    pub confirmed_cumulative: i64,
    pub awaiting_results_cumulative: i64,
}

/// One row of the cleaned daily series handed to the forecasting model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictDailyRow {
    pub district: String,
    pub date: NaiveDate,
    pub positive: u64,
    pub total: u64,
}
