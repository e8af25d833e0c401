#![allow(dead_code)]

use std::{cell::RefCell, collections::VecDeque};

use chrono::NaiveDate;
use pt_covid_data::data::{
    arcgis::{FeatureTransport, RawResponse, TransportError},
    records::RawRecord,
};
use serde_json::{json, Value};

/// Replays canned responses and records every requested URL.
pub struct ScriptedTransport {
    responses: RefCell<VecDeque<Result<RawResponse, TransportError>>>,
    pub requested: RefCell<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Result<RawResponse, TransportError>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            requested: RefCell::new(Vec::new()),
        }
    }

    /// A transport that answers every request with the same non-empty page.
    pub fn endless(page: Value, count: usize) -> Self {
        Self::new((0..count).map(|_| Ok(ok_json(&page))).collect())
    }

    pub fn request_count(&self) -> usize {
        self.requested.borrow().len()
    }
}

impl FeatureTransport for ScriptedTransport {
    fn get(&self, url: &str) -> Result<RawResponse, TransportError> {
        self.requested.borrow_mut().push(url.to_string());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(ok_json(&json!({ "features": [] }))))
    }
}

pub fn ok_json(body: &Value) -> RawResponse {
    RawResponse {
        status: 200,
        body: serde_json::to_vec(body).unwrap(),
    }
}

pub fn millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp_millis()
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 4, d).unwrap()
}

pub fn feature(municipality: &str, district: &str, date: NaiveDate, confirmed: i64, awaiting: i64) -> Value {
    json!({
        "attributes": {
            "Concelho": municipality,
            "Distrito": district,
            "Data_Conc": millis(date),
            "ConfirmadosAcumulado": confirmed,
            "AguardarResultadosLab": awaiting,
            "OBJECTID": 1
        }
    })
}

pub fn page(features: Vec<Value>) -> Value {
    json!({ "features": features })
}

pub fn record(municipality: &str, district: &str, date: NaiveDate, confirmed: i64, awaiting: i64) -> RawRecord {
    RawRecord {
        municipality: municipality.to_string(),
        district: district.to_string(),
        reported_at_ms: millis(date),
        date,
        confirmed_cumulative: confirmed,
        awaiting_results_cumulative: awaiting,
    }
}
