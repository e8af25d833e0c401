//! Paged retrieval of municipality records from the ArcGIS feature service.

use std::time::Duration;

use indexmap::IndexMap;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};
use urlencoding::encode;

use crate::{
    data::records::{RawRecord, FIELD_CONFIRMED},
    error::PipelineError,
};

pub const DEFAULT_SERVICE_URL: &str = "https://services.arcgis.com/CCZiGSEQbAxxFVh3/ArcGIS/rest/services/COVID19_ConcelhosDiarios/FeatureServer/0/query";
pub const DEFAULT_PAGE_SIZE: usize = 2000;
pub const DEFAULT_MAX_PAGES: usize = 500;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Knobs for one paged fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub service_url: String,
    pub page_size: usize,
    /// Most pages of records accepted. One further request confirms the end of
    /// data; if that page still has records the fetch fails.
    pub max_pages: usize,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            request_timeout: DEFAULT_TIMEOUT,
            user_agent: "pt-covid-data/0.1".to_string(),
        }
    }
}

impl FetchOptions {
    /// Query URL for the zero-based `page_index`.
    pub fn page_url(&self, page_index: usize) -> String {
        let filter = format!("{FIELD_CONFIRMED}>0");
        format!(
            "{base}?where={filter}&outFields=*&returnGeometry=false&resultType=none&cacheHint=true&resultOffset={offset}&resultRecordCount={count}&f=pjson",
            base = self.service_url,
            filter = encode(&filter),
            offset = page_index * self.page_size,
            count = self.page_size,
        )
    }
}

/// Status code and body of a completed GET.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Error)]
#[error("request to {url} failed: {message}")]
pub struct TransportError {
    pub url: String,
    pub message: String,
}

/// Blocking GET capability the fetcher pages through.
pub trait FeatureTransport {
    fn get(&self, url: &str) -> Result<RawResponse, TransportError>;
}

/// `FeatureTransport` backed by a blocking reqwest client.
pub struct ArcGisClient {
    client: Client,
}

impl ArcGisClient {
    pub fn new(options: &FetchOptions) -> Result<Self, PipelineError> {
        let client = Client::builder()
            .user_agent(options.user_agent.as_str())
            .timeout(options.request_timeout)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(PipelineError::ClientBuild)?;
        Ok(Self { client })
    }
}

impl FeatureTransport for ArcGisClient {
    fn get(&self, url: &str) -> Result<RawResponse, TransportError> {
        let to_err = |err: reqwest::Error| TransportError {
            url: url.to_string(),
            message: err.to_string(),
        };
        let resp = self.client.get(url).send().map_err(to_err)?;
        let status = resp.status().as_u16();
        let body = resp.bytes().map_err(to_err)?.to_vec();
        Ok(RawResponse { status, body })
    }
}

#[derive(Debug, Deserialize)]
struct FeaturePage {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    attributes: Map<String, Value>,
}

/// Why paging stopped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndOfData {
    Transport,
    Status(u16),
    Undecodable,
    EmptyPage,
}

fn fetch_page<T: FeatureTransport + ?Sized>(
    transport: &T,
    url: &str,
) -> Result<Vec<Feature>, EndOfData> {
    let resp = match transport.get(url) {
        Ok(resp) => resp,
        Err(err) => {
            warn!(%err, "transport error, treating as end of data");
            return Err(EndOfData::Transport);
        }
    };
    if !resp.is_success() {
        return Err(EndOfData::Status(resp.status));
    }
    let page: FeaturePage = serde_json::from_slice(&resp.body).map_err(|err| {
        debug!(%err, "page body did not decode as a feature page");
        EndOfData::Undecodable
    })?;
    if page.features.is_empty() {
        return Err(EndOfData::EmptyPage);
    }
    Ok(page.features)
}

/// Page through the service until it runs out of records, then deduplicate.
///
/// A non-success status, an undecodable body, a transport error, or an empty
/// page all end the loop normally. A feature whose attributes do not match the
/// upstream schema aborts the fetch. After `max_pages` pages one more request
/// must reach an end condition, otherwise the result is
/// [`PipelineError::PageBudgetExhausted`].
pub fn fetch_all<T: FeatureTransport + ?Sized>(
    transport: &T,
    options: &FetchOptions,
) -> Result<Vec<RawRecord>, PipelineError> {
    if options.page_size == 0 {
        return Err(PipelineError::InvalidPageSize);
    }

    let mut records = Vec::new();
    for page_index in 0..=options.max_pages {
        let url = options.page_url(page_index);
        let features = match fetch_page(transport, &url) {
            Ok(features) => features,
            Err(reason) => {
                info!(page_index, ?reason, fetched = records.len(), "feature service exhausted");
                return Ok(deduplicate(records));
            }
        };
        if page_index == options.max_pages {
            break;
        }
        debug!(
            page_index,
            offset = page_index * options.page_size,
            features = features.len(),
            "fetched page"
        );
        for feature in features {
            let record = RawRecord::from_attributes(records.len(), &feature.attributes)?;
            records.push(record);
        }
    }

    Err(PipelineError::PageBudgetExhausted {
        max_pages: options.max_pages,
        records: records.len(),
    })
}

/// Keep the last-seen record for every (municipality, date); overlapping pages
/// repeat rows. Output keeps first-seen key order.
pub fn deduplicate(records: Vec<RawRecord>) -> Vec<RawRecord> {
    let fetched = records.len();
    let mut latest: IndexMap<(String, chrono::NaiveDate), RawRecord> = IndexMap::new();
    for record in records {
        latest.insert((record.municipality.clone(), record.date), record);
    }
    let unique: Vec<RawRecord> = latest.into_values().collect();
    info!(fetched, unique = unique.len(), "deduplicated municipality records");
    unique
}
