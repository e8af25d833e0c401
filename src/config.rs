//! Runtime configuration resolved from `.env` and the environment.

use std::{
    env,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use anyhow::Context;

use crate::data::arcgis::{self, FetchOptions};

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Query endpoint of the municipality feature layer.
    pub feature_service_url: String,
    /// Records requested per page.
    pub page_size: usize,
    /// Hard ceiling on pages requested in one fetch.
    pub max_pages: usize,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Contact address advertised in the User-Agent.
    pub contact_email: String,
    /// Root folder for cached raw downloads.
    pub data_dir: PathBuf,
    /// Root folder for processed series.
    pub outputs_dir: PathBuf,
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let feature_service_url = env::var("FEATURE_SERVICE_URL")
            .unwrap_or_else(|_| arcgis::DEFAULT_SERVICE_URL.to_string());
        let page_size = env_or("PAGE_SIZE", arcgis::DEFAULT_PAGE_SIZE);
        let max_pages = env_or("MAX_PAGES", arcgis::DEFAULT_MAX_PAGES);
        let request_timeout_secs =
            env_or("REQUEST_TIMEOUT_SECS", arcgis::DEFAULT_TIMEOUT.as_secs());
        let contact_email =
            env::var("CONTACT_EMAIL").unwrap_or_else(|_| "research@example.com".to_string());
        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        let outputs_dir = env::var("OUTPUTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./outputs"));

        std::fs::create_dir_all(&data_dir).context("creating data dir")?;
        std::fs::create_dir_all(&outputs_dir).context("creating outputs dir")?;

        Ok(Self {
            feature_service_url,
            page_size,
            max_pages,
            request_timeout_secs,
            contact_email,
            data_dir,
            outputs_dir,
        })
    }

    /// Fetch options for the paged fetcher, with optional CLI overrides.
    pub fn fetch_options(&self, page_size: Option<usize>, max_pages: Option<usize>) -> FetchOptions {
        FetchOptions {
            service_url: self.feature_service_url.clone(),
            page_size: page_size.unwrap_or(self.page_size),
            max_pages: max_pages.unwrap_or(self.max_pages),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            user_agent: format!("pt-covid-data/0.1 (+{})", self.contact_email),
        }
    }

    /// Convenience helper for derived path segments.
    pub fn join_data<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.data_dir.join(path)
    }

    /// Convenience helper for derived output path segments.
    pub fn join_output<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.outputs_dir.join(path)
    }
}
