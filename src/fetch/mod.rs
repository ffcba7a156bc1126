//! Summary fetching.
//!
//! One-shot HTTP client for the summary endpoint. A single attempt, no
//! retry or backoff: the caller decides what to do with a failure (the
//! dashboard view keeps its placeholder table and raises an error flag).

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::models::CounterTable;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_USER_AGENT: &str = concat!("upgrade-tracker/", env!("CARGO_PKG_VERSION"));

/// Errors that can occur while loading the summary.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },
}

/// Client for the summary read endpoint.
pub struct SummaryClient {
    client: Client,
    base_url: Url,
}

impl SummaryClient {
    /// Create a client for the server at `base_url`.
    pub fn new(base_url: Url) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));

        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Load the aggregate count table from `GET /api/summary`.
    pub async fn load_summary(&self) -> Result<CounterTable, FetchError> {
        let url = self
            .base_url
            .join("/api/summary")
            .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        debug!("Loading summary from {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        let table = response.json::<CounterTable>().await?;
        Ok(table)
    }
}
