//! FMP API client implementation.

use crate::{Result, error::FmpError, types::RawRatios};
use ratingset_types::{DatasetError, FinancialRatioRecord, RatioSource};
use reqwest::Client;
use std::env;

/// Host of the FMP API.
const FMP_BASE_URL: &str = "https://financialmodelingprep.com";

/// Path prefix of the v3 API.
const FMP_V3_PATH: &str = "api/v3";

/// Financial Modeling Prep API client.
#[derive(Debug, Clone)]
pub struct FmpClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FmpClient {
    /// Create a new FMP client with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: FMP_BASE_URL.to_string(),
        }
    }

    /// Create a new FMP client from the `FMP_API_KEY` environment variable.
    ///
    /// This will also load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment variable is not set.
    pub fn from_env() -> Result<Self> {
        // Try to load .env file (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_key = env::var("FMP_API_KEY").map_err(|_| FmpError::MissingApiKey)?;
        if api_key.trim().is_empty() {
            return Err(FmpError::MissingApiKey);
        }

        Ok(Self::new(api_key))
    }

    /// Point the client at another host, e.g. a local mock server.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build a URL with the API key.
    fn url(&self, endpoint: &str) -> String {
        format!(
            "{}/{FMP_V3_PATH}/{endpoint}?apikey={}",
            self.base_url, self.api_key
        )
    }

    /// Make a GET request and parse the JSON response.
    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let url = self.url(endpoint);
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FmpError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(FmpError::Api(format!("HTTP {status}: {text}")));
        }

        let text = response.text().await?;

        // FMP reports bad keys and unknown endpoints as a 200 with a message
        if text.contains("\"Error Message\"") {
            return Err(FmpError::Api(text));
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Get the full financial ratio history for a symbol.
    ///
    /// Sends `GET /api/v3/ratios/{symbol}` and returns every record in the
    /// response, most recent first as FMP orders them.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the response is not a JSON
    /// array, or any record lacks a usable report date.
    pub async fn ratios(&self, symbol: &str) -> Result<Vec<FinancialRatioRecord>> {
        let endpoint = format!("ratios/{symbol}");
        let raw: Vec<RawRatios> = self.get(&endpoint).await?;
        tracing::debug!(symbol, records = raw.len(), "fetched ratios");

        raw.into_iter().map(|r| r.into_record(symbol)).collect()
    }
}

impl RatioSource for FmpClient {
    async fn fetch_ratios(
        &self,
        symbol: &str,
    ) -> ratingset_types::Result<Vec<FinancialRatioRecord>> {
        self.ratios(symbol)
            .await
            .map_err(|e| DatasetError::fetch(symbol, e))
    }
}
