//! Prices from an HTTP source.
//!
//! `GET {base_url}/{symbol}` must answer `{"price": "<decimal>"}` (a JSON
//! number is accepted too). The symbol is the denom without its micro prefix.

use async_trait::async_trait;
use feeder_types::Dec;
use serde::Deserialize;
use std::time::Duration;

use crate::{symbol_for_denom, PriceError, PriceProvider};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct PriceResponse {
    price: Dec,
}

pub struct HttpPriceProvider {
    /// Base URL without a trailing slash.
    base_url: String,
    /// Reusable HTTP client.
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpPriceProvider {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn url_for(&self, denom: &str) -> String {
        format!("{}/{}", self.base_url, symbol_for_denom(denom))
    }
}

#[async_trait]
impl PriceProvider for HttpPriceProvider {
    async fn price(&self, denom: &str) -> Result<Dec, PriceError> {
        let url = self.url_for(denom);
        let resp = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| PriceError::Fetch(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(PriceError::Fetch(format!("HTTP {} from {}", resp.status(), url)));
        }

        let body: PriceResponse = resp
            .json()
            .await
            .map_err(|e| PriceError::InvalidResponse(e.to_string()))?;
        tracing::debug!(denom, price = %body.price, "fetched price");
        Ok(body.price)
    }

    fn name(&self) -> &str {
        "http"
    }
}
