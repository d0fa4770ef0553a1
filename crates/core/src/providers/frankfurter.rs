use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use super::traits::FxProvider;
use crate::errors::CoreError;
use crate::models::valuation::CurrencyPair;

const BASE_URL: &str = "https://api.frankfurter.dev/v1";

/// Frankfurter API provider for fiat exchange rates.
///
/// - **Free**: No API key, no rate limits, open-source.
/// - **Source**: European Central Bank (ECB) reference rates, published once per
///   working day, so the rate lags intraday markets.
/// - **Endpoint**: `/latest?base={BASE}&symbols={QUOTE}`
pub struct FrankfurterProvider {
    client: Client,
    base_url: String,
}

impl FrankfurterProvider {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Point the provider at another host (tests, mirrors).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl Default for FrankfurterProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

#[async_trait]
impl FxProvider for FrankfurterProvider {
    fn name(&self) -> &str {
        "Frankfurter"
    }

    async fn fetch_fx(&self, pair: CurrencyPair) -> Result<f64, CoreError> {
        if pair.is_identity() {
            return Ok(1.0);
        }

        let base = pair.base.label();
        let target = pair.quote.label();
        let url = format!("{}/latest?base={base}&symbols={target}", self.base_url);

        let resp: RatesResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "Frankfurter".into(),
                message: format!("Failed to parse response for {pair}: {e}"),
            })?;

        resp.rates.get(target).copied().ok_or_else(|| CoreError::Api {
            provider: "Frankfurter".into(),
            message: format!("No rate found for {pair}"),
        })
    }
}
