use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::holding::MAX_AMOUNT;
use crate::models::quote::QuoteBatch;
use crate::providers::registry::ProviderRegistry;

/// Fetches latest prices for a set of tickers with provider fallback.
///
/// Providers are asked in registry order; each one only sees the tickers
/// the previous ones could not price. A ticker nobody prices is recorded in
/// `QuoteBatch::failures` with the last error seen.
pub struct QuoteService;

impl QuoteService {
    pub fn new() -> Self {
        Self
    }

    pub async fn fetch_quotes(
        &self,
        registry: &ProviderRegistry,
        tickers: &BTreeSet<String>,
    ) -> QuoteBatch {
        let mut batch = QuoteBatch::new();
        let mut pending: BTreeSet<String> = tickers.clone();
        let mut last_errors: std::collections::HashMap<String, String> = Default::default();

        for provider in registry.quote_providers() {
            if pending.is_empty() {
                break;
            }
            debug!(provider = provider.name(), count = pending.len(), "fetching quotes");

            let results = provider.fetch_quotes(&pending).await;
            for (ticker, result) in results {
                match result.and_then(|price| Self::validate_price(provider.name(), &ticker, price)) {
                    Ok(price) => {
                        pending.remove(&ticker);
                        batch.prices.insert(ticker, price);
                    }
                    Err(e) => {
                        last_errors.insert(ticker, e.to_string());
                    }
                }
            }
        }

        for ticker in pending {
            let message = last_errors
                .remove(&ticker)
                .unwrap_or_else(|| CoreError::NoProvider(format!("quote {ticker}")).to_string());
            warn!(%ticker, %message, "no live price, falling back to purchase price");
            batch.failures.insert(ticker, message);
        }

        batch
    }

    /// Providers must return finite, non-negative prices within `MAX_AMOUNT`.
    fn validate_price(provider: &str, ticker: &str, price: f64) -> Result<Decimal, CoreError> {
        if !price.is_finite() || price < 0.0 {
            return Err(CoreError::Api {
                provider: provider.to_string(),
                message: format!(
                    "Invalid price returned for {ticker}: {price} (must be finite and non-negative)"
                ),
            });
        }
        let price = Decimal::from_f64(price).ok_or_else(|| CoreError::PriceNotAvailable {
            symbol: ticker.to_string(),
        })?;
        if price > MAX_AMOUNT {
            return Err(CoreError::Api {
                provider: provider.to_string(),
                message: format!("Price for {ticker} out of range: {price}"),
            });
        }
        Ok(price)
    }
}

impl Default for QuoteService {
    fn default() -> Self {
        Self::new()
    }
}
