use async_trait::async_trait;

use super::traits::{FxProvider, QuoteProvider};
use crate::errors::CoreError;
use crate::models::valuation::CurrencyPair;

const PROVIDER: &str = "Yahoo Finance";

/// Yahoo Finance provider for quotes and FX rates.
///
/// - **Free**: No API key required.
/// - **Coverage**: Global equities, ETFs (incl. TSX `.TO` symbols), crypto pairs.
/// - **FX**: currency pairs are quoted as `{BASE}{QUOTE}=X`, e.g. `USDCAD=X`.
///
/// Prices are returned in the listing's native currency.
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new().map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to create connector: {e}"),
        })?;
        Ok(Self { connector })
    }

    /// Yahoo symbol for an FX pair.
    pub fn fx_symbol(pair: CurrencyPair) -> String {
        format!("{}{}=X", pair.base, pair.quote)
    }

    async fn last_close(&self, symbol: &str) -> Result<f64, CoreError> {
        let resp = self
            .connector
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to fetch latest quote for {symbol}: {e}"),
            })?;

        let quote = resp.last_quote().map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("No quote data for {symbol}: {e}"),
        })?;

        Ok(quote.close)
    }
}

#[async_trait]
impl QuoteProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn latest_close(&self, symbol: &str) -> Result<f64, CoreError> {
        self.last_close(symbol).await
    }
}

#[async_trait]
impl FxProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn fetch_fx(&self, pair: CurrencyPair) -> Result<f64, CoreError> {
        if pair.is_identity() {
            return Ok(1.0);
        }
        self.last_close(&Self::fx_symbol(pair)).await
    }
}
