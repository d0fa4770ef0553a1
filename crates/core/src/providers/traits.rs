use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};

use crate::errors::CoreError;
use crate::models::valuation::CurrencyPair;

/// A market-data source able to return the latest close of a symbol.
///
/// Implementations only answer one symbol at a time; `fetch_quotes` gives
/// every provider the same batch shape (one entry per requested symbol),
/// so callers never special-case a batch of one.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/warnings).
    fn name(&self) -> &str;

    /// Most recent available closing price of `symbol`, in its quote currency.
    async fn latest_close(&self, symbol: &str) -> Result<f64, CoreError>;

    /// Latest close for each symbol. The map has exactly one entry per input.
    async fn fetch_quotes(
        &self,
        symbols: &BTreeSet<String>,
    ) -> HashMap<String, Result<f64, CoreError>> {
        let mut out = HashMap::with_capacity(symbols.len());
        for symbol in symbols {
            let result = self.latest_close(symbol).await;
            out.insert(symbol.clone(), result);
        }
        out
    }
}

/// A source of the latest exchange rate for a currency pair.
#[async_trait]
pub trait FxProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Units of `pair.quote` per one unit of `pair.base`.
    async fn fetch_fx(&self, pair: CurrencyPair) -> Result<f64, CoreError>;
}
