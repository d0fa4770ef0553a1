use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Latest prices for a set of tickers.
///
/// Every requested ticker ends up in exactly one of `prices` or `failures`,
/// whether one ticker or many were asked for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteBatch {
    /// ticker → latest close, in the ticker's quote currency
    pub prices: HashMap<String, Decimal>,

    /// ticker → reason no provider could price it
    pub failures: BTreeMap<String, String>,
}

impl QuoteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn price(&self, ticker: &str) -> Option<Decimal> {
        self.prices.get(ticker).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
