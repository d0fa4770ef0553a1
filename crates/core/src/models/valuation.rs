use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::holding::{Currency, Holding};

/// Where a holding's current price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceSource {
    /// Latest close returned by a market-data provider.
    Live,
    /// No quote was available; the purchase price stands in (zero gain).
    PurchasePriceFallback,
}

/// A holding enriched with its market valuation in CAD.
///
/// `unrealized_gain_cad == current_value_cad - cost_basis_cad` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuedHolding {
    pub holding: Holding,

    /// Price used for the valuation, in the holding's own currency
    pub current_price: Decimal,

    pub price_source: PriceSource,

    /// FX multiplier applied to this row (1 for CAD rows)
    pub fx_multiplier: Decimal,

    pub current_value_cad: Decimal,
    pub cost_basis_cad: Decimal,
    pub unrealized_gain_cad: Decimal,
}

/// An ordered currency pair. `rate` values are quoted as units of `quote`
/// per one unit of `base`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub base: Currency,
    pub quote: Currency,
}

impl CurrencyPair {
    /// CAD per USD, the only conversion the dashboard needs.
    pub const USD_CAD: CurrencyPair = CurrencyPair {
        base: Currency::Usd,
        quote: Currency::Cad,
    };

    pub fn new(base: Currency, quote: Currency) -> Self {
        Self { base, quote }
    }

    pub fn is_identity(&self) -> bool {
        self.base == self.quote
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// Provenance of the FX snapshot used for one render pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FxSource {
    /// Same-currency pair, no lookup needed.
    Identity,
    /// Returned by the named provider.
    Live { provider: String },
    /// Every provider failed; the configured default rate was used.
    Fallback,
}

/// The single FX snapshot applied to every USD row of a render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FxRate {
    pub pair: CurrencyPair,
    pub rate: Decimal,
    pub source: FxSource,
}

impl FxRate {
    pub fn is_fallback(&self) -> bool {
        self.source == FxSource::Fallback
    }
}
