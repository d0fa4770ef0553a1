use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::valuation::CurrencyPair;

/// Rate used when no FX provider answers (CAD per USD).
pub const DEFAULT_USD_CAD_RATE: Decimal = dec!(1.35);

/// How long a fetched holdings sheet stays valid.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Runtime knobs of the dashboard core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSettings {
    /// Time-to-live of the cached holdings sequence.
    pub cache_ttl: Duration,

    /// FX rate substituted when every FX provider fails.
    pub default_fx_rate: Decimal,

    /// Conversion applied to non-CAD rows.
    pub fx_pair: CurrencyPair,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
            default_fx_rate: DEFAULT_USD_CAD_RATE,
            fx_pair: CurrencyPair::USD_CAD,
        }
    }
}
