use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::valuation::{CurrencyPair, FxRate, FxSource};
use crate::providers::registry::ProviderRegistry;

/// Resolves the one FX snapshot used by a render pass.
///
/// The first provider returning a finite, positive rate wins. When all of
/// them fail, `default_rate` is used and the snapshot is marked
/// `FxSource::Fallback`.
pub struct FxService {
    default_rate: Decimal,
}

impl FxService {
    pub fn new(default_rate: Decimal) -> Self {
        Self { default_rate }
    }

    pub fn default_rate(&self) -> Decimal {
        self.default_rate
    }

    pub async fn current_rate(&self, registry: &ProviderRegistry, pair: CurrencyPair) -> FxRate {
        if pair.is_identity() {
            return FxRate {
                pair,
                rate: Decimal::ONE,
                source: FxSource::Identity,
            };
        }

        for provider in registry.fx_providers() {
            match provider.fetch_fx(pair).await {
                Ok(rate) if rate.is_finite() && rate > 0.0 => {
                    if let Some(rate) = Decimal::from_f64(rate) {
                        debug!(provider = provider.name(), %pair, %rate, "fx rate");
                        return FxRate {
                            pair,
                            rate,
                            source: FxSource::Live {
                                provider: provider.name().to_string(),
                            },
                        };
                    }
                }
                Ok(rate) => {
                    warn!(provider = provider.name(), %pair, rate, "provider returned unusable fx rate");
                }
                Err(e) => {
                    warn!(provider = provider.name(), %pair, error = %e, "fx lookup failed");
                }
            }
        }

        warn!(%pair, rate = %self.default_rate, "no fx provider answered, using default rate");
        FxRate {
            pair,
            rate: self.default_rate,
            source: FxSource::Fallback,
        }
    }
}
