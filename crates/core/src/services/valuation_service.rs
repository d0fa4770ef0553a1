use rust_decimal::Decimal;

use crate::models::holding::{Currency, Holding};
use crate::models::quote::QuoteBatch;
use crate::models::valuation::{PriceSource, ValuedHolding};

/// Values holdings in CAD.
///
/// Pure business logic: no I/O, no state.
pub struct ValuationService;

impl ValuationService {
    pub fn new() -> Self {
        Self
    }

    /// Value one holding.
    ///
    /// - `current_price`: latest price in the holding's currency, `None` when
    ///   no quote is available (the purchase price is used instead).
    /// - `fx_rate`: CAD per unit of foreign currency, applied to USD rows only.
    pub fn value_holding(
        &self,
        holding: &Holding,
        current_price: Option<Decimal>,
        fx_rate: Decimal,
    ) -> ValuedHolding {
        let fx_multiplier = match holding.currency {
            Currency::Cad => Decimal::ONE,
            Currency::Usd => fx_rate,
        };

        let cost_basis_cad = cad_amount(holding.purchase_price, holding.quantity, fx_multiplier)
            .unwrap_or(Decimal::MAX);

        // A live price too large to value is treated like a missing quote.
        let live = current_price.and_then(|price| {
            cad_amount(price, holding.quantity, fx_multiplier).map(|value| (price, value))
        });
        let (current_price, price_source, current_value_cad) = match live {
            Some((price, value)) => (price, PriceSource::Live, value),
            None => (
                holding.purchase_price,
                PriceSource::PurchasePriceFallback,
                cost_basis_cad,
            ),
        };

        ValuedHolding {
            holding: holding.clone(),
            current_price,
            price_source,
            fx_multiplier,
            current_value_cad,
            cost_basis_cad,
            unrealized_gain_cad: current_value_cad.saturating_sub(cost_basis_cad),
        }
    }

    /// Value every holding against one quote batch and one FX snapshot.
    /// Output order matches input order.
    pub fn value_all(
        &self,
        holdings: &[Holding],
        quotes: &QuoteBatch,
        fx_rate: Decimal,
    ) -> Vec<ValuedHolding> {
        holdings
            .iter()
            .map(|h| self.value_holding(h, quotes.price(&h.ticker), fx_rate))
            .collect()
    }
}

/// `price × quantity × fx`, or `None` when the product leaves `Decimal`'s range.
fn cad_amount(price: Decimal, quantity: Decimal, fx: Decimal) -> Option<Decimal> {
    price.checked_mul(quantity)?.checked_mul(fx)
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}
