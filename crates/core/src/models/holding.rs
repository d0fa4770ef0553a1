use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

/// Generates a closed choice list whose sheet label is also its display form.
///
/// Each enum gets `ALL`, `label()`, `Display` and a `FromStr` that accepts the
/// label case-insensitively.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $what:literal { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every choice, in form order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The label stored in the spreadsheet and shown in the form.
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|c| c.label().eq_ignore_ascii_case(trimmed))
                    .ok_or_else(|| {
                        CoreError::Validation(format!("Unknown {} '{trimmed}'", $what))
                    })
            }
        }
    };
}

choice_enum! {
    /// Brokerage holding the position.
    Platform, "platform" {
        Wealthsimple => "Wealthsimple",
        Disnat => "Disnat",
        Questrade => "Questrade",
        Bncd => "BNCD",
        CryptoCom => "Crypto.com",
    }
}

choice_enum! {
    /// Tax wrapper of the account (Canadian registered account types).
    Account, "account" {
        Celi => "CELI",
        Reer => "REER",
        Celiapp => "CELIAPP",
        Cash => "Cash",
        Crypto => "Crypto",
    }
}

choice_enum! {
    /// Category of the held instrument.
    AssetType, "asset type" {
        Fund => "ETF",
        Equity => "Action",
        Crypto => "Crypto",
    }
}

choice_enum! {
    /// Quote currency of a holding. CAD is the reporting currency.
    Currency, "currency" {
        Cad => "CAD",
        Usd => "USD",
    }
}

/// Largest quantity or unit price a row may carry. Keeps every CAD
/// product and portfolio total well inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// One row of the holdings sheet: an owned quantity of one ticker in one
/// account on one platform.
///
/// Field order is the sheet's column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    pub owner: String,
    pub platform: Platform,
    pub account: Account,
    /// Uppercased market symbol (e.g., "VFV.TO", "AAPL", "BTC-CAD")
    pub ticker: String,
    pub asset_type: AssetType,
    pub quantity: Decimal,
    /// Unit purchase price, expressed in `currency`
    pub purchase_price: Decimal,
    pub currency: Currency,
}

impl Holding {
    /// Build a holding, normalizing owner/ticker and enforcing the row invariants.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        owner: impl Into<String>,
        platform: Platform,
        account: Account,
        ticker: impl Into<String>,
        asset_type: AssetType,
        quantity: Decimal,
        purchase_price: Decimal,
        currency: Currency,
    ) -> Result<Self, CoreError> {
        let holding = Self {
            owner: owner.into().trim().to_string(),
            platform,
            account,
            ticker: ticker.into().trim().to_uppercase(),
            asset_type,
            quantity,
            purchase_price,
            currency,
        };
        holding.validate()?;
        Ok(holding)
    }

    /// Check the invariants every stored row must satisfy.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.owner.trim().is_empty() {
            return Err(CoreError::Validation("Owner must not be empty".into()));
        }
        if self.ticker.trim().is_empty() {
            return Err(CoreError::Validation("Ticker must not be empty".into()));
        }
        if self.ticker != self.ticker.to_uppercase() {
            return Err(CoreError::Validation(format!(
                "Ticker '{}' must be uppercase",
                self.ticker
            )));
        }
        if self.quantity <= Decimal::ZERO {
            return Err(CoreError::Validation(format!(
                "Quantity must be positive (got {})",
                self.quantity
            )));
        }
        if self.purchase_price < Decimal::ZERO {
            return Err(CoreError::Validation(format!(
                "Purchase price must not be negative (got {})",
                self.purchase_price
            )));
        }
        if self.quantity > MAX_AMOUNT || self.purchase_price > MAX_AMOUNT {
            return Err(CoreError::Validation(format!(
                "Quantity and purchase price must not exceed {MAX_AMOUNT}"
            )));
        }
        Ok(())
    }
}
