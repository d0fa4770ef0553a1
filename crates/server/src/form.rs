//! The "Ajouter" form: raw submitted fields and their conversion to a `Holding`.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

use patrimoine_core::errors::CoreError;
use patrimoine_core::models::holding::{Account, AssetType, Currency, Holding, Platform};

pub const DEFAULT_OWNER: &str = "Moi";
pub const DEFAULT_TICKER: &str = "VFV.TO";

/// Smallest quantity the form accepts.
pub const MIN_QUANTITY: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Sheet cells hold `f64` numbers; beyond this many significant digits a
/// submitted amount would not read back unchanged.
pub const MAX_SIGNIFICANT_DIGITS: usize = 15;

/// Form fields exactly as submitted. Everything stays text so a rejected
/// submission can be echoed back unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct HoldingForm {
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub account: String,
    #[serde(default)]
    pub asset_type: String,
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub purchase_price: String,
    /// View the form was submitted from, to return to it afterwards
    #[serde(default)]
    pub view: Option<String>,
}

impl Default for HoldingForm {
    fn default() -> Self {
        Self {
            owner: DEFAULT_OWNER.to_string(),
            platform: Platform::ALL[0].label().to_string(),
            account: Account::ALL[0].label().to_string(),
            asset_type: AssetType::ALL[0].label().to_string(),
            ticker: DEFAULT_TICKER.to_string(),
            currency: Currency::ALL[0].label().to_string(),
            quantity: MIN_QUANTITY.to_string(),
            purchase_price: "0.00".to_string(),
            view: None,
        }
    }
}

impl HoldingForm {
    /// Validate the submission and build the row to append.
    ///
    /// A blank owner or ticker falls back to the form's default value.
    pub fn to_holding(&self) -> Result<Holding, CoreError> {
        let owner = non_blank_or(&self.owner, DEFAULT_OWNER);
        let ticker = non_blank_or(&self.ticker, DEFAULT_TICKER);

        let quantity = parse_amount("Qté", &self.quantity)?;
        if quantity < MIN_QUANTITY {
            return Err(CoreError::Validation(format!(
                "Qté must be at least {MIN_QUANTITY} (got {quantity})"
            )));
        }
        let purchase_price = parse_amount("Prix Achat", &self.purchase_price)?;

        Holding::new(
            owner,
            Platform::from_str(&self.platform)?,
            Account::from_str(&self.account)?,
            ticker,
            AssetType::from_str(&self.asset_type)?,
            quantity,
            purchase_price,
            Currency::from_str(&self.currency)?,
        )
    }
}

fn non_blank_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default
    } else {
        trimmed
    }
}

/// Parse a number typed by a person: "12.5", "12,5", " 1 200 ".
fn parse_amount(field: &str, raw: &str) -> Result<Decimal, CoreError> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    let value = Decimal::from_str(&cleaned)
        .map_err(|_| CoreError::Validation(format!("{field}: '{}' is not a number", raw.trim())))?;

    let digits = value.normalize().mantissa().unsigned_abs().to_string().len();
    if digits > MAX_SIGNIFICANT_DIGITS {
        return Err(CoreError::Validation(format!(
            "{field}: at most {MAX_SIGNIFICANT_DIGITS} significant digits (got {digits})"
        )));
    }
    Ok(value)
}
