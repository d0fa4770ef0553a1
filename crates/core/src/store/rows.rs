//! Positional mapping between sheet rows and `Holding`.
//!
//! Column layout (header row first):
//! `Membre | Plateforme | Compte | Ticker | Type | Quantité | Prix_Achat | Devise`

use rust_decimal::Decimal;
use serde_json::{Number, Value};
use std::str::FromStr;

use super::traits::{HoldingsSheet, SkippedRow};
use crate::errors::CoreError;
use crate::models::holding::{Account, AssetType, Currency, Holding, Platform};

/// Header labels, in column order.
pub const HEADER: [&str; 8] = [
    "Membre",
    "Plateforme",
    "Compte",
    "Ticker",
    "Type",
    "Quantité",
    "Prix_Achat",
    "Devise",
];

pub const COLUMN_COUNT: usize = HEADER.len();

/// Parse every data row of a sheet. The first row is the header.
///
/// Blank rows are ignored; rows that fail to parse are reported in
/// `HoldingsSheet::skipped` and left out.
pub fn parse_sheet(values: &[Vec<Value>]) -> HoldingsSheet {
    let mut sheet = HoldingsSheet::default();

    for (idx, cells) in values.iter().enumerate().skip(1) {
        let row = idx + 1;
        if cells.iter().all(is_blank) {
            continue;
        }
        match parse_row(row, cells) {
            Ok(holding) => sheet.holdings.push(holding),
            Err(e) => sheet.skipped.push(SkippedRow {
                row,
                message: e.to_string(),
            }),
        }
    }

    sheet
}

/// Parse one data row. `row` is only used in error messages.
pub fn parse_row(row: usize, cells: &[Value]) -> Result<Holding, CoreError> {
    if cells.len() < COLUMN_COUNT {
        return Err(CoreError::RowParse {
            row,
            message: format!("expected {COLUMN_COUNT} columns, found {}", cells.len()),
        });
    }

    let field_err = |column: usize, e: CoreError| CoreError::RowParse {
        row,
        message: format!("{}: {}", HEADER[column], e),
    };

    let owner = text(&cells[0]);
    let platform = Platform::from_str(&text(&cells[1])).map_err(|e| field_err(1, e))?;
    let account = Account::from_str(&text(&cells[2])).map_err(|e| field_err(2, e))?;
    let ticker = text(&cells[3]);
    let asset_type = AssetType::from_str(&text(&cells[4])).map_err(|e| field_err(4, e))?;
    let quantity = decimal(&cells[5]).map_err(|e| field_err(5, e))?;
    let purchase_price = decimal(&cells[6]).map_err(|e| field_err(6, e))?;
    let currency = Currency::from_str(&text(&cells[7])).map_err(|e| field_err(7, e))?;

    Holding::new(
        owner,
        platform,
        account,
        ticker,
        asset_type,
        quantity,
        purchase_price,
        currency,
    )
    .map_err(|e| CoreError::RowParse {
        row,
        message: e.to_string(),
    })
}

/// Positional cells for an append, numbers kept numeric.
pub fn to_row(holding: &Holding) -> Result<Vec<Value>, CoreError> {
    Ok(vec![
        Value::String(holding.owner.clone()),
        Value::String(holding.platform.label().to_string()),
        Value::String(holding.account.label().to_string()),
        Value::String(holding.ticker.clone()),
        Value::String(holding.asset_type.label().to_string()),
        Value::Number(number(holding.quantity)?),
        Value::Number(number(holding.purchase_price)?),
        Value::String(holding.currency.label().to_string()),
    ])
}

/// Cells are written as JSON numbers, which the API reads as `f64`: only
/// amounts with at most 15 significant digits come back unchanged.
fn number(d: Decimal) -> Result<Number, CoreError> {
    Number::from_str(&d.normalize().to_string())
        .map_err(|e| CoreError::Validation(format!("Cannot write {d} as a number: {e}")))
}

fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn text(v: &Value) -> String {
    match v {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Accepts JSON numbers and numeric strings ("12.5", "12,5", "1 200").
fn decimal(v: &Value) -> Result<Decimal, CoreError> {
    let raw = match v {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '\u{a0}' && *c != '\u{202f}')
            .map(|c| if c == ',' { '.' } else { c })
            .collect(),
        other => {
            return Err(CoreError::Validation(format!("expected a number, got {other}")));
        }
    };

    if raw.is_empty() {
        return Err(CoreError::Validation("missing number".into()));
    }

    let parsed = if raw.contains(['e', 'E']) {
        Decimal::from_scientific(&raw)
    } else {
        Decimal::from_str(&raw)
    };
    parsed.map_err(|e| CoreError::Validation(format!("'{raw}' is not a number: {e}")))
}
