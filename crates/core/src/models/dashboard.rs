use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::holding::{Account, Platform};
use super::valuation::{FxRate, ValuedHolding};

/// Label of the aggregate "every owner" view.
pub const ALL_OWNERS_LABEL: &str = "Vue Famille";

/// Which owner's rows a render pass shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OwnerFilter {
    /// Every row, regardless of owner.
    #[default]
    All,
    /// Only rows whose owner equals this name exactly.
    Owner(String),
}

impl OwnerFilter {
    /// Parse a selector value; empty or the aggregate label means `All`.
    pub fn from_selection(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => OwnerFilter::All,
            Some(v) if v == ALL_OWNERS_LABEL => OwnerFilter::All,
            Some(v) => OwnerFilter::Owner(v.to_string()),
        }
    }

    pub fn matches(&self, owner: &str) -> bool {
        match self {
            OwnerFilter::All => true,
            OwnerFilter::Owner(name) => name == owner,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            OwnerFilter::All => ALL_OWNERS_LABEL,
            OwnerFilter::Owner(name) => name,
        }
    }
}

impl fmt::Display for OwnerFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The three headline numbers of a view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    pub total_value_cad: Decimal,
    pub total_gain_cad: Decimal,
    pub row_count: usize,
}

/// One labelled share of a total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationSlice {
    pub label: String,
    pub value_cad: Decimal,
    /// value_cad / total of the whole view, in [0, 1]
    pub share: Decimal,
}

/// First ring of the account → ticker breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountAllocation {
    pub account: Account,
    pub value_cad: Decimal,
    pub share: Decimal,
    /// Tickers held in this account; shares are relative to the whole view
    pub tickers: Vec<AllocationSlice>,
}

/// Share of the view held on one platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformAllocation {
    pub platform: Platform,
    pub value_cad: Decimal,
    pub share: Decimal,
}

/// Something in the view is not what the user would assume it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataWarning {
    /// Reading the spreadsheet failed; the view is empty because of it.
    StoreUnavailable { message: String },
    /// A sheet row could not be parsed and was left out.
    SkippedRow { row: usize, message: String },
    /// No quote for this ticker; its rows use the purchase price.
    QuoteUnavailable { ticker: String, message: String },
    /// No FX provider answered; the default rate was applied.
    FxFallback { pair: String, rate: Decimal },
}

impl fmt::Display for DataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataWarning::StoreUnavailable { message } => {
                write!(f, "Holdings sheet unavailable: {message}")
            }
            DataWarning::SkippedRow { row, message } => {
                write!(f, "Row {row} skipped: {message}")
            }
            DataWarning::QuoteUnavailable { ticker, message } => {
                write!(f, "No live price for {ticker}, purchase price used ({message})")
            }
            DataWarning::FxFallback { pair, rate } => {
                write!(f, "No live {pair} rate, default {rate} used")
            }
        }
    }
}

/// Everything the populated dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub filter: OwnerFilter,
    pub fx: FxRate,
    pub metrics: SummaryMetrics,
    pub by_account: Vec<AccountAllocation>,
    pub by_platform: Vec<PlatformAllocation>,
    /// Table rows, in sheet order
    pub rows: Vec<ValuedHolding>,
}

/// Result of one render pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DashboardContent {
    /// Nothing to show: prompt the user to add a first holding.
    Empty,
    Populated(DashboardReport),
}

/// A rendered view plus the context needed to draw the page around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub filter: OwnerFilter,
    /// Owner choices for the selector, in order of first appearance
    pub owners: Vec<String>,
    pub content: DashboardContent,
    pub warnings: Vec<DataWarning>,
}

impl DashboardView {
    pub fn is_empty(&self) -> bool {
        matches!(self.content, DashboardContent::Empty)
    }

    pub fn report(&self) -> Option<&DashboardReport> {
        match &self.content {
            DashboardContent::Populated(report) => Some(report),
            DashboardContent::Empty => None,
        }
    }
}
