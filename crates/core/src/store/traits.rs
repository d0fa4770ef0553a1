use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::models::holding::Holding;

/// A sheet row that was present but could not be turned into a `Holding`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// 1-based row number as shown in the spreadsheet (header is row 1)
    pub row: usize,
    pub message: String,
}

/// Everything read from the store in one `fetch_all`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingsSheet {
    /// Parsed rows, in sheet order
    pub holdings: Vec<Holding>,
    pub skipped: Vec<SkippedRow>,
}

impl HoldingsSheet {
    pub fn from_holdings(holdings: Vec<Holding>) -> Self {
        Self {
            holdings,
            skipped: Vec::new(),
        }
    }
}

/// The external table of holdings.
///
/// Column order is field order (see `Holding`); the store owns no schema
/// beyond that. Rows are only ever appended.
#[async_trait]
pub trait HoldingStore: Send + Sync {
    /// Human-readable name of the backend (for logs).
    fn name(&self) -> &str;

    /// Read every row. An empty sheet is `Ok` with no holdings.
    async fn fetch_all(&self) -> Result<HoldingsSheet, CoreError>;

    /// Add one row at the end of the table.
    async fn append(&self, holding: &Holding) -> Result<(), CoreError>;
}

#[async_trait]
impl<S: HoldingStore + ?Sized> HoldingStore for std::sync::Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn fetch_all(&self) -> Result<HoldingsSheet, CoreError> {
        (**self).fetch_all().await
    }

    async fn append(&self, holding: &Holding) -> Result<(), CoreError> {
        (**self).append(holding).await
    }
}
