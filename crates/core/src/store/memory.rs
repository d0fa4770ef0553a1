use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

use super::traits::{HoldingStore, HoldingsSheet};
use crate::errors::CoreError;
use crate::models::holding::Holding;

/// Holdings kept in process memory, in append order.
///
/// Backs the server's demo mode and the tests. Reads and writes can be made
/// to fail on demand to exercise degraded paths.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    rows: Mutex<Vec<Holding>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    reads: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_holdings(holdings: Vec<Holding>) -> Self {
        Self {
            rows: Mutex::new(holdings),
            ..Self::default()
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of `fetch_all` calls served so far, failed ones included.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }
}

#[async_trait]
impl HoldingStore for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn fetch_all(&self) -> Result<HoldingsSheet, CoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CoreError::Store("in-memory store set to fail reads".into()));
        }
        Ok(HoldingsSheet::from_holdings(self.rows.lock().await.clone()))
    }

    async fn append(&self, holding: &Holding) -> Result<(), CoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::Store("in-memory store set to fail writes".into()));
        }
        self.rows.lock().await.push(holding.clone());
        Ok(())
    }
}
