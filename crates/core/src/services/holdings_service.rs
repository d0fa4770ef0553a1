use tracing::{debug, info};

use crate::clock::Clock;
use crate::errors::CoreError;
use crate::models::cache::TtlCache;
use crate::models::holding::Holding;
use crate::store::traits::{HoldingStore, HoldingsSheet};

/// Whether a load was served from the cache or went to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    Cache,
    Store,
}

/// Reads and appends holdings through a store, keeping a TTL copy of the
/// last successful read.
///
/// Failed reads are never cached: the next request tries the store again.
/// A successful append invalidates the cached copy exactly once.
pub struct HoldingsService {
    store: Box<dyn HoldingStore>,
    cache: TtlCache<HoldingsSheet>,
}

impl HoldingsService {
    pub fn new(store: Box<dyn HoldingStore>, cache: TtlCache<HoldingsSheet>) -> Self {
        Self { store, cache }
    }

    pub fn store(&self) -> &dyn HoldingStore {
        self.store.as_ref()
    }

    pub fn cache(&self) -> &TtlCache<HoldingsSheet> {
        &self.cache
    }

    /// Every holding, from the cache while fresh, otherwise from the store.
    pub async fn load(&mut self, clock: &dyn Clock) -> Result<(HoldingsSheet, LoadOrigin), CoreError> {
        let now = clock.now();
        if let Some(sheet) = self.cache.get(now) {
            return Ok((sheet, LoadOrigin::Cache));
        }

        let sheet = self.store.fetch_all().await?;
        debug!(store = self.store.name(), rows = sheet.holdings.len(), "holdings fetched");
        self.cache.put(sheet.clone(), now);
        Ok((sheet, LoadOrigin::Store))
    }

    /// Read straight from the store, ignoring and then refreshing the cache.
    pub async fn reload(&mut self, clock: &dyn Clock) -> Result<HoldingsSheet, CoreError> {
        let sheet = self.store.fetch_all().await?;
        self.cache.put(sheet.clone(), clock.now());
        Ok(sheet)
    }

    /// Validate and append one holding, then drop the cached copy.
    pub async fn append(&mut self, holding: &Holding) -> Result<(), CoreError> {
        holding.validate()?;
        self.store.append(holding).await?;
        self.cache.invalidate();
        info!(
            store = self.store.name(),
            owner = %holding.owner,
            ticker = %holding.ticker,
            "holding saved, cache invalidated"
        );
        Ok(())
    }

    /// Force the next `load` to go to the store.
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }
}
