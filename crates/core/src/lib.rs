pub mod clock;
pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod store;

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::warn;

use clock::{Clock, SystemClock};
use errors::CoreError;
use models::{
    cache::TtlCache,
    dashboard::{DashboardContent, DashboardReport, DashboardView, DataWarning, OwnerFilter},
    holding::{Currency, Holding},
    settings::DashboardSettings,
};
use providers::registry::ProviderRegistry;
use services::{
    aggregation_service::AggregationService, fx_service::FxService,
    holdings_service::HoldingsService, quote_service::QuoteService,
    valuation_service::ValuationService,
};
use store::traits::{HoldingStore, HoldingsSheet};

/// Main entry point for the dashboard core.
///
/// Owns the holdings store (behind a TTL cache), the market-data providers
/// and the services that turn rows into a rendered view. Each call to
/// `render` is one linear load → value → aggregate pass.
#[must_use]
pub struct Dashboard {
    settings: DashboardSettings,
    holdings_service: HoldingsService,
    registry: ProviderRegistry,
    quote_service: QuoteService,
    fx_service: FxService,
    valuation_service: ValuationService,
    aggregation_service: AggregationService,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("store", &self.holdings_service.store().name())
            .field("settings", &self.settings)
            .field("quote_providers", &self.registry.quote_provider_names())
            .field("fx_providers", &self.registry.fx_provider_names())
            .finish()
    }
}

impl Dashboard {
    /// Build a dashboard over `store`, using the wall clock.
    pub fn new(
        store: Box<dyn HoldingStore>,
        registry: ProviderRegistry,
        settings: DashboardSettings,
    ) -> Self {
        Self::with_clock(store, registry, settings, Arc::new(SystemClock))
    }

    /// Build a dashboard with an explicit clock (cache expiry follows it).
    pub fn with_clock(
        store: Box<dyn HoldingStore>,
        registry: ProviderRegistry,
        settings: DashboardSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache = TtlCache::new(settings.cache_ttl);
        Self {
            holdings_service: HoldingsService::new(store, cache),
            registry,
            quote_service: QuoteService::new(),
            fx_service: FxService::new(settings.default_fx_rate),
            valuation_service: ValuationService::new(),
            aggregation_service: AggregationService::new(),
            clock,
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    // ── Views ───────────────────────────────────────────────────────

    /// Run one render pass for `filter`.
    ///
    /// Never fails: a store, quote or FX failure degrades the view and is
    /// reported in `DashboardView::warnings`.
    pub async fn render(&mut self, filter: &OwnerFilter) -> DashboardView {
        let mut warnings = Vec::new();

        let sheet = match self.holdings_service.load(self.clock.as_ref()).await {
            Ok((sheet, _)) => sheet,
            Err(e) => {
                warn!(error = %e, "holdings unavailable, showing empty dashboard");
                warnings.push(DataWarning::StoreUnavailable {
                    message: e.to_string(),
                });
                HoldingsSheet::default()
            }
        };

        warnings.extend(sheet.skipped.iter().map(|s| DataWarning::SkippedRow {
            row: s.row,
            message: s.message.clone(),
        }));

        let owners = self.aggregation_service.owners(&sheet.holdings);
        let visible = self.aggregation_service.filter(&sheet.holdings, filter);

        if visible.is_empty() {
            return DashboardView {
                filter: filter.clone(),
                owners,
                content: DashboardContent::Empty,
                warnings,
            };
        }

        let report = self.build_report(filter, &visible, &mut warnings).await;

        DashboardView {
            filter: filter.clone(),
            owners,
            content: DashboardContent::Populated(report),
            warnings,
        }
    }

    /// Owner choices for the selector, in order of first appearance.
    pub async fn owners(&mut self) -> Result<Vec<String>, CoreError> {
        let (sheet, _) = self.holdings_service.load(self.clock.as_ref()).await?;
        Ok(self.aggregation_service.owners(&sheet.holdings))
    }

    // ── Holdings ────────────────────────────────────────────────────

    /// Append a holding to the store. On success the cached rows are
    /// invalidated so the next render re-reads the sheet.
    pub async fn add_holding(&mut self, holding: Holding) -> Result<(), CoreError> {
        self.holdings_service.append(&holding).await
    }

    /// Read every holding straight from the store, bypassing the cache.
    pub async fn fetch_fresh(&mut self) -> Result<Vec<Holding>, CoreError> {
        let sheet = self.holdings_service.reload(self.clock.as_ref()).await?;
        Ok(sheet.holdings)
    }

    // ── Cache Management ────────────────────────────────────────────

    /// Drop the cached rows; the next render goes to the store.
    pub fn invalidate_cache(&mut self) {
        self.holdings_service.invalidate();
    }

    /// Number of times the holdings cache has been invalidated.
    #[must_use]
    pub fn cache_invalidations(&self) -> u64 {
        self.holdings_service.cache().invalidation_count()
    }

    // ── Internal ────────────────────────────────────────────────────

    async fn build_report(
        &self,
        filter: &OwnerFilter,
        visible: &[Holding],
        warnings: &mut Vec<DataWarning>,
    ) -> DashboardReport {
        let tickers: BTreeSet<String> = visible.iter().map(|h| h.ticker.clone()).collect();
        let quotes = self
            .quote_service
            .fetch_quotes(&self.registry, &tickers)
            .await;
        warnings.extend(quotes.failures.iter().map(|(ticker, message)| {
            DataWarning::QuoteUnavailable {
                ticker: ticker.clone(),
                message: message.clone(),
            }
        }));

        let fx = self
            .fx_service
            .current_rate(&self.registry, self.settings.fx_pair)
            .await;
        let converts = visible.iter().any(|h| h.currency != Currency::Cad);
        if fx.is_fallback() && converts {
            warnings.push(DataWarning::FxFallback {
                pair: fx.pair.to_string(),
                rate: fx.rate,
            });
        }

        let rows = self.valuation_service.value_all(visible, &quotes, fx.rate);

        DashboardReport {
            filter: filter.clone(),
            metrics: self.aggregation_service.summary_metrics(&rows),
            by_account: self.aggregation_service.allocation_by_account(&rows),
            by_platform: self.aggregation_service.allocation_by_platform(&rows),
            fx,
            rows,
        }
    }
}
