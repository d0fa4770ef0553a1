use std::sync::Arc;
use tracing::warn;

use super::frankfurter::FrankfurterProvider;
use super::traits::{FxProvider, QuoteProvider};
use super::yahoo_finance::YahooFinanceProvider;

/// Ordered lists of market-data providers.
///
/// Registration order is priority order: services ask the first provider,
/// then fall back to the next one for whatever is still missing.
pub struct ProviderRegistry {
    quote_providers: Vec<Arc<dyn QuoteProvider>>,
    fx_providers: Vec<Arc<dyn FxProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            quote_providers: Vec::new(),
            fx_providers: Vec::new(),
        }
    }

    /// Create a registry with the default providers pre-configured.
    ///
    /// Yahoo Finance answers quotes and FX; Frankfurter backs up FX.
    pub fn new_with_defaults() -> Self {
        let mut registry = Self::new();

        match YahooFinanceProvider::new() {
            Ok(yahoo) => {
                let yahoo = Arc::new(yahoo);
                registry.register_quote(yahoo.clone());
                registry.register_fx(yahoo);
            }
            Err(e) => warn!(error = %e, "Yahoo Finance unavailable, live quotes disabled"),
        }

        registry.register_fx(Arc::new(FrankfurterProvider::new()));

        registry
    }

    /// Register a quote provider at the lowest priority.
    pub fn register_quote(&mut self, provider: Arc<dyn QuoteProvider>) {
        self.quote_providers.push(provider);
    }

    /// Register an FX provider at the lowest priority.
    pub fn register_fx(&mut self, provider: Arc<dyn FxProvider>) {
        self.fx_providers.push(provider);
    }

    pub fn quote_providers(&self) -> impl Iterator<Item = &dyn QuoteProvider> {
        self.quote_providers.iter().map(|p| p.as_ref())
    }

    pub fn fx_providers(&self) -> impl Iterator<Item = &dyn FxProvider> {
        self.fx_providers.iter().map(|p| p.as_ref())
    }

    pub fn quote_provider_names(&self) -> Vec<String> {
        self.quote_providers().map(|p| p.name().to_string()).collect()
    }

    pub fn fx_provider_names(&self) -> Vec<String> {
        self.fx_providers().map(|p| p.name().to_string()).collect()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
