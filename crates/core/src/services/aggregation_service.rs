use rust_decimal::Decimal;

use crate::models::dashboard::{
    AccountAllocation, AllocationSlice, OwnerFilter, PlatformAllocation, SummaryMetrics,
};
use crate::models::holding::Holding;
use crate::models::valuation::ValuedHolding;

/// Filters holdings and turns valued rows into dashboard aggregates.
///
/// Groups keep the order in which they first appear in the data; no other
/// sorting is applied.
pub struct AggregationService;

impl AggregationService {
    pub fn new() -> Self {
        Self
    }

    /// Distinct owners in order of first appearance.
    pub fn owners(&self, holdings: &[Holding]) -> Vec<String> {
        let mut owners: Vec<String> = Vec::new();
        for holding in holdings {
            if !owners.iter().any(|o| o == &holding.owner) {
                owners.push(holding.owner.clone());
            }
        }
        owners
    }

    /// Rows visible under `filter`, in source order.
    pub fn filter(&self, holdings: &[Holding], filter: &OwnerFilter) -> Vec<Holding> {
        holdings
            .iter()
            .filter(|h| filter.matches(&h.owner))
            .cloned()
            .collect()
    }

    pub fn summary_metrics(&self, rows: &[ValuedHolding]) -> SummaryMetrics {
        SummaryMetrics {
            total_value_cad: Self::sum(rows.iter().map(|r| r.current_value_cad)),
            total_gain_cad: Self::sum(rows.iter().map(|r| r.unrealized_gain_cad)),
            row_count: rows.len(),
        }
    }

    /// Account → ticker breakdown weighted by current value.
    ///
    /// Rows with the same ticker in the same account are merged. Every share
    /// is relative to the total of the whole view.
    pub fn allocation_by_account(&self, rows: &[ValuedHolding]) -> Vec<AccountAllocation> {
        let total = Self::total(rows);
        let mut accounts: Vec<AccountAllocation> = Vec::new();

        for row in rows {
            let value = row.current_value_cad;
            let idx = match accounts
                .iter()
                .position(|a| a.account == row.holding.account)
            {
                Some(idx) => idx,
                None => {
                    accounts.push(AccountAllocation {
                        account: row.holding.account,
                        value_cad: Decimal::ZERO,
                        share: Decimal::ZERO,
                        tickers: Vec::new(),
                    });
                    accounts.len() - 1
                }
            };

            let account = &mut accounts[idx];
            account.value_cad = account.value_cad.saturating_add(value);
            match account
                .tickers
                .iter_mut()
                .find(|t| t.label == row.holding.ticker)
            {
                Some(slice) => slice.value_cad = slice.value_cad.saturating_add(value),
                None => account.tickers.push(AllocationSlice {
                    label: row.holding.ticker.clone(),
                    value_cad: value,
                    share: Decimal::ZERO,
                }),
            }
        }

        for account in &mut accounts {
            account.share = Self::share(account.value_cad, total);
            for slice in &mut account.tickers {
                slice.share = Self::share(slice.value_cad, total);
            }
        }

        accounts
    }

    /// Platform breakdown weighted by current value.
    pub fn allocation_by_platform(&self, rows: &[ValuedHolding]) -> Vec<PlatformAllocation> {
        let total = Self::total(rows);
        let mut platforms: Vec<PlatformAllocation> = Vec::new();

        for row in rows {
            match platforms
                .iter_mut()
                .find(|p| p.platform == row.holding.platform)
            {
                Some(p) => p.value_cad = p.value_cad.saturating_add(row.current_value_cad),
                None => platforms.push(PlatformAllocation {
                    platform: row.holding.platform,
                    value_cad: row.current_value_cad,
                    share: Decimal::ZERO,
                }),
            }
        }

        for p in &mut platforms {
            p.share = Self::share(p.value_cad, total);
        }

        platforms
    }

    fn total(rows: &[ValuedHolding]) -> Decimal {
        Self::sum(rows.iter().map(|r| r.current_value_cad))
    }

    /// Sum that clamps at `Decimal::MAX` / `Decimal::MIN` instead of panicking.
    fn sum(values: impl Iterator<Item = Decimal>) -> Decimal {
        values.fold(Decimal::ZERO, Decimal::saturating_add)
    }

    fn share(value: Decimal, total: Decimal) -> Decimal {
        if total > Decimal::ZERO {
            value.checked_div(total).unwrap_or(Decimal::ZERO)
        } else {
            Decimal::ZERO
        }
    }
}

impl Default for AggregationService {
    fn default() -> Self {
        Self::new()
    }
}
