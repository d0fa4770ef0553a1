use chrono::{DateTime, Utc};
use std::time::Duration;

/// A single cached value that expires a fixed time after it was stored.
///
/// The cache never reads the clock itself: callers pass `now`, which keeps
/// expiry testable. Invalidation drops the value as a whole.
#[derive(Debug, Clone)]
pub struct TtlCache<T> {
    ttl: Duration,
    entry: Option<CacheEntry<T>>,
    invalidations: u64,
}

#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    stored_at: DateTime<Utc>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: None,
            invalidations: 0,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached value if it is still fresh at `now`.
    pub fn get(&self, now: DateTime<Utc>) -> Option<T> {
        let entry = self.entry.as_ref()?;
        if Self::is_fresh(entry.stored_at, now, self.ttl) {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Store `value` as fetched at `now`, replacing any previous value.
    pub fn put(&mut self, value: T, now: DateTime<Utc>) {
        self.entry = Some(CacheEntry {
            value,
            stored_at: now,
        });
    }

    /// Drop the cached value so the next read goes to the source.
    pub fn invalidate(&mut self) {
        self.entry = None;
        self.invalidations += 1;
    }

    /// Number of `invalidate()` calls since creation.
    pub fn invalidation_count(&self) -> u64 {
        self.invalidations
    }

    /// When the current value was stored, fresh or not.
    pub fn stored_at(&self) -> Option<DateTime<Utc>> {
        self.entry.as_ref().map(|e| e.stored_at)
    }

    fn is_fresh(stored_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
        // A clock that moved backwards yields a negative age: treat as stale.
        match (now - stored_at).to_std() {
            Ok(age) => age < ttl,
            Err(_) => false,
        }
    }
}
