//! Cache Statistics Module
//!
//! Tracks response cache effectiveness: hits, misses, writes and cleanups.

use serde::Serialize;

// == Cache Stats ==
/// Tracks response cache counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Number of lookups answered from the cache
    pub hits: u64,
    /// Number of lookups that found nothing usable
    pub misses: u64,
    /// Number of entries written to the store
    pub writes: u64,
    /// Number of writes the store rejected
    pub dropped_writes: u64,
    /// Number of stale or corrupt entries removed
    pub removed: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_write(&mut self) {
        self.writes += 1;
    }

    pub fn record_dropped_write(&mut self) {
        self.dropped_writes += 1;
    }

    // == Record Removal ==
    /// Adds `count` removed entries.
    pub fn record_removed(&mut self, count: usize) {
        self.removed += count as u64;
    }
}
