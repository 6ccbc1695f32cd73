//! Response Cache Module
//!
//! TTL-bounded cache of generated responses, namespaced inside a shared
//! [`KeyValueStore`]. Every failure degrades to a miss or a skipped write.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{
    current_timestamp_ms, CacheEntry, CacheStats, KeyValueStore, CACHE_KEY_PREFIX, DEFAULT_TTL,
};

/// Source of the current time in Unix milliseconds.
pub type Clock = Arc<dyn Fn() -> u64 + Send + Sync>;

// == Response Cache ==
/// Response cache over a shared persistent store.
pub struct ResponseCache<S> {
    store: S,
    prefix: String,
    ttl_ms: u64,
    clock: Clock,
    stats: CacheStats,
}

impl<S> fmt::Debug for ResponseCache<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseCache")
            .field("prefix", &self.prefix)
            .field("ttl_ms", &self.ttl_ms)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<S: KeyValueStore> ResponseCache<S> {
    // == Constructor ==
    /// Creates a cache over `store` with the default prefix and TTL.
    pub fn new(store: S) -> Self {
        Self {
            store,
            prefix: CACHE_KEY_PREFIX.to_string(),
            ttl_ms: DEFAULT_TTL.as_millis() as u64,
            clock: Arc::new(current_timestamp_ms),
            stats: CacheStats::new(),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_ms = ttl.as_millis() as u64;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Returns the full store key for a logical cache key.
    pub fn namespaced_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    // == Get ==
    /// Returns the cached value for `key`, if present and fresh.
    ///
    /// Stale and unparsable entries are removed before the miss is reported.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        let full_key = self.namespaced_key(key);
        let Some(raw) = self.store.get_item(&full_key) else {
            self.stats.record_miss();
            debug!("Cache miss: {}", key);
            return None;
        };

        let now = (self.clock)();
        match CacheEntry::decode(&raw) {
            Some(entry) if !entry.is_stale(now, self.ttl_ms) => {
                self.stats.record_hit();
                debug!("Cache hit: {} (age {} ms)", key, entry.age_ms(now));
                Some(entry.data)
            }
            Some(_) => {
                debug!("Cache entry stale: {}", key);
                if self.discard(&full_key) {
                    self.stats.record_removed(1);
                }
                self.stats.record_miss();
                None
            }
            None => {
                warn!("Discarding corrupt cache entry: {}", key);
                if self.discard(&full_key) {
                    self.stats.record_removed(1);
                }
                self.stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Stores `value` under `key`, stamped with the current time.
    ///
    /// Store failures are logged and swallowed.
    pub fn set(&mut self, key: &str, value: Value) {
        let entry = CacheEntry::new(value, (self.clock)());
        let raw = match entry.encode() {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to encode cache entry {}: {}", key, e);
                self.stats.record_dropped_write();
                return;
            }
        };

        match self.store.set_item(&self.namespaced_key(key), &raw) {
            Ok(()) => {
                self.stats.record_write();
                debug!("Cached response: {}", key);
            }
            Err(e) => {
                warn!("Failed to write cache entry {}: {}", key, e);
                self.stats.record_dropped_write();
            }
        }
    }

    // == Sweep ==
    /// Removes every stale or corrupt entry under the cache prefix.
    ///
    /// Keys outside the prefix are never read. Returns the number of entries
    /// removed.
    pub fn sweep(&mut self) -> usize {
        let now = (self.clock)();
        let expired: Vec<String> = self
            .store
            .keys()
            .into_iter()
            .filter(|full_key| full_key.starts_with(&self.prefix))
            .filter(|full_key| match self.store.get_item(full_key) {
                Some(raw) => match CacheEntry::decode(&raw) {
                    Some(entry) => entry.is_stale(now, self.ttl_ms),
                    None => true,
                },
                None => false,
            })
            .collect();
        if expired.is_empty() {
            return 0;
        }

        // One batched removal, so file-backed stores rewrite once per sweep
        match self.store.remove_items(&expired) {
            Ok(()) => {
                self.stats.record_removed(expired.len());
                expired.len()
            }
            Err(e) => {
                warn!("Failed to remove {} stale cache entries: {}", expired.len(), e);
                0
            }
        }
    }

    // == Stats ==
    /// Returns a snapshot of the cache counters.
    pub fn stats(&self) -> CacheStats {
        self.stats.clone()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Removes a store key, logging instead of failing.
    fn discard(&mut self, full_key: &str) -> bool {
        match self.store.remove_item(full_key) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to remove cache entry {}: {}", full_key, e);
                false
            }
        }
    }
}
