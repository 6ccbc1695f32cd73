//! Cache Entry Module
//!
//! Defines the timestamped envelope stored for every cached response.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Cache Entry ==
/// A cached response together with the moment it was written.
///
/// Serialized as `{"data": ..., "timestamp": ...}` into the persistent store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The cached JSON document
    pub data: Value,
    /// Write timestamp (Unix milliseconds)
    pub timestamp: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry stamped with the given time.
    pub fn new(data: Value, timestamp: u64) -> Self {
        Self { data, timestamp }
    }

    // == Is Stale ==
    /// Checks whether the entry has outlived the TTL.
    ///
    /// Boundary condition: an entry aged exactly `ttl_ms` is still valid; it
    /// becomes stale one millisecond later. A timestamp in the future counts
    /// as age zero.
    pub fn is_stale(&self, now: u64, ttl_ms: u64) -> bool {
        now.saturating_sub(self.timestamp) > ttl_ms
    }

    // == Age ==
    /// Returns the entry's age in milliseconds at `now`.
    pub fn age_ms(&self, now: u64) -> u64 {
        now.saturating_sub(self.timestamp)
    }

    // == Encoding ==
    /// Parses an entry from its stored JSON text.
    pub fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    /// Encodes the entry as stored JSON text.
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
