//! Cache Module
//!
//! Persistent response caching with TTL expiry and sweep invalidation.

mod entry;
mod response;
mod stats;
mod store;


use std::time::Duration;

// Re-export public types
pub use entry::{current_timestamp_ms, CacheEntry};
pub use response::{Clock, ResponseCache};
pub use stats::CacheStats;
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreError};

// == Public Constants ==
/// Prefix reserving the cache's keys inside the shared store
pub const CACHE_KEY_PREFIX: &str = "trip-planner-cache:";

/// Default lifetime of a cached response
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Default byte quota for the persistent store
pub const DEFAULT_STORE_CAPACITY: usize = 5 * 1024 * 1024;

/// Response cache shared between the planner and background tasks.
pub type SharedCache = std::sync::Arc<tokio::sync::Mutex<ResponseCache<Box<dyn KeyValueStore>>>>;
