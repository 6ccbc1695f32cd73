//! Response DTOs for the planner API
//!
//! Defines the structure of outgoing HTTP response bodies. Plans and saved
//! plans are returned as their domain types.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::planner::{DestinationSuggestion, PackingListCategory};

/// Response body for POST /suggestions and /suggestions/off-beat
#[derive(Debug, Clone, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<DestinationSuggestion>,
}

impl SuggestionsResponse {
    pub fn new(suggestions: Vec<DestinationSuggestion>) -> Self {
        Self { suggestions }
    }
}

/// Response body for POST /plans/packing-list
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackingListResponse {
    pub packing_list: Vec<PackingListCategory>,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    pub writes: u64,
    /// Writes the store rejected
    pub dropped_writes: u64,
    /// Stale or corrupt entries removed
    pub removed: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            writes: stats.writes,
            dropped_writes: stats.dropped_writes,
            removed: stats.removed,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
