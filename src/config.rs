//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::cache::{DEFAULT_STORE_CAPACITY, DEFAULT_TTL};
use crate::provider::DEFAULT_GEMINI_MODEL;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Generative model API key
    pub api_key: Option<String>,
    /// Generative model name
    pub model: String,
    /// File backing the response cache
    pub cache_path: PathBuf,
    /// Cached response lifetime in seconds
    pub cache_ttl: u64,
    /// Byte quota for the cache file
    pub cache_capacity_bytes: usize,
    /// Background sweep interval in seconds; 0 disables it
    pub cache_sweep_interval: u64,
}

fn parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn non_blank(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `GEMINI_API_KEY` or `API_KEY` - Generative model API key
    /// - `GEMINI_MODEL` - Model name (default: gemini-2.5-flash)
    /// - `CACHE_PATH` - Cache file (default: .trip_planner_cache.json)
    /// - `CACHE_TTL` - Response lifetime in seconds (default: 3600)
    /// - `CACHE_CAPACITY_BYTES` - Cache file quota (default: 5 MiB)
    /// - `CACHE_SWEEP_INTERVAL` - Sweep frequency in seconds (default: 600)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parsed("SERVER_PORT").unwrap_or(defaults.server_port),
            api_key: non_blank("GEMINI_API_KEY").or_else(|| non_blank("API_KEY")),
            model: non_blank("GEMINI_MODEL").unwrap_or(defaults.model),
            cache_path: non_blank("CACHE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_path),
            cache_ttl: parsed("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            cache_capacity_bytes: parsed("CACHE_CAPACITY_BYTES")
                .unwrap_or(defaults.cache_capacity_bytes),
            cache_sweep_interval: parsed("CACHE_SWEEP_INTERVAL")
                .unwrap_or(defaults.cache_sweep_interval),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            cache_path: PathBuf::from(".trip_planner_cache.json"),
            cache_ttl: DEFAULT_TTL.as_secs(),
            cache_capacity_bytes: DEFAULT_STORE_CAPACITY,
            cache_sweep_interval: 600,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server_port", &self.server_port)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("cache_path", &self.cache_path)
            .field("cache_ttl", &self.cache_ttl)
            .field("cache_capacity_bytes", &self.cache_capacity_bytes)
            .field("cache_sweep_interval", &self.cache_sweep_interval)
            .finish()
    }
}
