//! Cache Sweep Task
//!
//! Removes stale and corrupt response cache entries: once at startup, then
//! optionally on a fixed interval.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::SharedCache;

/// Runs a single sweep over the shared cache and returns the removed count.
///
/// The sweep may rewrite the store file, so it runs on the blocking pool
/// while holding the cache lock.
pub async fn run_sweep(cache: &SharedCache) -> usize {
    let mut guard = cache.clone().lock_owned().await;
    let removed = match tokio::task::spawn_blocking(move || guard.sweep()).await {
        Ok(removed) => removed,
        Err(e) => {
            warn!("Cache sweep task failed: {}", e);
            0
        }
    };
    if removed > 0 {
        info!("Cache sweep: removed {} stale entries", removed);
    } else {
        debug!("Cache sweep: no stale entries found");
    }
    removed
}

/// Spawns a background task that sweeps the cache every `interval_secs`.
///
/// Returns `None` when `interval_secs` is zero; the startup sweep is the
/// caller's job either way.
///
/// # Example
/// ```ignore
/// run_sweep(&cache).await;
/// let handle = spawn_sweep_task(cache.clone(), 600);
/// // Later, during shutdown:
/// if let Some(handle) = handle { handle.abort(); }
/// ```
pub fn spawn_sweep_task(cache: SharedCache, interval_secs: u64) -> Option<JoinHandle<()>> {
    if interval_secs == 0 {
        info!("Periodic cache sweep disabled");
        return None;
    }
    let interval = Duration::from_secs(interval_secs);

    Some(tokio::spawn(async move {
        info!(
            "Starting cache sweep task with interval of {} seconds",
            interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;
            run_sweep(&cache).await;
        }
    }))
}
