//! Trip Planner - An AI-assisted travel planning service
//!
//! Destination suggestions and day-by-day itineraries from a hosted
//! generative model, with a persistent response cache and PDF export.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trip_planner::api::{create_router, AppState};
use trip_planner::cache::{FileStore, KeyValueStore, ResponseCache};
use trip_planner::compositor::{DocumentCompositor, SoftwareRasterizer};
use trip_planner::planner::PlannerService;
use trip_planner::provider::GeminiClient;
use trip_planner::{run_sweep, spawn_sweep_task, Config};

/// Main entry point for the Trip Planner server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the persistent cache store and sweep stale entries
/// 4. Start the periodic sweep task
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trip_planner=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Trip Planner");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, model={}, cache={}, ttl={}s, sweep_interval={}s",
        config.server_port,
        config.model,
        config.cache_path.display(),
        config.cache_ttl,
        config.cache_sweep_interval
    );

    let api_key = config
        .api_key
        .clone()
        .context("GEMINI_API_KEY (or API_KEY) must be set")?;
    let model = GeminiClient::new(api_key, config.model.clone())
        .context("failed to build the model client")?;

    let store = FileStore::open(&config.cache_path, Some(config.cache_capacity_bytes))
        .with_context(|| format!("failed to open cache at {}", config.cache_path.display()))?;
    let store: Box<dyn KeyValueStore> = Box::new(store);
    let cache = ResponseCache::new(store).with_ttl(Duration::from_secs(config.cache_ttl));

    let planner = PlannerService::new(Arc::new(model), cache);
    let shared_cache = planner.cache();
    run_sweep(&shared_cache).await;
    let sweep_handle = spawn_sweep_task(shared_cache, config.cache_sweep_interval);

    let compositor = DocumentCompositor::new(Arc::new(SoftwareRasterizer));
    let app = create_router(AppState::new(planner, compositor));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweep_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the sweep task and allows graceful shutdown.
async fn shutdown_signal(sweep_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    if let Some(handle) = sweep_handle {
        handle.abort();
        warn!("Sweep task aborted");
    }
}
