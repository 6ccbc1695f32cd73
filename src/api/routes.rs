//! API Routes
//!
//! Configures the Axum router with all planner endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    edit_handler, export_handler, health_handler, load_handler, off_beat_handler,
    packing_list_handler, plan_handler, rebuild_handler, save_handler, stats_handler,
    suggestions_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/suggestions", post(suggestions_handler))
        .route("/suggestions/off-beat", post(off_beat_handler))
        .route("/plans", post(plan_handler))
        .route("/plans/rebuild", post(rebuild_handler))
        .route("/plans/packing-list", post(packing_list_handler))
        .route("/plans/edit", post(edit_handler))
        .route("/plans/save", post(save_handler))
        .route("/plans/load", post(load_handler))
        .route("/plans/export", post(export_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
