//! API Handlers
//!
//! HTTP request handlers for each planner endpoint.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    Json,
};

use crate::compositor::{export_file_name, DocumentCompositor};
use crate::error::{PlannerError, Result};
use crate::models::{
    EditPlanRequest, ExportRequest, HealthResponse, PackingListRequest, PackingListResponse,
    PlanRequest, RebuildRequest, SavePlanRequest, StatsResponse, SuggestionsRequest,
    SuggestionsResponse,
};
use crate::planner::{PlannerService, SavedPlan, TravelPlan};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub planner: Arc<PlannerService>,
    pub compositor: Arc<DocumentCompositor>,
}

impl AppState {
    pub fn new(planner: PlannerService, compositor: DocumentCompositor) -> Self {
        Self {
            planner: Arc::new(planner),
            compositor: Arc::new(compositor),
        }
    }
}

fn check(validation: Option<String>) -> Result<()> {
    match validation {
        Some(message) => Err(PlannerError::InvalidRequest(message)),
        None => Ok(()),
    }
}

/// `Content-Disposition: attachment` for `file_name`.
///
/// Characters a quoted header value cannot carry become `_`.
fn attachment(file_name: &str) -> Result<HeaderValue> {
    let safe: String = file_name
        .chars()
        .map(|c| {
            if c == ' ' || (c.is_ascii_graphic() && c != '"' && c != '\\') {
                c
            } else {
                '_'
            }
        })
        .collect();
    HeaderValue::from_str(&format!("attachment; filename=\"{}\"", safe))
        .map_err(|e| PlannerError::Internal(e.to_string()))
}

/// Handler for POST /suggestions
pub async fn suggestions_handler(
    State(state): State<AppState>,
    Json(req): Json<SuggestionsRequest>,
) -> Result<Json<SuggestionsResponse>> {
    check(req.validate())?;

    let suggestions = match req.country() {
        Some(country) => vec![state.planner.country_info(country).await],
        None => {
            state
                .planner
                .travel_suggestions(&req.budget, &req.time_of_year, &req.continent)
                .await?
        }
    };
    Ok(Json(SuggestionsResponse::new(suggestions)))
}

/// Handler for POST /suggestions/off-beat
pub async fn off_beat_handler(State(state): State<AppState>) -> Result<Json<SuggestionsResponse>> {
    let suggestions = state.planner.off_beat_suggestions().await?;
    Ok(Json(SuggestionsResponse::new(suggestions)))
}

/// Handler for POST /plans
pub async fn plan_handler(
    State(state): State<AppState>,
    Json(req): Json<PlanRequest>,
) -> Result<Json<TravelPlan>> {
    check(req.validate())?;

    let plan = state
        .planner
        .travel_plan(&req.destination.name, req.duration, req.style, &req.notes)
        .await?;
    Ok(Json(plan))
}

/// Handler for POST /plans/rebuild
pub async fn rebuild_handler(
    State(state): State<AppState>,
    Json(req): Json<RebuildRequest>,
) -> Result<Json<TravelPlan>> {
    check(req.validate())?;

    let plan = state
        .planner
        .rebuild_plan(
            &req.destination.name,
            req.style,
            &req.plan,
            &req.notes,
            &req.refinement,
        )
        .await?;
    Ok(Json(plan))
}

/// Handler for POST /plans/packing-list
pub async fn packing_list_handler(
    State(state): State<AppState>,
    Json(req): Json<PackingListRequest>,
) -> Result<Json<PackingListResponse>> {
    check(req.validate())?;

    let packing_list = state
        .planner
        .packing_list(&req.destination.name, &req.plan)
        .await?;
    Ok(Json(PackingListResponse { packing_list }))
}

/// Handler for POST /plans/edit
///
/// Applies one edit and returns the updated plan.
pub async fn edit_handler(Json(req): Json<EditPlanRequest>) -> Result<Json<TravelPlan>> {
    check(req.validate())?;

    let EditPlanRequest { mut plan, edit } = req;
    edit.apply(&mut plan)?;
    Ok(Json(plan))
}

/// Handler for POST /plans/save
///
/// Returns the saved-plan file as a download.
pub async fn save_handler(Json(req): Json<SavePlanRequest>) -> Result<(HeaderMap, String)> {
    check(req.validate())?;

    let saved = SavedPlan::new(req.name.trim(), req.plan, req.destination);
    let body = saved.to_json()?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(header::CONTENT_DISPOSITION, attachment(&saved.file_name())?);
    Ok((headers, body))
}

/// Handler for POST /plans/load
///
/// Accepts the raw text of a saved-plan file.
pub async fn load_handler(body: String) -> Result<Json<SavedPlan>> {
    let saved = SavedPlan::load(&body)?;
    Ok(Json(saved))
}

/// Handler for POST /plans/export
pub async fn export_handler(
    State(state): State<AppState>,
    Json(req): Json<ExportRequest>,
) -> Result<(HeaderMap, Vec<u8>)> {
    check(req.validate())?;

    let bytes = state
        .compositor
        .export_plan(&req.plan, &req.destination)
        .await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        attachment(&export_file_name(&req.destination.name))?,
    );
    Ok((headers, bytes))
}

/// Handler for GET /stats
///
/// Returns response cache statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.planner.cache_stats().await))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
