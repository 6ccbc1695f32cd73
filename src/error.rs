//! Error types for the planner service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::compositor::ExportError;
use crate::provider::QUOTA_MESSAGE;

// == Planner Error Enum ==
/// Unified error type for the planner service.
///
/// Every message is safe to show to an end user.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// The model provider is rate limiting or out of quota
    #[error("{}", QUOTA_MESSAGE)]
    QuotaExceeded,

    /// The model call failed for any other reason
    #[error("Failed to {action}. Please check your connection and try again.")]
    Generation { action: String },

    /// A saved plan file could not be loaded
    #[error("{0}")]
    InvalidFile(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// An export is already running
    #[error("A PDF export is already in progress")]
    ExportBusy,

    /// The export failed; details are in the log
    #[error("Failed to generate the PDF. Please try again.")]
    Export,

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ExportError> for PlannerError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Busy => PlannerError::ExportBusy,
            _ => PlannerError::Export,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for PlannerError {
    fn into_response(self) -> Response {
        let status = match &self {
            PlannerError::QuotaExceeded => StatusCode::TOO_MANY_REQUESTS,
            PlannerError::Generation { .. } => StatusCode::BAD_GATEWAY,
            PlannerError::InvalidFile(_) => StatusCode::BAD_REQUEST,
            PlannerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            PlannerError::ExportBusy => StatusCode::CONFLICT,
            PlannerError::Export => StatusCode::INTERNAL_SERVER_ERROR,
            PlannerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the planner service.
pub type Result<T> = std::result::Result<T, PlannerError>;
