//! Request and Response models for the planner API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    EditPlanRequest, ExportRequest, PackingListRequest, PlanRequest, RebuildRequest, SavePlanRequest,
    SuggestionsRequest,
};
pub use responses::{HealthResponse, PackingListResponse, StatsResponse, SuggestionsResponse};
