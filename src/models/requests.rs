//! Request DTOs for the planner API
//!
//! Defines the structure of incoming HTTP request bodies. Field names are
//! camelCase on the wire.

use serde::Deserialize;

use crate::planner::{DestinationSuggestion, ItineraryStyle, PlanEdit, TravelPlan};

fn any_continent() -> String {
    "Any".to_string()
}

/// Request body for POST /suggestions
///
/// A non-blank `country` skips the suggestion list and describes that
/// country directly.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsRequest {
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub time_of_year: String,
    #[serde(default = "any_continent")]
    pub continent: String,
    #[serde(default)]
    pub country: Option<String>,
}

impl SuggestionsRequest {
    /// The directly requested country, if any.
    pub fn country(&self) -> Option<&str> {
        self.country
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }

    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.country().is_some() {
            return None;
        }
        if self.budget.trim().is_empty() {
            return Some("budget is required".to_string());
        }
        if self.time_of_year.trim().is_empty() {
            return Some("timeOfYear is required".to_string());
        }
        None
    }
}

/// Request body for POST /plans
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub destination: DestinationSuggestion,
    /// Trip length in days; 0 lets the model decide
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub style: ItineraryStyle,
    #[serde(default)]
    pub notes: String,
}

impl PlanRequest {
    pub fn validate(&self) -> Option<String> {
        validate_destination(&self.destination)
    }
}

/// Request body for POST /plans/rebuild
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebuildRequest {
    pub destination: DestinationSuggestion,
    pub plan: TravelPlan,
    #[serde(default)]
    pub style: ItineraryStyle,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub refinement: String,
}

impl RebuildRequest {
    pub fn validate(&self) -> Option<String> {
        validate_destination(&self.destination).or_else(|| validate_plan(&self.plan))
    }
}

/// Request body for POST /plans/packing-list
#[derive(Debug, Clone, Deserialize)]
pub struct PackingListRequest {
    pub destination: DestinationSuggestion,
    pub plan: TravelPlan,
}

impl PackingListRequest {
    pub fn validate(&self) -> Option<String> {
        validate_destination(&self.destination).or_else(|| validate_plan(&self.plan))
    }
}

/// Request body for POST /plans/save
#[derive(Debug, Clone, Deserialize)]
pub struct SavePlanRequest {
    pub name: String,
    pub plan: TravelPlan,
    pub destination: DestinationSuggestion,
}

impl SavePlanRequest {
    pub fn validate(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            return Some("name cannot be empty".to_string());
        }
        validate_plan(&self.plan)
    }
}

/// Request body for POST /plans/edit
#[derive(Debug, Clone, Deserialize)]
pub struct EditPlanRequest {
    pub plan: TravelPlan,
    pub edit: PlanEdit,
}

impl EditPlanRequest {
    pub fn validate(&self) -> Option<String> {
        validate_plan(&self.plan)
    }
}

/// Request body for POST /plans/export
#[derive(Debug, Clone, Deserialize)]
pub struct ExportRequest {
    pub plan: TravelPlan,
    pub destination: DestinationSuggestion,
}

impl ExportRequest {
    pub fn validate(&self) -> Option<String> {
        validate_destination(&self.destination).or_else(|| validate_plan(&self.plan))
    }
}

fn validate_destination(destination: &DestinationSuggestion) -> Option<String> {
    if destination.name.trim().is_empty() {
        return Some("destination name cannot be empty".to_string());
    }
    None
}

fn validate_plan(plan: &TravelPlan) -> Option<String> {
    plan.validate().err().map(|e| e.to_string())
}
