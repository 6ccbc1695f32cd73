//! Planner Module
//!
//! Destination suggestions, itinerary generation and editing, packing lists
//! and saved-plan files.

pub mod models;
mod plan_file;
pub mod prompts;
mod service;

pub use models::{
    ActivityType, CostBreakdown, CountryInfo, DailyPlan, DestinationSuggestion, ItineraryLocation,
    ItineraryStyle, OfficialLink, PackingListCategory, PlanEdit, TravelPlan,
};
pub use plan_file::{file_name_for, SavedPlan};
pub use service::{cache_signature, Action, PlannerService};
