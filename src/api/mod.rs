//! API Module
//!
//! HTTP handlers and routing for the planner REST API.
//!
//! # Endpoints
//! - `POST /suggestions` - Destination suggestions, or one named country
//! - `POST /suggestions/off-beat` - Lesser-known destinations
//! - `POST /plans` - Generate an itinerary
//! - `POST /plans/rebuild` - Re-optimize an edited itinerary
//! - `POST /plans/packing-list` - Packing list for an itinerary
//! - `POST /plans/edit` - Apply one edit to an itinerary
//! - `POST /plans/save` - Download a saved-plan file
//! - `POST /plans/load` - Parse a saved-plan file
//! - `POST /plans/export` - Export an itinerary as PDF
//! - `GET /stats` - Response cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
