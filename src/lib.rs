//! Trip Planner - An AI-assisted travel planning service
//!
//! Destination suggestions and day-by-day itineraries from a hosted
//! generative model, with a persistent response cache and PDF export.

pub mod api;
pub mod cache;
pub mod compositor;
pub mod config;
pub mod error;
pub mod models;
pub mod planner;
pub mod provider;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::{PlannerError, Result};
pub use tasks::{run_sweep, spawn_sweep_task};
