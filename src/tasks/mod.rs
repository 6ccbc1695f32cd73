//! Background Tasks Module
//!
//! Contains maintenance tasks that run alongside the server.
//!
//! # Tasks
//! - Cache sweep: removes stale response cache entries at startup and on an interval

mod sweep;

pub use sweep::{run_sweep, spawn_sweep_task};
