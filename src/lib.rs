// src/lib.rs
// Public library surface for the service binary, the offline tool and integration tests.

pub mod ai_adapter;
pub mod analyze;
pub mod api;
pub mod config;
pub mod metrics;
pub mod sentiment;

// ---- Re-exports for stable public API ----
pub use crate::analyze::{analyze_response, BrandAnalysis};
pub use crate::api::{router, AppState};
pub use crate::config::AppConfig;

use axum::Router;

/// Build the full app (config from file/env, generator, router) without the Shuttle runtime.
pub fn app() -> anyhow::Result<Router> {
    let config = AppConfig::load()?;
    let state = AppState::from_config(config)?;
    Ok(router(state))
}
