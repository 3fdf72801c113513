//! Brand Mention Analyzer — Binary Entrypoint
//! Boots the Axum HTTP server: config, text generator, `/analyze`, `/metrics`.

use brand_mention_analyzer::{
    api::{router, AppState},
    config::AppConfig,
    metrics::Metrics,
};
use shuttle_axum::ShuttleAxum;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - BRAND_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("BRAND_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("brand_mention_analyzer=debug,info"));

    // Shuttle may already have installed a subscriber; keep it in that case.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let config = AppConfig::load()?;
    let state = AppState::from_config(config)?;
    let configured = state.generator.is_some();
    info!(
        model = %state.config.model,
        origins = ?state.config.allowed_origins,
        generator = state.generator.as_ref().map(|g| g.provider_name()).unwrap_or("none"),
        "config loaded"
    );

    let mut app = router(state);
    match Metrics::init(configured) {
        Ok(metrics) => app = app.merge(metrics.router()),
        Err(e) => warn!(error = %e, "metrics disabled"),
    }

    Ok(app.into())
}
