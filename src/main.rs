//! Fidelity Evaluator: binary entrypoint.
//! Boots the Axum HTTP server: config, tracing, evaluation session, metrics.

use shuttle_axum::ShuttleAxum;
use tracing::info;

use fidelity_evaluator::config::AppConfig;
use fidelity_evaluator::telemetry::init_tracing;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = AppConfig::load()?;
    info!(
        simulated_latency_ms = cfg.simulated_latency_ms,
        static_dir = ?cfg.static_dir,
        metrics = cfg.metrics_enabled,
        "evaluator config loaded"
    );

    let router = fidelity_evaluator::app(&cfg)?;
    Ok(router.into())
}
