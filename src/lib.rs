// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod concepts;
pub mod config;
pub mod evaluation;
pub mod metrics;
pub mod rationale;
pub mod scorer;
pub mod session;
pub mod telemetry;
pub mod view;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, router, AppState};
pub use crate::concepts::{extract, ConceptSet};
pub use crate::evaluation::{
    evaluate, ConceptAnalysis, EvaluationError, EvaluationRequest, EvaluationResult,
};
pub use crate::rationale::rationale;
pub use crate::scorer::{score, RiskLevel};
pub use crate::session::{EvaluationSession, Phase};

use crate::config::AppConfig;
use crate::metrics::Metrics;

/// Full application router from a loaded config: API routes, optional static
/// UI and, when enabled, `/metrics` backed by a freshly installed recorder.
pub fn app(cfg: &AppConfig) -> anyhow::Result<axum::Router> {
    let state = AppState::from_config(cfg);
    let mut router = api::router(state, cfg);
    if cfg.metrics_enabled {
        let m = Metrics::init(cfg.simulated_latency_ms)?;
        router = router.merge(m.router());
    }
    Ok(router)
}
