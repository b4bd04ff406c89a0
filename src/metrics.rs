// src/metrics.rs
use anyhow::Context;
use axum::{routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::evaluation::{EvaluationError, EvaluationResult};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder and publish the configured injected latency.
    /// Fails if another global recorder is already installed.
    pub fn init(simulated_latency_ms: u64) -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        gauge!("evaluation_simulated_latency_ms").set(simulated_latency_ms as f64);

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

pub fn record_evaluation(result: &EvaluationResult) {
    counter!("evaluations_total", "risk" => result.hallucination_risk.as_str()).increment(1);
    histogram!("evaluation_fidelity").record(result.fidelity_score);
}

pub fn record_rejection(err: &EvaluationError) {
    counter!("evaluation_rejections_total", "kind" => err.kind()).increment(1);
}
