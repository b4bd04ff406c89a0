// src/telemetry.rs
//! Tracing setup plus privacy-preserving helpers for evaluation logs.

use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::evaluation::{EvaluationRequest, EvaluationResult};

pub const ENV_DEV_LOG: &str = "EVAL_DEV_LOG";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

const DEFAULT_FILTER: &str = "fidelity_evaluator=info,evaluation=info,warn";

/// Install a global subscriber. Compact output by default, JSON when
/// `LOG_FORMAT=json`. A subscriber already installed by the host runtime wins.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json = std::env::var(ENV_LOG_FORMAT)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let res = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init()
    };

    if res.is_err() {
        tracing::debug!("tracing subscriber already installed; keeping it");
    }
}

fn is_dev_env() -> bool {
    cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        )
}

// EVAL_DEV_LOG=1 AND dev env (debug build or SHUTTLE_ENV in {local,development,dev})
pub(crate) fn dev_logging_enabled() -> bool {
    let on = std::env::var(ENV_DEV_LOG).ok().as_deref() == Some("1");
    on && is_dev_env()
}

/// First 6 bytes of SHA-256 as hex. Lets logs correlate requests without raw text.
pub fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

pub(crate) fn truncate_vec<T: ToString>(v: &[T], max: usize) -> Vec<String> {
    v.iter().take(max).map(|x| x.to_string()).collect()
}

/// Dev-only detail: matched/conflicting concepts. Never logs the raw texts.
pub(crate) fn dev_log_evaluation(req: &EvaluationRequest, result: &EvaluationResult) {
    if !dev_logging_enabled() {
        return;
    }
    let id = anon_hash(&req.hypothesis);
    let a = &result.analysis;
    info!(
        target: "evaluation",
        %id,
        fidelity = result.fidelity_score,
        risk = %result.hallucination_risk,
        matching = ?truncate_vec(a.matching_concepts.as_slice(), 5),
        conflicting = ?truncate_vec(a.conflicting_concepts.as_slice(), 5),
        "dev evaluation detail"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anon_hash_is_short_and_stable() {
        let a = anon_hash("The Eiffel Tower is in Rome, Italy.");
        assert_eq!(a.len(), 12);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(a, anon_hash("The Eiffel Tower is in Rome, Italy."));
        assert_ne!(a, anon_hash("The Eiffel Tower is in Paris."));
    }

    #[test]
    fn truncate_keeps_prefix() {
        let v = ["a", "b", "c"];
        assert_eq!(truncate_vec(&v, 2), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(truncate_vec(&v, 10).len(), 3);
    }
}
