// src/config.rs
//! Service configuration.
//!
//! Lookup order:
//! 1) `$EVAL_CONFIG_PATH` (must exist when set)
//! 2) `config/evaluator.toml` if present
//! 3) built-in defaults
//!
//! Then `EVAL_SIMULATED_LATENCY_MS`, `EVAL_STATIC_DIR` and
//! `EVAL_METRICS_ENABLED` override individual fields.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config/evaluator.toml";

pub const ENV_CONFIG_PATH: &str = "EVAL_CONFIG_PATH";
pub const ENV_SIMULATED_LATENCY_MS: &str = "EVAL_SIMULATED_LATENCY_MS";
pub const ENV_STATIC_DIR: &str = "EVAL_STATIC_DIR";
pub const ENV_METRICS_ENABLED: &str = "EVAL_METRICS_ENABLED";

/// Longest injected latency we accept.
pub const MAX_SIMULATED_LATENCY_MS: u64 = 10_000;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Delay before scoring, for UIs that want a visible "evaluating" state.
    #[serde(default)]
    pub simulated_latency_ms: u64,
    /// Directory served as the browser UI (fallback route).
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            simulated_latency_ms: 0,
            static_dir: None,
            metrics_enabled: true,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: AppConfig = toml::from_str(s).context("parsing evaluator config")?;
        Ok(cfg.sanitized())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading evaluator config from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// File (env path, default path, or defaults) plus env overrides.
    pub fn load() -> Result<Self> {
        let base = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from_file(&pb)?
        } else {
            let default_p = Path::new(DEFAULT_CONFIG_PATH);
            if default_p.exists() {
                Self::load_from_file(default_p)?
            } else {
                Self::default()
            }
        };
        base.with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(raw) = std::env::var(ENV_SIMULATED_LATENCY_MS) {
            self.simulated_latency_ms = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_SIMULATED_LATENCY_MS} must be an integer, got {raw:?}"))?;
        }
        if let Ok(raw) = std::env::var(ENV_STATIC_DIR) {
            let t = raw.trim();
            self.static_dir = (!t.is_empty()).then(|| PathBuf::from(t));
        }
        if let Ok(raw) = std::env::var(ENV_METRICS_ENABLED) {
            self.metrics_enabled = matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        Ok(self.sanitized())
    }

    fn sanitized(mut self) -> Self {
        self.simulated_latency_ms = self.simulated_latency_ms.min(MAX_SIMULATED_LATENCY_MS);
        self
    }

    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}
