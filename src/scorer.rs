// src/scorer.rs
//! Overlap and hallucination-risk scoring over two concept sets.
//!
//! fidelity = |matching| / max(|H|, |R|)      (0 when both are empty)
//! conflict_ratio = |conflicting| / max(|H|, 1)
//!
//! Risk thresholds are exclusive: a ratio must exceed 0.6 to be High and
//! exceed 0.3 to be Medium.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::concepts::ConceptSet;

/// Ratio above which risk is High.
pub const HIGH_RISK_RATIO: f64 = 0.6;
/// Ratio above which risk is Medium.
pub const MEDIUM_RISK_RATIO: f64 = 0.3;

/// Non-matching tokens must be strictly longer than this to count as conflicts.
/// Three-letter misses land in neither set.
pub const MIN_CONFLICT_LEN: usize = 3;

/// Coarse hallucination label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Map a conflict ratio onto a label.
    pub fn from_conflict_ratio(ratio: f64) -> Self {
        if ratio > HIGH_RISK_RATIO {
            RiskLevel::High
        } else if ratio > MEDIUM_RISK_RATIO {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the scorer derives from a pair of concept sets.
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    pub fidelity: f64,
    pub conflict_ratio: f64,
    pub risk: RiskLevel,
    pub matching: ConceptSet,
    pub conflicting: ConceptSet,
}

/// Score hypothesis concepts against reference concepts.
pub fn score(hypothesis: &ConceptSet, reference: &ConceptSet) -> Score {
    let matching: ConceptSet = hypothesis
        .iter()
        .filter(|c| reference.contains(c))
        .cloned()
        .collect();

    let conflicting: ConceptSet = hypothesis
        .iter()
        .filter(|c| !reference.contains(c) && c.len() > MIN_CONFLICT_LEN)
        .cloned()
        .collect();

    let total = hypothesis.len().max(reference.len());
    let fidelity = if total > 0 {
        matching.len() as f64 / total as f64
    } else {
        0.0
    };

    let conflict_ratio = conflicting.len() as f64 / hypothesis.len().max(1) as f64;

    Score {
        fidelity,
        conflict_ratio,
        risk: RiskLevel::from_conflict_ratio(conflict_ratio),
        matching,
        conflicting,
    }
}
