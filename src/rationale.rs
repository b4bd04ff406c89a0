// src/rationale.rs
//! Templated explanations for an evaluation.
//!
//! `rationale` is stored on the result itself; `analysis_summary` is the
//! shorter match-vs-conflict verdict shown next to the concept breakdown.

use serde::{Deserialize, Serialize};

use crate::concepts::ConceptSet;

/// Fidelity above this is "strong".
pub const STRONG_FIDELITY: f64 = 0.7;
/// Fidelity above this (and not strong) is "moderate".
pub const MODERATE_FIDELITY: f64 = 0.4;

/// How well the hypothesis lines up with the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Strong,
    Moderate,
    Weak,
}

impl Alignment {
    pub fn from_fidelity(fidelity: f64) -> Self {
        if fidelity > STRONG_FIDELITY {
            Alignment::Strong
        } else if fidelity > MODERATE_FIDELITY {
            Alignment::Moderate
        } else {
            Alignment::Weak
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Alignment::Strong => "strong",
            Alignment::Moderate => "moderate",
            Alignment::Weak => "weak",
        }
    }
}

/// `fraction` as a percentage with one decimal, e.g. `0.375 -> "37.5"`.
pub fn percent_1dp(fraction: f64) -> String {
    format!("{:.1}", fraction * 100.0)
}

/// Build the rationale sentence stored on every result.
pub fn rationale(matching: &ConceptSet, conflicting: &ConceptSet, fidelity: f64) -> String {
    let matched = if matching.is_empty() {
        "shares no common concepts with the reference".to_string()
    } else {
        format!("correctly identifies {}", matching.joined())
    };

    let conflicts = if conflicting.is_empty() {
        ".".to_string()
    } else {
        format!(
            "but introduces conflicting concepts: {}.",
            conflicting.joined()
        )
    };

    format!(
        "The hypothesis {matched} {conflicts} Fidelity score of {}% indicates {} alignment.",
        percent_1dp(fidelity),
        Alignment::from_fidelity(fidelity).as_str()
    )
}

/// Short verdict comparing match and conflict counts, plus a fidelity remark.
pub fn analysis_summary(matches: usize, conflicts: usize, fidelity: f64) -> String {
    let balance = if matches > conflicts {
        format!("Strong alignment detected with {matches} matching concepts and {conflicts} conflicts.")
    } else if conflicts > matches {
        format!("Significant misalignment with {conflicts} conflicts versus {matches} matches.")
    } else {
        "Balanced result with equal matching and conflicting concepts.".to_string()
    };

    let remark = match Alignment::from_fidelity(fidelity) {
        Alignment::Strong => " High fidelity score indicates good overall alignment.",
        Alignment::Moderate => " Moderate fidelity suggests room for improvement.",
        Alignment::Weak => " Low fidelity indicates significant discrepancies.",
    };

    balance + remark
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(xs: &[&str]) -> ConceptSet {
        xs.iter().copied().collect()
    }

    #[test]
    fn eiffel_rationale_is_exact() {
        let r = rationale(
            &set(&["the", "eiffel", "tower"]),
            &set(&["rome", "italy"]),
            0.375,
        );
        assert_eq!(
            r,
            "The hypothesis correctly identifies the, eiffel, tower but introduces \
             conflicting concepts: rome, italy. Fidelity score of 37.5% indicates weak alignment."
        );
    }

    #[test]
    fn no_conflicts_keeps_spaced_period() {
        let r = rationale(&set(&["paris", "france"]), &ConceptSet::new(), 1.0);
        assert_eq!(
            r,
            "The hypothesis correctly identifies paris, france . Fidelity score of 100.0% indicates strong alignment."
        );
    }

    #[test]
    fn nothing_shared() {
        let r = rationale(&ConceptSet::new(), &ConceptSet::new(), 0.0);
        assert_eq!(
            r,
            "The hypothesis shares no common concepts with the reference . Fidelity score of 0.0% indicates weak alignment."
        );
    }

    #[test]
    fn alignment_thresholds() {
        assert_eq!(Alignment::from_fidelity(0.71), Alignment::Strong);
        assert_eq!(Alignment::from_fidelity(0.7), Alignment::Moderate);
        assert_eq!(Alignment::from_fidelity(0.41), Alignment::Moderate);
        assert_eq!(Alignment::from_fidelity(0.4), Alignment::Weak);
    }

    #[test]
    fn percent_rounds_to_one_decimal() {
        assert_eq!(percent_1dp(1.0 / 3.0), "33.3");
        assert_eq!(percent_1dp(2.0 / 3.0), "66.7");
        assert_eq!(percent_1dp(0.7), "70.0");
    }

    #[test]
    fn summary_variants() {
        assert_eq!(
            analysis_summary(3, 2, 0.375),
            "Strong alignment detected with 3 matching concepts and 2 conflicts. \
             Low fidelity indicates significant discrepancies."
        );
        assert_eq!(
            analysis_summary(1, 4, 0.5),
            "Significant misalignment with 4 conflicts versus 1 matches. \
             Moderate fidelity suggests room for improvement."
        );
        assert_eq!(
            analysis_summary(0, 0, 0.9),
            "Balanced result with equal matching and conflicting concepts. \
             High fidelity score indicates good overall alignment."
        );
    }
}
