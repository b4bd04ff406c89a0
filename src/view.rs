// src/view.rs
//! Display projections of an `EvaluationResult`.
//!
//! Nothing here feeds back into scoring: badge colours, percentages and
//! per-concept tags are derived purely from a finished result.

use serde::{Deserialize, Serialize};

use crate::evaluation::EvaluationResult;
use crate::rationale::{analysis_summary, percent_1dp};
use crate::scorer::RiskLevel;

/// How a result is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Visual,
    Json,
}

/// Badge colour family used by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeVariant {
    Success,
    Warning,
    Destructive,
}

impl From<RiskLevel> for BadgeVariant {
    fn from(risk: RiskLevel) -> Self {
        match risk {
            RiskLevel::Low => BadgeVariant::Success,
            RiskLevel::Medium => BadgeVariant::Warning,
            RiskLevel::High => BadgeVariant::Destructive,
        }
    }
}

/// Role a hypothesis concept plays in the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConceptRole {
    Matching,
    Conflicting,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConceptTag {
    pub concept: String,
    pub role: ConceptRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub matches: usize,
    pub conflicts: usize,
}

/// Share of all extracted concepts (hypothesis + reference) that matched or conflicted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Distribution {
    pub match_percent: f64,
    pub conflict_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    /// Four decimals, e.g. `"0.3750"`.
    pub fidelity: String,
    /// One decimal with a percent sign, e.g. `"37.5%"`.
    pub fidelity_percent: String,
    pub risk: RiskLevel,
    pub badge: BadgeVariant,
    pub stats: Stats,
    pub distribution: Distribution,
    pub hypothesis_tags: Vec<ConceptTag>,
    pub reference_concepts: Vec<String>,
    pub summary: String,
    pub rationale: String,
}

impl ResultView {
    pub fn from_result(r: &EvaluationResult) -> Self {
        let a = &r.analysis;
        let matches = a.matching_concepts.len();
        let conflicts = a.conflicting_concepts.len();

        let total = a.hypothesis_concepts.len() + a.reference_concepts.len();
        let pct = |n: usize| if total > 0 { n as f64 / total as f64 * 100.0 } else { 0.0 };

        let hypothesis_tags = a
            .hypothesis_concepts
            .iter()
            .map(|c| {
                let role = if a.matching_concepts.contains(c) {
                    ConceptRole::Matching
                } else if a.conflicting_concepts.contains(c) {
                    ConceptRole::Conflicting
                } else {
                    ConceptRole::Neutral
                };
                ConceptTag {
                    concept: c.clone(),
                    role,
                }
            })
            .collect();

        Self {
            fidelity: format!("{:.4}", r.fidelity_score),
            fidelity_percent: format!("{}%", percent_1dp(r.fidelity_score)),
            risk: r.hallucination_risk,
            badge: r.hallucination_risk.into(),
            stats: Stats { matches, conflicts },
            distribution: Distribution {
                match_percent: pct(matches),
                conflict_percent: pct(conflicts),
            },
            hypothesis_tags,
            reference_concepts: a.reference_concepts.as_slice().to_vec(),
            summary: analysis_summary(matches, conflicts, r.fidelity_score),
            rationale: r.rationale.clone(),
        }
    }
}

/// Pretty-printed JSON projection of a result (the "JSON view").
pub fn json_projection(r: &EvaluationResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{evaluate, EvaluationRequest};

    fn eiffel() -> EvaluationResult {
        evaluate(&EvaluationRequest::new(
            "Where is the Eiffel Tower located?",
            "The Eiffel Tower is in Rome, Italy.",
            "The Eiffel Tower is in Paris, France, located on the Champ de Mars.",
        ))
        .unwrap()
    }

    #[test]
    fn badge_mapping_is_total() {
        assert_eq!(BadgeVariant::from(RiskLevel::Low), BadgeVariant::Success);
        assert_eq!(BadgeVariant::from(RiskLevel::Medium), BadgeVariant::Warning);
        assert_eq!(BadgeVariant::from(RiskLevel::High), BadgeVariant::Destructive);
    }

    #[test]
    fn eiffel_view() {
        let v = ResultView::from_result(&eiffel());
        assert_eq!(v.fidelity, "0.3750");
        assert_eq!(v.fidelity_percent, "37.5%");
        assert_eq!(v.badge, BadgeVariant::Warning);
        assert_eq!(v.stats, Stats { matches: 3, conflicts: 2 });
        // 3 / (5 + 8), 2 / (5 + 8)
        assert!((v.distribution.match_percent - 300.0 / 13.0).abs() < 1e-9);
        assert!((v.distribution.conflict_percent - 200.0 / 13.0).abs() < 1e-9);

        let roles: Vec<ConceptRole> = v.hypothesis_tags.iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            [
                ConceptRole::Matching,
                ConceptRole::Matching,
                ConceptRole::Matching,
                ConceptRole::Conflicting,
                ConceptRole::Conflicting,
            ]
        );
        assert!(v.summary.starts_with("Strong alignment detected with 3 matching"));
    }

    #[test]
    fn three_letter_miss_is_neutral() {
        let r = evaluate(&EvaluationRequest::new("", "cat elephant", "dog")).unwrap();
        let v = ResultView::from_result(&r);
        assert_eq!(v.hypothesis_tags[0].role, ConceptRole::Neutral);
        assert_eq!(v.hypothesis_tags[1].role, ConceptRole::Conflicting);
    }

    #[test]
    fn json_projection_roundtrips_fields() {
        let r = eiffel();
        let s = json_projection(&r).unwrap();
        assert!(s.contains("\n  \"fidelity_score\": 0.375"));
        let back: EvaluationResult = serde_json::from_str(&s).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn view_mode_parses_lowercase() {
        let m: ViewMode = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(m, ViewMode::Json);
        assert_eq!(ViewMode::default(), ViewMode::Visual);
    }
}
