// src/evaluation.rs
//! Request/result shapes and the pure `evaluate` entry point.
//!
//! `evaluate` validates the request and then runs
//! extract -> score -> rationale. Once validation passes nothing can fail.

use serde::{Deserialize, Serialize, Serializer};

use crate::concepts::{extract, ConceptSet};
use crate::rationale::rationale;
use crate::scorer::{score, RiskLevel};

/// Input collected from the UI at evaluation time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    /// Shown alongside the result; never scored.
    #[serde(default)]
    pub prompt: String,
    /// Model output under evaluation.
    pub hypothesis: String,
    /// Gold answer.
    pub reference: String,
}

impl EvaluationRequest {
    pub fn new(
        prompt: impl Into<String>,
        hypothesis: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            hypothesis: hypothesis.into(),
            reference: reference.into(),
        }
    }

    /// Both scored fields must be non-blank after trimming. The hypothesis is
    /// checked first since the UI gates submission on it before the reference.
    pub fn validate(&self) -> Result<(), EvaluationError> {
        if self.hypothesis.trim().is_empty() {
            return Err(EvaluationError::MissingHypothesis);
        }
        if self.reference.trim().is_empty() {
            return Err(EvaluationError::MissingReference);
        }
        Ok(())
    }
}

/// Concept breakdown behind a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptAnalysis {
    pub hypothesis_concepts: ConceptSet,
    pub reference_concepts: ConceptSet,
    pub matching_concepts: ConceptSet,
    pub conflicting_concepts: ConceptSet,
}

/// Immutable outcome of one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// In `[0, 1]`. Whole values serialize as `0`/`1`, not `0.0`/`1.0`.
    #[serde(serialize_with = "serialize_score")]
    pub fidelity_score: f64,
    pub hallucination_risk: RiskLevel,
    pub analysis: ConceptAnalysis,
    pub rationale: String,
}

fn serialize_score<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
    if v.fract() == 0.0 && (0.0..=1.0).contains(v) {
        s.serialize_u64(*v as u64)
    } else {
        s.serialize_f64(*v)
    }
}

/// Recoverable evaluation failures. Serialized as `{"kind": "..."}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum EvaluationError {
    #[error("Please provide a gold/reference answer before running evaluation.")]
    MissingReference,
    #[error("Please provide the generated response to evaluate.")]
    MissingHypothesis,
    #[error("An evaluation is already in progress.")]
    InFlight,
    #[error("The evaluation was cancelled before it completed.")]
    Cancelled,
}

impl EvaluationError {
    /// Short heading for user-facing notifications.
    pub fn title(&self) -> &'static str {
        match self {
            Self::MissingReference => "Missing Reference",
            Self::MissingHypothesis => "Missing Response",
            Self::InFlight => "Evaluation In Progress",
            Self::Cancelled => "Evaluation Cancelled",
        }
    }

    /// Stable machine-readable code (matches the serialized `kind`).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingReference => "MissingReference",
            Self::MissingHypothesis => "MissingHypothesis",
            Self::InFlight => "InFlight",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingReference | Self::MissingHypothesis)
    }
}

/// Score two texts. Total: blank inputs yield empty concept sets, fidelity 0
/// and Low risk.
pub fn score_texts(hypothesis: &str, reference: &str) -> EvaluationResult {
    let hypothesis_concepts = extract(hypothesis);
    let reference_concepts = extract(reference);
    let s = score(&hypothesis_concepts, &reference_concepts);

    EvaluationResult {
        fidelity_score: s.fidelity,
        hallucination_risk: s.risk,
        rationale: rationale(&s.matching, &s.conflicting, s.fidelity),
        analysis: ConceptAnalysis {
            hypothesis_concepts,
            reference_concepts,
            matching_concepts: s.matching,
            conflicting_concepts: s.conflicting,
        },
    }
}

/// Validate, then score. The prompt is carried for display only.
pub fn evaluate(req: &EvaluationRequest) -> Result<EvaluationResult, EvaluationError> {
    req.validate()?;
    Ok(score_texts(&req.hypothesis, &req.reference))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eiffel() -> EvaluationRequest {
        EvaluationRequest::new(
            "Where is the Eiffel Tower located?",
            "The Eiffel Tower is in Rome, Italy.",
            "The Eiffel Tower is in Paris, France, located on the Champ de Mars.",
        )
    }

    #[test]
    fn eiffel_end_to_end() {
        let r = evaluate(&eiffel()).expect("valid request");
        let a = &r.analysis;
        assert_eq!(
            a.hypothesis_concepts.as_slice(),
            ["the", "eiffel", "tower", "rome", "italy"]
        );
        assert_eq!(
            a.reference_concepts.as_slice(),
            ["the", "eiffel", "tower", "paris", "france", "located", "champ", "mars"]
        );
        assert_eq!(a.matching_concepts.as_slice(), ["the", "eiffel", "tower"]);
        assert_eq!(a.conflicting_concepts.as_slice(), ["rome", "italy"]);
        assert!((r.fidelity_score - 0.375).abs() < 1e-12);
        assert_eq!(r.hallucination_risk, RiskLevel::Medium);
        assert!(r.rationale.contains("37.5%"));
    }

    #[test]
    fn blank_reference_is_rejected() {
        let mut req = eiffel();
        req.reference = "  \n ".into();
        assert_eq!(evaluate(&req), Err(EvaluationError::MissingReference));
    }

    #[test]
    fn blank_hypothesis_is_rejected_first() {
        let req = EvaluationRequest::new("q", "", "");
        assert_eq!(evaluate(&req), Err(EvaluationError::MissingHypothesis));
    }

    #[test]
    fn prompt_does_not_affect_score() {
        let a = evaluate(&eiffel()).unwrap();
        let mut other = eiffel();
        other.prompt = String::new();
        assert_eq!(evaluate(&other).unwrap(), a);
    }

    #[test]
    fn scoring_blank_text_is_total() {
        let r = score_texts("", "");
        assert_eq!(r.fidelity_score, 0.0);
        assert_eq!(r.hallucination_risk, RiskLevel::Low);
        assert!(r.analysis.hypothesis_concepts.is_empty());
    }

    #[test]
    fn error_serializes_with_kind_tag() {
        let json = serde_json::to_value(EvaluationError::MissingReference).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "MissingReference" }));
        assert_eq!(EvaluationError::MissingReference.title(), "Missing Reference");
        assert!(EvaluationError::MissingReference.is_validation());
        assert!(!EvaluationError::InFlight.is_validation());
    }

    #[test]
    fn whole_scores_serialize_as_integers() {
        let zero = serde_json::to_string(&score_texts("alpha beta", "gamma delta")).unwrap();
        assert!(zero.starts_with("{\"fidelity_score\":0,"), "{zero}");
        let one = serde_json::to_string(&score_texts("Paris France", "Paris France")).unwrap();
        assert!(one.starts_with("{\"fidelity_score\":1,"), "{one}");

        let back: EvaluationResult = serde_json::from_str(&one).unwrap();
        assert_eq!(back.fidelity_score, 1.0);
    }

    #[test]
    fn result_json_shape() {
        let r = evaluate(&eiffel()).unwrap();
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["hallucination_risk"], "Medium");
        assert_eq!(v["analysis"]["conflicting_concepts"], serde_json::json!(["rome", "italy"]));
        assert!(v["rationale"].is_string());
    }
}
