//! Wire-contract types for evaluation results.
//!
//! Field names and numeric bounds are part of the external contract and must
//! not change: `scores{relevance,clarity,technical_accuracy,structure,
//! completeness}` in [0,10], `overall_score` in [0,50], qualitative string
//! lists, and a metadata record carrying relevance provenance.


use serde::{Deserialize, Serialize};

/// Lower bound of every dimension score.
pub const MIN_SCORE: f64 = 0.0;

/// Upper bound of every dimension score.
pub const MAX_SCORE: f64 = 10.0;

/// Upper bound of `overall_score` (five dimensions at [`MAX_SCORE`]).
pub const MAX_OVERALL_SCORE: f64 = 50.0;

/// Clamps a score into `[MIN_SCORE, MAX_SCORE]`.
///
/// Non-finite inputs (a NaN from a division upstream, or adversarial JSON
/// decoded as infinity) collapse to [`MIN_SCORE`] rather than poisoning the
/// sum.
pub fn clamp_score(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(MIN_SCORE, MAX_SCORE)
    } else {
        MIN_SCORE
    }
}

/// The five independently bounded dimension scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionScores {
    pub relevance: f64,
    pub clarity: f64,
    pub technical_accuracy: f64,
    pub structure: f64,
    pub completeness: f64,
}

impl DimensionScores {
    /// All dimensions at the same value.
    pub fn uniform(value: f64) -> Self {
        Self {
            relevance: value,
            clarity: value,
            technical_accuracy: value,
            structure: value,
            completeness: value,
        }
    }

    /// Returns a copy with every field clamped into bounds.
    pub fn clamped(&self) -> Self {
        Self {
            relevance: clamp_score(self.relevance),
            clarity: clamp_score(self.clarity),
            technical_accuracy: clamp_score(self.technical_accuracy),
            structure: clamp_score(self.structure),
            completeness: clamp_score(self.completeness),
        }
    }

    /// Exact sum of the five dimensions.
    pub fn total(&self) -> f64 {
        self.relevance + self.clarity + self.technical_accuracy + self.structure + self.completeness
    }

    /// Returns `true` if every field lies in `[MIN_SCORE, MAX_SCORE]`.
    pub fn in_bounds(&self) -> bool {
        [
            self.relevance,
            self.clarity,
            self.technical_accuracy,
            self.structure,
            self.completeness,
        ]
        .iter()
        .all(|v| v.is_finite() && (MIN_SCORE..=MAX_SCORE).contains(v))
    }
}

/// Payload produced by the structured reasoning evaluator, before the
/// reconciler overwrites the relevance dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerativePayload {
    pub scores: DimensionScores,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub missing_elements: Vec<String>,
    pub summary_evaluation: String,
}

/// Provenance of the reconciled relevance value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetadata {
    pub slide_count: usize,
    pub semantic_relevance_score: f64,
    pub llm_relevance_score: f64,
    pub adjusted_relevance_score: f64,
}

/// The sole externally visible artifact of an evaluation.
///
/// Constructed once per request by the reconciler and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub scores: DimensionScores,
    pub overall_score: f64,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub missing_elements: Vec<String>,
    pub summary_evaluation: String,
    pub metadata: EvaluationMetadata,
}

impl EvaluationResult {
    /// Result returned for a document with zero slides: everything at zero.
    pub fn empty_document() -> Self {
        Self {
            scores: DimensionScores::uniform(0.0),
            overall_score: 0.0,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            missing_elements: Vec::new(),
            summary_evaluation: "The document contained no slides; nothing to evaluate."
                .to_string(),
            metadata: EvaluationMetadata {
                slide_count: 0,
                semantic_relevance_score: 0.0,
                llm_relevance_score: 0.0,
                adjusted_relevance_score: 0.0,
            },
        }
    }
}
