//! Score reconciliation.
//!
//! Blends the generative relevance judgement with the independent semantic
//! signal, clamps every dimension into contract bounds, and assembles the
//! final [`EvaluationResult`]. The blend is deliberately asymmetric: the
//! generative judge reads the full synopsis and carries most of the weight,
//! while the embedding signal acts as a topical anchor that tempers
//! hallucinated relevance in either direction.

mod error;


pub use error::ReconcileError;

use tracing::debug;

use crate::payload::{
    EvaluationMetadata, EvaluationResult, GenerativePayload, MAX_OVERALL_SCORE, MAX_SCORE,
    MIN_SCORE, clamp_score,
};
use crate::semantic::RelevanceSignal;

/// Weight of the generative judge's relevance score in the blend.
pub const GENERATIVE_RELEVANCE_WEIGHT: f64 = 0.7;

/// Weight of the embedding-based semantic signal in the blend.
pub const SEMANTIC_RELEVANCE_WEIGHT: f64 = 0.3;

/// Assembles the final result from the generative payload and the semantic
/// relevance signal.
///
/// Every dimension is clamped into `[0, 10]` before the blend and the sum,
/// so a payload that slipped past generative-side validation still cannot
/// push `overall_score` outside `[0, 50]`.
pub fn reconcile(
    payload: GenerativePayload,
    semantic: RelevanceSignal,
    slide_count: usize,
) -> Result<EvaluationResult, ReconcileError> {
    let llm_relevance = clamp_score(payload.scores.relevance);
    let adjusted = clamp_score(
        GENERATIVE_RELEVANCE_WEIGHT * llm_relevance
            + SEMANTIC_RELEVANCE_WEIGHT * semantic.value(),
    );

    let mut scores = payload.scores.clamped();
    scores.relevance = adjusted;

    let overall_score = scores.total();

    debug!(
        llm_relevance,
        semantic_relevance = semantic.value(),
        adjusted_relevance = adjusted,
        overall_score,
        "Reconciled evaluation scores"
    );

    let result = EvaluationResult {
        scores,
        overall_score,
        strengths: payload.strengths,
        weaknesses: payload.weaknesses,
        missing_elements: payload.missing_elements,
        summary_evaluation: payload.summary_evaluation,
        metadata: EvaluationMetadata {
            slide_count,
            semantic_relevance_score: semantic.value(),
            llm_relevance_score: llm_relevance,
            adjusted_relevance_score: adjusted,
        },
    };

    check_invariants(&result)?;
    Ok(result)
}

fn check_invariants(result: &EvaluationResult) -> Result<(), ReconcileError> {
    if !result.scores.in_bounds() {
        return Err(ReconcileError::InvariantViolation {
            reason: format!("a dimension score left [{MIN_SCORE}, {MAX_SCORE}]"),
        });
    }

    let expected = result.scores.total();
    if result.overall_score != expected {
        return Err(ReconcileError::InvariantViolation {
            reason: format!(
                "overall_score {} is not the dimension sum {expected}",
                result.overall_score
            ),
        });
    }

    if !(MIN_SCORE..=MAX_OVERALL_SCORE).contains(&result.overall_score) {
        return Err(ReconcileError::InvariantViolation {
            reason: format!(
                "overall_score {} left [{MIN_SCORE}, {MAX_OVERALL_SCORE}]",
                result.overall_score
            ),
        });
    }

    Ok(())
}
