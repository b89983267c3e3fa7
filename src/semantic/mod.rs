//! Semantic relevance scoring via embedding cosine similarity.
//!
//! Deterministic and side-effect free: identical inputs against the same
//! embedding backend yield bit-identical scores, and the cosine-to-score
//! mapping is monotonic.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::backend::EmbedBackend;
use crate::payload::{MAX_SCORE, MIN_SCORE};
use crate::slides::SLIDE_MARKER;

/// Relevance score in `[0, 10]`, clamped on construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelevanceSignal(f64);

impl RelevanceSignal {
    /// Midpoint value used when a producer cannot compute a signal.
    pub const NEUTRAL: RelevanceSignal = RelevanceSignal(5.0);

    /// Creates a signal, clamping into `[0, 10]` (non-finite collapses to 0).
    pub fn new(value: f64) -> Self {
        Self(crate::payload::clamp_score(value))
    }

    /// The clamped numeric value.
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Maps a cosine similarity in `[-1, 1]` onto `[0, 10]`.
///
/// Clamped after the transform to absorb floating-point overshoot; strictly
/// monotonic over the open interval.
pub fn map_cosine_to_score(cosine: f32) -> f64 {
    let score = ((f64::from(cosine) + 1.0) / 2.0) * MAX_SCORE;
    score.clamp(MIN_SCORE, MAX_SCORE)
}

/// Cosine similarity of two vectors; 0.0 for mismatched or zero-norm input.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (dot, norm_a_sq, norm_b_sq) =
        a.iter()
            .zip(b.iter())
            .fold((0.0f32, 0.0f32, 0.0f32), |(dot, na, nb), (&av, &bv)| {
                (dot + av * bv, na + av * av, nb + bv * bv)
            });

    let norm_a = norm_a_sq.sqrt();
    let norm_b = norm_b_sq.sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Computes the embedding-based relevance between a problem statement and a
/// document synopsis.
pub struct SemanticScorer<E: EmbedBackend> {
    embedder: Arc<E>,
}

impl<E: EmbedBackend> std::fmt::Debug for SemanticScorer<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticScorer")
            .field("embedding_dim", &self.embedder.embedding_dim())
            .finish()
    }
}

impl<E: EmbedBackend> SemanticScorer<E> {
    pub fn new(embedder: Arc<E>) -> Self {
        Self { embedder }
    }

    /// Scores how well `synopsis` matches `problem_statement`.
    ///
    /// An empty synopsis scores 0.0. A synopsis whose slide segments are
    /// all blank (only slide markers survive joining) counts as empty too.
    /// Embedding failures degrade to the neutral midpoint rather than
    /// failing the request.
    pub fn score(&self, problem_statement: &str, synopsis: &str) -> RelevanceSignal {
        if synopsis
            .split(SLIDE_MARKER)
            .all(|segment| segment.trim().is_empty())
        {
            return RelevanceSignal::new(0.0);
        }

        let problem_embedding = match self.embedder.embed(problem_statement) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Problem-statement embedding failed, using neutral relevance");
                return RelevanceSignal::NEUTRAL;
            }
        };

        let synopsis_embedding = match self.embedder.embed(synopsis) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Synopsis embedding failed, using neutral relevance");
                return RelevanceSignal::NEUTRAL;
            }
        };

        let cosine = cosine_similarity(&problem_embedding, &synopsis_embedding);
        let signal = RelevanceSignal::new(map_cosine_to_score(cosine));

        debug!(
            cosine,
            score = signal.value(),
            "Semantic relevance computed"
        );

        signal
    }
}
