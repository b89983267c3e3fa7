//! Evaluation pipeline orchestration.
//!
//! Drives one document through the full pass: condense every slide into a
//! synopsis, then score that synopsis twice in parallel — once with the
//! embedding-based semantic scorer, once with the generative structured
//! evaluator — and reconcile the two into the final result. The semantic
//! leg runs on the blocking pool because embedding inference is
//! CPU-bound, while the generative leg awaits network I/O.

mod error;


pub use error::EvalError;

use std::sync::Arc;

use tracing::{info, instrument};

use crate::backend::{CondenseBackend, EmbedBackend, GenerateBackend};
use crate::condense::CondensationStage;
use crate::payload::EvaluationResult;
use crate::reasoning::ReasoningEvaluator;
use crate::reconcile::reconcile;
use crate::semantic::SemanticScorer;
use crate::slides::SlideRecord;

/// Coordinates the three evaluation stages over concrete backends.
pub struct Orchestrator<C, E, G>
where
    C: CondenseBackend,
    E: EmbedBackend + 'static,
    G: GenerateBackend,
{
    condenser: CondensationStage<C>,
    scorer: Arc<SemanticScorer<E>>,
    reasoner: ReasoningEvaluator<G>,
}

impl<C, E, G> Orchestrator<C, E, G>
where
    C: CondenseBackend,
    E: EmbedBackend + 'static,
    G: GenerateBackend,
{
    pub fn new(
        condenser: CondensationStage<C>,
        scorer: Arc<SemanticScorer<E>>,
        reasoner: ReasoningEvaluator<G>,
    ) -> Self {
        Self {
            condenser,
            scorer,
            reasoner,
        }
    }

    /// Evaluates `slides` against `problem_statement`.
    ///
    /// An empty slide list is a valid request and yields the all-zero
    /// empty-document result without touching any backend.
    #[instrument(skip_all, fields(slide_count = slides.len()))]
    pub async fn evaluate(
        &self,
        problem_statement: &str,
        slides: &[SlideRecord],
    ) -> Result<EvaluationResult, EvalError> {
        let problem_statement = problem_statement.trim();
        if problem_statement.is_empty() {
            return Err(EvalError::EmptyProblemStatement);
        }

        if slides.is_empty() {
            info!("Document has no slides, returning empty-document result");
            return Ok(EvaluationResult::empty_document());
        }

        let synopsis = self.condenser.condense_document(slides).await;

        let scorer = Arc::clone(&self.scorer);
        let problem = problem_statement.to_string();
        let overall = synopsis.overall().to_string();
        let semantic_task =
            tokio::task::spawn_blocking(move || scorer.score(&problem, &overall));

        let (semantic, outcome) = tokio::join!(
            semantic_task,
            self.reasoner.evaluate(problem_statement, synopsis.overall()),
        );

        let semantic = semantic.map_err(|e| EvalError::Internal {
            reason: format!("semantic scoring task failed: {e}"),
        })?;

        info!(
            semantic_relevance = semantic.value(),
            attempts = outcome.attempts,
            fell_back = outcome.fell_back,
            "Evaluation stages complete"
        );

        Ok(reconcile(outcome.payload, semantic, slides.len())?)
    }
}
