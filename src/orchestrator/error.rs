//! Orchestration error types.

use thiserror::Error;

use crate::reconcile::ReconcileError;

/// Errors surfaced by a full evaluation pass.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The problem statement was empty after trimming.
    #[error("problem statement must not be empty")]
    EmptyProblemStatement,

    /// Final result assembly failed an invariant check.
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// A pipeline task failed outside its own error channel.
    #[error("internal evaluation failure: {reason}")]
    Internal { reason: String },
}
