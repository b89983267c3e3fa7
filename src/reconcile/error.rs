//! Reconciliation error types.

use thiserror::Error;

/// Errors raised while assembling the final evaluation result.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A result invariant did not hold after assembly. This indicates a
    /// bug in the reconciler rather than bad model output, which is
    /// clamped before it reaches the invariant checks.
    #[error("result invariant violated: {reason}")]
    InvariantViolation { reason: String },
}
