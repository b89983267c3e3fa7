use thiserror::Error;

use super::embedder::EmbeddingError;

/// Errors produced by model backends.
///
/// Every variant is recoverable at the stage that observes it: condensation
/// degrades per slide, the reasoning evaluator retries and then falls back.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("provider request failed: {reason}")]
    Provider { reason: String },

    #[error("provider returned an empty response")]
    EmptyOutput,

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),
}
