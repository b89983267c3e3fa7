//! Model backend capability interfaces and implementations.
//!
//! The orchestration stages only see three capabilities: condense text,
//! embed text, generate text. Concrete backend identity (provider, model
//! name, compute device) is resolved once by the [`selector`] and injected
//! into the stages, so no tier-conditional branches leak into the pipeline.

/// Compute device probing (CPU / Metal / CUDA).
pub mod device;
/// Candle embedding model (MiniLM-class BERT).
pub mod embedder;
mod error;
/// Provider-backed condense/generate backends.
pub mod provider;
/// One-time model tier selection.
pub mod selector;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use embedder::{DeckEmbedder, EmbedderConfig, EmbeddingError};
pub use error::BackendError;
pub use provider::ProviderBackend;
pub use selector::{
    BackendProfile, BackendSelector, ComputeCapability, ComputeTarget, GenerationLimits, ModelTier,
};

use std::future::Future;

/// Capability to reduce raw slide text into a bounded synopsis.
pub trait CondenseBackend: Send + Sync {
    /// Condenses `text` into a synopsis within `limits.max_output_tokens`.
    fn condense(
        &self,
        text: &str,
        limits: &GenerationLimits,
    ) -> impl Future<Output = Result<String, BackendError>> + Send;
}

/// Capability to embed text into a fixed-dimensional vector.
///
/// Embedding is synchronous: candle inference is compute-bound, and callers
/// that need concurrency move it onto a blocking thread.
pub trait EmbedBackend: Send + Sync {
    /// Embeds a single string into an L2-normalized vector.
    fn embed(&self, text: &str) -> Result<Vec<f32>, BackendError>;

    /// Dimension of the vectors returned by [`EmbedBackend::embed`].
    fn embedding_dim(&self) -> usize;
}

/// Capability to generate free-form text from a prompt.
pub trait GenerateBackend: Send + Sync {
    /// Generates a completion for `prompt`, bounded by `limits`.
    fn generate(
        &self,
        prompt: &str,
        limits: &GenerationLimits,
    ) -> impl Future<Output = Result<String, BackendError>> + Send;
}
