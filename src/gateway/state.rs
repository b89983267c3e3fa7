use std::sync::Arc;

use crate::backend::{CondenseBackend, EmbedBackend, GenerateBackend, ModelTier};
use crate::orchestrator::Orchestrator;

/// Shared handler state.
///
/// `Clone` is implemented by hand because deriving it would require the
/// backend type parameters themselves to be `Clone`.
pub struct HandlerState<C, E, G>
where
    C: CondenseBackend + 'static,
    E: EmbedBackend + 'static,
    G: GenerateBackend + 'static,
{
    pub orchestrator: Arc<Orchestrator<C, E, G>>,

    /// Tier the backend selector settled on.
    pub tier: ModelTier,

    /// Generative model identifier in use.
    pub model: String,

    /// True when the embedder runs in deterministic stub mode.
    pub embedder_stub: bool,
}

impl<C, E, G> Clone for HandlerState<C, E, G>
where
    C: CondenseBackend + 'static,
    E: EmbedBackend + 'static,
    G: GenerateBackend + 'static,
{
    fn clone(&self) -> Self {
        Self {
            orchestrator: Arc::clone(&self.orchestrator),
            tier: self.tier,
            model: self.model.clone(),
            embedder_stub: self.embedder_stub,
        }
    }
}

impl<C, E, G> HandlerState<C, E, G>
where
    C: CondenseBackend + 'static,
    E: EmbedBackend + 'static,
    G: GenerateBackend + 'static,
{
    pub fn new(
        orchestrator: Arc<Orchestrator<C, E, G>>,
        tier: ModelTier,
        model: String,
        embedder_stub: bool,
    ) -> Self {
        Self {
            orchestrator,
            tier,
            model,
            embedder_stub,
        }
    }
}
