//! Podium library crate (used by the server and integration tests).
//!
//! # Public API Surface
//!
//! The exports are organized by module:
//!
//! ## Core Types (Stable)
//! - [`Config`], [`ConfigError`] - Server configuration
//! - [`SlideRecord`], [`DocumentSynopsis`] - Document model
//! - [`EvaluationResult`], [`DimensionScores`], [`EvaluationMetadata`] - Wire contract
//!
//! ## Pipeline Stages
//! - [`CondensationStage`] - Per-slide synopsis generation
//! - [`SemanticScorer`], [`RelevanceSignal`] - Embedding-based relevance
//! - [`ReasoningEvaluator`], [`ReasoningOutcome`] - Structured generative judging
//! - [`reconcile`] - Score blending and final assembly
//! - [`Orchestrator`], [`EvalError`] - End-to-end coordination
//!
//! ## Backends
//! - [`BackendSelector`], [`BackendProfile`], [`ModelTier`] - One-time tier selection
//! - [`ProviderBackend`] - Provider-backed condense/generate
//! - [`DeckEmbedder`], [`EmbedderConfig`] - Local embedding inference
//!
//! ## Test/Mock Support
//! Mock backends are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod backend;
pub mod condense;
pub mod config;
pub mod gateway;
pub mod orchestrator;
pub mod payload;
pub mod reasoning;
pub mod reconcile;
pub mod semantic;
pub mod slides;

pub use backend::{
    BackendError, BackendProfile, BackendSelector, ComputeCapability, ComputeTarget,
    CondenseBackend, DeckEmbedder, EmbedBackend, EmbedderConfig, EmbeddingError, GenerateBackend,
    GenerationLimits, ModelTier, ProviderBackend,
};
#[cfg(any(test, feature = "mock"))]
pub use backend::mock::{MockCondenseBackend, MockEmbedBackend, MockGenerateBackend};

pub use condense::{CondensationStage, degraded_slide_count, truncate_tail};
pub use config::{Config, ConfigError};
pub use gateway::{EvaluateRequest, GatewayError, HandlerState, create_router_with_state};
pub use orchestrator::{EvalError, Orchestrator};
pub use payload::{
    DimensionScores, EvaluationMetadata, EvaluationResult, GenerativePayload, MAX_OVERALL_SCORE,
    MAX_SCORE, MIN_SCORE, clamp_score,
};
pub use reasoning::{
    DEFAULT_RETRY_BUDGET, ReasoningEvaluator, ReasoningOutcome, fallback_payload,
};
pub use reconcile::{
    GENERATIVE_RELEVANCE_WEIGHT, ReconcileError, SEMANTIC_RELEVANCE_WEIGHT, reconcile,
};
pub use semantic::{RelevanceSignal, SemanticScorer, cosine_similarity, map_cosine_to_score};
pub use slides::{DocumentSynopsis, SLIDE_MARKER, SlideRecord};
