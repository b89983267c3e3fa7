//! Provider-backed condense and generate backends.
//!
//! One [`ProviderBackend`] wraps one model identifier; the condensation
//! stage and the reasoning evaluator each get their own instance, so the
//! condensation model stays lightweight regardless of the selected
//! generative tier.

use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use tracing::debug;

use super::error::BackendError;
use super::selector::GenerationLimits;
use super::{CondenseBackend, GenerateBackend};

/// Near-deterministic sampling for scoring work.
const SCORING_TEMPERATURE: f64 = 0.2;

const CONDENSE_INSTRUCTION: &str = "Condense the following slide content into one short, \
     information-dense paragraph. Keep concrete facts, names, and numbers. \
     Reply with only the synopsis, no preamble.";

/// Chat-provider backend for text generation and condensation.
#[derive(Clone)]
pub struct ProviderBackend {
    client: Client,
    model: String,
}

impl std::fmt::Debug for ProviderBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderBackend")
            .field("model", &self.model)
            .finish()
    }
}

impl ProviderBackend {
    /// Creates a backend for the given model identifier.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
        }
    }

    /// The model identifier this backend talks to.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn exec(&self, prompt: &str, limits: &GenerationLimits) -> Result<String, BackendError> {
        debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            max_output_tokens = limits.max_output_tokens,
            "Dispatching provider request"
        );

        let request = ChatRequest::new(vec![ChatMessage::user(prompt)]);
        let options = ChatOptions::default()
            .with_temperature(SCORING_TEMPERATURE)
            .with_max_tokens(limits.max_output_tokens);

        let response = self
            .client
            .exec_chat(&self.model, request, Some(&options))
            .await
            .map_err(|e| BackendError::Provider {
                reason: e.to_string(),
            })?;

        let text = response.first_text().unwrap_or_default().trim().to_string();
        if text.is_empty() {
            return Err(BackendError::EmptyOutput);
        }

        Ok(text)
    }
}

impl GenerateBackend for ProviderBackend {
    async fn generate(&self, prompt: &str, limits: &GenerationLimits) -> Result<String, BackendError> {
        self.exec(prompt, limits).await
    }
}

impl CondenseBackend for ProviderBackend {
    async fn condense(&self, text: &str, limits: &GenerationLimits) -> Result<String, BackendError> {
        let prompt = format!("{CONDENSE_INSTRUCTION}\n\n{text}");
        self.exec(&prompt, limits).await
    }
}
