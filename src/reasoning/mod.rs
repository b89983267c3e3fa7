//! Structured reasoning evaluation with bounded parse/repair retries.
//!
//! One generative call with a strict output contract yields the five
//! dimension scores, qualitative lists, and narrative. Because the backend
//! may return arbitrary malformed text, decoding runs as an explicit state
//! machine — PARSE → VALIDATE → REPAIR → DONE/FALLBACK — whose only mutable
//! state is the attempt counter, so the retry bound and terminal states are
//! auditable. The evaluator never surfaces an error: exhausted retries
//! produce a conservative neutral payload.

pub mod parse;
pub mod prompt;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::backend::{GenerateBackend, GenerationLimits};
use crate::payload::{DimensionScores, GenerativePayload};

/// Default total generate attempts (including the first).
pub const DEFAULT_RETRY_BUDGET: u32 = 3;

/// Terminal report of one reasoning evaluation.
#[derive(Debug, Clone)]
pub struct ReasoningOutcome {
    pub payload: GenerativePayload,
    /// Generate attempts consumed.
    pub attempts: u32,
    /// True if the neutral fallback payload was used.
    pub fell_back: bool,
}

enum EvalState {
    Generate { prompt: String },
    Parse { raw: String },
    Validate { raw: String, candidate: Value },
    Repair { previous: String, reason: String },
    Done(GenerativePayload),
    Fallback,
}

/// Runs the structured evaluation prompt against the selected generative
/// backend.
pub struct ReasoningEvaluator<G: GenerateBackend> {
    backend: Arc<G>,
    limits: GenerationLimits,
    retry_budget: u32,
    timeout: Duration,
}

impl<G: GenerateBackend> std::fmt::Debug for ReasoningEvaluator<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReasoningEvaluator")
            .field("limits", &self.limits)
            .field("retry_budget", &self.retry_budget)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl<G: GenerateBackend> ReasoningEvaluator<G> {
    /// Creates an evaluator with the given budgets.
    ///
    /// `retry_budget` counts total generate attempts, first included, and is
    /// floored at 1.
    pub fn new(backend: Arc<G>, limits: GenerationLimits, retry_budget: u32, timeout: Duration) -> Self {
        Self {
            backend,
            limits,
            retry_budget: retry_budget.max(1),
            timeout,
        }
    }

    /// Evaluates `synopsis` against `problem_statement`.
    ///
    /// Always returns a schema-valid payload; malformed output across the
    /// whole retry budget yields the neutral fallback.
    pub async fn evaluate(&self, problem_statement: &str, synopsis: &str) -> ReasoningOutcome {
        let base_prompt = prompt::build_prompt(problem_statement, synopsis, &self.limits);

        let mut attempts = 0u32;
        let mut state = EvalState::Generate {
            prompt: base_prompt.clone(),
        };

        loop {
            state = match state {
                EvalState::Generate { prompt } => {
                    if attempts >= self.retry_budget {
                        EvalState::Fallback
                    } else {
                        attempts += 1;
                        self.generate_once(&prompt, &base_prompt, attempts).await
                    }
                }

                EvalState::Parse { raw } => match parse::extract_json_object(&raw) {
                    Some(doc) => match serde_json::from_str::<Value>(doc) {
                        Ok(candidate) => EvalState::Validate { raw, candidate },
                        Err(e) => {
                            debug!(error = %e, "Extracted document failed to decode");
                            EvalState::Repair {
                                previous: raw,
                                reason: format!("the JSON document did not decode: {e}"),
                            }
                        }
                    },
                    None => EvalState::Repair {
                        previous: raw,
                        reason: "no balanced JSON object was found in the reply".to_string(),
                    },
                },

                EvalState::Validate { raw, candidate } => {
                    match parse::validate_payload(&candidate) {
                        Ok(payload) => EvalState::Done(payload),
                        Err(reason) => {
                            debug!(reason, "Generative payload failed validation");
                            EvalState::Repair {
                                previous: raw,
                                reason,
                            }
                        }
                    }
                }

                EvalState::Repair { previous, reason } => EvalState::Generate {
                    prompt: prompt::build_repair_prompt(&base_prompt, &previous, &reason, &self.limits),
                },

                EvalState::Done(payload) => {
                    info!(attempts, "Structured reasoning evaluation complete");
                    return ReasoningOutcome {
                        payload,
                        attempts,
                        fell_back: false,
                    };
                }

                EvalState::Fallback => {
                    warn!(
                        attempts,
                        "Retry budget exhausted, returning neutral fallback payload"
                    );
                    return ReasoningOutcome {
                        payload: fallback_payload(),
                        attempts,
                        fell_back: true,
                    };
                }
            };
        }
    }

    async fn generate_once(&self, prompt: &str, base_prompt: &str, attempt: u32) -> EvalState {
        debug!(
            attempt,
            budget = self.retry_budget,
            prompt_len = prompt.len(),
            "Generating structured evaluation"
        );

        match tokio::time::timeout(self.timeout, self.backend.generate(prompt, &self.limits)).await
        {
            Ok(Ok(raw)) => EvalState::Parse { raw },
            Ok(Err(e)) => {
                warn!(attempt, error = %e, "Generative backend call failed");
                EvalState::Generate {
                    prompt: base_prompt.to_string(),
                }
            }
            Err(_) => {
                warn!(attempt, "Generative backend call timed out");
                EvalState::Generate {
                    prompt: base_prompt.to_string(),
                }
            }
        }
    }
}

/// Conservative payload used when reasoning cannot complete: every
/// dimension at the neutral midpoint, no qualitative claims.
pub fn fallback_payload() -> GenerativePayload {
    GenerativePayload {
        scores: DimensionScores::uniform(5.0),
        strengths: Vec::new(),
        weaknesses: Vec::new(),
        missing_elements: Vec::new(),
        summary_evaluation: "Automated evaluation could not complete structured reasoning; \
             neutral midpoint scores were applied."
            .to_string(),
    }
}
