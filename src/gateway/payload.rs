use serde::Deserialize;

use crate::slides::SlideRecord;

/// Request body for `POST /v1/evaluations`.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateRequest {
    /// The brief the deck is judged against.
    pub problem_statement: String,

    /// Slides in document order. May be empty.
    #[serde(default)]
    pub slides: Vec<SlideRecord>,
}
