use axum::{Json, extract::State};
use tracing::{info, instrument};

use crate::backend::{CondenseBackend, EmbedBackend, GenerateBackend};
use crate::gateway::error::GatewayError;
use crate::gateway::payload::EvaluateRequest;
use crate::gateway::state::HandlerState;
use crate::payload::EvaluationResult;

#[instrument(skip(state, request), fields(slide_count = request.slides.len()))]
pub async fn evaluate_handler<C, E, G>(
    State(state): State<HandlerState<C, E, G>>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<EvaluationResult>, GatewayError>
where
    C: CondenseBackend + 'static,
    E: EmbedBackend + 'static,
    G: GenerateBackend + 'static,
{
    if request.problem_statement.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(
            "problem_statement must not be empty".to_string(),
        ));
    }

    let result = state
        .orchestrator
        .evaluate(&request.problem_statement, &request.slides)
        .await?;

    info!(
        overall_score = result.overall_score,
        adjusted_relevance = result.metadata.adjusted_relevance_score,
        "Evaluation request complete"
    );

    Ok(Json(result))
}
