use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::gateway::PODIUM_STATUS_HEADER;
use crate::orchestrator::EvalError;

/// Provider failures never reach this layer: condensation degrades to
/// truncated raw text and reasoning falls back to a neutral payload, so
/// requests map to 400 or 500 only.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

impl From<EvalError> for GatewayError {
    fn from(err: EvalError) -> Self {
        match err {
            EvalError::EmptyProblemStatement => GatewayError::InvalidRequest(err.to_string()),
            EvalError::Reconcile(_) | EvalError::Internal { .. } => {
                GatewayError::InternalError(err.to_string())
            }
        }
    }
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, podium_status) = match &self {
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            GatewayError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            PODIUM_STATUS_HEADER,
            HeaderValue::from_str(podium_status).unwrap_or(HeaderValue::from_static("error")),
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
