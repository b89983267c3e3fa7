//! HTTP gateway (Axum) for document evaluation.
//!
//! This module is primarily used by the `podium` server binary.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::evaluate_handler;
pub use payload::EvaluateRequest;
pub use state::HandlerState;

use crate::backend::{CondenseBackend, EmbedBackend, GenerateBackend};

/// Response header carrying a machine-readable request status.
pub const PODIUM_STATUS_HEADER: &str = "x-podium-status";

pub const PODIUM_STATUS_HEALTHY: &str = "healthy";
pub const PODIUM_STATUS_READY: &str = "ready";

pub fn create_router_with_state<C, E, G>(state: HandlerState<C, E, G>) -> Router
where
    C: CondenseBackend + 'static,
    E: EmbedBackend + 'static,
    G: GenerateBackend + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/v1/evaluations", post(evaluate_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub generative: String,
    pub tier: &'static str,
    pub embedder_mode: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        PODIUM_STATUS_HEADER,
        HeaderValue::from_static(PODIUM_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler<C, E, G>(State(state): State<HandlerState<C, E, G>>) -> Response
where
    C: CondenseBackend + 'static,
    E: EmbedBackend + 'static,
    G: GenerateBackend + 'static,
{
    let embedder_mode = if state.embedder_stub { "stub" } else { "real" };

    let components = ComponentStatus {
        http: PODIUM_STATUS_READY,
        generative: state.model.clone(),
        tier: state.tier.as_str(),
        embedder_mode,
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        PODIUM_STATUS_HEADER,
        HeaderValue::from_static(PODIUM_STATUS_READY),
    );

    (
        StatusCode::OK,
        headers,
        Json(ReadyResponse {
            status: "ok",
            components,
        }),
    )
        .into_response()
}
