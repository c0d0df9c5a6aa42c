//! HTTP gateway (Axum) for embedding and similarity requests.
//!
//! This module is primarily used by the `codesim` server binary.

#![allow(missing_docs)]

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
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::GatewayError;
pub use handler::{batch_similarity_handler, embed_handler, similarity_handler};
pub use state::HandlerState;

use crate::constants::{CODESIM_STATUS_HEADER, CODESIM_STATUS_HEALTHY, CODESIM_STATUS_NOT_READY};
use crate::embedding::EncoderStatus;

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/embed", post(embed_handler))
        .route("/similarity", post(similarity_handler))
        .route("/batch-similarity", post(batch_similarity_handler))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub type HealthResponse = EncoderStatus;

#[tracing::instrument(skip(state))]
pub async fn health_handler(State(state): State<HandlerState>) -> Response {
    let (status_code, status_msg) = if state.status.ok {
        (StatusCode::OK, CODESIM_STATUS_HEALTHY)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, CODESIM_STATUS_NOT_READY)
    };

    let mut headers = HeaderMap::new();
    headers.insert(CODESIM_STATUS_HEADER, HeaderValue::from_static(status_msg));

    let body: HealthResponse = state.status.as_ref().clone();
    (status_code, headers, Json(body)).into_response()
}
