use axum::{Json, extract::State};
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};

use crate::gateway::error::GatewayError;
use crate::gateway::payload::{
    BatchSimilarityRequest, BatchSimilarityResponse, EmbedRequest, EmbedResponse,
    SimilarityRequest, SimilarityResponse,
};
use crate::gateway::state::HandlerState;
use crate::similarity::{SimilarityEngine, SimilarityError};
use std::sync::Arc;

#[instrument(skip(state, request))]
pub async fn embed_handler(
    State(state): State<HandlerState>,
    Json(request): Json<serde_json::Value>,
) -> Result<Json<EmbedResponse>, GatewayError> {
    let request: EmbedRequest = parse_request(request)?;
    let engine = state.engine()?;

    let embedding = run_blocking(engine, move |engine| engine.embed(&request.code)).await?;
    debug!(dim = embedding.dim(), "Embedded snippet");

    Ok(Json(EmbedResponse::from(embedding)))
}

#[instrument(skip(state, request))]
pub async fn similarity_handler(
    State(state): State<HandlerState>,
    Json(request): Json<serde_json::Value>,
) -> Result<Json<SimilarityResponse>, GatewayError> {
    let request: SimilarityRequest = parse_request(request)?;
    let engine = state.engine()?;

    let cosine = run_blocking(engine, move |engine| {
        engine.similarity(&request.a, &request.b)
    })
    .await?;

    Ok(Json(SimilarityResponse { cosine }))
}

#[instrument(skip(state, request), fields(snippets = tracing::field::Empty))]
pub async fn batch_similarity_handler(
    State(state): State<HandlerState>,
    Json(request): Json<serde_json::Value>,
) -> Result<Json<BatchSimilarityResponse>, GatewayError> {
    let request: BatchSimilarityRequest = parse_request(request)?;
    tracing::Span::current().record("snippets", request.snippets.len());

    if request.snippets.len() > state.max_batch {
        return Err(GatewayError::InvalidRequest(format!(
            "batch of {} snippets exceeds limit of {}",
            request.snippets.len(),
            state.max_batch
        )));
    }

    let engine = state.engine()?;
    let matrix = run_blocking(engine, move |engine| {
        engine.batch_similarity(&request.snippets)
    })
    .await?;

    Ok(Json(BatchSimilarityResponse { matrix }))
}

fn parse_request<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, GatewayError> {
    serde_json::from_value(value)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))
}

/// Runs a compute closure off the async reactor.
async fn run_blocking<T, F>(engine: Arc<SimilarityEngine>, f: F) -> Result<T, GatewayError>
where
    T: Send + 'static,
    F: FnOnce(&SimilarityEngine) -> Result<T, SimilarityError> + Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || f(&engine))
        .await
        .map_err(|e| {
            error!(error = %e, "Embedding task failed");
            GatewayError::InternalError(format!("Embedding task failed: {}", e))
        })?;

    result.map_err(|e| {
        error!(error = %e, "Embedding request failed");
        GatewayError::from(e)
    })
}
