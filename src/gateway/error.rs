use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::constants::CODESIM_STATUS_HEADER;
use crate::embedding::EmbeddingError;
use crate::similarity::SimilarityError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("embedding failed: {0}")]
    EmbeddingFailed(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl GatewayError {
    /// Value written to the status header for this error class.
    pub fn status_label(&self) -> &'static str {
        match self {
            GatewayError::InvalidRequest(_) => "invalid_request",
            GatewayError::ModelUnavailable(_) => "model_unavailable",
            GatewayError::EmbeddingFailed(_) => "embedding_error",
            GatewayError::InternalError(_) => "internal_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::ModelUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            GatewayError::EmbeddingFailed(_) | GatewayError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<SimilarityError> for GatewayError {
    fn from(err: SimilarityError) -> Self {
        match err {
            SimilarityError::Embedding(EmbeddingError::ModelNotFound { .. })
            | SimilarityError::Embedding(EmbeddingError::ModelLoadFailed { .. }) => {
                GatewayError::ModelUnavailable(err.to_string())
            }
            SimilarityError::Embedding(_) => GatewayError::EmbeddingFailed(err.to_string()),
            SimilarityError::DimensionMismatch { .. } => {
                GatewayError::InternalError(err.to_string())
            }
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let mut headers = HeaderMap::new();
        headers.insert(
            CODESIM_STATUS_HEADER,
            HeaderValue::from_static(self.status_label()),
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
