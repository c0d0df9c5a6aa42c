use serde::{Deserialize, Serialize};

use crate::embedding::Embedding;
use crate::similarity::SimilarityMatrix;

#[derive(Deserialize, Debug, Clone)]
pub struct EmbedRequest {
    pub code: String,
}

#[derive(Serialize, Debug, Clone)]
pub struct EmbedResponse {
    pub dim: usize,
    pub vector: Embedding,
}

impl From<Embedding> for EmbedResponse {
    fn from(vector: Embedding) -> Self {
        Self {
            dim: vector.dim(),
            vector,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct SimilarityRequest {
    pub a: String,
    pub b: String,
}

#[derive(Serialize, Debug, Clone, Copy)]
pub struct SimilarityResponse {
    pub cosine: f32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BatchSimilarityRequest {
    pub snippets: Vec<String>,
}

#[derive(Serialize, Debug, Clone)]
pub struct BatchSimilarityResponse {
    pub matrix: SimilarityMatrix,
}
