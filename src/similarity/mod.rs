//! Cosine similarity over normalized code embeddings.
//!
//! Embeddings leave the pooler with unit norm, so cosine similarity is a plain
//! dot product. Batch scoring embeds each snippet once and fills the upper
//! triangle, mirroring it into the lower one.

pub mod engine;
pub mod error;
pub mod types;


pub use engine::{SimilarityEngine, cosine, dot};
pub use error::SimilarityError;
pub use types::SimilarityMatrix;
