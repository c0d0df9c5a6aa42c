use tracing::{debug, instrument};

use crate::embedding::{CodeEmbedder, Embedding};

use super::error::SimilarityError;
use super::types::SimilarityMatrix;

/// Dot product accumulated in index order.
///
/// Multiplication is commutative in IEEE arithmetic and the summation order is
/// fixed, so `dot(a, b) == dot(b, a)` bit for bit.
#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Cosine similarity of two L2-normalized embeddings (their dot product).
pub fn cosine(a: &Embedding, b: &Embedding) -> Result<f32, SimilarityError> {
    if a.dim() != b.dim() {
        return Err(SimilarityError::DimensionMismatch {
            left: a.dim(),
            right: b.dim(),
        });
    }
    Ok(dot(a.as_slice(), b.as_slice()))
}

/// Pairwise and all-pairs code similarity on top of a [`CodeEmbedder`].
#[derive(Debug, Clone)]
pub struct SimilarityEngine {
    embedder: CodeEmbedder,
}

impl SimilarityEngine {
    pub fn new(embedder: CodeEmbedder) -> Self {
        Self { embedder }
    }

    pub fn embedder(&self) -> &CodeEmbedder {
        &self.embedder
    }

    /// Embeds one snippet.
    pub fn embed(&self, code: &str) -> Result<Embedding, SimilarityError> {
        Ok(self.embedder.embed(code)?)
    }

    /// Cosine similarity of two snippets, each embedded independently.
    #[instrument(skip_all, fields(a_len = a.len(), b_len = b.len()))]
    pub fn similarity(&self, a: &str, b: &str) -> Result<f32, SimilarityError> {
        let va = self.embedder.embed(a)?;
        let vb = self.embedder.embed(b)?;
        let score = cosine(&va, &vb)?;

        debug!(score, "Computed pairwise similarity");
        Ok(score)
    }

    /// All-pairs similarity matrix; each snippet is embedded exactly once.
    ///
    /// Fails as a whole if any snippet fails to embed.
    #[instrument(skip_all, fields(snippets = snippets.len()))]
    pub fn batch_similarity<S: AsRef<str>>(
        &self,
        snippets: &[S],
    ) -> Result<SimilarityMatrix, SimilarityError> {
        let embeddings = self.embedder.embed_all(snippets)?;
        let matrix = SimilarityMatrix::from_embeddings(&embeddings)?;

        debug!(n = matrix.len(), "Computed batch similarity matrix");
        Ok(matrix)
    }
}
