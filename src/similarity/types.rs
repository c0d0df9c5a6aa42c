use serde::Serialize;

use crate::embedding::Embedding;

use super::error::SimilarityError;
use super::engine::cosine;

/// Square, symmetric all-pairs similarity matrix with a unit diagonal.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SimilarityMatrix {
    rows: Vec<Vec<f32>>,
}

impl SimilarityMatrix {
    /// `n x n` matrix with 1.0 on the diagonal and 0.0 elsewhere.
    pub fn identity(n: usize) -> Self {
        let rows = (0..n)
            .map(|i| {
                let mut row = vec![0.0; n];
                row[i] = 1.0;
                row
            })
            .collect();
        Self { rows }
    }

    /// Builds the matrix from embeddings computed once per snippet.
    ///
    /// The diagonal is set, not computed. Each unordered pair `i < j` is scored
    /// once and written to both `(i, j)` and `(j, i)`.
    pub fn from_embeddings(embeddings: &[Embedding]) -> Result<Self, SimilarityError> {
        let n = embeddings.len();
        let mut matrix = Self::identity(n);

        for i in 0..n {
            for j in (i + 1)..n {
                let score = cosine(&embeddings[i], &embeddings[j])?;
                matrix.rows[i][j] = score;
                matrix.rows[j][i] = score;
            }
        }

        Ok(matrix)
    }

    /// Number of snippets `N`.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        self.rows.get(i).and_then(|row| row.get(j)).copied()
    }

    pub fn rows(&self) -> &[Vec<f32>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<f32>> {
        self.rows
    }

    /// `true` if every `(i, j)` equals `(j, i)` exactly.
    pub fn is_symmetric(&self) -> bool {
        let n = self.len();
        (0..n).all(|i| (0..n).all(|j| self.rows[i][j] == self.rows[j][i]))
    }
}
