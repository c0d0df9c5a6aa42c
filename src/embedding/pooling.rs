//! Mask-aware mean pooling and L2 normalization.

use candle_core::{D, DType, IndexOp, Tensor};

use crate::constants::NORM_EPSILON;
use crate::embedding::error::EmbeddingError;
use crate::embedding::types::Embedding;

/// Mean of the hidden states over real tokens.
///
/// `hidden_states` is `[B, T, H]`, `attention_mask` is `[B, T]` of any numeric
/// dtype. Returns `[B, H]`. The per-row token count is clamped to at least 1,
/// so a fully masked row yields zeros rather than NaN.
pub fn mean_pool(hidden_states: &Tensor, attention_mask: &Tensor) -> candle_core::Result<Tensor> {
    let mask = attention_mask
        .to_dtype(hidden_states.dtype())?
        .unsqueeze(2)?;

    let summed = hidden_states.broadcast_mul(&mask)?.sum(1)?;
    let counts = mask.sum(1)?.clamp(1f32, f32::MAX)?;

    summed.broadcast_div(&counts)
}

/// Scales each row of a `[B, H]` tensor to unit Euclidean length.
///
/// The norm is floored at [`NORM_EPSILON`], so zero rows stay zero.
pub fn l2_normalize(embeddings: &Tensor) -> candle_core::Result<Tensor> {
    let norm = embeddings
        .sqr()?
        .sum_keepdim(D::Minus1)?
        .sqrt()?
        .clamp(NORM_EPSILON, f32::MAX)?;

    embeddings.broadcast_div(&norm)
}

/// Reduces one encoder output to a single normalized [`Embedding`].
pub fn pool(hidden_states: &Tensor, attention_mask: &Tensor) -> Result<Embedding, EmbeddingError> {
    let (batch, seq_len, _hidden) = hidden_states.dims3()?;
    let (mask_batch, mask_len) = attention_mask.dims2()?;

    if batch != 1 || mask_batch != 1 || seq_len != mask_len {
        return Err(EmbeddingError::InferenceFailed {
            reason: format!(
                "hidden states {:?} do not match attention mask {:?} (batch must be 1)",
                hidden_states.dims(),
                attention_mask.dims()
            ),
        });
    }

    let hidden_states = hidden_states.to_dtype(DType::F32)?;
    let pooled = mean_pool(&hidden_states, attention_mask)?;
    let normalized = l2_normalize(&pooled)?;
    let values = normalized.i(0)?.to_vec1::<f32>()?;

    Ok(Embedding::new(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;

    fn hidden(rows: &[[f32; 3]]) -> Tensor {
        let data: Vec<f32> = rows.iter().flatten().copied().collect();
        Tensor::from_vec(data, (1, rows.len(), 3), &Device::Cpu).unwrap()
    }

    fn mask(bits: &[u32]) -> Tensor {
        Tensor::from_vec(bits.to_vec(), (1, bits.len()), &Device::Cpu).unwrap()
    }

    #[test]
    fn test_mean_pool_averages_all_real_tokens() {
        let h = hidden(&[[1.0, 2.0, 3.0], [3.0, 4.0, 5.0]]);
        let pooled: Vec<Vec<f32>> = mean_pool(&h, &mask(&[1, 1])).unwrap().to_vec2().unwrap();
        assert_eq!(pooled, vec![vec![2.0, 3.0, 4.0]]);
    }

    #[test]
    fn test_mean_pool_ignores_padding() {
        let h = hidden(&[[1.0, 1.0, 1.0], [3.0, 3.0, 3.0], [100.0, -50.0, 7.0]]);
        let pooled: Vec<Vec<f32>> = mean_pool(&h, &mask(&[1, 1, 0]))
            .unwrap()
            .to_vec2()
            .unwrap();
        assert_eq!(pooled, vec![vec![2.0, 2.0, 2.0]]);
    }

    #[test]
    fn test_mean_pool_all_masked_is_zero_not_nan() {
        let h = hidden(&[[4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        let pooled: Vec<Vec<f32>> = mean_pool(&h, &mask(&[0, 0])).unwrap().to_vec2().unwrap();
        assert_eq!(pooled, vec![vec![0.0, 0.0, 0.0]]);
    }

    #[test]
    fn test_l2_normalize_unit_length() {
        let t = Tensor::new(&[[3.0f32, 4.0, 0.0]], &Device::Cpu).unwrap();
        let n: Vec<Vec<f32>> = l2_normalize(&t).unwrap().to_vec2().unwrap();
        assert!((n[0][0] - 0.6).abs() < 1e-6);
        assert!((n[0][1] - 0.8).abs() < 1e-6);
        assert_eq!(n[0][2], 0.0);
    }

    #[test]
    fn test_l2_normalize_zero_vector_stays_zero() {
        let t = Tensor::zeros((1, 5), DType::F32, &Device::Cpu).unwrap();
        let n: Vec<Vec<f32>> = l2_normalize(&t).unwrap().to_vec2().unwrap();
        assert!(n[0].iter().all(|x| *x == 0.0));
    }

    #[test]
    fn test_pool_returns_unit_norm_embedding() {
        let h = hidden(&[[1.0, 0.0, 2.0], [3.0, 4.0, -2.0], [9.0, 9.0, 9.0]]);
        let e = pool(&h, &mask(&[1, 1, 0])).unwrap();
        assert_eq!(e.dim(), 3);
        assert!((e.norm() - 1.0).abs() < 1e-5);
        // mean of first two rows is [2, 2, 0]
        let expected = 1.0 / 2.0f32.sqrt();
        assert!((e.as_slice()[0] - expected).abs() < 1e-6);
        assert!((e.as_slice()[1] - expected).abs() < 1e-6);
        assert_eq!(e.as_slice()[2], 0.0);
    }

    #[test]
    fn test_pool_degenerate_input_yields_zero_vector() {
        let h = hidden(&[[1.0, 2.0, 3.0]]);
        let e = pool(&h, &mask(&[0])).unwrap();
        assert!(e.is_degenerate());
        assert!(e.as_slice().iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_pool_rejects_mismatched_shapes() {
        let h = hidden(&[[1.0, 2.0, 3.0], [1.0, 2.0, 3.0]]);
        let err = pool(&h, &mask(&[1, 1, 1])).unwrap_err();
        assert!(matches!(err, EmbeddingError::InferenceFailed { .. }));
    }
}
