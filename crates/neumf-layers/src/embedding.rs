//! Dense-ID embedding table.
//!
//! MovieLens user and item IDs are dense, zero-based indices, so the table
//! is a plain `[vocab, dim]` tensor indexed by row rather than a hash map
//! keyed by feature ID. Lookups validate the index and fail on out-of-range
//! IDs instead of returning a default row.

use crate::error::LayerError;
use crate::initializer::Initializer;
use crate::tensor::Tensor;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// A learnable embedding table mapping dense integer IDs to vectors.
///
/// # Example
///
/// ```
/// use neumf_layers::embedding::Embedding;
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(42);
/// let table = Embedding::new(10, 4, &mut rng);
/// let out = table.lookup(&[0, 3, 3]).unwrap();
/// assert_eq!(out.shape(), &[3, 4]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embedding {
    /// Embedding matrix of shape [vocab, dim]
    weights: Tensor,
    /// Dense gradient table of shape [vocab, dim]
    grad: Option<Tensor>,
    /// Cached IDs for backward pass
    cached_ids: Option<Vec<usize>>,
    /// Number of rows
    vocab: usize,
    /// Embedding dimension
    dim: usize,
}

impl Embedding {
    /// Standard deviation for normal initialization of embedding rows.
    const INIT_STD: f32 = 0.01;

    /// Creates a table of `vocab` rows of dimension `dim`, initialized with
    /// small normal noise.
    pub fn new(vocab: usize, dim: usize, rng: &mut StdRng) -> Self {
        let weights = Initializer::Normal {
            mean: 0.0,
            std: Self::INIT_STD,
        }
        .initialize(&[vocab, dim], rng);
        Self {
            weights,
            grad: None,
            cached_ids: None,
            vocab,
            dim,
        }
    }

    /// Returns the vocabulary size (number of rows).
    pub fn vocab(&self) -> usize {
        self.vocab
    }

    /// Returns the embedding dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns a reference to the embedding matrix.
    pub fn weights(&self) -> &Tensor {
        &self.weights
    }

    /// Looks up embeddings for the given IDs.
    ///
    /// # Errors
    ///
    /// Returns [`LayerError::IdOutOfRange`] if any ID is not a valid row.
    pub fn lookup(&self, ids: &[usize]) -> Result<Tensor, LayerError> {
        let mut data = Vec::with_capacity(ids.len() * self.dim);
        for &id in ids {
            if id >= self.vocab {
                return Err(LayerError::IdOutOfRange {
                    id,
                    vocab: self.vocab,
                });
            }
            data.extend_from_slice(&self.weights.data()[id * self.dim..(id + 1) * self.dim]);
        }
        Ok(Tensor::from_data(&[ids.len(), self.dim], data))
    }

    /// Looks up embeddings and caches the IDs for the backward pass.
    pub fn lookup_train(&mut self, ids: &[usize]) -> Result<Tensor, LayerError> {
        let out = self.lookup(ids)?;
        self.cached_ids = Some(ids.to_vec());
        Ok(out)
    }

    /// Scatter-adds a `[num_ids, dim]` gradient into the dense gradient
    /// table.
    ///
    /// # Errors
    ///
    /// Fails if no lookup was cached or the gradient shape doesn't match
    /// the cached IDs.
    pub fn accumulate_grad(&mut self, grad: &Tensor) -> Result<(), LayerError> {
        let ids = self.cached_ids.as_ref().ok_or(LayerError::NotInitialized)?;
        if grad.shape() != [ids.len(), self.dim] {
            return Err(LayerError::ShapeMismatch {
                expected: vec![ids.len(), self.dim],
                actual: grad.shape().to_vec(),
            });
        }

        let table = self
            .grad
            .get_or_insert_with(|| Tensor::zeros(&[self.vocab, self.dim]));
        for (i, &id) in ids.iter().enumerate() {
            let src = &grad.data()[i * self.dim..(i + 1) * self.dim];
            let dst = &mut table.data_mut()[id * self.dim..(id + 1) * self.dim];
            for (d, &g) in dst.iter_mut().zip(src) {
                *d += g;
            }
        }
        Ok(())
    }

    /// Applies accumulated gradients with the given update function and
    /// clears them.
    pub fn apply_gradients<F>(&mut self, mut update: F)
    where
        F: FnMut(&mut [f32], &[f32]),
    {
        if let Some(grad) = self.grad.take() {
            update(self.weights.data_mut(), grad.data());
        }
        self.cached_ids = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn table(vocab: usize, dim: usize) -> Embedding {
        let mut rng = StdRng::seed_from_u64(1);
        Embedding::new(vocab, dim, &mut rng)
    }

    #[test]
    fn test_lookup_shape_and_rows() {
        let t = table(5, 3);
        let out = t.lookup(&[2, 2, 4]).unwrap();
        assert_eq!(out.shape(), &[3, 3]);
        // Duplicate IDs return identical rows.
        assert_eq!(out.data()[0..3], out.data()[3..6]);
    }

    #[test]
    fn test_lookup_out_of_range() {
        let t = table(5, 3);
        let err = t.lookup(&[5]).unwrap_err();
        assert!(matches!(err, LayerError::IdOutOfRange { id: 5, vocab: 5 }));
    }

    #[test]
    fn test_grad_accumulation_sums_duplicates() {
        let mut t = table(4, 2);
        let _ = t.lookup_train(&[1, 1, 3]).unwrap();
        let grad = Tensor::from_data(&[3, 2], vec![1.0, 1.0, 2.0, 2.0, 5.0, 5.0]);
        t.accumulate_grad(&grad).unwrap();

        let before = t.weights().data()[2..4].to_vec();
        t.apply_gradients(|p, g| {
            for (p, g) in p.iter_mut().zip(g) {
                *p -= g;
            }
        });
        // Row 1 stepped by the summed gradient of both occurrences.
        let after = &t.weights().data()[2..4];
        assert!((after[0] - (before[0] - 3.0)).abs() < 1e-6);
        assert!((after[1] - (before[1] - 3.0)).abs() < 1e-6);
    }

    #[test]
    fn test_accumulate_without_lookup_fails() {
        let mut t = table(4, 2);
        let grad = Tensor::zeros(&[1, 2]);
        assert!(t.accumulate_grad(&grad).is_err());
    }

    #[test]
    fn test_untouched_rows_unchanged_by_update() {
        let mut t = table(4, 2);
        let row0 = t.weights().data()[0..2].to_vec();
        let _ = t.lookup_train(&[3]).unwrap();
        t.accumulate_grad(&Tensor::from_data(&[1, 2], vec![1.0, 1.0]))
            .unwrap();
        t.apply_gradients(|p, g| {
            for (p, g) in p.iter_mut().zip(g) {
                *p -= g;
            }
        });
        assert_eq!(&t.weights().data()[0..2], row0.as_slice());
    }
}
