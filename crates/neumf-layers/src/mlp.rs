//! MLP tower: a stack of dense layers with ReLU activations.

use crate::activation::ReLU;
use crate::dense::Dense;
use crate::error::LayerError;
use crate::layer::Layer;
use crate::tensor::Tensor;
use rand::rngs::StdRng;

/// A tower of fully-connected layers.
///
/// For widths `[w0, w1, ..., wn]` the tower holds `n` dense layers
/// `w0 -> w1 -> ... -> wn`, each followed by a ReLU, progressively
/// compressing the input into a `wn`-dimensional representation. A
/// single-width tower is the identity.
///
/// # Example
///
/// ```
/// use neumf_layers::mlp::MlpTower;
/// use neumf_layers::tensor::Tensor;
/// use rand::SeedableRng;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(42);
/// let tower = MlpTower::new(&[16, 8, 4], &mut rng).unwrap();
/// let out = tower.forward(&Tensor::zeros(&[2, 16])).unwrap();
/// assert_eq!(out.shape(), &[2, 4]);
/// ```
#[derive(Debug, Clone)]
pub struct MlpTower {
    /// Dense layers
    dense_layers: Vec<Dense>,
    /// One ReLU per dense layer
    activations: Vec<ReLU>,
    /// Input dimension
    input_dim: usize,
    /// Output dimension
    output_dim: usize,
}

impl MlpTower {
    /// Builds a tower from the given widths.
    ///
    /// # Errors
    ///
    /// Fails with [`LayerError::InvalidArgument`] if `layer_sizes` is empty
    /// or contains a zero width.
    pub fn new(layer_sizes: &[usize], rng: &mut StdRng) -> Result<Self, LayerError> {
        if layer_sizes.is_empty() {
            return Err(LayerError::InvalidArgument {
                message: "MLP tower needs at least one width".to_string(),
            });
        }
        if layer_sizes.iter().any(|&w| w == 0) {
            return Err(LayerError::InvalidArgument {
                message: format!("MLP widths must be positive, got {:?}", layer_sizes),
            });
        }

        let mut dense_layers = Vec::with_capacity(layer_sizes.len() - 1);
        let mut activations = Vec::with_capacity(layer_sizes.len() - 1);
        for pair in layer_sizes.windows(2) {
            dense_layers.push(Dense::new(pair[0], pair[1], rng));
            activations.push(ReLU::new());
        }

        Ok(Self {
            dense_layers,
            activations,
            input_dim: layer_sizes[0],
            output_dim: *layer_sizes.last().unwrap_or(&0),
        })
    }

    /// Returns the number of dense layers.
    pub fn num_layers(&self) -> usize {
        self.dense_layers.len()
    }

    /// Returns the input dimension.
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    /// Returns the output dimension.
    pub fn output_dim(&self) -> usize {
        self.output_dim
    }

    /// Forward pass without caching.
    pub fn forward(&self, input: &Tensor) -> Result<Tensor, LayerError> {
        let mut x = input.clone();
        for (dense, activation) in self.dense_layers.iter().zip(self.activations.iter()) {
            x = dense.forward(&x)?;
            x = activation.forward(&x)?;
        }
        Ok(x)
    }

    /// Forward pass caching activations for [`MlpTower::backward`].
    pub fn forward_train(&mut self, input: &Tensor) -> Result<Tensor, LayerError> {
        let mut x = input.clone();
        for (dense, activation) in self
            .dense_layers
            .iter_mut()
            .zip(self.activations.iter_mut())
        {
            x = dense.forward_train(&x)?;
            x = activation.forward_train(&x)?;
        }
        Ok(x)
    }

    /// Backward pass through the tower in reverse order.
    pub fn backward(&mut self, grad: &Tensor) -> Result<Tensor, LayerError> {
        let mut g = grad.clone();
        for (dense, activation) in self
            .dense_layers
            .iter_mut()
            .zip(self.activations.iter_mut())
            .rev()
        {
            g = activation.backward(&g)?;
            g = dense.backward(&g)?;
        }
        Ok(g)
    }

    /// Applies accumulated gradients to every dense layer.
    pub fn apply_gradients<F>(&mut self, mut update: F)
    where
        F: FnMut(&mut [f32], &[f32]),
    {
        for dense in &mut self.dense_layers {
            dense.apply_gradients(&mut update);
        }
    }

    /// Number of parameter tensors held by the tower.
    pub fn num_parameters(&self) -> usize {
        self.dense_layers
            .iter()
            .map(|d| d.parameters().len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(9)
    }

    #[test]
    fn test_tower_shapes() {
        let tower = MlpTower::new(&[10, 5, 2], &mut rng()).unwrap();
        assert_eq!(tower.num_layers(), 2);
        assert_eq!(tower.input_dim(), 10);
        assert_eq!(tower.output_dim(), 2);

        let out = tower.forward(&Tensor::zeros(&[3, 10])).unwrap();
        assert_eq!(out.shape(), &[3, 2]);
    }

    #[test]
    fn test_single_width_is_identity() {
        let tower = MlpTower::new(&[6], &mut rng()).unwrap();
        let input = Tensor::from_data(&[1, 6], vec![1.0, -1.0, 2.0, -2.0, 3.0, -3.0]);
        let out = tower.forward(&input).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn test_invalid_widths() {
        assert!(MlpTower::new(&[], &mut rng()).is_err());
        assert!(MlpTower::new(&[8, 0, 2], &mut rng()).is_err());
    }

    #[test]
    fn test_backward_shape() {
        let mut tower = MlpTower::new(&[10, 5, 2], &mut rng()).unwrap();
        let input = Tensor::from_data(&[3, 10], vec![0.5; 30]);
        let _ = tower.forward_train(&input).unwrap();
        let grad = Tensor::from_data(&[3, 2], vec![1.0; 6]);
        let input_grad = tower.backward(&grad).unwrap();
        assert_eq!(input_grad.shape(), &[3, 10]);
    }

    #[test]
    fn test_backward_without_forward_fails() {
        let mut tower = MlpTower::new(&[4, 2], &mut rng()).unwrap();
        assert!(tower.backward(&Tensor::zeros(&[1, 2])).is_err());
    }
}
