//! Dense (fully connected) layer implementation.
//!
//! Performs the linear transformation `y = xW + b` with
//! Glorot-uniform-initialized weights and zero biases.

use crate::error::LayerError;
use crate::initializer::Initializer;
use crate::layer::Layer;
use crate::tensor::Tensor;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// A dense (fully connected) neural network layer.
///
/// - input `x`: `[batch_size, in_features]`
/// - weights `W`: `[in_features, out_features]`
/// - bias `b`: `[out_features]`
/// - output `y = xW + b`: `[batch_size, out_features]`
///
/// # Example
///
/// ```
/// use neumf_layers::dense::Dense;
/// use neumf_layers::layer::Layer;
/// use neumf_layers::tensor::Tensor;
///
/// let layer = Dense::with_seed(128, 64, 42);
/// let input = Tensor::zeros(&[32, 128]);
/// let output = layer.forward(&input).unwrap();
/// assert_eq!(output.shape(), &[32, 64]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dense {
    /// Weight matrix of shape [in_features, out_features]
    weights: Tensor,
    /// Bias vector of shape [out_features]
    bias: Tensor,
    /// Gradient of weights
    weights_grad: Option<Tensor>,
    /// Gradient of bias
    bias_grad: Option<Tensor>,
    /// Cached input for backward pass
    cached_input: Option<Tensor>,
    /// Input feature dimension
    in_features: usize,
    /// Output feature dimension
    out_features: usize,
}

impl Dense {
    /// Creates a dense layer using an external RNG for weight
    /// initialization.
    pub fn new(in_features: usize, out_features: usize, rng: &mut StdRng) -> Self {
        let weights = Initializer::GlorotUniform.initialize(&[in_features, out_features], rng);
        let bias = Tensor::zeros(&[out_features]);
        Self {
            weights,
            bias,
            weights_grad: None,
            bias_grad: None,
            cached_input: None,
            in_features,
            out_features,
        }
    }

    /// Creates a dense layer seeded from a bare integer (doctests,
    /// standalone use).
    pub fn with_seed(in_features: usize, out_features: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::new(in_features, out_features, &mut rng)
    }

    /// Creates a dense layer with explicit weights and bias.
    ///
    /// # Errors
    ///
    /// Returns an error if the shapes are incompatible.
    pub fn from_weights(weights: Tensor, bias: Tensor) -> Result<Self, LayerError> {
        if weights.ndim() != 2 {
            return Err(LayerError::InvalidArgument {
                message: format!("Weights must be 2D, got {}D", weights.ndim()),
            });
        }
        if bias.ndim() != 1 {
            return Err(LayerError::InvalidArgument {
                message: format!("Bias must be 1D, got {}D", bias.ndim()),
            });
        }
        if weights.shape()[1] != bias.shape()[0] {
            return Err(LayerError::ShapeMismatch {
                expected: vec![weights.shape()[1]],
                actual: vec![bias.shape()[0]],
            });
        }

        let in_features = weights.shape()[0];
        let out_features = weights.shape()[1];
        Ok(Self {
            weights,
            bias,
            weights_grad: None,
            bias_grad: None,
            cached_input: None,
            in_features,
            out_features,
        })
    }

    /// Returns the input feature dimension.
    pub fn in_features(&self) -> usize {
        self.in_features
    }

    /// Returns the output feature dimension.
    pub fn out_features(&self) -> usize {
        self.out_features
    }

    /// Returns a reference to the weights tensor.
    pub fn weights(&self) -> &Tensor {
        &self.weights
    }

    /// Returns the weight gradients if available.
    pub fn weights_grad(&self) -> Option<&Tensor> {
        self.weights_grad.as_ref()
    }

    /// Returns the bias gradients if available.
    pub fn bias_grad(&self) -> Option<&Tensor> {
        self.bias_grad.as_ref()
    }

    /// Performs forward pass and caches input for backward pass.
    pub fn forward_train(&mut self, input: &Tensor) -> Result<Tensor, LayerError> {
        self.cached_input = Some(input.clone());
        self.forward(input)
    }

    /// Applies accumulated gradients with the given update function and
    /// clears them.
    ///
    /// The update function receives (parameter data, gradient data); the
    /// optimizer crate supplies it.
    pub fn apply_gradients<F>(&mut self, mut update: F)
    where
        F: FnMut(&mut [f32], &[f32]),
    {
        if let Some(grad) = self.weights_grad.take() {
            update(self.weights.data_mut(), grad.data());
        }
        if let Some(grad) = self.bias_grad.take() {
            update(self.bias.data_mut(), grad.data());
        }
        self.cached_input = None;
    }
}

impl Layer for Dense {
    fn forward(&self, input: &Tensor) -> Result<Tensor, LayerError> {
        if input.ndim() != 2 {
            return Err(LayerError::InvalidArgument {
                message: format!("Expected 2D input, got {}D", input.ndim()),
            });
        }
        if input.shape()[1] != self.in_features {
            return Err(LayerError::InvalidInputDimension {
                expected: self.in_features,
                actual: input.shape()[1],
            });
        }

        Ok(input.matmul(&self.weights).add(&self.bias))
    }

    fn backward(&mut self, grad: &Tensor) -> Result<Tensor, LayerError> {
        let input = self
            .cached_input
            .as_ref()
            .ok_or(LayerError::NotInitialized)?;

        if grad.ndim() != 2 || grad.shape()[1] != self.out_features {
            return Err(LayerError::ShapeMismatch {
                expected: vec![input.shape()[0], self.out_features],
                actual: grad.shape().to_vec(),
            });
        }

        // dL/dW = x^T @ dL/dy, dL/db = sum(dL/dy, axis=0)
        self.weights_grad = Some(input.transpose().matmul(grad));
        self.bias_grad = Some(grad.sum_axis0());

        // dL/dx = dL/dy @ W^T
        Ok(grad.matmul(&self.weights.transpose()))
    }

    fn parameters(&self) -> Vec<&Tensor> {
        vec![&self.weights, &self.bias]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        vec![&mut self.weights, &mut self.bias]
    }

    fn name(&self) -> &str {
        "Dense"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_creation() {
        let layer = Dense::with_seed(64, 32, 0);
        assert_eq!(layer.in_features(), 64);
        assert_eq!(layer.out_features(), 32);
        assert_eq!(layer.weights().shape(), &[64, 32]);
    }

    #[test]
    fn test_dense_forward_shape() {
        let layer = Dense::with_seed(10, 5, 0);
        let input = Tensor::zeros(&[3, 10]);
        let output = layer.forward(&input).unwrap();
        assert_eq!(output.shape(), &[3, 5]);
        // Zero input and zero bias produce zero output.
        assert!(output.data().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_dense_forward_invalid_input() {
        let layer = Dense::with_seed(10, 5, 0);
        let input = Tensor::zeros(&[3, 20]);
        assert!(layer.forward(&input).is_err());
    }

    #[test]
    fn test_dense_backward_gradients() {
        let weights = Tensor::from_data(&[2, 1], vec![1.0, 2.0]);
        let bias = Tensor::zeros(&[1]);
        let mut layer = Dense::from_weights(weights, bias).unwrap();

        let input = Tensor::from_data(&[1, 2], vec![3.0, 4.0]);
        let out = layer.forward_train(&input).unwrap();
        assert_eq!(out.data(), &[11.0]);

        let grad = Tensor::from_data(&[1, 1], vec![1.0]);
        let input_grad = layer.backward(&grad).unwrap();
        assert_eq!(input_grad.data(), &[1.0, 2.0]);
        assert_eq!(layer.weights_grad().unwrap().data(), &[3.0, 4.0]);
        assert_eq!(layer.bias_grad().unwrap().data(), &[1.0]);
    }

    #[test]
    fn test_dense_apply_gradients_sgd_step() {
        let weights = Tensor::from_data(&[1, 1], vec![1.0]);
        let bias = Tensor::from_data(&[1], vec![0.5]);
        let mut layer = Dense::from_weights(weights, bias).unwrap();

        let input = Tensor::from_data(&[1, 1], vec![2.0]);
        let _ = layer.forward_train(&input).unwrap();
        let _ = layer.backward(&Tensor::from_data(&[1, 1], vec![1.0])).unwrap();

        layer.apply_gradients(|p, g| {
            for (p, g) in p.iter_mut().zip(g) {
                *p -= 0.1 * g;
            }
        });
        assert!((layer.weights().data()[0] - 0.8).abs() < 1e-6);
        assert!(layer.weights_grad().is_none());
    }

    #[test]
    fn test_dense_from_weights_invalid() {
        let weights = Tensor::zeros(&[10, 5]);
        let bias = Tensor::zeros(&[10]);
        assert!(Dense::from_weights(weights, bias).is_err());
    }
}
