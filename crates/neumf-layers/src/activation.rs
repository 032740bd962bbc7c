//! Activation function layers.

use crate::error::LayerError;
use crate::layer::Layer;
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};

/// Rectified Linear Unit (ReLU) activation function.
///
/// Computes `f(x) = max(0, x)` element-wise.
///
/// # Example
///
/// ```
/// use neumf_layers::activation::ReLU;
/// use neumf_layers::layer::Layer;
/// use neumf_layers::tensor::Tensor;
///
/// let relu = ReLU::new();
/// let input = Tensor::from_data(&[2, 2], vec![-1.0, 0.0, 1.0, 2.0]);
/// let output = relu.forward(&input).unwrap();
/// assert_eq!(output.data(), &[0.0, 0.0, 1.0, 2.0]);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReLU {
    /// Cached input for backward pass
    cached_input: Option<Tensor>,
}

impl ReLU {
    /// Creates a new ReLU activation layer.
    pub fn new() -> Self {
        Self { cached_input: None }
    }

    /// Performs forward pass and caches input for backward pass.
    pub fn forward_train(&mut self, input: &Tensor) -> Result<Tensor, LayerError> {
        self.cached_input = Some(input.clone());
        self.forward(input)
    }
}

impl Layer for ReLU {
    fn forward(&self, input: &Tensor) -> Result<Tensor, LayerError> {
        Ok(input.map(|x| x.max(0.0)))
    }

    fn backward(&mut self, grad: &Tensor) -> Result<Tensor, LayerError> {
        let input = self
            .cached_input
            .as_ref()
            .ok_or(LayerError::NotInitialized)?;

        // ReLU gradient: 1 if x > 0, else 0
        let mask = input.map(|x| if x > 0.0 { 1.0 } else { 0.0 });
        Ok(grad.mul(&mask))
    }

    fn parameters(&self) -> Vec<&Tensor> {
        vec![]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        vec![]
    }

    fn name(&self) -> &str {
        "ReLU"
    }
}

/// Sigmoid activation function.
///
/// Computes `f(x) = 1 / (1 + exp(-x))` element-wise.
///
/// # Example
///
/// ```
/// use neumf_layers::activation::Sigmoid;
/// use neumf_layers::layer::Layer;
/// use neumf_layers::tensor::Tensor;
///
/// let sigmoid = Sigmoid::new();
/// let output = sigmoid.forward(&Tensor::zeros(&[2, 2])).unwrap();
/// assert!((output.data()[0] - 0.5).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sigmoid {
    /// Cached output for backward pass (cheaper than caching input)
    cached_output: Option<Tensor>,
}

impl Sigmoid {
    /// Creates a new Sigmoid activation layer.
    pub fn new() -> Self {
        Self {
            cached_output: None,
        }
    }

    /// Performs forward pass and caches output for backward pass.
    pub fn forward_train(&mut self, input: &Tensor) -> Result<Tensor, LayerError> {
        let output = self.forward(input)?;
        self.cached_output = Some(output.clone());
        Ok(output)
    }
}

impl Layer for Sigmoid {
    fn forward(&self, input: &Tensor) -> Result<Tensor, LayerError> {
        Ok(input.map(|x| 1.0 / (1.0 + (-x).exp())))
    }

    fn backward(&mut self, grad: &Tensor) -> Result<Tensor, LayerError> {
        let output = self
            .cached_output
            .as_ref()
            .ok_or(LayerError::NotInitialized)?;

        // Sigmoid gradient: output * (1 - output)
        let grad_multiplier = output.map(|y| y * (1.0 - y));
        Ok(grad.mul(&grad_multiplier))
    }

    fn parameters(&self) -> Vec<&Tensor> {
        vec![]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        vec![]
    }

    fn name(&self) -> &str {
        "Sigmoid"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relu_forward_backward() {
        let mut relu = ReLU::new();
        let input = Tensor::from_data(&[1, 4], vec![-2.0, -0.5, 0.5, 2.0]);
        let out = relu.forward_train(&input).unwrap();
        assert_eq!(out.data(), &[0.0, 0.0, 0.5, 2.0]);

        let grad = Tensor::from_data(&[1, 4], vec![1.0, 1.0, 1.0, 1.0]);
        let g = relu.backward(&grad).unwrap();
        assert_eq!(g.data(), &[0.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_relu_backward_without_forward() {
        let mut relu = ReLU::new();
        let grad = Tensor::zeros(&[1, 2]);
        assert!(relu.backward(&grad).is_err());
    }

    #[test]
    fn test_sigmoid_forward_backward() {
        let mut sigmoid = Sigmoid::new();
        let input = Tensor::zeros(&[1, 2]);
        let out = sigmoid.forward_train(&input).unwrap();
        assert!((out.data()[0] - 0.5).abs() < 1e-6);

        let grad = Tensor::from_data(&[1, 2], vec![1.0, 1.0]);
        let g = sigmoid.backward(&grad).unwrap();
        // sigmoid'(0) = 0.25
        assert!((g.data()[0] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_sigmoid_saturates() {
        let sigmoid = Sigmoid::new();
        let out = sigmoid
            .forward(&Tensor::from_data(&[1, 2], vec![40.0, -40.0]))
            .unwrap();
        assert!((out.data()[0] - 1.0).abs() < 1e-6);
        assert!(out.data()[1] < 1e-6);
    }
}
