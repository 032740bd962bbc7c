//! Layer trait definition for neural network layers.

use crate::error::LayerError;
use crate::tensor::Tensor;

/// A neural network layer that supports forward and backward propagation.
///
/// Each layer can run a forward pass, run a backward pass that turns an
/// output gradient into an input gradient while accumulating parameter
/// gradients, and expose its learnable parameters to the optimizer.
///
/// Layers that need cached activations for the backward pass provide an
/// inherent `forward_train` method; `forward` alone never mutates state.
///
/// # Example
///
/// ```
/// use neumf_layers::dense::Dense;
/// use neumf_layers::layer::Layer;
/// use neumf_layers::tensor::Tensor;
///
/// let layer = Dense::with_seed(128, 64, 7);
/// let input = Tensor::zeros(&[32, 128]);
/// let output = layer.forward(&input).unwrap();
/// assert_eq!(output.shape(), &[32, 64]);
/// ```
pub trait Layer: Send + Sync {
    /// Performs a forward pass through the layer.
    ///
    /// # Errors
    ///
    /// Returns a [`LayerError`] if the input shape is incompatible with the
    /// layer.
    fn forward(&self, input: &Tensor) -> Result<Tensor, LayerError>;

    /// Performs a backward pass, computing the gradient with respect to the
    /// layer's input and updating internal parameter-gradient accumulators.
    ///
    /// # Errors
    ///
    /// Returns a [`LayerError`] if no forward pass was cached or the
    /// gradient shape is incompatible.
    fn backward(&mut self, grad: &Tensor) -> Result<Tensor, LayerError>;

    /// Returns references to the layer's learnable parameters.
    fn parameters(&self) -> Vec<&Tensor>;

    /// Returns mutable references to the layer's learnable parameters.
    fn parameters_mut(&mut self) -> Vec<&mut Tensor>;

    /// Returns the name of the layer for debugging and logging purposes.
    fn name(&self) -> &str {
        "Layer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Identity {
        weight: Tensor,
    }

    impl Layer for Identity {
        fn forward(&self, input: &Tensor) -> Result<Tensor, LayerError> {
            Ok(input.clone())
        }

        fn backward(&mut self, grad: &Tensor) -> Result<Tensor, LayerError> {
            Ok(grad.clone())
        }

        fn parameters(&self) -> Vec<&Tensor> {
            vec![&self.weight]
        }

        fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
            vec![&mut self.weight]
        }

        fn name(&self) -> &str {
            "Identity"
        }
    }

    #[test]
    fn test_layer_trait_object() {
        let mut layer = Identity {
            weight: Tensor::zeros(&[4]),
        };
        let input = Tensor::zeros(&[2, 4]);
        let out = layer.forward(&input).unwrap();
        assert_eq!(out.shape(), input.shape());
        let grad = layer.backward(&out).unwrap();
        assert_eq!(grad.shape(), input.shape());
        assert_eq!(layer.parameters().len(), 1);
        assert_eq!(layer.name(), "Identity");
    }
}
