//! Gradient descent optimization for NeuMF training.
//!
//! Optimizers update flat parameter slices in place from accumulated
//! gradients. Layers expose their parameters as `&mut [f32]` slices, so
//! the same optimizer updates dense weights, biases, and embedding
//! tables alike.
//!
//! # Example
//!
//! ```
//! use neumf_optimizer::{Optimizer, OptimizerConfig, Sgd};
//!
//! let config = OptimizerConfig::Sgd { learning_rate: 0.01 };
//! let mut sgd = Sgd::new(config).unwrap();
//! let mut params = vec![1.0, 2.0, 3.0];
//! let gradients = vec![0.1, 0.2, 0.3];
//! sgd.apply_gradients(&mut params, &gradients);
//! ```

#![warn(missing_docs)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod sgd;

pub use sgd::Sgd;

/// Errors that can occur when constructing an optimizer.
#[derive(Debug, Error)]
pub enum OptimizerError {
    /// Invalid configuration parameter.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Configuration for the supported optimizer types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OptimizerConfig {
    /// Stochastic gradient descent.
    Sgd {
        /// Learning rate for gradient updates.
        learning_rate: f32,
    },
}

impl OptimizerConfig {
    /// Returns the name of the optimizer type.
    pub fn name(&self) -> &'static str {
        match self {
            OptimizerConfig::Sgd { .. } => "Sgd",
        }
    }

    /// Returns the learning rate.
    pub fn learning_rate(&self) -> f32 {
        match self {
            OptimizerConfig::Sgd { learning_rate } => *learning_rate,
        }
    }
}

/// Trait for gradient descent optimizers.
///
/// Optimizers update parameter slices in place from gradient slices of
/// the same length.
pub trait Optimizer: Sized {
    /// Creates a new optimizer from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`OptimizerError::InvalidParameter`] for out-of-range
    /// configuration values.
    fn new(config: OptimizerConfig) -> Result<Self, OptimizerError>;

    /// Applies gradients to update the parameters in place.
    ///
    /// # Panics
    ///
    /// May panic if `params` and `gradients` have different lengths.
    fn apply_gradients(&mut self, params: &mut [f32], gradients: &[f32]);

    /// Returns a reference to the optimizer's configuration.
    fn config(&self) -> &OptimizerConfig;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optimizer_config_name() {
        let sgd = OptimizerConfig::Sgd { learning_rate: 0.01 };
        assert_eq!(sgd.name(), "Sgd");
    }

    #[test]
    fn test_optimizer_config_serialization() {
        let config = OptimizerConfig::Sgd { learning_rate: 0.05 };
        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: OptimizerConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(config.name(), deserialized.name());
        assert!((config.learning_rate() - deserialized.learning_rate()).abs() < 1e-6);
    }
}
