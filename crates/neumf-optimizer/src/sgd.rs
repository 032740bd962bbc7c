//! Stochastic gradient descent.
//!
//! # Example
//!
//! ```
//! use neumf_optimizer::{Optimizer, Sgd};
//!
//! let mut sgd = Sgd::with_learning_rate(0.01);
//! let mut params = vec![1.0, 2.0, 3.0];
//! let gradients = vec![0.1, 0.2, 0.3];
//! sgd.apply_gradients(&mut params, &gradients);
//! ```

use crate::{Optimizer, OptimizerConfig, OptimizerError};
use serde::{Deserialize, Serialize};

/// Stochastic gradient descent optimizer.
///
/// Updates parameters with `param = param - learning_rate * gradient`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sgd {
    /// Learning rate for gradient updates.
    learning_rate: f32,
    /// Configuration used to create this optimizer.
    config: OptimizerConfig,
}

impl Sgd {
    /// Creates a new SGD optimizer with the given learning rate.
    pub fn with_learning_rate(learning_rate: f32) -> Self {
        let config = OptimizerConfig::Sgd { learning_rate };
        Self {
            learning_rate,
            config,
        }
    }
}

impl Optimizer for Sgd {
    fn new(config: OptimizerConfig) -> Result<Self, OptimizerError> {
        let OptimizerConfig::Sgd { learning_rate } = config;
        if !learning_rate.is_finite() || learning_rate <= 0.0 {
            return Err(OptimizerError::InvalidParameter(format!(
                "learning rate must be positive and finite, got {}",
                learning_rate
            )));
        }
        Ok(Self {
            learning_rate,
            config,
        })
    }

    fn apply_gradients(&mut self, params: &mut [f32], gradients: &[f32]) {
        for (p, g) in params.iter_mut().zip(gradients.iter()) {
            *p -= self.learning_rate * g;
        }
    }

    fn config(&self) -> &OptimizerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sgd_basic_update() {
        let mut sgd = Sgd::new(OptimizerConfig::Sgd { learning_rate: 0.1 }).unwrap();

        let mut params = vec![1.0, 2.0, 3.0];
        let gradients = vec![1.0, 1.0, 1.0];
        sgd.apply_gradients(&mut params, &gradients);

        assert!((params[0] - 0.9).abs() < 1e-6);
        assert!((params[1] - 1.9).abs() < 1e-6);
        assert!((params[2] - 2.9).abs() < 1e-6);
    }

    #[test]
    fn test_sgd_zero_gradient() {
        let mut sgd = Sgd::with_learning_rate(0.1);

        let mut params = vec![1.0, 2.0, 3.0];
        let gradients = vec![0.0, 0.0, 0.0];
        sgd.apply_gradients(&mut params, &gradients);

        assert_eq!(params, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_sgd_rejects_bad_learning_rate() {
        for learning_rate in [0.0, -0.1, f32::NAN, f32::INFINITY] {
            let result = Sgd::new(OptimizerConfig::Sgd { learning_rate });
            assert!(matches!(result, Err(OptimizerError::InvalidParameter(_))));
        }
    }

    #[test]
    fn test_sgd_with_learning_rate() {
        let sgd = Sgd::with_learning_rate(0.05);
        assert!(matches!(
            sgd.config(),
            OptimizerConfig::Sgd { learning_rate } if (*learning_rate - 0.05).abs() < 1e-6
        ));
    }
}
