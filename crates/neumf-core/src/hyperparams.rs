//! Run-level hyperparameters.
//!
//! A single serde-round-trippable bundle of the knobs the CLI exposes,
//! validated once up front so the rest of the pipeline can assume sane
//! values.

use crate::mode::ProblemMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error produced by [`Hyperparams::validate`].
#[derive(Debug, Error)]
pub enum HyperparamsError {
    /// A field holds a value outside its allowed range.
    #[error("Invalid argument for {field}: {message}")]
    InvalidArgument {
        /// Name of the offending field.
        field: &'static str,
        /// What went wrong.
        message: String,
    },
}

/// Hyperparameters for one training run.
///
/// # Example
///
/// ```
/// use neumf_core::Hyperparams;
///
/// let hp = Hyperparams::default();
/// assert!(hp.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hyperparams {
    /// Problem mode for the run.
    pub problem_mode: ProblemMode,
    /// Fraction of each user's ratings withheld for test, in `[0, 1)`.
    pub test_fraction: f64,
    /// Number of examples per training batch.
    pub batch_size: usize,
    /// SGD learning rate.
    pub learning_rate: f32,
    /// Number of epochs over the training set.
    pub epochs: usize,
    /// Dimension of the matrix-factorization embeddings.
    pub mf_dims: usize,
    /// MLP tower widths; the first entry is the concatenated embedding
    /// width and must be even.
    pub mlp_layer_sizes: Vec<usize>,
    /// Seed for parameter initialization and split sampling.
    pub seed: u64,
}

impl Default for Hyperparams {
    fn default() -> Self {
        // Defaults follow the reference MovieLens run.
        Self {
            problem_mode: ProblemMode::Regression,
            test_fraction: 0.2,
            batch_size: 128,
            learning_rate: 0.01,
            epochs: 20,
            mf_dims: 30,
            mlp_layer_sizes: vec![256, 128, 64, 32, 16, 8],
            seed: 42,
        }
    }
}

impl Hyperparams {
    /// Checks every field, returning the first violation found.
    pub fn validate(&self) -> Result<(), HyperparamsError> {
        if !(0.0..1.0).contains(&self.test_fraction) {
            return Err(HyperparamsError::InvalidArgument {
                field: "test_fraction",
                message: format!("must be in [0, 1), got {}", self.test_fraction),
            });
        }
        if self.batch_size == 0 {
            return Err(HyperparamsError::InvalidArgument {
                field: "batch_size",
                message: "must be positive".to_string(),
            });
        }
        if self.epochs == 0 {
            return Err(HyperparamsError::InvalidArgument {
                field: "epochs",
                message: "must be positive".to_string(),
            });
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(HyperparamsError::InvalidArgument {
                field: "learning_rate",
                message: format!("must be positive and finite, got {}", self.learning_rate),
            });
        }
        if self.mf_dims == 0 {
            return Err(HyperparamsError::InvalidArgument {
                field: "mf_dims",
                message: "must be positive".to_string(),
            });
        }
        if self.mlp_layer_sizes.is_empty() {
            return Err(HyperparamsError::InvalidArgument {
                field: "mlp_layer_sizes",
                message: "must contain at least one width".to_string(),
            });
        }
        if self.mlp_layer_sizes[0] == 0 || self.mlp_layer_sizes[0] % 2 != 0 {
            return Err(HyperparamsError::InvalidArgument {
                field: "mlp_layer_sizes",
                message: format!(
                    "first width must be even and positive, got {}",
                    self.mlp_layer_sizes[0]
                ),
            });
        }
        if self.mlp_layer_sizes.iter().any(|&w| w == 0) {
            return Err(HyperparamsError::InvalidArgument {
                field: "mlp_layer_sizes",
                message: "widths must all be positive".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Hyperparams::default().validate().is_ok());
    }

    #[test]
    fn test_bad_test_fraction() {
        let mut hp = Hyperparams::default();
        hp.test_fraction = 1.0;
        assert!(hp.validate().is_err());
        hp.test_fraction = -0.1;
        assert!(hp.validate().is_err());
    }

    #[test]
    fn test_odd_first_mlp_width_rejected() {
        let mut hp = Hyperparams::default();
        hp.mlp_layer_sizes = vec![63, 32];
        assert!(hp.validate().is_err());
    }

    #[test]
    fn test_zero_fields_rejected() {
        for f in [
            |hp: &mut Hyperparams| hp.batch_size = 0,
            |hp: &mut Hyperparams| hp.epochs = 0,
            |hp: &mut Hyperparams| hp.mf_dims = 0,
            |hp: &mut Hyperparams| hp.mlp_layer_sizes = vec![],
            |hp: &mut Hyperparams| hp.mlp_layer_sizes = vec![64, 0],
        ] {
            let mut hp = Hyperparams::default();
            f(&mut hp);
            assert!(hp.validate().is_err());
        }
    }

    #[test]
    fn test_serde_roundtrip() {
        let hp = Hyperparams::default();
        let json = serde_json::to_string(&hp).unwrap();
        let back: Hyperparams = serde_json::from_str(&json).unwrap();
        assert_eq!(back.mlp_layer_sizes, hp.mlp_layer_sizes);
        assert_eq!(back.batch_size, hp.batch_size);
    }
}
