//! Training and evaluation loops for the NeuMF model.
//!
//! The [`trainer::Trainer`] drives mini-batch SGD over an encoded
//! [`neumf_data::dataset::InteractionDataset`], pairing the model's
//! manual backward passes with the losses in [`loss`] and summarizing
//! each epoch through [`metrics`].
//!
//! # Example
//!
//! ```
//! use neumf_core::ProblemMode;
//! use neumf_data::dataset::InteractionDataset;
//! use neumf_data::rating::{Rating, RatingStore};
//! use neumf_layers::neumf::NeuMFConfig;
//! use neumf_training::trainer::{Trainer, TrainerConfig};
//!
//! let store = RatingStore::from_ratings(vec![
//!     Rating::new(0, 0, 4.0, 0),
//!     Rating::new(1, 1, 2.0, 1),
//! ])
//! .unwrap();
//! let dataset = InteractionDataset::from_store(&store, ProblemMode::Regression).unwrap();
//!
//! let mut model = NeuMFConfig::new(2, 2)
//!     .with_mlp_layer_sizes(vec![8, 4])
//!     .with_mf_dims(3)
//!     .build()
//!     .unwrap();
//! let mut trainer = Trainer::new(TrainerConfig::new().with_epochs(2)).unwrap();
//! let history = trainer.fit(&mut model, &dataset).unwrap();
//! assert_eq!(history.len(), 2);
//! ```

#![warn(missing_docs)]

use thiserror::Error;

pub mod loss;
pub mod metrics;
pub mod trainer;

pub use metrics::{EpochMetrics, MetricsRecorder};
pub use trainer::{Trainer, TrainerConfig};

/// Errors that can occur during training or evaluation.
#[derive(Debug, Error)]
pub enum TrainingError {
    /// Invalid trainer configuration or dataset/model pairing.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the invalid configuration
        message: String,
    },

    /// Predictions and targets disagree on shape.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// The target shape
        expected: Vec<usize>,
        /// The prediction shape
        actual: Vec<usize>,
    },

    /// A model error during a forward or backward pass.
    #[error("Layer error: {0}")]
    Layer(#[from] neumf_layers::error::LayerError),

    /// A dataset error while iterating batches.
    #[error("Data error: {0}")]
    Data(#[from] neumf_data::error::DataError),
}
