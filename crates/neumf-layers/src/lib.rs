//! Neural network layers and the NeuMF model.
//!
//! This crate provides the building blocks for the NeuMF recommender:
//!
//! - **Tensor**: a row-major `f32` tensor with the operations the model
//!   needs
//! - **Dense**: fully connected linear transformation
//! - **Activations**: ReLU and Sigmoid with manual backward passes
//! - **Embedding**: dense-ID embedding tables for users and items
//! - **MlpTower**: a stack of dense layers with ReLU activations
//! - **NeuMF**: the fused matrix-factorization + MLP architecture
//!
//! # Quick start
//!
//! ```
//! use neumf_core::ProblemMode;
//! use neumf_layers::neumf::NeuMFConfig;
//!
//! let model = NeuMFConfig::new(100, 200)
//!     .with_mlp_layer_sizes(vec![32, 16, 8])
//!     .with_mf_dims(10)
//!     .with_problem_mode(ProblemMode::Classification)
//!     .build()
//!     .unwrap();
//!
//! let scores = model.forward(&[0, 1, 2], &[5, 6, 7]).unwrap();
//! assert_eq!(scores.shape(), &[3, 5]);
//! ```

#![warn(missing_docs)]

pub mod activation;
pub mod dense;
pub mod embedding;
pub mod error;
pub mod initializer;
pub mod layer;
pub mod mlp;
pub mod neumf;
pub mod tensor;

pub use activation::{ReLU, Sigmoid};
pub use dense::Dense;
pub use embedding::Embedding;
pub use error::{LayerError, LayerResult};
pub use initializer::Initializer;
pub use layer::Layer;
pub use mlp::MlpTower;
pub use neumf::{NeuMF, NeuMFConfig};
pub use tensor::Tensor;
