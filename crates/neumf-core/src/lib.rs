//! Shared types for the NeuMF recommender workspace.
//!
//! This crate holds the handful of definitions every other crate consumes:
//! the [`ProblemMode`] the whole pipeline is keyed on, the rating-class
//! constant, and the validated [`Hyperparams`] bundle.

#![warn(missing_docs)]

pub mod hyperparams;
pub mod mode;

pub use hyperparams::{Hyperparams, HyperparamsError};
pub use mode::{ProblemMode, NUM_RATING_CLASSES};
