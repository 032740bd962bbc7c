//! Rating storage, splitting, and dataset encoding for NeuMF training.
//!
//! The pipeline from file to model input:
//!
//! 1. [`loader`] reads a MovieLens ratings file and remaps raw IDs to a
//!    dense zero-based space, producing a [`RatingStore`]
//! 2. [`split::UserStratifiedSplitter`] withholds a per-user fraction of
//!    ratings for evaluation
//! 3. [`dataset::InteractionDataset`] encodes each partition into
//!    `(user, item, label)` examples and serves consecutive batches
//!
//! # Example
//!
//! ```no_run
//! use neumf_core::ProblemMode;
//! use neumf_data::dataset::InteractionDataset;
//! use neumf_data::loader::load_dat;
//! use neumf_data::split::UserStratifiedSplitter;
//!
//! # fn main() -> Result<(), neumf_data::DataError> {
//! let store = load_dat("ml-1m/ratings.dat")?;
//! let mut splitter = UserStratifiedSplitter::with_seed(42);
//! let (train, test) = splitter.split(&store, 0.2)?;
//! let train_set = InteractionDataset::from_store(&train, ProblemMode::Classification)?;
//! let test_set = InteractionDataset::from_store(&test, ProblemMode::Classification)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod dataset;
pub mod error;
pub mod loader;
pub mod rating;
pub mod split;

pub use dataset::{Batch, InteractionDataset};
pub use error::{DataError, DataResult};
pub use loader::{load_and_split, load_csv, load_dat};
pub use rating::{Rating, RatingStore};
pub use split::UserStratifiedSplitter;
