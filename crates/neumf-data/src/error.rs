//! Error types for the neumf-data crate.

use thiserror::Error;

/// Error type for data loading, splitting, and dataset access.
#[derive(Debug, Error)]
pub enum DataError {
    /// Malformed construction parameters (split fraction out of range,
    /// empty store, zero batch size, unencodable rating).
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// Dataset indexing beyond length.
    #[error("Index {index} out of range for dataset of length {length}")]
    IndexOutOfRange {
        /// The requested index
        index: usize,
        /// The dataset length
        length: usize,
    },

    /// A data line that does not parse into the expected delimited fields,
    /// or IDs that violate the dense zero-based invariant. Always fatal:
    /// silently skipping records would change the dataset size and break
    /// embedding indexing downstream.
    #[error("Malformed record: {message}")]
    MalformedRecord {
        /// Description of the malformed record
        message: String,
    },

    /// An I/O error while reading a ratings file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A CSV-level read error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for data operations.
pub type DataResult<T> = Result<T, DataError>;
