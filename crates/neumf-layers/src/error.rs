//! Error types for the neumf-layers crate.

use thiserror::Error;

/// Error type for layer and model operations.
#[derive(Debug, Error)]
pub enum LayerError {
    /// Shape mismatch between expected and actual tensor shapes.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// The expected shape
        expected: Vec<usize>,
        /// The actual shape that was provided
        actual: Vec<usize>,
    },

    /// Invalid input dimension for the layer.
    #[error("Invalid input dimension: expected {expected}, got {actual}")]
    InvalidInputDimension {
        /// The expected input dimension
        expected: usize,
        /// The actual input dimension
        actual: usize,
    },

    /// Malformed construction parameters.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// Embedding lookup with an ID outside the table.
    #[error("Embedding ID {id} out of range for table of size {vocab}")]
    IdOutOfRange {
        /// The offending ID
        id: usize,
        /// The table's vocabulary size
        vocab: usize,
    },

    /// Backward pass invoked before a cached forward pass.
    #[error("Layer not initialized: forward pass must be called before backward pass")]
    NotInitialized,
}

/// Result type alias for layer operations.
pub type LayerResult<T> = Result<T, LayerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LayerError::ShapeMismatch {
            expected: vec![32, 64],
            actual: vec![32, 128],
        };
        assert!(err.to_string().contains("Shape mismatch"));

        let err = LayerError::IdOutOfRange { id: 10, vocab: 5 };
        assert!(err.to_string().contains("out of range"));

        let err = LayerError::NotInitialized;
        assert!(err.to_string().contains("not initialized"));
    }
}
