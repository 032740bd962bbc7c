//! Problem mode shared across dataset, model, and trainer.

use serde::{Deserialize, Serialize};

/// Number of rating classes on a 1-5 star scale.
pub const NUM_RATING_CLASSES: usize = 5;

/// Whether the model predicts a continuous rating or a rating-class
/// distribution.
///
/// Every mode-dependent behavior in the pipeline is keyed on this enum
/// rather than duplicated per component: the dataset picks the label shape,
/// the model picks the head width and final activation, and the trainer
/// picks the loss and metrics.
///
/// # Example
///
/// ```
/// use neumf_core::{ProblemMode, NUM_RATING_CLASSES};
///
/// assert_eq!(ProblemMode::Regression.output_dim(), 1);
/// assert_eq!(ProblemMode::Classification.output_dim(), NUM_RATING_CLASSES);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProblemMode {
    /// Predict the rating as a single real value.
    Regression,
    /// Predict a distribution over the five rating classes.
    Classification,
}

impl ProblemMode {
    /// Width of the model output (and of encoded labels) for this mode.
    pub fn output_dim(self) -> usize {
        match self {
            Self::Regression => 1,
            Self::Classification => NUM_RATING_CLASSES,
        }
    }

    /// Returns true for [`ProblemMode::Classification`].
    pub fn is_classification(self) -> bool {
        matches!(self, Self::Classification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_dim() {
        assert_eq!(ProblemMode::Regression.output_dim(), 1);
        assert_eq!(ProblemMode::Classification.output_dim(), 5);
    }

    #[test]
    fn test_is_classification() {
        assert!(ProblemMode::Classification.is_classification());
        assert!(!ProblemMode::Regression.is_classification());
    }

    #[test]
    fn test_serde_roundtrip() {
        let json = serde_json::to_string(&ProblemMode::Classification).unwrap();
        let mode: ProblemMode = serde_json::from_str(&json).unwrap();
        assert_eq!(mode, ProblemMode::Classification);
    }
}
