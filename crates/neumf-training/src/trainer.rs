//! The training and evaluation loop.

use crate::loss::{mse, softmax_cross_entropy};
use crate::metrics::{EpochMetrics, MetricsRecorder};
use crate::TrainingError;
use neumf_core::ProblemMode;
use neumf_data::dataset::InteractionDataset;
use neumf_layers::neumf::NeuMF;
use neumf_layers::tensor::Tensor;
use neumf_optimizer::{Optimizer, Sgd};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Configuration for a [`Trainer`].
///
/// # Example
///
/// ```
/// use neumf_training::trainer::TrainerConfig;
///
/// let config = TrainerConfig::new()
///     .with_batch_size(64)
///     .with_learning_rate(0.05)
///     .with_epochs(5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Number of examples per gradient step.
    pub batch_size: usize,
    /// SGD learning rate.
    pub learning_rate: f32,
    /// Number of passes over the training data.
    pub epochs: usize,
}

impl TrainerConfig {
    /// Creates a configuration with the reference defaults.
    pub fn new() -> Self {
        Self {
            batch_size: 128,
            learning_rate: 0.01,
            epochs: 20,
        }
    }

    /// Sets the batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Sets the learning rate.
    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Sets the number of epochs.
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Fails with [`TrainingError::InvalidConfig`] on a zero batch size,
    /// zero epochs, or a non-positive learning rate.
    pub fn validate(&self) -> Result<(), TrainingError> {
        if self.batch_size == 0 {
            return Err(TrainingError::InvalidConfig {
                message: "batch size must be positive".to_string(),
            });
        }
        if self.epochs == 0 {
            return Err(TrainingError::InvalidConfig {
                message: "epochs must be positive".to_string(),
            });
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(TrainingError::InvalidConfig {
                message: format!("learning rate must be positive, got {}", self.learning_rate),
            });
        }
        Ok(())
    }
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs SGD training and RMSE evaluation for a [`NeuMF`] model.
pub struct Trainer {
    config: TrainerConfig,
    optimizer: Sgd,
}

impl Trainer {
    /// Creates a trainer from a validated configuration.
    ///
    /// # Errors
    ///
    /// Fails with [`TrainingError::InvalidConfig`] for invalid
    /// configurations.
    pub fn new(config: TrainerConfig) -> Result<Self, TrainingError> {
        config.validate()?;
        let optimizer = Sgd::with_learning_rate(config.learning_rate);
        Ok(Self { config, optimizer })
    }

    /// The trainer's configuration.
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    fn check_dataset(model: &NeuMF, dataset: &InteractionDataset) -> Result<(), TrainingError> {
        if dataset.is_empty() {
            return Err(TrainingError::InvalidConfig {
                message: "dataset is empty".to_string(),
            });
        }
        if dataset.mode() != model.problem_mode() {
            return Err(TrainingError::InvalidConfig {
                message: format!(
                    "dataset encoded for {:?} but model built for {:?}",
                    dataset.mode(),
                    model.problem_mode()
                ),
            });
        }
        Ok(())
    }

    /// Trains the model for the configured number of epochs, returning
    /// per-epoch metrics.
    ///
    /// Batches are consecutive slices of the dataset in store order, so
    /// a seeded model and split yield a reproducible run.
    ///
    /// # Errors
    ///
    /// Fails if the dataset is empty or encoded for a different problem
    /// mode than the model.
    pub fn fit(
        &mut self,
        model: &mut NeuMF,
        dataset: &InteractionDataset,
    ) -> Result<Vec<EpochMetrics>, TrainingError> {
        Self::check_dataset(model, dataset)?;
        let mode = model.problem_mode();

        let mut history = Vec::with_capacity(self.config.epochs);
        for epoch in 1..=self.config.epochs {
            let mut recorder = MetricsRecorder::new(mode.is_classification());

            for batch in dataset.batches(self.config.batch_size)? {
                let predictions = model.forward_train(batch.users, batch.items)?;
                let targets = Tensor::from_data(
                    &[batch.len(), batch.label_width],
                    batch.labels.to_vec(),
                );

                let (loss, grad) = match mode {
                    ProblemMode::Regression => mse(&predictions, &targets)?,
                    ProblemMode::Classification => softmax_cross_entropy(&predictions, &targets)?,
                };
                model.backward(&grad)?;
                let optimizer = &mut self.optimizer;
                model.apply_gradients(|p, g| optimizer.apply_gradients(p, g));

                let correct = if mode.is_classification() {
                    predictions
                        .argmax_rows()
                        .iter()
                        .zip(targets.argmax_rows().iter())
                        .filter(|(p, t)| p == t)
                        .count()
                } else {
                    0
                };
                recorder.record(loss, batch.len(), correct);
            }

            let metrics = recorder.finish(epoch);
            match metrics.accuracy {
                Some(accuracy) => info!(
                    epoch,
                    loss = metrics.loss,
                    accuracy,
                    "Epoch complete"
                ),
                None => info!(epoch, loss = metrics.loss, "Epoch complete"),
            }
            history.push(metrics);
        }
        Ok(history)
    }

    /// Evaluates root mean squared error on a held-out dataset without
    /// updating the model.
    ///
    /// In classification mode the error is measured between the predicted
    /// and true class indices; in regression mode between the raw output
    /// and the label.
    ///
    /// # Errors
    ///
    /// Fails if the dataset is empty or encoded for a different problem
    /// mode than the model.
    pub fn evaluate(&self, model: &NeuMF, dataset: &InteractionDataset) -> Result<f64, TrainingError> {
        Self::check_dataset(model, dataset)?;
        let mode = model.problem_mode();

        let mut squared_sum = 0.0f64;
        for batch in dataset.batches(self.config.batch_size)? {
            let predictions = model.forward(batch.users, batch.items)?;
            match mode {
                ProblemMode::Regression => {
                    for (p, t) in predictions.data().iter().zip(batch.labels.iter()) {
                        squared_sum += ((p - t) as f64).powi(2);
                    }
                }
                ProblemMode::Classification => {
                    let targets = Tensor::from_data(
                        &[batch.len(), batch.label_width],
                        batch.labels.to_vec(),
                    );
                    for (p, t) in predictions
                        .argmax_rows()
                        .iter()
                        .zip(targets.argmax_rows().iter())
                    {
                        let diff = *p as f64 - *t as f64;
                        squared_sum += diff * diff;
                    }
                }
            }
        }

        let rmse = (squared_sum / dataset.len() as f64).sqrt();
        info!(rmse, examples = dataset.len(), "Evaluation complete");
        Ok(rmse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = TrainerConfig::new();
        assert_eq!(config.batch_size, 128);
        assert_eq!(config.epochs, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_zero_batch_size() {
        assert!(TrainerConfig::new().with_batch_size(0).validate().is_err());
    }

    #[test]
    fn test_config_rejects_zero_epochs() {
        assert!(TrainerConfig::new().with_epochs(0).validate().is_err());
    }

    #[test]
    fn test_config_rejects_non_positive_learning_rate() {
        assert!(TrainerConfig::new()
            .with_learning_rate(0.0)
            .validate()
            .is_err());
        assert!(TrainerConfig::new()
            .with_learning_rate(f32::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_trainer_rejects_invalid_config() {
        assert!(Trainer::new(TrainerConfig::new().with_epochs(0)).is_err());
    }
}
