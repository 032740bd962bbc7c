//! Training metrics collection and recording.

use serde::{Deserialize, Serialize};

/// Metrics for one training epoch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch these metrics were recorded for, starting at 1.
    pub epoch: usize,
    /// Example-weighted mean loss over the epoch.
    pub loss: f64,
    /// Classification accuracy, absent in regression mode.
    pub accuracy: Option<f64>,
}

impl EpochMetrics {
    /// Creates metrics with the given epoch and loss.
    pub fn new(epoch: usize, loss: f64) -> Self {
        Self {
            epoch,
            loss,
            accuracy: None,
        }
    }

    /// Sets the accuracy metric.
    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }
}

/// Accumulates batch statistics into an example-weighted epoch summary.
#[derive(Debug, Clone, Default)]
pub struct MetricsRecorder {
    loss_sum: f64,
    correct: u64,
    examples: u64,
    track_accuracy: bool,
}

impl MetricsRecorder {
    /// Creates a recorder. Accuracy is reported only when
    /// `track_accuracy` is set.
    pub fn new(track_accuracy: bool) -> Self {
        Self {
            track_accuracy,
            ..Self::default()
        }
    }

    /// Records one batch: its mean loss, size, and correct predictions.
    pub fn record(&mut self, loss: f32, batch_len: usize, correct: usize) {
        self.loss_sum += loss as f64 * batch_len as f64;
        self.correct += correct as u64;
        self.examples += batch_len as u64;
    }

    /// Number of examples recorded so far.
    pub fn examples(&self) -> u64 {
        self.examples
    }

    /// Finishes the epoch, producing its summary metrics.
    pub fn finish(self, epoch: usize) -> EpochMetrics {
        let examples = self.examples.max(1) as f64;
        let metrics = EpochMetrics::new(epoch, self.loss_sum / examples);
        if self.track_accuracy {
            metrics.with_accuracy(self.correct as f64 / examples)
        } else {
            metrics
        }
    }
}
