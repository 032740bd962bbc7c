//! Loss functions returning both the scalar loss and its gradient with
//! respect to the predictions.

use crate::TrainingError;
use neumf_layers::tensor::Tensor;

fn check_shapes(predictions: &Tensor, targets: &Tensor) -> Result<(), TrainingError> {
    if predictions.shape() != targets.shape() {
        return Err(TrainingError::ShapeMismatch {
            expected: targets.shape().to_vec(),
            actual: predictions.shape().to_vec(),
        });
    }
    Ok(())
}

/// Mean squared error over all elements.
///
/// Returns `(loss, gradient)` where the gradient is
/// `2 * (predictions - targets) / n`.
///
/// # Errors
///
/// Fails with [`TrainingError::ShapeMismatch`] on differing shapes.
pub fn mse(predictions: &Tensor, targets: &Tensor) -> Result<(f32, Tensor), TrainingError> {
    check_shapes(predictions, targets)?;
    let n = predictions.numel() as f32;
    let diff = predictions.sub(targets);
    let loss = diff.mul(&diff).sum() / n;
    Ok((loss, diff.scale(2.0 / n)))
}

/// Softmax cross-entropy over rows of class scores against one-hot
/// targets, averaged over the batch.
///
/// Returns `(loss, gradient)` where the gradient is
/// `(softmax(predictions) - targets) / batch`.
///
/// # Errors
///
/// Fails with [`TrainingError::ShapeMismatch`] on differing shapes.
pub fn softmax_cross_entropy(
    predictions: &Tensor,
    targets: &Tensor,
) -> Result<(f32, Tensor), TrainingError> {
    check_shapes(predictions, targets)?;
    let batch = predictions.shape()[0];
    let width = predictions.shape()[1];

    let mut loss = 0.0f32;
    let mut grad = vec![0.0f32; batch * width];
    for row in 0..batch {
        let scores = &predictions.data()[row * width..(row + 1) * width];
        let target_row = &targets.data()[row * width..(row + 1) * width];

        // Max-shifted softmax for numerical stability.
        let max = scores.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let exps: Vec<f32> = scores.iter().map(|&s| (s - max).exp()).collect();
        let sum: f32 = exps.iter().sum();

        for (col, (&e, &t)) in exps.iter().zip(target_row.iter()).enumerate() {
            let p = e / sum;
            if t > 0.0 {
                loss -= t * p.ln();
            }
            grad[row * width + col] = (p - t) / batch as f32;
        }
    }

    Ok((
        loss / batch as f32,
        Tensor::from_data(&[batch, width], grad),
    ))
}
