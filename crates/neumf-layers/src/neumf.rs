//! Neural Matrix Factorization (NeuMF) model.
//!
//! NeuMF fuses two branches over a (user, item) pair:
//!
//! - an **MF branch**: the elementwise product of low-dimensional user and
//!   item embeddings, capturing low-rank linear affinity;
//! - an **MLP branch**: user and item embeddings concatenated and pushed
//!   through a ReLU tower, capturing higher-order non-linear interaction.
//!
//! Both branch vectors are concatenated and projected by a final dense
//! head: one output for regression, one per rating class for
//! classification. Classification applies an elementwise sigmoid per
//! output unit (not a softmax); downstream loss code accounts for that.

use crate::activation::Sigmoid;
use crate::dense::Dense;
use crate::embedding::Embedding;
use crate::error::LayerError;
use crate::layer::Layer;
use crate::mlp::MlpTower;
use crate::tensor::Tensor;
use neumf_core::ProblemMode;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Configuration for building a [`NeuMF`] model.
///
/// # Example
///
/// ```
/// use neumf_core::ProblemMode;
/// use neumf_layers::neumf::NeuMFConfig;
///
/// let model = NeuMFConfig::new(100, 50)
///     .with_mlp_layer_sizes(vec![16, 8, 4])
///     .with_mf_dims(6)
///     .with_problem_mode(ProblemMode::Regression)
///     .with_seed(42)
///     .build()
///     .unwrap();
/// assert_eq!(model.output_dim(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NeuMFConfig {
    /// Number of distinct users (embedding rows).
    pub num_users: usize,
    /// Number of distinct items (embedding rows).
    pub num_items: usize,
    /// MLP tower widths; the first is the concatenated embedding width and
    /// must be even.
    pub mlp_layer_sizes: Vec<usize>,
    /// Dimension of the MF embeddings.
    pub mf_dims: usize,
    /// Problem mode, deciding head width and final activation.
    pub problem_mode: ProblemMode,
    /// Seed for parameter initialization.
    pub seed: u64,
}

impl NeuMFConfig {
    /// Creates a configuration with the reference defaults for the given
    /// vocabulary sizes.
    pub fn new(num_users: usize, num_items: usize) -> Self {
        Self {
            num_users,
            num_items,
            mlp_layer_sizes: vec![256, 128, 64, 32, 16, 8],
            mf_dims: 30,
            problem_mode: ProblemMode::Regression,
            seed: 42,
        }
    }

    /// Sets the MLP tower widths.
    pub fn with_mlp_layer_sizes(mut self, sizes: Vec<usize>) -> Self {
        self.mlp_layer_sizes = sizes;
        self
    }

    /// Sets the MF embedding dimension.
    pub fn with_mf_dims(mut self, mf_dims: usize) -> Self {
        self.mf_dims = mf_dims;
        self
    }

    /// Sets the problem mode.
    pub fn with_problem_mode(mut self, mode: ProblemMode) -> Self {
        self.problem_mode = mode;
        self
    }

    /// Sets the initialization seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Fails with [`LayerError::InvalidArgument`] on zero vocabulary sizes,
    /// zero `mf_dims`, an empty width list, a zero width, or an odd first
    /// width (it splits evenly between the user and item MLP embeddings).
    pub fn validate(&self) -> Result<(), LayerError> {
        if self.num_users == 0 || self.num_items == 0 {
            return Err(LayerError::InvalidArgument {
                message: "num_users and num_items must be positive".to_string(),
            });
        }
        if self.mf_dims == 0 {
            return Err(LayerError::InvalidArgument {
                message: "mf_dims must be positive".to_string(),
            });
        }
        if self.mlp_layer_sizes.is_empty() {
            return Err(LayerError::InvalidArgument {
                message: "mlp_layer_sizes must contain at least one width".to_string(),
            });
        }
        if self.mlp_layer_sizes.iter().any(|&w| w == 0) {
            return Err(LayerError::InvalidArgument {
                message: format!("MLP widths must be positive, got {:?}", self.mlp_layer_sizes),
            });
        }
        if self.mlp_layer_sizes[0] % 2 != 0 {
            return Err(LayerError::InvalidArgument {
                message: format!(
                    "first MLP width must be even to split between user and item embeddings, got {}",
                    self.mlp_layer_sizes[0]
                ),
            });
        }
        Ok(())
    }

    /// Builds the model.
    pub fn build(self) -> Result<NeuMF, LayerError> {
        NeuMF::from_config(self)
    }
}

/// The NeuMF model: four embedding tables, an MLP tower, and a prediction
/// head.
#[derive(Debug, Clone)]
pub struct NeuMF {
    /// MF-branch user embeddings, dimension `mf_dims`
    mf_user: Embedding,
    /// MF-branch item embeddings, dimension `mf_dims`
    mf_item: Embedding,
    /// MLP-branch user embeddings, dimension `mlp_layer_sizes[0] / 2`
    mlp_user: Embedding,
    /// MLP-branch item embeddings, dimension `mlp_layer_sizes[0] / 2`
    mlp_item: Embedding,
    /// ReLU tower over the concatenated MLP embeddings
    tower: MlpTower,
    /// Final projection over the fused branch vectors
    prediction: Dense,
    /// Elementwise sigmoid over the head output (classification only)
    sigmoid: Sigmoid,
    /// Problem mode
    problem_mode: ProblemMode,
    /// MF embedding dimension (split point for branch gradients)
    mf_dims: usize,
    /// Cached MF user embeddings for the product-rule backward
    cached_mf_user: Option<Tensor>,
    /// Cached MF item embeddings for the product-rule backward
    cached_mf_item: Option<Tensor>,
}

impl NeuMF {
    /// Builds a model from a validated configuration.
    pub fn from_config(config: NeuMFConfig) -> Result<Self, LayerError> {
        config.validate()?;

        let mut rng = StdRng::seed_from_u64(config.seed);
        let half = config.mlp_layer_sizes[0] / 2;

        let mf_user = Embedding::new(config.num_users, config.mf_dims, &mut rng);
        let mf_item = Embedding::new(config.num_items, config.mf_dims, &mut rng);
        let mlp_user = Embedding::new(config.num_users, half, &mut rng);
        let mlp_item = Embedding::new(config.num_items, half, &mut rng);
        let tower = MlpTower::new(&config.mlp_layer_sizes, &mut rng)?;
        let prediction = Dense::new(
            config.mf_dims + tower.output_dim(),
            config.problem_mode.output_dim(),
            &mut rng,
        );

        Ok(Self {
            mf_user,
            mf_item,
            mlp_user,
            mlp_item,
            tower,
            prediction,
            sigmoid: Sigmoid::new(),
            problem_mode: config.problem_mode,
            mf_dims: config.mf_dims,
            cached_mf_user: None,
            cached_mf_item: None,
        })
    }

    /// Returns the problem mode the model was built for.
    pub fn problem_mode(&self) -> ProblemMode {
        self.problem_mode
    }

    /// Width of the model output.
    pub fn output_dim(&self) -> usize {
        self.problem_mode.output_dim()
    }

    fn check_batch(users: &[usize], items: &[usize]) -> Result<(), LayerError> {
        if users.len() != items.len() {
            return Err(LayerError::InvalidArgument {
                message: format!(
                    "user and item batches must have equal length, got {} and {}",
                    users.len(),
                    items.len()
                ),
            });
        }
        Ok(())
    }

    /// Forward pass over a batch of parallel user/item ID slices.
    ///
    /// Returns a `[batch, 1]` tensor for regression or `[batch, 5]` for
    /// classification (after elementwise sigmoid).
    ///
    /// # Errors
    ///
    /// Fails on mismatched batch lengths or out-of-range IDs.
    pub fn forward(&self, users: &[usize], items: &[usize]) -> Result<Tensor, LayerError> {
        Self::check_batch(users, items)?;

        let mf_vector = self.mf_user.lookup(users)?.mul(&self.mf_item.lookup(items)?);
        let mlp_input = self
            .mlp_user
            .lookup(users)?
            .concat_cols(&self.mlp_item.lookup(items)?);
        let mlp_vector = self.tower.forward(&mlp_input)?;

        let output = self
            .prediction
            .forward(&mf_vector.concat_cols(&mlp_vector))?;
        self.finalize(output)
    }

    /// Forward pass caching intermediates for [`NeuMF::backward`].
    pub fn forward_train(&mut self, users: &[usize], items: &[usize]) -> Result<Tensor, LayerError> {
        Self::check_batch(users, items)?;

        let mf_u = self.mf_user.lookup_train(users)?;
        let mf_i = self.mf_item.lookup_train(items)?;
        let mf_vector = mf_u.mul(&mf_i);

        let mlp_input = self
            .mlp_user
            .lookup_train(users)?
            .concat_cols(&self.mlp_item.lookup_train(items)?);
        let mlp_vector = self.tower.forward_train(&mlp_input)?;

        let output = self
            .prediction
            .forward_train(&mf_vector.concat_cols(&mlp_vector))?;
        let output = match self.problem_mode {
            ProblemMode::Classification => self.sigmoid.forward_train(&output)?,
            ProblemMode::Regression => output,
        };

        self.cached_mf_user = Some(mf_u);
        self.cached_mf_item = Some(mf_i);
        Ok(output)
    }

    // Elementwise sigmoid per output unit for classification; the raw
    // linear value for regression.
    fn finalize(&self, output: Tensor) -> Result<Tensor, LayerError> {
        match self.problem_mode {
            ProblemMode::Classification => self.sigmoid.forward(&output),
            ProblemMode::Regression => Ok(output),
        }
    }

    /// Backward pass from the gradient of the loss with respect to the
    /// model output, accumulating gradients in every parameter holder.
    ///
    /// # Errors
    ///
    /// Fails if no training forward pass was cached.
    pub fn backward(&mut self, grad: &Tensor) -> Result<(), LayerError> {
        let mut g = grad.clone();

        if self.problem_mode.is_classification() {
            g = self.sigmoid.backward(&g)?;
        }

        let fused_grad = self.prediction.backward(&g)?;
        let (mf_grad, mlp_grad) = fused_grad.split_cols(self.mf_dims);

        // Product rule through the elementwise MF interaction.
        let mf_u = self
            .cached_mf_user
            .as_ref()
            .ok_or(LayerError::NotInitialized)?;
        let mf_i = self
            .cached_mf_item
            .as_ref()
            .ok_or(LayerError::NotInitialized)?;
        self.mf_user.accumulate_grad(&mf_grad.mul(mf_i))?;
        self.mf_item.accumulate_grad(&mf_grad.mul(mf_u))?;

        let concat_grad = self.tower.backward(&mlp_grad)?;
        let half = self.tower.input_dim() / 2;
        let (user_grad, item_grad) = concat_grad.split_cols(half);
        self.mlp_user.accumulate_grad(&user_grad)?;
        self.mlp_item.accumulate_grad(&item_grad)?;

        Ok(())
    }

    /// Applies accumulated gradients to every parameter tensor and clears
    /// caches.
    pub fn apply_gradients<F>(&mut self, mut update: F)
    where
        F: FnMut(&mut [f32], &[f32]),
    {
        self.mf_user.apply_gradients(&mut update);
        self.mf_item.apply_gradients(&mut update);
        self.mlp_user.apply_gradients(&mut update);
        self.mlp_item.apply_gradients(&mut update);
        self.tower.apply_gradients(&mut update);
        self.prediction.apply_gradients(&mut update);
        self.cached_mf_user = None;
        self.cached_mf_item = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> NeuMFConfig {
        NeuMFConfig::new(10, 8)
            .with_mlp_layer_sizes(vec![16, 8, 4])
            .with_mf_dims(6)
            .with_seed(3)
    }

    #[test]
    fn test_regression_output_shape() {
        let model = config().build().unwrap();
        let out = model.forward(&[0, 1, 2], &[3, 4, 5]).unwrap();
        assert_eq!(out.shape(), &[3, 1]);
    }

    #[test]
    fn test_classification_output_shape_and_range() {
        let model = config()
            .with_problem_mode(ProblemMode::Classification)
            .build()
            .unwrap();
        let out = model.forward(&[0, 1], &[2, 3]).unwrap();
        assert_eq!(out.shape(), &[2, 5]);
        // Sigmoid keeps every unit in (0, 1).
        assert!(out.data().iter().all(|&p| p > 0.0 && p < 1.0));
    }

    #[test]
    fn test_odd_first_mlp_width_rejected() {
        let err = config()
            .with_mlp_layer_sizes(vec![15, 8])
            .build()
            .unwrap_err();
        assert!(matches!(err, LayerError::InvalidArgument { .. }));
    }

    #[test]
    fn test_zero_dims_rejected() {
        assert!(NeuMFConfig::new(0, 8).build().is_err());
        assert!(config().with_mf_dims(0).build().is_err());
        assert!(config().with_mlp_layer_sizes(vec![]).build().is_err());
    }

    #[test]
    fn test_mismatched_batch_rejected() {
        let model = config().build().unwrap();
        assert!(model.forward(&[0, 1], &[0]).is_err());
    }

    #[test]
    fn test_out_of_range_id_rejected() {
        let model = config().build().unwrap();
        assert!(model.forward(&[10], &[0]).is_err());
        assert!(model.forward(&[0], &[8]).is_err());
    }

    #[test]
    fn test_seeded_construction_is_deterministic() {
        let a = config().build().unwrap();
        let b = config().build().unwrap();
        let out_a = a.forward(&[1, 2], &[3, 4]).unwrap();
        let out_b = b.forward(&[1, 2], &[3, 4]).unwrap();
        assert_eq!(out_a, out_b);
    }

    #[test]
    fn test_backward_requires_forward_train() {
        let mut model = config().build().unwrap();
        let grad = Tensor::zeros(&[1, 1]);
        assert!(model.backward(&grad).is_err());
    }

    #[test]
    fn test_classification_backward_requires_forward_train() {
        let mut model = config()
            .with_problem_mode(ProblemMode::Classification)
            .build()
            .unwrap();
        // The head's sigmoid has no cached activation yet.
        assert!(model.backward(&Tensor::zeros(&[1, 5])).is_err());
    }

    #[test]
    fn test_classification_gradient_step_reduces_squared_error() {
        let mut model = config()
            .with_problem_mode(ProblemMode::Classification)
            .build()
            .unwrap();
        let users = [0usize, 1];
        let items = [0usize, 1];
        let target = Tensor::from_data(
            &[2, 5],
            vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0],
        );

        let mut first_loss = None;
        for _ in 0..20 {
            let out = model.forward_train(&users, &items).unwrap();
            let diff = out.sub(&target);
            let loss = diff.mul(&diff).sum() / 10.0;
            first_loss.get_or_insert(loss);
            model.backward(&diff.scale(2.0 / 10.0)).unwrap();
            model.apply_gradients(|p, g| {
                for (p, g) in p.iter_mut().zip(g) {
                    *p -= 0.5 * g;
                }
            });
        }
        let out = model.forward(&users, &items).unwrap();
        let diff = out.sub(&target);
        let final_loss = diff.mul(&diff).sum() / 10.0;
        assert!(
            final_loss < first_loss.unwrap(),
            "loss did not decrease: {final_loss} vs {first_loss:?}"
        );
    }

    #[test]
    fn test_gradient_step_reduces_squared_error() {
        let mut model = config().build().unwrap();
        let users = [0usize, 1, 2, 3];
        let items = [0usize, 1, 2, 3];
        let target = Tensor::from_data(&[4, 1], vec![1.0, 0.0, 1.0, 0.0]);

        let mut first_loss = None;
        for _ in 0..20 {
            let out = model.forward_train(&users, &items).unwrap();
            let diff = out.sub(&target);
            let loss = diff.mul(&diff).sum() / 4.0;
            first_loss.get_or_insert(loss);
            // dMSE/dout = 2 (out - target) / n
            model.backward(&diff.scale(2.0 / 4.0)).unwrap();
            model.apply_gradients(|p, g| {
                for (p, g) in p.iter_mut().zip(g) {
                    *p -= 0.1 * g;
                }
            });
        }
        let out = model.forward(&users, &items).unwrap();
        let diff = out.sub(&target);
        let final_loss = diff.mul(&diff).sum() / 4.0;
        assert!(
            final_loss < first_loss.unwrap(),
            "loss did not decrease: {final_loss} vs {first_loss:?}"
        );
    }
}
