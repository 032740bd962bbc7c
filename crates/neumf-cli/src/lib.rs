//! Argument parsing and the training run for the `neumf` binary.

#![warn(missing_docs)]

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use neumf_core::{Hyperparams, ProblemMode};
use neumf_data::dataset::InteractionDataset;
use neumf_data::loader::{load_csv, load_dat};
use neumf_data::split::UserStratifiedSplitter;
use neumf_layers::neumf::NeuMFConfig;
use neumf_training::trainer::{Trainer, TrainerConfig};
use std::path::PathBuf;
use tracing::info;

/// File format of the ratings input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RatingsFormat {
    /// `user::item::rating::timestamp`, no header
    Dat,
    /// `user,item,rating,timestamp` with a header row
    Csv,
}

/// Problem mode selection on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Predict the rating value with a single output
    Regression,
    /// Predict the rating class with five outputs
    Classification,
}

impl From<ModeArg> for ProblemMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Regression => ProblemMode::Regression,
            ModeArg::Classification => ProblemMode::Classification,
        }
    }
}

/// Train a NeuMF model on a MovieLens ratings file.
///
/// # Example
///
/// ```bash
/// neumf ml-1m/ratings.dat --mode classification --epochs 10
/// ```
#[derive(Parser, Debug, Clone)]
#[command(name = "neumf", version, about = "NeuMF recommender training")]
pub struct TrainArgs {
    /// Path to the ratings file
    pub data: PathBuf,

    /// Input file format
    #[arg(long, value_enum, default_value = "dat")]
    pub format: RatingsFormat,

    /// Problem mode
    #[arg(long, value_enum, default_value = "regression")]
    pub mode: ModeArg,

    /// Fraction of each user's ratings withheld for evaluation
    #[arg(long, default_value = "0.2")]
    pub test_fraction: f64,

    /// Batch size for training
    #[arg(long, short = 'b', default_value = "128")]
    pub batch_size: usize,

    /// Learning rate
    #[arg(long, default_value = "0.01")]
    pub learning_rate: f32,

    /// Number of training epochs
    #[arg(long, short = 'e', default_value = "20")]
    pub epochs: usize,

    /// Dimension of the matrix-factorization embeddings
    #[arg(long, default_value = "30")]
    pub mf_dims: usize,

    /// MLP tower widths, outermost first; the first width must be even
    #[arg(long, value_delimiter = ',', default_value = "256,128,64,32,16,8")]
    pub mlp_layers: Vec<usize>,

    /// Seed for parameter initialization and split sampling
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Write per-epoch metrics as JSON to this file
    #[arg(long)]
    pub metrics_out: Option<PathBuf>,
}

impl TrainArgs {
    /// Collects the arguments into a validated hyperparameter bundle.
    pub fn hyperparams(&self) -> Result<Hyperparams> {
        let hp = Hyperparams {
            problem_mode: self.mode.into(),
            test_fraction: self.test_fraction,
            batch_size: self.batch_size,
            learning_rate: self.learning_rate,
            epochs: self.epochs,
            mf_dims: self.mf_dims,
            mlp_layer_sizes: self.mlp_layers.clone(),
            seed: self.seed,
        };
        hp.validate().context("invalid hyperparameters")?;
        Ok(hp)
    }
}

/// Runs the full load, split, train, and evaluate pipeline.
pub fn run(args: &TrainArgs) -> Result<()> {
    let hp = args.hyperparams()?;

    let store = match args.format {
        RatingsFormat::Dat => load_dat(&args.data),
        RatingsFormat::Csv => load_csv(&args.data),
    }
    .with_context(|| format!("failed to load ratings from {}", args.data.display()))?;

    let mut splitter = UserStratifiedSplitter::with_seed(hp.seed);
    let (train, test) = splitter
        .split(&store, hp.test_fraction)
        .context("failed to split ratings")?;

    let train_set = InteractionDataset::from_store(&train, hp.problem_mode)
        .context("failed to encode training partition")?;

    let mut model = NeuMFConfig::new(store.num_users(), store.num_items())
        .with_mlp_layer_sizes(hp.mlp_layer_sizes.clone())
        .with_mf_dims(hp.mf_dims)
        .with_problem_mode(hp.problem_mode)
        .with_seed(hp.seed)
        .build()
        .context("failed to build model")?;

    let mut trainer = Trainer::new(
        TrainerConfig::new()
            .with_batch_size(hp.batch_size)
            .with_learning_rate(hp.learning_rate)
            .with_epochs(hp.epochs),
    )
    .context("failed to build trainer")?;

    info!(
        users = store.num_users(),
        items = store.num_items(),
        mode = ?hp.problem_mode,
        "Starting training"
    );
    let history = trainer
        .fit(&mut model, &train_set)
        .context("training failed")?;

    if let Some(path) = &args.metrics_out {
        let json = serde_json::to_string_pretty(&history)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write metrics to {}", path.display()))?;
    }

    if test.is_empty() {
        info!("Test partition is empty, skipping evaluation");
        return Ok(());
    }
    let test_set = InteractionDataset::from_store(&test, hp.problem_mode)
        .context("failed to encode test partition")?;
    let rmse = trainer
        .evaluate(&model, &test_set)
        .context("evaluation failed")?;
    info!(rmse, "Final held-out RMSE");
    Ok(())
}
