use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::config::RunConfig;
use crate::core::analysis::SplitStrategy;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print per-class counts of a labeled particle set
    Inspect(InspectArgs),

    /// Withdraw a balanced validation set and write the split manifest
    Split(SplitArgs),

    /// Mean absolute error of predictions against labels
    Evaluate(EvaluateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Metadata table listing the particle images (STAR metadata or plain list)
    #[arg(long)]
    pub metadata: PathBuf,

    /// Label file with one label per image, in metadata order
    #[arg(long)]
    pub labels: PathBuf,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Args, Debug)]
pub struct SplitArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Directory for the split manifest and effective config
    #[arg(long)]
    pub out_dir: PathBuf,

    /// JSON config file; flags below override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Share of the scarcer class withdrawn for validation
    #[arg(long)]
    pub fraction: Option<f64>,

    /// Samples per batch (even); half come from each class
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Seed for reproducible draws
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, value_enum)]
    pub strategy: Option<SplitStrategy>,
}

impl SplitArgs {
    /// Apply command-line overrides on top of a loaded config
    pub fn apply_to(&self, mut config: RunConfig) -> RunConfig {
        if let Some(fraction) = self.fraction {
            config.validation_fraction = fraction;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        config
    }
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// True labels, one per line
    #[arg(long)]
    pub labels: PathBuf,

    /// Predicted scores, one per line
    #[arg(long)]
    pub predictions: PathBuf,
}
