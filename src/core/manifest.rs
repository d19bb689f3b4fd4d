//! Serializable record of one run's split, written next to the model output.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::config::RunConfig;
use crate::core::analysis::{
    equalize_pools, split_with_strategy, ClassStats, EqualizedIndices, SplitStrategy,
};
use crate::core::dataset::{ClassPools, Sample, SamplePool};
use crate::core::error::BalanceResult;

/// File name used inside the output directory
pub const MANIFEST_FILE: &str = "split_manifest.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitManifest {
    pub strategy: SplitStrategy,
    pub fraction: f64,
    pub seed: Option<u64>,
    pub batch_size: usize,
    pub validation: Vec<Sample>,
    pub training: Vec<Sample>,
    pub validation_stats: ClassStats,
    pub training_stats: ClassStats,
    /// Oversampled label-0 / label-1 streams over `training`; binary runs only
    pub equalized: Option<EqualizedIndices>,
    pub batches_per_epoch: usize,
}

impl SplitManifest {
    /// Split the pool, equalize the training classes and record the result
    pub fn build<R: Rng + ?Sized>(
        pool: &SamplePool,
        config: &RunConfig,
        rng: &mut R,
    ) -> BalanceResult<Self> {
        config.validate()?;

        let split = split_with_strategy(pool, config.validation_fraction, config.strategy, rng)?;
        let training_stats = ClassStats::from_samples(&split.training);
        let validation_stats = ClassStats::from_samples(&split.validation);

        let (equalized, batches_per_epoch) = match config.strategy {
            SplitStrategy::Balanced => {
                let pools = ClassPools::from_samples(&split.training)?;
                let equalized = equalize_pools(&pools)?;
                let batches = equalized.len() / (config.batch_size / 2);
                (Some(equalized), batches)
            }
            SplitStrategy::Uniform => (None, split.training.len() / config.batch_size),
        };

        info!(
            "Manifest: {} validation, {} training, {} batches per epoch",
            split.validation.len(),
            split.training.len(),
            batches_per_epoch
        );

        Ok(Self {
            strategy: config.strategy,
            fraction: config.validation_fraction,
            seed: config.seed,
            batch_size: config.batch_size,
            validation: split.validation,
            training: split.training,
            validation_stats,
            training_stats,
            equalized,
            batches_per_epoch,
        })
    }

    pub fn save(&self, path: &Path) -> BalanceResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!("Split manifest saved to: {:?}", path);
        Ok(())
    }

    pub fn load(path: &Path) -> BalanceResult<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}
