use directories::ProjectDirs;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::core::analysis::{EqualizedIndices, SplitStrategy};
use crate::core::batching::{validate_batch_size, BalancedBatchSampler};
use crate::core::error::{validate_fraction, BalanceError, BalanceResult};
use crate::core::image::FileImageSource;
use crate::core::training::{
    checkpoint_path, EarlyStoppingConfig, Metric, TrainingMonitor, TrainingOptions,
};

/// Run parameters, loadable from a JSON file and overridable from the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Share of the scarcer class withdrawn for validation, in (0, 1]
    pub validation_fraction: f64,

    /// Samples per batch; half come from each class
    pub batch_size: usize,

    /// Side length of the square particle images
    pub image_dim: usize,

    pub epochs: usize,

    /// Reshuffle the class streams at every epoch boundary
    pub shuffle: bool,

    /// Seed for every random draw; `None` seeds from entropy
    pub seed: Option<u64>,

    pub strategy: SplitStrategy,

    pub early_stopping: Option<EarlyStoppingConfig>,

    /// Checkpoint file stem inside the output directory
    pub model_name: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            validation_fraction: 0.2,
            batch_size: 512,
            image_dim: 64,
            epochs: 10,
            shuffle: true,
            seed: None,
            strategy: SplitStrategy::Balanced,
            early_stopping: None,
            model_name: "model".to_string(),
        }
    }
}

impl RunConfig {
    /// Default location of the config file in the user's config directory
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "particle-balance")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Read a config file; missing fields take their defaults
    pub fn load(path: &Path) -> BalanceResult<Self> {
        info!("Loading config from: {:?}", path);
        let contents = fs::read_to_string(path)?;
        let config: RunConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config, or return defaults if the file doesn't exist.
    /// A file that exists but is unreadable, malformed or invalid is an error.
    pub fn load_or_default(path: &Path) -> BalanceResult<Self> {
        match Self::load(path) {
            Ok(config) => {
                info!("Successfully loaded config");
                Ok(config)
            }
            Err(BalanceError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No config file found at {:?}. Using defaults.", path);
                Ok(Self::default())
            }
            Err(e) => {
                error!("Rejecting config file {:?}: {}", path, e);
                Err(e)
            }
        }
    }

    pub fn save(&self, path: &Path) -> BalanceResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!("Config saved to: {:?}", path);
        Ok(())
    }

    /// Batch sampler over equalized streams with this run's batch size and shuffling
    pub fn sampler<R: Rng + ?Sized>(
        &self,
        indices: EqualizedIndices,
        rng: &mut R,
    ) -> BalanceResult<BalancedBatchSampler> {
        BalancedBatchSampler::new(indices, self.batch_size, self.shuffle, rng)
    }

    /// Image reader for `image_dim` square particles under `root`
    pub fn image_source(&self, root: Option<PathBuf>) -> FileImageSource {
        FileImageSource::new(root, self.image_dim)
    }

    /// Save-best checkpointing on `val_loss`, plus early stopping when configured
    pub fn monitor(&self) -> TrainingMonitor {
        TrainingMonitor::new(Metric::ValLoss, self.early_stopping)
    }

    /// Epoch count and `<out_dir>/<model_name>.h5`
    pub fn training_options(&self, out_dir: &Path) -> TrainingOptions {
        TrainingOptions {
            epochs: self.epochs,
            checkpoint_path: checkpoint_path(out_dir, &self.model_name),
        }
    }

    pub fn validate(&self) -> BalanceResult<()> {
        validate_fraction(self.validation_fraction)?;
        validate_batch_size(self.batch_size)?;
        if self.image_dim == 0 {
            return Err(BalanceError::Configuration(
                "image dimension must be positive".to_string(),
            ));
        }
        if self.epochs == 0 {
            return Err(BalanceError::Configuration(
                "epochs must be positive".to_string(),
            ));
        }
        if self.model_name.trim().is_empty() {
            return Err(BalanceError::Configuration(
                "model name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
