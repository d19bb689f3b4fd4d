//! Early stopping and save-best checkpointing as plain state, polled by the
//! epoch loop once per epoch.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Extension of checkpoint files written by the model runner
pub const CHECKPOINT_EXTENSION: &str = "h5";

/// Metrics a monitor can watch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TrainLoss,
    #[default]
    ValLoss,
}

impl Metric {
    pub fn as_str(&self) -> &str {
        match self {
            Metric::TrainLoss => "train_loss",
            Metric::ValLoss => "val_loss",
        }
    }
}

/// Losses reported at the end of one epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch: usize,
    pub train_loss: f64,
    /// Absent when the run has no validation set
    pub val_loss: Option<f64>,
}

impl EpochMetrics {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::TrainLoss => Some(self.train_loss),
            Metric::ValLoss => self.val_loss,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopState {
    Training,
    Stopped { epoch: usize },
}

/// Early stopping settings: stop once `monitor` drops below `threshold`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EarlyStoppingConfig {
    #[serde(default)]
    pub monitor: Metric,
    pub threshold: f64,
}

impl Default for EarlyStoppingConfig {
    fn default() -> Self {
        Self {
            monitor: Metric::ValLoss,
            threshold: 0.30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EarlyStopping {
    config: EarlyStoppingConfig,
    state: StopState,
}

impl EarlyStopping {
    pub fn new(config: EarlyStoppingConfig) -> Self {
        Self {
            config,
            state: StopState::Training,
        }
    }

    pub fn state(&self) -> StopState {
        self.state
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self.state, StopState::Stopped { .. })
    }

    /// Feed one epoch's metrics and return the resulting state
    pub fn observe(&mut self, metrics: &EpochMetrics) -> StopState {
        if self.is_stopped() {
            return self.state;
        }

        match metrics.get(self.config.monitor) {
            None => {
                warn!(
                    "Early stopping requires {} but epoch {} did not report it",
                    self.config.monitor.as_str(),
                    metrics.epoch
                );
            }
            Some(value) if value < self.config.threshold => {
                info!(
                    "Epoch {:05}: early stopping, {} {:.4} below {:.4}",
                    metrics.epoch,
                    self.config.monitor.as_str(),
                    value,
                    self.config.threshold
                );
                self.state = StopState::Stopped {
                    epoch: metrics.epoch,
                };
            }
            Some(_) => {}
        }
        self.state
    }
}

/// Save-best-only checkpointing on a metric where lower is better
#[derive(Debug, Clone)]
pub struct CheckpointPolicy {
    monitor: Metric,
    best: Option<f64>,
}

impl CheckpointPolicy {
    pub fn new(monitor: Metric) -> Self {
        Self {
            monitor,
            best: None,
        }
    }

    pub fn best(&self) -> Option<f64> {
        self.best
    }

    /// True when `value` improves on the best so far; the value is recorded
    pub fn should_save(&mut self, value: f64) -> bool {
        if value.is_nan() {
            return false;
        }
        let improved = self.best.map_or(true, |best| value < best);
        if improved {
            self.best = Some(value);
        }
        improved
    }

    /// Check the monitored metric of an epoch
    pub fn observe(&mut self, metrics: &EpochMetrics) -> bool {
        match metrics.get(self.monitor) {
            Some(value) => self.should_save(value),
            None => false,
        }
    }
}

/// `<out_dir>/<model_name>.h5`
pub fn checkpoint_path(out_dir: &Path, model_name: &str) -> PathBuf {
    out_dir.join(format!("{}.{}", model_name, CHECKPOINT_EXTENSION))
}

/// What the epoch loop should do after an epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EpochDecision {
    pub save_checkpoint: bool,
    pub stop: bool,
}

/// Checkpoint policy plus optional early stopping
#[derive(Debug, Clone)]
pub struct TrainingMonitor {
    checkpoint: CheckpointPolicy,
    early_stopping: Option<EarlyStopping>,
}

impl TrainingMonitor {
    pub fn new(checkpoint_metric: Metric, early_stopping: Option<EarlyStoppingConfig>) -> Self {
        Self {
            checkpoint: CheckpointPolicy::new(checkpoint_metric),
            early_stopping: early_stopping.map(EarlyStopping::new),
        }
    }

    pub fn best(&self) -> Option<f64> {
        self.checkpoint.best()
    }

    pub fn on_epoch_end(&mut self, metrics: &EpochMetrics) -> EpochDecision {
        let save_checkpoint = self.checkpoint.observe(metrics);
        let stop = match self.early_stopping.as_mut() {
            Some(es) => es.observe(metrics) != StopState::Training,
            None => false,
        };
        EpochDecision {
            save_checkpoint,
            stop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(epoch: usize, val: Option<f64>) -> EpochMetrics {
        EpochMetrics {
            epoch,
            train_loss: 0.5,
            val_loss: val,
        }
    }

    #[test]
    fn test_early_stopping_stops_below_threshold() {
        let mut es = EarlyStopping::new(EarlyStoppingConfig::default());
        assert_eq!(es.observe(&metrics(0, Some(0.45))), StopState::Training);
        assert_eq!(es.observe(&metrics(1, Some(0.30))), StopState::Training);
        assert_eq!(
            es.observe(&metrics(2, Some(0.29))),
            StopState::Stopped { epoch: 2 }
        );
        // Stays stopped even if the metric rises again
        assert_eq!(
            es.observe(&metrics(3, Some(0.9))),
            StopState::Stopped { epoch: 2 }
        );
    }

    #[test]
    fn test_early_stopping_missing_metric_keeps_training() {
        let mut es = EarlyStopping::new(EarlyStoppingConfig::default());
        assert_eq!(es.observe(&metrics(0, None)), StopState::Training);
        assert!(!es.is_stopped());
    }

    #[test]
    fn test_checkpoint_saves_on_strict_improvement() {
        let mut policy = CheckpointPolicy::new(Metric::ValLoss);
        assert!(policy.should_save(0.8));
        assert!(!policy.should_save(0.8));
        assert!(policy.should_save(0.5));
        assert!(!policy.should_save(0.6));
        assert!(!policy.should_save(f64::NAN));
        assert_eq!(policy.best(), Some(0.5));
    }

    #[test]
    fn test_checkpoint_path() {
        let path = checkpoint_path(Path::new("/tmp/out"), "model");
        assert_eq!(path, PathBuf::from("/tmp/out/model.h5"));
    }

    #[test]
    fn test_monitor_combines_policies() {
        let mut monitor = TrainingMonitor::new(
            Metric::ValLoss,
            Some(EarlyStoppingConfig {
                monitor: Metric::ValLoss,
                threshold: 0.2,
            }),
        );
        let d = monitor.on_epoch_end(&metrics(0, Some(0.4)));
        assert_eq!(d, EpochDecision { save_checkpoint: true, stop: false });
        let d = monitor.on_epoch_end(&metrics(1, Some(0.5)));
        assert_eq!(d, EpochDecision { save_checkpoint: false, stop: false });
        let d = monitor.on_epoch_end(&metrics(2, Some(0.1)));
        assert_eq!(d, EpochDecision { save_checkpoint: true, stop: true });
        assert_eq!(monitor.best(), Some(0.1));
    }

    #[test]
    fn test_metric_names() {
        assert_eq!(Metric::ValLoss.as_str(), "val_loss");
        let json = serde_json::to_string(&Metric::TrainLoss).unwrap();
        assert_eq!(json, "\"train_loss\"");
    }
}
