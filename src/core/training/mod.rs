mod monitor;
mod runner;

pub use monitor::{
    checkpoint_path, CheckpointPolicy, EarlyStopping, EarlyStoppingConfig, EpochDecision,
    EpochMetrics, Metric, StopState, TrainingMonitor, CHECKPOINT_EXTENSION,
};
pub use runner::{run_training, ModelRunner, TrainingOptions, TrainingSummary};
