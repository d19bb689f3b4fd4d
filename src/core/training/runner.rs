use rand::Rng;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, info_span, warn};

use super::monitor::{EpochMetrics, TrainingMonitor};
use crate::core::batching::{BalancedBatchSampler, Batch, BatchAssembler};
use crate::core::error::BalanceResult;
use crate::core::image::ImageSource;

/// The model side of a training run, owned by an external framework
pub trait ModelRunner {
    /// One optimizer step; returns the batch loss
    fn train_batch(&mut self, batch: &Batch) -> BalanceResult<f64>;

    /// Loss over the held-out validation batch
    fn validate(&mut self, batch: &Batch) -> BalanceResult<f64>;

    fn save_checkpoint(&mut self, path: &Path) -> BalanceResult<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingOptions {
    pub epochs: usize,
    pub checkpoint_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSummary {
    pub epochs_run: usize,
    pub best_val_loss: Option<f64>,
    pub stopped_early: bool,
    pub checkpoints_written: usize,
    pub history: Vec<EpochMetrics>,
}

/// Run up to `options.epochs` epochs of class-balanced batches.
///
/// After each epoch the monitor decides whether to checkpoint and whether to
/// stop; otherwise the sampler reshuffles for the next epoch. If the monitor
/// never asked for a checkpoint (no validation data) the final model is saved.
pub fn run_training<M, S, R>(
    runner: &mut M,
    sampler: &BalancedBatchSampler,
    assembler: &BatchAssembler<S>,
    validation: Option<&Batch>,
    monitor: &mut TrainingMonitor,
    options: &TrainingOptions,
    rng: &mut R,
) -> BalanceResult<TrainingSummary>
where
    M: ModelRunner,
    S: ImageSource,
    R: Rng + ?Sized,
{
    let start = Instant::now();
    let validation = validation.filter(|v| !v.is_empty());
    if validation.is_none() {
        warn!("Training without validation data");
    }

    let mut summary = TrainingSummary {
        epochs_run: 0,
        best_val_loss: None,
        stopped_early: false,
        checkpoints_written: 0,
        history: Vec::new(),
    };

    for epoch in 0..options.epochs {
        let _span = info_span!("epoch", epoch).entered();

        let steps = sampler.len();
        let mut loss_sum = 0.0;
        for step in 0..steps {
            let ids = sampler.batch(step)?;
            let batch = assembler.assemble(&ids)?;
            loss_sum += runner.train_batch(&batch)?;
        }
        let train_loss = if steps > 0 {
            loss_sum / steps as f64
        } else {
            0.0
        };

        let val_loss = validation.map(|v| runner.validate(v)).transpose()?;
        let metrics = EpochMetrics {
            epoch,
            train_loss,
            val_loss,
        };
        info!(
            "Epoch {}/{}: loss {:.4}, val_loss {}",
            epoch + 1,
            options.epochs,
            train_loss,
            val_loss.map_or("n/a".to_string(), |v| format!("{:.4}", v))
        );

        let decision = monitor.on_epoch_end(&metrics);
        summary.history.push(metrics);
        summary.epochs_run += 1;

        if decision.save_checkpoint {
            info!("Saving checkpoint to {:?}", options.checkpoint_path);
            runner.save_checkpoint(&options.checkpoint_path)?;
            summary.checkpoints_written += 1;
        }
        if decision.stop {
            summary.stopped_early = true;
            break;
        }

        sampler.on_epoch_end(rng);
    }

    if summary.checkpoints_written == 0 && summary.epochs_run > 0 {
        info!("Saving final model to {:?}", options.checkpoint_path);
        runner.save_checkpoint(&options.checkpoint_path)?;
        summary.checkpoints_written += 1;
    }

    summary.best_val_loss = summary
        .history
        .iter()
        .filter_map(|m| m.val_loss)
        .fold(None, |best: Option<f64>, v| Some(best.map_or(v, |b| b.min(v))));
    info!(
        "Training finished after {} epochs in {:.3} seconds",
        summary.epochs_run,
        start.elapsed().as_secs_f64()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analysis::EqualizedIndices;
    use crate::core::dataset::Sample;
    use crate::core::error::BalanceError;
    use crate::core::training::monitor::{EarlyStoppingConfig, Metric};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct FlatSource;

    impl ImageSource for FlatSource {
        fn dim(&self) -> usize {
            2
        }

        fn load(&self, _reference: &str) -> BalanceResult<Vec<f32>> {
            Ok(vec![1.0, 2.0, 3.0, 4.0])
        }
    }

    /// Replays a fixed validation loss per epoch and counts calls
    struct ScriptedRunner {
        val_losses: Vec<f64>,
        epoch: usize,
        batches_seen: usize,
        saved: Vec<PathBuf>,
        batch_labels: Vec<Vec<u32>>,
    }

    impl ScriptedRunner {
        fn new(val_losses: Vec<f64>) -> Self {
            Self {
                val_losses,
                epoch: 0,
                batches_seen: 0,
                saved: Vec::new(),
                batch_labels: Vec::new(),
            }
        }
    }

    impl ModelRunner for ScriptedRunner {
        fn train_batch(&mut self, batch: &Batch) -> BalanceResult<f64> {
            self.batches_seen += 1;
            self.batch_labels.push(batch.labels.clone());
            Ok(1.0)
        }

        fn validate(&mut self, _batch: &Batch) -> BalanceResult<f64> {
            let loss = self.val_losses.get(self.epoch).copied().ok_or_else(|| {
                BalanceError::Configuration("script exhausted".to_string())
            })?;
            self.epoch += 1;
            Ok(loss)
        }

        fn save_checkpoint(&mut self, path: &Path) -> BalanceResult<()> {
            self.saved.push(path.to_path_buf());
            Ok(())
        }
    }

    fn fixture(rng: &mut StdRng) -> (BalancedBatchSampler, BatchAssembler<FlatSource>, Batch) {
        let samples: Vec<Sample> = (0..6)
            .map(|i| Sample::new(format!("p{}", i), if i < 4 { 0 } else { 1 }))
            .collect();
        let indices = EqualizedIndices {
            zeros: vec![0, 1, 2, 3],
            ones: vec![4, 5, 4, 5],
        };
        let sampler = BalancedBatchSampler::new(indices, 4, true, rng).unwrap();
        let assembler = BatchAssembler::new(FlatSource, samples);
        let validation = assembler
            .assemble_samples(&[Sample::new("v0", 0), Sample::new("v1", 1)])
            .unwrap();
        (sampler, assembler, validation)
    }

    fn options() -> TrainingOptions {
        TrainingOptions {
            epochs: 5,
            checkpoint_path: PathBuf::from("out/model.h5"),
        }
    }

    #[test]
    fn test_runs_all_epochs_and_saves_best() {
        let mut rng = StdRng::seed_from_u64(2);
        let (sampler, assembler, validation) = fixture(&mut rng);
        let mut runner = ScriptedRunner::new(vec![0.9, 0.7, 0.8, 0.6, 0.65]);
        let mut monitor = TrainingMonitor::new(Metric::ValLoss, None);

        let summary = run_training(
            &mut runner,
            &sampler,
            &assembler,
            Some(&validation),
            &mut monitor,
            &options(),
            &mut rng,
        )
        .unwrap();

        assert_eq!(summary.epochs_run, 5);
        assert!(!summary.stopped_early);
        assert_eq!(summary.checkpoints_written, 3);
        assert_eq!(summary.best_val_loss, Some(0.6));
        assert_eq!(runner.batches_seen, 10);
        for labels in &runner.batch_labels {
            assert_eq!(labels, &vec![0, 0, 1, 1]);
        }
        assert_eq!(sampler.epoch(), 5);
    }

    #[test]
    fn test_stops_early_below_threshold() {
        let mut rng = StdRng::seed_from_u64(2);
        let (sampler, assembler, validation) = fixture(&mut rng);
        let mut runner = ScriptedRunner::new(vec![0.5, 0.25, 0.1]);
        let mut monitor = TrainingMonitor::new(
            Metric::ValLoss,
            Some(EarlyStoppingConfig {
                monitor: Metric::ValLoss,
                threshold: 0.3,
            }),
        );

        let summary = run_training(
            &mut runner,
            &sampler,
            &assembler,
            Some(&validation),
            &mut monitor,
            &options(),
            &mut rng,
        )
        .unwrap();

        assert_eq!(summary.epochs_run, 2);
        assert!(summary.stopped_early);
        assert_eq!(summary.history.len(), 2);
    }

    #[test]
    fn test_without_validation_saves_final_model() {
        let mut rng = StdRng::seed_from_u64(2);
        let (sampler, assembler, _) = fixture(&mut rng);
        let mut runner = ScriptedRunner::new(vec![]);
        let mut monitor = TrainingMonitor::new(Metric::ValLoss, None);
        let opts = TrainingOptions {
            epochs: 2,
            checkpoint_path: PathBuf::from("out/final.h5"),
        };

        let summary = run_training(
            &mut runner,
            &sampler,
            &assembler,
            None,
            &mut monitor,
            &opts,
            &mut rng,
        )
        .unwrap();

        assert_eq!(summary.epochs_run, 2);
        assert_eq!(summary.checkpoints_written, 1);
        assert_eq!(summary.best_val_loss, None);
        assert_eq!(runner.saved, vec![PathBuf::from("out/final.h5")]);
    }
}
