//! Validation withdrawal.
//!
//! The input pool is never mutated. Withdrawn positions are returned as an
//! exclusion set next to the validation and training collections, so the two
//! collections are disjoint by construction.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use crate::core::dataset::{Sample, SamplePool};
use crate::core::error::{validate_fraction, BalanceError, BalanceResult};

/// Strategy for selecting which samples go to validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SplitStrategy {
    /// Equal draws from label 0 and label 1, bounded by the scarcer class
    #[default]
    Balanced,
    /// Plain random draws ignoring labels (multi-class data)
    Uniform,
}

impl SplitStrategy {
    pub fn as_str(&self) -> &str {
        match self {
            SplitStrategy::Balanced => "balanced",
            SplitStrategy::Uniform => "uniform",
        }
    }

    pub fn all() -> Vec<SplitStrategy> {
        vec![SplitStrategy::Balanced, SplitStrategy::Uniform]
    }
}

/// Outcome of a validation withdrawal
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationSplit {
    /// Withdrawn samples, in draw order
    pub validation: Vec<Sample>,
    /// Remaining samples, in pool order
    pub training: Vec<Sample>,
    /// Pool positions that went to validation
    pub withdrawn: BTreeSet<usize>,
}

impl ValidationSplit {
    fn from_draws(pool: &SamplePool, draws: Vec<usize>) -> Self {
        let withdrawn: BTreeSet<usize> = draws.iter().copied().collect();
        let validation = draws
            .iter()
            .filter_map(|&i| pool.get(i).cloned())
            .collect();
        let training = pool
            .samples()
            .iter()
            .enumerate()
            .filter(|(i, _)| !withdrawn.contains(i))
            .map(|(_, s)| s.clone())
            .collect();
        Self {
            validation,
            training,
            withdrawn,
        }
    }

    pub fn validation_len(&self) -> usize {
        self.validation.len()
    }

    pub fn training_len(&self) -> usize {
        self.training.len()
    }
}

/// Number of validation samples drawn from each class:
/// `floor(fraction * min(n0, n1))`
pub fn target_per_class(zeros: usize, ones: usize, fraction: f64) -> usize {
    // Both classes are clamped to the smaller per-class target
    let from_zeros = (zeros as f64 * fraction).floor() as usize;
    let from_ones = (ones as f64 * fraction).floor() as usize;
    from_zeros.min(from_ones)
}

/// Withdraw a class-balanced validation set.
///
/// Draws `target_per_class` samples uniformly without replacement from each
/// class. Fails with `InsufficientData` before drawing anything if either
/// class is empty. A target of zero is valid and yields an empty validation set.
pub fn split<R: Rng + ?Sized>(
    pool: &SamplePool,
    fraction: f64,
    rng: &mut R,
) -> BalanceResult<ValidationSplit> {
    validate_fraction(fraction)?;

    let mut zeros = Vec::new();
    let mut ones = Vec::new();
    for (index, sample) in pool.samples().iter().enumerate() {
        match sample.label {
            0 => zeros.push(index),
            1 => ones.push(index),
            label => return Err(BalanceError::UnexpectedLabel { index, label }),
        }
    }

    if zeros.is_empty() {
        return Err(BalanceError::InsufficientData { label: 0 });
    }
    if ones.is_empty() {
        return Err(BalanceError::InsufficientData { label: 1 });
    }

    let target = target_per_class(zeros.len(), ones.len(), fraction);
    info!(
        "Class sizes: {} label 0, {} label 1; drawing {} per class for validation",
        zeros.len(),
        ones.len(),
        target
    );
    if target == 0 {
        warn!(
            "Fraction {} leaves no validation samples for the smaller class ({} samples)",
            fraction,
            zeros.len().min(ones.len())
        );
    }

    let mut draws = Vec::with_capacity(target * 2);
    for (label, members) in [(1u32, &mut ones), (0u32, &mut zeros)] {
        for _ in 0..target {
            let k = rng.gen_range(0..members.len());
            let index = members.swap_remove(k);
            debug!("Validation draw: pool index {} (label {})", index, label);
            draws.push(index);
        }
    }

    let result = ValidationSplit::from_draws(pool, draws);
    info!(
        "Validation set: {} samples; training pool: {} samples",
        result.validation_len(),
        result.training_len()
    );
    Ok(result)
}

/// Withdraw `round(fraction * len)` samples uniformly at random, ignoring labels
pub fn split_uniform<R: Rng + ?Sized>(
    pool: &SamplePool,
    fraction: f64,
    rng: &mut R,
) -> BalanceResult<ValidationSplit> {
    validate_fraction(fraction)?;
    if pool.is_empty() {
        return Err(BalanceError::InsufficientData { label: 0 });
    }

    let size = ((pool.len() as f64 * fraction).round() as usize).min(pool.len());
    info!("Drawing {} of {} samples for validation", size, pool.len());
    if size == 0 {
        warn!("Fraction {} leaves no validation samples", fraction);
    }

    let mut remaining: Vec<usize> = (0..pool.len()).collect();
    let mut draws = Vec::with_capacity(size);
    for _ in 0..size {
        let k = rng.gen_range(0..remaining.len());
        draws.push(remaining.swap_remove(k));
    }

    Ok(ValidationSplit::from_draws(pool, draws))
}

/// Dispatch on the configured strategy
pub fn split_with_strategy<R: Rng + ?Sized>(
    pool: &SamplePool,
    fraction: f64,
    strategy: SplitStrategy,
    rng: &mut R,
) -> BalanceResult<ValidationSplit> {
    info!("Splitting with strategy: {}", strategy.as_str());
    match strategy {
        SplitStrategy::Balanced => split(pool, fraction, rng),
        SplitStrategy::Uniform => split_uniform(pool, fraction, rng),
    }
}
