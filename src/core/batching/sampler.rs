//! Class-balanced batch sampler.
//!
//! Every batch holds `batch_size / 2` label-0 ids followed by `batch_size / 2`
//! label-1 ids. The per-epoch order lives behind an `Arc` that is swapped
//! whole at the epoch boundary, so concurrent readers see either the old
//! order or the new one.

use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

use crate::core::analysis::EqualizedIndices;
use crate::core::error::{BalanceError, BalanceResult};

/// Index order for one epoch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpochOrder {
    pub epoch: usize,
    pub zeros: Vec<usize>,
    pub ones: Vec<usize>,
}

pub struct BalancedBatchSampler {
    current: RwLock<Arc<EpochOrder>>,
    batch_size: usize,
    shuffle: bool,
}

/// Batch sizes must be even and at least 2
pub fn validate_batch_size(batch_size: usize) -> BalanceResult<()> {
    if batch_size < 2 || batch_size % 2 != 0 {
        return Err(BalanceError::Configuration(format!(
            "batch size must be an even number >= 2, got {}",
            batch_size
        )));
    }
    Ok(())
}

impl BalancedBatchSampler {
    /// Build a sampler over equalized streams. When `shuffle` is set the
    /// streams are shuffled once up front, like every later epoch.
    pub fn new<R: Rng + ?Sized>(
        indices: EqualizedIndices,
        batch_size: usize,
        shuffle: bool,
        rng: &mut R,
    ) -> BalanceResult<Self> {
        validate_batch_size(batch_size)?;
        if indices.zeros.is_empty() {
            return Err(BalanceError::EmptyClass { label: 0 });
        }
        if indices.ones.is_empty() {
            return Err(BalanceError::EmptyClass { label: 1 });
        }
        if indices.zeros.len() != indices.ones.len() {
            return Err(BalanceError::Configuration(format!(
                "class streams differ in length ({} vs {})",
                indices.zeros.len(),
                indices.ones.len()
            )));
        }

        let mut order = EpochOrder {
            epoch: 0,
            zeros: indices.zeros,
            ones: indices.ones,
        };
        if shuffle {
            order.zeros.shuffle(rng);
            order.ones.shuffle(rng);
        }

        let sampler = Self {
            current: RwLock::new(Arc::new(order)),
            batch_size,
            shuffle,
        };
        info!(
            "Batch sampler ready: {} batches of {} per epoch",
            sampler.len(),
            batch_size
        );
        Ok(sampler)
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Samples drawn from each class per batch
    pub fn per_class(&self) -> usize {
        self.batch_size / 2
    }

    /// Length of each equalized stream
    pub fn stream_len(&self) -> usize {
        self.snapshot().zeros.len()
    }

    /// Number of batches per epoch
    pub fn len(&self) -> usize {
        self.stream_len() / self.per_class()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn epoch(&self) -> usize {
        self.snapshot().epoch
    }

    /// The order currently published to readers
    pub fn snapshot(&self) -> Arc<EpochOrder> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&guard)
    }

    /// Sample ids of batch `index`: the label-0 quota then the label-1 quota
    pub fn batch(&self, index: usize) -> BalanceResult<Vec<usize>> {
        let len = self.len();
        if index >= len {
            return Err(BalanceError::BatchOutOfRange { index, len });
        }

        let order = self.snapshot();
        let q = self.per_class();
        let range = index * q..(index + 1) * q;

        let mut ids = Vec::with_capacity(self.batch_size);
        ids.extend_from_slice(&order.zeros[range.clone()]);
        ids.extend_from_slice(&order.ones[range]);
        Ok(ids)
    }

    /// Reshuffle both streams and publish them as the next epoch's order.
    /// The write lock is held from read to swap, so concurrent callers each
    /// advance the epoch exactly once.
    pub fn on_epoch_end<R: Rng + ?Sized>(&self, rng: &mut R) {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        let mut next = EpochOrder {
            epoch: guard.epoch + 1,
            zeros: guard.zeros.clone(),
            ones: guard.ones.clone(),
        };
        if self.shuffle {
            next.zeros.shuffle(rng);
            next.ones.shuffle(rng);
        }

        *guard = Arc::new(next);
        debug!("Published batch order for epoch {}", guard.epoch);
    }
}
