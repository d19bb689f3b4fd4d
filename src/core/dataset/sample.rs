use serde::{Deserialize, Serialize};

use crate::core::error::{BalanceError, BalanceResult};

/// A single particle image reference paired with its class label
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sample {
    pub image: String,
    pub label: u32,
}

impl Sample {
    pub fn new(image: impl Into<String>, label: u32) -> Self {
        Self {
            image: image.into(),
            label,
        }
    }
}

/// Immutable collection of samples. Positions in the pool identify samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SamplePool {
    samples: Vec<Sample>,
}

impl SamplePool {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// Pair image references with labels. Both sequences must have the same length.
    pub fn from_parts(images: Vec<String>, labels: Vec<u32>) -> BalanceResult<Self> {
        if images.len() != labels.len() {
            return Err(BalanceError::Configuration(format!(
                "metadata lists {} images but label file has {} labels",
                images.len(),
                labels.len()
            )));
        }
        let samples = images
            .into_iter()
            .zip(labels)
            .map(|(image, label)| Sample { image, label })
            .collect();
        Ok(Self { samples })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Indices of every sample carrying `label`, in pool order
    pub fn indices_with_label(&self, label: u32) -> Vec<usize> {
        self.samples
            .iter()
            .enumerate()
            .filter(|(_, s)| s.label == label)
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of samples carrying `label`
    pub fn count_label(&self, label: u32) -> usize {
        self.samples.iter().filter(|s| s.label == label).count()
    }
}

impl From<Vec<Sample>> for SamplePool {
    fn from(samples: Vec<Sample>) -> Self {
        Self::new(samples)
    }
}

/// Label-0 and label-1 index lists over a sample collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassPools {
    pub zeros: Vec<usize>,
    pub ones: Vec<usize>,
}

impl ClassPools {
    /// Partition sample positions by binary label.
    /// Any label other than 0 or 1 is rejected.
    pub fn from_samples(samples: &[Sample]) -> BalanceResult<Self> {
        let mut zeros = Vec::new();
        let mut ones = Vec::new();
        for (index, sample) in samples.iter().enumerate() {
            match sample.label {
                0 => zeros.push(index),
                1 => ones.push(index),
                label => return Err(BalanceError::UnexpectedLabel { index, label }),
            }
        }
        Ok(Self { zeros, ones })
    }

    pub fn total(&self) -> usize {
        self.zeros.len() + self.ones.len()
    }
}
