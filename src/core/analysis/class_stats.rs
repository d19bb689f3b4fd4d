use serde::{Deserialize, Serialize};

use crate::core::dataset::Sample;

/// Per-class counts over a sample collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassStats {
    pub total: usize,
    pub zeros: usize,
    pub ones: usize,
    /// Samples whose label is neither 0 nor 1
    pub other: usize,
}

impl ClassStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_samples(samples: &[Sample]) -> Self {
        let mut stats = Self::new();
        for sample in samples {
            stats.total += 1;
            match sample.label {
                0 => stats.zeros += 1,
                1 => stats.ones += 1,
                _ => stats.other += 1,
            }
        }
        stats
    }

    /// Get count for a binary label; anything else counts as "other"
    pub fn get_count(&self, label: u32) -> usize {
        match label {
            0 => self.zeros,
            1 => self.ones,
            _ => self.other,
        }
    }

    /// Get percentage for a binary label
    pub fn get_percentage(&self, label: u32) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        (self.get_count(label) as f32 / self.total as f32) * 100.0
    }

    /// Size of the scarcer binary class
    pub fn minority_count(&self) -> usize {
        self.zeros.min(self.ones)
    }

    /// Size of the larger binary class
    pub fn majority_count(&self) -> usize {
        self.zeros.max(self.ones)
    }

    pub fn is_balanced(&self) -> bool {
        self.zeros == self.ones
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_percentages() {
        let mut samples: Vec<Sample> = (0..75).map(|i| Sample::new(format!("z{}", i), 0)).collect();
        samples.extend((0..25).map(|i| Sample::new(format!("o{}", i), 1)));
        let stats = ClassStats::from_samples(&samples);
        assert_eq!(stats.total, 100);
        assert_eq!(stats.get_count(0), 75);
        assert_eq!(stats.get_count(1), 25);
        assert_eq!(stats.get_percentage(1), 25.0);
        assert_eq!(stats.minority_count(), 25);
        assert_eq!(stats.majority_count(), 75);
        assert!(!stats.is_balanced());
    }

    #[test]
    fn test_empty_stats() {
        let stats = ClassStats::from_samples(&[]);
        assert_eq!(stats.get_percentage(0), 0.0);
        assert!(stats.is_balanced());
    }

    #[test]
    fn test_other_labels_counted_separately() {
        let samples = vec![Sample::new("a", 3), Sample::new("b", 0)];
        let stats = ClassStats::from_samples(&samples);
        assert_eq!(stats.other, 1);
        assert_eq!(stats.get_count(7), 1);
    }
}
