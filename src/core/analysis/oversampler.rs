use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::dataset::ClassPools;
use crate::core::error::{BalanceError, BalanceResult};

/// Per-class index streams of equal length
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EqualizedIndices {
    pub zeros: Vec<usize>,
    pub ones: Vec<usize>,
}

impl EqualizedIndices {
    /// Shared length of both streams
    pub fn len(&self) -> usize {
        self.zeros.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zeros.is_empty()
    }
}

/// Repeat `items` from the start until it holds exactly `len` elements
pub fn cycle_to_length<T: Clone>(items: &[T], len: usize) -> Vec<T> {
    items.iter().cycle().take(len).cloned().collect()
}

/// Bring both lists to `max(a.len(), b.len())` by cyclic repetition.
///
/// The longer list comes back unchanged. The shorter one is whole copies of
/// itself followed by a prefix of itself. Fails with `EmptyClass` when either
/// list is empty; `a` is reported as class 0 and `b` as class 1.
pub fn equalize<T: Clone>(a: &[T], b: &[T]) -> BalanceResult<(Vec<T>, Vec<T>)> {
    if a.is_empty() {
        return Err(BalanceError::EmptyClass { label: 0 });
    }
    if b.is_empty() {
        return Err(BalanceError::EmptyClass { label: 1 });
    }

    let target = a.len().max(b.len());
    debug!(
        "Equalizing streams of {} and {} to {}",
        a.len(),
        b.len(),
        target
    );
    Ok((cycle_to_length(a, target), cycle_to_length(b, target)))
}

/// Equalize the label-0 and label-1 pools of a training collection
pub fn equalize_pools(pools: &ClassPools) -> BalanceResult<EqualizedIndices> {
    let (zeros, ones) = equalize(&pools.zeros, &pools.ones)?;
    info!(
        "Oversampled class pools ({} label 0, {} label 1) to {} each",
        pools.zeros.len(),
        pools.ones.len(),
        zeros.len()
    );
    Ok(EqualizedIndices { zeros, ones })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equalize_wraps_from_start() {
        let (a, b) = equalize(&[1, 2, 3], &[10, 20]).unwrap();
        assert_eq!(a, vec![1, 2, 3]);
        assert_eq!(b, vec![10, 20, 10]);
    }

    #[test]
    fn test_equalize_many_whole_copies() {
        let (a, b) = equalize(&[7], &[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(a, vec![7; 8]);
        assert_eq!(b.len(), 8);

        let (a, _) = equalize(&[1, 2, 3], &[0; 11]).unwrap();
        assert_eq!(a, vec![1, 2, 3, 1, 2, 3, 1, 2, 3, 1, 2]);
    }

    #[test]
    fn test_equalize_equal_lengths_unchanged() {
        let (a, b) = equalize(&[4, 5], &[6, 7]).unwrap();
        assert_eq!(a, vec![4, 5]);
        assert_eq!(b, vec![6, 7]);
    }

    #[test]
    fn test_equalize_empty_fails() {
        let empty: [usize; 0] = [];
        assert!(matches!(
            equalize(&empty, &[1, 2]),
            Err(BalanceError::EmptyClass { label: 0 })
        ));
        assert!(matches!(
            equalize(&[1, 2], &empty),
            Err(BalanceError::EmptyClass { label: 1 })
        ));
    }

    #[test]
    fn test_equalize_is_pure() {
        let a = vec![3, 1, 4, 1, 5];
        let b = vec![9, 2];
        assert_eq!(equalize(&a, &b).unwrap(), equalize(&a, &b).unwrap());
    }

    #[test]
    fn test_equalize_lengths_and_contents() {
        for (n, m) in [(1, 1), (2, 9), (13, 5), (40, 100)] {
            let a: Vec<usize> = (0..n).collect();
            let b: Vec<usize> = (1000..1000 + m).collect();
            let (ea, eb) = equalize(&a, &b).unwrap();
            assert_eq!(ea.len(), n.max(m));
            assert_eq!(eb.len(), n.max(m));
            assert!(ea.iter().all(|x| a.contains(x)));
            assert!(eb.iter().all(|x| b.contains(x)));
        }
    }

    #[test]
    fn test_equalize_pools() {
        let pools = ClassPools {
            zeros: vec![0, 1, 2, 3, 4],
            ones: vec![5, 6],
        };
        let eq = equalize_pools(&pools).unwrap();
        assert_eq!(eq.len(), 5);
        assert_eq!(eq.ones, vec![5, 6, 5, 6, 5]);
    }
}
