//! Seeded Train/Test Split

use crate::FitError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Row indices of the two partitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Partition sizes for `rows` samples: `(train, test)`, test rounded up
pub fn split_sizes(rows: usize, test_size: f64) -> (usize, usize) {
    let test = ((test_size * rows as f64).ceil() as usize).min(rows);
    (rows - test, test)
}

/// Shuffle `0..rows` with a seeded RNG, take the test partition from the
/// front and the training partition from the rest.
///
/// The same `(rows, test_size, seed)` always yields the same split.
pub fn train_test_split(rows: usize, test_size: f64, seed: u64) -> Result<Split, FitError> {
    let (n_train, n_test) = split_sizes(rows, test_size);
    if n_train == 0 || n_test == 0 {
        return Err(FitError::EmptySplit { rows, test_size });
    }

    let mut indices: Vec<usize> = (0..rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok(Split { train, test: indices })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sizes() {
        assert_eq!(split_sizes(3, 0.33), (2, 1));
        assert_eq!(split_sizes(10, 0.33), (6, 4));
        assert_eq!(split_sizes(1, 0.33), (0, 1));
    }

    #[test]
    fn test_too_small() {
        assert!(matches!(train_test_split(1, 0.33, 42), Err(FitError::EmptySplit { .. })));
        assert!(matches!(train_test_split(0, 0.33, 42), Err(FitError::EmptySplit { .. })));
    }

    #[test]
    fn test_reproducible() {
        assert_eq!(train_test_split(50, 0.33, 42).unwrap(), train_test_split(50, 0.33, 42).unwrap());
    }

    proptest! {
        #[test]
        fn prop_split_is_partition(rows in 2usize..300, seed in any::<u64>()) {
            let split = train_test_split(rows, 0.33, seed).unwrap();
            let mut all: Vec<usize> = split.train.iter().chain(split.test.iter()).copied().collect();
            all.sort_unstable();
            prop_assert_eq!(all, (0..rows).collect::<Vec<_>>());
            prop_assert_eq!(split.train.len(), split_sizes(rows, 0.33).0);
        }
    }
}
