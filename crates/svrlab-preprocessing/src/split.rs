use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use svrlab_core::{Matrix, Result, SvrError};

/// Training and held-out partitions of a feature matrix and target vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
    pub x_train: Matrix,
    pub x_test: Matrix,
    pub y_train: Vec<f64>,
    pub y_test: Vec<f64>,
}

impl Split {
    pub fn n_train(&self) -> usize {
        self.train_indices.len()
    }

    pub fn n_test(&self) -> usize {
        self.test_indices.len()
    }
}

/// Number of held-out rows for `n` samples: `round(n * test_size)`.
pub fn test_count(n: usize, test_size: f64) -> usize {
    (n as f64 * test_size).round() as usize
}

/// Shuffle row indices with a seeded RNG, then cut off the last
/// `round(n * test_size)` rows as the test set.
///
/// The same seed and row count always give the same partition.
pub fn partition_indices(n: usize, test_size: f64, seed: u64) -> Result<(Vec<usize>, Vec<usize>)> {
    let invalid = || SvrError::InvalidSplit {
        n_samples: n,
        test_size,
    };
    if !test_size.is_finite() || test_size <= 0.0 || test_size >= 1.0 {
        return Err(invalid());
    }
    let test_size_rows = test_count(n, test_size);
    if test_size_rows == 0 || test_size_rows >= n {
        return Err(invalid());
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test = indices.split_off(n - test_size_rows);
    Ok((indices, test))
}

/// Split data into training and test sets.
pub fn train_test_split(x: &Matrix, y: &[f64], test_size: f64, seed: u64) -> Result<Split> {
    let n = x.rows();
    if n != y.len() {
        return Err(SvrError::ShapeMismatch {
            expected: (n, 1),
            got: y.len(),
        });
    }

    let (train_indices, test_indices) = partition_indices(n, test_size, seed)?;

    Ok(Split {
        x_train: x.select_rows(&train_indices),
        x_test: x.select_rows(&test_indices),
        y_train: train_indices.iter().map(|&i| y[i]).collect(),
        y_test: test_indices.iter().map(|&i| y[i]).collect(),
        train_indices,
        test_indices,
    })
}
