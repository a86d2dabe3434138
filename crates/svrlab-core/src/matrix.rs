use crate::error::{Result, SvrError};

/// Dense 2-D matrix of `f64`: the numeric workhorse of the pipeline.
///
/// Stores data in a flat contiguous `Vec<f64>` with row-major (C-order) layout,
/// one row per sample and one column per feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

// ─── Construction ───────────────────────────────────────────────────────────

impl Matrix {
    /// Create a matrix from raw row-major data.
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(SvrError::ShapeMismatch {
                expected: (rows, cols),
                got: data.len(),
            });
        }
        Ok(Matrix { data, rows, cols })
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Create a matrix from nested rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        if rows.is_empty() {
            return Ok(Matrix::zeros(0, 0));
        }
        let cols = rows[0].len();
        if let Some(bad) = rows.iter().find(|r| r.len() != cols) {
            return Err(SvrError::ShapeMismatch {
                expected: (rows.len(), cols),
                got: bad.len(),
            });
        }
        let flat: Vec<f64> = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Matrix::new(flat, rows.len(), cols)
    }

    /// Create a matrix from feature columns of equal length.
    pub fn from_columns(columns: &[Vec<f64>]) -> Result<Self> {
        let cols = columns.len();
        let rows = columns.first().map_or(0, Vec::len);
        let mut data = vec![0.0; rows * cols];
        for (j, column) in columns.iter().enumerate() {
            if column.len() != rows {
                return Err(SvrError::ShapeMismatch {
                    expected: (rows, cols),
                    got: column.len(),
                });
            }
            for (i, &v) in column.iter().enumerate() {
                data[i * cols + j] = v;
            }
        }
        Ok(Matrix { data, rows, cols })
    }
}

// ─── Access ─────────────────────────────────────────────────────────────────

impl Matrix {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.cols + j]
    }

    /// Borrow row `i` as a slice.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn row_iter(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact(0) panics, and a zero-column matrix has no data anyway
        self.data.chunks_exact(self.cols.max(1)).take(self.rows)
    }

    pub fn col(&self, j: usize) -> Vec<f64> {
        (0..self.rows).map(|i| self.get(i, j)).collect()
    }

    /// Gather the given rows, in order, into a new matrix.
    pub fn select_rows(&self, indices: &[usize]) -> Matrix {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &i in indices {
            data.extend_from_slice(self.row(i));
        }
        Matrix {
            data,
            rows: indices.len(),
            cols: self.cols,
        }
    }

    /// Apply `f(column, value)` to every element.
    pub fn map_indexed(&self, f: impl Fn(usize, f64) -> f64) -> Matrix {
        let cols = self.cols;
        let data = self
            .data
            .iter()
            .enumerate()
            .map(|(k, &v)| f(k % cols, v))
            .collect();
        Matrix {
            data,
            rows: self.rows,
            cols,
        }
    }
}

// ─── Reductions ─────────────────────────────────────────────────────────────

impl Matrix {
    /// Per-column mean.
    ///
    /// Sums deviations from the first row, so a constant column yields its
    /// value exactly.
    pub fn mean_axis0(&self) -> Vec<f64> {
        if self.rows == 0 {
            return vec![0.0; self.cols];
        }
        let shift = self.row(0);
        let mut sums = vec![0.0; self.cols];
        for row in self.row_iter() {
            for ((s, &v), &c) in sums.iter_mut().zip(row).zip(shift) {
                *s += v - c;
            }
        }
        let n = self.rows as f64;
        sums.into_iter().zip(shift).map(|(s, &c)| c + s / n).collect()
    }

    /// Per-column population standard deviation (ddof = 0).
    pub fn std_axis0(&self) -> Vec<f64> {
        let means = self.mean_axis0();
        let mut sq = vec![0.0; self.cols];
        for row in self.row_iter() {
            for ((s, &v), &m) in sq.iter_mut().zip(row).zip(&means) {
                *s += (v - m) * (v - m);
            }
        }
        let n = self.rows.max(1) as f64;
        sq.into_iter().map(|s| (s / n).sqrt()).collect()
    }

    /// Population variance over every element.
    pub fn variance(&self) -> f64 {
        if self.data.is_empty() {
            return 0.0;
        }
        let n = self.data.len() as f64;
        let mean = self.data.iter().sum::<f64>() / n;
        self.data.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_new_rejects_bad_length() {
        let err = Matrix::new(vec![1.0, 2.0, 3.0], 2, 2).unwrap_err();
        assert!(matches!(err, SvrError::ShapeMismatch { expected: (2, 2), got: 3 }));
    }

    #[test]
    fn test_from_columns_is_row_major() {
        let m = Matrix::from_columns(&[vec![1.0, 2.0, 3.0], vec![10.0, 20.0, 30.0]]).unwrap();
        assert_eq!(m.shape(), (3, 2));
        assert_eq!(m.row(1), &[2.0, 20.0]);
        assert_eq!(m.col(1), vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_select_rows() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        let s = m.select_rows(&[2, 0]);
        assert_eq!(s.data(), &[5.0, 6.0, 1.0, 2.0]);
    }

    #[test]
    fn test_reductions() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 2.0], vec![5.0, 2.0]]).unwrap();
        assert_eq!(m.mean_axis0(), vec![3.0, 2.0]);
        let std = m.std_axis0();
        assert_relative_eq!(std[0], (8.0f64 / 3.0).sqrt(), epsilon = 1e-12);
        assert_eq!(std[1], 0.0);
        // elements 1,2,3,2,5,2 -> mean 2.5
        assert_relative_eq!(m.variance(), 9.5 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_column_statistics_are_exact() {
        let rows: Vec<Vec<f64>> = (0..10).map(|_| vec![1.1, 98765.4321]).collect();
        let m = Matrix::from_rows(&rows).unwrap();
        assert_eq!(m.mean_axis0(), vec![1.1, 98765.4321]);
        assert_eq!(m.std_axis0(), vec![0.0, 0.0]);
    }
}
