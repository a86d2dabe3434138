use svrlab_core::{Matrix, Result, SvrError};

/// Whether a fitted `std` is rounding noise around `mean` rather than spread.
pub fn is_zero_scale(std: f64, mean: f64) -> bool {
    std <= 10.0 * f64::EPSILON * mean.abs().max(1.0)
}

/// Standardize features by removing the mean and scaling to unit variance.
///
/// Statistics come from the training partition only. A column whose standard
/// deviation is zero relative to its mean (see [`is_zero_scale`]) is divided
/// by 1.0 instead, so its centered values pass through unscaled.
#[derive(Debug, Clone, Default)]
pub struct StandardScaler {
    pub mean: Option<Vec<f64>>,
    pub std: Option<Vec<f64>>,
}

impl StandardScaler {
    pub fn new() -> Self {
        StandardScaler {
            mean: None,
            std: None,
        }
    }

    /// Compute mean and std from training data ([samples, features]).
    pub fn fit(&mut self, x: &Matrix) -> Result<()> {
        if x.rows() == 0 {
            return Err(SvrError::ShapeMismatch {
                expected: (1, x.cols()),
                got: 0,
            });
        }
        self.mean = Some(x.mean_axis0());
        self.std = Some(x.std_axis0());
        Ok(())
    }

    /// Transform data using fitted mean and std.
    pub fn transform(&self, x: &Matrix) -> Result<Matrix> {
        let (Some(mean), Some(std)) = (self.mean.as_ref(), self.std.as_ref()) else {
            return Err(SvrError::InvalidRequest {
                reason: "StandardScaler::fit() must be called before transform()".into(),
            });
        };
        if x.cols() != mean.len() {
            return Err(SvrError::ShapeMismatch {
                expected: (x.rows(), mean.len()),
                got: x.cols(),
            });
        }

        let std_safe: Vec<f64> = std
            .iter()
            .zip(mean)
            .map(|(&s, &m)| if is_zero_scale(s, m) { 1.0 } else { s })
            .collect();
        Ok(x.map_indexed(|j, v| (v - mean[j]) / std_safe[j]))
    }

    /// Fit and transform in one step.
    pub fn fit_transform(&mut self, x: &Matrix) -> Result<Matrix> {
        self.fit(x)?;
        self.transform(x)
    }

    /// Indices of columns that had zero variance when fitted.
    pub fn constant_columns(&self) -> Vec<usize> {
        let (Some(mean), Some(std)) = (self.mean.as_ref(), self.std.as_ref()) else {
            return Vec::new();
        };
        std.iter()
            .zip(mean)
            .enumerate()
            .filter(|(_, (&s, &m))| is_zero_scale(s, m))
            .map(|(j, _)| j)
            .collect()
    }
}
