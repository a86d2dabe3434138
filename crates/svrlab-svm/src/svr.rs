use svrlab_core::{Matrix, TrainingError};

use crate::kernel::Kernel;
use crate::params::SVRParams;
use crate::smo::{self, SolverSettings};

/// Epsilon-insensitive Support Vector Regression.
///
/// Minimizes `0.5 * ||w||^2 + C * sum(max(0, |y - f(x)| - epsilon))` in the
/// kernel-induced feature space by solving the dual with SMO.
#[derive(Debug, Clone, Default)]
pub struct SVR {
    pub params: SVRParams,
}

impl SVR {
    pub fn new(params: SVRParams) -> Self {
        SVR { params }
    }

    pub fn fit(&self, x: &Matrix, y: &[f64]) -> Result<SVRModel, TrainingError> {
        self.params.validate()?;
        if x.rows() == 0 || x.cols() == 0 {
            return Err(TrainingError::EmptyTrainingSet);
        }
        if y.len() != x.rows() {
            return Err(TrainingError::LengthMismatch {
                expected: x.rows(),
                got: y.len(),
            });
        }
        if x.data().iter().any(|v| !v.is_finite()) {
            return Err(TrainingError::NonFinite("features"));
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(TrainingError::NonFinite("target"));
        }

        let kernel = self.params.resolve_kernel(x);
        let settings = SolverSettings {
            c: self.params.c,
            epsilon: self.params.epsilon,
            tol: self.params.tol,
            max_iter: self.params.iteration_cap(x.rows()),
        };
        let solution = smo::solve_epsilon_svr(x, y, kernel, &settings)?;

        let support: Vec<usize> = solution
            .beta
            .iter()
            .enumerate()
            .filter(|(_, b)| **b != 0.0)
            .map(|(k, _)| k)
            .collect();

        Ok(SVRModel {
            kernel,
            support_vectors: x.select_rows(&support),
            dual_coef: support.iter().map(|&k| solution.beta[k]).collect(),
            intercept: -solution.rho,
            n_features: x.cols(),
            iterations: solution.iterations,
        })
    }
}

/// A fitted SVR: `f(x) = sum(dual_coef[k] * K(sv[k], x)) + intercept`.
#[derive(Debug, Clone, PartialEq)]
pub struct SVRModel {
    pub kernel: Kernel,
    pub support_vectors: Matrix,
    pub dual_coef: Vec<f64>,
    pub intercept: f64,
    pub n_features: usize,
    /// Solver iterations spent reaching the stopping tolerance.
    pub iterations: usize,
}

impl SVRModel {
    pub fn predict(&self, x: &Matrix) -> Result<Vec<f64>, TrainingError> {
        if x.cols() != self.n_features {
            return Err(TrainingError::FeatureMismatch {
                expected: self.n_features,
                got: x.cols(),
            });
        }
        if x.data().iter().any(|v| !v.is_finite()) {
            return Err(TrainingError::NonFinite("features"));
        }

        Ok(x.row_iter()
            .map(|row| {
                self.support_vectors
                    .row_iter()
                    .zip(&self.dual_coef)
                    .map(|(sv, &coef)| coef * self.kernel.eval(sv, row))
                    .sum::<f64>()
                    + self.intercept
            })
            .collect())
    }

    pub fn n_support_vectors(&self) -> usize {
        self.dual_coef.len()
    }

    /// Numeric gamma the model was fitted with, if the kernel has one.
    pub fn gamma(&self) -> Option<f64> {
        self.kernel.gamma()
    }
}
