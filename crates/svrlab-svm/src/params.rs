use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use svrlab_core::{Matrix, TrainingError};

use crate::kernel::Kernel;

/// Kernel family requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KernelKind {
    #[default]
    Rbf,
    Linear,
    Poly,
    Sigmoid,
}

impl KernelKind {
    pub fn as_str(self) -> &'static str {
        match self {
            KernelKind::Rbf => "rbf",
            KernelKind::Linear => "linear",
            KernelKind::Poly => "poly",
            KernelKind::Sigmoid => "sigmoid",
        }
    }
}

impl FromStr for KernelKind {
    type Err = TrainingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rbf" => Ok(KernelKind::Rbf),
            "linear" => Ok(KernelKind::Linear),
            "poly" => Ok(KernelKind::Poly),
            "sigmoid" => Ok(KernelKind::Sigmoid),
            _ => Err(TrainingError::UnknownKernel(s.to_string())),
        }
    }
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for KernelKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Kernel coefficient: a policy resolved against the training data, or a fixed value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gamma {
    /// `1 / (n_features * Var(X))`, or 1.0 when the variance is zero.
    #[default]
    Scale,
    /// `1 / n_features`
    Auto,
    Value(f64),
}

impl Gamma {
    /// Numeric gamma for a training matrix.
    pub fn resolve(&self, x: &Matrix) -> f64 {
        let n_features = x.cols().max(1) as f64;
        match *self {
            Gamma::Scale => {
                let var = x.variance();
                if var > 0.0 {
                    1.0 / (n_features * var)
                } else {
                    1.0
                }
            }
            Gamma::Auto => 1.0 / n_features,
            Gamma::Value(g) => g,
        }
    }
}

impl FromStr for Gamma {
    type Err = TrainingError;

    /// Accepts `scale`, `auto` or a number literal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let policy = s.trim().to_ascii_lowercase();
        match policy.as_str() {
            "scale" => Ok(Gamma::Scale),
            "auto" => Ok(Gamma::Auto),
            _ => policy
                .parse::<f64>()
                .map(Gamma::Value)
                .map_err(|_| TrainingError::UnknownGammaPolicy(s.to_string())),
        }
    }
}

/// Hyperparameters of an epsilon-SVR fit.
#[derive(Debug, Clone, PartialEq)]
pub struct SVRParams {
    pub c: f64,
    pub epsilon: f64,
    pub kernel: KernelKind,
    pub gamma: Gamma,
    pub degree: u32,
    pub coef0: f64,
    /// Stopping tolerance on the maximal KKT violation.
    pub tol: f64,
    /// Solver iteration cap; `None` means `max(10_000_000, 100 * n_samples)`.
    pub max_iter: Option<usize>,
}

impl Default for SVRParams {
    fn default() -> Self {
        SVRParams {
            c: 1.0,
            epsilon: 0.1,
            kernel: KernelKind::Rbf,
            gamma: Gamma::Scale,
            degree: 3,
            coef0: 0.0,
            tol: 1e-3,
            max_iter: None,
        }
    }
}

impl SVRParams {
    pub fn validate(&self) -> Result<(), TrainingError> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(TrainingError::InvalidC(self.c));
        }
        if !(self.epsilon.is_finite() && self.epsilon >= 0.0) {
            return Err(TrainingError::InvalidEpsilon(self.epsilon));
        }
        if let Gamma::Value(g) = self.gamma {
            if !(g.is_finite() && g > 0.0) {
                return Err(TrainingError::InvalidGamma(g));
            }
        }
        if self.kernel == KernelKind::Poly && self.degree == 0 {
            return Err(TrainingError::InvalidDegree);
        }
        if !self.coef0.is_finite() {
            return Err(TrainingError::NonFinite("coef0"));
        }
        Ok(())
    }

    /// Resolve the kernel against the (scaled) training matrix.
    pub fn resolve_kernel(&self, x: &Matrix) -> Kernel {
        let gamma = self.gamma.resolve(x);
        match self.kernel {
            KernelKind::Rbf => Kernel::Rbf { gamma },
            KernelKind::Linear => Kernel::Linear,
            KernelKind::Poly => Kernel::Poly {
                gamma,
                degree: self.degree,
                coef0: self.coef0,
            },
            KernelKind::Sigmoid => Kernel::Sigmoid {
                gamma,
                coef0: self.coef0,
            },
        }
    }

    pub fn iteration_cap(&self, n_samples: usize) -> usize {
        self.max_iter
            .unwrap_or_else(|| 10_000_000usize.max(n_samples.saturating_mul(100)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_kernel_and_gamma() {
        assert_eq!("RBF".parse::<KernelKind>().unwrap(), KernelKind::Rbf);
        assert_eq!(
            "cubic".parse::<KernelKind>().unwrap_err(),
            TrainingError::UnknownKernel("cubic".into())
        );
        assert_eq!("scale".parse::<Gamma>().unwrap(), Gamma::Scale);
        assert_eq!("auto".parse::<Gamma>().unwrap(), Gamma::Auto);
        assert_eq!("0.25".parse::<Gamma>().unwrap(), Gamma::Value(0.25));
        assert!(matches!(
            "wide".parse::<Gamma>(),
            Err(TrainingError::UnknownGammaPolicy(_))
        ));
    }

    #[test]
    fn test_validate() {
        assert!(SVRParams::default().validate().is_ok());
        let bad_c = SVRParams { c: 0.0, ..Default::default() };
        assert_eq!(bad_c.validate(), Err(TrainingError::InvalidC(0.0)));
        let bad_eps = SVRParams { epsilon: -0.1, ..Default::default() };
        assert_eq!(bad_eps.validate(), Err(TrainingError::InvalidEpsilon(-0.1)));
        let bad_gamma = SVRParams { gamma: Gamma::Value(-1.0), ..Default::default() };
        assert!(bad_gamma.validate().is_err());
        let bad_degree = SVRParams { kernel: KernelKind::Poly, degree: 0, ..Default::default() };
        assert_eq!(bad_degree.validate(), Err(TrainingError::InvalidDegree));
    }

    #[test]
    fn test_gamma_resolution() {
        let x = Matrix::from_rows(&[vec![1.0, -1.0], vec![-1.0, 1.0]]).unwrap();
        // variance of all elements = 1, two features
        assert_relative_eq!(Gamma::Scale.resolve(&x), 0.5);
        assert_relative_eq!(Gamma::Auto.resolve(&x), 0.5);
        assert_eq!(Gamma::Value(3.0).resolve(&x), 3.0);

        let flat = Matrix::from_rows(&[vec![0.0], vec![0.0]]).unwrap();
        assert_eq!(Gamma::Scale.resolve(&flat), 1.0);
    }
}
