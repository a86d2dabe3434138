/// Kernel function with every hyperparameter resolved to a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kernel {
    /// `exp(-gamma * ||a - b||^2)`
    Rbf { gamma: f64 },
    /// `a . b`
    Linear,
    /// `(gamma * a . b + coef0)^degree`
    Poly { gamma: f64, degree: u32, coef0: f64 },
    /// `tanh(gamma * a . b + coef0)`
    Sigmoid { gamma: f64, coef0: f64 },
}

impl Kernel {
    #[inline]
    pub fn eval(&self, a: &[f64], b: &[f64]) -> f64 {
        match *self {
            Kernel::Rbf { gamma } => (-gamma * squared_distance(a, b)).exp(),
            Kernel::Linear => dot(a, b),
            Kernel::Poly {
                gamma,
                degree,
                coef0,
            } => (gamma * dot(a, b) + coef0).powi(degree as i32),
            Kernel::Sigmoid { gamma, coef0 } => (gamma * dot(a, b) + coef0).tanh(),
        }
    }

    pub fn gamma(&self) -> Option<f64> {
        match *self {
            Kernel::Rbf { gamma } | Kernel::Poly { gamma, .. } | Kernel::Sigmoid { gamma, .. } => {
                Some(gamma)
            }
            Kernel::Linear => None,
        }
    }
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[inline]
fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}
