//! Sequential minimal optimization for the epsilon-SVR dual.
//!
//! The dual is written over `2l` variables: `alpha[t]` for `t < l` pairs with
//! sign `+1` and `alpha[t]` for `t >= l` with sign `-1`, both tied to sample
//! `t % l`. Working pairs are chosen by maximal violation for `i` and by
//! second-order gain for `j`.

use std::borrow::Cow;

use svrlab_core::{Matrix, TrainingError};

use crate::kernel::Kernel;

/// Replacement for a non-positive curvature along the working direction.
const TAU: f64 = 1e-12;

/// Above this many samples kernel rows are computed on demand.
const DENSE_LIMIT: usize = 4096;

pub(crate) struct SolverSettings {
    pub c: f64,
    pub epsilon: f64,
    pub tol: f64,
    pub max_iter: usize,
}

pub(crate) struct Solution {
    /// `alpha[k] - alpha[k + l]` per training sample.
    pub beta: Vec<f64>,
    pub rho: f64,
    pub iterations: usize,
}

// ─── Kernel rows ────────────────────────────────────────────────────────────

struct KernelRows<'a> {
    x: &'a Matrix,
    kernel: Kernel,
    diag: Vec<f64>,
    dense: Option<Vec<f64>>,
}

impl<'a> KernelRows<'a> {
    fn new(x: &'a Matrix, kernel: Kernel) -> Self {
        let l = x.rows();
        let diag = (0..l).map(|i| kernel.eval(x.row(i), x.row(i))).collect();
        let dense = (l <= DENSE_LIMIT).then(|| {
            let mut gram = vec![0.0; l * l];
            for i in 0..l {
                for j in i..l {
                    let v = kernel.eval(x.row(i), x.row(j));
                    gram[i * l + j] = v;
                    gram[j * l + i] = v;
                }
            }
            gram
        });
        KernelRows {
            x,
            kernel,
            diag,
            dense,
        }
    }

    /// `K(i, .)` over all training samples.
    fn row(&self, i: usize) -> Cow<'_, [f64]> {
        let l = self.x.rows();
        match &self.dense {
            Some(gram) => Cow::Borrowed(&gram[i * l..(i + 1) * l]),
            None => {
                let xi = self.x.row(i);
                Cow::Owned(self.x.row_iter().map(|xj| self.kernel.eval(xi, xj)).collect())
            }
        }
    }
}

// ─── Solver ─────────────────────────────────────────────────────────────────

pub(crate) fn solve_epsilon_svr(
    x: &Matrix,
    y: &[f64],
    kernel: Kernel,
    settings: &SolverSettings,
) -> Result<Solution, TrainingError> {
    let l = y.len();
    let n = 2 * l;
    let c = settings.c;
    let rows = KernelRows::new(x, kernel);

    let sign = |t: usize| if t < l { 1.0 } else { -1.0 };
    let at_upper = |a: f64| a >= c;
    let at_lower = |a: f64| a <= 0.0;

    let mut alpha = vec![0.0; n];
    let mut grad: Vec<f64> = (0..n)
        .map(|t| {
            if t < l {
                settings.epsilon - y[t]
            } else {
                settings.epsilon + y[t - l]
            }
        })
        .collect();

    let mut iterations = 0;
    loop {
        // i: maximal violating index among those that can move up
        let mut gmax = f64::NEG_INFINITY;
        let mut pick_i = None;
        for t in 0..n {
            let violation = if sign(t) > 0.0 {
                (!at_upper(alpha[t])).then(|| -grad[t])
            } else {
                (!at_lower(alpha[t])).then(|| grad[t])
            };
            if let Some(v) = violation {
                if v >= gmax {
                    gmax = v;
                    pick_i = Some(t);
                }
            }
        }
        let Some(i) = pick_i else { break };

        let k_i = rows.row(i % l);
        let qd_i = rows.diag[i % l];

        // j: largest second-order decrease among those that can move down
        let mut gmax2 = f64::NEG_INFINITY;
        let mut obj_min = f64::INFINITY;
        let mut pick_j = None;
        for t in 0..n {
            let (movable, grad_diff, reach) = if sign(t) > 0.0 {
                (!at_lower(alpha[t]), gmax + grad[t], grad[t])
            } else {
                (!at_upper(alpha[t]), gmax - grad[t], -grad[t])
            };
            if !movable {
                continue;
            }
            gmax2 = gmax2.max(reach);
            if grad_diff > 0.0 {
                let quad = qd_i + rows.diag[t % l] - 2.0 * k_i[t % l];
                let quad = if quad > 0.0 { quad } else { TAU };
                let obj = -(grad_diff * grad_diff) / quad;
                if obj <= obj_min {
                    obj_min = obj;
                    pick_j = Some(t);
                }
            }
        }

        let Some(j) = pick_j else { break };
        if gmax + gmax2 < settings.tol {
            break;
        }
        if iterations >= settings.max_iter {
            return Err(TrainingError::NotConverged { iterations });
        }
        iterations += 1;

        let k_j = rows.row(j % l);
        let qd_j = rows.diag[j % l];
        let (s_i, s_j) = (sign(i), sign(j));
        let q_ij = s_i * s_j * k_i[j % l];
        let (old_i, old_j) = (alpha[i], alpha[j]);

        if s_i != s_j {
            let quad = qd_i + qd_j + 2.0 * q_ij;
            let quad = if quad > 0.0 { quad } else { TAU };
            let delta = (-grad[i] - grad[j]) / quad;
            let diff = alpha[i] - alpha[j];
            alpha[i] += delta;
            alpha[j] += delta;
            if diff > 0.0 {
                if alpha[j] < 0.0 {
                    alpha[j] = 0.0;
                    alpha[i] = diff;
                }
                if alpha[i] > c {
                    alpha[i] = c;
                    alpha[j] = c - diff;
                }
            } else {
                if alpha[i] < 0.0 {
                    alpha[i] = 0.0;
                    alpha[j] = -diff;
                }
                if alpha[j] > c {
                    alpha[j] = c;
                    alpha[i] = c + diff;
                }
            }
        } else {
            let quad = qd_i + qd_j - 2.0 * q_ij;
            let quad = if quad > 0.0 { quad } else { TAU };
            let delta = (grad[i] - grad[j]) / quad;
            let sum = alpha[i] + alpha[j];
            alpha[i] -= delta;
            alpha[j] += delta;
            if sum > c {
                if alpha[i] > c {
                    alpha[i] = c;
                    alpha[j] = sum - c;
                }
                if alpha[j] > c {
                    alpha[j] = c;
                    alpha[i] = sum - c;
                }
            } else {
                if alpha[j] < 0.0 {
                    alpha[j] = 0.0;
                    alpha[i] = sum;
                }
                if alpha[i] < 0.0 {
                    alpha[i] = 0.0;
                    alpha[j] = sum;
                }
            }
        }

        let d_i = s_i * (alpha[i] - old_i);
        let d_j = s_j * (alpha[j] - old_j);
        for (t, g) in grad.iter_mut().enumerate() {
            let m = t % l;
            *g += sign(t) * (d_i * k_i[m] + d_j * k_j[m]);
        }
    }

    let rho = compute_rho(&alpha, &grad, l, c);
    let beta = (0..l).map(|k| alpha[k] - alpha[k + l]).collect();
    Ok(Solution {
        beta,
        rho,
        iterations,
    })
}

/// Offset from the KKT conditions: the mean over free variables, or the
/// midpoint of the feasible interval when every variable sits at a bound.
fn compute_rho(alpha: &[f64], grad: &[f64], l: usize, c: f64) -> f64 {
    let mut ub = f64::INFINITY;
    let mut lb = f64::NEG_INFINITY;
    let mut free_sum = 0.0;
    let mut free_count = 0usize;

    for (t, (&a, &g)) in alpha.iter().zip(grad).enumerate() {
        let positive = t < l;
        let yg = if positive { g } else { -g };
        if a >= c {
            if positive {
                lb = lb.max(yg);
            } else {
                ub = ub.min(yg);
            }
        } else if a <= 0.0 {
            if positive {
                ub = ub.min(yg);
            } else {
                lb = lb.max(yg);
            }
        } else {
            free_count += 1;
            free_sum += yg;
        }
    }

    if free_count > 0 {
        free_sum / free_count as f64
    } else {
        (ub + lb) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(c: f64, epsilon: f64) -> SolverSettings {
        SolverSettings {
            c,
            epsilon,
            tol: 1e-3,
            max_iter: 100_000,
        }
    }

    #[test]
    fn test_box_constraints_hold() {
        let x = Matrix::from_rows(&(0..20).map(|i| vec![i as f64 / 10.0]).collect::<Vec<_>>())
            .unwrap();
        let y: Vec<f64> = (0..20).map(|i| (i as f64 / 3.0).sin() * 5.0).collect();
        let sol = solve_epsilon_svr(&x, &y, Kernel::Rbf { gamma: 1.0 }, &settings(0.5, 0.1)).unwrap();

        for b in &sol.beta {
            assert!(b.abs() <= 0.5 + 1e-12);
        }
        // equality constraint of the dual
        assert!(sol.beta.iter().sum::<f64>().abs() < 1e-9);
        assert!(sol.rho.is_finite());
    }

    #[test]
    fn test_targets_inside_tube_need_no_steps() {
        let x = Matrix::from_rows(&[vec![0.0], vec![1.0], vec![2.0]]).unwrap();
        let y = [0.01, -0.02, 0.0];
        let sol = solve_epsilon_svr(&x, &y, Kernel::Linear, &settings(1.0, 0.5)).unwrap();
        assert_eq!(sol.iterations, 0);
        assert!(sol.beta.iter().all(|&b| b == 0.0));
    }

    #[test]
    fn test_iteration_cap() {
        let x = Matrix::from_rows(&(0..10).map(|i| vec![i as f64]).collect::<Vec<_>>()).unwrap();
        let y: Vec<f64> = (0..10).map(|i| (i * i) as f64).collect();
        let capped = SolverSettings {
            max_iter: 1,
            ..settings(10.0, 0.0)
        };
        let err = solve_epsilon_svr(&x, &y, Kernel::Rbf { gamma: 0.5 }, &capped)
            .err()
            .unwrap();
        assert_eq!(err, TrainingError::NotConverged { iterations: 1 });
    }
}
