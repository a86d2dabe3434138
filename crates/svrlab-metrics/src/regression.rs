use serde::Serialize;
use svrlab_core::TrainingError;

fn check(y_true: &[f64], y_pred: &[f64]) -> Result<(), TrainingError> {
    if y_true.is_empty() {
        return Err(TrainingError::EmptyTrainingSet);
    }
    if y_true.len() != y_pred.len() {
        return Err(TrainingError::LengthMismatch {
            expected: y_true.len(),
            got: y_pred.len(),
        });
    }
    if y_true.iter().any(|v| !v.is_finite()) {
        return Err(TrainingError::NonFinite("targets"));
    }
    if y_pred.iter().any(|v| !v.is_finite()) {
        return Err(TrainingError::NonFinite("predictions"));
    }
    Ok(())
}

/// Mean Squared Error.
pub fn mse(y_true: &[f64], y_pred: &[f64]) -> Result<f64, TrainingError> {
    check(y_true, y_pred)?;
    let sum: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| {
            let d = t - p;
            d * d
        })
        .sum();
    Ok(sum / y_true.len() as f64)
}

/// Mean Absolute Error.
pub fn mae(y_true: &[f64], y_pred: &[f64]) -> Result<f64, TrainingError> {
    check(y_true, y_pred)?;
    let sum: f64 = y_true.iter().zip(y_pred).map(|(t, p)| (t - p).abs()).sum();
    Ok(sum / y_true.len() as f64)
}

/// R² together with whether it was defined for this target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct R2 {
    pub value: f64,
    /// `false` when the target has zero variance; `value` is then 0.
    pub defined: bool,
}

/// R² (coefficient of determination).
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> Result<R2, TrainingError> {
    check(y_true, y_pred)?;
    let n = y_true.len() as f64;
    let mean_true = y_true.iter().sum::<f64>() / n;

    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| {
            let d = t - p;
            d * d
        })
        .sum();

    let ss_tot: f64 = y_true
        .iter()
        .map(|t| {
            let d = t - mean_true;
            d * d
        })
        .sum();

    if ss_tot == 0.0 {
        return Ok(R2 {
            value: 0.0,
            defined: false,
        });
    }
    Ok(R2 {
        value: 1.0 - ss_res / ss_tot,
        defined: true,
    })
}

/// MSE, R² and MAE of one partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressionScores {
    pub mse: f64,
    pub r2: R2,
    pub mae: f64,
}

impl RegressionScores {
    pub fn compute(y_true: &[f64], y_pred: &[f64]) -> Result<Self, TrainingError> {
        Ok(RegressionScores {
            mse: mse(y_true, y_pred)?,
            r2: r2_score(y_true, y_pred)?,
            mae: mae(y_true, y_pred)?,
        })
    }
}

/// Train and test scores as reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvaluationMetrics {
    pub train_mse: f64,
    pub test_mse: f64,
    pub train_r2: f64,
    pub test_r2: f64,
    pub train_mae: f64,
    pub test_mae: f64,
}

impl EvaluationMetrics {
    pub fn new(train: &RegressionScores, test: &RegressionScores) -> Self {
        EvaluationMetrics {
            train_mse: train.mse,
            test_mse: test.mse,
            train_r2: train.r2.value,
            test_r2: test.r2.value,
            train_mae: train.mae,
            test_mae: test.mae,
        }
    }

    /// Compute both partitions at once.
    pub fn evaluate(
        y_train: &[f64],
        train_pred: &[f64],
        y_test: &[f64],
        test_pred: &[f64],
    ) -> Result<(Self, RegressionScores, RegressionScores), TrainingError> {
        let train = RegressionScores::compute(y_train, train_pred)?;
        let test = RegressionScores::compute(y_test, test_pred)?;
        Ok((EvaluationMetrics::new(&train, &test), train, test))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mse() {
        let y = [1.0, 2.0, 3.0];
        assert!(mse(&y, &y).unwrap().abs() < 1e-10);
        assert_relative_eq!(mse(&y, &[2.0, 2.0, 5.0]).unwrap(), 5.0 / 3.0);
    }

    #[test]
    fn test_mae() {
        assert_relative_eq!(mae(&[1.0, 2.0, 3.0], &[1.5, 2.5, 3.5]).unwrap(), 0.5);
    }

    #[test]
    fn test_r2_perfect() {
        let y = [1.0, 2.0, 3.0, 4.0];
        let r2 = r2_score(&y, &y).unwrap();
        assert!(r2.defined);
        assert!((r2.value - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_r2_mean_predictor_is_zero() {
        let y = [3.0, 5.0, 7.0, 9.0];
        let r2 = r2_score(&y, &[6.0; 4]).unwrap();
        assert_relative_eq!(r2.value, 0.0);
    }

    #[test]
    fn test_r2_constant_target_is_undefined() {
        let r2 = r2_score(&[4.0, 4.0, 4.0], &[3.0, 4.0, 5.0]).unwrap();
        assert_eq!(r2, R2 { value: 0.0, defined: false });
    }

    #[test]
    fn test_guards() {
        assert_eq!(mse(&[], &[]).unwrap_err(), TrainingError::EmptyTrainingSet);
        assert_eq!(
            mae(&[1.0, 2.0], &[1.0]).unwrap_err(),
            TrainingError::LengthMismatch { expected: 2, got: 1 }
        );
        assert_eq!(
            r2_score(&[1.0, 2.0], &[f64::NAN, 1.0]).unwrap_err(),
            TrainingError::NonFinite("predictions")
        );
    }

    #[test]
    fn test_evaluate_is_non_negative_and_repeatable() {
        let y_train = [1.0, 2.0, 3.0, 4.0];
        let p_train = [1.1, 1.9, 3.2, 3.7];
        let y_test = [5.0, 6.0];
        let p_test = [4.5, 6.5];
        let (a, train, _) = EvaluationMetrics::evaluate(&y_train, &p_train, &y_test, &p_test).unwrap();
        let (b, _, _) = EvaluationMetrics::evaluate(&y_train, &p_train, &y_test, &p_test).unwrap();

        assert_eq!(a, b);
        assert!(a.train_mse >= 0.0 && a.test_mse >= 0.0);
        assert!(a.train_mae >= 0.0 && a.test_mae >= 0.0);
        assert_eq!(a.train_r2, train.r2.value);
        assert_relative_eq!(a.test_mae, 0.5);
    }
}
