use svrlab_core::{Matrix, Result, SvrError};

use crate::select::Selection;

/// Fill missing entries of one column with the mean of its present entries.
///
/// Returns the completed column and the mean used. An entirely missing
/// column has no mean and fails with `DegenerateColumn`.
pub fn impute_mean(name: &str, values: &[Option<f64>]) -> Result<(Vec<f64>, f64)> {
    let (sum, count) = values
        .iter()
        .flatten()
        .fold((0.0, 0usize), |(s, n), &v| (s + v, n + 1));
    if count == 0 {
        return Err(SvrError::DegenerateColumn {
            column: name.to_string(),
        });
    }
    let mean = sum / count as f64;
    let filled = values.iter().map(|v| v.unwrap_or(mean)).collect();
    Ok((filled, mean))
}

/// Fully numeric training data: the feature matrix and target vector.
#[derive(Debug, Clone, PartialEq)]
pub struct ImputedData {
    pub features: Matrix,
    pub target: Vec<f64>,
    pub feature_means: Vec<f64>,
    pub target_mean: f64,
    /// Number of cells (features and target) that were filled in.
    pub imputed_cells: usize,
}

/// Mean-impute every selected feature column and the target.
pub fn impute_selection(selection: &Selection) -> Result<ImputedData> {
    let mut imputed_cells = 0;
    let mut columns = Vec::with_capacity(selection.n_features());
    let mut feature_means = Vec::with_capacity(selection.n_features());

    for (name, values) in selection.feature_names.iter().zip(&selection.features) {
        imputed_cells += values.iter().filter(|v| v.is_none()).count();
        let (filled, mean) = impute_mean(name, values)?;
        columns.push(filled);
        feature_means.push(mean);
    }

    imputed_cells += selection.target.iter().filter(|v| v.is_none()).count();
    let (target, target_mean) = impute_mean(&selection.target_name, &selection.target)?;

    Ok(ImputedData {
        features: Matrix::from_columns(&columns)?,
        target,
        feature_means,
        target_mean,
        imputed_cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(features: Vec<Vec<Option<f64>>>, target: Vec<Option<f64>>) -> Selection {
        Selection {
            target_name: "y".into(),
            target,
            feature_names: (0..features.len()).map(|j| format!("x{}", j)).collect(),
            features,
            dropped_columns: vec![],
        }
    }

    #[test]
    fn test_impute_mean_fills_gaps() {
        let (filled, mean) = impute_mean("a", &[Some(1.0), None, Some(3.0)]).unwrap();
        assert_eq!(mean, 2.0);
        assert_eq!(filled, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_all_missing_is_degenerate() {
        let err = impute_mean("empty", &[None, None]).unwrap_err();
        assert_eq!(
            err,
            SvrError::DegenerateColumn {
                column: "empty".into()
            }
        );
    }

    #[test]
    fn test_selection_has_no_missing_after_imputation() {
        let sel = selection(
            vec![vec![Some(1.0), None, Some(5.0)], vec![None, Some(2.0), Some(4.0)]],
            vec![Some(10.0), Some(20.0), None],
        );
        let data = impute_selection(&sel).unwrap();
        assert_eq!(data.features.shape(), (3, 2));
        assert_eq!(data.features.row(1), &[3.0, 2.0]);
        assert_eq!(data.features.row(0), &[1.0, 3.0]);
        assert_eq!(data.target, vec![10.0, 20.0, 15.0]);
        assert_eq!(data.imputed_cells, 3);
        assert!(data.features.data().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_degenerate_target() {
        let sel = selection(vec![vec![Some(1.0), Some(2.0)]], vec![None, None]);
        let err = impute_selection(&sel).unwrap_err();
        assert_eq!(err.kind(), "DegenerateColumnError");
    }
}
