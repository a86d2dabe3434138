use svrlab_core::error::ColumnRole;
use svrlab_core::{Dataset, Result, SvrError};

/// Numeric projection of a dataset onto the requested target and features.
///
/// Values are still raw: missing entries are `None` until imputation.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub target_name: String,
    pub target: Vec<Option<f64>>,
    /// Numeric feature columns actually used, in request order.
    pub feature_names: Vec<String>,
    pub features: Vec<Vec<Option<f64>>>,
    /// Requested feature columns dropped for not being numeric.
    pub dropped_columns: Vec<String>,
}

impl Selection {
    pub fn n_samples(&self) -> usize {
        self.target.len()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }
}

/// Resolve target and feature columns against `dataset`.
///
/// Without an explicit (non-empty) feature list every column except the
/// target is a candidate. Non-numeric candidates are dropped and reported in
/// [`Selection::dropped_columns`]; if nothing numeric remains the selection
/// fails with `NoNumericFeature`.
pub fn select_features(
    dataset: &Dataset,
    target: &str,
    feature_columns: Option<&[String]>,
) -> Result<Selection> {
    let target_column = dataset.column(target).ok_or_else(|| SvrError::ColumnNotFound {
        role: ColumnRole::Target,
        columns: vec![target.to_string()],
    })?;

    let candidates: Vec<String> = match feature_columns {
        Some(requested) if !requested.is_empty() => {
            if requested.iter().any(|c| c == target) {
                return Err(SvrError::TargetAmongFeatures {
                    column: target.to_string(),
                });
            }
            let mut unique: Vec<String> = Vec::with_capacity(requested.len());
            for name in requested {
                if !unique.contains(name) {
                    unique.push(name.clone());
                }
            }
            let missing: Vec<String> = unique
                .iter()
                .filter(|c| !dataset.contains(c))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(SvrError::ColumnNotFound {
                    role: ColumnRole::Feature,
                    columns: missing,
                });
            }
            unique
        }
        _ => dataset
            .column_names()
            .into_iter()
            .filter(|c| c != target)
            .collect(),
    };

    let target_values = target_column
        .numeric_values()
        .ok_or_else(|| SvrError::NonNumericTarget {
            column: target.to_string(),
        })?;

    let mut feature_names = Vec::new();
    let mut features = Vec::new();
    let mut dropped_columns = Vec::new();
    for name in &candidates {
        // every candidate was checked against the dataset above
        let Some(column) = dataset.column(name) else {
            continue;
        };
        match column.numeric_values() {
            Some(values) => {
                feature_names.push(name.clone());
                features.push(values);
            }
            None => dropped_columns.push(name.clone()),
        }
    }

    if feature_names.is_empty() {
        return Err(SvrError::NoNumericFeature {
            requested: candidates,
        });
    }

    Ok(Selection {
        target_name: target.to_string(),
        target: target_values,
        feature_names,
        features,
        dropped_columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use svrlab_core::{Cell, Column};

    fn dataset() -> Dataset {
        Dataset::new(vec![
            Column::numeric("x1", &[1.0, 2.0, 3.0]),
            Column::new(
                "label",
                vec![
                    Cell::Text("a".into()),
                    Cell::Text("b".into()),
                    Cell::Missing,
                ],
            ),
            Column::new("x2", vec![Cell::Number(0.5), Cell::Missing, Cell::Number(1.5)]),
            Column::numeric("y", &[2.0, 4.0, 6.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_default_features_exclude_target_and_text() {
        let sel = select_features(&dataset(), "y", None).unwrap();
        assert_eq!(sel.feature_names, vec!["x1", "x2"]);
        assert_eq!(sel.dropped_columns, vec!["label"]);
        assert_eq!(sel.features[1], vec![Some(0.5), None, Some(1.5)]);
        assert!(!sel.feature_names.contains(&sel.target_name));
    }

    #[test]
    fn test_empty_explicit_list_means_all() {
        let sel = select_features(&dataset(), "y", Some(&[] as &[String])).unwrap();
        assert_eq!(sel.n_features(), 2);
    }

    #[test]
    fn test_missing_target() {
        let err = select_features(&dataset(), "price", None).unwrap_err();
        assert_eq!(
            err,
            SvrError::ColumnNotFound {
                role: ColumnRole::Target,
                columns: vec!["price".into()]
            }
        );
    }

    #[test]
    fn test_missing_features_are_all_listed() {
        let requested = vec!["x1".to_string(), "nonexistent".into(), "other".into()];
        let err = select_features(&dataset(), "y", Some(requested.as_slice())).unwrap_err();
        match err {
            SvrError::ColumnNotFound { role, columns } => {
                assert_eq!(role, ColumnRole::Feature);
                assert_eq!(columns, vec!["nonexistent", "other"]);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_target_in_features_is_rejected() {
        let requested = vec!["x1".to_string(), "y".into()];
        let err = select_features(&dataset(), "y", Some(requested.as_slice())).unwrap_err();
        assert_eq!(err.kind(), "TargetAmongFeaturesError");
    }

    #[test]
    fn test_only_text_features() {
        let requested = vec!["label".to_string()];
        let err = select_features(&dataset(), "y", Some(requested.as_slice())).unwrap_err();
        assert_eq!(err.kind(), "NoNumericFeatureError");
    }

    #[test]
    fn test_single_column_dataset_has_no_features() {
        let ds = Dataset::new(vec![Column::numeric("y", &[1.0, 2.0])]).unwrap();
        let err = select_features(&ds, "y", None).unwrap_err();
        assert_eq!(err, SvrError::NoNumericFeature { requested: vec![] });
    }

    #[test]
    fn test_text_target_is_rejected() {
        let err = select_features(&dataset(), "label", None).unwrap_err();
        assert_eq!(err.kind(), "NonNumericTargetError");
    }

    #[test]
    fn test_duplicate_requests_collapse() {
        let requested = vec!["x2".to_string(), "x1".into(), "x2".into()];
        let sel = select_features(&dataset(), "y", Some(requested.as_slice())).unwrap();
        assert_eq!(sel.feature_names, vec!["x2", "x1"]);
    }
}
