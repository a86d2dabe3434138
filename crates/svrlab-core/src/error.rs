use std::fmt;

use thiserror::Error;

/// Which side of the selection a missing column was requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Target,
    Feature,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRole::Target => f.write_str("target"),
            ColumnRole::Feature => f.write_str("feature"),
        }
    }
}

/// Failures raised by the kernel regression engine and the metric guards.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TrainingError {
    #[error("C must be a positive finite number, got {0}")]
    InvalidC(f64),

    #[error("epsilon must be a non-negative finite number, got {0}")]
    InvalidEpsilon(f64),

    #[error("gamma must be a positive finite number, got {0}")]
    InvalidGamma(f64),

    #[error("unknown gamma policy '{0}', expected 'scale', 'auto' or a positive number")]
    UnknownGammaPolicy(String),

    #[error("unknown kernel '{0}', expected one of rbf, linear, poly, sigmoid")]
    UnknownKernel(String),

    #[error("polynomial degree must be at least 1")]
    InvalidDegree,

    #[error("cannot fit on an empty training set")]
    EmptyTrainingSet,

    #[error("solver did not converge within {iterations} iterations")]
    NotConverged { iterations: usize },

    #[error("model expects {expected} features, got {got}")]
    FeatureMismatch { expected: usize, got: usize },

    #[error("length mismatch: {expected} targets vs {got} predictions")]
    LengthMismatch { expected: usize, got: usize },

    #[error("non-finite value encountered in {0}")]
    NonFinite(&'static str),
}

/// Error taxonomy for the whole training workflow.
///
/// Every variant carries the structured context needed to explain the
/// failure; `kind()` and `summary()` feed the response envelope.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SvrError {
    #[error("Error reading file: {reason}")]
    UnreadableData { reason: String },

    #[error("Columns not found: {columns:?}")]
    ColumnNotFound { role: ColumnRole, columns: Vec<String> },

    #[error("At least one numeric feature column is required (candidates: {requested:?})")]
    NoNumericFeature { requested: Vec<String> },

    #[error("Target column '{column}' must be numeric")]
    NonNumericTarget { column: String },

    #[error("Target column '{column}' cannot also be a feature column")]
    TargetAmongFeatures { column: String },

    #[error("Column '{column}' has no values to impute from")]
    DegenerateColumn { column: String },

    #[error("test_size {test_size} leaves an empty partition for {n_samples} samples")]
    InvalidSplit { n_samples: usize, test_size: f64 },

    #[error(transparent)]
    Training(#[from] TrainingError),

    #[error("Error creating plot: {reason}")]
    Visualization { reason: String },

    #[error("Invalid parameters: {reason}")]
    InvalidRequest { reason: String },

    #[error("Shape mismatch: expected {expected:?}, got {got} values")]
    ShapeMismatch { expected: (usize, usize), got: usize },
}

impl SvrError {
    pub fn unreadable(reason: impl Into<String>) -> Self {
        SvrError::UnreadableData { reason: reason.into() }
    }

    pub fn visualization(reason: impl Into<String>) -> Self {
        SvrError::Visualization { reason: reason.into() }
    }

    /// Stable name of the error class, as exposed to API clients.
    pub fn kind(&self) -> &'static str {
        match self {
            SvrError::UnreadableData { .. } => "UnreadableDataError",
            SvrError::ColumnNotFound { .. } => "ColumnNotFoundError",
            SvrError::NoNumericFeature { .. } => "NoNumericFeatureError",
            SvrError::NonNumericTarget { .. } => "NonNumericTargetError",
            SvrError::TargetAmongFeatures { .. } => "TargetAmongFeaturesError",
            SvrError::DegenerateColumn { .. } => "DegenerateColumnError",
            SvrError::InvalidSplit { .. } => "InvalidSplitError",
            SvrError::Training(_) => "TrainingError",
            SvrError::Visualization { .. } => "VisualizationError",
            SvrError::InvalidRequest { .. } => "InvalidRequestError",
            SvrError::ShapeMismatch { .. } => "ShapeError",
        }
    }

    /// Short human readable headline for the envelope `message` field.
    pub fn summary(&self) -> &'static str {
        match self {
            SvrError::UnreadableData { .. } => "Failed to process file",
            SvrError::ColumnNotFound { role: ColumnRole::Target, .. } => "Invalid target column",
            SvrError::ColumnNotFound { role: ColumnRole::Feature, .. } => "Invalid feature columns",
            SvrError::NoNumericFeature { .. } => "No numeric features found",
            SvrError::NonNumericTarget { .. } => "Invalid target column",
            SvrError::TargetAmongFeatures { .. } => "Invalid feature columns",
            SvrError::DegenerateColumn { .. } => "Cannot impute missing values",
            SvrError::InvalidSplit { .. } => "Invalid train/test split",
            SvrError::Training(_) => "Failed to train SVR model",
            SvrError::Visualization { .. } => "Failed to render plots",
            SvrError::InvalidRequest { .. } => "Invalid parameters",
            SvrError::ShapeMismatch { .. } => "Internal shape error",
        }
    }
}

pub type Result<T> = std::result::Result<T, SvrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_not_found_lists_names() {
        let err = SvrError::ColumnNotFound {
            role: ColumnRole::Feature,
            columns: vec!["nonexistent".into()],
        };
        assert!(err.to_string().contains("nonexistent"));
        assert_eq!(err.kind(), "ColumnNotFoundError");
        assert_eq!(err.summary(), "Invalid feature columns");
    }

    #[test]
    fn test_training_error_is_transparent() {
        let err: SvrError = TrainingError::InvalidC(-1.0).into();
        assert_eq!(err.kind(), "TrainingError");
        assert_eq!(err.to_string(), "C must be a positive finite number, got -1");
    }
}
