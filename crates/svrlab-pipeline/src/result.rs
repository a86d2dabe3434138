use serde::Serialize;
use svrlab_metrics::EvaluationMetrics;
use svrlab_plot::DiagnosticPlots;
use svrlab_svm::KernelKind;

use crate::request::GammaSetting;

/// Hyperparameters as used, with the feature list after numeric filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelParameters {
    #[serde(rename = "C")]
    pub c: f64,
    pub epsilon: f64,
    pub gamma: GammaSetting,
    /// Numeric gamma the kernel was evaluated with.
    pub gamma_used: Option<f64>,
    pub kernel: KernelKind,
    pub degree: u32,
    pub coef0: f64,
    pub target_column: String,
    pub feature_columns: Vec<String>,
    pub test_size: f64,
    pub random_state: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataInfo {
    pub total_samples: usize,
    pub training_samples: usize,
    pub test_samples: usize,
    pub features: usize,
    pub feature_names: Vec<String>,
}

/// Diagnostic figures as `data:image/png;base64,...` strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plots {
    pub actual_vs_predicted: String,
    pub residuals: String,
}

impl From<&DiagnosticPlots> for Plots {
    fn from(plots: &DiagnosticPlots) -> Self {
        Plots {
            actual_vs_predicted: plots.actual_vs_predicted.to_data_uri(),
            residuals: plots.residuals.to_data_uri(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub n_support_vectors: usize,
    pub iterations: usize,
    pub intercept: f64,
}

/// Everything a training run reports back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingResult {
    pub model_parameters: ModelParameters,
    pub metrics: EvaluationMetrics,
    pub data_info: DataInfo,
    /// `None` when plots were not requested or could not be rendered.
    pub plots: Option<Plots>,
    pub model: ModelSummary,
    pub warnings: Vec<String>,
}
