use svrlab_core::{Dataset, Result};
use svrlab_metrics::EvaluationMetrics;
use svrlab_plot::{DiagnosticPlots, Series};
use svrlab_preprocessing::{impute_selection, select_features, train_test_split, StandardScaler};
use svrlab_svm::SVR;
use tracing::{debug, info, warn};

use crate::request::TrainingRequest;
use crate::result::{DataInfo, ModelParameters, ModelSummary, Plots, TrainingResult};

/// Renders the diagnostic figures of a fitted model.
pub trait DiagnosticRenderer: Send + Sync {
    fn render(&self, train: &Series, test: &Series) -> Result<DiagnosticPlots>;
}

/// Default renderer: two 1600x700 PNG figures.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngRenderer;

impl DiagnosticRenderer for PngRenderer {
    fn render(&self, train: &Series, test: &Series) -> Result<DiagnosticPlots> {
        DiagnosticPlots::render(train, test)
    }
}

/// Select → impute → split → scale → fit → evaluate → plot.
pub struct TrainingPipeline {
    renderer: Option<Box<dyn DiagnosticRenderer>>,
}

impl Default for TrainingPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainingPipeline {
    pub fn new() -> Self {
        Self::with_renderer(Box::new(PngRenderer))
    }

    pub fn with_renderer(renderer: Box<dyn DiagnosticRenderer>) -> Self {
        TrainingPipeline {
            renderer: Some(renderer),
        }
    }

    /// Skip plot rendering; results carry `plots: None` without a warning.
    pub fn without_plots() -> Self {
        TrainingPipeline { renderer: None }
    }

    /// Train and evaluate an SVR on `dataset`.
    ///
    /// Any failure before plotting aborts the run. A plotting failure only
    /// drops the plots and adds a warning.
    pub fn run(&self, dataset: &Dataset, request: &TrainingRequest) -> Result<TrainingResult> {
        let params = request.to_params()?;
        let mut warnings = Vec::new();

        let selection = select_features(
            dataset,
            &request.target_column,
            request.feature_columns.as_deref(),
        )?;
        if !selection.dropped_columns.is_empty() {
            warn!(dropped = ?selection.dropped_columns, "ignoring non-numeric feature columns");
            warnings.push(format!(
                "Non-numeric feature columns ignored: {}",
                selection.dropped_columns.join(", ")
            ));
        }
        info!(
            target = %selection.target_name,
            n_samples = selection.n_samples(),
            n_features = selection.n_features(),
            "selected columns"
        );

        let data = impute_selection(&selection)?;
        if data.imputed_cells > 0 {
            info!(cells = data.imputed_cells, "imputed missing values with column means");
        }

        let split = train_test_split(&data.features, &data.target, request.test_size, request.random_state)?;
        debug!(n_train = split.n_train(), n_test = split.n_test(), "partitioned rows");

        let mut scaler = StandardScaler::new();
        let x_train = scaler.fit_transform(&split.x_train)?;
        let x_test = scaler.transform(&split.x_test)?;
        for j in scaler.constant_columns() {
            let name = &selection.feature_names[j];
            debug!(column = %name, "feature is constant on the training rows");
            warnings.push(format!("Feature '{name}' is constant in the training set"));
        }

        let model = SVR::new(params.clone()).fit(&x_train, &split.y_train)?;
        info!(
            kernel = %params.kernel,
            gamma = ?model.gamma(),
            n_support_vectors = model.n_support_vectors(),
            iterations = model.iterations,
            "fitted SVR"
        );

        let train_pred = model.predict(&x_train)?;
        let test_pred = model.predict(&x_test)?;
        let (metrics, train_scores, test_scores) =
            EvaluationMetrics::evaluate(&split.y_train, &train_pred, &split.y_test, &test_pred)?;
        for (set, scores) in [("training", &train_scores), ("test", &test_scores)] {
            if !scores.r2.defined {
                warnings.push(format!("R² is undefined on the {set} set (constant target); reported as 0"));
            }
        }
        info!(
            train_r2 = metrics.train_r2,
            test_r2 = metrics.test_r2,
            test_mse = metrics.test_mse,
            "evaluated model"
        );

        let plots = self.renderer.as_ref().and_then(|renderer| {
            let train = Series {
                actual: &split.y_train,
                predicted: &train_pred,
                r2: metrics.train_r2,
            };
            let test = Series {
                actual: &split.y_test,
                predicted: &test_pred,
                r2: metrics.test_r2,
            };
            match renderer.render(&train, &test) {
                Ok(plots) => Some(Plots::from(&plots)),
                Err(e) => {
                    warn!(error = %e, "plot rendering failed");
                    warnings.push(format!("Plots unavailable: {e}"));
                    None
                }
            }
        });

        Ok(TrainingResult {
            model_parameters: ModelParameters {
                c: params.c,
                epsilon: params.epsilon,
                gamma: request.gamma.clone(),
                gamma_used: model.gamma(),
                kernel: params.kernel,
                degree: params.degree,
                coef0: params.coef0,
                target_column: selection.target_name.clone(),
                feature_columns: selection.feature_names.clone(),
                test_size: request.test_size,
                random_state: request.random_state,
            },
            metrics,
            data_info: DataInfo {
                total_samples: dataset.n_rows(),
                training_samples: split.n_train(),
                test_samples: split.n_test(),
                features: selection.n_features(),
                feature_names: selection.feature_names,
            },
            plots,
            model: ModelSummary {
                n_support_vectors: model.n_support_vectors(),
                iterations: model.iterations,
                intercept: model.intercept,
            },
            warnings,
        })
    }
}
