//! # SVR Lab
//!
//! Upload a CSV or Excel table, pick a target column and train an
//! ε-insensitive support vector regressor on it.
//!
//! ## Modules
//!
//! - **core**: Dataset model, dense matrix, error taxonomy
//! - **io**: CSV and Excel (`xlsx`/`xls`) readers with type inference
//! - **preprocessing**: Column selection, mean imputation, train/test split, StandardScaler
//! - **svm**: SMO solver for ε-SVR with RBF, linear, polynomial and sigmoid kernels
//! - **metrics**: MSE, MAE, R²
//! - **plot**: Actual-vs-predicted and residual figures as PNG
//! - **pipeline**: The end-to-end training run and its result document
//! - **server**: HTTP API and command line

/// Dataset model and errors.
pub use svrlab_core as core;

/// File readers.
pub use svrlab_io as io;

/// Data preprocessing.
pub use svrlab_preprocessing as preprocessing;

/// Support vector regression.
pub use svrlab_svm as svm;

/// Evaluation metrics.
pub use svrlab_metrics as metrics;

/// Diagnostic plots.
pub use svrlab_plot as plot;

/// Training pipeline.
pub use svrlab_pipeline as pipeline;

/// HTTP service.
pub use svrlab_server as server;
