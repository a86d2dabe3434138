//! # svrlab-pipeline
//!
//! Ties the workspace together: dataset description, request parsing and
//! the select → impute → split → scale → fit → evaluate → plot sequence.

pub mod info;
pub mod request;
pub mod result;
pub mod train;

pub use info::{describe, DatasetInfo};
pub use request::{GammaSetting, TrainingRequest};
pub use result::{DataInfo, ModelParameters, ModelSummary, Plots, TrainingResult};
pub use train::{DiagnosticRenderer, PngRenderer, TrainingPipeline};
