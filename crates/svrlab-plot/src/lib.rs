//! # svrlab-plot
//!
//! Headless rendering of regression diagnostics. Every figure is drawn on
//! its own [`Canvas`], encoded to PNG and handed out as a [`PlotArtifact`].

pub mod artifact;
pub mod canvas;
pub mod chart;
mod font;

pub use artifact::PlotArtifact;
pub use canvas::{Canvas, Rgb};
pub use chart::diagnostics::{actual_vs_predicted, residuals, DiagnosticPlots, Series};
