use svrlab_core::{Result, SvrError};

use super::{AxisRange, Panel};
use crate::artifact::PlotArtifact;
use crate::canvas::{hex, Canvas, Rgb, WHITE};

pub const FIGURE_WIDTH: u32 = 1600;
pub const FIGURE_HEIGHT: u32 = 700;

const PANEL_WIDTH: u32 = 600;
const PANEL_HEIGHT: u32 = 460;
const PANEL_TOP: i64 = 120;
const PANEL_LEFTS: [i64; 2] = [140, 940];

const TRAIN_FILL: Rgb<u8> = hex(0x3498db);
const TRAIN_EDGE: Rgb<u8> = hex(0x00008b);
const TEST_FILL: Rgb<u8> = hex(0x2ecc71);
const TEST_EDGE: Rgb<u8> = hex(0x006400);

/// Actual and predicted targets of one partition, with its R².
#[derive(Debug, Clone, Copy)]
pub struct Series<'a> {
    pub actual: &'a [f64],
    pub predicted: &'a [f64],
    pub r2: f64,
}

impl Series<'_> {
    fn check(&self, set: &str) -> Result<()> {
        if self.actual.is_empty() {
            return Err(SvrError::visualization(format!("{set} set is empty")));
        }
        if self.actual.len() != self.predicted.len() {
            return Err(SvrError::visualization(format!(
                "{set} set has {} actual values but {} predictions",
                self.actual.len(),
                self.predicted.len()
            )));
        }
        Ok(())
    }

    fn residuals(&self) -> Vec<f64> {
        self.actual
            .iter()
            .zip(self.predicted)
            .map(|(a, p)| a - p)
            .collect()
    }
}

struct Style {
    set: &'static str,
    fill: Rgb<u8>,
    edge: Rgb<u8>,
}

const STYLES: [Style; 2] = [
    Style {
        set: "Training",
        fill: TRAIN_FILL,
        edge: TRAIN_EDGE,
    },
    Style {
        set: "Test",
        fill: TEST_FILL,
        edge: TEST_EDGE,
    },
];

fn panel(left: i64, x: AxisRange, y: AxisRange) -> Panel {
    Panel {
        left,
        top: PANEL_TOP,
        width: PANEL_WIDTH,
        height: PANEL_HEIGHT,
        x,
        y,
    }
}

fn extent(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// Predicted against actual for both partitions, with the identity line.
pub fn actual_vs_predicted(train: &Series, test: &Series) -> Result<PlotArtifact> {
    let mut canvas = Canvas::new(FIGURE_WIDTH, FIGURE_HEIGHT, WHITE);

    for ((series, style), left) in [train, test].into_iter().zip(&STYLES).zip(PANEL_LEFTS) {
        series.check(style.set)?;
        let both = series.actual.iter().chain(series.predicted);
        let range = AxisRange::covering(both)?;
        let (lo_a, hi_a) = extent(series.actual);
        let (lo_p, hi_p) = extent(series.predicted);
        let (lo, hi) = (lo_a.min(lo_p), hi_a.max(hi_p));

        let p = panel(left, range, range);
        let title = format!("{} Set - Actual vs Predicted\n(R² = {:.3})", style.set, series.r2);
        p.draw_axes(&mut canvas, &title, "Actual Values", "Predicted Values");
        p.scatter(&mut canvas, series.actual, series.predicted, style.fill, style.edge);
        p.reference_line(&mut canvas, (lo, lo), (hi, hi));
        p.legend(&mut canvas, "Perfect Prediction");
    }

    Ok(PlotArtifact::png(canvas.into_png()?))
}

/// Residual (actual - predicted) against prediction, with the zero line.
pub fn residuals(train: &Series, test: &Series) -> Result<PlotArtifact> {
    let mut canvas = Canvas::new(FIGURE_WIDTH, FIGURE_HEIGHT, WHITE);

    for ((series, style), left) in [train, test].into_iter().zip(&STYLES).zip(PANEL_LEFTS) {
        series.check(style.set)?;
        let residuals = series.residuals();
        let x = AxisRange::covering(series.predicted)?;
        let y = AxisRange::covering(residuals.iter().chain(&[0.0]))?;

        let p = panel(left, x, y);
        let title = format!("{} Set - Residuals Plot", style.set);
        p.draw_axes(&mut canvas, &title, "Predicted Values", "Residuals (Actual - Predicted)");
        p.scatter(&mut canvas, series.predicted, &residuals, style.fill, style.edge);
        p.reference_line(&mut canvas, (x.min, 0.0), (x.max, 0.0));
        p.legend(&mut canvas, "Zero Error Line");
    }

    Ok(PlotArtifact::png(canvas.into_png()?))
}

/// Both diagnostic figures of a fitted model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticPlots {
    pub actual_vs_predicted: PlotArtifact,
    pub residuals: PlotArtifact,
}

impl DiagnosticPlots {
    pub fn render(train: &Series, test: &Series) -> Result<Self> {
        Ok(DiagnosticPlots {
            actual_vs_predicted: actual_vs_predicted(train, test)?,
            residuals: residuals(train, test)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn series<'a>(actual: &'a [f64], predicted: &'a [f64]) -> Series<'a> {
        Series {
            actual,
            predicted,
            r2: 0.953,
        }
    }

    #[test]
    fn test_render_produces_png_data_uris() {
        let actual = [1.0, 2.0, 3.0, 4.0, 5.0];
        let predicted = [1.1, 1.8, 3.3, 3.9, 5.2];
        let test_actual = [2.5, 4.5];
        let test_predicted = [2.4, 4.9];
        let plots = DiagnosticPlots::render(
            &series(&actual, &predicted),
            &series(&test_actual, &test_predicted),
        )
        .unwrap();

        for artifact in [&plots.actual_vs_predicted, &plots.residuals] {
            let uri = artifact.to_data_uri();
            let payload = uri.strip_prefix("data:image/png;base64,").unwrap();
            let bytes = STANDARD.decode(payload).unwrap();
            assert_eq!(&bytes[..8], PNG_MAGIC);

            let decoded = image::load_from_memory(&bytes).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (FIGURE_WIDTH, FIGURE_HEIGHT));
        }
    }

    #[test]
    fn test_constant_series_is_padded_not_rejected() {
        let flat = [7.0, 7.0, 7.0];
        assert!(residuals(&series(&flat, &flat), &series(&flat, &flat)).is_ok());
        assert!(actual_vs_predicted(&series(&flat, &flat), &series(&flat, &flat)).is_ok());
    }

    #[test]
    fn test_bad_series_is_a_visualization_error() {
        let ok = [1.0, 2.0];
        let err = actual_vs_predicted(&series(&ok, &ok), &series(&[], &[])).unwrap_err();
        assert_eq!(err.kind(), "VisualizationError");

        let nan = [1.0, f64::NAN];
        assert!(residuals(&series(&ok, &nan), &series(&ok, &ok)).is_err());
        assert!(residuals(&series(&ok, &[1.0]), &series(&ok, &ok)).is_err());
    }
}
