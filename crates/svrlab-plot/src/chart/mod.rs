//! Cartesian panels laid out on a [`Canvas`].

pub mod diagnostics;

use svrlab_core::{Result, SvrError};

use crate::canvas::{hex, Canvas, Rgb, BLACK};
use crate::font;

const GRID: Rgb<u8> = Rgb([220, 220, 220]);
const TICK_LABEL: Rgb<u8> = Rgb([60, 60, 60]);

/// Closed data interval shown along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Smallest interval covering `values`, widened by 5% on both sides.
    /// A zero-width interval is widened to a unit (or relative) span instead.
    pub fn covering<'a>(values: impl IntoIterator<Item = &'a f64>) -> Result<Self> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut any = false;
        for &v in values {
            if !v.is_finite() {
                return Err(SvrError::visualization("cannot plot non-finite values"));
            }
            min = min.min(v);
            max = max.max(v);
            any = true;
        }
        if !any {
            return Err(SvrError::visualization("cannot plot an empty series"));
        }
        Ok(AxisRange { min, max }.padded())
    }

    fn padded(self) -> Self {
        let span = self.max - self.min;
        let pad = if span > 0.0 {
            span * 0.05
        } else {
            (self.min.abs() * 0.1).max(0.5)
        };
        AxisRange {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Roughly five evenly spaced round values inside the range.
    pub fn ticks(&self) -> Vec<f64> {
        let step = nice_step(self.span() / 5.0);
        let first = (self.min / step).ceil() * step;
        (0..)
            .map(|k| first + k as f64 * step)
            .take_while(|t| *t <= self.max + step * 1e-9)
            .take(12)
            .collect()
    }
}

fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Compact tick label: integers stay integral, tiny and huge values go scientific.
pub fn format_tick(v: f64) -> String {
    let a = v.abs();
    if a != 0.0 && !(1e-3..1e5).contains(&a) {
        format!("{:.1e}", v)
    } else if (v - v.round()).abs() < 1e-9 {
        format!("{}", v.round() as i64)
    } else {
        let s = format!("{:.3}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// One set of axes: a pixel rectangle mapped onto data ranges.
pub struct Panel {
    pub left: i64,
    pub top: i64,
    pub width: u32,
    pub height: u32,
    pub x: AxisRange,
    pub y: AxisRange,
}

impl Panel {
    pub fn to_px(&self, x: f64, y: f64) -> (i64, i64) {
        let fx = (x - self.x.min) / self.x.span();
        let fy = (y - self.y.min) / self.y.span();
        (
            self.left + (fx * (self.width - 1) as f64).round() as i64,
            self.top + ((1.0 - fy) * (self.height - 1) as f64).round() as i64,
        )
    }

    fn right(&self) -> i64 {
        self.left + self.width as i64 - 1
    }

    fn bottom(&self) -> i64 {
        self.top + self.height as i64 - 1
    }

    /// Grid, frame, tick labels, axis labels and the (possibly multi-line) title.
    pub fn draw_axes(&self, canvas: &mut Canvas, title: &str, x_label: &str, y_label: &str) {
        for t in self.x.ticks() {
            let (px, _) = self.to_px(t, self.y.min);
            canvas.line(px, self.top, px, self.bottom(), GRID, 1);
            canvas.line(px, self.bottom(), px, self.bottom() + 5, BLACK, 1);
            canvas.text_centered(px, self.bottom() + 10, &format_tick(t), 2, TICK_LABEL);
        }
        for t in self.y.ticks() {
            let (_, py) = self.to_px(self.x.min, t);
            canvas.line(self.left, py, self.right(), py, GRID, 1);
            canvas.line(self.left - 5, py, self.left, py, BLACK, 1);
            let label = format_tick(t);
            let w = font::text_width(&label, 2) as i64;
            canvas.text(self.left - 10 - w, py - 7, &label, 2, TICK_LABEL);
        }
        canvas.stroke_rect(self.left, self.top, self.width, self.height, BLACK);

        let cx = self.left + self.width as i64 / 2;
        let cy = self.top + self.height as i64 / 2;
        canvas.text_centered(cx, self.bottom() + 40, x_label, 2, BLACK);
        canvas.text_vertical(self.left - 95, cy, y_label, 2, BLACK);

        let lines = title.split('\n').count();
        let title_height = Canvas::text_height(lines, 3) as i64;
        canvas.text_centered(cx, self.top - 15 - title_height, title, 3, BLACK);
    }

    pub fn scatter(&self, canvas: &mut Canvas, xs: &[f64], ys: &[f64], fill: Rgb<u8>, edge: Rgb<u8>) {
        for (&x, &y) in xs.iter().zip(ys) {
            let (px, py) = self.to_px(x, y);
            canvas.marker(px, py, 5, fill, edge, 0.7);
        }
    }

    /// Dashed reference line between two data points.
    pub fn reference_line(&self, canvas: &mut Canvas, from: (f64, f64), to: (f64, f64)) {
        let a = self.to_px(from.0, from.1);
        let b = self.to_px(to.0, to.1);
        canvas.dashed_line(a, b, REFERENCE, 3, (12, 8));
    }

    /// Legend box in the upper-left corner with a dashed sample line.
    pub fn legend(&self, canvas: &mut Canvas, label: &str) {
        let w = font::text_width(label, 2) + 70;
        let (x, y) = (self.left + 12, self.top + 12);
        canvas.fill_rect(x, y, w, 32, hex(0xffffff), 0.85);
        canvas.stroke_rect(x, y, w, 32, GRID);
        canvas.dashed_line((x + 10, y + 16), (x + 48, y + 16), REFERENCE, 3, (12, 8));
        canvas.text(x + 58, y + 9, label, 2, BLACK);
    }
}

pub const REFERENCE: Rgb<u8> = Rgb([220, 30, 30]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_padding() {
        let r = AxisRange::covering(&[0.0, 10.0]).unwrap();
        assert_eq!((r.min, r.max), (-0.5, 10.5));

        // all values equal
        let flat = AxisRange::covering(&[3.0, 3.0]).unwrap();
        assert!(flat.span() > 0.0);
        assert!(flat.min < 3.0 && flat.max > 3.0);
    }

    #[test]
    fn test_range_rejects_bad_series() {
        assert_eq!(
            AxisRange::covering(std::iter::empty::<&f64>())
                .unwrap_err()
                .kind(),
            "VisualizationError"
        );
        assert!(AxisRange::covering(&[1.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_ticks_are_round_and_inside() {
        let r = AxisRange { min: -0.3, max: 9.7 };
        let ticks = r.ticks();
        assert_eq!(ticks, vec![0.0, 2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(4.0), "4");
        assert_eq!(format_tick(-0.25), "-0.25");
        assert_eq!(format_tick(0.0), "0");
        assert_eq!(format_tick(250000.0), "2.5e5");
    }

    #[test]
    fn test_to_px_corners() {
        let panel = Panel {
            left: 10,
            top: 20,
            width: 101,
            height: 51,
            x: AxisRange { min: 0.0, max: 1.0 },
            y: AxisRange { min: 0.0, max: 1.0 },
        };
        assert_eq!(panel.to_px(0.0, 0.0), (10, 70));
        assert_eq!(panel.to_px(1.0, 1.0), (110, 20));
    }
}
