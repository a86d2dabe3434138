use std::io::Cursor;

use image::{ImageFormat, RgbImage};
use svrlab_core::{Result, SvrError};

use crate::font::{self, ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH};

pub use image::Rgb;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Build a colour from a `0xRRGGBB` literal.
pub const fn hex(rgb: u32) -> Rgb<u8> {
    Rgb([(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8])
}

/// An owned RGB raster. Each figure draws on its own canvas and consumes it
/// when encoding, so nothing is shared between renders.
pub struct Canvas {
    img: RgbImage,
}

// ─── Construction ───────────────────────────────────────────────────────────

impl Canvas {
    pub fn new(width: u32, height: u32, background: Rgb<u8>) -> Self {
        Canvas {
            img: RgbImage::from_pixel(width, height, background),
        }
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }

    pub fn height(&self) -> u32 {
        self.img.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        *self.img.get_pixel(x, y)
    }

    /// Encode as PNG, consuming the canvas.
    pub fn into_png(self) -> Result<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        self.img
            .write_to(&mut buf, ImageFormat::Png)
            .map_err(|e| SvrError::visualization(e.to_string()))?;
        Ok(buf.into_inner())
    }
}

// ─── Primitives ─────────────────────────────────────────────────────────────

impl Canvas {
    /// Alpha-blend `color` over the pixel at `(x, y)`; off-canvas writes are ignored.
    pub fn blend(&mut self, x: i64, y: i64, color: Rgb<u8>, alpha: f64) {
        if x < 0 || y < 0 || x >= self.width() as i64 || y >= self.height() as i64 {
            return;
        }
        let px = self.img.get_pixel_mut(x as u32, y as u32);
        let a = alpha.clamp(0.0, 1.0);
        for (dst, src) in px.0.iter_mut().zip(color.0) {
            *dst = (*dst as f64 * (1.0 - a) + src as f64 * a).round() as u8;
        }
    }

    pub fn put(&mut self, x: i64, y: i64, color: Rgb<u8>) {
        self.blend(x, y, color, 1.0);
    }

    pub fn fill_rect(&mut self, x: i64, y: i64, w: u32, h: u32, color: Rgb<u8>, alpha: f64) {
        for yy in y..y + h as i64 {
            for xx in x..x + w as i64 {
                self.blend(xx, yy, color, alpha);
            }
        }
    }

    pub fn stroke_rect(&mut self, x: i64, y: i64, w: u32, h: u32, color: Rgb<u8>) {
        let (x1, y1) = (x + w as i64 - 1, y + h as i64 - 1);
        self.line(x, y, x1, y, color, 1);
        self.line(x, y1, x1, y1, color, 1);
        self.line(x, y, x, y1, color, 1);
        self.line(x1, y, x1, y1, color, 1);
    }

    /// Bresenham line stamped with a square brush of `thickness` pixels.
    pub fn line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>, thickness: u32) {
        self.line_pattern(x0, y0, x1, y1, color, thickness, None);
    }

    /// Like [`Canvas::line`] but alternating `dash` drawn and `gap` skipped pixels.
    pub fn dashed_line(
        &mut self,
        (x0, y0): (i64, i64),
        (x1, y1): (i64, i64),
        color: Rgb<u8>,
        thickness: u32,
        (dash, gap): (u32, u32),
    ) {
        self.line_pattern(x0, y0, x1, y1, color, thickness, Some((dash, gap)));
    }

    #[allow(clippy::too_many_arguments)]
    fn line_pattern(
        &mut self,
        mut x0: i64,
        mut y0: i64,
        x1: i64,
        y1: i64,
        color: Rgb<u8>,
        thickness: u32,
        pattern: Option<(u32, u32)>,
    ) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let half = thickness as i64 / 2;
        let mut step = 0u32;

        loop {
            let on = match pattern {
                Some((dash, gap)) => step % (dash + gap).max(1) < dash,
                None => true,
            };
            if on {
                for oy in -half..thickness as i64 - half {
                    for ox in -half..thickness as i64 - half {
                        self.put(x0 + ox, y0 + oy, color);
                    }
                }
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
            step += 1;
        }
    }

    /// Filled disc with a one pixel outline, both blended with `alpha`.
    pub fn marker(&mut self, cx: i64, cy: i64, radius: u32, fill: Rgb<u8>, edge: Rgb<u8>, alpha: f64) {
        let r = radius as i64;
        let outer = (r * r) as f64 + r as f64;
        let inner = ((r - 1) * (r - 1)) as f64 + (r - 1) as f64;
        for dy in -r..=r {
            for dx in -r..=r {
                let d = (dx * dx + dy * dy) as f64;
                if d <= inner {
                    self.blend(cx + dx, cy + dy, fill, alpha);
                } else if d <= outer {
                    self.blend(cx + dx, cy + dy, edge, alpha);
                }
            }
        }
    }
}

// ─── Text ───────────────────────────────────────────────────────────────────

impl Canvas {
    /// Draw text with its top-left corner at `(x, y)`. `\n` starts a new line.
    pub fn text(&mut self, x: i64, y: i64, text: &str, scale: u32, color: Rgb<u8>) {
        let line_height = ((GLYPH_HEIGHT + 3) * scale) as i64;
        for (row, line) in text.split('\n').enumerate() {
            let top = y + row as i64 * line_height;
            for (k, c) in line.chars().enumerate() {
                let left = x + (k as u32 * ADVANCE * scale) as i64;
                self.glyph(left, top, c, scale, color, false);
            }
        }
    }

    /// Draw text horizontally centred on `cx`, line by line.
    pub fn text_centered(&mut self, cx: i64, y: i64, text: &str, scale: u32, color: Rgb<u8>) {
        let line_height = ((GLYPH_HEIGHT + 3) * scale) as i64;
        for (row, line) in text.split('\n').enumerate() {
            let w = font::text_width(line, scale) as i64;
            self.text(cx - w / 2, y + row as i64 * line_height, line, scale, color);
        }
    }

    /// Draw a single line rotated a quarter turn counter-clockwise, centred on `cy`.
    pub fn text_vertical(&mut self, x: i64, cy: i64, text: &str, scale: u32, color: Rgb<u8>) {
        let w = font::text_width(text, scale) as i64;
        let bottom = cy + w / 2;
        for (k, c) in text.chars().enumerate() {
            let offset = (k as u32 * ADVANCE * scale) as i64;
            self.glyph(x, bottom - offset, c, scale, color, true);
        }
    }

    pub fn text_height(lines: usize, scale: u32) -> u32 {
        if lines == 0 {
            return 0;
        }
        (GLYPH_HEIGHT * lines as u32 + 3 * (lines as u32 - 1)) * scale
    }

    fn glyph(&mut self, x: i64, y: i64, c: char, scale: u32, color: Rgb<u8>, rotated: bool) {
        let bits = font::glyph(c);
        let s = scale as i64;
        for (row, pattern) in bits.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if pattern & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                // rotated: columns run bottom to top, rows left to right
                let (px, py) = if rotated {
                    (x + row as i64 * s, y - (col as i64 + 1) * s)
                } else {
                    (x + col as i64 * s, y + row as i64 * s)
                };
                for oy in 0..s {
                    for ox in 0..s {
                        self.put(px + ox, py + oy, color);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fills_background() {
        let canvas = Canvas::new(4, 3, WHITE);
        assert_eq!((canvas.width(), canvas.height()), (4, 3));
        assert_eq!(canvas.pixel(3, 2), WHITE);
    }

    #[test]
    fn test_blend_and_clipping() {
        let mut canvas = Canvas::new(2, 2, WHITE);
        canvas.blend(0, 0, BLACK, 0.5);
        assert_eq!(canvas.pixel(0, 0), Rgb([128, 128, 128]));
        // off-canvas writes do nothing
        canvas.put(-1, 5, BLACK);
        canvas.line(-10, -10, 10, 10, BLACK, 1);
        assert_eq!(canvas.pixel(1, 1), BLACK);
    }

    #[test]
    fn test_dashed_line_leaves_gaps() {
        let mut canvas = Canvas::new(20, 1, WHITE);
        canvas.dashed_line((0, 0), (19, 0), BLACK, 1, (4, 4));
        assert_eq!(canvas.pixel(0, 0), BLACK);
        assert_eq!(canvas.pixel(5, 0), WHITE);
        assert_eq!(canvas.pixel(8, 0), BLACK);
    }

    #[test]
    fn test_text_draws_pixels() {
        let mut canvas = Canvas::new(40, 20, WHITE);
        canvas.text(1, 1, "T", 1, BLACK);
        // top bar of the T
        assert_eq!(canvas.pixel(1, 1), BLACK);
        assert_eq!(canvas.pixel(5, 1), BLACK);
        assert_eq!(canvas.pixel(1, 3), WHITE);
        assert_eq!(Canvas::text_height(2, 1), 17);
    }

    #[test]
    fn test_png_signature() {
        let png = Canvas::new(8, 8, hex(0x3498db)).into_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
