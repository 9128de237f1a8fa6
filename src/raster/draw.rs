//! Source-over compositing and rectangle rasterization.
//!
//! Coordinates are signed so shapes and layers may start off-canvas; whatever
//! falls outside the canvas is clipped.

use image::{Rgba, RgbaImage};

/// Axis-aligned rectangle with its top-left corner at (`x`, `y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Intersection with a `w`x`h` canvas as half-open ranges, if non-empty.
    fn clip(&self, w: u32, h: u32) -> Option<(std::ops::Range<u32>, std::ops::Range<u32>)> {
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = self.x.saturating_add(self.width as i64).min(w as i64);
        let y1 = self.y.saturating_add(self.height as i64).min(h as i64);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32..x1 as u32, y0 as u32..y1 as u32))
    }
}

/// Porter-Duff "source over": `src` with its alpha scaled by `opacity`, onto `dst`.
pub fn blend_over(dst: &Rgba<u8>, src: &Rgba<u8>, opacity: f32) -> Rgba<u8> {
    let src_alpha = (src[3] as f32 / 255.0) * opacity.clamp(0.0, 1.0);
    if src_alpha <= 0.0 {
        return *dst;
    }
    let dst_alpha = dst[3] as f32 / 255.0;

    // out_alpha = src_alpha + dst_alpha * (1 - src_alpha)
    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);
    if out_alpha <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |s: u8, d: u8| -> u8 {
        let s = s as f32 / 255.0;
        let d = d as f32 / 255.0;
        let out = (s * src_alpha + d * dst_alpha * (1.0 - src_alpha)) / out_alpha;
        (out.clamp(0.0, 1.0) * 255.0).round() as u8
    };

    Rgba([
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_alpha * 255.0).round() as u8,
    ])
}

/// Blend `color` onto one canvas pixel with partial `coverage` (0.0-1.0).
/// Out-of-bounds coordinates are ignored.
pub fn blend_pixel(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    let blended = blend_over(canvas.get_pixel(x, y), &color, coverage);
    canvas.put_pixel(x, y, blended);
}

/// Draw `layer` onto `canvas` with its top-left corner at (`x`, `y`).
pub fn composite(canvas: &mut RgbaImage, layer: &RgbaImage, x: i64, y: i64) {
    let area = Rect::new(x, y, layer.width(), layer.height());
    let Some((xs, ys)) = area.clip(canvas.width(), canvas.height()) else {
        return;
    };
    for cy in ys {
        for cx in xs.clone() {
            let src = layer.get_pixel((cx as i64 - x) as u32, (cy as i64 - y) as u32);
            // Fully transparent source, skip
            if src[3] == 0 {
                continue;
            }
            let blended = blend_over(canvas.get_pixel(cx, cy), src, 1.0);
            canvas.put_pixel(cx, cy, blended);
        }
    }
}

pub fn fill_rect(canvas: &mut RgbaImage, rect: Rect, color: Rgba<u8>) {
    let Some((xs, ys)) = rect.clip(canvas.width(), canvas.height()) else {
        return;
    };
    for y in ys {
        for x in xs.clone() {
            let blended = blend_over(canvas.get_pixel(x, y), &color, 1.0);
            canvas.put_pixel(x, y, blended);
        }
    }
}

/// Outline `rect` with a border `line_width` pixels thick, drawn inside its bounds.
///
/// Each pixel is blended once, so translucent strokes don't darken at corners.
pub fn stroke_rect(canvas: &mut RgbaImage, rect: Rect, color: Rgba<u8>, line_width: u32) {
    if line_width == 0 {
        return;
    }
    let Some((xs, ys)) = rect.clip(canvas.width(), canvas.height()) else {
        return;
    };
    let t = line_width as i64;
    let (w, h) = (rect.width as i64, rect.height as i64);
    for y in ys {
        let dy = y as i64 - rect.y;
        for x in xs.clone() {
            let dx = x as i64 - rect.x;
            let on_edge = dx < t || dx >= w - t || dy < t || dy >= h - t;
            if on_edge {
                let blended = blend_over(canvas.get_pixel(x, y), &color, 1.0);
                canvas.put_pixel(x, y, blended);
            }
        }
    }
}
