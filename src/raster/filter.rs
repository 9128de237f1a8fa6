//! Whole-image color and convolution filters.

use std::fmt;

use image::{DynamicImage, Rgba, RgbaImage};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BLUR_SIGMA: f32 = 2.0;
pub const DEFAULT_SHARPEN_SIGMA: f32 = 1.0;
pub const DEFAULT_BRIGHTNESS: f32 = 1.2;
pub const DEFAULT_CONTRAST: f32 = 20.0;
pub const DEFAULT_HUE_DEGREES: i32 = 90;

/// Largest accepted blur/sharpen sigma.
pub const MAX_SIGMA: f32 = 1000.0;
/// Largest accepted brightness multiplier.
pub const MAX_BRIGHTNESS: f32 = 10.0;
/// Contrast percent is accepted in `-MAX_CONTRAST..=MAX_CONTRAST`.
pub const MAX_CONTRAST: f32 = 100.0;

/// Unsharp-mask threshold; differences below this are left alone.
const SHARPEN_THRESHOLD: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    Blur,
    Sharpen,
    Grayscale,
    Sepia,
    Invert,
    Brightness,
    Contrast,
    HueRotate,
}

impl Filter {
    pub fn as_str(self) -> &'static str {
        match self {
            Filter::Blur => "blur",
            Filter::Sharpen => "sharpen",
            Filter::Grayscale => "grayscale",
            Filter::Sepia => "sepia",
            Filter::Invert => "invert",
            Filter::Brightness => "brightness",
            Filter::Contrast => "contrast",
            Filter::HueRotate => "hue_rotate",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional filter parameters. Each filter reads only the one it needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FilterOptions {
    /// Gaussian sigma for `blur` (default 2.0) and `sharpen` (default 1.0), in (0, 1000].
    pub sigma: Option<f32>,

    /// Multiplier for `brightness` in [0, 10] (default 1.2); percent for `contrast`
    /// in [-100, 100] (default 20).
    pub amount: Option<f32>,

    /// Rotation for `hue_rotate`, in degrees (default 90).
    pub degrees: Option<i32>,
}

/// Apply `filter` to `image`, returning the filtered copy.
pub fn apply(image: &DynamicImage, filter: Filter, options: &FilterOptions) -> DynamicImage {
    match filter {
        Filter::Blur => image.blur(options.sigma.unwrap_or(DEFAULT_BLUR_SIGMA)),
        Filter::Sharpen => {
            image.unsharpen(options.sigma.unwrap_or(DEFAULT_SHARPEN_SIGMA), SHARPEN_THRESHOLD)
        }
        Filter::Grayscale => image.grayscale(),
        Filter::Invert => {
            let mut out = image.clone();
            out.invert();
            out
        }
        Filter::Contrast => image.adjust_contrast(options.amount.unwrap_or(DEFAULT_CONTRAST)),
        Filter::HueRotate => image.huerotate(options.degrees.unwrap_or(DEFAULT_HUE_DEGREES)),
        Filter::Brightness => {
            let factor = options.amount.unwrap_or(DEFAULT_BRIGHTNESS);
            map_rgb(image, |[r, g, b]| [r * factor, g * factor, b * factor])
        }
        Filter::Sepia => map_rgb(image, |[r, g, b]| {
            [
                0.393 * r + 0.769 * g + 0.189 * b,
                0.349 * r + 0.686 * g + 0.168 * b,
                0.272 * r + 0.534 * g + 0.131 * b,
            ]
        }),
    }
}

/// Per-pixel transform of the color channels; alpha is kept.
fn map_rgb(image: &DynamicImage, f: impl Fn([f32; 3]) -> [f32; 3]) -> DynamicImage {
    let src = image.to_rgba8();
    let out = RgbaImage::from_fn(src.width(), src.height(), |x, y| {
        let p = src.get_pixel(x, y);
        let [r, g, b] = f([p[0] as f32, p[1] as f32, p[2] as f32]);
        let clamp = |v: f32| v.round().clamp(0.0, 255.0) as u8;
        Rgba([clamp(r), clamp(g), clamp(b), p[3]])
    });
    DynamicImage::ImageRgba8(out)
}
