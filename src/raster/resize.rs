//! Resizing with the fit modes callers know from CSS `object-fit`.

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::MAX_DIMENSION;

/// How the image is fitted to the requested box when both sides are given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Fit {
    /// Scale to cover the box, then crop the overflow (centered).
    #[default]
    Cover,
    /// Scale to fit inside the box, padding the rest with transparency.
    Contain,
    /// Stretch to the exact box, ignoring aspect ratio.
    Fill,
    /// Scale to fit inside the box, keeping aspect ratio. No padding.
    Inside,
    /// Scale to cover the box, keeping aspect ratio. No cropping.
    Outside,
}

const FILTER: FilterType = FilterType::Lanczos3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResizeError {
    #[error("at least one of width or height is required")]
    NoDimensions,

    #[error("resized image would be {width}x{height}; each side must be at most {max}", max = MAX_DIMENSION)]
    TooLarge { width: u64, height: u64 },
}

/// Resize `image` to `width` and/or `height`. With only one side the other
/// follows the source aspect ratio and `fit` is irrelevant.
///
/// The output size is worked out before any pixels are allocated; a result
/// with a side above [`MAX_DIMENSION`] is refused.
pub fn resize(
    image: &DynamicImage,
    width: Option<u32>,
    height: Option<u32>,
    fit: Fit,
) -> Result<DynamicImage, ResizeError> {
    let (src_w, src_h) = (image.width(), image.height());
    let (w, h) = match (width, height) {
        (None, None) => return Err(ResizeError::NoDimensions),
        (Some(w), None) => (w as u64, scale_side(src_h, w, src_w)),
        (None, Some(h)) => (scale_side(src_w, h, src_h), h as u64),
        (Some(w), Some(h)) => (w as u64, h as u64),
    };
    let (w, h) = checked_dims(w, h)?;
    if width.is_none() || height.is_none() {
        return Ok(image.resize_exact(w, h, FILTER));
    }

    let resized = match fit {
        Fit::Fill => image.resize_exact(w, h, FILTER),
        Fit::Cover => image.resize_to_fill(w, h, FILTER),
        Fit::Inside => image.resize(w, h, FILTER),
        Fit::Contain => {
            let inner = image.resize(w, h, FILTER).to_rgba8();
            let mut canvas = RgbaImage::new(w, h);
            let x = (w - inner.width()) / 2;
            let y = (h - inner.height()) / 2;
            imageops::overlay(&mut canvas, &inner, x as i64, y as i64);
            DynamicImage::ImageRgba8(canvas)
        }
        Fit::Outside => {
            let (out_w, out_h) = outside_dims(src_w, src_h, w, h);
            let (out_w, out_h) = checked_dims(out_w, out_h)?;
            image.resize_exact(out_w, out_h, FILTER)
        }
    };
    Ok(resized)
}

fn checked_dims(width: u64, height: u64) -> Result<(u32, u32), ResizeError> {
    let limit = MAX_DIMENSION as u64;
    if width > limit || height > limit {
        return Err(ResizeError::TooLarge { width, height });
    }
    Ok((width as u32, height as u32))
}

/// Smallest aspect-preserving size that covers `w` x `h`.
fn outside_dims(src_w: u32, src_h: u32, w: u32, h: u32) -> (u64, u64) {
    let scale = (w as f64 / src_w.max(1) as f64).max(h as f64 / src_h.max(1) as f64);
    let out_w = to_side(src_w as f64 * scale).max(w as u64);
    let out_h = to_side(src_h as f64 * scale).max(h as u64);
    (out_w, out_h)
}

/// `side * target / reference`, rounded, at least 1.
fn scale_side(side: u32, target: u32, reference: u32) -> u64 {
    to_side(side as f64 * target as f64 / reference.max(1) as f64)
}

// `as` saturates, so out-of-range values land above the limit instead of wrapping
fn to_side(value: f64) -> u64 {
    (value.round() as u64).max(1)
}
