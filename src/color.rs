//! CSS color strings for the canvas tools
//!
//! Accepts what a browser canvas `fillStyle` would: hex (`#RGB`, `#RGBA`,
//! `#RRGGBB`, `#RRGGBBAA`), functional notation (`rgb()`, `rgba()`, `hsl()`,
//! `hsla()`, `hwb()`, `oklch()`) and named colors including `transparent`.

use image::Rgba;
use lightningcss::traits::Parse;
use lightningcss::values::color::{CssColor, FloatColor};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("empty color string")]
    Empty,
    /// Hex body must be 3, 4, 6, or 8 digits
    #[error("invalid hex length {0}, expected 3, 4, 6, or 8 digits")]
    InvalidLength(usize),
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    #[error("{0}")]
    CssParse(String),
}

/// Parse a CSS color string into straight (non-premultiplied) RGBA.
///
/// ```
/// use image_mcp::color::parse_color;
///
/// assert_eq!(parse_color("#F00").unwrap(), image::Rgba([255, 0, 0, 255]));
/// assert_eq!(parse_color("rgb(0, 255, 0)").unwrap(), image::Rgba([0, 255, 0, 255]));
/// assert_eq!(parse_color("blue").unwrap(), image::Rgba([0, 0, 255, 255]));
/// assert_eq!(parse_color("transparent").unwrap()[3], 0);
/// ```
pub fn parse_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }
    match s.strip_prefix('#') {
        Some(hex) => parse_hex(hex),
        None => parse_css(s),
    }
}

fn parse_hex(hex: &str) -> Result<Rgba<u8>, ColorError> {
    if let Some(bad) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(bad));
    }

    // All digits are ASCII hex from here on, so byte slicing is safe.
    let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|d| d * 17);
    let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
    let channels = match hex.len() {
        3 => [digit(0), digit(1), digit(2), Ok(255)],
        4 => [digit(0), digit(1), digit(2), digit(3)],
        6 => [pair(0), pair(2), pair(4), Ok(255)],
        8 => [pair(0), pair(2), pair(4), pair(6)],
        len => return Err(ColorError::InvalidLength(len)),
    };

    let mut rgba = [0u8; 4];
    for (slot, value) in rgba.iter_mut().zip(channels) {
        *slot = value.map_err(|e| ColorError::CssParse(e.to_string()))?;
    }
    Ok(Rgba(rgba))
}

fn parse_css(s: &str) -> Result<Rgba<u8>, ColorError> {
    let color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;

    // Convert to sRGB first so hsl/hwb/oklch all land in the same shape
    let rgb = color
        .to_rgb()
        .map_err(|_| ColorError::CssParse(format!("cannot convert '{}' to RGB", s)))?;

    match rgb {
        CssColor::RGBA(c) => Ok(Rgba([c.red, c.green, c.blue, c.alpha])),
        CssColor::Float(float) => match float.as_ref() {
            FloatColor::RGB(c) => {
                let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
                Ok(Rgba([channel(c.r), channel(c.g), channel(c.b), channel(c.alpha)]))
            }
            _ => Err(ColorError::CssParse(format!("unsupported color space in '{}'", s))),
        },
        _ => Err(ColorError::CssParse(format!("'{}' is not an RGB color", s))),
    }
}
