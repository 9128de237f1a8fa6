//! draw_text: text onto an image or a fresh transparent canvas.

use std::path::PathBuf;

use image::{DynamicImage, RgbaImage};
use schemars::JsonSchema;
use serde::Deserialize;

use super::{check_dimension, color_arg};
use crate::error::ToolError;
use crate::format::ImageKind;
use crate::mcp::registry::ToolInput;
use crate::output::{open_image, save_image};
use crate::raster::{draw_text, FontLibrary, TextStyle};

const MAX_FONT_SIZE: f32 = 2048.0;
/// Text may start at most this far from the origin on either axis.
const MAX_OFFSET: f32 = 1_000_000.0;

fn default_x() -> f32 {
    10.0
}
fn default_y() -> f32 {
    50.0
}
fn default_font_size() -> f32 {
    24.0
}
fn default_font_family() -> String {
    "sans-serif".to_string()
}
fn default_color() -> String {
    "#000000".to_string()
}
fn default_width() -> u32 {
    800
}
fn default_height() -> u32 {
    600
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DrawTextInput {
    /// Image to draw on. A transparent width x height canvas is used when omitted.
    pub input_path: Option<PathBuf>,

    /// Where to write the result. Parent directories are created.
    pub output_path: PathBuf,

    /// Text to draw. Newlines start a new line.
    pub text: String,

    /// Left edge of the text, in pixels.
    #[serde(default = "default_x")]
    pub x: f32,

    /// Baseline of the first line, in pixels.
    #[serde(default = "default_y")]
    pub y: f32,

    /// Font size in pixels.
    #[serde(default = "default_font_size")]
    pub font_size: f32,

    /// Font family name (sans-serif, serif, monospace or an installed font), or a font file path.
    #[serde(default = "default_font_family")]
    pub font_family: String,

    /// Text color as a CSS color.
    #[serde(default = "default_color")]
    pub color: String,

    /// Width of the new canvas when inputPath is omitted.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Height of the new canvas when inputPath is omitted.
    #[serde(default = "default_height")]
    pub height: u32,
}

impl ToolInput for DrawTextInput {
    fn validate(&self, tool: &'static str) -> Result<(), ToolError> {
        if self.text.is_empty() {
            return Err(ToolError::invalid(tool, "text must not be empty"));
        }
        if !(self.font_size > 0.0 && self.font_size <= MAX_FONT_SIZE) {
            return Err(ToolError::invalid(
                tool,
                format!("fontSize must be greater than 0 and at most {}", MAX_FONT_SIZE),
            ));
        }
        if !(self.x.abs() <= MAX_OFFSET && self.y.abs() <= MAX_OFFSET) {
            return Err(ToolError::invalid(
                tool,
                format!("x and y must be between -{0} and {0}", MAX_OFFSET),
            ));
        }
        check_dimension(tool, "width", self.width)?;
        check_dimension(tool, "height", self.height)
    }
}

pub fn run_draw_text(fonts: &FontLibrary, input: DrawTextInput) -> Result<String, ToolError> {
    let color = color_arg(&input.color)?;
    let mut canvas = match &input.input_path {
        Some(path) => open_image(path)?.to_rgba8(),
        None => RgbaImage::new(input.width, input.height),
    };
    let font = fonts.load(&input.font_family)?;

    let style = TextStyle { x: input.x, y: input.y, size: input.font_size, color };
    draw_text(&mut canvas, &font, &input.text, style);

    save_image(
        &DynamicImage::ImageRgba8(canvas),
        &input.output_path,
        ImageKind::from_path(&input.output_path),
    )?;
    Ok(format!("Drew text on image saved to {}", input.output_path.display()))
}
