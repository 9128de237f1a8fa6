//! draw_rectangle: filled and/or outlined rectangle.

use std::path::PathBuf;

use image::{DynamicImage, Rgba};
use schemars::JsonSchema;
use serde::Deserialize;

use super::color_arg;
use crate::error::ToolError;
use crate::format::ImageKind;
use crate::mcp::registry::ToolInput;
use crate::output::{open_image, save_image};
use crate::raster::{fill_rect, stroke_rect, Rect};

const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

fn default_line_width() -> u32 {
    1
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DrawRectangleInput {
    /// Image to draw on.
    pub input_path: PathBuf,

    /// Where to write the result. Parent directories are created.
    pub output_path: PathBuf,

    /// Left edge in pixels. May be negative.
    pub x: i64,

    /// Top edge in pixels. May be negative.
    pub y: i64,

    /// Rectangle width in pixels.
    pub width: u32,

    /// Rectangle height in pixels.
    pub height: u32,

    /// Fill color. Black is used when neither fillColor nor strokeColor is given.
    pub fill_color: Option<String>,

    /// Outline color. The outline is drawn inside the rectangle.
    pub stroke_color: Option<String>,

    /// Outline thickness in pixels.
    #[serde(default = "default_line_width")]
    pub line_width: u32,
}

impl ToolInput for DrawRectangleInput {
    fn validate(&self, tool: &'static str) -> Result<(), ToolError> {
        if self.width == 0 || self.height == 0 {
            return Err(ToolError::invalid(tool, "width and height must be at least 1"));
        }
        if self.line_width == 0 {
            return Err(ToolError::invalid(tool, "lineWidth must be at least 1"));
        }
        Ok(())
    }
}

pub fn run_draw_rectangle(input: DrawRectangleInput) -> Result<String, ToolError> {
    let fill = input.fill_color.as_deref().map(color_arg).transpose()?;
    let stroke = input.stroke_color.as_deref().map(color_arg).transpose()?;
    let fill = match (fill, stroke) {
        (None, None) => Some(BLACK),
        (fill, _) => fill,
    };

    let mut canvas = open_image(&input.input_path)?.to_rgba8();
    let rect = Rect::new(input.x, input.y, input.width, input.height);
    if let Some(color) = fill {
        fill_rect(&mut canvas, rect, color);
    }
    if let Some(color) = stroke {
        stroke_rect(&mut canvas, rect, color, input.line_width);
    }

    save_image(
        &DynamicImage::ImageRgba8(canvas),
        &input.output_path,
        ImageKind::from_path(&input.output_path),
    )?;
    Ok(format!("Drew rectangle on image saved to {}", input.output_path.display()))
}
