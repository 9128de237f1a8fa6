//! create_image: solid-color canvas.

use std::path::PathBuf;

use image::{DynamicImage, RgbaImage};
use schemars::JsonSchema;
use serde::Deserialize;

use super::{check_dimension, color_arg};
use crate::error::ToolError;
use crate::format::ImageKind;
use crate::mcp::registry::ToolInput;
use crate::output::save_image;

fn default_background() -> String {
    "#ffffff".to_string()
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateImageInput {
    /// Canvas width in pixels (1-16384).
    pub width: u32,

    /// Canvas height in pixels (1-16384).
    pub height: u32,

    /// Fill color: hex (#rgb, #rrggbb, #rrggbbaa), rgb()/hsl() or a CSS color name.
    #[serde(default = "default_background")]
    pub background_color: String,

    /// Output encoding. Taken from the outputPath extension when omitted.
    pub format: Option<ImageKind>,

    /// Where to write the image. Parent directories are created.
    pub output_path: PathBuf,
}

impl ToolInput for CreateImageInput {
    fn validate(&self, tool: &'static str) -> Result<(), ToolError> {
        check_dimension(tool, "width", self.width)?;
        check_dimension(tool, "height", self.height)
    }
}

pub fn run_create(input: CreateImageInput) -> Result<String, ToolError> {
    let background = color_arg(&input.background_color)?;
    let kind = input.format.unwrap_or_else(|| ImageKind::from_path(&input.output_path));

    let canvas = RgbaImage::from_pixel(input.width, input.height, background);
    save_image(&DynamicImage::ImageRgba8(canvas), &input.output_path, kind)?;

    tracing::debug!(width = input.width, height = input.height, %kind, "Created canvas");
    Ok(format!(
        "Created {}x{} {} image at {}",
        input.width,
        input.height,
        kind,
        input.output_path.display()
    ))
}
