//! Local drawing and processing tools. No network access.

pub mod composite;
pub mod create;
pub mod filter;
pub mod rectangle;
pub mod resize;
pub mod text;

use std::sync::Arc;

use async_trait::async_trait;
use image::Rgba;
use rmcp::model::{JsonObject, Tool};

use crate::color::parse_color;
use crate::error::ToolError;
use crate::mcp::dispatch::Toolset;
use crate::mcp::registry::{describe, parse_input, ToolKind};
use crate::raster::FontLibrary;
pub use crate::raster::MAX_DIMENSION;

use composite::CompositeImagesInput;
use create::CreateImageInput;
use filter::ApplyFilterInput;
use rectangle::DrawRectangleInput;
use resize::ResizeImageInput;
use text::DrawTextInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanvasTool {
    CreateImage,
    DrawText,
    DrawRectangle,
    ResizeImage,
    ApplyFilter,
    CompositeImages,
}

impl ToolKind for CanvasTool {
    const ALL: &'static [Self] = &[
        CanvasTool::CreateImage,
        CanvasTool::DrawText,
        CanvasTool::DrawRectangle,
        CanvasTool::ResizeImage,
        CanvasTool::ApplyFilter,
        CanvasTool::CompositeImages,
    ];

    fn name(self) -> &'static str {
        match self {
            CanvasTool::CreateImage => "create_image",
            CanvasTool::DrawText => "draw_text",
            CanvasTool::DrawRectangle => "draw_rectangle",
            CanvasTool::ResizeImage => "resize_image",
            CanvasTool::ApplyFilter => "apply_filter",
            CanvasTool::CompositeImages => "composite_images",
        }
    }

    fn descriptor(self) -> Tool {
        let name = self.name();
        match self {
            CanvasTool::CreateImage => describe::<CreateImageInput>(
                name,
                "Create a new image filled with a solid background color.",
            ),
            CanvasTool::DrawText => describe::<DrawTextInput>(
                name,
                "Draw text on an existing image, or on a new transparent canvas when no input \
                 image is given.",
            ),
            CanvasTool::DrawRectangle => describe::<DrawRectangleInput>(
                name,
                "Draw a filled and/or outlined rectangle on an image.",
            ),
            CanvasTool::ResizeImage => describe::<ResizeImageInput>(
                name,
                "Resize an image. Give width, height or both; fit controls how the image fills \
                 the box when both are given.",
            ),
            CanvasTool::ApplyFilter => describe::<ApplyFilterInput>(
                name,
                "Apply a filter (blur, sharpen, grayscale, sepia, invert, brightness, contrast, \
                 hue_rotate) to an image.",
            ),
            CanvasTool::CompositeImages => describe::<CompositeImagesInput>(
                name,
                "Draw an overlay image on top of a background image at the given offset.",
            ),
        }
    }
}

/// The canvas toolset. Fonts are the only state, discovered lazily.
///
/// Handlers are CPU-bound and run on the blocking pool, one task per call.
pub struct CanvasTools {
    fonts: Arc<FontLibrary>,
}

impl CanvasTools {
    pub fn new(fonts: FontLibrary) -> Self {
        Self { fonts: Arc::new(fonts) }
    }
}

fn run_tool(
    fonts: &FontLibrary,
    tool: CanvasTool,
    arguments: JsonObject,
) -> Result<String, ToolError> {
    let name = tool.name();
    match tool {
        CanvasTool::CreateImage => create::run_create(parse_input(name, arguments)?),
        CanvasTool::DrawText => text::run_draw_text(fonts, parse_input(name, arguments)?),
        CanvasTool::DrawRectangle => rectangle::run_draw_rectangle(parse_input(name, arguments)?),
        CanvasTool::ResizeImage => resize::run_resize(parse_input(name, arguments)?),
        CanvasTool::ApplyFilter => filter::run_apply_filter(parse_input(name, arguments)?),
        CanvasTool::CompositeImages => composite::run_composite(parse_input(name, arguments)?),
    }
}

#[async_trait]
impl Toolset for CanvasTools {
    type Kind = CanvasTool;

    const SERVER_NAME: &'static str = "image-mcp-canvas";

    const INSTRUCTIONS: &'static str =
        "Local image editing. Create canvases, draw text and rectangles, resize, filter and \
         layer images. Inputs are read from inputPath (never modified); results are written \
         to outputPath with the format taken from its extension.";

    async fn execute(&self, tool: CanvasTool, arguments: JsonObject) -> Result<String, ToolError> {
        let fonts = Arc::clone(&self.fonts);
        tokio::task::spawn_blocking(move || run_tool(&fonts, tool, arguments))
            .await
            .map_err(ToolError::from_join)?
    }
}

fn color_arg(value: &str) -> Result<Rgba<u8>, ToolError> {
    parse_color(value).map_err(|source| ToolError::InvalidColor { value: value.to_string(), source })
}

fn check_dimension(tool: &'static str, field: &str, value: u32) -> Result<(), ToolError> {
    if value == 0 || value > MAX_DIMENSION {
        return Err(ToolError::invalid(
            tool,
            format!("{} must be between 1 and {}, got {}", field, MAX_DIMENSION, value),
        ));
    }
    Ok(())
}
