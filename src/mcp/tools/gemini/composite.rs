//! composite_images: several images + prompt to one image.

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::Deserialize;

use crate::error::ToolError;
use crate::format::ImageKind;
use crate::gemini::{AspectRatio, GeminiClient, ImageRequest, InlineImage};
use crate::mcp::registry::ToolInput;
use crate::output::{read_bytes, require_file, write_bytes};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompositeImagesInput {
    /// Images to combine, sent to the model in this order.
    pub image_paths: Vec<PathBuf>,

    /// Instructions describing how to combine the images.
    pub prompt: String,

    /// File path for the combined image. Parent directories are created.
    pub output_path: PathBuf,

    /// Aspect ratio of the result (model default when omitted).
    pub aspect_ratio: Option<AspectRatio>,
}

impl ToolInput for CompositeImagesInput {
    fn validate(&self, tool: &'static str) -> Result<(), ToolError> {
        if self.image_paths.is_empty() {
            return Err(ToolError::invalid(tool, "imagePaths must name at least one image"));
        }
        super::require_prompt(tool, &self.prompt)
    }
}

pub async fn run_composite(
    client: &GeminiClient,
    input: CompositeImagesInput,
) -> Result<String, ToolError> {
    // Check every path before reading any, so the first missing one is reported.
    for path in &input.image_paths {
        require_file(path)?;
    }

    let mut request = ImageRequest::new(input.prompt).with_aspect_ratio(input.aspect_ratio);
    for path in &input.image_paths {
        request = request.with_image(InlineImage {
            mime_type: ImageKind::from_path(path).mime_type(),
            data: read_bytes(path)?,
        });
    }

    let image = client.generate(request).await?;
    write_bytes(&input.output_path, &image.bytes)?;
    Ok(format!(
        "Composite of {} images saved to {}",
        input.image_paths.len(),
        input.output_path.display()
    ))
}
