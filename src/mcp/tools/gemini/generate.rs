//! generate_image: text-to-image.

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::Deserialize;

use crate::error::ToolError;
use crate::gemini::{AspectRatio, GeminiClient, ImageRequest};
use crate::mcp::registry::ToolInput;
use crate::output::write_bytes;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageInput {
    /// Text description of the image to generate.
    pub prompt: String,

    /// File path for the generated image. Parent directories are created.
    pub output_path: PathBuf,

    /// Aspect ratio of the generated image (model default when omitted).
    pub aspect_ratio: Option<AspectRatio>,
}

impl ToolInput for GenerateImageInput {
    fn validate(&self, tool: &'static str) -> Result<(), ToolError> {
        super::require_prompt(tool, &self.prompt)
    }
}

pub async fn run_generate(
    client: &GeminiClient,
    input: GenerateImageInput,
) -> Result<String, ToolError> {
    let request = ImageRequest::new(input.prompt).with_aspect_ratio(input.aspect_ratio);
    let image = client.generate(request).await?;
    write_bytes(&input.output_path, &image.bytes)?;
    Ok(format!("Image generated and saved to {}", input.output_path.display()))
}
