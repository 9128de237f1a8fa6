//! edit_image: image + prompt to image.

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::Deserialize;

use crate::error::ToolError;
use crate::format::ImageKind;
use crate::gemini::{AspectRatio, GeminiClient, ImageRequest, InlineImage};
use crate::mcp::registry::ToolInput;
use crate::output::{read_bytes, write_bytes};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditImageInput {
    /// Image to edit (.png, .jpg/.jpeg or .webp).
    pub input_path: PathBuf,

    /// Instructions describing the edit.
    pub prompt: String,

    /// File path for the edited image. Parent directories are created.
    pub output_path: PathBuf,

    /// Aspect ratio of the result (model default when omitted).
    pub aspect_ratio: Option<AspectRatio>,
}

impl ToolInput for EditImageInput {
    fn validate(&self, tool: &'static str) -> Result<(), ToolError> {
        super::require_prompt(tool, &self.prompt)
    }
}

pub async fn run_edit(client: &GeminiClient, input: EditImageInput) -> Result<String, ToolError> {
    let source = InlineImage {
        mime_type: ImageKind::from_path(&input.input_path).mime_type(),
        data: read_bytes(&input.input_path)?,
    };
    let request =
        ImageRequest::new(input.prompt).with_image(source).with_aspect_ratio(input.aspect_ratio);

    let image = client.generate(request).await?;
    write_bytes(&input.output_path, &image.bytes)?;
    Ok(format!("Edited image saved to {}", input.output_path.display()))
}
