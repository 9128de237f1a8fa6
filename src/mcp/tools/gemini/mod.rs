//! Generation tools backed by the Gemini image models.

pub mod composite;
pub mod edit;
pub mod generate;

use async_trait::async_trait;
use rmcp::model::{JsonObject, Tool};

use crate::error::ToolError;
use crate::gemini::GeminiClient;
use crate::mcp::dispatch::Toolset;
use crate::mcp::registry::{describe, parse_input, ToolKind};

use composite::CompositeImagesInput;
use edit::EditImageInput;
use generate::GenerateImageInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeminiTool {
    GenerateImage,
    EditImage,
    CompositeImages,
}

impl ToolKind for GeminiTool {
    const ALL: &'static [Self] =
        &[GeminiTool::GenerateImage, GeminiTool::EditImage, GeminiTool::CompositeImages];

    fn name(self) -> &'static str {
        match self {
            GeminiTool::GenerateImage => "generate_image",
            GeminiTool::EditImage => "edit_image",
            GeminiTool::CompositeImages => "composite_images",
        }
    }

    fn descriptor(self) -> Tool {
        match self {
            GeminiTool::GenerateImage => describe::<GenerateImageInput>(
                self.name(),
                "Generate an image from a text prompt and save it to a file.",
            ),
            GeminiTool::EditImage => describe::<EditImageInput>(
                self.name(),
                "Edit an existing image according to a text prompt and save the result.",
            ),
            GeminiTool::CompositeImages => describe::<CompositeImagesInput>(
                self.name(),
                "Combine several images into one according to a text prompt and save the result.",
            ),
        }
    }
}

/// The generation toolset. Holds the one client every tool shares.
pub struct GeminiTools {
    client: GeminiClient,
}

impl GeminiTools {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Toolset for GeminiTools {
    type Kind = GeminiTool;

    const SERVER_NAME: &'static str = "image-mcp-gemini";

    const INSTRUCTIONS: &'static str =
        "Image generation with Google Gemini. Use generate_image for text-to-image, edit_image \
         to modify an existing file, and composite_images to merge several files. Every tool \
         writes its result to outputPath. Requires GEMINI_API_KEY.";

    async fn execute(&self, tool: GeminiTool, arguments: JsonObject) -> Result<String, ToolError> {
        let name = tool.name();
        match tool {
            GeminiTool::GenerateImage => {
                generate::run_generate(&self.client, parse_input(name, arguments)?).await
            }
            GeminiTool::EditImage => edit::run_edit(&self.client, parse_input(name, arguments)?).await,
            GeminiTool::CompositeImages => {
                composite::run_composite(&self.client, parse_input(name, arguments)?).await
            }
        }
    }
}

/// Reject blank prompts before anything is sent.
fn require_prompt(tool: &'static str, prompt: &str) -> Result<(), ToolError> {
    if prompt.trim().is_empty() {
        return Err(ToolError::invalid(tool, "prompt must not be empty"));
    }
    Ok(())
}
