//! Client for the Gemini `generateContent` API, image output only.
//!
//! One request per call, no retries. The client is built once at startup from
//! [`GeminiConfig`] and shared by every generation tool; a missing API key is
//! reported when a request is attempted, not when the client is created.

mod wire;

use base64::Engine;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::{GeminiConfig, API_KEY_VAR};
use crate::error::ToolError;

use wire::{
    Blob, ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    ImageConfig, RequestContent, RequestPart,
};

/// Output aspect ratios accepted by the image models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum AspectRatio {
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "2:3")]
    Portrait2x3,
    #[serde(rename = "3:2")]
    Landscape3x2,
    #[serde(rename = "3:4")]
    Portrait3x4,
    #[serde(rename = "4:3")]
    Landscape4x3,
    #[serde(rename = "4:5")]
    Portrait4x5,
    #[serde(rename = "5:4")]
    Landscape5x4,
    #[serde(rename = "9:16")]
    Portrait9x16,
    #[serde(rename = "16:9")]
    Landscape16x9,
    #[serde(rename = "21:9")]
    Ultrawide21x9,
}

impl AspectRatio {
    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait2x3 => "2:3",
            AspectRatio::Landscape3x2 => "3:2",
            AspectRatio::Portrait3x4 => "3:4",
            AspectRatio::Landscape4x3 => "4:3",
            AspectRatio::Portrait4x5 => "4:5",
            AspectRatio::Landscape5x4 => "5:4",
            AspectRatio::Portrait9x16 => "9:16",
            AspectRatio::Landscape16x9 => "16:9",
            AspectRatio::Ultrawide21x9 => "21:9",
        }
    }
}

/// An input image sent inline with the prompt.
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub mime_type: &'static str,
    pub data: Vec<u8>,
}

/// One generation request: a prompt followed by zero or more images.
#[derive(Debug, Clone, Default)]
pub struct ImageRequest {
    pub prompt: String,
    pub images: Vec<InlineImage>,
    pub aspect_ratio: Option<AspectRatio>,
}

impl ImageRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self { prompt: prompt.into(), ..Default::default() }
    }

    pub fn with_image(mut self, image: InlineImage) -> Self {
        self.images.push(image);
        self
    }

    pub fn with_aspect_ratio(mut self, ratio: Option<AspectRatio>) -> Self {
        self.aspect_ratio = ratio;
        self
    }

    fn into_body(self) -> GenerateContentRequest {
        let engine = base64::engine::general_purpose::STANDARD;
        let mut parts = Vec::with_capacity(self.images.len() + 1);
        parts.push(RequestPart::Text { text: self.prompt });
        parts.extend(self.images.into_iter().map(|image| RequestPart::InlineData {
            inline_data: Blob { mime_type: image.mime_type.to_string(), data: engine.encode(image.data) },
        }));

        GenerateContentRequest {
            contents: vec![RequestContent { role: "user", parts }],
            generation_config: GenerationConfig {
                response_modalities: vec!["TEXT", "IMAGE"],
                image_config: self.aspect_ratio.map(|r| ImageConfig { aspect_ratio: r.as_str() }),
            },
        }
    }
}

/// Decoded image returned by the model.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    /// Text the model returned alongside the image, if any.
    pub text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self { http: reqwest::Client::new(), config }
    }

    pub fn has_credential(&self) -> bool {
        self.config.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        let model = self.config.model.strip_prefix("models/").unwrap_or(&self.config.model);
        format!("{}/models/{}:generateContent", self.config.base_url, model)
    }

    /// Send one request and return the first image of the first candidate.
    pub async fn generate(&self, request: ImageRequest) -> Result<GeneratedImage, ToolError> {
        let api_key =
            self.config.api_key.as_deref().ok_or(ToolError::MissingCredential { var: API_KEY_VAR })?;

        tracing::debug!(
            model = %self.config.model,
            images = request.images.len(),
            aspect_ratio = ?request.aspect_ratio,
            "calling generateContent"
        );

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request.into_body())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ToolError::Api { status: status.as_u16(), message: api_error_message(&body) });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| ToolError::NoImage(format!("unreadable response: {}", e)))?;
        extract_image(parsed)
    }
}

fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => match (envelope.error.message, envelope.error.status) {
            (Some(message), _) => message,
            (None, Some(status)) => status,
            (None, None) => body.trim().to_string(),
        },
        Err(_) => body.trim().to_string(),
    }
}

/// First candidate, first `inlineData` part.
///
/// Later candidates and any further image parts are ignored.
fn extract_image(response: GenerateContentResponse) -> Result<GeneratedImage, ToolError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ToolError::Blocked(reason));
        }
        return Err(ToolError::NoImage("response contained no candidates".into()));
    };

    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
    let text: Vec<String> = parts.iter().filter_map(|p| p.text.clone()).collect();
    let text = if text.is_empty() { None } else { Some(text.join("\n")) };

    let Some(blob) = parts.into_iter().find_map(|p| p.inline_data) else {
        let mut message = String::from("response contained no image data");
        if let Some(reason) = candidate.finish_reason {
            message.push_str(&format!(" (finish reason: {})", reason));
        }
        if let Some(said) = &text {
            message.push_str(&format!("; model said: {}", said));
        }
        return Err(ToolError::NoImage(message));
    };

    let bytes = base64::engine::general_purpose::STANDARD
        .decode(blob.data.as_bytes())
        .map_err(|e| ToolError::Decode(e.to_string()))?;
    if bytes.is_empty() {
        return Err(ToolError::NoImage("image part was empty".into()));
    }
    Ok(GeneratedImage { bytes, mime_type: blob.mime_type, text })
}
