//! Error type shared by every tool handler.
//!
//! Handlers return `Result<String, ToolError>`; the dispatcher renders the
//! `Display` text of an error into the `Error: ...` response body, so the
//! messages here are what the calling agent reads.

use std::any::Any;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[cfg(feature = "canvas")]
use crate::color::ColorError;

#[derive(Debug, Error)]
pub enum ToolError {
    /// A required credential is absent from the environment
    #[error("{var} environment variable is not set")]
    MissingCredential { var: &'static str },

    /// An input path named by the caller does not exist
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// Arguments failed to parse into the tool's input type, or a value is out of range
    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: &'static str, message: String },

    #[cfg(feature = "canvas")]
    #[error("Invalid color '{value}': {source}")]
    InvalidColor {
        value: String,
        #[source]
        source: ColorError,
    },

    #[cfg(feature = "canvas")]
    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[cfg(feature = "canvas")]
    #[error("Failed to load font {}: invalid font data", .0.display())]
    InvalidFont(PathBuf),

    /// The generation service answered but produced nothing usable
    #[error("No image generated: {0}")]
    NoImage(String),

    #[error("Prompt was blocked: {0}")]
    Blocked(String),

    #[error("Gemini API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[cfg(feature = "gemini")]
    #[error("Gemini API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode image data: {0}")]
    Decode(String),

    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A handler panicked; the server keeps running
    #[error("Tool handler panicked: {0}")]
    Panicked(String),

    /// A blocking handler task was cancelled before finishing
    #[error("Tool task failed: {0}")]
    Join(#[source] tokio::task::JoinError),
}

impl ToolError {
    pub fn invalid(tool: &'static str, message: impl Into<String>) -> Self {
        ToolError::InvalidArguments { tool, message: message.into() }
    }

    pub fn read(path: &Path, source: io::Error) -> Self {
        ToolError::Read { path: path.to_path_buf(), source }
    }

    pub fn write(path: &Path, source: io::Error) -> Self {
        ToolError::Write { path: path.to_path_buf(), source }
    }

    /// Wrap a caught panic payload, keeping its message when it has one.
    pub fn panicked(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(message) => (*message).to_string(),
                Err(_) => "unknown panic".to_string(),
            },
        };
        ToolError::Panicked(message)
    }

    /// Map a failed blocking task, unwrapping panics into [`ToolError::Panicked`].
    pub fn from_join(err: tokio::task::JoinError) -> Self {
        match err.try_into_panic() {
            Ok(payload) => ToolError::panicked(payload),
            Err(err) => ToolError::Join(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_names_variable() {
        let err = ToolError::MissingCredential { var: "GEMINI_API_KEY" };
        assert_eq!(err.to_string(), "GEMINI_API_KEY environment variable is not set");
    }

    #[test]
    fn test_input_not_found_includes_path() {
        let err = ToolError::InputNotFound(PathBuf::from("./missing.png"));
        assert_eq!(err.to_string(), "Input file not found: ./missing.png");
    }

    #[test]
    fn test_invalid_arguments_names_tool() {
        let err = ToolError::invalid("resize_image", "width must be at least 1");
        assert_eq!(err.to_string(), "Invalid arguments for resize_image: width must be at least 1");
    }

    #[test]
    fn test_panic_payload_messages() {
        let err = ToolError::panicked(Box::new("index out of bounds"));
        assert_eq!(err.to_string(), "Tool handler panicked: index out of bounds");
        let err = ToolError::panicked(Box::new(format!("sigma {}", 0.5)));
        assert_eq!(err.to_string(), "Tool handler panicked: sigma 0.5");
        let err = ToolError::panicked(Box::new(42_u8));
        assert_eq!(err.to_string(), "Tool handler panicked: unknown panic");
    }

    #[tokio::test]
    async fn test_join_error_from_panicking_task() {
        let err = tokio::task::spawn_blocking(|| -> u32 { panic!("kernel too small") })
            .await
            .unwrap_err();
        let err = ToolError::from_join(err);
        assert!(matches!(err, ToolError::Panicked(_)));
        assert_eq!(err.to_string(), "Tool handler panicked: kernel too small");
    }

    #[test]
    fn test_write_error_includes_path_and_cause() {
        let source = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = ToolError::write(Path::new("/out/a.png"), source);
        let msg = err.to_string();
        assert!(msg.contains("/out/a.png"));
        assert!(msg.contains("denied"));
    }
}
