//! resize_image

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::Deserialize;

use super::check_dimension;
use crate::error::ToolError;
use crate::format::ImageKind;
use crate::mcp::registry::ToolInput;
use crate::output::{open_image, save_image};
use crate::raster::resize::{resize, Fit};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResizeImageInput {
    /// Image to resize.
    pub input_path: PathBuf,

    /// Where to write the result. Parent directories are created.
    pub output_path: PathBuf,

    /// Target width in pixels. Derived from the aspect ratio when omitted.
    pub width: Option<u32>,

    /// Target height in pixels. Derived from the aspect ratio when omitted.
    pub height: Option<u32>,

    /// How to fit the image when both width and height are given.
    #[serde(default)]
    pub fit: Fit,
}

impl ToolInput for ResizeImageInput {
    fn validate(&self, tool: &'static str) -> Result<(), ToolError> {
        if self.width.is_none() && self.height.is_none() {
            return Err(ToolError::invalid(tool, "at least one of width or height is required"));
        }
        if let Some(width) = self.width {
            check_dimension(tool, "width", width)?;
        }
        if let Some(height) = self.height {
            check_dimension(tool, "height", height)?;
        }
        Ok(())
    }
}

pub fn run_resize(input: ResizeImageInput) -> Result<String, ToolError> {
    let source = open_image(&input.input_path)?;
    let resized = resize(&source, input.width, input.height, input.fit)
        .map_err(|err| ToolError::invalid("resize_image", err.to_string()))?;

    save_image(&resized, &input.output_path, ImageKind::from_path(&input.output_path))?;
    Ok(format!(
        "Resized image to {}x{} and saved to {}",
        resized.width(),
        resized.height(),
        input.output_path.display()
    ))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::solid_png;
    use super::*;
    use crate::mcp::registry::parse_input;
    use serde_json::json;

    fn input(args: serde_json::Value) -> Result<ResizeImageInput, ToolError> {
        parse_input("resize_image", args.as_object().cloned().unwrap())
    }

    #[test]
    fn test_fit_defaults_to_cover() {
        let parsed = input(json!({"inputPath": "a.png", "outputPath": "b.png", "width": 5})).unwrap();
        assert_eq!(parsed.fit, Fit::Cover);
    }

    #[test]
    fn test_requires_a_dimension() {
        let err = input(json!({"inputPath": "a.png", "outputPath": "b.png"})).unwrap_err();
        assert!(err.to_string().contains("at least one of width or height"));
    }

    #[test]
    fn test_unknown_fit_rejected() {
        assert!(input(json!({
            "inputPath": "a.png", "outputPath": "b.png", "width": 5, "fit": "stretch"
        }))
        .is_err());
    }

    #[test]
    fn test_width_only() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("wide.png");
        solid_png(&source, 40, 20, [0, 128, 255, 255]);
        let output = dir.path().join("small.webp");

        let message = run_resize(
            input(json!({
                "inputPath": source.to_str().unwrap(),
                "outputPath": output.to_str().unwrap(),
                "width": 10
            }))
            .unwrap(),
        )
        .unwrap();

        assert!(message.starts_with("Resized image to 10x5 and saved to"), "{}", message);
        let image = image::open(&output).unwrap();
        assert_eq!((image.width(), image.height()), (10, 5));
    }

    #[test]
    fn test_contain_reports_box_size() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("wide.png");
        solid_png(&source, 40, 20, [0, 128, 255, 255]);
        let output = dir.path().join("boxed.png");

        let message = run_resize(
            input(json!({
                "inputPath": source.to_str().unwrap(),
                "outputPath": output.to_str().unwrap(),
                "width": 16,
                "height": 16,
                "fit": "contain"
            }))
            .unwrap(),
        )
        .unwrap();
        assert!(message.starts_with("Resized image to 16x16"), "{}", message);
    }

    #[test]
    fn test_derived_height_over_limit_refused() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("sliver.png");
        solid_png(&source, 1, 100, [0, 0, 0, 255]);
        let output = dir.path().join("huge.png");

        let err = run_resize(
            input(json!({
                "inputPath": source.to_str().unwrap(),
                "outputPath": output.to_str().unwrap(),
                "width": 16384
            }))
            .unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { tool: "resize_image", .. }), "{}", err);
        assert!(err.to_string().contains("16384x1638400"), "{}", err);
        assert!(!output.exists());
    }

    #[test]
    fn test_outside_over_limit_refused() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("sliver.png");
        solid_png(&source, 1, 1000, [0, 0, 0, 255]);
        let output = dir.path().join("huge.png");

        let err = run_resize(
            input(json!({
                "inputPath": source.to_str().unwrap(),
                "outputPath": output.to_str().unwrap(),
                "width": 1000,
                "height": 1000,
                "fit": "outside"
            }))
            .unwrap(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("at most 16384"), "{}", err);
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_input_names_file() {
        let err = run_resize(
            input(json!({"inputPath": "./missing.png", "outputPath": "./o.png", "height": 3}))
                .unwrap(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("missing.png"));
    }
}
