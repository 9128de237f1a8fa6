//! composite_images: overlay one file on another.

use std::path::PathBuf;

use image::DynamicImage;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::error::ToolError;
use crate::format::ImageKind;
use crate::mcp::registry::ToolInput;
use crate::output::{open_image, require_file, save_image};
use crate::raster::composite;

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompositeImagesInput {
    /// Bottom layer. The result has its dimensions.
    pub background_path: PathBuf,

    /// Top layer, blended with its own alpha.
    pub overlay_path: PathBuf,

    /// Where to write the result. Parent directories are created.
    pub output_path: PathBuf,

    /// Horizontal offset of the overlay. May be negative.
    #[serde(default)]
    pub x: i64,

    /// Vertical offset of the overlay. May be negative.
    #[serde(default)]
    pub y: i64,
}

impl ToolInput for CompositeImagesInput {}

pub fn run_composite(input: CompositeImagesInput) -> Result<String, ToolError> {
    require_file(&input.background_path)?;
    require_file(&input.overlay_path)?;

    let mut canvas = open_image(&input.background_path)?.to_rgba8();
    let overlay = open_image(&input.overlay_path)?.to_rgba8();
    composite(&mut canvas, &overlay, input.x, input.y);

    save_image(
        &DynamicImage::ImageRgba8(canvas),
        &input.output_path,
        ImageKind::from_path(&input.output_path),
    )?;
    Ok(format!("Composited overlay onto background and saved to {}", input.output_path.display()))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{pixel, solid_png};
    use super::*;
    use crate::mcp::registry::parse_input;
    use image::Rgba;
    use serde_json::json;

    #[test]
    fn test_offsets_default_to_zero() {
        let args = json!({"backgroundPath": "a.png", "overlayPath": "b.png", "outputPath": "c.png"});
        let parsed: CompositeImagesInput =
            parse_input("composite_images", args.as_object().cloned().unwrap()).unwrap();
        assert_eq!((parsed.x, parsed.y), (0, 0));
    }

    #[test]
    fn test_overlay_at_offset() {
        let dir = tempfile::tempdir().unwrap();
        let background = dir.path().join("bg.png");
        let overlay = dir.path().join("fg.png");
        solid_png(&background, 6, 6, [0, 0, 255, 255]);
        solid_png(&overlay, 2, 2, [255, 0, 0, 255]);
        let output = dir.path().join("out.png");

        let message = run_composite(CompositeImagesInput {
            background_path: background,
            overlay_path: overlay,
            output_path: output.clone(),
            x: 4,
            y: -1,
        })
        .unwrap();

        assert!(message.starts_with("Composited overlay onto background"));
        let image = image::open(&output).unwrap();
        assert_eq!((image.width(), image.height()), (6, 6));
        assert_eq!(pixel(&output, 4, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(pixel(&output, 5, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(pixel(&output, 4, 1), Rgba([0, 0, 255, 255]));
        assert_eq!(pixel(&output, 3, 0), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn test_translucent_overlay_blends() {
        let dir = tempfile::tempdir().unwrap();
        let background = dir.path().join("bg.png");
        let overlay = dir.path().join("fg.png");
        solid_png(&background, 2, 2, [255, 255, 255, 255]);
        solid_png(&overlay, 2, 2, [0, 0, 0, 128]);
        let output = dir.path().join("out.png");

        run_composite(CompositeImagesInput {
            background_path: background,
            overlay_path: overlay,
            output_path: output.clone(),
            x: 0,
            y: 0,
        })
        .unwrap();

        let p = pixel(&output, 0, 0);
        assert_eq!(p[3], 255);
        assert!(p[0] > 120 && p[0] < 135, "{:?}", p);
    }

    #[test]
    fn test_extreme_offsets_leave_background() {
        let dir = tempfile::tempdir().unwrap();
        let background = dir.path().join("bg.png");
        let overlay = dir.path().join("fg.png");
        solid_png(&background, 3, 3, [0, 0, 255, 255]);
        solid_png(&overlay, 2, 2, [255, 0, 0, 255]);

        for (x, y) in [(i64::MAX, i64::MAX), (i64::MIN, i64::MIN), (i64::MAX, 0)] {
            let output = dir.path().join("out.png");
            let args = json!({
                "backgroundPath": background.to_str().unwrap(),
                "overlayPath": overlay.to_str().unwrap(),
                "outputPath": output.to_str().unwrap(),
                "x": x,
                "y": y
            });
            let parsed = parse_input("composite_images", args.as_object().cloned().unwrap()).unwrap();
            run_composite(parsed).unwrap();
            assert_eq!(pixel(&output, 0, 0), Rgba([0, 0, 255, 255]));
            assert_eq!(pixel(&output, 2, 2), Rgba([0, 0, 255, 255]));
        }
    }

    #[test]
    fn test_missing_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let background = dir.path().join("bg.png");
        solid_png(&background, 2, 2, [255, 255, 255, 255]);

        let err = run_composite(CompositeImagesInput {
            background_path: background,
            overlay_path: dir.path().join("overlay.png"),
            output_path: dir.path().join("out.png"),
            x: 0,
            y: 0,
        })
        .unwrap_err();
        assert!(err.to_string().contains("overlay.png"));
    }
}
