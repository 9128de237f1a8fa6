//! Image kinds recognised by file extension

use std::fmt;
use std::path::Path;

use image::ImageFormat;
use schemars::JsonSchema;
use serde::Deserialize;

/// Encodings the tools read and write.
///
/// Anything that isn't recognised as JPEG or WebP is treated as PNG.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    #[default]
    Png,
    #[serde(alias = "jpg")]
    Jpeg,
    Webp,
}

impl ImageKind {
    /// Classify a path by its extension (case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        let ext = path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("jpg") | Some("jpeg") => ImageKind::Jpeg,
            Some("webp") => ImageKind::Webp,
            _ => ImageKind::Png,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Webp => "image/webp",
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            ImageKind::Png => ImageFormat::Png,
            ImageKind::Jpeg => ImageFormat::Jpeg,
            ImageKind::Webp => ImageFormat::WebP,
        }
    }

    /// Whether the encoding can store an alpha channel.
    pub fn has_alpha(self) -> bool {
        !matches!(self, ImageKind::Jpeg)
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageKind::Png => "png",
            ImageKind::Jpeg => "jpeg",
            ImageKind::Webp => "webp",
        };
        f.write_str(name)
    }
}
