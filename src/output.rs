//! File input/output shared by the tools
//!
//! Inputs are checked for existence before any work starts; outputs get their
//! parent directories created on demand. Nothing here ever modifies an input.

use std::fs;
use std::path::Path;

use image::DynamicImage;

use crate::error::ToolError;
use crate::format::ImageKind;

/// Fail with [`ToolError::InputNotFound`] unless `path` exists.
pub fn require_file(path: &Path) -> Result<(), ToolError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ToolError::InputNotFound(path.to_path_buf()))
    }
}

/// Read an input file as an opaque byte buffer.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>, ToolError> {
    require_file(path)?;
    fs::read(path).map_err(|e| ToolError::read(path, e))
}

/// Decode an input image.
pub fn open_image(path: &Path) -> Result<DynamicImage, ToolError> {
    require_file(path)?;
    Ok(image::open(path)?)
}

/// Create the parent directories of `path` if they don't exist.
pub fn ensure_parent_dir(path: &Path) -> Result<(), ToolError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| ToolError::write(parent, e))?;
        }
    }
    Ok(())
}

/// Write raw bytes to `path`, creating parent directories.
pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), ToolError> {
    ensure_parent_dir(path)?;
    fs::write(path, bytes).map_err(|e| ToolError::write(path, e))
}

/// Encode `image` as `kind` and write it to `path`, creating parent directories.
///
/// JPEG has no alpha channel, so the image is flattened to RGB first.
pub fn save_image(image: &DynamicImage, path: &Path, kind: ImageKind) -> Result<(), ToolError> {
    ensure_parent_dir(path)?;
    if kind.has_alpha() {
        image.save_with_format(path, kind.image_format())?;
    } else {
        DynamicImage::ImageRgb8(image.to_rgb8()).save_with_format(path, kind.image_format())?;
    }
    Ok(())
}
