//! Font lookup and text rasterization.
//!
//! Fonts are plain `.ttf`/`.otf`/`.ttc` files found by scanning a list of
//! directories; there is no fontconfig dependency. A family name resolves in
//! this order:
//!
//! 1. an existing file path,
//! 2. a generic family (`sans-serif`, `serif`, `monospace`) through its
//!    candidate list,
//! 3. a file stem match, ignoring case, spaces, `-` and `_` (exact first,
//!    then the shortest stem starting with the name).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use ab_glyph::{point, Font, FontVec, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};

use super::draw::blend_pixel;
use crate::error::ToolError;

const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc"];

const SANS_SERIF: &[&str] =
    &["DejaVuSans", "LiberationSans-Regular", "Arial", "Helvetica", "NotoSans-Regular", "FreeSans"];
const SERIF: &[&str] = &[
    "DejaVuSerif",
    "LiberationSerif-Regular",
    "Times New Roman",
    "Times",
    "NotoSerif-Regular",
    "FreeSerif",
];
const MONOSPACE: &[&str] = &[
    "DejaVuSansMono",
    "LiberationMono-Regular",
    "Courier New",
    "Menlo",
    "NotoSansMono-Regular",
    "FreeMono",
];

/// Font files discoverable under a set of directories.
#[derive(Debug)]
pub struct FontLibrary {
    dirs: Vec<PathBuf>,
    files: OnceLock<Vec<PathBuf>>,
}

impl FontLibrary {
    /// Search `dirs` in order; earlier directories win ties.
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs, files: OnceLock::new() }
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Resolve a family name or path to a font file.
    pub fn resolve(&self, family: &str) -> Result<PathBuf, ToolError> {
        let family = family.trim();
        if looks_like_path(family) {
            let path = Path::new(family);
            return if path.is_file() {
                Ok(path.to_path_buf())
            } else {
                Err(ToolError::FontNotFound(family.to_string()))
            };
        }

        let candidates: Vec<&str> = match family.to_ascii_lowercase().as_str() {
            "sans-serif" | "sans" => SANS_SERIF.to_vec(),
            "serif" => SERIF.to_vec(),
            "monospace" | "mono" => MONOSPACE.to_vec(),
            _ => vec![family],
        };

        candidates
            .iter()
            .find_map(|name| self.find_by_stem(name))
            .ok_or_else(|| ToolError::FontNotFound(family.to_string()))
    }

    /// Resolve and parse a font.
    pub fn load(&self, family: &str) -> Result<FontVec, ToolError> {
        let path = self.resolve(family)?;
        let data = fs::read(&path).map_err(|e| ToolError::read(&path, e))?;
        let font = FontVec::try_from_vec(data).map_err(|_| ToolError::InvalidFont(path.clone()))?;
        tracing::debug!(family, path = %path.display(), "Loaded font");
        Ok(font)
    }

    fn files(&self) -> &[PathBuf] {
        self.files.get_or_init(|| scan_font_dirs(&self.dirs))
    }

    fn find_by_stem(&self, name: &str) -> Option<PathBuf> {
        let wanted = normalize(name);
        if wanted.is_empty() {
            return None;
        }
        let stems: Vec<(String, &PathBuf)> = self
            .files()
            .iter()
            .filter_map(|p| Some((normalize(p.file_stem()?.to_str()?), p)))
            .collect();

        if let Some((_, path)) = stems.iter().find(|(stem, _)| *stem == wanted) {
            return Some((*path).clone());
        }
        stems
            .iter()
            .filter(|(stem, _)| stem.starts_with(&wanted))
            // min_by_key keeps the first of equal lengths, so directory order breaks ties
            .min_by_key(|(stem, _)| stem.len())
            .map(|(_, path)| (*path).clone())
    }
}

fn looks_like_path(family: &str) -> bool {
    let path = Path::new(family);
    family.contains(std::path::MAIN_SEPARATOR)
        || family.contains('/')
        || path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| FONT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// Lowercase and drop separators, so "Liberation Sans" matches "LiberationSans".
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn scan_font_dirs(dirs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for dir in dirs {
        if !dir.is_dir() {
            continue;
        }
        let pattern = format!("{}/**/*", glob::Pattern::escape(&dir.to_string_lossy()));
        let Ok(entries) = glob::glob(&pattern) else {
            tracing::warn!(dir = %dir.display(), "Skipping unreadable font directory");
            continue;
        };
        let mut found: Vec<PathBuf> = entries
            .flatten()
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| FONT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            })
            .collect();
        found.sort();
        files.extend(found);
    }
    tracing::debug!(count = files.len(), "Scanned font directories");
    files
}

/// Text placement: `x` is the left edge, `y` the baseline of the first line.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub color: Rgba<u8>,
}

/// Render `text` onto `canvas`, blending antialiased coverage with the color.
/// Each `\n` moves down one line height.
pub fn draw_text(canvas: &mut RgbaImage, font: &FontVec, text: &str, style: TextStyle) {
    let scale = PxScale::from(style.size);
    let scaled = font.as_scaled(scale);
    let line_height = scaled.height() + scaled.line_gap();

    for (line_no, line) in text.split('\n').enumerate() {
        let baseline = style.y + line_no as f32 * line_height;
        let mut caret = style.x;
        let mut previous = None;

        for ch in line.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, baseline));
            caret += scaled.h_advance(id);
            previous = Some(id);

            let Some(outlined) = font.outline_glyph(glyph) else {
                continue; // whitespace
            };
            let bounds = outlined.px_bounds();
            if bounds.max.x <= 0.0
                || bounds.max.y <= 0.0
                || bounds.min.x >= canvas.width() as f32
                || bounds.min.y >= canvas.height() as f32
            {
                continue;
            }
            outlined.draw(|gx, gy, coverage| {
                let px = (bounds.min.x as i64).saturating_add(gx as i64);
                let py = (bounds.min.y as i64).saturating_add(gy as i64);
                blend_pixel(canvas, px, py, style.color, coverage);
            });
        }
    }
}
