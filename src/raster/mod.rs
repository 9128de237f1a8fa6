//! Local raster operations behind the canvas tools.

pub mod draw;
pub mod filter;
pub mod resize;
pub mod text;

/// Largest width or height accepted for a new or resized image.
pub const MAX_DIMENSION: u32 = 16_384;

pub use draw::{blend_over, composite, fill_rect, stroke_rect, Rect};
pub use filter::{Filter, FilterOptions};
pub use resize::{Fit, ResizeError};
pub use text::{draw_text, FontLibrary, TextStyle};
