//! Image tools for AI agents, served over MCP
//!
//! Two server variants share this library:
//! - `image-mcp-gemini` delegates generation and editing to Google Gemini
//!   (feature `gemini`)
//! - `image-mcp-canvas` draws, resizes, filters and layers images locally
//!   (feature `canvas`)

#[cfg(feature = "canvas")]
pub mod color;
pub mod config;
pub mod error;
pub mod format;
#[cfg(feature = "gemini")]
pub mod gemini;
pub mod logging;
pub mod mcp;
pub mod output;
#[cfg(feature = "canvas")]
pub mod raster;
