//! image-mcp-canvas - MCP server for local image editing

use std::process::ExitCode;

use clap::Parser;
use tokio::runtime::Runtime;

use image_mcp::config::font_dirs_from_env;
use image_mcp::logging;
use image_mcp::mcp::run_server;
use image_mcp::mcp::tools::canvas::CanvasTools;
use image_mcp::raster::FontLibrary;

/// Speaks MCP on stdin/stdout. Extra font directories can be listed in
/// IMAGE_MCP_FONT_DIRS; RUST_LOG controls logging.
#[derive(Parser)]
#[command(name = "image-mcp-canvas")]
#[command(about = "MCP server exposing local image drawing and processing tools")]
#[command(version)]
struct Cli {}

fn main() -> ExitCode {
    Cli::parse();
    logging::init();

    let fonts = FontLibrary::new(font_dirs_from_env());
    tracing::info!(font_dirs = fonts.dirs().len(), "Starting image-mcp-canvas");

    let rt = match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run_server(CanvasTools::new(fonts))) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("MCP server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
