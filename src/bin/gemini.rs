//! image-mcp-gemini - MCP server for image generation with Google Gemini

use std::process::ExitCode;

use clap::Parser;
use tokio::runtime::Runtime;

use image_mcp::config::{GeminiConfig, API_KEY_VAR};
use image_mcp::gemini::GeminiClient;
use image_mcp::logging;
use image_mcp::mcp::run_server;
use image_mcp::mcp::tools::gemini::GeminiTools;

/// Speaks MCP on stdin/stdout. Configuration comes from the environment:
/// GEMINI_API_KEY, GEMINI_MODEL, GEMINI_BASE_URL and RUST_LOG.
#[derive(Parser)]
#[command(name = "image-mcp-gemini")]
#[command(about = "MCP server exposing Gemini image generation and editing tools")]
#[command(version)]
struct Cli {}

fn main() -> ExitCode {
    Cli::parse();
    logging::init();

    let config = GeminiConfig::from_env();
    if config.api_key.is_none() {
        tracing::warn!("{} is not set; tool calls will fail until it is", API_KEY_VAR);
    }
    tracing::info!(model = %config.model, "Starting image-mcp-gemini");
    let tools = GeminiTools::new(GeminiClient::new(config));

    let rt = match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run_server(tools)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("MCP server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
