//! rmcp server handler and stdio transport.

use std::sync::Arc;

use rmcp::model::*;
use rmcp::service::RequestContext;
use rmcp::{ErrorData as McpError, RoleServer, ServerHandler, ServiceExt};

use crate::mcp::dispatch::{Dispatcher, ToolRequest, Toolset};

/// MCP server for one toolset.
///
/// Tool listing and calls are answered by the [`Dispatcher`]; everything else
/// (handshake, ping, framing) is left to rmcp.
pub struct ImageMcpServer<T: Toolset> {
    dispatcher: Arc<Dispatcher<T>>,
}

impl<T: Toolset> ImageMcpServer<T> {
    pub fn new(toolset: T) -> Self {
        Self { dispatcher: Arc::new(Dispatcher::new(toolset)) }
    }

    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }
}

impl<T: Toolset> Clone for ImageMcpServer<T> {
    fn clone(&self) -> Self {
        Self { dispatcher: Arc::clone(&self.dispatcher) }
    }
}

impl<T: Toolset> ServerHandler for ImageMcpServer<T> {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: T::SERVER_NAME.into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(T::INSTRUCTIONS.into()),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.dispatcher.registry().descriptors().to_vec()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatcher.handle(ToolRequest::from(request)).await)
    }
}

/// Serve `toolset` on stdin/stdout until the client disconnects.
pub async fn run_server<T: Toolset>(toolset: T) -> Result<(), Box<dyn std::error::Error>> {
    let server = ImageMcpServer::new(toolset);
    let tool_count = server.dispatcher().registry().len();
    let service = server.serve(rmcp::transport::stdio()).await?;
    tracing::info!(
        server = T::SERVER_NAME,
        version = env!("CARGO_PKG_VERSION"),
        tools = tool_count,
        "MCP server running on stdio"
    );
    let reason = service.waiting().await?;
    tracing::info!(?reason, "MCP server stopped");
    Ok(())
}
