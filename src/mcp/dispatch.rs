//! Request dispatch with uniform response framing.
//!
//! Every call ends in a well-formed `CallToolResult` carrying exactly one text
//! block. Unknown names, handler failures and handler panics become `isError`
//! responses; they never surface as protocol errors, so the host session stays alive.

use std::panic::AssertUnwindSafe;

use async_trait::async_trait;
use futures::FutureExt;
use rmcp::model::{CallToolRequestParam, CallToolResult, Content, JsonObject};

use crate::error::ToolError;
use crate::mcp::registry::{Registry, ToolKind};

/// One server variant: its tools and the handlers behind them.
#[async_trait]
pub trait Toolset: Send + Sync + 'static {
    type Kind: ToolKind;

    /// Name advertised in `serverInfo`.
    const SERVER_NAME: &'static str;

    /// Usage hint advertised during initialization.
    const INSTRUCTIONS: &'static str;

    /// Parse the arguments for `tool`, check its preconditions, and perform its
    /// single delegation call. The returned text is sent back verbatim.
    async fn execute(&self, tool: Self::Kind, arguments: JsonObject) -> Result<String, ToolError>;
}

/// An incoming `tools/call`.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolRequest {
    pub name: String,
    pub arguments: JsonObject,
}

impl ToolRequest {
    pub fn new(name: impl Into<String>, arguments: JsonObject) -> Self {
        Self { name: name.into(), arguments }
    }
}

impl From<CallToolRequestParam> for ToolRequest {
    fn from(param: CallToolRequestParam) -> Self {
        Self { name: param.name.into_owned(), arguments: param.arguments.unwrap_or_default() }
    }
}

pub struct Dispatcher<T: Toolset> {
    registry: Registry<T::Kind>,
    toolset: T,
}

impl<T: Toolset> Dispatcher<T> {
    pub fn new(toolset: T) -> Self {
        Self { registry: Registry::new(), toolset }
    }

    pub fn registry(&self) -> &Registry<T::Kind> {
        &self.registry
    }

    pub fn toolset(&self) -> &T {
        &self.toolset
    }

    pub async fn handle(&self, request: ToolRequest) -> CallToolResult {
        let Some(tool) = self.registry.resolve(&request.name) else {
            tracing::warn!(tool = %request.name, "unknown tool requested");
            return error_response(format!("Unknown tool: {}", request.name));
        };

        tracing::debug!(tool = tool.name(), "dispatching");
        let outcome = AssertUnwindSafe(self.toolset.execute(tool, request.arguments))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(ToolError::panicked(payload)));
        match outcome {
            Ok(message) => {
                tracing::info!(tool = tool.name(), "{}", message);
                CallToolResult::success(vec![Content::text(message)])
            }
            Err(err) => {
                tracing::warn!(tool = tool.name(), error = %err, "tool failed");
                error_response(format!("Error: {}", err))
            }
        }
    }
}

fn error_response(message: String) -> CallToolResult {
    CallToolResult::error(vec![Content::text(message)])
}

/// Text of the first content block, if it is text.
pub fn response_text(result: &CallToolResult) -> Option<&str> {
    result.content.first().and_then(|c| c.as_text()).map(|t| t.text.as_str())
}
