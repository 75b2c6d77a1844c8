//! Confluence sync tool for MCP operations

use crate::mcp::responses::create_outcome_response;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::types::SyncToConfluenceRequest;
use crate::mcp::utils::{generate_tool_schema, require_non_empty};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;

/// Tool for syncing a ticket to a Confluence page
#[derive(Default)]
pub struct SyncToConfluenceTool;

impl SyncToConfluenceTool {
    /// Creates a new instance of the SyncToConfluenceTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for SyncToConfluenceTool {
    fn name(&self) -> &'static str {
        "sync_to_confluence"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        generate_tool_schema::<SyncToConfluenceRequest>()
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: SyncToConfluenceRequest = BaseToolImpl::parse_arguments(arguments)?;
        require_non_empty(&request.ticket_key, "ticket_key")?;
        require_non_empty(&request.page_id, "page_id")?;

        let outcome = context
            .dispatcher
            .sync_to_confluence(&request.ticket_key, &request.page_id)
            .await;
        Ok(create_outcome_response(&outcome))
    }
}
