//! Related ticket search tool for MCP operations

use crate::mcp::responses::create_outcome_response;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::types::FindRelatedTicketsRequest;
use crate::mcp::utils::{generate_tool_schema, require_non_empty};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;

/// Tool for finding tickets related to a ticket
#[derive(Default)]
pub struct FindRelatedTicketsTool;

impl FindRelatedTicketsTool {
    /// Creates a new instance of the FindRelatedTicketsTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for FindRelatedTicketsTool {
    fn name(&self) -> &'static str {
        "find_related_tickets"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        generate_tool_schema::<FindRelatedTicketsRequest>()
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: FindRelatedTicketsRequest = BaseToolImpl::parse_arguments(arguments)?;
        require_non_empty(&request.ticket_key, "ticket_key")?;

        let outcome = context
            .dispatcher
            .find_related_tickets(&request.ticket_key)
            .await;
        Ok(create_outcome_response(&outcome))
    }
}
