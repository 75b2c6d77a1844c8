//! Ticket grooming tool for MCP operations
//!
//! This module provides the GroomTicketTool, which runs `jira-groom.sh` with
//! reference material, AI content and estimation options.

use crate::dispatcher::GroomOptions;
use crate::mcp::responses::create_outcome_response;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::types::GroomTicketRequest;
use crate::mcp::utils::{generate_tool_schema, require_non_empty};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;

/// Tool for grooming tickets
#[derive(Default)]
pub struct GroomTicketTool;

impl GroomTicketTool {
    /// Creates a new instance of the GroomTicketTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for GroomTicketTool {
    fn name(&self) -> &'static str {
        "groom_ticket"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        generate_tool_schema::<GroomTicketRequest>()
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: GroomTicketRequest = BaseToolImpl::parse_arguments(arguments)?;
        require_non_empty(&request.ticket_key, "ticket_key")?;

        tracing::debug!("Grooming ticket {}", request.ticket_key);

        let options = GroomOptions::from(request);
        let outcome = context.dispatcher.groom_ticket(&options).await;
        Ok(create_outcome_response(&outcome))
    }
}
