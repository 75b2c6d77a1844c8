//! Ticket creation tool for MCP operations
//!
//! This module provides the CreateTicketTool for creating new tickets through the MCP protocol.

use crate::dispatcher::CreateOptions;
use crate::mcp::responses::create_outcome_response;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::types::CreateTicketRequest;
use crate::mcp::utils::{generate_tool_schema, require_non_empty};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;

/// Tool for creating new tickets
#[derive(Default)]
pub struct CreateTicketTool;

impl CreateTicketTool {
    /// Creates a new instance of the CreateTicketTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for CreateTicketTool {
    fn name(&self) -> &'static str {
        "create_ticket"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        generate_tool_schema::<CreateTicketRequest>()
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: CreateTicketRequest = BaseToolImpl::parse_arguments(arguments)?;
        require_non_empty(&request.summary, "summary")?;

        tracing::debug!("Creating ticket: {}", request.summary);

        let options = CreateOptions::from(request);
        let outcome = context.dispatcher.create_ticket(&options).await;
        Ok(create_outcome_response(&outcome))
    }
}
