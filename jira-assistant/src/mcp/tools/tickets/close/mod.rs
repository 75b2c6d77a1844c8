//! Ticket closing tool for MCP operations

use crate::mcp::responses::create_outcome_response;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::types::CloseTicketRequest;
use crate::mcp::utils::{generate_tool_schema, require_non_empty};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;

/// Tool for closing tickets
#[derive(Default)]
pub struct CloseTicketTool;

impl CloseTicketTool {
    /// Creates a new instance of the CloseTicketTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for CloseTicketTool {
    fn name(&self) -> &'static str {
        "close_ticket"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        generate_tool_schema::<CloseTicketRequest>()
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: CloseTicketRequest = BaseToolImpl::parse_arguments(arguments)?;
        require_non_empty(&request.ticket_key, "ticket_key")?;

        let outcome = context
            .dispatcher
            .close_ticket(&request.ticket_key, request.comment.as_deref())
            .await;
        Ok(create_outcome_response(&outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::dispatcher::Dispatcher;
    use crate::mcp::responses::response_text;
    use crate::process::ExecutionResult;
    use crate::test_utils::RecordingRunner;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_close_failure_sets_is_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let runner = RecordingRunner::new().respond(
            "jira-close.sh",
            ExecutionResult::failure("Script not found: jira-close.sh"),
        );
        let dispatcher =
            Dispatcher::with_runner(Config::for_project(temp.path()), Arc::new(runner));
        let context = ToolContext::new(Arc::new(dispatcher));

        let arguments = serde_json::json!({"ticket_key": "RVV-3"});
        let result = CloseTicketTool::new()
            .execute(arguments.as_object().unwrap().clone(), &context)
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        let body: serde_json::Value =
            serde_json::from_str(response_text(&result).unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"success": false, "error": "Script not found: jira-close.sh"})
        );
    }
}
