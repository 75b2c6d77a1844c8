//! Template suggestion tool for MCP operations
//!
//! Classifies ticket text locally; no script is run.

use crate::mcp::responses::create_json_response;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::types::SuggestTemplateRequest;
use crate::mcp::utils::generate_tool_schema;
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;

/// Tool for suggesting a description template
#[derive(Default)]
pub struct SuggestTemplateTool;

impl SuggestTemplateTool {
    /// Creates a new instance of the SuggestTemplateTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for SuggestTemplateTool {
    fn name(&self) -> &'static str {
        "suggest_template"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        generate_tool_schema::<SuggestTemplateRequest>()
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: SuggestTemplateRequest = BaseToolImpl::parse_arguments(arguments)?;

        let response = context.dispatcher.suggest_template(
            &request.summary,
            request.description.as_deref(),
            request.issue_type.as_deref(),
        );
        Ok(create_json_response(&response, false))
    }
}
