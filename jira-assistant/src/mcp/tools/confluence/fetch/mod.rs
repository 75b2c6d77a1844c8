//! Confluence page fetch tool for MCP operations

use crate::dispatcher::FetchOptions;
use crate::mcp::responses::create_outcome_response;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::types::FetchConfluencePageRequest;
use crate::mcp::utils::generate_tool_schema;
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;

/// Tool for fetching Confluence pages into local files
#[derive(Default)]
pub struct FetchConfluencePageTool;

impl FetchConfluencePageTool {
    /// Creates a new instance of the FetchConfluencePageTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for FetchConfluencePageTool {
    fn name(&self) -> &'static str {
        "fetch_confluence_page"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        generate_tool_schema::<FetchConfluencePageRequest>()
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: FetchConfluencePageRequest = BaseToolImpl::parse_arguments(arguments)?;

        let options = FetchOptions::from(request);
        let outcome = context.dispatcher.fetch_confluence_page(&options).await;
        Ok(create_outcome_response(&outcome))
    }
}
