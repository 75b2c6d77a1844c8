//! Confluence tools for MCP operations

pub mod fetch;

use crate::mcp::tool_registry::ToolRegistry;

/// Register all Confluence tools with the registry
pub fn register_confluence_tools(registry: &mut ToolRegistry) {
    registry.register(fetch::FetchConfluencePageTool::new());
}
