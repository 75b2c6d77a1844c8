//! Ticket tools for MCP operations
//!
//! This module provides the ticket tools using the tool registry pattern.
//! Each tool is in its own submodule with dedicated implementation and description.

pub mod close;
pub mod create;
pub mod find_related;
pub mod groom;
pub mod suggest_template;
pub mod sync;

use crate::mcp::tool_registry::ToolRegistry;

/// Register all ticket tools with the registry
pub fn register_ticket_tools(registry: &mut ToolRegistry) {
    registry.register(groom::GroomTicketTool::new());
    registry.register(create::CreateTicketTool::new());
    registry.register(find_related::FindRelatedTicketsTool::new());
    registry.register(close::CloseTicketTool::new());
    registry.register(sync::SyncToConfluenceTool::new());
    registry.register(suggest_template::SuggestTemplateTool::new());
}
