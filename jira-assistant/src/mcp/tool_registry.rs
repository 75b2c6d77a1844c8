//! Tool registry for MCP operations
//!
//! Tools are registered by name and looked up when a call arrives, so adding
//! a tool never touches the server's request handling.

use crate::dispatcher::Dispatcher;
use rmcp::model::{CallToolResult, Tool};
use rmcp::Error as McpError;
use std::collections::HashMap;
use std::sync::Arc;

/// Context shared by all tools during execution
#[derive(Clone, Debug)]
pub struct ToolContext {
    /// Runs the ticket operations
    pub dispatcher: Arc<Dispatcher>,
}

impl ToolContext {
    /// Create a new tool context
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

/// Trait defining the interface for all MCP tools
#[async_trait::async_trait]
pub trait McpTool: Send + Sync {
    /// Get the tool's name
    fn name(&self) -> &'static str;

    /// Get the tool's description
    fn description(&self) -> &'static str;

    /// Get the tool's JSON schema for arguments
    fn schema(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments and context
    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError>;
}

/// Registry for managing MCP tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn McpTool>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool in the registry
    pub fn register<T: McpTool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        self.tools.insert(name, Box::new(tool));
    }

    /// Get a tool by name
    pub fn get_tool(&self, name: &str) -> Option<&dyn McpTool> {
        self.tools.get(name).map(|tool| tool.as_ref())
    }

    /// List all registered tool names, sorted
    pub fn list_tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get all registered tools as Tool objects for MCP list_tools response
    pub fn list_tools(&self) -> Vec<Tool> {
        let mut tools: Vec<Tool> = self
            .tools
            .values()
            .map(|tool| {
                let schema_map = match tool.schema() {
                    serde_json::Value::Object(map) => map,
                    _ => serde_json::Map::new(),
                };

                Tool {
                    name: tool.name().into(),
                    description: Some(tool.description().into()),
                    input_schema: Arc::new(schema_map),
                    annotations: None,
                }
            })
            .collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Base implementation providing common utility methods for MCP tools
pub struct BaseToolImpl;

impl BaseToolImpl {
    /// Parse tool arguments from a JSON map into a typed struct
    ///
    /// # Arguments
    ///
    /// * `arguments` - The JSON map of arguments from the MCP request
    ///
    /// # Returns
    ///
    /// * `Result<T, McpError>` - The parsed arguments or an `invalid_params` error
    pub fn parse_arguments<T: serde::de::DeserializeOwned>(
        arguments: serde_json::Map<String, serde_json::Value>,
    ) -> std::result::Result<T, McpError> {
        serde_json::from_value(serde_json::Value::Object(arguments))
            .map_err(|e| McpError::invalid_params(format!("Invalid arguments: {e}"), None))
    }
}

/// Register the ticket tools with the registry
pub fn register_ticket_tools(registry: &mut ToolRegistry) {
    use crate::mcp::tools::tickets;
    tickets::register_ticket_tools(registry);
}

/// Register the Confluence tools with the registry
pub fn register_confluence_tools(registry: &mut ToolRegistry) {
    use crate::mcp::tools::confluence;
    confluence::register_confluence_tools(registry);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::mcp::responses::create_json_response;
    use crate::test_utils::RecordingRunner;

    /// Mock tool for testing
    struct MockTool {
        name: &'static str,
        description: &'static str,
    }

    #[async_trait::async_trait]
    impl McpTool for MockTool {
        fn name(&self) -> &'static str {
            self.name
        }

        fn description(&self) -> &'static str {
            self.description
        }

        fn schema(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": {},
                "required": []
            })
        }

        async fn execute(
            &self,
            _arguments: serde_json::Map<String, serde_json::Value>,
            context: &ToolContext,
        ) -> std::result::Result<CallToolResult, McpError> {
            let key = &context.dispatcher.config().project_key;
            Ok(create_json_response(
                &serde_json::json!({"success": true, "tool": self.name, "project": key}),
                false,
            ))
        }
    }

    fn context() -> ToolContext {
        let config = Config::for_project(std::env::temp_dir());
        let dispatcher = Dispatcher::with_runner(config, Arc::new(RecordingRunner::new()));
        ToolContext::new(Arc::new(dispatcher))
    }

    #[test]
    fn test_tool_registry_creation() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_tool_registration_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(MockTool {
            name: "lookup_test",
            description: "A lookup test tool",
        });

        assert_eq!(registry.len(), 1);
        let tool = registry.get_tool("lookup_test").unwrap();
        assert_eq!(tool.description(), "A lookup test tool");
        assert!(registry.get_tool("nonexistent").is_none());
    }

    #[test]
    fn test_list_tools_is_sorted() {
        let mut registry = ToolRegistry::new();
        registry.register(MockTool {
            name: "zeta",
            description: "z",
        });
        registry.register(MockTool {
            name: "alpha",
            description: "a",
        });

        let names: Vec<_> = registry
            .list_tools()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
        assert_eq!(registry.list_tool_names(), vec!["alpha", "zeta"]);
    }

    #[tokio::test]
    async fn test_tool_execution() {
        let tool = MockTool {
            name: "exec_test",
            description: "Execution test tool",
        };

        let result = tool.execute(serde_json::Map::new(), &context()).await.unwrap();
        assert_eq!(result.is_error, Some(false));
        assert!(!result.content.is_empty());
    }

    #[test]
    fn test_all_tools_registered() {
        let mut registry = ToolRegistry::new();
        register_ticket_tools(&mut registry);
        register_confluence_tools(&mut registry);

        assert_eq!(
            registry.list_tool_names(),
            vec![
                "close_ticket",
                "create_ticket",
                "fetch_confluence_page",
                "find_related_tickets",
                "groom_ticket",
                "suggest_template",
                "sync_to_confluence",
            ]
        );
        for tool in registry.list_tools() {
            assert!(!tool.description.unwrap_or_default().is_empty());
            assert_eq!(tool.input_schema.get("type"), Some(&serde_json::json!("object")));
        }
    }

    #[test]
    fn test_parse_arguments_error_mentions_field() {
        use crate::mcp::types::CloseTicketRequest;

        let result: std::result::Result<CloseTicketRequest, McpError> =
            BaseToolImpl::parse_arguments(serde_json::Map::new());
        let err = result.unwrap_err();
        assert!(err.message.starts_with("Invalid arguments"));
        assert!(err.message.contains("ticket_key"));
    }
}
