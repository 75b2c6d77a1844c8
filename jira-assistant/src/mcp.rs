//! Model Context Protocol (MCP) server support
//!
//! Exposes the ticket operations as MCP tools and the description templates
//! as `prompt://` resources. Tool calls never fail at the protocol level:
//! unknown tools, invalid arguments and failed scripts all come back as a
//! JSON `{"success": false, "error": ...}` result with `is_error` set.

use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::error::{JiraAssistantError, Result};
use crate::prompts::{PromptTemplates, TEMPLATE_MIME_TYPE};
use rmcp::model::*;
use rmcp::service::RequestContext;
use rmcp::{Error as McpError, RoleServer, ServerHandler};
use std::sync::Arc;

pub mod responses;
pub mod tool_registry;
pub mod tools;
pub mod types;
pub mod utils;

use responses::create_error_response;
use tool_registry::{register_confluence_tools, register_ticket_tools, ToolContext, ToolRegistry};

const SERVER_NAME: &str = "jira-assistant";

const INSTRUCTIONS: &str = "Jira ticket automation. Use groom_ticket to enrich a ticket with AI \
content and estimates, create_ticket, close_ticket and find_related_tickets to manage tickets, \
fetch_confluence_page and sync_to_confluence to work with Confluence, and suggest_template to pick \
a description template. Description templates are available as prompt:// resources. Every tool \
returns a JSON object with a success flag.";

/// MCP server for the ticket tools and template resources
#[derive(Clone)]
pub struct McpServer {
    tool_registry: Arc<ToolRegistry>,
    tool_context: Arc<ToolContext>,
}

impl McpServer {
    /// Create a server that runs the scripts named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, most commonly
    /// because the scripts directory does not exist.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        tracing::info!(
            "Serving scripts from {} (timeout {}s)",
            config.scripts_dir.display(),
            config.script_timeout.as_secs()
        );
        Ok(Self::with_dispatcher(Dispatcher::new(config)))
    }

    /// Create a server around an existing dispatcher
    pub fn with_dispatcher(dispatcher: Dispatcher) -> Self {
        let mut tool_registry = ToolRegistry::new();
        register_ticket_tools(&mut tool_registry);
        register_confluence_tools(&mut tool_registry);

        Self {
            tool_registry: Arc::new(tool_registry),
            tool_context: Arc::new(ToolContext::new(Arc::new(dispatcher))),
        }
    }

    fn templates(&self) -> &PromptTemplates {
        self.tool_context.dispatcher.templates()
    }

    /// Names of the registered tools, sorted
    pub fn tool_names(&self) -> Vec<String> {
        self.tool_registry.list_tool_names()
    }

    /// Run a tool by name.
    ///
    /// Every failure is folded into the returned result.
    pub async fn call(
        &self,
        name: &str,
        arguments: serde_json::Map<String, serde_json::Value>,
    ) -> CallToolResult {
        let Some(tool) = self.tool_registry.get_tool(name) else {
            tracing::warn!("Unknown tool requested: {}", name);
            return create_error_response(format!("Unknown tool: {name}"));
        };

        match tool.execute(arguments, &self.tool_context).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Tool {} rejected the call: {}", name, e.message);
                create_error_response(e.message.to_string())
            }
        }
    }

    /// Templates as MCP resources
    pub fn resources(&self) -> Vec<Resource> {
        self.templates()
            .list()
            .into_iter()
            .map(|template| {
                let mut raw = RawResource::new(template.uri, template.name);
                raw.description = Some(template.description);
                raw.mime_type = Some(TEMPLATE_MIME_TYPE.to_string());
                Annotated::new(raw, None)
            })
            .collect()
    }

    /// Contents of a template resource
    pub fn read_template(&self, uri: &str) -> std::result::Result<ReadResourceResult, McpError> {
        match self.templates().read(uri) {
            Ok(text) => Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(text, uri)],
            }),
            Err(JiraAssistantError::Template(message)) => {
                tracing::warn!("{}", message);
                Err(McpError::invalid_params(message, None))
            }
            Err(e) => Err(McpError::internal_error(
                format!("Failed to read {uri}: {e}"),
                None,
            )),
        }
    }
}

impl ServerHandler for McpServer {
    async fn initialize(
        &self,
        request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<InitializeResult, McpError> {
        tracing::info!(
            "MCP client connecting: {} v{}",
            request.client_info.name,
            request.client_info.version
        );
        Ok(self.get_info())
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_registry.list_tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        Ok(self
            .call(&request.name, request.arguments.unwrap_or_default())
            .await)
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult {
            resources: self.resources(),
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ReadResourceResult, McpError> {
        self.read_template(&request.uri)
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities {
                prompts: None,
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                resources: Some(ResourcesCapability {
                    subscribe: Some(false),
                    list_changed: Some(false),
                }),
                logging: None,
                completions: None,
                experimental: None,
            },
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: crate::VERSION.into(),
            },
            instructions: Some(INSTRUCTIONS.into()),
        }
    }
}
