//! `serve` command: the MCP server on stdio

use crate::exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_WARNING};
use jira_assistant::{mcp::McpServer, Config};
use rmcp::serve_server;
use rmcp::transport::io::stdio;
use tokio_util::sync::CancellationToken;

/// Load `.env` from the working directory, if there is one.
///
/// The variables end up in this process's environment and so in every
/// script the server spawns.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::info!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => tracing::warn!("Failed to load .env: {}", e),
    }
}

/// Run the MCP server until the client disconnects or ctrl+c
pub async fn run_server() -> i32 {
    load_dotenv();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            eprintln!("Error: {e}");
            return EXIT_ERROR;
        }
    };

    let server = match McpServer::new(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to create MCP server: {}", e);
            eprintln!("Error: {e}");
            return EXIT_ERROR;
        }
    };
    tracing::info!("Tools: {}", server.tool_names().join(", "));

    let ct = CancellationToken::new();
    let ct_signal = ct.clone();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Shutdown signal received"),
            Err(e) => tracing::error!("Failed to listen for ctrl+c: {}", e),
        }
        ct_signal.cancel();
    });

    let running = match serve_server(server, stdio()).await {
        Ok(running) => running,
        Err(e) => {
            tracing::error!("MCP server error: {}", e);
            return EXIT_WARNING;
        }
    };
    tracing::info!("MCP server started");

    tokio::select! {
        result = running.waiting() => {
            if let Err(e) = result {
                tracing::error!("MCP server stopped with an error: {}", e);
                return EXIT_WARNING;
            }
            tracing::info!("MCP client disconnected");
        }
        _ = ct.cancelled() => {
            tracing::info!("MCP server shutting down");
        }
    }

    EXIT_SUCCESS
}
