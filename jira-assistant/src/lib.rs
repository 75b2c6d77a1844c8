//! # jira-assistant
//!
//! Ticket grooming and document tooling for AI assistants, served over the
//! Model Context Protocol.
//!
//! ## Features
//!
//! - **Script harness**: Run the Jira automation scripts with a time bound and
//!   uniform success/failure results
//! - **Template classifier**: Pick a description template from ticket text
//! - **ADF documents**: Build estimation comments and merge documents
//! - **MCP support**: Tools for every ticket operation and templates as resources
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jira_assistant::{Config, Dispatcher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let dispatcher = Dispatcher::new(config);
//!
//! let outcome = dispatcher.find_related_tickets("RVV-1234").await;
//! println!("{}", serde_json::to_string_pretty(&outcome)?);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Atlassian Document Format model, estimation comments and merging
pub mod adf;

/// Ticket text classification into description templates
pub mod classifier;

/// Shared utilities
pub mod common;

/// Configuration loading and validation
pub mod config;

/// Ticket operations on top of the script harness
pub mod dispatcher;

/// Error types used throughout the library
pub mod error;

/// Model Context Protocol (MCP) server support
pub mod mcp;

/// Script execution harness
pub mod process;

/// Description templates as resources
pub mod prompts;

// Re-export core types
pub use adf::{build_estimation_document, merge, Document, EstimationComment, Mark, Node};
pub use classifier::{classify, template_file_for_issue_type, TemplateCategory, TemplateClassifier};
pub use config::Config;
pub use dispatcher::{Dispatcher, Outcome, TemplateSelection};
pub use error::{AdfError, ConfigError, JiraAssistantError, Result};
pub use process::{ExecutionResult, Script, ScriptExecutor, ScriptRunner};
pub use prompts::{PromptTemplate, PromptTemplates};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Config, Dispatcher, Document, ExecutionResult, JiraAssistantError, Outcome, Result,
        ScriptRunner, TemplateCategory,
    };

    pub use crate::mcp::McpServer;
}

/// Test utilities module for testing support
#[doc(hidden)]
pub mod test_utils;
