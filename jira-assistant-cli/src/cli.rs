use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "jira-assistant")]
#[command(version)]
#[command(about = "An MCP server for Jira ticket grooming and ADF documents")]
#[command(long_about = "
jira-assistant exposes Jira automation scripts to AI assistants over the
Model Context Protocol (MCP), and provides helpers for building and merging
Atlassian Document Format (ADF) documents.

Example usage:
  jira-assistant serve                                   # Run as MCP server
  jira-assistant classify \"Investigate login issue\"      # Suggest a template
  jira-assistant merge-adf --original a.json --enhanced b.json --output c.json
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run as MCP server over stdio
    #[command(long_about = "
Runs jira-assistant as an MCP server on stdin/stdout. The server:

- Exposes groom_ticket, create_ticket, fetch_confluence_page,
  find_related_tickets, close_ticket, sync_to_confluence and
  suggest_template as tools
- Exposes description templates as prompt:// resources
- Runs the scripts in the configured scripts directory

Configuration comes from JIRA_ASSISTANT_* environment variables, a
jira-assistant.yaml file in the project directory, and a .env file in the
working directory.

Example:
  jira-assistant serve
")]
    Serve,
    /// Write an ADF estimation comment
    #[command(long_about = "
Builds the ADF estimation comment for a ticket and writes it as JSON.
The explanation is kept verbatim inside a code block.

Examples:
  jira-assistant generate-estimation --points 5 --explanation \"...\" --output est.json
  jira-assistant generate-estimation --points 3 --explanation \"...\" --output doc.json --document-only
")]
    GenerateEstimation {
        /// Estimated story points
        #[arg(long)]
        points: String,

        /// Estimation explanation text
        #[arg(long)]
        explanation: String,

        /// Path to write the JSON payload
        #[arg(long)]
        output: PathBuf,

        /// Write the bare document instead of the {\"body\": ...} comment payload
        #[arg(long)]
        document_only: bool,
    },
    /// Merge two ADF documents (original then enhanced)
    MergeAdf {
        /// Path to the original ADF JSON file
        #[arg(long)]
        original: PathBuf,

        /// Path to the enhanced ADF JSON file
        #[arg(long)]
        enhanced: PathBuf,

        /// Path to write the merged ADF JSON file
        #[arg(long)]
        output: PathBuf,
    },
    /// Suggest a description template for ticket text
    #[command(long_about = "
Classifies ticket text into story, bug, spike or tech-debt and prints the
suggested template as JSON. An explicit issue type takes precedence over
the text.

Examples:
  jira-assistant classify \"Spring Boot 3 upgrade\" --description \"Upgrade to Java 17\"
  jira-assistant classify \"Login page\" --issue-type Bug
")]
    Classify {
        /// Ticket summary
        summary: String,

        /// Ticket description
        #[arg(long)]
        description: Option<String>,

        /// Jira issue type
        #[arg(long)]
        issue_type: Option<String>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn try_parse_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(args)
    }
}
