//! Request types for MCP tools
//!
//! Each struct doubles as the tool's input schema (via `schemars`) and as the
//! argument parser (via `serde`). Defaults declared here show up in the
//! published schema.

use crate::dispatcher::{CreateOptions, FetchOptions, GroomOptions};
use serde::Deserialize;

fn default_true() -> bool {
    true
}

fn default_priority() -> String {
    "Medium".to_string()
}

fn default_issue_type() -> String {
    "Task".to_string()
}

/// Request to groom a ticket
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GroomTicketRequest {
    /// Ticket key, e.g. RVV-1234
    pub ticket_key: String,
    /// Path to a local file with reference material
    pub reference_file: Option<String>,
    /// Confluence page to fetch and use as reference material
    pub confluence_url: Option<String>,
    /// Technical guide in ADF JSON format
    pub ai_guide: Option<String>,
    /// AI-generated description in plain text
    pub ai_description: Option<String>,
    /// Select the description template for the ticket automatically
    #[serde(default)]
    pub auto_template: bool,
    /// Request an AI story point estimate
    #[serde(default)]
    pub estimate: bool,
    /// Apply the estimate without confirmation
    #[serde(default)]
    pub auto_estimate: bool,
    /// Scale the estimate to the team's velocity
    #[serde(default = "default_true")]
    pub team_scale: bool,
    /// Story points to set directly; overrides estimation
    pub story_points: Option<serde_json::Number>,
}

impl From<GroomTicketRequest> for GroomOptions {
    fn from(request: GroomTicketRequest) -> Self {
        GroomOptions {
            ticket_key: request.ticket_key,
            reference_file: request.reference_file,
            confluence_url: request.confluence_url,
            ai_guide: request.ai_guide,
            ai_description: request.ai_description,
            auto_template: request.auto_template,
            estimate: request.estimate,
            auto_estimate: request.auto_estimate,
            team_scale: request.team_scale,
            story_points: request.story_points,
        }
    }
}

/// Request to create a ticket
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateTicketRequest {
    /// One-line summary of the ticket
    pub summary: String,
    /// Ticket description
    pub description: Option<String>,
    /// Features or acceptance criteria
    pub features: Option<String>,
    /// Priority (Highest, High, Medium, Low, Lowest)
    #[serde(default = "default_priority")]
    pub priority: String,
    /// Issue type (Task, Story, Bug, ...)
    #[serde(default = "default_issue_type")]
    pub issue_type: String,
    /// Epic the ticket belongs to
    pub epic: Option<String>,
}

impl From<CreateTicketRequest> for CreateOptions {
    fn from(request: CreateTicketRequest) -> Self {
        CreateOptions {
            summary: request.summary,
            description: request.description,
            features: request.features,
            priority: Some(request.priority),
            issue_type: Some(request.issue_type),
            epic: request.epic,
        }
    }
}

/// Request to fetch a Confluence page
#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct FetchConfluencePageRequest {
    /// Full page URL
    pub page_url: Option<String>,
    /// Page id, used when no URL is given
    pub page_id: Option<String>,
    /// File to write the page to
    pub output_file: Option<String>,
}

impl From<FetchConfluencePageRequest> for FetchOptions {
    fn from(request: FetchConfluencePageRequest) -> Self {
        FetchOptions {
            page_url: request.page_url,
            page_id: request.page_id,
            output_file: request.output_file,
        }
    }
}

/// Request to list tickets related to a ticket
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FindRelatedTicketsRequest {
    /// Ticket key, e.g. RVV-1234
    pub ticket_key: String,
}

/// Request to close a ticket
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CloseTicketRequest {
    /// Ticket key, e.g. RVV-1234
    pub ticket_key: String,
    /// Closing comment
    pub comment: Option<String>,
}

/// Request to sync a ticket to a Confluence page
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SyncToConfluenceRequest {
    /// Ticket key, e.g. RVV-1234
    pub ticket_key: String,
    /// Confluence page id
    pub page_id: String,
}

/// Request to suggest a description template
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SuggestTemplateRequest {
    /// Ticket summary
    pub summary: String,
    /// Ticket description
    pub description: Option<String>,
    /// Explicit issue type, takes precedence over the text
    pub issue_type: Option<String>,
}
