//! Ticket operations
//!
//! Each operation turns caller parameters into an argument vector for one of
//! the automation scripts, runs it through a [`ScriptRunner`] and shapes the
//! outcome. A failed invocation is handed back unchanged as
//! [`Outcome::Failure`]; only a successful one is turned into the richer
//! per-operation response.

use crate::classifier::{self, TemplateCategory};
use crate::config::Config;
use crate::process::{ExecutionResult, Script, ScriptExecutor, ScriptRunner};
use crate::prompts::PromptTemplates;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Template chosen for a ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSelection {
    /// Path of the template file
    pub template_path: String,
    /// Short name, e.g. `story`
    pub template_name: String,
}

impl TemplateSelection {
    /// Build a selection from a template path
    pub fn from_path(path: impl Into<String>) -> Self {
        let template_path = path.into();
        Self {
            template_name: classifier::template_name(&template_path),
            template_path,
        }
    }
}

/// Result of an operation: the shaped response, or the failed invocation
/// verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome<T> {
    /// The script succeeded
    Success(T),
    /// The script (or a prerequisite) failed
    Failure {
        /// The failed invocation
        #[serde(flatten)]
        result: ExecutionResult,
        /// Template looked up before the failure, if any
        #[serde(skip_serializing_if = "Option::is_none")]
        template: Option<TemplateSelection>,
    },
}

impl<T> Outcome<T> {
    /// Wrap a failed invocation
    pub fn failure(result: ExecutionResult) -> Self {
        Outcome::Failure {
            result,
            template: None,
        }
    }

    /// Whether the operation succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// The success response, if any
    pub fn success(&self) -> Option<&T> {
        match self {
            Outcome::Success(response) => Some(response),
            Outcome::Failure { .. } => None,
        }
    }

    /// The failed invocation, if any
    pub fn failed(&self) -> Option<&ExecutionResult> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure { result, .. } => Some(result),
        }
    }
}

/// Parameters for grooming a ticket
#[derive(Debug, Clone, PartialEq)]
pub struct GroomOptions {
    /// Ticket to groom
    pub ticket_key: String,
    /// Local file with reference material
    pub reference_file: Option<String>,
    /// Confluence page fetched into a temporary reference file
    pub confluence_url: Option<String>,
    /// Technical guide as ADF JSON
    pub ai_guide: Option<String>,
    /// AI-written description as plain text
    pub ai_description: Option<String>,
    /// Look up the description template first
    pub auto_template: bool,
    /// Ask the script for an estimate
    pub estimate: bool,
    /// Let the script post the estimate without confirmation
    pub auto_estimate: bool,
    /// Scale the estimate to the team's history
    pub team_scale: bool,
    /// Explicit story points, overriding any estimation flags. Passed to the
    /// script exactly as written, so `5` and `5.0` stay distinct.
    pub story_points: Option<serde_json::Number>,
}

impl GroomOptions {
    /// Options with defaults for everything but the ticket
    pub fn new(ticket_key: impl Into<String>) -> Self {
        Self {
            ticket_key: ticket_key.into(),
            reference_file: None,
            confluence_url: None,
            ai_guide: None,
            ai_description: None,
            auto_template: false,
            estimate: false,
            auto_estimate: false,
            team_scale: true,
            story_points: None,
        }
    }
}

/// Parameters for creating a ticket
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOptions {
    /// Ticket summary
    pub summary: String,
    /// Ticket description
    pub description: Option<String>,
    /// Feature list
    pub features: Option<String>,
    /// Priority, `Medium` when absent
    pub priority: Option<String>,
    /// Issue type, `Task` when absent
    pub issue_type: Option<String>,
    /// Parent epic
    pub epic: Option<String>,
}

/// Parameters for fetching a Confluence page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Page URL, preferred over `page_id`
    pub page_url: Option<String>,
    /// Numeric page id
    pub page_id: Option<String>,
    /// Where the script should write the page
    pub output_file: Option<String>,
}

/// Response of a successful groom
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroomResponse {
    /// Always true
    pub success: bool,
    /// Groomed ticket
    pub ticket_key: String,
    /// Summary line
    pub message: String,
    /// Script output
    pub output: String,
    /// Template looked up with `auto_template`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<TemplateSelection>,
}

/// Response of a successful create
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateResponse {
    /// Always true
    pub success: bool,
    /// Key found in the script output, `null` when none was printed
    pub ticket_key: Option<String>,
    /// Summary line
    pub message: String,
    /// Script output
    pub output: String,
    /// Issue type the caller asked for
    pub issue_type: String,
}

/// Response of a successful related-ticket search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FindRelatedResponse {
    /// Always true
    pub success: bool,
    /// Ticket searched from
    pub ticket_key: String,
    /// Script output listing the related tickets
    pub output: String,
}

/// Response of a successful close
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CloseResponse {
    /// Always true
    pub success: bool,
    /// Closed ticket
    pub ticket_key: String,
    /// Summary line
    pub message: String,
    /// Script output
    pub output: String,
}

/// Response of a successful sync
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncResponse {
    /// Always true
    pub success: bool,
    /// Synced ticket
    pub ticket_key: String,
    /// Target page
    pub page_id: String,
    /// Summary line
    pub message: String,
    /// Script output
    pub output: String,
}

/// Response of a successful fetch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchResponse {
    /// Always true
    pub success: bool,
    /// Requested URL
    pub page_url: Option<String>,
    /// Requested page id
    pub page_id: Option<String>,
    /// Where the page was written
    pub output_file: Option<String>,
    /// Summary line
    pub message: String,
    /// Script output
    pub output: String,
}

/// Response of a template suggestion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestTemplateResponse {
    /// Always true
    pub success: bool,
    /// Category inferred from the summary and description
    pub category: TemplateCategory,
    /// Template file to use
    pub template_file: String,
    /// Path of the template when it exists in the templates directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_path: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn push_flag(args: &mut Vec<String>, flag: &str, value: Option<&str>) {
    if let Some(value) = value {
        args.push(flag.to_string());
        args.push(value.to_string());
    }
}

/// First `<PROJECT>-<number>` ticket key in `output`, scanning line by line
pub fn extract_ticket_key(project_key: &str, output: &str) -> Option<String> {
    let pattern = Regex::new(&format!(r"{}-\d+", regex::escape(project_key))).ok()?;
    output
        .lines()
        .find_map(|line| pattern.find(line))
        .map(|found| found.as_str().to_string())
}

/// Runs ticket operations against the automation scripts
#[derive(Clone)]
pub struct Dispatcher {
    config: Config,
    runner: Arc<dyn ScriptRunner>,
    templates: PromptTemplates,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Dispatcher that spawns the scripts named in `config`
    pub fn new(config: Config) -> Self {
        let runner = Arc::new(ScriptExecutor::from_config(&config));
        Self::with_runner(config, runner)
    }

    /// Dispatcher with a custom runner
    pub fn with_runner(config: Config, runner: Arc<dyn ScriptRunner>) -> Self {
        let templates = PromptTemplates::new(&config.prompts_dir);
        Self {
            config,
            runner,
            templates,
        }
    }

    /// The configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The description templates directory
    pub fn templates(&self) -> &PromptTemplates {
        &self.templates
    }

    async fn run_script(&self, script: Script, args: Vec<String>) -> ExecutionResult {
        self.runner.run(script.file_name(), &args, None).await
    }

    /// Find the description template for a ticket.
    ///
    /// With an issue type the template is picked from the lookup table;
    /// without one the template lookup script decides. `None` means no
    /// template could be determined.
    pub async fn resolve_template(
        &self,
        ticket_key: &str,
        issue_type: Option<&str>,
    ) -> Option<TemplateSelection> {
        if let Some(issue_type) = issue_type.filter(|t| !t.trim().is_empty()) {
            let file = classifier::template_file_for_issue_type(issue_type);
            let path = self.config.prompts_dir.join(file);
            return Some(TemplateSelection::from_path(path.to_string_lossy()));
        }

        let result = self
            .run_script(
                Script::DescriptionTemplate,
                vec![ticket_key.to_string(), "--print".to_string()],
            )
            .await;

        let path = result.output_text().trim();
        if !result.success || path.is_empty() {
            tracing::debug!("No template determined for {}", ticket_key);
            return None;
        }
        Some(TemplateSelection::from_path(path))
    }

    /// Groom a ticket with `jira-groom.sh`
    pub async fn groom_ticket(&self, options: &GroomOptions) -> Outcome<GroomResponse> {
        let key = options.ticket_key.as_str();

        let template = if options.auto_template {
            self.resolve_template(key, None).await
        } else {
            None
        };

        let mut args = vec![key.to_string()];

        // Held until grooming finishes; the file is removed on drop
        let mut _confluence_file = None;
        let mut reference_file = non_empty(&options.reference_file).map(str::to_string);

        if let Some(url) = non_empty(&options.confluence_url) {
            let temp = match tempfile::Builder::new()
                .prefix("confluence_")
                .suffix(".md")
                .tempfile()
            {
                Ok(temp) => temp,
                Err(e) => {
                    return Outcome::failure(ExecutionResult::failure(format!(
                        "Failed to create temporary file: {e}"
                    )))
                }
            };
            let path = temp.path().to_string_lossy().into_owned();

            let fetch = FetchOptions {
                page_url: Some(url.to_string()),
                page_id: None,
                output_file: Some(path.clone()),
            };
            if let Outcome::Failure { result, .. } = self.fetch_confluence_page(&fetch).await {
                return Outcome::failure(result);
            }

            reference_file = Some(path);
            _confluence_file = Some(temp);
        }

        push_flag(&mut args, "--reference-file", reference_file.as_deref());
        push_flag(&mut args, "--ai-guide", non_empty(&options.ai_guide));
        push_flag(&mut args, "--ai-description", non_empty(&options.ai_description));

        if let Some(points) = &options.story_points {
            push_flag(&mut args, "--points", Some(points.to_string().as_str()));
        } else if options.estimate {
            args.push("--estimate".to_string());
            if options.auto_estimate {
                args.push("--auto-estimate".to_string());
            }
            if options.team_scale {
                args.push("--team-scale".to_string());
            }
        }

        let result = self.run_script(Script::Groom, args).await;
        if !result.success {
            return Outcome::Failure { result, template };
        }

        let mut message = format!("Successfully groomed {key}");
        if let Some(template) = &template {
            message.push_str(&format!(" (using {} template)", template.template_name));
        }
        tracing::info!("{}", message);

        Outcome::Success(GroomResponse {
            success: true,
            ticket_key: key.to_string(),
            message,
            output: result.output.unwrap_or_default(),
            template,
        })
    }

    /// Create a ticket with `jira-create.sh`
    pub async fn create_ticket(&self, options: &CreateOptions) -> Outcome<CreateResponse> {
        let mut args = vec!["--summary".to_string(), options.summary.clone()];
        push_flag(&mut args, "--description", non_empty(&options.description));
        push_flag(&mut args, "--features", non_empty(&options.features));
        let priority = match &options.priority {
            Some(priority) => Some(priority.as_str()).filter(|p| !p.is_empty()),
            None => Some("Medium"),
        };
        push_flag(&mut args, "--priority", priority);
        push_flag(&mut args, "--epic", non_empty(&options.epic));

        let result = self.run_script(Script::Create, args).await;
        if !result.success {
            return Outcome::failure(result);
        }

        let output = result.output.unwrap_or_default();
        let ticket_key = extract_ticket_key(&self.config.project_key, &output);
        let message = match &ticket_key {
            Some(key) => format!("Created {key}: {}", options.summary),
            None => {
                tracing::warn!("No ticket key found in jira-create.sh output");
                format!("Created ticket: {}", options.summary)
            }
        };
        tracing::info!("{}", message);

        Outcome::Success(CreateResponse {
            success: true,
            ticket_key,
            message,
            output,
            issue_type: options
                .issue_type
                .clone()
                .unwrap_or_else(|| "Task".to_string()),
        })
    }

    /// List tickets related to `ticket_key`
    pub async fn find_related_tickets(&self, ticket_key: &str) -> Outcome<FindRelatedResponse> {
        let result = self
            .run_script(Script::FindRelated, vec![ticket_key.to_string()])
            .await;
        if !result.success {
            return Outcome::failure(result);
        }

        Outcome::Success(FindRelatedResponse {
            success: true,
            ticket_key: ticket_key.to_string(),
            output: result.output.unwrap_or_default(),
        })
    }

    /// Close a ticket, optionally with a comment
    pub async fn close_ticket(&self, ticket_key: &str, comment: Option<&str>) -> Outcome<CloseResponse> {
        let mut args = vec![ticket_key.to_string()];
        push_flag(&mut args, "--comment", comment.filter(|c| !c.is_empty()));

        let result = self.run_script(Script::Close, args).await;
        if !result.success {
            return Outcome::failure(result);
        }
        tracing::info!("Closed {}", ticket_key);

        Outcome::Success(CloseResponse {
            success: true,
            ticket_key: ticket_key.to_string(),
            message: format!("Closed {ticket_key}"),
            output: result.output.unwrap_or_default(),
        })
    }

    /// Sync a ticket to a Confluence page
    pub async fn sync_to_confluence(&self, ticket_key: &str, page_id: &str) -> Outcome<SyncResponse> {
        let result = self
            .run_script(
                Script::ConfluenceToJira,
                vec![ticket_key.to_string(), page_id.to_string()],
            )
            .await;
        if !result.success {
            return Outcome::failure(result);
        }

        let message = format!("Synced {ticket_key} to Confluence page {page_id}");
        tracing::info!("{}", message);

        Outcome::Success(SyncResponse {
            success: true,
            ticket_key: ticket_key.to_string(),
            page_id: page_id.to_string(),
            message,
            output: result.output.unwrap_or_default(),
        })
    }

    /// Fetch a Confluence page by URL or id
    pub async fn fetch_confluence_page(&self, options: &FetchOptions) -> Outcome<FetchResponse> {
        let mut args = Vec::new();
        if let Some(url) = non_empty(&options.page_url) {
            push_flag(&mut args, "--url", Some(url));
        } else if let Some(id) = non_empty(&options.page_id) {
            push_flag(&mut args, "--page-id", Some(id));
        } else {
            return Outcome::failure(ExecutionResult::failure(
                "Either page_url or page_id is required",
            ));
        }
        push_flag(&mut args, "--output", non_empty(&options.output_file));

        let result = self.run_script(Script::ConfluenceToSpec, args).await;
        if !result.success {
            return Outcome::failure(result);
        }

        let message = match non_empty(&options.output_file) {
            Some(file) => format!("Fetched Confluence page to {file}"),
            None => "Fetched Confluence page".to_string(),
        };
        tracing::info!("{}", message);

        Outcome::Success(FetchResponse {
            success: true,
            page_url: options.page_url.clone(),
            page_id: options.page_id.clone(),
            output_file: options.output_file.clone(),
            message,
            output: result.output.unwrap_or_default(),
        })
    }

    /// Suggest a description template without touching the ticketing system
    pub fn suggest_template(
        &self,
        summary: &str,
        description: Option<&str>,
        issue_type: Option<&str>,
    ) -> SuggestTemplateResponse {
        let category = classifier::classify(summary, description.unwrap_or_default());
        let template_file = match issue_type.filter(|t| !t.trim().is_empty()) {
            Some(issue_type) => classifier::template_file_for_issue_type(issue_type),
            None => category.template_file_name(),
        };
        let template_path = self
            .templates
            .path_for(template_file)
            .map(|path| path.to_string_lossy().into_owned());

        SuggestTemplateResponse {
            success: true,
            category,
            template_file: template_file.to_string(),
            template_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::RecordingRunner;
    use serde_json::json;
    use tempfile::TempDir;

    fn setup(runner: RecordingRunner) -> (Dispatcher, Arc<RecordingRunner>, TempDir) {
        let temp = TempDir::new().unwrap();
        let config = Config::for_project(temp.path());
        let runner = Arc::new(runner);
        let dispatcher = Dispatcher::with_runner(config, runner.clone());
        (dispatcher, runner, temp)
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_groom_minimal() {
        let (dispatcher, runner, _temp) = setup(
            RecordingRunner::new().respond("jira-groom.sh", ExecutionResult::succeeded("groomed")),
        );

        let outcome = dispatcher.groom_ticket(&GroomOptions::new("RVV-1")).await;

        let response = outcome.success().unwrap();
        assert_eq!(response.message, "Successfully groomed RVV-1");
        assert_eq!(response.output, "groomed");
        assert_eq!(runner.invocations().len(), 1);
        assert_eq!(runner.invocations()[0].args, strings(&["RVV-1"]));
    }

    #[tokio::test]
    async fn test_groom_points_take_precedence_over_estimate() {
        let (dispatcher, runner, _temp) = setup(RecordingRunner::new());

        let mut options = GroomOptions::new("RVV-2");
        options.story_points = Some(5.into());
        options.estimate = true;
        options.auto_estimate = true;
        dispatcher.groom_ticket(&options).await;

        assert_eq!(
            runner.calls_to("jira-groom.sh")[0].args,
            strings(&["RVV-2", "--points", "5"])
        );
    }

    #[tokio::test]
    async fn test_groom_fractional_points_keep_their_form() {
        let (dispatcher, runner, _temp) = setup(RecordingRunner::new());

        let mut options = GroomOptions::new("RVV-3");
        options.story_points = serde_json::Number::from_f64(5.0);
        dispatcher.groom_ticket(&options).await;
        options.story_points = serde_json::Number::from_f64(0.5);
        dispatcher.groom_ticket(&options).await;

        let calls = runner.calls_to("jira-groom.sh");
        assert_eq!(calls[0].args, strings(&["RVV-3", "--points", "5.0"]));
        assert_eq!(calls[1].args, strings(&["RVV-3", "--points", "0.5"]));
    }

    #[tokio::test]
    async fn test_groom_estimate_flags() {
        let (dispatcher, runner, _temp) = setup(RecordingRunner::new());

        let mut options = GroomOptions::new("RVV-3");
        options.estimate = true;
        options.auto_estimate = true;
        options.reference_file = Some("spec.md".to_string());
        options.ai_description = Some("desc".to_string());
        dispatcher.groom_ticket(&options).await;

        assert_eq!(
            runner.calls_to("jira-groom.sh")[0].args,
            strings(&[
                "RVV-3",
                "--reference-file",
                "spec.md",
                "--ai-description",
                "desc",
                "--estimate",
                "--auto-estimate",
                "--team-scale"
            ])
        );
    }

    #[tokio::test]
    async fn test_groom_auto_template_attached_on_failure() {
        let (dispatcher, _runner, _temp) = setup(
            RecordingRunner::new()
                .respond(
                    "get-description-template.sh",
                    ExecutionResult::succeeded(".prompts/generate-description-bug.md\n"),
                )
                .respond("jira-groom.sh", ExecutionResult::failure("boom")),
        );

        let mut options = GroomOptions::new("RVV-4");
        options.auto_template = true;
        let outcome = dispatcher.groom_ticket(&options).await;

        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            value,
            json!({
                "success": false,
                "error": "boom",
                "template": {
                    "template_path": ".prompts/generate-description-bug.md",
                    "template_name": "bug"
                }
            })
        );
    }

    #[tokio::test]
    async fn test_groom_confluence_fetch_failure_short_circuits() {
        let (dispatcher, runner, _temp) = setup(RecordingRunner::new().respond(
            "confluence-to-spec.sh",
            ExecutionResult::failure("page missing"),
        ));

        let mut options = GroomOptions::new("RVV-5");
        options.confluence_url = Some("https://wiki/page".to_string());
        let outcome = dispatcher.groom_ticket(&options).await;

        assert_eq!(outcome.failed().unwrap().error.as_deref(), Some("page missing"));
        assert!(runner.calls_to("jira-groom.sh").is_empty());
    }

    #[tokio::test]
    async fn test_groom_confluence_fetch_failure_carries_no_template() {
        let (dispatcher, _runner, _temp) = setup(
            RecordingRunner::new()
                .respond(
                    "get-description-template.sh",
                    ExecutionResult::succeeded(".prompts/generate-description-bug.md\n"),
                )
                .respond("confluence-to-spec.sh", ExecutionResult::failure("page missing")),
        );

        let mut options = GroomOptions::new("RVV-6");
        options.auto_template = true;
        options.confluence_url = Some("https://wiki/page".to_string());
        let outcome = dispatcher.groom_ticket(&options).await;

        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "page missing");
        assert!(value.get("template").is_none());
    }

    #[tokio::test]
    async fn test_groom_confluence_page_becomes_reference_file() {
        let (dispatcher, runner, _temp) = setup(RecordingRunner::new());

        let mut options = GroomOptions::new("RVV-6");
        options.confluence_url = Some("https://wiki/page".to_string());
        options.reference_file = Some("ignored.md".to_string());
        dispatcher.groom_ticket(&options).await;

        let fetch = &runner.calls_to("confluence-to-spec.sh")[0];
        assert_eq!(fetch.args[..2].to_vec(), strings(&["--url", "https://wiki/page"]));
        let temp_path = fetch.args[3].clone();
        assert!(temp_path.contains("confluence_"));
        assert!(temp_path.ends_with(".md"));

        let groom = &runner.calls_to("jira-groom.sh")[0];
        assert_eq!(groom.args, strings(&["RVV-6", "--reference-file", &temp_path]));
        assert!(!std::path::Path::new(&temp_path).exists());
    }

    #[tokio::test]
    async fn test_create_extracts_ticket_key() {
        let (dispatcher, runner, _temp) = setup(RecordingRunner::new().respond(
            "jira-create.sh",
            ExecutionResult::succeeded("Working...\nCreated ticket: RVV-1234\n"),
        ));

        let outcome = dispatcher
            .create_ticket(&CreateOptions {
                summary: "Add SSO".to_string(),
                epic: Some("RVV-1".to_string()),
                issue_type: Some("Story".to_string()),
                ..Default::default()
            })
            .await;

        let response = outcome.success().unwrap();
        assert_eq!(response.ticket_key.as_deref(), Some("RVV-1234"));
        assert_eq!(response.message, "Created RVV-1234: Add SSO");
        assert_eq!(response.issue_type, "Story");
        assert_eq!(
            runner.invocations()[0].args,
            strings(&["--summary", "Add SSO", "--priority", "Medium", "--epic", "RVV-1"])
        );
    }

    #[tokio::test]
    async fn test_create_without_key_still_succeeds() {
        let (dispatcher, _runner, _temp) = setup(
            RecordingRunner::new().respond("jira-create.sh", ExecutionResult::succeeded("done")),
        );

        let outcome = dispatcher
            .create_ticket(&CreateOptions {
                summary: "Something".to_string(),
                ..Default::default()
            })
            .await;

        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["ticket_key"], serde_json::Value::Null);
        assert_eq!(value["issue_type"], "Task");
    }

    #[tokio::test]
    async fn test_fetch_requires_url_or_id() {
        let (dispatcher, runner, _temp) = setup(RecordingRunner::new());

        let outcome = dispatcher
            .fetch_confluence_page(&FetchOptions::default())
            .await;

        assert!(!outcome.is_success());
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"success": false, "error": "Either page_url or page_id is required"})
        );
        assert!(runner.invocations().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_prefers_url() {
        let (dispatcher, runner, _temp) = setup(RecordingRunner::new());

        let outcome = dispatcher
            .fetch_confluence_page(&FetchOptions {
                page_url: Some("https://wiki/x".to_string()),
                page_id: Some("42".to_string()),
                output_file: Some("out.md".to_string()),
            })
            .await;

        assert_eq!(outcome.success().unwrap().message, "Fetched Confluence page to out.md");
        assert_eq!(
            runner.invocations()[0].args,
            strings(&["--url", "https://wiki/x", "--output", "out.md"])
        );
    }

    #[tokio::test]
    async fn test_close_sync_and_find_related() {
        let (dispatcher, runner, _temp) = setup(RecordingRunner::new());

        let closed = dispatcher.close_ticket("RVV-9", Some("Done")).await;
        assert_eq!(closed.success().unwrap().message, "Closed RVV-9");

        let synced = dispatcher.sync_to_confluence("RVV-9", "12345").await;
        assert_eq!(
            synced.success().unwrap().message,
            "Synced RVV-9 to Confluence page 12345"
        );

        let related = dispatcher.find_related_tickets("RVV-9").await;
        assert!(related.is_success());

        let calls = runner.invocations();
        assert_eq!(calls[0].args, strings(&["RVV-9", "--comment", "Done"]));
        assert_eq!(calls[1].program, "confluence-to-jira.sh");
        assert_eq!(calls[1].args, strings(&["RVV-9", "12345"]));
        assert_eq!(calls[2].program, "find-related-tickets.sh");
    }

    #[tokio::test]
    async fn test_failures_are_returned_verbatim() {
        let failure = ExecutionResult {
            success: false,
            output: Some("partial".to_string()),
            error: Some("denied".to_string()),
            exit_code: Some(2),
        };
        let (dispatcher, _runner, _temp) =
            setup(RecordingRunner::new().respond("jira-close.sh", failure.clone()));

        let outcome = dispatcher.close_ticket("RVV-1", None).await;
        assert_eq!(outcome.failed(), Some(&failure));
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            serde_json::to_value(&failure).unwrap()
        );
    }

    #[tokio::test]
    async fn test_resolve_template_with_issue_type_skips_script() {
        let (dispatcher, runner, _temp) = setup(RecordingRunner::new());

        let selection = dispatcher
            .resolve_template("RVV-1", Some("Defect"))
            .await
            .unwrap();

        assert_eq!(selection.template_name, "bug");
        assert!(selection
            .template_path
            .ends_with("generate-description-bug.md"));
        assert!(runner.invocations().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_template_failure_is_none() {
        let (dispatcher, _runner, _temp) = setup(RecordingRunner::new().respond(
            "get-description-template.sh",
            ExecutionResult::failure("no such ticket"),
        ));
        assert_eq!(dispatcher.resolve_template("RVV-1", None).await, None);

        let (dispatcher, _runner, _temp) = setup(RecordingRunner::new());
        assert_eq!(dispatcher.resolve_template("RVV-1", None).await, None);
    }

    #[test]
    fn test_suggest_template() {
        let (dispatcher, _runner, temp) = setup(RecordingRunner::new());
        let prompts = temp.path().join(".prompts");
        std::fs::create_dir_all(&prompts).unwrap();
        std::fs::write(prompts.join("generate-description-spike.md"), "# Spike").unwrap();

        let response = dispatcher.suggest_template("Investigate slow queries", None, None);
        assert_eq!(response.category, TemplateCategory::Spike);
        assert_eq!(response.template_file, "generate-description-spike.md");
        assert!(response.template_path.is_some());

        let response = dispatcher.suggest_template("Investigate", None, Some("Bug"));
        assert_eq!(response.template_file, "generate-description-bug.md");
        assert_eq!(response.template_path, None);
    }

    #[test]
    fn test_extract_ticket_key_first_match() {
        assert_eq!(extract_ticket_key("RVV", "xRVV-12 then RVV-34"), Some("RVV-12".to_string()));
        assert_eq!(extract_ticket_key("OPS", "Created OPS-7"), Some("OPS-7".to_string()));
        assert_eq!(extract_ticket_key("RVV", "nothing here"), None);
    }

    #[test]
    fn test_extract_ticket_key_from_coloured_output() {
        assert_eq!(
            extract_ticket_key("RVV", "\x1b[0;32mRVV-1234\x1b[0m\n"),
            Some("RVV-1234".to_string())
        );
    }

    #[test]
    fn test_extract_ticket_key_followed_by_word_character() {
        assert_eq!(
            extract_ticket_key("RVV", "Created ticket: RVV-1234_ok\n"),
            Some("RVV-1234".to_string())
        );
    }
}
