//! `classify` command

use crate::error::{CliResult, IntoCliResult};
use jira_assistant::{Config, Dispatcher};

/// Print the suggested template for the given ticket text as JSON
pub fn run_classify(
    summary: &str,
    description: Option<&str>,
    issue_type: Option<&str>,
) -> CliResult<()> {
    let project_dir = std::env::current_dir().cli_general_error()?;
    let dispatcher = Dispatcher::new(Config::for_project(project_dir));

    let suggestion = dispatcher.suggest_template(summary, description, issue_type);
    let json = serde_json::to_string_pretty(&suggestion).cli_general_error()?;
    println!("{json}");
    Ok(())
}
