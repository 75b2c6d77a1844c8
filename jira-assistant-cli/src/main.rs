use std::process;

use clap::CommandFactory;
use is_terminal::IsTerminal;
use jira_assistant_cli::cli::{Cli, Commands};
use jira_assistant_cli::error::handle_cli_result;
use jira_assistant_cli::exit_codes::{EXIT_SUCCESS, EXIT_WARNING};
use jira_assistant_cli::{classify, estimate, logging, merge, serve};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    let Some(command) = cli.command.as_ref() else {
        let code = match Cli::command().print_help() {
            Ok(()) => EXIT_SUCCESS,
            Err(_) => EXIT_WARNING,
        };
        process::exit(code);
    };

    let is_mcp_mode = matches!(command, Commands::Serve) && !std::io::stdin().is_terminal();
    logging::init_logging(&cli, is_mcp_mode);

    let exit_code = match command {
        Commands::Serve => {
            tracing::info!("Starting MCP server");
            serve::run_server().await
        }
        Commands::GenerateEstimation {
            points,
            explanation,
            output,
            document_only,
        } => handle_cli_result(estimate::run_generate_estimation(
            points,
            explanation,
            output,
            *document_only,
        )),
        Commands::MergeAdf {
            original,
            enhanced,
            output,
        } => handle_cli_result(merge::run_merge_adf(original, enhanced, output)),
        Commands::Classify {
            summary,
            description,
            issue_type,
        } => handle_cli_result(classify::run_classify(
            summary,
            description.as_deref(),
            issue_type.as_deref(),
        )),
    };

    process::exit(exit_code);
}
