//! jira-assistant CLI library
//!
//! Command-line definitions, the command implementations and the logging
//! setup used by the `jira-assistant` binary.

/// `classify` command
pub mod classify;
/// Command-line interface definitions and argument parsing
pub mod cli;
/// CLI error type and exit code mapping
pub mod error;
/// `generate-estimation` command
pub mod estimate;
/// Exit codes used by the CLI application
pub mod exit_codes;
/// Tracing subscriber setup
pub mod logging;
/// `merge-adf` command
pub mod merge;
/// `serve` command
pub mod serve;
