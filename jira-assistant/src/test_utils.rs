//! Test doubles shared by unit and integration tests
//!
//! [`RecordingRunner`] stands in for the real script executor: it records
//! every invocation and answers with canned [`ExecutionResult`]s, so
//! dispatcher behaviour can be checked without spawning processes.
//!
//! ```
//! use jira_assistant::process::ExecutionResult;
//! use jira_assistant::test_utils::RecordingRunner;
//!
//! let runner = RecordingRunner::new()
//!     .respond("jira-close.sh", ExecutionResult::succeeded("closed"));
//! assert!(runner.invocations().is_empty());
//! ```

use crate::config::Config;
use crate::process::{ExecutionResult, ScriptRunner};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

/// One recorded call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Script file name
    pub program: String,
    /// Argument vector
    pub args: Vec<String>,
    /// Standard input, when provided
    pub input: Option<String>,
}

/// [`ScriptRunner`] that records calls and returns canned results.
///
/// Programs without a configured response succeed with empty output.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    invocations: Mutex<Vec<Invocation>>,
    responses: HashMap<String, ExecutionResult>,
}

impl RecordingRunner {
    /// A runner where every program succeeds with empty output
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer calls to `program` with `result`
    pub fn respond(mut self, program: impl Into<String>, result: ExecutionResult) -> Self {
        self.responses.insert(program.into(), result);
        self
    }

    /// Every call made so far, in order
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Calls made to one program, in order
    pub fn calls_to(&self, program: &str) -> Vec<Invocation> {
        self.invocations()
            .into_iter()
            .filter(|call| call.program == program)
            .collect()
    }
}

#[async_trait]
impl ScriptRunner for RecordingRunner {
    async fn run(&self, program: &str, args: &[String], input: Option<&str>) -> ExecutionResult {
        if let Ok(mut calls) = self.invocations.lock() {
            calls.push(Invocation {
                program: program.to_string(),
                args: args.to_vec(),
                input: input.map(str::to_string),
            });
        }

        self.responses
            .get(program)
            .cloned()
            .unwrap_or_else(|| ExecutionResult::succeeded(""))
    }
}

/// Lay out a throwaway project (`scripts/` and `.prompts/`) under `root`
/// and return its configuration.
pub fn create_test_project(root: &Path) -> std::io::Result<Config> {
    let config = Config::for_project(root);
    std::fs::create_dir_all(&config.scripts_dir)?;
    std::fs::create_dir_all(&config.prompts_dir)?;
    Ok(config)
}
