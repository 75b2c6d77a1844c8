//! Execution harness for the external automation scripts
//!
//! Every call into the scripts directory goes through a [`ScriptRunner`] and
//! comes back as an [`ExecutionResult`]. Nothing here returns `Err`: missing
//! scripts, timeouts and spawn failures are all reported as unsuccessful
//! results so the dispatcher can hand them to the client unchanged.

use crate::config::Config;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

/// Uniform outcome of one script invocation.
///
/// `success` is true exactly when the script ran to completion with exit
/// code 0; in that case `error` is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Whether the script exited with status 0
    pub success: bool,
    /// Captured standard output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Captured standard error, or a description of why the script could not run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Process exit code when the script ran and exited normally
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
}

impl ExecutionResult {
    /// A failure that never reached (or never finished) the child process
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: None,
            error: Some(error.into()),
            exit_code: None,
        }
    }

    /// A successful run with the given standard output
    pub fn succeeded(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: Some(output.into()),
            error: None,
            exit_code: Some(0),
        }
    }

    /// Build a result from a finished child process
    pub fn from_output(output: Output) -> Self {
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            return Self::succeeded(stdout);
        }

        Self {
            success: false,
            output: Some(stdout),
            error: Some(String::from_utf8_lossy(&output.stderr).into_owned()),
            exit_code: output.status.code(),
        }
    }

    /// Captured standard output, empty when none was captured
    pub fn output_text(&self) -> &str {
        self.output.as_deref().unwrap_or_default()
    }
}

/// The automation scripts this crate knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    /// Grooms a ticket with AI-generated content
    Groom,
    /// Creates a new ticket
    Create,
    /// Closes a ticket
    Close,
    /// Lists tickets related to a ticket
    FindRelated,
    /// Fetches a Confluence page into a local spec file
    ConfluenceToSpec,
    /// Syncs a ticket to a Confluence page
    ConfluenceToJira,
    /// Prints the description template path appropriate for a ticket
    DescriptionTemplate,
}

impl Script {
    /// File name inside the scripts directory
    pub const fn file_name(self) -> &'static str {
        match self {
            Script::Groom => "jira-groom.sh",
            Script::Create => "jira-create.sh",
            Script::Close => "jira-close.sh",
            Script::FindRelated => "find-related-tickets.sh",
            Script::ConfluenceToSpec => "confluence-to-spec.sh",
            Script::ConfluenceToJira => "confluence-to-jira.sh",
            Script::DescriptionTemplate => "get-description-template.sh",
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Runs a named program with arguments and optional standard input
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    /// Run `program` and report the outcome; never panics or returns early
    /// with an error.
    async fn run(&self, program: &str, args: &[String], input: Option<&str>) -> ExecutionResult;
}

/// [`ScriptRunner`] that spawns scripts from a fixed directory with a
/// wall-clock bound.
#[derive(Debug, Clone)]
pub struct ScriptExecutor {
    scripts_dir: PathBuf,
    working_dir: PathBuf,
    timeout: Duration,
}

impl ScriptExecutor {
    /// Create an executor for the given directories and timeout
    pub fn new(
        scripts_dir: impl Into<PathBuf>,
        working_dir: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Self {
        Self {
            scripts_dir: scripts_dir.into(),
            working_dir: working_dir.into(),
            timeout,
        }
    }

    /// Create an executor from the resolved configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.scripts_dir,
            &config.project_dir,
            config.script_timeout,
        )
    }

    /// The wall-clock bound applied to each invocation
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve a program name to a script file. Names with directory
    /// components are never resolved.
    fn resolve(&self, program: &str) -> Option<PathBuf> {
        let mut components = Path::new(program).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => return None,
        }

        let path = self.scripts_dir.join(program);
        path.is_file().then_some(path)
    }

    async fn spawn_and_wait(mut command: Command, input: Option<&str>) -> io::Result<Output> {
        let mut child = command.spawn()?;
        let stdin = child.stdin.take();

        let feed = async move {
            if let (Some(mut stdin), Some(input)) = (stdin, input) {
                stdin.write_all(input.as_bytes()).await?;
                stdin.shutdown().await?;
            }
            Ok::<(), io::Error>(())
        };

        let ((), output) = tokio::try_join!(feed, child.wait_with_output())?;
        Ok(output)
    }
}

#[async_trait]
impl ScriptRunner for ScriptExecutor {
    async fn run(&self, program: &str, args: &[String], input: Option<&str>) -> ExecutionResult {
        let Some(script_path) = self.resolve(program) else {
            tracing::warn!("Script not found: {}", program);
            return ExecutionResult::failure(format!("Script not found: {program}"));
        };

        tracing::debug!("Running {} with args {:?}", program, args);

        let mut command = Command::new(&script_path);
        command
            .args(args)
            .current_dir(&self.working_dir)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let result = match timeout(self.timeout, Self::spawn_and_wait(command, input)).await {
            Ok(Ok(output)) => ExecutionResult::from_output(output),
            Ok(Err(e)) => ExecutionResult::failure(format!("Script execution failed: {e}")),
            Err(_) => ExecutionResult::failure(format!(
                "Script execution timed out ({})",
                format_duration(self.timeout)
            )),
        };

        if result.success {
            tracing::debug!("{} completed successfully", program);
        } else {
            tracing::warn!(
                "{} failed (exit code {:?}): {}",
                program,
                result.exit_code,
                result.error.as_deref().unwrap_or_default().trim()
            );
        }

        result
    }
}

fn format_duration(duration: Duration) -> String {
    if duration.subsec_nanos() == 0 {
        format!("{}s", duration.as_secs())
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn write_script(dir: &Path, name: &str, body: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn executor(scripts: &TempDir, timeout: Duration) -> ScriptExecutor {
        ScriptExecutor::new(scripts.path(), scripts.path(), timeout)
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_missing_script_is_reported_not_raised() {
        let scripts = TempDir::new().unwrap();
        let result = executor(&scripts, Duration::from_secs(5))
            .run("jira-groom.sh", &args(&["RVV-1"]), None)
            .await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Script not found: jira-groom.sh"));
        assert_eq!(result.exit_code, None);
        assert_eq!(result.output, None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_program_names_cannot_escape_scripts_dir() {
        let root = TempDir::new().unwrap();
        let scripts = root.path().join("scripts");
        std::fs::create_dir(&scripts).unwrap();
        write_script(root.path(), "outside.sh", "echo escaped");

        let executor = ScriptExecutor::new(&scripts, root.path(), Duration::from_secs(5));
        let result = executor.run("../outside.sh", &[], None).await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("not found"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_success_captures_stdout_and_runs_in_working_dir() {
        let scripts = TempDir::new().unwrap();
        write_script(scripts.path(), "echo-args.sh", r#"echo "$@"; pwd"#);

        let result = executor(&scripts, Duration::from_secs(5))
            .run("echo-args.sh", &args(&["RVV-7", "--comment", "done"]), None)
            .await;

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert_eq!(result.error, None);
        let output = result.output_text();
        assert!(output.starts_with("RVV-7 --comment done\n"));
        let cwd = std::fs::canonicalize(scripts.path()).unwrap();
        assert!(output.contains(cwd.to_str().unwrap()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_reports_stderr_and_code() {
        let scripts = TempDir::new().unwrap();
        write_script(
            scripts.path(),
            "fail.sh",
            "echo partial; echo 'ticket does not exist' >&2; exit 3",
        );

        let result = executor(&scripts, Duration::from_secs(5))
            .run("fail.sh", &[], None)
            .await;

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
        assert_eq!(result.output.as_deref(), Some("partial\n"));
        assert_eq!(result.error.as_deref(), Some("ticket does not exist\n"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_input_is_fed_on_stdin() {
        let scripts = TempDir::new().unwrap();
        write_script(scripts.path(), "cat.sh", "cat");

        let input = "line one\n\"quoted\" <b>&</b>\n";
        let result = executor(&scripts, Duration::from_secs(5))
            .run("cat.sh", &[], Some(input))
            .await;

        assert!(result.success);
        assert_eq!(result.output_text(), input);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdin_is_closed_without_input() {
        let scripts = TempDir::new().unwrap();
        write_script(scripts.path(), "cat.sh", "cat");

        let result = executor(&scripts, Duration::from_secs(5))
            .run("cat.sh", &[], None)
            .await;

        assert!(result.success);
        assert_eq!(result.output_text(), "");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_returns_promptly() {
        let scripts = TempDir::new().unwrap();
        write_script(scripts.path(), "hang.sh", "sleep 30");

        let started = Instant::now();
        let result = executor(&scripts, Duration::from_millis(300))
            .run("hang.sh", &[], None)
            .await;

        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("Script execution timed out (0.3s)")
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unexecutable_script_is_an_execution_failure() {
        use std::os::unix::fs::PermissionsExt;

        let scripts = TempDir::new().unwrap();
        let path = scripts.path().join("no-exec.sh");
        std::fs::write(&path, "#!/bin/sh\necho hi\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let result = executor(&scripts, Duration::from_secs(5))
            .run("no-exec.sh", &[], None)
            .await;

        assert!(!result.success);
        assert!(result
            .error
            .unwrap()
            .starts_with("Script execution failed: "));
    }

    #[test]
    fn test_timeout_message_uses_whole_seconds() {
        assert_eq!(format_duration(Duration::from_secs(60)), "60s");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.5s");
    }

    #[test]
    fn test_serialization_omits_absent_fields() {
        let json = serde_json::to_value(ExecutionResult::failure("Script not found: x")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": false, "error": "Script not found: x"})
        );

        let json = serde_json::to_value(ExecutionResult::succeeded("ok")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"success": true, "output": "ok", "exit_code": 0})
        );
    }

    #[test]
    fn test_script_file_names() {
        assert_eq!(Script::Groom.to_string(), "jira-groom.sh");
        assert_eq!(
            Script::DescriptionTemplate.file_name(),
            "get-description-template.sh"
        );
    }
}
