//! Logging setup for the CLI
//!
//! In MCP mode stdout carries the protocol, so logs go to a file under
//! `~/.jira-assistant` instead of the terminal.

use crate::cli::Cli;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::Level;

/// Directory under the home directory that holds the MCP log
pub const LOG_DIR_NAME: &str = ".jira-assistant";

/// Default MCP log file name
pub const DEFAULT_LOG_FILE: &str = "mcp.log";

/// Environment variable overriding the MCP log file name
pub const LOG_FILE_ENV: &str = "JIRA_ASSISTANT_LOG_FILE";

/// A thread-safe writer that flushes and syncs every write.
///
/// MCP clients usually swallow the server's stderr, so the log file is the
/// only record of a session. Syncing on each write keeps it complete even if
/// the client kills the server.
///
/// # Example
///
/// ```no_run
/// use std::io::Write;
/// use std::sync::{Arc, Mutex};
/// use std::fs::File;
/// use jira_assistant_cli::logging::FileWriterGuard;
///
/// let file = File::create("log.txt").unwrap();
/// let mut guard = FileWriterGuard::new(Arc::new(Mutex::new(file)));
/// guard.write_all(b"Log message\n").unwrap();
/// ```
pub struct FileWriterGuard {
    file: Arc<Mutex<std::fs::File>>,
}

impl FileWriterGuard {
    /// Creates a new `FileWriterGuard` wrapping the given file
    pub fn new(file: Arc<Mutex<std::fs::File>>) -> Self {
        Self { file }
    }

    fn lock(&self) -> std::io::Result<std::sync::MutexGuard<'_, std::fs::File>> {
        self.file
            .lock()
            .map_err(|_| std::io::Error::other("log file mutex was poisoned"))
    }
}

impl Write for FileWriterGuard {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut file = self.lock()?;
        let written = file.write(buf)?;
        file.flush()?;
        file.sync_all()?;
        Ok(written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let mut file = self.lock()?;
        file.flush()?;
        file.sync_all()
    }
}

/// Pick the log level from the command line flags
pub fn log_level(cli: &Cli, is_mcp_mode: bool) -> Level {
    if is_mcp_mode {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::TRACE
    } else {
        Level::INFO
    }
}

/// Location of the MCP log file
pub fn log_file_path() -> PathBuf {
    let log_dir = match dirs::home_dir() {
        Some(home) => home.join(LOG_DIR_NAME),
        None => PathBuf::from(LOG_DIR_NAME),
    };
    let file_name = std::env::var(LOG_FILE_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
    log_dir.join(file_name)
}

fn init_stderr(level: Level) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

/// Install the global tracing subscriber
pub fn init_logging(cli: &Cli, is_mcp_mode: bool) {
    let level = log_level(cli, is_mcp_mode);

    if !is_mcp_mode {
        init_stderr(level);
        return;
    }

    let log_file = log_file_path();
    if let Some(parent) = log_file.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Failed to create log directory {}: {}", parent.display(), e);
        }
    }

    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
    {
        Ok(file) => {
            let shared = Arc::new(Mutex::new(file));
            tracing_subscriber::fmt()
                .with_writer(move || FileWriterGuard::new(Arc::clone(&shared)))
                .with_max_level(level)
                .with_ansi(false)
                .init();
        }
        Err(e) => {
            init_stderr(level);
            tracing::warn!("Failed to open log file {}, using stderr: {}", log_file.display(), e);
        }
    }
}
