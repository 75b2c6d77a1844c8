//! Unified error handling for the jira-assistant library
//!
//! Failures that an MCP client should see as data (missing scripts, timeouts,
//! bad tool parameters) are not errors here; they travel as
//! [`ExecutionResult`](crate::process::ExecutionResult) values. The types in
//! this module cover the cases that genuinely abort an operation: bad
//! configuration, malformed documents and I/O.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the jira-assistant library
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum JiraAssistantError {
    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid or missing configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Document was not a usable ADF document or fragment
    #[error(transparent)]
    Adf(#[from] AdfError),

    /// Prompt template resource could not be resolved
    #[error("Template error: {0}")]
    Template(String),

    /// Generic error with context
    #[error("{message}")]
    Context {
        /// What was being attempted
        message: String,
        /// The underlying failure
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Configuration errors
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A required directory or value is missing
    #[error("Missing configuration: {name} ({path})")]
    Missing {
        /// Name of the configuration entry
        name: String,
        /// Location that was expected to exist
        path: PathBuf,
    },

    /// A configuration value is out of range or malformed
    #[error("Invalid configuration '{name}': {reason}")]
    Invalid {
        /// Name of the configuration entry
        name: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Failed to read a configuration file from disk
    #[error("Failed to read configuration file {path}: {source}")]
    FileRead {
        /// Path to the configuration file that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Failed to parse YAML content from a configuration file
    #[error("Invalid YAML syntax in {path}:\n{source}\n\nHint: Check for proper indentation and YAML formatting")]
    YamlParse {
        /// Path to the configuration file with invalid YAML content
        path: PathBuf,
        /// Underlying YAML parsing error
        #[source]
        source: serde_yaml::Error,
    },
}

/// Errors raised while validating ADF documents for merging
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum AdfError {
    /// The input was not a JSON object
    #[error("ADF {role} must be a JSON object, got {found}")]
    NotAnObject {
        /// Which input was rejected (`original` or `enhanced`)
        role: &'static str,
        /// JSON type that was found instead
        found: &'static str,
    },

    /// The object is neither a `doc` nor a fragment with a `content` list
    #[error("ADF {role} must have type 'doc' or a 'content' array")]
    NotADocument {
        /// Which input was rejected (`original` or `enhanced`)
        role: &'static str,
    },

    /// The `version` field is not a non-negative whole number
    #[error("ADF {role} has an invalid version: {found}")]
    InvalidVersion {
        /// Which input was rejected (`original` or `enhanced`)
        role: &'static str,
        /// The offending value, as JSON
        found: String,
    },
}

/// Result type alias for jira-assistant operations
pub type Result<T> = std::result::Result<T, JiraAssistantError>;

/// Extension trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context<S: Into<String>>(self, msg: S) -> Result<T>;

    /// Add context with a closure that's only called on error
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context<S: Into<String>>(self, msg: S) -> Result<T> {
        self.map_err(|e| JiraAssistantError::Context {
            message: msg.into(),
            source: Box::new(e),
        })
    }

    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| JiraAssistantError::Context {
            message: f().into(),
            source: Box::new(e),
        })
    }
}

/// Error chain formatter for detailed error reporting
pub struct ErrorChain<'a>(&'a dyn std::error::Error);

impl fmt::Display for ErrorChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Error: {}", self.0)?;

        let mut current = self.0.source();
        let mut level = 1;

        while let Some(err) = current {
            writeln!(f, "{:indent$}Caused by: {}", "", err, indent = level * 2)?;
            current = err.source();
            level += 1;
        }

        Ok(())
    }
}

/// Extension trait for error types to format the full error chain
pub trait ErrorChainExt {
    /// Format the full error chain
    fn error_chain(&self) -> ErrorChain<'_>;
}

impl<E: std::error::Error> ErrorChainExt for E {
    fn error_chain(&self) -> ErrorChain<'_> {
        ErrorChain(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_context() {
        let err: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        let err_with_context = err.context("Failed to read enhanced ADF");

        let msg = err_with_context.unwrap_err().to_string();
        assert!(msg.contains("Failed to read enhanced ADF"));
    }

    #[test]
    fn test_error_chain_display() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = JiraAssistantError::Context {
            message: "Failed to load document".to_string(),
            source: Box::new(io_err),
        };

        let chain = err.error_chain().to_string();
        assert!(chain.contains("Failed to load document"));
        assert!(chain.contains("Caused by: file not found"));
    }

    #[test]
    fn test_adf_error_messages_name_the_input() {
        let err = AdfError::NotADocument { role: "enhanced" };
        assert_eq!(
            err.to_string(),
            "ADF enhanced must have type 'doc' or a 'content' array"
        );

        let wrapped: JiraAssistantError = err.into();
        assert!(wrapped.to_string().contains("enhanced"));
    }

    #[test]
    fn test_config_error_mentions_path() {
        let err = ConfigError::Missing {
            name: "scripts_dir".to_string(),
            path: PathBuf::from("/nowhere/scripts"),
        };
        assert!(err.to_string().contains("/nowhere/scripts"));
    }
}
