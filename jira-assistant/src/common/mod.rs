//! Common utilities module
//!
//! This module provides shared utilities used across the jira-assistant codebase.

/// Environment variable loading utilities
pub mod env_loader;

// Re-export commonly used items
pub use env_loader::{load_env_optional, load_env_parsed, load_env_string, EnvLoader};
