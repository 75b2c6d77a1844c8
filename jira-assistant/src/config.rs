//! Configuration management for jira-assistant
//!
//! Configuration is an explicit value handed to the
//! [`Dispatcher`](crate::dispatcher::Dispatcher) at construction time. Values
//! are resolved from, in increasing precedence:
//! 1. Defaults relative to the project directory
//! 2. `JIRA_ASSISTANT_*` environment variables
//! 3. A `jira-assistant.yaml` file

use crate::common::env_loader::EnvLoader;
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable prefix for all configuration keys
pub const ENV_PREFIX: &str = "JIRA_ASSISTANT";

/// File name searched for YAML configuration
pub const CONFIG_FILE_NAME: &str = "jira-assistant.yaml";

/// Directory holding the external automation scripts, relative to the project
const DEFAULT_SCRIPTS_DIR: &str = "scripts";
/// Directory holding the `generate-description-*.md` templates, relative to the project
const DEFAULT_PROMPTS_DIR: &str = ".prompts";
/// Wall-clock bound for a single script invocation
const DEFAULT_SCRIPT_TIMEOUT_SECS: u64 = 60;
/// Project prefix used when extracting ticket keys from script output
const DEFAULT_PROJECT_KEY: &str = "RVV";

/// Runtime configuration for the dispatcher and script executor
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Project root; scripts run with this as their working directory
    pub project_dir: PathBuf,
    /// Directory containing the automation scripts
    pub scripts_dir: PathBuf,
    /// Directory containing description prompt templates
    pub prompts_dir: PathBuf,
    /// Upper bound on a single script's wall-clock time
    pub script_timeout: Duration,
    /// Project key prefix of ticket references (e.g. `RVV` in `RVV-1234`)
    pub project_key: String,
}

impl Config {
    /// Default configuration rooted at `project_dir`
    pub fn for_project(project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();
        Self {
            scripts_dir: project_dir.join(DEFAULT_SCRIPTS_DIR),
            prompts_dir: project_dir.join(DEFAULT_PROMPTS_DIR),
            script_timeout: Duration::from_secs(DEFAULT_SCRIPT_TIMEOUT_SECS),
            project_key: DEFAULT_PROJECT_KEY.to_string(),
            project_dir,
        }
    }

    /// Load configuration from the environment and optional YAML file, then
    /// validate it.
    ///
    /// The project directory is `JIRA_ASSISTANT_PROJECT_DIR` when set,
    /// otherwise the current working directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when the scripts directory does not
    /// exist; this is fatal at startup.
    pub fn load() -> Result<Self, ConfigError> {
        let loader = EnvLoader::new(ENV_PREFIX);
        let project_dir = match loader.load_optional::<PathBuf>("PROJECT_DIR") {
            Some(dir) => dir,
            None => std::env::current_dir().map_err(|e| ConfigError::Invalid {
                name: "project_dir".to_string(),
                reason: format!("cannot determine current directory: {e}"),
            })?,
        };

        let mut config = Self::for_project(project_dir);
        config.apply_env_vars();

        match YamlConfig::load_or_default(&config.project_dir) {
            Ok(yaml) => yaml.apply_to_config(&mut config),
            Err(e) => {
                tracing::warn!(
                    "Failed to load YAML configuration, falling back to env vars and defaults: {}",
                    e
                );
            }
        }

        config.validate()?;
        tracing::debug!("Configuration resolved: {:?}", config);
        Ok(config)
    }

    /// Apply environment variable configuration to this config
    fn apply_env_vars(&mut self) {
        let loader = EnvLoader::new(ENV_PREFIX);

        if let Some(dir) = loader.load_optional::<PathBuf>("SCRIPTS_DIR") {
            self.scripts_dir = self.resolve(dir);
        }
        if let Some(dir) = loader.load_optional::<PathBuf>("PROMPTS_DIR") {
            self.prompts_dir = self.resolve(dir);
        }
        let timeout_secs = loader.load_validated(
            "SCRIPT_TIMEOUT_SECS",
            self.script_timeout.as_secs(),
            |secs| *secs > 0,
        );
        self.script_timeout = Duration::from_secs(timeout_secs);
        self.project_key = loader.load_string("PROJECT_KEY", &self.project_key);
    }

    fn resolve(&self, path: PathBuf) -> PathBuf {
        if path.is_absolute() {
            path
        } else {
            self.project_dir.join(path)
        }
    }

    /// Override the script timeout
    pub fn with_script_timeout(mut self, timeout: Duration) -> Self {
        self.script_timeout = timeout;
        self
    }

    /// Override the scripts directory
    pub fn with_scripts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scripts_dir = dir.into();
        self
    }

    /// Override the prompts directory
    pub fn with_prompts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.prompts_dir = dir.into();
        self
    }

    /// Override the ticket key prefix
    pub fn with_project_key(mut self, key: impl Into<String>) -> Self {
        self.project_key = key.into();
        self
    }

    /// Validate the current configuration settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.scripts_dir.is_dir() {
            return Err(ConfigError::Missing {
                name: "scripts_dir".to_string(),
                path: self.scripts_dir.clone(),
            });
        }

        if self.script_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                name: "script_timeout".to_string(),
                reason: "timeout must be greater than zero".to_string(),
            });
        }

        self.validate_project_key()
    }

    fn validate_project_key(&self) -> Result<(), ConfigError> {
        let key = &self.project_key;
        let valid = !key.is_empty()
            && key.chars().all(|c| c.is_ascii_alphanumeric())
            && key.starts_with(|c: char| c.is_ascii_alphabetic());
        if valid {
            Ok(())
        } else {
            Err(ConfigError::Invalid {
                name: "project_key".to_string(),
                reason: format!(
                    "'{key}' must be non-empty, alphanumeric and start with a letter"
                ),
            })
        }
    }

    /// Find the YAML configuration file for a project.
    ///
    /// Search order:
    /// 1. `<project_dir>/jira-assistant.yaml`
    /// 2. `~/.config/jira-assistant/jira-assistant.yaml`
    pub fn find_yaml_config_file(project_dir: &Path) -> Option<PathBuf> {
        let mut search_paths = vec![project_dir.join(CONFIG_FILE_NAME)];
        if let Some(home_dir) = dirs::home_dir() {
            search_paths.push(
                home_dir
                    .join(".config")
                    .join("jira-assistant")
                    .join(CONFIG_FILE_NAME),
            );
        }

        let found = search_paths.into_iter().find(|path| path.is_file());
        match &found {
            Some(path) => tracing::debug!("Found configuration file: {:?}", path),
            None => tracing::debug!("No {} found in any search location", CONFIG_FILE_NAME),
        }
        found
    }
}

/// Configuration loaded from `jira-assistant.yaml`
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct YamlConfig {
    /// Scripts directory, relative paths resolve against the project directory
    pub scripts_dir: Option<PathBuf>,
    /// Prompt template directory, relative paths resolve against the project directory
    pub prompts_dir: Option<PathBuf>,
    /// Script timeout in seconds
    pub script_timeout_secs: Option<u64>,
    /// Ticket key prefix
    pub project_key: Option<String>,
}

impl YamlConfig {
    /// Apply YAML configuration values to an existing Config.
    /// YAML values take precedence over existing values.
    pub fn apply_to_config(&self, config: &mut Config) {
        if let Some(dir) = &self.scripts_dir {
            config.scripts_dir = config.resolve(dir.clone());
        }
        if let Some(dir) = &self.prompts_dir {
            config.prompts_dir = config.resolve(dir.clone());
        }
        if let Some(secs) = self.script_timeout_secs {
            config.script_timeout = Duration::from_secs(secs);
        }
        if let Some(key) = &self.project_key {
            config.project_key = key.clone();
        }
    }

    /// Load YAML configuration from a file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        tracing::info!("Loading YAML configuration from: {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_yaml::from_str(&content).map_err(|e| ConfigError::YamlParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Try to load YAML configuration, returning default if no file is found
    pub fn load_or_default(project_dir: &Path) -> Result<Self, ConfigError> {
        match Config::find_yaml_config_file(project_dir) {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }
}
