//! Configuration management for redis-lsp
//!
//! This module handles loading, parsing, and validating configuration from:
//! - Configuration files (TOML format)
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Connection configuration
    #[serde(default)]
    pub connection: ConnectionConfig,

    /// Name cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Completion trigger configuration
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Documentation lookup configuration
    #[serde(default)]
    pub documentation: DocumentationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Server address as `host:port`
    #[serde(default = "default_address")]
    pub address: String,

    /// ACL username
    #[serde(default)]
    pub username: Option<String>,

    /// Password, with or without a username
    #[serde(default)]
    pub password: Option<String>,

    /// Logical database index
    #[serde(default)]
    pub database: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Preloaded user and key names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Fetch users and keys once at start-up
    #[serde(default)]
    pub enabled: bool,

    /// COUNT hint for the single SCAN issued to list keys
    #[serde(default = "default_scan_count")]
    pub scan_count: usize,
}

/// Commands after which completion switches from commands to names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Commands followed by a user name
    #[serde(default = "default_user_triggers")]
    pub user_triggers: Vec<String>,

    /// Commands followed by a key name
    #[serde(default = "default_key_triggers")]
    pub key_triggers: Vec<String>,
}

/// Documentation lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentationConfig {
    /// Directory of `<command>.md` files
    #[serde(default = "default_docs_directory")]
    pub directory: Option<PathBuf>,

    /// Base URL `docs fetch` downloads `<command>.md` files from
    #[serde(default = "default_docs_source")]
    pub source_url: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Path to log file, in addition to stderr
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_address() -> String {
    "localhost:6379".to_string()
}

fn default_timeout() -> u64 {
    5
}

fn default_scan_count() -> usize {
    50
}

fn default_user_triggers() -> Vec<String> {
    vec!["ACL GETUSER".to_string()]
}

fn default_key_triggers() -> Vec<String> {
    vec!["GET".to_string(), "SET".to_string()]
}

fn default_docs_directory() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".redis-lsp").join("docs"))
}

fn default_docs_source() -> String {
    "https://raw.githubusercontent.com/redis/redis-doc/master/commands".to_string()
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    true
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            username: None,
            password: None,
            database: 0,
            timeout: default_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            scan_count: default_scan_count(),
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            user_triggers: default_user_triggers(),
            key_triggers: default_key_triggers(),
        }
    }
}

impl Default for DocumentationConfig {
    fn default() -> Self {
        Self {
            directory: default_docs_directory(),
            source_url: default_docs_source(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_path: None,
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }

        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Load configuration from `path`, or from the default location.
    ///
    /// A missing file at the default location yields defaults. An explicitly
    /// given path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Self::default_path();
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - Path to default configuration file
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".redis-lsp")
            .join("config.toml")
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        if self.connection.address.trim().is_empty() {
            return Err(invalid("connection.address", &self.connection.address));
        }
        if self.connection.timeout == 0 {
            return Err(invalid("connection.timeout", "0"));
        }
        if self.cache.scan_count == 0 {
            return Err(invalid("cache.scan_count", "0"));
        }

        if !self.documentation.source_url.starts_with("http://")
            && !self.documentation.source_url.starts_with("https://")
        {
            return Err(invalid(
                "documentation.source_url",
                &self.documentation.source_url,
            ));
        }

        let triggers = [
            ("completion.user_triggers", &self.completion.user_triggers),
            ("completion.key_triggers", &self.completion.key_triggers),
        ];
        for (field, values) in triggers {
            if let Some(bad) = values.iter().find(|t| t.trim().is_empty()) {
                return Err(invalid(field, bad));
            }
        }

        Ok(())
    }

    /// Get connection timeout as Duration
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection.timeout)
    }
}

fn invalid(field: &str, value: &str) -> crate::error::RedisLspError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
    .into()
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
