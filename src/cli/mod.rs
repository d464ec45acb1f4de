//! Command-line interface for redis-lsp
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - Utility subcommands (version, completion, config, docs)
//!
//! With no subcommand the binary serves the editor protocol over stdio, so
//! nothing here may write to stdout on that path.

mod completion;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Config, LogLevel};
use crate::documentation::DocumentationFetcher;
use crate::error::{ConfigError, Result};

/// Redis language server
#[derive(Parser, Debug)]
#[command(
    name = "redis-lsp",
    version,
    about = "Language server for Redis scripts",
    long_about = "A language server for Redis command scripts. Completes commands, key names
and user names, and runs scripts against a Redis server."
)]
pub struct CliArgs {
    /// Redis server address (host:port)
    #[arg(long, value_name = "HOST:PORT")]
    pub address: Option<String>,

    /// Username for authentication
    #[arg(long, value_name = "USERNAME")]
    pub username: Option<String>,

    /// Password for authentication
    #[arg(long, value_name = "PASSWORD")]
    pub password: Option<String>,

    /// Database index to use
    #[arg(long, value_name = "INDEX")]
    pub database: Option<u32>,

    /// Preload user and key names for completion
    #[arg(long = "db-cache")]
    pub db_cache: bool,

    /// Also write logs to this file
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Quiet mode (errors only)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands for redis-lsp
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show version information
    Version,

    /// Generate shell completion script
    Completion {
        /// Shell type (bash, zsh, fish, powershell, elvish)
        #[arg(value_name = "SHELL")]
        shell: String,
    },

    /// Show configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate configuration file
        #[arg(long)]
        validate: bool,
    },

    /// Manage command documentation
    Docs {
        #[command(subcommand)]
        action: DocsCommand,
    },
}

/// Documentation subcommands
#[derive(Subcommand, Debug)]
pub enum DocsCommand {
    /// Download one markdown file per command
    Fetch {
        /// Target directory (defaults to documentation.directory)
        #[arg(long, value_name = "DIR")]
        directory: Option<PathBuf>,

        /// Base URL to download from (defaults to documentation.source_url)
        #[arg(long, value_name = "URL")]
        source: Option<String>,
    },
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Create a new CLI interface from the process arguments
    ///
    /// # Returns
    /// * `Result<Self>` - New CLI interface or error
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    /// Create a CLI interface from already parsed arguments
    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    ///
    /// # Arguments
    /// * `args` - Command-line arguments
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load(args.config_file.as_deref())?;

        // Logging is not set up yet.
        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {e}");
            eprintln!("Using default configuration instead.");
            config = Config::default();
        }

        Self::apply_args_to_config(&mut config, args);

        Ok(config)
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the CLI arguments
    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// Apply CLI arguments to configuration
    ///
    /// Overrides configuration values with CLI arguments where provided
    fn apply_args_to_config(config: &mut Config, args: &CliArgs) {
        Self::apply_logging_args(config, args);
        Self::apply_connection_args(config, args);

        if args.db_cache {
            config.cache.enabled = true;
        }
    }

    /// Apply logging-related CLI arguments to configuration
    fn apply_logging_args(config: &mut Config, args: &CliArgs) {
        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose || args.debug {
            LogLevel::Debug
        } else if args.quiet {
            LogLevel::Error
        } else {
            config.logging.level
        };

        if let Some(path) = &args.log_file {
            config.logging.file_path = Some(path.clone());
        }
    }

    /// Apply connection-related CLI arguments to configuration
    fn apply_connection_args(config: &mut Config, args: &CliArgs) {
        let connection = &mut config.connection;

        if let Some(address) = &args.address {
            connection.address = address.clone();
        }
        if let Some(username) = &args.username {
            connection.username = Some(username.clone());
        }
        if let Some(password) = &args.password {
            connection.password = Some(password.clone());
        }
        if let Some(database) = args.database {
            connection.database = database;
        }
    }

    /// Handle subcommands
    ///
    /// # Returns
    /// * `Result<bool>` - True if subcommand was handled, false to continue
    pub async fn handle_subcommand(&self) -> Result<bool> {
        match &self.args.command {
            Some(Commands::Version) => {
                self.show_version();
                Ok(true)
            }
            Some(Commands::Completion { shell }) => {
                completion::generate_completion(shell)?;
                Ok(true)
            }
            Some(Commands::Config { show, validate }) => {
                self.handle_config_command(*show, *validate)?;
                Ok(true)
            }
            Some(Commands::Docs { action }) => {
                self.handle_docs_command(action).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Show version information
    fn show_version(&self) {
        println!("redis-lsp version {}", env!("CARGO_PKG_VERSION"));
        println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    }

    /// Handle config subcommand
    fn handle_config_command(&self, show: bool, validate: bool) -> Result<()> {
        if validate {
            self.validate_config_file();
        }

        if show {
            self.show_config()?;
        }

        Ok(())
    }

    /// Handle docs subcommand
    async fn handle_docs_command(&self, action: &DocsCommand) -> Result<()> {
        match action {
            DocsCommand::Fetch { directory, source } => {
                let fetcher = self.docs_fetcher(directory.as_ref(), source.as_deref())?;
                println!("Fetching documentation into {}", fetcher.directory().display());

                let summary = fetcher.fetch_all().await?;
                println!("✅ Wrote {} files", summary.written);
                if !summary.failed.is_empty() {
                    println!(
                        "❌ {} commands failed: {}",
                        summary.failed.len(),
                        summary.failed.join(", ")
                    );
                }
                Ok(())
            }
        }
    }

    /// Build a fetcher from flags, falling back to configuration
    fn docs_fetcher(
        &self,
        directory: Option<&PathBuf>,
        source: Option<&str>,
    ) -> Result<DocumentationFetcher> {
        let docs = &self.config.documentation;
        let directory = directory
            .or(docs.directory.as_ref())
            .cloned()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "documentation.directory".to_string(),
                value: String::new(),
            })?;

        DocumentationFetcher::new(source.unwrap_or(&docs.source_url), directory)
    }

    /// Validate configuration file
    fn validate_config_file(&self) {
        let path = self.get_config_path();
        println!("Validating configuration file: {}", path.display());

        if !path.exists() {
            println!("❌ Configuration file does not exist");
            return;
        }

        match Config::from_file(&path) {
            Ok(config) => match config.validate() {
                Ok(()) => println!("✅ Configuration is valid"),
                Err(e) => println!("❌ Configuration validation failed: {e}"),
            },
            Err(e) => println!("❌ Failed to load configuration: {e}"),
        }
    }

    /// Show effective configuration
    fn show_config(&self) -> Result<()> {
        let path = self.get_config_path();
        println!("Configuration file: {}", path.display());
        println!();
        println!("=== Effective Configuration ===");
        println!();
        println!("{}", self.config.to_toml()?);

        Ok(())
    }

    /// Get configuration file path (from args or default)
    fn get_config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(args).unwrap()
    }

    fn apply(args: &CliArgs) -> Config {
        let mut config = Config::default();
        CliInterface::apply_args_to_config(&mut config, args);
        config
    }

    #[test]
    fn test_cli_args_parsing() {
        let args = parse(&["redis-lsp"]);
        assert!(args.address.is_none());
        assert!(args.command.is_none());
        assert!(!args.db_cache);
    }

    #[test]
    fn test_connection_flags_override_config() {
        let args = parse(&[
            "redis-lsp",
            "--address",
            "10.0.0.5:6380",
            "--username",
            "bob",
            "--password",
            "pw",
            "--database",
            "4",
            "--db-cache",
        ]);
        let config = apply(&args);

        assert_eq!(config.connection.address, "10.0.0.5:6380");
        assert_eq!(config.connection.username.as_deref(), Some("bob"));
        assert_eq!(config.connection.password.as_deref(), Some("pw"));
        assert_eq!(config.connection.database, 4);
        assert!(config.cache.enabled);
    }

    #[test]
    fn test_logging_flags() {
        assert_eq!(apply(&parse(&["redis-lsp", "--vv"])).logging.level, LogLevel::Trace);
        assert_eq!(apply(&parse(&["redis-lsp", "-v"])).logging.level, LogLevel::Debug);
        assert_eq!(apply(&parse(&["redis-lsp", "--debug"])).logging.level, LogLevel::Debug);
        assert_eq!(apply(&parse(&["redis-lsp", "-q"])).logging.level, LogLevel::Error);
        assert_eq!(apply(&parse(&["redis-lsp"])).logging.level, LogLevel::Warn);

        let config = apply(&parse(&["redis-lsp", "--log-file", "/tmp/redis-lsp.log"]));
        assert_eq!(
            config.logging.file_path,
            Some(PathBuf::from("/tmp/redis-lsp.log"))
        );
    }

    #[test]
    fn test_subcommands() {
        let args = parse(&["redis-lsp", "completion", "zsh"]);
        assert!(matches!(args.command, Some(Commands::Completion { ref shell }) if shell == "zsh"));

        let args = parse(&["redis-lsp", "config", "--show"]);
        assert!(matches!(
            args.command,
            Some(Commands::Config { show: true, validate: false })
        ));

        let args = parse(&["redis-lsp", "docs", "fetch", "--directory", "/tmp/docs"]);
        assert!(matches!(
            args.command,
            Some(Commands::Docs {
                action: DocsCommand::Fetch { ref directory, source: None }
            }) if directory.as_deref() == Some(std::path::Path::new("/tmp/docs"))
        ));
    }

    #[test]
    fn test_docs_fetcher_defaults_to_config() {
        let cli = CliInterface::from_args(parse(&["redis-lsp"])).unwrap();
        let fetcher = cli.docs_fetcher(None, None).unwrap();
        assert_eq!(
            Some(fetcher.directory().to_path_buf()),
            cli.config().documentation.directory
        );

        let custom = PathBuf::from("/tmp/redis-docs");
        let fetcher = cli.docs_fetcher(Some(&custom), Some("http://mirror/commands")).unwrap();
        assert_eq!(fetcher.directory(), custom.as_path());
    }

    #[test]
    fn test_docs_fetcher_needs_a_directory() {
        let mut cli = CliInterface::from_args(parse(&["redis-lsp"])).unwrap();
        cli.config.documentation.directory = None;
        assert!(cli.docs_fetcher(None, None).is_err());
    }

    #[tokio::test]
    async fn test_docs_fetch_subcommand_writes_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("docs");
        let target_arg = target.to_str().unwrap().to_string();

        let cli = CliInterface::from_args(parse(&[
            "redis-lsp",
            "docs",
            "fetch",
            "--directory",
            &target_arg,
            "--source",
            "http://127.0.0.1:1",
        ]))
        .unwrap();

        // Nothing listens on port 1: every page fails but the run completes.
        assert!(cli.handle_subcommand().await.unwrap());
        assert!(target.is_dir());
        assert_eq!(std::fs::read_dir(&target).unwrap().count(), 0);
    }

    #[test]
    fn test_config_file_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[connection]\naddress = \"cache:7000\"").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = CliInterface::from_args(parse(&["redis-lsp", "-c", &path])).unwrap();
        assert_eq!(cli.config().connection.address, "cache:7000");

        let cli =
            CliInterface::from_args(parse(&["redis-lsp", "-c", &path, "--address", "x:1"])).unwrap();
        assert_eq!(cli.config().connection.address, "x:1");
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[connection]\ntimeout = 0").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = CliInterface::from_args(parse(&["redis-lsp", "-c", &path])).unwrap();
        assert_eq!(cli.config().connection.timeout, 5);
    }
}
