//! Redis Language Server Library
//!
//! Completion-context engine and editor protocol server for Redis command
//! scripts.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `completion`: Cursor resolution, context classification and candidates
//! - `config`: Configuration management
//! - `connection`: Redis connection management and name cache
//! - `documentation`: Command documentation lookup
//! - `error`: Error types and handling
//! - `executor`: Script execution against the store
//! - `parser`: Tokenizing and statement structuring
//! - `server`: Editor protocol handler
//!
//! # Example
//!
//! ```
//! use redis_lsp::parser::{Command, Parser};
//!
//! let statements = Parser::new().parse("ACL GETUSER default\nGET key").unwrap();
//! let commands = Command::from_statements(&statements);
//! assert_eq!(commands[0].args(), ["ACL", "GETUSER", "default"]);
//! ```

pub mod cli;
pub mod completion;
pub mod config;
pub mod connection;
pub mod documentation;
pub mod error;
pub mod executor;
pub mod parser;
pub mod server;

// Re-export commonly used types
pub use completion::{CompletionContext, CompletionEngine};
pub use config::Config;
pub use connection::{ConnectionManager, StoreClient};
pub use error::{RedisLspError, Result};
pub use executor::{CommandExecutor, ExecutionOutcome};
pub use parser::{Command, Parser};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}
