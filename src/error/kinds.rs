use std::{fmt, io};

use crate::error::store::format_redis_error;

/// Crate-wide `Result` type using [`RedisLspError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, RedisLspError>;

/// Top-level error type for redis-lsp operations.
///
/// This type wraps more specific error kinds and provides a single
/// error type that can be used throughout the crate.
#[derive(Debug)]
pub enum RedisLspError {
    /// Connection-related errors.
    Connection(ConnectionError),

    /// Tokenizing and statement building errors.
    Parse(ParseError),

    /// Command execution errors.
    Execution(ExecutionError),

    /// Configuration errors.
    Config(ConfigError),

    /// I/O errors.
    Io(io::Error),

    /// Redis driver errors.
    Redis(redis::RedisError),

    /// HTTP client errors.
    Http(reqwest::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Connection-specific errors.
#[derive(Debug)]
pub enum ConnectionError {
    /// Failed to establish a connection.
    ConnectionFailed(String),

    /// Connection timeout.
    Timeout,

    /// Invalid connection address.
    InvalidAddress(String),
}

/// Parsing-specific errors.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// No tokens or no statements to work with.
    EmptyInput,
}

/// Execution-specific errors.
#[derive(Debug)]
pub enum ExecutionError {
    /// The execute request carried no runnable text.
    MissingArgument,

    /// A command with no name was sent to the store.
    EmptyCommand,
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for RedisLspError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedisLspError::Connection(e) => write!(f, "Connection error: {e}"),
            RedisLspError::Parse(e) => write!(f, "{e}"),
            RedisLspError::Execution(e) => write!(f, "Execution error: {e}"),
            RedisLspError::Config(e) => write!(f, "Configuration error: {e}"),
            RedisLspError::Io(e) => write!(f, "I/O error: {e}"),
            RedisLspError::Redis(e) => format_redis_error(f, e),
            RedisLspError::Http(e) => write!(f, "HTTP error: {e}"),
            RedisLspError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionError::ConnectionFailed(msg) => write!(f, "Failed to connect: {msg}"),
            ConnectionError::Timeout => write!(f, "Connection timeout"),
            ConnectionError::InvalidAddress(addr) => {
                write!(f, "Invalid connection address: {addr}")
            }
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptyInput => write!(f, "Parse error: empty input"),
        }
    }
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionError::MissingArgument => {
                write!(f, "expected the command text as the first argument")
            }
            ExecutionError::EmptyCommand => write!(f, "empty command"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl std::error::Error for RedisLspError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RedisLspError::Io(e) => Some(e),
            RedisLspError::Redis(e) => Some(e),
            RedisLspError::Http(e) => Some(e),
            _ => None,
        }
    }
}
impl std::error::Error for ConnectionError {}
impl std::error::Error for ParseError {}
impl std::error::Error for ExecutionError {}
impl std::error::Error for ConfigError {}

/* ========================= Conversions to RedisLspError ========================= */

impl From<io::Error> for RedisLspError {
    fn from(err: io::Error) -> Self {
        RedisLspError::Io(err)
    }
}

impl From<redis::RedisError> for RedisLspError {
    fn from(err: redis::RedisError) -> Self {
        RedisLspError::Redis(err)
    }
}

impl From<reqwest::Error> for RedisLspError {
    fn from(err: reqwest::Error) -> Self {
        RedisLspError::Http(err)
    }
}

impl From<ConnectionError> for RedisLspError {
    fn from(err: ConnectionError) -> Self {
        RedisLspError::Connection(err)
    }
}

impl From<ParseError> for RedisLspError {
    fn from(err: ParseError) -> Self {
        RedisLspError::Parse(err)
    }
}

impl From<ExecutionError> for RedisLspError {
    fn from(err: ExecutionError) -> Self {
        RedisLspError::Execution(err)
    }
}

impl From<ConfigError> for RedisLspError {
    fn from(err: ConfigError) -> Self {
        RedisLspError::Config(err)
    }
}

impl From<String> for RedisLspError {
    fn from(msg: String) -> Self {
        RedisLspError::Generic(msg)
    }
}

impl From<&str> for RedisLspError {
    fn from(msg: &str) -> Self {
        RedisLspError::Generic(msg.to_owned())
    }
}
