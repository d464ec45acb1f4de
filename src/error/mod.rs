//! Error handling module for redis-lsp.
//!
//! This module provides:
//! - A crate-wide error type with per-area error kinds
//! - Structured JSON rendering of Redis driver errors
//!
//! # Example
//!
//! ```rust,no_run
//! use redis_lsp::error::{ParseError, Result};
//!
//! fn example_operation(tokens: usize) -> Result<()> {
//!     if tokens == 0 {
//!         return Err(ParseError::EmptyInput.into());
//!     }
//!     Ok(())
//! }
//! ```

pub mod kinds;
pub mod store;

// Re-export commonly used types
pub use kinds::{
    ConfigError, ConnectionError, ExecutionError, ParseError, RedisLspError, Result,
};
pub use store::ErrorInfo;
