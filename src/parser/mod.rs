//! Tokenizing and statement structuring for Redis scripts
//!
//! The pipeline always runs over the full current buffer:
//! text → tokens → statements → statements with compound keywords.
//!
//! The parser is split into multiple focused modules:
//! - `lexer`: position-tagged tokens in two coordinate systems
//! - `vocabulary`: read-only command tables
//! - `statement`: statement building and multi-keyword merging
//! - `command`: statements flattened into positional arguments
//!
//! # Examples
//!
//! ```
//! use redis_lsp::parser::Parser;
//!
//! let statements = Parser::new().parse("ACL GETUSER default;GET key").unwrap();
//! assert_eq!(statements.len(), 2);
//! assert_eq!(statements[0].nodes()[0].to_string(), "ACL GETUSER");
//! ```

mod command;
mod lexer;
mod statement;
pub mod vocabulary;


// Re-export public API
pub use command::Command;
pub use lexer::{Lexer, Token, TokenKind};
pub use statement::{
    CompoundKeyword, Node, Statement, build_statements, merge_multi_keywords,
};

use tracing::debug;

use crate::error::Result;

/// Main parser for Redis scripts
///
/// Stateless: every call re-tokenizes the whole input.
pub struct Parser {}

impl Parser {
    /// Create a new parser instance
    pub fn new() -> Self {
        Self {}
    }

    /// Parse an input string into statements with compound keywords merged
    ///
    /// # Arguments
    ///
    /// * `input` - Full buffer text
    ///
    /// # Returns
    ///
    /// * `Result<Vec<Statement>>` - The statements, or `ParseError::EmptyInput`
    ///   when the input produced no token
    pub fn parse(&self, input: &str) -> Result<Vec<Statement>> {
        let tokens = Lexer::tokenize(input);
        debug!(tokens = tokens.len(), "tokenized input");

        let statements = build_statements(tokens)?;
        Ok(merge_multi_keywords(statements))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
