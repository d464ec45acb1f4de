//! Command type definitions for redis-lsp
//!
//! A [`Command`] is a statement reduced to the positional arguments the store
//! expects: separators and whitespace dropped, compound keywords split back into
//! their words.

use std::fmt;

use super::lexer::TokenKind;
use super::statement::{Node, Statement};

/// A statement flattened into positional arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    args: Vec<String>,
}

impl Command {
    /// Flatten one statement.
    pub fn from_statement(statement: &Statement) -> Self {
        let mut args = Vec::new();

        for node in statement.nodes() {
            match node {
                Node::Compound(compound) => args.extend(compound.words().map(str::to_string)),
                Node::Token(token) => match token.kind {
                    TokenKind::Whitespace | TokenKind::Terminator | TokenKind::LineBreak => {}
                    _ => args.push(token.value.clone()),
                },
            }
        }

        Self { args }
    }

    /// Flatten statements in order, skipping the ones that hold no argument
    pub fn from_statements(statements: &[Statement]) -> Vec<Self> {
        statements
            .iter()
            .map(Self::from_statement)
            .filter(|c| !c.is_empty())
            .collect()
    }

    /// Command name followed by its arguments
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.args.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn flatten(input: &str) -> Vec<Vec<String>> {
        let statements = Parser::new().parse(input).unwrap();
        Command::from_statements(&statements)
            .into_iter()
            .map(|c| c.args().to_vec())
            .collect()
    }

    #[test]
    fn test_flatten_drops_separators() {
        assert_eq!(
            flatten("SET test \"testing\";GET test"),
            vec![
                vec!["SET", "test", "\"testing\""],
                vec!["GET", "test"],
            ]
        );
    }

    #[test]
    fn test_flatten_splits_compounds() {
        assert_eq!(
            flatten("ACL   GETUSER default\nCONFIG GET maxmemory"),
            vec![
                vec!["ACL", "GETUSER", "default"],
                vec!["CONFIG", "GET", "maxmemory"],
            ]
        );
    }

    #[test]
    fn test_flatten_skips_blank_statements() {
        assert_eq!(
            flatten("GET a\n\n  \nGET b;;"),
            vec![vec!["GET", "a"], vec!["GET", "b"]]
        );
    }

    #[test]
    fn test_command_display() {
        let statements = Parser::new().parse("LATENCY  LATEST").unwrap();
        let command = Command::from_statement(&statements[0]);
        assert_eq!(command.to_string(), "LATENCY LATEST");
    }
}
