//! Completion context classification
//!
//! Decides what kind of name the user is about to type by looking at the
//! nearest token before the cursor.

use tracing::debug;

use super::cursor::Resolution;
use crate::config::CompletionConfig;
use crate::parser::{Node, TokenKind};

/// Represents the type of completion needed at the cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionContext {
    /// Complete user names
    User,

    /// Complete key names
    Key,

    /// Complete command names
    Command {
        /// Text typed so far, matched against the command vocabulary
        prefix: String,
    },
}

impl CompletionContext {
    /// Create a command completion context
    pub fn command(prefix: impl Into<String>) -> Self {
        Self::Command {
            prefix: prefix.into(),
        }
    }

    /// Get the prefix for this context
    pub fn prefix(&self) -> &str {
        match self {
            Self::Command { prefix } => prefix,
            Self::User | Self::Key => "",
        }
    }
}

/// Commands whose argument is a user or key name.
///
/// Built once from configuration and never changed afterwards.
#[derive(Debug, Clone)]
pub struct Triggers {
    users: Vec<String>,
    keys: Vec<String>,
}

impl Triggers {
    pub fn new(users: Vec<String>, keys: Vec<String>) -> Self {
        Self { users, keys }
    }

    pub fn from_config(config: &CompletionConfig) -> Self {
        Self::new(config.user_triggers.clone(), config.key_triggers.clone())
    }

    pub fn users(&self) -> &[String] {
        &self.users
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Classify the position described by `resolved`.
    ///
    /// A terminator right before the cursor starts a fresh command. Otherwise the
    /// nearest non-whitespace node ending strictly before the cursor column
    /// decides between user names, key names and a command prefix.
    pub fn classify(&self, resolved: &Resolution<'_>) -> CompletionContext {
        let context = match resolved.column {
            Some(column) => self.classify_at(resolved, column),
            None => CompletionContext::command(""),
        };

        debug!(?context, offset = resolved.offset, "classified cursor");
        context
    }

    fn classify_at(&self, resolved: &Resolution<'_>, column: usize) -> CompletionContext {
        let nodes = resolved.statement.nodes();

        let boundary = nodes
            .iter()
            .rev()
            .find(|n| !n.is_whitespace() && n.line_end() <= column);
        if boundary.is_some_and(|n| n.kind() == TokenKind::Terminator) {
            return CompletionContext::command("");
        }

        let previous = nodes
            .iter()
            .rev()
            .find(|n| !n.is_whitespace() && n.line_end() < column);

        match previous {
            Some(node) if matches_any(&self.users, node) => CompletionContext::User,
            Some(node) if matches_any(&self.keys, node) => CompletionContext::Key,
            _ => CompletionContext::command(resolved.text_before_cursor().trim_start()),
        }
    }
}

impl Default for Triggers {
    fn default() -> Self {
        Self::from_config(&CompletionConfig::default())
    }
}

fn matches_any(triggers: &[String], node: &Node) -> bool {
    let text = node.keyword_text();
    triggers.iter().any(|t| *t == text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::cursor::resolve;
    use crate::parser::Parser;

    /// Classify `input` with the cursor right after its last character
    fn classify_end(input: &str) -> CompletionContext {
        let line = input.matches('\n').count();
        let column = input.rsplit('\n').next().unwrap().chars().count();
        classify_at(input, line, column)
    }

    fn classify_at(input: &str, line: usize, character: usize) -> CompletionContext {
        let statements = Parser::new().parse(input).unwrap();
        let resolved = resolve(&statements, line, character.checked_sub(1)).unwrap();
        Triggers::default().classify(&resolved)
    }

    #[test]
    fn test_command_context_helpers() {
        let ctx = CompletionContext::command("GE");
        assert_eq!(ctx.prefix(), "GE");
        assert_eq!(CompletionContext::User.prefix(), "");
        assert_eq!(ctx, CompletionContext::Command { prefix: "GE".into() });
    }

    #[test]
    fn test_user_after_compound_trigger() {
        assert_eq!(classify_end("ACL GETUSER "), CompletionContext::User);
        assert_eq!(classify_end("ACL GETUSER def"), CompletionContext::User);
        assert_eq!(classify_end("ACL   GETUSER de"), CompletionContext::User);
    }

    #[test]
    fn test_key_after_key_trigger() {
        assert_eq!(classify_end("GET "), CompletionContext::Key);
        assert_eq!(classify_end("SET user:"), CompletionContext::Key);
        assert_eq!(classify_end("GET a;SET b"), CompletionContext::Key);
    }

    #[test]
    fn test_typing_the_trigger_itself_completes_commands() {
        assert_eq!(classify_end("GET"), CompletionContext::command("GET"));
        assert_eq!(classify_end("ACL GETUSER"), CompletionContext::command("ACL GETUSER"));
    }

    #[test]
    fn test_trigger_matching_is_exact() {
        assert_eq!(classify_end("get k"), CompletionContext::command("get k"));
        assert_eq!(classify_end("HGET "), CompletionContext::command("HGET "));
    }

    #[test]
    fn test_command_prefix() {
        assert_eq!(classify_end("HS"), CompletionContext::command("HS"));
        assert_eq!(classify_end("GET a\nZA"), CompletionContext::command("ZA"));
        assert_eq!(classify_end("   CL"), CompletionContext::command("CL"));
    }

    #[test]
    fn test_prefix_stops_at_cursor() {
        assert_eq!(classify_at("HSET key", 0, 2), CompletionContext::command("HS"));
    }

    #[test]
    fn test_nodes_after_the_cursor_are_ignored() {
        // One statement: the quoted line break does not split it, so GET sits
        // further along the same statement than the cursor.
        let input = "ACL GETUSER \"x\ny\" GET";
        assert_eq!(Parser::new().parse(input).unwrap().len(), 1);

        assert_eq!(classify_at(input, 0, 12), CompletionContext::User);
        assert_eq!(classify_at(input, 0, 4), CompletionContext::command("ACL "));
        assert_eq!(classify_at(input, 0, 21), CompletionContext::command(input));
    }

    #[test]
    fn test_after_terminator_starts_fresh_command() {
        assert_eq!(classify_end("GET test;"), CompletionContext::command(""));
    }

    #[test]
    fn test_column_zero_completes_commands() {
        assert_eq!(classify_at("GET a\nGET b", 1, 0), CompletionContext::command(""));
    }

    #[test]
    fn test_custom_triggers() {
        let statements = Parser::new().parse("HGETALL ").unwrap();
        let resolved = resolve(&statements, 0, Some(7)).unwrap();
        let triggers = Triggers::new(vec![], vec!["HGETALL".to_string()]);
        assert_eq!(triggers.classify(&resolved), CompletionContext::Key);
    }
}
