//! Completion engine - orchestrates the completion flow
//!
//! Ties the pipeline together: parse the whole buffer, resolve the cursor to a
//! statement, classify the position and fetch candidates.

use std::sync::Arc;

use tracing::debug;

use super::context::{CompletionContext, Triggers};
use super::cursor;
use super::provider::CandidateProvider;
use crate::parser::Parser;

/// Result of a completion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// What the cursor was classified as
    pub context: CompletionContext,
    /// Candidate labels, in display order
    pub candidates: Vec<String>,
}

/// Main completion engine
pub struct CompletionEngine {
    /// Candidate provider for fetching suggestions
    provider: Arc<dyn CandidateProvider>,
    /// Commands that switch completion to user or key names
    triggers: Triggers,
    parser: Parser,
}

impl CompletionEngine {
    /// Create a new completion engine
    ///
    /// # Arguments
    /// * `provider` - Candidate provider for fetching suggestions
    /// * `triggers` - Frozen trigger tables
    pub fn new(provider: Arc<dyn CandidateProvider>, triggers: Triggers) -> Self {
        Self {
            provider,
            triggers,
            parser: Parser::new(),
        }
    }

    /// Complete the document at the given cursor
    ///
    /// # Arguments
    /// * `text` - Full document text
    /// * `line` - Zero-based cursor line
    /// * `character` - Zero-based cursor column on that line
    pub fn complete(&self, text: &str, line: usize, character: usize) -> Completion {
        let context = self.context_at(text, line, character);
        let candidates = self.fetch_candidates(&context);

        debug!(
            line,
            character,
            candidates = candidates.len(),
            "completion finished"
        );

        Completion {
            context,
            candidates,
        }
    }

    /// Classify the cursor without fetching candidates
    pub fn context_at(&self, text: &str, line: usize, character: usize) -> CompletionContext {
        // An empty document has no token; it can only start a command.
        let Ok(statements) = self.parser.parse(text) else {
            return CompletionContext::command("");
        };

        // The column of the last character typed before the cursor.
        match cursor::resolve(&statements, line, character.checked_sub(1)) {
            Ok(resolved) => self.triggers.classify(&resolved),
            Err(_) => CompletionContext::command(""),
        }
    }

    /// Fetch candidates based on completion context
    fn fetch_candidates(&self, context: &CompletionContext) -> Vec<String> {
        match context {
            CompletionContext::User => self.provider.users(),
            CompletionContext::Key => self.provider.keys(),
            CompletionContext::Command { prefix } => self.provider.commands(prefix),
        }
    }
}
