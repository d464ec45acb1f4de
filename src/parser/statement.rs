//! Statement building and multi-keyword merging
//!
//! Tokens are grouped into statements at terminators and line breaks, then each
//! statement is post-processed so that a container command and its sub-keyword
//! (`ACL GETUSER`) become one compound node.

use std::fmt;

use tracing::trace;

use super::lexer::{Token, TokenKind};
use super::vocabulary;
use crate::error::{ParseError, Result};

/// A command token fused with its sub-keyword, whitespace in between included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundKeyword {
    tokens: Vec<Token>,
}

impl CompoundKeyword {
    /// Constituent tokens in input order
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Non-whitespace words, e.g. `["ACL", "GETUSER"]`
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.tokens
            .iter()
            .filter(|t| !t.is_whitespace())
            .map(|t| t.value.as_str())
    }
}

/// One element of a statement: either a plain token or a compound keyword
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Token(Token),
    Compound(CompoundKeyword),
}

impl Node {
    pub fn kind(&self) -> TokenKind {
        match self {
            Node::Token(t) => t.kind,
            Node::Compound(_) => TokenKind::Compound,
        }
    }

    pub fn start(&self) -> usize {
        self.first_token().start
    }

    pub fn end(&self) -> usize {
        self.last_token().end
    }

    pub fn line_start(&self) -> usize {
        self.first_token().line_start
    }

    pub fn line_end(&self) -> usize {
        self.last_token().line_end
    }

    pub fn is_whitespace(&self) -> bool {
        self.kind() == TokenKind::Whitespace
    }

    /// Text used to match the node against command names.
    ///
    /// Compound keywords are normalized to single spaces between words.
    pub fn keyword_text(&self) -> String {
        match self {
            Node::Token(t) => t.value.clone(),
            Node::Compound(c) => c.words().collect::<Vec<_>>().join(" "),
        }
    }

    fn first_token(&self) -> &Token {
        match self {
            Node::Token(t) => t,
            Node::Compound(c) => &c.tokens[0],
        }
    }

    fn last_token(&self) -> &Token {
        match self {
            Node::Token(t) => t,
            Node::Compound(c) => &c.tokens[c.tokens.len() - 1],
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Token(t) => f.write_str(&t.value),
            Node::Compound(c) => c.tokens.iter().try_for_each(|t| f.write_str(&t.value)),
        }
    }
}

/// One logical command between separators
///
/// Statements produced by [`build_statements`] are never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    line: usize,
    nodes: Vec<Node>,
}

impl Statement {
    fn new(line: usize) -> Self {
        Self {
            line,
            nodes: Vec::new(),
        }
    }

    /// Zero-based line index of the statement's first token
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn start(&self) -> usize {
        self.nodes.first().map_or(0, Node::start)
    }

    pub fn end(&self) -> usize {
        self.nodes.last().map_or(0, Node::end)
    }

    pub fn line_start(&self) -> usize {
        self.nodes.first().map_or(0, Node::line_start)
    }

    pub fn line_end(&self) -> usize {
        self.nodes.last().map_or(0, Node::line_end)
    }

    /// Check whether the first non-whitespace node at or after `index` matches
    /// one of `expected`
    pub fn next_node_is(&self, expected: &[&str], index: usize) -> bool {
        self.nodes
            .iter()
            .skip(index)
            .find(|n| !n.is_whitespace())
            .is_some_and(|n| expected.contains(&n.to_string().as_str()))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.nodes.iter().try_for_each(|n| write!(f, "{n}"))
    }
}

/// Partition tokens into statements.
///
/// A terminator or line break closes the current statement unless it is the
/// very last token. Only line breaks advance the line index.
pub fn build_statements(tokens: Vec<Token>) -> Result<Vec<Statement>> {
    if tokens.is_empty() {
        return Err(ParseError::EmptyInput.into());
    }

    let total = tokens.len();
    let mut statements = Vec::new();
    let mut line = 0;
    let mut current = Statement::new(line);

    for (i, token) in tokens.into_iter().enumerate() {
        let kind = token.kind;
        current.nodes.push(Node::Token(token));

        if matches!(kind, TokenKind::Terminator | TokenKind::LineBreak) && i + 1 < total {
            if kind == TokenKind::LineBreak {
                line += 1;
            }
            statements.push(std::mem::replace(&mut current, Statement::new(line)));
        }
    }

    statements.push(current);
    trace!(count = statements.len(), "built statements");

    Ok(statements)
}

/// Merge state carried through a single left-to-right pass
enum MergeState {
    Idle,
    Accumulating(Vec<Token>),
}

/// Fuse container commands with their sub-keywords in every statement.
///
/// Running it again over its own output changes nothing.
pub fn merge_multi_keywords(statements: Vec<Statement>) -> Vec<Statement> {
    statements.into_iter().map(merge_statement).collect()
}

fn merge_statement(statement: Statement) -> Statement {
    let mut merged = Vec::with_capacity(statement.nodes.len());
    let mut state = MergeState::Idle;

    for (i, node) in statement.nodes.iter().enumerate() {
        state = match (state, node) {
            (MergeState::Accumulating(mut tokens), Node::Token(t)) if t.is_whitespace() => {
                tokens.push(t.clone());
                MergeState::Accumulating(tokens)
            }
            (MergeState::Idle, n) if n.is_whitespace() => {
                merged.push(n.clone());
                MergeState::Idle
            }
            (MergeState::Idle, Node::Token(t)) => match vocabulary::subcommands(&t.value) {
                Some(expected) if statement.next_node_is(expected, i + 1) => {
                    MergeState::Accumulating(vec![t.clone()])
                }
                _ => {
                    merged.push(node.clone());
                    MergeState::Idle
                }
            },
            (MergeState::Accumulating(mut tokens), n) => {
                match n {
                    Node::Token(t) => tokens.push(t.clone()),
                    Node::Compound(c) => tokens.extend(c.tokens.iter().cloned()),
                }
                merged.push(Node::Compound(CompoundKeyword { tokens }));
                MergeState::Idle
            }
            (MergeState::Idle, Node::Compound(_)) => {
                merged.push(node.clone());
                MergeState::Idle
            }
        };
    }

    // The lookahead guarantees a closing node, but never drop tokens.
    if let MergeState::Accumulating(tokens) = state {
        merged.extend(tokens.into_iter().map(Node::Token));
    }

    Statement {
        line: statement.line,
        nodes: merged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Lexer;

    fn statements(input: &str) -> Vec<Statement> {
        build_statements(Lexer::tokenize(input)).unwrap()
    }

    fn compounds(input: &str) -> Vec<String> {
        merge_multi_keywords(statements(input))
            .iter()
            .flat_map(|s| s.nodes().to_vec())
            .filter(|n| n.kind() == TokenKind::Compound)
            .map(|n| n.to_string())
            .collect()
    }

    #[test]
    fn test_multiple_statements() {
        let result = statements("SET test \"testing\";GET test");
        let texts: Vec<String> = result.iter().map(|s| s.to_string()).collect();
        assert_eq!(texts, vec!["SET test \"testing\";", "GET test"]);
    }

    #[test]
    fn test_single_statement_with_trailing_terminator() {
        let result = statements("GET test;");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].to_string(), "GET test;");
    }

    #[test]
    fn test_three_terminated_statements() {
        let texts: Vec<String> = statements("GET test;GET test2;GET test3;")
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(texts, vec!["GET test;", "GET test2;", "GET test3;"]);
    }

    #[test]
    fn test_statement_lines() {
        let lines: Vec<usize> = statements("GET test1\nGET test2\nGET test3")
            .iter()
            .map(Statement::line)
            .collect();
        assert_eq!(lines, vec![0, 1, 2]);
    }

    #[test]
    fn test_terminator_does_not_advance_line() {
        let lines: Vec<usize> = statements("GET a;GET b\nGET c")
            .iter()
            .map(Statement::line)
            .collect();
        assert_eq!(lines, vec![0, 0, 1]);
    }

    #[test]
    fn test_statement_spans() {
        let result = statements("GET test\nGET test2");
        assert_eq!((result[1].start(), result[1].end()), (9, 17));
        assert_eq!((result[1].line_start(), result[1].line_end()), (0, 8));
    }

    #[test]
    fn test_empty_tokens_is_error() {
        let err = build_statements(Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::RedisLspError::Parse(ParseError::EmptyInput)
        ));
    }

    #[test]
    fn test_compound_with_identifier() {
        assert_eq!(compounds("ACL GETUSER default"), vec!["ACL GETUSER"]);

        let merged = merge_multi_keywords(statements("ACL GETUSER default"));
        let nodes = merged[0].nodes();
        assert_eq!(nodes.len(), 3);
        assert!(nodes[1].is_whitespace());
        assert_eq!(nodes[2].to_string(), "default");
        assert_eq!(nodes[2].kind(), TokenKind::Identifier);
    }

    #[test]
    fn test_multiple_compounds() {
        assert_eq!(
            compounds("ACL GETUSER default;ACL LIST"),
            vec!["ACL GETUSER", "ACL LIST"]
        );
    }

    #[test]
    fn test_compound_with_hyphens() {
        assert_eq!(
            compounds("CLUSTER COUNT-FAILURE-REPORTS"),
            vec!["CLUSTER COUNT-FAILURE-REPORTS"]
        );
    }

    #[test]
    fn test_no_compound() {
        assert!(compounds("GET test").is_empty());
        assert!(compounds("HELLO").is_empty());
        assert!(compounds("COMMAND").is_empty());
        assert!(compounds("ACL NOTASUB").is_empty());
    }

    #[test]
    fn test_sub_keyword_is_case_sensitive() {
        assert!(compounds("ACL getuser default").is_empty());
    }

    #[test]
    fn test_container_name_as_sub_keyword_closes_compound() {
        // DEBUG is both a container and a sub-keyword of SCRIPT.
        assert_eq!(compounds("SCRIPT DEBUG YES"), vec!["SCRIPT DEBUG"]);
    }

    #[test]
    fn test_compound_span_covers_both_words() {
        let merged = merge_multi_keywords(statements("GET a\nLATENCY  LATEST"));
        let node = &merged[1].nodes()[0];
        assert_eq!(node.to_string(), "LATENCY  LATEST");
        assert_eq!(node.keyword_text(), "LATENCY LATEST");
        assert_eq!((node.start(), node.end()), (6, 20));
        assert_eq!((node.line_start(), node.line_end()), (0, 14));
    }

    #[test]
    fn test_merge_is_idempotent() {
        let once = merge_multi_keywords(statements("ACL SETUSER bob on;CONFIG GET maxmemory"));
        let twice = merge_multi_keywords(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_next_node_is_skips_whitespace() {
        let result = statements("ACL   WHOAMI");
        assert!(result[0].next_node_is(&["WHOAMI"], 1));
        assert!(!result[0].next_node_is(&["WHOAMI"], 10));
    }
}
