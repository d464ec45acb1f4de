//! Redis script lexer for error-tolerant tokenization
//!
//! Turns a whole document buffer into a flat list of tokens. Every token carries
//! two coordinate systems that are computed together in a single pass:
//!
//! - absolute offsets into the buffer (`start..=end`)
//! - offsets relative to the start of the current line (`line_start..=line_end`)
//!
//! Editors report the cursor as (line, character) with the character relative to
//! its own line, which is why the second pair exists.
//!
//! # Design Principles
//!
//! - **Never panic** - always return a valid token stream
//! - **Never reject input** - anything unrecognized still ends up in a token
//! - **No coalescing of whitespace** - one whitespace token per character
//!
//! Offsets count `char`s, not bytes.

use super::vocabulary;

const LINE_BREAK: char = '\n';
const TERMINATOR: char = ';';
const QUOTE: char = '"';
const ESCAPE: char = '\\';

/// Token types for Redis scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Single-word command name (`GET`, `SET`, `ACL`, ...)
    Keyword,
    /// Any other bare word (keys, values, options)
    Identifier,
    /// Double-quoted string, quotes included
    String,
    /// One whitespace character other than a line break
    Whitespace,
    /// Statement terminator (`;`)
    Terminator,
    /// Line break (`\n`)
    LineBreak,
    /// Command fused with its sub-keyword, e.g. `ACL GETUSER`.
    ///
    /// Never produced by the lexer itself.
    Compound,
    /// Trailing escape characters with nothing left to attach to
    Unknown,
}

/// Token with absolute and line-relative position information
///
/// All ends are inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    pub line_start: usize,
    pub line_end: usize,
    pub value: String,
}

impl Token {
    /// Check if this token is a whitespace token (line breaks excluded)
    pub fn is_whitespace(&self) -> bool {
        self.kind == TokenKind::Whitespace
    }

    /// Check if this token separates statements
    pub fn is_separator(&self) -> bool {
        matches!(self.kind, TokenKind::Terminator | TokenKind::LineBreak)
    }
}

/// Redis script lexer
pub struct Lexer {
    input: Vec<char>,
    pos: usize,
    line_pos: usize,
}

impl Lexer {
    /// Create a new lexer from input string
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
            line_pos: 0,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(input: &str) -> Vec<Token> {
        let mut lexer = Self::new(input);
        let mut tokens = Vec::new();

        while let Some(token) = lexer.next_token() {
            tokens.push(token);
        }

        tokens
    }

    /// Get the next token, or `None` once the input is exhausted
    fn next_token(&mut self) -> Option<Token> {
        // Escape characters are dropped without affecting what follows them.
        let escapes_from = self.pos;
        let escapes_line_from = self.line_pos;
        while !self.is_at_end() && self.current_char() == ESCAPE {
            self.advance();
        }

        if self.is_at_end() {
            if self.pos == escapes_from {
                return None;
            }
            let value: String = self.input[escapes_from..self.pos].iter().collect();
            return Some(Token {
                kind: TokenKind::Unknown,
                start: escapes_from,
                end: self.pos - 1,
                line_start: escapes_line_from,
                line_end: self.line_pos - 1,
                value,
            });
        }

        let ch = self.current_char();
        let token = match ch {
            LINE_BREAK => {
                let token = self.single(TokenKind::LineBreak);
                self.line_pos = 0;
                token
            }
            c if c.is_whitespace() => self.single(TokenKind::Whitespace),
            TERMINATOR => self.single(TokenKind::Terminator),
            QUOTE => self.scan_string(),
            _ => self.scan_identifier(),
        };

        Some(token)
    }

    /// Consume exactly one character as a token of the given kind
    fn single(&mut self, kind: TokenKind) -> Token {
        let (start, line_start) = (self.pos, self.line_pos);
        let value = self.current_char().to_string();
        self.advance();
        self.finish(kind, start, line_start, value)
    }

    /// Scan a string literal up to and including the closing quote.
    ///
    /// An unterminated string runs to the end of input.
    fn scan_string(&mut self) -> Token {
        let (start, line_start) = (self.pos, self.line_pos);
        let mut value = String::new();

        value.push(self.current_char());
        self.advance();

        while !self.is_at_end() {
            let ch = self.current_char();
            value.push(ch);
            self.advance();
            if ch == QUOTE {
                break;
            }
        }

        self.finish(TokenKind::String, start, line_start, value)
    }

    /// Scan a bare word, refining it to a keyword when it names a command
    fn scan_identifier(&mut self) -> Token {
        let (start, line_start) = (self.pos, self.line_pos);
        let mut value = String::new();

        while !self.is_at_end() {
            let ch = self.current_char();
            if ch.is_whitespace() || ch == TERMINATOR || ch == QUOTE || ch == ESCAPE {
                break;
            }
            value.push(ch);
            self.advance();
        }

        let kind = if vocabulary::is_command(&value) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };

        self.finish(kind, start, line_start, value)
    }

    /// Build a token ending at the character just consumed
    fn finish(&self, kind: TokenKind, start: usize, line_start: usize, value: String) -> Token {
        Token {
            kind,
            start,
            end: self.pos - 1,
            line_start,
            line_end: line_start + (self.pos - 1 - start),
            value,
        }
    }

    /// Get current character
    fn current_char(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.input[self.pos]
        }
    }

    /// Advance position in both coordinate systems
    fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
            self.line_pos += 1;
        }
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }
}
