//! Cursor resolution
//!
//! Maps an editor cursor back onto the statement it sits in. Editors report the
//! column relative to its own line, so matching uses the statements'
//! line-relative spans.

use crate::error::{ParseError, Result};
use crate::parser::Statement;

/// Statement owning a cursor position
#[derive(Debug, Clone, Copy)]
pub struct Resolution<'a> {
    /// Owning statement, or the last statement when nothing matched
    pub statement: &'a Statement,
    /// Number of statement characters up to and including the column, 0 on fallback
    pub offset: usize,
    /// Line-relative column that was resolved
    pub column: Option<usize>,
}

impl Resolution<'_> {
    /// Whether a statement actually contained the column
    pub fn is_exact(&self) -> bool {
        self.offset > 0
    }

    /// Statement text from its start up to the column
    pub fn text_before_cursor(&self) -> String {
        self.statement.to_string().chars().take(self.offset).collect()
    }
}

/// Find the statement on `line` whose line-relative span contains `column`.
///
/// A `column` of `None` means no character precedes the cursor on its line; it
/// never matches. Without a match the last statement is returned with offset 0.
pub fn resolve(statements: &[Statement], line: usize, column: Option<usize>) -> Result<Resolution<'_>> {
    let last = statements.last().ok_or(ParseError::EmptyInput)?;

    let found = column.and_then(|col| {
        statements
            .iter()
            .filter(|s| s.line() == line)
            .find(|s| (s.line_start()..=s.line_end()).contains(&col))
            .map(|s| (s, col - s.line_start() + 1))
    });

    let (statement, offset) = found.unwrap_or((last, 0));

    Ok(Resolution {
        statement,
        offset,
        column,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RedisLspError;
    use crate::parser::Parser;

    fn parse(input: &str) -> Vec<Statement> {
        Parser::new().parse(input).unwrap()
    }

    #[test]
    fn test_resolve_single_statement() {
        let statements = parse("GET test1");
        let resolved = resolve(&statements, 0, Some(5)).unwrap();
        assert_eq!(resolved.statement.to_string(), "GET test1");
        assert_eq!(resolved.offset, 6);
        assert!(resolved.is_exact());
    }

    #[test]
    fn test_resolve_second_line() {
        let statements = parse("GET test1\nGET test2");
        let resolved = resolve(&statements, 1, Some(1)).unwrap();
        assert_eq!(resolved.statement.to_string(), "GET test2");
        assert_eq!(resolved.offset, 2);
        assert_eq!(resolved.text_before_cursor(), "GE");
    }

    #[test]
    fn test_resolve_same_line_picks_containing_statement() {
        let statements = parse("GET a;SET b c");
        let resolved = resolve(&statements, 0, Some(8)).unwrap();
        assert_eq!(resolved.statement.to_string(), "SET b c");
        assert_eq!(resolved.offset, 3);
        assert_eq!(resolved.text_before_cursor(), "SET");
    }

    #[test]
    fn test_resolve_unknown_line_falls_back_to_last() {
        let statements = parse("GET test1\nGET test2\nGET test3");
        let resolved = resolve(&statements, 7, Some(3)).unwrap();
        assert_eq!(resolved.statement.to_string(), "GET test3");
        assert_eq!(resolved.offset, 0);
        assert!(!resolved.is_exact());
        assert_eq!(resolved.text_before_cursor(), "");
    }

    #[test]
    fn test_resolve_column_past_end_falls_back() {
        let statements = parse("GET a");
        let resolved = resolve(&statements, 0, Some(40)).unwrap();
        assert_eq!(resolved.offset, 0);
    }

    #[test]
    fn test_resolve_without_column_falls_back() {
        let statements = parse("GET a\nSET b");
        let resolved = resolve(&statements, 1, None).unwrap();
        assert_eq!(resolved.statement.to_string(), "SET b");
        assert_eq!(resolved.offset, 0);
        assert_eq!(resolved.column, None);
    }

    #[test]
    fn test_resolve_empty_list_is_error() {
        let err = resolve(&[], 0, Some(0)).unwrap_err();
        assert!(matches!(err, RedisLspError::Parse(ParseError::EmptyInput)));
    }
}
