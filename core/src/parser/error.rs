use alloc::string::ToString;

use thiserror::Error;

use crate::api::{Diagnostic, Severity, Span};
use crate::{String, vec};

/// Parser error with the byte offset where compilation stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at offset {offset}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub offset: usize,
}

/// Specific kinds of parse errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// Input ended where an operand was expected
    #[error("unexpected end of input")]
    UnexpectedEnd,
    /// Input ended before a `(` was closed
    #[error("unmatched '('")]
    UnclosedParen,
    /// A `)` with no matching `(`
    #[error("unmatched ')'")]
    UnmatchedCloseParen,
    /// A specific delimiter was required
    #[error("expected '{expected}', found '{found}'")]
    Expected { expected: char, found: char },
    /// Invalid number literal
    #[error("invalid number literal '{text}'")]
    InvalidNumber { text: String },
    /// Identifier is not a bound variable
    #[error("unknown variable '{name}'")]
    UnknownVariable { name: String },
    /// Identifier called as a function is not registered
    #[error("unknown function '{name}'")]
    UnknownFunction { name: String },
    /// Call with the wrong number of arguments
    #[error("function '{name}' expects {expected} argument(s)")]
    WrongArity { name: String, expected: usize },
    /// Character that cannot start an operand
    #[error("unexpected character '{found}'")]
    UnexpectedCharacter { found: char },
    /// Text left over after a complete expression
    #[error("unexpected extra characters")]
    TrailingCharacters,
    /// Operands nested deeper than the configured limit
    #[error("expression nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    /// Source range the error points at.
    ///
    /// Errors about a name cover the name, which ends at the error offset.
    /// Errors that carry the offending character cover that character.
    /// Everything else covers one byte, which renderers widen to the
    /// enclosing character.
    pub fn span(&self) -> Span {
        match &self.kind {
            ParseErrorKind::UnknownVariable { name } | ParseErrorKind::UnknownFunction { name } => {
                Span::new(self.offset.saturating_sub(name.len()), self.offset)
            }
            ParseErrorKind::InvalidNumber { text } => {
                Span::new(self.offset, self.offset + text.len())
            }
            ParseErrorKind::Expected { found, .. }
            | ParseErrorKind::UnexpectedCharacter { found } => {
                Span::new(self.offset, self.offset + found.len_utf8())
            }
            _ => Span::new(self.offset, self.offset + 1),
        }
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, help) = match &self.kind {
            ParseErrorKind::UnexpectedEnd => {
                ("E001", vec!["The expression is incomplete".to_string()])
            }
            ParseErrorKind::UnclosedParen => ("E002", vec!["Add the missing ')'".to_string()]),
            ParseErrorKind::UnmatchedCloseParen => ("E003", vec![]),
            ParseErrorKind::Expected { .. } => ("E004", vec![]),
            ParseErrorKind::InvalidNumber { .. } => {
                ("E005", vec!["Check the number format".to_string()])
            }
            ParseErrorKind::UnknownVariable { .. } => {
                ("E006", vec!["Bind the variable before compiling".to_string()])
            }
            ParseErrorKind::UnknownFunction { .. } => {
                ("E007", vec!["Register the function before compiling".to_string()])
            }
            ParseErrorKind::WrongArity { .. } => ("E008", vec![]),
            ParseErrorKind::UnexpectedCharacter { .. } => ("E009", vec![]),
            ParseErrorKind::TrailingCharacters => ("E010", vec![]),
            ParseErrorKind::NestingTooDeep { .. } => {
                ("E011", vec!["Split the expression or raise max_depth".to_string()])
            }
        };

        Diagnostic {
            severity: Severity::Error,
            message: self.kind.to_string(),
            span: self.span(),
            help,
            code: Some(code.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_offset() {
        let err = ParseError::new(ParseErrorKind::UnclosedParen, 6);
        assert_eq!(err.to_string(), "unmatched '(' at offset 6");

        let err = ParseError::new(
            ParseErrorKind::WrongArity {
                name: "cos".into(),
                expected: 1,
            },
            4,
        );
        assert_eq!(err.to_string(), "function 'cos' expects 1 argument(s) at offset 4");
    }

    #[test]
    fn test_name_errors_span_the_name() {
        let err = ParseError::new(ParseErrorKind::UnknownVariable { name: "z2".into() }, 4);
        assert_eq!(err.span(), Span::new(2, 4));

        let diagnostic = err.to_diagnostic();
        assert_eq!(diagnostic.message, "unknown variable 'z2'");
        assert_eq!(diagnostic.code.as_deref(), Some("E006"));
        assert_eq!(diagnostic.severity, Severity::Error);
    }

    #[test]
    fn test_character_errors_span_the_whole_character() {
        let err = ParseError::new(ParseErrorKind::UnexpectedCharacter { found: 'é' }, 4);
        assert_eq!(err.span(), Span::new(4, 6));

        let err = ParseError::new(
            ParseErrorKind::Expected {
                expected: ')',
                found: '😀',
            },
            2,
        );
        assert_eq!(err.span(), Span::new(2, 6));
    }
}
