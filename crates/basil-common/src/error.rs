use std::fmt;

use serde::Serialize;

use crate::span::Span;

/// A lexer error with location information.
///
/// The lexer never stops at a bad character: it records one of these, emits
/// an `Error` token over the offending text and keeps going.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    /// Create a new lexer error.
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The specific kind of lexer error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LexErrorKind {
    /// A character that starts no token in either dialect.
    UnexpectedCharacter(char),
    /// A string literal reached the end of its line without a closing quote.
    UnterminatedString,
    /// A `[bracketed identifier]` reached the end of its line unclosed.
    UnterminatedBracketIdent,
    /// A number literal could not be read (e.g. `&H` without digits).
    InvalidNumberLiteral(String),
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedCharacter(c) => write!(f, "unexpected character: {c:?}"),
            Self::UnterminatedString => write!(f, "unterminated string literal"),
            Self::UnterminatedBracketIdent => write!(f, "unterminated bracketed identifier"),
            Self::InvalidNumberLiteral(s) => write!(f, "invalid number literal: {s}"),
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for LexError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_display() {
        let err = LexError::new(LexErrorKind::UnexpectedCharacter('~'), Span::new(0, 1));
        assert_eq!(err.to_string(), "unexpected character: '~'");
    }

    #[test]
    fn lex_error_kind_display_all_variants() {
        assert_eq!(
            LexErrorKind::UnterminatedString.to_string(),
            "unterminated string literal"
        );
        assert_eq!(
            LexErrorKind::UnterminatedBracketIdent.to_string(),
            "unterminated bracketed identifier"
        );
        assert_eq!(
            LexErrorKind::InvalidNumberLiteral("&H".into()).to_string(),
            "invalid number literal: &H"
        );
    }
}
