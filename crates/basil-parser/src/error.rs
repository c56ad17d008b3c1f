//! Parse error types for the Basil parser.

use std::fmt;

use basil_common::span::Span;
use serde::Serialize;

/// A parse error with location information, the grammar rules that were
/// active when it was detected, and an optional related span.
///
/// Lexer errors are folded into the same type (with an empty rule stack) so
/// that consumers see one error stream per file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseError {
    /// Human-readable description of what went wrong.
    pub message: String,
    /// Primary source location where the error was detected.
    pub span: Span,
    /// Grammar rules being parsed at the time, outermost first.
    pub rule_stack: Vec<&'static str>,
    /// Optional related location with context message (e.g., "block opened here").
    pub related: Option<(String, Span)>,
}

impl ParseError {
    /// Create a new parse error with just a message and span.
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            rule_stack: Vec::new(),
            related: None,
        }
    }

    /// Attach the rule-invocation stack active at the error.
    pub fn with_rule_stack(mut self, rule_stack: Vec<&'static str>) -> Self {
        self.rule_stack = rule_stack;
        self
    }

    /// Create a parse error with a related span for additional context.
    pub fn with_related(
        message: impl Into<String>,
        span: Span,
        related_message: impl Into<String>,
        related_span: Span,
    ) -> Self {
        Self {
            message: message.into(),
            span,
            rule_stack: Vec::new(),
            related: Some((related_message.into(), related_span)),
        }
    }

    /// The offending source text, for messages like `unexpected 'Next'`.
    pub fn symbol<'a>(&self, source: &'a str) -> &'a str {
        let start = (self.span.start as usize).min(source.len());
        let end = (self.span.end as usize).clamp(start, source.len());
        &source[start..end]
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_new() {
        let err = ParseError::new("expected `Then`", Span::new(5, 10));
        assert_eq!(err.message, "expected `Then`");
        assert_eq!(err.span, Span::new(5, 10));
        assert!(err.rule_stack.is_empty());
        assert!(err.related.is_none());
    }

    #[test]
    fn parse_error_with_related() {
        let err = ParseError::with_related(
            "expected `End Type`",
            Span::new(50, 53),
            "type block opened here",
            Span::new(10, 14),
        );
        let (msg, span) = err.related.unwrap();
        assert_eq!(msg, "type block opened here");
        assert_eq!(span, Span::new(10, 14));
    }

    #[test]
    fn parse_error_symbol_clamps() {
        let err = ParseError::new("unexpected", Span::new(4, 8));
        assert_eq!(err.symbol("Sub Next"), "Next");
        let err = ParseError::new("unexpected end of file", Span::new(8, 8));
        assert_eq!(err.symbol("Sub Next"), "");
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::new("expected expression", Span::new(0, 1))
            .with_rule_stack(vec!["proc_def", "statement"]);
        assert_eq!(err.to_string(), "expected expression");
        assert_eq!(err.rule_stack, vec!["proc_def", "statement"]);
    }
}
