//! Syntax error records and the shared collection the parse workers feed.
//!
//! Each worker owns an [`ErrorListener`] for the file it is translating. The
//! listener converts parse errors into [`SyntaxError`] records (file, line,
//! column, offending text, rule stack) and appends them to one
//! [`ErrorCollection`] shared by every worker.

use std::fmt;
use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use basil_common::span::{LineIndex, Span};
use basil_parser::{Parse, ParseError};
use parking_lot::Mutex;
use serde::Serialize;

/// One syntax error in one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxError {
    pub file: String,
    pub message: String,
    /// Source text of the offending token (empty at end of file).
    pub symbol: String,
    /// Grammar rules being parsed when the error was found, outermost first.
    pub rule_stack: Vec<String>,
    /// 1-based line.
    pub line: u32,
    /// 1-based column, in bytes.
    pub column: u32,
    pub span: Span,
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}: {}", self.file, self.line, self.column, self.message)?;
        if !self.symbol.is_empty() {
            write!(f, " (at `{}`)", self.symbol)?;
        }
        Ok(())
    }
}

impl std::error::Error for SyntaxError {}

/// Write-synchronized list of syntax errors from every file.
#[derive(Debug, Default)]
pub struct ErrorCollection {
    errors: Mutex<Vec<SyntaxError>>,
}

impl ErrorCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, error: SyntaxError) {
        self.errors.lock().push(error);
    }

    pub fn len(&self) -> usize {
        self.errors.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.lock().is_empty()
    }

    /// All collected errors, ordered by file and position.
    pub fn into_sorted(self) -> Vec<SyntaxError> {
        let mut errors = self.errors.into_inner();
        errors.sort_by(|a, b| {
            (a.file.as_str(), a.span.start, a.span.end).cmp(&(b.file.as_str(), b.span.start, b.span.end))
        });
        errors
    }
}

/// Per-file adapter from parser errors to [`SyntaxError`] records.
pub struct ErrorListener<'a> {
    file: String,
    source: &'a str,
    line_index: LineIndex,
    sink: &'a ErrorCollection,
}

impl<'a> ErrorListener<'a> {
    pub fn new(file: impl Into<String>, source: &'a str, sink: &'a ErrorCollection) -> Self {
        Self {
            file: file.into(),
            source,
            line_index: LineIndex::new(source),
            sink,
        }
    }

    /// Record one parse error.
    pub fn syntax_error(&self, error: &ParseError) {
        let (line, column) = self.line_index.line_col(error.span.start.min(self.source.len() as u32));
        self.sink.push(SyntaxError {
            file: self.file.clone(),
            message: error.message.clone(),
            symbol: error.symbol(self.source).to_string(),
            rule_stack: error.rule_stack.iter().map(|r| r.to_string()).collect(),
            line,
            column,
            span: error.span,
        });
    }

    /// Record every error of `parse`. Returns how many there were.
    pub fn report(&self, parse: &Parse) -> usize {
        for error in parse.errors() {
            self.syntax_error(error);
        }
        if !parse.ok() {
            tracing::debug!(file = %self.file, count = parse.errors().len(), "syntax errors");
        }
        parse.errors().len()
    }
}

/// Render a syntax error against its source with ariadne.
pub fn render_syntax_error(error: &SyntaxError, source: &str, color: bool) -> String {
    let config = Config::default().with_color(color);
    let span = clamp(error.span, source.len());

    let mut builder = Report::build(ReportKind::Error, span.clone())
        .with_message(format!("{}: {}", error.file, error.message))
        .with_config(config)
        .with_label(
            Label::new(span)
                .with_message(&error.message)
                .with_color(Color::Red),
        );
    if !error.rule_stack.is_empty() {
        builder = builder.with_note(format!("while parsing {}", error.rule_stack.join(" > ")));
    }

    let mut buf = Vec::new();
    match builder.finish().write(Source::from(source), &mut buf) {
        Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
        Err(_) => format!("{error}\n"),
    }
}

/// Clamp a span into `len` and widen empty spans to one byte for ariadne.
fn clamp(span: Span, len: usize) -> Range<usize> {
    let start = (span.start as usize).min(len);
    let end = (span.end as usize).min(len).max(start);
    if start == end {
        start..(end + 1).min(len)
    } else {
        start..end
    }
}
