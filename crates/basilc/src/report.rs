//! Printing syntax errors.

use std::path::PathBuf;

use basil_rewrite::{render_syntax_error, SyntaxError};
use serde_json::json;

#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub color: bool,
    /// One JSON object per line instead of rendered reports.
    pub json: bool,
}

/// Render every error, looking up each file's text with `source_of`.
pub fn render_errors<'a>(
    errors: &[SyntaxError],
    source_of: impl Fn(&str) -> Option<&'a str>,
    options: ReportOptions,
) -> String {
    let mut out = String::new();
    for error in errors {
        if options.json {
            out.push_str(&json_line(error));
            out.push('\n');
            continue;
        }
        match source_of(&error.file) {
            Some(source) => out.push_str(&render_syntax_error(error, source, options.color)),
            None => {
                out.push_str(&error.to_string());
                out.push('\n');
            }
        }
    }
    out
}

fn json_line(error: &SyntaxError) -> String {
    json!({
        "code": "P0001",
        "severity": "error",
        "message": error.message,
        "file": error.file,
        "line": error.line,
        "column": error.column,
        "symbol": error.symbol,
        "rule_stack": error.rule_stack,
        "spans": [{ "start": error.span.start, "end": error.span.end }],
    })
    .to_string()
}

/// Summary line for the end of a run.
pub fn summary(errors: &[SyntaxError]) -> Option<String> {
    if errors.is_empty() {
        return None;
    }
    let mut files: Vec<PathBuf> = errors.iter().map(|e| PathBuf::from(&e.file)).collect();
    files.dedup();
    Some(format!(
        "{} syntax error{} in {} file{}",
        errors.len(),
        if errors.len() == 1 { "" } else { "s" },
        files.len(),
        if files.len() == 1 { "" } else { "s" },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use basil_rewrite::{check, ModuleSource};

    fn errors_of(source: &str) -> Vec<SyntaxError> {
        check(&[ModuleSource::new("m.bas", source)])
    }

    #[test]
    fn json_lines_carry_position_and_rule_stack() {
        let errors = errors_of("Sub A()\n    x = )\nEnd Sub\n");
        let out = render_errors(&errors, |_| None, ReportOptions { color: false, json: true });
        let value: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(value["file"], "m.bas");
        assert_eq!(value["line"], 2);
        assert_eq!(value["symbol"], ")");
        assert_eq!(value["rule_stack"][0], "proc_def");
    }

    #[test]
    fn falls_back_to_plain_lines_without_source() {
        let errors = errors_of("Sub A()\n    Next\nEnd Sub\n");
        let out = render_errors(&errors, |_| None, ReportOptions { color: false, json: false });
        assert_eq!(out, "m.bas:2:5: unexpected `Next` (at `Next`)\n");
    }

    #[test]
    fn summary_counts_files() {
        let mut errors = errors_of("x = )\ny = )\n");
        assert_eq!(summary(&errors).as_deref(), Some("2 syntax errors in 1 file"));
        errors.truncate(1);
        assert_eq!(summary(&errors).as_deref(), Some("1 syntax error in 1 file"));
        assert_eq!(summary(&[]), None);
    }
}
