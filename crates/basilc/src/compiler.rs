//! The external VB.NET compiler.
//!
//! Basil does not interpret compiler output beyond splitting it into
//! diagnostics: messages are passed on verbatim.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;

use crate::config::CompilerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One diagnostic line reported by the compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompilerDiagnostic {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub severity: Severity,
    /// Compiler error code (`BC30451`).
    pub code: String,
    pub message: String,
    /// The line as printed by the compiler.
    pub raw: String,
}

impl fmt::Display for CompilerDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileReport {
    pub success: bool,
    pub diagnostics: Vec<CompilerDiagnostic>,
}

impl CompileReport {
    pub fn errors(&self) -> impl Iterator<Item = &CompilerDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }
}

/// Builds translated modules into a runnable artifact.
pub trait Compiler {
    fn compile(&self, files: &[PathBuf], output: &Path) -> Result<CompileReport, String>;
}

/// A compiler run as an external command.
pub struct CommandCompiler {
    config: CompilerConfig,
}

impl CommandCompiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// Arguments with `{output}` and `{files}` substituted.
    fn arguments(&self, files: &[PathBuf], output: &Path) -> Vec<String> {
        let output = output.display().to_string();
        let mut args = Vec::with_capacity(self.config.args.len() + files.len());
        for arg in &self.config.args {
            if arg == "{files}" {
                args.extend(files.iter().map(|f| f.display().to_string()));
            } else {
                args.push(arg.replace("{output}", &output));
            }
        }
        args
    }
}

impl Compiler for CommandCompiler {
    fn compile(&self, files: &[PathBuf], output: &Path) -> Result<CompileReport, String> {
        let args = self.arguments(files, output);
        tracing::info!(command = %self.config.command, files = files.len(), "compiling");
        let result = Command::new(&self.config.command)
            .args(&args)
            .output()
            .map_err(|e| format!("Failed to run compiler '{}': {}", self.config.command, e))?;

        let stdout = String::from_utf8_lossy(&result.stdout);
        let stderr = String::from_utf8_lossy(&result.stderr);
        let diagnostics = stdout
            .lines()
            .chain(stderr.lines())
            .filter_map(parse_diagnostic)
            .collect();
        Ok(CompileReport {
            success: result.status.success(),
            diagnostics,
        })
    }
}

/// Parse `file(line,col): error BC30451: message`.
pub fn parse_diagnostic(line: &str) -> Option<CompilerDiagnostic> {
    let raw = line.trim_end();
    let (location, rest) = raw.split_once("): ")?;
    let (file, position) = location.rsplit_once('(')?;
    let (line_no, column) = match position.split_once(',') {
        Some((l, c)) => (l.trim().parse().ok()?, c.trim().parse().ok()?),
        None => (position.trim().parse().ok()?, 0),
    };

    let (kind, rest) = rest.split_once(' ')?;
    let severity = match kind {
        "error" => Severity::Error,
        "warning" => Severity::Warning,
        _ => return None,
    };
    let (code, message) = rest.split_once(": ").unwrap_or(("", rest));

    Some(CompilerDiagnostic {
        file: file.trim().to_string(),
        line: line_no,
        column,
        severity,
        code: code.to_string(),
        message: message.to_string(),
        raw: raw.to_string(),
    })
}

/// Write the error diagnostics of `report`, one per line.
pub fn write_errors(report: &CompileReport, path: &Path) -> Result<(), String> {
    let text: String = report.errors().map(|d| format!("{d}\n")).collect();
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .map_err(|e| format!("Failed to create '{}': {}", dir.display(), e))?;
    }
    std::fs::write(path, text).map_err(|e| format!("Failed to write '{}': {}", path.display(), e))
}
