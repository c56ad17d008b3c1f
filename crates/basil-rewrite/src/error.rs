//! Errors that abort a translation run.

use std::fmt;
use std::path::PathBuf;

/// A rewrite rule found a construct it cannot handle.
///
/// Raised only for files that parsed cleanly: in a file with syntax errors
/// a missing piece is already reported as a [`SyntaxError`] and the rule
/// skips it.
///
/// [`SyntaxError`]: crate::diagnostics::SyntaxError
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    AssumptionViolation {
        file: PathBuf,
        /// What was being rewritten (`entry point`, `type member`).
        construct: &'static str,
        message: String,
        /// 1-based line of the construct.
        line: u32,
    },
}

impl TranslateError {
    pub fn assumption(
        file: impl Into<PathBuf>,
        construct: &'static str,
        line: u32,
        message: impl Into<String>,
    ) -> Self {
        TranslateError::AssumptionViolation {
            file: file.into(),
            construct,
            message: message.into(),
            line,
        }
    }
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslateError::AssumptionViolation {
                file,
                construct,
                message,
                line,
            } => write!(
                f,
                "{}:{}: cannot translate {}: {}",
                file.display(),
                line,
                construct,
                message
            ),
        }
    }
}

impl std::error::Error for TranslateError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_file_and_construct() {
        let err = TranslateError::assumption("src/Main.bas", "entry point", 3, "procedure has no body");
        assert_eq!(
            err.to_string(),
            "src/Main.bas:3: cannot translate entry point: procedure has no body"
        );
    }
}
