//! Knobs shared by both passes.

/// Procedure names recognised as the program entry point.
pub const DEFAULT_ENTRY_POINTS: &[&str] = &["Main", "Main_Run", "Main_Sub"];

/// Namespaces imported at the top of every translated module.
pub const DEFAULT_IMPORTS: &[&str] = &[
    "System",
    "Microsoft.VisualBasic",
    "System.Math",
    "System.Linq",
    "System.Collections.Generic",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Entry-point aliases, matched case-insensitively against `Sub` names.
    pub entry_points: Vec<String>,
    /// `Imports` lines of the module preamble, in order.
    pub imports: Vec<String>,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            entry_points: DEFAULT_ENTRY_POINTS.iter().map(|s| s.to_string()).collect(),
            imports: DEFAULT_IMPORTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TranslateOptions {
    pub fn is_entry_point(&self, name: &str) -> bool {
        self.entry_points.iter().any(|alias| alias.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_point_aliases_ignore_case() {
        let options = TranslateOptions::default();
        assert!(options.is_entry_point("main_run"));
        assert!(options.is_entry_point("MAIN"));
        assert!(!options.is_entry_point("MainLoop"));
    }
}
