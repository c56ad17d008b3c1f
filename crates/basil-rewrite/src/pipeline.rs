//! The two-pass translation of a whole program.
//!
//! Pass 1 runs one rayon task per module. Its join is the barrier after
//! which the registry of initialized record types is built and frozen.
//! Pass 2 then runs one task per module again, every task reading that
//! registry by shared reference.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::diagnostics::{ErrorCollection, ErrorListener, SyntaxError};
use crate::error::TranslateError;
use crate::fixer::{fix_module, FixedModule};
use crate::normalizer::normalize_module;
use crate::options::TranslateOptions;
use crate::registry::InitializerRegistry;

/// One input module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSource {
    pub path: PathBuf,
    pub text: String,
}

impl ModuleSource {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }
}

/// One translated module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedModule {
    pub path: PathBuf,
    pub module_name: String,
    pub is_entry_point: bool,
    /// Text after both passes.
    pub text: String,
}

impl TranslatedModule {
    /// Output file name: the source stem with a `.vb` extension.
    pub fn output_name(&self) -> String {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.module_name.clone());
        format!("{stem}.vb")
    }
}

/// Result of translating a program.
#[derive(Debug)]
pub struct Translation {
    /// Modules ordered by source path.
    pub modules: Vec<TranslatedModule>,
    pub registry: InitializerRegistry,
    /// Syntax errors of every module, ordered by file and position.
    pub errors: Vec<SyntaxError>,
}

impl Translation {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Module name of the entry-point module, first by path if several.
    pub fn program_name(&self) -> Option<&str> {
        let mut entry_points = self.modules.iter().filter(|m| m.is_entry_point);
        let first = entry_points.next()?;
        for other in entry_points {
            tracing::warn!(
                chosen = %first.path.display(),
                ignored = %other.path.display(),
                "several entry points"
            );
        }
        Some(&first.module_name)
    }
}

/// Translate every module of a program.
///
/// Syntax errors are collected, not fatal. An assumption violation in any
/// module aborts the run.
pub fn translate(
    sources: &[ModuleSource],
    options: &TranslateOptions,
) -> Result<Translation, TranslateError> {
    let errors = ErrorCollection::new();

    let mut fixed: Vec<FixedModule> = sources
        .par_iter()
        .map(|source| fix_source(source, options, &errors))
        .collect::<Result<_, _>>()?;
    fixed.sort_by(|a, b| a.path.cmp(&b.path));

    let registry = InitializerRegistry::from_contributions(
        fixed.iter().flat_map(|m| m.initialized_types.iter()),
    );
    tracing::info!(
        modules = fixed.len(),
        initialized_types = registry.len(),
        "first pass done"
    );

    let modules: Vec<TranslatedModule> = fixed
        .into_par_iter()
        .map(|module| {
            let normalized = normalize_module(&module.path, &module.text, &registry);
            TranslatedModule {
                path: module.path,
                module_name: module.module_name,
                is_entry_point: module.is_entry_point,
                text: normalized.text,
            }
        })
        .collect();
    tracing::info!(modules = modules.len(), "second pass done");

    Ok(Translation {
        modules,
        registry,
        errors: errors.into_sorted(),
    })
}

fn fix_source(
    source: &ModuleSource,
    options: &TranslateOptions,
    errors: &ErrorCollection,
) -> Result<FixedModule, TranslateError> {
    tracing::debug!(file = %source.path.display(), "translating");
    let parse = basil_parser::parse(&source.text);
    ErrorListener::new(display_path(&source.path), &source.text, errors).report(&parse);
    fix_module(&source.path, &source.text, &parse, options)
}

/// Parse every module and collect syntax errors only.
pub fn check(sources: &[ModuleSource]) -> Vec<SyntaxError> {
    let errors = ErrorCollection::new();
    sources.par_iter().for_each(|source| {
        let parse = basil_parser::parse(&source.text);
        ErrorListener::new(display_path(&source.path), &source.text, &errors).report(&parse);
    });
    errors.into_sorted()
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outputs_are_sorted_by_path() {
        let sources = vec![
            ModuleSource::new("b.bas", "Sub B()\nEnd Sub\n"),
            ModuleSource::new("a.bas", "Sub Main()\nEnd Sub\n"),
        ];
        let translation = translate(&sources, &TranslateOptions::default()).unwrap();
        let paths: Vec<&Path> = translation.modules.iter().map(|m| m.path.as_path()).collect();
        assert_eq!(paths, vec![Path::new("a.bas"), Path::new("b.bas")]);
        assert_eq!(translation.program_name(), Some("a"));
        assert_eq!(translation.modules[1].output_name(), "b.vb");
    }

    #[test]
    fn no_entry_point_means_no_program_name() {
        let sources = vec![ModuleSource::new("lib.bas", "Sub Helper()\nEnd Sub\n")];
        let translation = translate(&sources, &TranslateOptions::default()).unwrap();
        assert_eq!(translation.program_name(), None);
        assert!(!translation.has_errors());
    }

    #[test]
    fn check_reports_errors_of_every_file() {
        let sources = vec![
            ModuleSource::new("ok.bas", "Sub A()\nEnd Sub\n"),
            ModuleSource::new("bad.bas", "Sub A()\n    Next\nEnd Sub\n"),
        ];
        let errors = check(&sources);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].file, "bad.bas");
        assert_eq!(errors[0].line, 2);
    }
}
