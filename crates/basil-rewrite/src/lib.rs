//! Two-pass rewrite of VBA modules into VB.NET modules.
//!
//! - [`fixer`]: Pass 1, token-level dialect fixes over the original text.
//! - [`normalizer`]: Pass 2, structural edits over a re-parse of Pass 1
//!   output, informed by the program-wide [`InitializerRegistry`].
//! - [`pipeline`]: runs both passes over every module in parallel with a
//!   barrier in between.
//!
//! Both passes record edits in an [`EditList`] and apply them in one merge;
//! the syntax tree is never mutated.

pub mod diagnostics;
pub mod edit;
pub mod error;
pub mod fixer;
pub mod initializer;
mod layout;
pub mod normalizer;
pub mod options;
pub mod pipeline;
pub mod registry;

pub use diagnostics::{render_syntax_error, ErrorCollection, ErrorListener, SyntaxError};
pub use edit::EditList;
pub use error::TranslateError;
pub use fixer::{fix_module, FixedModule};
pub use initializer::StructureInitializer;
pub use normalizer::{normalize_module, Normalized};
pub use options::TranslateOptions;
pub use pipeline::{check, translate, ModuleSource, TranslatedModule, Translation};
pub use registry::InitializerRegistry;
