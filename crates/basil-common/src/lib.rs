//! Shared vocabulary for the Basil crates: byte spans, line/column lookup,
//! lexer tokens and lexer errors.

pub mod error;
pub mod span;
pub mod token;
