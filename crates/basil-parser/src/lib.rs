//! Basil parser: event-based recursive descent parser producing a rowan CST.
//!
//! This crate turns the token stream from `basil-lexer` into a lossless
//! concrete syntax tree. Every byte of the input, trivia included, is kept,
//! so the rewrite passes can locate edit points in the tree and apply them
//! to the original text.
//!
//! The same grammar accepts the legacy macro dialect and the structured
//! dialect the first rewrite pass produces, so both passes parse with
//! [`parse`].

pub mod ast;
pub mod cst;
pub mod error;
mod parser;
pub mod syntax_kind;

use basil_lexer::Lexer;

pub use cst::{SyntaxElement, SyntaxNode, SyntaxToken};
pub use error::ParseError;
pub use syntax_kind::SyntaxKind;

use ast::item::SourceFile;
use ast::AstNode;

/// Result of parsing a module.
///
/// Contains the green tree (the immutable, cheap-to-clone CST) and every
/// lexical and syntax error found, ordered by position.
#[derive(Debug, Clone)]
pub struct Parse {
    green: rowan::GreenNode,
    errors: Vec<ParseError>,
}

impl Parse {
    /// Build the syntax tree root from the green node.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// The typed root of the tree.
    pub fn tree(&self) -> Option<SourceFile> {
        SourceFile::cast(self.syntax())
    }

    /// Errors encountered during lexing and parsing.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Whether parsing completed without errors.
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse a module into a CST.
///
/// Lexes the source, parses the token stream and returns a [`Parse`]
/// holding the tree and any errors. Parsing never fails outright: input the
/// grammar cannot structure is kept in `ERROR_NODE`s.
pub fn parse(source: &str) -> Parse {
    let (tokens, lex_errors) = Lexer::tokenize_with_errors(source);
    let mut p = parser::Parser::new(tokens, source);
    parser::parse_source_file(&mut p);
    let (green, parse_errors) = p.build_tree();

    let mut errors: Vec<ParseError> = lex_errors
        .into_iter()
        .map(|e| ParseError::new(e.to_string(), e.span))
        .collect();
    errors.extend(parse_errors);
    errors.sort_by_key(|e| (e.span.start, e.span.end));

    Parse { green, errors }
}

/// Render a tree as an indented outline, one element per line.
///
/// Nodes print as `KIND@start..end`, tokens additionally print their text.
pub fn debug_tree(node: &SyntaxNode) -> String {
    let mut out = String::new();
    let mut depth = 0usize;
    for event in node.preorder_with_tokens() {
        match event {
            rowan::WalkEvent::Enter(element) => {
                let range = element.text_range();
                let start: u32 = range.start().into();
                let end: u32 = range.end().into();
                out.push_str(&"  ".repeat(depth));
                match &element {
                    rowan::NodeOrToken::Node(n) => {
                        out.push_str(&format!("{:?}@{start}..{end}\n", n.kind()));
                    }
                    rowan::NodeOrToken::Token(t) => {
                        out.push_str(&format!("{:?}@{start}..{end} {:?}\n", t.kind(), t.text()));
                    }
                }
                depth += 1;
            }
            rowan::WalkEvent::Leave(_) => depth -= 1,
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_parses() {
        let parse = parse("");
        assert!(parse.ok());
        assert_eq!(parse.syntax().kind(), SyntaxKind::SOURCE_FILE);
        assert!(parse.tree().is_some());
    }

    #[test]
    fn lex_errors_are_reported() {
        let parse = parse("x = \"open\n");
        assert!(!parse.ok());
        assert_eq!(parse.errors()[0].span.start, 4);
    }

    #[test]
    fn debug_tree_lists_tokens() {
        let parse = parse("Stop");
        let tree = debug_tree(&parse.syntax());
        assert!(tree.starts_with("SOURCE_FILE@0..4\n"));
        assert!(tree.contains("OTHER_STMT@0..4"));
        assert!(tree.contains("IDENT@0..4 \"Stop\""));
    }
}
