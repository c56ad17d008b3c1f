//! Rowan-based concrete syntax tree types for Basil.
//!
//! Defines the `BasilLanguage` marker type that connects [`SyntaxKind`] to
//! rowan's generic tree infrastructure, plus type aliases and a few helpers
//! the rewrite passes use to locate edit anchors.

use basil_common::span::Span;

use crate::syntax_kind::SyntaxKind;

/// Marker type for Basil's language in rowan's generic tree system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BasilLanguage {}

impl rowan::Language for BasilLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::TYPEOF_EXPR as u16);
        // Safety: SyntaxKind is #[repr(u16)] with contiguous discriminants,
        // and the assertion above keeps `raw` inside that range.
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

/// A CST node (interior node with children).
pub type SyntaxNode = rowan::SyntaxNode<BasilLanguage>;

/// A CST token (leaf node with text).
pub type SyntaxToken = rowan::SyntaxToken<BasilLanguage>;

/// Either a node or a token in the CST.
pub type SyntaxElement = rowan::SyntaxElement<BasilLanguage>;

/// Byte span of a node, including any trivia it owns.
pub fn node_span(node: &SyntaxNode) -> Span {
    let range = node.text_range();
    Span::new(range.start().into(), range.end().into())
}

/// Byte span of a token.
pub fn token_span(token: &SyntaxToken) -> Span {
    let range = token.text_range();
    Span::new(range.start().into(), range.end().into())
}

/// First non-trivia token inside `node`.
pub fn first_significant_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    node.descendants_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| !t.kind().is_trivia() && t.kind() != SyntaxKind::NEWLINE)
}

/// Last non-trivia token inside `node`.
pub fn last_significant_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    let mut token = node.last_token()?;
    loop {
        if !token.kind().is_trivia() && token.kind() != SyntaxKind::NEWLINE {
            return Some(token);
        }
        token = token.prev_token()?;
        if !node.text_range().contains_range(token.text_range()) {
            return None;
        }
    }
}

/// Span from the first to the last significant token of `node`.
pub fn significant_span(node: &SyntaxNode) -> Option<Span> {
    let first = first_significant_token(node)?;
    let last = last_significant_token(node)?;
    Some(token_span(&first).merge(token_span(&last)))
}

/// Text of `node` with all trivia removed (`Module1 . Buf` -> `Module1.Buf`).
pub fn compact_text(node: &SyntaxNode) -> String {
    node.descendants_with_tokens()
        .filter_map(|it| it.into_token())
        .filter(|t| !t.kind().is_trivia() && t.kind() != SyntaxKind::NEWLINE)
        .map(|t| t.text().to_string())
        .collect()
}
