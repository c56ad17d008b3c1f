//! Event-based parser for Basil.
//!
//! The parser consumes a token stream and produces events (Open/Close/Advance)
//! that are later converted into a rowan green tree. This decouples parsing
//! logic from tree construction.
//!
//! # Architecture
//!
//! The parser uses matklad's event-based approach (as in rust-analyzer):
//!
//! 1. Parse functions call `open()` to start a node, `advance()` to consume
//!    tokens, and `close()` to finish a node with its actual kind.
//! 2. Events are collected into a flat `Vec<Event>`.
//! 3. `build_tree()` converts events into a rowan `GreenNode`.
//!
//! `open_before()` wraps a previously completed node (turning `Foo` into
//! `Foo(args)` or `a` into `a.b`) using the "forward parent" technique.
//!
//! # Statements and recovery
//!
//! Newlines and `:` end statements; whitespace, comments and line
//! continuations are trivia that lookahead skips. Both dialects are full of
//! constructs this grammar only passes through, so errors never abort the
//! parse: an error is recorded with the active rule stack, the rest of the
//! statement is wrapped in an `ERROR_NODE`, and parsing resumes at the next
//! statement.

pub(crate) mod expressions;
pub(crate) mod items;
pub(crate) mod statements;

use basil_common::span::Span;
use basil_common::token::{Token, TokenKind};

use crate::error::ParseError;
use crate::syntax_kind::SyntaxKind;

/// A parser event. Events are collected during parsing and later converted
/// into a rowan green tree by [`Parser::build_tree`].
#[derive(Debug)]
enum Event {
    /// Start a new CST node. The `kind` is initially TOMBSTONE and gets
    /// patched by `close()` with the real node kind.
    ///
    /// `forward_parent` is used by `open_before()` to indicate that this
    /// node should be opened before the node at the specified event index.
    Open {
        kind: SyntaxKind,
        forward_parent: Option<usize>,
    },
    /// Finish the current CST node.
    Close,
    /// Consume the next token (significant or trivia).
    Advance,
}

/// An opaque marker for a started but not-yet-closed CST node.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkOpened {
    index: usize,
}

/// An opaque marker for a completed (opened and closed) CST node.
/// Used by `open_before()` to wrap a previously completed node.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MarkClosed {
    index: usize,
}

/// Event-based parser for module source text.
pub(crate) struct Parser<'src> {
    /// All tokens from the lexer (including Eof).
    tokens: Vec<Token>,
    /// Current position in the token stream.
    pos: usize,
    /// Collected parser events.
    events: Vec<Event>,
    /// Original source text (for extracting token text via spans).
    source: &'src str,
    /// Collected parse errors.
    errors: Vec<ParseError>,
    /// Grammar rules currently being parsed, outermost first.
    rules: Vec<&'static str>,
}

impl<'src> Parser<'src> {
    /// Create a new parser from a token stream and source text.
    pub(crate) fn new(tokens: Vec<Token>, source: &'src str) -> Self {
        Self {
            tokens,
            pos: 0,
            events: Vec::new(),
            source,
            errors: Vec::new(),
            rules: Vec::new(),
        }
    }

    // ── Lookahead ──────────────────────────────────────────────────────

    /// Returns the SyntaxKind of the current significant token.
    pub(crate) fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Returns the SyntaxKind of the Nth significant token ahead.
    ///
    /// `nth(0)` is equivalent to `current()`. Returns `SyntaxKind::EOF` if
    /// past the end.
    pub(crate) fn nth(&self, n: usize) -> SyntaxKind {
        self.nth_pos(n)
            .map(|pos| SyntaxKind::from(self.tokens[pos].kind))
            .unwrap_or(SyntaxKind::EOF)
    }

    /// Text of the Nth significant token ahead.
    pub(crate) fn nth_text(&self, n: usize) -> &'src str {
        match self.nth_pos(n) {
            Some(pos) => self.token_text(pos),
            None => "",
        }
    }

    /// Returns the text of the current significant token.
    pub(crate) fn current_text(&self) -> &'src str {
        self.nth_text(0)
    }

    /// Whether the current token is an identifier spelled `word` (any case).
    pub(crate) fn at_word(&self, word: &str) -> bool {
        self.at(SyntaxKind::IDENT) && self.current_text().eq_ignore_ascii_case(word)
    }

    /// Returns the span of the current significant token.
    pub(crate) fn current_span(&self) -> Span {
        match self.nth_pos(0) {
            Some(pos) => self.tokens[pos].span,
            None => Span::empty_at(self.source.len() as u32),
        }
    }

    /// Check if the current significant token matches the given kind.
    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    /// Check if the current significant token matches any of the given kinds.
    pub(crate) fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current())
    }

    /// Whether the current token ends a statement (newline, `:` or EOF).
    pub(crate) fn at_eos(&self) -> bool {
        self.current().is_statement_end()
    }

    /// Whether `End <kind>` starts at the current token.
    pub(crate) fn at_end_of(&self, kind: SyntaxKind) -> bool {
        self.at(SyntaxKind::END_KW) && self.nth(1) == kind
    }

    /// Whether whitespace directly precedes the current significant token.
    ///
    /// Distinguishes `Foo (a)` (one parenthesized argument) from `Foo(a)`.
    pub(crate) fn current_preceded_by_whitespace(&self) -> bool {
        let pos = self.skip_to_significant(self.pos);
        pos > 0
            && matches!(
                self.tokens[pos - 1].kind,
                TokenKind::Whitespace | TokenKind::LineContinuation
            )
    }

    /// Whether the current significant token is the first on its line.
    pub(crate) fn at_line_start(&self) -> bool {
        let mut pos = self.skip_to_significant(self.pos);
        while pos > 0 {
            pos -= 1;
            match self.tokens[pos].kind {
                TokenKind::Newline => return true,
                kind if kind.is_trivia() => continue,
                _ => return false,
            }
        }
        true
    }

    /// Whether any of `kinds` appears before the end of the current statement.
    pub(crate) fn statement_contains(&self, kinds: &[SyntaxKind]) -> bool {
        let mut n = 0;
        loop {
            let kind = self.nth(n);
            if kind.is_statement_end() {
                return false;
            }
            if kinds.contains(&kind) {
                return true;
            }
            n += 1;
        }
    }

    // ── Mutation: node management ──────────────────────────────────────

    /// Start a new CST node. Returns a marker that must be passed to
    /// `close()` to finish the node.
    ///
    /// Pending trivia is attached to the enclosing node first, so every node
    /// starts at its first significant token.
    pub(crate) fn open(&mut self) -> MarkOpened {
        if !self.events.is_empty() {
            self.eat_trivia();
        }
        let mark = MarkOpened {
            index: self.events.len(),
        };
        self.events.push(Event::Open {
            kind: SyntaxKind::TOMBSTONE,
            forward_parent: None,
        });
        mark
    }

    /// Start a new CST node BEFORE a previously completed node.
    ///
    /// Instead of physically inserting into the events vec (which would
    /// invalidate indices), we set a `forward_parent` link on the completed
    /// node's Open event.
    pub(crate) fn open_before(&mut self, completed: MarkClosed) -> MarkOpened {
        let mark = MarkOpened {
            index: self.events.len(),
        };
        self.events.push(Event::Open {
            kind: SyntaxKind::TOMBSTONE,
            forward_parent: None,
        });
        if let Event::Open { forward_parent, .. } = &mut self.events[completed.index] {
            *forward_parent = Some(mark.index);
        }
        mark
    }

    /// Close a CST node, patching its Open event with the actual kind.
    pub(crate) fn close(&mut self, m: MarkOpened, kind: SyntaxKind) -> MarkClosed {
        if let Event::Open {
            kind: slot_kind, ..
        } = &mut self.events[m.index]
        {
            *slot_kind = kind;
        }
        self.events.push(Event::Close);
        MarkClosed { index: m.index }
    }

    /// Run `f` with `name` pushed on the rule stack recorded in errors.
    pub(crate) fn rule<R>(&mut self, name: &'static str, f: impl FnOnce(&mut Self) -> R) -> R {
        self.rules.push(name);
        let result = f(self);
        self.rules.pop();
        result
    }

    // ── Mutation: token consumption ────────────────────────────────────

    /// Consume the current token, emitting Advance events for all skipped
    /// trivia tokens and then for the significant token itself.
    pub(crate) fn advance(&mut self) {
        self.eat_trivia();
        if self.pos < self.tokens.len() {
            self.events.push(Event::Advance);
            self.pos += 1;
        }
    }

    /// If the current token matches `kind`, consume it and return true.
    /// Otherwise, record an error and return false.
    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(&format!("expected {}", describe(kind)));
            false
        }
    }

    /// If the current token matches `kind`, consume it and return true.
    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume statement separators (newlines and `:`).
    pub(crate) fn eat_separators(&mut self) {
        while self.at_any(&[SyntaxKind::NEWLINE, SyntaxKind::COLON]) {
            self.advance();
        }
    }

    /// Consume every token up to (not including) the end of the statement.
    pub(crate) fn skip_to_eos(&mut self) {
        while !self.at_eos() {
            self.advance();
        }
    }

    /// Require the end of a statement. Anything left over is reported once
    /// and wrapped in an ERROR_NODE so the next statement starts cleanly.
    ///
    /// A procedure-level `End` is left alone so the enclosing construct can
    /// still close after an unterminated block inside it.
    pub(crate) fn finish_statement(&mut self) {
        if self.at_eos() || items::at_block_end(self) {
            return;
        }
        self.error(&format!("unexpected `{}`", self.current_text()));
        let m = self.open();
        self.skip_to_eos();
        self.close(m, SyntaxKind::ERROR_NODE);
    }

    fn eat_trivia(&mut self) {
        while self.pos < self.tokens.len() && self.tokens[self.pos].kind.is_trivia() {
            self.events.push(Event::Advance);
            self.pos += 1;
        }
    }

    // ── Error reporting ────────────────────────────────────────────────

    /// Record a parse error at the current position.
    ///
    /// Only the first error at a given token is kept; later ones are
    /// cascades of the same problem.
    pub(crate) fn error(&mut self, message: &str) {
        let span = self.current_span();
        if self.errors.last().is_some_and(|e| e.span.start == span.start) {
            return;
        }
        self.errors
            .push(ParseError::new(message, span).with_rule_stack(self.rules.clone()));
    }

    /// Record a parse error with a related span for additional context.
    pub(crate) fn error_with_related(&mut self, message: &str, related_span: Span, related_msg: &str) {
        let span = self.current_span();
        if self.errors.last().is_some_and(|e| e.span.start == span.start) {
            return;
        }
        self.errors.push(
            ParseError::with_related(message, span, related_msg, related_span)
                .with_rule_stack(self.rules.clone()),
        );
    }

    // ── Token helpers ──────────────────────────────────────────────────

    fn token_text(&self, pos: usize) -> &'src str {
        let span = self.tokens[pos].span;
        &self.source[span.start as usize..span.end as usize]
    }

    /// Position of the Nth significant token ahead.
    fn nth_pos(&self, n: usize) -> Option<usize> {
        let mut pos = self.pos;
        let mut remaining = n;
        while pos < self.tokens.len() {
            if self.tokens[pos].kind.is_trivia() {
                pos += 1;
                continue;
            }
            if remaining == 0 {
                return Some(pos);
            }
            remaining -= 1;
            pos += 1;
        }
        None
    }

    /// Find the position of the next significant token starting from `pos`.
    fn skip_to_significant(&self, mut pos: usize) -> usize {
        while pos < self.tokens.len() && self.tokens[pos].kind.is_trivia() {
            pos += 1;
        }
        pos
    }

    // ── Tree building ──────────────────────────────────────────────────

    /// Convert collected events into a rowan `GreenNode` and errors.
    ///
    /// Forward parents: when `open_before(completed)` is called, the completed
    /// node's Open event gets a `forward_parent` link pointing to the wrapping
    /// Open event. When such an Open is reached, the chain is followed and
    /// the nodes are opened outermost first; the wrapper Open events are then
    /// tombstoned so they are skipped when reached later.
    pub(crate) fn build_tree(mut self) -> (rowan::GreenNode, Vec<ParseError>) {
        let mut builder = rowan::GreenNodeBuilder::new();
        let mut token_pos: usize = 0;
        let mut forward_parents: Vec<SyntaxKind> = Vec::new();

        for i in 0..self.events.len() {
            match std::mem::replace(&mut self.events[i], Event::Close) {
                Event::Open {
                    kind,
                    forward_parent,
                } => {
                    forward_parents.clear();
                    forward_parents.push(kind);
                    let mut next = forward_parent;
                    while let Some(idx) = next {
                        next = match std::mem::replace(
                            &mut self.events[idx],
                            Event::Open {
                                kind: SyntaxKind::TOMBSTONE,
                                forward_parent: None,
                            },
                        ) {
                            Event::Open {
                                kind,
                                forward_parent,
                            } => {
                                forward_parents.push(kind);
                                forward_parent
                            }
                            _ => unreachable!("forward parent must be an Open event"),
                        };
                    }
                    for &fk in forward_parents.iter().rev() {
                        if fk != SyntaxKind::TOMBSTONE {
                            builder.start_node(rowan::SyntaxKind(fk as u16));
                        }
                    }
                }
                Event::Close => {
                    builder.finish_node();
                }
                Event::Advance => {
                    if let Some(token) = self.tokens.get(token_pos) {
                        let kind = SyntaxKind::from(token.kind);
                        let text = &self.source[token.span.start as usize..token.span.end as usize];
                        builder.token(rowan::SyntaxKind(kind as u16), text);
                        token_pos += 1;
                    }
                }
            }
        }

        (builder.finish(), self.errors)
    }
}

/// Human-readable name of a token kind for error messages.
pub(crate) fn describe(kind: SyntaxKind) -> String {
    match kind {
        SyntaxKind::IDENT => "identifier".to_string(),
        SyntaxKind::NEWLINE => "end of line".to_string(),
        SyntaxKind::EOF => "end of file".to_string(),
        SyntaxKind::L_PAREN => "`(`".to_string(),
        SyntaxKind::R_PAREN => "`)`".to_string(),
        SyntaxKind::EQ => "`=`".to_string(),
        SyntaxKind::COMMA => "`,`".to_string(),
        SyntaxKind::STRING_LITERAL => "string literal".to_string(),
        kind if kind.is_keyword() => {
            let name = format!("{kind:?}");
            let word = name.trim_end_matches("_KW");
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => format!("`{}{}`", first, chars.as_str().to_ascii_lowercase()),
                None => format!("{kind:?}"),
            }
        }
        kind => format!("{kind:?}"),
    }
}

// ── Top-level parsing ──────────────────────────────────────────────────

/// Parse a complete module.
///
/// Opens a SOURCE_FILE node, parses module-level items until EOF, and
/// closes the root node. Every token, trivia included, ends up in the tree.
pub(crate) fn parse_source_file(p: &mut Parser) {
    let root = p.open();

    loop {
        p.eat_separators();
        if p.at(SyntaxKind::EOF) {
            break;
        }
        items::parse_module_item(p);
        p.finish_statement();
    }

    // Trailing trivia and the EOF token itself.
    p.advance();

    p.close(root, SyntaxKind::SOURCE_FILE);
}
