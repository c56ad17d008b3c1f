use serde::Serialize;

use crate::span::Span;

/// A token produced by the Basil lexer.
///
/// Tokens tile the source: trivia (whitespace, comments, line continuations)
/// is emitted as tokens too, so concatenating token texts in order rebuilds
/// the original module byte for byte.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Create a new token from a kind and byte offsets.
    pub fn new(kind: TokenKind, start: u32, end: u32) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }
}

/// Every kind of token shared by the legacy macro dialect and the structured
/// target dialect.
///
/// Both dialects use the same lexical vocabulary, so one enum serves the
/// first parse and the re-parse of rewritten text. Words that are keywords
/// only in particular positions (`PtrSafe`, `Lib`, `Preserve`, `Get`, ...)
/// are plain `Ident`s and recognised by text in the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // ── Keywords ──────────────────────────────────────────────────────
    And,
    As,
    Attribute,
    ByRef,
    ByVal,
    Call,
    Case,
    Const,
    Declare,
    Dim,
    Do,
    Each,
    Else,
    ElseIf,
    End,
    Enum,
    Eqv,
    Erase,
    Exit,
    False,
    For,
    Friend,
    Function,
    Global,
    GoTo,
    If,
    Imp,
    Imports,
    In,
    Is,
    Let,
    Like,
    Loop,
    Me,
    Mod,
    Module,
    New,
    Next,
    Not,
    Nothing,
    On,
    Option,
    Optional,
    Or,
    ParamArray,
    Private,
    Property,
    Public,
    ReDim,
    Resume,
    Return,
    Select,
    Set,
    Static,
    Step,
    Structure,
    Sub,
    Then,
    To,
    True,
    Type,
    Until,
    Wend,
    While,
    With,
    WithEvents,
    Xor,

    // ── Operators ─────────────────────────────────────────────────────
    Plus,
    Minus,
    Star,
    Slash,
    Backslash,
    Caret,
    Amp,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    ColonEq,

    // ── Delimiters and punctuation ────────────────────────────────────
    LParen,
    RParen,
    Comma,
    Dot,
    Bang,
    Colon,
    Semicolon,
    Hash,

    // ── Literals ──────────────────────────────────────────────────────
    IntLiteral,
    FloatLiteral,
    StringLiteral,
    DateLiteral,

    // ── Names ─────────────────────────────────────────────────────────
    Ident,

    // ── Trivia ────────────────────────────────────────────────────────
    Whitespace,
    Newline,
    LineContinuation,
    Comment,

    // ── Special ───────────────────────────────────────────────────────
    Error,
    Eof,
}

impl TokenKind {
    /// Whether the token carries no meaning for the parser.
    ///
    /// Newlines are not trivia: they terminate statements.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::LineContinuation | TokenKind::Comment
        )
    }
}

/// Look up a keyword by its text, ignoring ASCII case.
///
/// Returns `None` for anything that is not a reserved word, including the
/// position-dependent words the parser matches by text.
pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
    // Longest keyword is "ParamArray"/"WithEvents"; skip the allocation for
    // identifiers that cannot match.
    if s.len() > 10 {
        return None;
    }
    let lower = s.to_ascii_lowercase();
    let kind = match lower.as_str() {
        "and" => TokenKind::And,
        "as" => TokenKind::As,
        "attribute" => TokenKind::Attribute,
        "byref" => TokenKind::ByRef,
        "byval" => TokenKind::ByVal,
        "call" => TokenKind::Call,
        "case" => TokenKind::Case,
        "const" => TokenKind::Const,
        "declare" => TokenKind::Declare,
        "dim" => TokenKind::Dim,
        "do" => TokenKind::Do,
        "each" => TokenKind::Each,
        "else" => TokenKind::Else,
        "elseif" => TokenKind::ElseIf,
        "end" => TokenKind::End,
        "enum" => TokenKind::Enum,
        "eqv" => TokenKind::Eqv,
        "erase" => TokenKind::Erase,
        "exit" => TokenKind::Exit,
        "false" => TokenKind::False,
        "for" => TokenKind::For,
        "friend" => TokenKind::Friend,
        "function" => TokenKind::Function,
        "global" => TokenKind::Global,
        "goto" => TokenKind::GoTo,
        "if" => TokenKind::If,
        "imp" => TokenKind::Imp,
        "imports" => TokenKind::Imports,
        "in" => TokenKind::In,
        "is" => TokenKind::Is,
        "let" => TokenKind::Let,
        "like" => TokenKind::Like,
        "loop" => TokenKind::Loop,
        "me" => TokenKind::Me,
        "mod" => TokenKind::Mod,
        "module" => TokenKind::Module,
        "new" => TokenKind::New,
        "next" => TokenKind::Next,
        "not" => TokenKind::Not,
        "nothing" => TokenKind::Nothing,
        "on" => TokenKind::On,
        "option" => TokenKind::Option,
        "optional" => TokenKind::Optional,
        "or" => TokenKind::Or,
        "paramarray" => TokenKind::ParamArray,
        "private" => TokenKind::Private,
        "property" => TokenKind::Property,
        "public" => TokenKind::Public,
        "redim" => TokenKind::ReDim,
        "resume" => TokenKind::Resume,
        "return" => TokenKind::Return,
        "select" => TokenKind::Select,
        "set" => TokenKind::Set,
        "static" => TokenKind::Static,
        "step" => TokenKind::Step,
        "structure" => TokenKind::Structure,
        "sub" => TokenKind::Sub,
        "then" => TokenKind::Then,
        "to" => TokenKind::To,
        "true" => TokenKind::True,
        "type" => TokenKind::Type,
        "until" => TokenKind::Until,
        "wend" => TokenKind::Wend,
        "while" => TokenKind::While,
        "with" => TokenKind::With,
        "withevents" => TokenKind::WithEvents,
        "xor" => TokenKind::Xor,
        _ => return None,
    };
    Some(kind)
}
