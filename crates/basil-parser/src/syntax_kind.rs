//! SyntaxKind enum for the Basil CST.
//!
//! A superset of `TokenKind` (mapped to SCREAMING_SNAKE_CASE) plus composite
//! node kinds for everything the parser builds.

use basil_common::token::TokenKind;

/// Every kind of syntax element in the Basil CST.
///
/// Token kinds (leaves) are mapped 1:1 from [`TokenKind`]. Composite node
/// kinds represent parser-produced tree nodes. The first two values are
/// sentinels used by the event-based parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // ── Sentinels ──────────────────────────────────────────────────────
    /// Placeholder kind for incomplete/unfinished parser events.
    TOMBSTONE = 0,
    /// Wrapper for tokens that couldn't be parsed.
    ERROR_NODE = 1,

    // ── Keywords ───────────────────────────────────────────────────────
    AND_KW,
    AS_KW,
    ATTRIBUTE_KW,
    BYREF_KW,
    BYVAL_KW,
    CALL_KW,
    CASE_KW,
    CONST_KW,
    DECLARE_KW,
    DIM_KW,
    DO_KW,
    EACH_KW,
    ELSE_KW,
    ELSEIF_KW,
    END_KW,
    ENUM_KW,
    EQV_KW,
    ERASE_KW,
    EXIT_KW,
    FALSE_KW,
    FOR_KW,
    FRIEND_KW,
    FUNCTION_KW,
    GLOBAL_KW,
    GOTO_KW,
    IF_KW,
    IMP_KW,
    IMPORTS_KW,
    IN_KW,
    IS_KW,
    LET_KW,
    LIKE_KW,
    LOOP_KW,
    ME_KW,
    MOD_KW,
    MODULE_KW,
    NEW_KW,
    NEXT_KW,
    NOT_KW,
    NOTHING_KW,
    ON_KW,
    OPTION_KW,
    OPTIONAL_KW,
    OR_KW,
    PARAMARRAY_KW,
    PRIVATE_KW,
    PROPERTY_KW,
    PUBLIC_KW,
    REDIM_KW,
    RESUME_KW,
    RETURN_KW,
    SELECT_KW,
    SET_KW,
    STATIC_KW,
    STEP_KW,
    STRUCTURE_KW,
    SUB_KW,
    THEN_KW,
    TO_KW,
    TRUE_KW,
    TYPE_KW,
    UNTIL_KW,
    WEND_KW,
    WHILE_KW,
    WITH_KW,
    WITHEVENTS_KW,
    XOR_KW,

    // ── Operators ──────────────────────────────────────────────────────
    PLUS,
    MINUS,
    STAR,
    SLASH,
    BACKSLASH,
    CARET,
    AMP,
    EQ,
    NOT_EQ,
    LT,
    GT,
    LT_EQ,
    GT_EQ,
    COLON_EQ,

    // ── Delimiters and punctuation ─────────────────────────────────────
    L_PAREN,
    R_PAREN,
    COMMA,
    DOT,
    BANG,
    COLON,
    SEMICOLON,
    HASH,

    // ── Literals ───────────────────────────────────────────────────────
    INT_LITERAL,
    FLOAT_LITERAL,
    STRING_LITERAL,
    DATE_LITERAL,

    // ── Names, trivia, special ─────────────────────────────────────────
    IDENT,
    WHITESPACE,
    NEWLINE,
    LINE_CONTINUATION,
    COMMENT,
    ERROR,
    EOF,

    // ── Module structure ───────────────────────────────────────────────
    /// Root node of every parse.
    SOURCE_FILE,
    /// `VERSION 1.0 CLASS`
    MODULE_HEADER,
    /// `BEGIN ... END` designer/config preamble.
    MODULE_CONFIG,
    /// `Attribute VB_Name = "Module1"`
    ATTRIBUTE_STMT,
    /// `Option Explicit`
    OPTION_STMT,
    /// `Imports System.Linq`
    IMPORTS_STMT,
    /// `Module Name ... End Module`
    MODULE_BLOCK,
    /// `Type Name ... End Type` or `Structure Name ... End Structure`
    TYPE_BLOCK,
    /// Field of a type block: `Data(1 To 10) As Long`
    TYPE_MEMBER,
    /// `Enum Name ... End Enum`
    ENUM_BLOCK,
    /// `Name = 1` inside an enum.
    ENUM_MEMBER,
    /// `Declare PtrSafe Function ... Lib "..."`
    DECLARE_STMT,
    /// `Sub`/`Function`/`Property` definition with its body.
    PROC_DEF,
    /// Parenthesized parameter list of a procedure.
    PARAM_LIST,
    /// One parameter: `ByVal x As Long`
    PARAM,
    /// `Public`, `Private`, `Global` or `Friend`.
    VISIBILITY,
    /// Declared name.
    NAME,
    /// `As [New] TypeName`
    AS_CLAUSE,
    /// Type name inside an `As` clause or `New`.
    TYPE_REF,

    // ── Statements ─────────────────────────────────────────────────────
    /// Statement list of a procedure or compound statement.
    BLOCK,
    /// `Dim a As Long, b(5) As Buf` (also `Static`, `Const`, module fields).
    DIM_STMT,
    /// One declarator inside a `DIM_STMT`.
    VAR_DECL,
    /// Parenthesized array bounds of a declarator or member.
    ARRAY_BOUNDS,
    /// `ReDim [Preserve] a(1 To n)`
    REDIM_STMT,
    /// One resized target inside a `REDIM_STMT`.
    REDIM_CLAUSE,
    /// `Erase a, b`
    ERASE_STMT,
    /// `Call Foo(a)`
    CALL_STMT,
    /// `Foo a, b` (call without argument parentheses).
    IMPLICIT_CALL_STMT,
    /// Unparenthesized argument list of an implicit call.
    BARE_ARG_LIST,
    /// Expression used as a statement: `Foo`, `Foo(1)`, `obj.Refresh`.
    EXPR_STMT,
    /// `[Let|Set] target = value`
    ASSIGN_STMT,
    /// Multi-line `If ... End If`
    IF_BLOCK,
    /// Single-line `If cond Then stmt [Else stmt]`
    IF_STMT,
    /// `ElseIf cond Then` and its block.
    ELSEIF_CLAUSE,
    /// `Else` and its block.
    ELSE_CLAUSE,
    /// `For i = a To b [Step c] ... Next`
    FOR_STMT,
    /// `For Each x In xs ... Next`
    FOR_EACH_STMT,
    /// `Do [While|Until c] ... Loop [While|Until c]`
    DO_LOOP,
    /// `While c ... Wend`
    WHILE_LOOP,
    /// `With obj ... End With`
    WITH_BLOCK,
    /// `Select Case x ... End Select`
    SELECT_BLOCK,
    /// `Case 1, 2 To 5` and its block.
    CASE_CLAUSE,
    /// `Exit Sub`, `Exit For`, ...
    EXIT_STMT,
    /// `GoTo label`
    GOTO_STMT,
    /// `label:` or a line number.
    LABEL,
    /// Bare `End`.
    END_STMT,
    /// Statement passed through without structure (`Open`, `Print #`, `On Error`).
    OTHER_STMT,

    // ── Expressions ────────────────────────────────────────────────────
    /// Literal value: `42`, `"s"`, `True`, `Nothing`, `#1/1/2000#`
    LITERAL,
    /// Identifier reference: `x`, `Me`
    NAME_REF,
    /// `a.b` (or `.b` inside `With`)
    MEMBER_ACCESS,
    /// `rs!Field`
    DICT_ACCESS,
    /// `f(a, b)` or `arr(i)`
    CALL_EXPR,
    /// Parenthesized argument list.
    ARG_LIST,
    /// Positional argument.
    ARG,
    /// `name:=value`
    NAMED_ARG,
    /// `lower To upper` inside an argument or bounds list.
    RANGE_ARG,
    /// `(expr)`
    PAREN_EXPR,
    /// `a + b`, `a And b`, `a = b`
    BINARY_EXPR,
    /// `-a`, `Not a`, `AddressOf f`
    UNARY_EXPR,
    /// `New Foo`
    NEW_EXPR,
    /// `TypeOf x Is Foo`
    TYPEOF_EXPR,
}

impl SyntaxKind {
    /// Whether this kind represents trivia (tokens that don't affect parsing).
    ///
    /// Newlines terminate statements and are not trivia.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::WHITESPACE | SyntaxKind::LINE_CONTINUATION | SyntaxKind::COMMENT
        )
    }

    /// Whether this kind is a reserved word.
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (SyntaxKind::AND_KW as u16) && (self as u16) <= (SyntaxKind::XOR_KW as u16)
    }

    /// Whether this kind ends a statement.
    pub fn is_statement_end(self) -> bool {
        matches!(self, SyntaxKind::NEWLINE | SyntaxKind::COLON | SyntaxKind::EOF)
    }
}

impl From<TokenKind> for SyntaxKind {
    fn from(kind: TokenKind) -> Self {
        match kind {
            // Keywords
            TokenKind::And => SyntaxKind::AND_KW,
            TokenKind::As => SyntaxKind::AS_KW,
            TokenKind::Attribute => SyntaxKind::ATTRIBUTE_KW,
            TokenKind::ByRef => SyntaxKind::BYREF_KW,
            TokenKind::ByVal => SyntaxKind::BYVAL_KW,
            TokenKind::Call => SyntaxKind::CALL_KW,
            TokenKind::Case => SyntaxKind::CASE_KW,
            TokenKind::Const => SyntaxKind::CONST_KW,
            TokenKind::Declare => SyntaxKind::DECLARE_KW,
            TokenKind::Dim => SyntaxKind::DIM_KW,
            TokenKind::Do => SyntaxKind::DO_KW,
            TokenKind::Each => SyntaxKind::EACH_KW,
            TokenKind::Else => SyntaxKind::ELSE_KW,
            TokenKind::ElseIf => SyntaxKind::ELSEIF_KW,
            TokenKind::End => SyntaxKind::END_KW,
            TokenKind::Enum => SyntaxKind::ENUM_KW,
            TokenKind::Eqv => SyntaxKind::EQV_KW,
            TokenKind::Erase => SyntaxKind::ERASE_KW,
            TokenKind::Exit => SyntaxKind::EXIT_KW,
            TokenKind::False => SyntaxKind::FALSE_KW,
            TokenKind::For => SyntaxKind::FOR_KW,
            TokenKind::Friend => SyntaxKind::FRIEND_KW,
            TokenKind::Function => SyntaxKind::FUNCTION_KW,
            TokenKind::Global => SyntaxKind::GLOBAL_KW,
            TokenKind::GoTo => SyntaxKind::GOTO_KW,
            TokenKind::If => SyntaxKind::IF_KW,
            TokenKind::Imp => SyntaxKind::IMP_KW,
            TokenKind::Imports => SyntaxKind::IMPORTS_KW,
            TokenKind::In => SyntaxKind::IN_KW,
            TokenKind::Is => SyntaxKind::IS_KW,
            TokenKind::Let => SyntaxKind::LET_KW,
            TokenKind::Like => SyntaxKind::LIKE_KW,
            TokenKind::Loop => SyntaxKind::LOOP_KW,
            TokenKind::Me => SyntaxKind::ME_KW,
            TokenKind::Mod => SyntaxKind::MOD_KW,
            TokenKind::Module => SyntaxKind::MODULE_KW,
            TokenKind::New => SyntaxKind::NEW_KW,
            TokenKind::Next => SyntaxKind::NEXT_KW,
            TokenKind::Not => SyntaxKind::NOT_KW,
            TokenKind::Nothing => SyntaxKind::NOTHING_KW,
            TokenKind::On => SyntaxKind::ON_KW,
            TokenKind::Option => SyntaxKind::OPTION_KW,
            TokenKind::Optional => SyntaxKind::OPTIONAL_KW,
            TokenKind::Or => SyntaxKind::OR_KW,
            TokenKind::ParamArray => SyntaxKind::PARAMARRAY_KW,
            TokenKind::Private => SyntaxKind::PRIVATE_KW,
            TokenKind::Property => SyntaxKind::PROPERTY_KW,
            TokenKind::Public => SyntaxKind::PUBLIC_KW,
            TokenKind::ReDim => SyntaxKind::REDIM_KW,
            TokenKind::Resume => SyntaxKind::RESUME_KW,
            TokenKind::Return => SyntaxKind::RETURN_KW,
            TokenKind::Select => SyntaxKind::SELECT_KW,
            TokenKind::Set => SyntaxKind::SET_KW,
            TokenKind::Static => SyntaxKind::STATIC_KW,
            TokenKind::Step => SyntaxKind::STEP_KW,
            TokenKind::Structure => SyntaxKind::STRUCTURE_KW,
            TokenKind::Sub => SyntaxKind::SUB_KW,
            TokenKind::Then => SyntaxKind::THEN_KW,
            TokenKind::To => SyntaxKind::TO_KW,
            TokenKind::True => SyntaxKind::TRUE_KW,
            TokenKind::Type => SyntaxKind::TYPE_KW,
            TokenKind::Until => SyntaxKind::UNTIL_KW,
            TokenKind::Wend => SyntaxKind::WEND_KW,
            TokenKind::While => SyntaxKind::WHILE_KW,
            TokenKind::With => SyntaxKind::WITH_KW,
            TokenKind::WithEvents => SyntaxKind::WITHEVENTS_KW,
            TokenKind::Xor => SyntaxKind::XOR_KW,
            // Operators
            TokenKind::Plus => SyntaxKind::PLUS,
            TokenKind::Minus => SyntaxKind::MINUS,
            TokenKind::Star => SyntaxKind::STAR,
            TokenKind::Slash => SyntaxKind::SLASH,
            TokenKind::Backslash => SyntaxKind::BACKSLASH,
            TokenKind::Caret => SyntaxKind::CARET,
            TokenKind::Amp => SyntaxKind::AMP,
            TokenKind::Eq => SyntaxKind::EQ,
            TokenKind::NotEq => SyntaxKind::NOT_EQ,
            TokenKind::Lt => SyntaxKind::LT,
            TokenKind::Gt => SyntaxKind::GT,
            TokenKind::LtEq => SyntaxKind::LT_EQ,
            TokenKind::GtEq => SyntaxKind::GT_EQ,
            TokenKind::ColonEq => SyntaxKind::COLON_EQ,
            // Delimiters and punctuation
            TokenKind::LParen => SyntaxKind::L_PAREN,
            TokenKind::RParen => SyntaxKind::R_PAREN,
            TokenKind::Comma => SyntaxKind::COMMA,
            TokenKind::Dot => SyntaxKind::DOT,
            TokenKind::Bang => SyntaxKind::BANG,
            TokenKind::Colon => SyntaxKind::COLON,
            TokenKind::Semicolon => SyntaxKind::SEMICOLON,
            TokenKind::Hash => SyntaxKind::HASH,
            // Literals
            TokenKind::IntLiteral => SyntaxKind::INT_LITERAL,
            TokenKind::FloatLiteral => SyntaxKind::FLOAT_LITERAL,
            TokenKind::StringLiteral => SyntaxKind::STRING_LITERAL,
            TokenKind::DateLiteral => SyntaxKind::DATE_LITERAL,
            // Names, trivia, special
            TokenKind::Ident => SyntaxKind::IDENT,
            TokenKind::Whitespace => SyntaxKind::WHITESPACE,
            TokenKind::Newline => SyntaxKind::NEWLINE,
            TokenKind::LineContinuation => SyntaxKind::LINE_CONTINUATION,
            TokenKind::Comment => SyntaxKind::COMMENT,
            TokenKind::Error => SyntaxKind::ERROR,
            TokenKind::Eof => SyntaxKind::EOF,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_kinds_map_to_syntax_kinds() {
        assert_eq!(SyntaxKind::from(TokenKind::Type), SyntaxKind::TYPE_KW);
        assert_eq!(SyntaxKind::from(TokenKind::ColonEq), SyntaxKind::COLON_EQ);
        assert_eq!(SyntaxKind::from(TokenKind::Eof), SyntaxKind::EOF);
    }

    #[test]
    fn keyword_range() {
        assert!(SyntaxKind::AND_KW.is_keyword());
        assert!(SyntaxKind::TYPE_KW.is_keyword());
        assert!(SyntaxKind::XOR_KW.is_keyword());
        assert!(!SyntaxKind::IDENT.is_keyword());
        assert!(!SyntaxKind::PLUS.is_keyword());
    }

    #[test]
    fn trivia_and_statement_ends() {
        assert!(SyntaxKind::COMMENT.is_trivia());
        assert!(!SyntaxKind::NEWLINE.is_trivia());
        assert!(SyntaxKind::NEWLINE.is_statement_end());
        assert!(SyntaxKind::COLON.is_statement_end());
        assert!(!SyntaxKind::COMMA.is_statement_end());
    }
}
