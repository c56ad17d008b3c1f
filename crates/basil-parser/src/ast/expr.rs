//! Typed AST nodes for expressions and arguments.

use crate::ast::{ast_node, child_node, child_token, AstNode};
use crate::cst::{SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

// ── Expr enum ────────────────────────────────────────────────────────────

/// Any expression node.
#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Literal),
    NameRef(NameRef),
    MemberAccess(MemberAccess),
    DictAccess(DictAccess),
    CallExpr(CallExpr),
    ParenExpr(ParenExpr),
    BinaryExpr(BinaryExpr),
    UnaryExpr(UnaryExpr),
    NewExpr(NewExpr),
    TypeOfExpr(TypeOfExpr),
}

impl Expr {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::LITERAL => Some(Expr::Literal(Literal { syntax: node })),
            SyntaxKind::NAME_REF => Some(Expr::NameRef(NameRef { syntax: node })),
            SyntaxKind::MEMBER_ACCESS => Some(Expr::MemberAccess(MemberAccess { syntax: node })),
            SyntaxKind::DICT_ACCESS => Some(Expr::DictAccess(DictAccess { syntax: node })),
            SyntaxKind::CALL_EXPR => Some(Expr::CallExpr(CallExpr { syntax: node })),
            SyntaxKind::PAREN_EXPR => Some(Expr::ParenExpr(ParenExpr { syntax: node })),
            SyntaxKind::BINARY_EXPR => Some(Expr::BinaryExpr(BinaryExpr { syntax: node })),
            SyntaxKind::UNARY_EXPR => Some(Expr::UnaryExpr(UnaryExpr { syntax: node })),
            SyntaxKind::NEW_EXPR => Some(Expr::NewExpr(NewExpr { syntax: node })),
            SyntaxKind::TYPEOF_EXPR => Some(Expr::TypeOfExpr(TypeOfExpr { syntax: node })),
            _ => None,
        }
    }

    /// Access the underlying syntax node regardless of variant.
    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Expr::Literal(n) => &n.syntax,
            Expr::NameRef(n) => &n.syntax,
            Expr::MemberAccess(n) => &n.syntax,
            Expr::DictAccess(n) => &n.syntax,
            Expr::CallExpr(n) => &n.syntax,
            Expr::ParenExpr(n) => &n.syntax,
            Expr::BinaryExpr(n) => &n.syntax,
            Expr::UnaryExpr(n) => &n.syntax,
            Expr::NewExpr(n) => &n.syntax,
            Expr::TypeOfExpr(n) => &n.syntax,
        }
    }
}

// ── Literal ──────────────────────────────────────────────────────────────

ast_node!(Literal, LITERAL);

impl Literal {
    /// The literal token.
    pub fn token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .next()
    }
}

// ── Names and member access ──────────────────────────────────────────────

ast_node!(NameRef, NAME_REF);

impl NameRef {
    /// The identifier text (`Me` included).
    pub fn text(&self) -> Option<String> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .next()
            .map(|t| t.text().to_string())
    }
}

ast_node!(MemberAccess, MEMBER_ACCESS);

impl MemberAccess {
    /// The accessed object; `None` for `.Member` inside `With`.
    pub fn base(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    pub fn member(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| t.kind() != SyntaxKind::DOT && !t.kind().is_trivia())
            .last()
    }
}

ast_node!(DictAccess, DICT_ACCESS);

// ── Calls and arguments ──────────────────────────────────────────────────

ast_node!(CallExpr, CALL_EXPR);

impl CallExpr {
    pub fn callee(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    pub fn arg_list(&self) -> Option<ArgList> {
        child_node(&self.syntax)
    }
}

ast_node!(ArgList, ARG_LIST);

impl ArgList {
    pub fn args(&self) -> impl Iterator<Item = Arg> + '_ {
        self.syntax.children().filter_map(Arg::cast)
    }
}

/// One argument of a call or one dimension of array bounds.
#[derive(Debug, Clone)]
pub enum Arg {
    Positional(PositionalArg),
    Named(NamedArg),
    Range(RangeArg),
}

impl Arg {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::ARG => Some(Arg::Positional(PositionalArg { syntax: node })),
            SyntaxKind::NAMED_ARG => Some(Arg::Named(NamedArg { syntax: node })),
            SyntaxKind::RANGE_ARG => Some(Arg::Range(RangeArg { syntax: node })),
            _ => None,
        }
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Arg::Positional(n) => &n.syntax,
            Arg::Named(n) => &n.syntax,
            Arg::Range(n) => &n.syntax,
        }
    }
}

ast_node!(PositionalArg, ARG);

impl PositionalArg {
    pub fn expr(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

ast_node!(NamedArg, NAMED_ARG);

impl NamedArg {
    pub fn name(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::IDENT)
    }

    pub fn expr(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

ast_node!(RangeArg, RANGE_ARG);

impl RangeArg {
    /// The expression before `To`.
    pub fn lower(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    /// The expression after `To`.
    pub fn upper(&self) -> Option<Expr> {
        self.syntax.children().filter_map(Expr::cast).nth(1)
    }
}

// ── Operators ────────────────────────────────────────────────────────────

ast_node!(ParenExpr, PAREN_EXPR);

impl ParenExpr {
    pub fn inner(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

ast_node!(BinaryExpr, BINARY_EXPR);

impl BinaryExpr {
    pub fn lhs(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    pub fn rhs(&self) -> Option<Expr> {
        self.syntax.children().filter_map(Expr::cast).nth(1)
    }

    /// The operator token.
    pub fn op(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| !t.kind().is_trivia() && t.kind() != SyntaxKind::NEWLINE)
    }
}

ast_node!(UnaryExpr, UNARY_EXPR);

impl UnaryExpr {
    pub fn op(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .next()
    }

    pub fn operand(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

ast_node!(NewExpr, NEW_EXPR);

impl NewExpr {
    pub fn arg_list(&self) -> Option<ArgList> {
        child_node(&self.syntax)
    }
}

ast_node!(TypeOfExpr, TYPEOF_EXPR);

/// Every expression directly under `parent`, in order.
pub fn child_exprs(parent: &SyntaxNode) -> impl Iterator<Item = Expr> + '_ {
    parent.children().filter_map(Expr::cast)
}

