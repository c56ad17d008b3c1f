//! Typed AST nodes for statements the rewrite passes edit.

use crate::ast::expr::{child_exprs, Arg, Expr};
use crate::ast::item::AsClause;
use crate::ast::{ast_node, child_node, child_nodes, AstNode};
use crate::cst::SyntaxNode;
use crate::syntax_kind::SyntaxKind;

ast_node!(EraseStmt, ERASE_STMT);

impl EraseStmt {
    /// The arrays being erased.
    pub fn operands(&self) -> impl Iterator<Item = Expr> + '_ {
        child_exprs(&self.syntax)
    }
}

ast_node!(ImplicitCallStmt, IMPLICIT_CALL_STMT);

impl ImplicitCallStmt {
    /// The called procedure (`Foo`, `obj.Add`).
    pub fn target(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    pub fn args(&self) -> Option<BareArgList> {
        child_node(&self.syntax)
    }
}

ast_node!(BareArgList, BARE_ARG_LIST);

impl BareArgList {
    pub fn args(&self) -> impl Iterator<Item = Arg> + '_ {
        self.syntax.children().filter_map(Arg::cast)
    }
}

ast_node!(CallStmt, CALL_STMT);

impl CallStmt {
    pub fn target(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

ast_node!(AssignStmt, ASSIGN_STMT);

impl AssignStmt {
    pub fn target(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    pub fn value(&self) -> Option<Expr> {
        self.syntax.children().filter_map(Expr::cast).nth(1)
    }
}

ast_node!(RedimStmt, REDIM_STMT);

impl RedimStmt {
    pub fn clauses(&self) -> impl Iterator<Item = RedimClause> + '_ {
        child_nodes(&self.syntax)
    }

    /// `ReDim Preserve`
    pub fn is_preserve(&self) -> bool {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .any(|t| t.kind() == SyntaxKind::IDENT && t.text().eq_ignore_ascii_case("Preserve"))
    }
}

ast_node!(RedimClause, REDIM_CLAUSE);

impl RedimClause {
    /// The resized array with its new bounds: `a(1 To n)`.
    pub fn target(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    pub fn as_clause(&self) -> Option<AsClause> {
        child_node(&self.syntax)
    }
}

