//! Expression parser using Pratt parsing (binding power).
//!
//! Handles all Basil expression forms: literals, names, member and
//! dictionary access, calls and indexing (both spelled `f(...)`), unary and
//! binary operators, `New`, `TypeOf ... Is` and parenthesized expressions.

use super::{MarkClosed, Parser};
use crate::syntax_kind::SyntaxKind;

// ── Binding Power Table ────────────────────────────────────────────────

/// Returns (left_bp, right_bp) for infix operators.
///
/// Higher binding power = tighter binding. Left-associative operators have
/// left_bp < right_bp.
fn infix_binding_power(op: SyntaxKind) -> Option<(u8, u8)> {
    match op {
        SyntaxKind::IMP_KW => Some((1, 2)),
        SyntaxKind::EQV_KW => Some((3, 4)),
        SyntaxKind::XOR_KW => Some((5, 6)),
        SyntaxKind::OR_KW => Some((7, 8)),
        SyntaxKind::AND_KW => Some((9, 10)),
        // Not has prefix bp 11.
        SyntaxKind::EQ
        | SyntaxKind::NOT_EQ
        | SyntaxKind::LT
        | SyntaxKind::GT
        | SyntaxKind::LT_EQ
        | SyntaxKind::GT_EQ
        | SyntaxKind::IS_KW
        | SyntaxKind::LIKE_KW => Some((13, 14)),
        SyntaxKind::AMP => Some((15, 16)),
        SyntaxKind::PLUS | SyntaxKind::MINUS => Some((17, 18)),
        SyntaxKind::MOD_KW => Some((19, 20)),
        SyntaxKind::BACKSLASH => Some((21, 22)),
        SyntaxKind::STAR | SyntaxKind::SLASH => Some((23, 24)),
        // Unary minus has prefix bp 25, so `-2 ^ 2` is `-(2 ^ 2)`.
        SyntaxKind::CARET => Some((27, 28)),
        _ => None,
    }
}

const NOT_PREFIX_BP: u8 = 11;
const UNARY_PREFIX_BP: u8 = 25;
/// Operand of `TypeOf` binds tighter than `Is`.
const TYPEOF_OPERAND_BP: u8 = 15;

// ── Public API ─────────────────────────────────────────────────────────

/// Parse a full expression.
pub(crate) fn expr(p: &mut Parser) -> Option<MarkClosed> {
    p.rule("expression", |p| expr_bp(p, 0))
}

/// Whether the current token can start an expression.
pub(crate) fn at_expr_start(p: &Parser) -> bool {
    matches!(
        p.current(),
        SyntaxKind::INT_LITERAL
            | SyntaxKind::FLOAT_LITERAL
            | SyntaxKind::STRING_LITERAL
            | SyntaxKind::DATE_LITERAL
            | SyntaxKind::TRUE_KW
            | SyntaxKind::FALSE_KW
            | SyntaxKind::NOTHING_KW
            | SyntaxKind::IDENT
            | SyntaxKind::ME_KW
            | SyntaxKind::NOT_KW
            | SyntaxKind::MINUS
            | SyntaxKind::PLUS
            | SyntaxKind::L_PAREN
            | SyntaxKind::NEW_KW
            | SyntaxKind::DOT
            | SyntaxKind::BANG
    )
}

/// Parse the target of a statement: a name or `With` member followed by
/// member accesses and argument lists.
///
/// Unlike an expression, a `(` preceded by whitespace is not taken as part
/// of the target: in `Foo (a), b` the parenthesized group is the first
/// argument of an implicit call.
pub(crate) fn call_target(p: &mut Parser) -> Option<MarkClosed> {
    let lhs = atom(p)?;
    Some(postfix(p, lhs, false))
}

// ── Pratt Parser Core ──────────────────────────────────────────────────

fn expr_bp(p: &mut Parser, min_bp: u8) -> Option<MarkClosed> {
    let mut lhs = lhs(p)?;

    loop {
        let Some((l_bp, r_bp)) = infix_binding_power(p.current()) else {
            break;
        };
        if l_bp < min_bp {
            break;
        }

        let m = p.open_before(lhs);
        p.advance(); // operator
        if expr_bp(p, r_bp).is_none() {
            p.error("expected expression");
        }
        lhs = p.close(m, SyntaxKind::BINARY_EXPR);
    }

    Some(lhs)
}

/// Parse a prefix expression or an atom with its postfix chain.
fn lhs(p: &mut Parser) -> Option<MarkClosed> {
    match p.current() {
        SyntaxKind::NOT_KW => Some(prefix(p, NOT_PREFIX_BP)),
        SyntaxKind::MINUS | SyntaxKind::PLUS => Some(prefix(p, UNARY_PREFIX_BP)),
        SyntaxKind::IDENT if p.at_word("AddressOf") => Some(prefix(p, UNARY_PREFIX_BP)),
        SyntaxKind::IDENT if p.at_word("TypeOf") => Some(type_of(p)),
        _ => {
            let atom = atom(p)?;
            Some(postfix(p, atom, true))
        }
    }
}

fn prefix(p: &mut Parser, bp: u8) -> MarkClosed {
    let m = p.open();
    p.advance(); // operator
    if expr_bp(p, bp).is_none() {
        p.error("expected expression");
    }
    p.close(m, SyntaxKind::UNARY_EXPR)
}

/// `TypeOf x Is Foo`
fn type_of(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // TypeOf
    if expr_bp(p, TYPEOF_OPERAND_BP).is_none() {
        p.error("expected expression");
    }
    if p.expect(SyntaxKind::IS_KW) {
        type_ref(p);
    }
    p.close(m, SyntaxKind::TYPEOF_EXPR)
}

// ── Atoms ──────────────────────────────────────────────────────────────

fn atom(p: &mut Parser) -> Option<MarkClosed> {
    match p.current() {
        SyntaxKind::INT_LITERAL
        | SyntaxKind::FLOAT_LITERAL
        | SyntaxKind::STRING_LITERAL
        | SyntaxKind::DATE_LITERAL
        | SyntaxKind::TRUE_KW
        | SyntaxKind::FALSE_KW
        | SyntaxKind::NOTHING_KW => {
            let m = p.open();
            p.advance();
            Some(p.close(m, SyntaxKind::LITERAL))
        }

        SyntaxKind::IDENT | SyntaxKind::ME_KW => {
            let m = p.open();
            p.advance();
            Some(p.close(m, SyntaxKind::NAME_REF))
        }

        SyntaxKind::L_PAREN => {
            let m = p.open();
            p.advance(); // (
            if expr(p).is_none() {
                p.error("expected expression");
            }
            p.expect(SyntaxKind::R_PAREN);
            Some(p.close(m, SyntaxKind::PAREN_EXPR))
        }

        SyntaxKind::NEW_KW => {
            let m = p.open();
            p.advance(); // New
            type_ref(p);
            if p.at(SyntaxKind::L_PAREN) {
                arg_list(p);
            }
            Some(p.close(m, SyntaxKind::NEW_EXPR))
        }

        // `.Member` and `!Key` inside a With block.
        SyntaxKind::DOT | SyntaxKind::BANG => {
            let kind = if p.at(SyntaxKind::DOT) {
                SyntaxKind::MEMBER_ACCESS
            } else {
                SyntaxKind::DICT_ACCESS
            };
            let m = p.open();
            p.advance();
            member_name(p);
            Some(p.close(m, kind))
        }

        _ => {
            p.error("expected expression");
            None
        }
    }
}

/// Member accesses, dictionary accesses and argument lists after an atom.
fn postfix(p: &mut Parser, mut lhs: MarkClosed, spaced_paren: bool) -> MarkClosed {
    loop {
        match p.current() {
            SyntaxKind::DOT if is_member_name(p.nth(1)) => {
                let m = p.open_before(lhs);
                p.advance(); // .
                p.advance(); // name
                lhs = p.close(m, SyntaxKind::MEMBER_ACCESS);
            }
            SyntaxKind::BANG if is_member_name(p.nth(1)) => {
                let m = p.open_before(lhs);
                p.advance(); // !
                p.advance(); // key
                lhs = p.close(m, SyntaxKind::DICT_ACCESS);
            }
            SyntaxKind::L_PAREN if spaced_paren || !p.current_preceded_by_whitespace() => {
                let m = p.open_before(lhs);
                arg_list(p);
                lhs = p.close(m, SyntaxKind::CALL_EXPR);
            }
            _ => break,
        }
    }
    lhs
}

/// Member names may be spelled like keywords (`.Type`, `.End`).
fn is_member_name(kind: SyntaxKind) -> bool {
    kind == SyntaxKind::IDENT || kind.is_keyword()
}

fn member_name(p: &mut Parser) {
    if is_member_name(p.current()) {
        p.advance();
    } else {
        p.error("expected member name");
    }
}

/// A possibly dotted type name: `Long`, `Module1.Buf`, `Scripting.Dictionary`.
///
/// A directly following `()` (array type, `As Long()`) is part of the name.
pub(crate) fn type_ref(p: &mut Parser) {
    let m = p.open();
    if p.at(SyntaxKind::IDENT) {
        p.advance();
        while p.at(SyntaxKind::DOT) && is_member_name(p.nth(1)) {
            p.advance();
            p.advance();
        }
        if p.at(SyntaxKind::L_PAREN) && p.nth(1) == SyntaxKind::R_PAREN {
            p.advance();
            p.advance();
        }
    } else {
        p.error("expected type name");
    }
    p.close(m, SyntaxKind::TYPE_REF);
}

// ── Arguments ──────────────────────────────────────────────────────────

/// Parenthesized argument list. Arguments may be omitted (`f(a, , c)`).
pub(crate) fn arg_list(p: &mut Parser) {
    let m = p.open();
    p.advance(); // (
    if !p.at(SyntaxKind::R_PAREN) {
        loop {
            arg(p);
            if !p.eat(SyntaxKind::COMMA) {
                break;
            }
        }
    }
    p.expect(SyntaxKind::R_PAREN);
    p.close(m, SyntaxKind::ARG_LIST);
}

/// Unparenthesized arguments of an implicit call: `Foo a, , b`.
pub(crate) fn bare_arg_list(p: &mut Parser) {
    let m = p.open();
    loop {
        arg(p);
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.close(m, SyntaxKind::BARE_ARG_LIST);
}

/// One argument: positional, named (`x:=1`) or a bound range (`1 To n`).
///
/// Produces nothing for an omitted argument.
fn arg(p: &mut Parser) {
    if p.at(SyntaxKind::COMMA) || p.at(SyntaxKind::R_PAREN) || p.at_eos() {
        return;
    }

    if p.at(SyntaxKind::IDENT) && p.nth(1) == SyntaxKind::COLON_EQ {
        let m = p.open();
        p.advance(); // name
        p.advance(); // :=
        if expr(p).is_none() {
            p.error("expected expression");
        }
        p.close(m, SyntaxKind::NAMED_ARG);
        return;
    }

    let m = p.open();
    p.eat(SyntaxKind::BYVAL_KW);
    if expr(p).is_none() {
        p.close(m, SyntaxKind::ARG);
        return;
    }
    if p.eat(SyntaxKind::TO_KW) {
        if expr(p).is_none() {
            p.error("expected upper bound");
        }
        p.close(m, SyntaxKind::RANGE_ARG);
    } else {
        p.close(m, SyntaxKind::ARG);
    }
}

/// Array bounds of a declarator or type member: `(1 To 10, 5)`, `()`, `(,)`.
pub(crate) fn array_bounds(p: &mut Parser) {
    let m = p.open();
    p.advance(); // (
    loop {
        if p.at(SyntaxKind::R_PAREN) || p.at_eos() {
            break;
        }
        if p.eat(SyntaxKind::COMMA) {
            continue;
        }
        arg(p);
        if !p.at(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::R_PAREN);
    p.close(m, SyntaxKind::ARRAY_BOUNDS);
}
