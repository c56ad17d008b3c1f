//! Module-level declarations: header, attributes, options, types, enums,
//! modules, `Declare` statements, procedures and field declarations.

use super::expressions::{self, array_bounds, type_ref};
use super::statements::{parse_block, parse_statement};
use super::{MarkOpened, Parser};
use crate::syntax_kind::SyntaxKind;

const VISIBILITY_KWS: &[SyntaxKind] = &[
    SyntaxKind::PUBLIC_KW,
    SyntaxKind::PRIVATE_KW,
    SyntaxKind::GLOBAL_KW,
    SyntaxKind::FRIEND_KW,
];

const PROC_KWS: &[SyntaxKind] = &[
    SyntaxKind::SUB_KW,
    SyntaxKind::FUNCTION_KW,
    SyntaxKind::PROPERTY_KW,
];

/// Parse one module-level item.
pub(crate) fn parse_module_item(p: &mut Parser) {
    match p.current() {
        SyntaxKind::IDENT if p.at_word("VERSION") && p.at_line_start() => module_header(p),
        SyntaxKind::IDENT if p.at_word("BEGIN") && p.at_line_start() => module_config(p),
        SyntaxKind::ATTRIBUTE_KW => raw_statement(p, SyntaxKind::ATTRIBUTE_STMT),
        SyntaxKind::OPTION_KW => raw_statement(p, SyntaxKind::OPTION_STMT),
        SyntaxKind::IMPORTS_KW => raw_statement(p, SyntaxKind::IMPORTS_STMT),
        SyntaxKind::PUBLIC_KW
        | SyntaxKind::PRIVATE_KW
        | SyntaxKind::GLOBAL_KW
        | SyntaxKind::FRIEND_KW
        | SyntaxKind::STATIC_KW
        | SyntaxKind::TYPE_KW
        | SyntaxKind::STRUCTURE_KW
        | SyntaxKind::ENUM_KW
        | SyntaxKind::MODULE_KW
        | SyntaxKind::DECLARE_KW
        | SyntaxKind::SUB_KW
        | SyntaxKind::FUNCTION_KW
        | SyntaxKind::PROPERTY_KW
        | SyntaxKind::DIM_KW
        | SyntaxKind::CONST_KW
        | SyntaxKind::WITHEVENTS_KW => parse_declaration(p),
        _ => parse_statement(p),
    }
}

/// Parse a declaration introduced by modifiers or a declaring keyword.
///
/// Looks past `Public`/`Private`/`Global`/`Friend`/`Static` to decide which
/// construct follows.
pub(crate) fn parse_declaration(p: &mut Parser) {
    let mut n = 0;
    while VISIBILITY_KWS.contains(&p.nth(n)) || p.nth(n) == SyntaxKind::STATIC_KW {
        n += 1;
    }

    let m = p.open();
    match p.nth(n) {
        SyntaxKind::TYPE_KW | SyntaxKind::STRUCTURE_KW => type_block(p, m),
        SyntaxKind::ENUM_KW => enum_block(p, m),
        SyntaxKind::MODULE_KW => module_block(p, m),
        SyntaxKind::DECLARE_KW => declare_stmt(p, m),
        kind if PROC_KWS.contains(&kind) => proc_def(p, m),
        // `Public Event Changed(ByVal x As Long)`
        SyntaxKind::IDENT if p.nth_text(n).eq_ignore_ascii_case("Event") => {
            p.skip_to_eos();
            p.close(m, SyntaxKind::OTHER_STMT);
        }
        _ => dim_stmt(p, m),
    }
}

// ── Preamble ───────────────────────────────────────────────────────────

/// `VERSION 1.0 CLASS`
fn module_header(p: &mut Parser) {
    raw_statement(p, SyntaxKind::MODULE_HEADER);
}

/// `BEGIN ... END` designer block of class and form modules. Nested
/// `Begin` lines open further levels.
fn module_config(p: &mut Parser) {
    let m = p.open();
    let start = p.current_span();
    p.advance(); // BEGIN
    let mut depth = 1usize;
    while depth > 0 {
        if p.at(SyntaxKind::EOF) {
            p.error_with_related("expected `END`", start, "configuration block starts here");
            break;
        }
        if p.at_line_start() {
            if p.at_word("BEGIN") {
                depth += 1;
            } else if p.at(SyntaxKind::END_KW) && p.nth(1).is_statement_end() {
                depth -= 1;
            }
        }
        p.advance();
    }
    p.close(m, SyntaxKind::MODULE_CONFIG);
}

/// A statement kept as a flat token run up to the end of the line.
fn raw_statement(p: &mut Parser, kind: SyntaxKind) {
    let m = p.open();
    p.skip_to_eos();
    p.close(m, kind);
}

// ── Shared pieces ──────────────────────────────────────────────────────

/// Optional `Public`/`Private`/`Global`/`Friend`.
pub(crate) fn visibility(p: &mut Parser) {
    if p.at_any(VISIBILITY_KWS) {
        let m = p.open();
        p.advance();
        p.close(m, SyntaxKind::VISIBILITY);
    }
}

/// A declared name. Returns false (after recording an error) if missing.
fn name(p: &mut Parser, what: &str) -> bool {
    if p.at(SyntaxKind::IDENT) {
        let m = p.open();
        p.advance();
        p.close(m, SyntaxKind::NAME);
        true
    } else {
        p.error(&format!("expected {what} name"));
        false
    }
}

/// `As [New] Type[(args)] [* len]`
pub(crate) fn as_clause(p: &mut Parser) {
    let m = p.open();
    p.advance(); // As
    let is_new = p.eat(SyntaxKind::NEW_KW);
    type_ref(p);
    if is_new && p.at(SyntaxKind::L_PAREN) {
        expressions::arg_list(p);
    }
    // Fixed-length string: `As String * 20`
    if p.eat(SyntaxKind::STAR) && !p.at_eos() {
        p.advance();
    }
    p.close(m, SyntaxKind::AS_CLAUSE);
}

/// Whether the tokens ahead (after modifiers) start a procedure.
fn at_proc_start(p: &Parser) -> bool {
    let mut n = 0;
    while VISIBILITY_KWS.contains(&p.nth(n)) || p.nth(n) == SyntaxKind::STATIC_KW {
        n += 1;
    }
    PROC_KWS.contains(&p.nth(n))
}

/// Expect `End <kind>` closing a block opened at `start`.
fn end_of(p: &mut Parser, kind: SyntaxKind, what: &str, start: basil_common::span::Span) {
    if p.at_end_of(kind) {
        p.advance(); // End
        p.advance(); // kind
    } else {
        p.error_with_related(
            &format!("expected `End {what}`"),
            start,
            &format!("`{what}` starts here"),
        );
    }
}

// ── Type blocks ────────────────────────────────────────────────────────

/// `[vis] Type Name ... End Type` (or `Structure ... End Structure`).
fn type_block(p: &mut Parser, m: MarkOpened) {
    p.rule("type_block", |p| {
        visibility(p);
        let start = p.current_span();
        let keyword = p.current();
        let what = if keyword == SyntaxKind::STRUCTURE_KW {
            "Structure"
        } else {
            "Type"
        };
        p.advance(); // Type | Structure
        name(p, "type");
        p.finish_statement();

        loop {
            p.eat_separators();
            if p.at(SyntaxKind::EOF) || at_block_end(p) {
                break;
            }
            if p.at_end_of(SyntaxKind::TYPE_KW) || p.at_end_of(SyntaxKind::STRUCTURE_KW) {
                break;
            }
            if p.at(SyntaxKind::HASH) {
                raw_statement(p, SyntaxKind::OTHER_STMT);
            } else if at_proc_start(p) {
                let pm = p.open();
                proc_def(p, pm);
            } else {
                type_member(p);
            }
            p.finish_statement();
        }

        if p.at_end_of(SyntaxKind::TYPE_KW) || p.at_end_of(SyntaxKind::STRUCTURE_KW) {
            p.advance();
            p.advance();
        } else {
            p.error_with_related(
                &format!("expected `End {what}`"),
                start,
                &format!("`{what}` starts here"),
            );
        }
    });
    p.close(m, SyntaxKind::TYPE_BLOCK);
}

/// `[vis] [Dim] Name[(bounds)] [As Type]`
fn type_member(p: &mut Parser) {
    let m = p.open();
    visibility(p);
    p.eat(SyntaxKind::DIM_KW);
    if name(p, "member") {
        if p.at(SyntaxKind::L_PAREN) {
            array_bounds(p);
        }
        if p.at(SyntaxKind::AS_KW) {
            as_clause(p);
        }
    }
    p.close(m, SyntaxKind::TYPE_MEMBER);
}

// ── Enums and modules ──────────────────────────────────────────────────

fn enum_block(p: &mut Parser, m: MarkOpened) {
    p.rule("enum_block", |p| {
        visibility(p);
        let start = p.current_span();
        p.advance(); // Enum
        name(p, "enum");
        p.finish_statement();

        loop {
            p.eat_separators();
            if p.at(SyntaxKind::EOF) || at_block_end(p) || p.at_end_of(SyntaxKind::ENUM_KW) {
                break;
            }
            let mm = p.open();
            if name(p, "enum member") && p.eat(SyntaxKind::EQ) && expressions::expr(p).is_none()
            {
                p.error("expected expression");
            }
            p.close(mm, SyntaxKind::ENUM_MEMBER);
            p.finish_statement();
        }

        end_of(p, SyntaxKind::ENUM_KW, "Enum", start);
    });
    p.close(m, SyntaxKind::ENUM_BLOCK);
}

/// `[vis] Module Name ... End Module`
fn module_block(p: &mut Parser, m: MarkOpened) {
    p.rule("module_block", |p| {
        visibility(p);
        let start = p.current_span();
        p.advance(); // Module
        name(p, "module");
        p.finish_statement();

        loop {
            p.eat_separators();
            if p.at(SyntaxKind::EOF) || p.at_end_of(SyntaxKind::MODULE_KW) {
                break;
            }
            if at_block_end(p) {
                let text = format!("unexpected `End {}`", p.nth_text(1));
                p.error(&text);
                p.skip_to_eos();
                continue;
            }
            parse_module_item(p);
            p.finish_statement();
        }

        end_of(p, SyntaxKind::MODULE_KW, "Module", start);
    });
    p.close(m, SyntaxKind::MODULE_BLOCK);
}

// ── Declare ────────────────────────────────────────────────────────────

/// `[vis] Declare [PtrSafe] Sub|Function Name Lib "dll" [Alias "x"] (...) [As T]`
///
/// Only the leading keywords and the name carry structure; the rest is kept
/// as tokens.
fn declare_stmt(p: &mut Parser, m: MarkOpened) {
    visibility(p);
    p.advance(); // Declare
    if p.at_word("PtrSafe") {
        p.advance();
    }
    if p.at(SyntaxKind::SUB_KW) || p.at(SyntaxKind::FUNCTION_KW) {
        p.advance();
        name(p, "procedure");
    } else {
        p.error("expected `Sub` or `Function`");
    }
    p.skip_to_eos();
    p.close(m, SyntaxKind::DECLARE_STMT);
}

// ── Procedures ─────────────────────────────────────────────────────────

/// `[vis] [Static] Sub|Function|Property [Get|Let|Set] Name[(params)] [As T]`
/// followed by the body and the matching `End`.
fn proc_def(p: &mut Parser, m: MarkOpened) {
    p.rule("proc_def", |p| {
        visibility(p);
        p.eat(SyntaxKind::STATIC_KW);
        let start = p.current_span();
        let keyword = p.current();
        p.advance(); // Sub | Function | Property
        if keyword == SyntaxKind::PROPERTY_KW
            && (p.at_word("Get") || p.at(SyntaxKind::LET_KW) || p.at(SyntaxKind::SET_KW))
        {
            p.advance();
        }

        if p.at(SyntaxKind::NEW_KW) {
            // VB.NET constructor: `Sub New()`
            let nm = p.open();
            p.advance();
            p.close(nm, SyntaxKind::NAME);
        } else {
            name(p, "procedure");
        }

        if p.at(SyntaxKind::L_PAREN) {
            param_list(p);
        }
        if p.at(SyntaxKind::AS_KW) {
            as_clause(p);
        }
        p.finish_statement();

        parse_block(p, |_| false);

        let what = match keyword {
            SyntaxKind::FUNCTION_KW => "Function",
            SyntaxKind::PROPERTY_KW => "Property",
            _ => "Sub",
        };
        if p.at(SyntaxKind::END_KW) && PROC_KWS.contains(&p.nth(1)) {
            p.advance();
            p.advance();
        } else {
            p.error_with_related(
                &format!("expected `End {what}`"),
                start,
                "procedure starts here",
            );
        }
    });
    p.close(m, SyntaxKind::PROC_DEF);
}

/// `(ByVal a As Long, Optional b = 1, ParamArray rest())`
fn param_list(p: &mut Parser) {
    let m = p.open();
    p.advance(); // (
    if !p.at(SyntaxKind::R_PAREN) {
        loop {
            param(p);
            if !p.eat(SyntaxKind::COMMA) {
                break;
            }
        }
    }
    p.expect(SyntaxKind::R_PAREN);
    p.close(m, SyntaxKind::PARAM_LIST);
}

fn param(p: &mut Parser) {
    let m = p.open();
    p.eat(SyntaxKind::OPTIONAL_KW);
    if !p.eat(SyntaxKind::BYVAL_KW) {
        p.eat(SyntaxKind::BYREF_KW);
    }
    p.eat(SyntaxKind::PARAMARRAY_KW);
    if name(p, "parameter") {
        if p.at(SyntaxKind::L_PAREN) && p.nth(1) == SyntaxKind::R_PAREN {
            p.advance();
            p.advance();
        }
        if p.at(SyntaxKind::AS_KW) {
            as_clause(p);
        }
        if p.eat(SyntaxKind::EQ) && expressions::expr(p).is_none() {
            p.error("expected default value");
        }
    }
    p.close(m, SyntaxKind::PARAM);
}

// ── Field and variable declarations ────────────────────────────────────

/// `[vis] [Dim|Static|Const] decl, decl, ...`
pub(crate) fn dim_stmt(p: &mut Parser, m: MarkOpened) {
    p.rule("dim_stmt", |p| {
        visibility(p);
        while p.at_any(&[SyntaxKind::DIM_KW, SyntaxKind::STATIC_KW, SyntaxKind::CONST_KW]) {
            p.advance();
        }
        loop {
            var_decl(p);
            if !p.eat(SyntaxKind::COMMA) {
                break;
            }
        }
    });
    p.close(m, SyntaxKind::DIM_STMT);
}

/// `[WithEvents] name[(bounds)] [As [New] Type] [= value]`
fn var_decl(p: &mut Parser) {
    let m = p.open();
    p.eat(SyntaxKind::WITHEVENTS_KW);
    if name(p, "variable") {
        if p.at(SyntaxKind::L_PAREN) {
            array_bounds(p);
        }
        if p.at(SyntaxKind::AS_KW) {
            as_clause(p);
        }
        if p.eat(SyntaxKind::EQ) && expressions::expr(p).is_none() {
            p.error("expected initializer");
        }
    }
    p.close(m, SyntaxKind::VAR_DECL);
}

/// `End` followed by a keyword that closes a module-level construct.
pub(crate) fn at_block_end(p: &Parser) -> bool {
    p.at(SyntaxKind::END_KW)
        && matches!(
            p.nth(1),
            SyntaxKind::SUB_KW
                | SyntaxKind::FUNCTION_KW
                | SyntaxKind::PROPERTY_KW
                | SyntaxKind::TYPE_KW
                | SyntaxKind::STRUCTURE_KW
                | SyntaxKind::ENUM_KW
                | SyntaxKind::MODULE_KW
        )
}
