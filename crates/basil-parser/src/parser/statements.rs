//! Statement parsing: blocks, control flow, assignments and calls.

use super::expressions::{self, at_expr_start, bare_arg_list, call_target};
use super::items::{as_clause, at_block_end, parse_declaration};
use super::Parser;
use crate::syntax_kind::SyntaxKind;

/// Statements from the old file I/O and event surface that have no
/// expression grammar (`Print #1, x; y`, `Line Input #1, s`, `Name a As b`).
const LEGACY_STATEMENT_WORDS: &[&str] = &[
    "print",
    "open",
    "close",
    "input",
    "line",
    "get",
    "put",
    "write",
    "seek",
    "lock",
    "unlock",
    "width",
    "name",
    "lset",
    "rset",
    "raiseevent",
    "implements",
    "event",
    "gosub",
    "error",
    "stop",
];

/// Parse a statement list until `stop` matches, a procedure-level `End`
/// is reached, or the file ends.
///
/// Terminators that belong to no open construct (`Next` without `For`) are
/// reported and skipped.
pub(crate) fn parse_block(p: &mut Parser, stop: fn(&Parser) -> bool) {
    p.eat_separators();
    let m = p.open();
    loop {
        p.eat_separators();
        if p.at(SyntaxKind::EOF) || at_block_end(p) || stop(p) {
            break;
        }
        if at_stray_terminator(p) {
            let message = if p.at(SyntaxKind::END_KW) {
                format!("unexpected `End {}`", p.nth_text(1))
            } else {
                format!("unexpected `{}`", p.current_text())
            };
            error_statement(p, &message);
            continue;
        }
        if at_label(p) {
            label(p);
            continue;
        }
        parse_statement(p);
        p.finish_statement();
    }
    p.close(m, SyntaxKind::BLOCK);
}

fn at_stray_terminator(p: &Parser) -> bool {
    match p.current() {
        SyntaxKind::ELSE_KW
        | SyntaxKind::ELSEIF_KW
        | SyntaxKind::CASE_KW
        | SyntaxKind::LOOP_KW
        | SyntaxKind::NEXT_KW
        | SyntaxKind::WEND_KW => true,
        SyntaxKind::END_KW => matches!(
            p.nth(1),
            SyntaxKind::IF_KW | SyntaxKind::WITH_KW | SyntaxKind::SELECT_KW | SyntaxKind::WHILE_KW
        ),
        _ => false,
    }
}

/// Record an error and wrap the rest of the statement in an ERROR_NODE.
fn error_statement(p: &mut Parser, message: &str) {
    p.error(message);
    let m = p.open();
    p.skip_to_eos();
    p.close(m, SyntaxKind::ERROR_NODE);
}

/// `ErrHandler:` or a line number, first on its line.
fn at_label(p: &Parser) -> bool {
    if !p.at_line_start() {
        return false;
    }
    match p.current() {
        SyntaxKind::IDENT => p.nth(1) == SyntaxKind::COLON,
        SyntaxKind::INT_LITERAL => true,
        _ => false,
    }
}

fn label(p: &mut Parser) {
    let m = p.open();
    let is_name = p.at(SyntaxKind::IDENT);
    p.advance();
    if is_name {
        p.advance(); // :
    }
    p.close(m, SyntaxKind::LABEL);
}

/// Parse a single statement.
pub(crate) fn parse_statement(p: &mut Parser) {
    p.rule("statement", |p| match p.current() {
        SyntaxKind::PUBLIC_KW
        | SyntaxKind::PRIVATE_KW
        | SyntaxKind::GLOBAL_KW
        | SyntaxKind::FRIEND_KW
        | SyntaxKind::DIM_KW
        | SyntaxKind::STATIC_KW
        | SyntaxKind::CONST_KW => parse_declaration(p),
        SyntaxKind::ATTRIBUTE_KW => attribute_stmt(p),
        SyntaxKind::REDIM_KW => redim_stmt(p),
        SyntaxKind::ERASE_KW => erase_stmt(p),
        SyntaxKind::CALL_KW => call_stmt(p),
        SyntaxKind::LET_KW | SyntaxKind::SET_KW => {
            let m = p.open();
            p.advance(); // Let | Set
            assignment_rest(p, m);
        }
        SyntaxKind::IF_KW => if_stmt(p),
        SyntaxKind::FOR_KW if p.nth(1) == SyntaxKind::EACH_KW => for_each_stmt(p),
        SyntaxKind::FOR_KW => for_stmt(p),
        SyntaxKind::DO_KW => do_loop(p),
        SyntaxKind::WHILE_KW => while_loop(p),
        SyntaxKind::WITH_KW => with_block(p),
        SyntaxKind::SELECT_KW => select_block(p),
        SyntaxKind::EXIT_KW => keyword_pair(p, SyntaxKind::EXIT_STMT),
        SyntaxKind::GOTO_KW => keyword_pair(p, SyntaxKind::GOTO_STMT),
        SyntaxKind::ON_KW | SyntaxKind::RESUME_KW | SyntaxKind::RETURN_KW | SyntaxKind::HASH => {
            other_stmt(p)
        }
        SyntaxKind::END_KW if p.nth(1).is_statement_end() => {
            let m = p.open();
            p.advance();
            p.close(m, SyntaxKind::END_STMT);
        }
        SyntaxKind::IDENT | SyntaxKind::ME_KW | SyntaxKind::DOT | SyntaxKind::BANG => {
            name_led_stmt(p)
        }
        _ => error_statement(p, "expected statement"),
    });
}

/// `Attribute Item.VB_UserMemId = 0` inside a procedure.
fn attribute_stmt(p: &mut Parser) {
    let m = p.open();
    p.skip_to_eos();
    p.close(m, SyntaxKind::ATTRIBUTE_STMT);
}

/// A statement passed through as tokens.
fn other_stmt(p: &mut Parser) {
    let m = p.open();
    p.skip_to_eos();
    p.close(m, SyntaxKind::OTHER_STMT);
}

/// `Exit Sub`, `GoTo label`
fn keyword_pair(p: &mut Parser, kind: SyntaxKind) {
    let m = p.open();
    p.advance();
    if !p.at_eos() {
        p.advance();
    }
    p.close(m, kind);
}

// ── Name-led statements ────────────────────────────────────────────────

fn is_legacy_statement(p: &Parser) -> bool {
    if !p.at(SyntaxKind::IDENT) {
        return false;
    }
    let word = p.current_text().to_ascii_lowercase();
    let keyword_like = LEGACY_STATEMENT_WORDS.contains(&word.as_str())
        || (word.len() == 6 && word.starts_with("def"));
    keyword_like
        && !matches!(
            p.nth(1),
            SyntaxKind::EQ | SyntaxKind::DOT | SyntaxKind::BANG | SyntaxKind::L_PAREN
        )
}

/// Assignment, implicit call or expression statement starting with a name.
fn name_led_stmt(p: &mut Parser) {
    if is_legacy_statement(p) || p.statement_contains(&[SyntaxKind::HASH, SyntaxKind::SEMICOLON])
    {
        other_stmt(p);
        return;
    }

    let m = p.open();
    if call_target(p).is_none() {
        p.close(m, SyntaxKind::ERROR_NODE);
        return;
    }

    if p.at(SyntaxKind::EQ) {
        p.advance();
        if expressions::expr(p).is_none() {
            p.error("expected expression");
        }
        p.close(m, SyntaxKind::ASSIGN_STMT);
    } else if p.at_eos() || p.at(SyntaxKind::ELSE_KW) {
        p.close(m, SyntaxKind::EXPR_STMT);
    } else if at_expr_start(p) || p.at(SyntaxKind::COMMA) {
        bare_arg_list(p);
        p.close(m, SyntaxKind::IMPLICIT_CALL_STMT);
    } else {
        p.skip_to_eos();
        p.close(m, SyntaxKind::OTHER_STMT);
    }
}

/// Remainder of `Let x = e` / `Set x = e` after the keyword.
fn assignment_rest(p: &mut Parser, m: super::MarkOpened) {
    if call_target(p).is_some() && p.expect(SyntaxKind::EQ) && expressions::expr(p).is_none() {
        p.error("expected expression");
    }
    p.close(m, SyntaxKind::ASSIGN_STMT);
}

/// `Call Foo(a, b)`
fn call_stmt(p: &mut Parser) {
    let m = p.open();
    p.advance(); // Call
    if expressions::expr(p).is_none() {
        p.error("expected procedure name");
    }
    p.close(m, SyntaxKind::CALL_STMT);
}

// ── Arrays ─────────────────────────────────────────────────────────────

/// `ReDim [Preserve] a(1 To n) [As T], b(m)`
fn redim_stmt(p: &mut Parser) {
    let m = p.open();
    p.advance(); // ReDim
    if p.at_word("Preserve") {
        p.advance();
    }
    loop {
        let cm = p.open();
        if call_target(p).is_some() && p.at(SyntaxKind::AS_KW) {
            as_clause(p);
        }
        p.close(cm, SyntaxKind::REDIM_CLAUSE);
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.close(m, SyntaxKind::REDIM_STMT);
}

/// `Erase a, b`
fn erase_stmt(p: &mut Parser) {
    let m = p.open();
    p.advance(); // Erase
    loop {
        if expressions::expr(p).is_none() {
            break;
        }
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.close(m, SyntaxKind::ERASE_STMT);
}

// ── Conditionals ───────────────────────────────────────────────────────

fn if_stmt(p: &mut Parser) {
    p.rule("if_stmt", |p| {
        let m = p.open();
        let start = p.current_span();
        p.advance(); // If
        if expressions::expr(p).is_none() {
            p.error("expected condition");
        }
        p.expect(SyntaxKind::THEN_KW);

        if !p.at(SyntaxKind::NEWLINE) && !p.at(SyntaxKind::EOF) {
            single_line_if(p, m);
            return;
        }

        parse_block(p, at_if_continuation);
        loop {
            if p.at(SyntaxKind::ELSEIF_KW) {
                let cm = p.open();
                p.advance(); // ElseIf
                if expressions::expr(p).is_none() {
                    p.error("expected condition");
                }
                p.expect(SyntaxKind::THEN_KW);
                p.finish_statement();
                parse_block(p, at_if_continuation);
                p.close(cm, SyntaxKind::ELSEIF_CLAUSE);
            } else if p.at(SyntaxKind::ELSE_KW) {
                let cm = p.open();
                p.advance(); // Else
                parse_block(p, |p| p.at_end_of(SyntaxKind::IF_KW));
                p.close(cm, SyntaxKind::ELSE_CLAUSE);
            } else {
                break;
            }
        }

        if p.at_end_of(SyntaxKind::IF_KW) {
            p.advance();
            p.advance();
        } else {
            p.error_with_related("expected `End If`", start, "`If` starts here");
        }
        p.close(m, SyntaxKind::IF_BLOCK);
    });
}

fn at_if_continuation(p: &Parser) -> bool {
    p.at(SyntaxKind::ELSEIF_KW) || p.at(SyntaxKind::ELSE_KW) || p.at_end_of(SyntaxKind::IF_KW)
}

/// `If c Then a: b Else d` with everything on one line.
fn single_line_if(p: &mut Parser, m: super::MarkOpened) {
    inline_block(p);
    if p.at(SyntaxKind::ELSE_KW) {
        let cm = p.open();
        p.advance(); // Else
        inline_block(p);
        p.close(cm, SyntaxKind::ELSE_CLAUSE);
    }
    p.close(m, SyntaxKind::IF_STMT);
}

fn inline_block(p: &mut Parser) {
    let m = p.open();
    loop {
        if p.at(SyntaxKind::NEWLINE) || p.at(SyntaxKind::EOF) || p.at(SyntaxKind::ELSE_KW) {
            break;
        }
        if p.eat(SyntaxKind::COLON) {
            continue;
        }
        parse_statement(p);
        if !p.at_eos() && !p.at(SyntaxKind::ELSE_KW) {
            let message = format!("unexpected `{}`", p.current_text());
            p.error(&message);
            let em = p.open();
            while !p.at_eos() && !p.at(SyntaxKind::ELSE_KW) {
                p.advance();
            }
            p.close(em, SyntaxKind::ERROR_NODE);
        }
    }
    p.close(m, SyntaxKind::BLOCK);
}

/// `Select Case x` followed by `Case` clauses. Case labels are kept as
/// tokens.
fn select_block(p: &mut Parser) {
    p.rule("select_block", |p| {
        let m = p.open();
        let start = p.current_span();
        p.advance(); // Select
        p.expect(SyntaxKind::CASE_KW);
        if expressions::expr(p).is_none() {
            p.error("expected expression");
        }
        p.finish_statement();

        loop {
            p.eat_separators();
            if !p.at(SyntaxKind::CASE_KW) {
                break;
            }
            let cm = p.open();
            p.advance(); // Case
            p.skip_to_eos();
            parse_block(p, |p| p.at(SyntaxKind::CASE_KW) || p.at_end_of(SyntaxKind::SELECT_KW));
            p.close(cm, SyntaxKind::CASE_CLAUSE);
        }

        if p.at_end_of(SyntaxKind::SELECT_KW) {
            p.advance();
            p.advance();
        } else {
            p.error_with_related("expected `End Select`", start, "`Select` starts here");
        }
        p.close(m, SyntaxKind::SELECT_BLOCK);
    });
}

// ── Loops ──────────────────────────────────────────────────────────────

/// `For i = a To b [Step c] ... Next [i]`
fn for_stmt(p: &mut Parser) {
    p.rule("for_stmt", |p| {
        let m = p.open();
        let start = p.current_span();
        p.advance(); // For
        if call_target(p).is_some() {
            if p.at(SyntaxKind::AS_KW) {
                as_clause(p);
            }
            if p.expect(SyntaxKind::EQ) {
                if expressions::expr(p).is_none() {
                    p.error("expected start value");
                }
                if p.expect(SyntaxKind::TO_KW) && expressions::expr(p).is_none() {
                    p.error("expected end value");
                }
                if p.eat(SyntaxKind::STEP_KW) && expressions::expr(p).is_none() {
                    p.error("expected step value");
                }
            }
        }
        p.finish_statement();
        parse_block(p, |p| p.at(SyntaxKind::NEXT_KW));
        next_clause(p, start);
        p.close(m, SyntaxKind::FOR_STMT);
    });
}

/// `For Each x In xs ... Next [x]`
fn for_each_stmt(p: &mut Parser) {
    p.rule("for_each_stmt", |p| {
        let m = p.open();
        let start = p.current_span();
        p.advance(); // For
        p.advance(); // Each
        if call_target(p).is_some() {
            if p.at(SyntaxKind::AS_KW) {
                as_clause(p);
            }
            if p.expect(SyntaxKind::IN_KW) && expressions::expr(p).is_none() {
                p.error("expected collection");
            }
        }
        p.finish_statement();
        parse_block(p, |p| p.at(SyntaxKind::NEXT_KW));
        next_clause(p, start);
        p.close(m, SyntaxKind::FOR_EACH_STMT);
    });
}

fn next_clause(p: &mut Parser, start: basil_common::span::Span) {
    if p.eat(SyntaxKind::NEXT_KW) {
        // `Next`, `Next i` or `Next j, i`
        while p.at(SyntaxKind::IDENT) || p.at(SyntaxKind::COMMA) {
            p.advance();
        }
    } else {
        p.error_with_related("expected `Next`", start, "loop starts here");
    }
}

/// `Do [While|Until c] ... Loop [While|Until c]`
fn do_loop(p: &mut Parser) {
    p.rule("do_loop", |p| {
        let m = p.open();
        let start = p.current_span();
        p.advance(); // Do
        loop_condition(p);
        p.finish_statement();
        parse_block(p, |p| p.at(SyntaxKind::LOOP_KW));
        if p.eat(SyntaxKind::LOOP_KW) {
            loop_condition(p);
        } else {
            p.error_with_related("expected `Loop`", start, "`Do` starts here");
        }
        p.close(m, SyntaxKind::DO_LOOP);
    });
}

fn loop_condition(p: &mut Parser) {
    if (p.eat(SyntaxKind::WHILE_KW) || p.eat(SyntaxKind::UNTIL_KW))
        && expressions::expr(p).is_none()
    {
        p.error("expected condition");
    }
}

/// `While c ... Wend` (or `End While`)
fn while_loop(p: &mut Parser) {
    p.rule("while_loop", |p| {
        let m = p.open();
        let start = p.current_span();
        p.advance(); // While
        if expressions::expr(p).is_none() {
            p.error("expected condition");
        }
        p.finish_statement();
        parse_block(p, |p| p.at(SyntaxKind::WEND_KW) || p.at_end_of(SyntaxKind::WHILE_KW));
        if p.at_end_of(SyntaxKind::WHILE_KW) {
            p.advance();
            p.advance();
        } else if !p.eat(SyntaxKind::WEND_KW) {
            p.error_with_related("expected `Wend`", start, "`While` starts here");
        }
        p.close(m, SyntaxKind::WHILE_LOOP);
    });
}

/// `With obj ... End With`
fn with_block(p: &mut Parser) {
    p.rule("with_block", |p| {
        let m = p.open();
        let start = p.current_span();
        p.advance(); // With
        if expressions::expr(p).is_none() {
            p.error("expected expression");
        }
        p.finish_statement();
        parse_block(p, |p| p.at_end_of(SyntaxKind::WITH_KW));
        if p.at_end_of(SyntaxKind::WITH_KW) {
            p.advance();
            p.advance();
        } else {
            p.error_with_related("expected `End With`", start, "`With` starts here");
        }
        p.close(m, SyntaxKind::WITH_BLOCK);
    });
}
