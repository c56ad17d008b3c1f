//! Lexer integration tests over realistic module fragments.
//!
//! Each test renders the token stream as a compact `Kind` (or `Kind(text)`
//! for names and literals) listing and compares it with an inline snapshot.

use basil_common::token::TokenKind;
use basil_lexer::Lexer;
use insta::assert_snapshot;

fn render(source: &str) -> String {
    Lexer::tokenize(source)
        .into_iter()
        .filter(|t| t.kind != TokenKind::Whitespace)
        .map(|t| {
            let text = &source[t.span.start as usize..t.span.end as usize];
            match t.kind {
                TokenKind::Ident
                | TokenKind::IntLiteral
                | TokenKind::FloatLiteral
                | TokenKind::StringLiteral => format!("{:?}({})", t.kind, text),
                kind => format!("{kind:?}"),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[test]
fn type_block_header() {
    assert_snapshot!(render("Private Type Buf"), @"Private Type Ident(Buf) Eof");
}

#[test]
fn array_member_with_bounds() {
    assert_snapshot!(
        render("Data(1 To 10) As Long"),
        @"Ident(Data) LParen IntLiteral(1) To IntLiteral(10) RParen As Ident(Long) Eof"
    );
}

#[test]
fn declare_with_ptrsafe() {
    assert_snapshot!(
        render("Declare PtrSafe Function GetTickCount Lib \"kernel32\" () As Long"),
        @r#"Declare Ident(PtrSafe) Function Ident(GetTickCount) Ident(Lib) StringLiteral("kernel32") LParen RParen As Ident(Long) Eof"#
    );
}

#[test]
fn attribute_line() {
    assert_snapshot!(
        render("Attribute VB_Name = \"Module1\"\n"),
        @r#"Attribute Ident(VB_Name) Eq StringLiteral("Module1") Newline Eof"#
    );
}

#[test]
fn statement_separators_and_comments() {
    assert_snapshot!(
        render("x = 1: y = 2 ' both\n"),
        @"Ident(x) Eq IntLiteral(1) Colon Ident(y) Eq IntLiteral(2) Comment Newline Eof"
    );
}

#[test]
fn member_call_with_bare_arguments() {
    assert_snapshot!(
        render("obj.Add key, value"),
        @"Ident(obj) Dot Ident(Add) Ident(key) Comma Ident(value) Eof"
    );
}

#[test]
fn comparison_operators() {
    assert_snapshot!(
        render("a <> b <= c >= d < e > f"),
        @"Ident(a) NotEq Ident(b) LtEq Ident(c) GtEq Ident(d) Lt Ident(e) Gt Ident(f) Eof"
    );
}

#[test]
fn lossless_on_mixed_module() {
    let source = "VERSION 1.0 CLASS\r\nBEGIN\r\n  MultiUse = -1  'True\r\nEND\r\n\
Option Explicit\r\n\r\nPublic Sub Main_Run()\r\n    Erase arr\r\nEnd Sub\r\n";
    let rebuilt: String = Lexer::tokenize(source)
        .iter()
        .map(|t| &source[t.span.start as usize..t.span.end as usize])
        .collect();
    assert_eq!(rebuilt, source);
}
