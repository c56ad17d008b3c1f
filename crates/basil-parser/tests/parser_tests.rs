//! Parser integration tests.
//!
//! Structure is checked with a compact one-line rendering of the node tree
//! (`KIND(child child)`, tokens omitted) compared against inline snapshots.

use basil_parser::ast::item::{DeclareStmt, ModuleBlock, ProcDef};
use basil_parser::ast::AstNode;
use basil_parser::{parse, SyntaxKind, SyntaxNode};
use insta::assert_snapshot;

fn render(node: &SyntaxNode) -> String {
    let children: Vec<String> = node.children().map(|c| render(&c)).collect();
    if children.is_empty() {
        format!("{:?}", node.kind())
    } else {
        format!("{:?}({})", node.kind(), children.join(" "))
    }
}

fn shape(source: &str) -> String {
    let parse = parse(source);
    assert!(
        parse.ok(),
        "unexpected errors: {:?}",
        parse.errors().iter().map(|e| &e.message).collect::<Vec<_>>()
    );
    render(&parse.syntax())
}

fn statements_of_first_proc(source: &str) -> Vec<SyntaxKind> {
    let parse = parse(source);
    let proc_def = parse
        .syntax()
        .descendants()
        .find_map(ProcDef::cast)
        .expect("procedure");
    proc_def
        .body()
        .expect("body")
        .statements()
        .map(|n| n.kind())
        .collect()
}

// ── Losslessness ───────────────────────────────────────────────────────

#[test]
fn tree_text_reproduces_source() {
    let sources = [
        "",
        "Attribute VB_Name = \"Module1\"\r\nOption Explicit\r\n",
        "Sub Main()\n    If x Then y = 1 Else z = 2 ' c\nEnd Sub\n",
        "Sub Broken(\n    x = = 1\nNext\n",
        "Public Type T\n  a As String * 5 _\n\nEnd Type",
        "x = )(",
    ];
    for source in sources {
        let parse = parse(source);
        assert_eq!(parse.syntax().text().to_string(), source);
    }
}

// ── Module items ───────────────────────────────────────────────────────

#[test]
fn type_block_with_array_member() {
    assert_snapshot!(
        shape("Private Type Buf\n    Data(1 To 10) As Long\nEnd Type\n"),
        @"SOURCE_FILE(TYPE_BLOCK(VISIBILITY NAME TYPE_MEMBER(NAME ARRAY_BOUNDS(RANGE_ARG(LITERAL LITERAL)) AS_CLAUSE(TYPE_REF))))"
    );
}

#[test]
fn class_module_preamble() {
    let source = "VERSION 1.0 CLASS\nBEGIN\n  MultiUse = -1  'True\nEND\n\
Attribute VB_Name = \"Buf\"\nOption Explicit\n";
    assert_snapshot!(
        shape(source),
        @"SOURCE_FILE(MODULE_HEADER MODULE_CONFIG ATTRIBUTE_STMT OPTION_STMT)"
    );
    let tree = parse(source).tree().unwrap();
    assert_eq!(tree.vb_name().as_deref(), Some("Buf"));
    assert_eq!(tree.options().count(), 1);
}

#[test]
fn declare_keeps_ptrsafe_marker() {
    let parse = parse("Private Declare PtrSafe Function GetTickCount Lib \"kernel32\" () As Long\n");
    assert!(parse.ok());
    let declare = parse
        .syntax()
        .descendants()
        .find_map(DeclareStmt::cast)
        .unwrap();
    assert_eq!(declare.ptr_safe().unwrap().text(), "PtrSafe");
    assert_eq!(declare.name().unwrap().text().as_deref(), Some("GetTickCount"));
}

#[test]
fn structured_module_reparses() {
    let source = "Module M\n    Public Structure Buf\n        Public Data() As Long\n\
        Sub InitBuf()\n            ReDim Data(1 To 10)\n        End Sub\n    End Structure\n\
    Dim b As Buf\nEnd Module\n";
    let parse = parse(source);
    assert!(parse.ok(), "{:?}", parse.errors());
    let module = parse
        .syntax()
        .descendants()
        .find_map(ModuleBlock::cast)
        .unwrap();
    assert_eq!(module.name().unwrap().text().as_deref(), Some("M"));
    let ty = module.type_blocks().next().unwrap();
    assert_eq!(ty.members().count(), 1);
    assert_eq!(ty.proc_defs().count(), 1);
    assert!(ty.members().next().unwrap().array_bounds().unwrap().is_unsized());
    let dim = module.dim_stmts().next().unwrap();
    let decl = dim.decls().next().unwrap();
    assert_eq!(decl.as_clause().unwrap().type_name().as_deref(), Some("Buf"));
    assert!(module.end_token().is_some());
}

// ── Statements ─────────────────────────────────────────────────────────

#[test]
fn member_call_without_parentheses() {
    assert_snapshot!(
        shape("Sub Main()\n    obj.Add key, value\nEnd Sub\n"),
        @"SOURCE_FILE(PROC_DEF(NAME PARAM_LIST BLOCK(IMPLICIT_CALL_STMT(MEMBER_ACCESS(NAME_REF) BARE_ARG_LIST(ARG(NAME_REF) ARG(NAME_REF))))))"
    );
}

#[test]
fn redim_with_bound_range() {
    assert_snapshot!(
        shape("ReDim Preserve a(1 To n, 5)\n"),
        @"SOURCE_FILE(REDIM_STMT(REDIM_CLAUSE(CALL_EXPR(NAME_REF ARG_LIST(RANGE_ARG(LITERAL NAME_REF) ARG(LITERAL))))))"
    );
}

#[test]
fn select_case_labels_stay_flat() {
    assert_snapshot!(
        shape("Select Case x\nCase 1 To 5\n    y = 1\nEnd Select\n"),
        @"SOURCE_FILE(SELECT_BLOCK(NAME_REF CASE_CLAUSE(BLOCK(ASSIGN_STMT(NAME_REF LITERAL)))))"
    );
}

#[test]
fn single_line_if_with_else() {
    assert_snapshot!(
        shape("If a Then b = 1 Else Foo 2\n"),
        @"SOURCE_FILE(IF_STMT(NAME_REF BLOCK(ASSIGN_STMT(NAME_REF LITERAL)) ELSE_CLAUSE(BLOCK(IMPLICIT_CALL_STMT(NAME_REF BARE_ARG_LIST(ARG(LITERAL)))))))"
    );
}

#[test]
fn for_loop_bounds_are_not_ranges() {
    assert_snapshot!(
        shape("For i = 1 To 10 Step 2\n    Foo i\nNext i\n"),
        @"SOURCE_FILE(FOR_STMT(NAME_REF LITERAL LITERAL LITERAL BLOCK(IMPLICIT_CALL_STMT(NAME_REF BARE_ARG_LIST(ARG(NAME_REF))))))"
    );
}

#[test]
fn operator_precedence() {
    assert_snapshot!(
        shape("x = a + b * c\n"),
        @"SOURCE_FILE(ASSIGN_STMT(NAME_REF BINARY_EXPR(NAME_REF BINARY_EXPR(NAME_REF NAME_REF))))"
    );
}

#[test]
fn file_io_statements_pass_through() {
    assert_snapshot!(
        shape("Print #1, x; y\nDebug.Print \"a\"; b\n"),
        @"SOURCE_FILE(OTHER_STMT OTHER_STMT)"
    );
}

#[test]
fn labels_and_error_handlers() {
    let kinds = statements_of_first_proc(
        "Sub A()\n    On Error GoTo Fail\n    Exit Sub\nFail:\n    Resume Next\nEnd Sub\n",
    );
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::OTHER_STMT,
            SyntaxKind::EXIT_STMT,
            SyntaxKind::LABEL,
            SyntaxKind::OTHER_STMT,
        ]
    );
}

// ── Error recovery ─────────────────────────────────────────────────────

#[test]
fn bad_statement_does_not_derail_following_procedures() {
    let parse = parse("Sub A()\n    x = )\nEnd Sub\nSub B()\nEnd Sub\n");
    assert_eq!(parse.errors().len(), 1);
    let error = &parse.errors()[0];
    assert_eq!(error.message, "expected expression");
    assert_eq!(error.rule_stack, vec!["proc_def", "statement", "expression"]);
    let procs = parse
        .syntax()
        .children()
        .filter(|n| n.kind() == SyntaxKind::PROC_DEF)
        .count();
    assert_eq!(procs, 2);
}

#[test]
fn unterminated_if_reports_where_it_started() {
    let source = "Sub A()\n    If x Then\n        y = 1\nEnd Sub\n";
    let parse = parse(source);
    assert_eq!(parse.errors().len(), 1);
    let error = &parse.errors()[0];
    assert_eq!(error.message, "expected `End If`");
    assert_eq!(error.symbol(source), "End");
    let (related, span) = error.related.clone().unwrap();
    assert_eq!(related, "`If` starts here");
    assert_eq!(&source[span.start as usize..span.end as usize], "If");
    // The procedure still closes.
    let proc_def = parse.syntax().descendants().find_map(ProcDef::cast).unwrap();
    assert!(proc_def.end_token().is_some());
}

#[test]
fn stray_next_is_reported() {
    let parse = parse("Sub A()\n    Next\nEnd Sub\n");
    assert_eq!(parse.errors().len(), 1);
    assert_eq!(parse.errors()[0].message, "unexpected `Next`");
}

#[test]
fn attribute_inside_procedure_is_a_statement() {
    let source = "Public Property Get Item(i As Long) As Long\n    Attribute Item.VB_UserMemId = 0\n    Item = i\nEnd Property\n";
    assert!(parse(source).ok());
    let kinds = statements_of_first_proc(source);
    assert_eq!(
        kinds,
        vec![SyntaxKind::ATTRIBUTE_STMT, SyntaxKind::ASSIGN_STMT]
    );
}
