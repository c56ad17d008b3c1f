//! End-to-end tests of the two-pass translation.

use basil_rewrite::{translate, ModuleSource, TranslateOptions, Translation};
use insta::assert_snapshot;

fn options() -> TranslateOptions {
    TranslateOptions {
        imports: vec!["System".to_string()],
        ..TranslateOptions::default()
    }
}

fn run(sources: &[(&str, &str)]) -> Translation {
    let sources: Vec<ModuleSource> = sources
        .iter()
        .map(|(path, text)| ModuleSource::new(*path, *text))
        .collect();
    translate(&sources, &options()).unwrap()
}

fn text_of<'a>(translation: &'a Translation, path: &str) -> &'a str {
    &translation
        .modules
        .iter()
        .find(|m| m.path.to_str() == Some(path))
        .unwrap()
        .text
}

const TYPES: &str = "Attribute VB_Name = \"Types\"
Option Explicit

Public Type Buf
    Data(1 To 10) As Long
End Type

Public Type Point
    X As Long
    Y As Long
End Type
";

const PROGRAM: &str = "Attribute VB_Name = \"Program\"
Option Explicit

Sub Main()
    Dim b As Buf
    Dim p As Point
    Fill b.Data, 1
End Sub

Sub Fill(values() As Long, v As Long)
    values(1) = v
End Sub
";

#[test]
fn record_types_and_their_initializers() {
    let translation = run(&[("Types.bas", TYPES), ("Program.bas", PROGRAM)]);
    assert!(!translation.has_errors(), "{:?}", translation.errors);
    assert_eq!(translation.registry.names(), vec!["Buf"]);

    assert_snapshot!(text_of(&translation, "Types.bas").trim_end(), @r###"
    Option Explicit
    Imports System

    Module Types

    Public Structure Buf
        Public Data() As Long
        Sub InitBuf()
            ReDim Data(0 To 10)
        End Sub
    End Structure

    Public Structure Point
        Public X As Long
        Public Y As Long
    End Structure
    End Module
    "###);
}

#[test]
fn entry_point_module() {
    let translation = run(&[("Types.bas", TYPES), ("Program.bas", PROGRAM)]);
    assert_eq!(translation.program_name(), Some("Program"));

    assert_snapshot!(text_of(&translation, "Program.bas").trim_end(), @r###"
    Option Explicit
    Imports System

    Module Program

    Sub Main()
        System.Globalization.CultureInfo.CurrentCulture = System.Globalization.CultureInfo.InvariantCulture
        Dim sw As System.Diagnostics.Stopwatch = System.Diagnostics.Stopwatch.StartNew()
        Dim b As Buf
        Call b.InitBuf()
        Dim p As Point
        Fill(b.Data, 1)
        sw.Stop()
        Console.WriteLine($"Time elapsed {sw.Elapsed}")
        Console.WriteLine("Press any key to exit the program")
        Console.ReadKey()
    End Sub

    Sub Fill(values() As Long, v As Long)
        values(1) = v
    End Sub
    End Module
    "###);
}

#[test]
fn module_fields_get_a_constructor() {
    let translation = run(&[
        ("Types.bas", TYPES),
        (
            "State.bas",
            "Option Explicit\nPublic Buffers(1 To 4) As Buf\nPrivate Current As Buf\nPrivate Origin As Point\n",
        ),
    ]);
    let text = text_of(&translation, "State.bas");
    let expected = concat!(
        "Public Buffers(0 To 4) As Buf\n",
        "Private Current As Buf\n",
        "Private Origin As Point\n",
        "    Sub New()\n",
        "        For Index As Integer = 0 To Buffers.Length - 1\n",
        "            Call Buffers(Index).InitBuf()\n",
        "        Next\n",
        "        Call Current.InitBuf()\n",
        "    End Sub\n",
        "End Module\n",
    );
    assert!(text.ends_with(expected), "{text}");
}

#[test]
fn types_are_matched_across_files_ignoring_case() {
    let translation = run(&[
        ("Types.bas", TYPES),
        ("Use.bas", "Sub Work()\n    Dim x As BUF\nEnd Sub\n"),
    ]);
    assert!(text_of(&translation, "Use.bas").contains("    Dim x As BUF\n    Call x.InitBuf()\n"));
}

#[test]
fn files_without_record_types_only_see_range_edits() {
    let source = "Option Explicit\nSub A()\n    Foo(1 To x)\n    Foo(2 To x)\n    ReDim a(1 To n)\nEnd Sub\n";
    let translation = run(&[("Calc.bas", source)]);
    assert!(translation.registry.is_empty());
    let text = text_of(&translation, "Calc.bas");
    assert!(text.contains("    Foo(0 To x)\n    Foo(2 To x)\n    ReDim a(0 To n)\n"));
}

#[test]
fn translation_is_stable_on_its_own_output() {
    let first = run(&[("Calc.bas", "Sub A()\n    Foo(1 To x)\nEnd Sub\n")]);
    let once = text_of(&first, "Calc.bas").to_string();
    let registry = basil_rewrite::InitializerRegistry::default();
    let again = basil_rewrite::normalize_module(std::path::Path::new("Calc.vb"), &once, &registry);
    assert_eq!(again.rewritten_ranges, 0);
    assert_eq!(again.text, once);
}

#[test]
fn syntax_errors_do_not_stop_other_files() {
    let translation = run(&[
        ("Bad.bas", "Sub A()\n    x = )\nEnd Sub\n"),
        ("Good.bas", "Sub B()\n    Foo a\nEnd Sub\n"),
    ]);
    assert_eq!(translation.errors.len(), 1);
    assert_eq!(translation.errors[0].file, "Bad.bas");
    assert!(text_of(&translation, "Good.bas").contains("    Foo(a)\n"));
    assert!(text_of(&translation, "Bad.bas").contains("End Module"));
}

#[test]
fn declare_and_erase() {
    let source = "Option Explicit\n\
Private Declare PtrSafe Sub Sleep Lib \"kernel32\" (ByVal ms As Long)\n\
Sub A()\n    Erase cache\nEnd Sub\n";
    let text = run(&[("Native.bas", source)]).modules.remove(0).text;
    assert!(text.contains("Private Declare Sub Sleep Lib \"kernel32\" (ByVal ms As Long)\n"));
    assert!(text.contains("    Array.Clear(cache, 0, cache.Length)\n"));
}

#[test]
fn assumption_violation_aborts_the_run() {
    let sources = vec![
        ModuleSource::new("Types.bas", TYPES),
        ModuleSource::new("Start.bas", "Sub Main(args As String)\nEnd Sub\n"),
    ];
    let err = translate(&sources, &options()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Start.bas:1: cannot translate entry point: entry point takes parameters"
    );
}

#[test]
fn procedure_attributes_are_dropped() {
    let source = "Attribute VB_Name = \"Items\"\n\
Public Property Get Item(i As Long) As Long\n    Attribute Item.VB_UserMemId = 0\n    Item = i\nEnd Property\n";
    let translation = run(&[("Items.cls", source)]);
    assert!(!translation.has_errors(), "{:?}", translation.errors);
    let text = text_of(&translation, "Items.cls");
    assert!(!text.contains("Attribute"), "{text}");
    assert!(
        text.contains("Public Property Get Item(i As Long) As Long\n    Item = i\nEnd Property\n"),
        "{text}"
    );
}

#[test]
fn local_initializer_precedes_a_use_on_the_same_line() {
    let translation = run(&[
        ("Types.bas", TYPES),
        ("Use.bas", "Sub Work()\n    Dim b As Buf: b.Data(1) = 2\nEnd Sub\n"),
    ]);
    let text = text_of(&translation, "Use.bas");
    let init = text.find("Call b.InitBuf()").unwrap();
    let first_use = text.find("b.Data(1) = 2").unwrap();
    assert!(init < first_use, "{text}");
}
