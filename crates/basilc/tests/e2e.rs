//! End-to-end tests for the basilc binary.
//!
//! Each test lays out a project directory, runs `basilc`, and inspects the
//! written files and the exit status.

use std::path::Path;
use std::process::{Command, Output};

const TYPES: &str = "Attribute VB_Name = \"Types\"
Option Explicit

Public Type Buf
    Data(1 To 10) As Long
End Type
";

const PROGRAM: &str = "Attribute VB_Name = \"Program\"
Option Explicit

Sub Main()
    Dim b As Buf
    Fill b.Data, 1
End Sub

Sub Fill(values() As Long, v As Long)
    values(1) = v
End Sub
";

fn basilc(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_basilc"))
        .args(args)
        .output()
        .expect("failed to invoke basilc")
}

fn write_project(dir: &Path, files: &[(&str, &str)]) {
    for (name, text) in files {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, text).unwrap();
    }
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn translate_writes_every_module_and_the_runtime() {
    let tmp = tempfile::tempdir().unwrap();
    let project = tmp.path();
    write_project(project, &[("Types.bas", TYPES), ("src/Program.bas", PROGRAM)]);

    let output = basilc(&["-q", "translate", project.to_str().unwrap(), "--no-color"]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));

    let out = project.join("out/transpiled_files");
    let program = std::fs::read_to_string(out.join("Program.vb")).unwrap();
    assert!(program.contains("Module Program\n"), "{program}");
    assert!(program.contains("    Call b.InitBuf()\n"), "{program}");
    assert!(program.contains("    Fill(b.Data, 1)\n"), "{program}");
    assert!(program.contains("    Console.ReadKey()\nEnd Sub"), "{program}");
    assert!(program.ends_with("End Module\n"));

    let types = std::fs::read_to_string(out.join("Types.vb")).unwrap();
    assert!(types.contains("Public Structure Buf\n"), "{types}");
    assert!(types.contains("ReDim Data(0 To 10)"), "{types}");
    assert!(!types.contains("Attribute"));

    let runtime = std::fs::read_to_string(out.join("Runtime.vb")).unwrap();
    assert!(runtime.contains("Module VbaRuntime"));
}

#[test]
fn previous_output_is_cleared() {
    let tmp = tempfile::tempdir().unwrap();
    let project = tmp.path();
    write_project(project, &[("Program.bas", PROGRAM), ("out/transpiled_files/Stale.vb", "x")]);

    let output = basilc(&["-q", "translate", project.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(!project.join("out/transpiled_files/Stale.vb").exists());
    assert!(project.join("out/transpiled_files/Program.vb").exists());
}

#[test]
fn config_selects_output_and_runtime() {
    let tmp = tempfile::tempdir().unwrap();
    let project = tmp.path();
    write_project(
        project,
        &[
            ("Program.bas", PROGRAM),
            ("support/Helpers.vb", "Module Helpers\nEnd Module\n"),
            (
                "basil.toml",
                "[project]\noutput = \"build\"\n\n[translate]\nruntime = \"support/Helpers.vb\"\n",
            ),
        ],
    );

    let output = basilc(&["-q", "translate", project.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let runtime = std::fs::read_to_string(project.join("build/transpiled_files/Runtime.vb")).unwrap();
    assert_eq!(runtime, "Module Helpers\nEnd Module\n");
}

#[test]
fn syntax_errors_fail_the_run_but_other_files_are_written() {
    let tmp = tempfile::tempdir().unwrap();
    let project = tmp.path();
    write_project(
        project,
        &[("Broken.bas", "Sub A()\n    x = )\nEnd Sub\n"), ("Program.bas", PROGRAM)],
    );

    let output = basilc(&["-q", "translate", project.to_str().unwrap(), "--no-color"]);
    assert!(!output.status.success());
    let stderr = stderr_of(&output);
    assert!(stderr.contains("Broken.bas"), "{stderr}");
    assert!(stderr.contains("error: 1 syntax error in 1 file"), "{stderr}");
    assert!(project.join("out/transpiled_files/Program.vb").exists());
}

#[test]
fn check_reports_json() {
    let tmp = tempfile::tempdir().unwrap();
    let project = tmp.path();
    write_project(project, &[("Broken.bas", "Sub A()\n    x = )\nEnd Sub\n")]);

    let output = basilc(&["-q", "check", project.to_str().unwrap(), "--json"]);
    assert!(!output.status.success());
    let stderr = stderr_of(&output);
    let line = stderr
        .lines()
        .find(|l| l.starts_with('{'))
        .unwrap_or_else(|| panic!("no JSON line in: {stderr}"));
    let value: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(value["file"], "Broken.bas");
    assert_eq!(value["line"], 2);
    assert_eq!(value["severity"], "error");
    assert!(!project.join("out").exists());
}

#[test]
fn check_passes_clean_projects() {
    let tmp = tempfile::tempdir().unwrap();
    write_project(tmp.path(), &[("Types.bas", TYPES), ("Program.bas", PROGRAM)]);
    let output = basilc(&["-q", "check", tmp.path().to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
}

#[test]
fn empty_project_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let output = basilc(&["-q", "translate", tmp.path().to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr_of(&output).contains("No modules"));
}

#[cfg(unix)]
#[test]
fn compiler_builds_the_program_artifact() {
    let tmp = tempfile::tempdir().unwrap();
    let project = tmp.path();
    write_project(
        project,
        &[
            ("Program.bas", PROGRAM),
            (
                "basil.toml",
                "[compiler]\ncommand = \"sh\"\nargs = [\"-c\", \"echo built > '{output}'\"]\n",
            ),
        ],
    );

    let output = basilc(&["-q", "translate", project.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(project.join("out/compilation/Program.exe").exists());
}

#[cfg(unix)]
#[test]
fn compiler_errors_are_written_verbatim() {
    let tmp = tempfile::tempdir().unwrap();
    let project = tmp.path();
    write_project(
        project,
        &[
            ("Program.bas", PROGRAM),
            (
                "basil.toml",
                "[compiler]\ncommand = \"sh\"\nargs = [\"-c\", \"echo 'Program.vb(3,5): error BC30451: boom'; exit 1\"]\n",
            ),
        ],
    );

    let output = basilc(&["-q", "translate", project.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = stderr_of(&output);
    assert!(stderr.contains("Program.vb(3,5): error BC30451: boom"), "{stderr}");
    let errors = std::fs::read_to_string(project.join("out/compilation/errors.txt")).unwrap();
    assert_eq!(errors, "Program.vb(3,5): error BC30451: boom\n");
}

#[cfg(unix)]
#[test]
fn modules_with_syntax_errors_are_still_compiled() {
    let tmp = tempfile::tempdir().unwrap();
    let project = tmp.path();
    write_project(
        project,
        &[
            ("Program.bas", PROGRAM),
            ("Broken.bas", "Sub A()\n    x = )\nEnd Sub\n"),
            (
                "basil.toml",
                "[compiler]\ncommand = \"sh\"\nargs = [\"-c\", \"echo 'Broken.vb(7,9): error BC30201: Expression expected.'; exit 1\"]\n",
            ),
        ],
    );

    let output = basilc(&["-q", "translate", project.to_str().unwrap(), "--no-color"]);
    assert!(!output.status.success());
    let stderr = stderr_of(&output);
    assert!(stderr.contains("error: 1 syntax error in 1 file"), "{stderr}");
    let errors = std::fs::read_to_string(project.join("out/compilation/errors.txt")).unwrap();
    assert_eq!(errors, "Broken.vb(7,9): error BC30201: Expression expected.\n");
}

#[test]
fn assumption_violations_stop_before_writing() {
    let tmp = tempfile::tempdir().unwrap();
    let project = tmp.path();
    write_project(project, &[("Start.bas", "Sub Main(count As Long)\nEnd Sub\n")]);

    let output = basilc(&["-q", "translate", project.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = stderr_of(&output);
    assert!(
        stderr.contains("error: Start.bas:1: cannot translate entry point: entry point takes parameters"),
        "{stderr}"
    );
    assert!(!project.join("out").exists());
}

#[test]
fn no_compile_skips_the_compiler() {
    let tmp = tempfile::tempdir().unwrap();
    let project = tmp.path();
    write_project(
        project,
        &[
            ("Program.bas", PROGRAM),
            ("basil.toml", "[compiler]\ncommand = \"basil-no-such-compiler\"\n"),
        ],
    );

    let output = basilc(&["-q", "translate", project.to_str().unwrap(), "--no-compile"]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(!project.join("out/compilation").exists());
}
