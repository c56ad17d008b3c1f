//! Pass 1: the dialect fixer.
//!
//! One preorder walk over a module's CST records text edits against the
//! original source:
//!
//! - module header, config block and `Attribute` lines are deleted, and the
//!   `Imports` preamble plus `Module <name>` ... `End Module` wrap the rest;
//! - `Type` blocks become `Structure` blocks whose members carry the block's
//!   visibility; members with array bounds lose them to a synthesized
//!   `Init<Type>` procedure;
//! - procedure calls without parentheses get them;
//! - `PtrSafe` is dropped from `Declare`;
//! - `Erase a` becomes `Array.Clear(a, 0, a.Length)`;
//! - the entry-point `Sub` is renamed to `Main` and instrumented.
//!
//! The walk tracks the stack of open type blocks so member rules know which
//! initializer to feed.

use std::path::{Path, PathBuf};

use basil_common::span::Span;
use basil_parser::ast::item::{DeclareStmt, ProcDef, SourceFile, TypeBlock, TypeMember};
use basil_parser::ast::stmt::{EraseStmt, ImplicitCallStmt};
use basil_parser::ast::{child_token, AstNode};
use basil_parser::cst::{first_significant_token, node_span, significant_span, token_span};
use basil_parser::{Parse, SyntaxKind, SyntaxNode};
use rowan::WalkEvent;

use crate::edit::EditList;
use crate::error::TranslateError;
use crate::initializer::StructureInitializer;
use crate::layout::Layout;
use crate::options::TranslateOptions;

/// Canonical name the entry-point procedure is renamed to.
pub const ENTRY_POINT_NAME: &str = "Main";

const CULTURE_PIN: &str = "System.Globalization.CultureInfo.CurrentCulture = \
System.Globalization.CultureInfo.InvariantCulture";
const STOPWATCH_START: &str =
    "Dim sw As System.Diagnostics.Stopwatch = System.Diagnostics.Stopwatch.StartNew()";
const STOPWATCH_STOP: &str = "sw.Stop()";
const ELAPSED_REPORT: &str = "Console.WriteLine($\"Time elapsed {sw.Elapsed}\")";
const EXIT_PROMPT: &str = "Console.WriteLine(\"Press any key to exit the program\")";
const EXIT_PAUSE: &str = "Console.ReadKey()";

/// Pass 1 output for one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedModule {
    pub path: PathBuf,
    /// `VB_Name` attribute value, else the file stem.
    pub module_name: String,
    pub is_entry_point: bool,
    pub text: String,
    /// Record types of this module that got an `Init<Type>` procedure.
    pub initialized_types: Vec<String>,
}

/// Run the dialect fixer over one parsed module.
///
/// Syntax errors in `parse` are not fatal: the fixer rewrites whatever
/// structure the parser recovered. Only a clean parse that still lacks a
/// construct a rule depends on fails with
/// [`TranslateError::AssumptionViolation`].
pub fn fix_module(
    path: &Path,
    source: &str,
    parse: &Parse,
    options: &TranslateOptions,
) -> Result<FixedModule, TranslateError> {
    let root = parse.syntax();
    let module_name = SourceFile::cast(root.clone())
        .and_then(|file| file.vb_name())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| file_stem(path));

    let mut fixer = DialectFixer {
        path,
        layout: Layout::new(source),
        options,
        strict: parse.ok(),
        edits: EditList::new(),
        open_types: Vec::new(),
        initialized_types: Vec::new(),
        is_entry_point: false,
    };

    for event in root.preorder() {
        match event {
            WalkEvent::Enter(node) => fixer.enter(&node)?,
            WalkEvent::Leave(node) => fixer.leave(&node),
        }
    }
    fixer.wrap_module(&root, &module_name);

    tracing::debug!(
        file = %path.display(),
        module = %module_name,
        edits = fixer.edits.len(),
        "dialect fixer done"
    );

    Ok(FixedModule {
        path: path.to_path_buf(),
        text: fixer.edits.apply(source),
        module_name,
        is_entry_point: fixer.is_entry_point,
        initialized_types: fixer.initialized_types,
    })
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Module1".to_string())
}

/// A `Type` block being walked.
struct OpenType {
    name: Option<String>,
    /// Visibility every member receives.
    visibility: String,
    initializer: StructureInitializer,
}

struct DialectFixer<'a> {
    path: &'a Path,
    layout: Layout<'a>,
    options: &'a TranslateOptions,
    /// Whether the module parsed cleanly; missing pieces are then violations.
    strict: bool,
    edits: EditList,
    open_types: Vec<OpenType>,
    initialized_types: Vec<String>,
    is_entry_point: bool,
}

impl DialectFixer<'_> {
    fn enter(&mut self, node: &SyntaxNode) -> Result<(), TranslateError> {
        match node.kind() {
            SyntaxKind::MODULE_HEADER | SyntaxKind::MODULE_CONFIG => {
                if node.parent().is_some_and(|p| p.kind() == SyntaxKind::SOURCE_FILE) {
                    self.delete_line(node);
                }
            }
            SyntaxKind::ATTRIBUTE_STMT => self.delete_line(node),
            SyntaxKind::VISIBILITY => self.visibility(node),
            SyntaxKind::TYPE_BLOCK => self.enter_type(node)?,
            SyntaxKind::TYPE_MEMBER => self.type_member(node)?,
            SyntaxKind::DECLARE_STMT => self.declare(node),
            SyntaxKind::PROC_DEF => self.procedure(node)?,
            SyntaxKind::IMPLICIT_CALL_STMT => self.implicit_call(node),
            SyntaxKind::ERASE_STMT => self.erase(node),
            _ => {}
        }
        Ok(())
    }

    fn leave(&mut self, node: &SyntaxNode) {
        if node.kind() == SyntaxKind::TYPE_BLOCK {
            self.leave_type(node);
        }
    }

    /// Fail in a clean module, skip the construct otherwise.
    fn violation(
        &self,
        node: &SyntaxNode,
        construct: &'static str,
        message: &str,
    ) -> Result<(), TranslateError> {
        let line = self.layout.line_of(node_span(node).start);
        if self.strict {
            return Err(TranslateError::assumption(self.path, construct, line, message));
        }
        tracing::warn!(file = %self.path.display(), line, construct, "{message}; skipped");
        Ok(())
    }

    // ── Module framing ─────────────────────────────────────────────────

    /// Delete `node` with the rest of its last line. A statement sharing its
    /// line with earlier code keeps the line break.
    fn delete_line(&mut self, node: &SyntaxNode) {
        let mut span = node_span(node);
        let whole_line = self.layout.starts_line(span.start);
        if whole_line {
            span.start -= self.layout.indent_at(span.start).len() as u32;
        }
        let mut next = node.last_token().and_then(|t| t.next_token());
        while let Some(token) = next {
            match token.kind() {
                kind if kind.is_trivia() => span = span.merge(token_span(&token)),
                SyntaxKind::NEWLINE if whole_line => {
                    span = span.merge(token_span(&token));
                    break;
                }
                _ => break,
            }
            next = token.next_token();
        }
        self.edits.delete(span);
    }

    /// Open the module after the `Option` lines and close it at the end.
    fn wrap_module(&mut self, root: &SyntaxNode, module_name: &str) {
        let imports: String = self
            .options
            .imports
            .iter()
            .map(|import| format!("Imports {import}\n"))
            .collect();

        let last_option = root
            .children()
            .filter(|n| n.kind() == SyntaxKind::OPTION_STMT)
            .last();
        match last_option {
            Some(option) => {
                let text = format!("\n{imports}\nModule {module_name}");
                self.edits.insert_after(node_span(&option).end, text);
            }
            None if self.layout.source().is_empty() => {
                let text = format!("{imports}\nModule {module_name}\nEnd Module\n");
                self.edits.insert_before(0, text);
                return;
            }
            None => {
                let text = format!("{imports}\nModule {module_name}\n");
                self.edits.insert_before(0, text);
            }
        }

        let source = self.layout.source();
        let close = if source.ends_with('\n') {
            "End Module\n"
        } else {
            "\nEnd Module\n"
        };
        self.edits.insert_after(source.len() as u32, close);
    }

    /// `Global` is spelled `Public` in the target dialect.
    fn visibility(&mut self, node: &SyntaxNode) {
        if let Some(global) = child_token(node, SyntaxKind::GLOBAL_KW) {
            self.edits.replace(token_span(&global), "Public");
        }
    }

    // ── Record types ───────────────────────────────────────────────────

    fn enter_type(&mut self, node: &SyntaxNode) -> Result<(), TranslateError> {
        let Some(block) = TypeBlock::cast(node.clone()) else {
            return Ok(());
        };

        if let Some(keyword) = block.keyword().filter(|k| k.kind() == SyntaxKind::TYPE_KW) {
            self.edits.replace(token_span(&keyword), "Structure");
        }
        if let (Some(end), Some(keyword)) = (block.end_token(), block.end_keyword()) {
            if keyword.kind() == SyntaxKind::TYPE_KW {
                let span = token_span(&end).merge(token_span(&keyword));
                self.edits.replace(span, "End Structure");
            }
        }

        let name = block.name().and_then(|n| n.text());
        if name.is_none() {
            self.violation(node, "type block", "type block has no name")?;
        }
        let visibility = block
            .visibility()
            .and_then(|v| v.text())
            .map(|v| target_visibility(&v))
            .unwrap_or_else(|| "Public".to_string());

        self.open_types.push(OpenType {
            initializer: StructureInitializer::new(name.clone().unwrap_or_default()),
            name,
            visibility,
        });
        Ok(())
    }

    fn type_member(&mut self, node: &SyntaxNode) -> Result<(), TranslateError> {
        let Some(member) = TypeMember::cast(node.clone()) else {
            return Ok(());
        };
        let Some(visibility) = self.open_types.last().map(|t| t.visibility.clone()) else {
            return Ok(());
        };
        let Some(name) = member.name().and_then(|n| n.text()) else {
            return self.violation(node, "type member", "member has no name");
        };

        if member.visibility().is_none() {
            if let Some(dim) = child_token(node, SyntaxKind::DIM_KW) {
                self.edits.replace(token_span(&dim), visibility);
            } else if let Some(first) = first_significant_token(node) {
                self.edits
                    .insert_before(token_span(&first).start, format!("{visibility} "));
            }
        }

        if let Some(bounds) = member.array_bounds().filter(|b| !b.is_unsized()) {
            let placeholder = format!("({})", ",".repeat(bounds.rank() - 1));
            self.edits.replace(node_span(bounds.syntax()), placeholder);
            let redim = format!("ReDim {name}({})", bounds.inner_text().trim());
            if let Some(open) = self.open_types.last_mut() {
                open.initializer.add(&redim);
            }
        }
        Ok(())
    }

    fn leave_type(&mut self, node: &SyntaxNode) {
        let Some(open) = self.open_types.pop() else {
            return;
        };
        let procedure = open.initializer.finish();
        if procedure.is_empty() {
            return;
        }

        match TypeBlock::cast(node.clone()).and_then(|b| b.end_token()) {
            Some(end) => {
                self.layout
                    .insert_lines_before(&mut self.edits, token_span(&end).start, &procedure, "    ");
            }
            None => {
                self.edits
                    .insert_after(node_span(node).end, format!("\n{procedure}"));
            }
        }
        if let Some(name) = open.name {
            tracing::debug!(file = %self.path.display(), type_name = %name, "synthesized initializer");
            self.initialized_types.push(name);
        }
    }

    // ── Statements ─────────────────────────────────────────────────────

    /// `Foo a, b` -> `Foo(a, b)`
    fn implicit_call(&mut self, node: &SyntaxNode) {
        let Some(stmt) = ImplicitCallStmt::cast(node.clone()) else {
            return;
        };
        let (Some(target), Some(args)) = (stmt.target(), stmt.args()) else {
            return;
        };
        let Some(args_span) = significant_span(args.syntax()) else {
            return;
        };

        let target_end = node_span(target.syntax()).end;
        let gap = Span::new(target_end, args_span.start.max(target_end));
        let blanks = gap.text(self.layout.source());
        if !blanks.is_empty() && blanks.bytes().all(|b| b == b' ' || b == b'\t') {
            self.edits.replace(gap, "(");
        } else {
            self.edits.insert_before(args_span.start, "(");
        }
        self.edits.insert_after(args_span.end, ")");
    }

    fn declare(&mut self, node: &SyntaxNode) {
        let Some(ptr_safe) = DeclareStmt::cast(node.clone()).and_then(|d| d.ptr_safe()) else {
            return;
        };
        let mut span = token_span(&ptr_safe);
        if let Some(next) = ptr_safe.next_token() {
            if next.kind() == SyntaxKind::WHITESPACE {
                span = span.merge(token_span(&next));
            }
        }
        self.edits.delete(span);
    }

    fn erase(&mut self, node: &SyntaxNode) {
        let Some(stmt) = EraseStmt::cast(node.clone()) else {
            return;
        };
        let source = self.layout.source();
        let clears: Vec<String> = stmt
            .operands()
            .filter_map(|operand| significant_span(operand.syntax()))
            .map(|span| {
                let array = span.text(source);
                format!("Array.Clear({array}, 0, {array}.Length)")
            })
            .collect();
        if clears.is_empty() {
            return;
        }
        if let Some(span) = significant_span(node) {
            self.edits.replace(span, clears.join(": "));
        }
    }

    // ── Entry point ────────────────────────────────────────────────────

    fn procedure(&mut self, node: &SyntaxNode) -> Result<(), TranslateError> {
        let Some(proc_def) = ProcDef::cast(node.clone()) else {
            return Ok(());
        };
        if !proc_def.is_sub() || !self.open_types.is_empty() {
            return Ok(());
        }
        let Some(name) = proc_def.name().and_then(|n| n.token()) else {
            return Ok(());
        };
        if !self.options.is_entry_point(name.text()) {
            return Ok(());
        }
        if self.is_entry_point {
            return self.violation(node, "entry point", "module already has an entry point");
        }
        if proc_def.param_list().is_some_and(|list| list.params().next().is_some()) {
            return self.violation(node, "entry point", "entry point takes parameters");
        }

        let (Some(body), Some(end)) = (proc_def.body(), proc_def.end_token()) else {
            return self.violation(node, "entry point", "procedure has no body");
        };

        tracing::info!(file = %self.path.display(), name = %name.text(), "entry point");
        self.is_entry_point = true;
        if name.text() != ENTRY_POINT_NAME {
            self.edits.replace(token_span(&name), ENTRY_POINT_NAME);
        }

        let end_offset = token_span(&end).start;
        let indent = match body.statements().next().and_then(|s| first_significant_token(&s)) {
            Some(first) => self.layout.indent_at(token_span(&first).start).to_string(),
            None => format!("{}    ", self.layout.indent_at(end_offset)),
        };

        let prologue = format!("{indent}{CULTURE_PIN}\n{indent}{STOPWATCH_START}\n");
        let header_break = node
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| t.kind() == SyntaxKind::NEWLINE);
        match header_break {
            Some(newline) => self.edits.insert_after(token_span(&newline).end, prologue),
            None => self
                .edits
                .insert_before(node_span(body.syntax()).start, format!("\n{prologue}")),
        }

        let epilogue = format!(
            "{STOPWATCH_STOP}\n{ELAPSED_REPORT}\n{EXIT_PROMPT}\n{EXIT_PAUSE}\n"
        );
        let extra = &indent[self.layout.indent_at(end_offset).len().min(indent.len())..];
        self.layout
            .insert_lines_before(&mut self.edits, end_offset, &epilogue, extra);
        Ok(())
    }
}

/// Visibility keyword as the target dialect spells it.
fn target_visibility(visibility: &str) -> String {
    if visibility.eq_ignore_ascii_case("Global") {
        "Public".to_string()
    } else {
        visibility.to_string()
    }
}
