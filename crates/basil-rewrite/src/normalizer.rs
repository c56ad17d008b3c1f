//! Pass 2: the structural normalizer.
//!
//! Re-parses the fixer's output and, with the frozen registry of record
//! types that have an `Init<Type>` procedure:
//!
//! - calls the initializer for every declared variable of such a type
//!   (module fields from a synthesized `Sub New()`, locals right after
//!   their declaration, arrays element by element);
//! - rewrites argument ranges `1 To n` to `0 To n`.

use std::path::Path;

use basil_common::span::Span;
use basil_parser::ast::expr::{Expr, RangeArg};
use basil_parser::ast::item::{DimStmt, ModuleBlock, VarDecl};
use basil_parser::ast::AstNode;
use basil_parser::cst::{first_significant_token, node_span, token_span};
use basil_parser::{SyntaxKind, SyntaxNode, SyntaxToken};
use rowan::WalkEvent;

use crate::edit::EditList;
use crate::initializer::procedure_name;
use crate::layout::{indent_lines, Layout};
use crate::registry::InitializerRegistry;

/// Pass 2 output for one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub text: String,
    /// Initializer calls and loops synthesized.
    pub initializer_calls: usize,
    /// `1 To n` ranges rewritten to `0 To n`.
    pub rewritten_ranges: usize,
}

/// Run the structural normalizer over one fixed module.
pub fn normalize_module(path: &Path, source: &str, registry: &InitializerRegistry) -> Normalized {
    let parse = basil_parser::parse(source);
    if !parse.ok() {
        tracing::warn!(
            file = %path.display(),
            errors = parse.errors().len(),
            "fixed module does not re-parse cleanly"
        );
    }

    let mut normalizer = StructuralNormalizer {
        layout: Layout::new(source),
        registry,
        edits: EditList::new(),
        initializer_calls: 0,
        rewritten_ranges: 0,
    };
    for event in parse.syntax().preorder() {
        if let WalkEvent::Enter(node) = event {
            normalizer.enter(&node);
        }
    }

    tracing::debug!(
        file = %path.display(),
        calls = normalizer.initializer_calls,
        ranges = normalizer.rewritten_ranges,
        "structural normalizer done"
    );

    Normalized {
        text: normalizer.edits.apply(source),
        initializer_calls: normalizer.initializer_calls,
        rewritten_ranges: normalizer.rewritten_ranges,
    }
}

struct StructuralNormalizer<'a> {
    layout: Layout<'a>,
    registry: &'a InitializerRegistry,
    edits: EditList,
    initializer_calls: usize,
    rewritten_ranges: usize,
}

impl StructuralNormalizer<'_> {
    fn enter(&mut self, node: &SyntaxNode) {
        match node.kind() {
            SyntaxKind::MODULE_BLOCK => self.module_constructor(node),
            SyntaxKind::DIM_STMT
                if node.parent().is_some_and(|p| p.kind() == SyntaxKind::BLOCK) =>
            {
                self.local_initializers(node)
            }
            SyntaxKind::RANGE_ARG => self.range_lower_bound(node),
            _ => {}
        }
    }

    /// Initializer statements for every registered-type variable of `dim`.
    fn initializers(&mut self, dim: &DimStmt) -> String {
        if dim.is_const() {
            return String::new();
        }
        let mut text = String::new();
        for decl in dim.decls() {
            if let Some(call) = initializer_call(&decl, self.registry) {
                text.push_str(&call);
                self.initializer_calls += 1;
            }
        }
        text
    }

    /// Collect module fields into `Sub New()` before `End Module`.
    fn module_constructor(&mut self, node: &SyntaxNode) {
        let Some(module) = ModuleBlock::cast(node.clone()) else {
            return;
        };
        let body: String = module
            .dim_stmts()
            .map(|dim| self.initializers(&dim))
            .collect();
        if body.is_empty() {
            return;
        }

        let constructor = format!("Sub New()\n{}End Sub\n", indent_lines(&body, "    "));
        match module.end_token() {
            Some(end) => {
                self.layout
                    .insert_lines_before(&mut self.edits, token_span(&end).start, &constructor, "    ");
            }
            None => {
                self.edits
                    .insert_after(node_span(node).end, format!("\n{constructor}"));
            }
        }
    }

    /// Initialize locals on the lines right after their declaration.
    fn local_initializers(&mut self, node: &SyntaxNode) {
        let Some(dim) = DimStmt::cast(node.clone()) else {
            return;
        };
        let body = self.initializers(&dim);
        if body.is_empty() {
            return;
        }

        let start = node_span(node).start;
        let indent = first_significant_token(node)
            .map(|t| self.layout.indent_at(token_span(&t).start))
            .unwrap_or_else(|| self.layout.indent_at(start));
        let lines = indent_lines(&body, indent);

        let mut next = node.last_token().and_then(|t| t.next_token());
        while let Some(token) = next {
            match token.kind() {
                SyntaxKind::NEWLINE => {
                    self.edits.insert_after(token_span(&token).end, lines);
                    return;
                }
                SyntaxKind::COLON => {
                    self.split_after_declaration(node, &token, indent, &lines);
                    return;
                }
                _ => {}
            }
            next = token.next_token();
        }
        self.edits
            .insert_after(node_span(node).end, format!("\n{lines}"));
    }

    /// `Dim b As Buf: b.X = 1` puts the rest of the line on its own line,
    /// after the initializer calls.
    fn split_after_declaration(&mut self, node: &SyntaxNode, colon: &SyntaxToken, indent: &str, lines: &str) {
        let mut end = token_span(colon).end;
        let mut rest = colon.next_token();
        while let Some(token) = rest.as_ref().filter(|t| t.kind() == SyntaxKind::WHITESPACE) {
            end = token_span(token).end;
            rest = token.next_token();
        }
        let line_ends = rest
            .as_ref()
            .map_or(true, |t| matches!(t.kind(), SyntaxKind::NEWLINE | SyntaxKind::EOF));
        let text = if line_ends {
            format!("\n{}", lines.trim_end_matches('\n'))
        } else {
            format!("\n{lines}{indent}")
        };
        self.edits.replace(Span::new(node_span(node).end, end), text);
    }

    /// `f(1 To n)` -> `f(0 To n)`; only a literal `1` qualifies.
    fn range_lower_bound(&mut self, node: &SyntaxNode) {
        let Some(Expr::Literal(lower)) = RangeArg::cast(node.clone()).and_then(|r| r.lower()) else {
            return;
        };
        let Some(token) = lower.token() else {
            return;
        };
        if token.kind() == SyntaxKind::INT_LITERAL && token.text() == "1" {
            self.edits.replace(token_span(&token), "0");
            self.rewritten_ranges += 1;
        }
    }
}

/// The statements initializing `decl`, if its type has an initializer.
///
/// Arrays declared without bounds have no elements yet and get nothing.
fn initializer_call(decl: &VarDecl, registry: &InitializerRegistry) -> Option<String> {
    let as_clause = decl.as_clause()?;
    if as_clause.type_name()?.ends_with("()") {
        return None;
    }
    let type_name = registry.canonical(&as_clause.simple_type_name()?)?;
    let name = decl.name()?.text()?;
    let init = procedure_name(type_name);

    match decl.array_bounds() {
        None => Some(format!("Call {name}.{init}()\n")),
        Some(bounds) if bounds.is_unsized() => None,
        Some(bounds) => Some(element_loop(&name, bounds.rank(), &init)),
    }
}

/// Nested `For` loops calling `init` on every element of `array`.
fn element_loop(array: &str, rank: usize, init: &str) -> String {
    if rank == 1 {
        return format!(
            "For Index As Integer = 0 To {array}.Length - 1\n    Call {array}(Index).{init}()\nNext\n"
        );
    }
    let mut text = String::new();
    let indices: Vec<String> = (0..rank).map(|d| format!("Index{d}")).collect();
    for (depth, index) in indices.iter().enumerate() {
        text.push_str(&format!(
            "{}For {index} As Integer = 0 To {array}.GetUpperBound({depth})\n",
            "    ".repeat(depth)
        ));
    }
    text.push_str(&format!(
        "{}Call {array}({}).{init}()\n",
        "    ".repeat(rank),
        indices.join(", ")
    ));
    for depth in (0..rank).rev() {
        text.push_str(&format!("{}Next\n", "    ".repeat(depth)));
    }
    text
}
