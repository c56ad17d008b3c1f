//! Typed AST nodes for module-level items.
//!
//! Covers: SourceFile, AttributeStmt, OptionStmt, ModuleBlock, TypeBlock,
//! TypeMember, EnumBlock, DeclareStmt, ProcDef, ParamList, Param,
//! Visibility, Name, AsClause, Block, DimStmt, VarDecl, ArrayBounds.

use crate::ast::expr::Arg;
use crate::ast::{ast_node, child_node, child_nodes, child_token, last_child_token, AstNode};
use crate::cst::{compact_text, SyntaxNode, SyntaxToken};
use crate::syntax_kind::SyntaxKind;

// ── Source File ──────────────────────────────────────────────────────────

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    /// `Attribute ...` lines at module level.
    pub fn attributes(&self) -> impl Iterator<Item = AttributeStmt> + '_ {
        child_nodes(&self.syntax)
    }

    /// `Option ...` directives at module level.
    pub fn options(&self) -> impl Iterator<Item = OptionStmt> + '_ {
        child_nodes(&self.syntax)
    }

    pub fn type_blocks(&self) -> impl Iterator<Item = TypeBlock> + '_ {
        child_nodes(&self.syntax)
    }

    pub fn proc_defs(&self) -> impl Iterator<Item = ProcDef> + '_ {
        child_nodes(&self.syntax)
    }

    pub fn module_blocks(&self) -> impl Iterator<Item = ModuleBlock> + '_ {
        child_nodes(&self.syntax)
    }

    /// Module-level field declarations.
    pub fn dim_stmts(&self) -> impl Iterator<Item = DimStmt> + '_ {
        child_nodes(&self.syntax)
    }

    /// The value of `Attribute VB_Name = "..."`, if present.
    pub fn vb_name(&self) -> Option<String> {
        self.attributes()
            .find(|a| a.key().is_some_and(|k| k.eq_ignore_ascii_case("VB_Name")))
            .and_then(|a| a.string_value())
    }
}

// ── Preamble ─────────────────────────────────────────────────────────────

ast_node!(AttributeStmt, ATTRIBUTE_STMT);

impl AttributeStmt {
    /// The attribute key (`VB_Name`, `Foo.VB_VarHelpID`).
    pub fn key(&self) -> Option<String> {
        let key: String = self
            .syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .skip_while(|t| t.kind() == SyntaxKind::ATTRIBUTE_KW || t.kind().is_trivia())
            .take_while(|t| t.kind() != SyntaxKind::EQ)
            .filter(|t| !t.kind().is_trivia())
            .map(|t| t.text().to_string())
            .collect();
        (!key.is_empty()).then_some(key)
    }

    /// The string value with its quotes removed and `""` unescaped.
    pub fn string_value(&self) -> Option<String> {
        let token = child_token(&self.syntax, SyntaxKind::STRING_LITERAL)?;
        Some(unquote(token.text()))
    }
}

/// Strip the quotes of a string literal and unescape doubled quotes.
pub fn unquote(literal: &str) -> String {
    let inner = literal.strip_prefix('"').unwrap_or(literal);
    let inner = inner.strip_suffix('"').unwrap_or(inner);
    inner.replace("\"\"", "\"")
}

ast_node!(OptionStmt, OPTION_STMT);

// ── Module Block ─────────────────────────────────────────────────────────

ast_node!(ModuleBlock, MODULE_BLOCK);

impl ModuleBlock {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    /// Field declarations directly inside the module.
    pub fn dim_stmts(&self) -> impl Iterator<Item = DimStmt> + '_ {
        child_nodes(&self.syntax)
    }

    pub fn proc_defs(&self) -> impl Iterator<Item = ProcDef> + '_ {
        child_nodes(&self.syntax)
    }

    pub fn type_blocks(&self) -> impl Iterator<Item = TypeBlock> + '_ {
        child_nodes(&self.syntax)
    }

    /// The `End` of `End Module`.
    pub fn end_token(&self) -> Option<SyntaxToken> {
        last_child_token(&self.syntax, SyntaxKind::END_KW)
    }
}

// ── Type Block ───────────────────────────────────────────────────────────

ast_node!(TypeBlock, TYPE_BLOCK);

impl TypeBlock {
    pub fn visibility(&self) -> Option<Visibility> {
        child_node(&self.syntax)
    }

    /// The opening `Type` or `Structure` keyword.
    pub fn keyword(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| matches!(t.kind(), SyntaxKind::TYPE_KW | SyntaxKind::STRUCTURE_KW))
    }

    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn members(&self) -> impl Iterator<Item = TypeMember> + '_ {
        child_nodes(&self.syntax)
    }

    pub fn proc_defs(&self) -> impl Iterator<Item = ProcDef> + '_ {
        child_nodes(&self.syntax)
    }

    /// The `End` of `End Type`.
    pub fn end_token(&self) -> Option<SyntaxToken> {
        last_child_token(&self.syntax, SyntaxKind::END_KW)
    }

    /// The `Type`/`Structure` of the closing `End Type`.
    pub fn end_keyword(&self) -> Option<SyntaxToken> {
        let end = self.end_token()?;
        let closing = self
            .syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| matches!(t.kind(), SyntaxKind::TYPE_KW | SyntaxKind::STRUCTURE_KW))
            .last()?;
        (closing.text_range().start() > end.text_range().start()).then_some(closing)
    }
}

ast_node!(TypeMember, TYPE_MEMBER);

impl TypeMember {
    pub fn visibility(&self) -> Option<Visibility> {
        child_node(&self.syntax)
    }

    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn array_bounds(&self) -> Option<ArrayBounds> {
        child_node(&self.syntax)
    }

    pub fn as_clause(&self) -> Option<AsClause> {
        child_node(&self.syntax)
    }
}

// ── Enum Block ───────────────────────────────────────────────────────────

ast_node!(EnumBlock, ENUM_BLOCK);

impl EnumBlock {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }
}

// ── Declare ──────────────────────────────────────────────────────────────

ast_node!(DeclareStmt, DECLARE_STMT);

impl DeclareStmt {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    /// The `PtrSafe` marker of a 64-bit `Declare`.
    pub fn ptr_safe(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| t.kind() == SyntaxKind::IDENT && t.text().eq_ignore_ascii_case("PtrSafe"))
    }
}

// ── Procedures ───────────────────────────────────────────────────────────

ast_node!(ProcDef, PROC_DEF);

impl ProcDef {
    pub fn visibility(&self) -> Option<Visibility> {
        child_node(&self.syntax)
    }

    /// `Sub`, `Function` or `Property`.
    pub fn keyword(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| {
                matches!(
                    t.kind(),
                    SyntaxKind::SUB_KW | SyntaxKind::FUNCTION_KW | SyntaxKind::PROPERTY_KW
                )
            })
    }

    pub fn is_sub(&self) -> bool {
        self.keyword().is_some_and(|k| k.kind() == SyntaxKind::SUB_KW)
    }

    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn param_list(&self) -> Option<ParamList> {
        child_node(&self.syntax)
    }

    pub fn return_type(&self) -> Option<AsClause> {
        child_node(&self.syntax)
    }

    pub fn body(&self) -> Option<Block> {
        child_node(&self.syntax)
    }

    /// The `End` of `End Sub`.
    pub fn end_token(&self) -> Option<SyntaxToken> {
        last_child_token(&self.syntax, SyntaxKind::END_KW)
    }
}

ast_node!(ParamList, PARAM_LIST);

impl ParamList {
    pub fn params(&self) -> impl Iterator<Item = Param> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(Param, PARAM);

impl Param {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn as_clause(&self) -> Option<AsClause> {
        child_node(&self.syntax)
    }
}

// ── Shared pieces ────────────────────────────────────────────────────────

ast_node!(Visibility, VISIBILITY);

impl Visibility {
    /// `Public`, `Private`, `Global` or `Friend` as written.
    pub fn text(&self) -> Option<String> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| t.kind().is_keyword())
            .map(|t| t.text().to_string())
    }
}

ast_node!(Name, NAME);

impl Name {
    pub fn text(&self) -> Option<String> {
        self.token().map(|t| t.text().to_string())
    }

    pub fn token(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| matches!(t.kind(), SyntaxKind::IDENT | SyntaxKind::NEW_KW))
    }
}

ast_node!(AsClause, AS_CLAUSE);

impl AsClause {
    /// The declared type with trivia removed (`Module1.Buf`, `Long()`).
    pub fn type_name(&self) -> Option<String> {
        let type_ref = self
            .syntax
            .children()
            .find(|n| n.kind() == SyntaxKind::TYPE_REF)?;
        let text = compact_text(&type_ref);
        (!text.is_empty()).then_some(text)
    }

    /// The last segment of the type name (`Buf` for `Module1.Buf`).
    pub fn simple_type_name(&self) -> Option<String> {
        let full = self.type_name()?;
        let full = full.strip_suffix("()").unwrap_or(&full);
        full.rsplit('.').next().map(str::to_string)
    }

    /// `As New T`
    pub fn is_new(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::NEW_KW).is_some()
    }
}

// ── Block ────────────────────────────────────────────────────────────────

ast_node!(Block, BLOCK);

impl Block {
    /// Statement nodes of the block, in order.
    pub fn statements(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.syntax.children()
    }

    /// Whether the block holds no statements.
    pub fn is_empty(&self) -> bool {
        self.syntax.children().next().is_none()
    }
}

// ── Declarations ─────────────────────────────────────────────────────────

ast_node!(DimStmt, DIM_STMT);

impl DimStmt {
    pub fn visibility(&self) -> Option<Visibility> {
        child_node(&self.syntax)
    }

    pub fn is_const(&self) -> bool {
        child_token(&self.syntax, SyntaxKind::CONST_KW).is_some()
    }

    pub fn decls(&self) -> impl Iterator<Item = VarDecl> + '_ {
        child_nodes(&self.syntax)
    }
}

ast_node!(VarDecl, VAR_DECL);

impl VarDecl {
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    pub fn array_bounds(&self) -> Option<ArrayBounds> {
        child_node(&self.syntax)
    }

    pub fn as_clause(&self) -> Option<AsClause> {
        child_node(&self.syntax)
    }
}

ast_node!(ArrayBounds, ARRAY_BOUNDS);

impl ArrayBounds {
    /// Number of dimensions: one more than the number of separating commas.
    pub fn rank(&self) -> usize {
        self.syntax
            .children_with_tokens()
            .filter(|it| it.kind() == SyntaxKind::COMMA)
            .count()
            + 1
    }

    /// Whether the bounds are omitted (`a()`, `a(,)`).
    pub fn is_unsized(&self) -> bool {
        self.syntax.children().next().is_none()
    }

    /// Source text between the parentheses.
    pub fn inner_text(&self) -> String {
        let text = self.syntax.text().to_string();
        let text = text.strip_prefix('(').unwrap_or(&text);
        let text = text.strip_suffix(')').unwrap_or(text);
        text.to_string()
    }

    /// Bound arguments, one per dimension that has one.
    pub fn dims(&self) -> impl Iterator<Item = Arg> + '_ {
        self.syntax.children().filter_map(Arg::cast)
    }
}
