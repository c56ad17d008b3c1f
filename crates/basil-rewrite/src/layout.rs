//! Line-oriented placement of synthesized statements.

use basil_common::span::LineIndex;

use crate::edit::EditList;

/// Source text plus its line index, for finding where whole lines go.
pub(crate) struct Layout<'a> {
    source: &'a str,
    lines: LineIndex,
}

impl<'a> Layout<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Self {
            source,
            lines: LineIndex::new(source),
        }
    }

    pub(crate) fn source(&self) -> &'a str {
        self.source
    }

    /// 1-based line of `offset`.
    pub(crate) fn line_of(&self, offset: u32) -> u32 {
        self.lines.line_col(offset.min(self.source.len() as u32)).0
    }

    /// Leading blanks of the line holding `offset`, up to `offset`.
    pub(crate) fn indent_at(&self, offset: u32) -> &'a str {
        let start = self.lines.line_start(offset) as usize;
        let line = &self.source[start..(offset as usize).min(self.source.len())];
        let len = line.len() - line.trim_start_matches([' ', '\t']).len();
        &line[..len]
    }

    /// Whether only blanks precede `offset` on its line.
    pub(crate) fn starts_line(&self, offset: u32) -> bool {
        self.indent_at(offset).len() == (offset - self.lines.line_start(offset)) as usize
    }

    /// Insert `lines` (each ending in `\n`) as whole lines in front of the
    /// line holding `offset`, indented like that line.
    ///
    /// When other code precedes `offset` on its line, the lines go right
    /// before `offset` behind a fresh line break.
    pub(crate) fn insert_lines_before(&self, edits: &mut EditList, offset: u32, lines: &str, extra_indent: &str) {
        let indent = self.indent_at(offset);
        let text = indent_lines(lines, &format!("{indent}{extra_indent}"));
        if self.starts_line(offset) {
            edits.insert_before(self.lines.line_start(offset), text);
        } else {
            edits.insert_before(offset, format!("\n{text}"));
        }
    }
}

/// Prefix every line of `text` with `indent`.
pub(crate) fn indent_lines(text: &str, indent: &str) -> String {
    if indent.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        if line != "\n" {
            out.push_str(indent);
        }
        out.push_str(line);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indent_is_measured_up_to_offset() {
        let layout = Layout::new("Sub A()\n    x = 1\nEnd Sub\n");
        assert_eq!(layout.indent_at(12), "    ");
        assert_eq!(layout.indent_at(18), "");
        assert_eq!(layout.line_of(12), 2);
    }

    #[test]
    fn lines_go_in_front_of_the_line() {
        let source = "Type T\n    End Type\n";
        let layout = Layout::new(source);
        let mut edits = EditList::new();
        layout.insert_lines_before(&mut edits, 11, "Sub X()\nEnd Sub\n", "");
        assert_eq!(
            edits.apply(source),
            "Type T\n    Sub X()\n    End Sub\n    End Type\n"
        );
    }

    #[test]
    fn mid_line_offset_gets_a_line_break() {
        let source = "x = 1: End Sub";
        let layout = Layout::new(source);
        let mut edits = EditList::new();
        layout.insert_lines_before(&mut edits, 7, "y\n", "");
        assert_eq!(edits.apply(source), "x = 1: \ny\nEnd Sub");
    }

    #[test]
    fn blank_lines_stay_unindented() {
        assert_eq!(indent_lines("a\n\nb\n", "  "), "  a\n\n  b\n");
    }
}
