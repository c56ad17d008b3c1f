use serde::Serialize;

/// Byte-offset span into source text. Start is inclusive, end is exclusive.
///
/// Every position Basil tracks, from lexer tokens to rewrite edits, is a byte
/// offset into the original module text. Line/column pairs are only computed
/// when a diagnostic is reported, via [`LineIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Create a new span from byte offsets.
    pub fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "span start ({start}) must be <= end ({end})");
        Self { start, end }
    }

    /// A zero-width span sitting at `offset`.
    pub fn empty_at(offset: u32) -> Self {
        Self::new(offset, offset)
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Whether the span is empty (zero-length).
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Merge two spans into one that covers both.
    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Whether `other` lies entirely inside this span.
    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether the two spans share at least one byte.
    pub fn overlaps(&self, other: Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The text this span covers in `source`.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start as usize..self.end as usize]
    }
}

/// Pre-computed index of line start positions for on-demand line/column lookup.
///
/// Built once per module, then used to turn byte offsets into the
/// (line, column) pairs printed in syntax error records.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the start of each line. The first entry is always 0.
    line_starts: Vec<u32>,
}

impl LineIndex {
    /// Build a line index by scanning the source text for line breaks.
    ///
    /// `\n` and `\r\n` end a line; a lone `\r` does too, since legacy
    /// editors still emit it.
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        let bytes = source.as_bytes();
        for (i, &byte) in bytes.iter().enumerate() {
            match byte {
                b'\n' => line_starts.push((i + 1) as u32),
                b'\r' if bytes.get(i + 1) != Some(&b'\n') => line_starts.push((i + 1) as u32),
                _ => {}
            }
        }
        Self { line_starts }
    }

    /// Convert a byte offset to a 1-based (line, column) pair.
    ///
    /// Column is measured in bytes from the start of the line.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line_idx = self.line_starts.partition_point(|&start| start <= offset);
        let line_idx = line_idx.saturating_sub(1);
        let line = (line_idx as u32) + 1;
        let col = offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// Byte offset where the line containing `offset` begins.
    pub fn line_start(&self, offset: u32) -> u32 {
        let line_idx = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        self.line_starts[line_idx]
    }

    /// Return the number of lines in the source.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_new_and_len() {
        let span = Span::new(5, 10);
        assert_eq!(span.start, 5);
        assert_eq!(span.end, 10);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
    }

    #[test]
    fn span_empty_at() {
        let span = Span::empty_at(3);
        assert_eq!(span.len(), 0);
        assert!(span.is_empty());
    }

    #[test]
    fn span_merge() {
        let merged = Span::new(5, 10).merge(Span::new(8, 15));
        assert_eq!(merged, Span::new(5, 15));
    }

    #[test]
    fn span_contains_and_overlaps() {
        let outer = Span::new(2, 10);
        assert!(outer.contains(Span::new(2, 10)));
        assert!(outer.contains(Span::new(4, 4)));
        assert!(!outer.contains(Span::new(8, 11)));
        assert!(outer.overlaps(Span::new(9, 12)));
        assert!(!outer.overlaps(Span::new(10, 12)));
        assert!(!outer.overlaps(Span::empty_at(10)));
    }

    #[test]
    fn span_text() {
        let src = "Dim x As Long";
        assert_eq!(Span::new(4, 5).text(src), "x");
    }

    #[test]
    fn line_index_multiple_lines() {
        let idx = LineIndex::new("Sub A()\nEnd Sub\nx");
        assert_eq!(idx.line_col(0), (1, 1));
        assert_eq!(idx.line_col(8), (2, 1));
        assert_eq!(idx.line_col(12), (2, 5));
        assert_eq!(idx.line_col(16), (3, 1));
        assert_eq!(idx.line_count(), 3);
    }

    #[test]
    fn line_index_crlf_counts_once() {
        let idx = LineIndex::new("a\r\nb\rc");
        assert_eq!(idx.line_col(3), (2, 1));
        assert_eq!(idx.line_col(5), (3, 1));
        assert_eq!(idx.line_count(), 3);
    }

    #[test]
    fn line_index_line_start() {
        let idx = LineIndex::new("ab\n    cd");
        assert_eq!(idx.line_start(7), 3);
        assert_eq!(idx.line_start(1), 0);
    }
}
