//! Ordered text edits over one source file.
//!
//! Both passes record edits against the text they parsed and apply them in
//! a single linear merge. The tree is never mutated.
//!
//! # Ordering
//!
//! Several edits can share an offset. They are emitted as:
//!
//! 1. inserts anchored *after* the token ending there, in insertion order;
//! 2. inserts anchored *before* the token starting there, in insertion order;
//! 3. the replacement starting there, if any.
//!
//! Inserts strictly inside a replaced span are dropped with the text they
//! would have been attached to. Overlapping replacements keep the one that
//! starts first (earliest recorded on ties).

use basil_common::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Anchor {
    After,
    Before,
}

#[derive(Debug, Clone)]
struct Insert {
    offset: u32,
    anchor: Anchor,
    seq: usize,
    text: String,
}

#[derive(Debug, Clone)]
struct Replacement {
    span: Span,
    seq: usize,
    text: String,
}

/// An ordered set of inserts and replacements against one text.
#[derive(Debug, Clone, Default)]
pub struct EditList {
    inserts: Vec<Insert>,
    replacements: Vec<Replacement>,
    seq: usize,
}

impl EditList {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&mut self) -> usize {
        self.seq += 1;
        self.seq
    }

    /// Insert `text` in front of the token that starts at `offset`.
    pub fn insert_before(&mut self, offset: u32, text: impl Into<String>) {
        let seq = self.next_seq();
        self.inserts.push(Insert {
            offset,
            anchor: Anchor::Before,
            seq,
            text: text.into(),
        });
    }

    /// Insert `text` behind the token that ends at `offset`.
    pub fn insert_after(&mut self, offset: u32, text: impl Into<String>) {
        let seq = self.next_seq();
        self.inserts.push(Insert {
            offset,
            anchor: Anchor::After,
            seq,
            text: text.into(),
        });
    }

    /// Replace the text covered by `span`.
    pub fn replace(&mut self, span: Span, text: impl Into<String>) {
        let seq = self.next_seq();
        self.replacements.push(Replacement {
            span,
            seq,
            text: text.into(),
        });
    }

    /// Remove the text covered by `span`.
    pub fn delete(&mut self, span: Span) {
        self.replace(span, "");
    }

    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.replacements.is_empty()
    }

    /// Number of recorded edits.
    pub fn len(&self) -> usize {
        self.inserts.len() + self.replacements.len()
    }

    /// Compose every edit with `source`.
    ///
    /// Edits at offsets outside `source` or not on a character boundary are
    /// skipped with a warning.
    pub fn apply(&self, source: &str) -> String {
        let valid = |offset: u32| {
            let offset = offset as usize;
            offset <= source.len() && source.is_char_boundary(offset)
        };

        let mut replacements: Vec<&Replacement> = self
            .replacements
            .iter()
            .filter(|r| {
                let ok = r.span.start <= r.span.end && valid(r.span.start) && valid(r.span.end);
                if !ok {
                    tracing::warn!(start = r.span.start, end = r.span.end, "skipping invalid replacement");
                }
                ok
            })
            .collect();
        replacements.sort_by_key(|r| (r.span.start, r.seq));

        let mut accepted: Vec<&Replacement> = Vec::with_capacity(replacements.len());
        for r in replacements {
            match accepted.last() {
                Some(prev) if r.span.start < prev.span.end || r.span.start == prev.span.start => {
                    tracing::warn!(
                        start = r.span.start,
                        end = r.span.end,
                        "dropping replacement overlapping an earlier one"
                    );
                }
                _ => accepted.push(r),
            }
        }

        let mut inserts: Vec<&Insert> = self
            .inserts
            .iter()
            .filter(|i| {
                if !valid(i.offset) {
                    tracing::warn!(offset = i.offset, "skipping invalid insert");
                    return false;
                }
                !accepted
                    .iter()
                    .any(|r| r.span.start < i.offset && i.offset < r.span.end)
            })
            .collect();
        inserts.sort_by_key(|i| (i.offset, i.anchor, i.seq));

        let extra: usize = inserts.iter().map(|i| i.text.len()).sum::<usize>()
            + accepted.iter().map(|r| r.text.len()).sum::<usize>();
        let mut out = String::with_capacity(source.len() + extra);
        let mut pos = 0usize;
        let mut pending = inserts.into_iter().peekable();

        for r in accepted {
            let start = r.span.start as usize;
            while let Some(insert) = pending.next_if(|i| i.offset as usize <= start) {
                let offset = insert.offset as usize;
                out.push_str(&source[pos..offset]);
                out.push_str(&insert.text);
                pos = offset;
            }
            out.push_str(&source[pos..start]);
            out.push_str(&r.text);
            pos = r.span.end as usize;
        }
        for insert in pending {
            let offset = insert.offset as usize;
            out.push_str(&source[pos..offset]);
            out.push_str(&insert.text);
            pos = offset;
        }
        out.push_str(&source[pos..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_edits_is_identity() {
        let edits = EditList::new();
        assert!(edits.is_empty());
        assert_eq!(edits.apply("Dim x As Long"), "Dim x As Long");
    }

    #[test]
    fn replace_and_delete() {
        let mut edits = EditList::new();
        edits.replace(Span::new(8, 12), "Structure");
        edits.delete(Span::new(0, 8));
        assert_eq!(edits.len(), 2);
        assert_eq!(edits.apply("Private Type Buf"), "Structure Buf");
    }

    #[test]
    fn after_inserts_precede_before_inserts_at_same_offset() {
        let mut edits = EditList::new();
        edits.insert_before(4, "(");
        edits.insert_after(4, "<after>");
        edits.insert_before(4, "<before>");
        assert_eq!(edits.apply("Foo a"), "Foo <after>(<before>a");
    }

    #[test]
    fn inserts_at_replacement_start_come_first() {
        let mut edits = EditList::new();
        edits.replace(Span::new(0, 4), "Structure");
        edits.insert_before(0, "Public ");
        assert_eq!(edits.apply("Type T"), "Public Structure T");
    }

    #[test]
    fn insert_at_replacement_end_follows_it() {
        let mut edits = EditList::new();
        edits.insert_after(4, "!");
        edits.replace(Span::new(0, 4), "Main");
        assert_eq!(edits.apply("Runx"), "Main!x");
    }

    #[test]
    fn inserts_inside_replacement_are_dropped() {
        let mut edits = EditList::new();
        edits.replace(Span::new(0, 7), "Array.Clear(a, 0, a.Length)");
        edits.insert_before(6, "(");
        assert_eq!(edits.apply("Erase a"), "Array.Clear(a, 0, a.Length)");
    }

    #[test]
    fn overlapping_replacement_keeps_first() {
        let mut edits = EditList::new();
        edits.replace(Span::new(0, 5), "A");
        edits.replace(Span::new(3, 7), "B");
        assert_eq!(edits.apply("0123456789"), "A56789");
    }

    #[test]
    fn insert_order_is_independent_of_recording_order_across_offsets() {
        let mut first = EditList::new();
        first.insert_after(4, ")");
        first.insert_before(2, "(");
        let mut second = EditList::new();
        second.insert_before(2, "(");
        second.insert_after(4, ")");
        assert_eq!(first.apply("f ab"), second.apply("f ab"));
        assert_eq!(first.apply("f ab"), "f (ab)");
    }

    #[test]
    fn out_of_range_edits_are_skipped() {
        let mut edits = EditList::new();
        edits.insert_before(100, "x");
        edits.replace(Span::new(2, 50), "y");
        assert_eq!(edits.apply("abc"), "abc");
    }
}
