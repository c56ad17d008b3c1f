/// Character cursor over one module's source text.
///
/// Positions are byte offsets into the UTF-8 source. The lexer needs up to
/// three characters of lookahead (`1E+5`, `&H1F`), so `peek_nth` walks a
/// cloned iterator rather than buffering.
pub struct Cursor<'src> {
    source: &'src str,
    pos: u32,
    chars: std::str::Chars<'src>,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            chars: source.chars(),
        }
    }

    /// The current character, without consuming it.
    pub fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    /// The character after the current one.
    pub fn peek_next(&self) -> Option<char> {
        self.peek_nth(1)
    }

    /// The character `n` places ahead (`peek_nth(0)` is `peek()`).
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.chars.clone().nth(n)
    }

    /// Consume the current character and advance the position.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.pos += c.len_utf8() as u32;
        Some(c)
    }

    /// Consume the current character if it equals `expected`.
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Current byte position in the source text.
    pub fn pos(&self) -> u32 {
        self.pos
    }

    /// Advance while the predicate holds for the current character.
    pub fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            self.advance();
        }
    }

    /// The not-yet-consumed remainder of the current line, without the line
    /// break.
    pub fn rest_of_line(&self) -> &'src str {
        let rest = &self.source[self.pos as usize..];
        let end = rest.find(|c| c == '\n' || c == '\r').unwrap_or(rest.len());
        &rest[..end]
    }

    /// Extract a slice of the source text by byte offsets.
    ///
    /// # Panics
    ///
    /// Panics if start or end are out of bounds or not on UTF-8 boundaries.
    pub fn slice(&self, start: u32, end: u32) -> &'src str {
        &self.source[start as usize..end as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_does_not_advance() {
        let cursor = Cursor::new("ab");
        assert_eq!(cursor.peek(), Some('a'));
        assert_eq!(cursor.peek_next(), Some('b'));
        assert_eq!(cursor.peek_nth(2), None);
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn advance_tracks_multibyte_utf8() {
        let mut cursor = Cursor::new("\u{00E9}a");
        assert_eq!(cursor.advance(), Some('\u{00E9}'));
        assert_eq!(cursor.pos(), 2);
        assert_eq!(cursor.advance(), Some('a'));
        assert_eq!(cursor.pos(), 3);
        assert_eq!(cursor.advance(), None);
        assert_eq!(cursor.peek(), None);
    }

    #[test]
    fn eat_only_matching() {
        let mut cursor = Cursor::new(":=");
        assert!(!cursor.eat('='));
        assert!(cursor.eat(':'));
        assert!(cursor.eat('='));
        assert_eq!(cursor.peek(), None);
    }

    #[test]
    fn eat_while_consumes_matching() {
        let mut cursor = Cursor::new("123abc");
        cursor.eat_while(|c| c.is_ascii_digit());
        assert_eq!(cursor.pos(), 3);
        assert_eq!(cursor.slice(0, 3), "123");
    }

    #[test]
    fn rest_of_line_stops_at_break() {
        let mut cursor = Cursor::new("ab _\r\ncd");
        cursor.advance();
        assert_eq!(cursor.rest_of_line(), "b _");
    }
}
