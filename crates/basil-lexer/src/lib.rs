// Basil lexer -- lossless tokenizer shared by both dialects.

mod cursor;

use basil_common::error::{LexError, LexErrorKind};
use basil_common::span::Span;
use basil_common::token::{keyword_from_str, Token, TokenKind};
use cursor::Cursor;

/// The Basil lexer. Converts module text into a stream of tokens.
///
/// Unlike a compiler front-end that only needs meaningful tokens, the
/// rewrite passes edit text by byte offset and must reproduce everything
/// they do not touch, so whitespace, comments and line continuations are
/// tokens too. The stream always ends with a zero-width `Eof`.
///
/// Keywords are case-insensitive in both dialects; the token text keeps the
/// author's spelling.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    /// Whether we have already emitted the `Eof` token.
    emitted_eof: bool,
    errors: Vec<LexError>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            emitted_eof: false,
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source into a `Vec<Token>`, dropping lex errors.
    ///
    /// The returned vector includes the final `Eof` token.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Lexer::new(source).collect()
    }

    /// Tokenize the entire source, returning the tokens and every lex error
    /// encountered along the way.
    pub fn tokenize_with_errors(source: &str) -> (Vec<Token>, Vec<LexError>) {
        let mut lexer = Lexer::new(source);
        let tokens: Vec<Token> = lexer.by_ref().collect();
        (tokens, lexer.errors)
    }

    /// Errors recorded so far.
    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    fn next_token(&mut self) -> Token {
        let start = self.cursor.pos();

        let Some(c) = self.cursor.peek() else {
            return Token::new(TokenKind::Eof, start, start);
        };

        match c {
            // ── Trivia ───────────────────────────────────────────────────
            ' ' | '\t' | '\u{feff}' | '\u{a0}' => {
                self.cursor
                    .eat_while(|c| matches!(c, ' ' | '\t' | '\u{feff}' | '\u{a0}'));
                self.token(TokenKind::Whitespace, start)
            }
            '\n' => self.single_char_token(TokenKind::Newline, start),
            '\r' => {
                self.cursor.advance();
                self.cursor.eat('\n');
                self.token(TokenKind::Newline, start)
            }
            '\'' => self.lex_comment(start),
            '_' if self.at_line_continuation() => self.lex_line_continuation(start),

            // ── Punctuation ──────────────────────────────────────────────
            '(' => self.single_char_token(TokenKind::LParen, start),
            ')' => self.single_char_token(TokenKind::RParen, start),
            ',' => self.single_char_token(TokenKind::Comma, start),
            ';' => self.single_char_token(TokenKind::Semicolon, start),
            '!' => self.single_char_token(TokenKind::Bang, start),
            '+' => self.single_char_token(TokenKind::Plus, start),
            '-' => self.single_char_token(TokenKind::Minus, start),
            '*' => self.single_char_token(TokenKind::Star, start),
            '/' => self.single_char_token(TokenKind::Slash, start),
            '\\' => self.single_char_token(TokenKind::Backslash, start),
            '^' => self.single_char_token(TokenKind::Caret, start),
            '=' => self.single_char_token(TokenKind::Eq, start),
            '.' => {
                if self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit()) {
                    self.lex_number(start)
                } else {
                    self.single_char_token(TokenKind::Dot, start)
                }
            }
            ':' => {
                self.cursor.advance();
                if self.cursor.eat('=') {
                    self.token(TokenKind::ColonEq, start)
                } else {
                    self.token(TokenKind::Colon, start)
                }
            }
            '<' => {
                self.cursor.advance();
                if self.cursor.eat('=') {
                    self.token(TokenKind::LtEq, start)
                } else if self.cursor.eat('>') {
                    self.token(TokenKind::NotEq, start)
                } else {
                    self.token(TokenKind::Lt, start)
                }
            }
            '>' => {
                self.cursor.advance();
                if self.cursor.eat('=') {
                    self.token(TokenKind::GtEq, start)
                } else {
                    self.token(TokenKind::Gt, start)
                }
            }
            '&' => self.lex_amp(start),
            '#' => self.lex_hash(start),

            // ── Literals ─────────────────────────────────────────────────
            '0'..='9' => self.lex_number(start),
            '"' => self.lex_string(start),
            '$' if self.cursor.peek_next() == Some('"') => {
                self.cursor.advance();
                self.lex_string(start)
            }

            // ── Names ────────────────────────────────────────────────────
            '[' => self.lex_bracket_ident(start),
            c if is_ident_start(c) => self.lex_ident(start),

            _ => {
                self.cursor.advance();
                self.errors.push(LexError::new(
                    LexErrorKind::UnexpectedCharacter(c),
                    Span::new(start, self.cursor.pos()),
                ));
                self.token(TokenKind::Error, start)
            }
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    fn token(&self, kind: TokenKind, start: u32) -> Token {
        Token::new(kind, start, self.cursor.pos())
    }

    fn single_char_token(&mut self, kind: TokenKind, start: u32) -> Token {
        self.cursor.advance();
        self.token(kind, start)
    }

    /// `_` followed only by blanks up to the end of the line.
    fn at_line_continuation(&self) -> bool {
        let line = self.cursor.rest_of_line();
        !line.is_empty() && line[1..].chars().all(|c| c == ' ' || c == '\t')
    }

    /// The `_`, any trailing blanks, and the line break it escapes.
    fn lex_line_continuation(&mut self, start: u32) -> Token {
        self.cursor.advance();
        self.cursor.eat_while(|c| c == ' ' || c == '\t');
        if self.cursor.eat('\r') {
            self.cursor.eat('\n');
        } else {
            self.cursor.eat('\n');
        }
        self.token(TokenKind::LineContinuation, start)
    }

    /// `'` or `Rem` up to (not including) the line break.
    fn lex_comment(&mut self, start: u32) -> Token {
        self.cursor.eat_while(|c| c != '\n' && c != '\r');
        self.token(TokenKind::Comment, start)
    }

    /// `&H1F`, `&O17` or the concatenation operator.
    fn lex_amp(&mut self, start: u32) -> Token {
        self.cursor.advance(); // '&'
        let radix = match self.cursor.peek() {
            Some('h' | 'H') => 16,
            Some('o' | 'O') => 8,
            _ => return self.token(TokenKind::Amp, start),
        };
        self.cursor.advance();
        let digits_start = self.cursor.pos();
        self.cursor.eat_while(|c| c.is_digit(radix));
        if self.cursor.pos() == digits_start {
            let text = self.cursor.slice(start, self.cursor.pos()).to_string();
            self.errors.push(LexError::new(
                LexErrorKind::InvalidNumberLiteral(text),
                Span::new(start, self.cursor.pos()),
            ));
            return self.token(TokenKind::Error, start);
        }
        self.eat_integer_suffix();
        self.token(TokenKind::IntLiteral, start)
    }

    /// `#1/2/2000#` date literals; any other `#` (file numbers) is punctuation.
    fn lex_hash(&mut self, start: u32) -> Token {
        let line = self.cursor.rest_of_line();
        let body = &line[1..];
        let is_date = body.starts_with(|c: char| c.is_ascii_digit())
            && body.find('#').is_some_and(|end| {
                body[..end].chars().all(|c| {
                    c.is_ascii_digit() || matches!(c, '/' | '-' | ':' | ' ' | '.')
                        || matches!(c, 'A' | 'M' | 'P' | 'a' | 'm' | 'p')
                })
            });
        if !is_date {
            return self.single_char_token(TokenKind::Hash, start);
        }
        self.cursor.advance(); // opening '#'
        self.cursor.eat_while(|c| c != '#');
        self.cursor.advance(); // closing '#'
        self.token(TokenKind::DateLiteral, start)
    }

    fn lex_number(&mut self, start: u32) -> Token {
        let mut is_float = false;
        self.cursor.eat_while(|c| c.is_ascii_digit());
        if self.cursor.peek() == Some('.')
            && self.cursor.peek_next().is_some_and(|c| c.is_ascii_digit())
        {
            is_float = true;
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }
        if matches!(self.cursor.peek(), Some('e' | 'E' | 'd' | 'D')) {
            let exponent_digit = match self.cursor.peek_next() {
                Some('+' | '-') => self.cursor.peek_nth(2),
                other => other,
            };
            if exponent_digit.is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                self.cursor.advance();
                if matches!(self.cursor.peek(), Some('+' | '-')) {
                    self.cursor.advance();
                }
                self.cursor.eat_while(|c| c.is_ascii_digit());
            }
        }
        match self.cursor.peek() {
            Some('!' | '#' | '@') if !self.cursor.peek_next().is_some_and(is_ident_continue) => {
                self.cursor.advance();
                is_float = true;
            }
            _ => self.eat_integer_suffix(),
        }
        let kind = if is_float {
            TokenKind::FloatLiteral
        } else {
            TokenKind::IntLiteral
        };
        self.token(kind, start)
    }

    /// `%`, `&` and `^` type suffixes on integer literals.
    fn eat_integer_suffix(&mut self) {
        let follows_cleanly = |c: Option<char>| !c.is_some_and(|c| is_ident_continue(c) || c == '"');
        if matches!(self.cursor.peek(), Some('%' | '&' | '^'))
            && follows_cleanly(self.cursor.peek_next())
        {
            self.cursor.advance();
        }
    }

    /// `"..."` with `""` as an escaped quote. Strings never span lines.
    fn lex_string(&mut self, start: u32) -> Token {
        self.cursor.advance(); // opening '"'
        loop {
            match self.cursor.peek() {
                None | Some('\n' | '\r') => {
                    self.errors.push(LexError::new(
                        LexErrorKind::UnterminatedString,
                        Span::new(start, self.cursor.pos()),
                    ));
                    break;
                }
                Some('"') => {
                    self.cursor.advance();
                    if !self.cursor.eat('"') {
                        break;
                    }
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
        self.token(TokenKind::StringLiteral, start)
    }

    fn lex_bracket_ident(&mut self, start: u32) -> Token {
        self.cursor.advance(); // '['
        self.cursor.eat_while(|c| c != ']' && c != '\n' && c != '\r');
        if !self.cursor.eat(']') {
            self.errors.push(LexError::new(
                LexErrorKind::UnterminatedBracketIdent,
                Span::new(start, self.cursor.pos()),
            ));
        }
        self.token(TokenKind::Ident, start)
    }

    fn lex_ident(&mut self, start: u32) -> Token {
        self.cursor.eat_while(is_ident_continue);
        let word_end = self.cursor.pos();
        let word = self.cursor.slice(start, word_end);

        if word.eq_ignore_ascii_case("rem")
            && self.cursor.peek().map_or(true, |c| c.is_whitespace())
        {
            return self.lex_comment(start);
        }

        if self.eat_ident_suffix() {
            return self.token(TokenKind::Ident, start);
        }

        let kind = keyword_from_str(word).unwrap_or(TokenKind::Ident);
        self.token(kind, start)
    }

    /// Type-declaration characters glued to a name: `Left$`, `n%`, `x&`.
    ///
    /// `!` only counts when it is not a dictionary access (`rs!Field`).
    fn eat_ident_suffix(&mut self) -> bool {
        let next = self.cursor.peek_next();
        let accepted = match self.cursor.peek() {
            Some('$') => true,
            Some('%' | '@' | '#') => !next.is_some_and(|c| is_ident_continue(c)),
            Some('&') => !next.is_some_and(|c| is_ident_continue(c) || c == '"'),
            Some('!') => !next.is_some_and(|c| is_ident_start(c) || c == '['),
            _ => false,
        };
        if accepted {
            self.cursor.advance();
        }
        accepted
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.emitted_eof = true;
        }
        Some(token)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    fn texts(source: &str) -> Vec<&str> {
        Lexer::tokenize(source)
            .into_iter()
            .map(|t| &source[t.span.start as usize..t.span.end as usize])
            .collect()
    }

    #[test]
    fn tokens_tile_the_source() {
        let source = "Attribute VB_Name = \"Module1\"\r\nSub Main() ' go\r\n  x = &HFF + 1.5E+3 _\r\n    & \"a\"\"b\"\r\nEnd Sub\r\n";
        let rebuilt: String = texts(source).concat();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn keywords_keep_their_spelling() {
        let source = "END TYPE";
        assert_eq!(
            kinds(source),
            vec![TokenKind::End, TokenKind::Whitespace, TokenKind::Type, TokenKind::Eof]
        );
        assert_eq!(texts(source)[0], "END");
    }

    #[test]
    fn crlf_is_one_newline() {
        assert_eq!(
            kinds("a\r\nb"),
            vec![TokenKind::Ident, TokenKind::Newline, TokenKind::Ident, TokenKind::Eof]
        );
    }

    #[test]
    fn line_continuation_swallows_break() {
        let source = "Foo a, _\n    b";
        let tokens = Lexer::tokenize(source);
        let cont = tokens
            .iter()
            .find(|t| t.kind == TokenKind::LineContinuation)
            .unwrap();
        assert_eq!(&source[cont.span.start as usize..cont.span.end as usize], "_\n");
        assert!(!tokens.iter().any(|t| t.kind == TokenKind::Newline));
    }

    #[test]
    fn underscore_identifier_is_not_continuation() {
        assert_eq!(kinds("_x"), vec![TokenKind::Ident, TokenKind::Eof]);
    }

    #[test]
    fn rem_comment() {
        assert_eq!(
            kinds("Rem hello there\nx"),
            vec![TokenKind::Comment, TokenKind::Newline, TokenKind::Ident, TokenKind::Eof]
        );
        assert_eq!(kinds("Remark"), vec![TokenKind::Ident, TokenKind::Eof]);
    }

    #[test]
    fn numeric_literals() {
        assert_eq!(kinds("42"), vec![TokenKind::IntLiteral, TokenKind::Eof]);
        assert_eq!(kinds("42&"), vec![TokenKind::IntLiteral, TokenKind::Eof]);
        assert_eq!(kinds("&H1F"), vec![TokenKind::IntLiteral, TokenKind::Eof]);
        assert_eq!(kinds("&O17&"), vec![TokenKind::IntLiteral, TokenKind::Eof]);
        assert_eq!(kinds("3.25"), vec![TokenKind::FloatLiteral, TokenKind::Eof]);
        assert_eq!(kinds(".5"), vec![TokenKind::FloatLiteral, TokenKind::Eof]);
        assert_eq!(kinds("1E-3"), vec![TokenKind::FloatLiteral, TokenKind::Eof]);
        assert_eq!(kinds("1#"), vec![TokenKind::FloatLiteral, TokenKind::Eof]);
    }

    #[test]
    fn bad_hex_literal_is_reported() {
        let (tokens, errors) = Lexer::tokenize_with_errors("&H");
        assert_eq!(tokens[0].kind, TokenKind::Error);
        assert_eq!(
            errors[0].kind,
            LexErrorKind::InvalidNumberLiteral("&H".to_string())
        );
    }

    #[test]
    fn concatenation_is_not_hex() {
        assert_eq!(
            kinds("a & h"),
            vec![
                TokenKind::Ident,
                TokenKind::Whitespace,
                TokenKind::Amp,
                TokenKind::Whitespace,
                TokenKind::Ident,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn date_literal_versus_file_number() {
        assert_eq!(kinds("#1/2/2000#"), vec![TokenKind::DateLiteral, TokenKind::Eof]);
        assert_eq!(
            kinds("#1, x"),
            vec![
                TokenKind::Hash,
                TokenKind::IntLiteral,
                TokenKind::Comma,
                TokenKind::Whitespace,
                TokenKind::Ident,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn strings_with_escaped_quotes() {
        let source = "\"say \"\"hi\"\"\"";
        assert_eq!(kinds(source), vec![TokenKind::StringLiteral, TokenKind::Eof]);
        assert_eq!(texts(source)[0], source);
    }

    #[test]
    fn interpolated_string() {
        assert_eq!(
            kinds("$\"Time elapsed {sw.Elapsed}\""),
            vec![TokenKind::StringLiteral, TokenKind::Eof]
        );
    }

    #[test]
    fn unterminated_string_stops_at_line_end() {
        let (tokens, errors) = Lexer::tokenize_with_errors("x = \"oops\ny");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, LexErrorKind::UnterminatedString);
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert!(kinds.contains(&TokenKind::Newline));
    }

    #[test]
    fn identifier_suffixes() {
        assert_eq!(
            kinds("Left$(s)"),
            vec![
                TokenKind::Ident,
                TokenKind::LParen,
                TokenKind::Ident,
                TokenKind::RParen,
                TokenKind::Eof
            ]
        );
        assert_eq!(
            kinds("rs!Name"),
            vec![TokenKind::Ident, TokenKind::Bang, TokenKind::Ident, TokenKind::Eof]
        );
        assert_eq!(texts("n% = 1")[0], "n%");
    }

    #[test]
    fn bracketed_identifier() {
        assert_eq!(kinds("[Sub]"), vec![TokenKind::Ident, TokenKind::Eof]);
    }

    #[test]
    fn named_argument_operator() {
        assert_eq!(
            kinds("x:=1"),
            vec![TokenKind::Ident, TokenKind::ColonEq, TokenKind::IntLiteral, TokenKind::Eof]
        );
    }

    #[test]
    fn unexpected_character_is_recovered() {
        let (tokens, errors) = Lexer::tokenize_with_errors("a ~ b");
        assert_eq!(errors[0].kind, LexErrorKind::UnexpectedCharacter('~'));
        assert_eq!(tokens.len(), 6);
    }
}
