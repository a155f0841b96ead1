//! Single-pass scanner producing cooked tokens.
//!
//! Main dispatch is on the first byte of each token. Multi-character
//! operators are matched longest-first by peeking ahead. Errors are encoded
//! as [`TokenKind::Error`] tokens, never as `Result::Err`, so scanning is
//! total.

use jexl_ir::{LexError, Number, Span, Token, TokenKind};

use crate::cursor::Cursor;
use crate::keywords;

pub(crate) struct Scanner<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Scanner {
            cursor: Cursor::new(source),
        }
    }

    /// Produce the next token; returns `Eof` forever once input runs out.
    pub(crate) fn next_token(&mut self) -> Token {
        if let Some(error) = self.skip_trivia() {
            return error;
        }
        let start = self.cursor.pos();
        if self.cursor.is_eof() {
            return Token::new(TokenKind::Eof, Span::new(start, start), "");
        }

        let b = self.cursor.current();
        let kind = match b {
            b'0'..=b'9' => self.number(),
            b'"' | b'\'' => self.string(b),
            b if is_ident_start_byte(b) => self.ident(),
            b if b >= 0x80 => {
                if self.cursor.current_char().is_some_and(char::is_alphabetic) {
                    self.ident()
                } else {
                    let c = self.cursor.current_char().unwrap_or('\u{FFFD}');
                    self.cursor.advance_char();
                    TokenKind::Error(LexError::UnexpectedChar(c))
                }
            }
            _ => self.operator(b),
        };
        let end = self.cursor.pos();
        Token::new(kind, Span::new(start, end), self.cursor.slice_from(start))
    }

    /// Skip whitespace and comments.
    ///
    /// An unterminated block comment comes back as an error token covering
    /// the comment.
    fn skip_trivia(&mut self) -> Option<Token> {
        loop {
            match (self.cursor.current(), self.cursor.peek()) {
                (b' ' | b'\t' | b'\n' | b'\r' | 0x0C, _) if !self.cursor.is_eof() => {
                    self.cursor.advance();
                }
                (b'/', b'/') => self.cursor.skip_line(),
                (b'/', b'*') => {
                    let start = self.cursor.pos();
                    self.cursor.advance_n(2);
                    if !self.cursor.skip_block_comment_body() {
                        let end = self.cursor.pos();
                        return Some(Token::new(
                            TokenKind::Error(LexError::UnterminatedComment),
                            Span::new(start, end),
                            self.cursor.slice_from(start),
                        ));
                    }
                }
                _ => return None,
            }
        }
    }

    /// Integer or decimal literal. A `.` is part of the number only when a
    /// digit follows, so `1..3` stays a range and `1.foo` a property access.
    fn number(&mut self) -> TokenKind {
        let start = self.cursor.pos();
        self.cursor.eat_while(|b| b.is_ascii_digit());
        if self.cursor.current() == b'.' && self.cursor.peek().is_ascii_digit() {
            self.cursor.advance();
            self.cursor.eat_while(|b| b.is_ascii_digit());
        }
        let text = self.cursor.slice_from(start);
        match Number::parse_decimal(text) {
            Some(n) => TokenKind::Number(n),
            None => TokenKind::Error(LexError::UnexpectedChar(
                text.chars().next().unwrap_or('0'),
            )),
        }
    }

    fn ident(&mut self) -> TokenKind {
        let start = self.cursor.pos();
        loop {
            let b = self.cursor.current();
            if b.is_ascii_alphanumeric() || b == b'_' || b == b'$' {
                self.cursor.advance();
            } else if b >= 0x80
                && self
                    .cursor
                    .current_char()
                    .is_some_and(char::is_alphanumeric)
            {
                self.cursor.advance_char();
            } else {
                break;
            }
        }
        let text = self.cursor.slice_from(start);
        keywords::lookup(text).unwrap_or_else(|| TokenKind::Ident(text.to_string()))
    }

    /// Quoted string with escapes. The whole literal is consumed even when
    /// an escape is bad, so scanning resumes after the closing quote.
    fn string(&mut self, quote: u8) -> TokenKind {
        self.cursor.advance();
        let mut value = String::new();
        let mut error = None;
        loop {
            if self.cursor.is_eof() {
                return TokenKind::Error(LexError::UnterminatedString);
            }
            let b = self.cursor.current();
            if b == quote {
                self.cursor.advance();
                break;
            }
            if b == b'\\' {
                self.cursor.advance();
                match self.escape() {
                    Ok(c) => value.push(c),
                    Err(e) => {
                        error.get_or_insert(e);
                    }
                }
                continue;
            }
            match self.cursor.current_char() {
                Some(c) => {
                    value.push(c);
                    self.cursor.advance_char();
                }
                None => return TokenKind::Error(LexError::UnterminatedString),
            }
        }
        match error {
            Some(e) => TokenKind::Error(e),
            None => TokenKind::Str(value),
        }
    }

    /// Cook one escape; the cursor sits just after the backslash.
    fn escape(&mut self) -> Result<char, LexError> {
        let Some(c) = self.cursor.current_char() else {
            return Err(LexError::UnterminatedString);
        };
        self.cursor.advance_char();
        match c {
            'n' => Ok('\n'),
            't' => Ok('\t'),
            'r' => Ok('\r'),
            '0' => Ok('\0'),
            '"' | '\'' | '\\' => Ok(c),
            'u' => {
                let mut code = 0u32;
                for _ in 0..4 {
                    let digit = char::from(self.cursor.current())
                        .to_digit(16)
                        .ok_or(LexError::InvalidUnicodeEscape)?;
                    code = code * 16 + digit;
                    self.cursor.advance();
                }
                char::from_u32(code).ok_or(LexError::InvalidUnicodeEscape)
            }
            other => Err(LexError::InvalidEscape(other)),
        }
    }

    fn operator(&mut self, b: u8) -> TokenKind {
        let c = &mut self.cursor;
        let (kind, len) = match (b, c.peek()) {
            (b'>', b'>') => match (c.peek2(), c.peek3()) {
                (b'>', b'=') => (TokenKind::UshrEq, 4),
                (b'>', _) => (TokenKind::Ushr, 3),
                (b'=', _) => (TokenKind::ShrEq, 3),
                _ => (TokenKind::Shr, 2),
            },
            (b'>', b'=') => (TokenKind::GtEq, 2),
            (b'>', _) => (TokenKind::Gt, 1),
            (b'<', b'<') if c.peek2() == b'=' => (TokenKind::ShlEq, 3),
            (b'<', b'<') => (TokenKind::Shl, 2),
            (b'<', b'=') => (TokenKind::LtEq, 2),
            (b'<', _) => (TokenKind::Lt, 1),
            (b'!', b'~') => (TokenKind::NotMatch, 2),
            (b'!', b'^') => (TokenKind::NotStartsWith, 2),
            (b'!', b'$') => (TokenKind::NotEndsWith, 2),
            (b'!', b'=') => (TokenKind::NotEq, 2),
            (b'!', _) => (TokenKind::Bang, 1),
            (b'=', b'~') => (TokenKind::Match, 2),
            (b'=', b'^') => (TokenKind::StartsWith, 2),
            (b'=', b'$') => (TokenKind::EndsWith, 2),
            (b'=', b'=') => (TokenKind::EqEq, 2),
            (b'=', b'>') => (TokenKind::FatArrow, 2),
            (b'=', _) => (TokenKind::Assign, 1),
            (b'?', b'?') => (TokenKind::QuestionQuestion, 2),
            (b'?', _) => (TokenKind::Question, 1),
            (b'.', b'.') => (TokenKind::DotDot, 2),
            (b'.', _) => (TokenKind::Dot, 1),
            (b'&', b'&') => (TokenKind::AmpAmp, 2),
            (b'&', b'=') => (TokenKind::AmpEq, 2),
            (b'&', _) => (TokenKind::Amp, 1),
            (b'|', b'|') => (TokenKind::PipePipe, 2),
            (b'|', b'=') => (TokenKind::PipeEq, 2),
            (b'|', _) => (TokenKind::Pipe, 1),
            (b'+', b'+') => (TokenKind::PlusPlus, 2),
            (b'+', b'=') => (TokenKind::PlusEq, 2),
            (b'+', _) => (TokenKind::Plus, 1),
            (b'-', b'-') => (TokenKind::MinusMinus, 2),
            (b'-', b'=') => (TokenKind::MinusEq, 2),
            (b'-', b'>') => (TokenKind::Arrow, 2),
            (b'-', _) => (TokenKind::Minus, 1),
            (b'*', b'=') => (TokenKind::StarEq, 2),
            (b'*', _) => (TokenKind::Star, 1),
            (b'/', b'=') => (TokenKind::SlashEq, 2),
            (b'/', _) => (TokenKind::Slash, 1),
            (b'%', b'=') => (TokenKind::PercentEq, 2),
            (b'%', _) => (TokenKind::Percent, 1),
            (b'^', b'=') => (TokenKind::CaretEq, 2),
            (b'^', _) => (TokenKind::Caret, 1),
            (b'(', _) => (TokenKind::LParen, 1),
            (b')', _) => (TokenKind::RParen, 1),
            (b'[', _) => (TokenKind::LBracket, 1),
            (b']', _) => (TokenKind::RBracket, 1),
            (b'{', _) => (TokenKind::LBrace, 1),
            (b'}', _) => (TokenKind::RBrace, 1),
            (b',', _) => (TokenKind::Comma, 1),
            (b';', _) => (TokenKind::Semicolon, 1),
            (b':', _) => (TokenKind::Colon, 1),
            (b'~', _) => (TokenKind::Tilde, 1),
            (b'@', _) => (TokenKind::At, 1),
            (b'#', _) => (TokenKind::Hash, 1),
            _ => {
                let ch = c.current_char().unwrap_or(char::from(b));
                c.advance_char();
                return TokenKind::Error(LexError::UnexpectedChar(ch));
            }
        };
        c.advance_n(len);
        kind
    }
}

#[inline]
fn is_ident_start_byte(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}
