//! Token cursor for navigating the token stream.

use jexl_ir::{Span, Token, TokenKind};
use tracing::trace;

use crate::ParseError;

static EOF: Token = Token {
    kind: TokenKind::Eof,
    span: Span::DUMMY,
    literal: String::new(),
};

/// Read position over a token slice.
///
/// Reads past the end yield an `Eof` token, so callers never index out of
/// bounds even when handed a stream without a trailing `Eof`.
pub struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Cursor { tokens, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Rewind or fast-forward; used to restore after speculative scans.
    pub fn set_position(&mut self, pos: usize) {
        self.pos = pos.min(self.tokens.len());
    }

    #[inline]
    pub fn current(&self) -> &'a Token {
        self.tokens.get(self.pos).unwrap_or(&EOF)
    }

    #[inline]
    pub fn current_kind(&self) -> &'a TokenKind {
        &self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        let token = self.current();
        if token.kind == TokenKind::Eof && token.span == Span::DUMMY {
            return self.end_span();
        }
        token.span
    }

    /// Span of the last consumed token.
    pub fn previous_span(&self) -> Span {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .map_or(Span::DUMMY, |t| t.span)
    }

    fn end_span(&self) -> Span {
        let end = self.tokens.last().map_or(0, |t| t.span.end);
        Span::new(end, end)
    }

    /// Kind of the token `n` positions ahead; `peek_kind_at(0)` is current.
    #[inline]
    pub fn peek_kind_at(&self, n: usize) -> &'a TokenKind {
        self.tokens.get(self.pos + n).map_or(&EOF.kind, |t| &t.kind)
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    #[inline]
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind() == kind
    }

    pub fn advance(&mut self) -> &'a Token {
        let token = self.current();
        trace!(token = ?token.kind, pos = self.pos, "advance");
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it is `kind`.
    pub fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume `kind` or fail naming it.
    pub fn expect(&mut self, kind: &TokenKind) -> Result<&'a Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::unexpected(
                self.current_kind(),
                &format!("'{}'", kind.symbol()),
                self.current_span(),
            ))
        }
    }

    /// Consume an identifier and return its name.
    pub fn expect_ident(&mut self) -> Result<(String, Span), ParseError> {
        if let TokenKind::Ident(name) = self.current_kind() {
            let span = self.advance().span;
            Ok((name.clone(), span))
        } else {
            Err(ParseError::unexpected(
                self.current_kind(),
                "identifier",
                self.current_span(),
            ))
        }
    }
}
