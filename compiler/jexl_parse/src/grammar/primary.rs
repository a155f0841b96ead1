//! Primary expressions: literals, identifiers, groupings, lambdas,
//! constructor calls and collection literals.

use std::sync::Arc;

use jexl_ir::{Features, Lambda, Literal, Node, NodeKind, Span, TokenKind};
use rustc_hash::FxHashSet;
use tracing::trace;

use crate::{ErrorCode, ParseError, Parser};

impl Parser<'_> {
    pub(crate) fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let token = self.current();
        let span = token.span;
        let literal =
            |lit: Literal| -> Result<Node, ParseError> { Ok(Node::new(NodeKind::Literal(lit), span)) };
        match &token.kind {
            TokenKind::Number(n) => {
                self.advance();
                literal(Literal::Number(n.clone()))
            }
            TokenKind::Str(s) => {
                self.advance();
                literal(Literal::Str(s.clone()))
            }
            TokenKind::True => {
                self.advance();
                literal(Literal::Bool(true))
            }
            TokenKind::False => {
                self.advance();
                literal(Literal::Bool(false))
            }
            TokenKind::Null => {
                self.advance();
                literal(Literal::Nil)
            }
            TokenKind::Ident(name) => {
                let next = self.cursor.peek_kind_at(1);
                if name == "new" && next == &TokenKind::LParen {
                    return self.parse_new();
                }
                if matches!(next, TokenKind::Arrow | TokenKind::FatArrow) {
                    return self.parse_lambda();
                }
                self.advance();
                Ok(Node::new(NodeKind::Ident(name.clone()), span))
            }
            TokenKind::LParen => {
                if self.lambda_ahead() {
                    return self.parse_lambda();
                }
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::LBracket => self.parse_array(),
            TokenKind::LBrace => self.parse_brace_literal(),
            kind => Err(ParseError::expected_expression(kind, self.current_span())),
        }
    }

    /// Whether the tokens at the cursor form `( ident, ... ) ->` or `() ->`.
    ///
    /// Pure lookahead: nothing is consumed, so a grouping parse can start
    /// from the same position.
    fn lambda_ahead(&self) -> bool {
        let at = |n| self.cursor.peek_kind_at(n);
        let mut n = 1;
        if at(n) != &TokenKind::RParen {
            loop {
                if !matches!(at(n), TokenKind::Ident(_)) {
                    return false;
                }
                n += 1;
                match at(n) {
                    TokenKind::Comma => n += 1,
                    TokenKind::RParen => break,
                    _ => return false,
                }
            }
        }
        matches!(at(n + 1), TokenKind::Arrow | TokenKind::FatArrow)
    }

    /// `x -> body`, `(a, b) -> body` or `() => body`.
    fn parse_lambda(&mut self) -> Result<Node, ParseError> {
        let start = self.current_span();
        self.require(Features::LAMBDA, start)?;

        let mut params = Vec::new();
        let mut seen = FxHashSet::default();
        let mut add_param = |name: String, span: Span| {
            if seen.insert(name.clone()) {
                params.push(name);
                Ok(())
            } else {
                Err(ParseError::new(
                    ErrorCode::E1011,
                    format!("duplicate parameter '{name}'"),
                    span,
                ))
            }
        };
        if self.eat(&TokenKind::LParen) {
            if !self.eat(&TokenKind::RParen) {
                loop {
                    let (name, span) = self.cursor.expect_ident()?;
                    add_param(name, span)?;
                    if !self.eat(&TokenKind::Comma) {
                        break;
                    }
                }
                self.expect(&TokenKind::RParen)?;
            }
        } else {
            let (name, span) = self.cursor.expect_ident()?;
            add_param(name, span)?;
        }
        if !self.eat(&TokenKind::Arrow) {
            self.expect(&TokenKind::FatArrow)?;
        }
        trace!(params = params.len(), "lambda");

        // Loops outside the lambda do not make `break` valid inside it.
        let outer_loops = std::mem::replace(&mut self.loop_depth, 0);
        self.push_scope(true);
        let body = self.parse_lambda_body(&params, start);
        self.pop_scope();
        self.loop_depth = outer_loops;
        let body = body?;

        Ok(Node::new(
            NodeKind::Lambda(Arc::new(Lambda::new(params, body))),
            self.span_from(start),
        ))
    }

    fn parse_lambda_body(&mut self, params: &[String], span: Span) -> Result<Node, ParseError> {
        for param in params {
            self.declare(param, span)?;
        }
        if self.check(&TokenKind::LBrace) {
            self.parse_block()
        } else {
            self.parse_expr()
        }
    }

    /// `new(class, args...)`
    fn parse_new(&mut self) -> Result<Node, ParseError> {
        let start = self.current_span();
        self.require(Features::NEW_INSTANCE, start)?;
        self.advance();
        let mut args = self.parse_call_args()?;
        if args.is_empty() {
            return Err(ParseError::new(
                ErrorCode::E1002,
                "new() requires a class name",
                self.span_from(start),
            ));
        }
        let class = args.remove(0);
        Ok(Node::new(
            NodeKind::New {
                class: Box::new(class),
                args,
            },
            self.span_from(start),
        ))
    }

    /// `[a, b, ...]`, trailing comma allowed.
    fn parse_array(&mut self) -> Result<Node, ParseError> {
        let start = self.current_span();
        self.require(Features::STRUCTURED_LITERAL, start)?;
        self.advance();
        let mut items = Vec::new();
        while !self.check(&TokenKind::RBracket) {
            items.push(self.parse_expr()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(&TokenKind::RBracket)?;
        Ok(Node::new(NodeKind::Array(items), self.span_from(start)))
    }

    /// `{}` / `{:}` empty map, `{k: v, ...}` map, `{a, b}` set. The kind is
    /// decided by whether a `:` follows the first inner expression.
    pub(crate) fn parse_brace_literal(&mut self) -> Result<Node, ParseError> {
        let start = self.current_span();
        self.require(Features::STRUCTURED_LITERAL, start)?;
        self.advance();
        if self.eat(&TokenKind::RBrace) {
            return Ok(Node::new(NodeKind::Map(Vec::new()), self.span_from(start)));
        }
        if self.check(&TokenKind::Colon) && self.cursor.peek_kind_at(1) == &TokenKind::RBrace {
            self.advance();
            self.advance();
            return Ok(Node::new(NodeKind::Map(Vec::new()), self.span_from(start)));
        }

        let first = self.parse_expr()?;
        if self.eat(&TokenKind::Colon) {
            let mut entries = vec![(first, self.parse_expr()?)];
            while self.eat(&TokenKind::Comma) {
                if self.check(&TokenKind::RBrace) {
                    break;
                }
                let key = self.parse_expr()?;
                self.expect(&TokenKind::Colon)?;
                entries.push((key, self.parse_expr()?));
            }
            self.expect(&TokenKind::RBrace)?;
            return Ok(Node::new(NodeKind::Map(entries), self.span_from(start)));
        }

        let mut items = vec![first];
        while self.eat(&TokenKind::Comma) {
            if self.check(&TokenKind::RBrace) {
                break;
            }
            items.push(self.parse_expr()?);
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(Node::new(NodeKind::Set(items), self.span_from(start)))
    }
}
