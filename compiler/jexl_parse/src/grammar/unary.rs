//! Prefix operators and postfix access chains.

use jexl_ir::operators::{self, OperatorInfo};
use jexl_ir::{BinaryOp, Features, Node, NodeKind, Operator, Span, TokenKind, UnaryOp};
use jexl_stack::ensure_sufficient_stack;
use tracing::trace;

use crate::{ParseError, Parser};

impl Parser<'_> {
    fn prefix_info(&self) -> Option<&'static OperatorInfo> {
        match self.current_kind() {
            TokenKind::Ident(_)
            | TokenKind::Str(_)
            | TokenKind::Number(_)
            | TokenKind::Error(_)
            | TokenKind::Eof => None,
            _ => operators::lookup_prefix(&self.current().literal),
        }
    }

    /// Prefix operators chain right-associatively: `- - x`, `!empty x`.
    pub(crate) fn parse_unary(&mut self) -> Result<Node, ParseError> {
        let start = self.current_span();
        match self.prefix_info().map(|info| info.operator) {
            Some(Operator::Unary(op)) => {
                if op == UnaryOp::Not && self.check(&TokenKind::Not) {
                    self.require(Features::COMPARATOR_NAMES, start)?;
                }
                self.advance();
                let operand = ensure_sufficient_stack(|| self.parse_unary())?;
                Ok(Node::new(
                    NodeKind::Unary {
                        op,
                        operand: Box::new(operand),
                    },
                    self.span_from(start),
                ))
            }
            Some(Operator::Step(op)) => {
                self.advance();
                let operand = ensure_sufficient_stack(|| self.parse_unary())?;
                let span = self.span_from(start);
                self.step_assign(operand, op, false, span)
            }
            _ => self.parse_postfix(),
        }
    }

    /// Primary followed by any number of `.name`, `.name(args)`, `[index]`
    /// and `(args)`, optionally ending in `++`/`--`.
    fn parse_postfix(&mut self) -> Result<Node, ParseError> {
        let start = self.current_span();
        let mut expr = self.parse_primary()?;
        loop {
            match self.current_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let (name, name_span) = self.member_name()?;
                    if self.check(&TokenKind::LParen) {
                        self.require(Features::METHOD_CALL, name_span)?;
                        let args = self.parse_call_args()?;
                        trace!(method = %name, args = args.len(), "method call");
                        expr = Node::new(
                            NodeKind::MethodCall {
                                object: Box::new(expr),
                                method: name,
                                args,
                            },
                            self.span_from(start),
                        );
                    } else {
                        expr = Node::new(
                            NodeKind::Property {
                                object: Box::new(expr),
                                name,
                            },
                            self.span_from(start),
                        );
                    }
                }
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.parse_expr()?;
                    self.expect(&TokenKind::RBracket)?;
                    expr = Node::new(
                        NodeKind::Index {
                            object: Box::new(expr),
                            index: Box::new(index),
                        },
                        self.span_from(start),
                    );
                }
                TokenKind::LParen => {
                    let args = self.parse_call_args()?;
                    expr = Node::new(
                        NodeKind::Call {
                            callee: Box::new(expr),
                            args,
                        },
                        self.span_from(start),
                    );
                }
                TokenKind::PlusPlus | TokenKind::MinusMinus if expr.is_assignable() => {
                    let Some(op) = self.step_op() else {
                        break;
                    };
                    self.advance();
                    let span = self.span_from(start);
                    return self.step_assign(expr, op, true, span);
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn step_op(&self) -> Option<BinaryOp> {
        match self.prefix_info()?.operator {
            Operator::Step(op) => Some(op),
            _ => None,
        }
    }

    /// Member names after `.` may be identifiers, keywords, quoted
    /// strings or integer literals (`list.0`).
    fn member_name(&mut self) -> Result<(String, Span), ParseError> {
        let token = self.current();
        let name = match &token.kind {
            TokenKind::Ident(name) | TokenKind::Str(name) => Some(name.clone()),
            TokenKind::Number(n) if n.is_integer() => Some(token.literal.clone()),
            TokenKind::Eof | TokenKind::Error(_) => None,
            _ if token.literal.bytes().all(|b| b.is_ascii_alphabetic()) => {
                Some(token.literal.clone())
            }
            _ => None,
        };
        match name {
            Some(name) => {
                self.advance();
                Ok((name, token.span))
            }
            None => Err(ParseError::unexpected(
                &token.kind,
                "property name",
                self.current_span(),
            )),
        }
    }

    /// `( expr, ... )` with the cursor on the `(`.
    pub(crate) fn parse_call_args(&mut self) -> Result<Vec<Node>, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let mut args = Vec::new();
        if self.eat(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            self.expect(&TokenKind::RParen)?;
            return Ok(args);
        }
    }
}
