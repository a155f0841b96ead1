//! Assignment, conditional and binary expressions.
//!
//! Binding power comes from the operator table: the loop in
//! [`Parser::parse_binary`] consumes operators whose precedence is at least
//! `min_prec` and parses the right operand at `precedence + 1`, which makes
//! every binary operator left-associative. Assignment and the conditional
//! forms are right-associative and handled by their own levels above it.

use jexl_ir::operators::{self, prec, OperatorInfo};
use jexl_ir::{BinaryOp, Features, Literal, Node, NodeKind, Number, Operator, Span, TokenKind};
use jexl_stack::ensure_sufficient_stack;

use crate::{ParseError, Parser};

impl Parser<'_> {
    /// Parse a full expression (assignment level).
    pub(crate) fn parse_expr(&mut self) -> Result<Node, ParseError> {
        ensure_sufficient_stack(|| self.parse_assignment())
    }

    /// Infix table entry for the current token, if it is an operator.
    pub(crate) fn infix_info(&self) -> Option<&'static OperatorInfo> {
        match self.current_kind() {
            TokenKind::Ident(_)
            | TokenKind::Str(_)
            | TokenKind::Number(_)
            | TokenKind::Error(_)
            | TokenKind::Eof => None,
            _ => operators::lookup_infix(&self.current().literal),
        }
    }

    /// `target = value`, `target op= value`; right-associative.
    fn parse_assignment(&mut self) -> Result<Node, ParseError> {
        let start = self.current_span();
        let target = self.parse_conditional()?;
        let base = match self.infix_info().map(|info| info.operator) {
            Some(Operator::Assign) => None,
            Some(Operator::Compound(op)) => Some(op),
            _ => return Ok(target),
        };
        let op_span = self.current_span();
        self.require(Features::SIDE_EFFECT, op_span)?;
        if !target.is_assignable() {
            return Err(ParseError::invalid_assignment_target(target.span));
        }
        self.advance();
        let rhs = self.parse_assignment()?;
        let span = self.span_from(start);
        let value = match base {
            Some(op) => Node::new(
                NodeKind::Binary {
                    op,
                    left: Box::new(target.clone()),
                    right: Box::new(rhs),
                },
                span,
            ),
            None => rhs,
        };
        Ok(Node::new(
            NodeKind::Assign {
                target: Box::new(target),
                value: Box::new(value),
                postfix: false,
            },
            span,
        ))
    }

    /// `c ? a : b`, `a ?: b`, `a ?? b`; right-associative.
    fn parse_conditional(&mut self) -> Result<Node, ParseError> {
        let start = self.current_span();
        let cond = self.parse_binary(prec::OR)?;
        match self.current_kind() {
            TokenKind::Question if self.cursor.peek_kind_at(1) == &TokenKind::Colon => {
                self.advance();
                self.advance();
                let right = self.parse_conditional()?;
                Ok(Node::new(
                    NodeKind::Elvis {
                        left: Box::new(cond),
                        right: Box::new(right),
                        coalesce: false,
                    },
                    self.span_from(start),
                ))
            }
            TokenKind::Question => {
                self.advance();
                let then_branch = self.parse_expr()?;
                self.expect(&TokenKind::Colon)?;
                let else_branch = self.parse_conditional()?;
                Ok(Node::new(
                    NodeKind::Ternary {
                        cond: Box::new(cond),
                        then_branch: Box::new(then_branch),
                        else_branch: Box::new(else_branch),
                    },
                    self.span_from(start),
                ))
            }
            TokenKind::QuestionQuestion => {
                self.advance();
                let right = self.parse_conditional()?;
                Ok(Node::new(
                    NodeKind::Elvis {
                        left: Box::new(cond),
                        right: Box::new(right),
                        coalesce: true,
                    },
                    self.span_from(start),
                ))
            }
            _ => Ok(cond),
        }
    }

    /// Precedence climbing over the binary operators.
    pub(crate) fn parse_binary(&mut self, min_prec: u8) -> Result<Node, ParseError> {
        let start = self.current_span();
        let mut left = self.parse_unary()?;
        loop {
            let Some(OperatorInfo {
                precedence,
                operator: Operator::Binary(op),
                ..
            }) = self.infix_info().copied()
            else {
                break;
            };
            if precedence < min_prec {
                break;
            }
            if self.current_kind().is_comparator_name() {
                self.require(Features::COMPARATOR_NAMES, self.current_span())?;
            }
            self.advance();
            let right = ensure_sufficient_stack(|| self.parse_binary(precedence + 1))?;
            let span = self.span_from(start);
            left = if op == BinaryOp::Range {
                Node::new(
                    NodeKind::Range {
                        from: Box::new(left),
                        to: Box::new(right),
                    },
                    span,
                )
            } else {
                Node::new(
                    NodeKind::Binary {
                        op,
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                    span,
                )
            };
        }
        Ok(left)
    }

    /// Desugar `++x`, `x++`, `--x`, `x--` into an assignment of `x op 1`.
    pub(crate) fn step_assign(
        &self,
        target: Node,
        op: BinaryOp,
        postfix: bool,
        span: Span,
    ) -> Result<Node, ParseError> {
        self.require(Features::SIDE_EFFECT, span)?;
        if !target.is_assignable() {
            return Err(ParseError::invalid_assignment_target(target.span));
        }
        let one = Node::new(NodeKind::Literal(Literal::Number(Number::one())), span);
        let value = Node::new(
            NodeKind::Binary {
                op,
                left: Box::new(target.clone()),
                right: Box::new(one),
            },
            span,
        );
        Ok(Node::new(
            NodeKind::Assign {
                target: Box::new(target),
                value: Box::new(value),
                postfix,
            },
            span,
        ))
    }
}
