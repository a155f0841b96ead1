//! Statements.
//!
//! A statement is tried first; anything that does not start with a
//! statement keyword is parsed as an expression statement. Simple
//! statements end with `;`, or just before `}`, `else` or end of input.

use jexl_ir::{Annotation, Features, Literal, Node, NodeKind, Number, Pragma, Span, TokenKind};
use jexl_stack::ensure_sufficient_stack;
use tracing::{debug, trace};

use crate::{ErrorCode, ParseError, Parser};

impl Parser<'_> {
    /// Parse one statement. Returns `None` for constructs that produce no
    /// node (an empty `;` or a `#pragma`).
    pub(crate) fn parse_statement(&mut self) -> Result<Option<Node>, ParseError> {
        ensure_sufficient_stack(|| self.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> Result<Option<Node>, ParseError> {
        let node = match self.current_kind() {
            TokenKind::Semicolon => {
                self.advance();
                return Ok(None);
            }
            TokenKind::Hash => {
                self.parse_pragma()?;
                return Ok(None);
            }
            TokenKind::If => self.parse_if()?,
            TokenKind::For => self.parse_for()?,
            TokenKind::While => self.parse_while()?,
            TokenKind::Do => self.parse_do()?,
            TokenKind::LBrace => self.parse_block()?,
            TokenKind::At => self.parse_annotated()?,
            TokenKind::Break | TokenKind::Continue => self.parse_loop_control()?,
            TokenKind::Return => self.parse_return()?,
            TokenKind::Var => self.parse_var()?,
            _ => {
                let expr = self.parse_expr()?;
                self.end_simple_statement();
                expr
            }
        };
        Ok(Some(node))
    }

    /// Optional `;` after a simple statement. The next statement starts
    /// wherever the expression grammar stops.
    fn end_simple_statement(&mut self) {
        self.eat(&TokenKind::Semicolon);
    }

    /// Body of a branch or loop; a lone `;` is an empty body.
    fn parse_body(&mut self) -> Result<Node, ParseError> {
        let span = self.current_span();
        if self.eat(&TokenKind::Semicolon) {
            return Ok(Node::new(NodeKind::Block(Vec::new()), span));
        }
        match self.parse_statement()? {
            Some(node) => Ok(node),
            None => Err(ParseError::new(
                ErrorCode::E1001,
                "expected statement, found pragma",
                span,
            )),
        }
    }

    /// `{ statements }`
    pub(crate) fn parse_block(&mut self) -> Result<Node, ParseError> {
        let start = self.current_span();
        self.expect(&TokenKind::LBrace)?;
        self.push_scope(false);
        let statements = self.parse_block_statements();
        self.pop_scope();
        let statements = statements?;
        Ok(Node::new(NodeKind::Block(statements), self.span_from(start)))
    }

    fn parse_block_statements(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut statements = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.is_at_end() {
                return Err(ParseError::unexpected(
                    self.current_kind(),
                    "'}'",
                    self.current_span(),
                ));
            }
            if let Some(statement) = self.parse_statement()? {
                statements.push(statement);
            }
        }
        self.advance();
        Ok(statements)
    }

    /// `( expr )` around loop and branch conditions.
    fn parse_paren_condition(&mut self) -> Result<Node, ParseError> {
        self.expect(&TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        Ok(cond)
    }

    /// `if (c) then [;] [else otherwise]`. The `else` attaches to the
    /// innermost `if` still being parsed.
    fn parse_if(&mut self) -> Result<Node, ParseError> {
        let start = self.current_span();
        self.advance();
        let cond = self.parse_paren_condition()?;
        let then_branch = self.parse_body()?;
        if self.check(&TokenKind::Semicolon) && self.cursor.peek_kind_at(1) == &TokenKind::Else {
            self.advance();
        }
        let else_branch = if self.eat(&TokenKind::Else) {
            Some(Box::new(self.parse_body()?))
        } else {
            None
        };
        Ok(Node::new(
            NodeKind::If {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch,
            },
            self.span_from(start),
        ))
    }

    fn parse_loop_body(&mut self) -> Result<Node, ParseError> {
        self.loop_depth += 1;
        let body = self.parse_body();
        self.loop_depth -= 1;
        body
    }

    /// `for (init; cond; step) body` or `for ([var] x : iterable) body`.
    fn parse_for(&mut self) -> Result<Node, ParseError> {
        let start = self.current_span();
        self.require(Features::LOOPS, start)?;
        self.advance();
        self.expect(&TokenKind::LParen)?;
        self.push_scope(false);
        let node = if self.foreach_ahead() {
            self.parse_foreach_rest(start)
        } else {
            self.parse_c_for_rest(start)
        };
        self.pop_scope();
        node
    }

    /// `var x :` or `x :` right after `for (`.
    fn foreach_ahead(&self) -> bool {
        let at = |n| self.cursor.peek_kind_at(n);
        match at(0) {
            TokenKind::Var => matches!(at(1), TokenKind::Ident(_)) && at(2) == &TokenKind::Colon,
            TokenKind::Ident(_) => at(1) == &TokenKind::Colon,
            _ => false,
        }
    }

    fn parse_foreach_rest(&mut self, start: Span) -> Result<Node, ParseError> {
        let declared = self.eat(&TokenKind::Var);
        let (var, var_span) = self.cursor.expect_ident()?;
        if declared {
            self.require(Features::LOCAL_VAR, var_span)?;
            self.declare(&var, var_span)?;
        }
        self.expect(&TokenKind::Colon)?;
        let iterable = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_loop_body()?;
        trace!(var = %var, declared, "foreach");
        Ok(Node::new(
            NodeKind::Foreach {
                var,
                declared,
                iterable: Box::new(iterable),
                body: Box::new(body),
            },
            self.span_from(start),
        ))
    }

    fn parse_c_for_rest(&mut self, start: Span) -> Result<Node, ParseError> {
        let init = if self.check(&TokenKind::Semicolon) {
            None
        } else if self.check(&TokenKind::Var) {
            Some(Box::new(self.parse_var_decl()?))
        } else {
            Some(Box::new(self.parse_expr()?))
        };
        self.expect(&TokenKind::Semicolon)?;
        let cond = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };
        self.expect(&TokenKind::Semicolon)?;
        let step = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };
        self.expect(&TokenKind::RParen)?;
        let body = self.parse_loop_body()?;
        Ok(Node::new(
            NodeKind::For {
                init,
                cond,
                step,
                body: Box::new(body),
            },
            self.span_from(start),
        ))
    }

    /// `while (c) body`
    fn parse_while(&mut self) -> Result<Node, ParseError> {
        let start = self.current_span();
        self.require(Features::LOOPS, start)?;
        self.advance();
        let cond = self.parse_paren_condition()?;
        let body = self.parse_loop_body()?;
        Ok(Node::new(
            NodeKind::While {
                cond: Box::new(cond),
                body: Box::new(body),
            },
            self.span_from(start),
        ))
    }

    /// `do body while (c)`
    fn parse_do(&mut self) -> Result<Node, ParseError> {
        let start = self.current_span();
        self.require(Features::LOOPS, start)?;
        self.advance();
        let body = self.parse_loop_body()?;
        self.expect(&TokenKind::While)?;
        let cond = self.parse_paren_condition()?;
        self.end_simple_statement();
        Ok(Node::new(
            NodeKind::DoWhile {
                body: Box::new(body),
                cond: Box::new(cond),
            },
            self.span_from(start),
        ))
    }

    fn parse_loop_control(&mut self) -> Result<Node, ParseError> {
        let token = self.advance();
        if self.loop_depth == 0 {
            return Err(ParseError::outside_loop(&token.literal, token.span));
        }
        let kind = if token.kind == TokenKind::Break {
            NodeKind::Break
        } else {
            NodeKind::Continue
        };
        self.end_simple_statement();
        Ok(Node::new(kind, token.span))
    }

    /// `return [expr]`
    fn parse_return(&mut self) -> Result<Node, ParseError> {
        let start = self.current_span();
        self.advance();
        let value = match self.current_kind() {
            TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof => None,
            _ => Some(Box::new(self.parse_expr()?)),
        };
        self.end_simple_statement();
        Ok(Node::new(NodeKind::Return(value), self.span_from(start)))
    }

    fn parse_var(&mut self) -> Result<Node, ParseError> {
        let node = self.parse_var_decl()?;
        self.end_simple_statement();
        Ok(node)
    }

    /// `var x [= expr]` without the terminator.
    fn parse_var_decl(&mut self) -> Result<Node, ParseError> {
        let start = self.current_span();
        self.require(Features::LOCAL_VAR, start)?;
        self.advance();
        let (name, name_span) = self.cursor.expect_ident()?;
        // The initializer is resolved before the name comes into scope.
        let init = if self.eat(&TokenKind::Assign) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        self.declare(&name, name_span)?;
        Ok(Node::new(NodeKind::Var { name, init }, self.span_from(start)))
    }

    /// `@name` or `@name(args)` followed by the statement it applies to.
    fn parse_annotated(&mut self) -> Result<Node, ParseError> {
        let start = self.current_span();
        self.require(Features::ANNOTATION, start)?;
        self.advance();
        let (name, _) = self.member_word()?;
        let args = if self.check(&TokenKind::LParen) {
            self.parse_call_args()?
        } else {
            Vec::new()
        };
        let statement = self.parse_body()?;
        Ok(Node::new(
            NodeKind::Annotated {
                annotation: Annotation { name, args },
                statement: Box::new(statement),
            },
            self.span_from(start),
        ))
    }

    /// An identifier or keyword spelled with letters, e.g. `silent` or `if`.
    fn member_word(&mut self) -> Result<(String, Span), ParseError> {
        let token = self.current();
        let is_word = !token.literal.is_empty()
            && token
                .literal
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'$')
            && !matches!(token.kind, TokenKind::Number(_) | TokenKind::Str(_));
        if !is_word {
            return Err(ParseError::unexpected(
                &token.kind,
                "identifier",
                self.current_span(),
            ));
        }
        self.advance();
        Ok((token.literal.clone(), token.span))
    }

    /// `#pragma key.path value`; the key is a dotted name, the value a
    /// literal or a dotted name (kept as a string).
    fn parse_pragma(&mut self) -> Result<(), ParseError> {
        let start = self.current_span();
        self.require(Features::PRAGMA, start)?;
        self.advance();
        let (word, word_span) = self.member_word()?;
        if word != "pragma" {
            return Err(ParseError::new(
                ErrorCode::E1010,
                format!("expected 'pragma' after '#', found '{word}'"),
                word_span,
            ));
        }
        let key = self.dotted_name()?;
        let value = match self.current_kind() {
            TokenKind::Number(n) => {
                let value = Literal::Number(n.clone());
                self.advance();
                value
            }
            TokenKind::Minus => {
                self.advance();
                match self.current_kind() {
                    TokenKind::Number(n) => {
                        let value = Literal::Number(Number::from_rational(-n.as_rational()));
                        self.advance();
                        value
                    }
                    kind => {
                        return Err(ParseError::unexpected(kind, "number", self.current_span()))
                    }
                }
            }
            TokenKind::Str(s) => {
                let value = Literal::Str(s.clone());
                self.advance();
                value
            }
            TokenKind::True => {
                self.advance();
                Literal::Bool(true)
            }
            TokenKind::False => {
                self.advance();
                Literal::Bool(false)
            }
            TokenKind::Null => {
                self.advance();
                Literal::Nil
            }
            TokenKind::Ident(_) => Literal::Str(self.dotted_name()?),
            kind => {
                return Err(ParseError::new(
                    ErrorCode::E1010,
                    format!("expected pragma value, found {}", kind.describe()),
                    self.current_span(),
                ))
            }
        };
        self.eat(&TokenKind::Semicolon);
        debug!(key = %key, value = %value, "pragma");
        self.pragmas.push(Pragma { key, value });
        Ok(())
    }

    /// `a.b.c` as a single string.
    fn dotted_name(&mut self) -> Result<String, ParseError> {
        let (mut name, _) = self.member_word()?;
        while self.check(&TokenKind::Dot) {
            self.advance();
            let (part, _) = self.member_word()?;
            name.push('.');
            name.push_str(&part);
        }
        Ok(name)
    }
}
