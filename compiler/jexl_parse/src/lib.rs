//! Recursive descent parser for jexl.
//!
//! Binary expressions use precedence climbing driven by the static operator
//! table in [`jexl_ir::operators`]; statements are plain recursive descent.
//! The parser stops at the first error; there is no recovery.
//!
//! Two entry points:
//!
//! - [`parse_expression`]: a single expression, as used by `Expression`
//! - [`parse_script`]: a statement sequence with optional parameters, as used
//!   by `Script`. The result is a [`NodeKind::Script`] node.

mod cursor;
mod error;
mod grammar;

pub use cursor::Cursor;
pub use error::{ErrorCode, ParseError};

use jexl_ir::{Features, Node, NodeKind, Pragma, Span, Token, TokenKind};
use rustc_hash::FxHashSet;
use tracing::debug;

/// Declared names of one block.
#[derive(Default)]
struct Scope {
    names: FxHashSet<String>,
    /// Lambda parameter scopes and the script root start a new function.
    function_boundary: bool,
}

/// Parser state.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    features: Features,
    /// Nesting depth of loops in the current function body.
    loop_depth: u32,
    scopes: Vec<Scope>,
    pragmas: Vec<Pragma>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], features: Features) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            features,
            loop_depth: 0,
            scopes: vec![Scope {
                names: FxHashSet::default(),
                function_boundary: true,
            }],
            pragmas: Vec::new(),
        }
    }

    #[inline]
    fn current(&self) -> &'a Token {
        self.cursor.current()
    }

    #[inline]
    fn current_kind(&self) -> &'a TokenKind {
        self.cursor.current_kind()
    }

    #[inline]
    fn current_span(&self) -> Span {
        self.cursor.current_span()
    }

    #[inline]
    fn check(&self, kind: &TokenKind) -> bool {
        self.cursor.check(kind)
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.cursor.is_at_end()
    }

    #[inline]
    fn advance(&mut self) -> &'a Token {
        self.cursor.advance()
    }

    #[inline]
    fn eat(&mut self, kind: &TokenKind) -> bool {
        self.cursor.eat(kind)
    }

    #[inline]
    fn expect(&mut self, kind: &TokenKind) -> Result<&'a Token, ParseError> {
        self.cursor.expect(kind)
    }

    /// Span from `start` to the end of the last consumed token.
    fn span_from(&self, start: Span) -> Span {
        start.merge(self.cursor.previous_span())
    }

    fn require(&self, feature: Features, span: Span) -> Result<(), ParseError> {
        if self.features.contains(feature) {
            Ok(())
        } else {
            Err(ParseError::feature_disabled(feature, span))
        }
    }

    fn push_scope(&mut self, function_boundary: bool) {
        self.scopes.push(Scope {
            names: FxHashSet::default(),
            function_boundary,
        });
    }

    fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Record a declaration in the innermost scope, enforcing the lexical
    /// features.
    fn declare(&mut self, name: &str, span: Span) -> Result<(), ParseError> {
        let lexical = self.features.contains(Features::LEXICAL);
        let shade = self.features.contains(Features::LEXICAL_SHADE);
        let mut scopes = self.scopes.iter().rev();
        if let Some(current) = scopes.next() {
            if lexical && current.names.contains(name) {
                return Err(ParseError::new(
                    ErrorCode::E1007,
                    format!("variable '{name}' is already declared in this block"),
                    span,
                ));
            }
            if shade && !current.function_boundary {
                for scope in scopes {
                    if scope.names.contains(name) {
                        return Err(ParseError::new(
                            ErrorCode::E1008,
                            format!("variable '{name}' shadows a variable of an enclosing block"),
                            span,
                        ));
                    }
                    if scope.function_boundary {
                        break;
                    }
                }
            }
        }
        if let Some(current) = self.scopes.last_mut() {
            current.names.insert(name.to_string());
        }
        Ok(())
    }

    /// Fail on the first lexer error token, if any.
    fn check_lex_errors(tokens: &[Token]) -> Result<(), ParseError> {
        match jexl_lexer::first_error(tokens) {
            Some(Token {
                kind: TokenKind::Error(err),
                span,
                ..
            }) => Err(ParseError::new(ErrorCode::E1003, err.to_string(), *span)),
            _ => Ok(()),
        }
    }

    /// Parse one expression covering the whole input.
    pub fn parse_expression(mut self) -> Result<Node, ParseError> {
        let node = self.parse_expr()?;
        while self.eat(&TokenKind::Semicolon) {}
        self.expect_end()?;
        Ok(node)
    }

    /// Parse a script body: statements until end of input.
    pub fn parse_script(mut self, params: &[String]) -> Result<Node, ParseError> {
        let start = self.current_span();
        for param in params {
            self.declare(param, start)?;
        }
        let mut body = Vec::new();
        if self.features.contains(Features::SCRIPT) {
            while !self.is_at_end() {
                if let Some(statement) = self.parse_statement()? {
                    body.push(statement);
                }
            }
        } else {
            if !self.is_at_end() {
                body.push(self.parse_expr()?);
            }
            while self.eat(&TokenKind::Semicolon) {}
            self.expect_end()?;
        }
        let span = if body.is_empty() {
            start
        } else {
            self.span_from(start)
        };
        debug!(statements = body.len(), pragmas = self.pragmas.len(), "parsed script");
        Ok(Node::new(
            NodeKind::Script {
                body,
                pragmas: self.pragmas,
            },
            span,
        ))
    }

    fn expect_end(&self) -> Result<(), ParseError> {
        if self.is_at_end() {
            Ok(())
        } else {
            Err(ParseError::new(
                ErrorCode::E1009,
                format!(
                    "unexpected {} after end of expression",
                    self.current_kind().describe()
                ),
                self.current_span(),
            ))
        }
    }
}

/// Parse `tokens` as a single expression.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn parse_expression(tokens: &[Token], features: Features) -> Result<Node, ParseError> {
    Parser::check_lex_errors(tokens)?;
    Parser::new(tokens, features).parse_expression()
}

/// Parse `tokens` as a script whose parameters are `params`.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len(), params = params.len()))]
pub fn parse_script(
    tokens: &[Token],
    features: Features,
    params: &[String],
) -> Result<Node, ParseError> {
    Parser::check_lex_errors(tokens)?;
    Parser::new(tokens, features).parse_script(params)
}

#[cfg(test)]
mod tests;
