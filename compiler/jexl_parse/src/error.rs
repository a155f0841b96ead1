//! Parse error types.

use std::fmt;

use jexl_ir::{Features, Span, TokenKind};

/// Stable parse error codes (`E1xxx`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A token that cannot appear here.
    E1001,
    /// An expression was required.
    E1002,
    /// The lexer could not tokenize part of the input.
    E1003,
    /// The construct needs a grammar feature that is disabled.
    E1004,
    /// `break` or `continue` outside a loop.
    E1005,
    /// Left side of an assignment is not assignable.
    E1006,
    /// `var` redeclared in the same block.
    E1007,
    /// `var` shadows a local of an enclosing block.
    E1008,
    /// Input left over after a complete expression.
    E1009,
    /// Malformed `#pragma`.
    E1010,
    /// Lambda parameter named twice.
    E1011,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E1004 => "E1004",
            ErrorCode::E1005 => "E1005",
            ErrorCode::E1006 => "E1006",
            ErrorCode::E1007 => "E1007",
            ErrorCode::E1008 => "E1008",
            ErrorCode::E1009 => "E1009",
            ErrorCode::E1010 => "E1010",
            ErrorCode::E1011 => "E1011",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first grammar violation found in the input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
        }
    }

    #[cold]
    pub fn unexpected(found: &TokenKind, expected: &str, span: Span) -> Self {
        ParseError::new(
            ErrorCode::E1001,
            format!("expected {expected}, found {}", found.describe()),
            span,
        )
    }

    #[cold]
    pub fn expected_expression(found: &TokenKind, span: Span) -> Self {
        ParseError::new(
            ErrorCode::E1002,
            format!("expected expression, found {}", found.describe()),
            span,
        )
    }

    #[cold]
    pub fn feature_disabled(feature: Features, span: Span) -> Self {
        ParseError::new(
            ErrorCode::E1004,
            format!("{} are disabled", feature.describe()),
            span,
        )
    }

    #[cold]
    pub fn outside_loop(keyword: &str, span: Span) -> Self {
        ParseError::new(
            ErrorCode::E1005,
            format!("'{keyword}' outside of a loop"),
            span,
        )
    }

    #[cold]
    pub fn invalid_assignment_target(span: Span) -> Self {
        ParseError::new(ErrorCode::E1006, "invalid assignment target", span)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error[{}]: {} at {}", self.code, self.message, self.span)
    }
}

impl std::error::Error for ParseError {}
