//! Token types produced by the lexer.

use std::fmt;

use crate::{Number, Span};

/// A lexed token.
///
/// `literal` is the raw source text the token was scanned from; the parsed
/// payload (identifier name, string contents, numeric value) lives in `kind`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub literal: String,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, literal: impl Into<String>) -> Self {
        Token {
            kind,
            span,
            literal: literal.into(),
        }
    }
}

/// Why a stretch of input could not be tokenized.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LexError {
    UnexpectedChar(char),
    UnterminatedString,
    InvalidEscape(char),
    InvalidUnicodeEscape,
    UnterminatedComment,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnexpectedChar(c) => write!(f, "unexpected character '{}'", c.escape_debug()),
            LexError::UnterminatedString => f.write_str("unterminated string literal"),
            LexError::InvalidEscape(c) => write!(f, "invalid escape sequence '\\{}'", c.escape_debug()),
            LexError::InvalidUnicodeEscape => f.write_str("invalid \\u escape, expected four hex digits"),
            LexError::UnterminatedComment => f.write_str("unterminated block comment"),
        }
    }
}

/// Token kinds.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TokenKind {
    // Payload-carrying
    Ident(String),
    Number(Number),
    Str(String),

    // Keywords
    If,
    Else,
    For,
    While,
    Do,
    Break,
    Continue,
    Return,
    Var,
    Empty,
    Size,
    Not,
    KwEq,
    KwNe,
    KwLt,
    KwLe,
    KwGt,
    KwGe,
    KwAnd,
    KwOr,
    True,
    False,
    /// Both `null` and `nil`.
    Null,

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Colon,
    Dot,
    DotDot,
    Question,
    QuestionQuestion,
    Arrow,
    FatArrow,
    At,
    Hash,
    Tilde,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,
    Assign,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShlEq,
    ShrEq,
    UshrEq,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Shl,
    Shr,
    Ushr,
    Amp,
    AmpAmp,
    Pipe,
    PipePipe,
    Caret,
    Bang,
    /// `=~`
    Match,
    /// `!~`
    NotMatch,
    /// `=^`
    StartsWith,
    /// `!^`
    NotStartsWith,
    /// `=$`
    EndsWith,
    /// `!$`
    NotEndsWith,

    Error(LexError),
    Eof,
}

impl TokenKind {
    /// Human-readable description used in parse error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("identifier '{name}'"),
            TokenKind::Number(n) => format!("number {n}"),
            TokenKind::Str(_) => "string literal".to_string(),
            TokenKind::Error(e) => e.to_string(),
            TokenKind::Eof => "end of input".to_string(),
            other => format!("'{}'", other.symbol()),
        }
    }

    /// Whether this is one of the keyword spellings of a comparator or
    /// logical operator (`eq`, `and`, `not`, ...).
    pub fn is_comparator_name(&self) -> bool {
        matches!(
            self,
            TokenKind::KwEq
                | TokenKind::KwNe
                | TokenKind::KwLt
                | TokenKind::KwLe
                | TokenKind::KwGt
                | TokenKind::KwGe
                | TokenKind::KwAnd
                | TokenKind::KwOr
                | TokenKind::Not
        )
    }

    /// Fixed source spelling of non-payload tokens.
    pub fn symbol(&self) -> &'static str {
        match self {
            TokenKind::Ident(_) => "identifier",
            TokenKind::Number(_) => "number",
            TokenKind::Str(_) => "string",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::For => "for",
            TokenKind::While => "while",
            TokenKind::Do => "do",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Return => "return",
            TokenKind::Var => "var",
            TokenKind::Empty => "empty",
            TokenKind::Size => "size",
            TokenKind::Not => "not",
            TokenKind::KwEq => "eq",
            TokenKind::KwNe => "ne",
            TokenKind::KwLt => "lt",
            TokenKind::KwLe => "le",
            TokenKind::KwGt => "gt",
            TokenKind::KwGe => "ge",
            TokenKind::KwAnd => "and",
            TokenKind::KwOr => "or",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Dot => ".",
            TokenKind::DotDot => "..",
            TokenKind::Question => "?",
            TokenKind::QuestionQuestion => "??",
            TokenKind::Arrow => "->",
            TokenKind::FatArrow => "=>",
            TokenKind::At => "@",
            TokenKind::Hash => "#",
            TokenKind::Tilde => "~",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::PlusPlus => "++",
            TokenKind::MinusMinus => "--",
            TokenKind::Assign => "=",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::SlashEq => "/=",
            TokenKind::PercentEq => "%=",
            TokenKind::AmpEq => "&=",
            TokenKind::PipeEq => "|=",
            TokenKind::CaretEq => "^=",
            TokenKind::ShlEq => "<<=",
            TokenKind::ShrEq => ">>=",
            TokenKind::UshrEq => ">>>=",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::Shl => "<<",
            TokenKind::Shr => ">>",
            TokenKind::Ushr => ">>>",
            TokenKind::Amp => "&",
            TokenKind::AmpAmp => "&&",
            TokenKind::Pipe => "|",
            TokenKind::PipePipe => "||",
            TokenKind::Caret => "^",
            TokenKind::Bang => "!",
            TokenKind::Match => "=~",
            TokenKind::NotMatch => "!~",
            TokenKind::StartsWith => "=^",
            TokenKind::NotStartsWith => "!^",
            TokenKind::EndsWith => "=$",
            TokenKind::NotEndsWith => "!$",
            TokenKind::Error(_) => "<error>",
            TokenKind::Eof => "<eof>",
        }
    }
}
