#![allow(clippy::unwrap_used, clippy::expect_used)]

use jexl_ir::{LexError, Number, Span, TokenKind};
use pretty_assertions::assert_eq;

use super::*;

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).into_iter().map(|t| t.kind).collect()
}

fn ident(name: &str) -> TokenKind {
    TokenKind::Ident(name.to_string())
}

fn num(n: i64) -> TokenKind {
    TokenKind::Number(Number::from(n))
}

#[test]
fn empty_source_is_just_eof() {
    assert_eq!(kinds(""), vec![TokenKind::Eof]);
    assert_eq!(kinds("  \n\t // only a comment"), vec![TokenKind::Eof]);
}

#[test]
fn numbers_and_ranges() {
    assert_eq!(
        kinds("1..3"),
        vec![num(1), TokenKind::DotDot, num(3), TokenKind::Eof]
    );
    let tokens = tokenize("1.5");
    assert_eq!(tokens[0].kind, TokenKind::Number(Number::parse_decimal("1.5").unwrap()));
    assert_eq!(tokens[0].literal, "1.5");
    assert_eq!(
        kinds("2.foo"),
        vec![num(2), TokenKind::Dot, ident("foo"), TokenKind::Eof]
    );
}

#[test]
fn longest_operator_wins() {
    assert_eq!(
        kinds(">>>= >>> >>= >> >= >"),
        vec![
            TokenKind::UshrEq,
            TokenKind::Ushr,
            TokenKind::ShrEq,
            TokenKind::Shr,
            TokenKind::GtEq,
            TokenKind::Gt,
            TokenKind::Eof
        ]
    );
    assert_eq!(
        kinds("!~ !^ !$ != !"),
        vec![
            TokenKind::NotMatch,
            TokenKind::NotStartsWith,
            TokenKind::NotEndsWith,
            TokenKind::NotEq,
            TokenKind::Bang,
            TokenKind::Eof
        ]
    );
    assert_eq!(
        kinds("=~ =^ =$ == => ="),
        vec![
            TokenKind::Match,
            TokenKind::StartsWith,
            TokenKind::EndsWith,
            TokenKind::EqEq,
            TokenKind::FatArrow,
            TokenKind::Assign,
            TokenKind::Eof
        ]
    );
    assert_eq!(
        kinds("?? ? -> -- -= -"),
        vec![
            TokenKind::QuestionQuestion,
            TokenKind::Question,
            TokenKind::Arrow,
            TokenKind::MinusMinus,
            TokenKind::MinusEq,
            TokenKind::Minus,
            TokenKind::Eof
        ]
    );
}

#[test]
fn keywords_resolve_after_scanning() {
    assert_eq!(
        kinds("if iffy null nil size sizes"),
        vec![
            TokenKind::If,
            ident("iffy"),
            TokenKind::Null,
            TokenKind::Null,
            TokenKind::Size,
            ident("sizes"),
            TokenKind::Eof
        ]
    );
}

#[test]
fn identifiers_accept_dollar_and_underscore() {
    assert_eq!(
        kinds("$x _y a$b"),
        vec![ident("$x"), ident("_y"), ident("a$b"), TokenKind::Eof]
    );
}

#[test]
fn string_escapes() {
    assert_eq!(
        kinds(r#""a\n\t\"b" 'it\'s' "A""#),
        vec![
            TokenKind::Str("a\n\t\"b".to_string()),
            TokenKind::Str("it's".to_string()),
            TokenKind::Str("A".to_string()),
            TokenKind::Eof
        ]
    );
}

#[test]
fn bad_input_becomes_error_tokens() {
    assert_eq!(
        kinds("\"open"),
        vec![TokenKind::Error(LexError::UnterminatedString), TokenKind::Eof]
    );
    assert_eq!(
        kinds(r#""\q" 1"#),
        vec![
            TokenKind::Error(LexError::InvalidEscape('q')),
            num(1),
            TokenKind::Eof
        ]
    );
    assert_eq!(
        kinds("1 ` 2"),
        vec![
            num(1),
            TokenKind::Error(LexError::UnexpectedChar('`')),
            num(2),
            TokenKind::Eof
        ]
    );
    assert_eq!(
        kinds("/* never closed"),
        vec![TokenKind::Error(LexError::UnterminatedComment), TokenKind::Eof]
    );
}

#[test]
fn block_comments_are_skipped() {
    assert_eq!(
        kinds("1 /* two\nlines */ + 2"),
        vec![num(1), TokenKind::Plus, num(2), TokenKind::Eof]
    );
}

#[test]
fn spans_cover_token_text() {
    let tokens = tokenize("ab + 'c'");
    assert_eq!(tokens[0].span, Span::new(0, 2));
    assert_eq!(tokens[1].span, Span::new(3, 4));
    assert_eq!(tokens[2].span, Span::new(5, 8));
    assert_eq!(tokens[2].literal, "'c'");
    assert_eq!(tokens[3].span, Span::new(8, 8));
}

#[test]
fn first_error_finds_the_offender() {
    let tokens = tokenize("a + #? `");
    let err = first_error(&tokens).unwrap();
    assert_eq!(err.kind, TokenKind::Error(LexError::UnexpectedChar('`')));
    assert!(first_error(&tokenize("a + b")).is_none());
}
