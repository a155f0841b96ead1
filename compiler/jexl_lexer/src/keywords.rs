//! Keyword resolution.
//!
//! Identifiers are scanned first and checked against the keyword set
//! afterwards. `new` and `pragma` are absent: they are only
//! special in specific positions, which the parser decides.

use jexl_ir::TokenKind;

/// Keyword token for `text`, or `None` for an ordinary identifier.
///
/// Keywords are 2 to 8 ASCII letters, so anything outside that range is
/// rejected before any comparison.
#[inline]
pub(crate) fn lookup(text: &str) -> Option<TokenKind> {
    if !(2..=8).contains(&text.len()) {
        return None;
    }
    let kind = match text {
        "if" => TokenKind::If,
        "do" => TokenKind::Do,
        "eq" => TokenKind::KwEq,
        "ne" => TokenKind::KwNe,
        "lt" => TokenKind::KwLt,
        "le" => TokenKind::KwLe,
        "gt" => TokenKind::KwGt,
        "ge" => TokenKind::KwGe,
        "or" => TokenKind::KwOr,
        "for" => TokenKind::For,
        "var" => TokenKind::Var,
        "not" => TokenKind::Not,
        "and" => TokenKind::KwAnd,
        "nil" | "null" => TokenKind::Null,
        "else" => TokenKind::Else,
        "size" => TokenKind::Size,
        "true" => TokenKind::True,
        "while" => TokenKind::While,
        "break" => TokenKind::Break,
        "empty" => TokenKind::Empty,
        "false" => TokenKind::False,
        "return" => TokenKind::Return,
        "continue" => TokenKind::Continue,
        _ => return None,
    };
    Some(kind)
}
