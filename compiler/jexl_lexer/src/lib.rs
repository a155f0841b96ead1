//! Tokenizer for the jexl expression language.
//!
//! [`tokenize`] turns source text into a flat token stream ending with
//! [`TokenKind::Eof`]. It never fails: characters it cannot make sense of
//! become [`TokenKind::Error`] tokens, which the parser reports as syntax
//! errors at the right span.
//!
//! The lexer does not backtrack. Grammar ambiguities (lambda parameter
//! lists versus parenthesized expressions) are resolved by the parser with
//! lookahead over tokens.

mod cursor;
mod keywords;
mod scanner;

use jexl_ir::{Token, TokenKind};

/// Tokenize `source`. The last token is always `Eof`.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut scanner = scanner::Scanner::new(source);
    let mut tokens = Vec::with_capacity(source.len() / 3 + 1);
    loop {
        let token = scanner.next_token();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

/// The first error token in `tokens`, if any.
pub fn first_error(tokens: &[Token]) -> Option<&Token> {
    tokens
        .iter()
        .find(|t| matches!(t.kind, TokenKind::Error(_)))
}

#[cfg(test)]
mod tests;
