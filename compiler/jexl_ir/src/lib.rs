//! Shared intermediate representation for the jexl engine.
//!
//! Everything the lexer hands to the parser and everything the parser hands
//! to the interpreter lives here:
//!
//! - [`Span`]: byte ranges into the source text
//! - [`Token`] / [`TokenKind`]: the flat token stream
//! - [`Number`]: the exact rational numeric representation
//! - [`BinaryOp`] / [`UnaryOp`] and the static [operator table](operators)
//! - [`Features`]: grammar capabilities consulted by the parser
//! - [`Node`] / [`NodeKind`]: the closed AST node set

pub mod ast;
mod features;
mod number;
pub mod operators;
mod span;
mod token;

pub use ast::{Annotation, Lambda, Literal, Node, NodeKind, Pragma};
pub use features::Features;
pub use number::Number;
pub use operators::{BinaryOp, Operator, OperatorInfo, UnaryOp};
pub use span::Span;
pub use token::{LexError, Token, TokenKind};
