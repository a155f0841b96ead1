//! Grammar productions, split by construct.
//!
//! - [`expr`]: assignment, conditional and binary precedence climbing
//! - [`unary`]: prefix operators and postfix access chains
//! - [`primary`]: literals, identifiers, groupings, lambdas, collections
//! - [`stmt`]: statements, blocks, pragmas and annotations

mod expr;
mod primary;
mod stmt;
mod unary;
