//! Binary and unary operators plus the static operator table.
//!
//! The table maps every operator spelling (symbolic and keyword forms) to its
//! arity, binding power and the operation it performs. It is read-only and
//! consulted by the parser through [`lookup_infix`] and [`lookup_prefix`].
//!
//! Binding power grows with the number: postfix access binds tightest,
//! assignment loosest.

use std::fmt;

/// Binding powers, loosest first.
pub mod prec {
    pub const ASSIGN: u8 = 1;
    pub const CONDITIONAL: u8 = 2;
    pub const OR: u8 = 3;
    pub const AND: u8 = 4;
    pub const BIT_OR: u8 = 5;
    pub const BIT_XOR: u8 = 6;
    pub const BIT_AND: u8 = 7;
    /// `..` and the string/collection predicates `=~ !~ =^ !^ =$ !$`.
    pub const MATCH: u8 = 8;
    pub const EQUALITY: u8 = 9;
    pub const RELATIONAL: u8 = 10;
    pub const ADDITIVE: u8 = 11;
    pub const SHIFT: u8 = 12;
    pub const MULTIPLICATIVE: u8 = 13;
    pub const PREFIX: u8 = 14;
    pub const POSTFIX: u8 = 15;
}

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Ushr,

    // Predicates
    Match,
    NotMatch,
    StartsWith,
    NotStartsWith,
    EndsWith,
    NotEndsWith,

    Range,
}

impl BinaryOp {
    /// Canonical source symbol, used when re-rendering and in errors.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "&&",
            Self::Or => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::Ushr => ">>>",
            Self::Match => "=~",
            Self::NotMatch => "!~",
            Self::StartsWith => "=^",
            Self::NotStartsWith => "!^",
            Self::EndsWith => "=$",
            Self::NotEndsWith => "!$",
            Self::Range => "..",
        }
    }

    /// Binding power; see [`prec`].
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Mul | Self::Div | Self::Mod => prec::MULTIPLICATIVE,
            Self::Shl | Self::Shr | Self::Ushr => prec::SHIFT,
            Self::Add | Self::Sub => prec::ADDITIVE,
            Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => prec::RELATIONAL,
            Self::Eq | Self::NotEq => prec::EQUALITY,
            Self::Match
            | Self::NotMatch
            | Self::StartsWith
            | Self::NotStartsWith
            | Self::EndsWith
            | Self::NotEndsWith
            | Self::Range => prec::MATCH,
            Self::BitAnd => prec::BIT_AND,
            Self::BitXor => prec::BIT_XOR,
            Self::BitOr => prec::BIT_OR,
            Self::And => prec::AND,
            Self::Or => prec::OR,
        }
    }

    /// Short-circuiting operators evaluate their right operand lazily.
    pub const fn is_short_circuit(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

/// Prefix operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
    BitNot,
    Empty,
    Size,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Plus => "+",
            Self::Not => "!",
            Self::BitNot => "~",
            Self::Empty => "empty",
            Self::Size => "size",
        }
    }

    /// Word operators need a space before their operand when rendered.
    pub const fn is_word(self) -> bool {
        matches!(self, Self::Empty | Self::Size)
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

/// What an operator spelling does.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Operator {
    Binary(BinaryOp),
    Unary(UnaryOp),
    /// Plain `=`.
    Assign,
    /// `op=`, desugared to `x = x op e`.
    Compound(BinaryOp),
    /// `++`/`--`, desugared to `x = x op 1`.
    Step(BinaryOp),
    /// `c ? a : b`.
    Ternary,
    /// `?:` (`coalesce == false`) and `??` (`coalesce == true`).
    Elvis { coalesce: bool },
}

impl Operator {
    /// The binary operation a compound or step form desugars to.
    pub const fn base(self) -> Option<BinaryOp> {
        match self {
            Operator::Binary(op) | Operator::Compound(op) | Operator::Step(op) => Some(op),
            _ => None,
        }
    }
}

/// One row of the operator table.
#[derive(Copy, Clone, Debug)]
pub struct OperatorInfo {
    pub symbol: &'static str,
    /// 1 for prefix/postfix forms, 2 for infix, 3 for the ternary.
    pub arity: u8,
    pub precedence: u8,
    pub operator: Operator,
}

const fn binary(symbol: &'static str, op: BinaryOp) -> OperatorInfo {
    OperatorInfo {
        symbol,
        arity: 2,
        precedence: op.precedence(),
        operator: Operator::Binary(op),
    }
}

const fn unary(symbol: &'static str, op: UnaryOp) -> OperatorInfo {
    OperatorInfo {
        symbol,
        arity: 1,
        precedence: prec::PREFIX,
        operator: Operator::Unary(op),
    }
}

const fn compound(symbol: &'static str, op: BinaryOp) -> OperatorInfo {
    OperatorInfo {
        symbol,
        arity: 2,
        precedence: prec::ASSIGN,
        operator: Operator::Compound(op),
    }
}

/// Every operator spelling the language knows.
pub static OPERATORS: &[OperatorInfo] = &[
    binary("*", BinaryOp::Mul),
    binary("/", BinaryOp::Div),
    binary("%", BinaryOp::Mod),
    binary("<<", BinaryOp::Shl),
    binary(">>", BinaryOp::Shr),
    binary(">>>", BinaryOp::Ushr),
    binary("+", BinaryOp::Add),
    binary("-", BinaryOp::Sub),
    binary("<", BinaryOp::Lt),
    binary("<=", BinaryOp::LtEq),
    binary(">", BinaryOp::Gt),
    binary(">=", BinaryOp::GtEq),
    binary("lt", BinaryOp::Lt),
    binary("le", BinaryOp::LtEq),
    binary("gt", BinaryOp::Gt),
    binary("ge", BinaryOp::GtEq),
    binary("==", BinaryOp::Eq),
    binary("!=", BinaryOp::NotEq),
    binary("eq", BinaryOp::Eq),
    binary("ne", BinaryOp::NotEq),
    binary("..", BinaryOp::Range),
    binary("=~", BinaryOp::Match),
    binary("!~", BinaryOp::NotMatch),
    binary("=^", BinaryOp::StartsWith),
    binary("!^", BinaryOp::NotStartsWith),
    binary("=$", BinaryOp::EndsWith),
    binary("!$", BinaryOp::NotEndsWith),
    binary("&", BinaryOp::BitAnd),
    binary("^", BinaryOp::BitXor),
    binary("|", BinaryOp::BitOr),
    binary("&&", BinaryOp::And),
    binary("and", BinaryOp::And),
    binary("||", BinaryOp::Or),
    binary("or", BinaryOp::Or),
    OperatorInfo {
        symbol: "?",
        arity: 3,
        precedence: prec::CONDITIONAL,
        operator: Operator::Ternary,
    },
    OperatorInfo {
        symbol: "?:",
        arity: 2,
        precedence: prec::CONDITIONAL,
        operator: Operator::Elvis { coalesce: false },
    },
    OperatorInfo {
        symbol: "??",
        arity: 2,
        precedence: prec::CONDITIONAL,
        operator: Operator::Elvis { coalesce: true },
    },
    OperatorInfo {
        symbol: "=",
        arity: 2,
        precedence: prec::ASSIGN,
        operator: Operator::Assign,
    },
    compound("+=", BinaryOp::Add),
    compound("-=", BinaryOp::Sub),
    compound("*=", BinaryOp::Mul),
    compound("/=", BinaryOp::Div),
    compound("%=", BinaryOp::Mod),
    compound("&=", BinaryOp::BitAnd),
    compound("|=", BinaryOp::BitOr),
    compound("^=", BinaryOp::BitXor),
    compound("<<=", BinaryOp::Shl),
    compound(">>=", BinaryOp::Shr),
    compound(">>>=", BinaryOp::Ushr),
    unary("-", UnaryOp::Neg),
    unary("+", UnaryOp::Plus),
    unary("!", UnaryOp::Not),
    unary("not", UnaryOp::Not),
    unary("~", UnaryOp::BitNot),
    unary("empty", UnaryOp::Empty),
    unary("size", UnaryOp::Size),
    OperatorInfo {
        symbol: "++",
        arity: 1,
        precedence: prec::PREFIX,
        operator: Operator::Step(BinaryOp::Add),
    },
    OperatorInfo {
        symbol: "--",
        arity: 1,
        precedence: prec::PREFIX,
        operator: Operator::Step(BinaryOp::Sub),
    },
];

/// Infix (and ternary) entry for `symbol`.
pub fn lookup_infix(symbol: &str) -> Option<&'static OperatorInfo> {
    OPERATORS
        .iter()
        .find(|info| info.arity >= 2 && info.symbol == symbol)
}

/// Prefix entry for `symbol`.
pub fn lookup_prefix(symbol: &str) -> Option<&'static OperatorInfo> {
    OPERATORS
        .iter()
        .find(|info| info.arity == 1 && info.symbol == symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_binds_tighter_than_additive() {
        assert!(BinaryOp::Shl.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::Mul.precedence() > BinaryOp::Shl.precedence());
    }

    #[test]
    fn keyword_forms_share_entries_with_symbols() {
        let eq = lookup_infix("eq").map(|i| i.operator);
        assert_eq!(eq, Some(Operator::Binary(BinaryOp::Eq)));
        let not = lookup_prefix("not").map(|i| i.operator);
        assert_eq!(not, Some(Operator::Unary(UnaryOp::Not)));
    }

    #[test]
    fn minus_is_both_prefix_and_infix() {
        assert_eq!(
            lookup_infix("-").map(|i| i.operator),
            Some(Operator::Binary(BinaryOp::Sub))
        );
        assert_eq!(
            lookup_prefix("-").map(|i| i.operator),
            Some(Operator::Unary(UnaryOp::Neg))
        );
    }

    #[test]
    fn compound_forms_expose_their_base() {
        let info = lookup_infix(">>>=");
        assert_eq!(info.and_then(|i| i.operator.base()), Some(BinaryOp::Ushr));
        assert_eq!(info.map(|i| i.precedence), Some(prec::ASSIGN));
        let step = lookup_prefix("++");
        assert_eq!(step.and_then(|i| i.operator.base()), Some(BinaryOp::Add));
    }

    #[test]
    fn unknown_symbols_are_absent() {
        assert!(lookup_infix("**").is_none());
        assert!(lookup_prefix("*").is_none());
    }
}
