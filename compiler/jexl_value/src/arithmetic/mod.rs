//! Operator semantics.
//!
//! The interpreter never inspects operand kinds itself: every operator goes
//! through an [`Arithmetic`], so an embedder can swap in different coercion
//! rules. [`JexlArithmetic`] is the default.
//!
//! # Coercions
//!
//! - Every number is an exact rational; `10 / 3 * 3` is `10`.
//! - Booleans count as 0 and 1 for arithmetic and ordering.
//! - `+` with a string on either side concatenates.
//! - Numeric strings coerce to numbers for the other arithmetic operators.
//! - Nil coerces to 0 (or "" when concatenating) unless the arithmetic is
//!   strict, in which case it is an unsupported operand.

use std::cmp::Ordering;
use std::fmt;
use std::num::NonZeroUsize;

use jexl_ir::Number;
use lru::LruCache;
use num_bigint::BigInt;
use num_traits::Zero;
use parking_lot::Mutex;
use regex::Regex;
use rustc_hash::FxHashSet;
use tracing::trace;

use crate::errors::{self, EvalError, EvalResult};
use crate::value::{pair_addr, Value};

/// Compiled `=~` patterns kept per arithmetic instance.
const PATTERN_CACHE_CAPACITY: usize = 64;

/// Operator implementations used by the interpreter.
pub trait Arithmetic: Send + Sync {
    /// Strict arithmetic rejects nil operands and makes relational
    /// operators fail on incomparable kinds instead of yielding false.
    fn is_strict(&self) -> bool;

    /// Numeric view of a value, for ranges and indices.
    fn to_number(&self, value: &Value) -> Result<Number, EvalError>;

    fn add(&self, left: &Value, right: &Value) -> EvalResult;
    fn subtract(&self, left: &Value, right: &Value) -> EvalResult;
    fn multiply(&self, left: &Value, right: &Value) -> EvalResult;
    fn divide(&self, left: &Value, right: &Value) -> EvalResult;
    fn modulo(&self, left: &Value, right: &Value) -> EvalResult;
    fn negate(&self, operand: &Value) -> EvalResult;

    /// Total order within a kind; `UnsupportedOperand` across kinds.
    fn compare(&self, left: &Value, right: &Value) -> Result<Ordering, EvalError>;
    fn equals(&self, left: &Value, right: &Value) -> bool;
    fn to_boolean(&self, value: &Value) -> bool;

    /// `item =~ container`.
    fn contains(&self, container: &Value, item: &Value) -> Result<bool, EvalError>;
    fn starts_with(&self, left: &Value, right: &Value) -> Result<bool, EvalError>;
    fn ends_with(&self, left: &Value, right: &Value) -> Result<bool, EvalError>;

    fn bit_and(&self, left: &Value, right: &Value) -> EvalResult;
    fn bit_or(&self, left: &Value, right: &Value) -> EvalResult;
    fn bit_xor(&self, left: &Value, right: &Value) -> EvalResult;
    fn bit_complement(&self, operand: &Value) -> EvalResult;
    fn shift_left(&self, left: &Value, right: &Value) -> EvalResult;
    fn shift_right(&self, left: &Value, right: &Value) -> EvalResult;
    fn shift_right_unsigned(&self, left: &Value, right: &Value) -> EvalResult;

    fn is_empty(&self, value: &Value) -> bool;
    fn size(&self, value: &Value) -> Result<usize, EvalError>;
}

/// Default arithmetic over exact rationals.
pub struct JexlArithmetic {
    strict: bool,
    patterns: Mutex<LruCache<String, Regex>>,
}

impl JexlArithmetic {
    pub fn new(strict: bool) -> Self {
        let capacity = NonZeroUsize::new(PATTERN_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        JexlArithmetic {
            strict,
            patterns: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Numeric view used by arithmetic operators.
    fn coerce(&self, value: &Value) -> Option<Number> {
        match value {
            Value::Number(n) => Some(n.clone()),
            Value::Bool(b) => Some(bool_number(*b)),
            Value::Str(s) => parse_numeric(s),
            Value::Nil if !self.strict => Some(Number::zero()),
            Value::Object(obj) => obj.to_number(),
            _ => None,
        }
    }

    fn operands(&self, op: &str, left: &Value, right: &Value) -> Result<(Number, Number), EvalError> {
        match (self.coerce(left), self.coerce(right)) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(errors::unsupported_operand(op, left, Some(right))),
        }
    }

    /// Integer operands for the bitwise operators, truncated toward zero.
    fn integer_operands(&self, op: &str, left: &Value, right: &Value) -> Result<(i64, i64), EvalError> {
        let (a, b) = self.operands(op, left, right)?;
        Ok((a.to_i64_saturating(), b.to_i64_saturating()))
    }

    fn pattern(&self, source: &str) -> Result<Regex, EvalError> {
        let mut cache = self.patterns.lock();
        if let Some(re) = cache.get(source) {
            return Ok(re.clone());
        }
        trace!(pattern = source, "compiling pattern");
        let re = Regex::new(&format!("^(?:{source})$"))
            .map_err(|e| errors::invalid_regex(source, &e.to_string()))?;
        cache.put(source.to_string(), re.clone());
        Ok(re)
    }
}

impl Default for JexlArithmetic {
    fn default() -> Self {
        JexlArithmetic::new(false)
    }
}

impl fmt::Debug for JexlArithmetic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JexlArithmetic")
            .field("strict", &self.strict)
            .finish_non_exhaustive()
    }
}

fn bool_number(b: bool) -> Number {
    if b {
        Number::one()
    } else {
        Number::zero()
    }
}

/// `"12"`, `" -1.5 "`, `"+3"`; anything else is not numeric.
fn parse_numeric(text: &str) -> Option<Number> {
    let text = text.trim();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let n = Number::parse_decimal(digits)?;
    Some(if negative {
        Number::from_rational(-n.into_rational())
    } else {
        n
    })
}

/// Ordering view: numbers, booleans and numeric host objects. Strings are
/// not numeric here, so `"10" < 9` is a kind mismatch.
/// `==` under the default arithmetic: ordering equality where the kinds
/// are ordered, element-wise equality for collections. Builtins such as
/// `contains` and `indexOf` match elements with it.
pub fn loose_equals(left: &Value, right: &Value) -> bool {
    equals_in(left, right, &mut FxHashSet::default())
}

fn compare_values(left: &Value, right: &Value) -> Result<Ordering, EvalError> {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
        (Value::Nil, Value::Nil) => Ok(Ordering::Equal),
        _ => match (ordinal(left), ordinal(right)) {
            (Some(a), Some(b)) => Ok(a.cmp(&b)),
            _ => Err(errors::unsupported_operand("<=>", left, Some(right))),
        },
    }
}

/// Equality with the collection pairs already under comparison; a pair met
/// again (a cycle) counts as equal.
fn equals_in(left: &Value, right: &Value, seen: &mut FxHashSet<(usize, usize)>) -> bool {
    match compare_values(left, right) {
        Ok(ordering) => ordering == Ordering::Equal,
        Err(_) => structural_equals(left, right, seen),
    }
}

fn structural_equals(left: &Value, right: &Value, seen: &mut FxHashSet<(usize, usize)>) -> bool {
    if left.ptr_eq(right) {
        return true;
    }
    match (left, right) {
        (Value::Nil, Value::Nil) => true,
        (Value::Array(a), Value::Array(b)) => {
            if !seen.insert(pair_addr(left, right)) {
                return true;
            }
            let (a, b) = (a.read(), b.read());
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| equals_in(x, y, seen))
        }
        (Value::Map(a), Value::Map(b)) => {
            if !seen.insert(pair_addr(left, right)) {
                return true;
            }
            let (a, b) = (a.read(), b.read());
            a.len() == b.len()
                && a.iter().all(|(k, x)| b.get(k).is_some_and(|y| equals_in(x, y, seen)))
        }
        _ => false,
    }
}

fn ordinal(value: &Value) -> Option<Number> {
    match value {
        Value::Number(n) => Some(n.clone()),
        Value::Bool(b) => Some(bool_number(*b)),
        Value::Object(obj) => obj.to_number(),
        _ => None,
    }
}

fn int_value(n: i64) -> Value {
    Value::int(n)
}

/// Shift distances use the low six bits, as on 64-bit hardware.
fn shift_amount(n: i64) -> u32 {
    u32::try_from(n & 63).unwrap_or(0)
}

impl Arithmetic for JexlArithmetic {
    fn is_strict(&self) -> bool {
        self.strict
    }

    fn to_number(&self, value: &Value) -> Result<Number, EvalError> {
        self.coerce(value).ok_or_else(|| {
            errors::unsupported_operation(format!("cannot convert {} to a number", value.type_name()))
        })
    }

    fn add(&self, left: &Value, right: &Value) -> EvalResult {
        if matches!(left, Value::Str(_)) || matches!(right, Value::Str(_)) {
            if self.strict && (left.is_nil() || right.is_nil()) {
                return Err(errors::unsupported_operand("+", left, Some(right)));
            }
            let mut s = left.to_plain_string();
            s.push_str(&right.to_plain_string());
            return Ok(Value::string(s));
        }
        let (a, b) = self.operands("+", left, right)?;
        Ok(Value::Number(Number::from_rational(
            a.as_rational() + b.as_rational(),
        )))
    }

    fn subtract(&self, left: &Value, right: &Value) -> EvalResult {
        let (a, b) = self.operands("-", left, right)?;
        Ok(Value::Number(Number::from_rational(
            a.as_rational() - b.as_rational(),
        )))
    }

    fn multiply(&self, left: &Value, right: &Value) -> EvalResult {
        let (a, b) = self.operands("*", left, right)?;
        Ok(Value::Number(Number::from_rational(
            a.as_rational() * b.as_rational(),
        )))
    }

    fn divide(&self, left: &Value, right: &Value) -> EvalResult {
        let (a, b) = self.operands("/", left, right)?;
        if b.is_zero() {
            return Err(errors::division_by_zero());
        }
        Ok(Value::Number(Number::from_rational(
            a.as_rational() / b.as_rational(),
        )))
    }

    fn modulo(&self, left: &Value, right: &Value) -> EvalResult {
        let (a, b) = self.operands("%", left, right)?;
        let (a, b): (BigInt, BigInt) = (a.trunc(), b.trunc());
        if b.is_zero() {
            return Err(errors::division_by_zero());
        }
        // BigInt `%` truncates: the remainder takes the dividend's sign.
        Ok(Value::Number(Number::from(a % b)))
    }

    fn negate(&self, operand: &Value) -> EvalResult {
        match operand {
            Value::Bool(b) => Ok(Value::Bool(!b)),
            other => match self.coerce(other) {
                Some(n) => Ok(Value::Number(Number::from_rational(-n.into_rational()))),
                None => Err(errors::unsupported_operand("-", other, None)),
            },
        }
    }

    fn compare(&self, left: &Value, right: &Value) -> Result<Ordering, EvalError> {
        compare_values(left, right)
    }

    fn equals(&self, left: &Value, right: &Value) -> bool {
        loose_equals(left, right)
    }

    fn to_boolean(&self, value: &Value) -> bool {
        match value {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Number(n) => !n.is_zero(),
            Value::Str(s) => !s.is_empty(),
            Value::Array(items) => !items.read().is_empty(),
            Value::Map(entries) => !entries.read().is_empty(),
            Value::Function(_) => true,
            Value::Object(obj) => obj.to_number().map_or(true, |n| !n.is_zero()),
        }
    }

    fn contains(&self, container: &Value, item: &Value) -> Result<bool, EvalError> {
        match container {
            Value::Str(pattern) => {
                let re = self.pattern(pattern)?;
                Ok(re.is_match(&item.to_plain_string()))
            }
            Value::Array(items) => {
                let items = items.read();
                Ok(items.iter().any(|x| self.equals(x, item)))
            }
            Value::Map(entries) => Ok(entries.read().contains_key(&item.to_plain_string())),
            other => Ok(self.equals(other, item)),
        }
    }

    fn starts_with(&self, left: &Value, right: &Value) -> Result<bool, EvalError> {
        match left {
            Value::Array(items) => Ok(items.read().first().is_some_and(|x| self.equals(x, right))),
            Value::Nil if !self.strict => Ok(false),
            Value::Nil => Err(errors::unsupported_operand("=^", left, Some(right))),
            other => Ok(other.to_plain_string().starts_with(&right.to_plain_string())),
        }
    }

    fn ends_with(&self, left: &Value, right: &Value) -> Result<bool, EvalError> {
        match left {
            Value::Array(items) => Ok(items.read().last().is_some_and(|x| self.equals(x, right))),
            Value::Nil if !self.strict => Ok(false),
            Value::Nil => Err(errors::unsupported_operand("=$", left, Some(right))),
            other => Ok(other.to_plain_string().ends_with(&right.to_plain_string())),
        }
    }

    fn bit_and(&self, left: &Value, right: &Value) -> EvalResult {
        if let (Value::Bool(a), Value::Bool(b)) = (left, right) {
            return Ok(Value::Bool(*a & *b));
        }
        let (a, b) = self.integer_operands("&", left, right)?;
        Ok(int_value(a & b))
    }

    fn bit_or(&self, left: &Value, right: &Value) -> EvalResult {
        if let (Value::Bool(a), Value::Bool(b)) = (left, right) {
            return Ok(Value::Bool(*a | *b));
        }
        let (a, b) = self.integer_operands("|", left, right)?;
        Ok(int_value(a | b))
    }

    fn bit_xor(&self, left: &Value, right: &Value) -> EvalResult {
        if let (Value::Bool(a), Value::Bool(b)) = (left, right) {
            return Ok(Value::Bool(*a ^ *b));
        }
        let (a, b) = self.integer_operands("^", left, right)?;
        Ok(int_value(a ^ b))
    }

    fn bit_complement(&self, operand: &Value) -> EvalResult {
        match operand {
            Value::Bool(b) => Ok(Value::Bool(!b)),
            other => match self.coerce(other) {
                Some(n) => Ok(int_value(!n.to_i64_saturating())),
                None => Err(errors::unsupported_operand("~", other, None)),
            },
        }
    }

    fn shift_left(&self, left: &Value, right: &Value) -> EvalResult {
        let (a, b) = self.integer_operands("<<", left, right)?;
        Ok(int_value(a.wrapping_shl(shift_amount(b))))
    }

    fn shift_right(&self, left: &Value, right: &Value) -> EvalResult {
        let (a, b) = self.integer_operands(">>", left, right)?;
        Ok(int_value(a.wrapping_shr(shift_amount(b))))
    }

    #[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap)]
    fn shift_right_unsigned(&self, left: &Value, right: &Value) -> EvalResult {
        let (a, b) = self.integer_operands(">>>", left, right)?;
        Ok(int_value(((a as u64) >> shift_amount(b)) as i64))
    }

    fn is_empty(&self, value: &Value) -> bool {
        match value {
            Value::Nil => true,
            Value::Str(s) => s.is_empty(),
            Value::Array(items) => items.read().is_empty(),
            Value::Map(entries) => entries.read().is_empty(),
            _ => false,
        }
    }

    fn size(&self, value: &Value) -> Result<usize, EvalError> {
        match value {
            Value::Nil => Ok(0),
            Value::Str(s) => Ok(s.chars().count()),
            Value::Array(items) => Ok(items.read().len()),
            Value::Map(entries) => Ok(entries.read().len()),
            other => Err(errors::unsupported_operand("size", other, None)),
        }
    }
}

#[cfg(test)]
mod tests;
