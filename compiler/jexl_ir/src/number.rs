//! Exact rational numbers.
//!
//! Every numeric value in the engine is a [`Number`]: an arbitrary-precision
//! numerator/denominator pair kept in lowest terms. Integer literals, decimal
//! literals and host floats all convert exactly, so `10 / 3 * 3` is `10`.

use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// An exact rational number.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Number(BigRational);

impl Number {
    pub fn zero() -> Self {
        Number(BigRational::zero())
    }

    pub fn one() -> Self {
        Number(BigRational::one())
    }

    /// Wrap an existing rational.
    pub fn from_rational(r: BigRational) -> Self {
        Number(r)
    }

    /// Exact conversion of a finite float.
    ///
    /// Returns `None` for NaN and infinities, which have no rational value.
    pub fn from_f64(f: f64) -> Option<Self> {
        BigRational::from_float(f).map(Number)
    }

    /// Parse a decimal literal such as `42`, `1.5` or `0.125` exactly.
    ///
    /// Only ASCII digits with at most one `.` are accepted; there is no sign
    /// and no exponent (the lexer never produces either).
    pub fn parse_decimal(text: &str) -> Option<Self> {
        let (int_part, frac_part) = match text.split_once('.') {
            Some((i, f)) => (i, f),
            None => (text, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return None;
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }
        let mut digits = String::with_capacity(int_part.len() + frac_part.len());
        digits.push_str(int_part);
        digits.push_str(frac_part);
        let numer = BigInt::parse_bytes(digits.as_bytes(), 10)?;
        let denom = num_traits::pow(BigInt::from(10), frac_part.len());
        Some(Number(BigRational::new(numer, denom)))
    }

    pub fn as_rational(&self) -> &BigRational {
        &self.0
    }

    pub fn into_rational(self) -> BigRational {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_integer(&self) -> bool {
        self.0.is_integer()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Integer part, truncated toward zero.
    pub fn trunc(&self) -> BigInt {
        self.0.to_integer()
    }

    /// Truncated integer part as an `i64`, if it fits.
    pub fn to_i64(&self) -> Option<i64> {
        self.trunc().to_i64()
    }

    /// Truncated integer part clamped into the `i64` range.
    pub fn to_i64_saturating(&self) -> i64 {
        self.to_i64().unwrap_or(if self.is_negative() {
            i64::MIN
        } else {
            i64::MAX
        })
    }

    /// Nearest float; lossy by nature.
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().unwrap_or(f64::NAN)
    }

    /// Non-negative index view: `Some` only for integral values in `usize` range.
    pub fn to_index(&self) -> Option<usize> {
        if self.is_integer() {
            self.0.numer().to_usize()
        } else {
            None
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number(BigRational::from_integer(BigInt::from(n)))
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::from(i64::from(n))
    }
}

impl From<usize> for Number {
    fn from(n: usize) -> Self {
        Number(BigRational::from_integer(BigInt::from(n)))
    }
}

impl From<BigInt> for Number {
    fn from(n: BigInt) -> Self {
        Number(BigRational::from_integer(n))
    }
}

impl From<BigRational> for Number {
    fn from(r: BigRational) -> Self {
        Number(r)
    }
}

/// Number of decimal places needed to print `denom` exactly, if any.
///
/// A reduced fraction has a terminating decimal expansion iff its
/// denominator has no prime factors other than 2 and 5.
fn terminating_scale(denom: &BigInt) -> Option<usize> {
    let two = BigInt::from(2);
    let five = BigInt::from(5);
    let mut d = denom.clone();
    let mut twos = 0usize;
    let mut fives = 0usize;
    while (&d % &two).is_zero() {
        d /= &two;
        twos += 1;
    }
    while (&d % &five).is_zero() {
        d /= &five;
        fives += 1;
    }
    if d.is_one() {
        Some(twos.max(fives))
    } else {
        None
    }
}

impl fmt::Display for Number {
    /// Integers print plainly, terminating fractions as decimals
    /// (`0.5`), everything else as `numer/denom`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_integer() {
            return write!(f, "{}", self.0.numer());
        }
        let Some(scale) = terminating_scale(self.0.denom()) else {
            return write!(f, "{}/{}", self.0.numer(), self.0.denom());
        };
        let scaled = self.0.numer() * num_traits::pow(BigInt::from(10), scale) / self.0.denom();
        let mut digits = scaled.abs().to_string();
        if digits.len() <= scale {
            let pad = scale + 1 - digits.len();
            digits.insert_str(0, &"0".repeat(pad));
        }
        let point = digits.len() - scale;
        if self.0.is_negative() {
            f.write_str("-")?;
        }
        write!(f, "{}.{}", &digits[..point], &digits[point..])
    }
}

impl fmt::Debug for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Number({self})")
    }
}
