//! Runtime values.
//!
//! Scalars (`Nil`, `Bool`, `Number`, `Str`) are immutable. Arrays and maps
//! are [`Shared`]: cloning a `Value` clones the handle, so an element
//! assigned through one alias is visible through every other, the way host
//! collections behave.

mod closure;

use std::cell::RefCell;
use std::fmt::{self, Write as _};
use std::sync::Arc;

use indexmap::IndexMap;
use jexl_ir::Number;
use parking_lot::RwLock;
use rustc_hash::FxHashSet;

use crate::host::{HostObject, HostRef};

pub use closure::Closure;

/// A mutable collection shared by every value that refers to it.
pub type Shared<T> = Arc<RwLock<T>>;

/// A dynamic value.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Number(Number),
    Str(Arc<str>),
    Array(Shared<Vec<Value>>),
    /// String-keyed, insertion ordered.
    Map(Shared<IndexMap<String, Value>>),
    Function(Closure),
    Object(HostRef),
}

// Constructors

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Arc::from(s.into()))
    }

    pub fn int(n: i64) -> Self {
        Value::Number(Number::from(n))
    }

    pub fn number(n: impl Into<Number>) -> Self {
        Value::Number(n.into())
    }

    /// Exact conversion of a host float; NaN and infinities become nil.
    pub fn float(f: f64) -> Self {
        Number::from_f64(f).map_or(Value::Nil, Value::Number)
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Arc::new(RwLock::new(items)))
    }

    pub fn map(entries: IndexMap<String, Value>) -> Self {
        Value::Map(Arc::new(RwLock::new(entries)))
    }

    /// Build a map from key/value pairs, keeping their order.
    pub fn map_from<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn object(object: impl HostObject + 'static) -> Self {
        Value::Object(Arc::new(object))
    }
}

// Accessors

impl Value {
    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_closure(&self) -> Option<&Closure> {
        match self {
            Value::Function(c) => Some(c),
            _ => None,
        }
    }

    /// Copy of the elements of an array, taken under one read lock.
    pub fn array_snapshot(&self) -> Option<Vec<Value>> {
        match self {
            Value::Array(items) => Some(items.read().clone()),
            _ => None,
        }
    }

    /// Type name used in error messages and sandbox permissions.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Nil => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Function(_) => "function",
            Value::Object(obj) => obj.type_name(),
        }
    }

    /// Identity comparison for reference values; scalars never alias.
    pub fn ptr_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Array(a), Value::Array(b)) => Arc::ptr_eq(a, b),
            (Value::Map(a), Value::Map(b)) => Arc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => a.ptr_eq(b),
            (Value::Object(a), Value::Object(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
            _ => false,
        }
    }

    /// Address of the shared payload of an array or map.
    ///
    /// Walks over nested collections record these to stop at cycles such as
    /// `a.add(a)`.
    pub fn shared_addr(&self) -> Option<usize> {
        match self {
            Value::Array(items) => Some(Arc::as_ptr(items).cast::<()>() as usize),
            Value::Map(entries) => Some(Arc::as_ptr(entries).cast::<()>() as usize),
            _ => None,
        }
    }

    /// String form used by concatenation and string operators: the display
    /// form, except that nil is the empty string.
    pub fn to_plain_string(&self) -> String {
        match self {
            Value::Nil => String::new(),
            Value::Str(s) => s.to_string(),
            other => other.to_string(),
        }
    }
}

// Conversions

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(Number::from(n))
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(Number::from(n))
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl From<Closure> for Value {
    fn from(c: Closure) -> Self {
        Value::Function(c)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Nil, Into::into)
    }
}

// Formatting

/// `seen` holds the collections on the path from the root; a collection
/// reached again prints as `[...]` or `{...}`.
fn write_value(
    f: &mut fmt::Formatter<'_>,
    value: &Value,
    nested: bool,
    seen: &mut FxHashSet<usize>,
) -> fmt::Result {
    match value {
        Value::Nil => f.write_str("null"),
        Value::Bool(b) => write!(f, "{b}"),
        Value::Number(n) => write!(f, "{n}"),
        Value::Str(s) if nested => write!(f, "{s:?}"),
        Value::Str(s) => f.write_str(s),
        Value::Array(items) => {
            let addr = value.shared_addr().unwrap_or_default();
            if !seen.insert(addr) {
                return f.write_str("[...]");
            }
            f.write_char('[')?;
            for (i, item) in items.read().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_value(f, item, true, seen)?;
            }
            seen.remove(&addr);
            f.write_char(']')
        }
        Value::Map(entries) => {
            let addr = value.shared_addr().unwrap_or_default();
            if !seen.insert(addr) {
                return f.write_str("{...}");
            }
            let entries = entries.read();
            if entries.is_empty() {
                seen.remove(&addr);
                return f.write_str("{:}");
            }
            f.write_char('{')?;
            for (i, (key, item)) in entries.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{key:?}: ")?;
                write_value(f, item, true, seen)?;
            }
            seen.remove(&addr);
            f.write_char('}')
        }
        Value::Function(c) => write!(f, "function({})", c.params().join(", ")),
        Value::Object(obj) => write!(f, "<{}>", obj.type_name()),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, self, false, &mut FxHashSet::default())
    }
}

/// Debug view that stops at collections already on the current path.
struct DebugValue<'a> {
    value: &'a Value,
    seen: &'a RefCell<FxHashSet<usize>>,
}

struct DebugItems<'a> {
    items: &'a [Value],
    seen: &'a RefCell<FxHashSet<usize>>,
}

struct DebugEntries<'a> {
    entries: &'a IndexMap<String, Value>,
    seen: &'a RefCell<FxHashSet<usize>>,
}

impl fmt::Debug for DebugItems<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seen = self.seen;
        f.debug_list()
            .entries(self.items.iter().map(|value| DebugValue { value, seen }))
            .finish()
    }
}

impl fmt::Debug for DebugEntries<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seen = self.seen;
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|(key, value)| (key, DebugValue { value, seen })),
            )
            .finish()
    }
}

impl fmt::Debug for DebugValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seen = self.seen;
        match self.value {
            Value::Nil => f.write_str("Nil"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Number(n) => write!(f, "Number({n})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Array(items) => {
                let addr = self.value.shared_addr().unwrap_or_default();
                if !seen.borrow_mut().insert(addr) {
                    return f.write_str("Array([...])");
                }
                let items = items.read();
                let result = f
                    .debug_tuple("Array")
                    .field(&DebugItems { items: &items, seen })
                    .finish();
                seen.borrow_mut().remove(&addr);
                result
            }
            Value::Map(entries) => {
                let addr = self.value.shared_addr().unwrap_or_default();
                if !seen.borrow_mut().insert(addr) {
                    return f.write_str("Map({...})");
                }
                let entries = entries.read();
                let result = f
                    .debug_tuple("Map")
                    .field(&DebugEntries { entries: &entries, seen })
                    .finish();
                seen.borrow_mut().remove(&addr);
                result
            }
            Value::Function(c) => write!(f, "{c:?}"),
            Value::Object(obj) => write!(f, "Object({obj:?})"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seen = RefCell::new(FxHashSet::default());
        DebugValue { value: self, seen: &seen }.fmt(f)
    }
}

/// Structural equality, following array and map contents.
///
/// Language-level `==` goes through [`crate::Arithmetic::equals`], which
/// also compares across numeric kinds; this impl is for host code and tests.
/// A pair of collections compared again further down (a cycle) counts as
/// equal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        structural_eq(self, other, &mut FxHashSet::default())
    }
}

fn structural_eq(left: &Value, right: &Value, seen: &mut FxHashSet<(usize, usize)>) -> bool {
    if left.ptr_eq(right) {
        return true;
    }
    match (left, right) {
        (Value::Nil, Value::Nil) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => {
            if !seen.insert(pair_addr(left, right)) {
                return true;
            }
            let (a, b) = (a.read(), b.read());
            a.len() == b.len()
                && a
                    .iter()
                    .zip(b.iter())
                    .all(|(x, y)| structural_eq(x, y, seen))
        }
        (Value::Map(a), Value::Map(b)) => {
            if !seen.insert(pair_addr(left, right)) {
                return true;
            }
            let (a, b) = (a.read(), b.read());
            a.len() == b.len()
                && a
                    .iter()
                    .all(|(k, x)| b.get(k).is_some_and(|y| structural_eq(x, y, seen)))
        }
        _ => false,
    }
}

/// Key for a pair of collections under comparison.
pub(crate) fn pair_addr(left: &Value, right: &Value) -> (usize, usize) {
    (
        left.shared_addr().unwrap_or_default(),
        right.shared_addr().unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests;
