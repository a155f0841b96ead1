//! Host objects: embedder types exposed to scripts.
//!
//! The engine never reflects over Rust types. An embedder implements
//! [`HostObject`] for each type it wants scripts to see, listing the
//! callable methods as [`MethodSignature`]s so overloads can be resolved
//! against the runtime argument kinds.

use std::fmt;
use std::sync::Arc;

use jexl_ir::Number;

use crate::errors::EvalError;
use crate::value::Value;

/// Shared handle to a host object.
pub type HostRef = Arc<dyn HostObject>;

/// Declared kind of a method parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    /// Accepts every value.
    Any,
    Bool,
    /// Any rational.
    Number,
    /// An integral number.
    Integer,
    Str,
    Array,
    Map,
    Function,
    Object,
}

/// One callable overload of a host method.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MethodSignature {
    pub name: &'static str,
    pub params: &'static [ParamKind],
}

impl MethodSignature {
    pub const fn new(name: &'static str, params: &'static [ParamKind]) -> Self {
        MethodSignature { name, params }
    }
}

/// A value owned by the embedder.
///
/// Property and method lookups return `None`/`false` for unknown members;
/// the engine turns those into `PropertyNotFound`/`MethodNotFound` (or nil
/// in lenient mode).
pub trait HostObject: Send + Sync + fmt::Debug {
    /// Name used in messages and sandbox permissions.
    fn type_name(&self) -> &str;

    fn get_property(&self, _name: &str) -> Option<Value> {
        None
    }

    /// Store `value` under `name`. Returns `Ok(false)` when the object has
    /// no such writable property.
    fn set_property(&self, _name: &str, _value: Value) -> Result<bool, EvalError> {
        Ok(false)
    }

    /// Every overload of every method, in declaration order.
    fn methods(&self) -> &[MethodSignature] {
        &[]
    }

    /// Invoke the overload at `index` in [`HostObject::methods`].
    fn invoke(&self, index: usize, _args: &[Value]) -> Result<Value, EvalError> {
        let name = self.methods().get(index).map_or("?", |m| m.name);
        Err(crate::errors::method_not_found(name, self.type_name()))
    }

    /// Numeric view used by arithmetic and truthiness.
    fn to_number(&self) -> Option<Number> {
        None
    }
}
