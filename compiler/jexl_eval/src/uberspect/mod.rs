//! Introspection: how scripts reach properties, methods and constructors.
//!
//! The interpreter asks an [`Uberspect`] for an executor and then runs it,
//! so lookups can be filtered ([`SandboxUberspect`]) or replaced without
//! touching evaluation.
//!
//! [`JexlUberspect`] resolves:
//!
//! - map keys as properties, plus `length`/`size`/`empty` on strings, arrays
//!   and maps
//! - builtin methods of strings, arrays, maps and closures
//! - host object members through [`HostObject`](jexl_value::HostObject),
//!   picking among overloads by argument kinds
//! - constructors from a registry of named factories

mod builtins;
pub mod overload;
mod sandbox;

use std::fmt;
use std::sync::Arc;

use jexl_value::errors::{self, EvalError, EvalResult};
use jexl_value::Value;
use rustc_hash::FxHashMap;
use tracing::trace;

pub use sandbox::{Permissions, SandboxUberspect};

/// Reads one property of a value.
pub trait PropertyGet: Send + Sync {
    fn get(&self, object: &Value) -> EvalResult;
}

/// Writes one property of a value.
pub trait PropertySet: Send + Sync {
    fn set(&self, object: &Value, value: Value) -> Result<(), EvalError>;
}

/// Runs a resolved method or constructor. Constructors receive nil as
/// `object`.
pub trait MethodExecutor: Send + Sync {
    fn invoke(&self, object: &Value, args: &[Value]) -> EvalResult;
}

/// Member resolution strategy.
pub trait Uberspect: Send + Sync {
    fn get_property(&self, object: &Value, name: &str) -> Option<Box<dyn PropertyGet>>;

    fn set_property(
        &self,
        object: &Value,
        name: &str,
        value: &Value,
    ) -> Option<Box<dyn PropertySet>>;

    /// `Ok(None)` when no method of that name accepts `args`.
    fn get_method(
        &self,
        object: &Value,
        name: &str,
        args: &[Value],
    ) -> Result<Option<Box<dyn MethodExecutor>>, EvalError>;

    fn get_constructor(&self, name: &str, args: &[Value]) -> Result<Box<dyn MethodExecutor>, EvalError>;
}

impl<U: Uberspect + ?Sized> Uberspect for Arc<U> {
    fn get_property(&self, object: &Value, name: &str) -> Option<Box<dyn PropertyGet>> {
        (**self).get_property(object, name)
    }

    fn set_property(
        &self,
        object: &Value,
        name: &str,
        value: &Value,
    ) -> Option<Box<dyn PropertySet>> {
        (**self).set_property(object, name, value)
    }

    fn get_method(
        &self,
        object: &Value,
        name: &str,
        args: &[Value],
    ) -> Result<Option<Box<dyn MethodExecutor>>, EvalError> {
        (**self).get_method(object, name, args)
    }

    fn get_constructor(&self, name: &str, args: &[Value]) -> Result<Box<dyn MethodExecutor>, EvalError> {
        (**self).get_constructor(name, args)
    }
}

/// A named factory for `new(name, args...)`.
pub type ConstructorFn = Arc<dyn Fn(&[Value]) -> EvalResult + Send + Sync>;

/// Signature of the builtin method table entries.
pub(crate) type BuiltinFn = fn(&Value, &[Value]) -> EvalResult;

// Executors

struct MapKeyGet(String);

impl PropertyGet for MapKeyGet {
    fn get(&self, object: &Value) -> EvalResult {
        match object {
            Value::Map(entries) => Ok(entries.read().get(&self.0).cloned().unwrap_or_default()),
            other => Err(errors::property_not_found(&self.0, other.type_name())),
        }
    }
}

struct ElementGet(usize);

impl PropertyGet for ElementGet {
    fn get(&self, object: &Value) -> EvalResult {
        match object {
            Value::Array(items) => {
                let items = items.read();
                items
                    .get(self.0)
                    .cloned()
                    .ok_or_else(|| errors::index_out_of_bounds(&Value::from(self.0), items.len()))
            }
            other => Err(errors::property_not_found(&self.0.to_string(), other.type_name())),
        }
    }
}

/// `length`, `size` and `empty` on sized values.
struct ComputedGet(BuiltinFn);

impl PropertyGet for ComputedGet {
    fn get(&self, object: &Value) -> EvalResult {
        (self.0)(object, &[])
    }
}

struct HostGet(String);

impl PropertyGet for HostGet {
    fn get(&self, object: &Value) -> EvalResult {
        match object {
            Value::Object(host) => host
                .get_property(&self.0)
                .ok_or_else(|| errors::property_not_found(&self.0, host.type_name())),
            other => Err(errors::property_not_found(&self.0, other.type_name())),
        }
    }
}

struct MapKeySet(String);

impl PropertySet for MapKeySet {
    fn set(&self, object: &Value, value: Value) -> Result<(), EvalError> {
        match object {
            Value::Map(entries) => {
                entries.write().insert(self.0.clone(), value);
                Ok(())
            }
            other => Err(errors::property_not_found(&self.0, other.type_name())),
        }
    }
}

struct ElementSet(usize);

impl PropertySet for ElementSet {
    fn set(&self, object: &Value, value: Value) -> Result<(), EvalError> {
        match object {
            Value::Array(items) => {
                let mut items = items.write();
                let len = items.len();
                match items.get_mut(self.0) {
                    Some(slot) => {
                        *slot = value;
                        Ok(())
                    }
                    None => Err(errors::index_out_of_bounds(&Value::from(self.0), len)),
                }
            }
            other => Err(errors::property_not_found(&self.0.to_string(), other.type_name())),
        }
    }
}

struct HostSet(String);

impl PropertySet for HostSet {
    fn set(&self, object: &Value, value: Value) -> Result<(), EvalError> {
        match object {
            Value::Object(host) => {
                if host.set_property(&self.0, value)? {
                    Ok(())
                } else {
                    Err(errors::property_not_found(&self.0, host.type_name()))
                }
            }
            other => Err(errors::property_not_found(&self.0, other.type_name())),
        }
    }
}

struct Builtin(BuiltinFn);

impl MethodExecutor for Builtin {
    fn invoke(&self, object: &Value, args: &[Value]) -> EvalResult {
        (self.0)(object, args)
    }
}

/// Host overload chosen by index into `HostObject::methods`.
struct HostMethod(usize);

impl MethodExecutor for HostMethod {
    fn invoke(&self, object: &Value, args: &[Value]) -> EvalResult {
        match object {
            Value::Object(host) => host.invoke(self.0, args),
            other => Err(errors::not_callable(other)),
        }
    }
}

struct Constructor(ConstructorFn);

impl MethodExecutor for Constructor {
    fn invoke(&self, _object: &Value, args: &[Value]) -> EvalResult {
        (self.0)(args)
    }
}

/// The default introspection.
#[derive(Clone, Default)]
pub struct JexlUberspect {
    constructors: FxHashMap<String, ConstructorFn>,
}

impl JexlUberspect {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory reachable as `new('name', args...)`.
    #[must_use]
    pub fn with_constructor<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&[Value]) -> EvalResult + Send + Sync + 'static,
    {
        self.constructors.insert(name.into(), Arc::new(factory));
        self
    }
}

impl fmt::Debug for JexlUberspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("JexlUberspect")
            .field("constructors", &names)
            .finish()
    }
}

impl Uberspect for JexlUberspect {
    fn get_property(&self, object: &Value, name: &str) -> Option<Box<dyn PropertyGet>> {
        match object {
            Value::Map(entries) => {
                if !entries.read().contains_key(name) {
                    if let Some(f) = builtins::size_property(name) {
                        return Some(Box::new(ComputedGet(f)));
                    }
                }
                Some(Box::new(MapKeyGet(name.to_string())))
            }
            Value::Array(_) => match name.parse::<usize>() {
                Ok(index) => Some(Box::new(ElementGet(index))),
                Err(_) => builtins::size_property(name).map(|f| Box::new(ComputedGet(f)) as _),
            },
            Value::Str(_) => builtins::size_property(name).map(|f| Box::new(ComputedGet(f)) as _),
            Value::Object(host) => host
                .get_property(name)
                .map(|_| Box::new(HostGet(name.to_string())) as _),
            _ => None,
        }
    }

    fn set_property(
        &self,
        object: &Value,
        name: &str,
        _value: &Value,
    ) -> Option<Box<dyn PropertySet>> {
        match object {
            Value::Map(_) => Some(Box::new(MapKeySet(name.to_string()))),
            Value::Array(_) => name
                .parse::<usize>()
                .ok()
                .map(|index| Box::new(ElementSet(index)) as _),
            Value::Object(_) => Some(Box::new(HostSet(name.to_string()))),
            _ => None,
        }
    }

    fn get_method(
        &self,
        object: &Value,
        name: &str,
        args: &[Value],
    ) -> Result<Option<Box<dyn MethodExecutor>>, EvalError> {
        let builtin = match object {
            Value::Str(_) => builtins::string_method(name),
            Value::Array(_) => builtins::array_method(name),
            Value::Map(_) => builtins::map_method(name),
            Value::Function(_) => builtins::closure_method(name),
            Value::Object(host) => {
                let found = overload::resolve(host.methods(), name, args);
                trace!(method = name, overload = ?found, "host method lookup");
                return Ok(found.map(|index| Box::new(HostMethod(index)) as _));
            }
            _ => None,
        };
        Ok(builtin.map(|f| Box::new(Builtin(f)) as _))
    }

    fn get_constructor(&self, name: &str, _args: &[Value]) -> Result<Box<dyn MethodExecutor>, EvalError> {
        self.constructors
            .get(name)
            .map(|factory| Box::new(Constructor(Arc::clone(factory))) as _)
            .ok_or_else(|| errors::not_implemented(format!("constructor '{name}'")))
    }
}
