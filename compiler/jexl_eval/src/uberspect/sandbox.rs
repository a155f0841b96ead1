//! Permission filtering over another uberspect.
//!
//! Rules are keyed by type name (as reported by [`Value::type_name`]) and
//! member name, with `*` standing for every member of a type. An explicit
//! member deny beats an explicit member allow, which beats a wildcard
//! deny. Anything without a rule is allowed.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use jexl_value::errors::{self, EvalError};
use jexl_value::Value;

use super::{MethodExecutor, PropertyGet, PropertySet, Uberspect};

const WILDCARD: &str = "*";

#[derive(Clone, Debug, Default)]
struct Rules {
    allow: FxHashSet<String>,
    deny: FxHashSet<String>,
}

/// Allow/deny rules per type.
#[derive(Clone, Debug, Default)]
pub struct Permissions {
    types: FxHashMap<String, Rules>,
}

impl Permissions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn allow(mut self, type_name: &str, member: &str) -> Self {
        self.rules(type_name).allow.insert(member.to_string());
        self
    }

    #[must_use]
    pub fn deny(mut self, type_name: &str, member: &str) -> Self {
        self.rules(type_name).deny.insert(member.to_string());
        self
    }

    fn rules(&mut self, type_name: &str) -> &mut Rules {
        self.types.entry(type_name.to_string()).or_default()
    }

    pub fn allowed(&self, type_name: &str, member: &str) -> bool {
        let Some(rules) = self.types.get(type_name) else {
            return true;
        };
        if rules.deny.contains(member) {
            return false;
        }
        if rules.allow.contains(member) {
            return true;
        }
        !rules.deny.contains(WILDCARD)
    }
}

/// An uberspect that hides whatever [`Permissions`] deny.
///
/// Denied members look absent: properties and methods resolve to nothing,
/// so the interpreter reports them the same way as unknown members.
/// Denied constructors fail outright.
#[derive(Debug)]
pub struct SandboxUberspect<U> {
    inner: U,
    permissions: Permissions,
}

impl<U: Uberspect> SandboxUberspect<U> {
    pub fn new(inner: U, permissions: Permissions) -> Self {
        SandboxUberspect { inner, permissions }
    }

    pub fn permissions(&self) -> &Permissions {
        &self.permissions
    }

    fn check(&self, object: &Value, member: &str) -> bool {
        let allowed = self.permissions.allowed(object.type_name(), member);
        if !allowed {
            debug!(type_name = object.type_name(), member, "sandbox denied member");
        }
        allowed
    }
}

impl<U: Uberspect> Uberspect for SandboxUberspect<U> {
    fn get_property(&self, object: &Value, name: &str) -> Option<Box<dyn PropertyGet>> {
        if self.check(object, name) {
            self.inner.get_property(object, name)
        } else {
            None
        }
    }

    fn set_property(
        &self,
        object: &Value,
        name: &str,
        value: &Value,
    ) -> Option<Box<dyn PropertySet>> {
        if self.check(object, name) {
            self.inner.set_property(object, name, value)
        } else {
            None
        }
    }

    fn get_method(
        &self,
        object: &Value,
        name: &str,
        args: &[Value],
    ) -> Result<Option<Box<dyn MethodExecutor>>, EvalError> {
        if self.check(object, name) {
            self.inner.get_method(object, name, args)
        } else {
            Ok(None)
        }
    }

    fn get_constructor(&self, name: &str, args: &[Value]) -> Result<Box<dyn MethodExecutor>, EvalError> {
        if self.permissions.allowed(name, "new") {
            self.inner.get_constructor(name, args)
        } else {
            debug!(type_name = name, "sandbox denied constructor");
            Err(errors::unsupported_operation(format!("new '{name}'")))
        }
    }
}
