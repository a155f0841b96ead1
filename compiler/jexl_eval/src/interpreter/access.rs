//! Member access through the uberspect: properties, indexing, method calls
//! and assignment targets.

use jexl_ir::{Node, NodeKind};
use jexl_value::errors::{self, EvalResult};
use jexl_value::{ControlAction, SharedContext, Value};
use tracing::trace;

use super::{Flow, Interpreter};

/// Member name for `object[key]`: the key's string form, with integral
/// numbers rendered without a fraction.
fn index_name(key: &Value) -> String {
    key.to_plain_string()
}

/// Arrays accept only non-negative integral indices.
fn bad_array_index(base: &Value, key: &Value) -> Option<usize> {
    match (base, key) {
        (Value::Array(items), Value::Number(n)) if n.to_index().is_none() => Some(items.read().len()),
        (Value::Array(items), Value::Bool(_) | Value::Nil) => Some(items.read().len()),
        _ => None,
    }
}

impl Interpreter<'_> {
    pub(super) fn eval_property(&mut self, object: &Node, name: &str, ctx: &SharedContext) -> Flow {
        let base = self.eval(object, ctx)?;
        Ok(self.get_member(&base, name)?)
    }

    pub(super) fn eval_index(&mut self, object: &Node, index: &Node, ctx: &SharedContext) -> Flow {
        let base = self.eval(object, ctx)?;
        let key = self.eval(index, ctx)?;
        if base.is_nil() {
            return Ok(self.nil_base(&index_name(&key))?);
        }
        if let Some(len) = bad_array_index(&base, &key) {
            return Ok(self.unresolved(errors::index_out_of_bounds(&key, len))?);
        }
        Ok(self.get_member(&base, &index_name(&key))?)
    }

    fn get_member(&self, base: &Value, name: &str) -> EvalResult {
        if base.is_nil() {
            return self.nil_base(name);
        }
        match self.uberspect.get_property(base, name) {
            Some(getter) => getter.get(base).or_else(|err| self.unresolved(err)),
            None => self.unresolved(errors::property_not_found(name, base.type_name())),
        }
    }

    pub(super) fn eval_method_call(
        &mut self,
        object: &Node,
        method: &str,
        args: &[Node],
        ctx: &SharedContext,
    ) -> Flow {
        let base = self.eval(object, ctx)?;
        let args = self.eval_all(args, ctx)?;
        if base.is_nil() {
            return Ok(self.nil_base(method)?);
        }
        if let (Value::Function(closure), "call") = (&base, method) {
            return Ok(self.call_closure(closure, &args, ctx)?);
        }
        if let Some(executor) = self.uberspect.get_method(&base, method, &args)? {
            trace!(method, type_name = base.type_name(), "method call");
            return executor
                .invoke(&base, &args)
                .or_else(|err| self.unresolved(err))
                .map_err(ControlAction::from);
        }
        // A map entry holding a closure is callable as a method.
        if let Value::Map(entries) = &base {
            let entry = entries.read().get(method).cloned();
            if let Some(Value::Function(closure)) = entry {
                return Ok(self.call_closure(&closure, &args, ctx)?);
            }
        }
        Ok(self.unresolved(errors::method_not_found(method, base.type_name()))?)
    }

    /// Store `value` into an assignable node.
    pub(super) fn assign_to(&mut self, target: &Node, value: Value, ctx: &SharedContext) -> Flow {
        match &target.kind {
            NodeKind::Ident(name) => {
                ctx.set(name, value)?;
            }
            NodeKind::Property { object, name } => {
                let base = self.eval(object, ctx)?;
                self.set_member(&base, name, value)?;
            }
            NodeKind::Index { object, index } => {
                let base = self.eval(object, ctx)?;
                let key = self.eval(index, ctx)?;
                if let Some(len) = bad_array_index(&base, &key) {
                    self.unresolved(errors::index_out_of_bounds(&key, len))?;
                } else {
                    self.set_member(&base, &index_name(&key), value)?;
                }
            }
            _ => return Err(errors::invalid_assignment(&target.to_string()).into()),
        }
        Ok(Value::Nil)
    }

    /// Unresolved setters are no-ops unless strict.
    fn set_member(&self, base: &Value, name: &str, value: Value) -> Result<(), ControlAction> {
        if base.is_nil() {
            self.nil_base(name)?;
            return Ok(());
        }
        let result = match self.uberspect.set_property(base, name, &value) {
            Some(setter) => setter.set(base, value),
            None => Err(errors::property_not_found(name, base.type_name())),
        };
        match result {
            Ok(()) => Ok(()),
            Err(err) => {
                self.unresolved(err)?;
                Ok(())
            }
        }
    }
}
