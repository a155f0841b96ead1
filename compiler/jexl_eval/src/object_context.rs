//! A context whose variables are the properties of one value.

use std::sync::Arc;

use jexl_value::errors;
use jexl_value::{Context, EvalError, Value};

use crate::uberspect::Uberspect;

/// Resolves variables through an uberspect as properties of `object`.
///
/// Useful for evaluating an expression "inside" a host object or map:
/// `name` in the expression reads `object.name`.
pub struct ObjectContext {
    object: Value,
    uberspect: Arc<dyn Uberspect>,
}

impl ObjectContext {
    pub fn new(object: Value, uberspect: Arc<dyn Uberspect>) -> Self {
        ObjectContext { object, uberspect }
    }

    pub fn object(&self) -> &Value {
        &self.object
    }
}

impl Context for ObjectContext {
    fn get(&self, name: &str) -> Option<Value> {
        let getter = self.uberspect.get_property(&self.object, name)?;
        getter.get(&self.object).ok()
    }

    fn set(&self, name: &str, value: Value) -> Result<(), EvalError> {
        match self.uberspect.set_property(&self.object, name, &value) {
            Some(setter) => setter.set(&self.object, value),
            None => Err(errors::property_not_found(name, self.object.type_name())),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::uberspect::JexlUberspect;

    #[test]
    fn variables_are_properties() {
        let map = Value::map_from([("a", Value::int(1))]);
        let ctx = ObjectContext::new(map.clone(), Arc::new(JexlUberspect::new()));
        assert_eq!(ctx.get("a"), Some(Value::int(1)));
        ctx.set("b", Value::int(2)).unwrap();
        assert_eq!(map, Value::map_from([("a", Value::int(1)), ("b", Value::int(2))]));

        let text = ObjectContext::new(Value::from("abc"), Arc::new(JexlUberspect::new()));
        assert_eq!(text.get("length"), Some(Value::int(3)));
        assert_eq!(text.get("nope"), None);
        assert!(text.set("x", Value::Nil).is_err());
    }
}
