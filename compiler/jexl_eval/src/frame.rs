//! Call frames.
//!
//! A closure call runs in a [`FrameContext`] layered over the caller's
//! context and the closure's captured context. Lookups try, in order:
//!
//! 1. the frame's own bindings (parameters and `var` declarations)
//! 2. the call-time context
//! 3. the captured context
//!
//! Assignment to a name bound nowhere lands in the call-time context, so
//! a script can still write results back to the embedder's context.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use jexl_value::{CancellationToken, Context, EvalError, SharedContext, Value};

pub struct FrameContext {
    bindings: RwLock<FxHashMap<String, Value>>,
    parent: SharedContext,
    captured: Option<SharedContext>,
}

impl FrameContext {
    pub fn new(parent: SharedContext, captured: Option<SharedContext>) -> Self {
        FrameContext {
            bindings: RwLock::new(FxHashMap::default()),
            parent,
            captured,
        }
    }

    /// Bind parameters before the frame is shared.
    #[must_use]
    pub fn with_bindings(self, bindings: impl IntoIterator<Item = (String, Value)>) -> Self {
        self.bindings.write().extend(bindings);
        self
    }

    fn captured_has(&self, name: &str) -> bool {
        self.captured.as_ref().is_some_and(|c| c.has(name))
    }
}

impl Context for FrameContext {
    fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.read().get(name) {
            return Some(value.clone());
        }
        self.parent
            .get(name)
            .or_else(|| self.captured.as_ref().and_then(|c| c.get(name)))
    }

    fn has(&self, name: &str) -> bool {
        self.bindings.read().contains_key(name) || self.parent.has(name) || self.captured_has(name)
    }

    fn set(&self, name: &str, value: Value) -> Result<(), EvalError> {
        {
            let mut bindings = self.bindings.write();
            if let Some(slot) = bindings.get_mut(name) {
                *slot = value;
                return Ok(());
            }
        }
        if !self.parent.has(name) {
            if let Some(captured) = self.captured.as_ref().filter(|c| c.has(name)) {
                return captured.set(name, value);
            }
        }
        self.parent.set(name, value)
    }

    fn declare(&self, name: &str, value: Value) -> Result<(), EvalError> {
        self.bindings.write().insert(name.to_string(), value);
        Ok(())
    }

    fn cancellation(&self) -> Option<&CancellationToken> {
        self.parent.cancellation()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use std::sync::Arc;

    use jexl_value::MapContext;
    use pretty_assertions::assert_eq;

    use super::*;

    fn frame(parent: &Arc<MapContext>, captured: &Arc<MapContext>) -> FrameContext {
        let parent: SharedContext = Arc::clone(parent) as _;
        let captured: SharedContext = Arc::clone(captured) as _;
        FrameContext::new(parent, Some(captured))
            .with_bindings([("p".to_string(), Value::int(1))])
    }

    #[test]
    fn lookup_order() {
        let parent = Arc::new(MapContext::new().with("p", 10).with("a", 2));
        let captured = Arc::new(MapContext::new().with("a", 3).with("c", 4));
        let f = frame(&parent, &captured);
        assert_eq!(f.get("p"), Some(Value::int(1)));
        assert_eq!(f.get("a"), Some(Value::int(2)));
        assert_eq!(f.get("c"), Some(Value::int(4)));
        assert_eq!(f.get("zz"), None);
    }

    #[test]
    fn assignment_targets() {
        let parent = Arc::new(MapContext::new().with("a", 2));
        let captured = Arc::new(MapContext::new().with("c", 4));
        let f = frame(&parent, &captured);
        f.set("p", Value::int(5)).unwrap();
        f.set("c", Value::int(6)).unwrap();
        f.set("fresh", Value::int(7)).unwrap();
        assert_eq!(f.get("p"), Some(Value::int(5)));
        assert_eq!(captured.get("c"), Some(Value::int(6)));
        assert_eq!(parent.get("fresh"), Some(Value::int(7)));

        f.declare("a", Value::int(8)).unwrap();
        assert_eq!(f.get("a"), Some(Value::int(8)));
        assert_eq!(parent.get("a"), Some(Value::int(2)));
    }

    #[test]
    fn cancellation_comes_from_the_caller() {
        let token = CancellationToken::new();
        let parent: SharedContext = MapContext::new()
            .with_cancellation(token.clone())
            .into_shared();
        let f = FrameContext::new(parent, None);
        token.cancel();
        assert!(f.cancellation().is_some_and(CancellationToken::is_cancelled));
    }
}
