//! Variable contexts.
//!
//! A [`Context`] resolves free variables for an evaluation. Contexts are
//! shared (`Arc<dyn Context>`) because closures capture the context they
//! were created in by reference; implementations use interior mutability.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::errors::EvalError;
use crate::value::Value;

/// Shared handle to a context.
pub type SharedContext = Arc<dyn Context>;

/// Variable storage seen by the interpreter.
pub trait Context: Send + Sync {
    /// Value of `name`, or `None` when it is not defined here.
    fn get(&self, name: &str) -> Option<Value>;

    fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Assign an existing or new variable.
    fn set(&self, name: &str, value: Value) -> Result<(), EvalError>;

    /// Introduce a local (`var`). Contexts without scopes treat this as a
    /// plain assignment.
    fn declare(&self, name: &str, value: Value) -> Result<(), EvalError> {
        self.set(name, value)
    }

    /// Token polled by long-running evaluations.
    fn cancellation(&self) -> Option<&CancellationToken> {
        None
    }
}

/// A cancellation flag shared between the embedder and an evaluation.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A context backed by a hash map.
#[derive(Debug, Default)]
pub struct MapContext {
    vars: RwLock<FxHashMap<String, Value>>,
    cancellation: Option<CancellationToken>,
}

impl MapContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable; for building a context before evaluation.
    #[must_use]
    pub fn with(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.vars.write().insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn into_shared(self) -> SharedContext {
        Arc::new(self)
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        self.vars.write().remove(name)
    }

    pub fn len(&self) -> usize {
        self.vars.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.read().is_empty()
    }
}

impl Context for MapContext {
    fn get(&self, name: &str) -> Option<Value> {
        self.vars.read().get(name).cloned()
    }

    fn has(&self, name: &str) -> bool {
        self.vars.read().contains_key(name)
    }

    fn set(&self, name: &str, value: Value) -> Result<(), EvalError> {
        self.vars.write().insert(name.to_string(), value);
        Ok(())
    }

    fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancellation.as_ref()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for MapContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let vars = iter
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        MapContext {
            vars: RwLock::new(vars),
            cancellation: None,
        }
    }
}
