//! Closures: a shared lambda, its curried arguments and the context it was
//! created in.

use std::fmt;
use std::sync::Arc;

use jexl_ir::Lambda;

use super::Value;
use crate::context::SharedContext;

/// A callable value.
///
/// The lambda is shared and never mutated. Currying produces a new closure
/// over the same lambda; the original keeps its bound arguments.
#[derive(Clone)]
pub struct Closure {
    lambda: Arc<Lambda>,
    bound: Vec<Value>,
    captured: Option<SharedContext>,
}

impl Closure {
    pub fn new(lambda: Arc<Lambda>, captured: Option<SharedContext>) -> Self {
        Closure {
            lambda,
            bound: Vec::new(),
            captured,
        }
    }

    pub fn lambda(&self) -> &Arc<Lambda> {
        &self.lambda
    }

    pub fn params(&self) -> &[String] {
        &self.lambda.params
    }

    /// Arguments fixed by [`Closure::curry`], in parameter order.
    pub fn bound(&self) -> &[Value] {
        &self.bound
    }

    /// The context captured by reference when the lambda was evaluated.
    pub fn captured(&self) -> Option<&SharedContext> {
        self.captured.as_ref()
    }

    /// Parameters not yet fixed by currying.
    pub fn unbound_params(&self) -> &[String] {
        self.params().get(self.bound.len()..).unwrap_or(&[])
    }

    pub fn unbound_count(&self) -> usize {
        self.params().len().saturating_sub(self.bound.len())
    }

    /// A new closure with `args` appended to the bound arguments.
    #[must_use]
    pub fn curry(&self, args: &[Value]) -> Closure {
        let mut bound = self.bound.clone();
        bound.extend_from_slice(args);
        Closure {
            lambda: Arc::clone(&self.lambda),
            bound,
            captured: self.captured.clone(),
        }
    }

    /// Pair every parameter with its argument: bound arguments first, then
    /// `args`. Missing arguments are nil; extra arguments are dropped.
    pub fn bind_arguments(&self, args: &[Value]) -> Vec<(String, Value)> {
        let mut supplied = self.bound.iter().chain(args);
        self.params()
            .iter()
            .map(|name| (name.clone(), supplied.next().cloned().unwrap_or_default()))
            .collect()
    }

    /// Same lambda, same captured context and same curried arguments.
    /// Curried collections must be the same instance.
    pub fn ptr_eq(&self, other: &Closure) -> bool {
        let same_capture = match (&self.captured, &other.captured) {
            (Some(a), Some(b)) => std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)),
            (None, None) => true,
            _ => false,
        };
        Arc::ptr_eq(&self.lambda, &other.lambda)
            && same_capture
            && self.bound.len() == other.bound.len()
            && self
                .bound
                .iter()
                .zip(&other.bound)
                .all(|(a, b)| a.ptr_eq(b) || (a.shared_addr().is_none() && a == b))
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("params", &self.lambda.params)
            .field("bound", &self.bound.len())
            .field("captured", &self.captured.is_some())
            .finish()
    }
}
