//! Runtime model for the jexl engine.
//!
//! - [`Value`]: the dynamic value set, with reference-semantics arrays and
//!   maps and exact rational numbers
//! - [`Closure`]: a lambda plus curried arguments and captured context
//! - [`HostObject`]: the trait an embedder implements to expose its types
//! - [`Arithmetic`]: operator semantics, with [`JexlArithmetic`] as default
//! - [`Context`]: variable lookup, with [`MapContext`] as default
//! - [`EvalError`] / [`ControlAction`]: failures and control signals

pub mod arithmetic;
pub mod context;
pub mod errors;
mod host;
mod value;

pub use arithmetic::{loose_equals, Arithmetic, JexlArithmetic};
pub use context::{CancellationToken, Context, MapContext, SharedContext};
pub use errors::{ControlAction, EvalError, EvalErrorKind, EvalResult};
pub use host::{HostObject, HostRef, MethodSignature, ParamKind};
pub use value::{Closure, Shared, Value};
