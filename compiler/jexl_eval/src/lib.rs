//! Evaluation for the jexl engine.
//!
//! - [`Interpreter`]: walks a parsed tree against a context
//! - [`uberspect`]: member resolution, host overloads and sandboxing
//! - [`FrameContext`] / [`ObjectContext`]: contexts the engine builds
//! - [`Options`]: strict/safe/silent/cancellable policy

mod frame;
mod interpreter;
mod object_context;
mod options;
pub mod uberspect;

pub use frame::FrameContext;
pub use interpreter::Interpreter;
pub use object_context::ObjectContext;
pub use options::Options;
pub use uberspect::{JexlUberspect, Permissions, SandboxUberspect, Uberspect};
