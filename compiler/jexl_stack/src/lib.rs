//! Stack safety for the recursive parser and interpreter.
//!
//! Two independent guards live here:
//!
//! - [`ensure_sufficient_stack`] grows the native stack on demand so deeply
//!   nested source never aborts the host process.
//! - [`DepthCounter`] enforces the engine's *logical* recursion limit, which
//!   is what scripts observe as a `StackOverflow` error.
//!
//! The native guard keeps a 128KB red zone and grows in 1MB segments.
//! WASM targets call through directly.

/// Minimum stack space to keep available before recursing.
const RED_ZONE: usize = 128 * 1024;

/// Stack space allocated per growth step.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first when less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Counts nested evaluation frames against a fixed limit.
///
/// `enter` must be paired with `exit`; the interpreter does this around
/// every node it evaluates.
#[derive(Clone, Copy, Debug)]
pub struct DepthCounter {
    depth: usize,
    limit: usize,
}

impl DepthCounter {
    /// A counter at depth zero with the given limit.
    pub const fn new(limit: usize) -> Self {
        Self { depth: 0, limit }
    }

    /// Descend one level.
    ///
    /// Returns the configured limit as the error when it would be exceeded;
    /// the depth is left unchanged in that case.
    #[inline]
    pub fn enter(&mut self) -> Result<(), usize> {
        if self.depth >= self.limit {
            return Err(self.limit);
        }
        self.depth += 1;
        Ok(())
    }

    /// Ascend one level.
    #[inline]
    pub fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Configured maximum depth.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests;
