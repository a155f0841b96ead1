//! Embeddable JEXL-style expression and scripting engine.
//!
//! ```no_run
//! use jexl::{Engine, MapContext, Value};
//!
//! let engine = Engine::new();
//! let ctx = MapContext::new().with("x", 4).into_shared();
//! let value = engine.create_expression("x * 10 + 2")?.evaluate(&ctx)?;
//! assert_eq!(value, Value::int(42));
//! # Ok::<(), jexl::JexlError>(())
//! ```
//!
//! Sources compile once into an immutable tree, cached by the engine, and
//! evaluate against a [`Context`] per call. Scripts are closures over their
//! body: [`Script::curry`] binds leading arguments without mutating the
//! original.

mod cache;
mod engine;
mod error;
pub mod report;

use std::sync::Once;

pub use engine::{Engine, EngineBuilder, Expression, Script};
pub use error::{JexlError, Result};

pub use jexl_eval::uberspect::{self, MethodExecutor, PropertyGet, PropertySet};
pub use jexl_eval::{FrameContext, JexlUberspect, ObjectContext, Options, Permissions, SandboxUberspect, Uberspect};
pub use jexl_ir::{Features, Number, Pragma, Span};
pub use jexl_parse::{ErrorCode, ParseError};
pub use jexl_value::errors;
pub use jexl_value::{
    Arithmetic, CancellationToken, Closure, Context, EvalError, EvalErrorKind, HostObject, HostRef,
    JexlArithmetic, MapContext, MethodSignature, ParamKind, SharedContext, Value,
};

static TRACING_INIT: Once = Once::new();

/// Install a tracing subscriber when `RUST_LOG` is set.
///
/// Safe to call more than once. Enable with e.g. `RUST_LOG=jexl=debug` or
/// `RUST_LOG=jexl_eval=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    });
}
