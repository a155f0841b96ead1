//! Engine-level error.

use jexl_ir::Span;
use jexl_parse::ParseError;
use jexl_value::EvalError;

/// Failure to compile or evaluate.
#[derive(Clone, Debug, thiserror::Error)]
pub enum JexlError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl JexlError {
    /// Source range the error points at, when known.
    pub fn span(&self) -> Option<Span> {
        match self {
            JexlError::Parse(err) => Some(err.span),
            JexlError::Eval(err) => err.span,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            JexlError::Parse(err) => &err.message,
            JexlError::Eval(err) => &err.message,
        }
    }
}

/// Result type of the engine API.
pub type Result<T, E = JexlError> = std::result::Result<T, E>;
