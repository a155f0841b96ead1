//! Evaluation errors and control signals.
//!
//! Factory functions (`division_by_zero()`, `undefined_variable(name)`, ...)
//! are the public way to build errors. Each fills in a structured
//! [`EvalErrorKind`] for callers that branch on the failure, and a message
//! derived from it for humans.

use std::fmt;

use jexl_ir::Span;

use crate::value::Value;

/// Result of evaluating to a value.
pub type EvalResult = Result<Value, EvalError>;

/// Typed error category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    // Operators
    UnsupportedOperand {
        operator: String,
        operands: String,
    },
    UnsupportedOperation {
        operation: String,
    },
    DivisionByZero,

    // Resolution
    UndefinedVariable {
        name: String,
    },
    PropertyNotFound {
        property: String,
        type_name: String,
    },
    MethodNotFound {
        method: String,
        type_name: String,
    },
    IndexOutOfBounds {
        index: String,
        len: usize,
    },
    NilAccess {
        member: String,
    },

    // Calls
    StackOverflow {
        limit: usize,
    },
    NotImplemented {
        feature: String,
    },
    NotCallable {
        type_name: String,
    },

    InvalidAssignment {
        target: String,
    },
    InvalidRegex {
        pattern: String,
        reason: String,
    },
    Cancelled,

    Custom {
        message: String,
    },
}

impl EvalErrorKind {
    /// Failures to resolve a name, member or index. Non-strict evaluation
    /// turns these into nil.
    pub fn is_unresolved(&self) -> bool {
        matches!(
            self,
            EvalErrorKind::UndefinedVariable { .. }
                | EvalErrorKind::PropertyNotFound { .. }
                | EvalErrorKind::MethodNotFound { .. }
                | EvalErrorKind::IndexOutOfBounds { .. }
        )
    }
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedOperand { operator, operands } => {
                write!(f, "operator '{operator}' cannot be applied to {operands}")
            }
            Self::UnsupportedOperation { operation } => {
                write!(f, "unsupported operation: {operation}")
            }
            Self::DivisionByZero => f.write_str("division by zero"),
            Self::UndefinedVariable { name } => write!(f, "undefined variable: {name}"),
            Self::PropertyNotFound {
                property,
                type_name,
            } => write!(f, "no property '{property}' on {type_name}"),
            Self::MethodNotFound { method, type_name } => {
                write!(f, "no method '{method}' on {type_name}")
            }
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
            Self::NilAccess { member } => write!(f, "cannot access '{member}' on null"),
            Self::StackOverflow { limit } => {
                write!(f, "maximum evaluation depth exceeded (limit: {limit})")
            }
            Self::NotImplemented { feature } => write!(f, "not implemented: {feature}"),
            Self::NotCallable { type_name } => write!(f, "{type_name} is not callable"),
            Self::InvalidAssignment { target } => write!(f, "cannot assign to {target}"),
            Self::InvalidRegex { pattern, reason } => {
                write!(f, "invalid regular expression '{pattern}': {reason}")
            }
            Self::Cancelled => f.write_str("evaluation cancelled"),
            Self::Custom { message } => f.write_str(message),
        }
    }
}

/// An evaluation failure.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Human-readable message; equals `kind.to_string()` for errors built
    /// by the factory functions.
    pub message: String,
    /// Source location, attached by the interpreter at the failing node.
    pub span: Option<Span>,
}

impl EvalError {
    /// A `Custom` error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        EvalError {
            kind: EvalErrorKind::Custom {
                message: message.clone(),
            },
            message,
            span: None,
        }
    }

    pub fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        EvalError {
            kind,
            message,
            span: None,
        }
    }

    /// Attach `span` unless a more precise one is already set.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(span) = self.span {
            write!(f, " at {span}")?;
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {}

/// Non-local exits travelling up the interpreter.
///
/// `Break`/`Continue` are caught by the innermost loop and `Return` by the
/// innermost call boundary; `Error` propagates to the caller.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlAction {
    Error(EvalError),
    Break,
    Continue,
    Return(Value),
}

impl From<EvalError> for ControlAction {
    #[inline]
    fn from(err: EvalError) -> Self {
        ControlAction::Error(err)
    }
}

impl ControlAction {
    /// Collapse a signal that escaped every handler into an error.
    pub fn into_error(self) -> EvalError {
        match self {
            ControlAction::Error(err) => err,
            ControlAction::Break => EvalError::new("'break' outside of a loop"),
            ControlAction::Continue => EvalError::new("'continue' outside of a loop"),
            ControlAction::Return(_) => EvalError::new("'return' outside of a function"),
        }
    }
}

// Operator errors

#[cold]
pub fn unsupported_operand(operator: &str, left: &Value, right: Option<&Value>) -> EvalError {
    let operands = match right {
        Some(right) => format!("{} and {}", left.type_name(), right.type_name()),
        None => left.type_name().to_string(),
    };
    EvalError::from_kind(EvalErrorKind::UnsupportedOperand {
        operator: operator.to_string(),
        operands,
    })
}

#[cold]
pub fn unsupported_operation(operation: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnsupportedOperation {
        operation: operation.into(),
    })
}

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalError::from_kind(EvalErrorKind::DivisionByZero)
}

// Resolution errors

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn property_not_found(property: &str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::PropertyNotFound {
        property: property.to_string(),
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn method_not_found(method: &str, type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::MethodNotFound {
        method: method.to_string(),
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn index_out_of_bounds(index: &Value, len: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::IndexOutOfBounds {
        index: index.to_string(),
        len,
    })
}

#[cold]
pub fn nil_access(member: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NilAccess {
        member: member.to_string(),
    })
}

// Call errors

#[cold]
pub fn stack_overflow(limit: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StackOverflow { limit })
}

#[cold]
pub fn not_implemented(feature: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotImplemented {
        feature: feature.into(),
    })
}

#[cold]
pub fn not_callable(value: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::NotCallable {
        type_name: value.type_name().to_string(),
    })
}

/// Builtin called with the wrong number of arguments.
#[cold]
pub fn wrong_arg_count(method: &str, expected: usize, got: usize) -> EvalError {
    let word = if expected == 1 { "argument" } else { "arguments" };
    EvalError::new(format!("{method} expects {expected} {word}, got {got}"))
}

/// Builtin called with an argument of the wrong kind.
#[cold]
pub fn wrong_arg_type(method: &str, expected: &str, got: &Value) -> EvalError {
    EvalError::new(format!(
        "{method} expects a {expected} argument, got {}",
        got.type_name()
    ))
}

// Other

#[cold]
pub fn invalid_assignment(target: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidAssignment {
        target: target.to_string(),
    })
}

#[cold]
pub fn invalid_regex(pattern: &str, reason: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::InvalidRegex {
        pattern: pattern.to_string(),
        reason: reason.to_string(),
    })
}

#[cold]
pub fn cancelled() -> EvalError {
    EvalError::from_kind(EvalErrorKind::Cancelled)
}

#[cfg(test)]
mod tests;
