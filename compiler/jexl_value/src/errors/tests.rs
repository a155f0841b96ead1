#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use jexl_ir::Span;
use pretty_assertions::assert_eq;

#[test]
fn division_by_zero_has_kind_and_message() {
    let err = division_by_zero();
    assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
    assert_eq!(err.message, "division by zero");
    assert_eq!(err.span, None);
}

#[test]
fn undefined_variable_carries_name() {
    let err = undefined_variable("x");
    assert_eq!(
        err.kind,
        EvalErrorKind::UndefinedVariable {
            name: "x".to_string()
        }
    );
    assert_eq!(err.message, "undefined variable: x");
}

#[test]
fn unsupported_operand_names_both_kinds() {
    let err = unsupported_operand("-", &Value::from("a"), Some(&Value::Bool(true)));
    assert_eq!(err.message, "operator '-' cannot be applied to string and boolean");
    let err = unsupported_operand("~", &Value::array(vec![]), None);
    assert_eq!(err.message, "operator '~' cannot be applied to array");
}

#[test]
fn index_out_of_bounds_message() {
    let err = index_out_of_bounds(&Value::int(5), 3);
    assert_eq!(err.message, "index 5 out of bounds for length 3");
}

#[test]
fn unresolved_kinds() {
    assert!(undefined_variable("x").kind.is_unresolved());
    assert!(property_not_found("p", "map").kind.is_unresolved());
    assert!(method_not_found("m", "string").kind.is_unresolved());
    assert!(index_out_of_bounds(&Value::int(1), 0).kind.is_unresolved());
    assert!(!division_by_zero().kind.is_unresolved());
    assert!(!nil_access("x").kind.is_unresolved());
}

#[test]
fn span_is_attached_once() {
    let err = division_by_zero()
        .with_span(Span::new(2, 5))
        .with_span(Span::new(0, 9));
    assert_eq!(err.span, Some(Span::new(2, 5)));
    assert_eq!(err.to_string(), "division by zero at 2..5");
}

#[test]
fn custom_errors() {
    let err = EvalError::new("boom");
    assert_eq!(
        err.kind,
        EvalErrorKind::Custom {
            message: "boom".to_string()
        }
    );
    assert_eq!(wrong_arg_count("substring", 1, 3).message, "substring expects 1 argument, got 3");
}

#[test]
fn escaped_signals_become_errors() {
    assert_eq!(
        ControlAction::Break.into_error().message,
        "'break' outside of a loop"
    );
    let err = cancelled();
    assert_eq!(ControlAction::from(err.clone()).into_error(), err);
}
