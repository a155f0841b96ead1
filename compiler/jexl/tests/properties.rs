//! Property tests for exact arithmetic and total compilation.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use jexl::{Engine, MapContext, Number, Value};
use proptest::prelude::*;

fn eval_with(engine: &Engine, src: &str, a: i64, b: i64) -> Value {
    let ctx = MapContext::new().with("a", a).with("b", b).into_shared();
    engine.create_expression(src).unwrap().evaluate(&ctx).unwrap()
}

proptest! {
    /// Division followed by multiplication restores the dividend exactly.
    #[test]
    fn division_round_trips(a in -1_000_000i64..1_000_000, b in -1_000i64..1_000) {
        prop_assume!(b != 0);
        let engine = Engine::new();
        prop_assert_eq!(eval_with(&engine, "a / b * b", a, b), Value::int(a));
        prop_assert_eq!(eval_with(&engine, "a / b * b == a", a, b), Value::Bool(true));
    }

    /// Integer division and modulo agree: `a == (a - a % b) / b * b + a % b`.
    #[test]
    fn modulo_is_consistent(a in -10_000i64..10_000, b in 1i64..100) {
        let engine = Engine::new();
        let value = eval_with(&engine, "(a - a % b) / b * b + a % b", a, b);
        prop_assert_eq!(value, Value::int(a));
    }

    /// Decimal text parses to the value it displays as.
    #[test]
    fn decimals_round_trip(int in 0u64..1_000_000, frac in 0u32..1000) {
        let text = format!("{int}.{frac:03}");
        let n = Number::parse_decimal(&text).unwrap();
        let again = Number::parse_decimal(&n.to_string()).unwrap();
        prop_assert_eq!(n, again);
    }

    /// Compilation never panics, whatever the input.
    #[test]
    fn compilation_is_total(source in "\\PC{0,48}") {
        let engine = Engine::builder().cache(0).build();
        let _ = engine.create_expression(&source);
        let _ = engine.create_script(&source);
    }
}
