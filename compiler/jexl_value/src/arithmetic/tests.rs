#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cmp::Ordering;

use jexl_ir::Number;
use pretty_assertions::assert_eq;

use super::*;
use crate::errors::EvalErrorKind;
use crate::host::HostObject;

fn lenient() -> JexlArithmetic {
    JexlArithmetic::new(false)
}

fn strict() -> JexlArithmetic {
    JexlArithmetic::new(true)
}

fn int(n: i64) -> Value {
    Value::int(n)
}

fn s(text: &str) -> Value {
    Value::from(text)
}

#[derive(Debug)]
struct Money(i64);

impl HostObject for Money {
    fn type_name(&self) -> &str {
        "Money"
    }

    fn to_number(&self) -> Option<Number> {
        Some(Number::from(self.0))
    }
}

mod numeric {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn division_is_exact() {
        let a = lenient();
        let third = a.divide(&int(10), &int(3)).unwrap();
        assert_eq!(a.multiply(&third, &int(3)).unwrap(), int(10));
        assert_eq!(third.to_string(), "10/3");
    }

    #[test]
    fn division_by_zero() {
        let err = lenient().divide(&int(1), &int(0)).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
        let err = lenient().modulo(&int(1), &int(0)).unwrap_err();
        assert_eq!(err.kind, EvalErrorKind::DivisionByZero);
    }

    #[test]
    fn modulo_keeps_dividend_sign() {
        let a = lenient();
        assert_eq!(a.modulo(&int(-7), &int(3)).unwrap(), int(-1));
        assert_eq!(a.modulo(&int(7), &int(-3)).unwrap(), int(1));
        // Operands truncate first.
        assert_eq!(a.modulo(&Value::float(7.9), &int(3)).unwrap(), int(1));
    }

    #[test]
    fn booleans_count_as_bits() {
        let a = lenient();
        assert_eq!(a.add(&Value::Bool(true), &int(1)).unwrap(), int(2));
        assert_eq!(
            a.compare(&Value::Bool(false), &Value::Bool(true)).unwrap(),
            Ordering::Less
        );
        assert_eq!(a.negate(&Value::Bool(true)).unwrap(), Value::Bool(false));
    }

    #[test]
    fn numeric_strings_coerce_except_for_add() {
        let a = lenient();
        assert_eq!(a.multiply(&s("2"), &int(3)).unwrap(), int(6));
        assert_eq!(a.subtract(&s(" -1.5 "), &int(1)).unwrap(), Value::float(-2.5));
        assert_eq!(a.add(&s("2"), &int(3)).unwrap(), s("23"));
        assert!(a.subtract(&s("two"), &int(1)).is_err());
    }

    #[test]
    fn nil_depends_on_strictness() {
        assert_eq!(lenient().add(&Value::Nil, &int(2)).unwrap(), int(2));
        assert_eq!(lenient().add(&s("a"), &Value::Nil).unwrap(), s("a"));
        let err = strict().add(&Value::Nil, &int(2)).unwrap_err();
        assert!(matches!(err.kind, EvalErrorKind::UnsupportedOperand { .. }));
        assert!(strict().add(&s("a"), &Value::Nil).is_err());
    }

    #[test]
    fn host_numbers_participate() {
        let a = lenient();
        assert_eq!(a.add(&Value::object(Money(5)), &int(1)).unwrap(), int(6));
        assert!(!a.to_boolean(&Value::object(Money(0))));
        assert!(a.to_boolean(&Value::object(Money(3))));
    }

    #[test]
    fn to_number_rejects_collections() {
        assert!(lenient().to_number(&Value::array(vec![])).is_err());
        assert_eq!(lenient().to_number(&s("4")).unwrap(), Number::from(4));
    }
}

mod comparison {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ordering_within_kinds() {
        let a = lenient();
        assert_eq!(a.compare(&s("abc"), &s("abd")).unwrap(), Ordering::Less);
        assert_eq!(a.compare(&int(2), &Value::float(1.5)).unwrap(), Ordering::Greater);
        let err = a.compare(&s("10"), &int(9)).unwrap_err();
        assert!(matches!(err.kind, EvalErrorKind::UnsupportedOperand { .. }));
    }

    #[test]
    fn equality_falls_back_to_structure() {
        let a = lenient();
        assert!(a.equals(&Value::Nil, &Value::Nil));
        assert!(!a.equals(&Value::Nil, &int(0)));
        assert!(!a.equals(&s("1"), &int(1)));
        assert!(a.equals(&int(1), &Value::float(1.0)));
        let left = Value::array(vec![int(1), Value::map_from([("k", s("v"))])]);
        let right = Value::array(vec![int(1), Value::map_from([("k", s("v"))])]);
        assert!(a.equals(&left, &right));
        assert!(!a.equals(&left, &Value::array(vec![int(1)])));
    }

    #[test]
    fn equality_terminates_on_cycles() {
        let cyclic = |head: i64| {
            let items = Value::array(vec![int(head)]);
            if let Value::Array(shared) = &items {
                shared.write().push(items.clone());
            }
            items
        };
        let a = lenient();
        assert!(a.equals(&cyclic(1), &cyclic(1)));
        assert!(!a.equals(&cyclic(1), &cyclic(2)));
        assert!(a.contains(&cyclic(1), &cyclic(1)).unwrap());
    }

    #[test]
    fn truthiness() {
        let a = lenient();
        for (value, expected) in [
            (Value::Nil, false),
            (int(0), false),
            (Value::float(0.5), true),
            (s(""), false),
            (s("x"), true),
            (Value::array(vec![]), false),
            (Value::array(vec![Value::Nil]), true),
            (Value::map_from(Vec::<(String, Value)>::new()), false),
        ] {
            assert_eq!(a.to_boolean(&value), expected, "{value:?}");
        }
    }
}

mod matching {
    use super::*;

    #[test]
    fn string_container_is_a_full_match_pattern() {
        let a = lenient();
        assert!(a.contains(&s("ab+c"), &s("abbc")).unwrap());
        assert!(!a.contains(&s("ab+c"), &s("xabbcx")).unwrap());
        assert!(a.contains(&s("[0-9]+"), &int(42)).unwrap());
        // Second use comes from the cache.
        assert!(a.contains(&s("ab+c"), &s("abc")).unwrap());
    }

    #[test]
    fn invalid_pattern() {
        let err = lenient().contains(&s("("), &s("x")).unwrap_err();
        assert!(matches!(err.kind, EvalErrorKind::InvalidRegex { .. }));
    }

    #[test]
    fn collections() {
        let a = lenient();
        let list = Value::array(vec![int(1), int(2)]);
        assert!(a.contains(&list, &Value::float(2.0)).unwrap());
        assert!(!a.contains(&list, &int(3)).unwrap());
        let map = Value::map_from([("k", int(1))]);
        assert!(a.contains(&map, &s("k")).unwrap());
        assert!(!a.contains(&map, &int(1)).unwrap());
        assert!(a.contains(&int(5), &int(5)).unwrap());
    }

    #[test]
    fn prefixes_and_suffixes() {
        let a = lenient();
        assert!(a.starts_with(&s("hello"), &s("he")).unwrap());
        assert!(a.ends_with(&int(1234), &int(34)).unwrap());
        let list = Value::array(vec![int(1), int(2)]);
        assert!(a.starts_with(&list, &int(1)).unwrap());
        assert!(a.ends_with(&list, &int(2)).unwrap());
        assert!(!a.ends_with(&Value::array(vec![]), &int(2)).unwrap());
        assert!(!a.starts_with(&Value::Nil, &s("x")).unwrap());
        assert!(strict().starts_with(&Value::Nil, &s("x")).is_err());
    }
}

mod bitwise {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn booleans_stay_boolean() {
        let a = lenient();
        assert_eq!(
            a.bit_and(&Value::Bool(true), &Value::Bool(false)).unwrap(),
            Value::Bool(false)
        );
        assert_eq!(
            a.bit_xor(&Value::Bool(true), &Value::Bool(false)).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn integer_operations() {
        let a = lenient();
        assert_eq!(a.bit_or(&int(0b1010), &int(0b0101)).unwrap(), int(0b1111));
        assert_eq!(a.bit_and(&Value::float(6.7), &int(3)).unwrap(), int(2));
        assert_eq!(a.bit_complement(&int(0)).unwrap(), int(-1));
    }

    #[test]
    fn shifts() {
        let a = lenient();
        assert_eq!(a.shift_left(&int(1), &int(4)).unwrap(), int(16));
        assert_eq!(a.shift_left(&int(1), &int(64)).unwrap(), int(1));
        assert_eq!(a.shift_right(&int(-16), &int(2)).unwrap(), int(-4));
        assert_eq!(
            a.shift_right_unsigned(&int(-1), &int(60)).unwrap(),
            int(15)
        );
    }
}

#[test]
fn emptiness_and_size() {
    let a = lenient();
    assert!(a.is_empty(&Value::Nil));
    assert!(a.is_empty(&s("")));
    assert!(!a.is_empty(&int(0)));
    assert_eq!(a.size(&s("héllo")).unwrap(), 5);
    assert_eq!(a.size(&Value::array(vec![int(1), int(2)])).unwrap(), 2);
    assert_eq!(a.size(&Value::Nil).unwrap(), 0);
    assert!(a.size(&int(3)).is_err());
}
