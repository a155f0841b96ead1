#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use jexl_ir::{Lambda, Literal, Node, NodeKind, Number, Span};
use pretty_assertions::assert_eq;

use super::*;

fn lambda(params: &[&str]) -> Arc<Lambda> {
    let body = Node::new(NodeKind::Literal(Literal::Nil), Span::DUMMY);
    Arc::new(Lambda::new(
        params.iter().map(|p| (*p).to_string()).collect(),
        body,
    ))
}

#[derive(Debug)]
struct Point;

impl HostObject for Point {
    fn type_name(&self) -> &str {
        "Point"
    }
}

#[test]
fn arrays_alias_on_clone() {
    let a = Value::array(vec![Value::int(1)]);
    let b = a.clone();
    if let Value::Array(items) = &b {
        items.write().push(Value::int(2));
    }
    assert_eq!(a.array_snapshot().unwrap().len(), 2);
    assert!(a.ptr_eq(&b));
    assert!(!a.ptr_eq(&Value::array(vec![Value::int(1), Value::int(2)])));
    assert_eq!(a, Value::array(vec![Value::int(1), Value::int(2)]));
}

#[test]
fn display_forms() {
    assert_eq!(Value::Nil.to_string(), "null");
    assert_eq!(Value::from("hi").to_string(), "hi");
    assert_eq!(Value::float(0.5).to_string(), "0.5");
    let nested = Value::array(vec![Value::from("a"), Value::int(1), Value::Nil]);
    assert_eq!(nested.to_string(), "[\"a\", 1, null]");
    let map = Value::map_from([("k", Value::Bool(true))]);
    assert_eq!(map.to_string(), "{\"k\": true}");
    assert_eq!(Value::map_from(Vec::<(String, Value)>::new()).to_string(), "{:}");
    assert_eq!(Value::object(Point).to_string(), "<Point>");
}

#[test]
fn plain_string_treats_nil_as_empty() {
    assert_eq!(Value::Nil.to_plain_string(), "");
    assert_eq!(Value::int(3).to_plain_string(), "3");
}

#[test]
fn float_ingestion_is_exact() {
    assert_eq!(Value::float(f64::NAN), Value::Nil);
    assert_eq!(Value::float(2.0), Value::int(2));
    assert_eq!(Value::float(0.1).as_number().unwrap(), &Number::from_f64(0.1).unwrap());
}

#[test]
fn type_names() {
    assert_eq!(Value::Nil.type_name(), "null");
    assert_eq!(Value::array(vec![]).type_name(), "array");
    assert_eq!(Value::object(Point).type_name(), "Point");
    assert_eq!(Value::from(Closure::new(lambda(&[]), None)).type_name(), "function");
}

#[test]
fn option_conversion() {
    assert_eq!(Value::from(None::<i64>), Value::Nil);
    assert_eq!(Value::from(Some("x")), Value::from("x"));
}

#[test]
fn curry_appends_without_mutating() {
    let closure = Closure::new(lambda(&["a", "b", "c"]), None);
    let curried = closure.curry(&[Value::int(1), Value::int(2)]);
    assert_eq!(closure.unbound_count(), 3);
    assert_eq!(curried.unbound_count(), 1);
    assert_eq!(curried.unbound_params(), ["c".to_string()]);
    assert!(Arc::ptr_eq(closure.lambda(), curried.lambda()));
    assert!(!closure.ptr_eq(&curried));

    let over = curried.curry(&[Value::int(3), Value::int(4)]);
    assert_eq!(over.unbound_count(), 0);
    assert!(over.unbound_params().is_empty());
}

#[test]
fn bind_arguments_pads_and_truncates() {
    let closure = Closure::new(lambda(&["a", "b"]), None).curry(&[Value::int(1)]);
    let bound = closure.bind_arguments(&[]);
    assert_eq!(
        bound,
        vec![
            ("a".to_string(), Value::int(1)),
            ("b".to_string(), Value::Nil)
        ]
    );
    let bound = closure.bind_arguments(&[Value::int(2), Value::int(3)]);
    assert_eq!(bound[1], ("b".to_string(), Value::int(2)));
    assert_eq!(bound.len(), 2);
}

#[test]
fn closures_compare_by_identity() {
    let l = lambda(&["x"]);
    let a = Value::from(Closure::new(Arc::clone(&l), None));
    let b = Value::from(Closure::new(l, None));
    let c = Value::from(Closure::new(lambda(&["x"]), None));
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn self_referential_collections_stop_at_the_cycle() {
    let a = Value::array(vec![Value::int(1)]);
    if let Value::Array(items) = &a {
        items.write().push(a.clone());
    }
    assert_eq!(a.to_string(), "[1, [...]]");
    assert!(format!("{a:?}").contains("Array([...])"));

    let m = Value::map_from([("n", Value::int(1))]);
    if let Value::Map(entries) = &m {
        entries.write().insert("self".to_string(), m.clone());
    }
    assert_eq!(m.to_string(), "{\"n\": 1, \"self\": {...}}");

    // Two distinct cycles of the same shape compare equal; the shape matters.
    let b = Value::array(vec![Value::int(1)]);
    if let Value::Array(items) = &b {
        items.write().push(b.clone());
    }
    assert_eq!(a, b);
    let c = Value::array(vec![Value::int(2)]);
    if let Value::Array(items) = &c {
        items.write().push(c.clone());
    }
    assert_ne!(a, c);
}

#[test]
fn shared_siblings_print_in_full() {
    let inner = Value::array(vec![Value::int(1)]);
    let outer = Value::array(vec![inner.clone(), inner]);
    assert_eq!(outer.to_string(), "[[1], [1]]");
}
