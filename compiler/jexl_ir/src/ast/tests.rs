#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use pretty_assertions::assert_eq;

use super::*;

fn node(kind: NodeKind) -> Node {
    Node::new(kind, Span::DUMMY)
}

fn num(n: i64) -> Node {
    node(NodeKind::Literal(Literal::Number(Number::from(n))))
}

fn ident(name: &str) -> Node {
    node(NodeKind::Ident(name.to_string()))
}

fn binary(op: BinaryOp, left: Node, right: Node) -> Node {
    node(NodeKind::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

#[test]
fn leaves_have_no_children() {
    assert!(num(1).children().is_empty());
    assert!(ident("x").children().is_empty());
    assert!(node(NodeKind::Break).children().is_empty());
    assert!(node(NodeKind::Continue).children().is_empty());
}

#[test]
fn assignment_children_put_value_first() {
    let assign = node(NodeKind::Assign {
        target: Box::new(ident("x")),
        value: Box::new(num(3)),
        postfix: false,
    });
    let kinds: Vec<String> = assign.children().iter().map(|c| c.to_string()).collect();
    assert_eq!(kinds, vec!["3".to_string(), "x".to_string()]);
}

#[test]
fn for_children_follow_execution_order() {
    let for_loop = node(NodeKind::For {
        init: Some(Box::new(ident("init"))),
        cond: Some(Box::new(ident("cond"))),
        step: Some(Box::new(ident("step"))),
        body: Box::new(ident("body")),
    });
    let names: Vec<String> = for_loop.children().iter().map(|c| c.to_string()).collect();
    assert_eq!(names, vec!["init", "cond", "body", "step"]);
}

#[test]
fn display_inserts_only_needed_parens() {
    let sum = binary(BinaryOp::Add, num(2), num(3));
    let product = binary(BinaryOp::Mul, sum, num(4));
    assert_eq!(product.to_string(), "(2 + 3) * 4");

    let product = binary(BinaryOp::Mul, num(3), num(4));
    let sum = binary(BinaryOp::Add, num(2), product);
    assert_eq!(sum.to_string(), "2 + 3 * 4");

    let right = binary(BinaryOp::Sub, num(2), num(3));
    let nested = binary(BinaryOp::Sub, num(1), right);
    assert_eq!(nested.to_string(), "1 - (2 - 3)");
}

#[test]
fn display_postfix_step() {
    let inc = node(NodeKind::Assign {
        target: Box::new(ident("x")),
        value: Box::new(binary(BinaryOp::Add, ident("x"), num(1))),
        postfix: true,
    });
    assert_eq!(inc.to_string(), "x++");
    let compound = node(NodeKind::Assign {
        target: Box::new(ident("x")),
        value: Box::new(binary(BinaryOp::Add, ident("x"), num(3))),
        postfix: false,
    });
    assert_eq!(compound.to_string(), "x = x + 3");
}

#[test]
fn display_literals_and_collections() {
    let s = node(NodeKind::Literal(Literal::Str("a\"b".to_string())));
    assert_eq!(s.to_string(), r#""a\"b""#);
    assert_eq!(node(NodeKind::Map(Vec::new())).to_string(), "{:}");
    let map = node(NodeKind::Map(vec![(ident("k"), num(1))]));
    assert_eq!(map.to_string(), "{k: 1}");
    let arr = node(NodeKind::Array(vec![num(1), num(2)]));
    assert_eq!(arr.to_string(), "[1, 2]");
}

#[test]
fn display_lambda_and_if() {
    let lambda = node(NodeKind::Lambda(Arc::new(Lambda::new(
        vec!["a".to_string(), "b".to_string()],
        binary(BinaryOp::Add, ident("a"), ident("b")),
    ))));
    assert_eq!(lambda.to_string(), "(a, b) -> a + b");

    let branch = node(NodeKind::If {
        cond: Box::new(ident("c")),
        then_branch: Box::new(node(NodeKind::Block(vec![num(1)]))),
        else_branch: Some(Box::new(num(2))),
    });
    assert_eq!(branch.to_string(), "if (c) { 1; } else 2;");
}

#[test]
fn script_pragmas_are_reachable_from_lambda() {
    let script = node(NodeKind::Script {
        body: vec![num(1)],
        pragmas: vec![Pragma {
            key: "jexl.strict".to_string(),
            value: Literal::Bool(true),
        }],
    });
    let lambda = Lambda::new(Vec::new(), script);
    assert_eq!(lambda.pragmas().len(), 1);
    assert_eq!(lambda.body.to_string(), "#pragma jexl.strict true\n1;");
}
