//! Expression parsing: precedence, associativity, desugaring, literals.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use jexl_ir::{BinaryOp, Features, Literal, Node, NodeKind, UnaryOp};
use pretty_assertions::assert_eq;

use crate::{parse_expression, ErrorCode, ParseError};

fn parse(source: &str) -> Node {
    parse_with(source, Features::default()).unwrap()
}

fn parse_with(source: &str, features: Features) -> Result<Node, ParseError> {
    let tokens = jexl_lexer::tokenize(source);
    parse_expression(&tokens, features)
}

fn error_code(source: &str, features: Features) -> ErrorCode {
    parse_with(source, features).unwrap_err().code
}

fn binary_parts(node: &Node) -> (BinaryOp, &Node, &Node) {
    match &node.kind {
        NodeKind::Binary { op, left, right } => (*op, left, right),
        other => panic!("expected binary node, got {other:?}"),
    }
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    let node = parse("2 + 3 * 4");
    let (op, left, right) = binary_parts(&node);
    assert_eq!(op, BinaryOp::Add);
    assert_eq!(left.to_string(), "2");
    assert_eq!(binary_parts(right).0, BinaryOp::Mul);
}

#[test]
fn grouping_overrides_precedence() {
    let node = parse("(2 + 3) * 4");
    let (op, left, _) = binary_parts(&node);
    assert_eq!(op, BinaryOp::Mul);
    assert_eq!(binary_parts(left).0, BinaryOp::Add);
    assert_eq!(node.to_string(), "(2 + 3) * 4");
}

#[test]
fn shift_binds_tighter_than_addition() {
    // (40 + (2 << 1)) + 1
    let node = parse("40 + 2 << 1 + 1");
    let (op, left, right) = binary_parts(&node);
    assert_eq!(op, BinaryOp::Add);
    assert_eq!(right.to_string(), "1");
    let (inner_op, forty, shift) = binary_parts(left);
    assert_eq!(inner_op, BinaryOp::Add);
    assert_eq!(forty.to_string(), "40");
    assert_eq!(binary_parts(shift).0, BinaryOp::Shl);
}

#[test]
fn binary_operators_are_left_associative() {
    let node = parse("10 - 4 - 3");
    let (_, left, right) = binary_parts(&node);
    assert_eq!(left.to_string(), "10 - 4");
    assert_eq!(right.to_string(), "3");
}

#[test]
fn logical_precedence() {
    let node = parse("a || b && c");
    let (op, _, right) = binary_parts(&node);
    assert_eq!(op, BinaryOp::Or);
    assert_eq!(binary_parts(right).0, BinaryOp::And);

    let node = parse("a and b or not c");
    assert_eq!(binary_parts(&node).0, BinaryOp::Or);
}

#[test]
fn bitwise_levels() {
    // a | (b ^ (c & d))
    let node = parse("a | b ^ c & d");
    let (op, _, right) = binary_parts(&node);
    assert_eq!(op, BinaryOp::BitOr);
    let (op, _, right) = binary_parts(right);
    assert_eq!(op, BinaryOp::BitXor);
    assert_eq!(binary_parts(right).0, BinaryOp::BitAnd);
}

#[test]
fn comparison_sits_between_match_and_additive() {
    let node = parse("a + 1 < b == c");
    let (op, left, _) = binary_parts(&node);
    assert_eq!(op, BinaryOp::Eq);
    assert_eq!(binary_parts(left).0, BinaryOp::Lt);

    let node = parse("x =~ [1, 2] && y !$ 'z'");
    let (op, left, right) = binary_parts(&node);
    assert_eq!(op, BinaryOp::And);
    assert_eq!(binary_parts(left).0, BinaryOp::Match);
    assert_eq!(binary_parts(right).0, BinaryOp::NotEndsWith);
}

#[test]
fn range_is_its_own_node() {
    let node = parse("1 .. n + 1");
    match &node.kind {
        NodeKind::Range { from, to } => {
            assert_eq!(from.to_string(), "1");
            assert_eq!(to.to_string(), "n + 1");
        }
        other => panic!("expected range, got {other:?}"),
    }
}

#[test]
fn prefix_operators_chain() {
    let node = parse("- -x");
    match &node.kind {
        NodeKind::Unary {
            op: UnaryOp::Neg,
            operand,
        } => assert!(matches!(
            operand.kind,
            NodeKind::Unary {
                op: UnaryOp::Neg,
                ..
            }
        )),
        other => panic!("expected negation, got {other:?}"),
    }
    assert!(matches!(
        parse("!empty x").kind,
        NodeKind::Unary {
            op: UnaryOp::Not,
            ..
        }
    ));
    assert!(matches!(
        parse("size(list)").kind,
        NodeKind::Unary {
            op: UnaryOp::Size,
            ..
        }
    ));
}

#[test]
fn prefix_binds_looser_than_member_access() {
    let node = parse("-a.b");
    match &node.kind {
        NodeKind::Unary { operand, .. } => {
            assert!(matches!(operand.kind, NodeKind::Property { .. }));
        }
        other => panic!("expected unary, got {other:?}"),
    }
}

#[test]
fn compound_assignment_desugars() {
    let node = parse("x += 3");
    match &node.kind {
        NodeKind::Assign { value, postfix, .. } => {
            assert!(!postfix);
            assert_eq!(binary_parts(value).0, BinaryOp::Add);
        }
        other => panic!("expected assignment, got {other:?}"),
    }
    assert_eq!(node.to_string(), "x = x + 3");
    assert_eq!(parse("x >>>= 1").to_string(), "x = x >>> 1");
}

#[test]
fn assignment_is_right_associative() {
    let node = parse("a = b = 1");
    match &node.kind {
        NodeKind::Assign { target, value, .. } => {
            assert_eq!(target.to_string(), "a");
            assert!(matches!(value.kind, NodeKind::Assign { .. }));
        }
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn increments_carry_explicit_postfix_tag() {
    let post = parse("x++");
    assert!(matches!(post.kind, NodeKind::Assign { postfix: true, .. }));
    assert_eq!(post.to_string(), "x++");

    let pre = parse("++x");
    assert!(matches!(pre.kind, NodeKind::Assign { postfix: false, .. }));

    let dec = parse("a.b--");
    match &dec.kind {
        NodeKind::Assign {
            target,
            value,
            postfix: true,
        } => {
            assert_eq!(target.to_string(), "a.b");
            assert_eq!(binary_parts(value).0, BinaryOp::Sub);
        }
        other => panic!("expected postfix decrement, got {other:?}"),
    }
}

#[test]
fn conditional_forms() {
    let node = parse("a ? b : c ? d : e");
    match &node.kind {
        NodeKind::Ternary { else_branch, .. } => {
            assert!(matches!(else_branch.kind, NodeKind::Ternary { .. }));
        }
        other => panic!("expected ternary, got {other:?}"),
    }
    assert!(matches!(
        parse("a ?: b").kind,
        NodeKind::Elvis {
            coalesce: false,
            ..
        }
    ));
    match parse("a ?? b ?? c").kind {
        NodeKind::Elvis {
            coalesce: true,
            left,
            right,
        } => {
            assert_eq!(left.to_string(), "a");
            assert!(matches!(right.kind, NodeKind::Elvis { .. }));
        }
        other => panic!("expected coalesce, got {other:?}"),
    }
}

#[test]
fn lambdas_and_groupings() {
    for (source, params) in [
        ("(a, b) -> a + b", 2),
        ("() -> 1", 0),
        ("x -> x * 2", 1),
        ("(x) => { x }", 1),
    ] {
        match parse(source).kind {
            NodeKind::Lambda(lambda) => assert_eq!(lambda.params.len(), params, "{source}"),
            other => panic!("expected lambda for {source}, got {other:?}"),
        }
    }
    // A parenthesized identifier without an arrow stays a grouping.
    assert!(matches!(parse("(a)").kind, NodeKind::Ident(_)));
    assert!(matches!(parse("(a) + (b)").kind, NodeKind::Binary { .. }));
}

#[test]
fn calls_and_member_chains() {
    let node = parse("a.b.c(1)[0]");
    assert_eq!(node.to_string(), "a.b.c(1)[0]");
    assert!(matches!(node.kind, NodeKind::Index { .. }));

    let node = parse("f(1, 2)(3)");
    match &node.kind {
        NodeKind::Call { callee, args } => {
            assert_eq!(args.len(), 1);
            assert!(matches!(callee.kind, NodeKind::Call { .. }));
        }
        other => panic!("expected call, got {other:?}"),
    }

    // Keywords are valid member names.
    assert!(matches!(
        parse("list.size()").kind,
        NodeKind::MethodCall { ref method, .. } if method == "size"
    ));
}

#[test]
fn constructor_call() {
    match parse("new('Point', 1, 2)").kind {
        NodeKind::New { class, args } => {
            assert_eq!(class.to_string(), "\"Point\"");
            assert_eq!(args.len(), 2);
        }
        other => panic!("expected new, got {other:?}"),
    }
}

#[test]
fn collection_literals() {
    assert!(matches!(parse("{}").kind, NodeKind::Map(ref e) if e.is_empty()));
    assert!(matches!(parse("{:}").kind, NodeKind::Map(ref e) if e.is_empty()));
    assert!(matches!(parse("{'a': 1, 'b': 2}").kind, NodeKind::Map(ref e) if e.len() == 2));
    assert!(matches!(parse("{1, 2, 2}").kind, NodeKind::Set(ref s) if s.len() == 3));
    assert!(matches!(parse("{1}").kind, NodeKind::Set(ref s) if s.len() == 1));
    assert!(matches!(parse("[1, 2,]").kind, NodeKind::Array(ref a) if a.len() == 2));
    assert!(matches!(parse("[]").kind, NodeKind::Array(ref a) if a.is_empty()));
}

#[test]
fn literals() {
    assert_eq!(parse("null").kind, NodeKind::Literal(Literal::Nil));
    assert_eq!(parse("nil").kind, NodeKind::Literal(Literal::Nil));
    assert_eq!(parse("true").kind, NodeKind::Literal(Literal::Bool(true)));
    assert_eq!(
        parse("'hi'").kind,
        NodeKind::Literal(Literal::Str("hi".to_string()))
    );
}

#[test]
fn syntax_errors() {
    let features = Features::default();
    assert_eq!(error_code("1 +", features), ErrorCode::E1002);
    assert_eq!(error_code("a b", features), ErrorCode::E1009);
    assert_eq!(error_code("\"open", features), ErrorCode::E1003);
    assert_eq!(error_code("1 = 2", features), ErrorCode::E1006);
    assert_eq!(error_code("(a, b) -> ", features), ErrorCode::E1002);
    assert_eq!(error_code("(a, a) -> a", features), ErrorCode::E1011);
    assert_eq!(error_code("[1, 2", features), ErrorCode::E1001);
}

#[test]
fn error_spans_point_at_the_offender() {
    let err = parse_with("1 + )", Features::default()).unwrap_err();
    assert_eq!(err.span.start, 4);
    assert_eq!(err.message, "expected expression, found ')'");
}

#[test]
fn disabled_features_are_rejected() {
    let all = Features::default();
    let cases = [
        ("x = 1", Features::SIDE_EFFECT),
        ("x++", Features::SIDE_EFFECT),
        ("x -> x", Features::LAMBDA),
        ("a.b()", Features::METHOD_CALL),
        ("new('A')", Features::NEW_INSTANCE),
        ("[1]", Features::STRUCTURED_LITERAL),
        ("a eq b", Features::COMPARATOR_NAMES),
        ("not a", Features::COMPARATOR_NAMES),
    ];
    for (source, feature) in cases {
        assert!(parse_with(source, all).is_ok(), "{source} should parse");
        let err = parse_with(source, all - feature).unwrap_err();
        assert_eq!(err.code, ErrorCode::E1004, "{source}");
    }
    // Symbolic spellings stay available without comparator names.
    assert!(parse_with("a == b && !c", all - Features::COMPARATOR_NAMES).is_ok());
}
