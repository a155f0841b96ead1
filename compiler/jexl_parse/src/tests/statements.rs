#![allow(clippy::unwrap_used, clippy::expect_used)]

use jexl_ir::{Features, Literal, Node, NodeKind, Number};
use pretty_assertions::assert_eq;

use crate::{parse_script, ErrorCode, ParseError};

fn script_with(source: &str, features: Features, params: &[&str]) -> Result<Node, ParseError> {
    let tokens = jexl_lexer::tokenize(source);
    let params: Vec<String> = params.iter().map(|p| (*p).to_string()).collect();
    parse_script(&tokens, features, &params)
}

fn body(source: &str) -> Vec<Node> {
    match script_with(source, Features::default(), &[]).unwrap().kind {
        NodeKind::Script { body, .. } => body,
        other => panic!("expected script, got {other:?}"),
    }
}

fn single(source: &str) -> Node {
    let mut statements = body(source);
    assert_eq!(statements.len(), 1, "{source}");
    statements.remove(0)
}

fn error_code(source: &str, features: Features) -> ErrorCode {
    script_with(source, features, &[]).unwrap_err().code
}

#[test]
fn statement_sequence() {
    let statements = body("var base = 1; var f = () -> { base }; base = 2; f()");
    assert_eq!(statements.len(), 4);
    assert!(matches!(statements[0].kind, NodeKind::Var { .. }));
    assert!(matches!(statements[3].kind, NodeKind::Call { .. }));
}

#[test]
fn empty_statements_are_dropped() {
    assert_eq!(body(";;1;;").len(), 1);
    assert!(body("").is_empty());
}

#[test]
fn separators_are_optional() {
    let statements = body("x = 1\ny = 2\nx + y");
    assert_eq!(statements.len(), 3);
    assert!(matches!(statements[2].kind, NodeKind::Binary { .. }));
    assert_eq!(body("a b").len(), 2);
    assert_eq!(body("var a = 1 return a").len(), 2);
    assert_eq!(body("if (a) { 1 } b").len(), 2);
    assert!(matches!(
        single("if (a) x else y").kind,
        NodeKind::If {
            else_branch: Some(_),
            ..
        }
    ));
}

#[test]
fn if_else() {
    match single("if (x > 1) { y = 1; } else { y = 2; }").kind {
        NodeKind::If {
            then_branch,
            else_branch,
            ..
        } => {
            assert!(matches!(then_branch.kind, NodeKind::Block(ref s) if s.len() == 1));
            assert!(else_branch.is_some());
        }
        other => panic!("expected if, got {other:?}"),
    }
    assert!(matches!(
        single("if (a) x; else y;").kind,
        NodeKind::If {
            else_branch: Some(_),
            ..
        }
    ));
    assert!(matches!(
        single("if (a) { x }; else { y }").kind,
        NodeKind::If {
            else_branch: Some(_),
            ..
        }
    ));
}

#[test]
fn dangling_else_binds_innermost() {
    match single("if (a) if (b) x; else y;").kind {
        NodeKind::If {
            then_branch,
            else_branch,
            ..
        } => {
            assert!(else_branch.is_none());
            assert!(matches!(
                then_branch.kind,
                NodeKind::If {
                    else_branch: Some(_),
                    ..
                }
            ));
        }
        other => panic!("expected if, got {other:?}"),
    }
}

#[test]
fn else_if_chain() {
    let node = single("if (a) 1; else if (b) 2; else 3;");
    let NodeKind::If {
        else_branch: Some(else_branch),
        ..
    } = node.kind
    else {
        panic!("expected if with else");
    };
    assert!(matches!(
        else_branch.kind,
        NodeKind::If {
            else_branch: Some(_),
            ..
        }
    ));
}

#[test]
fn c_style_for() {
    match single("for (var i = 0; i < 3; i++) { s += i; }").kind {
        NodeKind::For {
            init,
            cond,
            step,
            body,
        } => {
            assert!(matches!(init.unwrap().kind, NodeKind::Var { .. }));
            assert_eq!(cond.unwrap().to_string(), "i < 3");
            assert_eq!(step.unwrap().to_string(), "i++");
            assert!(matches!(body.kind, NodeKind::Block(_)));
        }
        other => panic!("expected for, got {other:?}"),
    }
    assert!(matches!(
        single("for (;;) break;").kind,
        NodeKind::For {
            init: None,
            cond: None,
            step: None,
            ..
        }
    ));
}

#[test]
fn foreach_forms() {
    match single("for (item : list) { if (item == 3) break; }").kind {
        NodeKind::Foreach { var, declared, .. } => {
            assert_eq!(var, "item");
            assert!(!declared);
        }
        other => panic!("expected foreach, got {other:?}"),
    }
    assert!(matches!(
        single("for (var x : 1 .. 3) s = s + x").kind,
        NodeKind::Foreach { declared: true, .. }
    ));
}

#[test]
fn while_and_do_while() {
    assert!(matches!(
        single("while (x < 10) x++").kind,
        NodeKind::While { .. }
    ));
    assert!(matches!(
        single("do x++; while (x < 3)").kind,
        NodeKind::DoWhile { .. }
    ));
    assert!(matches!(
        single("do { x++ } while (x < 3);").kind,
        NodeKind::DoWhile { .. }
    ));
}

#[test]
fn loop_control_outside_loop() {
    let features = Features::default();
    assert_eq!(error_code("break", features), ErrorCode::E1005);
    assert_eq!(error_code("if (a) continue;", features), ErrorCode::E1005);
    // A loop around a lambda does not cover the lambda body.
    assert_eq!(
        error_code("while (true) { var f = () -> { break; }; }", features),
        ErrorCode::E1005
    );
    assert!(script_with("while (true) { if (a) break; else continue; }", features, &[]).is_ok());
}

#[test]
fn return_statement() {
    assert!(matches!(single("return 1 + 2").kind, NodeKind::Return(Some(_))));
    assert!(matches!(single("return;").kind, NodeKind::Return(None)));
    assert!(matches!(
        single("() -> { return; }").kind,
        NodeKind::Lambda(_)
    ));
}

#[test]
fn redeclaration_with_lexical() {
    let lexical = Features::default() | Features::LEXICAL;
    assert!(script_with("var x = 1; var x = 2", Features::default(), &[]).is_ok());
    assert_eq!(error_code("var x = 1; var x = 2", lexical), ErrorCode::E1007);
    // Parameters live in the script root scope.
    let err = script_with("var a = 1", lexical, &["a"]).unwrap_err();
    assert_eq!(err.code, ErrorCode::E1007);
    // Sibling blocks are separate scopes.
    assert!(script_with("{ var y = 1; } { var y = 2; }", lexical, &[]).is_ok());
}

#[test]
fn shadowing_with_lexical_shade() {
    let shade = Features::default() | Features::LEXICAL_SHADE;
    assert_eq!(
        error_code("var x = 1; { var x = 2; }", shade),
        ErrorCode::E1008
    );
    assert_eq!(
        error_code("var x = 1; for (var x : list) {}", shade),
        ErrorCode::E1008
    );
    // A lambda starts a new function; its locals may reuse outer names.
    assert!(script_with("var x = 1; var f = () -> { var x = 2; x }", shade, &[]).is_ok());
    assert!(script_with("var x = 1; { var x = 2; }", Features::default(), &[]).is_ok());
}

#[test]
fn var_initializer_sees_outer_binding() {
    let lexical = Features::default() | Features::LEXICAL;
    // `x` on the right refers to whatever was visible before the declaration.
    assert!(script_with("var x = x + 1", lexical, &[]).is_ok());
}

#[test]
fn pragmas_are_collected() {
    let node = script_with(
        "#pragma jexl.strict true\n#pragma limit -3\n#pragma mode fast.path\nx",
        Features::default(),
        &[],
    )
    .unwrap();
    let NodeKind::Script { body, pragmas } = node.kind else {
        panic!("expected script");
    };
    assert_eq!(body.len(), 1);
    assert_eq!(pragmas.len(), 3);
    assert_eq!(pragmas[0].key, "jexl.strict");
    assert_eq!(pragmas[0].value, Literal::Bool(true));
    assert_eq!(pragmas[1].value, Literal::Number(Number::from(-3)));
    assert_eq!(pragmas[2].value, Literal::Str("fast.path".to_string()));
}

#[test]
fn malformed_pragmas() {
    let features = Features::default();
    assert_eq!(error_code("#include foo", features), ErrorCode::E1010);
    assert_eq!(error_code("#pragma key [1]", features), ErrorCode::E1010);
    assert_eq!(
        error_code("#pragma a 1", features - Features::PRAGMA),
        ErrorCode::E1004
    );
}

#[test]
fn annotations_wrap_statements() {
    match single("@silent x.y.z").kind {
        NodeKind::Annotated {
            annotation,
            statement,
        } => {
            assert_eq!(annotation.name, "silent");
            assert!(annotation.args.is_empty());
            assert_eq!(statement.to_string(), "x.y.z");
        }
        other => panic!("expected annotation, got {other:?}"),
    }
    match single("@limit(3) { a; b }").kind {
        NodeKind::Annotated { annotation, .. } => assert_eq!(annotation.args.len(), 1),
        other => panic!("expected annotation, got {other:?}"),
    }
    assert_eq!(
        error_code("@silent x", Features::default() - Features::ANNOTATION),
        ErrorCode::E1004
    );
}

#[test]
fn disabled_statement_features() {
    let all = Features::default();
    assert_eq!(error_code("while (a) x", all - Features::LOOPS), ErrorCode::E1004);
    assert_eq!(error_code("for (x : l) x", all - Features::LOOPS), ErrorCode::E1004);
    assert_eq!(error_code("var x = 1", all - Features::LOCAL_VAR), ErrorCode::E1004);
}

#[test]
fn expression_only_without_script_feature() {
    let features = Features::default() - Features::SCRIPT;
    let node = script_with("1 + 2;", features, &[]).unwrap();
    assert!(matches!(node.kind, NodeKind::Script { ref body, .. } if body.len() == 1));
    assert_eq!(error_code("1; 2", features), ErrorCode::E1009);
}

#[test]
fn script_renders_back_to_source() {
    let node = script_with("x += 1; { y }", Features::default(), &[]).unwrap();
    assert_eq!(node.to_string(), "x = x + 1; { y; }");
}
