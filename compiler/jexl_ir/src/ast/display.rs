//! Canonical source rendering of AST nodes.
//!
//! Used by diagnostics and the `parse` CLI command. Parentheses are emitted
//! only where binding power requires them, so the output re-parses to the
//! same tree. Desugared forms print in their expanded shape (`x += 1`
//! renders as `x = x + 1`), except postfix steps which print as `x++`.

use std::fmt::{self, Display, Formatter, Write};

use super::{Literal, Node, NodeKind};
use crate::operators::prec;
use crate::{BinaryOp, Pragma};

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_node(f, self, prec::ASSIGN)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Nil => f.write_str("null"),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Number(n) => write!(f, "{n}"),
            Literal::Str(s) => write_quoted(f, s),
        }
    }
}

impl Display for Pragma {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#pragma {} {}", self.key, self.value)
    }
}

fn write_quoted(f: &mut Formatter<'_>, s: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            '\r' => f.write_str("\\r")?,
            '\0' => f.write_str("\\0")?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

/// Binding power of the construct at the root of `node`.
fn binding_power(node: &Node) -> u8 {
    match &node.kind {
        NodeKind::Binary { op, .. } => op.precedence(),
        NodeKind::Range { .. } => prec::MATCH,
        NodeKind::Unary { .. } => prec::PREFIX,
        NodeKind::Ternary { .. } | NodeKind::Elvis { .. } => prec::CONDITIONAL,
        NodeKind::Assign { postfix: true, .. } => prec::POSTFIX,
        NodeKind::Assign { .. } | NodeKind::Lambda(_) => prec::ASSIGN,
        _ => prec::POSTFIX + 1,
    }
}

fn write_node(f: &mut Formatter<'_>, node: &Node, min: u8) -> fmt::Result {
    if binding_power(node) < min {
        f.write_char('(')?;
        write_bare(f, node)?;
        return f.write_char(')');
    }
    write_bare(f, node)
}

fn write_list(f: &mut Formatter<'_>, nodes: &[Node]) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_node(f, node, prec::ASSIGN)?;
    }
    Ok(())
}

fn write_statements(f: &mut Formatter<'_>, nodes: &[Node]) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            f.write_char(' ')?;
        }
        write_bare(f, node)?;
        if !matches!(node.kind, NodeKind::Block(_)) {
            f.write_char(';')?;
        }
    }
    Ok(())
}

fn write_bare(f: &mut Formatter<'_>, node: &Node) -> fmt::Result {
    match &node.kind {
        NodeKind::Literal(lit) => write!(f, "{lit}"),
        NodeKind::Ident(name) => f.write_str(name),
        NodeKind::Binary { op, left, right } => {
            let p = op.precedence();
            write_node(f, left, p)?;
            write!(f, " {op} ")?;
            write_node(f, right, p + 1)
        }
        NodeKind::Unary { op, operand } => {
            f.write_str(op.as_symbol())?;
            if op.is_word() {
                f.write_char(' ')?;
            }
            write_node(f, operand, prec::PREFIX + 1)
        }
        NodeKind::Property { object, name } => {
            write_node(f, object, prec::POSTFIX)?;
            write!(f, ".{name}")
        }
        NodeKind::Index { object, index } => {
            write_node(f, object, prec::POSTFIX)?;
            f.write_char('[')?;
            write_node(f, index, prec::ASSIGN)?;
            f.write_char(']')
        }
        NodeKind::MethodCall {
            object,
            method,
            args,
        } => {
            write_node(f, object, prec::POSTFIX)?;
            write!(f, ".{method}(")?;
            write_list(f, args)?;
            f.write_char(')')
        }
        NodeKind::Call { callee, args } => {
            write_node(f, callee, prec::POSTFIX)?;
            f.write_char('(')?;
            write_list(f, args)?;
            f.write_char(')')
        }
        NodeKind::New { class, args } => {
            f.write_str("new(")?;
            write_node(f, class, prec::ASSIGN)?;
            for arg in args {
                f.write_str(", ")?;
                write_node(f, arg, prec::ASSIGN)?;
            }
            f.write_char(')')
        }
        NodeKind::Assign {
            target,
            value,
            postfix,
        } => {
            if *postfix {
                if let NodeKind::Binary { op, .. } = &value.kind {
                    write_node(f, target, prec::POSTFIX)?;
                    return f.write_str(if *op == BinaryOp::Sub { "--" } else { "++" });
                }
            }
            write_node(f, target, prec::POSTFIX)?;
            f.write_str(" = ")?;
            write_node(f, value, prec::ASSIGN)
        }
        NodeKind::Ternary {
            cond,
            then_branch,
            else_branch,
        } => {
            write_node(f, cond, prec::CONDITIONAL + 1)?;
            f.write_str(" ? ")?;
            write_node(f, then_branch, prec::CONDITIONAL)?;
            f.write_str(" : ")?;
            write_node(f, else_branch, prec::CONDITIONAL)
        }
        NodeKind::Elvis {
            left,
            right,
            coalesce,
        } => {
            write_node(f, left, prec::CONDITIONAL + 1)?;
            f.write_str(if *coalesce { " ?? " } else { " ?: " })?;
            write_node(f, right, prec::CONDITIONAL)
        }
        NodeKind::Range { from, to } => {
            write_node(f, from, prec::MATCH)?;
            f.write_str(" .. ")?;
            write_node(f, to, prec::MATCH + 1)
        }
        NodeKind::Array(items) => {
            f.write_char('[')?;
            write_list(f, items)?;
            f.write_char(']')
        }
        NodeKind::Map(entries) => {
            if entries.is_empty() {
                return f.write_str("{:}");
            }
            f.write_char('{')?;
            for (i, (key, value)) in entries.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_node(f, key, prec::CONDITIONAL + 1)?;
                f.write_str(": ")?;
                write_node(f, value, prec::ASSIGN)?;
            }
            f.write_char('}')
        }
        NodeKind::Set(items) => {
            f.write_char('{')?;
            write_list(f, items)?;
            f.write_char('}')
        }
        NodeKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            f.write_str("if (")?;
            write_node(f, cond, prec::ASSIGN)?;
            f.write_str(") ")?;
            write_body(f, then_branch)?;
            if let Some(else_branch) = else_branch {
                f.write_str(" else ")?;
                write_body(f, else_branch)?;
            }
            Ok(())
        }
        NodeKind::For {
            init,
            cond,
            step,
            body,
        } => {
            f.write_str("for (")?;
            if let Some(init) = init {
                write_bare(f, init)?;
            }
            f.write_str("; ")?;
            if let Some(cond) = cond {
                write_node(f, cond, prec::ASSIGN)?;
            }
            f.write_str("; ")?;
            if let Some(step) = step {
                write_node(f, step, prec::ASSIGN)?;
            }
            f.write_str(") ")?;
            write_body(f, body)
        }
        NodeKind::Foreach {
            var,
            declared,
            iterable,
            body,
        } => {
            f.write_str("for (")?;
            if *declared {
                f.write_str("var ")?;
            }
            write!(f, "{var} : ")?;
            write_node(f, iterable, prec::ASSIGN)?;
            f.write_str(") ")?;
            write_body(f, body)
        }
        NodeKind::While { cond, body } => {
            f.write_str("while (")?;
            write_node(f, cond, prec::ASSIGN)?;
            f.write_str(") ")?;
            write_body(f, body)
        }
        NodeKind::DoWhile { body, cond } => {
            f.write_str("do ")?;
            write_body(f, body)?;
            f.write_str(" while (")?;
            write_node(f, cond, prec::ASSIGN)?;
            f.write_char(')')
        }
        NodeKind::Block(statements) => {
            if statements.is_empty() {
                return f.write_str("{ }");
            }
            f.write_str("{ ")?;
            write_statements(f, statements)?;
            f.write_str(" }")
        }
        NodeKind::Break => f.write_str("break"),
        NodeKind::Continue => f.write_str("continue"),
        NodeKind::Return(value) => {
            f.write_str("return")?;
            if let Some(value) = value {
                f.write_char(' ')?;
                write_node(f, value, prec::ASSIGN)?;
            }
            Ok(())
        }
        NodeKind::Var { name, init } => {
            write!(f, "var {name}")?;
            if let Some(init) = init {
                f.write_str(" = ")?;
                write_node(f, init, prec::ASSIGN)?;
            }
            Ok(())
        }
        NodeKind::Lambda(lambda) => {
            f.write_char('(')?;
            f.write_str(&lambda.params.join(", "))?;
            f.write_str(") -> ")?;
            if matches!(lambda.body.kind, NodeKind::Block(_)) {
                write_bare(f, &lambda.body)
            } else {
                write_node(f, &lambda.body, prec::ASSIGN)
            }
        }
        NodeKind::Annotated {
            annotation,
            statement,
        } => {
            write!(f, "@{}", annotation.name)?;
            if !annotation.args.is_empty() {
                f.write_char('(')?;
                write_list(f, &annotation.args)?;
                f.write_char(')')?;
            }
            f.write_char(' ')?;
            write_bare(f, statement)
        }
        NodeKind::Script { body, pragmas } => {
            for pragma in pragmas {
                writeln!(f, "{pragma}")?;
            }
            write_statements(f, body)
        }
    }
}

/// Loop and branch bodies: blocks print as-is, single statements get a
/// trailing `;` so a following `else`/`while` stays attached.
fn write_body(f: &mut Formatter<'_>, body: &Node) -> fmt::Result {
    write_bare(f, body)?;
    if matches!(body.kind, NodeKind::Block(_)) {
        Ok(())
    } else {
        f.write_char(';')
    }
}
