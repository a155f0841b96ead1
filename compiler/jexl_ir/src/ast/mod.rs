//! AST node set.
//!
//! The tree is immutable once the parser returns it. Every node owns its
//! children; lambda definitions sit behind an `Arc` so closures created at
//! run time share the body instead of copying it.
//!
//! Compound assignments and increments do not have node kinds of their own.
//! The parser desugars `x += e` to `Assign { x, Binary(+, x, e) }` and
//! `x++` to the same shape with `postfix: true`.

mod display;

use std::sync::Arc;

use crate::{BinaryOp, Number, Span, UnaryOp};

/// A literal value written in source.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Literal {
    Nil,
    Bool(bool),
    Number(Number),
    Str(String),
}

/// An AST node with its source span.
#[derive(Clone, PartialEq, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

/// Lambda definition: parameter names plus body.
///
/// A top-level script is also a lambda whose body is a
/// [`NodeKind::Script`] and whose parameters are the script parameters.
#[derive(Clone, PartialEq, Debug)]
pub struct Lambda {
    pub params: Vec<String>,
    pub body: Node,
}

/// `@name` or `@name(args)` in front of a statement.
#[derive(Clone, PartialEq, Debug)]
pub struct Annotation {
    pub name: String,
    pub args: Vec<Node>,
}

/// `#pragma key value`, collected on the script root.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Pragma {
    pub key: String,
    pub value: Literal,
}

#[derive(Clone, PartialEq, Debug)]
pub enum NodeKind {
    Literal(Literal),
    Ident(String),
    Binary {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Node>,
    },
    /// `object.name`
    Property {
        object: Box<Node>,
        name: String,
    },
    /// `object[index]`
    Index {
        object: Box<Node>,
        index: Box<Node>,
    },
    /// `object.method(args)`
    MethodCall {
        object: Box<Node>,
        method: String,
        args: Vec<Node>,
    },
    /// `callee(args)` where the callee evaluates to a closure.
    Call {
        callee: Box<Node>,
        args: Vec<Node>,
    },
    /// `new(class, args...)`
    New {
        class: Box<Node>,
        args: Vec<Node>,
    },
    /// `target = value`; `postfix` marks a desugared `x++`/`x--`, which
    /// yields the value held before the assignment.
    Assign {
        target: Box<Node>,
        value: Box<Node>,
        postfix: bool,
    },
    Ternary {
        cond: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Box<Node>,
    },
    /// `left ?: right` or `left ?? right`. Both fall back only on nil.
    Elvis {
        left: Box<Node>,
        right: Box<Node>,
        coalesce: bool,
    },
    Range {
        from: Box<Node>,
        to: Box<Node>,
    },
    Array(Vec<Node>),
    Map(Vec<(Node, Node)>),
    Set(Vec<Node>),

    // Statements
    If {
        cond: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Option<Box<Node>>,
    },
    For {
        init: Option<Box<Node>>,
        cond: Option<Box<Node>>,
        step: Option<Box<Node>>,
        body: Box<Node>,
    },
    /// `for ([var] var : iterable) body`
    Foreach {
        var: String,
        declared: bool,
        iterable: Box<Node>,
        body: Box<Node>,
    },
    While {
        cond: Box<Node>,
        body: Box<Node>,
    },
    DoWhile {
        body: Box<Node>,
        cond: Box<Node>,
    },
    Block(Vec<Node>),
    Break,
    Continue,
    Return(Option<Box<Node>>),
    Var {
        name: String,
        init: Option<Box<Node>>,
    },
    Lambda(Arc<Lambda>),
    Annotated {
        annotation: Annotation,
        statement: Box<Node>,
    },
    Script {
        body: Vec<Node>,
        pragmas: Vec<Pragma>,
    },
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Node { kind, span }
    }

    /// Owned sub-nodes in evaluation order.
    pub fn children(&self) -> Vec<&Node> {
        match &self.kind {
            NodeKind::Literal(_)
            | NodeKind::Ident(_)
            | NodeKind::Break
            | NodeKind::Continue => Vec::new(),
            NodeKind::Binary { left, right, .. } => vec![&**left, &**right],
            NodeKind::Unary { operand, .. } => vec![&**operand],
            NodeKind::Property { object, .. } => vec![&**object],
            NodeKind::Index { object, index } => vec![&**object, &**index],
            NodeKind::MethodCall { object, args, .. } => {
                std::iter::once(&**object).chain(args.iter()).collect()
            }
            NodeKind::Call { callee, args } => {
                std::iter::once(&**callee).chain(args.iter()).collect()
            }
            NodeKind::New { class, args } => std::iter::once(&**class).chain(args.iter()).collect(),
            NodeKind::Assign { target, value, .. } => vec![&**value, &**target],
            NodeKind::Ternary {
                cond,
                then_branch,
                else_branch,
            } => vec![&**cond, &**then_branch, &**else_branch],
            NodeKind::Elvis { left, right, .. } => vec![&**left, &**right],
            NodeKind::Range { from, to } => vec![&**from, &**to],
            NodeKind::Array(items) | NodeKind::Set(items) | NodeKind::Block(items) => {
                items.iter().collect()
            }
            NodeKind::Map(entries) => entries.iter().flat_map(|(k, v)| [k, v]).collect(),
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let mut out: Vec<&Node> = vec![&**cond, &**then_branch];
                out.extend(else_branch.as_deref());
                out
            }
            NodeKind::For {
                init,
                cond,
                step,
                body,
            } => {
                let mut out: Vec<&Node> = Vec::with_capacity(4);
                out.extend(init.as_deref());
                out.extend(cond.as_deref());
                out.push(&**body);
                out.extend(step.as_deref());
                out
            }
            NodeKind::Foreach { iterable, body, .. } => vec![&**iterable, &**body],
            NodeKind::While { cond, body } => vec![&**cond, &**body],
            NodeKind::DoWhile { body, cond } => vec![&**body, &**cond],
            NodeKind::Return(value) => value.as_deref().into_iter().collect(),
            NodeKind::Var { init, .. } => init.as_deref().into_iter().collect(),
            NodeKind::Lambda(lambda) => vec![&lambda.body],
            NodeKind::Annotated {
                annotation,
                statement,
            } => annotation
                .args
                .iter()
                .chain(std::iter::once(&**statement))
                .collect(),
            NodeKind::Script { body, .. } => body.iter().collect(),
        }
    }

    /// Whether this node is a statement form rather than an expression.
    pub fn is_statement(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::If { .. }
                | NodeKind::For { .. }
                | NodeKind::Foreach { .. }
                | NodeKind::While { .. }
                | NodeKind::DoWhile { .. }
                | NodeKind::Block(_)
                | NodeKind::Break
                | NodeKind::Continue
                | NodeKind::Return(_)
                | NodeKind::Var { .. }
                | NodeKind::Annotated { .. }
                | NodeKind::Script { .. }
        )
    }

    /// Whether this node may appear on the left of an assignment.
    pub fn is_assignable(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Ident(_) | NodeKind::Property { .. } | NodeKind::Index { .. }
        )
    }
}

impl Lambda {
    pub fn new(params: Vec<String>, body: Node) -> Self {
        Lambda { params, body }
    }

    /// Pragmas declared on a script root; empty for ordinary lambdas.
    pub fn pragmas(&self) -> &[Pragma] {
        match &self.body.kind {
            NodeKind::Script { pragmas, .. } => pragmas,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests;
