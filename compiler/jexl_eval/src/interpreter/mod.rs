//! Tree-walking interpreter.
//!
//! # Architecture
//!
//! `eval` is the single recursive entry point. It counts depth against
//! [`Options::max_depth`], grows the native stack when needed and attaches
//! the node's span to errors that do not have one yet, so the innermost
//! failing node is reported. `eval_inner` dispatches exhaustively on
//! [`NodeKind`]; the arms live in the submodules:
//!
//! - `expr`: operators, literals, assignment and collection builders
//! - `access`: properties, indexing and method calls through the uberspect
//! - `call`: closure calls and constructors
//! - `control`: blocks, conditionals, loops and annotations
//!
//! Non-local exits travel as [`ControlAction`] in the error channel.

mod access;
mod call;
mod control;
mod expr;

use std::sync::Arc;

use jexl_ir::{Node, NodeKind};
use jexl_stack::{ensure_sufficient_stack, DepthCounter};
use jexl_value::errors::{self, EvalError, EvalErrorKind, EvalResult};
use jexl_value::{Arithmetic, Closure, ControlAction, SharedContext, Value};
use tracing::{debug, warn};

use crate::options::Options;
use crate::uberspect::Uberspect;

/// Result inside the evaluator: a value or a control signal.
pub(crate) type Flow = Result<Value, ControlAction>;

/// One evaluation's state. Cheap to create; engines build one per call.
pub struct Interpreter<'a> {
    arithmetic: &'a dyn Arithmetic,
    uberspect: &'a dyn Uberspect,
    options: Options,
    depth: DepthCounter,
}

impl<'a> Interpreter<'a> {
    pub fn new(arithmetic: &'a dyn Arithmetic, uberspect: &'a dyn Uberspect, options: Options) -> Self {
        Interpreter {
            arithmetic,
            uberspect,
            options,
            depth: DepthCounter::new(options.max_depth),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Evaluate a parsed expression or script body against `ctx`.
    pub fn interpret(&mut self, node: &Node, ctx: &SharedContext) -> EvalResult {
        let result = self.eval(node, ctx);
        self.finish(result)
    }

    /// Call a closure with `args` from outside any evaluation.
    pub fn call(&mut self, closure: &Closure, args: &[Value], ctx: &SharedContext) -> EvalResult {
        let result = self.call_closure(closure, args, ctx).map_err(ControlAction::from);
        self.finish(result)
    }

    /// Apply the top-level error policy.
    fn finish(&self, result: Flow) -> EvalResult {
        let err = match result {
            Ok(value) | Err(ControlAction::Return(value)) => return Ok(value),
            Err(action) => action.into_error(),
        };
        if err.kind == EvalErrorKind::Cancelled && !self.options.cancellable {
            debug!("evaluation cancelled");
            return Ok(Value::Nil);
        }
        if self.options.silent {
            warn!(error = %err, "silent evaluation discarded an error");
            return Ok(Value::Nil);
        }
        Err(err)
    }

    pub(crate) fn eval(&mut self, node: &Node, ctx: &SharedContext) -> Flow {
        if let Err(limit) = self.depth.enter() {
            return Err(errors::stack_overflow(limit).with_span(node.span).into());
        }
        let result = ensure_sufficient_stack(|| self.eval_inner(node, ctx));
        self.depth.exit();
        result.map_err(|action| match action {
            ControlAction::Error(err) => ControlAction::Error(err.with_span(node.span)),
            other => other,
        })
    }

    fn eval_inner(&mut self, node: &Node, ctx: &SharedContext) -> Flow {
        match &node.kind {
            NodeKind::Literal(lit) => Ok(expr::literal(lit)),
            NodeKind::Ident(name) => Ok(self.variable(name, ctx)?),
            NodeKind::Binary { op, left, right } => self.eval_binary(*op, left, right, ctx),
            NodeKind::Unary { op, operand } => self.eval_unary(*op, operand, ctx),
            NodeKind::Property { object, name } => self.eval_property(object, name, ctx),
            NodeKind::Index { object, index } => self.eval_index(object, index, ctx),
            NodeKind::MethodCall {
                object,
                method,
                args,
            } => self.eval_method_call(object, method, args, ctx),
            NodeKind::Call { callee, args } => self.eval_call(callee, args, ctx),
            NodeKind::New { class, args } => self.eval_new(class, args, ctx),
            NodeKind::Assign {
                target,
                value,
                postfix,
            } => self.eval_assign(target, value, *postfix, ctx),
            NodeKind::Ternary {
                cond,
                then_branch,
                else_branch,
            } => {
                let cond = self.eval(cond, ctx)?;
                if self.arithmetic.to_boolean(&cond) {
                    self.eval(then_branch, ctx)
                } else {
                    self.eval(else_branch, ctx)
                }
            }
            NodeKind::Elvis { left, right, .. } => {
                let left = self.eval_lenient(left, ctx)?;
                if left.is_nil() {
                    self.eval(right, ctx)
                } else {
                    Ok(left)
                }
            }
            NodeKind::Range { from, to } => self.eval_range(from, to, ctx),
            NodeKind::Array(items) => Ok(Value::array(self.eval_all(items, ctx)?)),
            NodeKind::Map(entries) => self.eval_map_literal(entries, ctx),
            NodeKind::Set(items) => self.eval_set_literal(items, ctx),
            NodeKind::Lambda(lambda) => Ok(Value::Function(Closure::new(
                Arc::clone(lambda),
                Some(Arc::clone(ctx)),
            ))),

            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => self.eval_if(cond, then_branch, else_branch.as_deref(), ctx),
            NodeKind::For {
                init,
                cond,
                step,
                body,
            } => self.eval_for(init.as_deref(), cond.as_deref(), step.as_deref(), body, ctx),
            NodeKind::Foreach {
                var,
                declared,
                iterable,
                body,
            } => self.eval_foreach(var, *declared, iterable, body, ctx),
            NodeKind::While { cond, body } => self.eval_while(cond, body, ctx),
            NodeKind::DoWhile { body, cond } => self.eval_do_while(body, cond, ctx),
            NodeKind::Block(statements) | NodeKind::Script { body: statements, .. } => {
                self.eval_block(statements, ctx)
            }
            NodeKind::Break => Err(ControlAction::Break),
            NodeKind::Continue => Err(ControlAction::Continue),
            NodeKind::Return(value) => {
                let value = match value {
                    Some(node) => self.eval(node, ctx)?,
                    None => Value::Nil,
                };
                Err(ControlAction::Return(value))
            }
            NodeKind::Var { name, init } => {
                let value = match init {
                    Some(node) => self.eval(node, ctx)?,
                    None => Value::Nil,
                };
                ctx.declare(name, value.clone())?;
                Ok(value)
            }
            NodeKind::Annotated {
                annotation,
                statement,
            } => self.eval_annotated(annotation, statement, ctx),
        }
    }

    fn eval_all(&mut self, nodes: &[Node], ctx: &SharedContext) -> Result<Vec<Value>, ControlAction> {
        nodes.iter().map(|node| self.eval(node, ctx)).collect()
    }

    /// Evaluate with unresolved names and nil navigation turned into nil.
    fn eval_lenient(&mut self, node: &Node, ctx: &SharedContext) -> Flow {
        let saved = self.options;
        self.options.strict = false;
        self.options.safe = true;
        let result = self.eval(node, ctx);
        self.options = saved;
        result
    }

    /// Run `f` with temporarily replaced options.
    fn with_options<R>(&mut self, options: Options, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = std::mem::replace(&mut self.options, options);
        let result = f(self);
        self.options = saved;
        result
    }

    fn variable(&self, name: &str, ctx: &SharedContext) -> EvalResult {
        match ctx.get(name) {
            Some(value) => Ok(value),
            None => self.unresolved(errors::undefined_variable(name)),
        }
    }

    /// Non-strict evaluation turns resolution failures into nil.
    fn unresolved(&self, err: EvalError) -> EvalResult {
        if !self.options.strict && err.kind.is_unresolved() {
            Ok(Value::Nil)
        } else {
            Err(err)
        }
    }

    /// Navigation through a nil base.
    fn nil_base(&self, member: &str) -> EvalResult {
        if self.options.safe {
            Ok(Value::Nil)
        } else {
            Err(errors::nil_access(member))
        }
    }

    fn check_cancelled(&self, ctx: &SharedContext) -> Result<(), EvalError> {
        if ctx.cancellation().is_some_and(|token| token.is_cancelled()) {
            debug!("cancellation observed");
            return Err(errors::cancelled());
        }
        Ok(())
    }
}
