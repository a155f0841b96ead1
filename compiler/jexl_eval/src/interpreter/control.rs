//! Blocks, conditionals, loops and statement annotations.
//!
//! Loops evaluate to the value of the last body run that completed
//! normally, or nil. The cancellation token is polled before every
//! iteration and every block statement.

use jexl_ir::{Annotation, Node};
use jexl_value::errors::EvalErrorKind;
use jexl_value::{ControlAction, SharedContext, Value};
use tracing::{debug, trace};

use super::{Flow, Interpreter};

/// What a loop does after one body run.
enum Next {
    Continue,
    Stop,
}

impl Interpreter<'_> {
    pub(super) fn eval_block(&mut self, statements: &[Node], ctx: &SharedContext) -> Flow {
        let mut last = Value::Nil;
        for statement in statements {
            self.check_cancelled(ctx)?;
            last = self.eval(statement, ctx)?;
        }
        Ok(last)
    }

    pub(super) fn eval_if(
        &mut self,
        cond: &Node,
        then_branch: &Node,
        else_branch: Option<&Node>,
        ctx: &SharedContext,
    ) -> Flow {
        let cond = self.eval(cond, ctx)?;
        if self.arithmetic.to_boolean(&cond) {
            self.eval(then_branch, ctx)
        } else if let Some(else_branch) = else_branch {
            self.eval(else_branch, ctx)
        } else {
            Ok(Value::Nil)
        }
    }

    /// Run the body once, folding `break`/`continue` into loop control.
    fn run_body(&mut self, body: &Node, ctx: &SharedContext, last: &mut Value) -> Result<Next, ControlAction> {
        match self.eval(body, ctx) {
            Ok(value) => {
                *last = value;
                Ok(Next::Continue)
            }
            Err(ControlAction::Break) => {
                trace!("break");
                Ok(Next::Stop)
            }
            Err(ControlAction::Continue) => {
                trace!("continue");
                Ok(Next::Continue)
            }
            Err(other) => Err(other),
        }
    }

    fn condition(&mut self, cond: &Node, ctx: &SharedContext) -> Result<bool, ControlAction> {
        let value = self.eval(cond, ctx)?;
        Ok(self.arithmetic.to_boolean(&value))
    }

    /// C-style `for`. A missing condition loops until `break`; `continue`
    /// still runs the step.
    pub(super) fn eval_for(
        &mut self,
        init: Option<&Node>,
        cond: Option<&Node>,
        step: Option<&Node>,
        body: &Node,
        ctx: &SharedContext,
    ) -> Flow {
        if let Some(init) = init {
            self.eval(init, ctx)?;
        }
        let mut last = Value::Nil;
        loop {
            self.check_cancelled(ctx)?;
            if let Some(cond) = cond {
                if !self.condition(cond, ctx)? {
                    break;
                }
            }
            if let Next::Stop = self.run_body(body, ctx, &mut last)? {
                break;
            }
            if let Some(step) = step {
                self.eval(step, ctx)?;
            }
        }
        Ok(last)
    }

    /// `for (x : items)`. The items are collected before the first
    /// iteration, so the body may mutate the source collection.
    pub(super) fn eval_foreach(
        &mut self,
        var: &str,
        declared: bool,
        iterable: &Node,
        body: &Node,
        ctx: &SharedContext,
    ) -> Flow {
        let items = match self.eval(iterable, ctx)? {
            Value::Nil => Vec::new(),
            Value::Array(items) => items.read().clone(),
            Value::Map(entries) => entries.read().values().cloned().collect(),
            Value::Str(s) => s.chars().map(|c| Value::string(c.to_string())).collect(),
            other => vec![other],
        };
        let mut last = Value::Nil;
        for item in items {
            self.check_cancelled(ctx)?;
            if declared {
                ctx.declare(var, item)?;
            } else {
                ctx.set(var, item)?;
            }
            if let Next::Stop = self.run_body(body, ctx, &mut last)? {
                break;
            }
        }
        Ok(last)
    }

    pub(super) fn eval_while(&mut self, cond: &Node, body: &Node, ctx: &SharedContext) -> Flow {
        let mut last = Value::Nil;
        loop {
            self.check_cancelled(ctx)?;
            if !self.condition(cond, ctx)? {
                break;
            }
            if let Next::Stop = self.run_body(body, ctx, &mut last)? {
                break;
            }
        }
        Ok(last)
    }

    /// `do body while (cond)`; `continue` still tests the condition.
    pub(super) fn eval_do_while(&mut self, body: &Node, cond: &Node, ctx: &SharedContext) -> Flow {
        let mut last = Value::Nil;
        loop {
            self.check_cancelled(ctx)?;
            if let Next::Stop = self.run_body(body, ctx, &mut last)? {
                break;
            }
            if !self.condition(cond, ctx)? {
                break;
            }
        }
        Ok(last)
    }

    /// `@silent`, `@strict[(flag)]`, `@lenient` and `@safe[(flag)]` scope
    /// an option change to one statement. Other annotations are ignored.
    pub(super) fn eval_annotated(
        &mut self,
        annotation: &Annotation,
        statement: &Node,
        ctx: &SharedContext,
    ) -> Flow {
        let flag = match annotation.args.first() {
            Some(arg) => {
                let value = self.eval(arg, ctx)?;
                self.arithmetic.to_boolean(&value)
            }
            None => true,
        };
        let mut options = self.options;
        match annotation.name.as_str() {
            "silent" => {
                return match self.eval(statement, ctx) {
                    Err(ControlAction::Error(err)) if err.kind != EvalErrorKind::Cancelled => {
                        debug!(error = %err, "@silent discarded an error");
                        Ok(Value::Nil)
                    }
                    other => other,
                };
            }
            "strict" => options.strict = flag,
            "lenient" => options.strict = false,
            "safe" => options.safe = flag,
            other => {
                trace!(annotation = other, "ignoring unknown annotation");
                return self.eval(statement, ctx);
            }
        }
        self.with_options(options, |this| this.eval(statement, ctx))
    }
}
