//! Closure calls and constructors.

use std::sync::Arc;

use jexl_ir::Node;
use jexl_value::errors::{self, EvalResult};
use jexl_value::{Closure, ControlAction, SharedContext, Value};
use tracing::trace;

use super::{Flow, Interpreter};
use crate::frame::FrameContext;

impl Interpreter<'_> {
    pub(super) fn eval_call(&mut self, callee: &Node, args: &[Node], ctx: &SharedContext) -> Flow {
        let function = self.eval(callee, ctx)?;
        let args = self.eval_all(args, ctx)?;
        match function {
            Value::Function(closure) => Ok(self.call_closure(&closure, &args, ctx)?),
            Value::Nil if !self.options.strict => Ok(Value::Nil),
            other => Err(errors::not_callable(&other).into()),
        }
    }

    /// Run a closure in a fresh frame over the caller's context.
    pub(super) fn call_closure(
        &mut self,
        closure: &Closure,
        args: &[Value],
        ctx: &SharedContext,
    ) -> EvalResult {
        self.check_cancelled(ctx)?;
        trace!(
            params = closure.params().len(),
            bound = closure.bound().len(),
            args = args.len(),
            "closure call"
        );
        let frame = FrameContext::new(Arc::clone(ctx), closure.captured().cloned())
            .with_bindings(closure.bind_arguments(args));
        let frame: SharedContext = Arc::new(frame);
        match self.eval(&closure.lambda().body, &frame) {
            Ok(value) | Err(ControlAction::Return(value)) => Ok(value),
            Err(action) => Err(action.into_error()),
        }
    }

    pub(super) fn eval_new(&mut self, class: &Node, args: &[Node], ctx: &SharedContext) -> Flow {
        let class = self.eval(class, ctx)?;
        let args = self.eval_all(args, ctx)?;
        let name = class.to_plain_string();
        trace!(class = %name, args = args.len(), "constructor call");
        let constructor = self.uberspect.get_constructor(&name, &args)?;
        Ok(constructor.invoke(&Value::Nil, &args)?)
    }
}
