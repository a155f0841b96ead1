//! Operators, literals and collection builders.

use indexmap::IndexMap;
use jexl_ir::{BinaryOp, Literal, Node, NodeKind, Number, UnaryOp};
use jexl_value::errors::{self, EvalErrorKind, EvalResult};
use jexl_value::{SharedContext, Value};

use super::{Flow, Interpreter};

pub(super) fn literal(lit: &Literal) -> Value {
    match lit {
        Literal::Nil => Value::Nil,
        Literal::Bool(b) => Value::Bool(*b),
        Literal::Number(n) => Value::Number(n.clone()),
        Literal::Str(s) => Value::from(s.as_str()),
    }
}

impl Interpreter<'_> {
    pub(super) fn eval_binary(
        &mut self,
        op: BinaryOp,
        left: &Node,
        right: &Node,
        ctx: &SharedContext,
    ) -> Flow {
        if op.is_short_circuit() {
            let l = self.eval(left, ctx)?;
            let l = self.arithmetic.to_boolean(&l);
            let decided = match op {
                BinaryOp::And => !l,
                _ => l,
            };
            if decided {
                return Ok(Value::Bool(l));
            }
            let r = self.eval(right, ctx)?;
            return Ok(Value::Bool(self.arithmetic.to_boolean(&r)));
        }
        if op == BinaryOp::Range {
            return self.eval_range(left, right, ctx);
        }
        let l = self.eval(left, ctx)?;
        let r = self.eval(right, ctx)?;
        Ok(self.apply_binary(op, &l, &r)?)
    }

    /// A strict binary operator on evaluated operands.
    pub(super) fn apply_binary(&self, op: BinaryOp, l: &Value, r: &Value) -> EvalResult {
        let a = self.arithmetic;
        match op {
            BinaryOp::Add => a.add(l, r),
            BinaryOp::Sub => a.subtract(l, r),
            BinaryOp::Mul => a.multiply(l, r),
            BinaryOp::Div => a.divide(l, r),
            BinaryOp::Mod => a.modulo(l, r),
            BinaryOp::Eq => Ok(Value::Bool(a.equals(l, r))),
            BinaryOp::NotEq => Ok(Value::Bool(!a.equals(l, r))),
            BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
                self.relational(op, l, r)
            }
            BinaryOp::And => Ok(Value::Bool(a.to_boolean(l) && a.to_boolean(r))),
            BinaryOp::Or => Ok(Value::Bool(a.to_boolean(l) || a.to_boolean(r))),
            BinaryOp::BitAnd => a.bit_and(l, r),
            BinaryOp::BitOr => a.bit_or(l, r),
            BinaryOp::BitXor => a.bit_xor(l, r),
            BinaryOp::Shl => a.shift_left(l, r),
            BinaryOp::Shr => a.shift_right(l, r),
            BinaryOp::Ushr => a.shift_right_unsigned(l, r),
            // `x =~ c` asks whether `x` matches or belongs to `c`.
            BinaryOp::Match => Ok(Value::Bool(a.contains(r, l)?)),
            BinaryOp::NotMatch => Ok(Value::Bool(!a.contains(r, l)?)),
            BinaryOp::StartsWith => Ok(Value::Bool(a.starts_with(l, r)?)),
            BinaryOp::NotStartsWith => Ok(Value::Bool(!a.starts_with(l, r)?)),
            BinaryOp::EndsWith => Ok(Value::Bool(a.ends_with(l, r)?)),
            BinaryOp::NotEndsWith => Ok(Value::Bool(!a.ends_with(l, r)?)),
            BinaryOp::Range => range(a.to_number(l)?, a.to_number(r)?),
        }
    }

    /// Ordering operators. Operands of unrelated kinds compare false unless
    /// evaluation is strict.
    fn relational(&self, op: BinaryOp, l: &Value, r: &Value) -> EvalResult {
        let ordering = match self.arithmetic.compare(l, r) {
            Ok(ordering) => ordering,
            Err(err)
                if !self.options.strict
                    && matches!(err.kind, EvalErrorKind::UnsupportedOperand { .. }) =>
            {
                return Ok(Value::Bool(false));
            }
            Err(err) => return Err(err),
        };
        let holds = match op {
            BinaryOp::Lt => ordering.is_lt(),
            BinaryOp::LtEq => ordering.is_le(),
            BinaryOp::Gt => ordering.is_gt(),
            _ => ordering.is_ge(),
        };
        Ok(Value::Bool(holds))
    }

    pub(super) fn eval_unary(&mut self, op: UnaryOp, operand: &Node, ctx: &SharedContext) -> Flow {
        let a = self.arithmetic;
        let value = match op {
            UnaryOp::Empty | UnaryOp::Size => self.eval_lenient(operand, ctx)?,
            _ => self.eval(operand, ctx)?,
        };
        let result = match op {
            UnaryOp::Neg => a.negate(&value)?,
            UnaryOp::Plus => match value {
                Value::Bool(_) => value,
                other => Value::Number(a.to_number(&other)?),
            },
            UnaryOp::Not => Value::Bool(!a.to_boolean(&value)),
            UnaryOp::BitNot => a.bit_complement(&value)?,
            UnaryOp::Empty => Value::Bool(a.is_empty(&value)),
            UnaryOp::Size => Value::from(a.size(&value)?),
        };
        Ok(result)
    }

    /// `target = value`. Postfix forms yield the value held before.
    pub(super) fn eval_assign(
        &mut self,
        target: &Node,
        value: &Node,
        postfix: bool,
        ctx: &SharedContext,
    ) -> Flow {
        if postfix {
            if let NodeKind::Binary { op, left, right } = &value.kind {
                let old = self.eval(left, ctx)?;
                let step = self.eval(right, ctx)?;
                let new = self.apply_binary(*op, &old, &step)?;
                self.assign_to(target, new, ctx)?;
                return Ok(old);
            }
        }
        let value = self.eval(value, ctx)?;
        self.assign_to(target, value.clone(), ctx)?;
        Ok(value)
    }

    /// `from .. to`, inclusive in either direction.
    pub(super) fn eval_range(&mut self, from: &Node, to: &Node, ctx: &SharedContext) -> Flow {
        let from = self.eval(from, ctx)?;
        let to = self.eval(to, ctx)?;
        let a = self.arithmetic;
        Ok(range(a.to_number(&from)?, a.to_number(&to)?)?)
    }

    pub(super) fn eval_map_literal(&mut self, entries: &[(Node, Node)], ctx: &SharedContext) -> Flow {
        let mut map = IndexMap::with_capacity(entries.len());
        for (key, value) in entries {
            let key = self.eval(key, ctx)?.to_plain_string();
            let value = self.eval(value, ctx)?;
            map.insert(key, value);
        }
        Ok(Value::map(map))
    }

    /// Set literals become arrays without duplicates, first occurrence kept.
    pub(super) fn eval_set_literal(&mut self, items: &[Node], ctx: &SharedContext) -> Flow {
        let mut out: Vec<Value> = Vec::with_capacity(items.len());
        for item in items {
            let value = self.eval(item, ctx)?;
            if !out.iter().any(|seen| self.arithmetic.equals(seen, &value)) {
                out.push(value);
            }
        }
        Ok(Value::array(out))
    }
}

/// Longest range `a .. b` may materialise.
const MAX_RANGE_LEN: usize = 1 << 24;

fn range(from: Number, to: Number) -> EvalResult {
    let (Some(from), Some(to)) = (from.to_i64(), to.to_i64()) else {
        return Err(errors::unsupported_operation("range bounds outside 64-bit integers"));
    };
    let len = usize::try_from(from.abs_diff(to))
        .ok()
        .and_then(|span| span.checked_add(1))
        .filter(|&len| len <= MAX_RANGE_LEN)
        .ok_or_else(|| {
            errors::unsupported_operation(format!(
                "range {from} .. {to} longer than {MAX_RANGE_LEN} elements"
            ))
        })?;
    let mut items = Vec::new();
    items
        .try_reserve_exact(len)
        .map_err(|_| errors::unsupported_operation(format!("range of {len} elements")))?;
    if from <= to {
        items.extend((from..=to).map(Value::int));
    } else {
        items.extend((to..=from).rev().map(Value::int));
    }
    Ok(Value::array(items))
}
