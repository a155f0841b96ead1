//! Overload selection for host methods.
//!
//! Each argument is scored against the declared parameter kind; the
//! overload with the highest total wins and ties keep declaration order.
//! An argument that cannot be passed at all disqualifies the overload.

use jexl_value::{MethodSignature, ParamKind, Value};

const EXACT: u32 = 4;
const ASSIGNABLE: u32 = 3;
const CONVERTIBLE: u32 = 2;
const NUMERIC_FAMILY: u32 = 1;

/// How well `arg` fits a parameter of kind `kind`, or `None` if it does
/// not fit.
pub fn score(kind: ParamKind, arg: &Value) -> Option<u32> {
    use ParamKind as K;

    match (kind, arg) {
        (K::Any, _) => Some(ASSIGNABLE),

        (K::Bool, Value::Bool(_)) => Some(EXACT),

        (K::Number, Value::Number(_)) => Some(EXACT),
        (K::Number, Value::Bool(_)) => Some(NUMERIC_FAMILY),
        (K::Number, Value::Str(s)) if jexl_ir::Number::parse_decimal(s.trim()).is_some() => {
            Some(CONVERTIBLE)
        }

        (K::Integer, Value::Number(n)) if n.is_integer() => Some(EXACT),
        (K::Integer, Value::Number(_) | Value::Bool(_)) => Some(NUMERIC_FAMILY),

        (K::Str, Value::Str(_)) => Some(EXACT),
        (K::Array, Value::Array(_)) => Some(EXACT),
        (K::Map, Value::Map(_)) => Some(EXACT),
        (K::Function, Value::Function(_)) => Some(EXACT),
        (K::Object, Value::Object(_)) => Some(EXACT),

        // Reference kinds take nil.
        (K::Str | K::Array | K::Map | K::Function | K::Object, Value::Nil) => Some(ASSIGNABLE),

        _ => None,
    }
}

/// Index of the best overload named `name` for `args`.
pub fn resolve(methods: &[MethodSignature], name: &str, args: &[Value]) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (index, sig) in methods.iter().enumerate() {
        if sig.name != name || sig.params.len() != args.len() {
            continue;
        }
        let total = sig
            .params
            .iter()
            .zip(args)
            .map(|(kind, arg)| score(*kind, arg))
            .sum::<Option<u32>>();
        if let Some(total) = total {
            if best.map_or(true, |(_, b)| total > b) {
                best = Some((index, total));
            }
        }
    }
    best.map(|(index, _)| index)
}
