//! Builtin methods of strings, arrays, maps and closures.
//!
//! String positions count characters, not bytes. Argument counts and kinds
//! are checked by each method; failures are plain errors so a caller's
//! strictness setting does not hide a misuse.

use jexl_value::errors::{self, EvalError, EvalResult};
use jexl_value::{loose_equals, Value};

use super::BuiltinFn;

/// `length`, `size` and `empty` as properties.
pub(super) fn size_property(name: &str) -> Option<BuiltinFn> {
    match name {
        "length" | "size" => Some(size),
        "empty" => Some(is_empty),
        _ => None,
    }
}

pub(super) fn string_method(name: &str) -> Option<BuiltinFn> {
    let f: BuiltinFn = match name {
        "length" | "size" => size,
        "isEmpty" => is_empty,
        "toUpperCase" => str_upper,
        "toLowerCase" => str_lower,
        "trim" => str_trim,
        "substring" => str_substring,
        "indexOf" => str_index_of,
        "contains" => str_contains,
        "startsWith" => str_starts_with,
        "endsWith" => str_ends_with,
        "split" => str_split,
        "replace" => str_replace,
        "charAt" => str_char_at,
        _ => return None,
    };
    Some(f)
}

pub(super) fn array_method(name: &str) -> Option<BuiltinFn> {
    let f: BuiltinFn = match name {
        "length" | "size" => size,
        "isEmpty" => is_empty,
        "get" => array_get,
        "contains" => array_contains,
        "indexOf" => array_index_of,
        "add" => array_add,
        "set" => array_set,
        "remove" => array_remove,
        "join" => array_join,
        _ => return None,
    };
    Some(f)
}

pub(super) fn map_method(name: &str) -> Option<BuiltinFn> {
    let f: BuiltinFn = match name {
        "size" => size,
        "isEmpty" => is_empty,
        "get" => map_get,
        "containsKey" => map_contains_key,
        "put" => map_put,
        "remove" => map_remove,
        "keys" => map_keys,
        "values" => map_values,
        _ => return None,
    };
    Some(f)
}

/// `call` is run by the interpreter, which owns the evaluation state.
pub(super) fn closure_method(name: &str) -> Option<BuiltinFn> {
    match name {
        "curry" => Some(closure_curry),
        _ => None,
    }
}

// Argument helpers

fn arity(method: &str, args: &[Value], expected: usize) -> Result<(), EvalError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(errors::wrong_arg_count(method, expected, args.len()))
    }
}

fn str_arg<'v>(method: &str, args: &'v [Value], index: usize) -> Result<&'v str, EvalError> {
    match args.get(index) {
        Some(Value::Str(s)) => Ok(s),
        Some(other) => Err(errors::wrong_arg_type(method, "string", other)),
        None => Err(errors::wrong_arg_count(method, index + 1, args.len())),
    }
}

fn int_arg(method: &str, args: &[Value], index: usize) -> Result<i64, EvalError> {
    match args.get(index) {
        Some(Value::Number(n)) => Ok(n.to_i64_saturating()),
        Some(other) => Err(errors::wrong_arg_type(method, "number", other)),
        None => Err(errors::wrong_arg_count(method, index + 1, args.len())),
    }
}

/// A position within `0..=len`.
fn position(method: &str, args: &[Value], index: usize, len: usize) -> Result<usize, EvalError> {
    let raw = int_arg(method, args, index)?;
    usize::try_from(raw)
        .ok()
        .filter(|&p| p <= len)
        .ok_or_else(|| errors::index_out_of_bounds(&args[index], len))
}

/// An element index within `0..len`.
fn element(method: &str, args: &[Value], index: usize, len: usize) -> Result<usize, EvalError> {
    let p = position(method, args, index, len)?;
    if p < len {
        Ok(p)
    } else {
        Err(errors::index_out_of_bounds(&args[index], len))
    }
}

fn char_index_value(index: Option<usize>) -> Value {
    match index {
        Some(i) => Value::from(i),
        None => Value::int(-1),
    }
}

// Shared

fn size(object: &Value, args: &[Value]) -> EvalResult {
    arity("size", args, 0)?;
    let n = match object {
        Value::Str(s) => s.chars().count(),
        Value::Array(items) => items.read().len(),
        Value::Map(entries) => entries.read().len(),
        other => return Err(errors::unsupported_operand("size", other, None)),
    };
    Ok(Value::from(n))
}

fn is_empty(object: &Value, args: &[Value]) -> EvalResult {
    arity("isEmpty", args, 0)?;
    let empty = match object {
        Value::Str(s) => s.is_empty(),
        Value::Array(items) => items.read().is_empty(),
        Value::Map(entries) => entries.read().is_empty(),
        other => return Err(errors::unsupported_operand("empty", other, None)),
    };
    Ok(Value::Bool(empty))
}

// Strings

fn receiver_str(object: &Value) -> Result<&str, EvalError> {
    object
        .as_str()
        .ok_or_else(|| errors::unsupported_operand("string method", object, None))
}

fn str_upper(object: &Value, args: &[Value]) -> EvalResult {
    arity("toUpperCase", args, 0)?;
    Ok(Value::string(receiver_str(object)?.to_uppercase()))
}

fn str_lower(object: &Value, args: &[Value]) -> EvalResult {
    arity("toLowerCase", args, 0)?;
    Ok(Value::string(receiver_str(object)?.to_lowercase()))
}

fn str_trim(object: &Value, args: &[Value]) -> EvalResult {
    arity("trim", args, 0)?;
    Ok(Value::from(receiver_str(object)?.trim()))
}

/// `substring(start)` or `substring(start, end)`, end exclusive.
fn str_substring(object: &Value, args: &[Value]) -> EvalResult {
    let s = receiver_str(object)?;
    if args.is_empty() || args.len() > 2 {
        return Err(errors::wrong_arg_count("substring", 2, args.len()));
    }
    let chars: Vec<char> = s.chars().collect();
    let start = position("substring", args, 0, chars.len())?;
    let end = if args.len() == 2 {
        position("substring", args, 1, chars.len())?
    } else {
        chars.len()
    };
    if end < start {
        return Err(errors::index_out_of_bounds(&args[1], chars.len()));
    }
    Ok(Value::string(chars[start..end].iter().collect::<String>()))
}

fn str_index_of(object: &Value, args: &[Value]) -> EvalResult {
    arity("indexOf", args, 1)?;
    let s = receiver_str(object)?;
    let needle = str_arg("indexOf", args, 0)?;
    let index = s.find(needle).map(|byte| s[..byte].chars().count());
    Ok(char_index_value(index))
}

fn str_contains(object: &Value, args: &[Value]) -> EvalResult {
    arity("contains", args, 1)?;
    Ok(Value::Bool(
        receiver_str(object)?.contains(str_arg("contains", args, 0)?),
    ))
}

fn str_starts_with(object: &Value, args: &[Value]) -> EvalResult {
    arity("startsWith", args, 1)?;
    Ok(Value::Bool(
        receiver_str(object)?.starts_with(str_arg("startsWith", args, 0)?),
    ))
}

fn str_ends_with(object: &Value, args: &[Value]) -> EvalResult {
    arity("endsWith", args, 1)?;
    Ok(Value::Bool(
        receiver_str(object)?.ends_with(str_arg("endsWith", args, 0)?),
    ))
}

fn str_split(object: &Value, args: &[Value]) -> EvalResult {
    arity("split", args, 1)?;
    let s = receiver_str(object)?;
    let sep = str_arg("split", args, 0)?;
    let parts = if sep.is_empty() {
        s.chars().map(|c| Value::string(c.to_string())).collect()
    } else {
        s.split(sep).map(Value::from).collect()
    };
    Ok(Value::array(parts))
}

fn str_replace(object: &Value, args: &[Value]) -> EvalResult {
    arity("replace", args, 2)?;
    let s = receiver_str(object)?;
    let from = str_arg("replace", args, 0)?;
    let to = str_arg("replace", args, 1)?;
    Ok(Value::string(s.replace(from, to)))
}

fn str_char_at(object: &Value, args: &[Value]) -> EvalResult {
    arity("charAt", args, 1)?;
    let s = receiver_str(object)?;
    let len = s.chars().count();
    let index = element("charAt", args, 0, len)?;
    Ok(s.chars()
        .nth(index)
        .map_or(Value::Nil, |c| Value::string(c.to_string())))
}

// Arrays

fn array_get(object: &Value, args: &[Value]) -> EvalResult {
    arity("get", args, 1)?;
    let Value::Array(items) = object else {
        return Err(errors::unsupported_operand("get", object, None));
    };
    let items = items.read();
    let index = element("get", args, 0, items.len())?;
    Ok(items[index].clone())
}

fn array_contains(object: &Value, args: &[Value]) -> EvalResult {
    arity("contains", args, 1)?;
    let Value::Array(items) = object else {
        return Err(errors::unsupported_operand("contains", object, None));
    };
    Ok(Value::Bool(items.read().iter().any(|x| loose_equals(x, &args[0]))))
}

fn array_index_of(object: &Value, args: &[Value]) -> EvalResult {
    arity("indexOf", args, 1)?;
    let Value::Array(items) = object else {
        return Err(errors::unsupported_operand("indexOf", object, None));
    };
    let index = items.read().iter().position(|x| loose_equals(x, &args[0]));
    Ok(char_index_value(index))
}

fn array_add(object: &Value, args: &[Value]) -> EvalResult {
    arity("add", args, 1)?;
    let Value::Array(items) = object else {
        return Err(errors::unsupported_operand("add", object, None));
    };
    items.write().push(args[0].clone());
    Ok(Value::Bool(true))
}

/// Replace an element, returning the previous one.
fn array_set(object: &Value, args: &[Value]) -> EvalResult {
    arity("set", args, 2)?;
    let Value::Array(items) = object else {
        return Err(errors::unsupported_operand("set", object, None));
    };
    let mut items = items.write();
    let index = element("set", args, 0, items.len())?;
    Ok(std::mem::replace(&mut items[index], args[1].clone()))
}

fn array_remove(object: &Value, args: &[Value]) -> EvalResult {
    arity("remove", args, 1)?;
    let Value::Array(items) = object else {
        return Err(errors::unsupported_operand("remove", object, None));
    };
    let mut items = items.write();
    let index = element("remove", args, 0, items.len())?;
    Ok(items.remove(index))
}

/// `join()` uses `,`; `join(sep)` uses `sep`.
fn array_join(object: &Value, args: &[Value]) -> EvalResult {
    let Value::Array(items) = object else {
        return Err(errors::unsupported_operand("join", object, None));
    };
    let sep = match args.len() {
        0 => ",",
        1 => str_arg("join", args, 0)?,
        n => return Err(errors::wrong_arg_count("join", 1, n)),
    };
    let joined = items
        .read()
        .iter()
        .map(Value::to_plain_string)
        .collect::<Vec<_>>()
        .join(sep);
    Ok(Value::string(joined))
}

// Maps

fn map_get(object: &Value, args: &[Value]) -> EvalResult {
    arity("get", args, 1)?;
    let Value::Map(entries) = object else {
        return Err(errors::unsupported_operand("get", object, None));
    };
    let key = args[0].to_plain_string();
    Ok(entries.read().get(&key).cloned().unwrap_or_default())
}

fn map_contains_key(object: &Value, args: &[Value]) -> EvalResult {
    arity("containsKey", args, 1)?;
    let Value::Map(entries) = object else {
        return Err(errors::unsupported_operand("containsKey", object, None));
    };
    Ok(Value::Bool(
        entries.read().contains_key(&args[0].to_plain_string()),
    ))
}

/// Insert or replace, returning the previous value or nil.
fn map_put(object: &Value, args: &[Value]) -> EvalResult {
    arity("put", args, 2)?;
    let Value::Map(entries) = object else {
        return Err(errors::unsupported_operand("put", object, None));
    };
    let previous = entries
        .write()
        .insert(args[0].to_plain_string(), args[1].clone());
    Ok(previous.unwrap_or_default())
}

fn map_remove(object: &Value, args: &[Value]) -> EvalResult {
    arity("remove", args, 1)?;
    let Value::Map(entries) = object else {
        return Err(errors::unsupported_operand("remove", object, None));
    };
    let removed = entries.write().shift_remove(&args[0].to_plain_string());
    Ok(removed.unwrap_or_default())
}

fn map_keys(object: &Value, args: &[Value]) -> EvalResult {
    arity("keys", args, 0)?;
    let Value::Map(entries) = object else {
        return Err(errors::unsupported_operand("keys", object, None));
    };
    let keys = entries.read().keys().map(|k| Value::from(k.as_str())).collect();
    Ok(Value::array(keys))
}

fn map_values(object: &Value, args: &[Value]) -> EvalResult {
    arity("values", args, 0)?;
    let Value::Map(entries) = object else {
        return Err(errors::unsupported_operand("values", object, None));
    };
    let values = entries.read().values().cloned().collect();
    Ok(Value::array(values))
}

// Closures

fn closure_curry(object: &Value, args: &[Value]) -> EvalResult {
    match object {
        Value::Function(closure) => Ok(Value::Function(closure.curry(args))),
        other => Err(errors::not_callable(other)),
    }
}
