use std::{cell::RefCell, rc::Rc};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{core::Value, table::Table},
    },
    util::num::f64_to_i64_exact,
};

/// Adjusts a value list to exactly `count` values, dropping extras and
/// padding with `nil`.
///
/// # Example
/// ```
/// use moonwalk::interpreter::{evaluator::utils::adjust, value::core::Value};
///
/// assert_eq!(adjust(vec![Value::Number(1.0)], 2), vec![Value::Number(1.0), Value::Nil]);
/// assert_eq!(adjust(vec![Value::Nil; 3], 1).len(), 1);
/// ```
#[must_use]
pub fn adjust(mut values: Vec<Value>, count: usize) -> Vec<Value> {
    values.resize(count, Value::Nil);
    values
}

/// Returns argument `index` (zero-based), or `nil` when it was not passed.
#[must_use]
pub fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Nil)
}

/// Builds the error for a built-in argument of the wrong kind.
///
/// Arguments are numbered from one in the message.
#[must_use]
pub fn bad_argument(function: &'static str,
                    index: usize,
                    expected: &str,
                    args: &[Value],
                    line: usize)
                    -> RuntimeError {
    let got = args.get(index).map_or("no value", Value::type_name);
    RuntimeError::ArgumentError { function,
                                  details: format!("argument #{} expected {expected}, got {got}",
                                                   index + 1),
                                  line }
}

/// Requires argument `index` to be present, even if it is `nil`.
///
/// # Errors
/// `ArgumentError` when fewer arguments were passed.
pub fn check_any<'a>(args: &'a [Value],
                     index: usize,
                     function: &'static str,
                     line: usize)
                     -> EvalResult<&'a Value> {
    args.get(index).ok_or_else(|| bad_argument(function, index, "value", args, line))
}

/// Requires argument `index` to be a table.
///
/// # Errors
/// `ArgumentError` for any other kind of value.
pub fn check_table(args: &[Value],
                   index: usize,
                   function: &'static str,
                   line: usize)
                   -> EvalResult<Rc<RefCell<Table>>> {
    match args.get(index) {
        Some(Value::Table(table)) => Ok(Rc::clone(table)),
        _ => Err(bad_argument(function, index, "table", args, line)),
    }
}

/// Requires argument `index` to be a number or a numeric string.
///
/// # Errors
/// `ArgumentError` for any other value.
pub fn check_number(args: &[Value],
                    index: usize,
                    function: &'static str,
                    line: usize)
                    -> EvalResult<f64> {
    args.get(index)
        .and_then(Value::to_number)
        .ok_or_else(|| bad_argument(function, index, "number", args, line))
}

/// Requires argument `index` to be an integral number.
///
/// # Errors
/// `ArgumentError` for non-numbers and numbers with a fractional part.
pub fn check_integer(args: &[Value],
                     index: usize,
                     function: &'static str,
                     line: usize)
                     -> EvalResult<i64> {
    let number = check_number(args, index, function, line)?;
    f64_to_i64_exact(number).ok_or_else(|| RuntimeError::ArgumentError {
                                function,
                                details: format!("argument #{} has no integer representation",
                                                 index + 1),
                                line,
                            })
}

/// Like [`check_integer`], but a missing or `nil` argument yields `default`.
///
/// # Errors
/// `ArgumentError` for anything else that is not an integral number.
pub fn opt_integer(args: &[Value],
                   index: usize,
                   default: i64,
                   function: &'static str,
                   line: usize)
                   -> EvalResult<i64> {
    match args.get(index) {
        None | Some(Value::Nil) => Ok(default),
        Some(_) => check_integer(args, index, function, line),
    }
}
