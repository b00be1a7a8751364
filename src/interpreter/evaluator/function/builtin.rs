use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            utils::{arg, bad_argument, check_any, check_integer, check_table},
        },
        value::{core::Value, table::TableKey},
    },
    util::num::{format_number, parse_in_base, usize_to_f64},
};

/// Returns the type name of its argument as a string.
///
/// # Example
/// ```
/// use moonwalk::interpreter::{evaluator::{core::Context, function::builtin::type_of},
///                             value::core::Value};
///
/// let mut ctx = Context::new();
/// let r = type_of(&mut ctx, vec![Value::Number(1.0)], 1).unwrap();
/// assert_eq!(r, vec![Value::from("number")]);
/// ```
pub fn type_of(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Vec<Value>> {
    let value = check_any(&args, 0, "type", line)?;
    Ok(vec![Value::from(value.type_name())])
}

/// Converts any value to its display string.
pub fn tostring(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Vec<Value>> {
    let value = check_any(&args, 0, "tostring", line)?;
    Ok(vec![Value::from(value.to_string())])
}

/// `tonumber(v [, base])`.
///
/// Without a base, numbers are returned unchanged and strings are converted
/// with the usual coercion rules. With a base between 2 and 36 the argument
/// is read as an integer in that base. Anything that does not convert
/// yields `nil`.
///
/// # Example
/// ```
/// use moonwalk::interpreter::{evaluator::{core::Context, function::builtin::tonumber},
///                             value::core::Value};
///
/// let mut ctx = Context::new();
/// let r = tonumber(&mut ctx, vec![Value::from("ff"), Value::Number(16.0)], 1).unwrap();
/// assert_eq!(r, vec![Value::Number(255.0)]);
///
/// let r = tonumber(&mut ctx, vec![Value::from("1e2")], 1).unwrap();
/// assert_eq!(r, vec![Value::Number(100.0)]);
/// ```
pub fn tonumber(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Vec<Value>> {
    let value = check_any(&args, 0, "tonumber", line)?;

    let converted = match args.get(1) {
        None | Some(Value::Nil) => value.to_number(),
        Some(_) => {
            let base = check_integer(&args, 1, "tonumber", line)?;
            let base = u32::try_from(base).ok()
                                          .filter(|b| (2..=36).contains(b))
                                          .ok_or_else(|| RuntimeError::ArgumentError {
                                              function: "tonumber",
                                              details: "base out of range".to_string(),
                                              line,
                                          })?;
            let text = match value {
                Value::String(text) => text.to_string(),
                Value::Number(n) => format_number(*n),
                _ => return Err(bad_argument("tonumber", 0, "string", &args, line)),
            };
            parse_in_base(&text, base)
        },
    };

    Ok(vec![converted.map_or(Value::Nil, Value::Number)])
}

/// `select(n, ...)` returns the arguments after the `n`th, or their count
/// when `n` is `"#"`. A negative `n` counts from the end.
///
/// # Errors
/// `ArgumentError` if `n` is zero or reaches before the first argument.
pub fn select(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Vec<Value>> {
    let count = args.len().saturating_sub(1);

    if matches!(args.first(), Some(Value::String(s)) if s.as_ref() == "#") {
        return Ok(vec![Value::Number(usize_to_f64(count))]);
    }

    let n = check_integer(&args, 0, "select", line)?;
    let out_of_range = || RuntimeError::ArgumentError { function: "select",
                                                        details:  "index out of range".to_string(),
                                                        line };
    let skip = if n > 0 {
        usize::try_from(n - 1).map_err(|_| out_of_range())?
    } else {
        let back = usize::try_from(n.unsigned_abs()).map_err(|_| out_of_range())?;
        if n == 0 || back > count {
            return Err(out_of_range());
        }
        count - back
    };

    Ok(args.into_iter().skip(1).skip(skip).collect())
}

/// Compares two values without coercion. Tables and functions compare by
/// identity.
pub fn rawequal(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Vec<Value>> {
    let a = check_any(&args, 0, "rawequal", line)?;
    let b = check_any(&args, 1, "rawequal", line)?;
    Ok(vec![Value::Boolean(Context::values_equal(a, b))])
}

/// Reads `t[k]`.
pub fn rawget(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Vec<Value>> {
    let table = check_table(&args, 0, "rawget", line)?;
    let value = table.borrow().get(&arg(&args, 1));
    Ok(vec![value])
}

/// Stores `t[k] = v` and returns `t`.
///
/// # Errors
/// `InvalidTableKey` if `k` is `nil` or NaN.
pub fn rawset(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Vec<Value>> {
    let table = check_table(&args, 0, "rawset", line)?;
    check_any(&args, 2, "rawset", line)?;

    let key = TableKey::for_write(&arg(&args, 1), line)?;
    table.borrow_mut().set(key, arg(&args, 2));
    Ok(vec![Value::Table(table)])
}

/// The length of a table or string, as `#` computes it.
pub fn rawlen(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Vec<Value>> {
    let length = match args.first() {
        Some(Value::Table(table)) => table.borrow().length(),
        Some(Value::String(text)) => text.len(),
        _ => return Err(bad_argument("rawlen", 0, "table or string", &args, line)),
    };
    Ok(vec![Value::Number(usize_to_f64(length))])
}
