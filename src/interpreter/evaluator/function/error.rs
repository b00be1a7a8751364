use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            utils::{arg, check_any, opt_integer},
        },
        value::core::Value,
    },
};

/// `error(v [, level])` raises `v`.
///
/// A string message raised with a level above zero (the default is 1) is
/// prefixed with the chunk name and the line of the `error` call. Other
/// values are raised untouched, so `pcall` hands them back as they were.
pub fn error(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Vec<Value>> {
    let level = opt_integer(&args, 1, 1, "error", line)?;

    let value = match arg(&args, 0) {
        Value::String(message) if level > 0 => {
            Value::from(format!("{}:{line}: {message}", ctx.options().chunk_name))
        },
        other => other,
    };

    Err(RuntimeError::Raised { value, line })
}

/// `assert(v [, message])` returns all its arguments when `v` is truthy and
/// raises `message` (default `"assertion failed!"`) otherwise.
pub fn assert(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Vec<Value>> {
    if check_any(&args, 0, "assert", line)?.is_truthy() {
        return Ok(args);
    }

    let value = match args.into_iter().nth(1) {
        Some(message) if !message.is_nil() => message,
        _ => Value::from("assertion failed!"),
    };
    Err(RuntimeError::Raised { value, line })
}

/// `pcall(f, ...)` calls `f` in protected mode.
///
/// Returns `true` followed by the results of `f` when the call succeeds,
/// or `false` and the error otherwise. Values raised with `error` come back
/// as they were raised; any other runtime error becomes its message. An
/// aborted execution is never caught.
///
/// # Example
/// ```
/// use moonwalk::interpreter::{evaluator::core::Context, value::core::Value};
///
/// let mut ctx = Context::new();
/// let values = ctx.run("return pcall(error, {code = 7})").unwrap();
///
/// assert_eq!(values[0], Value::Boolean(false));
/// assert_eq!(values[1].type_name(), "table");
/// ```
pub fn pcall(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Vec<Value>> {
    check_any(&args, 0, "pcall", line)?;

    let mut args = args.into_iter();
    let function = args.next().unwrap_or(Value::Nil);

    match ctx.call_value(&function, args.collect(), line) {
        Ok(mut values) => {
            values.insert(0, Value::Boolean(true));
            Ok(values)
        },
        Err(err @ RuntimeError::ExecutionAborted { .. }) => Err(err),
        Err(err) => {
            tracing::debug!(line, error = %err, "pcall caught an error");
            Ok(vec![Value::Boolean(false), err.into_value()])
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_prefixes_strings_with_position() {
        let err = error(&mut Context::new(), vec![Value::from("boom")], 3).unwrap_err();
        assert_eq!(err.into_value(), Value::from("input:3: boom"));
    }

    #[test]
    fn error_level_zero_and_non_strings_are_untouched() {
        let err = error(&mut Context::new(), vec![Value::from("boom"), Value::Number(0.0)], 3);
        assert_eq!(err.unwrap_err().into_value(), Value::from("boom"));

        let err = error(&mut Context::new(), vec![Value::Number(42.0)], 3).unwrap_err();
        assert_eq!(err.into_value(), Value::Number(42.0));
    }

    #[test]
    fn assert_passes_arguments_through() {
        let args = vec![Value::Number(1.0), Value::from("unused")];
        assert_eq!(assert(&mut Context::new(), args.clone(), 1).unwrap(), args);

        let err = assert(&mut Context::new(), vec![Value::Boolean(false)], 2).unwrap_err();
        assert_eq!(err.into_value(), Value::from("assertion failed!"));
    }
}
