use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            function::core::native,
            utils::{arg, check_integer, check_table, opt_integer},
        },
        value::core::Value,
    },
};

/// Upper bound on the number of values `unpack` produces.
const MAX_UNPACK: i64 = 1_000_000;

/// `next(t [, k])` returns the entry after `k` in traversal order, or the
/// first entry when `k` is `nil`. Returns a single `nil` at the end.
///
/// Traversal follows insertion order. Assigning to existing fields,
/// including assigning `nil`, during a traversal is allowed.
///
/// # Errors
/// `ArgumentError` if `k` is not a key of `t`.
pub fn next(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Vec<Value>> {
    let table = check_table(&args, 0, "next", line)?;
    let entry = table.borrow().next(&arg(&args, 1), line)?;

    Ok(match entry {
        Some((key, value)) => vec![key, value],
        None => vec![Value::Nil],
    })
}

/// `pairs(t)` returns `next, t, nil`, the triple a generic `for` needs to
/// visit every entry of `t`.
pub fn pairs(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Vec<Value>> {
    let table = check_table(&args, 0, "pairs", line)?;
    Ok(vec![native("next", next), Value::Table(table), Value::Nil])
}

/// `ipairs(t)` returns an iterator over `t[1]`, `t[2]`, ... up to the first
/// `nil`.
pub fn ipairs(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Vec<Value>> {
    let table = check_table(&args, 0, "ipairs", line)?;
    Ok(vec![native("ipairs_iterator", ipairs_step), Value::Table(table), Value::Number(0.0)])
}

fn ipairs_step(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Vec<Value>> {
    let table = check_table(&args, 0, "ipairs", line)?;
    let index = check_integer(&args, 1, "ipairs", line)? + 1;

    #[allow(clippy::cast_precision_loss)]
    let key = Value::Number(index as f64);
    let value = table.borrow().get(&key);

    Ok(if value.is_nil() { vec![Value::Nil] } else { vec![key, value] })
}

/// `unpack(t [, i [, j]])` returns `t[i], ..., t[j]`. `i` defaults to 1 and
/// `j` to the length of `t`.
///
/// # Example
/// ```
/// use moonwalk::interpreter::{evaluator::{core::Context, function::table::unpack},
///                             value::{core::Value, table::Table}};
///
/// let mut ctx = Context::new();
/// let t = Value::from(Table::from_sequence(vec![Value::Number(1.0), Value::Number(2.0)]));
///
/// let r = unpack(&mut ctx, vec![t], 1).unwrap();
/// assert_eq!(r, vec![Value::Number(1.0), Value::Number(2.0)]);
/// ```
///
/// # Errors
/// `ArgumentError` if the range holds a million values or more.
pub fn unpack(_: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Vec<Value>> {
    let table = check_table(&args, 0, "unpack", line)?;
    let table = table.borrow();

    let first = opt_integer(&args, 1, 1, "unpack", line)?;
    let length = i64::try_from(table.length()).unwrap_or(i64::MAX);
    let last = opt_integer(&args, 2, length, "unpack", line)?;

    if first > last {
        return Ok(Vec::new());
    }
    if last.saturating_sub(first) >= MAX_UNPACK {
        return Err(RuntimeError::ArgumentError { function: "unpack",
                                                 details: "too many results to unpack".to_string(),
                                                 line });
    }

    #[allow(clippy::cast_precision_loss)]
    let values = (first..=last).map(|i| table.get(&Value::Number(i as f64))).collect();
    Ok(values)
}
