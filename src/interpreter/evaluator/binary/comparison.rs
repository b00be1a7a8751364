use std::cmp::Ordering;

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a relational comparison of the form `Value <Operator> Value`.
    ///
    /// Two numbers compare numerically and two strings compare by their
    /// bytes. Nothing is coerced: `1 < "2"` is an error.
    ///
    /// # Parameters
    /// - `op`: One of `<`, `<=`, `>`, `>=`.
    /// - `left`: The left-hand value.
    /// - `right`: The right-hand value.
    /// - `line`: Current line number used for error reporting.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing a boolean result.
    ///
    /// # Example
    /// ```
    /// use moonwalk::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let result = Context::eval_comparison(BinaryOperator::Less,
    ///                                       &Value::Number(3.0),
    ///                                       &Value::Number(5.0),
    ///                                       1);
    /// assert_eq!(result.unwrap(), Value::Boolean(true));
    ///
    /// let result = Context::eval_comparison(BinaryOperator::GreaterEqual,
    ///                                       &Value::from("apple"),
    ///                                       &Value::from("banana"),
    ///                                       1);
    /// assert_eq!(result.unwrap(), Value::Boolean(false));
    /// ```
    pub fn eval_comparison(op: BinaryOperator,
                           left: &Value,
                           right: &Value,
                           line: usize)
                           -> EvalResult<Value> {
        let ordering = match (left, right) {
            (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => Some(a.as_bytes().cmp(b.as_bytes())),
            _ => return Err(comparison_error(left, right, line)),
        };

        // NaN compares false with everything.
        let Some(ordering) = ordering else {
            return Ok(Value::Boolean(false));
        };

        Ok(Value::Boolean(match op {
                              BinaryOperator::Less => ordering == Ordering::Less,
                              BinaryOperator::LessEqual => ordering != Ordering::Greater,
                              BinaryOperator::Greater => ordering == Ordering::Greater,
                              BinaryOperator::GreaterEqual => ordering != Ordering::Less,
                              _ => {
                                  return Err(RuntimeError::TypeMismatch { details: format!("'{op}' is not a comparison operator"),
                                                                          line });
                              },
                          }))
    }
}

fn comparison_error(left: &Value, right: &Value, line: usize) -> RuntimeError {
    let (a, b) = (left.type_name(), right.type_name());
    let details = if a == b {
        format!("attempt to compare two {a} values")
    } else {
        format!("attempt to compare {a} with {b}")
    };
    RuntimeError::TypeMismatch { details, line }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_kinds_do_not_compare() {
        let err = Context::eval_comparison(BinaryOperator::Less,
                                           &Value::Number(1.0),
                                           &Value::from("2"),
                                           4).unwrap_err();
        assert_eq!(err.to_string(),
                   "Error on line 4: Type error: attempt to compare number with string.");
    }

    #[test]
    fn nan_is_unordered() {
        for op in [BinaryOperator::Less,
                   BinaryOperator::LessEqual,
                   BinaryOperator::Greater,
                   BinaryOperator::GreaterEqual]
        {
            let result =
                Context::eval_comparison(op, &Value::Number(f64::NAN), &Value::Number(1.0), 1);
            assert_eq!(result.unwrap(), Value::Boolean(false));
        }
    }

    #[test]
    fn strings_compare_bytewise() {
        let result = Context::eval_comparison(BinaryOperator::Less,
                                              &Value::from("Z"),
                                              &Value::from("a"),
                                              1);
        assert_eq!(result.unwrap(), Value::Boolean(true));
    }
}
