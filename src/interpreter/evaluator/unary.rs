use crate::{
    ast::UnaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::arithmetic::arithmetic_error,
            core::{Context, EvalResult},
        },
        value::core::Value,
    },
    util::num::usize_to_f64,
};

impl Context {
    /// Evaluates a unary operation on a value.
    ///
    /// Supported operators:
    /// - `Negate`: numeric negation. Numeric strings are converted first.
    /// - `Not`: `true` for `nil` and `false`, `false` for everything else.
    /// - `Length`: the byte length of a string or the border of a table.
    ///
    /// # Example
    /// ```
    /// use moonwalk::{
    ///     ast::UnaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let v = Context::eval_unary(UnaryOperator::Negate, &Value::from("5"), 1).unwrap();
    /// assert_eq!(v, Value::Number(-5.0));
    ///
    /// let v = Context::eval_unary(UnaryOperator::Not, &Value::Nil, 1).unwrap();
    /// assert_eq!(v, Value::Boolean(true));
    ///
    /// let v = Context::eval_unary(UnaryOperator::Length, &Value::from("héllo"), 1).unwrap();
    /// assert_eq!(v, Value::Number(6.0));
    /// ```
    pub fn eval_unary(op: UnaryOperator, value: &Value, line: usize) -> EvalResult<Value> {
        match op {
            UnaryOperator::Negate => value.to_number()
                                          .map(|n| Value::Number(-n))
                                          .ok_or_else(|| arithmetic_error(value, line)),
            UnaryOperator::Not => Ok(Value::Boolean(!value.is_truthy())),
            UnaryOperator::Length => match value {
                Value::String(text) => Ok(Value::Number(usize_to_f64(text.len()))),
                Value::Table(table) => Ok(Value::Number(usize_to_f64(table.borrow().length()))),
                other => Err(RuntimeError::TypeMismatch { details: format!("attempt to get length of a {} value",
                                                                           other.type_name()),
                                                          line }),
            },
        }
    }
}
