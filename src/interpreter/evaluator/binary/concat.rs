use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
    util::num::format_number,
};

impl Context {
    /// Evaluates `left .. right`.
    ///
    /// Strings are joined as they are and numbers are rendered first, so
    /// `1 .. 2` is `"12"`.
    ///
    /// # Errors
    /// `TypeMismatch` if an operand is neither a string nor a number.
    pub fn eval_concat(left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
        let left = concat_operand(left, line)?;
        let right = concat_operand(right, line)?;

        let mut joined = String::with_capacity(left.len() + right.len());
        joined.push_str(&left);
        joined.push_str(&right);
        Ok(Value::from(joined))
    }
}

fn concat_operand(value: &Value, line: usize) -> EvalResult<String> {
    match value {
        Value::String(text) => Ok(text.to_string()),
        Value::Number(n) => Ok(format_number(*n)),
        other => Err(RuntimeError::TypeMismatch { details: format!("attempt to concatenate a {} value",
                                                                   other.type_name()),
                                                  line }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_render_before_joining() {
        let joined = Context::eval_concat(&Value::Number(1.0), &Value::Number(0.5), 1).unwrap();
        assert_eq!(joined, Value::from("10.5"));
    }

    #[test]
    fn booleans_are_rejected() {
        let err = Context::eval_concat(&Value::from("a"), &Value::Boolean(true), 2).unwrap_err();
        assert!(matches!(err, RuntimeError::TypeMismatch { line: 2, .. }));
        assert!(err.to_string().contains("concatenate a boolean value"));
    }
}
