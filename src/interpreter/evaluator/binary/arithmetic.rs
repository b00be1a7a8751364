use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates `+ - * / % ^`.
    ///
    /// Both operands are converted with [`Value::to_number`], so numeric
    /// strings take part in arithmetic. Division follows IEEE-754
    /// (`1/0` is `inf`). Modulo is `a - floor(a/b) * b`, which takes the sign
    /// of the divisor.
    ///
    /// # Errors
    /// - `TypeMismatch` if an operand is not a number or numeric string.
    /// - `DivisionSemanticsViolation` for a modulo by zero.
    pub fn eval_arithmetic(op: BinaryOperator, left: &Value, right: &Value, line: usize)
                           -> EvalResult<Value> {
        let (Some(a), Some(b)) = (left.to_number(), right.to_number()) else {
            let offending = if left.to_number().is_none() { left } else { right };
            return Err(arithmetic_error(offending, line));
        };

        let result = match op {
            BinaryOperator::Add => a + b,
            BinaryOperator::Sub => a - b,
            BinaryOperator::Mul => a * b,
            BinaryOperator::Div => a / b,
            BinaryOperator::Mod => {
                if b == 0.0 {
                    return Err(RuntimeError::DivisionSemanticsViolation {
                        details: "attempt to perform 'n%0'".to_string(),
                        line,
                    });
                }
                (a / b).floor().mul_add(-b, a)
            },
            BinaryOperator::Pow => a.powf(b),
            _ => {
                return Err(RuntimeError::TypeMismatch { details: format!("'{op}' is not an arithmetic operator"),
                                                        line });
            },
        };

        Ok(Value::Number(result))
    }
}

/// The error for an operand that cannot take part in arithmetic.
pub fn arithmetic_error(offending: &Value, line: usize) -> RuntimeError {
    RuntimeError::TypeMismatch { details: format!("attempt to perform arithmetic on a {} value",
                                                  offending.type_name()),
                                 line }
}
