use std::rc::Rc;

use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            environment::Environment,
        },
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a binary expression.
    ///
    /// `and` and `or` evaluate their right operand only when needed and
    /// return one of the operands unchanged. Every other operator evaluates
    /// both operands, left first, and hands them to [`Context::eval_binary`].
    pub(crate) fn eval_binary_op(&mut self,
                                 left: &Expr,
                                 op: BinaryOperator,
                                 right: &Expr,
                                 line: usize,
                                 env: &Rc<Environment>)
                                 -> EvalResult<Value> {
        match op {
            BinaryOperator::And => {
                let left = self.eval(left, env)?;
                if left.is_truthy() { self.eval(right, env) } else { Ok(left) }
            },
            BinaryOperator::Or => {
                let left = self.eval(left, env)?;
                if left.is_truthy() { Ok(left) } else { self.eval(right, env) }
            },
            _ => {
                let left = self.eval(left, env)?;
                let right = self.eval(right, env)?;
                Self::eval_binary(op, &left, &right, line)
            },
        }
    }

    /// Evaluates a strict binary operation between two values.
    ///
    /// This function routes the operation to the handler for its operator
    /// family. `and`/`or` reaching this point (their operands already
    /// evaluated) behave as on values.
    ///
    /// # Example
    /// ```
    /// use moonwalk::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let sum = Context::eval_binary(BinaryOperator::Add,
    ///                                &Value::Number(3.0),
    ///                                &Value::from("4"),
    ///                                1).unwrap();
    /// assert_eq!(sum, Value::Number(7.0));
    ///
    /// let text = Context::eval_binary(BinaryOperator::Concat,
    ///                                 &Value::from("x"),
    ///                                 &Value::Number(1.5),
    ///                                 1).unwrap();
    /// assert_eq!(text, Value::from("x1.5"));
    /// ```
    pub fn eval_binary(op: BinaryOperator, left: &Value, right: &Value, line: usize)
                       -> EvalResult<Value> {
        use BinaryOperator::{
            Add, And, Concat, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul,
            NotEqual, Or, Pow, Sub,
        };

        match op {
            Add | Sub | Mul | Div | Mod | Pow => Self::eval_arithmetic(op, left, right, line),
            Concat => Self::eval_concat(left, right, line),
            Less | LessEqual | Greater | GreaterEqual => {
                Self::eval_comparison(op, left, right, line)
            },
            Equal => Ok(Value::Boolean(Self::values_equal(left, right))),
            NotEqual => Ok(Value::Boolean(!Self::values_equal(left, right))),
            And => Ok(if left.is_truthy() { right.clone() } else { left.clone() }),
            Or => Ok(if left.is_truthy() { left.clone() } else { right.clone() }),
        }
    }
}
