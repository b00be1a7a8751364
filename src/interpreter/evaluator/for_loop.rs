use std::rc::Rc;

use crate::{
    ast::{Block, Expr},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult, Flow},
            environment::Environment,
        },
        value::core::Value,
    },
};

impl Context {
    /// Executes `for var = start, stop [, step] do body end`.
    ///
    /// The bounds and the step are evaluated once, before the first
    /// iteration; numeric strings are accepted. The loop runs while
    /// `var <= stop` for a positive step and while `var >= stop` for a
    /// negative one. Every iteration gets its own scope, so closures created in
    /// the body capture that iteration's value of `var`.
    ///
    /// # Errors
    /// - `TypeMismatch` if a bound or the step is not a number.
    /// - `InvalidForStep` if the step is zero.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn exec_numeric_for(&mut self,
                                   var: &str,
                                   start: &Expr,
                                   stop: &Expr,
                                   step: Option<&Expr>,
                                   body: &Block,
                                   line: usize,
                                   env: &Rc<Environment>)
                                   -> EvalResult<Flow> {
        let start = self.for_bound(start, "initial value", line, env)?;
        let stop = self.for_bound(stop, "limit", line, env)?;
        let step = match step {
            Some(step) => self.for_bound(step, "step", line, env)?,
            None => 1.0,
        };
        if step == 0.0 {
            return Err(RuntimeError::InvalidForStep { line });
        }

        let mut current = start;
        while (step > 0.0 && current <= stop) || (step < 0.0 && current >= stop) {
            self.tick(line)?;

            let scope = Environment::with_parent(env);
            scope.declare(var, Value::Number(current));
            match self.exec_statements(body, &scope)? {
                Flow::Break => break,
                Flow::Return(values) => return Ok(Flow::Return(values)),
                Flow::Normal => {},
            }

            current += step;
        }

        Ok(Flow::Normal)
    }

    /// Executes `for names in exprs do body end`.
    ///
    /// The expression list is adjusted to an iterator function `f`, a state
    /// `s` and a control value. Each iteration calls `f(s, control)`; the loop
    /// ends when the first result is `nil`, otherwise that result becomes the
    /// new control value and the results are bound to `names`.
    ///
    /// # Errors
    /// `NotCallable` if `f` is not a function, and anything `f` raises.
    pub(crate) fn exec_generic_for(&mut self,
                                   names: &[String],
                                   exprs: &[Expr],
                                   body: &Block,
                                   line: usize,
                                   env: &Rc<Environment>)
                                   -> EvalResult<Flow> {
        let mut header = self.eval_list(exprs, env)?.into_iter();
        let iterator = header.next().unwrap_or(Value::Nil);
        let state = header.next().unwrap_or(Value::Nil);
        let mut control = header.next().unwrap_or(Value::Nil);

        loop {
            self.tick(line)?;

            let results = self.call_value(&iterator, vec![state.clone(), control.clone()], line)?;
            let first = results.first().cloned().unwrap_or(Value::Nil);
            if first.is_nil() {
                break;
            }
            control = first;

            let scope = Environment::with_parent(env);
            let mut results = results.into_iter();
            for name in names {
                scope.declare(name.as_str(), results.next().unwrap_or(Value::Nil));
            }

            match self.exec_statements(body, &scope)? {
                Flow::Break => break,
                Flow::Return(values) => return Ok(Flow::Return(values)),
                Flow::Normal => {},
            }
        }

        Ok(Flow::Normal)
    }

    fn for_bound(&mut self, expr: &Expr, what: &str, line: usize, env: &Rc<Environment>)
                 -> EvalResult<f64> {
        let value = self.eval(expr, env)?;
        value.to_number()
             .ok_or_else(|| RuntimeError::TypeMismatch { details: format!("'for' {what} must be a number, got {}",
                                                                          value.type_name()),
                                                         line })
    }
}
