use std::rc::Rc;

use crate::{
    ast::FunctionBody,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            environment::Environment,
        },
        value::core::Value,
    },
};

/// Signature shared by every built-in: the evaluation context, the evaluated
/// arguments and the line of the call.
pub type NativeFn = fn(&mut Context, Vec<Value>, usize) -> EvalResult<Vec<Value>>;

/// A callable value.
pub enum Function {
    /// A built-in implemented in Rust.
    Native {
        /// The global name the built-in is registered under.
        name: &'static str,
        func: NativeFn,
    },
    /// A function literal closed over the environment it was evaluated in.
    Closure {
        body: Rc<FunctionBody>,
        env:  Rc<Environment>,
    },
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native { name, .. } => write!(f, "Native({name})"),
            Self::Closure { body, .. } => write!(f, "Closure(line {})", body.line),
        }
    }
}
