use std::rc::Rc;

use crate::{
    ast::FunctionBody,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult, Flow},
            environment::Environment,
            function::{builtin, error, print, table},
        },
        value::{
            core::Value,
            function::{Function, NativeFn},
        },
    },
};

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry maps a global name to the function pointer implementing it.
///
/// The macro produces:
/// - `BuiltinDef` (internal metadata),
/// - `BUILTIN_TABLE` (static table installed into fresh globals),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => $func:expr
        ),* $(,)?
    ) => {
        struct BuiltinDef {
            name: &'static str,
            func: NativeFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, func: $func },
            )*
        ];
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "print"    => print::print,
    "type"     => builtin::type_of,
    "tostring" => builtin::tostring,
    "tonumber" => builtin::tonumber,
    "select"   => builtin::select,
    "rawequal" => builtin::rawequal,
    "rawget"   => builtin::rawget,
    "rawset"   => builtin::rawset,
    "rawlen"   => builtin::rawlen,
    "next"     => table::next,
    "pairs"    => table::pairs,
    "ipairs"   => table::ipairs,
    "unpack"   => table::unpack,
    "error"    => error::error,
    "assert"   => error::assert,
    "pcall"    => error::pcall,
}

/// Declares every builtin function in `globals`.
pub fn install_builtins(globals: &Environment) {
    for builtin in BUILTIN_TABLE {
        globals.declare(builtin.name, native(builtin.name, builtin.func));
    }
}

/// Wraps a Rust function as a callable value.
#[must_use]
pub fn native(name: &'static str, func: NativeFn) -> Value {
    Value::from(Function::Native { name, func })
}

impl Context {
    /// Calls a value with already evaluated arguments.
    ///
    /// Built-ins receive the argument vector as is. Closures bind it to their
    /// parameters in a fresh scope nested in the environment they captured.
    ///
    /// # Parameters
    /// - `callee`: The value being called.
    /// - `args`: Evaluated argument values.
    /// - `line`: Line of the call, used for error reporting.
    ///
    /// # Returns
    /// Every value the function returned, possibly none.
    ///
    /// # Errors
    /// - `NotCallable` if `callee` is not a function.
    /// - `StackOverflow` if the call nests deeper than `max_call_depth`.
    /// - Anything the function itself raises.
    ///
    /// # Example
    /// ```
    /// use moonwalk::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// let mut ctx = Context::new();
    /// let select = ctx.globals().get("select").unwrap();
    /// let args = vec![Value::from("#"), Value::Nil, Value::Nil];
    ///
    /// assert_eq!(ctx.call_value(&select, args, 1).unwrap(), vec![Value::Number(2.0)]);
    /// ```
    pub fn call_value(&mut self, callee: &Value, args: Vec<Value>, line: usize)
                      -> EvalResult<Vec<Value>> {
        let Value::Function(function) = callee else {
            return Err(RuntimeError::NotCallable { type_name: callee.type_name(),
                                                   line });
        };

        self.enter_call(line)?;
        let result = match function.as_ref() {
            Function::Native { name, func } => {
                tracing::trace!(function = *name, args = args.len(), line, "calling builtin");
                func(self, args, line)
            },
            Function::Closure { body, env } => {
                tracing::trace!(defined_at = body.line, args = args.len(), line, "calling function");
                self.call_closure(body, env, args)
            },
        };
        self.leave_call();

        result
    }

    /// Runs a closure body.
    ///
    /// Parameters are bound positionally; missing arguments are `nil`. A
    /// vararg function keeps the surplus arguments for `...`, any other
    /// function drops them.
    fn call_closure(&mut self,
                    body: &FunctionBody,
                    env: &Rc<Environment>,
                    mut args: Vec<Value>)
                    -> EvalResult<Vec<Value>> {
        let varargs = if body.is_vararg && args.len() > body.params.len() {
            args.split_off(body.params.len())
        } else {
            Vec::new()
        };

        let scope = Environment::for_call(env, varargs);
        let mut args = args.into_iter();
        for param in &body.params {
            scope.declare(param.as_str(), args.next().unwrap_or(Value::Nil));
        }

        match self.exec_statements(&body.body, &scope)? {
            Flow::Return(values) => Ok(values),
            Flow::Normal | Flow::Break => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_builtin_is_installed() {
        let globals = Environment::new();
        install_builtins(&globals);
        for name in BUILTIN_FUNCTIONS {
            assert!(matches!(globals.get(name), Some(Value::Function(_))), "{name}");
        }
    }

    #[test]
    fn calling_a_number_fails() {
        let mut ctx = Context::new();
        let err = ctx.call_value(&Value::Number(1.0), Vec::new(), 9).unwrap_err();
        assert!(matches!(err, RuntimeError::NotCallable { type_name: "number", line: 9 }));
    }
}
