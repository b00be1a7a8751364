use std::{io::Write, rc::Rc};

use crate::{
    ast::{Block, Chunk, Expr},
    error::{Error, RuntimeError},
    interpreter::{
        evaluator::{environment::Environment, function::core::install_builtins, hook::InterruptHook},
        lexer::tokenize,
        parser::parse,
        value::{core::Value, function::Function},
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Default maximum depth of nested function calls.
pub const MAX_CALL_DEPTH: usize = 200;
/// Default number of steps between two interrupt hook checks.
pub const CHECK_INTERVAL: u64 = 64;

/// Evaluation settings.
#[derive(Debug, Clone)]
pub struct Options {
    /// Reading a name bound nowhere is an `UndefinedVariable` error when set,
    /// and yields `nil` otherwise.
    pub strict_globals: bool,
    /// Calls nested deeper than this fail with `StackOverflow`.
    pub max_call_depth: usize,
    /// How many steps run between two interrupt hook checks.
    pub check_interval: u64,
    /// The name `error` uses when it prefixes messages with a position.
    pub chunk_name:     String,
}

impl Default for Options {
    fn default() -> Self {
        Self { strict_globals: true,
               max_call_depth: MAX_CALL_DEPTH,
               check_interval: CHECK_INTERVAL,
               chunk_name:     "input".to_string(), }
    }
}

/// How a statement or block finished.
///
/// `Break` and `Return` travel up through enclosing blocks until a loop or a
/// call boundary consumes them.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Fell through to the next statement.
    Normal,
    /// Left the innermost loop.
    Break,
    /// Returned from the current function with these values.
    Return(Vec<Value>),
}

/// Stores the runtime evaluation context.
///
/// This struct holds the interpreter state that outlives a single chunk: the
/// global environment, the evaluation options, the optional interrupt hook and
/// the sink `print` writes to.
///
/// ## Usage
///
/// `Context` is created once and reused across chunks. Globals assigned by one
/// chunk stay visible to the next, which is what the REPL relies on.
pub struct Context {
    globals: Rc<Environment>,
    options: Options,
    hook:    Option<Box<dyn InterruptHook>>,
    output:  Box<dyn Write>,
    steps:   u64,
    depth:   usize,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Creates a context with fresh globals, holding the built-in functions,
    /// and default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    /// Creates a context with fresh globals and the given options.
    #[must_use]
    pub fn with_options(options: Options) -> Self {
        Self::with_globals(Self::default_globals(), options)
    }

    /// Creates a context evaluating against an existing global environment.
    #[must_use]
    pub fn with_globals(globals: Rc<Environment>, options: Options) -> Self {
        Self { globals,
               options,
               hook: None,
               output: Box::new(std::io::stdout()),
               steps: 0,
               depth: 0 }
    }

    /// Builds a global environment populated with the built-in functions.
    #[must_use]
    pub fn default_globals() -> Rc<Environment> {
        let globals = Environment::new();
        install_builtins(&globals);
        globals
    }

    #[must_use]
    pub const fn globals(&self) -> &Rc<Environment> {
        &self.globals
    }

    #[must_use]
    pub const fn options(&self) -> &Options {
        &self.options
    }

    /// Redirects the output of `print`.
    pub fn set_output(&mut self, output: impl Write + 'static) {
        self.output = Box::new(output);
    }

    /// Installs a hook that can abort long-running evaluations.
    pub fn set_interrupt_hook(&mut self, hook: impl InterruptHook + 'static) {
        self.hook = Some(Box::new(hook));
    }

    pub(crate) fn output(&mut self) -> &mut dyn Write {
        self.output.as_mut()
    }

    /// Tokenizes, parses and executes `source` in this context.
    ///
    /// # Errors
    /// Returns the first lexical, syntax or runtime error.
    pub fn run(&mut self, source: &str) -> Result<Vec<Value>, Error> {
        let tokens = tokenize(source).collect::<Result<Vec<_>, _>>()?;
        let chunk = parse(&tokens)?;
        Ok(self.execute(&chunk)?)
    }

    /// Executes a chunk and returns the values of its top-level `return`, or
    /// no values if control falls off the end.
    ///
    /// The chunk body runs in a child scope of the globals, so its `local`
    /// declarations do not outlive it.
    #[tracing::instrument(level = "debug", skip_all, fields(chunk = %self.options.chunk_name))]
    pub fn execute(&mut self, chunk: &Chunk) -> EvalResult<Vec<Value>> {
        self.depth = 0;
        self.steps = 0;
        let scope = Environment::for_call(&self.globals, Vec::new());

        match self.exec_statements(&chunk.body, &scope)? {
            Flow::Return(values) => Ok(values),
            Flow::Normal | Flow::Break => Ok(Vec::new()),
        }
    }

    /// Counts one step and consults the interrupt hook every
    /// `check_interval` steps. The count starts over with every chunk, so a
    /// hook limits each evaluation on its own.
    pub(crate) fn tick(&mut self, line: usize) -> EvalResult<()> {
        self.steps = self.steps.wrapping_add(1);

        if let Some(hook) = self.hook.as_mut()
           && self.steps % self.options.check_interval.max(1) == 0
           && hook.should_interrupt(self.steps)
        {
            tracing::debug!(steps = self.steps, line, "interrupt hook aborted execution");
            return Err(RuntimeError::ExecutionAborted { line });
        }
        Ok(())
    }

    /// Enters a function call, failing when the nesting limit is reached.
    pub(crate) fn enter_call(&mut self, line: usize) -> EvalResult<()> {
        if self.depth >= self.options.max_call_depth {
            return Err(RuntimeError::StackOverflow { line });
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) const fn leave_call(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Runs a block in a new scope nested in `env`.
    pub(crate) fn exec_block(&mut self, block: &Block, env: &Rc<Environment>) -> EvalResult<Flow> {
        let scope = Environment::with_parent(env);
        self.exec_statements(block, &scope)
    }

    /// Runs statements in order starting in `env`, stopping at the first
    /// `break` or `return`.
    pub(crate) fn exec_statements(&mut self, block: &Block, env: &Rc<Environment>)
                                  -> EvalResult<Flow> {
        Ok(self.exec_statements_in_scope(block, env)?.0)
    }

    /// Like [`Context::exec_statements`], also returning the scope the block
    /// ended in. Every `local` opens a child scope, so this is the one that
    /// sees all of the block's locals.
    pub(crate) fn exec_statements_in_scope(&mut self, block: &Block, env: &Rc<Environment>)
                                           -> EvalResult<(Flow, Rc<Environment>)> {
        let mut scope = Rc::clone(env);
        for statement in block {
            self.tick(statement.line())?;
            let flow = self.exec_statement(statement, &mut scope)?;
            if !matches!(flow, Flow::Normal) {
                return Ok((flow, scope));
            }
        }
        Ok((Flow::Normal, scope))
    }

    /// Evaluates an expression to a single value.
    ///
    /// This is the main entry point for expression evaluation. Calls and `...`
    /// are truncated to their first value (or `nil`).
    pub fn eval(&mut self, expr: &Expr, env: &Rc<Environment>) -> EvalResult<Value> {
        match expr {
            Expr::Nil { .. } => Ok(Value::Nil),
            Expr::Boolean { value, .. } => Ok(Value::Boolean(*value)),
            Expr::Number { value, .. } => Ok(Value::Number(*value)),
            Expr::String { value, .. } => Ok(Value::String(Rc::clone(value))),
            Expr::Vararg { .. } => Ok(env.varargs().first().cloned().unwrap_or(Value::Nil)),
            Expr::Variable { name, line } => self.eval_variable(name, *line, env),
            Expr::UnaryOp { op, expr, line } => {
                let operand = self.eval(expr, env)?;
                Self::eval_unary(*op, &operand, *line)
            },
            Expr::BinaryOp { left, op, right, line } => {
                self.eval_binary_op(left, *op, right, *line, env)
            },
            Expr::Table { entries, .. } => self.eval_table_constructor(entries, env),
            Expr::Index { table, key, line } => self.eval_index(table, key, *line, env),
            Expr::Call { .. } | Expr::MethodCall { .. } => {
                Ok(self.eval_multi(expr, env)?.into_iter().next().unwrap_or(Value::Nil))
            },
            Expr::Paren { expr, .. } => self.eval(expr, env),
            Expr::Function { body, .. } => {
                Ok(Value::from(Function::Closure { body: Rc::clone(body),
                                                   env:  Rc::clone(env), }))
            },
        }
    }

    /// Evaluates an expression to all of its values.
    ///
    /// Calls yield every returned value and `...` every variadic argument;
    /// any other expression yields exactly one value.
    pub fn eval_multi(&mut self, expr: &Expr, env: &Rc<Environment>) -> EvalResult<Vec<Value>> {
        match expr {
            Expr::Call { callee, arguments, line } => {
                let function = self.eval(callee, env)?;
                let args = self.eval_list(arguments, env)?;
                self.call_value(&function, args, *line)
            },
            Expr::MethodCall { object,
                               method,
                               arguments,
                               line, } => {
                let receiver = self.eval(object, env)?;
                let function = receiver.as_table(*line)?
                                       .borrow()
                                       .get(&Value::from(method.as_str()));
                let mut args = Vec::with_capacity(arguments.len() + 1);
                args.push(receiver);
                args.extend(self.eval_list(arguments, env)?);
                self.call_value(&function, args, *line)
            },
            Expr::Vararg { .. } => Ok(env.varargs().to_vec()),
            _ => Ok(vec![self.eval(expr, env)?]),
        }
    }

    /// Evaluates an expression list left to right. Only the last expression
    /// contributes more than one value.
    pub fn eval_list(&mut self, exprs: &[Expr], env: &Rc<Environment>) -> EvalResult<Vec<Value>> {
        let mut values = Vec::with_capacity(exprs.len());

        if let Some((last, init)) = exprs.split_last() {
            for expr in init {
                values.push(self.eval(expr, env)?);
            }
            values.extend(self.eval_multi(last, env)?);
        }

        Ok(values)
    }

    /// Resolves a variable through the scope chain.
    ///
    /// # Errors
    /// `UndefinedVariable` if no scope binds the name and strict globals are
    /// enabled.
    fn eval_variable(&self, name: &str, line: usize, env: &Environment) -> EvalResult<Value> {
        match env.get(name) {
            Some(value) => Ok(value),
            None if self.options.strict_globals => {
                Err(RuntimeError::UndefinedVariable { name: name.to_string(),
                                                      line })
            },
            None => Ok(Value::Nil),
        }
    }

    /// Binds a value to a name: the nearest enclosing declaration if there is
    /// one, a global otherwise.
    pub(crate) fn assign_variable(&self, name: &str, value: Value, env: &Environment) {
        if !env.assign(name, value.clone()) {
            self.globals.declare(name, value);
        }
    }
}
