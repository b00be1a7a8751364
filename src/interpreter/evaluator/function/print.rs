use std::io::Write;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

/// Writes its arguments to the context's output, separated by tabs and
/// followed by a newline. Returns nothing.
///
/// Values are formatted with their `Display` implementation, the same text
/// `tostring` produces.
///
/// # Example
/// ```
/// use std::{cell::RefCell, io::Write, rc::Rc};
///
/// use moonwalk::interpreter::{evaluator::{core::Context, function::print::print},
///                             value::core::Value};
///
/// #[derive(Clone, Default)]
/// struct Sink(Rc<RefCell<Vec<u8>>>);
///
/// impl Write for Sink {
///     fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
///         self.0.borrow_mut().write(buf)
///     }
///
///     fn flush(&mut self) -> std::io::Result<()> {
///         Ok(())
///     }
/// }
///
/// let sink = Sink::default();
/// let mut ctx = Context::new();
/// ctx.set_output(sink.clone());
///
/// let result = print(&mut ctx, vec![Value::Number(1.0), Value::from("a"), Value::Nil], 1);
///
/// assert!(result.unwrap().is_empty());
/// assert_eq!(sink.0.borrow().as_slice(), b"1\ta\tnil\n");
/// ```
pub fn print(ctx: &mut Context, args: Vec<Value>, line: usize) -> EvalResult<Vec<Value>> {
    let text = args.iter().map(ToString::to_string).collect::<Vec<_>>().join("\t");

    writeln!(ctx.output(), "{text}").map_err(|e| RuntimeError::Raised { value: Value::from(format!("print: {e}")),
                                                                         line })?;
    Ok(Vec::new())
}
