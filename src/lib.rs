//! # moonwalk
//!
//! moonwalk is a tree-walking interpreter for a small language of the Lua
//! family, written in Rust. Source text is tokenized, parsed into an abstract
//! syntax tree and evaluated against chained lexical environments, with
//! closures, multiple results, tables and protected calls.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc, clippy::needless_pass_by_value)]

use std::rc::Rc;

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` and `Statement` enums and related types
/// that represent the syntactic structure of a chunk as a tree. The AST is
/// built by the parser and traversed by the evaluator.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs.
/// - Attaches the source line to every node for error reporting.
/// - Shares function bodies between the closures created from them.
pub mod ast;
/// Provides unified error types for lexing, parsing and evaluation.
///
/// Each phase has its own error enum carrying the offending line, and
/// [`Error`](error::Error) wraps all three for callers running the whole
/// pipeline.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Attaches line numbers and detailed messages for context.
/// - Exposes the category of each error through `kind()`.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation and the runtime
/// value representation.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and value
///   types.
/// - Provides entry points for parsing and evaluating user code.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// General utilities shared by several phases.
///
/// # Responsibilities
/// - Number syntax shared by numeric literals and string coercion.
/// - Rendering numbers the way the language prints them.
/// - Safe conversions between `usize`, `i64` and `f64`.
pub mod util;

pub use crate::{
    error::{Error, LexError, ParseError, RuntimeError},
    interpreter::{
        evaluator::{
            core::{Context, Options},
            environment::Environment,
            hook::{InterruptHook, StepBudget},
        },
        lexer::{Token, TokenKind, tokenize},
        parser::parse,
        value::core::Value,
    },
};
use crate::ast::Chunk;

/// Evaluates a parsed chunk and returns its first result.
///
/// The chunk runs against `globals` when given, so bindings persist between
/// calls, and against fresh globals holding the built-ins otherwise. The
/// result is the first value of the chunk's top-level `return`, or `nil` if
/// control falls off the end.
///
/// # Examples
/// ```
/// use moonwalk::{Context, Value, evaluate, parse, tokenize};
///
/// let tokens = tokenize("x = 41 return x + 1").collect::<Result<Vec<_>, _>>().unwrap();
/// let chunk = parse(&tokens).unwrap();
///
/// let globals = Context::default_globals();
/// assert_eq!(evaluate(&chunk, Some(&globals)).unwrap(), Value::Number(42.0));
/// assert_eq!(globals.get("x"), Some(Value::Number(41.0)));
/// ```
pub fn evaluate(chunk: &Chunk, globals: Option<&Rc<Environment>>) -> Result<Value, RuntimeError> {
    let globals = globals.map_or_else(Context::default_globals, Rc::clone);
    let mut context = Context::with_globals(globals, Options::default());

    Ok(context.execute(chunk)?.into_iter().next().unwrap_or(Value::Nil))
}

/// Runs source text through the whole pipeline with fresh globals and
/// returns the first value of its top-level `return`.
///
/// # Errors
/// Returns the first lexical, syntax or runtime error.
///
/// # Examples
/// ```
/// use moonwalk::{Value, run};
///
/// let source = "
///     local function fact(n)
///         if n <= 1 then return 1 end
///         return n * fact(n - 1)
///     end
///     return fact(5)
/// ";
/// assert_eq!(run(source).unwrap(), Value::Number(120.0));
///
/// // 'y' is not defined.
/// assert!(run("return y + 1").is_err());
/// ```
pub fn run(source: &str) -> Result<Value, Error> {
    let mut context = Context::new();
    Ok(context.run(source)?.into_iter().next().unwrap_or(Value::Nil))
}
