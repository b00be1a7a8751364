/// Binary operator evaluation logic.
///
/// Handles arithmetic with string coercion, concatenation, ordering,
/// equality and the short-circuit logical operators.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements arithmetic negation, logical NOT and the length operator.
pub mod unary;

/// Core evaluation logic and context management.
///
/// Contains the runtime context, evaluation options, the control-flow signal
/// and expression dispatch.
pub mod core;

/// Lexical scopes.
///
/// Chained, reference-counted environments mapping names to values.
pub mod environment;

/// Cooperative cancellation of long-running evaluations.
pub mod hook;

/// Statement execution.
///
/// Runs declarations, assignments, conditionals, `while` and `repeat` loops,
/// function declarations and returns.
pub mod statement;

/// Evaluation of numeric and generic `for` loops.
pub mod for_loop;

/// Table constructors and indexing.
pub mod table;

/// Utility functions for evaluation.
///
/// Provides value-list adjustment and argument checking shared by the
/// evaluator and the built-in functions.
pub mod utils;

/// Function evaluation.
///
/// Handles calls to closures and built-ins, and defines the built-in library.
pub mod function;
