/// Parser state, token navigation and the chunk entry point.
///
/// Declares [`core::Parser`], the cursor over the token slice, along with the
/// helpers every other parser module uses to peek, consume and report errors.
pub mod core;

/// Block parsing.
///
/// Parses statement sequences up to a block terminator and enforces that
/// `return` ends its block.
pub mod block;

/// Statement parsing.
///
/// Recursive descent over every statement form: declarations, assignments,
/// control structures, function declarations and call statements.
pub mod statement;

/// Binary operator parsing by precedence climbing.
pub mod binary;

/// Unary operators, primary and suffixed expressions.
///
/// Handles literals, variables, parentheses, function literals and the
/// postfix chain of field accesses, indexing and calls.
pub mod unary;

/// Table constructors.
pub mod table;

/// Shared list helpers: expression lists, name lists and call arguments.
pub mod utils;

pub use self::core::{ParseResult, Parser, parse};
