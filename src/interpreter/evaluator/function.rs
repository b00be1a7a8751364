/// General-purpose built-ins.
///
/// Type inspection, conversions, `select` and raw table access.
pub mod builtin;
/// The `print` function implementation.
///
/// Writes its arguments to the context's output sink.
pub mod print;
/// Table traversal built-ins: `next`, `pairs`, `ipairs` and `unpack`.
pub mod table;
/// Raising and catching errors: `error`, `assert` and `pcall`.
pub mod error;

pub mod core;
