/// Numeric parsing and formatting helpers.
///
/// This module holds the number syntax shared by the lexer (numeric literals),
/// the evaluator (string to number coercion, `tonumber`) and the value
/// printer (`%.14g` rendering). Keeping them in one place guarantees that a
/// number printed by the interpreter lexes back to the same value.
pub mod num;
