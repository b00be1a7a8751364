/// Operator dispatch and the short-circuit operators.
pub mod core;

/// Arithmetic operators with numeric string coercion.
pub mod arithmetic;

/// Ordering operators on numbers and strings.
pub mod comparison;

/// Equality.
pub mod logic;

/// String concatenation.
pub mod concat;
