use crate::interpreter::{evaluator::core::Context, value::core::Value};

impl Context {
    /// Decides `==` between two values.
    ///
    /// Values of different kinds are never equal and no coercion happens, so
    /// `1 == "1"` is false. Nil, booleans, numbers and strings compare by
    /// value; tables and functions by identity.
    ///
    /// # Example
    /// ```
    /// use moonwalk::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// assert!(Context::values_equal(&Value::from("a"), &Value::from("a")));
    /// assert!(!Context::values_equal(&Value::Number(1.0), &Value::from("1")));
    /// ```
    #[must_use]
    pub fn values_equal(left: &Value, right: &Value) -> bool {
        left == right
    }
}
