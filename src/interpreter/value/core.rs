use std::{cell::RefCell, rc::Rc};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{function::Function, table::Table},
    },
    util::num::{format_number, str_to_number},
};

/// Represents a runtime value in the interpreter.
///
/// Strings are immutable and shared. Tables and functions are reference
/// values: copies of a `Value` refer to the same table or function, and
/// equality between them is identity.
#[derive(Debug, Clone)]
pub enum Value {
    /// The absence of a value. Falsy.
    Nil,
    /// `true` or `false`. `false` is falsy.
    Boolean(bool),
    /// A double precision floating-point number.
    Number(f64),
    /// An immutable string.
    String(Rc<str>),
    /// A mutable table shared by reference.
    Table(Rc<RefCell<Table>>),
    /// A built-in or user-defined function.
    Function(Rc<Function>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Table(a), Self::Table(b)) => Rc::ptr_eq(a, b),
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(Rc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(Rc::from(v))
    }
}

impl From<Table> for Value {
    fn from(v: Table) -> Self {
        Self::Table(Rc::new(RefCell::new(v)))
    }
}

impl From<Function> for Value {
    fn from(v: Function) -> Self {
        Self::Function(Rc::new(v))
    }
}

impl Value {
    /// The name `type` reports for this value.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Table(_) => "table",
            Self::Function(_) => "function",
        }
    }

    /// Only `nil` and `false` are falsy.
    #[must_use]
    pub const fn is_truthy(&self) -> bool {
        !matches!(self, Self::Nil | Self::Boolean(false))
    }

    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Converts the value to a number, coercing numeric strings.
    ///
    /// # Returns
    /// - `Some(f64)`: for numbers and strings such as `" 10 "` or `"0x1F"`.
    /// - `None`: for everything else.
    ///
    /// # Example
    /// ```
    /// use moonwalk::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::from("  2.5 ").to_number(), Some(2.5));
    /// assert_eq!(Value::from("two").to_number(), None);
    /// assert_eq!(Value::Boolean(true).to_number(), None);
    /// ```
    #[must_use]
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::String(s) => str_to_number(s),
            _ => None,
        }
    }

    /// Returns the table this value refers to.
    ///
    /// # Errors
    /// `IndexOnNonTable` if the value is not a table.
    pub fn as_table(&self, line: usize) -> EvalResult<&Rc<RefCell<Table>>> {
        match self {
            Self::Table(table) => Ok(table),
            other => Err(RuntimeError::IndexOnNonTable { type_name: other.type_name(),
                                                         line }),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nil => write!(f, "nil"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{}", format_number(*n)),
            Self::String(s) => write!(f, "{s}"),
            Self::Table(t) => write!(f, "table: {:p}", Rc::as_ptr(t)),
            Self::Function(func) => match func.as_ref() {
                Function::Native { .. } => write!(f, "builtin: {:p}", Rc::as_ptr(func)),
                Function::Closure { .. } => write!(f, "function: {:p}", Rc::as_ptr(func)),
            },
        }
    }
}
