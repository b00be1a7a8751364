use crate::interpreter::value::core::Value;

/// Represents all errors that can occur during evaluation and runtime.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RuntimeError {
    /// An operation received operands of kinds it does not accept, such as
    /// adding a table or comparing a number with a string.
    #[error("Error on line {line}: Type error: {details}.")]
    TypeMismatch {
        /// Details about the type mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Read a name that is bound nowhere while strict globals are enabled.
    #[error("Error on line {line}: Undefined variable '{name}'.")]
    UndefinedVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A numeric `for` loop with a step of zero.
    #[error("Error on line {line}: 'for' step is zero.")]
    InvalidForStep {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An arithmetic operation without a defined result, such as a modulo by
    /// zero.
    #[error("Error on line {line}: {details}.")]
    DivisionSemanticsViolation {
        /// Details describing the operation.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Tried to call a value that is not a function.
    #[error("Error on line {line}: Attempt to call a {type_name} value.")]
    NotCallable {
        /// The type of the value that was called.
        type_name: &'static str,
        /// The source line where the error occurred.
        line:      usize,
    },
    /// Tried to index a value that is not a table.
    #[error("Error on line {line}: Attempt to index a {type_name} value.")]
    IndexOnNonTable {
        /// The type of the value that was indexed.
        type_name: &'static str,
        /// The source line where the error occurred.
        line:      usize,
    },
    /// The interrupt hook asked evaluation to stop.
    #[error("Error on line {line}: Execution aborted.")]
    ExecutionAborted {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Tried to store a value under `nil` or NaN.
    #[error("Error on line {line}: Table index is {details}.")]
    InvalidTableKey {
        /// Which key was rejected.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A built-in function received an argument it cannot work with.
    #[error("Error on line {line}: Bad argument to '{function}': {details}.")]
    ArgumentError {
        /// The name of the built-in function.
        function: &'static str,
        /// Details about why the argument is invalid.
        details:  String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Nested calls exceeded the configured maximum depth.
    #[error("Error on line {line}: Stack overflow.")]
    StackOverflow {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A value thrown by `error` or a failed `assert`.
    #[error("Error on line {line}: {}", describe_raised(value))]
    Raised {
        /// The value passed to `error`.
        value: Value,
        /// The source line where the error occurred.
        line:  usize,
    },
}

/// The category of a [`RuntimeError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    /// Operands of a kind the operation does not accept.
    TypeMismatch,
    /// A read of an unbound name under strict globals.
    UndefinedVariable,
    /// A numeric `for` with a zero step.
    InvalidForStep,
    /// An arithmetic operation without a defined result.
    DivisionSemanticsViolation,
    /// A call of a value that is not a function.
    NotCallable,
    /// Indexing a value that is not a table.
    IndexOnNonTable,
    /// Stopped by the interrupt hook.
    ExecutionAborted,
    /// A table write under `nil` or NaN.
    InvalidTableKey,
    /// A built-in rejected one of its arguments.
    ArgumentError,
    /// Calls nested deeper than the configured limit.
    StackOverflow,
    /// A value thrown by `error` or `assert`.
    Raised,
}

impl RuntimeError {
    /// Gets the category of the error.
    #[must_use]
    pub const fn kind(&self) -> RuntimeErrorKind {
        match self {
            Self::TypeMismatch { .. } => RuntimeErrorKind::TypeMismatch,
            Self::UndefinedVariable { .. } => RuntimeErrorKind::UndefinedVariable,
            Self::InvalidForStep { .. } => RuntimeErrorKind::InvalidForStep,
            Self::DivisionSemanticsViolation { .. } => RuntimeErrorKind::DivisionSemanticsViolation,
            Self::NotCallable { .. } => RuntimeErrorKind::NotCallable,
            Self::IndexOnNonTable { .. } => RuntimeErrorKind::IndexOnNonTable,
            Self::ExecutionAborted { .. } => RuntimeErrorKind::ExecutionAborted,
            Self::InvalidTableKey { .. } => RuntimeErrorKind::InvalidTableKey,
            Self::ArgumentError { .. } => RuntimeErrorKind::ArgumentError,
            Self::StackOverflow { .. } => RuntimeErrorKind::StackOverflow,
            Self::Raised { .. } => RuntimeErrorKind::Raised,
        }
    }

    /// Gets the line number the error points at.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::TypeMismatch { line, .. }
            | Self::UndefinedVariable { line, .. }
            | Self::InvalidForStep { line }
            | Self::DivisionSemanticsViolation { line, .. }
            | Self::NotCallable { line, .. }
            | Self::IndexOnNonTable { line, .. }
            | Self::ExecutionAborted { line }
            | Self::InvalidTableKey { line, .. }
            | Self::ArgumentError { line, .. }
            | Self::StackOverflow { line }
            | Self::Raised { line, .. } => *line,
        }
    }

    /// Converts the error into the value `pcall` hands back to the script.
    ///
    /// Raised values are passed through untouched; every other error becomes
    /// its message string.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Self::Raised { value, .. } => value,
            other => Value::from(other.to_string()),
        }
    }
}

fn describe_raised(value: &Value) -> String {
    match value {
        Value::String(text) => text.to_string(),
        Value::Number(_) => value.to_string(),
        other => format!("(error object is a {} value)", other.type_name()),
    }
}
