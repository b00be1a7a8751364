/// Represents all errors that can occur while parsing a token stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Found a token other than the one the grammar requires here.
    #[error("Error on line {line}: Expected {expected} but found {found}.")]
    UnexpectedToken {
        /// Description of what the parser was looking for.
        expected: String,
        /// The token encountered.
        found:    String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Reached the end of input while a construct was still open.
    #[error("Error on line {line}: Expected {expected} but reached the end of input.")]
    UnexpectedEnd {
        /// Description of what the parser was looking for.
        expected: String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A `return` statement followed by further statements in its block.
    #[error("Error on line {line}: 'return' must be the last statement of a block.")]
    MisplacedReturn {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A `break` statement with no enclosing loop in the same function.
    #[error("Error on line {line}: 'break' outside of a loop.")]
    MisplacedBreak {
        /// The source line where the error occurred.
        line: usize,
    },
    /// The left side of an assignment is not a variable or a field.
    #[error("Error on line {line}: Cannot assign to this expression.")]
    InvalidAssignmentTarget {
        /// The source line where the error occurred.
        line: usize,
    },
    /// `...` used inside a function that does not declare varargs.
    #[error("Error on line {line}: Cannot use '...' outside a vararg function.")]
    VarargOutsideFunction {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Expressions or blocks nested deeper than the parser allows.
    #[error("Error on line {line}: Too many nested expressions or blocks.")]
    TooDeeplyNested {
        /// The source line where the error occurred.
        line: usize,
    },
}

/// The category of a [`ParseError`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A token other than the one the grammar requires.
    UnexpectedToken,
    /// Input ended while a construct was still open.
    UnexpectedEnd,
    /// Statements after a `return` in the same block.
    MisplacedReturn,
    /// `break` outside of a loop.
    MisplacedBreak,
    /// An assignment to something that is not a variable or a field.
    InvalidAssignmentTarget,
    /// `...` in a function without a vararg parameter.
    VarargOutsideFunction,
    /// Nesting beyond the parser's limit.
    TooDeeplyNested,
}

impl ParseError {
    /// Gets the category of the error.
    #[must_use]
    pub const fn kind(&self) -> ParseErrorKind {
        match self {
            Self::UnexpectedToken { .. } => ParseErrorKind::UnexpectedToken,
            Self::UnexpectedEnd { .. } => ParseErrorKind::UnexpectedEnd,
            Self::MisplacedReturn { .. } => ParseErrorKind::MisplacedReturn,
            Self::MisplacedBreak { .. } => ParseErrorKind::MisplacedBreak,
            Self::InvalidAssignmentTarget { .. } => ParseErrorKind::InvalidAssignmentTarget,
            Self::VarargOutsideFunction { .. } => ParseErrorKind::VarargOutsideFunction,
            Self::TooDeeplyNested { .. } => ParseErrorKind::TooDeeplyNested,
        }
    }

    /// Gets the line number the error points at.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnexpectedToken { line, .. }
            | Self::UnexpectedEnd { line, .. }
            | Self::MisplacedReturn { line }
            | Self::MisplacedBreak { line }
            | Self::InvalidAssignmentTarget { line }
            | Self::VarargOutsideFunction { line }
            | Self::TooDeeplyNested { line } => *line,
        }
    }
}
