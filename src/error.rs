/// Lexical errors.
///
/// Raised while turning source text into tokens: malformed numbers,
/// unterminated strings or comments, bad escapes and stray characters.
pub mod lex_error;
/// Parsing errors.
///
/// Defines all error types that can occur while building the syntax tree from
/// tokens. A parse error is always fatal to the current parse; no partial tree
/// is returned.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation, including
/// the value thrown by the `error` built-in. Runtime errors unwind every
/// function frame until they reach a `pcall` boundary or the host.
pub mod runtime_error;

pub use lex_error::{LexError, LexErrorKind};
pub use parse_error::{ParseError, ParseErrorKind};
pub use runtime_error::{RuntimeError, RuntimeErrorKind};

/// Any failure of the tokenize, parse, evaluate pipeline.
///
/// The three stages keep disjoint error types; this enum lets a caller that
/// runs the whole pipeline propagate any of them with `?`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// The source could not be tokenized.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// The tokens do not form a valid chunk.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Evaluation failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    /// The source line the error points at.
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::Lex(e) => e.line,
            Self::Parse(e) => e.line(),
            Self::Runtime(e) => e.line(),
        }
    }
}
