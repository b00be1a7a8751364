use std::fmt;

/// The reason a lexeme could not be turned into a token.
///
/// `UnexpectedCharacter` is the default because it is what the lexer reports
/// for input no token pattern matches at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexErrorKind {
    /// A character that starts no token, such as `@` or `$`.
    #[default]
    UnexpectedCharacter,
    /// A numeric lexeme that does not follow the number grammar (`3.`,
    /// `1.2.3`, `1e`, `0x`, `12abc`).
    InvalidNumber,
    /// A quoted string that hits a line break or the end of input before its
    /// closing quote, or a long string without `]]`.
    UnterminatedString,
    /// A backslash escape the language does not define.
    InvalidEscape,
    /// A `--[[` block comment without its closing `]]`.
    UnterminatedComment,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            Self::UnexpectedCharacter => "Unexpected character",
            Self::InvalidNumber => "Malformed number",
            Self::UnterminatedString => "Unfinished string",
            Self::InvalidEscape => "Invalid escape sequence",
            Self::UnterminatedComment => "Unfinished long comment",
        };
        f.write_str(description)
    }
}

/// An error raised while tokenizing source text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Error on line {line}: {kind} near '{lexeme}'.")]
pub struct LexError {
    /// What went wrong.
    pub kind:   LexErrorKind,
    /// The offending source text.
    pub lexeme: String,
    /// The source line where the error occurred.
    pub line:   usize,
}
