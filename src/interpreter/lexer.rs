use logos::{FilterResult, Lexer, Logos};

use crate::{
    error::{LexError, LexErrorKind},
    util::num::parse_literal,
};

/// The kind of a lexical token together with its decoded payload.
///
/// Produced by the `logos` derive. Whitespace, newlines and comments are
/// consumed by skip callbacks and never reach the caller; `Eof` is appended by
/// [`Tokens`] once the source is exhausted.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
#[logos(error = LexErrorKind)]
pub enum TokenKind {
    /// Numeric literals such as `3`, `.5`, `2.5e-3` or `0xFF`.
    ///
    /// The pattern is deliberately greedy so that `3.`, `1.2.3` or `12abc` are
    /// taken as one lexeme and rejected as a whole.
    #[regex(r"[0-9]([0-9a-zA-Z_.]|[eE][+-])*", lex_number)]
    #[regex(r"\.[0-9]([0-9a-zA-Z_.]|[eE][+-])*", lex_number)]
    Number(f64),
    /// Quoted string literal, with escapes already decoded.
    #[regex(r#""([^"\\\n]|\\(.|\n))*""#, lex_quoted)]
    #[regex(r#"'([^'\\\n]|\\(.|\n))*'"#, lex_quoted)]
    #[token("[[", lex_long_string)]
    String(String),
    /// A string that reaches a line break or the end of input before its
    /// closing quote. Never produced; the callback always fails.
    #[regex(r#""([^"\\\n]|\\(.|\n))*"#, unterminated)]
    #[regex(r#"'([^'\\\n]|\\(.|\n))*"#, unterminated)]
    UnterminatedString,
    /// Identifiers such as `x`, `_tmp` or `print`.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    /// `and`
    #[token("and")]
    And,
    /// `break`
    #[token("break")]
    Break,
    /// `do`
    #[token("do")]
    Do,
    /// `else`
    #[token("else")]
    Else,
    /// `elseif`
    #[token("elseif")]
    ElseIf,
    /// `end`
    #[token("end")]
    End,
    /// `false`
    #[token("false")]
    False,
    /// `for`
    #[token("for")]
    For,
    /// `function`
    #[token("function")]
    Function,
    /// `if`
    #[token("if")]
    If,
    /// `in`
    #[token("in")]
    In,
    /// `local`
    #[token("local")]
    Local,
    /// `nil`
    #[token("nil")]
    Nil,
    /// `not`
    #[token("not")]
    Not,
    /// `or`
    #[token("or")]
    Or,
    /// `repeat`
    #[token("repeat")]
    Repeat,
    /// `return`
    #[token("return")]
    Return,
    /// `then`
    #[token("then")]
    Then,
    /// `true`
    #[token("true")]
    True,
    /// `until`
    #[token("until")]
    Until,
    /// `while`
    #[token("while")]
    While,

    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `^`
    #[token("^")]
    Caret,
    /// `#`
    #[token("#")]
    Hash,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `~=`
    #[token("~=")]
    TildeEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `=`
    #[token("=")]
    Equals,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `:`
    #[token(":")]
    Colon,
    /// `,`
    #[token(",")]
    Comma,
    /// `.`
    #[token(".")]
    Dot,
    /// `..`
    #[token("..")]
    DotDot,
    /// `...`
    #[token("...")]
    Ellipsis,

    /// `-- line comments` and `--[[ block comments ]]`.
    #[token("--", lex_comment)]
    Comment,
    /// Line breaks advance the line counter.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        logos::Skip
    })]
    NewLine,
    /// Spaces, tabs and feeds.
    #[regex(r"[ \t\r\f\x0B]+", logos::skip)]
    Ignored,

    /// End of input. Appended by [`Tokens`], never matched by the lexer.
    Eof,
}

/// The broad category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    EndOfInput,
    Identifier,
    Keyword,
    Number,
    String,
    Symbol,
}

impl TokenKind {
    /// Classifies the token.
    #[must_use]
    pub const fn class(&self) -> TokenClass {
        match self {
            Self::Eof => TokenClass::EndOfInput,
            Self::Identifier(_) => TokenClass::Identifier,
            Self::Number(_) => TokenClass::Number,
            Self::String(_) | Self::UnterminatedString => TokenClass::String,
            Self::And
            | Self::Break
            | Self::Do
            | Self::Else
            | Self::ElseIf
            | Self::End
            | Self::False
            | Self::For
            | Self::Function
            | Self::If
            | Self::In
            | Self::Local
            | Self::Nil
            | Self::Not
            | Self::Or
            | Self::Repeat
            | Self::Return
            | Self::Then
            | Self::True
            | Self::Until
            | Self::While => TokenClass::Keyword,
            _ => TokenClass::Symbol,
        }
    }
}

/// A token with the source text it was read from and its line.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind:   TokenKind,
    /// The raw source text of the token. Empty for `Eof`.
    pub lexeme: String,
    pub line:   usize,
}

impl Token {
    /// Renders the token for error messages: `'lexeme'`, or `end of input`.
    #[must_use]
    pub fn describe(&self) -> String {
        if self.kind == TokenKind::Eof {
            "end of input".to_string()
        } else {
            format!("'{}'", self.lexeme)
        }
    }
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number for error reporting and diagnostics.
#[derive(Debug, Clone)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line:    usize,
    /// Line breaks inside the token just produced. They are applied after the
    /// token so it keeps the line it started on.
    pub pending: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line: 1, pending: 0 }
    }
}

/// A lazy, restartable stream of tokens over a source string.
///
/// Yields `Ok(Token)` for every lexeme, `Err(LexError)` for every malformed
/// one, and a single `Eof` token at the end. Cloning the stream before it is
/// consumed restarts tokenization from that point.
#[derive(Clone)]
pub struct Tokens<'src> {
    lexer:    Lexer<'src, TokenKind>,
    finished: bool,
}

/// Splits source text into tokens.
///
/// # Example
/// ```
/// use moonwalk::interpreter::lexer::{TokenKind, tokenize};
///
/// let kinds: Vec<TokenKind> = tokenize("local x = 1")
///     .map(|token| token.map(|t| t.kind))
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(kinds,
///            vec![TokenKind::Local,
///                 TokenKind::Identifier("x".to_string()),
///                 TokenKind::Equals,
///                 TokenKind::Number(1.0),
///                 TokenKind::Eof]);
/// ```
#[must_use]
pub fn tokenize(source: &str) -> Tokens<'_> {
    Tokens { lexer:    TokenKind::lexer_with_extras(source, LexerExtras::default()),
             finished: false, }
}

impl Iterator for Tokens<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let Some(result) = self.lexer.next() else {
            self.finished = true;
            return Some(Ok(Token { kind:   TokenKind::Eof,
                                   lexeme: String::new(),
                                   line:   self.lexer.extras.line, }));
        };

        let extras = &mut self.lexer.extras;
        let line = extras.line;
        extras.line += std::mem::take(&mut extras.pending);
        let lexeme = self.lexer.slice().to_string();

        Some(match result {
                 Ok(kind) => Ok(Token { kind, lexeme, line }),
                 Err(kind) => Err(LexError { kind, lexeme, line }),
             })
    }
}

fn lex_number(lex: &Lexer<TokenKind>) -> Result<f64, LexErrorKind> {
    parse_literal(lex.slice()).ok_or(LexErrorKind::InvalidNumber)
}

fn unterminated(_: &Lexer<TokenKind>) -> Result<(), LexErrorKind> {
    Err(LexErrorKind::UnterminatedString)
}

/// Decodes a quoted literal. Escaped line breaks are counted so the following
/// tokens keep accurate lines.
fn lex_quoted(lex: &mut Lexer<TokenKind>) -> Result<String, LexErrorKind> {
    let slice = lex.slice();
    let body = &slice[1..slice.len() - 1];
    lex.extras.pending += body.matches('\n').count();
    unescape(body)
}

/// Reads a level-0 long string `[[ ... ]]`. A line break directly after the
/// opening brackets is not part of the string.
fn lex_long_string(lex: &mut Lexer<TokenKind>) -> Result<String, LexErrorKind> {
    let remainder = lex.remainder();
    let Some(close) = remainder.find("]]") else {
        lex.bump(remainder.len());
        return Err(LexErrorKind::UnterminatedString);
    };

    let raw = &remainder[..close];
    lex.extras.pending += raw.matches('\n').count();
    let content = raw.strip_prefix("\r\n")
                     .or_else(|| raw.strip_prefix('\n'))
                     .unwrap_or(raw)
                     .to_string();
    lex.bump(close + 2);
    Ok(content)
}

fn lex_comment(lex: &mut Lexer<TokenKind>) -> FilterResult<(), LexErrorKind> {
    let remainder = lex.remainder();

    if let Some(block) = remainder.strip_prefix("[[") {
        return if let Some(close) = block.find("]]") {
            lex.extras.line += block[..close].matches('\n').count();
            lex.bump(2 + close + 2);
            FilterResult::Skip
        } else {
            lex.bump(remainder.len());
            FilterResult::Error(LexErrorKind::UnterminatedComment)
        };
    }

    lex.bump(remainder.find('\n').unwrap_or(remainder.len()));
    FilterResult::Skip
}

/// Resolves backslash escapes inside a quoted string body.
///
/// Decimal (`\65`) and hexadecimal (`\x41`) escapes name a byte; bytes above
/// 127 are mapped to the code point of the same value.
fn unescape(body: &str) -> Result<String, LexErrorKind> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        let Some(escape) = chars.next() else {
            return Err(LexErrorKind::InvalidEscape);
        };
        match escape {
            'n' | '\n' => out.push('\n'),
            '\r' => {
                chars.next_if_eq(&'\n');
                out.push('\n');
            },
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\x07'),
            'b' => out.push('\x08'),
            'f' => out.push('\x0C'),
            'v' => out.push('\x0B'),
            '\\' | '"' | '\'' => out.push(escape),
            'x' => {
                let mut value = 0;
                for _ in 0..2 {
                    let digit = chars.next()
                                     .and_then(|d| d.to_digit(16))
                                     .ok_or(LexErrorKind::InvalidEscape)?;
                    value = value * 16 + digit;
                }
                out.push(byte_char(value)?);
            },
            'u' => {
                if chars.next() != Some('{') {
                    return Err(LexErrorKind::InvalidEscape);
                }
                let mut value: u32 = 0;
                let mut digits = 0;
                while let Some(digit) = chars.next_if(char::is_ascii_hexdigit) {
                    let digit = digit.to_digit(16).ok_or(LexErrorKind::InvalidEscape)?;
                    value = value.checked_mul(16)
                                 .and_then(|v| v.checked_add(digit))
                                 .ok_or(LexErrorKind::InvalidEscape)?;
                    digits += 1;
                }
                if digits == 0 || chars.next() != Some('}') {
                    return Err(LexErrorKind::InvalidEscape);
                }
                out.push(char::from_u32(value).ok_or(LexErrorKind::InvalidEscape)?);
            },
            d if d.is_ascii_digit() => {
                let mut value = d.to_digit(10).unwrap_or(0);
                for _ in 0..2 {
                    match chars.next_if(char::is_ascii_digit).and_then(|d| d.to_digit(10)) {
                        Some(digit) => value = value * 10 + digit,
                        None => break,
                    }
                }
                out.push(byte_char(value)?);
            },
            _ => return Err(LexErrorKind::InvalidEscape),
        }
    }

    Ok(out)
}

fn byte_char(value: u32) -> Result<char, LexErrorKind> {
    u8::try_from(value).map(char::from)
                       .map_err(|_| LexErrorKind::InvalidEscape)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).map(|t| t.map(|t| t.kind))
                        .collect::<Result<_, _>>()
                        .unwrap()
    }

    fn first_error(source: &str) -> LexError {
        tokenize(source).find_map(Result::err).unwrap()
    }

    #[test]
    fn longest_match_for_operators() {
        assert_eq!(kinds("a ... .. . == = ~= <= >="),
                   vec![TokenKind::Identifier("a".to_string()),
                        TokenKind::Ellipsis,
                        TokenKind::DotDot,
                        TokenKind::Dot,
                        TokenKind::EqualEqual,
                        TokenKind::Equals,
                        TokenKind::TildeEqual,
                        TokenKind::LessEqual,
                        TokenKind::GreaterEqual,
                        TokenKind::Eof]);
    }

    #[test]
    fn keywords_and_identifiers() {
        let tokens: Vec<Token> = tokenize("elseif elseifx _end").collect::<Result<_, _>>().unwrap();
        assert_eq!(tokens[0].kind.class(), TokenClass::Keyword);
        assert_eq!(tokens[1].kind, TokenKind::Identifier("elseifx".to_string()));
        assert_eq!(tokens[2].kind.class(), TokenClass::Identifier);
        assert_eq!(tokens[3].kind.class(), TokenClass::EndOfInput);
    }

    #[test]
    fn lines_survive_comments_and_long_strings() {
        let source = "a -- note\n--[[ one\ntwo ]] b\n[[\nx\ny]] c";
        let lines: Vec<(TokenKind, usize)> = tokenize(source).map(|t| t.map(|t| (t.kind, t.line)))
                                                             .collect::<Result<_, _>>()
                                                             .unwrap();
        assert_eq!(lines,
                   vec![(TokenKind::Identifier("a".to_string()), 1),
                        (TokenKind::Identifier("b".to_string()), 3),
                        (TokenKind::String("x\ny".to_string()), 4),
                        (TokenKind::Identifier("c".to_string()), 6),
                        (TokenKind::Eof, 6)]);
    }

    #[test]
    fn string_escapes() {
        assert_eq!(kinds(r#""a\tb\n\"q\" \65\x42\u{43} 'x'""#)[0],
                   TokenKind::String("a\tb\n\"q\" ABC 'x'".to_string()));
        assert_eq!(kinds(r"'it\'s'")[0], TokenKind::String("it's".to_string()));
    }

    #[test]
    fn number_forms() {
        assert_eq!(kinds("3 .5 2.5e-3 0x1F 1E2"),
                   vec![TokenKind::Number(3.0),
                        TokenKind::Number(0.5),
                        TokenKind::Number(0.0025),
                        TokenKind::Number(31.0),
                        TokenKind::Number(100.0),
                        TokenKind::Eof]);
    }

    #[test]
    fn malformed_input() {
        for (source, kind, line) in [("x = 3.", LexErrorKind::InvalidNumber, 1),
                                     ("\n1.2.3", LexErrorKind::InvalidNumber, 2),
                                     ("12abc", LexErrorKind::InvalidNumber, 1),
                                     ("s = \"abc\nd\"", LexErrorKind::UnterminatedString, 1),
                                     ("[[ open", LexErrorKind::UnterminatedString, 1),
                                     ("\n\n@", LexErrorKind::UnexpectedCharacter, 3),
                                     (r#""\q""#, LexErrorKind::InvalidEscape, 1),
                                     ("--[[ never closed", LexErrorKind::UnterminatedComment, 1)]
        {
            let error = first_error(source);
            assert_eq!((error.kind, error.line), (kind, line), "source: {source:?}");
        }
    }

    #[test]
    fn eof_is_last_and_unique() {
        let tokens: Vec<_> = tokenize("").collect();
        assert_eq!(tokens.len(), 1);
        assert!(matches!(&tokens[0], Ok(Token { kind: TokenKind::Eof, .. })));
    }

    #[test]
    fn cloning_restarts() {
        let tokens = tokenize("return 1");
        let first: Vec<_> = tokens.clone().collect();
        let second: Vec<_> = tokens.collect();
        assert_eq!(first, second);
    }
}
