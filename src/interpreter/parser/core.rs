use crate::{
    ast::{Chunk, Expr},
    error::ParseError,
    interpreter::lexer::{Token, TokenKind},
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Maximum number of syntax levels (nested expressions, operator chains,
/// suffixes and blocks) in one chunk.
pub const MAX_NESTING: usize = 200;

/// Stands in for the end of a token slice that lacks a trailing `Eof` token.
static EOF: Token = Token { kind:   TokenKind::Eof,
                            lexeme: String::new(),
                            line:   0, };

/// A recursive-descent parser over a token slice.
///
/// The parser never recovers: the first grammar violation is returned as a
/// [`ParseError`] and no partial tree is produced.
///
/// Besides the cursor it tracks the context needed for the checks the grammar
/// cannot express: how many loops of the current function enclose the
/// current position (for `break`), and whether the current function accepts
/// varargs (for `...`). It also counts syntax levels so that input nested
/// beyond [`MAX_NESTING`] is rejected before it can exhaust the stack of the
/// parser or, later, of the evaluator.
pub struct Parser<'a> {
    tokens:                    &'a [Token],
    position:                  usize,
    pub(super) loop_depth:     usize,
    pub(super) vararg_allowed: bool,
    pub(super) nesting:        usize,
}

/// Parses a complete token stream into a [`Chunk`].
///
/// The tokens must come from [`tokenize`](crate::interpreter::lexer::tokenize)
/// (or an equivalent sequence ending with `Eof`).
///
/// # Errors
/// Returns the first [`ParseError`] encountered.
///
/// # Example
/// ```
/// use moonwalk::{ast::Statement, interpreter::{lexer::tokenize, parser::parse}};
///
/// let tokens: Vec<_> = tokenize("local x = 1\nreturn x").collect::<Result<_, _>>().unwrap();
/// let chunk = parse(&tokens).unwrap();
/// assert!(matches!(chunk.body[1], Statement::Return { line: 2, .. }));
/// ```
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn parse(tokens: &[Token]) -> ParseResult<Chunk> {
    Parser::new(tokens).parse_chunk()
}

impl<'a> Parser<'a> {
    /// Creates a parser positioned at the first token.
    #[must_use]
    pub const fn new(tokens: &'a [Token]) -> Self {
        Self { tokens,
               position: 0,
               loop_depth: 0,
               vararg_allowed: true,
               nesting: 0 }
    }

    /// Parses the whole input as the body of the main chunk, which behaves
    /// like a vararg function.
    pub fn parse_chunk(mut self) -> ParseResult<Chunk> {
        self.vararg_allowed = true;
        let body = self.parse_block()?;
        self.expect(&TokenKind::Eof, "end of input")?;
        Ok(Chunk { body })
    }

    /// Parses a full expression.
    ///
    /// This is the entry point for expression parsing. It starts at the lowest
    /// precedence level and climbs through the operator table.
    pub fn parse_expression(&mut self) -> ParseResult<Expr> {
        self.parse_subexpression(0)
    }

    /// The current token, without consuming it.
    pub(super) fn peek(&self) -> &'a Token {
        self.tokens.get(self.position).unwrap_or(&EOF)
    }

    /// The token after the current one.
    pub(super) fn peek_second(&self) -> &'a Token {
        self.tokens.get(self.position + 1).unwrap_or(&EOF)
    }

    pub(super) fn peek_kind(&self) -> &'a TokenKind {
        &self.peek().kind
    }

    /// The line of the current token. Past the end this is the line of the
    /// last token.
    pub(super) fn line(&self) -> usize {
        self.tokens
            .get(self.position)
            .or_else(|| self.tokens.last())
            .map_or(1, |token| token.line)
    }

    /// Consumes the current token. The cursor never moves past the end.
    pub(super) fn advance(&mut self) -> &'a Token {
        let token = self.peek();
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    pub(super) fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// Consumes the current token if it has the given kind.
    pub(super) fn consume_if(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes a token of the given kind or fails naming `expected`.
    pub(super) fn expect(&mut self, kind: &TokenKind, expected: &str) -> ParseResult<&'a Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.error_here(expected))
        }
    }

    /// Goes one syntax level deeper. Callers restore `nesting` when the
    /// construct is complete.
    ///
    /// # Errors
    /// `TooDeeplyNested` once [`MAX_NESTING`] levels are open.
    pub(super) fn enter_level(&mut self) -> ParseResult<()> {
        if self.nesting >= MAX_NESTING {
            return Err(ParseError::TooDeeplyNested { line: self.line() });
        }
        self.nesting += 1;
        Ok(())
    }

    /// Consumes an identifier and returns its name.
    pub(super) fn expect_identifier(&mut self, expected: &str) -> ParseResult<String> {
        match self.peek_kind() {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(name.clone())
            },
            _ => Err(self.error_here(expected)),
        }
    }

    /// Builds the error for finding the current token where `expected` was
    /// required.
    pub(super) fn error_here(&self, expected: &str) -> ParseError {
        let token = self.peek();
        if token.kind == TokenKind::Eof {
            ParseError::UnexpectedEnd { expected: expected.to_string(),
                                        line:     self.line(), }
        } else {
            ParseError::UnexpectedToken { expected: expected.to_string(),
                                          found:    token.describe(),
                                          line:     token.line, }
        }
    }

    /// Whether the current token closes a block.
    pub(super) fn at_block_end(&self) -> bool {
        matches!(self.peek_kind(),
                 TokenKind::End
                 | TokenKind::Else
                 | TokenKind::ElseIf
                 | TokenKind::Until
                 | TokenKind::Eof)
    }
}
