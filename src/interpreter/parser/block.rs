use crate::{
    ast::{Block, Statement},
    error::ParseError,
    interpreter::{
        lexer::TokenKind,
        parser::core::{ParseResult, Parser},
    },
};

impl Parser<'_> {
    /// Parses statements until a block terminator (`end`, `else`, `elseif`,
    /// `until` or end of input). The terminator itself is left for the caller,
    /// which knows which one is valid.
    ///
    /// Grammar: `block := { statement [";"] } [ return_statement ]`
    ///
    /// # Errors
    /// - `MisplacedReturn` if a statement follows `return` in the same block.
    /// - Propagates any errors from statement parsing.
    /// - `TooDeeplyNested` past the nesting limit.
    pub fn parse_block(&mut self) -> ParseResult<Block> {
        let outer = self.nesting;
        let block = self.parse_statements();
        self.nesting = outer;
        block
    }

    fn parse_statements(&mut self) -> ParseResult<Block> {
        self.enter_level()?;
        let mut statements = Vec::new();

        loop {
            while self.consume_if(&TokenKind::Semicolon) {}
            if self.at_block_end() {
                break;
            }

            let statement = self.parse_statement()?;
            let is_return = matches!(statement, Statement::Return { .. });
            statements.push(statement);

            if is_return {
                self.consume_if(&TokenKind::Semicolon);
                if !self.at_block_end() {
                    return Err(ParseError::MisplacedReturn { line: self.line() });
                }
                break;
            }
        }

        Ok(statements)
    }

    /// Parses a block and the `end` that closes it.
    pub(super) fn parse_block_until_end(&mut self) -> ParseResult<Block> {
        let body = self.parse_block()?;
        self.expect(&TokenKind::End, "'end'")?;
        Ok(body)
    }

    /// Parses a loop body, counting it as an enclosing loop for `break`.
    pub(super) fn parse_loop_body(&mut self, terminator: &TokenKind, expected: &str)
                                  -> ParseResult<Block> {
        self.loop_depth += 1;
        let body = self.parse_block();
        self.loop_depth -= 1;
        let body = body?;
        self.expect(terminator, expected)?;
        Ok(body)
    }
}
