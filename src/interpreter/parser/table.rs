use std::rc::Rc;

use crate::{
    ast::{Expr, TableEntry},
    interpreter::{
        lexer::TokenKind,
        parser::core::{ParseResult, Parser},
    },
};

impl Parser<'_> {
    /// Parses a table constructor.
    ///
    /// Grammar:
    /// ```text
    ///     table := "{" [ field { sep field } [ sep ] ] "}"
    ///     field := "[" expression "]" "=" expression
    ///            | Name "=" expression
    ///            | expression
    ///     sep   := "," | ";"
    /// ```
    /// Entries keep their written order; positional entries carry no key.
    pub(super) fn parse_table_constructor(&mut self) -> ParseResult<Expr> {
        let line = self.expect(&TokenKind::LBrace, "'{'")?.line;
        let mut entries = Vec::new();

        while !self.check(&TokenKind::RBrace) {
            entries.push(self.parse_table_entry()?);
            if !self.consume_if(&TokenKind::Comma) && !self.consume_if(&TokenKind::Semicolon) {
                break;
            }
        }
        self.expect(&TokenKind::RBrace, "'}'")?;

        Ok(Expr::Table { entries, line })
    }

    fn parse_table_entry(&mut self) -> ParseResult<TableEntry> {
        if self.consume_if(&TokenKind::LBracket) {
            let key = self.parse_expression()?;
            self.expect(&TokenKind::RBracket, "']'")?;
            self.expect(&TokenKind::Equals, "'='")?;
            let value = self.parse_expression()?;
            return Ok(TableEntry { key: Some(key),
                                   value });
        }

        if let TokenKind::Identifier(name) = self.peek_kind()
           && self.peek_second().kind == TokenKind::Equals
        {
            let line = self.advance().line;
            self.advance();
            let value = self.parse_expression()?;
            return Ok(TableEntry { key: Some(Expr::String { value: Rc::from(name.as_str()),
                                                            line }),
                                   value });
        }

        Ok(TableEntry { key:   None,
                        value: self.parse_expression()?, })
    }
}
