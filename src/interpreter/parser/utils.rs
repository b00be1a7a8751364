use std::rc::Rc;

use crate::{
    ast::Expr,
    interpreter::{
        lexer::TokenKind,
        parser::core::{ParseResult, Parser},
    },
};

impl Parser<'_> {
    /// Parses one or more comma-separated expressions.
    ///
    /// Grammar: `explist := expression { "," expression }`
    pub(super) fn parse_expression_list(&mut self) -> ParseResult<Vec<Expr>> {
        let mut items = vec![self.parse_expression()?];
        while self.consume_if(&TokenKind::Comma) {
            items.push(self.parse_expression()?);
        }
        Ok(items)
    }

    /// Parses one or more comma-separated identifiers.
    pub(super) fn parse_name_list(&mut self, expected: &str) -> ParseResult<Vec<String>> {
        let mut names = vec![self.expect_identifier(expected)?];
        while self.consume_if(&TokenKind::Comma) {
            names.push(self.expect_identifier(expected)?);
        }
        Ok(names)
    }

    /// Parses the arguments of a call.
    ///
    /// Besides a parenthesized list, a single table constructor or string
    /// literal may be passed without parentheses: `f{...}`, `f"text"`.
    pub(super) fn parse_call_arguments(&mut self) -> ParseResult<Vec<Expr>> {
        let token = self.peek();

        match &token.kind {
            TokenKind::String(value) => {
                self.advance();
                Ok(vec![Expr::String { value: Rc::from(value.as_str()),
                                       line:  token.line, }])
            },
            TokenKind::LBrace => Ok(vec![self.parse_table_constructor()?]),
            TokenKind::LParen => {
                self.advance();
                if self.consume_if(&TokenKind::RParen) {
                    return Ok(Vec::new());
                }
                let arguments = self.parse_expression_list()?;
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(arguments)
            },
            _ => Err(self.error_here("function arguments")),
        }
    }
}
