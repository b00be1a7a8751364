use std::rc::Rc;

use crate::{
    ast::{Expr, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::TokenKind,
        parser::core::{ParseResult, Parser},
    },
};

/// Maps a token to the unary operator it spells, if any.
#[must_use]
pub const fn token_to_unary_operator(token: &TokenKind) -> Option<UnaryOperator> {
    match token {
        TokenKind::Minus => Some(UnaryOperator::Negate),
        TokenKind::Not => Some(UnaryOperator::Not),
        TokenKind::Hash => Some(UnaryOperator::Length),
        _ => None,
    }
}

impl Parser<'_> {
    /// Parses literals, `...`, function literals, table constructors and
    /// suffixed expressions.
    ///
    /// # Errors
    /// - `VarargOutsideFunction` when `...` appears in a function without a
    ///   trailing `...` parameter.
    pub(super) fn parse_simple_expression(&mut self) -> ParseResult<Expr> {
        let token = self.peek();
        let line = token.line;

        let expr = match &token.kind {
            TokenKind::Nil => Expr::Nil { line },
            TokenKind::True => Expr::Boolean { value: true,
                                               line },
            TokenKind::False => Expr::Boolean { value: false,
                                                line },
            TokenKind::Number(value) => Expr::Number { value: *value,
                                                       line },
            TokenKind::String(value) => Expr::String { value: Rc::from(value.as_str()),
                                                       line },
            TokenKind::Ellipsis => {
                if !self.vararg_allowed {
                    return Err(ParseError::VarargOutsideFunction { line });
                }
                Expr::Vararg { line }
            },
            TokenKind::Function => {
                self.advance();
                let body = self.parse_function_body(line, false)?;
                return Ok(Expr::Function { body, line });
            },
            TokenKind::LBrace => return self.parse_table_constructor(),
            _ => return self.parse_suffixed_expression(),
        };

        self.advance();
        Ok(expr)
    }

    /// Parses a name or a parenthesized expression.
    ///
    /// Grammar: `primary := Name | "(" expression ")"`
    fn parse_primary_expression(&mut self) -> ParseResult<Expr> {
        let line = self.line();

        match self.peek_kind() {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Expr::Variable { name: name.clone(),
                                    line })
            },
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(Expr::Paren { expr: Box::new(inner),
                                 line })
            },
            _ => Err(self.error_here("an expression")),
        }
    }

    /// Parses a primary expression followed by any chain of field accesses,
    /// indexing, calls and method calls.
    ///
    /// Grammar:
    /// ```text
    ///     suffixed := primary { "." Name | "[" expression "]"
    ///                         | ":" Name args | args }
    ///     args     := "(" [ explist ] ")" | table | String
    /// ```
    pub(super) fn parse_suffixed_expression(&mut self) -> ParseResult<Expr> {
        let outer = self.nesting;
        let expr = self.parse_suffixes();
        self.nesting = outer;
        expr
    }

    /// Each suffix wraps the expression so far, which makes it one syntax
    /// level.
    fn parse_suffixes(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary_expression()?;

        loop {
            let line = self.line();
            if matches!(self.peek_kind(),
                        TokenKind::Dot
                        | TokenKind::LBracket
                        | TokenKind::Colon
                        | TokenKind::LParen
                        | TokenKind::LBrace
                        | TokenKind::String(_))
            {
                self.enter_level()?;
            }
            match self.peek_kind() {
                TokenKind::Dot => {
                    self.advance();
                    let field = self.expect_identifier("a field name")?;
                    expr = Expr::Index { table: Box::new(expr),
                                         key: Box::new(Expr::String { value: Rc::from(field),
                                                                      line }),
                                         line };
                },
                TokenKind::LBracket => {
                    self.advance();
                    let key = self.parse_expression()?;
                    self.expect(&TokenKind::RBracket, "']'")?;
                    expr = Expr::Index { table: Box::new(expr),
                                         key: Box::new(key),
                                         line };
                },
                TokenKind::Colon => {
                    self.advance();
                    let method = self.expect_identifier("a method name")?;
                    let arguments = self.parse_call_arguments()?;
                    expr = Expr::MethodCall { object: Box::new(expr),
                                              method,
                                              arguments,
                                              line };
                },
                TokenKind::LParen | TokenKind::LBrace | TokenKind::String(_) => {
                    let arguments = self.parse_call_arguments()?;
                    expr = Expr::Call { callee: Box::new(expr),
                                        arguments,
                                        line };
                },
                _ => return Ok(expr),
            }
        }
    }
}
