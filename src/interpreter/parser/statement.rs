use std::rc::Rc;

use crate::{
    ast::{ConditionalBranch, Expr, FunctionBody, Statement},
    error::ParseError,
    interpreter::{
        lexer::TokenKind,
        parser::core::{ParseResult, Parser},
    },
};

impl Parser<'_> {
    /// Parses a single statement.
    ///
    /// Dispatches on the leading keyword; anything else must be a call or the
    /// first target of an assignment.
    ///
    /// # Errors
    /// - `MisplacedBreak` for `break` outside a loop of the current function.
    /// - `InvalidAssignmentTarget` for assignments to calls, literals or
    ///   parenthesized expressions.
    /// - `UnexpectedToken` / `UnexpectedEnd` for any other grammar violation.
    pub fn parse_statement(&mut self) -> ParseResult<Statement> {
        let line = self.line();

        match self.peek_kind() {
            TokenKind::If => {
                self.advance();
                self.parse_if(line)
            },
            TokenKind::While => {
                self.advance();
                let condition = self.parse_expression()?;
                self.expect(&TokenKind::Do, "'do'")?;
                let body = self.parse_loop_body(&TokenKind::End, "'end'")?;
                Ok(Statement::While { condition, body, line })
            },
            TokenKind::Do => {
                self.advance();
                let body = self.parse_block_until_end()?;
                Ok(Statement::Do { body, line })
            },
            TokenKind::For => {
                self.advance();
                self.parse_for(line)
            },
            TokenKind::Repeat => {
                self.advance();
                let body = self.parse_loop_body(&TokenKind::Until, "'until'")?;
                let condition = self.parse_expression()?;
                Ok(Statement::Repeat { body, condition, line })
            },
            TokenKind::Function => {
                self.advance();
                self.parse_function_declaration(line)
            },
            TokenKind::Local => {
                self.advance();
                self.parse_local(line)
            },
            TokenKind::Return => {
                self.advance();
                let values = if self.at_block_end() || self.check(&TokenKind::Semicolon) {
                    Vec::new()
                } else {
                    self.parse_expression_list()?
                };
                Ok(Statement::Return { values, line })
            },
            TokenKind::Break => {
                self.advance();
                if self.loop_depth == 0 {
                    return Err(ParseError::MisplacedBreak { line });
                }
                Ok(Statement::Break { line })
            },
            _ => self.parse_expression_statement(line),
        }
    }

    /// Parses `cond then block { elseif cond then block } [ else block ] end`
    /// after the `if` keyword.
    fn parse_if(&mut self, line: usize) -> ParseResult<Statement> {
        let mut branches = Vec::new();
        let mut else_block = None;

        loop {
            let condition = self.parse_expression()?;
            self.expect(&TokenKind::Then, "'then'")?;
            let body = self.parse_block()?;
            branches.push(ConditionalBranch { condition, body });

            match self.peek_kind() {
                TokenKind::ElseIf => {
                    self.advance();
                },
                TokenKind::Else => {
                    self.advance();
                    else_block = Some(self.parse_block_until_end()?);
                    break;
                },
                _ => {
                    self.expect(&TokenKind::End, "'end'")?;
                    break;
                },
            }
        }

        Ok(Statement::If { branches,
                           else_block,
                           line })
    }

    /// Parses either loop form after `for`.
    ///
    /// Numeric: `for v = start, stop [, step] do block end`
    /// Generic: `for k, v in explist do block end`
    fn parse_for(&mut self, line: usize) -> ParseResult<Statement> {
        let first = self.expect_identifier("a loop variable name")?;

        if self.consume_if(&TokenKind::Equals) {
            let start = self.parse_expression()?;
            self.expect(&TokenKind::Comma, "','")?;
            let stop = self.parse_expression()?;
            let step = if self.consume_if(&TokenKind::Comma) {
                Some(self.parse_expression()?)
            } else {
                None
            };
            self.expect(&TokenKind::Do, "'do'")?;
            let body = self.parse_loop_body(&TokenKind::End, "'end'")?;
            return Ok(Statement::NumericFor { var: first,
                                              start,
                                              stop,
                                              step,
                                              body,
                                              line });
        }

        let mut names = vec![first];
        while self.consume_if(&TokenKind::Comma) {
            names.push(self.expect_identifier("a loop variable name")?);
        }
        if !self.check(&TokenKind::In) {
            let expected = if names.len() == 1 { "'=' or 'in'" } else { "'in'" };
            return Err(self.error_here(expected));
        }
        self.advance();

        let exprs = self.parse_expression_list()?;
        self.expect(&TokenKind::Do, "'do'")?;
        let body = self.parse_loop_body(&TokenKind::End, "'end'")?;
        Ok(Statement::GenericFor { names,
                                   exprs,
                                   body,
                                   line })
    }

    /// Parses `name { "." name } [ ":" name ] funcbody` after `function`.
    fn parse_function_declaration(&mut self, line: usize) -> ParseResult<Statement> {
        let mut path = vec![self.expect_identifier("a function name")?];
        while self.consume_if(&TokenKind::Dot) {
            path.push(self.expect_identifier("a field name")?);
        }
        let method = if self.consume_if(&TokenKind::Colon) {
            Some(self.expect_identifier("a method name")?)
        } else {
            None
        };

        let body = self.parse_function_body(line, method.is_some())?;
        Ok(Statement::FunctionDecl { path,
                                     method,
                                     body,
                                     line })
    }

    /// Parses `local function name funcbody` or `local names [= explist]`
    /// after `local`.
    fn parse_local(&mut self, line: usize) -> ParseResult<Statement> {
        if self.consume_if(&TokenKind::Function) {
            let name = self.expect_identifier("a function name")?;
            let body = self.parse_function_body(line, false)?;
            return Ok(Statement::LocalFunction { name, body, line });
        }

        let names = self.parse_name_list("a variable name")?;
        let values = if self.consume_if(&TokenKind::Equals) {
            self.parse_expression_list()?
        } else {
            Vec::new()
        };
        Ok(Statement::Local { names, values, line })
    }

    /// Parses a call statement or an assignment.
    fn parse_expression_statement(&mut self, line: usize) -> ParseResult<Statement> {
        let first = self.parse_suffixed_expression()?;

        if self.check(&TokenKind::Equals) || self.check(&TokenKind::Comma) {
            let mut targets = vec![assignment_target(first)?];
            while self.consume_if(&TokenKind::Comma) {
                targets.push(assignment_target(self.parse_expression()?)?);
            }
            self.expect(&TokenKind::Equals, "'='")?;
            let values = self.parse_expression_list()?;
            return Ok(Statement::Assignment { targets,
                                              values,
                                              line });
        }

        if matches!(first, Expr::Call { .. } | Expr::MethodCall { .. }) {
            return Ok(Statement::Call { call: first, line });
        }
        Err(self.error_here("'='"))
    }

    /// Parses `"(" [ params ] ")" block end` after a function's name.
    ///
    /// Methods get an implicit leading `self` parameter. The body is parsed
    /// with a fresh loop depth, since `break` cannot cross a function
    /// boundary.
    pub(super) fn parse_function_body(&mut self, line: usize, is_method: bool)
                                      -> ParseResult<Rc<FunctionBody>> {
        self.expect(&TokenKind::LParen, "'('")?;

        let mut params = Vec::new();
        if is_method {
            params.push("self".to_string());
        }
        let mut is_vararg = false;

        if !self.check(&TokenKind::RParen) {
            loop {
                if self.consume_if(&TokenKind::Ellipsis) {
                    is_vararg = true;
                    break;
                }
                params.push(self.expect_identifier("a parameter name")?);
                if !self.consume_if(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen, "')'")?;

        let outer_loops = std::mem::replace(&mut self.loop_depth, 0);
        let outer_vararg = std::mem::replace(&mut self.vararg_allowed, is_vararg);
        let body = self.parse_block_until_end();
        self.loop_depth = outer_loops;
        self.vararg_allowed = outer_vararg;

        Ok(Rc::new(FunctionBody { params,
                                  is_vararg,
                                  body: body?,
                                  line }))
    }
}

/// Accepts only variables and index expressions on the left of `=`.
fn assignment_target(expr: Expr) -> ParseResult<Expr> {
    match expr {
        Expr::Variable { .. } | Expr::Index { .. } => Ok(expr),
        other => Err(ParseError::InvalidAssignmentTarget { line: other.line() }),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        ast::Chunk,
        error::ParseErrorKind,
        interpreter::{lexer::tokenize, parser::parse},
    };

    fn parse_source(source: &str) -> ParseResult<Chunk> {
        let tokens: Vec<_> = tokenize(source).collect::<Result<_, _>>().unwrap();
        parse(&tokens)
    }

    fn failure(source: &str) -> (ParseErrorKind, usize) {
        let err = parse_source(source).unwrap_err();
        (err.kind(), err.line())
    }

    #[test]
    fn misplaced_control_flow() {
        assert_eq!(failure("break"), (ParseErrorKind::MisplacedBreak, 1));
        assert_eq!(failure("while true do\n local f = function() break end\nend"),
                   (ParseErrorKind::MisplacedBreak, 2));
        assert_eq!(failure("return 1\nx = 2"), (ParseErrorKind::MisplacedReturn, 2));
        assert!(parse_source("do return end x = 1").is_ok());
        assert!(parse_source("return;").is_ok());
    }

    #[test]
    fn only_calls_and_assignments_are_statements() {
        assert_eq!(failure("x"), (ParseErrorKind::UnexpectedEnd, 1));
        assert_eq!(failure("f() = 1"), (ParseErrorKind::InvalidAssignmentTarget, 1));
        assert_eq!(failure("a, (b) = 1, 2"), (ParseErrorKind::InvalidAssignmentTarget, 1));
        assert!(parse_source("f() g{} h'x' o:m(1)").is_ok());
    }

    #[test]
    fn varargs_need_a_vararg_function() {
        assert!(parse_source("return ...").is_ok());
        assert!(parse_source("local f = function(...) return ... end").is_ok());
        assert_eq!(failure("local function f()\n return ...\nend"),
                   (ParseErrorKind::VarargOutsideFunction, 2));
    }

    #[test]
    fn wrong_terminators() {
        assert_eq!(failure("if x then\n y()"), (ParseErrorKind::UnexpectedEnd, 2));
        let err = parse_source("for i = 1, 2 do\nelse end").unwrap_err();
        assert_eq!(err,
                   ParseError::UnexpectedToken { expected: "'end'".to_string(),
                                                 found:    "'else'".to_string(),
                                                 line:     2, });
        assert_eq!(failure("repeat x = 1 end"), (ParseErrorKind::UnexpectedToken, 1));
        assert_eq!(failure("for a, b = 1, 2 do end"), (ParseErrorKind::UnexpectedToken, 1));
    }

    #[test]
    fn method_declarations_take_self() {
        let chunk = parse_source("function a.b:m(x) end").unwrap();
        let Statement::FunctionDecl { path, method, body, .. } = &chunk.body[0] else {
            panic!("expected a function declaration");
        };
        assert_eq!(path, &vec!["a".to_string(), "b".to_string()]);
        assert_eq!(method.as_deref(), Some("m"));
        assert_eq!(body.params, vec!["self".to_string(), "x".to_string()]);
    }

    #[test]
    fn numeric_and_generic_for() {
        let chunk = parse_source("for i = 1, 10, 2 do end for k, v in pairs(t) do end").unwrap();
        assert!(matches!(&chunk.body[0], Statement::NumericFor { step: Some(_), .. }));
        assert!(matches!(&chunk.body[1], Statement::GenericFor { names, .. } if names.len() == 2));
    }
}
