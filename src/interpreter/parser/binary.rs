use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        lexer::TokenKind,
        parser::{
            core::{ParseResult, Parser},
            unary::token_to_unary_operator,
        },
    },
};

/// Binding power of unary operators. Higher than every binary operator except
/// `^`, so `-x^2` is `-(x^2)` while `-x*2` is `(-x)*2`.
pub const UNARY_PRIORITY: u8 = 8;

/// Left and right binding powers of a binary operator.
///
/// An operator whose right power is lower than its left one is
/// right-associative (`..` and `^`).
///
/// | level | operators                    |
/// |-------|------------------------------|
/// | 1     | `or`                         |
/// | 2     | `and`                        |
/// | 3     | `< > <= >= ~= ==`            |
/// | 5     | `..` (right)                 |
/// | 6     | `+ -`                        |
/// | 7     | `* / %`                      |
/// | 8     | unary `not # -`              |
/// | 10    | `^` (right)                  |
#[must_use]
pub const fn priority(op: BinaryOperator) -> (u8, u8) {
    match op {
        BinaryOperator::Or => (1, 1),
        BinaryOperator::And => (2, 2),
        BinaryOperator::Equal
        | BinaryOperator::NotEqual
        | BinaryOperator::Less
        | BinaryOperator::LessEqual
        | BinaryOperator::Greater
        | BinaryOperator::GreaterEqual => (3, 3),
        BinaryOperator::Concat => (5, 4),
        BinaryOperator::Add | BinaryOperator::Sub => (6, 6),
        BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod => (7, 7),
        BinaryOperator::Pow => (10, 9),
    }
}

/// Maps a token to the binary operator it spells, if any.
#[must_use]
pub const fn token_to_binary_operator(token: &TokenKind) -> Option<BinaryOperator> {
    let op = match token {
        TokenKind::Plus => BinaryOperator::Add,
        TokenKind::Minus => BinaryOperator::Sub,
        TokenKind::Star => BinaryOperator::Mul,
        TokenKind::Slash => BinaryOperator::Div,
        TokenKind::Percent => BinaryOperator::Mod,
        TokenKind::Caret => BinaryOperator::Pow,
        TokenKind::DotDot => BinaryOperator::Concat,
        TokenKind::EqualEqual => BinaryOperator::Equal,
        TokenKind::TildeEqual => BinaryOperator::NotEqual,
        TokenKind::Less => BinaryOperator::Less,
        TokenKind::LessEqual => BinaryOperator::LessEqual,
        TokenKind::Greater => BinaryOperator::Greater,
        TokenKind::GreaterEqual => BinaryOperator::GreaterEqual,
        TokenKind::And => BinaryOperator::And,
        TokenKind::Or => BinaryOperator::Or,
        _ => return None,
    };
    Some(op)
}

impl Parser<'_> {
    /// Parses an expression whose operators all bind tighter than `limit`.
    ///
    /// The rule is:
    /// `subexpr := (unop subexpr | simpleexp) { binop subexpr }`
    /// where each recursive call raises the limit to the operator's right
    /// binding power.
    ///
    /// Every recursion and every operator folded into the left operand counts
    /// as one syntax level, so both `((((1))))` and `1 + 1 + ... + 1` are
    /// bounded by the nesting limit.
    pub(super) fn parse_subexpression(&mut self, limit: u8) -> ParseResult<Expr> {
        let outer = self.nesting;
        let expr = self.parse_subexpression_levels(limit);
        self.nesting = outer;
        expr
    }

    fn parse_subexpression_levels(&mut self, limit: u8) -> ParseResult<Expr> {
        self.enter_level()?;

        let mut left = if let Some(op) = token_to_unary_operator(self.peek_kind()) {
            let line = self.advance().line;
            let operand = self.parse_subexpression(UNARY_PRIORITY)?;
            Expr::UnaryOp { op,
                            expr: Box::new(operand),
                            line }
        } else {
            self.parse_simple_expression()?
        };

        while let Some(op) = token_to_binary_operator(self.peek_kind()) {
            let (left_priority, right_priority) = priority(op);
            if left_priority <= limit {
                break;
            }
            let line = self.advance().line;
            self.enter_level()?;
            let right = self.parse_subexpression(right_priority)?;
            left = Expr::BinaryOp { left: Box::new(left),
                                    op,
                                    right: Box::new(right),
                                    line };
        }

        Ok(left)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        ast::{Expr, Statement, UnaryOperator},
        interpreter::{lexer::tokenize, parser::parse},
    };

    /// Parses `return <source>` and renders the expression fully
    /// parenthesized.
    fn grouped(source: &str) -> String {
        let tokens: Vec<_> = tokenize(&format!("return {source}")).collect::<Result<_, _>>()
                                                                    .unwrap();
        let chunk = parse(&tokens).unwrap();
        let Statement::Return { values, .. } = &chunk.body[0] else {
            panic!("expected a return statement");
        };
        render(&values[0])
    }

    fn render(expr: &Expr) -> String {
        match expr {
            Expr::Number { value, .. } => value.to_string(),
            Expr::Variable { name, .. } => name.clone(),
            Expr::String { value, .. } => format!("{value:?}"),
            Expr::UnaryOp { op: UnaryOperator::Not,
                            expr,
                            .. } => format!("(not {})", render(expr)),
            Expr::UnaryOp { op, expr, .. } => format!("({op}{})", render(expr)),
            Expr::BinaryOp { left, op, right, .. } => {
                format!("({} {op} {})", render(left), render(right))
            },
            Expr::Paren { expr, .. } => render(expr),
            Expr::Call { callee, arguments, .. } => {
                let args = arguments.iter().map(render).collect::<Vec<_>>().join(", ");
                format!("{}({args})", render(callee))
            },
            other => format!("{other:?}"),
        }
    }

    #[test]
    fn arithmetic_precedence() {
        assert_eq!(grouped("1 + 2 * 3"), "(1 + (2 * 3))");
        assert_eq!(grouped("(1 + 2) * 3"), "((1 + 2) * 3)");
        assert_eq!(grouped("1 - 2 - 3"), "((1 - 2) - 3)");
        assert_eq!(grouped("a % b / c"), "((a % b) / c)");
    }

    #[test]
    fn right_associative_operators() {
        assert_eq!(grouped("2 ^ 3 ^ 2"), "(2 ^ (3 ^ 2))");
        assert_eq!(grouped("a .. b .. c"), "(a .. (b .. c))");
        assert_eq!(grouped("a .. b + c"), "(a .. (b + c))");
    }

    #[test]
    fn unary_binds_between_multiplication_and_power() {
        assert_eq!(grouped("-x ^ 2"), "(-(x ^ 2))");
        assert_eq!(grouped("-x * 2"), "((-x) * 2)");
        assert_eq!(grouped("2 ^ -3"), "(2 ^ (-3))");
        assert_eq!(grouped("not a == b"), "((not a) == b)");
        assert_eq!(grouped("#t + 1"), "((#t) + 1)");
    }

    #[test]
    fn logical_operators_are_lowest() {
        assert_eq!(grouped("a or b and c"), "(a or (b and c))");
        assert_eq!(grouped("a < b and b <= c or d"), "(((a < b) and (b <= c)) or d)");
        assert_eq!(grouped("f(1) + 1"), "(f(1) + 1)");
    }
}
