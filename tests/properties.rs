use moonwalk::{
    Value,
    interpreter::lexer::{TokenKind, tokenize},
    run,
    util::num::format_number,
};
use proptest::prelude::*;

fn lex_number(text: &str) -> f64 {
    let kinds: Vec<TokenKind> = tokenize(text).map(|token| token.map(|t| t.kind))
                                              .collect::<Result<_, _>>()
                                              .unwrap();
    match kinds.as_slice() {
        [TokenKind::Number(value), TokenKind::Eof] => *value,
        other => panic!("'{text}' lexed as {other:?}"),
    }
}

/// An arithmetic expression over small non-negative literals.
#[derive(Debug, Clone)]
enum Arith {
    Literal(u8),
    Binary(Box<Arith>, char, Box<Arith>),
}

fn arithmetic() -> impl Strategy<Value = Arith> {
    let leaf = (0u8..100).prop_map(Arith::Literal);
    leaf.prop_recursive(6, 64, 2, |inner| {
            (inner.clone(), prop::sample::select(vec!['+', '-', '*', '/']), inner)
                .prop_map(|(left, op, right)| Arith::Binary(Box::new(left), op, Box::new(right)))
        })
}

const fn precedence(op: char) -> u8 {
    match op {
        '*' | '/' => 2,
        _ => 1,
    }
}

/// Renders the expression with only the parentheses precedence and left
/// associativity require, returning the text and its precedence.
fn render(expr: &Arith) -> (String, u8) {
    match expr {
        Arith::Literal(n) => (n.to_string(), u8::MAX),
        Arith::Binary(left, op, right) => {
            let level = precedence(*op);
            let (left, left_level) = render(left);
            let (right, right_level) = render(right);
            let left = if left_level < level { format!("({left})") } else { left };
            let right = if right_level <= level { format!("({right})") } else { right };
            (format!("{left} {op} {right}"), level)
        },
    }
}

fn reference(expr: &Arith) -> f64 {
    match expr {
        Arith::Literal(n) => f64::from(*n),
        Arith::Binary(left, op, right) => {
            let (a, b) = (reference(left), reference(right));
            match op {
                '+' => a + b,
                '-' => a - b,
                '*' => a * b,
                _ => a / b,
            }
        },
    }
}

proptest! {
    #[test]
    fn printed_integers_lex_back_exactly(n in 0u32..=u32::MAX) {
        let value = f64::from(n);
        prop_assert_eq!(lex_number(&format_number(value)), value);
    }

    #[test]
    fn printed_fractions_lex_back_closely(value in 0.001f64..1.0e6) {
        let text = format_number(value);
        let back = lex_number(&text);
        prop_assert!((back - value).abs() <= value * 1e-13, "{} printed as {}", value, text);
    }

    #[test]
    fn infix_arithmetic_matches_f64(expr in arithmetic()) {
        let (source, _) = render(&expr);
        let expected = reference(&expr);
        let Value::Number(actual) = run(&format!("return {source}")).unwrap() else {
            panic!("'{source}' did not produce a number");
        };
        if expected.is_nan() {
            prop_assert!(actual.is_nan(), "{} gave {}", source, actual);
        } else {
            prop_assert_eq!(actual, expected, "{}", source);
        }
    }

    #[test]
    fn modulo_result_has_divisor_sign(a in -1000i32..1000, b in 1i32..100) {
        let expected = f64::from(a.rem_euclid(b));
        prop_assert_eq!(run(&format!("return {a} % {b}")).unwrap(), Value::Number(expected));

        let negated = run(&format!("return {a} % -{b}")).unwrap();
        let Value::Number(n) = negated else { panic!("{negated:?}") };
        prop_assert!(n <= 0.0 && n > -f64::from(b));
    }

    #[test]
    fn string_length_counts_bytes(text in "[a-z ]{0,40}") {
        prop_assert_eq!(run(&format!("return #'{text}'")).unwrap(),
                        Value::Number(text.len() as f64));
    }
}
