/// Largest magnitude below which an integral `f64` is printed without an
/// exponent (`%.14g` switches to scientific notation at 14 digits).
const PLAIN_INTEGER_LIMIT: f64 = 1e14;

/// Number of significant digits used when rendering numbers.
const SIGNIFICANT_DIGITS: i32 = 14;

/// Renders a number the way the reference language's `%.14g` does.
///
/// Integral values below `1e14` print without a fractional part, other values
/// use at most 14 significant digits with trailing zeros removed, and very
/// large or very small magnitudes switch to exponent notation.
///
/// # Example
/// ```
/// use moonwalk::util::num::format_number;
///
/// assert_eq!(format_number(10.0), "10");
/// assert_eq!(format_number(0.1), "0.1");
/// assert_eq!(format_number(1.0 / 3.0), "0.33333333333333");
/// assert_eq!(format_number(1e20), "1e+20");
/// assert_eq!(format_number(f64::INFINITY), "inf");
/// assert_eq!(format_number(-0.0), "-0");
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 && value.is_sign_negative() {
        return "-0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < PLAIN_INTEGER_LIMIT {
        return format!("{}", value as i64);
    }

    let scientific = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_fraction(mantissa), exponent.abs())
    } else {
        let decimals = usize::try_from(SIGNIFICANT_DIGITS - 1 - exponent).unwrap_or(0);
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

/// Parses a numeric literal exactly as it appears in source code.
///
/// Accepted forms are decimal integers, decimal fractions with digits on at
/// least one side of the point (`1.5`, `.5`), an optional exponent (`1e10`,
/// `2.5E-3`) and hexadecimal integers (`0xFF`). A trailing point without
/// fraction digits (`3.`), a second decimal point or an exponent without
/// digits are rejected.
///
/// # Returns
/// - `Some(f64)`: the literal's value.
/// - `None`: the text is not a well-formed literal.
#[must_use]
pub fn parse_literal(text: &str) -> Option<f64> {
    if let Some(digits) = strip_hex_prefix(text) {
        return parse_hex_digits(digits);
    }
    if !is_decimal(text, false) {
        return None;
    }
    text.parse().ok()
}

/// Converts a string to a number following the coercion rules.
///
/// Surrounding whitespace is ignored, a leading sign is allowed and a
/// trailing decimal point is accepted (`"3."`), matching what `tonumber`
/// accepts in the reference language.
///
/// # Example
/// ```
/// use moonwalk::util::num::str_to_number;
///
/// assert_eq!(str_to_number(" 42 "), Some(42.0));
/// assert_eq!(str_to_number("-0x10"), Some(-16.0));
/// assert_eq!(str_to_number("3."), Some(3.0));
/// assert_eq!(str_to_number("12abc"), None);
/// ```
#[must_use]
pub fn str_to_number(text: &str) -> Option<f64> {
    let trimmed = trim_whitespace(text);
    let (negative, unsigned) = split_sign(trimmed);

    let magnitude = if let Some(digits) = strip_hex_prefix(unsigned) {
        parse_hex_digits(digits)?
    } else if is_decimal(unsigned, true) {
        unsigned.parse().ok()?
    } else {
        return None;
    };

    Some(if negative { -magnitude } else { magnitude })
}

/// Parses an integer written in `base` (2 to 36), as `tonumber(s, base)`
/// does. Letters stand for the digits 10 to 35 in either case.
#[must_use]
pub fn parse_in_base(text: &str, base: u32) -> Option<f64> {
    if !(2..=36).contains(&base) {
        return None;
    }
    let (negative, digits) = split_sign(trim_whitespace(text));
    if digits.is_empty() {
        return None;
    }

    let mut magnitude = 0.0_f64;
    for c in digits.chars() {
        let digit = c.to_digit(base)?;
        magnitude = magnitude.mul_add(f64::from(base), f64::from(digit));
    }

    Some(if negative { -magnitude } else { magnitude })
}

/// Returns the value as an `i64` when it is integral and within range.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn f64_to_i64_exact(value: f64) -> Option<i64> {
    if value.fract() != 0.0 || value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return None;
    }
    Some(value as i64)
}

/// Converts a count into an `f64` for use as a language number.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub const fn usize_to_f64(value: usize) -> f64 {
    value as f64
}

fn trim_whitespace(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_ascii_whitespace() || c == '\x0B')
}

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else {
        (false, text.strip_prefix('+').unwrap_or(text))
    }
}

fn strip_hex_prefix(text: &str) -> Option<&str> {
    text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))
}

fn parse_hex_digits(digits: &str) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
                      c.to_digit(16).map(|d| acc.mul_add(16.0, f64::from(d)))
                  })
}

/// Checks the decimal grammar `digits [. digits] [(e|E) [+|-] digits]`.
///
/// At least one mantissa digit is required. When `allow_trailing_dot` is
/// false the point must be followed by a digit.
fn is_decimal(text: &str, allow_trailing_dot: bool) -> bool {
    let bytes = text.as_bytes();
    let mut pos = 0;

    let count_digits = |pos: &mut usize| {
        let start = *pos;
        while *pos < bytes.len() && bytes[*pos].is_ascii_digit() {
            *pos += 1;
        }
        *pos - start
    };

    let integer_digits = count_digits(&mut pos);
    let mut fraction_digits = 0;

    if pos < bytes.len() && bytes[pos] == b'.' {
        pos += 1;
        fraction_digits = count_digits(&mut pos);
        if fraction_digits == 0 && !allow_trailing_dot {
            return false;
        }
    }
    if integer_digits + fraction_digits == 0 {
        return false;
    }

    if pos < bytes.len() && matches!(bytes[pos], b'e' | b'E') {
        pos += 1;
        if pos < bytes.len() && matches!(bytes[pos], b'+' | b'-') {
            pos += 1;
        }
        if count_digits(&mut pos) == 0 {
            return false;
        }
    }

    pos == bytes.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_like_percent_g() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-7.0), "-7");
        assert_eq!(format_number(2.75), "2.75");
        assert_eq!(format_number(2.5e-7), "2.5e-07");
        assert_eq!(format_number(123_456_789_012_344.0), "1.2345678901234e+14");
        assert_eq!(format_number(99_999_999_999_999.0), "99999999999999");
        assert_eq!(format_number(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_number(f64::NAN), "nan");
        assert_eq!(format_number(-0.0), "-0");
    }

    #[test]
    fn literal_grammar() {
        assert_eq!(parse_literal("42"), Some(42.0));
        assert_eq!(parse_literal(".5"), Some(0.5));
        assert_eq!(parse_literal("1e3"), Some(1000.0));
        assert_eq!(parse_literal("2.5E-1"), Some(0.25));
        assert_eq!(parse_literal("0xff"), Some(255.0));
        assert_eq!(parse_literal("3."), None);
        assert_eq!(parse_literal("1.2.3"), None);
        assert_eq!(parse_literal("1e"), None);
        assert_eq!(parse_literal("0x"), None);
        assert_eq!(parse_literal("12abc"), None);
    }

    #[test]
    fn coercion_accepts_signs_and_whitespace() {
        assert_eq!(str_to_number("\t-2.5\n"), Some(-2.5));
        assert_eq!(str_to_number("+1"), Some(1.0));
        assert_eq!(str_to_number(""), None);
        assert_eq!(str_to_number("- 1"), None);
        assert_eq!(str_to_number("inf"), None);
    }

    #[test]
    fn bases() {
        assert_eq!(parse_in_base("ff", 16), Some(255.0));
        assert_eq!(parse_in_base("-101", 2), Some(-5.0));
        assert_eq!(parse_in_base("z", 36), Some(35.0));
        assert_eq!(parse_in_base("2", 2), None);
        assert_eq!(parse_in_base("1", 37), None);
    }

    #[test]
    fn integral_conversion() {
        assert_eq!(f64_to_i64_exact(3.0), Some(3));
        assert_eq!(f64_to_i64_exact(3.5), None);
        assert_eq!(f64_to_i64_exact(f64::NAN), None);
    }
}
