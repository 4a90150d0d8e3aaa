//! Coercion helpers shared by the evaluator and the built-in functions.

use crate::types::Value;

// ------------------------------------------------------------ Number helpers

/// Converts a value to a number.
///
/// Strings are trimmed first. Decimal and exponent forms, `Infinity` with an
/// optional sign, and unsigned `0x`/`0o`/`0b` literals are accepted. Anything
/// else, including the empty string, becomes `NaN`.
pub fn num(value: &Value) -> f64 {
    match value {
        Value::Number(n) => *n,
        Value::String(s) => parse_number(s),
    }
}

fn parse_number(s: &str) -> f64 {
    let s = s.trim();
    match s {
        "" => return f64::NAN,
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if s.len() > 2 && s.starts_with('0') {
        let radix = match &s[1..2] {
            "x" | "X" => Some(16),
            "o" | "O" => Some(8),
            "b" | "B" => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            return parse_radix(&s[2..], radix);
        }
    }
    // `f64::from_str` also knows `inf` and `nan`, which are not numbers here.
    if !s
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        return f64::NAN;
    }
    s.parse::<f64>().unwrap_or(f64::NAN)
}

fn parse_radix(digits: &str, radix: u32) -> f64 {
    digits
        .chars()
        .try_fold(0.0f64, |acc, c| {
            c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
        })
        .unwrap_or(f64::NAN)
}

/// Formats a number the way it is shown inside strings: integers without a
/// fractional part, `NaN`, `Infinity`, and exponent notation outside
/// `[1e-6, 1e21)`.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        let s = if n > 0.0 { "Infinity" } else { "-Infinity" };
        return s.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        return n.to_string();
    }
    let exp = format!("{:e}", n);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => {
            format!("{}e+{}", mantissa, power)
        }
        _ => exp,
    }
}

// ------------------------------------------------------------ String helpers

/// Converts a value to its string form.
pub fn str_val(value: &Value) -> String {
    match value {
        Value::Number(n) => number_to_string(*n),
        Value::String(s) => s.clone(),
    }
}

// ------------------------------------------------------------ Truthiness

/// `0`, `-0`, `NaN` and `""` are falsy, everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Number(n) => *n != 0.0 && !n.is_nan(),
        Value::String(s) => !s.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_numbers_pass_through() {
        assert_eq!(num(&Value::from(12)), 12.0);
        assert!(num(&Value::Number(f64::NAN)).is_nan());
    }

    #[test]
    fn test_num_strings() {
        assert_eq!(num(&Value::from("34")), 34.0);
        assert_eq!(num(&Value::from("  10.5\n")), 10.5);
        assert_eq!(num(&Value::from("-3e2")), -300.0);
        assert_eq!(num(&Value::from(".5")), 0.5);
        assert_eq!(num(&Value::from("0x1F")), 31.0);
        assert_eq!(num(&Value::from("0b101")), 5.0);
        assert_eq!(num(&Value::from("0o17")), 15.0);
        assert_eq!(num(&Value::from("-Infinity")), f64::NEG_INFINITY);
    }

    #[test]
    fn test_num_invalid_strings_are_nan() {
        for s in ["", "   ", "abc", "12abc", "inf", "nan", "NaN", ".", "0x", "0xZZ", "1_000"] {
            assert!(num(&Value::from(s)).is_nan(), "expected NaN for {:?}", s);
        }
    }

    #[test]
    fn test_number_to_string() {
        assert_eq!(number_to_string(42.0), "42");
        assert_eq!(number_to_string(-7.0), "-7");
        assert_eq!(number_to_string(0.5), "0.5");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(f64::NAN), "NaN");
        assert_eq!(number_to_string(f64::INFINITY), "Infinity");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(1e-7), "1e-7");
        assert_eq!(number_to_string(123456789.0), "123456789");
    }

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy(&Value::from(1)));
        assert!(is_truthy(&Value::from("0")));
        assert!(!is_truthy(&Value::from(0)));
        assert!(!is_truthy(&Value::Number(-0.0)));
        assert!(!is_truthy(&Value::Number(f64::NAN)));
        assert!(!is_truthy(&Value::from("")));
    }
}
