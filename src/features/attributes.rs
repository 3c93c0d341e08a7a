use serde_json::Value;

/// Numeric view of an attribute value, coerced the way the data has always been compared
/// (`"2"` is 2, `true` is 1, an empty string is 0). Null, arrays and objects have none.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                Some(0.0)
            } else {
                parse_number(s)
            }
        }
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Numeric string literal as a browser reads it: decimal, `0x`/`0o`/`0b` integers, `Infinity`
fn parse_number(s: &str) -> Option<f64> {
    let radix = match s.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &s[2..];
        if digits.starts_with('+') {
            return None;
        }
        return u64::from_str_radix(digits, radix).ok().map(|n| n as f64);
    }

    match s {
        "Infinity" | "+Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        // f64::from_str also takes inf, infinity and nan in any case
        _ if s.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => None,
        _ => s.parse::<f64>().ok(),
    }
}

pub fn equals_number(value: Option<&Value>, expected: f64) -> bool {
    value.and_then(as_number) == Some(expected)
}

pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_as_number() {
        assert_eq!(as_number(&json!(2)), Some(2.0));
        assert_eq!(as_number(&json!(2.0)), Some(2.0));
        assert_eq!(as_number(&json!(" 4 ")), Some(4.0));
        assert_eq!(as_number(&json!("")), Some(0.0));
        assert_eq!(as_number(&json!(true)), Some(1.0));
        assert_eq!(as_number(&json!(false)), Some(0.0));
        assert_eq!(as_number(&json!("Bus")), None);
        assert_eq!(as_number(&json!(null)), None);
        assert_eq!(as_number(&json!([1])), None);
    }

    #[test]
    fn test_as_number_literals() {
        assert_eq!(as_number(&json!("0x2")), Some(2.0));
        assert_eq!(as_number(&json!("0B11")), Some(3.0));
        assert_eq!(as_number(&json!("0o17")), Some(15.0));
        assert_eq!(as_number(&json!("1e1")), Some(10.0));
        assert_eq!(as_number(&json!(".5")), Some(0.5));
        assert_eq!(as_number(&json!("-Infinity")), Some(f64::NEG_INFINITY));

        assert_eq!(as_number(&json!("-0x2")), None);
        assert_eq!(as_number(&json!("0x")), None);
        assert_eq!(as_number(&json!("0x+1")), None);
        assert_eq!(as_number(&json!("inf")), None);
        assert_eq!(as_number(&json!("infinity")), None);
        assert_eq!(as_number(&json!("NaN")), None);

        assert!(equals_number(Some(&json!("0x2")), 2.0));
    }

    #[test]
    fn test_equals_number() {
        assert!(equals_number(Some(&json!("1")), 1.0));
        assert!(equals_number(Some(&json!(true)), 1.0));
        assert!(!equals_number(Some(&json!(null)), 0.0));
        assert!(!equals_number(None, 0.0));
    }

    #[test]
    fn test_as_text() {
        assert_eq!(as_text(&json!("Bern")).as_deref(), Some("Bern"));
        assert_eq!(as_text(&json!(8507000)).as_deref(), Some("8507000"));
        assert_eq!(as_text(&json!(null)), None);
    }
}
