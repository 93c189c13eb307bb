//! JSON value semantics shared by the rule engine
//!
//! Answers arrive as loosely-typed JSON. The helpers here pin down exactly
//! what "empty", "truthy", "equal" and "greater than" mean for those values so
//! that condition evaluation, validation and pricing agree with each other.
//!
//! An absent answer is modelled as `None`; a JSON `null` is `Some(Value::Null)`.

use rust_decimal::Decimal;
use serde_json::Value;
use std::cmp::Ordering;

/// Returns true if the value counts as empty
///
/// Absent values, `null`, the empty string and the empty array are empty.
/// Objects, numbers (including zero) and booleans (including `false`) are not.
pub fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Returns true if the value is absent, `null` or the empty string
///
/// Unlike [`is_empty`], an empty array is considered present.
pub fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Returns true if the value is truthy
///
/// `false`, `0`, `NaN`, the empty string, `null` and absent values are falsy;
/// everything else, including empty arrays and objects, is truthy.
pub fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

/// Strict equality between two possibly-absent values
///
/// Numbers compare by numeric value so `1` equals `1.0`. No type coercion is
/// performed: `"1"` never equals `1`. Two absent values are equal.
pub fn values_equal(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left, right) {
        (None, None) => true,
        (Some(Value::Number(a)), Some(Value::Number(b))) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        },
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Orders two values when they are comparable
///
/// Two numbers compare numerically, two strings lexicographically. Any other
/// pairing (including absent values) is incomparable and yields `None`, which
/// makes every ordering operator evaluate to false.
pub fn compare_values(left: Option<&Value>, right: Option<&Value>) -> Option<Ordering> {
    match (left?, right?) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Returns true if `haystack` is an array containing `needle`
pub fn array_contains(haystack: Option<&Value>, needle: Option<&Value>) -> bool {
    match haystack {
        Some(Value::Array(items)) => items.iter().any(|item| values_equal(Some(item), needle)),
        _ => false,
    }
}

/// Converts a JSON number into a decimal amount
///
/// Integers convert exactly; floating point numbers go through
/// `Decimal::try_from`. Non-numbers return `None`.
pub fn as_decimal(value: &Value) -> Option<Decimal> {
    let Value::Number(number) = value else {
        return None;
    };
    if let Some(i) = number.as_i64() {
        return Some(Decimal::from(i));
    }
    if let Some(u) = number.as_u64() {
        return Some(Decimal::from(u));
    }
    number.as_f64().and_then(|f| Decimal::try_from(f).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_is_empty() {
        assert!(is_empty(None));
        assert!(is_empty(Some(&Value::Null)));
        assert!(is_empty(Some(&json!(""))));
        assert!(is_empty(Some(&json!([]))));

        assert!(!is_empty(Some(&json!(0))));
        assert!(!is_empty(Some(&json!(false))));
        assert!(!is_empty(Some(&json!({}))));
        assert!(!is_empty(Some(&json!(["a"]))));
    }

    #[test]
    fn test_is_blank_keeps_empty_arrays() {
        assert!(is_blank(None));
        assert!(is_blank(Some(&json!(""))));
        assert!(!is_blank(Some(&json!([]))));
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(None));
        assert!(!is_truthy(Some(&json!(0))));
        assert!(!is_truthy(Some(&json!(0.0))));
        assert!(!is_truthy(Some(&json!(""))));
        assert!(!is_truthy(Some(&json!(false))));

        assert!(is_truthy(Some(&json!(1))));
        assert!(is_truthy(Some(&json!("no"))));
        assert!(is_truthy(Some(&json!([]))));
        assert!(is_truthy(Some(&json!({}))));
    }

    #[test]
    fn test_numeric_equality_ignores_representation() {
        assert!(values_equal(Some(&json!(1)), Some(&json!(1.0))));
        assert!(!values_equal(Some(&json!("1")), Some(&json!(1))));
        assert!(values_equal(None, None));
        assert!(!values_equal(None, Some(&Value::Null)));
    }

    #[test]
    fn test_compare_values() {
        assert_eq!(compare_values(Some(&json!(2)), Some(&json!(10))), Some(Ordering::Less));
        assert_eq!(
            compare_values(Some(&json!("b")), Some(&json!("a"))),
            Some(Ordering::Greater)
        );
        assert_eq!(compare_values(Some(&json!("2")), Some(&json!(1))), None);
        assert_eq!(compare_values(None, Some(&json!(1))), None);
    }

    #[test]
    fn test_array_contains() {
        let tags = json!(["ar", "vr"]);
        assert!(array_contains(Some(&tags), Some(&json!("vr"))));
        assert!(!array_contains(Some(&tags), Some(&json!("xr"))));
        assert!(!array_contains(Some(&json!("vr")), Some(&json!("vr"))));
    }

    #[test]
    fn test_as_decimal() {
        assert_eq!(as_decimal(&json!(150)), Some(dec!(150)));
        assert_eq!(as_decimal(&json!(12.5)), Some(dec!(12.5)));
        assert_eq!(as_decimal(&json!("12.5")), None);
    }
}
