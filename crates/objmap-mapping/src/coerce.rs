//! Value coercions shared by filters
//!
//! Filters follow JavaScript conversion rules where JSON can express them:
//! truthiness, `String()` formatting and numeric extraction.

use crate::FilterError;
use serde_json::{Number, Value};

/// JavaScript truthiness: `null`, `false`, `0` and `""` are falsy, everything else is truthy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Format a value the way JavaScript's `String()` does.
#[must_use]
pub fn js_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => format_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => js_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Format a JSON number like JavaScript: integral floats drop the fraction,
/// very large or small magnitudes switch to exponent form.
#[must_use]
pub fn format_number(number: &Number) -> String {
    if number.is_i64() || number.is_u64() {
        return number.to_string();
    }
    let Some(f) = number.as_f64() else {
        return number.to_string();
    };
    if f == 0.0 {
        return "0".to_string();
    }
    let magnitude = f.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let formatted = format!("{f:e}");
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => formatted,
        };
    }
    if f.fract() == 0.0 {
        format!("{f:.0}")
    } else {
        f.to_string()
    }
}

/// Read a numeric value, parsing numeric strings.
pub(crate) fn value_to_f64(value: &Value, label: &str) -> Result<f64, FilterError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| FilterError::invalid_input(format!("{label} is not representable as a number"))),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
            FilterError::invalid_input(format!("Cannot parse {label} '{s}' as number"))
        }),
        other => Err(FilterError::invalid_input(format!(
            "{label} must be a number, found {}",
            objmap_path::type_name(other)
        ))),
    }
}

/// Wrap a float as a JSON number, rejecting `NaN` and infinities.
pub(crate) fn float_value(f: f64) -> Result<Value, FilterError> {
    Number::from_f64(f)
        .map(Value::Number)
        .ok_or_else(|| FilterError::invalid_input(format!("{f} is not a finite number")))
}

/// Wrap a float as a JSON number, keeping integral values inside the
/// safe-integer range as integers.
pub(crate) fn number_value(f: f64) -> Result<Value, FilterError> {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if f.fract() == 0.0 && f.abs() <= MAX_SAFE_INTEGER {
        return Ok(Value::from(f as i64));
    }
    float_value(f)
}

/// Loose equality used by match predicates: numbers compare by value, everything else structurally.
pub(crate) fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        },
        _ => left == right,
    }
}
