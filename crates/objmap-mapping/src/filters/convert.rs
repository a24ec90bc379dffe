//! Conversion filters

use crate::FilterError;
use crate::args::{Arg, int_arg};
use crate::coerce::{is_truthy, js_string, number_value};
use crate::registry::FilterResult;
use serde_json::Value;

/// Format the input as a string
///
/// # Errors
///
/// Never fails.
pub fn to_str(input: &Value, _source: &Value, _args: &[Arg]) -> FilterResult {
    Ok(Value::String(js_string(input)))
}

/// Parse the leading integer of the input's string form, with an optional
/// radix (default 10)
///
/// # Errors
///
/// Returns an error if the radix is outside 2 to 36, the text has no leading
/// digits, or the value does not fit in an `i64`.
pub fn to_int(input: &Value, _source: &Value, args: &[Arg]) -> FilterResult {
    let radix = match int_arg(args, 0)? {
        None | Some(0) => 10,
        Some(radix) => u32::try_from(radix)
            .ok()
            .filter(|r| (2..=36).contains(r))
            .ok_or_else(|| {
                FilterError::invalid_argument(0, format!("radix {radix} is outside 2 to 36"))
            })?,
    };
    parse_int(&js_string(input), radix).map(Value::from)
}

fn parse_int(text: &str, radix: u32) -> Result<i64, FilterError> {
    let trimmed = text.trim_start();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits = if radix == 16 {
        unsigned
            .strip_prefix("0x")
            .or_else(|| unsigned.strip_prefix("0X"))
            .unwrap_or(unsigned)
    } else {
        unsigned
    };

    let mut total: Option<i64> = None;
    for digit in digits.chars().map_while(|c| c.to_digit(radix)) {
        let next = total
            .unwrap_or(0)
            .checked_mul(i64::from(radix))
            .and_then(|t| t.checked_add(i64::from(digit)))
            .ok_or_else(|| FilterError::invalid_input(format!("'{text}' overflows an integer")))?;
        total = Some(next);
    }

    let total = total.ok_or_else(|| {
        FilterError::invalid_input(format!("Cannot parse '{text}' as integer"))
    })?;
    Ok(if negative { -total } else { total })
}

/// Parse the leading decimal number of the input's string form
///
/// # Errors
///
/// Returns an error if the text has no leading number or it is not finite.
pub fn to_float(input: &Value, _source: &Value, _args: &[Arg]) -> FilterResult {
    let text = js_string(input);
    let parsed = parse_float(&text)
        .ok_or_else(|| FilterError::invalid_input(format!("Cannot parse '{text}' as number")))?;
    number_value(parsed)
}

fn parse_float(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let is_digit = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_digit);

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if s[end..].starts_with("Infinity") {
        return Some(if bytes.first() == Some(&b'-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let integer_start = end;
    while is_digit(end) {
        end += 1;
    }
    let mut has_digits = end > integer_start;

    if bytes.get(end) == Some(&b'.') {
        let fraction_start = end + 1;
        let mut fraction_end = fraction_start;
        while is_digit(fraction_end) {
            fraction_end += 1;
        }
        if has_digits || fraction_end > fraction_start {
            has_digits = true;
            end = fraction_end;
        }
    }
    if !has_digits {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent = end + 1;
        if matches!(bytes.get(exponent), Some(b'+' | b'-')) {
            exponent += 1;
        }
        let exponent_digits = exponent;
        while is_digit(exponent) {
            exponent += 1;
        }
        if exponent > exponent_digits {
            end = exponent;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// JavaScript truthiness of the input
///
/// # Errors
///
/// Never fails.
pub fn to_bool(input: &Value, _source: &Value, _args: &[Arg]) -> FilterResult {
    Ok(Value::Bool(is_truthy(input)))
}

/// Wrap non-arrays in a one-element array
///
/// # Errors
///
/// Never fails.
pub fn to_array(input: &Value, _source: &Value, _args: &[Arg]) -> FilterResult {
    Ok(match input {
        Value::Array(_) => input.clone(),
        other => Value::Array(vec![other.clone()]),
    })
}

/// Decode a JSON string; scalars pass through
///
/// # Errors
///
/// Returns an error for malformed JSON or an array/object input.
pub fn to_object(input: &Value, _source: &Value, _args: &[Arg]) -> FilterResult {
    match input {
        Value::String(text) => {
            serde_json::from_str(text).map_err(|e| FilterError::Json(e.to_string()))
        }
        Value::Array(_) | Value::Object(_) => Err(FilterError::invalid_input(format!(
            "toObject expects a JSON string, found {}",
            objmap_path::type_name(input)
        ))),
        scalar => Ok(scalar.clone()),
    }
}

/// Encode the input as compact JSON text
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn stringify(input: &Value, _source: &Value, _args: &[Arg]) -> FilterResult {
    serde_json::to_string(input)
        .map(Value::String)
        .map_err(|e| FilterError::Json(e.to_string()))
}
