//! Value filters
//!
//! `get` and `has` read the source object rather than the chain value, so a
//! chain can start anywhere in the source. `put` writes into the chain value.

use crate::args::{Arg, path_arg, value_arg};
use crate::registry::FilterResult;
use serde_json::Value;

/// Pass the input through unchanged
///
/// # Errors
///
/// Never fails.
pub fn identity(input: &Value, _source: &Value, _args: &[Arg]) -> FilterResult {
    Ok(input.clone())
}

/// Read a path from the source object, falling back to the second argument
/// (or `null`) when nothing is there
///
/// # Errors
///
/// Returns an error if the path is missing or malformed.
pub fn get(_input: &Value, source: &Value, args: &[Arg]) -> FilterResult {
    let path = path_arg(args, 0)?;
    match objmap_path::get(source, &path) {
        Some(found) => Ok(found.clone()),
        None => Ok(value_arg(args, 1)?.cloned().unwrap_or(Value::Null)),
    }
}

/// Replace the chain value with the argument (or `null`)
///
/// # Errors
///
/// Returns an error if the argument is a callback.
pub fn set(_input: &Value, _source: &Value, args: &[Arg]) -> FilterResult {
    Ok(value_arg(args, 0)?.cloned().unwrap_or(Value::Null))
}

/// Write the second argument at a path inside a copy of the input,
/// creating intermediate containers as needed
///
/// # Errors
///
/// Returns an error if the path is malformed or crosses an incompatible value.
pub fn put(input: &Value, _source: &Value, args: &[Arg]) -> FilterResult {
    let path = path_arg(args, 0)?;
    let new_value = value_arg(args, 1)?.cloned().unwrap_or(Value::Null);
    let mut output = input.clone();
    objmap_path::set(&mut output, &path, new_value)?;
    Ok(output)
}

/// Whether the source object has a value at the path
///
/// # Errors
///
/// Returns an error if the path is missing or malformed.
pub fn has(_input: &Value, source: &Value, args: &[Arg]) -> FilterResult {
    let path = path_arg(args, 0)?;
    Ok(Value::Bool(objmap_path::has(source, &path)))
}
