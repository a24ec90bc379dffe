//! Explicit filter arguments
//!
//! Filters receive their explicit arguments as [`Arg`]s: plain JSON values
//! (everything a `name:arg1:arg2` token can express) or callbacks for the
//! higher-order filters (`map`, `filter`, `reduce`, `sort`, ...).

use crate::FilterError;
use crate::coerce::{is_truthy, js_string};
use objmap_path::Path;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Callback passed to higher-order filters
pub type Callback = Arc<dyn Fn(&[Value]) -> Result<Value, FilterError> + Send + Sync>;

/// One explicit filter argument
#[derive(Clone)]
pub enum Arg {
    /// Plain JSON value
    Value(Value),

    /// Callback for higher-order filters
    Func(Callback),
}

impl Arg {
    /// Wrap a closure as a callback argument
    pub fn func(func: impl Fn(&[Value]) -> Result<Value, FilterError> + Send + Sync + 'static) -> Self {
        Self::Func(Arc::new(func))
    }

    /// The plain value, if this is not a callback
    #[must_use]
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Arg::Value(value) => Some(value),
            Arg::Func(_) => None,
        }
    }

    /// The callback, if this is one
    #[must_use]
    pub fn as_callback(&self) -> Option<&Callback> {
        match self {
            Arg::Func(callback) => Some(callback),
            Arg::Value(_) => None,
        }
    }

    /// The string value, if this is a JSON string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Arg::Func(_) => f.write_str("Func(..)"),
        }
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Value(Value::String(value.to_string()))
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Value(Value::String(value))
    }
}

impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Arg::Value(Value::from(value))
    }
}

impl From<u32> for Arg {
    fn from(value: u32) -> Self {
        Arg::Value(Value::from(value))
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Value(Value::from(value))
    }
}

impl From<bool> for Arg {
    fn from(value: bool) -> Self {
        Arg::Value(Value::Bool(value))
    }
}

impl From<Callback> for Arg {
    fn from(callback: Callback) -> Self {
        Arg::Func(callback)
    }
}

/// Plain value at `index`; `None` when absent. Callbacks are rejected.
pub(crate) fn value_arg(args: &[Arg], index: usize) -> Result<Option<&Value>, FilterError> {
    match args.get(index) {
        None => Ok(None),
        Some(Arg::Value(value)) => Ok(Some(value)),
        Some(Arg::Func(_)) => Err(FilterError::invalid_argument(
            index,
            "expected a value, got a callback",
        )),
    }
}

/// Boolean flag at `index`. Strings `"false"` and `"0"` read as false so
/// tokens like `flatten:false` behave as written.
pub(crate) fn bool_arg(args: &[Arg], index: usize, default: bool) -> Result<bool, FilterError> {
    Ok(match value_arg(args, index)? {
        None => default,
        Some(Value::String(s)) => !matches!(s.trim(), "" | "false" | "0"),
        Some(other) => is_truthy(other),
    })
}

/// Integer at `index`; `None` when absent or `null`. Floats truncate toward zero.
pub(crate) fn int_arg(args: &[Arg], index: usize) -> Result<Option<i64>, FilterError> {
    match value_arg(args, index)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .map(Some)
            .ok_or_else(|| FilterError::invalid_argument(index, format!("{n} is not an integer"))),
        Some(Value::String(s)) => s.trim().parse::<i64>().map(Some).map_err(|_| {
            FilterError::invalid_argument(index, format!("'{s}' is not an integer"))
        }),
        Some(other) => Err(FilterError::invalid_argument(
            index,
            format!("expected an integer, found {}", objmap_path::type_name(other)),
        )),
    }
}

/// String at `index`; scalars are formatted with JavaScript rules.
pub(crate) fn str_arg(args: &[Arg], index: usize) -> Result<Option<String>, FilterError> {
    match value_arg(args, index)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(value @ (Value::Number(_) | Value::Bool(_))) => Ok(Some(js_string(value))),
        Some(other) => Err(FilterError::invalid_argument(
            index,
            format!("expected a string, found {}", objmap_path::type_name(other)),
        )),
    }
}

/// Required property path at `index`.
pub(crate) fn path_arg(args: &[Arg], index: usize) -> Result<Path, FilterError> {
    let raw = str_arg(args, index)?
        .ok_or_else(|| FilterError::invalid_argument(index, "a path is required"))?;
    Ok(Path::parse(&raw)?)
}

/// Required callback at `index`.
pub(crate) fn callback_arg(args: &[Arg], index: usize) -> Result<&Callback, FilterError> {
    args.get(index)
        .and_then(Arg::as_callback)
        .ok_or_else(|| FilterError::invalid_argument(index, "a callback is required"))
}
