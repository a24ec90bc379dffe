//! Traversal and cursor APIs for navigating JSON values by path

use crate::path::{Path, Segment};
use crate::{Error, Result, type_name};
use serde_json::{Map, Value};

/// Largest number of `null` slots a single write may append to an array.
const MAX_ARRAY_GROWTH: usize = 1 << 16;

/// A cursor for navigating a JSON value
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    /// Current value
    value: &'a Value,

    /// Rendered segments walked so far (for error reporting)
    path: Vec<String>,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor at the given value
    #[must_use]
    pub fn new(value: &'a Value) -> Self {
        Self {
            value,
            path: Vec::new(),
        }
    }

    /// Get the current value
    #[must_use]
    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// Get the segments walked so far
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Render the walked path in dotted form, e.g. `a.items[0].sku`
    #[must_use]
    pub fn path_string(&self) -> String {
        render(&self.path)
    }

    /// Navigate to an object member, or an array element when `key` is numeric
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the member does not exist.
    pub fn child(&self, key: &str) -> Result<Cursor<'a>> {
        self.step(&Segment::Key(key.to_string()))
    }

    /// Navigate to an array element by index
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the index is out of bounds or the value is not an array.
    pub fn child_at(&self, index: usize) -> Result<Cursor<'a>> {
        self.step(&Segment::Index(index))
    }

    /// Take a single step along a path segment
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the segment does not resolve.
    pub fn step(&self, segment: &Segment) -> Result<Cursor<'a>> {
        let found = match (self.value, segment) {
            (Value::Object(map), _) => map.get(&segment.as_key()),
            (Value::Array(items), _) => segment.as_index().and_then(|index| items.get(index)),
            _ => None,
        };

        let mut new_path = self.path.clone();
        new_path.push(segment.to_string());

        match found {
            Some(value) => Ok(Cursor {
                value,
                path: new_path,
            }),
            None => Err(Error::not_found(render(&new_path))),
        }
    }

    /// Navigate along a full path (e.g. `a.items[0].sku`)
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] naming the first segment that did not resolve.
    pub fn navigate(&self, path: &Path) -> Result<Cursor<'a>> {
        let mut cursor = self.clone();
        for segment in path.segments() {
            cursor = cursor.step(segment)?;
        }
        Ok(cursor)
    }
}

/// Render walked segments, keeping bracket indices attached to their parent.
fn render(path: &[String]) -> String {
    let mut rendered = String::new();
    for segment in path {
        if !rendered.is_empty() && !segment.starts_with('[') {
            rendered.push('.');
        }
        rendered.push_str(segment);
    }
    rendered
}

/// Read the value at `path`, or `None` when any segment is missing
#[must_use]
pub fn get<'a>(value: &'a Value, path: &Path) -> Option<&'a Value> {
    Cursor::new(value).navigate(path).ok().map(|cursor| cursor.value())
}

/// Parse `raw` and read the value at that path
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] when `raw` is not a valid path.
pub fn get_str<'a>(value: &'a Value, raw: &str) -> Result<Option<&'a Value>> {
    let path = Path::parse(raw)?;
    Ok(get(value, &path))
}

/// Whether a value exists at `path` (an explicit `null` counts as present)
#[must_use]
pub fn has(value: &Value, path: &Path) -> bool {
    get(value, path).is_some()
}

/// Write `new_value` at `path`, creating intermediate containers as needed
///
/// Missing or scalar intermediates are replaced by an array when the next
/// segment is an index and by an object otherwise. Arrays grow with `null`
/// padding. The root path replaces `target` entirely.
///
/// # Errors
///
/// Returns [`Error::TypeMismatch`] when a non-numeric key addresses an array,
/// and [`Error::InvalidPath`] when an index lies too far past an array's end.
pub fn set(target: &mut Value, path: &Path, new_value: Value) -> Result<()> {
    let segments = path.segments();
    let Some((last, _)) = segments.split_last() else {
        *target = new_value;
        return Ok(());
    };

    ensure_container(target, &segments[0]);
    let mut current = target;

    for (index, segment) in segments[..segments.len() - 1].iter().enumerate() {
        current = slot(current, segment, path)?;
        ensure_container(current, &segments[index + 1]);
    }

    *slot(current, last, path)? = new_value;
    Ok(())
}

fn ensure_container(value: &mut Value, next: &Segment) {
    if matches!(value, Value::Array(_) | Value::Object(_)) {
        return;
    }
    tracing::trace!(segment = %next, "creating intermediate container");
    *value = if next.as_index().is_some() {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    };
}

fn slot<'v>(container: &'v mut Value, segment: &Segment, path: &Path) -> Result<&'v mut Value> {
    match container {
        Value::Array(items) => {
            let index = segment.as_index().ok_or_else(|| {
                Error::type_mismatch(path.as_str(), "array index", format!("key '{segment}'"))
            })?;
            if index >= items.len() {
                if index - items.len() > MAX_ARRAY_GROWTH {
                    return Err(Error::invalid_path(
                        path.as_str(),
                        format!("index {index} is too far past the end of the array"),
                    ));
                }
                items.resize(index + 1, Value::Null);
            }
            Ok(&mut items[index])
        }
        Value::Object(map) => Ok(map.entry(segment.as_key()).or_insert(Value::Null)),
        other => Err(Error::type_mismatch(
            path.as_str(),
            "array or object",
            type_name(other),
        )),
    }
}
