//! Array filters
//!
//! Collection helpers with lodash semantics. Iteratee arguments accept a
//! callback or a shorthand value: a string property path, an object matched
//! partially, or a `[path, value]` pair compared by property.

use crate::FilterError;
use crate::args::{Arg, Callback, bool_arg, callback_arg, int_arg, str_arg, value_arg};
use crate::coerce::{is_truthy, js_string, loose_eq, number_value, value_to_f64};
use crate::registry::FilterResult;
use objmap_path::Path;
use serde_json::Value;
use std::cmp::Ordering;

/// Elements of an array-like input: arrays as-is, strings as characters,
/// anything else empty.
fn array_like(input: &Value) -> Vec<Value> {
    match input {
        Value::Array(items) => items.clone(),
        Value::String(s) => s.chars().map(|c| Value::String(c.to_string())).collect(),
        _ => Vec::new(),
    }
}

/// Elements of a collection paired with their index or key. Objects iterate
/// their values in insertion order.
fn collection_entries(input: &Value) -> Vec<(Value, Value)> {
    match input {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| (value.clone(), Value::String(key.clone())))
            .collect(),
        other => array_like(other)
            .into_iter()
            .enumerate()
            .map(|(index, value)| (value, Value::from(index)))
            .collect(),
    }
}

/// Resolve a possibly negative index against `len`.
fn nth_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let resolved = if index < 0 { index + len } else { index };
    if (0..len).contains(&resolved) {
        usize::try_from(resolved).ok()
    } else {
        None
    }
}

/// Clamp a slice bound the way `Array.prototype.slice` does.
fn slice_bound(bound: i64, len: i64) -> usize {
    let resolved = if bound < 0 {
        (len + bound).max(0)
    } else {
        bound.min(len)
    };
    usize::try_from(resolved).unwrap_or(0)
}

/// Partial deep comparison: every property of `pattern` must match in `value`.
/// Array patterns match when each of their elements matches some element of
/// `value`.
#[must_use]
pub fn is_match(value: &Value, pattern: &Value) -> bool {
    match (value, pattern) {
        (Value::Object(actual), Value::Object(expected)) => expected
            .iter()
            .all(|(key, e)| actual.get(key).is_some_and(|a| is_match(a, e))),
        (Value::Array(actual), Value::Array(expected)) => expected
            .iter()
            .all(|e| actual.iter().any(|a| is_match(a, e))),
        _ => loose_eq(value, pattern),
    }
}

/// Resolved iteratee argument
enum Iteratee<'a> {
    Identity,
    Callback(&'a Callback),
    Property(Path),
    Matches(&'a Value),
    MatchesProperty(Path, &'a Value),
}

impl<'a> Iteratee<'a> {
    fn from_arg(args: &'a [Arg], index: usize) -> Result<Self, FilterError> {
        match args.get(index) {
            None | Some(Arg::Value(Value::Null)) => Ok(Self::Identity),
            Some(Arg::Func(callback)) => Ok(Self::Callback(callback)),
            Some(Arg::Value(value @ Value::Object(_))) => Ok(Self::Matches(value)),
            Some(Arg::Value(Value::Array(pair))) => match pair.as_slice() {
                [path, expected] => Ok(Self::MatchesProperty(
                    Path::parse(&js_string(path))?,
                    expected,
                )),
                _ => Err(FilterError::invalid_argument(
                    index,
                    "expected a [path, value] pair",
                )),
            },
            Some(Arg::Value(scalar)) => Ok(Self::Property(Path::parse(&js_string(scalar))?)),
        }
    }

    fn apply(&self, item: &Value, key: &Value) -> FilterResult {
        match self {
            Self::Identity => Ok(item.clone()),
            Self::Callback(callback) => callback(&[item.clone(), key.clone()]),
            Self::Property(path) => Ok(objmap_path::get(item, path).cloned().unwrap_or(Value::Null)),
            Self::Matches(pattern) => Ok(Value::Bool(is_match(item, pattern))),
            Self::MatchesProperty(path, expected) => Ok(Value::Bool(
                objmap_path::get(item, path).is_some_and(|actual| is_match(actual, expected)),
            )),
        }
    }

    fn test(&self, item: &Value, key: &Value) -> Result<bool, FilterError> {
        self.apply(item, key).map(|result| is_truthy(&result))
    }
}

fn flatten_into(item: Value, deep: bool, output: &mut Vec<Value>) {
    match item {
        Value::Array(inner) if deep => {
            for nested in inner {
                flatten_into(nested, true, output);
            }
        }
        Value::Array(inner) => output.extend(inner),
        other => output.push(other),
    }
}

/// Flatten one level, or recursively when the first argument is truthy
///
/// # Errors
///
/// Returns an error if the flag argument is a callback.
pub fn flatten(input: &Value, _source: &Value, args: &[Arg]) -> FilterResult {
    let deep = bool_arg(args, 0, false)?;
    let mut output = Vec::new();
    for item in array_like(input) {
        flatten_into(item, deep, &mut output);
    }
    Ok(Value::Array(output))
}

/// Drop repeated elements, keeping first occurrences
///
/// # Errors
///
/// Never fails.
pub fn unique(input: &Value, _source: &Value, _args: &[Arg]) -> FilterResult {
    let mut output: Vec<Value> = Vec::new();
    for item in array_like(input) {
        if !output.iter().any(|seen| loose_eq(seen, &item)) {
            output.push(item);
        }
    }
    Ok(Value::Array(output))
}

/// Add up the numbers of an array; `null` elements are skipped and
/// non-array inputs sum to 0
///
/// A non-empty string sums its characters, which yields the string itself.
///
/// # Errors
///
/// Returns an error if an element is not a number.
pub fn sum(input: &Value, _source: &Value, _args: &[Arg]) -> FilterResult {
    let items = match input {
        Value::Array(items) => items,
        Value::String(text) if !text.is_empty() => return Ok(input.clone()),
        _ => return Ok(Value::from(0)),
    };

    let mut exact = Some(0_i64);
    let mut approximate = 0.0_f64;
    for (index, item) in items.iter().enumerate() {
        let number = match item {
            Value::Null => continue,
            Value::Number(number) => number,
            other => {
                return Err(FilterError::invalid_input(format!(
                    "cannot sum element {index} of type {}",
                    objmap_path::type_name(other)
                )));
            }
        };
        exact = exact.and_then(|total| number.as_i64().and_then(|n| total.checked_add(n)));
        approximate += number.as_f64().unwrap_or_default();
    }

    match exact {
        Some(total) => Ok(Value::from(total)),
        None => number_value(approximate),
    }
}

/// Element at an index (default 0); negative indexes count from the end
///
/// # Errors
///
/// Returns an error if the index argument is not an integer.
pub fn child(input: &Value, _source: &Value, args: &[Arg]) -> FilterResult {
    let index = int_arg(args, 0)?.unwrap_or(0);
    let items = array_like(input);
    Ok(nth_index(index, items.len())
        .and_then(|i| items.into_iter().nth(i))
        .unwrap_or(Value::Null))
}

/// Drop falsy elements
///
/// # Errors
///
/// Never fails.
pub fn compact(input: &Value, _source: &Value, _args: &[Arg]) -> FilterResult {
    Ok(Value::Array(
        array_like(input).into_iter().filter(is_truthy).collect(),
    ))
}

/// Wrap the input in an array and append the argument; array arguments are
/// spread one level and falsy arguments are not appended
///
/// # Errors
///
/// Returns an error if the argument is a callback.
pub fn concat(input: &Value, _source: &Value, args: &[Arg]) -> FilterResult {
    let mut output = match input {
        Value::Array(items) => items.clone(),
        other => vec![other.clone()],
    };
    match value_arg(args, 0)? {
        None => {}
        Some(extra) if !is_truthy(extra) => {}
        Some(Value::Array(extra)) => output.extend(extra.iter().cloned()),
        Some(extra) => output.push(extra.clone()),
    }
    Ok(Value::Array(output))
}

/// Join elements into a string with an optional separator; a missing or
/// falsy separator joins with the empty string
///
/// # Errors
///
/// Returns an error if the separator is not a string or scalar.
pub fn join(input: &Value, _source: &Value, args: &[Arg]) -> FilterResult {
    let separator = match value_arg(args, 0)? {
        Some(token) if !is_truthy(token) => String::new(),
        _ => str_arg(args, 0)?.unwrap_or_default(),
    };
    let parts: Vec<String> = array_like(input)
        .iter()
        .map(|item| match item {
            Value::Null => String::new(),
            other => js_string(other),
        })
        .collect();
    Ok(Value::String(parts.join(&separator)))
}

/// Reverse an array; other inputs pass through
///
/// # Errors
///
/// Never fails.
pub fn reverse(input: &Value, _source: &Value, _args: &[Arg]) -> FilterResult {
    Ok(match input {
        Value::Array(items) => Value::Array(items.iter().rev().cloned().collect()),
        other => other.clone(),
    })
}

/// Elements from `start` (default 0) up to but excluding `end` (default the
/// length); negative bounds count from the end
///
/// # Errors
///
/// Returns an error if a bound is not an integer.
pub fn slice(input: &Value, _source: &Value, args: &[Arg]) -> FilterResult {
    let items = array_like(input);
    let len = i64::try_from(items.len()).unwrap_or(i64::MAX);
    let start = slice_bound(int_arg(args, 0)?.unwrap_or(0), len);
    let end = slice_bound(int_arg(args, 1)?.unwrap_or(len), len);
    Ok(Value::Array(
        items
            .into_iter()
            .skip(start)
            .take(end.saturating_sub(start))
            .collect(),
    ))
}

/// Length of an array or string; 0 for anything else
///
/// # Errors
///
/// Never fails.
pub fn length(input: &Value, _source: &Value, _args: &[Arg]) -> FilterResult {
    Ok(Value::from(match input {
        Value::Array(items) => items.len(),
        Value::String(s) => s.chars().count(),
        _ => 0,
    }))
}

/// First element matching the iteratee, or `null`
///
/// # Errors
///
/// Returns an error for a malformed iteratee or a failing callback.
pub fn find(input: &Value, _source: &Value, args: &[Arg]) -> FilterResult {
    let iteratee = Iteratee::from_arg(args, 0)?;
    for (item, key) in collection_entries(input) {
        if iteratee.test(&item, &key)? {
            return Ok(item);
        }
    }
    Ok(Value::Null)
}

/// All elements matching the iteratee
///
/// # Errors
///
/// Returns an error for a malformed iteratee or a failing callback.
pub fn find_where(input: &Value, source: &Value, args: &[Arg]) -> FilterResult {
    filter(input, source, args)
}

/// Apply the iteratee to every element
///
/// # Errors
///
/// Returns an error for a malformed iteratee or a failing callback.
pub fn map(input: &Value, _source: &Value, args: &[Arg]) -> FilterResult {
    let iteratee = Iteratee::from_arg(args, 0)?;
    collection_entries(input)
        .iter()
        .map(|(item, key)| iteratee.apply(item, key))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

/// Keep elements the iteratee accepts
///
/// # Errors
///
/// Returns an error for a malformed iteratee or a failing callback.
pub fn filter(input: &Value, _source: &Value, args: &[Arg]) -> FilterResult {
    let iteratee = Iteratee::from_arg(args, 0)?;
    let mut output = Vec::new();
    for (item, key) in collection_entries(input) {
        if iteratee.test(&item, &key)? {
            output.push(item);
        }
    }
    Ok(Value::Array(output))
}

/// Fold the collection with a callback `(accumulator, element, key)`.
/// Without an initial value the first element seeds the accumulator.
///
/// # Errors
///
/// Returns an error if the first argument is not a callback or the callback fails.
pub fn reduce(input: &Value, _source: &Value, args: &[Arg]) -> FilterResult {
    let callback = callback_arg(args, 0)?;
    let mut entries = collection_entries(input).into_iter();
    let mut accumulator = match value_arg(args, 1)? {
        Some(initial) => initial.clone(),
        None => match entries.next() {
            Some((first, _)) => first,
            None => return Ok(Value::Null),
        },
    };
    for (item, key) in entries {
        accumulator = callback(&[accumulator, item, key])?;
    }
    Ok(accumulator)
}

/// Sort an array; non-arrays pass through. Without a comparator elements
/// are ordered by their string form.
///
/// # Errors
///
/// Returns an error if the comparator is not a callback or fails.
pub fn sort(input: &Value, _source: &Value, args: &[Arg]) -> FilterResult {
    let Value::Array(items) = input else {
        return Ok(input.clone());
    };
    let mut items = items.clone();
    match args.first() {
        None | Some(Arg::Value(Value::Null)) => {
            items.sort_by_cached_key(js_string);
            Ok(Value::Array(items))
        }
        Some(Arg::Func(compare)) => merge_sort(items, compare).map(Value::Array),
        Some(Arg::Value(_)) => Err(FilterError::invalid_argument(
            0,
            "sort comparator must be a callback",
        )),
    }
}

fn compare_with(compare: &Callback, a: &Value, b: &Value) -> Result<Ordering, FilterError> {
    let order = match compare(&[a.clone(), b.clone()])? {
        Value::Bool(flag) => f64::from(u8::from(flag)),
        Value::Null => 0.0,
        other => value_to_f64(&other, "comparator result")
            .map_err(|e| FilterError::Callback(e.to_string()))?,
    };
    Ok(order.partial_cmp(&0.0).unwrap_or(Ordering::Equal))
}

/// Stable merge sort that stops at the first comparator failure.
fn merge_sort(mut items: Vec<Value>, compare: &Callback) -> Result<Vec<Value>, FilterError> {
    if items.len() <= 1 {
        return Ok(items);
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(items, compare)?;
    let right = merge_sort(right, compare)?;

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        let next = if compare_with(compare, l, r)? == Ordering::Greater {
            right.next()
        } else {
            left.next()
        };
        merged.extend(next);
    }
    merged.extend(left);
    merged.extend(right);
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(filter: fn(&Value, &Value, &[Arg]) -> FilterResult, input: Value, args: &[Arg]) -> Value {
        filter(&input, &Value::Null, args).unwrap()
    }

    #[test]
    fn test_flatten_shallow_and_deep() {
        let nested = json!([[3], [[4], 5], [[[[[6]]]]]]);
        assert_eq!(run(flatten, nested.clone(), &[]), json!([3, [4], 5, [[[[6]]]]]));
        assert_eq!(run(flatten, nested, &[Arg::from(true)]), json!([3, 4, 5, 6]));
    }

    #[test]
    fn test_flatten_non_arrays() {
        assert_eq!(run(flatten, json!(4), &[]), json!([]));
        assert_eq!(run(flatten, json!({"answer": 42}), &[]), json!([]));
        assert_eq!(run(flatten, json!("hey"), &[]), json!(["h", "e", "y"]));
        assert_eq!(
            run(flatten, json!([[1], [[2]]]), &[Arg::from("false")]),
            json!([1, [2]])
        );
    }

    #[test]
    fn test_unique() {
        assert_eq!(run(unique, json!([4, 3, 4, 2, [3]]), &[]), json!([4, 3, 2, [3]]));
        assert_eq!(run(unique, json!("hello"), &[]), json!(["h", "e", "l", "o"]));
        assert_eq!(run(unique, json!(null), &[]), json!([]));
    }

    #[test]
    fn test_sum() {
        assert_eq!(run(sum, json!([3, 4, 5]), &[]), json!(12));
        assert_eq!(run(sum, json!([1.5, 2, null]), &[]), json!(3.5));
        assert_eq!(run(sum, json!(4), &[]), json!(0));
        assert_eq!(run(sum, json!({"answer": 42}), &[]), json!(0));
    }

    #[test]
    fn test_sum_string_yields_itself() {
        assert_eq!(run(sum, json!("hello"), &[]), json!("hello"));
        assert_eq!(run(sum, json!(""), &[]), json!(0));
        assert!(sum(&json!([1, "2"]), &Value::Null, &[]).is_err());
    }

    #[test]
    fn test_sum_overflow_falls_back_to_float() {
        let result = run(sum, json!([i64::MAX, 1]), &[]);
        assert!(result.is_f64());
    }

    #[test]
    fn test_child() {
        assert_eq!(run(child, json!([3, 4, 5]), &[]), json!(3));
        assert_eq!(run(child, json!("hello"), &[]), json!("h"));
        assert_eq!(run(child, json!([4, 3, 4, 3]), &[Arg::from(3_i64)]), json!(3));
        assert_eq!(run(child, json!([4, 3, 4, 3]), &[Arg::from(5_i64)]), json!(null));
        assert_eq!(run(child, json!([4, 3, 4, 3]), &[Arg::from("-2")]), json!(4));
        assert_eq!(run(child, json!({"answer": 42}), &[]), json!(null));
    }

    #[test]
    fn test_compact() {
        assert_eq!(
            run(compact, json!([false, 0, null, "", 1, "a"]), &[]),
            json!([1, "a"])
        );
        assert_eq!(run(compact, json!(4.5), &[]), json!([]));
    }

    #[test]
    fn test_concat() {
        assert_eq!(run(concat, json!([1]), &[Arg::from(4_i64)]), json!([1, 4]));
        assert_eq!(run(concat, json!(1), &[Arg::from(4_i64)]), json!([1, 4]));
        assert_eq!(run(concat, json!("hello"), &[]), json!(["hello"]));
        assert_eq!(run(concat, json!([1]), &[Arg::from(json!([2, 3]))]), json!([1, 2, 3]));
        assert_eq!(run(concat, json!([1]), &[Arg::from(true)]), json!([1, true]));
    }

    #[test]
    fn test_concat_skips_falsy_argument() {
        for falsy in [json!(0), json!(false), json!(""), json!(null)] {
            assert_eq!(run(concat, json!([1]), &[Arg::from(falsy)]), json!([1]));
        }
        assert_eq!(run(concat, json!(2), &[Arg::from(0_i64)]), json!([2]));
    }

    #[test]
    fn test_join() {
        assert_eq!(run(join, json!([3, 4, 5]), &[]), json!("345"));
        assert_eq!(run(join, json!([1, 4, 5]), &[Arg::from("-")]), json!("1-4-5"));
        assert_eq!(run(join, json!("hello"), &[]), json!("hello"));
        assert_eq!(run(join, json!(4), &[]), json!(""));
    }

    #[test]
    fn test_join_falsy_separator_is_empty() {
        assert_eq!(run(join, json!([1, 2]), &[Arg::from(0_i64)]), json!("12"));
        assert_eq!(run(join, json!([1, 2]), &[Arg::from(false)]), json!("12"));
        assert_eq!(run(join, json!([1, 2]), &[Arg::from(json!(null))]), json!("12"));
    }

    #[test]
    fn test_reverse() {
        assert_eq!(run(reverse, json!([3, 4, 5]), &[]), json!([5, 4, 3]));
        assert_eq!(
            run(reverse, json!({"answer": 42, "me": 2}), &[]),
            json!({"answer": 42, "me": 2})
        );
    }

    #[test]
    fn test_slice() {
        let input = json!([1, 4, 5]);
        assert_eq!(run(slice, input.clone(), &[]), json!([1, 4, 5]));
        assert_eq!(run(slice, input.clone(), &[Arg::from(1_i64), Arg::from(1_i64)]), json!([]));
        assert_eq!(run(slice, input.clone(), &[Arg::from(1_i64), Arg::from(2_i64)]), json!([4]));
        assert_eq!(run(slice, input.clone(), &[Arg::from(0_i64), Arg::from(-1_i64)]), json!([1, 4]));
        assert_eq!(run(slice, input, &[Arg::from(5_i64)]), json!([]));
        assert_eq!(run(slice, json!("hello"), &[Arg::from("3")]), json!(["l", "o"]));
    }

    #[test]
    fn test_length() {
        assert_eq!(run(length, json!([3, 4, 5]), &[]), json!(3));
        assert_eq!(run(length, json!("hello"), &[]), json!(5));
        assert_eq!(run(length, json!({"answer": 42}), &[]), json!(0));
    }

    #[test]
    fn test_find_shorthands() {
        let input = json!([{"a": 3}, {"a": 4}, {"b": 5}]);
        assert_eq!(run(find, input.clone(), &[Arg::from("a")]), json!({"a": 3}));
        assert_eq!(run(find, input.clone(), &[Arg::from(json!({"b": 5}))]), json!({"b": 5}));
        assert_eq!(run(find, input.clone(), &[Arg::from(json!({"b": 2}))]), json!(null));
        assert_eq!(run(find, input, &[Arg::from(json!(["a", 4]))]), json!({"a": 4}));
    }

    #[test]
    fn test_find_where() {
        let input = json!([{"a": 3}, {"a": 4}, {"b": 5}]);
        assert_eq!(
            run(find_where, input.clone(), &[Arg::from("a")]),
            json!([{"a": 3}, {"a": 4}])
        );
        assert_eq!(run(find_where, input.clone(), &[Arg::from(json!({"a": 3}))]), json!([{"a": 3}]));
        assert_eq!(run(find_where, input, &[Arg::from(json!({"a": 1}))]), json!([]));
    }

    #[test]
    fn test_map_with_callback_and_property() {
        let plus_two = Arg::func(|args| Ok(json!(args[0].as_i64().unwrap_or(0) + 2)));
        assert_eq!(run(map, json!([3, 4, 5]), &[plus_two]), json!([5, 6, 7]));

        let caret = Arg::func(|args| Ok(json!(format!("{}^", js_string(&args[0])))));
        assert_eq!(
            run(map, json!("hello"), &[caret]),
            json!(["h^", "e^", "l^", "l^", "o^"])
        );

        assert_eq!(
            run(map, json!([{"n": 1}, {"n": 2}, {}]), &[Arg::from("n")]),
            json!([1, 2, null])
        );
    }

    #[test]
    fn test_filter_with_callback() {
        let positive = Arg::func(|args| Ok(json!(args[0].as_i64().is_some_and(|n| n > 0))));
        assert_eq!(run(filter, json!([3, -4, -5]), &[positive]), json!([3]));

        let is_l = Arg::func(|args| Ok(json!(args[0] == json!("l"))));
        assert_eq!(run(filter, json!("hello"), &[is_l]), json!(["l", "l"]));
    }

    #[test]
    fn test_callback_failure_propagates() {
        let failing = Arg::func(|_| Err(FilterError::Callback("boom".to_string())));
        let error = map(&json!([1]), &Value::Null, &[failing]).unwrap_err();
        assert_eq!(error, FilterError::Callback("boom".to_string()));
    }

    #[test]
    fn test_reduce() {
        let add = || {
            Arg::func(|args| {
                Ok(match (&args[0], &args[1]) {
                    (Value::String(a), b) => json!(format!("{a}{}", js_string(b))),
                    (a, b) => json!(a.as_i64().unwrap_or(0) + b.as_i64().unwrap_or(0)),
                })
            })
        };
        assert_eq!(run(reduce, json!([3, 4, 5]), &[add(), Arg::from(0_i64)]), json!(12));
        assert_eq!(run(reduce, json!([3, 4, 5]), &[add(), Arg::from(10_i64)]), json!(22));
        assert_eq!(
            run(reduce, json!("hello"), &[add(), Arg::from("world ")]),
            json!("world hello")
        );
        assert_eq!(run(reduce, json!([3, 4, 5]), &[add()]), json!(12));
        assert_eq!(run(reduce, json!([]), &[add()]), json!(null));
    }

    #[test]
    fn test_reduce_requires_callback() {
        let error = reduce(&json!([1]), &Value::Null, &[Arg::from("add")]).unwrap_err();
        assert!(matches!(error, FilterError::InvalidArgument { index: 0, .. }));
    }

    #[test]
    fn test_sort_default_string_order() {
        assert_eq!(run(sort, json!([300, 4, 15]), &[]), json!([15, 300, 4]));
        assert_eq!(
            run(sort, json!(["h", "e", "l", "l", "o"]), &[]),
            json!(["e", "h", "l", "l", "o"])
        );
        assert_eq!(run(sort, json!("hello"), &[]), json!("hello"));
        assert_eq!(run(sort, json!(4.5), &[]), json!(4.5));
    }

    #[test]
    fn test_sort_with_comparator() {
        let ascending = Arg::func(|args| {
            Ok(json!(args[0].as_i64().unwrap_or(0) - args[1].as_i64().unwrap_or(0)))
        });
        let descending = Arg::func(|args| {
            Ok(json!(args[1].as_i64().unwrap_or(0) - args[0].as_i64().unwrap_or(0)))
        });
        assert_eq!(run(sort, json!([300, 4, 15]), &[ascending]), json!([4, 15, 300]));
        assert_eq!(run(sort, json!([300, 4, 15]), &[descending]), json!([300, 15, 4]));
    }

    #[test]
    fn test_sort_comparator_is_stable() {
        let by_rank = Arg::func(|args| {
            let rank = |v: &Value| v["rank"].as_i64().unwrap_or(0);
            Ok(json!(rank(&args[0]) - rank(&args[1])))
        });
        let input = json!([
            {"rank": 2, "id": "a"},
            {"rank": 1, "id": "b"},
            {"rank": 2, "id": "c"},
            {"rank": 1, "id": "d"}
        ]);
        let sorted = run(sort, input, &[by_rank]);
        let ids: Vec<&str> = sorted
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_sort_comparator_bad_result() {
        let broken = Arg::func(|_| Ok(json!("later")));
        let error = sort(&json!([2, 1]), &Value::Null, &[broken]).unwrap_err();
        assert!(matches!(error, FilterError::Callback(_)));
    }

    #[test]
    fn test_is_match_partial_deep() {
        let value = json!({"a": {"b": 1, "c": 2}, "tags": ["x", "y"]});
        assert!(is_match(&value, &json!({"a": {"b": 1}})));
        assert!(is_match(&value, &json!({"tags": ["y"]})));
        assert!(!is_match(&value, &json!({"a": {"b": 2}})));
        assert!(!is_match(&value, &json!({"missing": null})));
    }
}
