//! Chainable filter context
//!
//! A [`FilterContext`] binds one source object and one registry and exposes
//! every registered filter as a chainable call on a working value. Calls never
//! short-circuit: each one runs against the current value, replaces it on
//! success and otherwise leaves it unchanged. Only the first failure is kept;
//! later failures are discarded, so a caller that needs every error has to
//! check after each chain.
//!
//! The typed methods dispatch by filter name, so a custom filter registered
//! under a default name also changes what the typed method does.

// Chain methods mirror filter names (`to_str`, `to_int`, ...) but take `&mut self`.
#![allow(clippy::wrong_self_convention)]

use crate::FilterError;
use crate::args::Arg;
use crate::dsl::MappingSpec;
use crate::registry::{Filter, FilterKind, FilterRegistry};
use serde_json::Value;

/// Whether a context has captured a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    Clean,
    Errored,
}

/// Mutable execution context for filter chains
#[derive(Debug)]
pub struct FilterContext<'a> {
    registry: &'a FilterRegistry,
    source: &'a Value,
    value: Value,
    first_error: Option<FilterError>,
    current_path: String,
}

impl<'a> FilterContext<'a> {
    /// Bind a source object and registry; the working value starts as `null`
    #[must_use]
    pub fn new(source: &'a Value, registry: &'a FilterRegistry) -> Self {
        Self {
            registry,
            source,
            value: Value::Null,
            first_error: None,
            current_path: String::new(),
        }
    }

    /// Run the filter registered under `name` against the working value.
    /// An unknown name or a wrong argument count is recorded like any other failure.
    pub fn call(&mut self, name: &str, args: &[Arg]) -> &mut Self {
        let registry = self.registry;
        match registry.get(name) {
            Some(filter) => self.apply(filter, args),
            None => {
                self.record_failure(FilterError::UnknownFilter(name.to_string()));
                self
            }
        }
    }

    /// Run a filter that need not be registered
    pub fn apply(&mut self, filter: &Filter, args: &[Arg]) -> &mut Self {
        match filter.invoke(&self.value, self.source, args) {
            Ok(value) => {
                self.value = value;
                if filter.kind() == FilterKind::Path {
                    if let Some(path) = args.first().and_then(Arg::as_str) {
                        self.current_path = path.to_string();
                    }
                }
            }
            Err(error) => self.record_failure(error),
        }
        self
    }

    fn record_failure(&mut self, error: FilterError) {
        if self.first_error.is_none() {
            self.first_error = Some(error);
        }
    }

    // Value filters

    /// Read `path` from the source object
    pub fn get(&mut self, path: &str) -> &mut Self {
        self.call("get", &[Arg::from(path)])
    }

    /// Read `path` from the source object, falling back to `default`
    pub fn get_or(&mut self, path: &str, default: impl Into<Value>) -> &mut Self {
        self.call("get", &[Arg::from(path), Arg::Value(default.into())])
    }

    /// Replace the working value
    pub fn set(&mut self, value: impl Into<Value>) -> &mut Self {
        self.call("set", &[Arg::Value(value.into())])
    }

    /// Write `value` at `path` inside the working value
    pub fn put(&mut self, path: &str, value: impl Into<Value>) -> &mut Self {
        self.call("put", &[Arg::from(path), Arg::Value(value.into())])
    }

    /// Whether the source object has a value at `path`
    pub fn has(&mut self, path: &str) -> &mut Self {
        self.call("has", &[Arg::from(path)])
    }

    pub fn identity(&mut self) -> &mut Self {
        self.call("identity", &[])
    }

    // Array filters

    pub fn flatten(&mut self, deep: bool) -> &mut Self {
        self.call("flatten", &[Arg::from(deep)])
    }

    pub fn unique(&mut self) -> &mut Self {
        self.call("unique", &[])
    }

    pub fn sum(&mut self) -> &mut Self {
        self.call("sum", &[])
    }

    /// Element at `index`; negative indexes count from the end
    pub fn child(&mut self, index: i64) -> &mut Self {
        self.call("child", &[Arg::from(index)])
    }

    pub fn nth(&mut self, index: i64) -> &mut Self {
        self.call("nth", &[Arg::from(index)])
    }

    pub fn compact(&mut self) -> &mut Self {
        self.call("compact", &[])
    }

    pub fn concat(&mut self, value: impl Into<Value>) -> &mut Self {
        self.call("concat", &[Arg::Value(value.into())])
    }

    pub fn join(&mut self, separator: &str) -> &mut Self {
        self.call("join", &[Arg::from(separator)])
    }

    pub fn reverse(&mut self) -> &mut Self {
        self.call("reverse", &[])
    }

    /// Elements from `start` up to `end` (or the end of the array)
    pub fn slice(&mut self, start: i64, end: Option<i64>) -> &mut Self {
        match end {
            Some(end) => self.call("slice", &[Arg::from(start), Arg::from(end)]),
            None => self.call("slice", &[Arg::from(start)]),
        }
    }

    pub fn length(&mut self) -> &mut Self {
        self.call("length", &[])
    }

    /// First element matching a callback or shorthand iteratee
    pub fn find(&mut self, iteratee: impl Into<Arg>) -> &mut Self {
        self.call("find", &[iteratee.into()])
    }

    pub fn find_where(&mut self, iteratee: impl Into<Arg>) -> &mut Self {
        self.call("findWhere", &[iteratee.into()])
    }

    pub fn map(&mut self, iteratee: impl Into<Arg>) -> &mut Self {
        self.call("map", &[iteratee.into()])
    }

    pub fn filter(&mut self, iteratee: impl Into<Arg>) -> &mut Self {
        self.call("filter", &[iteratee.into()])
    }

    /// Fold with a callback; without `initial` the first element seeds the fold
    pub fn reduce(&mut self, callback: impl Into<Arg>, initial: Option<Value>) -> &mut Self {
        match initial {
            Some(initial) => self.call("reduce", &[callback.into(), Arg::Value(initial)]),
            None => self.call("reduce", &[callback.into()]),
        }
    }

    /// Sort by string form
    pub fn sort(&mut self) -> &mut Self {
        self.call("sort", &[])
    }

    /// Sort with a comparator callback returning a negative, zero or positive number
    pub fn sort_with(&mut self, comparator: impl Into<Arg>) -> &mut Self {
        self.call("sort", &[comparator.into()])
    }

    // Conversion filters

    pub fn to_str(&mut self) -> &mut Self {
        self.call("toStr", &[])
    }

    pub fn to_int(&mut self, radix: u32) -> &mut Self {
        self.call("toInt", &[Arg::from(radix)])
    }

    pub fn to_float(&mut self) -> &mut Self {
        self.call("toFloat", &[])
    }

    pub fn to_bool(&mut self) -> &mut Self {
        self.call("toBool", &[])
    }

    pub fn to_array(&mut self) -> &mut Self {
        self.call("toArray", &[])
    }

    pub fn to_object(&mut self) -> &mut Self {
        self.call("toObject", &[])
    }

    pub fn stringify(&mut self) -> &mut Self {
        self.call("stringify", &[])
    }

    // Reads

    /// Copy of the working value
    #[must_use]
    pub fn value(&self) -> Value {
        self.value.clone()
    }

    #[must_use]
    pub fn value_ref(&self) -> &Value {
        &self.value
    }

    /// The working value as a spec leaf, for builder-authored mappings
    #[must_use]
    pub fn literal(&self) -> MappingSpec {
        MappingSpec::Literal(self.value.clone())
    }

    /// The first captured failure
    #[must_use]
    pub fn error(&self) -> Option<&FilterError> {
        self.first_error.as_ref()
    }

    /// Last path passed to a successful path-aware filter
    #[must_use]
    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    #[must_use]
    pub fn source(&self) -> &'a Value {
        self.source
    }

    #[must_use]
    pub fn state(&self) -> ChainState {
        if self.first_error.is_some() {
            ChainState::Errored
        } else {
            ChainState::Clean
        }
    }

    /// The working value, or the first failure
    ///
    /// # Errors
    ///
    /// Returns the first captured [`FilterError`].
    pub fn into_result(self) -> Result<Value, FilterError> {
        match self.first_error {
            Some(error) => Err(error),
            None => Ok(self.value),
        }
    }

    /// Hand the first failure to `handler` along with the source object, the
    /// current path and `args`. The handler is not called on a clean chain.
    ///
    /// # Errors
    ///
    /// Returns whatever the handler returns.
    pub fn check_error<F>(&mut self, handler: F, args: &[Arg]) -> crate::Result<&mut Self>
    where
        F: FnOnce(&FilterError, &Value, &str, &[Arg]) -> crate::Result<()>,
    {
        if let Some(error) = &self.first_error {
            handler(error, self.source, &self.current_path, args)?;
        }
        Ok(self)
    }

    /// Fail with the first captured failure, if any
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Chain`] carrying the current path.
    pub fn raise_error(&mut self) -> crate::Result<&mut Self> {
        match &self.first_error {
            Some(error) => Err(crate::Error::Chain {
                path: self.current_path.clone(),
                source: error.clone(),
            }),
            None => Ok(self),
        }
    }
}
