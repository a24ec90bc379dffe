//! Filter registry
//!
//! Maps filter names to [`Filter`] entries. A registry is built once per
//! mapping run by merging the default library with caller filters (caller wins
//! on name collision) and is read-only afterwards.

use crate::args::Arg;
use crate::{FilterError, filters};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Result of a single filter invocation
pub type FilterResult = std::result::Result<Value, FilterError>;

/// Type alias for filter function: `(input, source, args) -> new value`
pub type FilterFn = Arc<dyn Fn(&Value, &Value, &[Arg]) -> FilterResult + Send + Sync>;

/// How a chain records a call to this filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// Updates only the chain value
    Value,

    /// Also records a string first argument as the chain's current path
    Path,
}

/// Number of explicit arguments a filter accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: Option<usize>,
}

impl Arity {
    /// No explicit arguments
    #[must_use]
    pub const fn none() -> Self {
        Self { min: 0, max: Some(0) }
    }

    /// Exactly `n` arguments
    #[must_use]
    pub const fn exactly(n: usize) -> Self {
        Self { min: n, max: Some(n) }
    }

    /// Between `min` and `max` arguments, inclusive
    #[must_use]
    pub const fn between(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    /// At least `min` arguments
    #[must_use]
    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    /// Whether `count` arguments satisfy this arity
    #[must_use]
    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min && self.max.is_none_or(|max| count <= max)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{max}"),
            Some(max) => write!(f, "{} to {max}", self.min),
            None => write!(f, "at least {}", self.min),
        }
    }
}

/// A named filter with a declared arity
#[derive(Clone)]
pub struct Filter {
    name: String,
    arity: Arity,
    kind: FilterKind,
    func: FilterFn,
}

impl Filter {
    /// Create a value filter
    pub fn new(
        name: impl Into<String>,
        arity: Arity,
        func: impl Fn(&Value, &Value, &[Arg]) -> FilterResult + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            arity,
            kind: FilterKind::Value,
            func: Arc::new(func),
        }
    }

    /// Create a path-aware filter
    pub fn path(
        name: impl Into<String>,
        arity: Arity,
        func: impl Fn(&Value, &Value, &[Arg]) -> FilterResult + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, arity, func).with_kind(FilterKind::Path)
    }

    /// Override the chain behaviour
    #[must_use]
    pub fn with_kind(mut self, kind: FilterKind) -> Self {
        self.kind = kind;
        self
    }

    /// Same function registered under another name
    #[must_use]
    pub fn alias(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn arity(&self) -> Arity {
        self.arity
    }

    #[must_use]
    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// Invoke the filter after checking the argument count
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::Arity`] when `args` does not match the declared
    /// arity, or whatever the filter itself fails with.
    pub fn invoke(&self, input: &Value, source: &Value, args: &[Arg]) -> FilterResult {
        if !self.arity.accepts(args.len()) {
            return Err(FilterError::Arity {
                filter: self.name.clone(),
                expected: self.arity.to_string(),
                got: args.len(),
            });
        }
        (self.func)(input, source, args)
    }

    /// Check the entry can be registered and referenced from a token
    fn validate(&self) -> crate::Result<()> {
        if self.name.is_empty() {
            return Err(crate::Error::invalid_filter(&self.name, "name is empty"));
        }
        if self.name.contains(':') {
            return Err(crate::Error::invalid_filter(
                &self.name,
                "name must not contain ':'",
            ));
        }
        if self.name.chars().any(char::is_whitespace) {
            return Err(crate::Error::invalid_filter(
                &self.name,
                "name must not contain whitespace",
            ));
        }
        if self.arity.max.is_some_and(|max| max < self.arity.min) {
            return Err(crate::Error::invalid_filter(
                &self.name,
                format!(
                    "maximum arity {} is below minimum {}",
                    self.arity.max.unwrap_or_default(),
                    self.arity.min
                ),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Registry of filters by name
#[derive(Debug, Default, Clone)]
pub struct FilterRegistry {
    filters: HashMap<String, Filter>,
}

impl FilterRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            filters: HashMap::new(),
        }
    }

    /// Registry holding the default filter library
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for filter in filters::default_filters() {
            debug_assert!(filter.validate().is_ok(), "invalid default filter {filter:?}");
            registry.filters.insert(filter.name.clone(), filter);
        }
        registry
    }

    /// Merge `custom` over `defaults`; on name collision the custom entry wins
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidFilter`] for the first entry that fails validation.
    pub fn build(
        defaults: impl IntoIterator<Item = Filter>,
        custom: impl IntoIterator<Item = Filter>,
    ) -> crate::Result<Self> {
        let mut registry = Self::new();
        for filter in defaults {
            registry.register(filter)?;
        }
        let default_count = registry.len();
        let mut custom_count = 0;
        for filter in custom {
            registry.register(filter)?;
            custom_count += 1;
        }
        tracing::debug!(
            defaults = default_count,
            custom = custom_count,
            total = registry.len(),
            "built filter registry"
        );
        Ok(registry)
    }

    /// A new registry with `custom` merged over this one; `self` is left untouched
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidFilter`] for the first entry that fails validation.
    pub fn merged(&self, custom: impl IntoIterator<Item = Filter>) -> crate::Result<Self> {
        Self::build(self.filters.values().cloned(), custom)
    }

    /// Register a filter, replacing any entry with the same name
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidFilter`] when the name or arity is malformed.
    pub fn register(&mut self, filter: Filter) -> crate::Result<&mut Self> {
        filter.validate()?;
        self.filters.insert(filter.name.clone(), filter);
        Ok(self)
    }

    /// Get a filter by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Filter> {
        self.filters.get(name)
    }

    /// Check if a filter exists
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Invoke a filter by name
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::UnknownFilter`] when no filter has that name,
    /// otherwise the result of [`Filter::invoke`].
    pub fn invoke(&self, name: &str, input: &Value, source: &Value, args: &[Arg]) -> FilterResult {
        self.get(name)
            .ok_or_else(|| FilterError::UnknownFilter(name.to_string()))?
            .invoke(input, source, args)
    }

    /// Registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.filters.keys().cloned().collect();
        names.sort();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}
