#![deny(rust_2018_idioms)]
#![warn(clippy::all)]

//! # objmap-mapping
//!
//! Declarative object-to-object mapping over `serde_json::Value`.
//!
//! A mapping is either data ([`MappingSpec`] loaded from YAML/JSON through
//! [`MappingDsl`]) or authored in code through a [`FilterContext`], a fluent
//! chain that runs registered filters against a source object and keeps the
//! first failure instead of raising it.
//!
//! ```rust,ignore
//! use objmap_mapping::{Mapper, MappingSpec};
//! use serde_json::json;
//!
//! let source = json!({"a": "5.2", "b": {"d": [2, 1, 3]}});
//! let output = Mapper::new().define_mapping(&source, |f| {
//!     MappingSpec::fields([
//!         ("A", f.get("a").to_int(10).to_str().to_array().literal()),
//!         ("C", f.get("b.d").sum().to_bool().literal()),
//!     ])
//! })?;
//! assert_eq!(output, json!({"A": ["5"], "C": true}));
//! ```

pub mod args;
pub mod coerce;
pub mod config;
pub mod context;
pub mod dsl;
pub mod filters;
pub mod mapper;
pub mod registry;
pub mod runtime;

pub use args::{Arg, Callback};
pub use config::MapperConfig;
pub use context::{ChainState, FilterContext};
pub use dsl::{FilterRef, MappingDsl, MappingSpec, ParseError};
pub use mapper::{Mapper, transform};
pub use registry::{Arity, Filter, FilterFn, FilterKind, FilterRegistry, FilterResult};
pub use runtime::MappingRuntime;

use thiserror::Error;

/// Failure raised by a single filter invocation
///
/// Inside a [`FilterContext`] chain these are captured rather than returned;
/// only the first one per context is kept.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid argument {index}: {message}")]
    InvalidArgument { index: usize, message: String },

    #[error("Filter '{filter}' expects {expected} argument(s), got {got}")]
    Arity {
        filter: String,
        expected: String,
        got: usize,
    },

    #[error("Unknown filter: '{0}'")]
    UnknownFilter(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Path error: {0}")]
    Path(#[from] objmap_path::Error),

    #[error("Callback error: {0}")]
    Callback(String),

    #[error("{0}")]
    Custom(String),
}

impl FilterError {
    /// Build an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Build an invalid-argument error for the argument at `index`.
    pub fn invalid_argument(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            index,
            message: message.into(),
        }
    }
}

/// Errors that can occur while building registries, loading or evaluating mappings
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown filter: '{name}'")]
    UnknownFilter { name: String },

    #[error("Invalid mapping spec at {location}: {reason}")]
    InvalidMappingSpec { location: String, reason: String },

    #[error("Mapping nesting exceeds the maximum depth of {max_depth}")]
    MaxDepthExceeded { max_depth: usize },

    #[error("Filter '{filter}' failed: {source}")]
    Filter {
        filter: String,
        #[source]
        source: FilterError,
    },

    #[error("Chain error at '{path}': {source}")]
    Chain {
        path: String,
        #[source]
        source: FilterError,
    },

    #[error("Invalid filter '{name}': {reason}")]
    InvalidFilter { name: String, reason: String },

    #[error("DSL parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build an unknown-filter error.
    pub fn unknown_filter(name: impl Into<String>) -> Self {
        Self::UnknownFilter { name: name.into() }
    }

    /// Build an invalid-spec error with the offending node's location.
    pub fn invalid_spec(location: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMappingSpec {
            location: location.into(),
            reason: reason.into(),
        }
    }

    /// Wrap a filter failure raised outside a chain.
    pub fn filter(filter: impl Into<String>, source: FilterError) -> Self {
        Self::Filter {
            filter: filter.into(),
            source,
        }
    }

    /// Build an invalid-filter registration error.
    pub fn invalid_filter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFilter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
