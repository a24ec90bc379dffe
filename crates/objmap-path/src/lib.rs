#![deny(rust_2018_idioms)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # objmap-path
//!
//! Property path syntax and traversal over `serde_json::Value` trees.
//!
//! Paths use the familiar dotted form with optional bracket segments:
//! `a.b.c`, `items[0].sku`, `lookup["key.with.dots"]`. A numeric dotted
//! segment (`d.1`) addresses an array element when the container is an array
//! and an object key otherwise.

/// Path parsing and the segment model.
pub mod path;
/// Cursor-based reads and in-place writes along a path.
pub mod traversal;

/// Parsed property path.
pub use path::{Path, Segment};
/// Traversal entry points.
pub use traversal::{Cursor, get, get_str, has, set};

use thiserror::Error;

/// Errors that can occur when parsing or following a path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Nothing found at path: {path}")]
    NotFound { path: String },

    #[error("Type mismatch at '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: String,
    },
}

impl Error {
    /// Build an invalid-path error with input path and parsing reason.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build a not-found error with the path walked so far.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Build a type-mismatch error for a container that cannot hold the next segment.
    pub fn type_mismatch(
        path: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            path: path.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }
}

/// Crate-local result type for path operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Short JSON type name used in diagnostics.
#[must_use]
pub fn type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
