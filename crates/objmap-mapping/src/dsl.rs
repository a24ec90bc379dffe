//! Mapping DSL
//!
//! A mapping is data: a string is a filter token (`name:arg1:arg2`), a
//! sequence is a left-to-right pipeline, and a mapping produces an object with
//! one output key per entry. Specs load from YAML or JSON, or are built in
//! code with the [`MappingSpec`] constructors.

use crate::args::Arg;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::fmt;

/// A parsed `name:arg1:arg2` filter token
///
/// Tokens split on every `:` with no escaping, so arguments cannot contain a
/// colon. Arguments stay strings; filters coerce them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRef {
    pub name: String,
    pub args: Vec<String>,
}

impl FilterRef {
    /// Split a token into filter name and arguments
    #[must_use]
    pub fn parse(token: &str) -> Self {
        let mut parts = token.split(':');
        let name = parts.next().unwrap_or_default().to_string();
        Self {
            name,
            args: parts.map(str::to_string).collect(),
        }
    }

    /// Arguments as filter [`Arg`]s
    #[must_use]
    pub fn arguments(&self) -> Vec<Arg> {
        self.args.iter().map(|arg| Arg::from(arg.as_str())).collect()
    }
}

impl fmt::Display for FilterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for arg in &self.args {
            write!(f, ":{arg}")?;
        }
        Ok(())
    }
}

/// Mapping specification
#[derive(Debug, Clone, PartialEq)]
pub enum MappingSpec {
    /// String leaf naming a filter
    FilterRef(FilterRef),

    /// Left fold: each step receives the previous step's output
    Sequence(Vec<MappingSpec>),

    /// Keyed fan-out; keys are unique and keep their order
    Fields(Vec<(String, MappingSpec)>),

    /// Value computed while authoring; evaluates to itself
    Literal(Value),
}

impl MappingSpec {
    /// Filter token leaf
    #[must_use]
    pub fn filter(token: &str) -> Self {
        Self::FilterRef(FilterRef::parse(token))
    }

    /// Pipeline of steps
    pub fn sequence(steps: impl IntoIterator<Item = MappingSpec>) -> Self {
        Self::Sequence(steps.into_iter().collect())
    }

    /// Keyed mapping. A repeated key replaces the earlier entry in place.
    pub fn fields<K: Into<String>>(entries: impl IntoIterator<Item = (K, MappingSpec)>) -> Self {
        let mut fields: Vec<(String, MappingSpec)> = Vec::new();
        for (key, spec) in entries {
            let key = key.into();
            match fields.iter_mut().find(|(existing, _)| *existing == key) {
                Some(slot) => slot.1 = spec,
                None => fields.push((key, spec)),
            }
        }
        Self::Fields(fields)
    }

    /// Embedded value
    #[must_use]
    pub fn literal(value: Value) -> Self {
        Self::Literal(value)
    }

    /// Short name of the variant, for diagnostics
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FilterRef(_) => "filter",
            Self::Sequence(_) => "sequence",
            Self::Fields(_) => "fields",
            Self::Literal(_) => "literal",
        }
    }

    /// Convert raw mapping data
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidMappingSpec`] for any node that is not a
    /// string, array or object, located by JSON pointer.
    pub fn from_value(value: &Value) -> crate::Result<Self> {
        Self::from_value_at(value, "")
    }

    fn from_value_at(value: &Value, location: &str) -> crate::Result<Self> {
        match value {
            Value::String(token) => Ok(Self::filter(token)),
            Value::Array(steps) => steps
                .iter()
                .enumerate()
                .map(|(index, step)| Self::from_value_at(step, &format!("{location}/{index}")))
                .collect::<crate::Result<Vec<_>>>()
                .map(Self::Sequence),
            Value::Object(entries) => entries
                .iter()
                .map(|(key, entry)| {
                    let child = format!("{location}/{}", escape_pointer(key));
                    Ok((key.clone(), Self::from_value_at(entry, &child)?))
                })
                .collect::<crate::Result<Vec<_>>>()
                .map(Self::Fields),
            other => Err(crate::Error::invalid_spec(
                if location.is_empty() { "/" } else { location },
                format!(
                    "expected a filter token, sequence or mapping, found {}",
                    objmap_path::type_name(other)
                ),
            )),
        }
    }

    /// Convert back to raw mapping data
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidMappingSpec`] when the spec embeds a
    /// literal, which has no data form.
    pub fn to_value(&self) -> crate::Result<Value> {
        match self {
            Self::FilterRef(filter) => Ok(Value::String(filter.to_string())),
            Self::Sequence(steps) => steps
                .iter()
                .map(Self::to_value)
                .collect::<crate::Result<Vec<_>>>()
                .map(Value::Array),
            Self::Fields(fields) => {
                let mut map = Map::new();
                for (key, spec) in fields {
                    map.insert(key.clone(), spec.to_value()?);
                }
                Ok(Value::Object(map))
            }
            Self::Literal(_) => Err(crate::Error::invalid_spec(
                "/",
                "literal values have no mapping data form",
            )),
        }
    }
}

fn escape_pointer(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

impl<'de> Deserialize<'de> for MappingSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// DSL Parser
pub struct MappingDsl;

/// Parse error type
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let (Some(line), Some(col)) = (self.line, self.column) {
            write!(f, " at line {line}, column {col}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl MappingDsl {
    /// Create a new mapping DSL instance
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse a mapping from YAML
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Parse`] when YAML parsing fails and
    /// [`crate::Error::InvalidMappingSpec`] for unsupported nodes.
    pub fn parse(yaml: &str) -> crate::Result<MappingSpec> {
        let value: Value = serde_yaml::from_str(yaml).map_err(|e| ParseError {
            message: format!("Failed to parse DSL: {e}"),
            line: e.location().map(|l| l.line()),
            column: e.location().map(|l| l.column()),
        })?;
        MappingSpec::from_value(&value)
    }

    /// Parse a mapping from JSON
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Parse`] when JSON parsing fails and
    /// [`crate::Error::InvalidMappingSpec`] for unsupported nodes.
    pub fn parse_json(json: &str) -> crate::Result<MappingSpec> {
        let value: Value = serde_json::from_str(json).map_err(|e| ParseError {
            message: format!("Failed to parse JSON mapping: {e}"),
            line: Some(e.line()),
            column: Some(e.column()),
        })?;
        MappingSpec::from_value(&value)
    }

    /// Parse a mapping from a file; `.json` files are read as JSON, anything
    /// else as YAML
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed.
    pub fn parse_file(path: &std::path::Path) -> crate::Result<MappingSpec> {
        let content = std::fs::read_to_string(path).map_err(|e| ParseError {
            message: format!("Failed to read file: {e}"),
            line: None,
            column: None,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::parse_json(&content)
        } else {
            Self::parse(&content)
        }
    }

    /// Serialize a mapping to YAML
    ///
    /// # Errors
    ///
    /// Returns an error when the mapping embeds a literal or serialization fails.
    pub fn to_yaml(spec: &MappingSpec) -> crate::Result<String> {
        let value = spec.to_value()?;
        Ok(serde_yaml::to_string(&value).map_err(|e| ParseError {
            message: format!("Failed to serialize: {e}"),
            line: None,
            column: None,
        })?)
    }
}

impl Default for MappingDsl {
    fn default() -> Self {
        Self::new()
    }
}
