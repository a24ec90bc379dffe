//! Mapping runtime
//!
//! Recursive evaluator over [`MappingSpec`]. A filter leaf runs against the
//! accumulator threaded in by an enclosing sequence, or against the source
//! object when there is none (top level, first step of a top-level sequence,
//! every keyed entry).

use crate::config::MapperConfig;
use crate::dsl::{FilterRef, MappingSpec};
use crate::registry::FilterRegistry;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Runtime for evaluating mapping specs against source objects
#[derive(Debug, Clone)]
pub struct MappingRuntime {
    /// Filters available to string leaves
    registry: Arc<FilterRegistry>,

    config: MapperConfig,
}

impl MappingRuntime {
    /// Create a runtime over the default filter library
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(Arc::new(FilterRegistry::with_defaults()))
    }

    /// Create a runtime over an existing registry
    #[must_use]
    pub fn with_registry(registry: Arc<FilterRegistry>) -> Self {
        Self {
            registry,
            config: MapperConfig::default(),
        }
    }

    /// Replace the configuration
    #[must_use]
    pub fn with_config(mut self, config: MapperConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<FilterRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Evaluate a spec against a source object
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownFilter`] for an unregistered leaf,
    /// [`crate::Error::Filter`] when a leaf's filter fails, and
    /// [`crate::Error::MaxDepthExceeded`] when nesting passes the configured bound.
    pub fn evaluate(&self, source: &Value, spec: &MappingSpec) -> crate::Result<Value> {
        self.run(source, spec, None, 1)
    }

    fn run(
        &self,
        source: &Value,
        spec: &MappingSpec,
        current: Option<&Value>,
        depth: usize,
    ) -> crate::Result<Value> {
        if depth > self.config.max_depth {
            return Err(crate::Error::MaxDepthExceeded {
                max_depth: self.config.max_depth,
            });
        }
        tracing::trace!(kind = spec.kind(), depth, "evaluating mapping node");

        match spec {
            MappingSpec::FilterRef(filter) => self.run_filter(source, filter, current),
            MappingSpec::Sequence(steps) => {
                let mut output: Option<Value> = None;
                for step in steps {
                    let input = output.as_ref().or(current);
                    output = Some(self.run(source, step, input, depth + 1)?);
                }
                Ok(output.unwrap_or_else(|| Value::Array(Vec::new())))
            }
            MappingSpec::Fields(fields) => {
                let mut object = Map::new();
                for (key, field) in fields {
                    object.insert(key.clone(), self.run(source, field, None, depth + 1)?);
                }
                Ok(Value::Object(object))
            }
            MappingSpec::Literal(value) => Ok(value.clone()),
        }
    }

    fn run_filter(
        &self,
        source: &Value,
        filter: &FilterRef,
        current: Option<&Value>,
    ) -> crate::Result<Value> {
        let entry = self
            .registry
            .get(&filter.name)
            .ok_or_else(|| crate::Error::unknown_filter(&filter.name))?;
        entry
            .invoke(current.unwrap_or(source), source, &filter.arguments())
            .map_err(|e| crate::Error::filter(&filter.name, e))
    }
}

impl Default for MappingRuntime {
    fn default() -> Self {
        Self::new()
    }
}
