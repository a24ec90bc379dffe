//! Mapping entry points

use crate::FilterContext;
use crate::config::MapperConfig;
use crate::dsl::MappingSpec;
use crate::registry::{Filter, FilterRegistry};
use crate::runtime::MappingRuntime;
use serde_json::Value;
use std::sync::Arc;

/// Reusable mapper: a merged filter registry plus configuration
#[derive(Debug, Clone, Default)]
pub struct Mapper {
    runtime: MappingRuntime,
}

impl Mapper {
    /// Mapper over the default filter library
    #[must_use]
    pub fn new() -> Self {
        Self {
            runtime: MappingRuntime::new(),
        }
    }

    /// Mapper over the default filters merged with `custom`; custom filters
    /// replace defaults of the same name
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidFilter`] when a custom filter is malformed.
    pub fn with_filters(custom: impl IntoIterator<Item = Filter>) -> crate::Result<Self> {
        let registry = FilterRegistry::build(crate::filters::default_filters(), custom)?;
        Ok(Self {
            runtime: MappingRuntime::with_registry(Arc::new(registry)),
        })
    }

    /// Replace the configuration
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] when the configuration is invalid.
    pub fn with_config(self, config: MapperConfig) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self {
            runtime: self.runtime.with_config(config),
        })
    }

    #[must_use]
    pub fn runtime(&self) -> &MappingRuntime {
        &self.runtime
    }

    #[must_use]
    pub fn registry(&self) -> &FilterRegistry {
        self.runtime.registry()
    }

    #[must_use]
    pub fn config(&self) -> &MapperConfig {
        self.runtime.config()
    }

    /// Chain context bound to `source` and this mapper's filters
    #[must_use]
    pub fn context<'a>(&'a self, source: &'a Value) -> FilterContext<'a> {
        FilterContext::new(source, self.registry())
    }

    /// Evaluate a spec against `source`
    ///
    /// # Errors
    ///
    /// Propagates evaluation errors from [`MappingRuntime::evaluate`].
    pub fn transform(&self, source: &Value, spec: &MappingSpec) -> crate::Result<Value> {
        tracing::debug!(kind = spec.kind(), "running mapping");
        self.runtime.evaluate(source, spec)
    }

    /// Author a mapping with a chain context bound to `source`, then evaluate it.
    ///
    /// Chain failures stay in the context; the result is built from whatever
    /// values the chains reached. Use [`Mapper::try_define_mapping`] to stop
    /// on them.
    ///
    /// # Errors
    ///
    /// Propagates evaluation errors from [`MappingRuntime::evaluate`].
    pub fn define_mapping<F>(&self, source: &Value, builder: F) -> crate::Result<Value>
    where
        F: FnOnce(&mut FilterContext<'_>) -> MappingSpec,
    {
        let mut context = self.context(source);
        let spec = builder(&mut context);
        if let Some(error) = context.error() {
            tracing::debug!(path = context.current_path(), %error, "mapping built with a chain error");
        }
        self.transform(source, &spec)
    }

    /// Like [`Mapper::define_mapping`], with a builder that can fail, e.g. through
    /// [`FilterContext::raise_error`] or [`FilterContext::check_error`]
    ///
    /// # Errors
    ///
    /// Returns the builder's error, or an evaluation error.
    pub fn try_define_mapping<F>(&self, source: &Value, builder: F) -> crate::Result<Value>
    where
        F: FnOnce(&mut FilterContext<'_>) -> crate::Result<MappingSpec>,
    {
        let mut context = self.context(source);
        let spec = builder(&mut context)?;
        self.transform(source, &spec)
    }
}

/// Evaluate `spec` against `source` with the default filters extended by `custom_filters`
///
/// # Errors
///
/// Returns [`crate::Error::InvalidFilter`] for a malformed custom filter, or any
/// evaluation error.
pub fn transform(
    source: &Value,
    spec: &MappingSpec,
    custom_filters: impl IntoIterator<Item = Filter>,
) -> crate::Result<Value> {
    Mapper::with_filters(custom_filters)?.transform(source, spec)
}
