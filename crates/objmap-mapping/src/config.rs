//! Mapper configuration options

use serde::Deserialize;

/// Default bound on mapping nesting depth
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Configuration for mapping evaluation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapperConfig {
    /// Maximum nesting depth of a mapping spec; the top level counts as 1 (default: 64)
    pub max_depth: usize,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl MapperConfig {
    /// Create a new configuration with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum nesting depth
    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Load configuration from YAML; missing fields take their defaults
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] when the YAML is malformed, names an
    /// unknown field, or fails [`MapperConfig::validate`].
    pub fn from_yaml(yaml: &str) -> crate::Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is usable
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] when `max_depth` is zero.
    pub fn validate(&self) -> crate::Result<()> {
        if self.max_depth == 0 {
            return Err(crate::Error::Config(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
