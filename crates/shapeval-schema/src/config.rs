//! # Validator Configuration
//!
//! Limits applied by a [`Validator`](crate::Validator). The configuration
//! is plain data: build it in code, or load it from a JSON or YAML
//! document. Omitted fields take their defaults, and the default
//! configuration applies no limits.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings for a validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Maximum recursion depth, counted in schema nodes from the root.
    /// Exceeding it fails with `SchemaError::DepthExceeded`. `None` leaves
    /// depth bounded only by the schema itself.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
}

impl ValidatorConfig {
    /// A configuration capping recursion at `max_depth` schema nodes.
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
        }
    }
}

impl ValidatorConfig {
    /// Load a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Json` on malformed input or unknown fields,
    /// and `ConfigError::InvalidMaxDepth` if the loaded limit is zero.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.checked()
    }

    /// Load a configuration from YAML text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Yaml` on malformed input or unknown fields,
    /// and `ConfigError::InvalidMaxDepth` if the loaded limit is zero.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.checked()
    }

    fn checked(self) -> Result<Self, ConfigError> {
        if self.max_depth == Some(0) {
            return Err(ConfigError::InvalidMaxDepth);
        }
        Ok(self)
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("max_depth must be at least 1")]
    InvalidMaxDepth,
}
