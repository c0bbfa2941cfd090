//! # Error Types
//!
//! Errors raised while bringing documents into (or out of) the dynamic
//! [`Value`](crate::Value) model. Schema validation failures live in
//! `shapeval-schema`; this crate only knows about data.

use thiserror::Error;

/// Error converting between [`Value`](crate::Value) and an external document form.
#[derive(Error, Debug)]
pub enum CoreError {
    /// JSON text could not be parsed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML text could not be parsed.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A YAML node has no counterpart in the value model.
    #[error("unsupported YAML node: {0}")]
    UnsupportedYaml(String),

    /// NaN and infinities have no JSON representation.
    #[error("non-finite float cannot be represented in JSON: {0}")]
    NonFiniteFloat(f64),
}
