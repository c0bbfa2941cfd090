//! # shapeval-schema — Schema Model & Validation Engine
//!
//! Checks a [`Value`](shapeval_core::Value) against a declarative schema
//! built from ordinary nested data: type descriptors, sequences, mappings,
//! and composite tuples of predicates.
//!
//! ```
//! use shapeval_core::{Map, Value};
//! use shapeval_schema::{predicate, required, validate, MapSchema, Schema};
//!
//! // {(str, required): (list, len)}
//! let schema = Schema::from(
//!     MapSchema::new().entry((Schema::str(), required()), Schema::list().with(predicate::len())),
//! );
//!
//! let ok = Value::from_json_str(r#"{"tags": ["a"]}"#).unwrap();
//! assert_eq!(validate(&schema, &ok).unwrap(), ok);
//!
//! assert!(validate(&schema, &Value::Map(Map::new())).is_err());
//! ```
//!
//! ## Modules
//!
//! - [`model`] — the `Schema` tagged union, mapping pairs, and the
//!   `Required` / `WithDefault` sentinels.
//! - [`predicate`] — named unary gates for composite schemas.
//! - [`validate`] — the recursive engine, the reusable [`Validator`], and
//!   lazy stream validation.
//! - [`error`] — `SchemaError` with instance paths.
//! - [`config`] — `ValidatorConfig`.
//!
//! ## Crate Policy
//!
//! - Depends only on `shapeval-core` internally.
//! - Validation never mutates the schema or the caller's data.
//! - One error type, fail-fast: the first mismatch rejects the whole input.

pub mod config;
pub mod error;
pub mod model;
pub mod predicate;
pub mod validate;

pub use config::{ConfigError, ValidatorConfig};
pub use error::{InstancePath, PathSegment, SchemaError};
pub use model::{default, required, KeySchema, MapSchema, Required, Schema, ValueSchema, WithDefault};
pub use predicate::Predicate;
pub use validate::{collect_validated, is_valid, validate, validate_iter, ValidatedIter, Validator};
