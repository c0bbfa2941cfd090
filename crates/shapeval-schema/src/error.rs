//! # Validation Errors
//!
//! `SchemaError` is the single failure type of the validation engine.
//! Validation is fail-fast: the first mismatch aborts the whole call and is
//! reported with the instance path where it occurred. Variants only refine
//! the diagnostic; callers that need a pass/fail answer can treat every
//! variant alike.
//!
//! Paths are assembled while the error propagates upward: the innermost
//! frame raises with an empty path and each enclosing sequence or mapping
//! frame prepends its segment.

use std::fmt;

use shapeval_core::Value;
use thiserror::Error;

/// One step from a container to a child value.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    /// Position in a sequence.
    Index(usize),
    /// Key of a mapping entry.
    Key(Value),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Index(i) => write!(f, "{i}"),
            PathSegment::Key(Value::Str(s)) => f.write_str(s),
            PathSegment::Key(other) => write!(f, "{other}"),
        }
    }
}

/// Location of a value inside the validated document.
///
/// Rendered like a JSON Pointer (`/items/0/name`), or `(root)` when empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstancePath {
    /// Innermost segment first; see [`InstancePath::segments`].
    reversed: Vec<PathSegment>,
}

impl InstancePath {
    /// The path of the document root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns true for the document root.
    pub fn is_root(&self) -> bool {
        self.reversed.is_empty()
    }

    /// Segments from the root down.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.reversed.iter().rev()
    }

    fn prepend(&mut self, segment: PathSegment) {
        self.reversed.push(segment);
    }
}

impl fmt::Display for InstancePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("(root)");
        }
        for segment in self.segments() {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

/// The data does not conform to the schema.
#[derive(Error, Debug, Clone)]
pub enum SchemaError {
    /// The value is not an instance of the expected type or shape.
    #[error("{path}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Where the mismatch occurred.
        path: InstancePath,
        /// Rendered schema node.
        expected: String,
        /// Type name of the offending value.
        found: &'static str,
    },

    /// The value differs from an exact literal.
    #[error("{path}: expected {expected}, found {found}")]
    ValueMismatch {
        /// Where the mismatch occurred.
        path: InstancePath,
        /// The required literal.
        expected: Value,
        /// The offending value.
        found: Value,
    },

    /// A composite schema predicate returned false.
    #[error("{path}: predicate `{predicate}` rejected the value")]
    PredicateFailed {
        /// Where the mismatch occurred.
        path: InstancePath,
        /// Name of the failing predicate.
        predicate: String,
    },

    /// No entry of the mapping matched a required key schema.
    #[error("{path}: missing required entry for key {key}")]
    MissingRequired {
        /// Path of the mapping.
        path: InstancePath,
        /// Rendered key schema.
        key: String,
    },

    /// A mapping entry was not accepted by any key schema.
    #[error("{path}: entry with key {key} matches no key schema")]
    UnmatchedEntry {
        /// Path of the mapping.
        path: InstancePath,
        /// Key of the unmatched entry.
        key: Value,
    },

    /// The schema nests deeper than the configured limit.
    #[error("{path}: schema nesting exceeds depth limit {limit}")]
    DepthExceeded {
        /// Where the limit was hit.
        path: InstancePath,
        /// The configured limit.
        limit: usize,
    },
}

impl SchemaError {
    /// The instance path at which validation failed.
    pub fn path(&self) -> &InstancePath {
        match self {
            SchemaError::TypeMismatch { path, .. }
            | SchemaError::ValueMismatch { path, .. }
            | SchemaError::PredicateFailed { path, .. }
            | SchemaError::MissingRequired { path, .. }
            | SchemaError::UnmatchedEntry { path, .. }
            | SchemaError::DepthExceeded { path, .. } => path,
        }
    }

    /// Prefix the error's path with `segment`, as seen from the parent frame.
    pub(crate) fn at(mut self, segment: PathSegment) -> Self {
        match &mut self {
            SchemaError::TypeMismatch { path, .. }
            | SchemaError::ValueMismatch { path, .. }
            | SchemaError::PredicateFailed { path, .. }
            | SchemaError::MissingRequired { path, .. }
            | SchemaError::UnmatchedEntry { path, .. }
            | SchemaError::DepthExceeded { path, .. } => path.prepend(segment),
        }
        self
    }
}
