//! # shapeval-core — Data Model for Shape Validation
//!
//! This crate defines the data side of shapeval: the dynamic [`Value`] that
//! schemas are checked against, the insertion-ordered [`Map`] whose keys may
//! be any value, and the [`Kind`] atomic type descriptor used for instance
//! checks. `shapeval-schema` depends on it; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Keys are values.** A mapping key can be an integer, a string, a
//!    list. `{3: 3}` and `{"3": 3}` are different documents.
//!
//! 2. **Closed kinds.** `Kind` is a single exhaustive enum. The instance
//!    check is a `match`, never a runtime type inspection.
//!
//! 3. **Documents in, documents out.** JSON and YAML text convert into
//!    `Value` (`convert`), and values render back to JSON with key
//!    stringification.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `shapeval-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod convert;
pub mod error;
pub mod value;

pub use error::CoreError;
pub use value::{Kind, Map, Value};
