//! # Schema Model
//!
//! A schema is a closed, recursive tagged union over the shapes a data value
//! may be checked against:
//!
//! | Shape | Matches |
//! |---|---|
//! | `Type(kind)` | any instance of `kind` |
//! | `Seq(elem)` | a list whose every element matches `elem` |
//! | `Map(map)` | a mapping satisfying the key/value pairs of `map` |
//! | `Composite { base, predicates }` | data passing every predicate and matching `base` |
//! | `Literal(v)` | anything; the literal imposes no constraint |
//! | `Exact(v)` | only a value equal to `v` |
//!
//! ## Sentinels
//!
//! [`Required`] and [`WithDefault`] annotate mapping positions. They are
//! folded into the `required` flag of [`KeySchema`] and the `default` of
//! [`ValueSchema`] when the mapping schema is built, so the engine never
//! inspects markers at runtime:
//!
//! ```
//! use shapeval_schema::{default, required, MapSchema, Schema};
//!
//! // {(str, required): (int, default(3))}
//! let schema = MapSchema::new().entry((Schema::str(), required()), (Schema::int(), default(3)));
//! assert!(schema.entries()[0].0.required);
//! ```

use std::fmt;

use shapeval_core::{Kind, Value};

use crate::predicate::Predicate;

/// A declarative description of an expected data shape.
#[derive(Debug, Clone)]
pub enum Schema {
    /// Instance check against an atomic type descriptor.
    Type(Kind),
    /// `[E]`: a sequence of `E`.
    Seq(Box<Schema>),
    /// Key-schema/value-schema pairs.
    Map(MapSchema),
    /// `(base, predicate, ...)`: predicates gate the raw data, then `base` validates it.
    Composite {
        base: Box<Schema>,
        predicates: Vec<Predicate>,
    },
    /// A literal that passes every value through unchanged.
    Literal(Value),
    /// A literal that requires equality.
    Exact(Value),
}

impl Schema {
    /// Matches every value.
    pub fn any() -> Self {
        Schema::Type(Kind::Any)
    }

    pub fn null() -> Self {
        Schema::Type(Kind::Null)
    }

    pub fn bool() -> Self {
        Schema::Type(Kind::Bool)
    }

    pub fn int() -> Self {
        Schema::Type(Kind::Int)
    }

    pub fn float() -> Self {
        Schema::Type(Kind::Float)
    }

    /// Matches ints and floats.
    pub fn number() -> Self {
        Schema::Type(Kind::Number)
    }

    pub fn str() -> Self {
        Schema::Type(Kind::Str)
    }

    /// Any list, elements unchecked. See [`Schema::seq`] for typed elements.
    pub fn list() -> Self {
        Schema::Type(Kind::List)
    }

    /// Any mapping, entries unchecked. See [`MapSchema`] for typed entries.
    pub fn mapping() -> Self {
        Schema::Type(Kind::Map)
    }

    /// `[elem]`.
    pub fn seq(elem: impl Into<Schema>) -> Self {
        Schema::Seq(Box::new(elem.into()))
    }

    /// A pass-through literal.
    pub fn literal(value: impl Into<Value>) -> Self {
        Schema::Literal(value.into())
    }

    /// An equality literal.
    pub fn exact(value: impl Into<Value>) -> Self {
        Schema::Exact(value.into())
    }

    /// `(base, predicates...)`. With no predicates this is just `base`.
    pub fn composite(
        base: impl Into<Schema>,
        predicates: impl IntoIterator<Item = Predicate>,
    ) -> Self {
        predicates.into_iter().fold(base.into(), Schema::with)
    }

    /// Append a predicate, turning this schema into (or extending) a composite.
    pub fn with(self, predicate: Predicate) -> Self {
        match self {
            Schema::Composite {
                base,
                mut predicates,
            } => {
                predicates.push(predicate);
                Schema::Composite { base, predicates }
            }
            base => Schema::Composite {
                base: Box::new(base),
                predicates: vec![predicate],
            },
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Type(kind) => write!(f, "{kind}"),
            Schema::Seq(elem) => write!(f, "[{elem}]"),
            Schema::Map(map) => write!(f, "{map}"),
            Schema::Composite { base, predicates } => {
                write!(f, "({base}")?;
                for p in predicates {
                    write!(f, ", {p}")?;
                }
                write!(f, ")")
            }
            Schema::Literal(value) => write!(f, "{value}"),
            Schema::Exact(value) => write!(f, "=={value}"),
        }
    }
}

impl From<Kind> for Schema {
    fn from(kind: Kind) -> Self {
        Schema::Type(kind)
    }
}

impl From<MapSchema> for Schema {
    fn from(map: MapSchema) -> Self {
        Schema::Map(map)
    }
}

/// Plain values are pass-through literals.
impl From<Value> for Schema {
    fn from(value: Value) -> Self {
        Schema::Literal(value)
    }
}

/// Strings are plain values too. Use [`Schema::exact`] to match one.
impl From<&str> for Schema {
    fn from(s: &str) -> Self {
        Schema::Literal(Value::from(s))
    }
}

impl From<String> for Schema {
    fn from(s: String) -> Self {
        Schema::Literal(Value::Str(s))
    }
}

/// Marker: at least one mapping entry must match the key schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Required;

/// Construct the [`Required`] marker.
pub fn required() -> Required {
    Required
}

/// Marker: fallback value for an optional mapping entry that is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct WithDefault(pub Value);

/// Construct a [`WithDefault`] marker.
pub fn default(value: impl Into<Value>) -> WithDefault {
    WithDefault(value.into())
}

/// Key position of a mapping schema pair.
#[derive(Debug, Clone)]
pub struct KeySchema {
    pub schema: Schema,
    pub required: bool,
}

impl KeySchema {
    pub fn optional(schema: impl Into<Schema>) -> Self {
        Self {
            schema: schema.into(),
            required: false,
        }
    }

    pub fn required(schema: impl Into<Schema>) -> Self {
        Self {
            schema: schema.into(),
            required: true,
        }
    }
}

impl fmt::Display for KeySchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.required {
            write!(f, "({}, required)", self.schema)
        } else {
            write!(f, "{}", self.schema)
        }
    }
}

impl From<Schema> for KeySchema {
    fn from(schema: Schema) -> Self {
        Self::optional(schema)
    }
}

impl From<Kind> for KeySchema {
    fn from(kind: Kind) -> Self {
        Self::optional(kind)
    }
}

impl From<&str> for KeySchema {
    fn from(s: &str) -> Self {
        Self::optional(s)
    }
}

/// A bare `Required` key: some entry, with any key, must be present.
impl From<Required> for KeySchema {
    fn from(_: Required) -> Self {
        Self::required(Schema::any())
    }
}

/// The `(schema, required)` form.
impl<S: Into<Schema>> From<(S, Required)> for KeySchema {
    fn from((schema, _): (S, Required)) -> Self {
        Self::required(schema)
    }
}

/// Value position of a mapping schema pair.
#[derive(Debug, Clone)]
pub struct ValueSchema {
    pub schema: Schema,
    pub default: Option<Value>,
}

impl ValueSchema {
    pub fn new(schema: impl Into<Schema>) -> Self {
        Self {
            schema: schema.into(),
            default: None,
        }
    }

    pub fn with_default(schema: impl Into<Schema>, value: impl Into<Value>) -> Self {
        Self {
            schema: schema.into(),
            default: Some(value.into()),
        }
    }
}

impl fmt::Display for ValueSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.default {
            Some(value) => write!(f, "({}, default({value}))", self.schema),
            None => write!(f, "{}", self.schema),
        }
    }
}

impl From<Schema> for ValueSchema {
    fn from(schema: Schema) -> Self {
        Self::new(schema)
    }
}

impl From<Kind> for ValueSchema {
    fn from(kind: Kind) -> Self {
        Self::new(kind)
    }
}

impl From<MapSchema> for ValueSchema {
    fn from(map: MapSchema) -> Self {
        Self::new(map)
    }
}

impl From<Value> for ValueSchema {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}

/// The `(schema, default(value))` form.
impl<S: Into<Schema>> From<(S, WithDefault)> for ValueSchema {
    fn from((schema, WithDefault(value)): (S, WithDefault)) -> Self {
        Self::with_default(schema, value)
    }
}

/// Ordered key-schema/value-schema pairs.
///
/// Pairs are tried in declaration order; see the engine for how data
/// entries are claimed.
#[derive(Debug, Clone, Default)]
pub struct MapSchema {
    entries: Vec<(KeySchema, ValueSchema)>,
}

impl MapSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pair, with key and value given in any of their accepted forms.
    pub fn entry(mut self, key: impl Into<KeySchema>, value: impl Into<ValueSchema>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    /// Add a pair whose key must be matched by at least one entry.
    pub fn required(self, key: impl Into<Schema>, value: impl Into<ValueSchema>) -> Self {
        self.entry(KeySchema::required(key), value)
    }

    /// Add an optional pair that injects `fallback` under `key` when absent.
    pub fn optional_with_default(
        self,
        key: impl Into<Value>,
        value: impl Into<Schema>,
        fallback: impl Into<Value>,
    ) -> Self {
        self.entry(
            KeySchema::optional(Schema::Exact(key.into())),
            ValueSchema::with_default(value, fallback),
        )
    }

    pub fn entries(&self) -> &[(KeySchema, ValueSchema)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for MapSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        write!(f, "}}")
    }
}
