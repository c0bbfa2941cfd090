//! # Validation Engine
//!
//! Recursive matching of a [`Value`] against a [`Schema`]. Every call either
//! fully succeeds, returning a freshly built value of the same shape with
//! sub-values replaced by their own validation results, or fails with the
//! first [`SchemaError`] encountered.
//!
//! ## Dispatch
//!
//! 1. **Composite**: every predicate must pass on the raw data, then the
//!    base schema validates it. Predicates never transform.
//! 2. **Map**: the data must be a mapping; entries are matched per the
//!    mapping rule below.
//! 3. **Seq**: the data must be a list; each element is validated in order.
//! 4. **Type** / **Literal** / **Exact**: instance check, no check, or
//!    equality check. The data is returned unchanged.
//!
//! ## Mapping Rule
//!
//! Schema pairs are processed in declaration order. Each pair scans the data
//! entries not yet claimed, in data order. An entry whose key validates
//! against the pair's key schema is claimed by that pair: its value must
//! then validate against the pair's value schema, or the whole call fails.
//! An entry is claimed at most once; a pair may claim many entries.
//!
//! A pair that claims nothing fails the call if its key is required.
//! Otherwise, if its key schema is `Exact(k)` and its value carries a
//! default, `(k, default)` is injected unless an earlier pair already
//! produced an entry for `k`. Any entry left unclaimed after all pairs fails
//! the call.
//!
//! The caller's data is only borrowed. Claims are tracked in a side table
//! and the result is a new mapping, so one document may be validated
//! concurrently from several threads.

use shapeval_core::{Map, Value};

use crate::config::ValidatorConfig;
use crate::error::{InstancePath, PathSegment, SchemaError};
use crate::model::{MapSchema, Schema};

/// Validate `data` against `schema` with the default configuration, which
/// applies no depth limit.
///
/// # Errors
///
/// Returns the first `SchemaError` found.
pub fn validate(schema: &Schema, data: &Value) -> Result<Value, SchemaError> {
    Engine::new(&ValidatorConfig::default()).run(schema, data)
}

/// Boolean form of [`validate`].
pub fn is_valid(schema: &Schema, data: &Value) -> bool {
    validate(schema, data).is_ok()
}

/// Lazily validate a stream of values against `elem`.
///
/// The stream is consumed once, as the returned iterator is driven. Each
/// item yields its own result, with the item's index in the error path.
/// After the first error the iterator ends.
pub fn validate_iter<I>(elem: &Schema, data: I) -> ValidatedIter<'_, I::IntoIter>
where
    I: IntoIterator<Item = Value>,
{
    ValidatedIter::new(elem, Engine::new(&ValidatorConfig::default()), data.into_iter())
}

/// Realize a lazily validated stream, stopping at the first error.
///
/// # Errors
///
/// Returns the first `SchemaError` produced by any item.
pub fn collect_validated<I>(elem: &Schema, data: I) -> Result<Vec<Value>, SchemaError>
where
    I: IntoIterator<Item = Value>,
{
    validate_iter(elem, data).collect()
}

/// A schema bundled with its configuration, reusable across calls.
///
/// `Validator` is `Send + Sync`: predicates are shared behind `Arc` and
/// validation never mutates the schema.
#[derive(Debug, Clone)]
pub struct Validator {
    schema: Schema,
    config: ValidatorConfig,
}

impl Validator {
    pub fn new(schema: impl Into<Schema>) -> Self {
        Self {
            schema: schema.into(),
            config: ValidatorConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate `data`, returning the rebuilt value.
    ///
    /// # Errors
    ///
    /// Returns the first `SchemaError` found.
    pub fn validate(&self, data: &Value) -> Result<Value, SchemaError> {
        Engine::new(&self.config).run(&self.schema, data)
    }

    /// Boolean form of [`Validator::validate`].
    pub fn is_valid(&self, data: &Value) -> bool {
        self.validate(data).is_ok()
    }

    /// Lazily validate each item of `data` against this validator's schema.
    pub fn validate_iter<I>(&self, data: I) -> ValidatedIter<'_, I::IntoIter>
    where
        I: IntoIterator<Item = Value>,
    {
        ValidatedIter::new(&self.schema, Engine::new(&self.config), data.into_iter())
    }
}

/// Single-pass iterator returned by [`validate_iter`].
#[derive(Debug)]
pub struct ValidatedIter<'s, I> {
    schema: &'s Schema,
    engine: Engine,
    inner: I,
    index: usize,
    failed: bool,
}

impl<'s, I> ValidatedIter<'s, I> {
    fn new(schema: &'s Schema, engine: Engine, inner: I) -> Self {
        Self {
            schema,
            engine,
            inner,
            index: 0,
            failed: false,
        }
    }
}

impl<I: Iterator<Item = Value>> Iterator for ValidatedIter<'_, I> {
    type Item = Result<Value, SchemaError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.inner.next()?;
        let index = self.index;
        self.index += 1;
        let result = self
            .engine
            .run(self.schema, &item)
            .map_err(|e| e.at(PathSegment::Index(index)));
        self.failed = result.is_err();
        Some(result)
    }
}

#[derive(Debug, Clone, Copy)]
struct Engine {
    max_depth: Option<usize>,
}

impl Engine {
    fn new(config: &ValidatorConfig) -> Self {
        Self {
            max_depth: config.max_depth,
        }
    }

    fn run(&self, schema: &Schema, data: &Value) -> Result<Value, SchemaError> {
        let result = self.walk(schema, data, 0);
        if let Err(err) = &result {
            tracing::debug!(path = %err.path(), schema = %schema, error = %err, "validation rejected");
        }
        result
    }

    fn walk(&self, schema: &Schema, data: &Value, depth: usize) -> Result<Value, SchemaError> {
        if let Some(limit) = self.max_depth.filter(|limit| depth > *limit) {
            return Err(SchemaError::DepthExceeded {
                path: InstancePath::root(),
                limit,
            });
        }

        match schema {
            Schema::Composite { base, predicates } => {
                if let Some(failed) = predicates.iter().find(|p| !p.test(data)) {
                    return Err(SchemaError::PredicateFailed {
                        path: InstancePath::root(),
                        predicate: failed.name().to_string(),
                    });
                }
                self.walk(base, data, depth + 1)
            }
            Schema::Map(map_schema) => {
                let map = data.as_map().ok_or_else(|| type_mismatch(schema, data))?;
                self.walk_map(map_schema, map, depth + 1).map(Value::Map)
            }
            Schema::Seq(elem) => {
                let items = data.as_list().ok_or_else(|| type_mismatch(schema, data))?;
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        self.walk(elem, item, depth + 1)
                            .map_err(|e| e.at(PathSegment::Index(i)))
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::List)
            }
            Schema::Type(kind) => {
                if kind.matches(data) {
                    Ok(data.clone())
                } else {
                    Err(type_mismatch(schema, data))
                }
            }
            Schema::Literal(_) => Ok(data.clone()),
            Schema::Exact(expected) => {
                if expected == data {
                    Ok(data.clone())
                } else {
                    Err(SchemaError::ValueMismatch {
                        path: InstancePath::root(),
                        expected: expected.clone(),
                        found: data.clone(),
                    })
                }
            }
        }
    }

    fn walk_map(&self, schema: &MapSchema, data: &Map, depth: usize) -> Result<Map, SchemaError> {
        let mut claimed = vec![false; data.len()];
        let mut result = Map::with_capacity(data.len());

        for (key_schema, value_schema) in schema.entries() {
            let mut matched = false;

            for ((key, value), claimed) in data.iter().zip(claimed.iter_mut()) {
                if *claimed {
                    continue;
                }
                let new_key = match self.walk(&key_schema.schema, key, depth) {
                    Ok(new_key) => new_key,
                    Err(err @ SchemaError::DepthExceeded { .. }) => {
                        return Err(err.at(PathSegment::Key(key.clone())));
                    }
                    Err(_) => continue,
                };
                let new_value = self
                    .walk(&value_schema.schema, value, depth)
                    .map_err(|e| e.at(PathSegment::Key(key.clone())))?;
                tracing::trace!(key = %key, key_schema = %key_schema, "entry claimed");
                result.insert(new_key, new_value);
                *claimed = true;
                matched = true;
            }

            if matched {
                continue;
            }
            if key_schema.required {
                return Err(SchemaError::MissingRequired {
                    path: InstancePath::root(),
                    key: key_schema.schema.to_string(),
                });
            }
            if let (Schema::Exact(key), Some(fallback)) = (&key_schema.schema, &value_schema.default)
            {
                if result.contains_key(key) {
                    continue;
                }
                let fallback = self
                    .walk(&value_schema.schema, fallback, depth)
                    .map_err(|e| e.at(PathSegment::Key(key.clone())))?;
                tracing::trace!(key = %key, "default injected");
                result.insert(key.clone(), fallback);
            }
        }

        if let Some((key, _)) = data
            .iter()
            .zip(&claimed)
            .find_map(|(entry, claimed)| (!claimed).then_some(entry))
        {
            return Err(SchemaError::UnmatchedEntry {
                path: InstancePath::root(),
                key: key.clone(),
            });
        }

        Ok(result)
    }
}

fn type_mismatch(schema: &Schema, data: &Value) -> SchemaError {
    SchemaError::TypeMismatch {
        path: InstancePath::root(),
        expected: schema.to_string(),
        found: data.type_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{default, required};
    use crate::predicate;
    use shapeval_core::Kind;

    fn int_map(entries: &[(i64, i64)]) -> Value {
        Value::Map(entries.iter().map(|(k, v)| (*k, *v)).collect())
    }

    #[test]
    fn composite_checks_predicates_before_base() {
        // The predicate fails on a non-list, so the predicate error wins.
        let schema = Schema::list().with(predicate::len());
        let err = validate(&schema, &Value::from(0)).unwrap_err();
        assert!(matches!(err, SchemaError::PredicateFailed { ref predicate, .. } if predicate == "len"));

        let err = validate(&schema, &Value::from("abc")).unwrap_err();
        assert!(matches!(err, SchemaError::TypeMismatch { found: "str", .. }));
    }

    #[test]
    fn every_predicate_must_pass() {
        let schema = Schema::composite(
            Schema::int(),
            [predicate::min(0.0), predicate::max(10.0)],
        );
        assert!(is_valid(&schema, &Value::from(5)));
        let err = validate(&schema, &Value::from(11)).unwrap_err();
        assert!(matches!(err, SchemaError::PredicateFailed { ref predicate, .. } if predicate == "max(10)"));
    }

    #[test]
    fn sequence_error_carries_index() {
        let schema = Schema::seq(Schema::int());
        let err = validate(&schema, &Value::from(vec![Value::from(1), Value::from("x")])).unwrap_err();
        assert_eq!(err.path().to_string(), "/1");
    }

    #[test]
    fn nested_error_path() {
        let schema = Schema::from(
            MapSchema::new().entry(
                Schema::exact("items"),
                Schema::seq(MapSchema::new().entry(Schema::exact("n"), Schema::int())),
            ),
        );
        let data = Value::from_json_str(r#"{"items": [{"n": 1}, {"n": "two"}]}"#).unwrap();
        let err = validate(&schema, &data).unwrap_err();
        assert_eq!(err.path().to_string(), "/items/1/n");
    }

    #[test]
    fn exact_requires_equality() {
        assert!(is_valid(&Schema::exact("a"), &Value::from("a")));
        let err = validate(&Schema::exact("a"), &Value::from("b")).unwrap_err();
        assert!(matches!(err, SchemaError::ValueMismatch { .. }));
    }

    #[test]
    fn literal_passes_everything_through() {
        let schema = Schema::literal(3);
        let data = Value::from(vec!["anything"]);
        assert_eq!(validate(&schema, &data).unwrap(), data);
    }

    #[test]
    fn string_schema_is_a_pass_through_literal() {
        let schema: Schema = "name".into();
        assert_eq!(validate(&schema, &Value::from(5)).unwrap(), Value::from(5));

        // As a key schema it accepts any key, so it claims every entry.
        let schema = Schema::from(MapSchema::new().entry("name", Schema::int()));
        let data = int_map(&[(1, 10), (2, 20)]);
        assert_eq!(validate(&schema, &data).unwrap(), data);
    }

    #[test]
    fn pair_claims_every_matching_entry() {
        let schema = Schema::from(MapSchema::new().entry(Schema::int(), Schema::int()));
        let data = int_map(&[(1, 10), (2, 20), (3, 30)]);
        assert_eq!(validate(&schema, &data).unwrap(), data);
    }

    #[test]
    fn entry_is_claimed_by_the_first_accepting_pair() {
        // Both pairs accept key 1. The first one claims it, so its value
        // schema applies and the second pair sees nothing.
        let schema = Schema::from(
            MapSchema::new()
                .entry(Schema::int(), Schema::str())
                .entry(Schema::any(), Schema::int()),
        );
        let err = validate(&schema, &int_map(&[(1, 1)])).unwrap_err();
        assert!(matches!(err, SchemaError::TypeMismatch { .. }));
        assert_eq!(err.path().to_string(), "/1");
    }

    #[test]
    fn later_pairs_claim_entries_earlier_keys_reject() {
        let schema = Schema::from(
            MapSchema::new()
                .entry(Schema::str(), Schema::int())
                .entry(Schema::int(), Schema::str()),
        );
        let mut map = Map::new();
        map.insert("a", 1);
        map.insert(2, "b");
        let data = Value::Map(map);
        assert_eq!(validate(&schema, &data).unwrap(), data);
    }

    #[test]
    fn unclaimed_entry_fails() {
        let schema = Schema::from(MapSchema::new().entry(Schema::exact("name"), Schema::str()));
        let data = Value::from_json_str(r#"{"name": "x", "extra": 1}"#).unwrap();
        let err = validate(&schema, &data).unwrap_err();
        assert!(matches!(err, SchemaError::UnmatchedEntry { ref key, .. } if *key == Value::from("extra")));
    }

    #[test]
    fn missing_required_names_the_key_schema() {
        let schema = Schema::from(MapSchema::new().required(Schema::exact("name"), Schema::str()));
        let err = validate(&schema, &Value::Map(Map::new())).unwrap_err();
        assert_eq!(err.to_string(), r#"(root): missing required entry for key =="name""#);
    }

    #[test]
    fn bare_required_needs_some_entry() {
        let schema = Schema::from(MapSchema::new().entry(required(), Schema::any()));
        assert!(!is_valid(&schema, &Value::Map(Map::new())));
        assert!(is_valid(&schema, &int_map(&[(1, 1)])));
    }

    #[test]
    fn default_injected_for_absent_exact_key() {
        let schema = Schema::from(
            MapSchema::new()
                .entry(Schema::exact("name"), Schema::str())
                .optional_with_default("retries", Schema::int(), 3),
        );
        let data = Value::from_json_str(r#"{"name": "job"}"#).unwrap();
        let out = validate(&schema, &data).unwrap();
        let expected = Value::from_json_str(r#"{"name": "job", "retries": 3}"#).unwrap();
        assert_eq!(out, expected);
        // The caller's document is untouched.
        assert_eq!(data.len(), Some(1));
    }

    #[test]
    fn present_value_wins_over_default() {
        let schema = Schema::from(MapSchema::new().optional_with_default("retries", Schema::int(), 3));
        let data = Value::from_json_str(r#"{"retries": 5}"#).unwrap();
        assert_eq!(validate(&schema, &data).unwrap(), data);
    }

    #[test]
    fn default_does_not_replace_an_entry_claimed_earlier() {
        // The broad `str` pair claims "retries" first, so the exact pair
        // matches nothing. The claimed value must survive.
        let schema = Schema::from(
            MapSchema::new()
                .entry(Schema::str(), Schema::int())
                .optional_with_default("retries", Schema::int(), 3),
        );
        let data = Value::from_json_str(r#"{"retries": 5}"#).unwrap();
        assert_eq!(validate(&schema, &data).unwrap(), data);

        let data = Value::from_json_str(r#"{"timeout": 5}"#).unwrap();
        let expected = Value::from_json_str(r#"{"timeout": 5, "retries": 3}"#).unwrap();
        assert_eq!(validate(&schema, &data).unwrap(), expected);
    }

    #[test]
    fn default_must_satisfy_its_value_schema() {
        let schema = Schema::from(MapSchema::new().optional_with_default("retries", Schema::int(), "x"));
        let err = validate(&schema, &Value::Map(Map::new())).unwrap_err();
        assert_eq!(err.path().to_string(), "/retries");
    }

    #[test]
    fn default_needs_a_concrete_key() {
        let schema = Schema::from(
            MapSchema::new().entry(Schema::str(), (Schema::int(), default(3))),
        );
        assert_eq!(
            validate(&schema, &Value::Map(Map::new())).unwrap(),
            Value::Map(Map::new())
        );
    }

    #[test]
    fn depth_limit_is_enforced() {
        let schema = Schema::seq(Schema::seq(Schema::seq(Schema::int())));
        let data = Value::from_json_str("[[[1]]]").unwrap();

        let shallow = Validator::new(schema.clone()).with_config(ValidatorConfig::with_max_depth(2));
        let err = shallow.validate(&data).unwrap_err();
        assert!(matches!(err, SchemaError::DepthExceeded { limit: 2, .. }));

        let deep = Validator::new(schema).with_config(ValidatorConfig::with_max_depth(3));
        assert_eq!(deep.validate(&data).unwrap(), data);
    }

    #[test]
    fn deep_schema_validates_without_a_configured_limit() {
        let mut schema = Schema::int();
        let mut data = Value::from(7);
        for _ in 0..200 {
            schema = Schema::seq(schema);
            data = Value::List(vec![data]);
        }
        assert_eq!(validate(&schema, &data).unwrap(), data);
        assert!(Validator::new(schema).is_valid(&data));
    }

    #[test]
    fn lazy_validation_is_ordered_and_stops_after_error() {
        let items = vec![Value::from(1), Value::from("x"), Value::from(3)];
        let results: Vec<_> = validate_iter(&Schema::int(), items).collect();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap(), &Value::from(1));
        assert_eq!(results[1].as_ref().unwrap_err().path().to_string(), "/1");
    }

    #[test]
    fn lazy_validation_pulls_items_on_demand() {
        let mut pulled = 0;
        let source = (0..100).map(|n| {
            pulled += 1;
            Value::from(n)
        });
        let first_two: Vec<_> = validate_iter(&Schema::int(), source).take(2).collect();
        assert_eq!(first_two.len(), 2);
        assert_eq!(pulled, 2);
    }

    #[test]
    fn collect_validated_realizes_the_stream() {
        let out = collect_validated(&Schema::list(), vec![Value::List(vec![]); 3]).unwrap();
        assert_eq!(out, vec![Value::List(vec![]); 3]);
        assert!(collect_validated(&Schema::list(), vec![Value::from("s")]).is_err());
    }

    #[test]
    fn validator_stream_uses_its_own_schema() {
        let validator = Validator::new(Kind::Str);
        let out: Result<Vec<_>, _> = validator
            .validate_iter(vec![Value::from("a"), Value::from("b")])
            .collect();
        assert_eq!(out.unwrap(), vec![Value::from("a"), Value::from("b")]);
    }

    #[test]
    fn validator_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Validator>();
        assert_send_sync::<Schema>();
    }
}
