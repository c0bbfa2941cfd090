//! # Document Conversion
//!
//! Brings JSON and YAML documents into the [`Value`] model and renders
//! values back out as JSON.
//!
//! ## Rules
//!
//! 1. JSON integers that fit `i64` become `Int`; every other JSON number
//!    becomes `Float`.
//! 2. YAML mapping keys keep their type. `{3: 3}` in YAML is an `Int` key,
//!    which JSON cannot express.
//! 3. YAML tags are ignored; the tagged inner value is converted.
//! 4. Rendering to JSON coerces non-string keys to strings via their
//!    display form (`3` → `"3"`, `true` → `"true"`). Non-finite floats are
//!    rejected.

use crate::error::CoreError;
use crate::value::{Map, Value};

impl Value {
    /// Parse JSON text into a value.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Json` if the text is not valid JSON.
    pub fn from_json_str(text: &str) -> Result<Self, CoreError> {
        let json: serde_json::Value = serde_json::from_str(text)?;
        Ok(Self::from(json))
    }

    /// Parse YAML text into a value, preserving non-string mapping keys.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Yaml` if the text is not valid YAML, or
    /// `CoreError::UnsupportedYaml` for numbers outside the value model.
    pub fn from_yaml_str(text: &str) -> Result<Self, CoreError> {
        let yaml: serde_yaml::Value = serde_yaml::from_str(text)?;
        Self::try_from(yaml)
    }

    /// Render this value as a JSON document.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NonFiniteFloat` for NaN or infinite floats.
    pub fn to_json(&self) -> Result<serde_json::Value, CoreError> {
        match self {
            Value::Null => Ok(serde_json::Value::Null),
            Value::Bool(b) => Ok(serde_json::Value::Bool(*b)),
            Value::Int(n) => Ok(serde_json::Value::from(*n)),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .ok_or(CoreError::NonFiniteFloat(*f)),
            Value::Str(s) => Ok(serde_json::Value::String(s.clone())),
            Value::List(items) => {
                let items: Result<Vec<_>, _> = items.iter().map(Value::to_json).collect();
                Ok(serde_json::Value::Array(items?))
            }
            Value::Map(map) => {
                let mut object = serde_json::Map::new();
                for (k, v) in map.iter() {
                    object.insert(json_key(k), v.to_json()?);
                }
                Ok(serde_json::Value::Object(object))
            }
        }
    }
}

fn json_key(key: &Value) -> String {
    match key {
        Value::Str(s) => s.clone(),
        other => other.to_string(),
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                // u64 beyond i64::MAX and true floats.
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(object) => Value::Map(
                object
                    .into_iter()
                    .map(|(k, v)| (Value::Str(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl TryFrom<serde_yaml::Value> for Value {
    type Error = CoreError;

    fn try_from(yaml: serde_yaml::Value) -> Result<Self, Self::Error> {
        match yaml {
            serde_yaml::Value::Null => Ok(Value::Null),
            serde_yaml::Value::Bool(b) => Ok(Value::Bool(b)),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Value::Float(f))
                } else {
                    Err(CoreError::UnsupportedYaml(format!("number {n}")))
                }
            }
            serde_yaml::Value::String(s) => Ok(Value::Str(s)),
            serde_yaml::Value::Sequence(seq) => {
                let items: Result<Vec<_>, _> = seq.into_iter().map(Value::try_from).collect();
                Ok(Value::List(items?))
            }
            serde_yaml::Value::Mapping(mapping) => {
                let mut map = Map::with_capacity(mapping.len());
                for (k, v) in mapping {
                    map.insert(Value::try_from(k)?, Value::try_from(v)?);
                }
                Ok(Value::Map(map))
            }
            serde_yaml::Value::Tagged(tagged) => Value::try_from(tagged.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_numbers_split_into_int_and_float() {
        let value = Value::from(json!({"a": 1, "b": 1.5, "c": -7}));
        let map = value.as_map().unwrap();
        assert_eq!(map.get(&Value::from("a")), Some(&Value::Int(1)));
        assert_eq!(map.get(&Value::from("b")), Some(&Value::Float(1.5)));
        assert_eq!(map.get(&Value::from("c")), Some(&Value::Int(-7)));
    }

    #[test]
    fn json_u64_beyond_i64_becomes_float() {
        let value = Value::from(json!(u64::MAX));
        assert!(matches!(value, Value::Float(_)));
    }

    #[test]
    fn yaml_preserves_integer_keys() {
        let value = Value::from_yaml_str("3: 3\nname: x\n").unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map.get(&Value::Int(3)), Some(&Value::Int(3)));
        assert_eq!(map.get(&Value::from("name")), Some(&Value::from("x")));
        assert!(!map.contains_key(&Value::from("3")));
    }

    #[test]
    fn yaml_sequences_and_tags() {
        let value = Value::from_yaml_str("items:\n  - one\n  - !tag two\n").unwrap();
        let items = value.as_map().unwrap().get(&Value::from("items")).unwrap();
        assert_eq!(items, &Value::from(vec!["one", "two"]));
    }

    #[test]
    fn invalid_json_is_reported() {
        let err = Value::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, CoreError::Json(_)));
    }

    #[test]
    fn to_json_stringifies_non_string_keys() {
        let value = Value::Map(Map::from([
            (Value::from(3), Value::from(3)),
            (Value::from(true), Value::from("yes")),
        ]));
        assert_eq!(value.to_json().unwrap(), json!({"3": 3, "true": "yes"}));
    }

    #[test]
    fn to_json_rejects_non_finite_floats() {
        let err = Value::Float(f64::INFINITY).to_json().unwrap_err();
        assert!(matches!(err, CoreError::NonFiniteFloat(_)));
    }

    #[test]
    fn json_text_round_trips_through_value() {
        let doc = json!({"name": "alice", "tags": ["a", "b"], "age": 30, "ratio": 0.5});
        let value = Value::from_json_str(&doc.to_string()).unwrap();
        assert_eq!(value.to_json().unwrap(), doc);
    }
}
