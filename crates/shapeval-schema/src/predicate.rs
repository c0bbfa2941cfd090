//! # Predicates
//!
//! Unary checks attached to a composite schema. A predicate only gates:
//! it sees the raw data value and answers pass or fail, it never transforms.
//!
//! Predicates are named so that a rejection can say which check failed.
//! The built-ins cover the common gates; anything else is a closure passed
//! to [`Predicate::new`] or, for checks phrased as "compute something and
//! test its truthiness", [`Predicate::truthy_of`].

use std::fmt;
use std::sync::Arc;

use shapeval_core::Value;

type Check = dyn Fn(&Value) -> bool + Send + Sync;

/// A named unary check over a data value.
#[derive(Clone)]
pub struct Predicate {
    name: String,
    check: Arc<Check>,
}

impl Predicate {
    /// Wrap a boolean check.
    pub fn new(
        name: impl Into<String>,
        check: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    /// Wrap a function whose result is judged by [`Value::is_truthy`].
    pub fn truthy_of(
        name: impl Into<String>,
        f: impl Fn(&Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self::new(name, move |value| f(value).is_truthy())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the check.
    pub fn test(&self, value: &Value) -> bool {
        (self.check)(value)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Predicate").field(&self.name).finish()
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Length as a truth value: passes for non-empty strings, lists and maps.
/// Scalars have no length and fail.
pub fn len() -> Predicate {
    Predicate::truthy_of("len", |value| match value.len() {
        Some(n) => Value::Int(i64::try_from(n).unwrap_or(i64::MAX)),
        None => Value::Null,
    })
}

/// Passes for truthy values.
pub fn truthy() -> Predicate {
    Predicate::new("truthy", Value::is_truthy)
}

/// Length at least `min`.
pub fn min_len(min: usize) -> Predicate {
    Predicate::new(format!("min_len({min})"), move |value| {
        value.len().is_some_and(|n| n >= min)
    })
}

/// Length at most `max`.
pub fn max_len(max: usize) -> Predicate {
    Predicate::new(format!("max_len({max})"), move |value| {
        value.len().is_some_and(|n| n <= max)
    })
}

/// Numeric value at least `bound`. Non-numbers fail.
pub fn min(bound: f64) -> Predicate {
    Predicate::new(format!("min({bound})"), move |value| {
        value.as_f64().is_some_and(|x| x >= bound)
    })
}

/// Numeric value at most `bound`. Non-numbers fail.
pub fn max(bound: f64) -> Predicate {
    Predicate::new(format!("max({bound})"), move |value| {
        value.as_f64().is_some_and(|x| x <= bound)
    })
}

/// Value equals one of `options`.
pub fn one_of(options: Vec<Value>) -> Predicate {
    let name = format!(
        "one_of({})",
        options
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );
    Predicate::new(name, move |value| options.contains(value))
}
