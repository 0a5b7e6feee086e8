//! Values that are either fixed or computed from the [`Context`]

use crate::context::Context;
use std::fmt;

/// Inclusion predicate evaluated against the run's context
pub type Predicate = fn(&Context) -> bool;

/// A literal value or a function of the context
///
/// [`Value::resolve`] is the only place a computed value gets evaluated.
#[derive(Clone)]
pub enum Value<T> {
    Literal(T),
    Computed(fn(&Context) -> T),
}

impl<T: Clone> Value<T> {
    pub fn resolve(&self, ctx: &Context) -> T {
        match self {
            Value::Literal(value) => value.clone(),
            Value::Computed(compute) => compute(ctx),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Value::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl From<&str> for Value<String> {
    fn from(value: &str) -> Self {
        Value::Literal(value.to_string())
    }
}

impl From<String> for Value<String> {
    fn from(value: String) -> Self {
        Value::Literal(value)
    }
}

impl From<serde_json::Value> for Value<serde_json::Value> {
    fn from(value: serde_json::Value) -> Self {
        Value::Literal(value)
    }
}
