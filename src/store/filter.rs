//! Query filters evaluated against stored JSON documents.

use std::cmp::Ordering;

use serde_json::{Map, Value};

/// A predicate over a document's top-level fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Matches every document
    All,
    /// Field equals the value
    Eq(String, Value),
    /// Field equals one of the values
    In(String, Vec<Value>),
    /// Numeric field strictly below the bound
    Lt(String, f64),
    /// String field contains the needle, ignoring case (needle kept lowercased)
    ContainsIgnoreCase(String, String),
    /// Every sub-filter matches
    And(Vec<Filter>),
    /// At least one sub-filter matches
    Or(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    pub fn is_in<V: Into<Value>>(field: impl Into<String>, values: impl IntoIterator<Item = V>) -> Self {
        Filter::In(field.into(), values.into_iter().map(Into::into).collect())
    }

    pub fn lt(field: impl Into<String>, bound: f64) -> Self {
        Filter::Lt(field.into(), bound)
    }

    pub fn contains_ignore_case(field: impl Into<String>, needle: &str) -> Self {
        Filter::ContainsIgnoreCase(field.into(), needle.to_lowercase())
    }

    /// Conjunction of `self` and `other`, folding away `All`.
    pub fn and(self, other: Filter) -> Self {
        match (self, other) {
            (Filter::All, f) | (f, Filter::All) => f,
            (Filter::And(mut left), Filter::And(right)) => {
                left.extend(right);
                Filter::And(left)
            }
            (Filter::And(mut left), f) => {
                left.push(f);
                Filter::And(left)
            }
            (f, other) => Filter::And(vec![f, other]),
        }
    }

    /// Evaluates the filter against a stored document.
    pub fn matches(&self, doc: &Map<String, Value>) -> bool {
        match self {
            Filter::All => true,
            Filter::Eq(field, value) => doc.get(field) == Some(value),
            Filter::In(field, values) => doc.get(field).is_some_and(|v| values.contains(v)),
            Filter::Lt(field, bound) => doc
                .get(field)
                .and_then(Value::as_f64)
                .is_some_and(|v| v < *bound),
            Filter::ContainsIgnoreCase(field, needle) => doc
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|s| s.to_lowercase().contains(needle.as_str())),
            Filter::And(filters) => filters.iter().all(|f| f.matches(doc)),
            Filter::Or(filters) => filters.iter().any(|f| f.matches(doc)),
        }
    }
}

/// Orders two field values: missing first, numbers numerically, strings lexically.
pub(crate) fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(x), Some(y)) => type_rank(x).cmp(&type_rank(y)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
