//! Leaf Operator Catalog
//!
//! Simple value predicates combined by the aggregation engine. Ordering
//! operators take an [`Ordered`] operand (number or text) so that an
//! incomparable operand cannot be composed in the first place; shape
//! mismatches discovered at check time are validation failures, not errors.

use std::cmp::Ordering;

use serde_json::{Number, Value};

use crate::status::Status;
use crate::strings::{STRING_EMPTY, STRING_EXISTS, STRING_NOT_EMPTY, STRING_NOT_EXISTS};

/// Operand admissible for the ordering operators: a number or a string.
#[derive(Debug, Clone, PartialEq)]
pub struct Ordered(Value);

impl Ordered {
    pub fn value(&self) -> &Value {
        &self.0
    }
}

impl From<i32> for Ordered {
    fn from(v: i32) -> Self {
        Ordered(Value::from(v))
    }
}

impl From<i64> for Ordered {
    fn from(v: i64) -> Self {
        Ordered(Value::from(v))
    }
}

impl From<u32> for Ordered {
    fn from(v: u32) -> Self {
        Ordered(Value::from(v))
    }
}

impl From<u64> for Ordered {
    fn from(v: u64) -> Self {
        Ordered(Value::from(v))
    }
}

impl From<f64> for Ordered {
    fn from(v: f64) -> Self {
        Ordered(Value::from(v))
    }
}

impl From<&str> for Ordered {
    fn from(v: &str) -> Self {
        Ordered(Value::from(v))
    }
}

impl From<String> for Ordered {
    fn from(v: String) -> Self {
        Ordered(Value::from(v))
    }
}

/// A leaf predicate over the addressed value (or one of its properties).
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    Eq(Value),
    Ne(Value),
    Lt(Ordered),
    Lte(Ordered),
    Gt(Ordered),
    Gte(Ordered),
    Contains(Value),
    /// Path existence predicate; evaluated by the engine against the
    /// adapter's existence probe rather than against a resolved value.
    Exists(bool),
    /// Emptiness flag predicate.
    Empty(bool),
}

impl Operator {
    /// Apply the predicate to a resolved value.
    ///
    /// `Exists` is resolved by the engine and reports `Ignore` here so a
    /// misrouted call can never masquerade as a definite outcome.
    pub fn apply(&self, actual: &Value) -> Status {
        match self {
            Operator::Eq(expected) => Status::from_bool(values_equal(actual, expected)),
            Operator::Ne(expected) => Status::from_bool(!values_equal(actual, expected)),
            Operator::Lt(bound) => ordered(actual, bound, Ordering::is_lt),
            Operator::Lte(bound) => ordered(actual, bound, Ordering::is_le),
            Operator::Gt(bound) => ordered(actual, bound, Ordering::is_gt),
            Operator::Gte(bound) => ordered(actual, bound, Ordering::is_ge),
            Operator::Contains(needle) => Status::from_bool(contains(actual, needle)),
            Operator::Exists(_) => Status::Ignore,
            Operator::Empty(expected) => match emptiness(actual) {
                Some(empty) => Status::from_bool(empty == *expected),
                None => Status::Fail,
            },
        }
    }

    /// Canonical phrase key describing the operator in a report sentence.
    pub fn phrase_key(&self) -> &'static str {
        match self {
            Operator::Eq(_) => "must be equal to",
            Operator::Ne(_) => "must be not equal to",
            Operator::Lt(_) => "must be less than",
            Operator::Lte(_) => "must be less than or equal to",
            Operator::Gt(_) => "must be greater than",
            Operator::Gte(_) => "must be greater than or equal to",
            Operator::Contains(_) => "must contain",
            Operator::Exists(true) => STRING_EXISTS,
            Operator::Exists(false) => STRING_NOT_EXISTS,
            Operator::Empty(true) => STRING_EMPTY,
            Operator::Empty(false) => STRING_NOT_EMPTY,
        }
    }

    /// Operand rendered after the operator phrase, when the operator has
    /// one. Flag and existence predicates read as complete phrases.
    pub fn operand(&self) -> Option<&Value> {
        match self {
            Operator::Eq(v) | Operator::Ne(v) | Operator::Contains(v) => Some(v),
            Operator::Lt(o) | Operator::Lte(o) | Operator::Gt(o) | Operator::Gte(o) => {
                Some(o.value())
            }
            Operator::Exists(_) | Operator::Empty(_) => None,
        }
    }

    pub(crate) fn as_exists(&self) -> Option<bool> {
        match self {
            Operator::Exists(expected) => Some(*expected),
            _ => None,
        }
    }
}

fn ordered(actual: &Value, bound: &Ordered, accept: fn(Ordering) -> bool) -> Status {
    match compare(actual, bound.value()) {
        Some(ordering) => Status::from_bool(accept(ordering)),
        None => Status::Fail,
    }
}

/// Equality with numeric normalization: `18` and `18.0` compare equal,
/// while integers keep their full width.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            compare_numbers(x, y) == Some(Ordering::Equal)
        }
        _ => a == b,
    }
}

fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        _ => None,
    }
}

/// Integer pairs compare exactly; `f64` is used only when one side really
/// is a float, so values beyond 2^53 keep their identity.
fn compare_numbers(x: &Number, y: &Number) -> Option<Ordering> {
    if x.is_f64() || y.is_f64() {
        return x.as_f64()?.partial_cmp(&y.as_f64()?);
    }
    match (x.as_i64(), y.as_i64()) {
        (Some(a), Some(b)) => Some(a.cmp(&b)),
        // as_i64 yields None only for u64 values above i64::MAX
        (Some(_), None) => Some(Ordering::Less),
        (None, Some(_)) => Some(Ordering::Greater),
        (None, None) => Some(x.as_u64()?.cmp(&y.as_u64()?)),
    }
}

fn contains(haystack: &Value, needle: &Value) -> bool {
    match haystack {
        Value::Array(items) => items.iter().any(|v| values_equal(v, needle)),
        Value::String(s) => needle.as_str().map(|n| s.contains(n)).unwrap_or(false),
        Value::Object(map) => needle.as_str().map(|n| map.contains_key(n)).unwrap_or(false),
        _ => false,
    }
}

fn emptiness(v: &Value) -> Option<bool> {
    match v {
        Value::Array(a) => Some(a.is_empty()),
        Value::Object(m) => Some(m.is_empty()),
        Value::String(s) => Some(s.is_empty()),
        _ => None,
    }
}
