//! Validator Trees - Composable Rule ASTs
//!
//! A validator is an immutable tree built once at composition time and
//! evaluated by the engine against an adapter. Leaves pair a property with a
//! leaf operator; aggregation nodes combine child outcomes per the tri-state
//! algebra. Trees are plain values, freely shared across concurrent calls.

use serde_json::Value;

use crate::error::EngineError;
use crate::operators::{Operator, Ordered};
use crate::path::Path;
use crate::property::{Property, VALUE};

/// Outcome policy for ALL over an empty container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyAllPolicy {
    /// Vacuous universal truth: an empty container passes.
    VacuousSuccess,
    /// Treat the check as not applicable.
    Ignore,
}

/// Immutable validator tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    /// Leaf predicate applied to a property of the addressed value.
    Leaf {
        property: &'static Property,
        op: Operator,
    },
    /// All children must hold; short-circuits on the first failure.
    And(Vec<Validator>),
    /// At least one child must hold; short-circuits on the first success.
    Or(Vec<Validator>),
    /// Inverts the child outcome; `Ignore` passes through.
    Not(Box<Validator>),
    /// At least one container element satisfies the child validator.
    Any(Box<Validator>),
    /// Every container element satisfies the child validator.
    All(Box<Validator>, EmptyAllPolicy),
    /// Apply the child validator at a member path below the current node.
    AtPath { path: Path, inner: Box<Validator> },
}

impl Validator {
    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Validator::Leaf { .. } => "leaf",
            Validator::And(_) => "AND",
            Validator::Or(_) => "OR",
            Validator::Not(_) => "NOT",
            Validator::Any(_) => "ANY",
            Validator::All(..) => "ALL",
            Validator::AtPath { .. } => "member",
        }
    }
}

/// All children must hold. Rejects the empty child list at composition time.
pub fn and(children: Vec<Validator>) -> Result<Validator, EngineError> {
    if children.is_empty() {
        return Err(EngineError::EmptyAggregation("AND"));
    }
    Ok(Validator::And(children))
}

/// At least one child must hold. Rejects the empty child list.
pub fn or(children: Vec<Validator>) -> Result<Validator, EngineError> {
    if children.is_empty() {
        return Err(EngineError::EmptyAggregation("OR"));
    }
    Ok(Validator::Or(children))
}

pub fn not(inner: Validator) -> Validator {
    Validator::Not(Box::new(inner))
}

/// At least one element of the addressed container satisfies `inner`.
pub fn any(inner: Validator) -> Validator {
    Validator::Any(Box::new(inner))
}

/// Every element of the addressed container satisfies `inner`; an empty
/// container passes vacuously.
pub fn all(inner: Validator) -> Validator {
    Validator::All(Box::new(inner), EmptyAllPolicy::VacuousSuccess)
}

pub fn all_with_policy(inner: Validator, policy: EmptyAllPolicy) -> Validator {
    Validator::All(Box::new(inner), policy)
}

/// Apply `inner` at a member path below the current node.
pub fn at(path: Path, inner: Validator) -> Validator {
    Validator::AtPath {
        path,
        inner: Box::new(inner),
    }
}

/// Re-target a leaf check at a named property: `prop(&SIZE, gte(3))`.
///
/// Aggregations carry their own presentation and cannot be re-targeted;
/// passing one is a composition error.
pub fn prop(property: &'static Property, leaf: Validator) -> Result<Validator, EngineError> {
    match leaf {
        Validator::Leaf { op, .. } => Ok(Validator::Leaf { property, op }),
        other => Err(EngineError::PropertyOnAggregation(other.kind_name())),
    }
}

fn leaf(op: Operator) -> Validator {
    Validator::Leaf {
        property: &VALUE,
        op,
    }
}

pub fn eq(operand: impl Into<Value>) -> Validator {
    leaf(Operator::Eq(operand.into()))
}

pub fn ne(operand: impl Into<Value>) -> Validator {
    leaf(Operator::Ne(operand.into()))
}

pub fn lt(operand: impl Into<Ordered>) -> Validator {
    leaf(Operator::Lt(operand.into()))
}

pub fn lte(operand: impl Into<Ordered>) -> Validator {
    leaf(Operator::Lte(operand.into()))
}

pub fn gt(operand: impl Into<Ordered>) -> Validator {
    leaf(Operator::Gt(operand.into()))
}

pub fn gte(operand: impl Into<Ordered>) -> Validator {
    leaf(Operator::Gte(operand.into()))
}

pub fn contains(operand: impl Into<Value>) -> Validator {
    leaf(Operator::Contains(operand.into()))
}

/// Existence predicate over the addressed path.
pub fn exists(expected: bool) -> Validator {
    leaf(Operator::Exists(expected))
}

/// The addressed value must be empty.
pub fn empty() -> Validator {
    leaf(Operator::Empty(true))
}

/// The addressed value must be not empty.
pub fn not_empty() -> Validator {
    leaf(Operator::Empty(false))
}
