//! Engine Errors - Composition-Time Rejection
//!
//! Expected validation failure is never an error; it is `Status::Fail`.
//! These errors cover programmer misuse caught while building a validator.

use thiserror::Error;

/// Errors raised while composing a validator tree.
///
/// Malformed compositions are rejected here, at construction time,
/// rather than degrading to `Status::Ignore` at check time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Member paths address a location inside the target and must have
    /// at least one key.
    #[error("Member path must not be empty")]
    EmptyPath,

    /// AND/OR over zero children has no defined outcome.
    #[error("{0} aggregation requires at least one child validator")]
    EmptyAggregation(&'static str),

    /// Properties attach to leaf checks only; aggregations carry their
    /// own presentation and cannot be re-targeted.
    #[error("Property can only wrap a leaf check, found {0} aggregation")]
    PropertyOnAggregation(&'static str),
}
