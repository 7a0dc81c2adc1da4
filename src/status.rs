//! Validation Status - Tri-State Outcome
//!
//! `Ignore` means "this check was not applicable" (path absent, empty
//! container under a lenient policy). It is never conflated with `Success`
//! when sibling results are combined.

use serde::{Deserialize, Serialize};

/// Outcome of a single check or of a whole validator tree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    Fail,
    Ignore,
}

impl Status {
    pub fn is_success(self) -> bool {
        self == Status::Success
    }

    pub fn is_fail(self) -> bool {
        self == Status::Fail
    }

    pub fn is_ignore(self) -> bool {
        self == Status::Ignore
    }

    /// Map a boolean predicate result onto the tri-state model.
    pub fn from_bool(ok: bool) -> Self {
        if ok {
            Status::Success
        } else {
            Status::Fail
        }
    }

    /// NOT semantics: success and fail swap, `Ignore` passes through
    /// unchanged since there is nothing to negate.
    pub fn invert(self) -> Self {
        match self {
            Status::Success => Status::Fail,
            Status::Fail => Status::Success,
            Status::Ignore => Status::Ignore,
        }
    }
}
