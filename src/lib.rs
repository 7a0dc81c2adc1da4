//! Validex Core - Generic Validation Engine
//!
//! # The Five Laws (Non-Negotiable)
//! 1. Three Outcomes, Never Two (success / fail / ignore)
//! 2. Validators Are Values (immutable, shareable trees)
//! 3. Leaves Never Know The Mode (plain, reporting, prevalidation)
//! 4. Absent Capability Means Does-Not-Exist, Not Error
//! 5. Deterministic Reports

pub mod access;
pub mod adapter;
pub mod engine;
pub mod error;
pub mod format;
pub mod operators;
pub mod path;
pub mod property;
pub mod reporter;
pub mod status;
pub mod strings;
pub mod validator;

pub use access::{key_exists, path_exists, resolve_value, Access, Capability};
pub use adapter::{Adapter, Hint, PrevalidationTraits};
pub use engine::{
    apply, apply_report, apply_with, prevalidate, prevalidate_strict_any,
};
pub use error::EngineError;
pub use format::{BypassMemberNames, MemberNames, BYPASS_MEMBER_NAMES};
pub use operators::{Operator, Ordered};
pub use path::{member, member_path, Key, Path};
pub use property::{Property, EMPTY, LENGTH, SIZE, VALUE};
pub use reporter::{Presentation, Reporter};
pub use status::Status;
pub use strings::{
    default_translator, Grammar, Phrase, PhraseTranslator, PhraseVariant,
};
pub use validator::{
    all, all_with_policy, and, any, at, contains, empty, eq, exists, gt, gte, lt, lte, ne, not,
    not_empty, or, prop, EmptyAllPolicy, Validator,
};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
