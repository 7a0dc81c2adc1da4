//! Adapters - Validation Targets Plus Execution Traits
//!
//! An adapter pairs the structured data under validation with the traits of
//! one validation call: plain pass/fail evaluation, failure reporting, or
//! prevalidation of a single member against a full ruleset. The engine talks
//! to the adapter through hints around every aggregation frame and through
//! leaf reports, so the same evaluation walk serves all three modes.

use crate::access::{path_exists, Access};
use crate::operators::Operator;
use crate::path::{Key, Path};
use crate::property::Property;
use crate::reporter::{Presentation, Reporter};
use crate::status::Status;

/// Engine-to-adapter notification around evaluation steps.
#[derive(Debug, Clone, Copy)]
pub enum Hint {
    /// An aggregation frame opens/closes with this presentation.
    Aggregation(Presentation),
    /// The member under prevalidation has been positively matched; existence
    /// pre-checks for deeper keys may be skipped from here on.
    MemberConfirmed,
}

/// Traits of a prevalidation call: one member path paired with the candidate
/// value that would be written there.
pub struct PrevalidationTraits<'a> {
    member: Path,
    reporter: Reporter<'a>,
    strict_any: bool,
    check_member_exists_before_validation: bool,
    member_checked: bool,
}

enum AdapterTraits<'a> {
    Plain,
    Reporting(Reporter<'a>),
    Prevalidation(PrevalidationTraits<'a>),
}

/// Validation target plus the call-scoped traits driving one evaluation.
pub struct Adapter<'a> {
    target: &'a dyn Access,
    traits: AdapterTraits<'a>,
}

impl<'a> Adapter<'a> {
    /// Plain adapter: pass/fail only, no report.
    pub fn new(target: &'a dyn Access) -> Self {
        Self {
            target,
            traits: AdapterTraits::Plain,
        }
    }

    /// Reporting adapter: failures are described through `reporter`.
    pub fn reporting(target: &'a dyn Access, reporter: Reporter<'a>) -> Self {
        Self {
            target,
            traits: AdapterTraits::Reporting(reporter),
        }
    }

    /// Prevalidation adapter: `candidate` stands in for the value about to be
    /// written at `member`; only checks addressing that member apply.
    pub fn prevalidation(member: Path, candidate: &'a dyn Access, reporter: Reporter<'a>) -> Self {
        Self {
            target: candidate,
            traits: AdapterTraits::Prevalidation(PrevalidationTraits {
                member,
                reporter,
                strict_any: false,
                check_member_exists_before_validation: true,
                member_checked: false,
            }),
        }
    }

    pub fn target(&self) -> &'a dyn Access {
        self.target
    }

    /// Member under prevalidation, when this adapter runs in that mode.
    pub fn prevalidation_member(&self) -> Option<&Path> {
        match &self.traits {
            AdapterTraits::Prevalidation(p) => Some(&p.member),
            _ => None,
        }
    }

    /// Strict ANY policy: an empty container fails ANY instead of ignoring
    /// it. Only meaningful on prevalidation adapters.
    pub fn set_strict_any(&mut self, strict: bool) {
        if let AdapterTraits::Prevalidation(p) = &mut self.traits {
            p.strict_any = strict;
        }
    }

    pub fn strict_any(&self) -> bool {
        matches!(&self.traits, AdapterTraits::Prevalidation(p) if p.strict_any)
    }

    /// Whether existence predicates on the member itself are evaluated. Off
    /// means the member is brand new and existence checks on it are skipped.
    pub fn set_check_member_exists_before_validation(&mut self, check: bool) {
        if let AdapterTraits::Prevalidation(p) = &mut self.traits {
            p.check_member_exists_before_validation = check;
        }
    }

    pub fn check_member_exists_before_validation(&self) -> bool {
        match &self.traits {
            AdapterTraits::Prevalidation(p) => p.check_member_exists_before_validation,
            _ => true,
        }
    }

    pub fn member_checked(&self) -> bool {
        matches!(&self.traits, AdapterTraits::Prevalidation(p) if p.member_checked)
    }

    /// Existence probe against the target, honoring capability fallbacks.
    pub fn check_path_exists(&self, keys: &[Key]) -> bool {
        path_exists(self.target, keys)
    }

    /// Notification before an evaluation step.
    pub fn hint_before(&mut self, hint: Hint) {
        match (hint, &mut self.traits) {
            (Hint::Aggregation(presentation), AdapterTraits::Reporting(reporter)) => {
                reporter.aggregate_open(presentation);
            }
            (Hint::Aggregation(presentation), AdapterTraits::Prevalidation(p)) => {
                p.reporter.aggregate_open(presentation);
            }
            (Hint::MemberConfirmed, AdapterTraits::Prevalidation(p)) => {
                p.member_checked = true;
            }
            _ => {}
        }
    }

    /// Notification after an evaluation step, carrying its outcome.
    pub fn hint_after(&mut self, hint: Hint, status: Status) {
        if let Hint::Aggregation(_) = hint {
            match &mut self.traits {
                AdapterTraits::Reporting(reporter) => reporter.aggregate_close(status),
                AdapterTraits::Prevalidation(p) => p.reporter.aggregate_close(status),
                AdapterTraits::Plain => {}
            }
        }
    }

    /// Record one leaf outcome. A no-op without a reporter.
    pub fn leaf_report(
        &mut self,
        path: &[Key],
        property: &'static Property,
        op: &Operator,
        status: Status,
    ) {
        match &mut self.traits {
            AdapterTraits::Reporting(reporter) => reporter.leaf_report(path, property, op, status),
            AdapterTraits::Prevalidation(p) => p.reporter.leaf_report(path, property, op, status),
            AdapterTraits::Plain => {}
        }
    }

    /// Derive an adapter of the same kind over a different target, with a
    /// fresh report. The evaluation walk descends into container elements
    /// on its own; this is for callers that want to probe a subtree with
    /// the current call's policies without touching its accumulated state.
    pub fn derive(&self, target: &'a dyn Access) -> Adapter<'a> {
        let traits = match &self.traits {
            AdapterTraits::Plain => AdapterTraits::Plain,
            AdapterTraits::Reporting(reporter) => AdapterTraits::Reporting(reporter.fresh()),
            AdapterTraits::Prevalidation(p) => {
                AdapterTraits::Prevalidation(PrevalidationTraits {
                    member: p.member.clone(),
                    reporter: p.reporter.fresh(),
                    strict_any: p.strict_any,
                    check_member_exists_before_validation: p.check_member_exists_before_validation,
                    member_checked: p.member_checked,
                })
            }
        };
        Adapter {
            target,
            traits,
        }
    }

    /// Consume the adapter and assemble the report, if this call carried one.
    pub fn finish_report(self) -> Option<String> {
        match self.traits {
            AdapterTraits::Plain => None,
            AdapterTraits::Reporting(reporter) => Some(reporter.finish()),
            AdapterTraits::Prevalidation(p) => Some(p.reporter.finish()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::BYPASS_MEMBER_NAMES;
    use crate::path::member;
    use crate::property::VALUE;
    use crate::strings::default_translator;
    use serde_json::json;

    fn reporter() -> Reporter<'static> {
        Reporter::new(default_translator(), &BYPASS_MEMBER_NAMES)
    }

    #[test]
    fn test_plain_adapter_produces_no_report() {
        let data = json!({"age": 15});
        let mut adapter = Adapter::new(&data);
        adapter.leaf_report(
            &[Key::Name("age".into())],
            &VALUE,
            &Operator::Gte(18.into()),
            Status::Fail,
        );
        assert_eq!(adapter.finish_report(), None);
    }

    #[test]
    fn test_reporting_adapter_collects_leaf_failures() {
        let data = json!({"age": 15});
        let mut adapter = Adapter::reporting(&data, reporter());
        adapter.leaf_report(
            &[Key::Name("age".into())],
            &VALUE,
            &Operator::Gte(18.into()),
            Status::Fail,
        );
        assert_eq!(
            adapter.finish_report().as_deref(),
            Some("age must be greater than or equal to 18")
        );
    }

    #[test]
    fn test_prevalidation_flags_default_and_toggle() {
        let candidate = json!(15);
        let mut adapter = Adapter::prevalidation(member("age"), &candidate, reporter());
        assert!(adapter.check_member_exists_before_validation());
        assert!(!adapter.strict_any());
        assert!(!adapter.member_checked());

        adapter.set_strict_any(true);
        adapter.set_check_member_exists_before_validation(false);
        adapter.hint_before(Hint::MemberConfirmed);
        assert!(adapter.strict_any());
        assert!(!adapter.check_member_exists_before_validation());
        assert!(adapter.member_checked());
    }

    #[test]
    fn test_traits_flags_are_inert_outside_prevalidation() {
        let data = json!({});
        let mut adapter = Adapter::new(&data);
        adapter.set_strict_any(true);
        assert!(!adapter.strict_any());
        assert!(adapter.check_member_exists_before_validation());
    }

    #[test]
    fn test_derive_keeps_kind_and_flags_with_fresh_report() {
        let candidate = json!({"name": "bob"});
        let mut adapter = Adapter::prevalidation(member("user"), &candidate, reporter());
        adapter.set_strict_any(true);
        adapter.leaf_report(
            &[Key::Name("user".into())],
            &VALUE,
            &Operator::Exists(true),
            Status::Fail,
        );

        let sub = json!("bob");
        let derived = adapter.derive(&sub);
        assert!(derived.strict_any());
        assert_eq!(derived.prevalidation_member(), Some(&member("user")));
        assert_eq!(derived.finish_report().as_deref(), Some(""));

        assert_eq!(adapter.finish_report().as_deref(), Some("user must exist"));
    }

    #[test]
    fn test_derived_adapter_validates_a_subtree() {
        use crate::engine::apply_with;
        use crate::validator::{at, gte};

        let data = json!({"user": {"age": 15}});
        let outer = Adapter::reporting(&data, reporter());

        let sub = json!({"age": 15});
        let mut derived = outer.derive(&sub);
        let v = at(member("age"), gte(18));
        assert_eq!(apply_with(&v, &mut derived), Status::Fail);
        assert_eq!(
            derived.finish_report().as_deref(),
            Some("age must be greater than or equal to 18")
        );

        // Probing the subtree left the outer call untouched
        assert_eq!(outer.finish_report().as_deref(), Some(""));
    }

    #[test]
    fn test_check_path_exists_probes_target() {
        let data = json!({"user": {"name": "bob"}});
        let adapter = Adapter::new(&data);
        assert!(adapter.check_path_exists(&[
            Key::Name("user".into()),
            Key::Name("name".into()),
        ]));
        assert!(!adapter.check_path_exists(&[Key::Name("missing".into())]));
    }
}
