//! Evaluation Engine
//!
//! Recursive walk over a validator tree against an adapter. The walk keeps
//! one mutable key path from the validation root to the check in progress;
//! ANY/ALL push their pseudo-key and re-base resolution onto the container
//! element being visited. Leaf predicates never learn which execution mode
//! is active: the adapter absorbs reporting and prevalidation concerns
//! through hints and leaf reports.

use serde_json::Value;
use tracing::{debug, trace};

use crate::access::{path_exists, resolve_value, Access};
use crate::adapter::{Adapter, Hint};
use crate::format::BYPASS_MEMBER_NAMES;
use crate::operators::Operator;
use crate::path::{Key, Path};
use crate::property::{Property, VALUE};
use crate::reporter::{Presentation, Reporter};
use crate::status::Status;
use crate::strings::default_translator;
use crate::validator::{EmptyAllPolicy, Validator};

/// Plain pass/fail validation of `target`.
pub fn apply(validator: &Validator, target: &Value) -> Status {
    let mut adapter = Adapter::new(target);
    apply_with(validator, &mut adapter)
}

/// Run `validator` through a prepared adapter. The adapter keeps its
/// accumulated report; consume it with [`Adapter::finish_report`].
pub fn apply_with(validator: &Validator, adapter: &mut Adapter<'_>) -> Status {
    debug!(kind = validator.kind_name(), "validation started");
    let target = adapter.target();
    let mut path: Vec<Key> = Vec::new();
    let status = eval(validator, adapter, target, 0, &mut path);
    debug!(?status, "validation finished");
    status
}

/// Reporting validation: on failure, `dest` receives the composed report
/// in the process-wide default locale.
pub fn apply_report(validator: &Validator, target: &Value, dest: &mut String) -> Status {
    let reporter = Reporter::new(default_translator(), &BYPASS_MEMBER_NAMES);
    let mut adapter = Adapter::reporting(target, reporter);
    let status = apply_with(validator, &mut adapter);
    if status.is_fail() {
        if let Some(report) = adapter.finish_report() {
            *dest = report;
        }
    }
    status
}

/// Prevalidate one candidate member value against a full ruleset before an
/// update is applied. Checks addressing other members evaluate to `Ignore`;
/// on failure `dest` receives the report.
pub fn prevalidate(
    member: &Path,
    candidate: &Value,
    validator: &Validator,
    dest: &mut String,
) -> Status {
    let reporter = Reporter::new(default_translator(), &BYPASS_MEMBER_NAMES);
    let mut adapter = Adapter::prevalidation(member.clone(), candidate, reporter);
    let status = apply_with(validator, &mut adapter);
    if status.is_fail() {
        if let Some(report) = adapter.finish_report() {
            *dest = report;
        }
    }
    status
}

/// Prevalidation with the strict ANY policy: an empty candidate container
/// fails element-existence aggregations instead of skipping them.
pub fn prevalidate_strict_any(
    member: &Path,
    candidate: &Value,
    validator: &Validator,
    dest: &mut String,
) -> Status {
    let reporter = Reporter::new(default_translator(), &BYPASS_MEMBER_NAMES);
    let mut adapter = Adapter::prevalidation(member.clone(), candidate, reporter);
    adapter.set_strict_any(true);
    let status = apply_with(validator, &mut adapter);
    if status.is_fail() {
        if let Some(report) = adapter.finish_report() {
            *dest = report;
        }
    }
    status
}

/// Keys of `path` relative to the current resolution base.
///
/// Outside prevalidation, or once the walk has re-based onto a container
/// element, this is a plain suffix slice. At the prevalidation root the path
/// must address the member under prevalidation (pseudo-keys match as
/// wildcards); a path addressing anything else yields `None` and the check
/// is skipped.
fn relative_keys<'p>(
    adapter: &Adapter<'_>,
    base_depth: usize,
    path: &'p [Key],
) -> Option<&'p [Key]> {
    if base_depth > 0 {
        return Some(&path[base_depth..]);
    }
    match adapter.prevalidation_member() {
        None => Some(path),
        Some(member) => {
            let m = member.keys();
            if path.len() >= m.len() && m.iter().zip(path).all(|(a, b)| a.matches(b)) {
                Some(&path[m.len()..])
            } else {
                None
            }
        }
    }
}

fn eval(
    validator: &Validator,
    adapter: &mut Adapter<'_>,
    base: &dyn Access,
    base_depth: usize,
    path: &mut Vec<Key>,
) -> Status {
    match validator {
        Validator::Leaf { property, op } => {
            eval_leaf(adapter, base, base_depth, path, *property, op)
        }

        Validator::And(children) => {
            let hint = Hint::Aggregation(Presentation::AND);
            adapter.hint_before(hint);
            trace!(children = children.len(), "AND");
            let mut any_success = false;
            let mut status = Status::Ignore;
            for child in children {
                match eval(child, adapter, base, base_depth, path) {
                    Status::Fail => {
                        status = Status::Fail;
                        break;
                    }
                    Status::Success => any_success = true,
                    Status::Ignore => {}
                }
            }
            if !status.is_fail() {
                status = if any_success {
                    Status::Success
                } else {
                    Status::Ignore
                };
            }
            adapter.hint_after(hint, status);
            status
        }

        Validator::Or(children) => {
            let hint = Hint::Aggregation(Presentation::OR);
            adapter.hint_before(hint);
            trace!(children = children.len(), "OR");
            let mut any_fail = false;
            let mut status = Status::Ignore;
            for child in children {
                match eval(child, adapter, base, base_depth, path) {
                    Status::Success => {
                        status = Status::Success;
                        break;
                    }
                    Status::Fail => any_fail = true,
                    Status::Ignore => {}
                }
            }
            if !status.is_success() {
                status = if any_fail { Status::Fail } else { Status::Ignore };
            }
            adapter.hint_after(hint, status);
            status
        }

        Validator::Not(inner) => {
            let hint = Hint::Aggregation(Presentation::NOT);
            adapter.hint_before(hint);
            let status = eval(inner, adapter, base, base_depth, path).invert();
            adapter.hint_after(hint, status);
            status
        }

        Validator::Any(inner) => {
            eval_elements(adapter, base, base_depth, path, inner, ElementMode::Any)
        }

        Validator::All(inner, policy) => eval_elements(
            adapter,
            base,
            base_depth,
            path,
            inner,
            ElementMode::All(*policy),
        ),

        Validator::AtPath { path: member, inner } => {
            let before = path.len();
            path.extend(member.keys().iter().cloned());
            let status = eval(inner, adapter, base, base_depth, path);
            path.truncate(before);
            status
        }
    }
}

fn eval_leaf(
    adapter: &mut Adapter<'_>,
    base: &dyn Access,
    base_depth: usize,
    path: &[Key],
    property: &'static Property,
    op: &Operator,
) -> Status {
    let Some(rel) = relative_keys(adapter, base_depth, path) else {
        return Status::Ignore;
    };

    let status = if let Some(expected) = op.as_exists() {
        // The member under prevalidation is the candidate itself; when the
        // caller declared it brand new, existence checks on it are skipped.
        let at_prevalidation_member =
            base_depth == 0 && adapter.prevalidation_member().is_some() && rel.is_empty();
        if at_prevalidation_member && !adapter.check_member_exists_before_validation() {
            Status::Ignore
        } else {
            Status::from_bool(path_exists(base, rel) == expected)
        }
    } else {
        match resolve_value(base, rel) {
            None => Status::Ignore,
            Some(value) => {
                confirm_member(adapter, base_depth);
                match resolve_facet(property, &value) {
                    None => Status::Fail,
                    Some(facet) => op.apply(&facet),
                }
            }
        }
    };

    adapter.leaf_report(path, property, op, status);
    status
}

fn resolve_facet(property: &'static Property, value: &Value) -> Option<Value> {
    if property.is_identity() {
        Some(value.clone())
    } else {
        property.get(value)
    }
}

fn confirm_member(adapter: &mut Adapter<'_>, base_depth: usize) {
    if base_depth == 0 && adapter.prevalidation_member().is_some() && !adapter.member_checked() {
        adapter.hint_before(Hint::MemberConfirmed);
    }
}

enum ElementMode {
    Any,
    All(EmptyAllPolicy),
}

/// Element aggregation: resolve the container addressed by the current path,
/// push the pseudo-key, then evaluate the sub-validator once per element with
/// resolution re-based onto that element.
fn eval_elements(
    adapter: &mut Adapter<'_>,
    base: &dyn Access,
    base_depth: usize,
    path: &mut Vec<Key>,
    inner: &Validator,
    mode: ElementMode,
) -> Status {
    let Some(rel) = relative_keys(adapter, base_depth, path) else {
        return Status::Ignore;
    };
    let Some(container) = resolve_value(base, rel) else {
        return Status::Ignore;
    };
    confirm_member(adapter, base_depth);
    let Some(elements) = container.elements().supported() else {
        return Status::Ignore;
    };

    let pseudo = match mode {
        ElementMode::Any => Key::AnyElement,
        ElementMode::All(_) => Key::EachElement,
    };

    if elements.is_empty() {
        return match mode {
            ElementMode::Any => {
                if adapter.strict_any() {
                    // An element-existence requirement over a container that
                    // will end up empty is a real failure in an update.
                    path.push(Key::AnyElement);
                    adapter.leaf_report(path, &VALUE, &Operator::Exists(true), Status::Fail);
                    path.pop();
                    Status::Fail
                } else {
                    Status::Ignore
                }
            }
            ElementMode::All(EmptyAllPolicy::VacuousSuccess) => Status::Success,
            ElementMode::All(EmptyAllPolicy::Ignore) => Status::Ignore,
        };
    }

    let presentation = match mode {
        ElementMode::Any => Presentation::ANY,
        ElementMode::All(_) => Presentation::ALL,
    };
    let hint = Hint::Aggregation(presentation);
    adapter.hint_before(hint);
    trace!(elements = elements.len(), kind = presentation.description, "element aggregation");

    path.push(pseudo);
    let element_base_depth = path.len();
    let mut status = match mode {
        ElementMode::Any => Status::Fail,
        ElementMode::All(_) => Status::Success,
    };
    for element in &elements {
        let element_status = eval(inner, adapter, element, element_base_depth, path);
        match mode {
            ElementMode::Any => {
                if element_status.is_success() {
                    status = Status::Success;
                    break;
                }
            }
            ElementMode::All(_) => {
                if element_status.is_fail() {
                    status = Status::Fail;
                    break;
                }
            }
        }
    }
    path.pop();

    adapter.hint_after(hint, status);
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::{member, member_path};
    use crate::property::SIZE;
    use crate::validator::{all, and, any, at, contains, eq, exists, gte, lt, not, or, prop};
    use serde_json::json;

    #[test]
    fn test_plain_apply_leaf_at_member() {
        let v = at(member("age"), gte(18));
        assert_eq!(apply(&v, &json!({"age": 21})), Status::Success);
        assert_eq!(apply(&v, &json!({"age": 15})), Status::Fail);
    }

    #[test]
    fn test_missing_member_value_check_is_not_applicable() {
        let v = at(member("age"), gte(18));
        assert_eq!(apply(&v, &json!({})), Status::Ignore);
    }

    #[test]
    fn test_exists_resolves_through_capability_probe() {
        let v = at(member("age"), exists(true));
        assert_eq!(apply(&v, &json!({"age": 1})), Status::Success);
        assert_eq!(apply(&v, &json!({})), Status::Fail);

        let absent = at(member("age"), exists(false));
        assert_eq!(apply(&absent, &json!({})), Status::Success);
    }

    #[test]
    fn test_and_or_short_circuit_combination() {
        let v = and(vec![
            at(member("age"), gte(18)),
            at(member("name"), exists(true)),
        ])
        .unwrap();
        assert_eq!(apply(&v, &json!({"age": 30, "name": "bob"})), Status::Success);
        assert_eq!(apply(&v, &json!({"age": 10, "name": "bob"})), Status::Fail);

        let alt = or(vec![at(member("age"), lt(10)), at(member("age"), gte(18))]).unwrap();
        assert_eq!(apply(&alt, &json!({"age": 5})), Status::Success);
        assert_eq!(apply(&alt, &json!({"age": 15})), Status::Fail);
    }

    #[test]
    fn test_all_ignore_children_aggregate_to_ignore() {
        let v = and(vec![at(member("a"), gte(1)), at(member("b"), gte(1))]).unwrap();
        assert_eq!(apply(&v, &json!({})), Status::Ignore);
    }

    #[test]
    fn test_not_inverts_and_passes_ignore_through() {
        let v = not(at(member("age"), gte(18)));
        assert_eq!(apply(&v, &json!({"age": 21})), Status::Fail);
        assert_eq!(apply(&v, &json!({"age": 10})), Status::Success);
        assert_eq!(apply(&v, &json!({})), Status::Ignore);
    }

    #[test]
    fn test_any_all_over_container_elements() {
        let v = at(member("tags"), any(eq("x")));
        assert_eq!(apply(&v, &json!({"tags": ["a", "x"]})), Status::Success);
        assert_eq!(apply(&v, &json!({"tags": ["a", "b"]})), Status::Fail);
        assert_eq!(apply(&v, &json!({"tags": []})), Status::Ignore);

        let every = at(member("tags"), all(gte(10)));
        assert_eq!(apply(&every, &json!({"tags": [10, 20]})), Status::Success);
        assert_eq!(apply(&every, &json!({"tags": [10, 5]})), Status::Fail);
        assert_eq!(apply(&every, &json!({"tags": []})), Status::Success);
    }

    #[test]
    fn test_nested_element_checks_resolve_below_the_element() {
        let v = at(
            member("users"),
            all(at(member("name"), exists(true))),
        );
        assert_eq!(
            apply(&v, &json!({"users": [{"name": "a"}, {"name": "b"}]})),
            Status::Success
        );
        assert_eq!(
            apply(&v, &json!({"users": [{"name": "a"}, {"id": 2}]})),
            Status::Fail
        );
    }

    #[test]
    fn test_property_facet_leaf() {
        let v = at(member("tags"), prop(&SIZE, gte(2)).unwrap());
        assert_eq!(apply(&v, &json!({"tags": ["a", "b"]})), Status::Success);
        assert_eq!(apply(&v, &json!({"tags": ["a"]})), Status::Fail);
        // size of a number is not a thing; the check fails, it does not error
        assert_eq!(apply(&v, &json!({"tags": 7})), Status::Fail);
    }

    #[test]
    fn test_apply_report_fills_destination_on_failure_only() {
        let v = at(member("age"), gte(18));
        let mut report = String::new();
        assert_eq!(apply_report(&v, &json!({"age": 15}), &mut report), Status::Fail);
        assert_eq!(report, "age must be greater than or equal to 18");

        let mut untouched = String::new();
        assert_eq!(
            apply_report(&v, &json!({"age": 30}), &mut untouched),
            Status::Success
        );
        assert_eq!(untouched, "");
    }

    #[test]
    fn test_prevalidate_applies_only_matching_member() {
        let rules = and(vec![
            at(member("age"), gte(18)),
            at(member("name"), exists(true)),
        ])
        .unwrap();

        let mut report = String::new();
        assert_eq!(
            prevalidate(&member("age"), &json!(15), &rules, &mut report),
            Status::Fail
        );
        assert_eq!(report, "age must be greater than or equal to 18");

        let mut ok = String::new();
        assert_eq!(
            prevalidate(&member("age"), &json!(30), &rules, &mut ok),
            Status::Success
        );
        assert_eq!(ok, "");
    }

    #[test]
    fn test_prevalidate_nested_member_navigates_candidate() {
        let rules = at(member_path(["user", "name"]).unwrap(), exists(true));

        let mut report = String::new();
        assert_eq!(
            prevalidate(&member("user"), &json!({"name": "bob"}), &rules, &mut report),
            Status::Success
        );
        assert_eq!(
            prevalidate(&member("user"), &json!({"id": 3}), &rules, &mut report),
            Status::Fail
        );
    }

    #[test]
    fn test_prevalidate_strict_any_fails_empty_candidate() {
        let rules = at(member("tags"), any(contains("x")));

        let mut report = String::new();
        assert_eq!(
            prevalidate(&member("tags"), &json!([]), &rules, &mut report),
            Status::Ignore
        );
        assert_eq!(
            prevalidate_strict_any(&member("tags"), &json!([]), &rules, &mut report),
            Status::Fail
        );
        assert_eq!(report, "at least one element of tags must exist");
    }

    #[test]
    fn test_prevalidate_skips_member_existence_for_new_member() {
        let rules = at(member("nickname"), exists(true));
        let candidate = json!("ned");

        let mut adapter = Adapter::prevalidation(
            member("nickname"),
            &candidate,
            Reporter::new(default_translator(), &BYPASS_MEMBER_NAMES),
        );
        adapter.set_check_member_exists_before_validation(false);
        assert_eq!(apply_with(&rules, &mut adapter), Status::Ignore);

        let mut checking = Adapter::prevalidation(
            member("nickname"),
            &candidate,
            Reporter::new(default_translator(), &BYPASS_MEMBER_NAMES),
        );
        assert_eq!(apply_with(&rules, &mut checking), Status::Success);
    }
}
