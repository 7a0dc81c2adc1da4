//! Structured Data Access - Capability-Probed Traversal
//!
//! The engine operates over anything implementing [`Access`]. Every
//! capability method defaults to [`Capability::Unsupported`], so a container
//! type opts into exactly the access methods it really has; the existence
//! probe walks the methods in a fixed priority order and resolves the
//! absence of every capability to "does not exist" by policy, never by
//! error. `serde_json::Value` implements the trait out of the box and is the
//! currency leaf predicates are evaluated against.

use serde_json::Value;

use crate::path::Key;

/// Result of asking a container for one of its optional access methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability<T> {
    Supported(T),
    Unsupported,
}

impl<T> Capability<T> {
    pub fn supported(self) -> Option<T> {
        match self {
            Capability::Supported(v) => Some(v),
            Capability::Unsupported => None,
        }
    }
}

/// Traversal capabilities of a structured value.
///
/// Implementations override only the methods their type supports; the
/// defaults advertise the capability as absent. Registered once per
/// container type, probed by the engine rather than re-discovered per call.
pub trait Access {
    /// Direct keyed lookup returning the child value.
    fn get_key(&self, _key: &Key) -> Capability<Option<&dyn Access>> {
        Capability::Unsupported
    }

    /// Boolean "has" membership test.
    fn has_key(&self, _key: &Key) -> Capability<bool> {
        Capability::Unsupported
    }

    /// Generic containment test.
    fn contains_key(&self, _key: &Key) -> Capability<bool> {
        Capability::Unsupported
    }

    /// Linear search, the find-returns-end-sentinel style of lookup.
    fn find_key(&self, _key: &Key) -> Capability<bool> {
        Capability::Unsupported
    }

    /// Explicit boolean-flag accessor.
    fn flag_key(&self, _key: &Key) -> Capability<bool> {
        Capability::Unsupported
    }

    /// Container elements materialized in iteration order, for ANY/ALL.
    fn elements(&self) -> Capability<Vec<Value>> {
        Capability::Unsupported
    }

    /// Materialize the node for leaf predicates and property getters.
    fn to_value(&self) -> Value;
}

/// Priority-ordered capability probe for a single key: direct lookup, then
/// `has`, then `contains`, then linear find, then the boolean-flag accessor.
/// If none of the capabilities exist, the key does not exist.
pub fn key_exists(node: &dyn Access, key: &Key) -> bool {
    if let Capability::Supported(found) = node.get_key(key) {
        return found.is_some();
    }
    if let Capability::Supported(has) = node.has_key(key) {
        return has;
    }
    if let Capability::Supported(contained) = node.contains_key(key) {
        return contained;
    }
    if let Capability::Supported(found) = node.find_key(key) {
        return found;
    }
    if let Capability::Supported(set) = node.flag_key(key) {
        return set;
    }
    false
}

/// Probe whether a whole path resolves under `node`, without validating it.
/// Property keys resolve through the property's `has`/`get` capabilities;
/// the aggregation pseudo-keys resolve when at least one element carries the
/// rest of the path.
pub fn path_exists(node: &dyn Access, keys: &[Key]) -> bool {
    let Some((first, rest)) = keys.split_first() else {
        return true;
    };
    match first {
        Key::Prop(property) => {
            let value = node.to_value();
            if !property.has(&value) {
                return false;
            }
            if rest.is_empty() {
                return true;
            }
            match property.get(&value) {
                Some(facet) => path_exists(&facet, rest),
                None => false,
            }
        }
        Key::AnyElement | Key::EachElement => match node.elements() {
            Capability::Supported(elements) => {
                elements.iter().any(|el| path_exists(el, rest))
            }
            Capability::Unsupported => false,
        },
        _ => {
            if rest.is_empty() {
                return key_exists(node, first);
            }
            match node.get_key(first) {
                Capability::Supported(Some(child)) => path_exists(child, rest),
                _ => false,
            }
        }
    }
}

/// Resolve a path to the addressed value, materializing only the resolved
/// subtree. `None` means the path does not resolve; the owning check treats
/// that as not applicable.
pub fn resolve_value(node: &dyn Access, keys: &[Key]) -> Option<Value> {
    let Some((first, rest)) = keys.split_first() else {
        return Some(node.to_value());
    };
    match first {
        Key::Prop(property) => {
            let value = node.to_value();
            let facet = property.get(&value)?;
            resolve_value(&facet, rest)
        }
        Key::AnyElement | Key::EachElement => None,
        _ => match node.get_key(first) {
            Capability::Supported(Some(child)) => resolve_value(child, rest),
            _ => None,
        },
    }
}

impl Access for Value {
    fn get_key(&self, key: &Key) -> Capability<Option<&dyn Access>> {
        match (self, key) {
            (Value::Object(map), Key::Name(name)) => {
                Capability::Supported(map.get(name).map(|v| v as &dyn Access))
            }
            (Value::Array(items), Key::Index(index)) => {
                Capability::Supported(items.get(*index).map(|v| v as &dyn Access))
            }
            _ => Capability::Unsupported,
        }
    }

    fn has_key(&self, key: &Key) -> Capability<bool> {
        match (self, key) {
            (Value::Object(map), Key::Name(name)) => {
                Capability::Supported(map.contains_key(name))
            }
            (Value::Array(items), Key::Index(index)) => {
                Capability::Supported(*index < items.len())
            }
            _ => Capability::Unsupported,
        }
    }

    fn contains_key(&self, key: &Key) -> Capability<bool> {
        match (self, key) {
            (Value::Array(items), Key::Name(name)) => Capability::Supported(
                items.iter().any(|v| v.as_str() == Some(name.as_str())),
            ),
            _ => Capability::Unsupported,
        }
    }

    fn elements(&self) -> Capability<Vec<Value>> {
        match self {
            Value::Array(items) => Capability::Supported(items.clone()),
            Value::Object(map) => Capability::Supported(map.values().cloned().collect()),
            _ => Capability::Unsupported,
        }
    }

    fn to_value(&self) -> Value {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::SIZE;
    use serde_json::json;

    /// Container exposing none of the probed capabilities.
    struct Opaque;

    impl Access for Opaque {
        fn to_value(&self) -> Value {
            Value::Null
        }
    }

    /// Container exposing only the boolean-flag accessor.
    struct Flagged;

    impl Access for Flagged {
        fn flag_key(&self, key: &Key) -> Capability<bool> {
            Capability::Supported(matches!(key, Key::Name(n) if n == "armed"))
        }

        fn to_value(&self) -> Value {
            Value::Null
        }
    }

    #[test]
    fn test_probe_absence_of_all_capabilities_is_false() {
        assert!(!key_exists(&Opaque, &Key::Name("x".into())));
        assert!(!path_exists(&Opaque, &[Key::Name("x".into())]));
    }

    #[test]
    fn test_probe_falls_through_to_flag_accessor() {
        assert!(key_exists(&Flagged, &Key::Name("armed".into())));
        assert!(!key_exists(&Flagged, &Key::Name("other".into())));
    }

    #[test]
    fn test_json_object_and_array_lookup() {
        let v = json!({"a": {"b": [10, 20]}});
        let keys = [Key::Name("a".into()), Key::Name("b".into()), Key::Index(1)];
        assert!(path_exists(&v, &keys));
        assert_eq!(resolve_value(&v, &keys), Some(json!(20)));
        assert!(!path_exists(&v, &[Key::Name("z".into())]));
        assert_eq!(resolve_value(&v, &[Key::Name("z".into())]), None);
    }

    #[test]
    fn test_property_key_resolution() {
        let v = json!({"tags": ["x", "y"]});
        let keys = [Key::Name("tags".into()), Key::Prop(&SIZE)];
        assert!(path_exists(&v, &keys));
        assert_eq!(resolve_value(&v, &keys), Some(json!(2)));
    }

    #[test]
    fn test_pseudo_key_existence_over_elements() {
        let v = json!({"items": [{"id": 1}, {"name": "n"}]});
        let keys = [
            Key::Name("items".into()),
            Key::AnyElement,
            Key::Name("name".into()),
        ];
        assert!(path_exists(&v, &keys));
    }
}
