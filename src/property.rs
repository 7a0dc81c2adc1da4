//! Properties - Named Accessor Capabilities
//!
//! A property is a `{ get, has }` capability pair identifying a named facet
//! of a value. Properties are resolved once at composition time and shared
//! by reference across all checks that use them. The built-in identity
//! property [`VALUE`] denotes "the value itself".

use serde_json::Value;

use crate::strings::Grammar;

/// Named accessor over a dynamic value.
///
/// `get` extracts the facet, `has` reports whether the value's shape
/// supports the facet at all. Stateless and immutable.
#[derive(Debug)]
pub struct Property {
    name: &'static str,
    get: fn(&Value) -> Option<Value>,
    has: fn(&Value) -> bool,
    emits: Option<Grammar>,
}

impl Property {
    /// Define a custom property. `emits` tags the grammatical category the
    /// property name carries into report sentences (e.g. a plural-valued
    /// name making the following verb phrase select its plural form).
    pub const fn new(
        name: &'static str,
        get: fn(&Value) -> Option<Value>,
        has: fn(&Value) -> bool,
        emits: Option<Grammar>,
    ) -> Self {
        Self {
            name,
            get,
            has,
            emits,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self, value: &Value) -> Option<Value> {
        (self.get)(value)
    }

    pub fn has(&self, value: &Value) -> bool {
        (self.has)(value)
    }

    pub fn emits(&self) -> Option<Grammar> {
        self.emits
    }

    /// Whether this is the identity property, which reports omit from the
    /// member phrase.
    pub fn is_identity(&self) -> bool {
        std::ptr::eq(self, &VALUE)
    }
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || self.name == other.name
    }
}

/// Identity property: the value itself.
pub static VALUE: Property = Property::new("value", |v| Some(v.clone()), |_| true, None);

/// Element or entry count of containers, character count of strings.
pub static SIZE: Property = Property::new("size", get_size, has_size, None);

/// Character count of strings, element count of arrays.
pub static LENGTH: Property = Property::new("length", get_size, has_size, None);

/// Whether a container or string is empty.
pub static EMPTY: Property = Property::new("empty", get_empty, has_size, None);

fn get_size(v: &Value) -> Option<Value> {
    match v {
        Value::Array(a) => Some(Value::from(a.len() as u64)),
        Value::Object(m) => Some(Value::from(m.len() as u64)),
        Value::String(s) => Some(Value::from(s.chars().count() as u64)),
        _ => None,
    }
}

fn has_size(v: &Value) -> bool {
    matches!(v, Value::Array(_) | Value::Object(_) | Value::String(_))
}

fn get_empty(v: &Value) -> Option<Value> {
    match v {
        Value::Array(a) => Some(Value::Bool(a.is_empty())),
        Value::Object(m) => Some(Value::Bool(m.is_empty())),
        Value::String(s) => Some(Value::Bool(s.is_empty())),
        _ => None,
    }
}
