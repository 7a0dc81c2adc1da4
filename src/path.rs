//! Member Paths - Ordered Key Sequences
//!
//! A [`Path`] addresses one location inside structured data as a non-empty,
//! ordered key sequence from the validation root. Paths are built at
//! composition time and reused across many validation calls; they carry no
//! mutable state. The ANY/ALL pseudo-keys mark the position where element
//! aggregation descends into a container.

use crate::error::EngineError;
use crate::property::Property;

/// One path segment.
#[derive(Debug, Clone, PartialEq)]
pub enum Key {
    /// Named member of an object or map.
    Name(String),
    /// Literal element index.
    Index(usize),
    /// Named property facet of the addressed value.
    Prop(&'static Property),
    /// Pseudo-key pushed while ANY iterates container elements.
    AnyElement,
    /// Pseudo-key pushed while ALL iterates container elements.
    EachElement,
}

impl Key {
    /// Key comparison for path matching. The aggregation pseudo-keys match
    /// any concrete key at their position.
    pub fn matches(&self, other: &Key) -> bool {
        match (self, other) {
            (Key::AnyElement | Key::EachElement, _) => true,
            (_, Key::AnyElement | Key::EachElement) => true,
            _ => self == other,
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

impl From<&'static Property> for Key {
    fn from(property: &'static Property) -> Self {
        Key::Prop(property)
    }
}

/// Ordered, non-empty key sequence from a validation root to a target
/// location. Insertion order is traversal order.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    keys: Vec<Key>,
}

impl Path {
    /// Build a path from keys, rejecting the empty sequence.
    pub fn new(keys: Vec<Key>) -> Result<Self, EngineError> {
        if keys.is_empty() {
            return Err(EngineError::EmptyPath);
        }
        Ok(Self { keys })
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Paths are never empty; kept for clippy symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// New path with `key` appended one level deeper.
    pub fn child(&self, key: impl Into<Key>) -> Path {
        let mut keys = self.keys.clone();
        keys.push(key.into());
        Path { keys }
    }

    /// New path continuing into `other`.
    pub fn join(&self, other: &Path) -> Path {
        let mut keys = self.keys.clone();
        keys.extend(other.keys.iter().cloned());
        Path { keys }
    }

    /// Whether this path begins with `prefix`, honoring pseudo-key matching.
    pub fn starts_with(&self, prefix: &Path) -> bool {
        prefix.keys.len() <= self.keys.len()
            && prefix
                .keys
                .iter()
                .zip(&self.keys)
                .all(|(p, k)| p.matches(k))
    }
}

/// Address a single top-level member: `member("age")`.
pub fn member(key: impl Into<Key>) -> Path {
    Path {
        keys: vec![key.into()],
    }
}

/// Address a nested member: `member_path(["a", "b"])`.
pub fn member_path<I, K>(keys: I) -> Result<Path, EngineError>
where
    I: IntoIterator<Item = K>,
    K: Into<Key>,
{
    Path::new(keys.into_iter().map(Into::into).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::SIZE;

    #[test]
    fn test_empty_path_rejected() {
        assert_eq!(Path::new(vec![]), Err(EngineError::EmptyPath));
    }

    #[test]
    fn test_member_builders() {
        let p = member("age");
        assert_eq!(p.keys(), &[Key::Name("age".into())]);

        let nested = member_path(["a", "b"]).unwrap();
        assert_eq!(nested.len(), 2);

        let deeper = nested.child(0).child(&SIZE);
        assert_eq!(deeper.len(), 4);
        assert!(matches!(deeper.keys()[2], Key::Index(0)));
    }

    #[test]
    fn test_starts_with_honors_pseudo_keys() {
        let concrete = member("tags").child(2usize);
        let wild = member("tags").child(Key::AnyElement);
        assert!(concrete.starts_with(&wild));
        assert!(wild.starts_with(&concrete));
        assert!(!concrete.starts_with(&member("other")));
    }
}
