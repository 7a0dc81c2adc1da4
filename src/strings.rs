//! Phrase Translation - Localizable, Grammar-Aware Strings
//!
//! Canonical phrase keys are the built-in English phrases themselves; a
//! translator maps a key to one or more localized variants, each tagged with
//! the grammatical categories it requires from the preceding phrase and the
//! categories it emits for the phrase that follows. The category state is
//! threaded left-to-right through sentence assembly, not stored globally.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

// Special tokens consulted by the reporting pipeline. Keys double as the
// built-in English fallback text.
pub const STRING_TRUE: &str = "true";
pub const STRING_FALSE: &str = "false";
pub const STRING_MEMBER_CONJUNCTION: &str = " of ";
pub const STRING_AND_CONJUNCTION: &str = " AND ";
pub const STRING_OR_CONJUNCTION: &str = " OR ";
pub const STRING_NOT_OPEN: &str = "NOT ";
pub const STRING_ANY_ELEMENT: &str = "at least one element";
pub const STRING_EACH_ELEMENT: &str = "each element";
pub const STRING_ELEMENT_PREFIX: &str = "element #";
pub const STRING_EXISTS: &str = "must exist";
pub const STRING_NOT_EXISTS: &str = "must not exist";
pub const STRING_EMPTY: &str = "must be empty";
pub const STRING_NOT_EMPTY: &str = "must be not empty";

/// Grammatical category a phrase may require from or emit to its neighbors.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Grammar {
    Plural,
    Masculine,
    Feminine,
    Neuter,
}

/// A resolved phrase: localized text plus the categories it emits for the
/// next phrase in the sentence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Phrase {
    pub text: String,
    pub emits: Vec<Grammar>,
}

impl Phrase {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emits: Vec::new(),
        }
    }
}

/// One localized rendering of a phrase key.
#[derive(Debug, Clone, PartialEq)]
pub struct PhraseVariant {
    text: String,
    requires: Vec<Grammar>,
    emits: Vec<Grammar>,
}

impl PhraseVariant {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            requires: Vec::new(),
            emits: Vec::new(),
        }
    }

    /// Select this variant only when the preceding phrase emitted `category`.
    pub fn requiring(mut self, category: Grammar) -> Self {
        self.requires.push(category);
        self
    }

    /// Propagate `category` to the phrase that follows.
    pub fn emitting(mut self, category: Grammar) -> Self {
        self.emits.push(category);
        self
    }
}

/// Mapping from canonical phrase key to localized variants.
///
/// Immutable after construction; an absent entry falls back to the built-in
/// English phrase (the key itself).
#[derive(Debug, Clone, Default)]
pub struct PhraseTranslator {
    phrases: HashMap<String, Vec<PhraseVariant>>,
}

impl PhraseTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a translator from a prepared phrase map, locale-file style.
    pub fn with_phrases(phrases: HashMap<String, Vec<PhraseVariant>>) -> Self {
        Self { phrases }
    }

    /// Register variants for a phrase key.
    pub fn insert(&mut self, key: impl Into<String>, variants: Vec<PhraseVariant>) {
        self.phrases.insert(key.into(), variants);
    }

    /// Register a single untagged variant.
    pub fn insert_simple(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.phrases.insert(key.into(), vec![PhraseVariant::new(text)]);
    }

    /// Resolve `key` in the grammatical `context` emitted by the previous
    /// phrase. Picks the variant whose requirements are all present in the
    /// context, preferring the most specific one; falls back to the first
    /// variant, then to the key itself.
    pub fn translate(&self, key: &str, context: &[Grammar]) -> Phrase {
        let Some(variants) = self.phrases.get(key) else {
            return Phrase::new(key);
        };

        let best = variants
            .iter()
            .filter(|v| v.requires.iter().all(|g| context.contains(g)))
            .max_by_key(|v| v.requires.len())
            .or_else(|| variants.first());

        match best {
            Some(v) => Phrase {
                text: v.text.clone(),
                emits: v.emits.clone(),
            },
            None => Phrase::new(key),
        }
    }
}

/// Process-wide default translator: empty table, so every phrase resolves to
/// its built-in English form. Initialized exactly once, read-only afterwards.
pub fn default_translator() -> &'static PhraseTranslator {
    static DEFAULT: OnceLock<PhraseTranslator> = OnceLock::new();
    DEFAULT.get_or_init(PhraseTranslator::new)
}
