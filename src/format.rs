//! Report Formatting - Member Names and Operand Rendering
//!
//! Member-name resolution consults a pluggable formatter first; keys it
//! declines fall back to the process-wide default string table. Nested paths
//! read inside-out, joined by the localized " of " token. Operand rendering
//! dispatches on shape: strings pass through as-is, booleans go through the
//! localized true/false tokens, everything else through the generic value
//! formatter.

use serde_json::Value;

use crate::operators::Operator;
use crate::path::Key;
use crate::property::Property;
use crate::strings::{
    Grammar, Phrase, PhraseTranslator, STRING_ANY_ELEMENT, STRING_EACH_ELEMENT,
    STRING_ELEMENT_PREFIX, STRING_FALSE, STRING_MEMBER_CONJUNCTION, STRING_TRUE,
};

/// Pluggable member-name formatter. Return `Some` to special-case a key,
/// `None` to fall back to the default string table.
pub trait MemberNames {
    fn member_name(&self, key: &Key) -> Option<String>;
}

/// Formatter that forwards every key to the defaults as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct BypassMemberNames;

impl MemberNames for BypassMemberNames {
    fn member_name(&self, _key: &Key) -> Option<String> {
        None
    }
}

pub static BYPASS_MEMBER_NAMES: BypassMemberNames = BypassMemberNames;

/// Default display string for a key, used when the member-name formatter
/// yields nothing. Index keys render through the localized element prefix.
fn default_key_phrase(translator: &PhraseTranslator, key: &Key, context: &[Grammar]) -> Phrase {
    match key {
        Key::Name(name) => translator.translate(name, context),
        Key::Index(index) => {
            let prefix = translator.translate(STRING_ELEMENT_PREFIX, context);
            Phrase {
                text: format!("{}{}", prefix.text, index),
                emits: prefix.emits,
            }
        }
        Key::Prop(property) => property_phrase(translator, property, context),
        Key::AnyElement => translator.translate(STRING_ANY_ELEMENT, context),
        Key::EachElement => translator.translate(STRING_EACH_ELEMENT, context),
    }
}

fn property_phrase(
    translator: &PhraseTranslator,
    property: &'static Property,
    context: &[Grammar],
) -> Phrase {
    let mut phrase = translator.translate(property.name(), context);
    if phrase.emits.is_empty() {
        if let Some(category) = property.emits() {
            phrase.emits.push(category);
        }
    }
    phrase
}

fn key_phrase(
    translator: &PhraseTranslator,
    names: &dyn MemberNames,
    key: &Key,
    context: &[Grammar],
) -> Phrase {
    match names.member_name(key) {
        Some(name) => translator.translate(&name, context),
        None => default_key_phrase(translator, key, context),
    }
}

/// Compose the member phrase for a path, innermost key first: path
/// `a.b.c` reads "c of b of a". A non-identity property is prepended as the
/// head noun: "size of tags". The returned phrase emits the head noun's
/// grammatical categories, so the verb phrase that follows can agree with
/// its subject.
pub(crate) fn member_phrase(
    translator: &PhraseTranslator,
    names: &dyn MemberNames,
    path: &[Key],
    property: &'static Property,
) -> Option<Phrase> {
    let mut words: Vec<String> = Vec::new();
    let mut context: Vec<Grammar> = Vec::new();
    let mut head_emits: Option<Vec<Grammar>> = None;

    if !property.is_identity() {
        let phrase = property_phrase(translator, property, &context);
        context = phrase.emits.clone();
        head_emits = Some(phrase.emits.clone());
        words.push(phrase.text);
    }

    for key in path.iter().rev() {
        let phrase = key_phrase(translator, names, key, &context);
        context = phrase.emits.clone();
        if head_emits.is_none() {
            head_emits = Some(phrase.emits.clone());
        }
        words.push(phrase.text);
    }

    if words.is_empty() {
        return None;
    }

    let conjunction = translator.translate(STRING_MEMBER_CONJUNCTION, &[]).text;
    Some(Phrase {
        text: words.join(&conjunction),
        emits: head_emits.unwrap_or_default(),
    })
}

/// Render an operand by shape.
pub(crate) fn format_operand(
    translator: &PhraseTranslator,
    operand: &Value,
    context: &[Grammar],
) -> String {
    match operand {
        Value::String(s) => s.clone(),
        Value::Bool(true) => translator.translate(STRING_TRUE, context).text,
        Value::Bool(false) => translator.translate(STRING_FALSE, context).text,
        other => other.to_string(),
    }
}

/// Assemble the full sentence for one failed leaf check.
pub(crate) fn leaf_phrase(
    translator: &PhraseTranslator,
    names: &dyn MemberNames,
    path: &[Key],
    property: &'static Property,
    op: &Operator,
) -> String {
    let member = member_phrase(translator, names, path, property);
    let member_emits = member.as_ref().map(|p| p.emits.clone()).unwrap_or_default();

    let op_phrase = translator.translate(op.phrase_key(), &member_emits);

    let mut words: Vec<String> = Vec::new();
    if let Some(member) = member {
        words.push(member.text);
    }
    let operand_context = op_phrase.emits.clone();
    words.push(op_phrase.text);
    if let Some(operand) = op.operand() {
        words.push(format_operand(translator, operand, &operand_context));
    }
    words.join(" ")
}
