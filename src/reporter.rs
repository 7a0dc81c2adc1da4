//! Reporter - Call-Scoped Failure Explanation
//!
//! A reporter accumulates the report for exactly one validation call: a
//! stack of open aggregation frames plus the final output parts. Frames are
//! strictly nested; every `aggregate_open` is balanced by one
//! `aggregate_close` at the same depth, on the failing path too. A frame's
//! parts surface only when the frame itself closes with a failure, so a
//! sibling that never ran (short-circuit) or an aggregation that ultimately
//! succeeded leaves no trace in the output.

use crate::format::{leaf_phrase, MemberNames};
use crate::operators::Operator;
use crate::path::Key;
use crate::property::Property;
use crate::status::Status;
use crate::strings::{
    PhraseTranslator, STRING_AND_CONJUNCTION, STRING_ANY_ELEMENT, STRING_EACH_ELEMENT,
    STRING_NOT_OPEN, STRING_OR_CONJUNCTION,
};

/// Open/close/conjunction tokens of one aggregation operator, plus the
/// policies that govern how its frame renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    pub open: &'static str,
    pub close: &'static str,
    pub conjunction: &'static str,
    pub description: &'static str,
    /// NOT/ANY/ALL always show their wrapping tokens; AND/OR only when the
    /// frame holds more than one part and is not the outermost frame.
    pub always_wrap: bool,
    /// Inside this frame, success is the reportable outcome (NOT).
    pub inverts: bool,
    /// Keep only the first failing part (ANY summarizes one element).
    pub single_part: bool,
}

impl Presentation {
    pub const AND: Presentation = Presentation {
        open: "(",
        close: ")",
        conjunction: STRING_AND_CONJUNCTION,
        description: "",
        always_wrap: false,
        inverts: false,
        single_part: false,
    };

    pub const OR: Presentation = Presentation {
        open: "(",
        close: ")",
        conjunction: STRING_OR_CONJUNCTION,
        description: "",
        always_wrap: false,
        inverts: false,
        single_part: false,
    };

    pub const NOT: Presentation = Presentation {
        open: STRING_NOT_OPEN,
        close: "",
        conjunction: "",
        description: "NOT",
        always_wrap: true,
        inverts: true,
        single_part: false,
    };

    pub const ANY: Presentation = Presentation {
        open: "",
        close: "",
        conjunction: "",
        description: STRING_ANY_ELEMENT,
        always_wrap: true,
        inverts: false,
        single_part: true,
    };

    pub const ALL: Presentation = Presentation {
        open: "",
        close: "",
        conjunction: "",
        description: STRING_EACH_ELEMENT,
        always_wrap: true,
        inverts: false,
        single_part: false,
    };
}

#[derive(Debug)]
struct Frame {
    presentation: Presentation,
    parts: Vec<String>,
}

/// Mutable, call-scoped report accumulator. Created fresh per reporting
/// validation call and consumed by [`Reporter::finish`].
pub struct Reporter<'t> {
    translator: &'t PhraseTranslator,
    names: &'t dyn MemberNames,
    stack: Vec<Frame>,
    parts: Vec<String>,
    invert_depth: usize,
}

impl<'t> Reporter<'t> {
    pub fn new(translator: &'t PhraseTranslator, names: &'t dyn MemberNames) -> Self {
        Self {
            translator,
            names,
            stack: Vec::new(),
            parts: Vec::new(),
            invert_depth: 0,
        }
    }

    /// Fresh reporter sharing this one's translator and name formatter but
    /// none of its accumulated state; used when an adapter is derived.
    pub fn fresh(&self) -> Reporter<'t> {
        Reporter::new(self.translator, self.names)
    }

    /// Push an aggregation frame.
    pub fn aggregate_open(&mut self, presentation: Presentation) {
        if presentation.inverts {
            self.invert_depth += 1;
        }
        self.stack.push(Frame {
            presentation,
            parts: Vec::new(),
        });
    }

    /// Pop the matching frame. The composed text surfaces into the parent
    /// frame only when the aggregation itself failed; otherwise the parts
    /// are discarded.
    pub fn aggregate_close(&mut self, status: Status) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        if frame.presentation.inverts {
            self.invert_depth = self.invert_depth.saturating_sub(1);
        }
        // Under an odd number of enclosing NOT frames the reportable
        // aggregate outcome is success, mirroring the leaf rule.
        let inverted = self.invert_depth % 2 == 1;
        if status.is_fail() == inverted || frame.parts.is_empty() {
            return;
        }

        let conjunction = self
            .translator
            .translate(frame.presentation.conjunction, &[])
            .text;
        let joined = frame.parts.join(&conjunction);

        let outermost = self.stack.is_empty() && self.parts.is_empty();
        let wrap = frame.presentation.always_wrap || (frame.parts.len() > 1 && !outermost);
        let text = if wrap {
            let open = self.translator.translate(frame.presentation.open, &[]).text;
            let close = self
                .translator
                .translate(frame.presentation.close, &[])
                .text;
            format!("{}{}{}", open, joined, close)
        } else {
            joined
        };
        self.push_part(text);
    }

    /// Record the outcome of one leaf check. The phrase is appended when the
    /// outcome is reportable in the current context: a failure normally, a
    /// success underneath an odd number of NOT frames. `Ignore` never
    /// reports.
    pub fn leaf_report(
        &mut self,
        path: &[Key],
        property: &'static Property,
        op: &Operator,
        status: Status,
    ) {
        if status.is_ignore() {
            return;
        }
        let inverted = self.invert_depth % 2 == 1;
        if status.is_fail() == inverted {
            return;
        }
        let sentence = leaf_phrase(self.translator, self.names, path, property, op);
        self.push_part(sentence);
    }

    fn push_part(&mut self, text: String) {
        match self.stack.last_mut() {
            Some(frame) => {
                if frame.presentation.single_part && !frame.parts.is_empty() {
                    return;
                }
                frame.parts.push(text);
            }
            None => self.parts.push(text),
        }
    }

    /// Whether anything has been reported so far.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty() && self.stack.iter().all(|f| f.parts.is_empty())
    }

    /// Consume the reporter and assemble the final sentence.
    pub fn finish(self) -> String {
        let conjunction = self.translator.translate(STRING_AND_CONJUNCTION, &[]).text;
        self.parts.join(&conjunction)
    }
}
