//! Collaborator traits the composer consults while a word is typed.
//!
//! - `SuggestionOracle`: ranked suggestions, validity and correction mode.
//! - `DictionaryLearner`: learns words the user keeps typing or picking.
//!
//! Both are optional: a composer without an oracle runs with suggestions
//! disabled, and one without a learner never learns.

use crate::word_buffer::WordBuffer;
use serde::{Deserialize, Serialize};

/// Which kinds of correction the oracle is allowed to offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CorrectionMode {
    /// Small fixes such as capitalization or a single mistyped key
    pub quick_fixes: bool,
    /// Full ranked suggestions (completions and corrections)
    pub full_suggestions: bool,
}

impl CorrectionMode {
    pub fn new(quick_fixes: bool, full_suggestions: bool) -> Self {
        Self {
            quick_fixes,
            full_suggestions,
        }
    }

    /// Learning only makes sense while some kind of correction is active.
    pub fn allows_learning(&self) -> bool {
        self.quick_fixes || self.full_suggestions
    }
}

/// Source of suggestions for the word being composed.
pub trait SuggestionOracle {
    /// Ranked suggestions for a snapshot of the word buffer.
    ///
    /// Index 0 is always the word exactly as typed, followed by corrections
    /// and completions in rank order. Calling this twice with an unchanged
    /// buffer must return the same list.
    fn suggestions(&mut self, word: &WordBuffer) -> Vec<String>;

    /// Whether the last `suggestions` call produced a correction strong
    /// enough to replace the typed word on a separator.
    fn has_minimal_correction(&self) -> bool;

    /// Whether `word` is known to any of the oracle's dictionaries.
    fn is_valid_word(&self, word: &str) -> bool;

    fn set_correction_mode(&mut self, mode: CorrectionMode);

    fn correction_mode(&self) -> CorrectionMode;
}

/// How a word reached the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdditionKind {
    /// Committed verbatim, either by a separator or an explicit commit
    Typed,
    /// Picked from the suggestion strip
    Picked,
}

/// Dictionary that learns from what the user commits.
pub trait DictionaryLearner {
    /// Record one use of `word`. Returns true when this call added the word
    /// to the learned vocabulary.
    fn add_word(&self, word: &str, kind: AdditionKind) -> bool;

    /// Forget `word` entirely.
    fn remove_word(&self, word: &str);

    fn is_valid_word(&self, word: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn learning_requires_some_correction() {
        assert!(!CorrectionMode::new(false, false).allows_learning());
        assert!(CorrectionMode::new(true, false).allows_learning());
        assert!(CorrectionMode::new(false, true).allows_learning());
    }
}
