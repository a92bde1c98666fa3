//! Suggestion strip contents.
//!
//! `CandidateList` holds what the host shows above the keyboard: the typed
//! word at index 0 followed by the oracle's ranked suggestions, plus the two
//! flags the composer derived when it resolved the preferred word.

use serde::{Deserialize, Serialize};

/// Suggestions currently offered for the composing word.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateList {
    candidates: Vec<String>,
    typed_word_valid: bool,
    correction_available: bool,
}

impl CandidateList {
    /// Create a new empty candidate list.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_suggestions(
        candidates: Vec<String>,
        typed_word_valid: bool,
        correction_available: bool,
    ) -> Self {
        Self {
            candidates,
            typed_word_valid,
            correction_available,
        }
    }

    /// All candidates, typed word first.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.candidates.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Whether the typed word is itself a known word.
    pub fn typed_word_valid(&self) -> bool {
        self.typed_word_valid
    }

    /// Whether a separator may replace the typed word with the top suggestion.
    pub fn correction_available(&self) -> bool {
        self.correction_available
    }

    /// Word a separator would commit: the top correction when one is
    /// available and the typed word is unknown, otherwise the typed word.
    pub fn preferred(&self) -> Option<&str> {
        if self.correction_available && !self.typed_word_valid && self.candidates.len() > 1 {
            self.get(1)
        } else {
            self.get(0)
        }
    }

    /// Update the typed word at index 0 without re-ranking.
    pub fn replace_typed_word(&mut self, typed: &str) {
        match self.candidates.first_mut() {
            Some(first) => *first = typed.to_string(),
            None => self.candidates.push(typed.to_string()),
        }
    }

    pub fn clear(&mut self) {
        self.candidates.clear();
        self.typed_word_valid = false;
        self.correction_available = false;
    }
}
