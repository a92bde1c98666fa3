//! Composition session state.
//!
//! The `ComposeSession` struct combines the per-field state the composer
//! tracks across events: the word buffer, the correction state, the
//! suggestion strip and the bookkeeping needed to revert the last commit.
//! It is reset when a text field gains focus.

use crate::candidate::CandidateList;
use crate::correction::CorrectionState;
use crate::word_buffer::WordBuffer;

/// Shift key state reported with each character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShiftState {
    #[default]
    Off,
    /// One-shot shift
    Shifted,
    /// Caps lock
    Locked,
}

impl ShiftState {
    pub fn is_active(self) -> bool {
        !matches!(self, ShiftState::Off)
    }

    pub fn is_caps_lock(self) -> bool {
        matches!(self, ShiftState::Locked)
    }
}

/// Text the composer committed for the last word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedWord {
    /// Committed text, after case adjustment
    pub text: String,
    /// Document offset where the committed text starts
    pub start: usize,
}

impl CommittedWord {
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Document offset right after the committed text.
    pub fn end(&self) -> usize {
        self.start + self.len()
    }
}

/// Session state combining all per-field components.
#[derive(Debug, Clone, Default)]
pub struct ComposeSession {
    pub(crate) word: WordBuffer,
    pub(crate) correction: CorrectionState,
    pub(crate) candidates: CandidateList,

    /// A word is being composed and mirrored in the composing region
    pub(crate) composing: bool,
    /// Document offset where the composing word starts
    pub(crate) composing_start: usize,

    pub(crate) committed: Option<CommittedWord>,
    pub(crate) just_added_auto_space: bool,
    /// Word the last accept added to the learner, forgotten on revert
    pub(crate) just_auto_added_word: Option<String>,
    /// Text inserted by `on_text`, removed whole by an immediate backspace
    pub(crate) pending_text_deletion: Option<String>,

    pub(crate) shift: ShiftState,
    pub(crate) prediction_on: bool,
    pub(crate) auto_space_allowed: bool,
    /// Restart-on-cursor-move is allowed in this field
    pub(crate) restart_allowed: bool,
}

impl ComposeSession {
    /// Create a new empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the word buffer.
    pub fn word(&self) -> &WordBuffer {
        &self.word
    }

    /// Get the correction state.
    pub fn correction(&self) -> &CorrectionState {
        &self.correction
    }

    /// Get the suggestion strip contents.
    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }

    pub fn composing_start(&self) -> usize {
        self.composing_start
    }

    /// The last committed word, while it can still be reverted.
    pub fn committed(&self) -> Option<&CommittedWord> {
        self.committed.as_ref()
    }

    pub fn just_added_auto_space(&self) -> bool {
        self.just_added_auto_space
    }

    pub fn just_auto_added_word(&self) -> Option<&str> {
        self.just_auto_added_word.as_deref()
    }

    pub fn shift(&self) -> ShiftState {
        self.shift
    }

    pub fn is_prediction_on(&self) -> bool {
        self.prediction_on
    }

    pub fn auto_space_allowed(&self) -> bool {
        self.auto_space_allowed
    }

    pub fn restart_allowed(&self) -> bool {
        self.restart_allowed
    }

    /// Clear all per-field state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
