//! Correction state machine.
//!
//! Tracks what happened to the most recent word so that the composer knows
//! whether a backspace should undo an automatic correction, whether a
//! separator should be swapped with an auto-inserted space, and whether a
//! cursor move forfeits the pending undo.
//!
//! The transition function (`transition`) is pure; `CorrectionState` wraps it
//! with the recorded accept offset and the words involved in the last accept.

use tracing::trace;

/// Phase of the correction state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorrectionPhase {
    /// Nothing to undo
    #[default]
    Idle,
    /// A word is being typed
    Composing,
    /// A separator committed the preferred (possibly corrected) word
    AcceptedDefault,
    /// The user picked a word from the suggestion strip
    AcceptedSuggestion,
    /// A separator followed an accepted word
    PunctuationAfterAccepted,
    /// Backspace right after a default accept; the next step reverts the word
    UndoCommitPending,
}

impl CorrectionPhase {
    /// Phases in which the last committed word may still be reverted.
    pub fn is_revertible(self) -> bool {
        matches!(
            self,
            CorrectionPhase::AcceptedDefault
                | CorrectionPhase::AcceptedSuggestion
                | CorrectionPhase::UndoCommitPending
        )
    }
}

/// Inputs of the correction state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionEvent {
    NewSession,
    /// A character was typed; `separator` tells word characters from separators
    TypedCharacter { separator: bool },
    /// The typed word was committed verbatim
    AcceptedTyped,
    /// The preferred word was committed by a separator; `cursor` is the
    /// document offset right after the committed text, when known
    AcceptedDefault { cursor: Option<usize> },
    AcceptedSuggestion,
    /// Backspace pressed with the document cursor at `cursor`
    Backspace { cursor: usize },
    /// The last committed word was replaced by the typed word again
    Reverted,
    /// Correction aborted (cursor moved away, selection, session restart)
    Reset,
    EndSession,
}

/// Pure transition function.
///
/// `accept_offset` is the cursor offset recorded by the last default accept.
/// Returns the next phase and the offset to keep.
pub fn transition(
    phase: CorrectionPhase,
    accept_offset: Option<usize>,
    event: CorrectionEvent,
) -> (CorrectionPhase, Option<usize>) {
    use CorrectionPhase::*;

    match event {
        CorrectionEvent::NewSession | CorrectionEvent::Reset | CorrectionEvent::EndSession => {
            (Idle, None)
        }
        CorrectionEvent::TypedCharacter { separator: false } => (Composing, accept_offset),
        CorrectionEvent::TypedCharacter { separator: true } => match phase {
            AcceptedDefault | AcceptedSuggestion => (PunctuationAfterAccepted, accept_offset),
            _ => (Idle, accept_offset),
        },
        CorrectionEvent::AcceptedTyped => (Idle, None),
        CorrectionEvent::AcceptedDefault { cursor } => (AcceptedDefault, cursor),
        CorrectionEvent::AcceptedSuggestion => (AcceptedSuggestion, None),
        CorrectionEvent::Backspace { cursor } => match phase {
            AcceptedDefault => match accept_offset {
                Some(offset) if offset != cursor => (Idle, None),
                _ => (UndoCommitPending, accept_offset),
            },
            UndoCommitPending => (Composing, None),
            other => (other, accept_offset),
        },
        CorrectionEvent::Reverted => (Composing, None),
    }
}

/// Correction state of one input session.
#[derive(Debug, Clone, Default)]
pub struct CorrectionState {
    phase: CorrectionPhase,
    accept_offset: Option<usize>,
}

impl CorrectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> CorrectionPhase {
        self.phase
    }

    /// Cursor offset recorded by the last default accept.
    pub fn accept_offset(&self) -> Option<usize> {
        self.accept_offset
    }

    /// Record the accept offset once it becomes known.
    pub fn set_accept_offset(&mut self, offset: usize) {
        if self.phase == CorrectionPhase::AcceptedDefault {
            self.accept_offset = Some(offset);
        }
    }

    /// True while the last committed word is being corrected.
    pub fn is_correcting(&self) -> bool {
        !matches!(self.phase, CorrectionPhase::Idle | CorrectionPhase::Composing)
    }

    /// Feed an event through the state machine.
    pub fn apply(&mut self, event: CorrectionEvent) -> CorrectionPhase {
        let (next, offset) = transition(self.phase, self.accept_offset, event);
        if next != self.phase {
            trace!(from = ?self.phase, to = ?next, ?event, "correction transition");
        }
        self.phase = next;
        self.accept_offset = offset;
        next
    }

    pub fn new_session(&mut self) {
        self.apply(CorrectionEvent::NewSession);
    }

    pub fn end_session(&mut self) {
        self.apply(CorrectionEvent::EndSession);
    }

    pub fn reset(&mut self) {
        self.apply(CorrectionEvent::Reset);
    }

    pub fn typed_character(&mut self, separator: bool) {
        self.apply(CorrectionEvent::TypedCharacter { separator });
    }

    pub fn accepted_typed(&mut self) {
        self.apply(CorrectionEvent::AcceptedTyped);
    }

    /// `cursor` is the offset right after the accepted word, when known.
    pub fn accepted_default(&mut self, cursor: Option<usize>) {
        self.apply(CorrectionEvent::AcceptedDefault { cursor });
    }

    pub fn accepted_suggestion(&mut self) {
        self.apply(CorrectionEvent::AcceptedSuggestion);
    }

    pub fn backspace(&mut self, cursor: usize) -> CorrectionPhase {
        self.apply(CorrectionEvent::Backspace { cursor })
    }

    pub fn reverted(&mut self) {
        self.apply(CorrectionEvent::Reverted);
    }
}

#[cfg(test)]
mod tests {
    use super::CorrectionPhase::*;
    use super::*;

    #[test]
    fn typing_then_separator_after_default_accept() {
        let letter = CorrectionEvent::TypedCharacter { separator: false };
        let separator = CorrectionEvent::TypedCharacter { separator: true };
        let accept = CorrectionEvent::AcceptedDefault { cursor: Some(6) };

        let (phase, offset) = transition(Idle, None, letter);
        assert_eq!(phase, Composing);
        let (phase, offset) = transition(phase, offset, accept);
        assert_eq!((phase, offset), (AcceptedDefault, Some(6)));
        let (phase, _) = transition(phase, offset, separator);
        assert_eq!(phase, PunctuationAfterAccepted);
    }

    #[test]
    fn separator_after_picked_suggestion() {
        let separator = CorrectionEvent::TypedCharacter { separator: true };
        let (phase, _) = transition(AcceptedSuggestion, None, separator);
        assert_eq!(phase, PunctuationAfterAccepted);
    }

    #[test]
    fn separator_outside_accept_goes_idle() {
        for phase in [Idle, Composing, UndoCommitPending, PunctuationAfterAccepted] {
            let separator = CorrectionEvent::TypedCharacter { separator: true };
            let (next, _) = transition(phase, None, separator);
            assert_eq!(next, Idle, "from {:?}", phase);
        }
    }

    #[test]
    fn backspace_at_accept_offset_arms_undo() {
        let (phase, _) =
            transition(AcceptedDefault, Some(6), CorrectionEvent::Backspace { cursor: 6 });
        assert_eq!(phase, UndoCommitPending);
        let (phase, _) =
            transition(phase, Some(6), CorrectionEvent::Backspace { cursor: 5 });
        assert_eq!(phase, Composing);
    }

    #[test]
    fn backspace_elsewhere_forfeits_undo() {
        let (phase, offset) =
            transition(AcceptedDefault, Some(6), CorrectionEvent::Backspace { cursor: 2 });
        assert_eq!((phase, offset), (Idle, None));
    }

    #[test]
    fn backspace_leaves_other_phases_alone() {
        for phase in [Idle, Composing, AcceptedSuggestion, PunctuationAfterAccepted] {
            let (next, _) = transition(phase, None, CorrectionEvent::Backspace { cursor: 0 });
            assert_eq!(next, phase);
        }
    }

    #[test]
    fn reset_always_lands_in_idle() {
        for phase in [Composing, AcceptedDefault, UndoCommitPending] {
            assert_eq!(transition(phase, Some(3), CorrectionEvent::Reset), (Idle, None));
        }
    }

    #[test]
    fn late_accept_offset_is_recorded() {
        let mut state = CorrectionState::new();
        state.typed_character(false);
        assert!(!state.is_correcting());
        state.accepted_default(None);
        state.set_accept_offset(4);
        assert!(state.is_correcting());
        assert_eq!(state.accept_offset(), Some(4));
        state.reset();
        assert_eq!(state.phase(), Idle);
        assert_eq!(state.accept_offset(), None);
        state.set_accept_offset(9);
        assert_eq!(state.accept_offset(), None);
    }
}
