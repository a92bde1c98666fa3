//! Composition orchestrator.
//!
//! The `Composer` receives keystroke, selection and lifecycle events from the
//! host and turns them into document edits. It owns the session state (word
//! buffer, correction state, suggestion strip), consults the optional
//! suggestion oracle and dictionary learner, and applies the space and
//! punctuation rules after separators.
//!
//! Suggestion refreshes and restart-on-cursor-move are debounced. The host
//! pumps them with `run_due` (or `flush_pending` in tests) and can arm a
//! timer from `next_deadline`.

use crate::candidate::CandidateList;
use crate::context::EditorInfo;
use crate::correction::CorrectionPhase;
use crate::document::{BatchEdit, Document};
use crate::layout::KeyboardLayout;
use crate::oracle::{AdditionKind, DictionaryLearner, SuggestionOracle};
use crate::punctuation;
use crate::scheduler::Debouncer;
use crate::session::{CommittedWord, ComposeSession, ShiftState};
use crate::utils::capitalize_first;
use crate::Config;
use std::time::Instant;
use tracing::{debug, trace};

/// Longest word the restart and delete-word scans look at.
const MAX_WORD_SCAN: usize = 48;

/// Composition orchestrator for one text field at a time.
pub struct Composer<D: Document> {
    config: Config,
    layout: Box<dyn KeyboardLayout>,
    oracle: Option<Box<dyn SuggestionOracle>>,
    learner: Option<Box<dyn DictionaryLearner>>,
    document: Option<D>,
    session: ComposeSession,
    refresh: Debouncer,
    restart: Debouncer,
}

impl<D: Document> Composer<D> {
    /// Create a composer without oracle or learner.
    pub fn new(config: Config, layout: Box<dyn KeyboardLayout>) -> Self {
        let refresh = Debouncer::new(config.suggestion_delay());
        let restart = Debouncer::new(config.restart_delay());
        Self {
            config,
            layout,
            oracle: None,
            learner: None,
            document: None,
            session: ComposeSession::new(),
            refresh,
            restart,
        }
    }

    pub fn with_oracle(mut self, oracle: Box<dyn SuggestionOracle>) -> Self {
        self.set_oracle(Some(oracle));
        self
    }

    pub fn with_learner(mut self, learner: Box<dyn DictionaryLearner>) -> Self {
        self.set_learner(Some(learner));
        self
    }

    /// Replace the suggestion oracle. `None` disables suggestions.
    pub fn set_oracle(&mut self, oracle: Option<Box<dyn SuggestionOracle>>) {
        self.oracle = oracle.map(|mut oracle| {
            oracle.set_correction_mode(self.config.correction_mode());
            oracle
        });
        self.session.candidates.clear();
        self.session.word.set_preferred_word(None);
    }

    /// Replace the dictionary learner. `None` disables learning.
    pub fn set_learner(&mut self, learner: Option<Box<dyn DictionaryLearner>>) {
        self.learner = learner;
        self.session.just_auto_added_word = None;
    }

    pub fn set_layout(&mut self, layout: Box<dyn KeyboardLayout>) {
        self.layout = layout;
    }

    pub fn layout(&self) -> &dyn KeyboardLayout {
        self.layout.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Apply a new configuration; takes effect from the next event.
    pub fn set_config(&mut self, config: Config) {
        self.refresh.set_delay(config.suggestion_delay());
        self.restart.set_delay(config.restart_delay());
        if let Some(oracle) = self.oracle.as_mut() {
            oracle.set_correction_mode(config.correction_mode());
        }
        if !config.show_suggestions {
            self.session.prediction_on = false;
        }
        if !config.allow_suggestions_restart {
            self.session.restart_allowed = false;
        }
        self.config = config;
    }

    // ========== Read-only accessors ==========

    pub fn session(&self) -> &ComposeSession {
        &self.session
    }

    /// Current suggestion strip, typed word first.
    pub fn suggestions(&self) -> &CandidateList {
        &self.session.candidates
    }

    /// The word being composed, if any.
    pub fn composing_text(&self) -> Option<String> {
        self.session
            .composing
            .then(|| self.session.word.typed_word())
    }

    pub fn correction_phase(&self) -> CorrectionPhase {
        self.session.correction.phase()
    }

    pub fn is_composing(&self) -> bool {
        self.session.composing
    }

    pub fn is_prediction_on(&self) -> bool {
        self.session.prediction_on
    }

    pub fn document(&self) -> Option<&D> {
        self.document.as_ref()
    }

    /// Mutable access for hosts that edit the field themselves. Report the
    /// resulting cursor change through `on_cursor_moved`.
    pub fn document_mut(&mut self) -> Option<&mut D> {
        self.document.as_mut()
    }

    // ========== Lifecycle ==========

    /// Attach to a newly focused text field.
    pub fn on_session_start(&mut self, document: D, info: EditorInfo) {
        if self.document.is_some() {
            self.on_session_end();
        }
        self.cancel_pending();
        let shift = self.session.shift;
        self.session.clear();
        self.document = Some(document);
        self.session.prediction_on =
            self.config.show_suggestions && info.purpose.allows_prediction();
        self.session.auto_space_allowed = info.purpose.allows_auto_space();
        if info.restarting {
            // same field re-attached: keep shift, no restart until a fresh session
            self.session.shift = shift;
            self.session.correction.reset();
        } else {
            self.session.restart_allowed = self.config.allow_suggestions_restart;
            self.session.correction.new_session();
        }
        debug!(
            purpose = ?info.purpose,
            restarting = info.restarting,
            prediction = self.session.prediction_on,
            "session started"
        );
    }

    /// Commit whatever is being composed and detach from the field.
    pub fn on_session_end(&mut self) -> Option<D> {
        self.commit_typed();
        self.abort_correction();
        self.cancel_pending();
        self.session.correction.end_session();
        debug!("session ended");
        self.document.take()
    }

    // ========== Input events ==========

    /// Route a key to `on_separator` or `on_character` depending on the
    /// layout and whether a word is being composed.
    pub fn on_key(&mut self, code: char, shift: ShiftState, nearby: &[char]) {
        if self.layout.is_word_separator(code, self.session.composing) {
            self.on_separator(code);
        } else {
            self.on_character(code, shift, nearby);
        }
    }

    /// Key from a physical keyboard, reported by its US position.
    pub fn on_physical_key(&mut self, key: char, shift: ShiftState) {
        let code = self.layout.translate_physical_key(key);
        let nearby = self.layout.nearby_keys(code);
        self.on_key(code, shift, &nearby);
    }

    pub fn set_shift_state(&mut self, shift: ShiftState) {
        self.session.shift = shift;
    }

    /// A word character was typed.
    pub fn on_character(&mut self, code: char, shift: ShiftState, nearby: &[char]) {
        self.begin_input_event();
        self.session.shift = shift;
        if self.document.is_none() {
            return;
        }

        if !self.session.composing
            && self.session.prediction_on
            && self.layout.is_word_start_char(code)
            && !self.is_cursor_touching_word()
        {
            self.start_composing();
        }

        let ch = if shift.is_active() {
            code.to_uppercase().next().unwrap_or(code)
        } else {
            code
        };

        if self.session.composing {
            if shift.is_active() && self.session.word.cursor_position() == 0 {
                self.session.word.set_first_char_capitalized(true);
            }
            self.session.word.add(ch, nearby);
            self.render_composing();
            if ch.is_alphabetic() {
                self.schedule_refresh();
            } else {
                let typed = self.session.word.typed_word();
                self.session.candidates.replace_typed_word(&typed);
            }
        } else if let Some(doc) = self.document.as_mut() {
            doc.insert_or_commit_text(&ch.to_string());
        }

        self.session.correction.typed_character(false);
        self.session.just_added_auto_space = false;
    }

    /// A separator (space, punctuation, enter) was typed.
    pub fn on_separator(&mut self, code: char) {
        self.begin_input_event();
        if self.document.is_none() {
            return;
        }

        self.with_batch(|this| {
            let mut picked_default = false;
            if this.session.composing {
                let word = &this.session.word;
                let inside_word = word.cursor_position() < word.len();
                if inside_word {
                    debug!(%code, "separator inside word, aborting composition");
                    this.abort_correction();
                } else if this.config.auto_correct_enabled() && code != '\'' && code != '\n' {
                    picked_default = this.pick_default_suggestion();
                    if !picked_default {
                        this.commit_typed();
                    }
                    if code == ' ' {
                        this.session.just_added_auto_space = true;
                    }
                } else {
                    this.commit_typed();
                    this.abort_correction();
                }
            }

            if this.session.just_added_auto_space && code == '\n' {
                if let Some(doc) = this.document.as_mut() {
                    punctuation::remove_trailing_space(doc);
                }
                this.session.just_added_auto_space = false;
            }

            if let Some(doc) = this.document.as_mut() {
                doc.insert_or_commit_text(&code.to_string());
            }

            let after_accept =
                this.session.correction.phase() == CorrectionPhase::PunctuationAfterAccepted;
            if after_accept && code == '.' {
                if let Some(doc) = this.document.as_mut() {
                    punctuation::reswap_period_and_space(doc);
                }
            }

            this.session.correction.typed_character(true);

            let mut swapped = false;
            if this.session.correction.phase() == CorrectionPhase::PunctuationAfterAccepted
                && code != '\n'
                && this.config.swap_punctuation_and_space
            {
                if let Some(doc) = this.document.as_mut() {
                    swapped = punctuation::swap_punctuation_and_space(doc, this.layout.as_ref());
                }
            }
            let mut doubled = false;
            if !swapped
                && code == ' '
                && this.session.prediction_on
                && this.config.double_space_to_period
            {
                if let Some(doc) = this.document.as_mut() {
                    doubled = punctuation::double_space_to_period(doc);
                }
            }
            // both rules leave a space of their own before the cursor
            if swapped || doubled {
                this.session.just_added_auto_space = true;
            }

            if picked_default && this.session.word.preferred_word().is_some() {
                let cursor = this.cursor();
                this.session.correction.accepted_default(Some(cursor));
            }
        });
    }

    /// Backspace.
    pub fn on_backspace(&mut self) {
        self.restart.cancel();
        if self.document.is_none() {
            return;
        }

        if let Some(text) = self.session.pending_text_deletion.take() {
            let len = text.chars().count();
            if let Some(doc) = self.document.as_mut() {
                if doc.text_before_cursor(len) == text {
                    debug!(len, "deleting inserted text");
                    doc.delete_surrounding(len, 0);
                    return;
                }
            }
        }

        let mut delete_char = false;
        if self.session.composing {
            let word = &self.session.word;
            if !word.is_empty() && word.cursor_position() > 0 {
                self.session.word.delete_last();
                if self.session.word.is_empty() {
                    self.session.composing = false;
                    self.session.candidates.clear();
                    self.refresh.cancel();
                    if let Some(doc) = self.document.as_mut() {
                        doc.set_composing_region("");
                    }
                } else {
                    self.render_composing();
                    self.schedule_refresh();
                }
            } else {
                self.abort_correction();
                delete_char = true;
            }
        } else {
            delete_char = true;
        }

        let cursor = self.cursor();
        let phase = self.session.correction.backspace(cursor);
        if phase == CorrectionPhase::UndoCommitPending {
            if self.revert_last_word() {
                return;
            }
            self.session.correction.reset();
        }
        if delete_char {
            if let Some(doc) = self.document.as_mut() {
                doc.delete_surrounding(1, 0);
            }
        }
    }

    /// Replace the last committed word with what was typed.
    pub fn on_revert_last_word(&mut self) -> bool {
        self.begin_input_event();
        self.revert_last_word()
    }

    /// The user picked `suggestion` at `index` of the strip.
    pub fn on_pick_suggestion(&mut self, index: usize, suggestion: &str) {
        self.begin_input_event();
        if self.document.is_none() {
            return;
        }

        let correcting = self.session.correction.is_correcting();
        let typed = self.session.word.typed_word();
        self.with_batch(|this| {
            let committed = this.pick_suggestion(suggestion);
            debug!(%typed, %committed, index, "picked suggestion");
            this.session.correction.accepted_suggestion();

            if this.config.auto_space_after_pick && this.session.auto_space_allowed && !correcting
            {
                if let Some(doc) = this.document.as_mut() {
                    doc.insert_or_commit_text(" ");
                }
                this.session.just_added_auto_space = true;
            }

            this.session.just_auto_added_word = None;
            if index == 0 && this.add_to_dictionaries(&typed, AdditionKind::Picked) {
                this.session.just_auto_added_word = Some(typed.clone());
            }
        });
    }

    /// Selection change reported by the host.
    pub fn on_cursor_moved(
        &mut self,
        old_start: usize,
        old_end: usize,
        new_start: usize,
        new_end: usize,
    ) {
        trace!(old_start, old_end, new_start, new_end, "cursor moved");
        if self.document.is_none() {
            return;
        }
        if old_start != new_start || old_end != new_end {
            self.session.pending_text_deletion = None;
        }

        if new_start != new_end {
            self.abort_correction();
            return;
        }

        if self.session.composing {
            let start = self.session.composing_start;
            let end = start + self.session.word.len();
            if (start..=end).contains(&new_start) {
                self.session.word.set_cursor_position(new_start - start);
                return;
            }
            debug!(new_start, "cursor left the composing word");
            self.abort_correction();
        } else if self.session.correction.phase() == CorrectionPhase::AcceptedDefault {
            match self.session.correction.accept_offset() {
                Some(offset) if offset == old_start && old_start != new_start => {
                    debug!(offset, new_start, "cursor moved away from accepted word");
                    self.abort_correction();
                }
                Some(_) => {}
                None => self.session.correction.set_accept_offset(new_start),
            }
        }

        self.schedule_restart();
    }

    /// Insert a block of text (emoji, snippet, clipboard).
    pub fn on_text(&mut self, text: &str) {
        self.begin_input_event();
        if self.document.is_none() || text.is_empty() {
            return;
        }
        self.with_batch(|this| {
            this.commit_typed();
            this.abort_correction();
            if let Some(doc) = this.document.as_mut() {
                doc.insert_or_commit_text(text);
            }
        });
        self.session.pending_text_deletion = Some(text.to_string());
    }

    /// Delete the composing word, or the word before the cursor.
    pub fn on_delete_word(&mut self) {
        self.begin_input_event();
        if self.document.is_none() {
            return;
        }

        if self.session.composing {
            if let Some(doc) = self.document.as_mut() {
                doc.set_composing_region("");
            }
            self.abort_correction();
            return;
        }

        let Some(doc) = self.document.as_mut() else {
            return;
        };
        let before: Vec<char> = doc.text_before_cursor(MAX_WORD_SCAN).chars().collect();
        let spaces = before.iter().rev().take_while(|c| c.is_whitespace()).count();
        let letters = before[..before.len() - spaces]
            .iter()
            .rev()
            .take_while(|c| c.is_alphanumeric())
            .count();
        let count = (spaces + letters).max(1);
        doc.delete_surrounding(count, 0);
        self.session.correction.reset();
    }

    // ========== Deferred work ==========

    /// Run the debounced work that is due at `now`.
    pub fn run_due(&mut self, now: Instant) {
        if self.restart.take_due(now) {
            self.perform_restart_word_suggestion();
        }
        if self.refresh.take_due(now) {
            self.update_suggestions();
        }
    }

    /// Run all pending work immediately.
    pub fn flush_pending(&mut self) {
        if self.restart.take_pending() {
            self.perform_restart_word_suggestion();
        }
        if self.refresh.take_pending() {
            self.update_suggestions();
        }
    }

    /// Earliest time pending work is due.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.refresh.deadline(), self.restart.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn has_pending_work(&self) -> bool {
        self.refresh.is_pending() || self.restart.is_pending()
    }

    // ========== Predicates ==========

    /// Whether the last committed word can be replaced by the typed word.
    pub fn can_revert(&self) -> bool {
        if self.session.composing
            || self.session.word.is_empty()
            || !self.session.correction.phase().is_revertible()
        {
            return false;
        }
        let (Some(doc), Some(committed)) = (self.document.as_ref(), self.session.committed.as_ref())
        else {
            return false;
        };
        let cursor = doc.cursor_position();
        if cursor < committed.end() {
            return false;
        }
        doc.text_before_cursor(cursor - committed.start)
            .starts_with(&committed.text)
    }

    /// Whether a restart-on-cursor-move may run now.
    pub fn can_restart(&self) -> bool {
        !self.session.composing
            && self.session.prediction_on
            && self.session.restart_allowed
            && self.document.is_some()
            && self.is_cursor_touching_word()
    }

    // ========== Internals ==========

    fn begin_input_event(&mut self) {
        self.restart.cancel();
        self.session.pending_text_deletion = None;
    }

    fn cancel_pending(&mut self) {
        self.refresh.cancel();
        self.restart.cancel();
    }

    fn cursor(&self) -> usize {
        self.document
            .as_ref()
            .map(|doc| doc.cursor_position())
            .unwrap_or(0)
    }

    fn with_batch<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        if let Some(doc) = self.document.as_mut() {
            doc.begin_batch();
        }
        let out = f(self);
        if let Some(doc) = self.document.as_mut() {
            doc.end_batch();
        }
        out
    }

    fn is_cursor_touching_word(&self) -> bool {
        let Some(doc) = self.document.as_ref() else {
            return false;
        };
        let touches = |ch: Option<char>| ch.is_some_and(|c| self.layout.is_word_start_char(c));
        touches(doc.text_before_cursor(1).chars().next())
            || touches(doc.text_after_cursor(1).chars().next())
    }

    fn start_composing(&mut self) {
        self.session.word.reset();
        self.session.composing = true;
        self.session.composing_start = self.cursor();
        self.session.committed = None;
        self.session.just_auto_added_word = None;
        trace!(start = self.session.composing_start, "composing started");
    }

    /// Mirror the word buffer into the composing region.
    fn render_composing(&mut self) {
        let typed = self.session.word.typed_word();
        let word_cursor = self.session.word.cursor_position();
        let at_end = word_cursor == self.session.word.len();
        let position = self.session.composing_start + word_cursor;
        if let Some(doc) = self.document.as_mut() {
            let mut batch = BatchEdit::begin(doc);
            batch.set_composing_region(&typed);
            if !at_end {
                batch.set_cursor(position, position);
            }
        }
    }

    fn schedule_refresh(&mut self) {
        self.refresh.schedule(Instant::now());
    }

    fn schedule_restart(&mut self) {
        self.restart.schedule(Instant::now());
    }

    /// Recompute the suggestion strip and the preferred word.
    fn update_suggestions(&mut self) {
        self.refresh.cancel();
        if !self.session.composing {
            self.session.candidates.clear();
            self.session.word.set_preferred_word(None);
            return;
        }
        let Some(oracle) = self.oracle.as_mut() else {
            self.session.candidates.clear();
            self.session.word.set_preferred_word(None);
            return;
        };

        let word = &self.session.word;
        let suggestions = oracle.suggestions(word);
        let typed = word.typed_word();
        let typed_valid = oracle.is_valid_word(&typed);
        let mode = oracle.correction_mode();

        let mut correction_available = oracle.has_minimal_correction();
        if mode.quick_fixes || mode.full_suggestions {
            correction_available |= typed_valid;
        }
        // don't auto-correct words typed mostly in capitals
        correction_available &= !word.is_mostly_caps();
        correction_available &= !self.session.correction.is_correcting();

        self.session.candidates =
            CandidateList::from_suggestions(suggestions, typed_valid, correction_available);
        let preferred = self.session.candidates.preferred().map(str::to_string);
        trace!(%typed, ?preferred, typed_valid, correction_available, "suggestions updated");
        self.session.word.set_preferred_word(preferred);
    }

    /// Commit the preferred word on a separator. Returns false when no
    /// preferred word was resolved.
    fn pick_default_suggestion(&mut self) -> bool {
        if self.refresh.take_pending() {
            self.update_suggestions();
        }
        let Some(preferred) = self
            .session
            .word
            .preferred_word()
            .filter(|w| !w.is_empty())
            .map(str::to_string)
        else {
            return false;
        };

        let typed = self.session.word.typed_word();
        let committed = self.pick_suggestion(&preferred);
        debug!(%typed, %committed, "default accept");
        self.session.correction.accepted_default(None);

        self.session.just_auto_added_word = None;
        if committed == typed && self.add_to_dictionaries(&typed, AdditionKind::Typed) {
            self.session.just_auto_added_word = Some(typed);
        }
        true
    }

    /// Commit `suggestion` in place of the composing word, matching the case
    /// the user typed in. Returns the committed text.
    fn pick_suggestion(&mut self, suggestion: &str) -> String {
        let shift = self.session.shift;
        let text = if shift.is_caps_lock() {
            suggestion.to_uppercase()
        } else if self.session.word.is_first_char_capitalized() || shift.is_active() {
            capitalize_first(suggestion)
        } else {
            suggestion.to_string()
        };

        let start = self.cursor_before_commit();
        if let Some(doc) = self.document.as_mut() {
            doc.insert_or_commit_text(&text);
        }
        self.session.word.set_preferred_word(Some(text.clone()));
        self.session.composing = false;
        self.session.committed = Some(CommittedWord {
            text: text.clone(),
            start,
        });
        self.session.candidates.clear();
        self.refresh.cancel();
        text
    }

    /// Where committed text will start: the composing word, or the cursor.
    fn cursor_before_commit(&self) -> usize {
        if self.session.composing {
            self.session.composing_start
        } else {
            self.cursor()
        }
    }

    /// Commit the composing word exactly as typed.
    fn commit_typed(&mut self) {
        if !self.session.composing {
            return;
        }
        self.session.composing = false;
        self.refresh.cancel();
        self.session.candidates.clear();

        let typed = self.session.word.typed_word();
        if typed.is_empty() {
            if let Some(doc) = self.document.as_mut() {
                doc.finish_composing();
            }
            return;
        }

        let start = self.session.composing_start;
        if let Some(doc) = self.document.as_mut() {
            doc.insert_or_commit_text(&typed);
        }
        debug!(%typed, "committed typed word");
        self.session.committed = Some(CommittedWord {
            text: typed.clone(),
            start,
        });
        self.session.correction.accepted_typed();
        self.session.just_auto_added_word = None;
        if self.add_to_dictionaries(&typed, AdditionKind::Typed) {
            self.session.just_auto_added_word = Some(typed);
        }
    }

    /// Offer `word` to the learner unless the oracle already knows it.
    fn add_to_dictionaries(&mut self, word: &str, kind: AdditionKind) -> bool {
        if word.is_empty() || !self.config.correction_mode().allows_learning() {
            return false;
        }
        let (Some(oracle), Some(learner)) = (self.oracle.as_ref(), self.learner.as_ref()) else {
            return false;
        };
        if oracle.is_valid_word(word) {
            return false;
        }
        learner.add_word(word, kind)
    }

    /// Drop the composing word and any pending correction.
    fn abort_correction(&mut self) {
        self.cancel_pending();
        if let Some(doc) = self.document.as_mut() {
            doc.finish_composing();
        }
        self.session.candidates.clear();
        self.session.correction.reset();
        self.session.word.reset();
        self.session.composing = false;
        self.session.just_added_auto_space = false;
        self.session.committed = None;
        self.session.just_auto_added_word = None;
    }

    fn revert_last_word(&mut self) -> bool {
        if !self.can_revert() {
            return false;
        }
        let Some(committed) = self.session.committed.take() else {
            return false;
        };
        let typed = self.session.word.typed_word();
        let span = self.cursor() - committed.start;
        debug!(%typed, committed = %committed.text, "reverting last word");

        self.with_batch(|this| {
            if let Some(doc) = this.document.as_mut() {
                doc.delete_surrounding(span, 0);
                this.session.composing_start = doc.cursor_position();
                doc.set_composing_region(&typed);
            }
        });
        self.session.composing = true;
        self.session.just_added_auto_space = false;
        let len = self.session.word.len();
        self.session.word.set_cursor_position(len);
        self.session.correction.reverted();

        if let Some(learned) = self.session.just_auto_added_word.take() {
            if let Some(learner) = self.learner.as_ref() {
                learner.remove_word(&learned);
            }
        }
        self.update_suggestions();
        true
    }

    /// Resume composing the word the cursor landed on.
    fn perform_restart_word_suggestion(&mut self) {
        if !self.can_restart() {
            return;
        }
        let Some(doc) = self.document.as_ref() else {
            return;
        };

        let is_word_char = |c: &char| self.layout.is_inner_word_char(*c);
        let before: Vec<char> = doc.text_before_cursor(MAX_WORD_SCAN).chars().collect();
        let left: Vec<char> = {
            let n = before.iter().rev().take_while(|c| is_word_char(c)).count();
            before[before.len() - n..].to_vec()
        };
        let right: Vec<char> = doc
            .text_after_cursor(MAX_WORD_SCAN)
            .chars()
            .take_while(|c| is_word_char(c))
            .collect();
        let word: String = left.iter().chain(right.iter()).collect();
        if word.is_empty() {
            return;
        }
        debug!(%word, "restarting suggestions on word");

        self.with_batch(|this| {
            this.abort_correction();
            let word_buffer = &mut this.session.word;
            for (i, &ch) in left.iter().chain(right.iter()).enumerate() {
                if i == 0 && ch.is_uppercase() {
                    word_buffer.set_first_char_capitalized(true);
                }
                word_buffer.add(ch, &[ch]);
                this.session.correction.typed_character(false);
            }
            this.session.word.set_cursor_position(left.len());
            this.session.composing = true;

            if let Some(doc) = this.document.as_mut() {
                doc.delete_surrounding(left.len(), right.len());
                let start = doc.cursor_position();
                this.session.composing_start = start;
                doc.set_composing_region(&word);
                if !right.is_empty() {
                    doc.set_cursor(start + left.len(), start + left.len());
                }
            }
        });
        self.schedule_refresh();
    }
}
