//! Integration tests for the composer.
//!
//! Drives a `Composer` over a `MemoryDocument` with a scripted oracle and the
//! in-memory auto-dictionary, covering:
//! - auto-correct on separators and the one-backspace revert
//! - cursor moves forfeiting the revert
//! - space and punctuation normalization
//! - learning and un-learning
//! - case rules when picking suggestions
//! - restart-on-cursor-move and debounced refreshes

use libcompose_core::{
    AdditionKind, AutoDictionary, Composer, Config, CorrectionMode, CorrectionPhase,
    DefaultLayout, DictionaryLearner, Document, EditorInfo, LearningPolicy, MemoryDocument,
    ShiftState, SuggestionOracle, WordBuffer,
};
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Oracle answering from fixed tables.
struct ScriptedOracle {
    valid: Vec<&'static str>,
    corrections: HashMap<&'static str, Vec<&'static str>>,
    mode: CorrectionMode,
    has_correction: bool,
    calls: Rc<Cell<usize>>,
}

impl ScriptedOracle {
    fn new(valid: &[&'static str], corrections: &[(&'static str, &[&'static str])]) -> Self {
        Self {
            valid: valid.to_vec(),
            corrections: corrections
                .iter()
                .map(|(typed, list)| (*typed, list.to_vec()))
                .collect(),
            mode: CorrectionMode::default(),
            has_correction: false,
            calls: Rc::new(Cell::new(0)),
        }
    }
}

impl SuggestionOracle for ScriptedOracle {
    fn suggestions(&mut self, word: &WordBuffer) -> Vec<String> {
        self.calls.set(self.calls.get() + 1);
        let typed = word.typed_word();
        let mut out = vec![typed.clone()];
        let corrections = self
            .corrections
            .get(typed.to_lowercase().as_str())
            .cloned()
            .unwrap_or_default();
        self.has_correction = !corrections.is_empty();
        out.extend(corrections.into_iter().map(str::to_string));
        out
    }

    fn has_minimal_correction(&self) -> bool {
        self.has_correction
    }

    fn is_valid_word(&self, word: &str) -> bool {
        self.valid.contains(&word.to_lowercase().as_str())
    }

    fn set_correction_mode(&mut self, mode: CorrectionMode) {
        self.mode = mode;
    }

    fn correction_mode(&self) -> CorrectionMode {
        self.mode
    }
}

fn default_oracle() -> ScriptedOracle {
    ScriptedOracle::new(
        &["hello", "ten", "tea", "go", "the", "world"],
        &[
            ("helo", &["hello", "help"]),
            ("teh", &["the", "ten"]),
            ("ten", &["tea"]),
            ("nasa", &["nasal"]),
        ],
    )
}

fn composer_with(
    oracle: ScriptedOracle,
    doc: MemoryDocument,
) -> (Composer<MemoryDocument>, AutoDictionary) {
    let dict = AutoDictionary::in_memory(LearningPolicy::default());
    let mut composer = Composer::new(Config::default(), Box::new(DefaultLayout))
        .with_oracle(Box::new(oracle))
        .with_learner(Box::new(dict.clone()));
    composer.on_session_start(doc, EditorInfo::default());
    (composer, dict)
}

fn composer() -> Composer<MemoryDocument> {
    composer_with(default_oracle(), MemoryDocument::new()).0
}

/// Type `keys`, flushing debounced work after every key like a host whose
/// timers fire between keystrokes.
fn type_keys(composer: &mut Composer<MemoryDocument>, keys: &str) {
    for ch in keys.chars() {
        composer.on_key(ch, ShiftState::Off, &[]);
        composer.flush_pending();
    }
}

fn text(composer: &Composer<MemoryDocument>) -> String {
    composer.document().map(|d| d.text()).unwrap_or_default()
}

fn cursor(composer: &Composer<MemoryDocument>) -> usize {
    composer.document().map(|d| d.cursor_position()).unwrap_or(0)
}

/// Move the cursor like a user tapping in the field.
fn tap(composer: &mut Composer<MemoryDocument>, position: usize) {
    let old = cursor(composer);
    if let Some(doc) = composer.document_mut() {
        doc.set_cursor(position, position);
    }
    composer.on_cursor_moved(old, old, position, position);
}

#[test]
fn space_commits_preferred_correction() {
    let mut composer = composer();
    type_keys(&mut composer, "helo");
    assert_eq!(composer.suggestions().preferred(), Some("hello"));

    type_keys(&mut composer, " ");
    assert_eq!(text(&composer), "hello ");
    assert!(!composer.is_composing());
    assert_eq!(composer.correction_phase(), CorrectionPhase::AcceptedDefault);
    assert_eq!(composer.session().correction().accept_offset(), Some(6));
    assert_eq!(composer.document().unwrap().batch_depth(), 0);
}

#[test]
fn separator_accepts_without_waiting_for_refresh() {
    let mut composer = composer();
    for ch in "teh".chars() {
        composer.on_key(ch, ShiftState::Off, &[]);
    }
    // the pending refresh is flushed by the separator itself
    composer.on_key(' ', ShiftState::Off, &[]);
    assert_eq!(text(&composer), "the ");
}

#[test]
fn one_backspace_reverts_default_accept() {
    let mut composer = composer();
    type_keys(&mut composer, "helo ");
    assert!(composer.can_revert());

    composer.on_backspace();
    assert_eq!(text(&composer), "helo");
    assert_eq!(composer.composing_text().as_deref(), Some("helo"));
    assert_eq!(
        composer.document().unwrap().composing_text().as_deref(),
        Some("helo")
    );
    assert_eq!(composer.correction_phase(), CorrectionPhase::Composing);

    // the second backspace is a plain deletion
    composer.on_backspace();
    assert_eq!(text(&composer), "hel");
    assert!(!composer.can_revert());
}

#[test]
fn reverting_punctuated_word_drops_the_punctuation() {
    let mut composer = composer();
    type_keys(&mut composer, "helo.");
    assert_eq!(text(&composer), "hello.");
    assert_eq!(composer.correction_phase(), CorrectionPhase::AcceptedDefault);

    composer.on_backspace();
    assert_eq!(text(&composer), "helo");
    assert!(composer.is_composing());
}

#[test]
fn cursor_move_forfeits_undo() {
    let mut composer = composer();
    type_keys(&mut composer, "helo ");
    tap(&mut composer, 2);
    assert_eq!(composer.correction_phase(), CorrectionPhase::Idle);
    assert!(!composer.can_revert());

    composer.on_backspace();
    assert_eq!(text(&composer), "hllo ");
    assert!(!composer.is_composing());
    assert_eq!(composer.correction_phase(), CorrectionPhase::Idle);
}

#[test]
fn unreported_cursor_move_still_forfeits_undo() {
    let mut composer = composer();
    type_keys(&mut composer, "helo ");
    if let Some(doc) = composer.document_mut() {
        doc.set_cursor(3, 3);
    }
    composer.on_backspace();
    assert_eq!(text(&composer), "helo ");
    assert_eq!(composer.correction_phase(), CorrectionPhase::Idle);
}

#[test]
fn comma_after_auto_space_is_swapped() {
    let mut composer = composer();
    type_keys(&mut composer, "helo ,");
    assert_eq!(text(&composer), "hello, ");
    assert_eq!(
        composer.correction_phase(),
        CorrectionPhase::PunctuationAfterAccepted
    );
}

#[test]
fn period_normalization_happens_once() {
    let mut composer = composer();
    type_keys(&mut composer, "hello .");
    assert_eq!(text(&composer), "hello. ");

    type_keys(&mut composer, ".");
    assert_eq!(text(&composer), "hello.. ");
    assert_eq!(composer.correction_phase(), CorrectionPhase::Idle);
}

#[test]
fn double_space_becomes_period() {
    let mut composer = composer();
    type_keys(&mut composer, "go  ");
    assert_eq!(text(&composer), "go. ");
}

#[test]
fn double_space_without_oracle() {
    let mut composer: Composer<MemoryDocument> =
        Composer::new(Config::default(), Box::new(DefaultLayout));
    composer.on_session_start(MemoryDocument::new(), EditorInfo::default());
    type_keys(&mut composer, "go  ");
    assert_eq!(text(&composer), "go. ");
}

#[test]
fn enter_removes_auto_space() {
    let mut composer = composer();
    type_keys(&mut composer, "hello \n");
    assert_eq!(text(&composer), "hello\n");
}

#[test]
fn enter_removes_space_left_by_double_space() {
    let mut config = Config::default();
    config.set_auto_correct(false);
    let mut composer = Composer::new(config, Box::new(DefaultLayout))
        .with_oracle(Box::new(default_oracle()));
    composer.on_session_start(MemoryDocument::new(), EditorInfo::default());
    type_keys(&mut composer, "go  ");
    assert_eq!(text(&composer), "go. ");
    assert!(composer.session().just_added_auto_space());
    type_keys(&mut composer, "\n");
    assert_eq!(text(&composer), "go.\n");
}

#[test]
fn enter_removes_space_left_by_swap() {
    let mut composer = composer();
    type_keys(&mut composer, "helo ,");
    assert_eq!(text(&composer), "hello, ");
    assert!(composer.session().just_added_auto_space());
    type_keys(&mut composer, "\n");
    assert_eq!(text(&composer), "hello,\n");
}

#[test]
fn enter_keeps_space_typed_by_hand() {
    let mut config = Config::default();
    config.set_auto_correct(false);
    let mut composer = Composer::new(config, Box::new(DefaultLayout))
        .with_oracle(Box::new(default_oracle()));
    composer.on_session_start(MemoryDocument::new(), EditorInfo::default());
    type_keys(&mut composer, "go \n");
    assert_eq!(text(&composer), "go \n");
}

#[test]
fn valid_typed_word_wins() {
    let mut composer = composer();
    type_keys(&mut composer, "ten");
    assert_eq!(composer.suggestions().candidates(), &["ten", "tea"]);
    assert!(composer.suggestions().typed_word_valid());
    type_keys(&mut composer, " ");
    assert_eq!(text(&composer), "ten ");
}

#[test]
fn mostly_caps_word_is_not_corrected() {
    let mut composer = composer();
    for ch in "NASA".chars() {
        composer.on_key(ch, ShiftState::Shifted, &[]);
    }
    composer.flush_pending();
    assert!(!composer.suggestions().correction_available());
    type_keys(&mut composer, " ");
    assert_eq!(text(&composer), "NASA ");
}

#[test]
fn separator_inside_word_does_not_correct() {
    let mut composer = composer();
    type_keys(&mut composer, "helo");
    tap(&mut composer, 2);
    assert!(composer.is_composing());
    assert_eq!(composer.session().word().cursor_position(), 2);

    composer.on_key(',', ShiftState::Off, &[]);
    assert_eq!(text(&composer), "he,lo");
    assert!(!composer.is_composing());
    assert_eq!(composer.correction_phase(), CorrectionPhase::Idle);
}

#[test]
fn typing_inside_composing_word() {
    let mut composer = composer();
    type_keys(&mut composer, "hllo");
    tap(&mut composer, 1);
    type_keys(&mut composer, "e");
    assert_eq!(composer.composing_text().as_deref(), Some("hello"));
    assert_eq!(cursor(&composer), 2);
}

#[test]
fn auto_correct_off_commits_typed_word() {
    let mut config = Config::default();
    config.set_auto_correct(false);
    let mut composer = Composer::new(config, Box::new(DefaultLayout))
        .with_oracle(Box::new(default_oracle()));
    composer.on_session_start(MemoryDocument::new(), EditorInfo::default());
    type_keys(&mut composer, "helo ");
    assert_eq!(text(&composer), "helo ");
    assert!(!composer.can_revert());
}

#[test]
fn missing_oracle_disables_correction() {
    let mut composer: Composer<MemoryDocument> =
        Composer::new(Config::default(), Box::new(DefaultLayout));
    composer.on_session_start(MemoryDocument::new(), EditorInfo::default());
    type_keys(&mut composer, "helo");
    assert!(composer.suggestions().is_empty());
    type_keys(&mut composer, " ");
    assert_eq!(text(&composer), "helo ");
    assert_eq!(composer.correction_phase(), CorrectionPhase::Idle);
}

#[test]
fn picking_top_word_learns_and_revert_unlearns() {
    let (mut composer, dict) = composer_with(default_oracle(), MemoryDocument::new());
    type_keys(&mut composer, "brb");
    assert!(!dict.is_valid_word("brb"));

    composer.on_pick_suggestion(0, "brb");
    assert_eq!(text(&composer), "brb ");
    assert!(dict.is_valid_word("brb"));
    assert_eq!(composer.session().just_auto_added_word(), Some("brb"));

    assert!(composer.on_revert_last_word());
    assert!(!dict.is_valid_word("brb"));
    assert_eq!(text(&composer), "brb");
    assert_eq!(composer.composing_text().as_deref(), Some("brb"));
}

#[test]
fn picking_lower_ranked_word_learns_nothing() {
    let (mut composer, dict) = composer_with(default_oracle(), MemoryDocument::new());
    type_keys(&mut composer, "helo");
    composer.on_pick_suggestion(2, "help");
    assert_eq!(text(&composer), "help ");
    assert_eq!(dict.frequency("helo"), 0);
    assert_eq!(composer.session().just_auto_added_word(), None);
}

#[test]
fn known_words_are_not_learned() {
    let (mut composer, dict) = composer_with(default_oracle(), MemoryDocument::new());
    type_keys(&mut composer, "world");
    composer.on_pick_suggestion(0, "world");
    assert_eq!(dict.frequency("world"), 0);
}

#[test]
fn typed_words_are_learned_after_repetition() {
    let mut config = Config::default();
    config.set_auto_correct(false);
    let dict = AutoDictionary::in_memory(config.learning_policy());
    let mut composer = Composer::new(config, Box::new(DefaultLayout))
        .with_oracle(Box::new(default_oracle()))
        .with_learner(Box::new(dict.clone()));
    composer.on_session_start(MemoryDocument::new(), EditorInfo::default());

    type_keys(&mut composer, "zork zork ");
    assert!(!dict.is_valid_word("zork"));
    type_keys(&mut composer, "zork ");
    assert!(dict.is_valid_word("zork"));
    assert!(!dict.add_word("zork", AdditionKind::Typed));
}

#[test]
fn caps_lock_uppercases_pick() {
    let mut composer = composer();
    for ch in "hello".chars() {
        composer.on_key(ch, ShiftState::Locked, &[]);
    }
    composer.flush_pending();
    assert_eq!(composer.composing_text().as_deref(), Some("HELLO"));
    composer.on_pick_suggestion(1, "world");
    assert_eq!(text(&composer), "WORLD ");
}

#[test]
fn capitalized_word_capitalizes_pick() {
    let mut composer = composer();
    composer.on_key('h', ShiftState::Shifted, &[]);
    for ch in "ello".chars() {
        composer.on_key(ch, ShiftState::Off, &[]);
    }
    composer.flush_pending();
    composer.on_pick_suggestion(1, "world");
    assert_eq!(text(&composer), "World ");
}

#[test]
fn cursor_on_word_restarts_prediction() {
    let doc = MemoryDocument::with_text("hello world");
    let (mut composer, _) = composer_with(default_oracle(), doc);
    tap(&mut composer, 8);
    assert!(composer.has_pending_work());
    composer.flush_pending();

    assert!(composer.is_composing());
    assert_eq!(composer.composing_text().as_deref(), Some("world"));
    assert_eq!(composer.session().word().cursor_position(), 2);
    let doc = composer.document().unwrap();
    assert_eq!(doc.composing_range(), Some(6..11));
    assert_eq!(doc.cursor_position(), 8);

    type_keys(&mut composer, "x");
    assert_eq!(text(&composer), "hello woxrld");
}

#[test]
fn new_input_cancels_pending_restart() {
    let doc = MemoryDocument::with_text("hello world");
    let (mut composer, _) = composer_with(default_oracle(), doc);
    tap(&mut composer, 8);
    composer.on_key('x', ShiftState::Off, &[]);
    assert!(!composer.has_pending_work());
    composer.flush_pending();
    assert!(!composer.is_composing());
    assert_eq!(text(&composer), "hello woxrld");
}

#[test]
fn cursor_leaving_composing_word_aborts_without_edit() {
    let (mut composer, _) = composer_with(default_oracle(), MemoryDocument::with_text("one "));
    type_keys(&mut composer, "tw");
    tap(&mut composer, 1);
    assert!(!composer.is_composing());
    assert_eq!(text(&composer), "one tw");
    assert_eq!(composer.document().unwrap().composing_range(), None);

    // the cursor now touches "one", which becomes the composing word
    composer.flush_pending();
    assert_eq!(composer.composing_text().as_deref(), Some("one"));
}

#[test]
fn selection_aborts_composition() {
    let mut composer = composer();
    type_keys(&mut composer, "hel");
    composer.on_cursor_moved(3, 3, 0, 3);
    assert!(!composer.is_composing());
    assert!(!composer.has_pending_work());
    assert_eq!(text(&composer), "hel");
}

#[test]
fn refreshes_are_coalesced() {
    let oracle = default_oracle();
    let calls = oracle.calls.clone();
    let (mut composer, _) = composer_with(oracle, MemoryDocument::new());
    for ch in "helo".chars() {
        composer.on_key(ch, ShiftState::Off, &[]);
    }
    assert!(composer.next_deadline().is_some());
    composer.flush_pending();
    assert_eq!(calls.get(), 1);
    assert_eq!(composer.suggestions().candidates(), &["helo", "hello", "help"]);
}

#[test]
fn new_session_cancels_pending_refresh() {
    let mut composer = composer();
    composer.on_key('h', ShiftState::Off, &[]);
    assert!(composer.has_pending_work());
    composer.on_session_start(MemoryDocument::new(), EditorInfo::default());
    assert!(!composer.has_pending_work());
    assert!(!composer.is_composing());
    assert!(composer.session().word().is_empty());
    assert_eq!(composer.correction_phase(), CorrectionPhase::Idle);
}

#[test]
fn apostrophe_continues_a_word() {
    let mut composer = composer();
    type_keys(&mut composer, "don't");
    assert_eq!(composer.composing_text().as_deref(), Some("don't"));
    type_keys(&mut composer, "'");
    assert_eq!(composer.composing_text().as_deref(), Some("don't'"));
}

#[test]
fn inserted_text_is_deleted_whole() {
    let mut composer = composer();
    type_keys(&mut composer, "hi ");
    composer.on_text(":-)");
    assert_eq!(text(&composer), "hi :-)");
    composer.on_backspace();
    assert_eq!(text(&composer), "hi ");
    composer.on_backspace();
    assert_eq!(text(&composer), "hi");
}

#[test]
fn revert_happens_in_one_batch() {
    let mut composer = composer();
    type_keys(&mut composer, "helo ");
    let before = composer.document().unwrap().completed_batches();
    composer.on_backspace();
    let doc = composer.document().unwrap();
    assert_eq!(doc.batch_depth(), 0);
    assert_eq!(doc.completed_batches(), before + 1);
}

fn just_before(deadline: Instant) -> Instant {
    deadline
        .checked_sub(Duration::from_millis(1))
        .unwrap_or(deadline)
}

#[test]
fn refresh_waits_for_its_deadline() {
    let oracle = default_oracle();
    let calls = oracle.calls.clone();
    let (mut composer, _) = composer_with(oracle, MemoryDocument::new());
    for ch in "helo".chars() {
        composer.on_key(ch, ShiftState::Off, &[]);
    }
    let deadline = composer.next_deadline().unwrap();

    composer.run_due(just_before(deadline));
    assert_eq!(calls.get(), 0);
    assert!(composer.has_pending_work());
    assert!(composer.suggestions().is_empty());

    composer.run_due(deadline);
    assert_eq!(calls.get(), 1);
    assert!(!composer.has_pending_work());
    assert_eq!(composer.next_deadline(), None);
    assert_eq!(composer.suggestions().candidates(), &["helo", "hello", "help"]);
}

#[test]
fn newer_keystroke_pushes_refresh_back() {
    let oracle = default_oracle();
    let calls = oracle.calls.clone();
    let (mut composer, _) = composer_with(oracle, MemoryDocument::new());
    composer.on_key('h', ShiftState::Off, &[]);
    let first = composer.next_deadline().unwrap();
    std::thread::sleep(Duration::from_millis(5));
    composer.on_key('e', ShiftState::Off, &[]);
    let second = composer.next_deadline().unwrap();
    assert!(second > first);

    composer.run_due(first);
    assert_eq!(calls.get(), 0);
    composer.run_due(second);
    assert_eq!(calls.get(), 1);
    assert_eq!(composer.suggestions().candidates(), &["he"]);
}

#[test]
fn restart_runs_before_refresh_in_one_pump() {
    let oracle = default_oracle();
    let calls = oracle.calls.clone();
    let doc = MemoryDocument::with_text("hello world");
    let (mut composer, _) = composer_with(oracle, doc);
    tap(&mut composer, 8);
    let deadline = composer.next_deadline().unwrap();

    composer.run_due(just_before(deadline));
    assert!(!composer.is_composing());

    // the restart schedules a refresh, which is also due this late
    composer.run_due(deadline + Duration::from_secs(5));
    assert_eq!(composer.composing_text().as_deref(), Some("world"));
    assert_eq!(calls.get(), 1);
    assert_eq!(composer.suggestions().candidates(), &["world"]);
    assert!(!composer.has_pending_work());
}

#[test]
fn restarting_session_keeps_shift_and_skips_restart() {
    let (mut composer, _) = composer_with(default_oracle(), MemoryDocument::new());
    composer.set_shift_state(ShiftState::Locked);
    composer.on_session_start(
        MemoryDocument::with_text("hello world"),
        EditorInfo::default().restarting(),
    );
    assert_eq!(composer.session().shift(), ShiftState::Locked);
    assert!(!composer.can_restart());

    tap(&mut composer, 8);
    composer.flush_pending();
    assert!(!composer.is_composing());

    composer.on_session_start(MemoryDocument::with_text("hello world"), EditorInfo::default());
    assert_eq!(composer.session().shift(), ShiftState::Off);
    tap(&mut composer, 8);
    composer.flush_pending();
    assert_eq!(composer.composing_text().as_deref(), Some("world"));
}
