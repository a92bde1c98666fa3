//! libcompose-core
//!
//! Language-agnostic word composition shared by keyboard language packs
//! (liblatin). It decides when to auto-correct on a separator, lets one
//! backspace undo a correction, restarts prediction when the cursor lands on
//! a word and learns the words the user insists on.
//!
//! Public API:
//! - `Composer` - Orchestrates keystrokes, suggestions and document edits
//! - `WordBuffer` - The word being composed, with per-key hints
//! - `CorrectionState` - Correction state machine
//! - `SuggestionOracle` / `DictionaryLearner` - Pluggable collaborators
//! - `KeyboardLayout` - Per-layout character classes
//! - `Document` / `MemoryDocument` - Host text field abstraction
//! - `AutoDictionary` - Learned words (in-memory or redb)
//! - `Config` - Configuration and feature flags
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod word_buffer;
pub use word_buffer::WordBuffer;

pub mod correction;
pub use correction::{CorrectionEvent, CorrectionPhase, CorrectionState};

pub mod oracle;
pub use oracle::{AdditionKind, CorrectionMode, DictionaryLearner, SuggestionOracle};

pub mod layout;
pub use layout::{CharClass, DefaultLayout, KeyboardLayout};

pub mod document;
pub use document::{BatchEdit, Document, MemoryDocument};

pub mod context;
pub use context::{EditorInfo, InputPurpose};

pub mod candidate;
pub use candidate::CandidateList;

pub mod userdict;
pub use userdict::{AutoDictionary, InMemoryUserDict, LearningPolicy, RedbUserDict, UserDict};

pub mod scheduler;
pub use scheduler::Debouncer;

pub mod punctuation;

pub mod session;
pub use session::{CommittedWord, ComposeSession, ShiftState};

pub mod composer;
pub use composer::Composer;

/// Generic configuration for composition behaviour.
///
/// This config contains only language-agnostic fields. Layout and ranking
/// options belong in the language crates (e.g. `LatinConfig`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Show the suggestion strip. Prediction is off without it.
    pub show_suggestions: bool,
    /// Offer quick fixes (single mistyped key, capitalization)
    pub quick_fixes: bool,
    /// Replace the typed word with the top correction on a separator
    pub auto_correct: bool,

    // Space and punctuation handling
    /// Insert a space after a suggestion picked from the strip
    pub auto_space_after_pick: bool,
    /// Move sentence punctuation before an auto-inserted space
    pub swap_punctuation_and_space: bool,
    /// Two spaces after a word become ". "
    pub double_space_to_period: bool,

    /// Restart prediction when the cursor lands on an existing word
    pub allow_suggestions_restart: bool,

    // Debounce delays (milliseconds)
    pub suggestion_delay_ms: u64,
    pub restart_delay_ms: u64,

    // Auto-dictionary learning
    /// Count added when a word is committed as typed
    pub learn_typed_weight: u64,
    /// Count added when a word is picked from the strip
    pub learn_picked_weight: u64,
    /// Count at which a word becomes a learned word
    pub learn_threshold: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            show_suggestions: true,
            quick_fixes: true,
            auto_correct: true,
            auto_space_after_pick: true,
            swap_punctuation_and_space: true,
            double_space_to_period: true,
            allow_suggestions_restart: true,
            suggestion_delay_ms: 100,
            restart_delay_ms: 500,
            learn_typed_weight: 1,
            learn_picked_weight: 3,
            learn_threshold: 3,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Auto-correct only applies while suggestions are shown.
    pub fn auto_correct_enabled(&self) -> bool {
        self.auto_correct && self.show_suggestions
    }

    pub fn set_auto_correct(&mut self, enabled: bool) {
        self.auto_correct = enabled;
    }

    pub fn set_show_suggestions(&mut self, enabled: bool) {
        self.show_suggestions = enabled;
    }

    /// Correction mode forwarded to the suggestion oracle.
    pub fn correction_mode(&self) -> CorrectionMode {
        CorrectionMode::new(self.quick_fixes, self.show_suggestions)
    }

    pub fn learning_policy(&self) -> LearningPolicy {
        LearningPolicy {
            typed_weight: self.learn_typed_weight,
            picked_weight: self.learn_picked_weight,
            threshold: self.learn_threshold.max(1),
        }
    }

    pub fn suggestion_delay(&self) -> Duration {
        Duration::from_millis(self.suggestion_delay_ms)
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }
}

pub mod utils {
    use unicode_normalization::UnicodeNormalization;

    /// NFC-normalize a word so composed and decomposed forms share one key.
    pub fn normalize(s: &str) -> String {
        s.nfc().collect::<String>()
    }

    /// Uppercase the first character, leaving the rest untouched.
    pub fn capitalize_first(s: &str) -> String {
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}
