//! liblatin crate root
//!
//! Latin-script language pack for `libcompose-core`: keyboard layouts with
//! neighbouring-key tables, an fst-backed word list and a suggestion oracle
//! that completes and corrects the word being typed.
//!
//! Public API exported here:
//! - `LatinConfig` / `LayoutKind` from `config`
//! - `LatinLayout` from `layout`
//! - `WordList` from `lexicon`
//! - `Suggest` from `suggest`
//! - `create_composer` to wire them into a `Composer`

pub mod config;
pub mod layout;
pub mod lexicon;
pub mod suggest;

// Re-export the composition types callers need alongside this crate.
pub use libcompose_core::{
    AutoDictionary, CandidateList, Composer, CorrectionPhase, Document, EditorInfo, InputPurpose,
    LearningPolicy, MemoryDocument, ShiftState, UserDict,
};

pub use config::{LatinConfig, LayoutKind};
pub use layout::LatinLayout;
pub use lexicon::WordList;
pub use suggest::Suggest;

use std::sync::Arc;
use tracing::debug;

/// Open the learned-word dictionary named by the config, in memory when no
/// path is configured.
pub fn open_dictionary(config: &LatinConfig) -> anyhow::Result<AutoDictionary> {
    let policy = config.base().learning_policy();
    let store = match config.user_dictionary.as_ref() {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            debug!(path = %path.display(), "opening user dictionary");
            UserDict::new_redb(path)?
        }
        None => UserDict::new_in_memory(),
    };
    Ok(AutoDictionary::new(store, policy))
}

/// Build a composer for `config` over `words`.
///
/// `dictionary` is shared: the composer teaches it the words the user
/// insists on, and the oracle treats what it learned as valid.
pub fn create_composer<D: Document>(
    config: &LatinConfig,
    words: Arc<WordList>,
    dictionary: AutoDictionary,
) -> Composer<D> {
    let layout = LatinLayout::new(config.layout);
    let oracle = Suggest::from_config(words, config).with_learned_words(dictionary.clone());
    Composer::new(config.base().clone(), Box::new(layout))
        .with_oracle(Box::new(oracle))
        .with_learner(Box::new(dictionary))
}
