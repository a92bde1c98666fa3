//! Latin-specific configuration that extends the base `Config` from core.
//!
//! This configuration includes:
//! - All generic options from `libcompose_core::Config` (flattened via serde)
//! - The keyboard layout variant
//! - Ranking limits for the suggestion oracle
//! - An optional on-disk user dictionary
//!
//! # Example
//!
//! ```rust
//! use liblatin::{LatinConfig, LayoutKind};
//!
//! let config = LatinConfig::from_toml_str("layout = \"azerty\"\nauto_correct = false\n").unwrap();
//! assert_eq!(config.layout, LayoutKind::Azerty);
//! assert!(!config.base().auto_correct);
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Keyboard layout variants shipped with this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    #[default]
    Qwerty,
    Azerty,
    Dvorak,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LatinConfig {
    /// Base configuration fields (auto-correct, punctuation rules, delays, learning)
    #[serde(flatten)]
    pub base: libcompose_core::Config,

    pub layout: LayoutKind,

    /// Suggestions returned after the typed word
    pub max_suggestions: usize,
    /// Largest edit distance searched for corrections
    pub max_edit_distance: u32,
    /// Shorter words only get completions, never corrections
    pub min_word_length_for_correction: usize,
    /// Weighted edit cost up to which the top correction may replace the
    /// typed word on a separator
    pub auto_correct_threshold: f64,
    /// Number of dictionary lookups kept in the LRU cache
    pub suggestion_cache_size: usize,

    /// redb file holding learned words; in-memory when unset
    pub user_dictionary: Option<PathBuf>,
}

impl Default for LatinConfig {
    fn default() -> Self {
        Self {
            base: libcompose_core::Config::default(),
            layout: LayoutKind::Qwerty,
            max_suggestions: 5,
            max_edit_distance: 2,
            min_word_length_for_correction: 2,
            auto_correct_threshold: 1.0,
            suggestion_cache_size: 256,
            user_dictionary: None,
        }
    }
}

impl LatinConfig {
    /// Convert this config into the base config for use with `Composer::new()`
    pub fn into_base(self) -> libcompose_core::Config {
        self.base
    }

    /// Get a reference to the base config
    pub fn base(&self) -> &libcompose_core::Config {
        &self.base
    }

    /// Get a mutable reference to the base config
    pub fn base_mut(&mut self) -> &mut libcompose_core::Config {
        &mut self.base
    }

    pub fn load_toml<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
