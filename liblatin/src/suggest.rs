//! Suggestion oracle for Latin-script languages.
//!
//! `Suggest` ranks two kinds of candidates for the word being composed:
//! completions (dictionary words that extend the typed prefix) and
//! corrections (words within a few edits of it). Corrections are scored with
//! an edit distance in which substituting a key by one of its neighbours
//! costs less than an arbitrary substitution, using the per-character hints
//! recorded in the `WordBuffer`.
//!
//! Dictionary lookups for a typed key are kept in an LRU cache; learned words
//! from the shared `AutoDictionary` are merged in on every call so that a
//! freshly learned word shows up immediately.

use crate::config::LatinConfig;
use crate::lexicon::{word_key, WordList};
use libcompose_core::utils::capitalize_first;
use libcompose_core::{
    AutoDictionary, CorrectionMode, DictionaryLearner, SuggestionOracle, WordBuffer,
};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::trace;

/// Substitution cost between neighbouring keys.
const NEAR_KEY_COST: f64 = 0.5;
/// Score lost per weighted edit.
const EDIT_PENALTY: f64 = 2.5;
/// Score lost per character a completion adds.
const COMPLETION_PENALTY: f64 = 0.3;
/// Weight of the log frequency in the score.
const FREQUENCY_WEIGHT: f64 = 0.5;
/// Frequency multiplier for words learned from the user.
const LEARNED_WORD_BOOST: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Kind {
    Completion,
    Correction { cost: f64 },
}

#[derive(Debug, Clone)]
struct Ranked {
    word: String,
    kind: Kind,
    score: f64,
}

/// Word suggestions from a `WordList` plus learned words.
pub struct Suggest {
    words: Arc<WordList>,
    learned: Option<AutoDictionary>,
    mode: CorrectionMode,
    max_suggestions: usize,
    max_edit_distance: u32,
    min_word_length_for_correction: usize,
    auto_correct_threshold: f64,
    cache: LruCache<String, Vec<(String, u64)>>,
    cache_hits: usize,
    cache_misses: usize,
    has_correction: bool,
}

impl Suggest {
    /// Create an oracle with default ranking limits.
    pub fn new(words: Arc<WordList>) -> Self {
        Self::from_config(words, &LatinConfig::default())
    }

    pub fn from_config(words: Arc<WordList>, config: &LatinConfig) -> Self {
        let capacity = NonZeroUsize::new(config.suggestion_cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            words,
            learned: None,
            mode: config.base().correction_mode(),
            max_suggestions: config.max_suggestions,
            max_edit_distance: config.max_edit_distance,
            min_word_length_for_correction: config.min_word_length_for_correction,
            auto_correct_threshold: config.auto_correct_threshold,
            cache: LruCache::new(capacity),
            cache_hits: 0,
            cache_misses: 0,
            has_correction: false,
        }
    }

    /// Merge words learned into `dictionary` into suggestions and validity.
    pub fn with_learned_words(mut self, dictionary: AutoDictionary) -> Self {
        self.learned = Some(dictionary);
        self
    }

    pub fn words(&self) -> &WordList {
        &self.words
    }

    /// Cache hits and misses so far.
    pub fn cache_stats(&self) -> (usize, usize) {
        (self.cache_hits, self.cache_misses)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Dictionary candidates for `key`: completions, then words within the
    /// edit distance allowed for its length.
    fn lookup(&mut self, key: &str) -> Vec<(String, u64)> {
        if let Some(cached) = self.cache.get(key) {
            self.cache_hits += 1;
            return cached.clone();
        }
        self.cache_misses += 1;

        let len = key.chars().count();
        let mut pool = self.words.completions(key, self.max_suggestions * 4);
        if len >= self.min_word_length_for_correction {
            let distance = if len <= 2 { 1 } else { self.max_edit_distance };
            pool.extend(self.words.within_distance(key, distance));
        }
        self.cache.put(key.to_string(), pool.clone());
        pool
    }

    fn learned_pool(&self) -> Vec<(String, u64)> {
        let Some(dictionary) = self.learned.as_ref() else {
            return Vec::new();
        };
        dictionary
            .learned_words()
            .into_iter()
            .map(|word| {
                let freq = dictionary.frequency(&word).saturating_mul(LEARNED_WORD_BOOST);
                (word_key(&word), freq)
            })
            .collect()
    }

    fn rank(&self, key: &str, word: &WordBuffer, pool: Vec<(String, u64)>) -> Vec<Ranked> {
        let typed: Vec<char> = key.chars().collect();
        let hints: Vec<Vec<char>> = (0..word.len())
            .map(|i| {
                word.alternates_at(i)
                    .iter()
                    .flat_map(|c| c.to_lowercase())
                    .collect()
            })
            .collect();
        let corrections_allowed = typed.len() >= self.min_word_length_for_correction;

        let mut ranked: Vec<Ranked> = Vec::new();
        for (candidate, freq) in pool {
            if candidate == key || ranked.iter().any(|r| r.word == candidate) {
                continue;
            }
            let chars: Vec<char> = candidate.chars().collect();
            let base = FREQUENCY_WEIGHT * (freq as f64 + 1.0).ln();
            let entry = if candidate.starts_with(key) {
                let extra = (chars.len() - typed.len()) as f64;
                Ranked {
                    word: candidate,
                    kind: Kind::Completion,
                    score: base - COMPLETION_PENALTY * extra,
                }
            } else if corrections_allowed {
                let cost = weighted_distance(&typed, &hints, &chars);
                if cost > self.max_edit_distance as f64 {
                    continue;
                }
                Ranked {
                    word: candidate,
                    kind: Kind::Correction { cost },
                    score: base - EDIT_PENALTY * cost,
                }
            } else {
                continue;
            };
            ranked.push(entry);
        }

        if !self.mode.full_suggestions {
            ranked.retain(|r| {
                matches!(r.kind, Kind::Correction { cost } if cost <= self.auto_correct_threshold)
            });
        }
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.word.cmp(&b.word)));
        ranked.truncate(self.max_suggestions);
        ranked
    }
}

impl SuggestionOracle for Suggest {
    fn suggestions(&mut self, word: &WordBuffer) -> Vec<String> {
        let typed = word.typed_word();
        let key = word_key(&typed);
        self.has_correction = false;
        if key.is_empty() || !self.mode.allows_learning() {
            return vec![typed];
        }

        let mut pool = self.lookup(&key);
        let key_len = key.chars().count();
        let max_distance = self.max_edit_distance as usize;
        pool.extend(self.learned_pool().into_iter().filter(|(w, _)| {
            w.starts_with(&key) || w.chars().count().abs_diff(key_len) <= max_distance
        }));
        let ranked = self.rank(&key, word, pool);

        self.has_correction = matches!(
            ranked.first().map(|r| r.kind),
            Some(Kind::Correction { cost }) if cost <= self.auto_correct_threshold
        );
        trace!(
            %typed,
            count = ranked.len(),
            has_correction = self.has_correction,
            "ranked suggestions"
        );

        let all_caps = typed.chars().count() > 1 && typed.chars().all(|c| !c.is_lowercase());
        let first_cap = typed.chars().next().is_some_and(char::is_uppercase);
        let mut out = Vec::with_capacity(ranked.len() + 1);
        out.push(typed);
        out.extend(ranked.into_iter().map(|r| {
            if all_caps {
                r.word.to_uppercase()
            } else if first_cap {
                capitalize_first(&r.word)
            } else {
                r.word
            }
        }));
        out
    }

    fn has_minimal_correction(&self) -> bool {
        self.has_correction
    }

    fn is_valid_word(&self, word: &str) -> bool {
        if word.is_empty() {
            return false;
        }
        self.words.contains(word)
            || self
                .learned
                .as_ref()
                .is_some_and(|dictionary| dictionary.is_valid_word(word))
    }

    fn set_correction_mode(&mut self, mode: CorrectionMode) {
        self.mode = mode;
    }

    fn correction_mode(&self) -> CorrectionMode {
        self.mode
    }
}

/// Optimal string alignment distance where substituting `typed[i]` with one
/// of `hints[i]` costs `NEAR_KEY_COST`.
pub(crate) fn weighted_distance(typed: &[char], hints: &[Vec<char>], candidate: &[char]) -> f64 {
    let (n, m) = (typed.len(), candidate.len());
    let mut d = vec![vec![0.0f64; m + 1]; n + 1];
    for (i, row) in d.iter_mut().enumerate() {
        row[0] = i as f64;
    }
    for j in 0..=m {
        d[0][j] = j as f64;
    }
    for i in 1..=n {
        for j in 1..=m {
            let (a, b) = (typed[i - 1], candidate[j - 1]);
            let substitution = if a == b {
                0.0
            } else if hints.get(i - 1).is_some_and(|h| h.contains(&b)) {
                NEAR_KEY_COST
            } else {
                1.0
            };
            let mut best = (d[i - 1][j] + 1.0)
                .min(d[i][j - 1] + 1.0)
                .min(d[i - 1][j - 1] + substitution);
            if i > 1 && j > 1 && a == candidate[j - 2] && typed[i - 2] == b {
                best = best.min(d[i - 2][j - 2] + 1.0);
            }
            d[i][j] = best;
        }
    }
    d[n][m]
}
