//! Word list backed by an `fst::Map`.
//!
//! Keys are NFC-normalized lowercase words, values are corpus frequencies.
//! The map answers exact lookups, prefix completions and bounded Levenshtein
//! searches without materializing the vocabulary.
//!
//! Word lists load either from a compiled `.fst` file or from a plain text
//! file with one `word [frequency]` entry per line (`#` starts a comment).

use anyhow::Context;
use fst::automaton::{Levenshtein, Str};
use fst::{Automaton, IntoStreamer, Map, Streamer};
use libcompose_core::utils::normalize;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

static LINE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^\s*([^\s#]+)(?:\s+(\d+))?\s*(?:#.*)?$").ok());

/// Lookup key for `word`.
pub fn word_key(word: &str) -> String {
    normalize(&word.to_lowercase())
}

/// Immutable vocabulary with frequencies.
#[derive(Default)]
pub struct WordList {
    map: Map<Vec<u8>>,
}

impl std::fmt::Debug for WordList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordList").field("len", &self.len()).finish()
    }
}

impl WordList {
    /// Empty word list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(word, frequency)` pairs. Duplicate keys keep the highest
    /// frequency.
    pub fn from_pairs<I, S>(pairs: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let mut sorted: BTreeMap<String, u64> = BTreeMap::new();
        for (word, freq) in pairs {
            let key = word_key(word.as_ref());
            if key.is_empty() {
                continue;
            }
            let slot = sorted.entry(key).or_insert(0);
            *slot = (*slot).max(freq);
        }
        let map = Map::from_iter(sorted)?;
        Ok(Self { map })
    }

    /// Parse a plain text word list. Lines without a frequency count once.
    pub fn from_text(text: &str) -> anyhow::Result<Self> {
        let mut pairs = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let Some(caps) = LINE.as_ref().and_then(|re| re.captures(line)) else {
                warn!(line = lineno + 1, "skipping malformed word list entry");
                continue;
            };
            let freq = caps
                .get(2)
                .and_then(|m| m.as_str().parse::<u64>().ok())
                .unwrap_or(1);
            pairs.push((caps[1].to_string(), freq));
        }
        Self::from_pairs(pairs)
    }

    /// Wrap a compiled fst map.
    pub fn from_fst_bytes(bytes: Vec<u8>) -> anyhow::Result<Self> {
        Ok(Self {
            map: Map::new(bytes)?,
        })
    }

    /// Load from a `.fst` file or a text word list.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let list = if path.extension().is_some_and(|ext| ext == "fst") {
            let bytes = std::fs::read(path)
                .with_context(|| format!("reading word list {}", path.display()))?;
            Self::from_fst_bytes(bytes)?
        } else {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading word list {}", path.display()))?;
            Self::from_text(&text)?
        };
        debug!(path = %path.display(), words = list.len(), "loaded word list");
        Ok(list)
    }

    /// Write the compiled map so it can be loaded without rebuilding.
    pub fn save_fst<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        std::fs::write(path, self.map.as_fst().as_bytes())?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.map.contains_key(word_key(word))
    }

    pub fn frequency(&self, word: &str) -> Option<u64> {
        self.map.get(word_key(word))
    }

    /// Words strictly longer than `prefix` that start with it, most frequent
    /// first.
    pub fn completions(&self, prefix: &str, limit: usize) -> Vec<(String, u64)> {
        let key = word_key(prefix);
        if key.is_empty() {
            return Vec::new();
        }
        let automaton = Str::new(&key).starts_with();
        let mut out = collect(self.map.search(automaton).into_stream());
        out.retain(|(word, _)| *word != key);
        out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        out.truncate(limit);
        out
    }

    /// Words within `distance` edits of `word`, excluding `word` itself.
    pub fn within_distance(&self, word: &str, distance: u32) -> Vec<(String, u64)> {
        let key = word_key(word);
        let automaton = match Levenshtein::new(&key, distance) {
            Ok(automaton) => automaton,
            Err(e) => {
                warn!(word = %key, distance, error = %e, "levenshtein automaton not built");
                return Vec::new();
            }
        };
        let mut out = collect(self.map.search(automaton).into_stream());
        out.retain(|(candidate, _)| *candidate != key);
        out
    }

    /// Small built-in English vocabulary used by the demo CLI and tests.
    pub fn demo() -> Arc<WordList> {
        Arc::clone(&DEMO)
    }
}

fn collect<S>(mut stream: S) -> Vec<(String, u64)>
where
    S: for<'a> Streamer<'a, Item = (&'a [u8], u64)>,
{
    let mut out = Vec::new();
    while let Some((key, value)) = stream.next() {
        out.push((String::from_utf8_lossy(key).into_owned(), value));
    }
    out
}

static DEMO: Lazy<Arc<WordList>> = Lazy::new(|| {
    let list = WordList::from_pairs(DEMO_WORDS.iter().copied()).unwrap_or_else(|e| {
        warn!(error = %e, "demo word list not built");
        WordList::new()
    });
    Arc::new(list)
});

const DEMO_WORDS: &[(&str, u64)] = &[
    ("the", 1_000_000),
    ("to", 900_000),
    ("and", 850_000),
    ("of", 800_000),
    ("a", 780_000),
    ("in", 600_000),
    ("is", 500_000),
    ("it", 480_000),
    ("you", 470_000),
    ("that", 450_000),
    ("he", 300_000),
    ("was", 290_000),
    ("for", 280_000),
    ("on", 270_000),
    ("are", 260_000),
    ("with", 250_000),
    ("as", 240_000),
    ("i", 230_000),
    ("his", 220_000),
    ("they", 210_000),
    ("be", 200_000),
    ("at", 190_000),
    ("one", 180_000),
    ("have", 170_000),
    ("this", 160_000),
    ("from", 150_000),
    ("or", 140_000),
    ("had", 130_000),
    ("by", 120_000),
    ("word", 110_000),
    ("but", 100_000),
    ("what", 95_000),
    ("some", 90_000),
    ("we", 88_000),
    ("can", 86_000),
    ("out", 84_000),
    ("other", 82_000),
    ("were", 80_000),
    ("all", 78_000),
    ("there", 76_000),
    ("when", 74_000),
    ("up", 72_000),
    ("use", 70_000),
    ("your", 68_000),
    ("how", 66_000),
    ("said", 64_000),
    ("an", 62_000),
    ("each", 60_000),
    ("she", 58_000),
    ("which", 56_000),
    ("do", 54_000),
    ("their", 52_000),
    ("time", 50_000),
    ("if", 48_000),
    ("will", 46_000),
    ("way", 44_000),
    ("about", 42_000),
    ("many", 40_000),
    ("then", 38_000),
    ("them", 36_000),
    ("would", 34_000),
    ("write", 32_000),
    ("like", 30_000),
    ("so", 29_000),
    ("these", 28_000),
    ("her", 27_000),
    ("long", 26_000),
    ("make", 25_000),
    ("thing", 24_000),
    ("see", 23_000),
    ("him", 22_000),
    ("two", 21_000),
    ("has", 20_000),
    ("look", 19_000),
    ("more", 18_000),
    ("day", 17_000),
    ("could", 16_000),
    ("go", 15_000),
    ("come", 14_000),
    ("did", 13_500),
    ("number", 13_000),
    ("sound", 12_500),
    ("no", 12_000),
    ("most", 11_500),
    ("people", 11_000),
    ("my", 10_500),
    ("over", 10_000),
    ("know", 9_500),
    ("water", 9_000),
    ("than", 8_800),
    ("call", 8_600),
    ("first", 8_400),
    ("who", 8_200),
    ("may", 8_000),
    ("down", 7_800),
    ("side", 7_600),
    ("been", 7_400),
    ("now", 7_200),
    ("find", 7_000),
    ("help", 6_800),
    ("hello", 6_500),
    ("world", 6_200),
    ("work", 6_000),
    ("good", 5_800),
    ("great", 5_600),
    ("keyboard", 5_400),
    ("please", 5_200),
    ("thanks", 5_000),
    ("don't", 4_800),
    ("can't", 4_600),
    ("it's", 4_400),
    ("today", 4_200),
    ("tomorrow", 4_000),
    ("morning", 3_800),
    ("night", 3_600),
    ("text", 3_400),
    ("type", 3_200),
    ("typing", 3_000),
    ("quick", 2_800),
    ("brown", 2_600),
    ("fox", 2_400),
    ("jumps", 2_200),
    ("lazy", 2_000),
    ("dog", 1_900),
    ("held", 1_800),
    ("hell", 1_700),
    ("hero", 1_600),
    ("ten", 1_500),
    ("tea", 1_400),
    ("message", 1_300),
    ("meeting", 1_200),
];
