//! Learned-word storage.
//!
//! - `InMemoryUserDict`: thread-safe map of word -> usage count.
//! - `RedbUserDict`: the same counts persisted with `redb`.
//! - `UserDict`: backend switch over the two.
//! - `AutoDictionary`: promotes words once their count reaches a threshold and
//!   implements `DictionaryLearner` for the composer.
//!
//! Words are stored NFC-normalized.
use crate::oracle::{AdditionKind, DictionaryLearner};
use crate::utils::normalize;
use ahash::AHashMap;
use redb::ReadableTable;
use std::sync::{Arc, RwLock};
use tracing::{debug, warn};

/// A thread-safe in-memory user dictionary.
#[derive(Clone, Debug, Default)]
pub struct InMemoryUserDict {
    inner: Arc<RwLock<AHashMap<String, u64>>>,
}

impl InMemoryUserDict {
    /// Create a new empty in-memory user dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the count of `word` by `delta`, returning the new count.
    pub fn learn_with_count(&self, word: &str, delta: u64) -> u64 {
        if let Ok(mut map) = self.inner.write() {
            let entry = map.entry(word.to_string()).or_insert(0);
            *entry = entry.saturating_add(delta);
            *entry
        } else {
            0
        }
    }

    /// Get the learned count for a word.
    pub fn frequency(&self, word: &str) -> u64 {
        if let Ok(map) = self.inner.read() {
            map.get(word).copied().unwrap_or(0)
        } else {
            0
        }
    }

    /// Remove a word. Returns true if it was present.
    pub fn remove(&self, word: &str) -> bool {
        if let Ok(mut map) = self.inner.write() {
            map.remove(word).is_some()
        } else {
            false
        }
    }

    /// Export a snapshot of the current data.
    pub fn snapshot(&self) -> AHashMap<String, u64> {
        if let Ok(map) = self.inner.read() {
            map.clone()
        } else {
            AHashMap::new()
        }
    }
}

/// Redb-backed user dictionary.
///
/// Every update runs in its own write transaction.
pub struct RedbUserDict {
    db: redb::Database,
    path: std::path::PathBuf,
}

impl std::fmt::Debug for RedbUserDict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbUserDict")
            .field("path", &self.path)
            .finish()
    }
}

impl RedbUserDict {
    /// Table of learned words and their counts.
    const TABLE_DEF: redb::TableDefinition<'static, &'static str, u64> =
        redb::TableDefinition::new("learned_words");

    /// Create or open a redb database at `path`.
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> Result<Self, redb::Error> {
        if let Some(parent) = path.as_ref().parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let db = redb::Database::create(path.as_ref())?;
        Ok(RedbUserDict {
            db,
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Increment the count of `word` by `delta`, returning the new count.
    pub fn learn_with_count(&self, word: &str, delta: u64) -> Result<u64, redb::Error> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut table = write_txn.open_table(Self::TABLE_DEF)?;
            let current = table.get(word)?.map(|v| v.value()).unwrap_or(0);
            let updated = current.saturating_add(delta);
            table.insert(word, updated)?;
            updated
        };
        write_txn.commit()?;
        Ok(updated)
    }

    /// Get the learned count for a word.
    pub fn frequency(&self, word: &str) -> Result<u64, redb::Error> {
        let read_txn = self.db.begin_read()?;
        let table = match read_txn.open_table(Self::TABLE_DEF) {
            Ok(table) => table,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(0),
            Err(e) => return Err(e.into()),
        };
        Ok(table.get(word)?.map(|v| v.value()).unwrap_or(0))
    }

    /// Remove a word. Returns true if it was present.
    pub fn remove(&self, word: &str) -> Result<bool, redb::Error> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(Self::TABLE_DEF)?;
            let previous = table.remove(word)?;
            previous.is_some()
        };
        write_txn.commit()?;
        Ok(removed)
    }

    /// Snapshot full contents.
    pub fn snapshot(&self) -> Result<AHashMap<String, u64>, redb::Error> {
        let mut out = AHashMap::new();
        let read_txn = self.db.begin_read()?;
        let table = match read_txn.open_table(Self::TABLE_DEF) {
            Ok(table) => table,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(out),
            Err(e) => return Err(e.into()),
        };
        for item in table.iter()? {
            let (k, v) = item?;
            out.insert(k.value().to_string(), v.value());
        }
        Ok(out)
    }
}

/// Backend switch for learned-word storage.
#[derive(Clone, Debug)]
pub enum UserDict {
    InMemory(InMemoryUserDict),
    Redb(Arc<RedbUserDict>),
}

impl UserDict {
    /// Construct a default `InMemory` user dictionary.
    pub fn new_in_memory() -> Self {
        UserDict::InMemory(InMemoryUserDict::new())
    }

    /// Construct a `Redb`-backed user dictionary at the provided path.
    pub fn new_redb<P: AsRef<std::path::Path>>(path: P) -> Result<Self, redb::Error> {
        Ok(UserDict::Redb(Arc::new(RedbUserDict::new(path)?)))
    }

    /// Increment the count of `word`, returning the new count.
    pub fn learn_with_count(&self, word: &str, delta: u64) -> u64 {
        match self {
            UserDict::InMemory(m) => m.learn_with_count(word, delta),
            UserDict::Redb(r) => r.learn_with_count(word, delta).unwrap_or_else(|e| {
                warn!(error = %e, word, "failed to persist learned word");
                0
            }),
        }
    }

    pub fn frequency(&self, word: &str) -> u64 {
        match self {
            UserDict::InMemory(m) => m.frequency(word),
            UserDict::Redb(r) => r.frequency(word).unwrap_or(0),
        }
    }

    pub fn remove(&self, word: &str) -> bool {
        match self {
            UserDict::InMemory(m) => m.remove(word),
            UserDict::Redb(r) => r.remove(word).unwrap_or_else(|e| {
                warn!(error = %e, word, "failed to remove learned word");
                false
            }),
        }
    }

    pub fn snapshot(&self) -> AHashMap<String, u64> {
        match self {
            UserDict::InMemory(m) => m.snapshot(),
            UserDict::Redb(r) => r.snapshot().unwrap_or_default(),
        }
    }
}

impl Default for UserDict {
    fn default() -> Self {
        Self::new_in_memory()
    }
}

/// Weights deciding when a word counts as learned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LearningPolicy {
    pub typed_weight: u64,
    pub picked_weight: u64,
    /// Count at which a word becomes valid
    pub threshold: u64,
}

impl Default for LearningPolicy {
    fn default() -> Self {
        Self {
            typed_weight: 1,
            picked_weight: 3,
            threshold: 3,
        }
    }
}

impl LearningPolicy {
    fn weight(&self, kind: AdditionKind) -> u64 {
        match kind {
            AdditionKind::Typed => self.typed_weight,
            AdditionKind::Picked => self.picked_weight,
        }
    }
}

/// Dictionary of words learned from the user's own typing.
///
/// Cloning shares the underlying store, so the composer (as learner) and the
/// suggestion oracle (for validity) can hold the same dictionary.
#[derive(Clone, Debug, Default)]
pub struct AutoDictionary {
    store: UserDict,
    policy: LearningPolicy,
}

impl AutoDictionary {
    pub fn new(store: UserDict, policy: LearningPolicy) -> Self {
        Self { store, policy }
    }

    pub fn in_memory(policy: LearningPolicy) -> Self {
        Self::new(UserDict::new_in_memory(), policy)
    }

    pub fn policy(&self) -> LearningPolicy {
        self.policy
    }

    pub fn store(&self) -> &UserDict {
        &self.store
    }

    /// Usage count recorded for `word`.
    pub fn frequency(&self, word: &str) -> u64 {
        self.store.frequency(&normalize(word))
    }

    /// Words that reached the promotion threshold.
    pub fn learned_words(&self) -> Vec<String> {
        let mut words: Vec<String> = self
            .store
            .snapshot()
            .into_iter()
            .filter(|(_, count)| *count >= self.policy.threshold)
            .map(|(word, _)| word)
            .collect();
        words.sort();
        words
    }
}

impl DictionaryLearner for AutoDictionary {
    fn add_word(&self, word: &str, kind: AdditionKind) -> bool {
        let key = normalize(word);
        if key.is_empty() {
            return false;
        }
        let before = self.store.frequency(&key);
        let after = self.store.learn_with_count(&key, self.policy.weight(kind));
        let promoted = before < self.policy.threshold && after >= self.policy.threshold;
        debug!(word = %key, ?kind, count = after, promoted, "learned word");
        promoted
    }

    fn remove_word(&self, word: &str) {
        let key = normalize(word);
        if self.store.remove(&key) {
            debug!(word = %key, "forgot learned word");
        }
    }

    fn is_valid_word(&self, word: &str) -> bool {
        self.frequency(word) >= self.policy.threshold
    }
}
