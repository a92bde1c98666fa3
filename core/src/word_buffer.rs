//! Word buffer with cursor tracking for the word being composed.
//!
//! The word buffer stores the characters the user typed for the current word
//! together with the nearby-key hints reported for each keystroke. It is
//! separate from the document: the composer mirrors `typed_word()` into the
//! document's composing region after every edit.
//!
//! All offsets are `char` offsets.

/// Characters of the word being composed plus per-character key hints.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WordBuffer {
    chars: Vec<char>,
    alternates: Vec<Vec<char>>,
    cursor: usize,
    first_char_capitalized: bool,
    preferred_word: Option<String>,
}

impl WordBuffer {
    /// Create a new empty word buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a character at the cursor together with its nearby-key hints.
    ///
    /// The hints are what the oracle uses to reward substitutions between
    /// neighbouring keys. When `nearby` is empty the character itself is
    /// recorded as its only hint.
    pub fn add(&mut self, ch: char, nearby: &[char]) {
        let hints = if nearby.is_empty() {
            vec![ch]
        } else {
            nearby.to_vec()
        };
        self.chars.insert(self.cursor, ch);
        self.alternates.insert(self.cursor, hints);
        self.cursor += 1;
        // the composed text changed, a previously resolved word is stale
        self.preferred_word = None;
    }

    /// Delete the character before the cursor (backspace).
    /// Returns true if a character was deleted.
    pub fn delete_last(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.chars.remove(self.cursor);
        self.alternates.remove(self.cursor);
        self.preferred_word = None;
        if self.chars.is_empty() {
            self.first_char_capitalized = false;
        }
        true
    }

    /// Move the cursor inside the word. Offsets past the end are clamped.
    /// Returns true if the cursor moved.
    pub fn set_cursor_position(&mut self, offset: usize) -> bool {
        let offset = offset.min(self.chars.len());
        if offset == self.cursor {
            return false;
        }
        self.cursor = offset;
        true
    }

    /// Clear the buffer before starting a new word.
    pub fn reset(&mut self) {
        self.chars.clear();
        self.alternates.clear();
        self.cursor = 0;
        self.first_char_capitalized = false;
        self.preferred_word = None;
    }

    /// The word exactly as typed.
    pub fn typed_word(&self) -> String {
        self.chars.iter().collect()
    }

    /// The typed characters.
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Nearby-key hints recorded for the character at `index`.
    pub fn alternates_at(&self, index: usize) -> &[char] {
        self.alternates.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of typed characters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Cursor offset inside the word (0..=len).
    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    pub fn is_first_char_capitalized(&self) -> bool {
        self.first_char_capitalized
    }

    pub fn set_first_char_capitalized(&mut self, capitalized: bool) {
        self.first_char_capitalized = capitalized;
    }

    /// True when a majority of the typed characters are uppercase.
    pub fn is_mostly_caps(&self) -> bool {
        let caps = self.chars.iter().filter(|c| c.is_uppercase()).count();
        caps * 2 > self.chars.len()
    }

    /// The word the composer will commit on a default accept, if resolved.
    pub fn preferred_word(&self) -> Option<&str> {
        self.preferred_word.as_deref()
    }

    pub fn set_preferred_word(&mut self, word: Option<String>) {
        self.preferred_word = word;
    }
}
