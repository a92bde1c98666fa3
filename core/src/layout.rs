//! Keyboard layout capabilities.
//!
//! The composer never inspects concrete layout types. Everything it needs to
//! know about a layout (which characters start or continue a word, which ones
//! end a sentence, how physical keys map to characters) goes through the
//! `KeyboardLayout` trait. Language crates pick the implementation from
//! configuration.

/// Role of a character while typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// May begin a word (letters)
    WordStart,
    /// May appear inside a word but not begin one (apostrophe, hyphen)
    InnerWord,
    /// Ends a word
    Separator,
}

/// Capability interface implemented per layout variant.
pub trait KeyboardLayout {
    /// Short identifier, e.g. "qwerty".
    fn name(&self) -> &str;

    fn classify_char(&self, ch: char) -> CharClass;

    fn is_word_start_char(&self, ch: char) -> bool {
        self.classify_char(ch) == CharClass::WordStart
    }

    fn is_inner_word_char(&self, ch: char) -> bool {
        matches!(
            self.classify_char(ch),
            CharClass::WordStart | CharClass::InnerWord
        )
    }

    /// Whether `ch` ends a word. While composing, inner-word characters
    /// continue the word; otherwise only word-start characters do.
    fn is_word_separator(&self, ch: char, composing: bool) -> bool {
        if composing {
            !self.is_inner_word_char(ch)
        } else {
            !self.is_word_start_char(ch)
        }
    }

    /// Characters that end a sentence and attract the auto-inserted space.
    fn sentence_separators(&self) -> &[char];

    fn is_sentence_separator(&self, ch: char) -> bool {
        self.sentence_separators().contains(&ch)
    }

    /// Map a key reported by a physical keyboard (by its US position) to
    /// the character of this layout.
    fn translate_physical_key(&self, key: char) -> char {
        key
    }

    /// Keys adjacent to `ch`, `ch` itself first.
    fn nearby_keys(&self, ch: char) -> Vec<char> {
        vec![ch]
    }
}

const DEFAULT_SENTENCE_SEPARATORS: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}'];

/// Script-agnostic layout: alphabetic characters start words, apostrophes
/// and hyphens continue them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLayout;

impl KeyboardLayout for DefaultLayout {
    fn name(&self) -> &str {
        "default"
    }

    fn classify_char(&self, ch: char) -> CharClass {
        if ch.is_alphabetic() {
            CharClass::WordStart
        } else if matches!(ch, '\'' | '’' | '-') {
            CharClass::InnerWord
        } else {
            CharClass::Separator
        }
    }

    fn sentence_separators(&self) -> &[char] {
        DEFAULT_SENTENCE_SEPARATORS
    }
}
