//! Latin keyboard layouts.
//!
//! Each variant knows its letter rows (used to derive which keys sit next to
//! each other) and how to translate a key reported by a physical keyboard at
//! its US QWERTY position into the character printed on that key.

use crate::config::LayoutKind;
use libcompose_core::{CharClass, DefaultLayout, KeyboardLayout};
use once_cell::sync::Lazy;
use phf::phf_map;
use std::collections::HashMap;

const QWERTY_ROWS: [&str; 3] = ["qwertyuiop", "asdfghjkl", "zxcvbnm"];
const AZERTY_ROWS: [&str; 3] = ["azertyuiop", "qsdfghjklm", "wxcvbn"];
const DVORAK_ROWS: [&str; 3] = ["',.pyfgcrl", "aoeuidhtns", ";qjkxbmwvz"];

const SENTENCE_SEPARATORS: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}'];

/// US positions that print something else on AZERTY.
static AZERTY_PHYSICAL: phf::Map<char, char> = phf_map! {
    'q' => 'a',
    'a' => 'q',
    'w' => 'z',
    'z' => 'w',
    ';' => 'm',
    'm' => ',',
};

/// US positions that print something else on Dvorak.
static DVORAK_PHYSICAL: phf::Map<char, char> = phf_map! {
    'q' => '\'', 'w' => ',', 'e' => '.', 'r' => 'p', 't' => 'y',
    'y' => 'f', 'u' => 'g', 'i' => 'c', 'o' => 'r', 'p' => 'l',
    's' => 'o', 'd' => 'e', 'f' => 'u', 'g' => 'i', 'h' => 'd',
    'j' => 'h', 'k' => 't', 'l' => 'n', ';' => 's',
    'z' => ';', 'x' => 'q', 'c' => 'j', 'v' => 'k', 'b' => 'x',
    'n' => 'b', ',' => 'w', '.' => 'v', '/' => 'z',
};

/// Letters adjacent to each letter, derived from the staggered rows.
fn neighbor_table(rows: &[&str]) -> HashMap<char, Vec<char>> {
    let rows: Vec<Vec<char>> = rows.iter().map(|r| r.chars().collect()).collect();
    let at = |row: usize, col: isize| -> Option<char> {
        let row = rows.get(row)?;
        usize::try_from(col).ok().and_then(|c| row.get(c)).copied()
    };

    let mut table = HashMap::new();
    for (r, row) in rows.iter().enumerate() {
        for (c, &key) in row.iter().enumerate() {
            if !key.is_alphabetic() {
                continue;
            }
            let c = c as isize;
            let mut near = vec![at(r, c - 1), at(r, c + 1)];
            if r > 0 {
                near.extend([at(r - 1, c), at(r - 1, c + 1)]);
            }
            near.extend([at(r + 1, c - 1), at(r + 1, c)]);
            let near: Vec<char> = near
                .into_iter()
                .flatten()
                .filter(|ch| ch.is_alphabetic())
                .collect();
            table.insert(key, near);
        }
    }
    table
}

static QWERTY_NEIGHBORS: Lazy<HashMap<char, Vec<char>>> =
    Lazy::new(|| neighbor_table(&QWERTY_ROWS));
static AZERTY_NEIGHBORS: Lazy<HashMap<char, Vec<char>>> =
    Lazy::new(|| neighbor_table(&AZERTY_ROWS));
static DVORAK_NEIGHBORS: Lazy<HashMap<char, Vec<char>>> =
    Lazy::new(|| neighbor_table(&DVORAK_ROWS));

/// A Latin keyboard layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LatinLayout {
    kind: LayoutKind,
}

impl LatinLayout {
    pub fn new(kind: LayoutKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> LayoutKind {
        self.kind
    }

    fn neighbors(&self) -> &'static HashMap<char, Vec<char>> {
        match self.kind {
            LayoutKind::Qwerty => &*QWERTY_NEIGHBORS,
            LayoutKind::Azerty => &*AZERTY_NEIGHBORS,
            LayoutKind::Dvorak => &*DVORAK_NEIGHBORS,
        }
    }

    fn physical(&self) -> Option<&'static phf::Map<char, char>> {
        match self.kind {
            LayoutKind::Qwerty => None,
            LayoutKind::Azerty => Some(&AZERTY_PHYSICAL),
            LayoutKind::Dvorak => Some(&DVORAK_PHYSICAL),
        }
    }
}

fn with_case_of(template: char, ch: char) -> char {
    if template.is_uppercase() {
        ch.to_uppercase().next().unwrap_or(ch)
    } else {
        ch
    }
}

impl KeyboardLayout for LatinLayout {
    fn name(&self) -> &str {
        match self.kind {
            LayoutKind::Qwerty => "qwerty",
            LayoutKind::Azerty => "azerty",
            LayoutKind::Dvorak => "dvorak",
        }
    }

    fn classify_char(&self, ch: char) -> CharClass {
        DefaultLayout.classify_char(ch)
    }

    fn sentence_separators(&self) -> &[char] {
        SENTENCE_SEPARATORS
    }

    fn translate_physical_key(&self, key: char) -> char {
        let lower = key.to_ascii_lowercase();
        match self.physical().and_then(|map| map.get(&lower)) {
            Some(&mapped) => with_case_of(key, mapped),
            None => key,
        }
    }

    fn nearby_keys(&self, ch: char) -> Vec<char> {
        let lower = ch.to_lowercase().next().unwrap_or(ch);
        let mut keys = vec![ch];
        if let Some(near) = self.neighbors().get(&lower) {
            keys.extend(near.iter().map(|&n| with_case_of(ch, n)));
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qwerty_neighbors_follow_row_stagger() {
        let layout = LatinLayout::new(LayoutKind::Qwerty);
        assert_eq!(layout.nearby_keys('a'), vec!['a', 's', 'q', 'w', 'z']);
        assert_eq!(layout.nearby_keys('s'), vec!['s', 'a', 'd', 'w', 'e', 'z', 'x']);
        assert_eq!(layout.nearby_keys('p'), vec!['p', 'o', 'l']);
        assert_eq!(layout.nearby_keys('M'), vec!['M', 'N', 'J', 'K']);
    }

    #[test]
    fn character_classes_match_default_layout() {
        for kind in [LayoutKind::Qwerty, LayoutKind::Azerty, LayoutKind::Dvorak] {
            let layout = LatinLayout::new(kind);
            for ch in ['a', 'É', '\'', '’', '-', ' ', ',', '7'] {
                assert_eq!(layout.classify_char(ch), DefaultLayout.classify_char(ch));
            }
        }
        let layout = LatinLayout::default();
        assert!(layout.is_inner_word_char('\''));
        assert!(!layout.is_word_start_char('\''));
        assert!(layout.is_word_separator(',', true));
    }

    #[test]
    fn unknown_keys_have_no_neighbors() {
        let layout = LatinLayout::default();
        assert_eq!(layout.nearby_keys('7'), vec!['7']);
        assert_eq!(layout.nearby_keys('é'), vec!['é']);
    }

    #[test]
    fn azerty_translates_swapped_keys() {
        let layout = LatinLayout::new(LayoutKind::Azerty);
        assert_eq!(layout.translate_physical_key('q'), 'a');
        assert_eq!(layout.translate_physical_key('W'), 'Z');
        assert_eq!(layout.translate_physical_key('e'), 'e');
        assert!(layout.nearby_keys('a').contains(&'z'));
    }

    #[test]
    fn dvorak_neighbors_skip_punctuation_keys() {
        let layout = LatinLayout::new(LayoutKind::Dvorak);
        assert_eq!(layout.translate_physical_key('d'), 'e');
        assert_eq!(layout.translate_physical_key('a'), 'a');
        assert_eq!(layout.nearby_keys('a'), vec!['a', 'o']);
    }

    #[test]
    fn apostrophe_is_inner_word() {
        let layout = LatinLayout::default();
        assert_eq!(layout.classify_char('\''), CharClass::InnerWord);
        assert!(layout.is_word_separator(' ', true));
        assert!(layout.is_sentence_separator('?'));
        assert_eq!(layout.name(), "qwerty");
    }
}
