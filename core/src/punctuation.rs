//! Punctuation and space normalization after separators.
//!
//! These rules look at the text right before the cursor and rewrite it in a
//! single batch. Each returns true when it changed the document. A rule never
//! matches its own output, so applying one twice is a no-op.

use crate::document::{BatchEdit, Document};
use crate::layout::KeyboardLayout;
use tracing::debug;

fn tail<D: Document + ?Sized>(doc: &D, n: usize) -> Vec<char> {
    doc.text_before_cursor(n).chars().collect()
}

fn rewrite<D: Document + ?Sized>(doc: &mut D, delete: usize, text: &str) {
    let mut batch = BatchEdit::begin(doc);
    batch.delete_surrounding(delete, 0);
    batch.insert_or_commit_text(text);
}

/// `"word ,"` becomes `"word, "`: a sentence separator typed after an
/// auto-inserted space moves before the space.
pub fn swap_punctuation_and_space<D: Document + ?Sized>(
    doc: &mut D,
    layout: &dyn KeyboardLayout,
) -> bool {
    match tail(doc, 2)[..] {
        [' ', separator] if layout.is_sentence_separator(separator) => {
            debug!(%separator, "swapping punctuation and space");
            rewrite(doc, 2, &format!("{} ", separator));
            true
        }
        _ => false,
    }
}

/// `". ."` becomes `".. "` so periods typed after a swapped period build an
/// ellipsis.
pub fn reswap_period_and_space<D: Document + ?Sized>(doc: &mut D) -> bool {
    match tail(doc, 3)[..] {
        ['.', ' ', '.'] => {
            debug!("re-swapping period and space");
            rewrite(doc, 3, ".. ");
            true
        }
        _ => false,
    }
}

/// `"word  "` becomes `"word. "`.
pub fn double_space_to_period<D: Document + ?Sized>(doc: &mut D) -> bool {
    match tail(doc, 3)[..] {
        [last, ' ', ' '] if last.is_alphanumeric() => {
            debug!("double space to period");
            rewrite(doc, 2, ". ");
            true
        }
        _ => false,
    }
}

/// Drop a single trailing space before the cursor.
pub fn remove_trailing_space<D: Document + ?Sized>(doc: &mut D) -> bool {
    if doc.text_before_cursor(1) == " " {
        doc.delete_surrounding(1, 0);
        true
    } else {
        false
    }
}
