//! Host document abstraction.
//!
//! The composer edits the focused text field only through the `Document`
//! trait. Offsets are in `char`s. Related edits are grouped between
//! `begin_batch` and `end_batch` so the host can apply them atomically;
//! `BatchEdit` scopes such a group and closes it on drop.
//!
//! `MemoryDocument` is an in-process implementation with the usual
//! composing-region semantics, used by tests and the command line demo.

use std::ops::{Deref, DerefMut, Range};

/// Text field the composer edits.
pub trait Document {
    /// Replace the composing region (or the selection when nothing is being
    /// composed) with `text` and finish composing. The cursor ends up after
    /// the inserted text.
    fn insert_or_commit_text(&mut self, text: &str);

    /// Replace the composing region (or the selection) with `text` and mark
    /// it as the new composing region. The cursor ends up after it.
    fn set_composing_region(&mut self, text: &str);

    /// Keep the composing text as regular text.
    fn finish_composing(&mut self);

    /// Delete `before` chars before the selection start and `after` chars
    /// after the selection end.
    fn delete_surrounding(&mut self, before: usize, after: usize);

    /// Move the selection. `start == end` places a plain cursor.
    fn set_cursor(&mut self, start: usize, end: usize);

    /// Up to `n` chars right before the selection start.
    fn text_before_cursor(&self, n: usize) -> String;

    /// Up to `n` chars right after the selection end.
    fn text_after_cursor(&self, n: usize) -> String;

    /// Selection start.
    fn cursor_position(&self) -> usize;

    fn begin_batch(&mut self);

    fn end_batch(&mut self);
}

/// Scoped batch edit. Ends the batch when dropped, including on early return.
pub struct BatchEdit<'a, D: Document + ?Sized> {
    document: &'a mut D,
}

impl<'a, D: Document + ?Sized> BatchEdit<'a, D> {
    pub fn begin(document: &'a mut D) -> Self {
        document.begin_batch();
        Self { document }
    }
}

impl<D: Document + ?Sized> Deref for BatchEdit<'_, D> {
    type Target = D;

    fn deref(&self) -> &D {
        self.document
    }
}

impl<D: Document + ?Sized> DerefMut for BatchEdit<'_, D> {
    fn deref_mut(&mut self) -> &mut D {
        self.document
    }
}

impl<D: Document + ?Sized> Drop for BatchEdit<'_, D> {
    fn drop(&mut self) {
        self.document.end_batch();
    }
}

/// In-memory text field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryDocument {
    text: Vec<char>,
    selection: (usize, usize),
    composing: Option<Range<usize>>,
    batch_depth: usize,
    completed_batches: usize,
}

impl MemoryDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document holding `text` with the cursor at its end.
    pub fn with_text(text: &str) -> Self {
        let text: Vec<char> = text.chars().collect();
        let end = text.len();
        Self {
            text,
            selection: (end, end),
            ..Self::default()
        }
    }

    pub fn text(&self) -> String {
        self.text.iter().collect()
    }

    pub fn selection(&self) -> (usize, usize) {
        self.selection
    }

    pub fn composing_range(&self) -> Option<Range<usize>> {
        self.composing.clone()
    }

    pub fn composing_text(&self) -> Option<String> {
        self.composing
            .as_ref()
            .map(|range| self.text[range.clone()].iter().collect())
    }

    /// Number of batches currently open.
    pub fn batch_depth(&self) -> usize {
        self.batch_depth
    }

    /// Number of outermost batches closed so far.
    pub fn completed_batches(&self) -> usize {
        self.completed_batches
    }

    fn remove(&mut self, range: Range<usize>) {
        let (a, b) = (range.start.min(self.text.len()), range.end.min(self.text.len()));
        if a >= b {
            return;
        }
        self.text.drain(a..b);
        let adjust = |pos: usize| {
            if pos <= a {
                pos
            } else if pos >= b {
                pos - (b - a)
            } else {
                a
            }
        };
        self.selection = (adjust(self.selection.0), adjust(self.selection.1));
        self.composing = self
            .composing
            .take()
            .map(|r| adjust(r.start)..adjust(r.end))
            .filter(|r| !r.is_empty());
    }

    /// Replace the composing region or selection with `text`, returning the
    /// range the text now occupies.
    fn replace_target(&mut self, text: &str) -> Range<usize> {
        let target = match self.composing.take() {
            Some(range) => range,
            None => self.selection.0..self.selection.1,
        };
        self.remove(target.clone());
        let start = target.start.min(self.text.len());
        let inserted: Vec<char> = text.chars().collect();
        let len = inserted.len();
        self.text.splice(start..start, inserted);
        self.selection = (start + len, start + len);
        start..start + len
    }
}

impl Document for MemoryDocument {
    fn insert_or_commit_text(&mut self, text: &str) {
        self.replace_target(text);
    }

    fn set_composing_region(&mut self, text: &str) {
        let range = self.replace_target(text);
        self.composing = Some(range).filter(|r| !r.is_empty());
    }

    fn finish_composing(&mut self) {
        self.composing = None;
    }

    fn delete_surrounding(&mut self, before: usize, after: usize) {
        let (start, end) = self.selection;
        let tail = end..(end + after).min(self.text.len());
        self.remove(tail);
        self.remove(start.saturating_sub(before)..start);
    }

    fn set_cursor(&mut self, start: usize, end: usize) {
        let len = self.text.len();
        let (start, end) = (start.min(len), end.min(len));
        self.selection = (start.min(end), start.max(end));
    }

    fn text_before_cursor(&self, n: usize) -> String {
        let start = self.selection.0;
        self.text[start.saturating_sub(n)..start].iter().collect()
    }

    fn text_after_cursor(&self, n: usize) -> String {
        let end = self.selection.1;
        self.text[end..(end + n).min(self.text.len())].iter().collect()
    }

    fn cursor_position(&self) -> usize {
        self.selection.0
    }

    fn begin_batch(&mut self) {
        self.batch_depth += 1;
    }

    fn end_batch(&mut self) {
        if self.batch_depth == 0 {
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth == 0 {
            self.completed_batches += 1;
        }
    }
}
