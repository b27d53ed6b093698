//! The editable document.
//!
//! A `Document` pairs the text with a monotonic [`Version`]. Every change goes
//! through [`Document::apply`], which is the only way to mutate the text; the
//! returned [`EditInfo`] is what downstream components react to.

use std::ops::Range;

use web_time::Instant;

use crate::text::{EditorRope, TextBuffer};
use crate::types::{EditInfo, EditOrigin, Version};

/// A change to the document text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    /// Replace the whole text (textarea-style change events, restores, imports).
    ReplaceAll(String),
    /// Insert text at a char offset.
    Insert { offset: usize, text: String },
    /// Delete a char range.
    Delete(Range<usize>),
    /// Replace a char range with text.
    Replace { range: Range<usize>, text: String },
}

impl Mutation {
    /// Shorthand for a whole-text replacement.
    pub fn replace_all(text: impl Into<String>) -> Self {
        Self::ReplaceAll(text.into())
    }
}

/// Document text plus version.
#[derive(Clone, Debug, Default)]
pub struct Document {
    text: EditorRope,
    version: Version,
}

impl Document {
    /// Create a document holding `text` at [`Version::INITIAL`].
    pub fn new(text: &str) -> Self {
        Self {
            text: EditorRope::from_str(text),
            version: Version::INITIAL,
        }
    }

    /// The current text buffer.
    pub fn text(&self) -> &EditorRope {
        &self.text
    }

    /// The current text as a String.
    pub fn content_string(&self) -> String {
        self.text.contents()
    }

    /// The current version.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Get length in characters.
    pub fn len_chars(&self) -> usize {
        self.text.len_chars()
    }

    /// Check if document is empty.
    pub fn is_empty(&self) -> bool {
        self.text.len_chars() == 0
    }

    /// Apply a mutation.
    ///
    /// Returns `None` when the mutation leaves the text unchanged; such a
    /// mutation is not accepted and the version stays put. Offsets are clamped
    /// to the document.
    pub fn apply(&mut self, mutation: Mutation, origin: EditOrigin) -> Option<EditInfo> {
        let len = self.text.len_chars();
        let (edit_char_pos, inserted_len, deleted_len) = match mutation {
            Mutation::ReplaceAll(text) => {
                if self.text.matches(&text) {
                    return None;
                }
                let inserted_len = text.chars().count();
                self.text.set(&text);
                (0, inserted_len, len)
            }
            Mutation::Insert { offset, text } => {
                if text.is_empty() {
                    return None;
                }
                let offset = offset.min(len);
                self.text.insert(offset, &text);
                (offset, text.chars().count(), 0)
            }
            Mutation::Delete(range) => {
                let range = clamp_range(range, len);
                if range.is_empty() {
                    return None;
                }
                self.text.remove(range.clone());
                (range.start, 0, range.len())
            }
            Mutation::Replace { range, text } => {
                let range = clamp_range(range, len);
                if self.text.slice(range.clone()).as_deref() == Some(text.as_str()) {
                    return None;
                }
                self.text.remove(range.clone());
                self.text.insert(range.start, &text);
                (range.start, text.chars().count(), range.len())
            }
        };

        self.version = self.version.next();
        let edit = EditInfo {
            version: self.version,
            origin,
            edit_char_pos,
            inserted_len,
            deleted_len,
            doc_len_after: self.text.len_chars(),
            timestamp: Instant::now(),
        };
        tracing::debug!(
            version = %edit.version,
            origin = ?origin,
            inserted = inserted_len,
            deleted = deleted_len,
            "document mutated"
        );
        Some(edit)
    }
}

fn clamp_range(range: Range<usize>, len: usize) -> Range<usize> {
    let end = range.end.min(len);
    range.start.min(end)..end
}
