//! Core editor types: document versions, edit tracking and selections.
//!
//! These types are framework-agnostic and shared by every component that
//! reacts to document changes.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use web_time::Instant;

/// Monotonic document version.
///
/// Bumped on every accepted mutation. Render requests carry the version they
/// were issued for so late responses can be recognised as stale.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Version(u64);

impl Version {
    /// The version of a freshly created document.
    pub const INITIAL: Self = Self(0);

    /// Wrap a raw counter value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw counter value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The version following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Where a document mutation came from.
///
/// History only records non-restore mutations; restores are the result of
/// undo/redo and already exist in the log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOrigin {
    /// Typing or any other change made in the editing surface.
    User,
    /// Undo/redo putting a recorded snapshot back.
    Restore,
    /// Text loaded from a file.
    Import,
    /// The clear command.
    Clear,
}

impl EditOrigin {
    /// Whether the history should record the resulting text.
    pub fn is_recorded(self) -> bool {
        !matches!(self, Self::Restore)
    }
}

/// Information about an accepted mutation.
#[derive(Clone, Debug)]
pub struct EditInfo {
    /// Version of the document after the mutation.
    pub version: Version,
    /// Source of the mutation.
    pub origin: EditOrigin,
    /// Character offset where the change starts.
    pub edit_char_pos: usize,
    /// Number of characters inserted.
    pub inserted_len: usize,
    /// Number of characters deleted.
    pub deleted_len: usize,
    /// Document length (in chars) after this edit was applied.
    pub doc_len_after: usize,
    /// When this edit occurred.
    pub timestamp: Instant,
}

impl PartialEq for EditInfo {
    fn eq(&self, other: &Self) -> bool {
        // Compare all fields except timestamp (not meaningful for equality)
        self.version == other.version
            && self.origin == other.origin
            && self.edit_char_pos == other.edit_char_pos
            && self.inserted_len == other.inserted_len
            && self.deleted_len == other.deleted_len
            && self.doc_len_after == other.doc_len_after
    }
}

/// Text selection with anchor and head positions.
///
/// The anchor is where the selection started, the head is where the cursor is now.
/// They may be in any order - use `start()` and `end()` for ordered bounds.
#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Where selection started
    pub anchor: usize,
    /// Where cursor is now
    pub head: usize,
}

impl Selection {
    /// Create a new selection.
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// Create a collapsed selection (cursor position).
    pub fn collapsed(offset: usize) -> Self {
        Self {
            anchor: offset,
            head: offset,
        }
    }

    /// Get the start (lower bound) of the selection.
    pub fn start(&self) -> usize {
        self.anchor.min(self.head)
    }

    /// Get the end (upper bound) of the selection.
    pub fn end(&self) -> usize {
        self.anchor.max(self.head)
    }

    /// Check if the selection is collapsed (empty, cursor only).
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    /// Get the selection length.
    pub fn len(&self) -> usize {
        self.end() - self.start()
    }

    /// Check if empty (same as is_collapsed).
    pub fn is_empty(&self) -> bool {
        self.is_collapsed()
    }

    /// Convert to a Range<usize> (ordered).
    pub fn to_range(&self) -> Range<usize> {
        self.start()..self.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_monotonic() {
        let v = Version::INITIAL;
        assert!(v.next() > v);
        assert_eq!(v.next().next().get(), 2);
        assert_eq!(Version::new(3).to_string(), "v3");
    }

    #[test]
    fn test_restore_is_not_recorded() {
        assert!(EditOrigin::User.is_recorded());
        assert!(EditOrigin::Import.is_recorded());
        assert!(EditOrigin::Clear.is_recorded());
        assert!(!EditOrigin::Restore.is_recorded());
    }

    #[test]
    fn test_selection_bounds() {
        let sel = Selection::new(10, 5);
        assert_eq!(sel.start(), 5);
        assert_eq!(sel.end(), 10);
        assert_eq!(sel.len(), 5);
        assert_eq!(sel.to_range(), 5..10);

        let caret = Selection::collapsed(7);
        assert!(caret.is_collapsed());
        assert!(caret.is_empty());
    }
}
