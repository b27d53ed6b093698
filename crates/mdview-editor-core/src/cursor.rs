//! Line/column tracking for the status bar.

use std::fmt;

use serde::Serialize;

use crate::text::TextBuffer;
use crate::types::Selection;

/// A 1-based line/column pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CursorPosition {
    pub line: usize,
    pub column: usize,
}

impl Default for CursorPosition {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl fmt::Display for CursorPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ln {}, Col {}", self.line, self.column)
    }
}

impl CursorPosition {
    /// Locate a char offset in `text`.
    ///
    /// `line` is the number of `\n` before the offset plus one; `column` is the
    /// distance from the start of that line plus one. Offsets past the end are
    /// clamped to the end.
    pub fn locate<T: TextBuffer + ?Sized>(text: &T, offset: usize) -> Self {
        let offset = offset.min(text.len_chars());
        let line = text.char_to_line(offset);
        let line_start = text.line_to_char(line);
        Self {
            line: line + 1,
            column: offset - line_start + 1,
        }
    }
}

/// Keeps the last computed caret position for display.
#[derive(Clone, Debug, Default)]
pub struct CursorTracker {
    last: CursorPosition,
}

impl CursorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute after a caret move.
    pub fn update<T: TextBuffer + ?Sized>(&mut self, text: &T, offset: usize) -> CursorPosition {
        self.last = CursorPosition::locate(text, offset);
        self.last
    }

    /// Recompute after a selection change. The selection start is reported.
    pub fn update_selection<T: TextBuffer + ?Sized>(
        &mut self,
        text: &T,
        selection: Selection,
    ) -> CursorPosition {
        self.update(text, selection.start())
    }

    /// The last computed position.
    pub fn position(&self) -> CursorPosition {
        self.last
    }
}
