//! Text buffer abstraction for editor storage.
//!
//! The `TextBuffer` trait provides a common interface for the read-side of
//! text storage so that derived views (cursor position, statistics) work the
//! same over the document rope and over plain strings.

use smol_str::{SmolStr, ToSmolStr};
use std::ops::Range;

/// A text buffer that supports offset and line conversions.
///
/// All offsets are in Unicode scalar values (chars), not bytes or UTF-16.
/// Only `\n` is treated as a line break.
pub trait TextBuffer {
    /// Total length in bytes (UTF-8).
    fn len_bytes(&self) -> usize;

    /// Total length in chars (Unicode scalar values).
    fn len_chars(&self) -> usize;

    /// Check if empty.
    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// Number of lines. An empty buffer has one (empty) line.
    fn len_lines(&self) -> usize;

    /// Get a slice as SmolStr. Returns None if range is invalid.
    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr>;

    /// Get character at offset. Returns None if out of bounds.
    fn char_at(&self, char_offset: usize) -> Option<char>;

    /// Copy the entire buffer into a String.
    fn contents(&self) -> String;

    /// Zero-based line index containing the char offset.
    ///
    /// Offsets past the end are clamped to the end.
    fn char_to_line(&self, char_offset: usize) -> usize;

    /// Char offset of the first character of a zero-based line.
    ///
    /// Lines past the end map to the end of the buffer.
    fn line_to_char(&self, line: usize) -> usize;
}

/// Ropey-backed text buffer for the document.
///
/// Provides O(log n) editing operations and offset conversions.
#[derive(Clone, Debug, Default)]
pub struct EditorRope {
    rope: ropey::Rope,
}

impl EditorRope {
    /// Create a new empty rope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from string.
    pub fn from_str(s: &str) -> Self {
        Self {
            rope: ropey::Rope::from_str(s),
        }
    }

    /// Check whether the buffer holds exactly `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.rope == text
    }

    /// Insert text at char offset. Offsets past the end append.
    pub(crate) fn insert(&mut self, char_offset: usize, text: &str) {
        let at = char_offset.min(self.rope.len_chars());
        self.rope.insert(at, text);
    }

    /// Delete a char range, clamped to the buffer.
    pub(crate) fn remove(&mut self, char_range: Range<usize>) {
        let len = self.rope.len_chars();
        let end = char_range.end.min(len);
        let start = char_range.start.min(end);
        if start < end {
            self.rope.remove(start..end);
        }
    }

    /// Replace the whole buffer.
    pub(crate) fn set(&mut self, text: &str) {
        self.rope = ropey::Rope::from_str(text);
    }
}

impl TextBuffer for EditorRope {
    fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr> {
        if char_range.start > char_range.end || char_range.end > self.len_chars() {
            return None;
        }
        Some(self.rope.slice(char_range).to_smolstr())
    }

    fn char_at(&self, char_offset: usize) -> Option<char> {
        if char_offset >= self.len_chars() {
            return None;
        }
        Some(self.rope.char(char_offset))
    }

    fn contents(&self) -> String {
        self.rope.to_string()
    }

    fn char_to_line(&self, char_offset: usize) -> usize {
        self.rope.char_to_line(char_offset.min(self.rope.len_chars()))
    }

    fn line_to_char(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line)
    }
}

impl TextBuffer for str {
    fn len_bytes(&self) -> usize {
        self.len()
    }

    fn len_chars(&self) -> usize {
        self.chars().count()
    }

    fn len_lines(&self) -> usize {
        self.matches('\n').count() + 1
    }

    fn slice(&self, char_range: Range<usize>) -> Option<SmolStr> {
        if char_range.start > char_range.end {
            return None;
        }
        let mut indices = self.char_indices().map(|(i, _)| i).chain([self.len()]);
        let start = indices.nth(char_range.start)?;
        let end = if char_range.is_empty() {
            start
        } else {
            indices.nth(char_range.len() - 1)?
        };
        Some(self[start..end].to_smolstr())
    }

    fn char_at(&self, char_offset: usize) -> Option<char> {
        self.chars().nth(char_offset)
    }

    fn contents(&self) -> String {
        self.to_owned()
    }

    fn char_to_line(&self, char_offset: usize) -> usize {
        self.chars()
            .take(char_offset)
            .filter(|&c| c == '\n')
            .count()
    }

    fn line_to_char(&self, line: usize) -> usize {
        if line == 0 {
            return 0;
        }
        let mut seen = 0;
        for (idx, c) in self.chars().enumerate() {
            if c == '\n' {
                seen += 1;
                if seen == line {
                    return idx + 1;
                }
            }
        }
        self.chars().count()
    }
}

impl From<&str> for EditorRope {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for EditorRope {
    fn from(s: String) -> Self {
        Self::from_str(&s)
    }
}
