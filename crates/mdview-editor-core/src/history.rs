//! Undo/redo history as a log of document snapshots.
//!
//! Every recorded text is a full snapshot, so undo and redo simply move a
//! cursor through the log. Recording after an undo truncates the redo tail.

use smol_str::SmolStr;

/// Snapshot log with a cursor pointing at the current text.
///
/// Invariant: `cursor < snapshots.len()` and the snapshot at `cursor` equals
/// the current document text.
#[derive(Clone, Debug)]
pub struct History {
    snapshots: Vec<SmolStr>,
    cursor: usize,
    max_snapshots: Option<usize>,
}

impl History {
    /// Create a history whose only snapshot is `initial`.
    pub fn new(initial: &str) -> Self {
        Self {
            snapshots: vec![SmolStr::new(initial)],
            cursor: 0,
            max_snapshots: None,
        }
    }

    /// Cap the number of retained snapshots. The oldest are evicted first.
    ///
    /// A cap of zero is treated as one: the current snapshot is always kept.
    pub fn with_limit(initial: &str, max_snapshots: usize) -> Self {
        Self {
            max_snapshots: Some(max_snapshots.max(1)),
            ..Self::new(initial)
        }
    }

    /// Record a new text.
    ///
    /// Returns false (and does nothing) when `text` equals the current
    /// snapshot. Otherwise drops every snapshot after the cursor, appends
    /// `text` and moves the cursor to it.
    pub fn record(&mut self, text: &str) -> bool {
        if self.current() == text {
            return false;
        }

        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(SmolStr::new(text));
        self.cursor = self.snapshots.len() - 1;

        if let Some(max) = self.max_snapshots {
            let excess = self.snapshots.len().saturating_sub(max);
            if excess > 0 {
                self.snapshots.drain(..excess);
                self.cursor -= excess;
            }
        }

        tracing::trace!(cursor = self.cursor, len = self.snapshots.len(), "history recorded");
        true
    }

    /// Step back one snapshot. Returns None at the oldest snapshot.
    pub fn undo(&mut self) -> Option<&str> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.snapshots[self.cursor].as_str())
    }

    /// Step forward one snapshot. Returns None at the newest snapshot.
    pub fn redo(&mut self) -> Option<&str> {
        if self.cursor + 1 >= self.snapshots.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.snapshots[self.cursor].as_str())
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// The snapshot at the cursor.
    pub fn current(&self) -> &str {
        self.snapshots[self.cursor].as_str()
    }

    /// Index of the current snapshot.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of snapshots in the log.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// The log is never empty; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Drop every snapshot except the current one.
    pub fn clear_history(&mut self) {
        let current = self.snapshots.swap_remove(self.cursor);
        self.snapshots.clear();
        self.snapshots.push(current);
        self.cursor = 0;
    }
}
