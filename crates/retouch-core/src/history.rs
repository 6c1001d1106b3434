//! Linear undo/redo history of image snapshots.
//!
//! The stack holds deep copies of every committed image in chronological
//! order and a cursor pointing at the entry that is currently shown.
//! Committing while the cursor is not at the tail discards every entry after
//! the cursor: history is a single timeline, never a tree.

use std::num::NonZeroUsize;

use tracing::debug;

use crate::buffer::ImageBuffer;

/// One snapshot in the history together with the name of the edit that
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    label: String,
    image: ImageBuffer,
}

impl HistoryEntry {
    /// Name of the edit that produced this snapshot (e.g. "Blur (kernel 5)").
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Borrow the stored snapshot.
    pub fn image(&self) -> &ImageBuffer {
        &self.image
    }
}

/// Cursor-based snapshot history.
#[derive(Debug, Clone, Default)]
pub struct HistoryStack {
    entries: Vec<HistoryEntry>,
    cursor: Option<usize>,
    limit: Option<NonZeroUsize>,
}

impl HistoryStack {
    /// Create an empty, unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty history that keeps at most `limit` entries.
    ///
    /// `None` keeps every entry.
    pub fn with_limit(limit: Option<NonZeroUsize>) -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
            limit,
        }
    }

    /// Drop every entry and move the cursor to the empty position.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    /// Append a deep copy of `image` after the cursor.
    ///
    /// Entries after the cursor (the redo branch) are discarded first and
    /// cannot be recovered. When a limit is set, the oldest entries are
    /// evicted until the stack fits.
    pub fn commit(&mut self, image: &ImageBuffer, label: impl Into<String>) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        if keep < self.entries.len() {
            debug!(
                discarded = self.entries.len() - keep,
                "Discarding redo branch"
            );
            self.entries.truncate(keep);
        }

        self.entries.push(HistoryEntry {
            label: label.into(),
            image: image.clone(),
        });
        self.cursor = Some(self.entries.len() - 1);

        self.evict_overflow();
    }

    /// Step back one entry and return a copy of it.
    ///
    /// Returns `None` when already at the earliest entry or when empty.
    pub fn undo(&mut self) -> Option<ImageBuffer> {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(c - 1);
                Some(self.entries[c - 1].image.clone())
            }
            _ => None,
        }
    }

    /// Step forward one entry and return a copy of it.
    ///
    /// Returns `None` when already at the latest entry or when empty.
    pub fn redo(&mut self) -> Option<ImageBuffer> {
        match self.cursor {
            Some(c) if c + 1 < self.entries.len() => {
                self.cursor = Some(c + 1);
                Some(self.entries[c + 1].image.clone())
            }
            _ => None,
        }
    }

    /// Copy of the entry at the cursor, or `None` when empty.
    pub fn current(&self) -> Option<ImageBuffer> {
        self.cursor.map(|c| self.entries[c].image.clone())
    }

    /// Index of the current entry, `None` when empty.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> Option<NonZeroUsize> {
        self.limit
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(c) if c > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(c) if c + 1 < self.entries.len())
    }

    /// Label of the edit an undo would revert.
    pub fn undo_label(&self) -> Option<&str> {
        match self.cursor {
            Some(c) if c > 0 => Some(self.entries[c].label()),
            _ => None,
        }
    }

    /// Label of the edit a redo would re-apply.
    pub fn redo_label(&self) -> Option<&str> {
        let next = self.cursor? + 1;
        self.entries.get(next).map(HistoryEntry::label)
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Labels of all entries, oldest first.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(HistoryEntry::label)
    }

    /// Total pixel bytes held by the snapshots.
    pub fn memory_bytes(&self) -> usize {
        self.entries.iter().map(|e| e.image.byte_len()).sum()
    }

    fn evict_overflow(&mut self) {
        let Some(limit) = self.limit else {
            return;
        };
        let overflow = self.entries.len().saturating_sub(limit.get());
        if overflow == 0 {
            return;
        }

        self.entries.drain(..overflow);
        // Commit always leaves the cursor on the tail, so it stays in range.
        self.cursor = self.cursor.map(|c| c.saturating_sub(overflow));
        debug!(evicted = overflow, limit = limit.get(), "History limit reached");
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
