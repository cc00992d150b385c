//! Snapshot-based undo/redo over the whole document.
//!
//! Every committed mutation pushes a full copy of the document. Undo and redo
//! only move the cursor; the redo tail is discarded the next time something
//! is pushed. The list is capped, evicting the oldest snapshot first, so
//! after enough edits the original state is no longer reachable.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use crate::consts::HISTORY_LIMIT;
use crate::doc::Document;

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<Document>,
    index: usize,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Document::default(), HISTORY_LIMIT)
    }
}

impl History {
    /// Start a history whose first entry is `initial`. A zero limit is treated as one.
    #[must_use]
    pub fn new(initial: Document, limit: usize) -> Self {
        Self { entries: vec![initial], index: 0, limit: limit.max(1) }
    }

    /// Drop everything and start over from `initial`.
    pub fn reset(&mut self, initial: Document) {
        self.entries = vec![initial];
        self.index = 0;
    }

    /// Record a committed state.
    pub fn push(&mut self, doc: &Document) {
        self.entries.truncate(self.index + 1);
        self.entries.push(doc.clone());
        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
        }
        self.index = self.entries.len() - 1;
    }

    /// Step back one snapshot. `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&Document> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    /// Step forward one snapshot. `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&Document> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }
}
