//! Snapshot based undo/redo history for a [`ByteBuffer`].
//!
//! Every mutating request first pushes a full copy of the buffer onto the undo stack.
//! The undo stack is bounded: once it holds `capacity` snapshots, the oldest one is
//! evicted before a new one is pushed. The redo stack is filled only by undo and is
//! cleared by the next mutation.

use crate::buffer::ByteBuffer;
use crate::config::DEFAULT_HISTORY_CAPACITY;
use crate::error::{EditError, EditErrorKind, Result};
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct HistoryStack {
    /// Pre-images of past mutations, oldest at the front
    undo: VecDeque<Vec<u8>>,
    /// Post-images of undone mutations, most recent at the back
    redo: Vec<Vec<u8>>,
    /// Maximum depth of the undo stack
    capacity: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryStack {
    /// Creates an empty history. A capacity of zero is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            undo: VecDeque::with_capacity(capacity),
            redo: Vec::new(),
            capacity,
        }
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all snapshots.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of snapshots on the undo stack
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Number of snapshots on the redo stack
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    /// Capture the pre-image of a mutation. Evicts the oldest snapshot when the undo
    /// stack is full and clears the redo stack.
    pub fn begin_mutation(&mut self, buffer: &ByteBuffer) {
        if self.undo.len() >= self.capacity {
            self.undo.pop_front();
            tracing::debug!(capacity = self.capacity, "evicted oldest undo snapshot");
        }
        self.undo.push_back(buffer.as_bytes().to_vec());
        self.redo.clear();
        tracing::trace!(depth = self.undo.len(), "snapshot captured");
    }

    /// Restore the most recent snapshot. The current content moves onto the redo stack.
    /// The buffer is reported unmodified only once the undo stack is exhausted.
    ///
    /// # Errors
    /// Returns `NothingToUndo` if the undo stack is empty.
    ///
    /// # Example
    /// ```
    /// use bytelib::{ByteBuffer, HistoryStack};
    ///
    /// let mut buf = ByteBuffer::from(vec![0x41]);
    /// let mut history = HistoryStack::new(10);
    ///
    /// history.begin_mutation(&buf);
    /// buf.set_byte(0, 0x00).unwrap();
    /// history.undo(&mut buf).unwrap();
    ///
    /// assert_eq!(buf.get_byte(0), Ok(0x41));
    /// assert!(history.can_redo());
    /// ```
    pub fn undo(&mut self, buffer: &mut ByteBuffer) -> Result<()> {
        let snapshot = self
            .undo
            .pop_back()
            .ok_or(EditError::HistoryError(EditErrorKind::NothingToUndo))?;
        let current = buffer.replace_content(snapshot);
        self.redo.push(current);
        buffer.set_modified(!self.undo.is_empty());
        tracing::debug!(
            undo_depth = self.undo.len(),
            redo_depth = self.redo.len(),
            "undo"
        );
        Ok(())
    }

    /// Re-apply the most recently undone mutation. The current content moves back
    /// onto the undo stack.
    ///
    /// # Errors
    /// Returns `NothingToRedo` if the redo stack is empty.
    pub fn redo(&mut self, buffer: &mut ByteBuffer) -> Result<()> {
        let snapshot = self
            .redo
            .pop()
            .ok_or(EditError::HistoryError(EditErrorKind::NothingToRedo))?;
        // Redo depth is bounded by prior undos, so the undo stack has room.
        let current = buffer.replace_content(snapshot);
        self.undo.push_back(current);
        buffer.set_modified(true);
        tracing::debug!(
            undo_depth = self.undo.len(),
            redo_depth = self.redo.len(),
            "redo"
        );
        Ok(())
    }
}
