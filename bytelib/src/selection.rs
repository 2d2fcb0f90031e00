use crate::buffer::ByteBuffer;
use crate::error::{EditError, EditErrorKind, Result};
use crate::history::HistoryStack;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionModel {
    /// Offset of the cursor
    pub(crate) active: Option<usize>,
    /// Anchor and end offsets of the selected bytes.
    /// Inverted if selection is moving right-to-left.
    pub(crate) range: Option<[usize; 2]>,
    /// Bytes captured by the last copy
    pub(crate) clipboard: Vec<u8>,
}

impl SelectionModel {
    #[must_use]
    pub const fn active(&self) -> Option<usize> {
        self.active
    }

    /// Move the cursor and drop the selection
    pub const fn set_active(&mut self, offset: usize) {
        self.active = Some(offset);
        self.range = None;
    }

    /// Extend selection range up to the provided offset. A fresh selection is
    /// anchored at the cursor (or at the offset itself if there is no cursor).
    pub fn extend_selection(&mut self, to: usize) {
        let anchor = self.active.unwrap_or(to);
        let sel = self.range.get_or_insert([anchor, anchor]);
        sel[1] = to;
    }

    /// Select bytes between two offsets, in any order
    pub const fn select_range(&mut self, start: usize, end: usize) {
        self.range = Some([start, end]);
    }

    /// Selected range as `(min, max)`, both inclusive
    #[must_use]
    pub fn normalized_range(&self) -> Option<(usize, usize)> {
        self.range.map(|[a, b]| (a.min(b), a.max(b)))
    }

    /// Number of selected bytes, zero if nothing is selected
    #[must_use]
    pub fn selected_len(&self) -> usize {
        self.normalized_range().map_or(0, |(min, max)| max - min + 1)
    }

    /// Clear selection range. Cursor and clipboard are kept.
    pub const fn clear(&mut self) {
        self.range = None;
    }

    /// Drop cursor and selection. Clipboard is kept.
    pub(crate) const fn reset(&mut self) {
        self.active = None;
        self.range = None;
    }

    #[must_use]
    pub fn clipboard(&self) -> &[u8] {
        &self.clipboard
    }

    /// Overwrite the clipboard with externally provided bytes
    pub fn set_clipboard(&mut self, bytes: Vec<u8>) {
        self.clipboard = bytes;
    }

    /// Copy the selected bytes (or the byte under the cursor) into the clipboard.
    /// Returns the number of copied bytes, zero if there was nothing to copy.
    ///
    /// # Errors
    /// Returns an error if the selection or cursor lies outside the buffer.
    /// The clipboard is left untouched in that case.
    pub fn copy(&mut self, buffer: &ByteBuffer) -> Result<usize> {
        let bytes = if let Some((min, max)) = self.normalized_range() {
            buffer.slice(min, max + 1)?
        } else if let Some(offset) = self.active {
            vec![buffer.get_byte(offset)?]
        } else {
            return Ok(0);
        };
        self.clipboard = bytes;
        Ok(self.clipboard.len())
    }

    /// Write the clipboard at the cursor as one undoable mutation. Bytes that do not fit
    /// before the buffer end are dropped. Returns the number of bytes written, zero if
    /// the clipboard is empty or there is no cursor.
    ///
    /// # Errors
    /// Returns `OutOfRange` if the cursor lies outside the buffer. Nothing is
    /// recorded in the history in that case.
    pub fn paste(&self, buffer: &mut ByteBuffer, history: &mut HistoryStack) -> Result<usize> {
        let Some(offset) = self.active else {
            return Ok(0);
        };
        if self.clipboard.is_empty() {
            return Ok(0);
        }
        if offset >= buffer.len() {
            return Err(EditError::BufferError(EditErrorKind::OutOfRange(offset)));
        }

        history.begin_mutation(buffer);
        let written = buffer.write_at(offset, &self.clipboard)?;
        tracing::debug!(offset, written, clipboard = self.clipboard.len(), "paste");
        Ok(written)
    }
}
