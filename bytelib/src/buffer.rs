//! The `buffer` module provides the [`ByteBuffer`] struct, the in-memory byte store
//! that every edit, search, and analysis operates on.
//!
//! The length of the buffer is fixed per load: edits mutate bytes in place and never
//! grow or shrink the buffer. Only [`ByteBuffer::load`] replaces the content
//! wholesale.

use crate::error::{EditError, EditErrorKind, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteBuffer {
    /// Raw byte content
    data: Vec<u8>,
    /// Has the content been edited since it was loaded
    modified: bool,
}

impl<'a> IntoIterator for &'a ByteBuffer {
    type Item = &'a u8;
    type IntoIter = std::slice::Iter<'a, u8>;
    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(data: Vec<u8>) -> Self {
        Self {
            data,
            modified: false,
        }
    }
}

impl ByteBuffer {
    /// Creates an empty `ByteBuffer`.
    ///
    /// # Examples
    /// ```
    /// use bytelib::ByteBuffer;
    ///
    /// let buf = ByteBuffer::new();
    /// assert_eq!(buf.len(), 0);
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self {
            data: Vec::new(),
            modified: false,
        }
    }

    /// Replaces the content of the buffer wholesale. Any byte sequence, including
    /// an empty one, is accepted. Clears the modified flag.
    ///
    /// # Examples
    /// ```
    /// use bytelib::ByteBuffer;
    ///
    /// let mut buf = ByteBuffer::new();
    /// buf.load(b"ABC".to_vec());
    ///
    /// assert_eq!(buf.len(), 3);
    /// assert!(!buf.is_modified());
    /// ```
    pub fn load(&mut self, bytes: Vec<u8>) {
        tracing::trace!(len = bytes.len(), "buffer loaded");
        self.data = bytes;
        self.modified = false;
    }

    /// Number of bytes in the buffer.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Has the buffer been edited since it was loaded.
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    pub(crate) const fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    /// Borrow the full content.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get an iterator over the bytes in the buffer.
    pub fn iter(&self) -> std::slice::Iter<'_, u8> {
        self.into_iter()
    }

    /// Get the byte at the provided offset.
    ///
    /// # Errors
    /// Returns `OutOfRange` if the offset is not within `[0, len)`.
    ///
    /// # Example
    /// ```
    /// use bytelib::ByteBuffer;
    ///
    /// let buf = ByteBuffer::from(vec![0x41, 0x42, 0x43]);
    ///
    /// assert_eq!(buf.get_byte(1), Ok(0x42));
    /// assert!(buf.get_byte(3).is_err());
    /// ```
    pub fn get_byte(&self, offset: usize) -> Result<u8> {
        self.data
            .get(offset)
            .copied()
            .ok_or(EditError::BufferError(EditErrorKind::OutOfRange(offset)))
    }

    /// Overwrite the byte at the provided offset and mark the buffer as modified.
    ///
    /// # Errors
    /// Returns `OutOfRange` if the offset is not within `[0, len)`. The buffer is left untouched.
    ///
    /// # Example
    /// ```
    /// use bytelib::ByteBuffer;
    ///
    /// let mut buf = ByteBuffer::from(vec![0x41, 0x42, 0x43]);
    /// buf.set_byte(1, 0x00).unwrap();
    ///
    /// assert_eq!(buf.get_byte(1), Ok(0x00));
    /// assert!(buf.is_modified());
    /// ```
    pub fn set_byte(&mut self, offset: usize, value: u8) -> Result<()> {
        let Some(byte) = self.data.get_mut(offset) else {
            return Err(EditError::BufferError(EditErrorKind::OutOfRange(offset)));
        };
        tracing::trace!(offset, old = *byte, new = value, "set byte");
        *byte = value;
        self.modified = true;
        Ok(())
    }

    /// Get a copy of the bytes within `[start, end)`. A reversed range (`end < start`)
    /// yields an empty copy.
    ///
    /// # Errors
    /// Returns `RangeOutOfBounds` if `end` exceeds the buffer length.
    ///
    /// # Example
    /// ```
    /// use bytelib::ByteBuffer;
    ///
    /// let buf = ByteBuffer::from(vec![1, 2, 3, 4]);
    ///
    /// assert_eq!(buf.slice(1, 3), Ok(vec![2, 3]));
    /// assert_eq!(buf.slice(3, 1), Ok(vec![]));
    /// assert!(buf.slice(2, 5).is_err());
    /// ```
    pub fn slice(&self, start: usize, end: usize) -> Result<Vec<u8>> {
        if end < start {
            return Ok(Vec::new());
        }
        self.data
            .get(start..end)
            .map(<[u8]>::to_vec)
            .ok_or(EditError::BufferError(EditErrorKind::RangeOutOfBounds(
                start, end,
            )))
    }

    /// Write the bytes starting at the provided offset. Bytes that would land past
    /// the end of the buffer are dropped, the buffer never grows.
    /// Returns the number of bytes actually written.
    ///
    /// # Errors
    /// Returns `OutOfRange` if the start offset is not within `[0, len)`.
    ///
    /// # Example
    /// ```
    /// use bytelib::ByteBuffer;
    ///
    /// let mut buf = ByteBuffer::from(vec![0; 4]);
    /// let written = buf.write_at(2, &[0xAA, 0xBB, 0xCC]).unwrap();
    ///
    /// assert_eq!(written, 2);
    /// assert_eq!(buf.as_bytes(), &[0, 0, 0xAA, 0xBB]);
    /// ```
    pub fn write_at(&mut self, offset: usize, bytes: &[u8]) -> Result<usize> {
        let Some(dest) = self.data.get_mut(offset..) else {
            return Err(EditError::BufferError(EditErrorKind::OutOfRange(offset)));
        };
        if dest.is_empty() {
            return Err(EditError::BufferError(EditErrorKind::OutOfRange(offset)));
        }
        let count = dest.len().min(bytes.len());
        dest[..count].copy_from_slice(&bytes[..count]);
        if count > 0 {
            self.modified = true;
        }
        Ok(count)
    }

    /// Fill the inclusive range `[start, end]` with one value.
    ///
    /// # Errors
    /// Returns `RangeOutOfBounds` if the range is not fully within the buffer.
    pub fn fill(&mut self, start: usize, end: usize, value: u8) -> Result<()> {
        let Some(dest) = self.data.get_mut(start..=end) else {
            return Err(EditError::BufferError(EditErrorKind::RangeOutOfBounds(
                start, end,
            )));
        };
        dest.fill(value);
        self.modified = true;
        Ok(())
    }

    /// Swap the content with a snapshot, returning the previous content.
    /// Used by the history to install undo/redo snapshots.
    pub(crate) fn replace_content(&mut self, snapshot: Vec<u8>) -> Vec<u8> {
        std::mem::replace(&mut self.data, snapshot)
    }
}
