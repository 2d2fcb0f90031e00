use crate::error::Result;
use crate::session::EditSession;

/// State of a two-keystroke hex entry
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ByteEdit {
    /// Hex digits typed so far
    pub(crate) buffer: String,
    /// Offsets (inclusive) the entry was started on
    pub(crate) addr: Option<(usize, usize)>,
}

impl ByteEdit {
    /// Clear the editor when edit process complete/canceled
    pub(crate) fn clear(&mut self) {
        self.addr = None;
        self.buffer.clear();
    }

    #[must_use]
    pub const fn in_progress(&self) -> bool {
        self.addr.is_some()
    }

    /// Digits typed so far, upper-case
    #[must_use]
    pub fn pending(&self) -> &str {
        &self.buffer
    }
}

impl EditSession {
    /// Feed one typed character into the hex entry.
    ///
    /// Non-hex chars are ignored. The first digit starts an entry on the current
    /// selection (or the byte under the cursor); the second one commits the value to
    /// every byte of it as a single undoable mutation. If the target changed between
    /// the two keystrokes, the pending digit is dropped and a new entry starts.
    ///
    /// Returns the committed value, `None` while the entry is incomplete.
    ///
    /// # Errors
    /// Returns an error if the target lies outside the buffer.
    ///
    /// # Example
    /// ```
    /// use bytelib::EditSession;
    ///
    /// let mut session = EditSession::with_defaults();
    /// session.load(vec![0; 4]);
    /// session.select_range(1, 2).unwrap();
    ///
    /// assert_eq!(session.type_hex_char('a'), Ok(None));
    /// assert_eq!(session.type_hex_char('F'), Ok(Some(0xAF)));
    /// assert_eq!(session.export(), &[0, 0xAF, 0xAF, 0]);
    /// ```
    pub fn type_hex_char(&mut self, ch: char) -> Result<Option<u8>> {
        if !ch.is_ascii_hexdigit() {
            return Ok(None);
        }
        let Some(target) = self.edit_target() else {
            self.editor.clear();
            return Ok(None);
        };

        // If other bytes got selected - start over
        if self.editor.addr != Some(target) {
            self.editor.clear();
            self.editor.addr = Some(target);
        }
        self.editor.buffer.push(ch.to_ascii_uppercase());

        if self.editor.buffer.len() < 2 {
            return Ok(None);
        }

        let parsed = u8::from_str_radix(&self.editor.buffer, 16).ok();
        self.editor.clear();
        let Some(value) = parsed else {
            return Ok(None);
        };

        let (start, end) = target;
        self.fill_range(start, end, value)?;
        tracing::debug!(start, end, value, "hex entry committed");
        Ok(Some(value))
    }

    /// Abort the hex entry without writing anything
    pub fn cancel_hex_entry(&mut self) {
        self.editor.clear();
    }

    #[must_use]
    pub const fn hex_entry(&self) -> &ByteEdit {
        &self.editor
    }
}

#[cfg(test)]
mod tests {
    use crate::session::EditSession;

    fn session_with(bytes: &[u8]) -> EditSession {
        let mut session = EditSession::with_defaults();
        session.load(bytes.to_vec());
        session
    }

    #[test]
    fn test_two_digits_commit_active_byte() {
        // Arrange
        let mut session = session_with(&[0x00, 0x11]);
        let _ = session.set_active(1, false);

        // Act
        let first = session.type_hex_char('7');
        let second = session.type_hex_char('f');

        // Assert
        assert_eq!(first, Ok(None));
        assert_eq!(second, Ok(Some(0x7F)));
        assert_eq!(session.export(), &[0x00, 0x7F]);
        assert_eq!(session.undo_depth(), 1);
        assert!(!session.hex_entry().in_progress());
    }

    #[test]
    fn test_non_hex_chars_are_ignored() {
        // Arrange
        let mut session = session_with(&[0x00]);
        let _ = session.set_active(0, false);

        // Act
        let _ = session.type_hex_char('1');
        let ignored = session.type_hex_char('z');

        // Assert
        assert_eq!(ignored, Ok(None));
        assert_eq!(session.hex_entry().pending(), "1");
        assert!(!session.can_undo());
    }

    #[test]
    fn test_cancel_discards_pending_digit() {
        // Arrange
        let mut session = session_with(&[0x00, 0x00]);
        let _ = session.set_active(0, false);
        let _ = session.type_hex_char('A');

        // Act
        session.cancel_hex_entry();
        let res = session.type_hex_char('B');

        // Assert
        assert_eq!(res, Ok(None));
        assert_eq!(session.hex_entry().pending(), "B");
        assert_eq!(session.export(), &[0x00, 0x00]);
    }

    #[test]
    fn test_target_change_restarts_entry() {
        // Arrange
        let mut session = session_with(&[0x00, 0x00]);
        let _ = session.set_active(0, false);
        let _ = session.type_hex_char('A');

        // Act
        let _ = session.set_active(1, false);
        let first = session.type_hex_char('B');
        let second = session.type_hex_char('C');

        // Assert
        assert_eq!(first, Ok(None));
        assert_eq!(second, Ok(Some(0xBC)));
        assert_eq!(session.export(), &[0x00, 0xBC]);
    }

    #[test]
    fn test_no_target_no_entry() {
        // Arrange
        let mut session = session_with(&[0x00]);

        // Act
        let res = session.type_hex_char('A');

        // Assert
        assert_eq!(res, Ok(None));
        assert!(!session.hex_entry().in_progress());
    }
}
