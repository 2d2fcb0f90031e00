//! The `session` module provides [`EditSession`], the single object a front-end holds
//! per opened blob. It owns the buffer, its history, the selection, and the last
//! search, and is the only way to mutate them so that every edit is recorded.
//!
//! A session is not shared between threads by itself. A multi-threaded host should
//! put the whole session behind one `Mutex`, since a mutation is a snapshot followed
//! by a write and the two must not interleave with another request.

use crate::analysis::{self, BlockEntropies, ClassCounts, RangeAnalysis};
use crate::buffer::ByteBuffer;
use crate::byteedit::ByteEdit;
use crate::config::EngineConfig;
use crate::error::{EditError, EditErrorKind, Result};
use crate::history::HistoryStack;
use crate::inspector::{self, Inspection};
use crate::search::{self, Direction, Pattern, SearchMatch, SearchMode};
use crate::selection::SelectionModel;
use crate::viz::{self, Rgb, VizMode};
use std::ops::Range;

const UNTITLED: &str = "Untitled";

/// Cursor movement within the byte grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Left,
    Right,
    /// One row up
    Up,
    /// One row down
    Down,
}

/// Result of a search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Starting offsets of all matches
    All(Vec<usize>),
    /// Match found by a directional search; it is now selected
    Found(SearchMatch),
}

#[derive(Debug, Default)]
pub(crate) struct SearchState {
    /// Pattern of the last successful search
    pattern: Option<Pattern>,
    /// Offsets where the last pattern matches in the current content
    hits: Vec<usize>,
}

#[derive(Debug)]
pub struct EditSession {
    /// Name of the session (aka filename)
    name: String,
    config: EngineConfig,
    buffer: ByteBuffer,
    history: HistoryStack,
    selection: SelectionModel,
    search: SearchState,
    /// Handler for two-keystroke hex entry
    pub(crate) editor: ByteEdit,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl EditSession {
    /// Creates an empty session.
    ///
    /// # Errors
    /// Returns an error if the config is invalid.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    /// Creates an empty session with the default config.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::from_valid_config(EngineConfig::default())
    }

    fn from_valid_config(config: EngineConfig) -> Self {
        Self {
            name: UNTITLED.to_string(),
            config,
            buffer: ByteBuffer::new(),
            history: HistoryStack::new(config.history_capacity),
            selection: SelectionModel::default(),
            search: SearchState::default(),
            editor: ByteEdit::default(),
        }
    }

    // ---------------------------------------------------------------- lifecycle

    /// Replace the content wholesale. History, selection, and search results are reset;
    /// the clipboard survives.
    ///
    /// # Example
    /// ```
    /// use bytelib::EditSession;
    ///
    /// let mut session = EditSession::with_defaults();
    /// session.load(b"ABC".to_vec());
    ///
    /// assert_eq!(session.get_byte(1), Ok(0x42));
    /// assert!(!session.can_undo());
    /// ```
    pub fn load(&mut self, bytes: Vec<u8>) {
        tracing::debug!(name = %self.name, len = bytes.len(), "load");
        self.buffer.load(bytes);
        self.history.clear();
        self.selection.reset();
        self.search = SearchState::default();
        self.editor.clear();
    }

    /// Same as [`EditSession::load`] and renames the session.
    pub fn load_named(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.name = name.into();
        self.load(bytes);
    }

    /// Start over with an empty, untitled buffer.
    pub fn new_empty(&mut self) {
        self.load_named(UNTITLED, Vec::new());
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Full current content, handed to whoever saves it.
    #[must_use]
    pub fn export(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    /// Name under which edited content is saved
    #[must_use]
    pub fn export_name(&self) -> String {
        format!("edited_{}", self.name)
    }

    #[must_use]
    pub const fn buffer(&self) -> &ByteBuffer {
        &self.buffer
    }

    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.buffer.is_modified()
    }

    // ---------------------------------------------------------------- buffer

    #[must_use]
    pub const fn len(&self) -> usize {
        self.buffer.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// # Errors
    /// Returns `OutOfRange` for an offset past the end.
    pub fn get_byte(&self, offset: usize) -> Result<u8> {
        self.buffer.get_byte(offset)
    }

    /// # Errors
    /// Returns `RangeOutOfBounds` if `end` is past the end.
    pub fn slice(&self, start: usize, end: usize) -> Result<Vec<u8>> {
        self.buffer.slice(start, end)
    }

    fn check_offset(&self, offset: usize) -> Result<()> {
        if offset < self.buffer.len() {
            Ok(())
        } else {
            Err(EditError::BufferError(EditErrorKind::OutOfRange(offset)))
        }
    }

    fn check_range(&self, start: usize, end: usize) -> Result<()> {
        if start < self.buffer.len() && end < self.buffer.len() {
            Ok(())
        } else {
            Err(EditError::BufferError(EditErrorKind::RangeOutOfBounds(
                start, end,
            )))
        }
    }

    /// Overwrite one byte as an undoable mutation.
    ///
    /// # Errors
    /// Returns `OutOfRange` for an offset past the end; nothing is recorded then.
    pub fn set_byte(&mut self, offset: usize, value: u8) -> Result<()> {
        self.check_offset(offset)?;
        self.history.begin_mutation(&self.buffer);
        self.buffer.set_byte(offset, value)?;
        self.after_mutation();
        Ok(())
    }

    /// Fill the inclusive range `[start, end]` (in any order) with one value as an
    /// undoable mutation.
    ///
    /// # Errors
    /// Returns `RangeOutOfBounds` if either end lies outside the buffer.
    pub fn fill_range(&mut self, start: usize, end: usize, value: u8) -> Result<()> {
        self.check_range(start, end)?;
        let (min, max) = (start.min(end), start.max(end));
        self.history.begin_mutation(&self.buffer);
        self.buffer.fill(min, max, value)?;
        tracing::debug!(start = min, end = max, value, "fill");
        self.after_mutation();
        Ok(())
    }

    /// Fill the selection, or the byte under the cursor, with one value.
    /// Returns the number of written bytes, zero if nothing is selected.
    ///
    /// # Errors
    /// Returns an error if the selection lies outside the buffer.
    pub fn fill_selection(&mut self, value: u8) -> Result<usize> {
        let Some((min, max)) = self.edit_target() else {
            return Ok(0);
        };
        self.fill_range(min, max, value)?;
        Ok(max - min + 1)
    }

    /// Overwrite one row starting at `row_start` with the characters of `text`.
    /// Each char is stored as its code point truncated to 8 bits; positions without a
    /// char are set to a space. Never writes past the buffer end.
    /// Returns the number of written bytes.
    ///
    /// # Errors
    /// Returns `OutOfRange` if `row_start` lies outside the buffer.
    #[allow(clippy::cast_possible_truncation)]
    pub fn write_text_row(&mut self, row_start: usize, text: &str) -> Result<usize> {
        self.check_offset(row_start)?;
        let width = self
            .config
            .bytes_per_row
            .min(self.buffer.len() - row_start);
        let mut chars = text.chars();
        let row: Vec<u8> = (0..width)
            .map(|_| chars.next().map_or(b' ', |ch| u32::from(ch) as u8))
            .collect();

        self.history.begin_mutation(&self.buffer);
        let written = self.buffer.write_at(row_start, &row)?;
        self.after_mutation();
        Ok(written)
    }

    /// Refresh derived state after the content changed.
    fn after_mutation(&mut self) {
        if let Some(pattern) = &self.search.pattern {
            self.search.hits = search::find_all(&self.buffer, pattern);
        }
    }

    // ---------------------------------------------------------------- history

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    /// Revert the last mutation. Clears the selection.
    ///
    /// # Errors
    /// Returns `NothingToUndo` if there is no mutation to revert.
    pub fn undo(&mut self) -> Result<()> {
        self.history.undo(&mut self.buffer)?;
        self.selection.clear();
        self.editor.clear();
        self.after_mutation();
        Ok(())
    }

    /// Re-apply the last reverted mutation. Clears the selection.
    ///
    /// # Errors
    /// Returns `NothingToRedo` if nothing was reverted since the last mutation.
    pub fn redo(&mut self) -> Result<()> {
        self.history.redo(&mut self.buffer)?;
        self.selection.clear();
        self.editor.clear();
        self.after_mutation();
        Ok(())
    }

    // ---------------------------------------------------------------- selection

    #[must_use]
    pub const fn selection_model(&self) -> &SelectionModel {
        &self.selection
    }

    /// Offset of the cursor
    #[must_use]
    pub const fn active(&self) -> Option<usize> {
        self.selection.active()
    }

    /// Selected range as inclusive `(min, max)`
    #[must_use]
    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection.normalized_range()
    }

    /// Selection if any, else the byte under the cursor
    pub(crate) fn edit_target(&self) -> Option<(usize, usize)> {
        self.selection
            .normalized_range()
            .or_else(|| self.selection.active().map(|o| (o, o)))
    }

    /// Move the cursor. With `extend` the selection grows from the previous cursor,
    /// without it the selection is dropped.
    ///
    /// # Errors
    /// Returns `OutOfRange` for an offset past the end.
    pub fn set_active(&mut self, offset: usize, extend: bool) -> Result<()> {
        self.check_offset(offset)?;
        if extend {
            self.selection.extend_selection(offset);
            self.selection.active = Some(offset);
        } else {
            self.selection.set_active(offset);
        }
        Ok(())
    }

    /// Move the cursor by one cell or one row. Moves that would leave the buffer (or
    /// happen without a cursor) are ignored. Returns whether the cursor moved.
    pub fn move_cursor(&mut self, movement: CursorMove, extend: bool) -> bool {
        let Some(current) = self.selection.active() else {
            return false;
        };
        let row = self.config.bytes_per_row;
        let next = match movement {
            CursorMove::Left => current.checked_sub(1),
            CursorMove::Right => current.checked_add(1),
            CursorMove::Up => current.checked_sub(row),
            CursorMove::Down => current.checked_add(row),
        };
        next.is_some_and(|offset| self.set_active(offset, extend).is_ok())
    }

    /// Select the bytes between two offsets, in any order.
    ///
    /// # Errors
    /// Returns `RangeOutOfBounds` if either end lies outside the buffer.
    pub fn select_range(&mut self, start: usize, end: usize) -> Result<()> {
        self.check_range(start, end)?;
        self.selection.select_range(start, end);
        Ok(())
    }

    pub const fn clear_selection(&mut self) {
        self.selection.clear();
    }

    #[must_use]
    pub fn clipboard(&self) -> &[u8] {
        self.selection.clipboard()
    }

    /// Put bytes into the clipboard without copying them from the buffer.
    pub fn set_clipboard(&mut self, bytes: Vec<u8>) {
        self.selection.set_clipboard(bytes);
    }

    /// Copy the selection (or the byte under the cursor) into the clipboard.
    /// Returns the number of copied bytes.
    ///
    /// # Errors
    /// Returns an error if the selection lies outside the buffer.
    pub fn copy(&mut self) -> Result<usize> {
        self.selection.copy(&self.buffer)
    }

    /// Paste the clipboard at the cursor as an undoable mutation, truncated at the
    /// buffer end. Returns the number of written bytes.
    ///
    /// # Errors
    /// Returns an error if the cursor lies outside the buffer.
    pub fn paste(&mut self) -> Result<usize> {
        let written = self.selection.paste(&mut self.buffer, &mut self.history)?;
        if written > 0 {
            self.after_mutation();
        }
        Ok(written)
    }

    // ---------------------------------------------------------------- queries

    /// Search the content. A directional search starts after (or before) the cursor,
    /// or at the start (or end) of the buffer without one. On success it selects the
    /// match and moves the cursor to its first byte.
    ///
    /// # Errors
    /// - Pattern errors (`EmptyPattern`, `InvalidHexPattern`, `InvalidRegex`)
    /// - `NotFound` if a directional search runs off the buffer
    ///
    /// # Example
    /// ```
    /// use bytelib::{Direction, EditSession, SearchMode, SearchOutcome};
    ///
    /// let mut session = EditSession::with_defaults();
    /// session.load(vec![0x41, 0x42, 0x43, 0x42]);
    ///
    /// let res = session.search("42", SearchMode::Hex, false, Direction::All).unwrap();
    /// assert_eq!(res, SearchOutcome::All(vec![1, 3]));
    /// ```
    pub fn search(
        &mut self,
        query: &str,
        mode: SearchMode,
        case_sensitive: bool,
        direction: Direction,
    ) -> Result<SearchOutcome> {
        let pattern = Pattern::parse(query, mode, case_sensitive)?;
        let from = self.selection.active();

        let outcome = match direction {
            Direction::All => SearchOutcome::All(search::find_all(&self.buffer, &pattern)),
            Direction::Next => SearchOutcome::Found(search::find_next(&self.buffer, &pattern, from)?),
            Direction::Prev => SearchOutcome::Found(search::find_prev(&self.buffer, &pattern, from)?),
        };

        if let SearchOutcome::Found(m) = &outcome {
            self.selection.set_active(m.offset);
            self.selection.select_range(m.offset, m.last());
        }
        self.search.hits = match &outcome {
            SearchOutcome::All(hits) => hits.clone(),
            SearchOutcome::Found(_) => search::find_all(&self.buffer, &pattern),
        };
        self.search.pattern = Some(pattern);

        tracing::debug!(
            query,
            ?mode,
            ?direction,
            hits = self.search.hits.len(),
            "search"
        );
        Ok(outcome)
    }

    /// Offsets where the last searched pattern matches the current content
    #[must_use]
    pub fn search_hits(&self) -> &[usize] {
        &self.search.hits
    }

    /// Forget the last search
    pub fn clear_search(&mut self) {
        self.search = SearchState::default();
    }

    /// Frequency table and entropy of a range.
    ///
    /// # Errors
    /// Returns `RangeOutOfBounds` if the range ends past the buffer.
    pub fn analyze(&self, range: Range<usize>) -> Result<RangeAnalysis> {
        analysis::analyze(&self.buffer, range.start, range.end)
    }

    /// Character class breakdown of a range.
    ///
    /// # Errors
    /// Returns `RangeOutOfBounds` if the range ends past the buffer.
    pub fn class_counts(&self, range: Range<usize>) -> Result<ClassCounts> {
        analysis::class_counts(&self.buffer, range.start, range.end)
    }

    /// Entropy per block of `block_size` bytes.
    ///
    /// # Errors
    /// Returns `InvalidBlockSize` if `block_size` is zero.
    pub fn block_entropies(&self, block_size: usize) -> Result<BlockEntropies<'_>> {
        analysis::block_entropies(&self.buffer, block_size)
    }

    /// Colour of every byte for a visualization mode, entropy blocks sized by the config.
    ///
    /// # Errors
    /// Returns an error if the configured block size is invalid.
    pub fn cell_colors(&self, mode: VizMode) -> Result<Vec<Rgb>> {
        viz::cell_colors(&self.buffer, mode, self.config.block_size)
    }

    /// Decode the bytes at an offset.
    ///
    /// # Errors
    /// Returns `OutOfRange` for an offset past the end.
    pub fn inspect(&self, offset: usize) -> Result<Inspection> {
        inspector::inspect(&self.buffer, offset)
    }
}
