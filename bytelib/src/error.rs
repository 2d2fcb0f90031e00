//! The `error` module defines the [`EditError`] enum that describes the errors that
//! can occur when reading, editing, searching, or analyzing an [`EditSession`].
//! It carries two pieces of information:
//! 1. Where the error occurred, e.g., while accessing the buffer or walking the history.
//! 2. What kind of error was encountered (via [`EditErrorKind`] enum).
//!
//! Every error is recoverable: an operation that returns one leaves the session
//! exactly as it was before the call.
//!
//! [`EditSession`]: crate::EditSession

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, EditError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("Error encountered while accessing the byte buffer:\n{0}")]
    BufferError(EditErrorKind),
    #[error("Error encountered while walking the edit history:\n{0}")]
    HistoryError(EditErrorKind),
    #[error("Error encountered during pattern search:\n{0}")]
    SearchError(EditErrorKind),
    #[error("Error encountered during byte analysis:\n{0}")]
    AnalysisError(EditErrorKind),
    #[error("Invalid engine configuration:\n{0}")]
    ConfigError(EditErrorKind),
}

impl EditError {
    /// Get the kind of the error regardless of where it occurred.
    #[must_use]
    pub const fn kind(&self) -> &EditErrorKind {
        match self {
            Self::BufferError(kind)
            | Self::HistoryError(kind)
            | Self::SearchError(kind)
            | Self::AnalysisError(kind)
            | Self::ConfigError(kind) => kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditErrorKind {
    /// Offset lies outside of `[0, length)`
    #[error("Offset 0x{0:X} is out of range")]
    OutOfRange(usize),
    /// Range is not fully contained in the buffer
    #[error("Range 0x{0:X}..0x{1:X} is out of bounds")]
    RangeOutOfBounds(usize, usize),
    /// Search requested with a zero-length pattern
    #[error("Search pattern is empty")]
    EmptyPattern,
    /// Directional search ran off the end (or start) of the buffer
    #[error("Pattern not found")]
    NotFound,
    /// Undo stack is empty
    #[error("Nothing to undo")]
    NothingToUndo,
    /// Redo stack is empty
    #[error("Nothing to redo")]
    NothingToRedo,
    /// Hex pattern has odd length or contains non-hex characters
    #[error("Invalid hex pattern: '{0}'")]
    InvalidHexPattern(String),
    /// Regex pattern failed to compile
    #[error("Invalid regex pattern: {0}")]
    InvalidRegex(String),
    /// Block size (or row width) of zero
    #[error("Block size must be greater than zero")]
    InvalidBlockSize,
    /// History capacity of zero
    #[error("History capacity must be greater than zero")]
    InvalidCapacity,
    /// Configuration document could not be parsed
    #[error("Could not parse configuration: {0}")]
    MalformedConfig(String),
}
