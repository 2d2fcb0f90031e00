//! # `bytelib`
//!
//! `bytelib` is a Rust library for editing and analyzing raw binary buffers.
//!
//! The library provides:
//! - Editing session with bounded undo/redo (via [`EditSession`] struct).
//! - Selection, clipboard, and two-keystroke hex entry.
//! - Hex, text, and regex search over the bytes.
//! - Byte statistics: frequency, Shannon entropy, and character classes.
//! - Data inspector and colour data for visualizations.
//! - Error handling with [`EditError`].
//!
//! ## Example
//!
//! ```
//! use bytelib::{Direction, EditSession, SearchMode, SearchOutcome};
//!
//! let mut session = EditSession::with_defaults();
//! session.load_named("blob.bin", b"Hello, hex!".to_vec());
//!
//! session.set_byte(0, b'J').unwrap();
//! let hits = session.search("hex", SearchMode::Text, true, Direction::All).unwrap();
//!
//! assert_eq!(hits, SearchOutcome::All(vec![7]));
//! assert_eq!(session.export_name(), "edited_blob.bin");
//! ```

mod analysis;
mod buffer;
mod byteedit;
mod config;
mod error;
mod format;
mod history;
mod inspector;
mod search;
mod selection;
mod session;
mod viz;

// Public APIs
pub use analysis::{
    BlockEntropies, BlockEntropy, ByteClass, ClassCounts, FrequencyTable, RangeAnalysis, analyze,
    block_entropies, class_counts, classify, entropy, entropy_of, frequency_table,
};
pub use buffer::ByteBuffer;
pub use byteedit::ByteEdit;
pub use config::{
    DEFAULT_BLOCK_SIZE, DEFAULT_BYTES_PER_ROW, DEFAULT_HISTORY_CAPACITY, EngineConfig,
};
pub use error::{EditError, EditErrorKind, Result};
pub use format::{HexRow, ascii_char, format_float, format_offset, format_with_separators, rows};
pub use history::HistoryStack;
pub use inspector::{FloatValue, Inspection, inspect};
pub use search::{
    Direction, Pattern, SearchMatch, SearchMode, find_all, find_all_matches, find_next,
    find_prev,
};
pub use selection::SelectionModel;
pub use session::{CursorMove, EditSession, SearchOutcome};
pub use viz::{Rgb, VizMode, cell_colors};
