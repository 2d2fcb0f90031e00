//! Byte-level statistics: frequency tables, Shannon entropy, and character classes.
//!
//! Entropy is reported normalized to `[0, 1]`, i.e. divided by 8 bits per symbol,
//! which is the maximum for a byte alphabet.

use crate::buffer::ByteBuffer;
use crate::error::{EditError, EditErrorKind, Result};

/// Occurrence count of every byte value over a range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
    total: u64,
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self {
            counts: [0; 256],
            total: 0,
        }
    }
}

impl FrequencyTable {
    /// Count bytes of a slice
    #[must_use]
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::default();
        for &byte in data {
            table.counts[byte as usize] += 1;
        }
        table.total = data.len() as u64;
        table
    }

    /// Occurrences of one byte value
    #[must_use]
    pub const fn count(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    #[must_use]
    pub const fn counts(&self) -> &[u64; 256] {
        &self.counts
    }

    /// Number of counted bytes
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Highest count of any byte value
    #[must_use]
    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Most frequent byte value and its count. Ties resolve to the smallest value.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn most_common(&self) -> Option<(u8, u64)> {
        let max = self.max_count();
        if max == 0 {
            return None;
        }
        self.counts
            .iter()
            .position(|&c| c == max)
            .map(|byte| (byte as u8, max))
    }

    /// Number of distinct byte values present
    #[must_use]
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Normalized Shannon entropy of the counted bytes. Zero for an empty table.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn entropy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let total = self.total as f64;
        let bits: f64 = self
            .counts
            .iter()
            .filter(|&&c| c > 0)
            .map(|&c| {
                let p = c as f64 / total;
                -p * p.log2()
            })
            .sum();
        // A single distinct value sums to -0.0
        if bits <= 0.0 {
            return 0.0;
        }
        bits / 8.0
    }
}

/// Frequency table and entropy of one range
#[derive(Debug, Clone, PartialEq)]
pub struct RangeAnalysis {
    pub start: usize,
    pub end: usize,
    pub frequency: FrequencyTable,
    pub entropy: f64,
}

/// Character class of a byte, used to pick a display colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteClass {
    /// 32..=126
    Printable,
    /// 0
    Null,
    /// 1..=31
    Control,
    /// 127..=255
    Extended,
}

/// Classify a byte. Pure function, no state.
///
/// # Example
/// ```
/// use bytelib::{ByteClass, classify};
///
/// assert_eq!(classify(b'A'), ByteClass::Printable);
/// assert_eq!(classify(0x00), ByteClass::Null);
/// assert_eq!(classify(0x0A), ByteClass::Control);
/// assert_eq!(classify(0x7F), ByteClass::Extended);
/// ```
#[must_use]
pub const fn classify(byte: u8) -> ByteClass {
    match byte {
        0 => ByteClass::Null,
        1..=31 => ByteClass::Control,
        32..=126 => ByteClass::Printable,
        127..=255 => ByteClass::Extended,
    }
}

/// Number of bytes of every class in a range
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClassCounts {
    pub printable: usize,
    pub null: usize,
    pub control: usize,
    pub extended: usize,
}

impl ClassCounts {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.printable + self.null + self.control + self.extended
    }

    /// Share of one class in `[0, 1]`, zero for an empty range
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self, class: ByteClass) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let count = match class {
            ByteClass::Printable => self.printable,
            ByteClass::Null => self.null,
            ByteClass::Control => self.control,
            ByteClass::Extended => self.extended,
        };
        count as f64 / total as f64
    }
}

fn checked_range(buffer: &ByteBuffer, start: usize, end: usize) -> Result<&[u8]> {
    if start >= end {
        return Ok(&[]);
    }
    buffer
        .as_bytes()
        .get(start..end)
        .ok_or(EditError::AnalysisError(EditErrorKind::RangeOutOfBounds(
            start, end,
        )))
}

/// Count every byte value in `[start, end)`. An empty or reversed range yields an
/// all-zero table.
///
/// # Errors
/// Returns `RangeOutOfBounds` if `end` exceeds the buffer length.
pub fn frequency_table(buffer: &ByteBuffer, start: usize, end: usize) -> Result<FrequencyTable> {
    checked_range(buffer, start, end).map(FrequencyTable::from_bytes)
}

/// Normalized Shannon entropy of `[start, end)`. A degenerate range (`start >= end`)
/// has zero entropy.
///
/// # Errors
/// Returns `RangeOutOfBounds` if `end` exceeds the buffer length.
///
/// # Example
/// ```
/// use bytelib::{ByteBuffer, entropy};
///
/// let uniform = ByteBuffer::from((0..=255).collect::<Vec<u8>>());
/// let flat = ByteBuffer::from(vec![7; 256]);
///
/// assert!((entropy(&uniform, 0, 256).unwrap() - 1.0).abs() < 1e-12);
/// assert_eq!(entropy(&flat, 0, 256).unwrap(), 0.0);
/// assert_eq!(entropy(&flat, 10, 10).unwrap(), 0.0);
/// ```
pub fn entropy(buffer: &ByteBuffer, start: usize, end: usize) -> Result<f64> {
    frequency_table(buffer, start, end).map(|table| table.entropy())
}

/// Normalized Shannon entropy of a slice
#[must_use]
pub fn entropy_of(data: &[u8]) -> f64 {
    FrequencyTable::from_bytes(data).entropy()
}

/// Frequency table together with the entropy of `[start, end)`.
///
/// # Errors
/// Returns `RangeOutOfBounds` if `end` exceeds the buffer length.
pub fn analyze(buffer: &ByteBuffer, start: usize, end: usize) -> Result<RangeAnalysis> {
    let frequency = frequency_table(buffer, start, end)?;
    let entropy = frequency.entropy();
    Ok(RangeAnalysis {
        start,
        end,
        frequency,
        entropy,
    })
}

/// Count the character classes in `[start, end)`.
///
/// # Errors
/// Returns `RangeOutOfBounds` if `end` exceeds the buffer length.
pub fn class_counts(buffer: &ByteBuffer, start: usize, end: usize) -> Result<ClassCounts> {
    let data = checked_range(buffer, start, end)?;
    let mut counts = ClassCounts::default();
    for &byte in data {
        match classify(byte) {
            ByteClass::Printable => counts.printable += 1,
            ByteClass::Null => counts.null += 1,
            ByteClass::Control => counts.control += 1,
            ByteClass::Extended => counts.extended += 1,
        }
    }
    Ok(counts)
}

/// Entropy of every `block_size` block of the buffer, the last block truncated to
/// the remaining length. Every call starts over from the first block.
///
/// # Errors
/// Returns `InvalidBlockSize` if `block_size` is zero.
///
/// # Example
/// ```
/// use bytelib::{ByteBuffer, block_entropies};
///
/// let buf = ByteBuffer::from(vec![0; 600]);
/// let blocks = block_entropies(&buf, 256).unwrap();
///
/// assert_eq!(blocks.len(), 3);
/// assert!(blocks.clone().all(|b| b.entropy == 0.0));
/// assert_eq!(blocks.last().map(|b| b.len), Some(88));
/// ```
pub fn block_entropies(buffer: &ByteBuffer, block_size: usize) -> Result<BlockEntropies<'_>> {
    if block_size == 0 {
        return Err(EditError::AnalysisError(EditErrorKind::InvalidBlockSize));
    }
    Ok(BlockEntropies {
        chunks: buffer.as_bytes().chunks(block_size),
        block_size,
        index: 0,
    })
}

/// Entropy of a single block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockEntropy {
    /// Offset of the first byte of the block
    pub offset: usize,
    /// Number of bytes in the block
    pub len: usize,
    /// Normalized entropy in `[0, 1]`
    pub entropy: f64,
}

/// Lazy iterator over block entropies, see [`block_entropies`]
#[derive(Debug, Clone)]
pub struct BlockEntropies<'a> {
    chunks: std::slice::Chunks<'a, u8>,
    block_size: usize,
    index: usize,
}

impl Iterator for BlockEntropies<'_> {
    type Item = BlockEntropy;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk = self.chunks.next()?;
        let block = BlockEntropy {
            offset: self.index * self.block_size,
            len: chunk.len(),
            entropy: entropy_of(chunk),
        };
        self.index += 1;
        Some(block)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for BlockEntropies<'_> {}
