//! Pattern search over a [`ByteBuffer`].
//!
//! Hex and text patterns are matched with a brute-force sliding window, so every
//! (possibly overlapping) occurrence is reported. Regex patterns are matched with
//! `regex::bytes`. [`find_all`] reports non-overlapping, non-empty matches, while
//! [`find_next`] and [`find_prev`] consider a non-empty match at every start.

use crate::buffer::ByteBuffer;
use crate::error::{EditError, EditErrorKind, Result};
use regex::bytes::{Regex, RegexBuilder};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Byte pattern written as hex digits, e.g. `DEADBEEF`
    #[default]
    Hex,
    /// Literal text, optionally matched case-insensitively
    Text,
    /// Byte regex
    Regex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
    All,
}

/// Location and length of a single match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    pub offset: usize,
    pub len: usize,
}

impl SearchMatch {
    /// Offset of the last matched byte
    #[must_use]
    pub const fn last(&self) -> usize {
        self.offset + self.len - 1
    }
}

#[derive(Debug, Clone)]
pub enum Pattern {
    Hex(Vec<u8>),
    /// Text bytes are stored already folded when `case_sensitive` is false
    Text {
        bytes: Vec<u8>,
        case_sensitive: bool,
    },
    Regex(Regex),
}

impl Pattern {
    /// Build a pattern from user input.
    ///
    /// Hex input may contain whitespace between digits (`"DE AD"`). Text input is
    /// matched by its UTF-8 bytes. The case flag only applies to text and regex modes.
    ///
    /// # Errors
    /// - `EmptyPattern` if the input holds no pattern bytes
    /// - `InvalidHexPattern` if hex input has odd length or non-hex characters
    /// - `InvalidRegex` if the regex fails to compile
    ///
    /// # Example
    /// ```
    /// use bytelib::{Pattern, SearchMode};
    ///
    /// let pattern = Pattern::parse("41 42", SearchMode::Hex, true).unwrap();
    /// assert_eq!(pattern.fixed_bytes(), Some(&[0x41, 0x42][..]));
    ///
    /// assert!(Pattern::parse("4", SearchMode::Hex, true).is_err());
    /// ```
    pub fn parse(input: &str, mode: SearchMode, case_sensitive: bool) -> Result<Self> {
        if input.is_empty() {
            return Err(EditError::SearchError(EditErrorKind::EmptyPattern));
        }
        match mode {
            SearchMode::Hex => parse_str_into_bytes(input).map(Self::Hex),
            SearchMode::Text => {
                let mut bytes = input.as_bytes().to_vec();
                if !case_sensitive {
                    bytes.iter_mut().for_each(|b| *b = fold_case(*b));
                }
                Ok(Self::Text {
                    bytes,
                    case_sensitive,
                })
            }
            SearchMode::Regex => RegexBuilder::new(input)
                .case_insensitive(!case_sensitive)
                .build()
                .map(Self::Regex)
                .map_err(|err| EditError::SearchError(EditErrorKind::InvalidRegex(err.to_string()))),
        }
    }

    /// Pattern bytes for hex and text patterns, `None` for regex
    #[must_use]
    pub fn fixed_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Hex(bytes) | Self::Text { bytes, .. } => Some(bytes),
            Self::Regex(_) => None,
        }
    }

    /// Does a fixed pattern match at the offset
    fn matches_at(&self, data: &[u8], offset: usize) -> bool {
        match self {
            Self::Hex(bytes) => data.get(offset..offset + bytes.len()) == Some(bytes.as_slice()),
            Self::Text {
                bytes,
                case_sensitive,
            } => data
                .get(offset..offset + bytes.len())
                .is_some_and(|window| matches_window(window, bytes, *case_sensitive)),
            Self::Regex(_) => false,
        }
    }
}

/// Fold ASCII uppercase letters to lowercase. Nothing else is touched.
const fn fold_case(b: u8) -> u8 {
    if b >= 0x41 && b <= 0x5A { b + 0x20 } else { b }
}

fn matches_window(window: &[u8], pattern: &[u8], case_sensitive: bool) -> bool {
    if case_sensitive {
        return window == pattern;
    }
    window
        .iter()
        .zip(pattern)
        .all(|(&hay, &pat)| fold_case(hay) == pat)
}

/// Parse a string of hex digit pairs into bytes. Whitespace is ignored.
fn parse_str_into_bytes(s: &str) -> Result<Vec<u8>> {
    let digits: Vec<u8> = s.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if digits.is_empty() {
        return Err(EditError::SearchError(EditErrorKind::EmptyPattern));
    }
    let invalid = || EditError::SearchError(EditErrorKind::InvalidHexPattern(s.to_string()));
    if !digits.len().is_multiple_of(2) {
        return Err(invalid());
    }
    digits
        .chunks_exact(2)
        .map(|pair| {
            // from_str_radix alone would accept a leading '+'
            if !pair.iter().all(u8::is_ascii_hexdigit) {
                return Err(invalid());
            }
            std::str::from_utf8(pair)
                .ok()
                .and_then(|p| u8::from_str_radix(p, 16).ok())
                .ok_or_else(invalid)
        })
        .collect()
}

/// Returns the starting offsets of all matches, in ascending order.
///
/// # Example
/// ```
/// use bytelib::{ByteBuffer, Pattern, SearchMode, find_all};
///
/// let buf = ByteBuffer::from(vec![0x41, 0x42, 0x43, 0x42]);
/// let pattern = Pattern::parse("42", SearchMode::Hex, false).unwrap();
///
/// assert_eq!(find_all(&buf, &pattern), vec![1, 3]);
/// ```
#[must_use]
pub fn find_all(buffer: &ByteBuffer, pattern: &Pattern) -> Vec<usize> {
    find_all_matches(buffer, pattern)
        .into_iter()
        .map(|m| m.offset)
        .collect()
}

/// Same as [`find_all`] but keeps the length of each match.
#[must_use]
pub fn find_all_matches(buffer: &ByteBuffer, pattern: &Pattern) -> Vec<SearchMatch> {
    let data = buffer.as_bytes();
    match pattern {
        Pattern::Regex(re) => re
            .find_iter(data)
            .filter(|m| !m.is_empty())
            .map(|m| SearchMatch {
                offset: m.start(),
                len: m.len(),
            })
            .collect(),
        Pattern::Hex(bytes) | Pattern::Text { bytes, .. } => {
            let size = bytes.len();
            if size == 0 || size > data.len() {
                return vec![];
            }
            (0..=data.len() - size)
                .filter(|&offset| pattern.matches_at(data, offset))
                .map(|offset| SearchMatch { offset, len: size })
                .collect()
        }
    }
}

/// First match starting strictly after `from`, scanning forward. `None` starts the
/// scan at offset 0. There is no wrap-around.
///
/// # Errors
/// Returns `NotFound` if no match starts after `from`.
pub fn find_next(buffer: &ByteBuffer, pattern: &Pattern, from: Option<usize>) -> Result<SearchMatch> {
    let data = buffer.as_bytes();
    let start = from.map_or(0, |f| f.saturating_add(1));
    let not_found = EditError::SearchError(EditErrorKind::NotFound);

    match pattern {
        Pattern::Regex(re) => {
            let mut pos = start;
            while pos <= data.len() {
                let Some(m) = re.find_at(data, pos) else {
                    break;
                };
                if !m.is_empty() {
                    return Ok(SearchMatch {
                        offset: m.start(),
                        len: m.len(),
                    });
                }
                pos = m.end() + 1;
            }
            Err(not_found)
        }
        Pattern::Hex(bytes) | Pattern::Text { bytes, .. } => {
            let size = bytes.len();
            if size == 0 || size > data.len() {
                return Err(not_found);
            }
            (start..=data.len() - size)
                .find(|&offset| pattern.matches_at(data, offset))
                .map(|offset| SearchMatch { offset, len: size })
                .ok_or(not_found)
        }
    }
}

/// First match starting strictly before `from`, scanning backward from `from - 1`.
/// `None` starts the scan at the end of the buffer.
///
/// # Errors
/// Returns `NotFound` if no match starts before `from`.
pub fn find_prev(buffer: &ByteBuffer, pattern: &Pattern, from: Option<usize>) -> Result<SearchMatch> {
    let data = buffer.as_bytes();
    let limit = from.unwrap_or(data.len());
    let not_found = EditError::SearchError(EditErrorKind::NotFound);

    match pattern {
        Pattern::Regex(re) => (0..limit.min(data.len() + 1))
            .rev()
            .find_map(|pos| {
                re.find_at(data, pos)
                    .filter(|m| !m.is_empty() && m.start() == pos)
                    .map(|m| SearchMatch {
                        offset: m.start(),
                        len: m.len(),
                    })
            })
            .ok_or(not_found),
        Pattern::Hex(bytes) | Pattern::Text { bytes, .. } => {
            let size = bytes.len();
            if size == 0 || size > data.len() || limit == 0 {
                return Err(not_found);
            }
            let last = (limit - 1).min(data.len() - size);
            (0..=last)
                .rev()
                .find(|&offset| pattern.matches_at(data, offset))
                .map(|offset| SearchMatch { offset, len: size })
                .ok_or(not_found)
        }
    }
}
