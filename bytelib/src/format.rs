//! Text helpers for presenting bytes: hex dump rows, printable characters, and
//! human-readable numbers.

use crate::buffer::ByteBuffer;
use std::fmt;

/// The byte as a printable ASCII character, `.` otherwise
#[must_use]
pub const fn ascii_char(byte: u8) -> char {
    if byte >= 32 && byte <= 126 {
        byte as char
    } else {
        '.'
    }
}

/// Offset as 8 upper-case hex digits
#[must_use]
pub fn format_offset(offset: usize) -> String {
    format!("{offset:08X}")
}

/// Decimal number with `,` between groups of three digits, e.g. `-65,536`
#[allow(clippy::needless_pass_by_value)]
pub fn format_with_separators<T: ToString>(n: T) -> String {
    let text = n.to_string();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };

    let lead = match digits.len() % 3 {
        0 => 3,
        r => r,
    };
    let mut out = String::with_capacity(text.len() + digits.len() / 3);
    out.push_str(sign);
    for (idx, ch) in digits.chars().enumerate() {
        if idx >= lead && (idx - lead) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format the float so that it is nicely presented
pub fn format_float<T: Into<f64>>(float_value: T) -> String {
    let f = float_value.into();

    // Decide between normal or scientific notation
    if f.abs() >= 1e6 || (f != 0.0 && f.abs() < 1e-5) {
        let formatted = format!("{f:.9e}");
        // Trim zeros of the mantissa only
        return match formatted.split_once('e') {
            Some((mantissa, exp)) => {
                let mantissa = mantissa.trim_end_matches('0').trim_end_matches('.');
                format!("{mantissa}e{exp}")
            }
            None => formatted,
        };
    }

    let formatted = format!("{f:.9}");

    // Trim trailing zeros and possible trailing decimal point
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');

    // Split into integer + fractional parts
    let mut parts = trimmed.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next().unwrap_or("");

    if frac_part.is_empty() {
        return format_with_separators(int_part);
    }
    format!("{}.{}", format_with_separators(int_part), frac_part)
}

/// One row of a hex dump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexRow<'a> {
    pub offset: usize,
    pub bytes: &'a [u8],
    /// Row width, used to pad the last (short) row
    pub width: usize,
}

impl fmt::Display for HexRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  ", format_offset(self.offset))?;
        for idx in 0..self.width {
            match self.bytes.get(idx) {
                Some(byte) => write!(f, "{byte:02X} ")?,
                None => write!(f, "   ")?,
            }
        }
        let ascii: String = self.bytes.iter().map(|&b| ascii_char(b)).collect();
        write!(f, " |{ascii}|")
    }
}

/// Split the buffer into rows of `width` bytes. A zero width is treated as one.
pub fn rows(buffer: &ByteBuffer, width: usize) -> impl Iterator<Item = HexRow<'_>> {
    let width = width.max(1);
    buffer
        .as_bytes()
        .chunks(width)
        .enumerate()
        .map(move |(idx, bytes)| HexRow {
            offset: idx * width,
            bytes,
            width,
        })
}
