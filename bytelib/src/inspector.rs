//! Decodes the bytes at an offset as fixed little-endian integers and a float.

use crate::buffer::ByteBuffer;
use crate::error::Result;
use crate::format::{format_float, format_with_separators};
use std::fmt;

/// Decoded 32-bit float
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FloatValue {
    /// Fewer than four bytes left after the offset
    Unavailable,
    /// Bit pattern decodes to NaN or an infinity
    Invalid,
    Value(f32),
}

impl fmt::Display for FloatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "unavailable"),
            Self::Invalid => write!(f, "invalid"),
            Self::Value(v) => write!(f, "{}", format_float(*v)),
        }
    }
}

/// Fixed-shape view of the bytes at one offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inspection {
    pub offset: usize,
    pub byte: u8,
    /// `None` if the 16-bit value runs past the buffer end
    pub int16: Option<i16>,
    /// `None` if the 32-bit value runs past the buffer end
    pub int32: Option<i32>,
    pub float32: FloatValue,
}

fn fmt_opt<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "unavailable".to_string(), format_with_separators)
}

impl fmt::Display for Inspection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Offset:  0x{:08X}", self.offset)?;
        writeln!(f, "u8:      {} (0x{:02X})", self.byte, self.byte)?;
        writeln!(f, "i16 LE:  {}", fmt_opt(self.int16))?;
        writeln!(f, "i32 LE:  {}", fmt_opt(self.int32))?;
        write!(f, "f32 LE:  {}", self.float32)
    }
}

/// Decode the bytes at the offset.
///
/// # Errors
/// Returns `OutOfRange` if the offset is not within the buffer.
///
/// # Example
/// ```
/// use bytelib::{ByteBuffer, FloatValue, inspect};
///
/// let buf = ByteBuffer::from(vec![0xFF; 4]);
/// let view = inspect(&buf, 0).unwrap();
///
/// assert_eq!(view.int32, Some(-1));
/// assert_eq!(view.float32, FloatValue::Invalid);
///
/// let view = inspect(&buf, 3).unwrap();
/// assert_eq!(view.int16, None);
/// ```
pub fn inspect(buffer: &ByteBuffer, offset: usize) -> Result<Inspection> {
    let byte = buffer.get_byte(offset)?;
    let data = buffer.as_bytes();

    let int16 = data
        .get(offset..offset + 2)
        .and_then(|b| b.try_into().ok())
        .map(i16::from_le_bytes);

    let word: Option<[u8; 4]> = data.get(offset..offset + 4).and_then(|b| b.try_into().ok());
    let int32 = word.map(i32::from_le_bytes);
    let float32 = match word.map(f32::from_le_bytes) {
        None => FloatValue::Unavailable,
        Some(v) if !v.is_finite() => FloatValue::Invalid,
        Some(v) => FloatValue::Value(v),
    };

    Ok(Inspection {
        offset,
        byte,
        int16,
        int32,
        float32,
    })
}
