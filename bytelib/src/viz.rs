//! Per-byte colour data for the visualization modes. Only the colour values are
//! computed here, drawing them is up to the front-end.

use crate::analysis::{self, ByteClass, FrequencyTable};
use crate::buffer::ByteBuffer;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum VizMode {
    /// Grey level equals the byte value
    #[default]
    Bitmap,
    /// Red to green by how common the byte value is in the whole buffer
    Density,
    /// Blue to red by the entropy of the block the byte belongs to
    Entropy,
    /// One colour per character class
    CharClass,
}

impl ByteClass {
    #[must_use]
    pub const fn color(self) -> Rgb {
        match self {
            Self::Printable => Rgb(0x00, 0xFF, 0x00),
            Self::Null => Rgb(0x00, 0x00, 0x00),
            Self::Control => Rgb(0x00, 0x00, 0xFF),
            Self::Extended => Rgb(0xFF, 0x00, 0x00),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale(ratio: f64) -> u8 {
    (ratio.clamp(0.0, 1.0) * 255.0).floor() as u8
}

#[allow(clippy::cast_precision_loss)]
fn density_colors(buffer: &ByteBuffer) -> Vec<Rgb> {
    let table = FrequencyTable::from_bytes(buffer.as_bytes());
    let max = table.max_count().max(1) as f64;
    buffer
        .iter()
        .map(|&b| {
            let intensity = scale(table.count(b) as f64 / max);
            Rgb(255 - intensity, intensity, 0)
        })
        .collect()
}

fn entropy_colors(buffer: &ByteBuffer, block_size: usize) -> Result<Vec<Rgb>> {
    let mut colors = Vec::with_capacity(buffer.len());
    for block in analysis::block_entropies(buffer, block_size)? {
        let e = scale(block.entropy);
        colors.extend(std::iter::repeat_n(Rgb(e, 0, 255 - e), block.len));
    }
    Ok(colors)
}

/// Colour of every byte of the buffer for the given mode.
///
/// # Errors
/// Returns `InvalidBlockSize` if `block_size` is zero in `Entropy` mode.
pub fn cell_colors(buffer: &ByteBuffer, mode: VizMode, block_size: usize) -> Result<Vec<Rgb>> {
    Ok(match mode {
        VizMode::Bitmap => buffer.iter().map(|&b| Rgb(b, b, b)).collect(),
        VizMode::Density => density_colors(buffer),
        VizMode::Entropy => entropy_colors(buffer, block_size)?,
        VizMode::CharClass => buffer
            .iter()
            .map(|&b| analysis::classify(b).color())
            .collect(),
    })
}
