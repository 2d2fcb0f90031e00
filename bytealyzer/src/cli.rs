use bytelib::{SearchMode, VizMode};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "bytealyzer",
    version,
    about = "Binary buffer editor & byte-structure analyzer",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Log at debug level (overrides BYTEALYZER_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Engine config file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of undo snapshots to keep
    #[arg(long, global = true, value_name = "N")]
    pub history: Option<usize>,

    /// Block size for blockwise entropy
    #[arg(long, global = true, value_name = "N")]
    pub block_size: Option<usize>,

    /// Bytes per dump row
    #[arg(long, global = true, value_name = "N")]
    pub width: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Size, entropy, byte classes and the most common byte
    Info { file: PathBuf },
    /// Hex dump of the whole file or a part of it
    Dump {
        file: PathBuf,
        /// First byte to show
        #[arg(long, value_parser = parse_offset, default_value = "0")]
        offset: usize,
        /// Number of bytes to show
        #[arg(long, value_parser = parse_offset)]
        length: Option<usize>,
    },
    /// Offsets of all matches of a pattern
    Search {
        file: PathBuf,
        pattern: String,
        #[arg(long, value_enum, default_value_t = ModeArg::Hex)]
        mode: ModeArg,
        /// Fold ASCII upper-case letters (text mode) or match case-insensitively (regex mode)
        #[arg(short = 'i', long)]
        ignore_case: bool,
    },
    /// Decode the bytes at an offset
    Inspect {
        file: PathBuf,
        #[arg(value_parser = parse_offset)]
        offset: usize,
    },
    /// Entropy per block
    Entropy { file: PathBuf },
    /// Write hex bytes at an offset and save the result
    Patch {
        file: PathBuf,
        #[arg(value_parser = parse_offset)]
        offset: usize,
        /// Hex digit pairs, e.g. "DE AD BE EF"
        bytes: String,
        /// Output path (default: edited_<name> next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Colour of every byte as `offset r g b` rows
    Viz {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = VizArg::Bitmap)]
        mode: VizArg,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    Hex,
    Text,
    Regex,
}

impl From<ModeArg> for SearchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Hex => Self::Hex,
            ModeArg::Text => Self::Text,
            ModeArg::Regex => Self::Regex,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VizArg {
    Bitmap,
    Density,
    Entropy,
    Class,
}

impl From<VizArg> for VizMode {
    fn from(mode: VizArg) -> Self {
        match mode {
            VizArg::Bitmap => Self::Bitmap,
            VizArg::Density => Self::Density,
            VizArg::Entropy => Self::Entropy,
            VizArg::Class => Self::CharClass,
        }
    }
}

/// Parse an offset given in decimal or as hex with a 0x prefix
pub fn parse_offset(s: &str) -> Result<usize, String> {
    let s = s.trim();
    let invalid = || format!("Invalid offset: {s}");

    let (digits, radix) = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex_str) => (hex_str, 16),
        None => (s, 10),
    };
    // Both parsers would accept a leading '+'
    if !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(invalid());
    }
    usize::from_str_radix(digits, radix).map_err(|_| invalid())
}
