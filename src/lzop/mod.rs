//! lzop container format: the framing liblzo2 data travels in on disk.
//!
//! Layout of a `.lzo` file: the 9-byte magic, a checksummed header
//! (versions, method/level, flag bits, mode, mtime, optional filename),
//! then a sequence of blocks — each a big-endian `u32` uncompressed
//! length, `u32` stored length, optional per-block checksums, payload —
//! terminated by a zero uncompressed length. A block whose stored length
//! equals its uncompressed length holds the original bytes verbatim (the
//! format's rule when compression did not shrink a block).
//!
//! Only the three lzo1x strategies are lzop-compatible; all three
//! decompress through `lzo1x_decompress_safe`.
//!
//! All multi-byte fields are big-endian.

pub mod checksum;
pub mod read;
pub mod write;

pub use read::LzopReader;
pub use write::LzopWriter;

use crate::error::LzoError;
use crate::registry::selectors;
use std::io;

/// `{ 0x89, 'L', 'Z', 'O', 0x00, '\r', '\n', 0x1a, '\n' }`
pub const LZOP_MAGIC: [u8; 9] = [0x89, 0x4c, 0x5a, 0x4f, 0x00, 0x0d, 0x0a, 0x1a, 0x0a];

/// lzop tool version this writer claims.
pub const LZOP_VERSION: u16 = 0x1010;
/// Oldest lzop able to extract what this writer emits.
pub const LZOP_COMPAT_VERSION: u16 = 0x0940;
/// Oldest lzo library version whose output the reader accepts.
pub const MINIMUM_LZO_VERSION: u16 = 0x0100;

/// Block size used when the caller does not pick one.
pub const DEFAULT_BLOCK_SIZE: usize = 256 * 1024;
/// Upper bound on any block length field; larger values mean corruption.
pub const MAX_BLOCK_SIZE: usize = 64 * 1024 * 1024;

// ── Header flag bits ─────────────────────────────────────────────────────────

pub const F_ADLER32_D:     u32 = 0x0000_0001;
pub const F_ADLER32_C:     u32 = 0x0000_0002;
pub const F_H_EXTRA_FIELD: u32 = 0x0000_0040;
pub const F_CRC32_D:       u32 = 0x0000_0100;
pub const F_CRC32_C:       u32 = 0x0000_0200;
pub const F_MULTIPART:     u32 = 0x0000_0400;
pub const F_H_FILTER:      u32 = 0x0000_0800;
pub const F_H_CRC32:       u32 = 0x0000_1000;
pub const F_RESERVED:      u32 = 0x000f_c000;

/// The unix mode stamped into headers this writer emits (0o100644).
pub(crate) const HEADER_MODE: u32 = 0x81a4;

// ── Strategies ───────────────────────────────────────────────────────────────

/// The three codec strategies the lzop format can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LzopStrategy {
    /// Method 1: lzo1x_1, the balanced default.
    Lzo1x1,
    /// Method 2: lzo1x_15, fastest.
    Lzo1x15,
    /// Method 3: lzo1x_999, best ratio; honors graduated levels.
    Lzo1x999,
}

impl LzopStrategy {
    /// Compressor selector for this strategy.
    pub fn selector(self) -> u32 {
        match self {
            LzopStrategy::Lzo1x1 => selectors::LZO1X_1,
            LzopStrategy::Lzo1x15 => selectors::LZO1X_15,
            LzopStrategy::Lzo1x999 => selectors::LZO1X_999,
        }
    }

    /// The `(method, level)` byte pair written into the header.
    pub fn header_bytes(self) -> (u8, u8) {
        match self {
            LzopStrategy::Lzo1x1 => (1, 5),
            LzopStrategy::Lzo1x15 => (2, 1),
            LzopStrategy::Lzo1x999 => (3, 9),
        }
    }

    pub fn from_method(method: u8) -> Option<Self> {
        match method {
            1 => Some(LzopStrategy::Lzo1x1),
            2 => Some(LzopStrategy::Lzo1x15),
            3 => Some(LzopStrategy::Lzo1x999),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LzopStrategy::Lzo1x1 => "lzo1x_1",
            LzopStrategy::Lzo1x15 => "lzo1x_15",
            LzopStrategy::Lzo1x999 => "lzo1x_999",
        }
    }

    /// Parse a CLI strategy string.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "lzo1x_1" | "lzo1x-1" => Some(LzopStrategy::Lzo1x1),
            "lzo1x_15" | "lzo1x-15" => Some(LzopStrategy::Lzo1x15),
            "lzo1x_999" | "lzo1x-999" => Some(LzopStrategy::Lzo1x999),
            _ => None,
        }
    }
}

/// Parsed header fields the reader keeps for introspection.
#[derive(Debug, Clone, Copy)]
pub struct LzopHeader {
    pub lzop_version: u16,
    pub lib_version:  u16,
    pub strategy:     LzopStrategy,
    pub level:        u8,
    pub flags:        u32,
    pub mode:         u32,
    pub mtime:        u32,
}

pub(crate) fn to_io(e: LzoError) -> io::Error {
    match e {
        LzoError::Codec { .. } => io::Error::new(io::ErrorKind::InvalidData, e),
        other => io::Error::other(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_methods_round_trip() {
        for s in [LzopStrategy::Lzo1x1, LzopStrategy::Lzo1x15, LzopStrategy::Lzo1x999] {
            let (method, _) = s.header_bytes();
            assert_eq!(LzopStrategy::from_method(method), Some(s));
            assert_eq!(LzopStrategy::from_name(s.name()), Some(s));
        }
        assert_eq!(LzopStrategy::from_method(0), None);
        assert_eq!(LzopStrategy::from_method(4), None);
    }
}
