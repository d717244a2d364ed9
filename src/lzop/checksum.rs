//! Block and header checksums for the lzop container.
//!
//! Adler-32 is computed through the loaded library's own `lzo_adler32`
//! entry point — resolved by name like every other symbol — because that
//! is the routine lzop itself trusts. CRC32 is the zlib polynomial.

use crate::ffi::Adler32Fn;

const ADLER32_INIT: u32 = 1;

pub(crate) fn adler32(f: Adler32Fn, data: &[u8]) -> u32 {
    unsafe { f(ADLER32_INIT, data.as_ptr(), data.len()) }
}

pub(crate) fn crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Checksums over *decompressed* block data, in stream order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DChecksum {
    Adler32,
    Crc32,
}

impl DChecksum {
    pub fn header_mask(self) -> u32 {
        match self {
            DChecksum::Adler32 => super::F_ADLER32_D,
            DChecksum::Crc32 => super::F_CRC32_D,
        }
    }

    /// The checksums a header's flag word declares, in the order they
    /// appear in each block.
    pub fn present_in(flags: u32) -> Vec<DChecksum> {
        [DChecksum::Adler32, DChecksum::Crc32]
            .into_iter()
            .filter(|c| flags & c.header_mask() != 0)
            .collect()
    }

    pub(crate) fn compute(self, adler: Adler32Fn, data: &[u8]) -> u32 {
        match self {
            DChecksum::Adler32 => adler32(adler, data),
            DChecksum::Crc32 => crc32(data),
        }
    }
}

/// Checksums over *compressed* block data. Absent on stored blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CChecksum {
    Adler32,
    Crc32,
}

impl CChecksum {
    pub fn header_mask(self) -> u32 {
        match self {
            CChecksum::Adler32 => super::F_ADLER32_C,
            CChecksum::Crc32 => super::F_CRC32_C,
        }
    }

    pub fn present_in(flags: u32) -> Vec<CChecksum> {
        [CChecksum::Adler32, CChecksum::Crc32]
            .into_iter()
            .filter(|c| flags & c.header_mask() != 0)
            .collect()
    }

    pub(crate) fn compute(self, adler: Adler32Fn, data: &[u8]) -> u32 {
        match self {
            CChecksum::Adler32 => adler32(adler, data),
            CChecksum::Crc32 => crc32(data),
        }
    }
}
