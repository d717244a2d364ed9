//! Algorithm registry: frozen selector tables for the LZO family.
//!
//! # Identity rules
//! Every codec variant is identified by a small integer selector — the
//! index into one of the two tables below. Those indices are permanent:
//! they are never recycled or renumbered between releases, and reordering
//! a table is a breaking change. Compressor and decompressor selectors are
//! separate, independently numbered spaces.
//!
//! Working-memory sizes follow the liblzo2 header formulas, parameterised
//! on the host's pointer width exactly as the C headers are
//! (`lzo_sizeof_dict_t` is `sizeof(lzo_bytep)`). Decompression needs no
//! working memory.

use crate::error::LzoError;
use crate::ffi::LzoUint;
use std::mem::size_of;

// ── Working-memory formulas (lzo1*.h / lzo2a.h) ─────────────────────────────

const DICT:  usize = size_of::<*const u8>(); // lzo_sizeof_dict_t
const SHORT: usize = size_of::<u16>();
const XINT:  usize = size_of::<LzoUint>();

pub const LZO1_MEM_COMPRESS:        usize = 8192 * DICT;
pub const LZO1_99_MEM_COMPRESS:     usize = 65536 * DICT;
pub const LZO1A_MEM_COMPRESS:       usize = 8192 * DICT;
pub const LZO1A_99_MEM_COMPRESS:    usize = 65536 * DICT;
pub const LZO1B_MEM_COMPRESS:       usize = 16384 * DICT;
pub const LZO1B_99_MEM_COMPRESS:    usize = 65536 * DICT;
pub const LZO1B_999_MEM_COMPRESS:   usize = 3 * 65536 * XINT;
pub const LZO1C_MEM_COMPRESS:       usize = 16384 * DICT;
pub const LZO1C_99_MEM_COMPRESS:    usize = 65536 * DICT;
pub const LZO1C_999_MEM_COMPRESS:   usize = 5 * 16384 * SHORT;
pub const LZO1F_MEM_COMPRESS:       usize = 16384 * DICT;
pub const LZO1F_999_MEM_COMPRESS:   usize = 5 * 16384 * SHORT;
pub const LZO1X_1_MEM_COMPRESS:     usize = 16384 * DICT;
pub const LZO1X_1_11_MEM_COMPRESS:  usize = 2048 * DICT;
pub const LZO1X_1_12_MEM_COMPRESS:  usize = 4096 * DICT;
pub const LZO1X_1_15_MEM_COMPRESS:  usize = 32768 * DICT;
pub const LZO1X_999_MEM_COMPRESS:   usize = 14 * 16384 * SHORT;
pub const LZO1Y_MEM_COMPRESS:       usize = 16384 * DICT;
pub const LZO1Y_999_MEM_COMPRESS:   usize = 14 * 16384 * SHORT;
pub const LZO1Z_999_MEM_COMPRESS:   usize = 14 * 16384 * SHORT;
pub const LZO2A_999_MEM_COMPRESS:   usize = 8 * 16384 * SHORT;

// ── Fixed levels (lzo1b.h / lzo1c.h) ─────────────────────────────────────────
//
// -1 is a sentinel the native entry itself interprets as "default"; it
// flows through the leveled call shape unchanged.

pub const BEST_SPEED:          i32 = 1;
pub const BEST_COMPRESSION:    i32 = 9;
pub const DEFAULT_COMPRESSION: i32 = -1;

// ── Descriptors ──────────────────────────────────────────────────────────────

/// One compressor table entry: native symbol, scratch-memory requirement,
/// and the baked-in level for the variants whose entry point takes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressorDescriptor {
    pub symbol:         &'static str,
    pub working_memory: usize,
    pub fixed_level:    Option<i32>,
}

/// One decompressor table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecompressorDescriptor {
    pub symbol: &'static str,
}

const fn c(symbol: &'static str, working_memory: usize, fixed_level: Option<i32>) -> CompressorDescriptor {
    CompressorDescriptor { symbol, working_memory, fixed_level }
}

const fn d(symbol: &'static str) -> DecompressorDescriptor {
    DecompressorDescriptor { symbol }
}

/// The compressor selector space. Indices are the public contract.
pub static COMPRESSORS: [CompressorDescriptor; 43] = [
    /* lzo1 */
    /*  0 */ c("lzo1_compress",      LZO1_MEM_COMPRESS,      None),
    /*  1 */ c("lzo1_99_compress",   LZO1_99_MEM_COMPRESS,   None),
    /* lzo1a */
    /*  2 */ c("lzo1a_compress",     LZO1A_MEM_COMPRESS,     None),
    /*  3 */ c("lzo1a_99_compress",  LZO1A_99_MEM_COMPRESS,  None),
    /* lzo1b */
    /*  4 */ c("lzo1b_compress",     LZO1B_MEM_COMPRESS,     Some(DEFAULT_COMPRESSION)),
    /*  5 */ c("lzo1b_compress",     LZO1B_MEM_COMPRESS,     Some(BEST_SPEED)),
    /*  6 */ c("lzo1b_compress",     LZO1B_MEM_COMPRESS,     Some(BEST_COMPRESSION)),
    /*  7 */ c("lzo1b_1_compress",   LZO1B_MEM_COMPRESS,     None),
    /*  8 */ c("lzo1b_2_compress",   LZO1B_MEM_COMPRESS,     None),
    /*  9 */ c("lzo1b_3_compress",   LZO1B_MEM_COMPRESS,     None),
    /* 10 */ c("lzo1b_4_compress",   LZO1B_MEM_COMPRESS,     None),
    /* 11 */ c("lzo1b_5_compress",   LZO1B_MEM_COMPRESS,     None),
    /* 12 */ c("lzo1b_6_compress",   LZO1B_MEM_COMPRESS,     None),
    /* 13 */ c("lzo1b_7_compress",   LZO1B_MEM_COMPRESS,     None),
    /* 14 */ c("lzo1b_8_compress",   LZO1B_MEM_COMPRESS,     None),
    /* 15 */ c("lzo1b_9_compress",   LZO1B_MEM_COMPRESS,     None),
    /* 16 */ c("lzo1b_99_compress",  LZO1B_99_MEM_COMPRESS,  None),
    /* 17 */ c("lzo1b_999_compress", LZO1B_999_MEM_COMPRESS, None),
    /* lzo1c */
    /* 18 */ c("lzo1c_compress",     LZO1C_MEM_COMPRESS,     Some(DEFAULT_COMPRESSION)),
    /* 19 */ c("lzo1c_compress",     LZO1C_MEM_COMPRESS,     Some(BEST_SPEED)),
    /* 20 */ c("lzo1c_compress",     LZO1C_MEM_COMPRESS,     Some(BEST_COMPRESSION)),
    /* 21 */ c("lzo1c_1_compress",   LZO1C_MEM_COMPRESS,     None),
    /* 22 */ c("lzo1c_2_compress",   LZO1C_MEM_COMPRESS,     None),
    /* 23 */ c("lzo1c_3_compress",   LZO1C_MEM_COMPRESS,     None),
    /* 24 */ c("lzo1c_4_compress",   LZO1C_MEM_COMPRESS,     None),
    /* 25 */ c("lzo1c_5_compress",   LZO1C_MEM_COMPRESS,     None),
    /* 26 */ c("lzo1c_6_compress",   LZO1C_MEM_COMPRESS,     None),
    /* 27 */ c("lzo1c_7_compress",   LZO1C_MEM_COMPRESS,     None),
    /* 28 */ c("lzo1c_8_compress",   LZO1C_MEM_COMPRESS,     None),
    /* 29 */ c("lzo1c_9_compress",   LZO1C_MEM_COMPRESS,     None),
    /* 30 */ c("lzo1c_99_compress",  LZO1C_99_MEM_COMPRESS,  None),
    /* 31 */ c("lzo1c_999_compress", LZO1C_999_MEM_COMPRESS, None),
    /* lzo1f */
    /* 32 */ c("lzo1f_1_compress",   LZO1F_MEM_COMPRESS,     None),
    /* 33 */ c("lzo1f_999_compress", LZO1F_999_MEM_COMPRESS, None),
    /* lzo1x */
    /* 34 */ c("lzo1x_1_compress",   LZO1X_1_MEM_COMPRESS,    None),
    /* 35 */ c("lzo1x_11_compress",  LZO1X_1_11_MEM_COMPRESS, None),
    /* 36 */ c("lzo1x_12_compress",  LZO1X_1_12_MEM_COMPRESS, None),
    /* 37 */ c("lzo1x_15_compress",  LZO1X_1_15_MEM_COMPRESS, None),
    /* 38 */ c("lzo1x_999_compress", LZO1X_999_MEM_COMPRESS,  None),
    /* lzo1y */
    /* 39 */ c("lzo1y_1_compress",   LZO1Y_MEM_COMPRESS,     None),
    /* 40 */ c("lzo1y_999_compress", LZO1Y_999_MEM_COMPRESS, None),
    /* lzo1z */
    /* 41 */ c("lzo1z_999_compress", LZO1Z_999_MEM_COMPRESS, None),
    /* lzo2a */
    /* 42 */ c("lzo2a_999_compress", LZO2A_999_MEM_COMPRESS, None),
];

/// The decompressor selector space, independently numbered.
pub static DECOMPRESSORS: [DecompressorDescriptor; 28] = [
    /* lzo1 */
    /*  0 */ d("lzo1_decompress"),
    /* lzo1a */
    /*  1 */ d("lzo1a_decompress"),
    /* lzo1b */
    /*  2 */ d("lzo1b_decompress"),
    /*  3 */ d("lzo1b_decompress_safe"),
    /* lzo1c */
    /*  4 */ d("lzo1c_decompress"),
    /*  5 */ d("lzo1c_decompress_safe"),
    /*  6 */ d("lzo1c_decompress_asm"),
    /*  7 */ d("lzo1c_decompress_asm_safe"),
    /* lzo1f */
    /*  8 */ d("lzo1f_decompress"),
    /*  9 */ d("lzo1f_decompress_safe"),
    /* 10 */ d("lzo1f_decompress_asm_fast"),
    /* 11 */ d("lzo1f_decompress_asm_fast_safe"),
    /* lzo1x */
    /* 12 */ d("lzo1x_decompress"),
    /* 13 */ d("lzo1x_decompress_safe"),
    /* 14 */ d("lzo1x_decompress_asm"),
    /* 15 */ d("lzo1x_decompress_asm_safe"),
    /* 16 */ d("lzo1x_decompress_asm_fast"),
    /* 17 */ d("lzo1x_decompress_asm_fast_safe"),
    /* lzo1y */
    /* 18 */ d("lzo1y_decompress"),
    /* 19 */ d("lzo1y_decompress_safe"),
    /* 20 */ d("lzo1y_decompress_asm"),
    /* 21 */ d("lzo1y_decompress_asm_safe"),
    /* 22 */ d("lzo1y_decompress_asm_fast"),
    /* 23 */ d("lzo1y_decompress_asm_fast_safe"),
    /* lzo1z */
    /* 24 */ d("lzo1z_decompress"),
    /* 25 */ d("lzo1z_decompress_safe"),
    /* lzo2a */
    /* 26 */ d("lzo2a_decompress"),
    /* 27 */ d("lzo2a_decompress_safe"),
];

// ── Named selectors (in-process aliases; the integers are the contract) ─────

pub mod selectors {
    /// lzo1x_1 — the lzop default strategy.
    pub const LZO1X_1:   u32 = 34;
    /// lzo1x_15 — the lzop fast strategy.
    pub const LZO1X_15:  u32 = 37;
    /// lzo1x_999 — the lzop best strategy; honors graduated levels.
    pub const LZO1X_999: u32 = 38;
    /// lzo1y_999 — the other graduated-level variant.
    pub const LZO1Y_999: u32 = 40;

    /// lzo1x_decompress_safe — bounds-checked decompressor for all three
    /// lzop strategies.
    pub const LZO1X_SAFE: u32 = 13;
}

// ── Lookup ───────────────────────────────────────────────────────────────────

/// Resolve a compressor selector to its descriptor.
pub fn compressor(selector: u32) -> Result<&'static CompressorDescriptor, LzoError> {
    COMPRESSORS
        .get(selector as usize)
        .ok_or(LzoError::InvalidSelector { selector, table_len: COMPRESSORS.len() })
}

/// Resolve a decompressor selector to its descriptor.
pub fn decompressor(selector: u32) -> Result<&'static DecompressorDescriptor, LzoError> {
    DECOMPRESSORS
        .get(selector as usize)
        .ok_or(LzoError::InvalidSelector { selector, table_len: DECOMPRESSORS.len() })
}
