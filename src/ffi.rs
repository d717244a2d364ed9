//! Raw C-side contract of liblzo2.
//!
//! Nothing here calls the library; this module only pins down the shapes
//! that cross the FFI boundary: scalar aliases, the three compressor call
//! signatures, the decompressor signature, native status codes, and the
//! struct-size fingerprint `__lzo_init_v2` uses to detect ABI skew.
//!
//! # Stability contract
//! These signatures are frozen by liblzo2's `lzoconf.h`/`lzo1*.h` headers.
//! Every function pointer is `unsafe extern "C"`; the adapters in
//! [`crate::compress`] and [`crate::decompress`] enforce the buffer
//! invariants documented on each alias before dispatching.

use libc::{c_int, c_short, c_uint};
use std::ffi::c_void;
use std::mem::size_of;

/// `lzo_uint`: pointer-width unsigned on every platform liblzo2 is built
/// for. The fingerprint check at init time is the runtime guard for this
/// assumption.
pub type LzoUint = usize;

/// Version we claim against `__lzo_init_v2` (the 2.10 headers this bridge
/// mirrors). The size fields carry the real compatibility check; the
/// version only has to be non-zero.
pub const LZO_VERSION: c_uint = 0x20a0;

// ── Native status codes (lzoconf.h) ─────────────────────────────────────────

pub mod status {
    use libc::c_int;

    pub const OK:                  c_int = 0;
    pub const ERROR:               c_int = -1;
    pub const OUT_OF_MEMORY:       c_int = -2;
    pub const NOT_COMPRESSIBLE:    c_int = -3;
    pub const INPUT_OVERRUN:       c_int = -4;
    pub const OUTPUT_OVERRUN:      c_int = -5;
    pub const LOOKBEHIND_OVERRUN:  c_int = -6;
    pub const EOF_NOT_FOUND:       c_int = -7;
    pub const INPUT_NOT_CONSUMED:  c_int = -8;
    pub const NOT_YET_IMPLEMENTED: c_int = -9;
    pub const INVALID_ARGUMENT:    c_int = -10;
    pub const INVALID_ALIGNMENT:   c_int = -11;
    pub const OUTPUT_NOT_CONSUMED: c_int = -12;
    pub const INTERNAL_ERROR:      c_int = -99;

    /// Human-readable name for diagnostics only — never parsed.
    pub fn describe(code: c_int) -> &'static str {
        match code {
            OK                  => "LZO_E_OK",
            ERROR               => "LZO_E_ERROR",
            OUT_OF_MEMORY       => "LZO_E_OUT_OF_MEMORY",
            NOT_COMPRESSIBLE    => "LZO_E_NOT_COMPRESSIBLE",
            INPUT_OVERRUN       => "LZO_E_INPUT_OVERRUN",
            OUTPUT_OVERRUN      => "LZO_E_OUTPUT_OVERRUN",
            LOOKBEHIND_OVERRUN  => "LZO_E_LOOKBEHIND_OVERRUN",
            EOF_NOT_FOUND       => "LZO_E_EOF_NOT_FOUND",
            INPUT_NOT_CONSUMED  => "LZO_E_INPUT_NOT_CONSUMED",
            NOT_YET_IMPLEMENTED => "LZO_E_NOT_YET_IMPLEMENTED",
            INVALID_ARGUMENT    => "LZO_E_INVALID_ARGUMENT",
            INVALID_ALIGNMENT   => "LZO_E_INVALID_ALIGNMENT",
            OUTPUT_NOT_CONSUMED => "LZO_E_OUTPUT_NOT_CONSUMED",
            INTERNAL_ERROR      => "LZO_E_INTERNAL_ERROR",
            _                   => "unknown lzo status",
        }
    }
}

// ── Call shapes ──────────────────────────────────────────────────────────────

/// Level-less compressor entry, e.g. `lzo1x_1_compress`:
/// `(src, src_len, dst, dst_len in/out, wrkmem)`.
///
/// # Safety
/// - `src[0..src_len]` must be readable, `dst[0..*dst_len]` writable.
/// - `wrkmem` must be at least the table's working-memory size for the
///   selected algorithm.
/// - On entry `*dst_len` is the output capacity; on OK it is the produced
///   byte count.
pub type CompressFn = unsafe extern "C" fn(
    src:     *const u8,
    src_len: LzoUint,
    dst:     *mut u8,
    dst_len: *mut LzoUint,
    wrkmem:  *mut c_void,
) -> c_int;

/// Generic leveled compressor entry, e.g. `lzo1b_compress`: the same
/// address as the level-less shape with one trailing level argument. This
/// prototype is missing from `lzoconf.h`; the native table entries that
/// carry a fixed level are the ones called through it.
///
/// # Safety  (same as [`CompressFn`])
pub type Compress2Fn = unsafe extern "C" fn(
    src:     *const u8,
    src_len: LzoUint,
    dst:     *mut u8,
    dst_len: *mut LzoUint,
    wrkmem:  *mut c_void,
    level:   c_int,
) -> c_int;

/// Dedicated graduated-level entry, `lzo1x_999_compress_level` /
/// `lzo1y_999_compress_level`: takes an optional preset dictionary and a
/// progress callback, both always absent here.
///
/// # Safety  (same as [`CompressFn`]; `dict`/`cb` may be null)
pub type CompressLevelFn = unsafe extern "C" fn(
    src:      *const u8,
    src_len:  LzoUint,
    dst:      *mut u8,
    dst_len:  *mut LzoUint,
    wrkmem:   *mut c_void,
    dict:     *const u8,
    dict_len: LzoUint,
    cb:       *mut LzoCallback,
    level:    c_int,
) -> c_int;

/// Decompressor entry, e.g. `lzo1x_decompress_safe`:
/// `(src, src_len, dst, dst_len in/out, wrkmem)` — the trailing pointer is
/// an auxiliary dictionary slot, always passed as null by this bridge.
///
/// # Safety
/// - `src[0..src_len]` readable, `dst[0..*dst_len]` writable.
/// - Non-`_safe` variants trust `src` to be well-formed LZO data and can
///   overrun `dst` on corrupt input; prefer the `_safe` selectors for
///   untrusted streams.
pub type DecompressFn = unsafe extern "C" fn(
    src:     *const u8,
    src_len: LzoUint,
    dst:     *mut u8,
    dst_len: *mut LzoUint,
    wrkmem:  *mut c_void,
) -> c_int;

/// `__lzo_init_v2(version, s1..s9)` — the one-time initializer.
pub type InitFn = unsafe extern "C" fn(
    version: c_uint,
    sizeof_short:     c_int,
    sizeof_int:       c_int,
    sizeof_long:      c_int,
    sizeof_lzo_uint32: c_int,
    sizeof_lzo_uint:  c_int,
    sizeof_dict:      c_int,
    sizeof_charp:     c_int,
    sizeof_voidp:     c_int,
    sizeof_callback:  c_int,
) -> c_int;

/// `lzo_version()` — the library's self-reported version number.
pub type VersionFn = unsafe extern "C" fn() -> c_uint;

/// `lzo_adler32(adler, buf, len)` — rolling Adler-32, zlib-compatible.
pub type Adler32Fn = unsafe extern "C" fn(u32, *const u8, LzoUint) -> u32;

// ── lzo_callback_t ───────────────────────────────────────────────────────────

/// Layout mirror of `lzo_callback_t` (lzoconf.h). Never instantiated —
/// it exists so the fingerprint can report `sizeof(lzo_callback_t)`.
#[repr(C)]
pub struct LzoCallback {
    pub nalloc:    Option<unsafe extern "C" fn(*mut LzoCallback, LzoUint, LzoUint) -> *mut c_void>,
    pub nfree:     Option<unsafe extern "C" fn(*mut LzoCallback, *mut c_void)>,
    pub nprogress: Option<unsafe extern "C" fn(*mut LzoCallback, LzoUint, LzoUint, c_int)>,
    pub user1:     *mut c_void,
    pub user2:     *mut c_void,
    pub user3:     *mut c_void,
}

// ── ABI fingerprint ──────────────────────────────────────────────────────────

/// The primitive-type sizes handed to `__lzo_init_v2`, as understood by
/// *this* process. The library compares them against its own compiled
/// assumptions and reports a mismatch instead of corrupting memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fingerprint {
    pub version:            c_uint,
    pub sizeof_short:       c_int,
    pub sizeof_int:         c_int,
    pub sizeof_long:        c_int,
    pub sizeof_lzo_uint32:  c_int,
    pub sizeof_lzo_uint:    c_int,
    pub sizeof_dict:        c_int,
    pub sizeof_charp:       c_int,
    pub sizeof_voidp:       c_int,
    pub sizeof_callback:    c_int,
}

impl Fingerprint {
    /// Fingerprint of the calling environment.
    pub fn host() -> Self {
        Fingerprint {
            version:           LZO_VERSION,
            sizeof_short:      size_of::<c_short>() as c_int,
            sizeof_int:        size_of::<c_int>() as c_int,
            sizeof_long:       size_of::<libc::c_long>() as c_int,
            sizeof_lzo_uint32: size_of::<u32>() as c_int,
            sizeof_lzo_uint:   size_of::<LzoUint>() as c_int,
            // lzo_sizeof_dict_t == sizeof(lzo_bytep)
            sizeof_dict:       size_of::<*const u8>() as c_int,
            sizeof_charp:      size_of::<*const libc::c_char>() as c_int,
            sizeof_voidp:      size_of::<*mut c_void>() as c_int,
            sizeof_callback:   size_of::<LzoCallback>() as c_int,
        }
    }
}
