//! Compressor adapter: one selected algorithm driven over caller buffers.
//!
//! Construction *is* initialization: a successful [`LzoCompressor::new`]
//! has looked up the selector, obtained the initialized library, and bound
//! the native entry point into a typed call shape. There is no
//! half-initialized state to observe — a stream either exists and is
//! ready, or the constructor failed.
//!
//! Each compress call pins the three caller buffers one at a time under
//! the pin lock (never holding it across the native call), dispatches, and
//! maps the native status. On success the whole input is consumed by
//! contract, so the recorded remaining-input length drops to zero.

use crate::buffer::DirectBuffer;
use crate::error::LzoError;
use crate::ffi::{self, Compress2Fn, CompressFn, CompressLevelFn, LzoUint};
use crate::library::LzoLibrary;
use crate::registry::{self, CompressorDescriptor};
use std::ffi::c_void;
use std::ptr;

/// The call shape bound at init time, one of the three signatures the
/// native table mixes.
#[derive(Debug)]
enum CompressDispatch {
    /// Plain 5-argument entry; these variants take no level at all.
    LevelLess(CompressFn),
    /// The tunable lzo1b/lzo1c family entry with a trailing level; the
    /// table's fixed level applies when the caller supplies none.
    TwoArgLevel { entry: Compress2Fn, fixed_level: i32 },
    /// lzo1x_999/lzo1y_999: a plain entry plus the family's dedicated
    /// graduated-level routine.
    DedicatedLeveled { plain: CompressFn, leveled: CompressLevelFn },
}

impl CompressDispatch {
    fn resolve(
        library: &'static LzoLibrary,
        descriptor: &CompressorDescriptor,
    ) -> Result<Self, LzoError> {
        let leveled_symbol = match descriptor.symbol {
            "lzo1x_999_compress" => Some("lzo1x_999_compress_level"),
            "lzo1y_999_compress" => Some("lzo1y_999_compress_level"),
            _ => None,
        };
        unsafe {
            if let Some(leveled) = leveled_symbol {
                Ok(CompressDispatch::DedicatedLeveled {
                    plain:   library.resolve::<CompressFn>(descriptor.symbol)?,
                    leveled: library.resolve::<CompressLevelFn>(leveled)?,
                })
            } else if let Some(fixed_level) = descriptor.fixed_level {
                Ok(CompressDispatch::TwoArgLevel {
                    entry: library.resolve::<Compress2Fn>(descriptor.symbol)?,
                    fixed_level,
                })
            } else {
                Ok(CompressDispatch::LevelLess(
                    library.resolve::<CompressFn>(descriptor.symbol)?,
                ))
            }
        }
    }
}

#[derive(Debug)]
pub struct LzoCompressor {
    selector:          u32,
    descriptor:        &'static CompressorDescriptor,
    dispatch:          CompressDispatch,
    /// Optional runtime level, read before each compress call. Honored
    /// only by the variants whose entry point takes a level; everything
    /// else ignores it.
    compression_level: Option<i32>,
    remaining_input:   usize,
    bytes_read:        u64,
    bytes_written:     u64,
    finish:            bool,
    finished:          bool,
}

impl LzoCompressor {
    /// Initialize a compressor stream for `selector`.
    ///
    /// Fails with [`LzoError::InvalidSelector`] for an out-of-table index,
    /// [`LzoError::SymbolNotFound`] when the loaded library predates the
    /// variant, or whatever the one-time library initialization recorded.
    pub fn new(selector: u32) -> Result<Self, LzoError> {
        let descriptor = registry::compressor(selector)?;
        let library = LzoLibrary::get()?;
        let dispatch = CompressDispatch::resolve(library, descriptor)?;
        Ok(LzoCompressor {
            selector,
            descriptor,
            dispatch,
            compression_level: None,
            remaining_input: 0,
            bytes_read: 0,
            bytes_written: 0,
            finish: false,
            finished: false,
        })
    }

    pub fn selector(&self) -> u32 {
        self.selector
    }

    /// The resolved native symbol name, for diagnostics.
    pub fn symbol(&self) -> &'static str {
        self.descriptor.symbol
    }

    /// Scratch-memory requirement the caller must provision the working
    /// buffer with.
    pub fn working_memory_len(&self) -> usize {
        self.descriptor.working_memory
    }

    /// Set (or clear) the runtime compression level consulted before each
    /// call.
    pub fn set_compression_level(&mut self, level: Option<i32>) {
        self.compression_level = level;
    }

    /// Compress `input_len` bytes of `input` into `output`, using
    /// `working` as native scratch space.
    ///
    /// Returns the produced byte count. Returns `Ok(0)` without invoking
    /// the native entry when any buffer cannot be pinned; that degraded
    /// case is indistinguishable from a legitimate empty result. On native
    /// failure the adapter state is left intact and the stream remains
    /// usable for subsequent calls.
    pub fn compress(
        &mut self,
        input: &DirectBuffer,
        input_len: usize,
        output: &mut DirectBuffer,
        working: &mut DirectBuffer,
    ) -> Result<usize, LzoError> {
        if input_len > input.capacity() {
            return Err(LzoError::Internal(format!(
                "input length {input_len} exceeds buffer capacity {}",
                input.capacity()
            )));
        }
        if working.capacity() < self.descriptor.working_memory {
            return Err(LzoError::Internal(format!(
                "working memory {} below the {} bytes {} requires",
                working.capacity(),
                self.descriptor.working_memory,
                self.descriptor.symbol
            )));
        }
        self.remaining_input = input_len;

        // Each pin takes and releases the lock on its own; none of them is
        // held across the native call below.
        let Some(src) = input.pin()? else { return Ok(0) };
        let Some(dst) = output.pin_mut()? else { return Ok(0) };
        let Some(wrk) = working.pin_mut()? else { return Ok(0) };
        let wrk = wrk.cast::<c_void>();

        let mut produced: LzoUint = output.capacity();
        let level = self.compression_level;
        let rv = unsafe {
            match &self.dispatch {
                CompressDispatch::LevelLess(entry) => {
                    entry(src, input_len, dst, &mut produced, wrk)
                }
                CompressDispatch::TwoArgLevel { entry, fixed_level } => {
                    entry(src, input_len, dst, &mut produced, wrk,
                          level.unwrap_or(*fixed_level))
                }
                CompressDispatch::DedicatedLeveled { plain, leveled } => match level {
                    None => plain(src, input_len, dst, &mut produced, wrk),
                    Some(l) => leveled(src, input_len, dst, &mut produced, wrk,
                                       ptr::null(), 0, ptr::null_mut(), l),
                },
            }
        };

        if rv != ffi::status::OK {
            return Err(LzoError::Codec { symbol: self.descriptor.symbol, status: rv });
        }

        // The native compressors consume their entire input.
        self.remaining_input = 0;
        self.bytes_read += input_len as u64;
        self.bytes_written += produced as u64;
        output.set_len(produced);
        Ok(produced)
    }

    /// Bytes of the last submitted input not yet consumed; zero after any
    /// successful call.
    pub fn remaining_input(&self) -> usize {
        self.remaining_input
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    // End-of-stream flags: pass-through state for the surrounding stream
    // logic; the adapter itself never acts on them.

    pub fn request_finish(&mut self) {
        self.finish = true;
    }

    pub fn finish_requested(&self) -> bool {
        self.finish
    }

    pub fn set_finished(&mut self, finished: bool) {
        self.finished = finished;
    }

    pub fn finished(&self) -> bool {
        self.finished
    }
}
