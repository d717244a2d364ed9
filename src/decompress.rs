//! Decompressor adapter.
//!
//! Mirrors [`crate::compress`] with a single call shape: every
//! decompression entry takes `(src, src_len, dst, dst_len, wrkmem)`, where
//! the trailing pointer is an optional auxiliary dictionary — always
//! absent here. Decompression needs no working memory.

use crate::buffer::DirectBuffer;
use crate::error::LzoError;
use crate::ffi::{self, DecompressFn, LzoUint};
use crate::library::LzoLibrary;
use crate::registry::{self, DecompressorDescriptor};
use std::ptr;

#[derive(Debug)]
pub struct LzoDecompressor {
    selector:        u32,
    descriptor:      &'static DecompressorDescriptor,
    entry:           DecompressFn,
    remaining_input: usize,
    bytes_read:      u64,
    bytes_written:   u64,
    finished:        bool,
}

impl LzoDecompressor {
    /// Initialize a decompressor stream for `selector`.
    pub fn new(selector: u32) -> Result<Self, LzoError> {
        let descriptor = registry::decompressor(selector)?;
        let library = LzoLibrary::get()?;
        let entry = unsafe { library.resolve::<DecompressFn>(descriptor.symbol)? };
        Ok(LzoDecompressor {
            selector,
            descriptor,
            entry,
            remaining_input: 0,
            bytes_read: 0,
            bytes_written: 0,
            finished: false,
        })
    }

    pub fn selector(&self) -> u32 {
        self.selector
    }

    pub fn symbol(&self) -> &'static str {
        self.descriptor.symbol
    }

    /// Decompress `input_len` bytes of `input` into `output`.
    ///
    /// Returns the produced byte count, or `Ok(0)` without a native call
    /// when either buffer cannot be pinned — indistinguishable from a
    /// legitimately empty result. On success the whole compressed input is
    /// consumed and the recorded remaining length is zero.
    pub fn decompress(
        &mut self,
        input: &DirectBuffer,
        input_len: usize,
        output: &mut DirectBuffer,
    ) -> Result<usize, LzoError> {
        if input_len > input.capacity() {
            return Err(LzoError::Internal(format!(
                "input length {input_len} exceeds buffer capacity {}",
                input.capacity()
            )));
        }
        self.remaining_input = input_len;

        let Some(src) = input.pin()? else { return Ok(0) };
        let Some(dst) = output.pin_mut()? else { return Ok(0) };

        let mut produced: LzoUint = output.capacity();
        let rv = unsafe {
            (self.entry)(src, input_len, dst, &mut produced, ptr::null_mut())
        };
        if rv != ffi::status::OK {
            return Err(LzoError::Codec { symbol: self.descriptor.symbol, status: rv });
        }

        self.remaining_input = 0;
        self.bytes_read += input_len as u64;
        self.bytes_written += produced as u64;
        output.set_len(produced);
        Ok(produced)
    }

    pub fn remaining_input(&self) -> usize {
        self.remaining_input
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    // Pass-through end-of-stream flag for the surrounding stream logic.

    pub fn set_finished(&mut self, finished: bool) {
        self.finished = finished;
    }

    pub fn finished(&self) -> bool {
        self.finished
    }
}
