//! Caller-owned buffer handles.
//!
//! A [`DirectBuffer`] stands in for the host runtime's direct buffers: a
//! byte region with a declared capacity and a currently-valid length,
//! allocated and owned by the *caller*. The codec adapters never allocate,
//! free, or resize one — they only pin it, read its base address, and hand
//! that address to the native entry point.
//!
//! # Pinning
//! Reading the base address is the sole critical section in this crate.
//! One process-wide lock, shared by compressor and decompressor, guards
//! the "pin buffer, read address" step. The lock is released before the
//! method returns, so it is never held across a native call.
//!
//! A **detached** buffer has a capacity but no backing memory, modelling a
//! buffer the host runtime has relocated or invalidated. Pinning it yields
//! no address, and the adapters report 0 produced bytes instead of calling
//! the native function. That zero is indistinguishable from a legitimate
//! zero-byte result; callers that care must check for zero-length output.

use crate::error::LzoError;
use std::sync::Mutex;

static PIN_LOCK: Mutex<()> = Mutex::new(());

#[derive(Debug)]
pub struct DirectBuffer {
    memory:   Option<Box<[u8]>>,
    capacity: usize,
    len:      usize,
}

impl DirectBuffer {
    /// Allocate a backed buffer of `capacity` bytes, length 0.
    pub fn with_capacity(capacity: usize) -> Self {
        DirectBuffer {
            memory: Some(vec![0u8; capacity].into_boxed_slice()),
            capacity,
            len: 0,
        }
    }

    /// A buffer with a declared capacity but no backing memory. Pins to
    /// nothing; adapters degrade to a 0-byte result on it.
    pub fn detached(capacity: usize) -> Self {
        DirectBuffer { memory: None, capacity, len: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of currently-valid bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Declare `len` bytes valid. Caller contract: `len <= capacity`.
    pub fn set_len(&mut self, len: usize) {
        assert!(len <= self.capacity, "len {len} exceeds capacity {}", self.capacity);
        self.len = len;
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// The valid bytes. Empty for a detached buffer.
    pub fn as_slice(&self) -> &[u8] {
        match &self.memory {
            Some(mem) => &mem[..self.len],
            None => &[],
        }
    }

    /// The whole capacity, for the host to fill directly. Empty for a
    /// detached buffer.
    pub fn space_mut(&mut self) -> &mut [u8] {
        match &mut self.memory {
            Some(mem) => &mut mem[..],
            None => &mut [],
        }
    }

    /// Append as much of `src` as fits after the valid bytes; returns how
    /// many were copied.
    pub fn append(&mut self, src: &[u8]) -> usize {
        let Some(mem) = &mut self.memory else { return 0 };
        let n = src.len().min(self.capacity - self.len);
        mem[self.len..self.len + n].copy_from_slice(&src[..n]);
        self.len += n;
        n
    }

    /// Pin for reading: take the pin lock, read the base address, release.
    pub(crate) fn pin(&self) -> Result<Option<*const u8>, LzoError> {
        let _guard = PIN_LOCK
            .lock()
            .map_err(|_| LzoError::Internal("buffer pin lock poisoned".into()))?;
        Ok(self.memory.as_deref().map(|m| m.as_ptr()))
    }

    /// Pin for writing. Same locking discipline as [`DirectBuffer::pin`].
    pub(crate) fn pin_mut(&mut self) -> Result<Option<*mut u8>, LzoError> {
        let _guard = PIN_LOCK
            .lock()
            .map_err(|_| LzoError::Internal("buffer pin lock poisoned".into()))?;
        Ok(self.memory.as_deref_mut().map(|m| m.as_mut_ptr()))
    }
}
