//! lzop stream writer.
//!
//! Accumulates caller bytes into blocks, runs each block through an
//! [`LzoCompressor`], and emits lzop framing. Blocks are capped below the
//! configured block size by the format's worst-case expansion margin, so
//! the compressed output always fits a buffer of the block size. The
//! header declares no block-checksum flags.
//!
//! [`LzopWriter::finish`] must be called to emit the stream terminator;
//! dropping an unfinished writer loses the tail.

use super::{checksum, to_io, LzopStrategy, HEADER_MODE, LZOP_COMPAT_VERSION, LZOP_MAGIC, LZOP_VERSION};
use crate::buffer::DirectBuffer;
use crate::compress::LzoCompressor;
use crate::ffi::Adler32Fn;
use crate::library::LzoLibrary;
use byteorder::{BigEndian, WriteBytesExt};
use std::io::{self, Write};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug)]
pub struct LzopWriter<W: Write> {
    out:        W,
    compressor: LzoCompressor,
    input:      DirectBuffer,
    output:     DirectBuffer,
    working:    DirectBuffer,
    /// Largest block the accumulator may hold: block size minus the
    /// format's worst-case expansion (size/16 + 64 + 3 for the lzo1x
    /// family).
    max_input:  usize,
    finished:   bool,
}

impl<W: Write> LzopWriter<W> {
    /// Write an lzop header for `strategy` and return a writer using the
    /// default block size.
    pub fn new(out: W, strategy: LzopStrategy) -> io::Result<Self> {
        Self::with_block_size(out, strategy, super::DEFAULT_BLOCK_SIZE)
    }

    pub fn with_block_size(mut out: W, strategy: LzopStrategy, block_size: usize) -> io::Result<Self> {
        let overhead = (block_size >> 4) + 64 + 3;
        if block_size <= overhead {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("block size {block_size} leaves no room below its {overhead}-byte overhead"),
            ));
        }

        let library = LzoLibrary::get().map_err(to_io)?;
        let adler: Adler32Fn =
            unsafe { library.resolve::<Adler32Fn>("lzo_adler32") }.map_err(to_io)?;
        let compressor = LzoCompressor::new(strategy.selector()).map_err(to_io)?;

        write_header(&mut out, strategy, library.version() as u16, adler)?;

        let working = DirectBuffer::with_capacity(compressor.working_memory_len());
        Ok(LzopWriter {
            out,
            compressor,
            input: DirectBuffer::with_capacity(block_size - overhead),
            output: DirectBuffer::with_capacity(block_size),
            working,
            max_input: block_size - overhead,
            finished: false,
        })
    }

    /// Set (or clear) the compression level consulted before each block.
    /// Honored by the lzo1x_999 strategy only; the other strategies'
    /// entry points take no level.
    pub fn set_compression_level(&mut self, level: Option<i32>) {
        self.compressor.set_compression_level(level);
    }

    /// Compress and emit whatever the accumulator holds.
    fn flush_block(&mut self) -> io::Result<()> {
        let uncompressed = self.input.len();
        if uncompressed == 0 {
            return Ok(());
        }

        let produced = self
            .compressor
            .compress(&self.input, uncompressed, &mut self.output, &mut self.working)
            .map_err(to_io)?;

        self.out.write_u32::<BigEndian>(uncompressed as u32)?;
        if produced < uncompressed {
            self.out.write_u32::<BigEndian>(produced as u32)?;
            self.out.write_all(self.output.as_slice())?;
        } else {
            // Compression grew the block: the format stores the original
            // bytes, signalled by equal length fields.
            self.out.write_u32::<BigEndian>(uncompressed as u32)?;
            self.out.write_all(self.input.as_slice())?;
        }
        self.input.clear();
        Ok(())
    }

    /// Flush pending data, write the four-zero-byte terminator, and flush
    /// the underlying writer. Idempotent.
    pub fn finish(&mut self) -> io::Result<()> {
        if self.finished {
            return Ok(());
        }
        self.compressor.request_finish();
        self.flush_block()?;
        self.out.write_u32::<BigEndian>(0)?;
        self.out.flush()?;
        self.compressor.set_finished(true);
        self.finished = true;
        Ok(())
    }

    /// Consume the writer, finishing the stream, and hand back the
    /// underlying writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.finish()?;
        Ok(self.out)
    }
}

impl<W: Write> Write for LzopWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.finished {
            return Err(io::Error::other("write beyond end of stream"));
        }
        let mut consumed = 0;
        while consumed < buf.len() {
            consumed += self.input.append(&buf[consumed..]);
            if self.input.len() == self.max_input {
                self.flush_block()?;
            }
        }
        Ok(buf.len())
    }

    /// Flushes complete state to the underlying writer. Note this cuts a
    /// block at the current accumulator fill, which costs ratio.
    fn flush(&mut self) -> io::Result<()> {
        self.flush_block()?;
        self.out.flush()
    }
}

/// Serialise the lzop header: magic, then the checksummed field region,
/// then its Adler-32.
fn write_header<W: Write>(
    out: &mut W,
    strategy: LzopStrategy,
    lib_version: u16,
    adler: Adler32Fn,
) -> io::Result<()> {
    let (method, level) = strategy.header_bytes();
    let mtime = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0);

    let mut fields = Vec::with_capacity(32);
    fields.write_u16::<BigEndian>(LZOP_VERSION)?;
    fields.write_u16::<BigEndian>(lib_version)?;
    fields.write_u16::<BigEndian>(LZOP_COMPAT_VERSION)?;
    fields.write_u8(method)?;
    fields.write_u8(level)?;
    fields.write_u32::<BigEndian>(0)?; // no flags: no block checksums
    fields.write_u32::<BigEndian>(HEADER_MODE)?;
    fields.write_u32::<BigEndian>(mtime)?;
    fields.write_u32::<BigEndian>(0)?; // gmtdiff
    fields.write_u8(0)?; // no filename
    let header_checksum = checksum::adler32(adler, &fields);
    fields.write_u32::<BigEndian>(header_checksum)?;

    out.write_all(&LZOP_MAGIC)?;
    out.write_all(&fields)
}
