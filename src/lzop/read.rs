//! lzop stream reader.
//!
//! Verifies the checksummed header, honors whatever block-checksum flags
//! it declares, rejects the format features this bridge never produces
//! (multipart archives, filters, reserved bits), and then serves
//! decompressed bytes block by block. All three lzop methods decode
//! through `lzo1x_decompress_safe`.

use super::checksum::{CChecksum, DChecksum};
use super::{
    to_io, LzopHeader, LzopStrategy, F_H_CRC32, F_H_EXTRA_FIELD, F_H_FILTER, F_MULTIPART,
    F_RESERVED, LZOP_MAGIC, LZOP_VERSION, MAX_BLOCK_SIZE, MINIMUM_LZO_VERSION,
};
use crate::buffer::DirectBuffer;
use crate::decompress::LzoDecompressor;
use crate::ffi::Adler32Fn;
use crate::library::LzoLibrary;
use crate::registry::selectors;
use byteorder::{BigEndian, ReadBytesExt};
use std::io::{self, Read};

#[derive(Debug)]
pub struct LzopReader<R: Read> {
    input:        R,
    decompressor: LzoDecompressor,
    adler:        Adler32Fn,
    header:       LzopHeader,
    dflags:       Vec<DChecksum>,
    cflags:       Vec<CChecksum>,
    in_buf:       DirectBuffer,
    out_buf:      DirectBuffer,
    out_pos:      usize,
    eof:          bool,
}

impl<R: Read> LzopReader<R> {
    /// Read and verify the lzop header, leaving the stream positioned at
    /// the first block.
    pub fn new(mut input: R) -> io::Result<Self> {
        let library = LzoLibrary::get().map_err(to_io)?;
        let adler: Adler32Fn =
            unsafe { library.resolve::<Adler32Fn>("lzo_adler32") }.map_err(to_io)?;
        let decompressor = LzoDecompressor::new(selectors::LZO1X_SAFE).map_err(to_io)?;

        let header = read_header(&mut input, adler)?;
        Ok(LzopReader {
            input,
            decompressor,
            adler,
            header,
            dflags: DChecksum::present_in(header.flags),
            cflags: CChecksum::present_in(header.flags),
            in_buf: DirectBuffer::with_capacity(super::DEFAULT_BLOCK_SIZE),
            out_buf: DirectBuffer::with_capacity(super::DEFAULT_BLOCK_SIZE),
            out_pos: 0,
            eof: false,
        })
    }

    /// The verified header fields.
    pub fn header(&self) -> &LzopHeader {
        &self.header
    }

    /// Pull in and decode the next block. `Ok(false)` once the stream's
    /// zero-length terminator (or a clean end of input) is reached.
    fn fill_block(&mut self) -> io::Result<bool> {
        let uncompressed = match self.input.read_u32::<BigEndian>() {
            Ok(n) => n as usize,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                // A bare EOF here means the terminator was chopped off;
                // every complete block has already been served, so treat
                // it as end of stream.
                log::debug!("lzop stream ended without a terminator");
                self.eof = true;
                return Ok(false);
            }
            Err(e) => return Err(e),
        };
        if uncompressed == 0 {
            self.eof = true;
            self.decompressor.set_finished(true);
            return Ok(false);
        }
        if uncompressed > MAX_BLOCK_SIZE {
            return Err(invalid(format!("block of {uncompressed} bytes exceeds the format maximum")));
        }

        let compressed = self.input.read_u32::<BigEndian>()? as usize;
        if compressed > uncompressed {
            return Err(invalid(format!(
                "compressed length {compressed} exceeds uncompressed length {uncompressed}"
            )));
        }
        let stored = compressed == uncompressed;

        let mut d_sums = Vec::with_capacity(self.dflags.len());
        for c in &self.dflags {
            d_sums.push((*c, self.input.read_u32::<BigEndian>()?));
        }
        // Stored blocks carry no compressed-data checksums.
        let mut c_sums = Vec::with_capacity(self.cflags.len());
        if !stored {
            for c in &self.cflags {
                c_sums.push((*c, self.input.read_u32::<BigEndian>()?));
            }
        }

        ensure_capacity(&mut self.in_buf, compressed);
        self.input.read_exact(&mut self.in_buf.space_mut()[..compressed])?;
        self.in_buf.set_len(compressed);

        for (c, expected) in c_sums {
            if c.compute(self.adler, self.in_buf.as_slice()) != expected {
                return Err(invalid("corrupted compressed block".into()));
            }
        }

        ensure_capacity(&mut self.out_buf, uncompressed);
        if stored {
            self.out_buf.space_mut()[..uncompressed].copy_from_slice(self.in_buf.as_slice());
            self.out_buf.set_len(uncompressed);
        } else {
            let produced = self
                .decompressor
                .decompress(&self.in_buf, compressed, &mut self.out_buf)
                .map_err(to_io)?;
            if produced != uncompressed {
                return Err(invalid(format!(
                    "block decompressed to {produced} bytes, header declared {uncompressed}"
                )));
            }
        }

        for (c, expected) in d_sums {
            if c.compute(self.adler, self.out_buf.as_slice()) != expected {
                return Err(invalid("corrupted uncompressed block".into()));
            }
        }

        self.out_pos = 0;
        Ok(true)
    }
}

impl<R: Read> Read for LzopReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        while self.out_pos == self.out_buf.len() {
            if self.eof || !self.fill_block()? {
                return Ok(0);
            }
        }
        let n = buf.len().min(self.out_buf.len() - self.out_pos);
        buf[..n].copy_from_slice(&self.out_buf.as_slice()[self.out_pos..self.out_pos + n]);
        self.out_pos += n;
        Ok(n)
    }
}

/// Reader-side buffers are reader-owned; growing one to a bigger block is
/// a fresh host-side allocation, not an adapter concern.
fn ensure_capacity(buf: &mut DirectBuffer, needed: usize) {
    if buf.capacity() < needed {
        *buf = DirectBuffer::with_capacity(needed);
    }
}

fn invalid(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

/// Parse and verify the header, consuming it from `input`.
fn read_header<R: Read>(input: &mut R, adler: Adler32Fn) -> io::Result<LzopHeader> {
    let mut magic = [0u8; 9];
    input.read_exact(&mut magic)?;
    if magic != LZOP_MAGIC {
        return Err(invalid("invalid lzop magic".into()));
    }

    // Fixed-size field region, accumulated raw for the header checksum.
    let mut fields = vec![0u8; 25];
    input.read_exact(&mut fields)?;
    let mut cursor = io::Cursor::new(&fields[..]);
    let lzop_version = cursor.read_u16::<BigEndian>()?;
    let lib_version = cursor.read_u16::<BigEndian>()?;
    let compat_version = cursor.read_u16::<BigEndian>()?;
    let method = cursor.read_u8()?;
    let level = cursor.read_u8()?;
    let flags = cursor.read_u32::<BigEndian>()?;
    let mode = cursor.read_u32::<BigEndian>()?;
    let mtime = cursor.read_u32::<BigEndian>()?;
    let _gmtdiff = cursor.read_u32::<BigEndian>()?;
    let filename_len = cursor.read_u8()? as usize;

    if lzop_version > LZOP_VERSION {
        log::debug!("stream written by a later lzop: {lzop_version:#06x}");
    }
    if lib_version < MINIMUM_LZO_VERSION {
        return Err(invalid(format!(
            "compressed with incompatible lzo version {lib_version:#06x} (need at least {MINIMUM_LZO_VERSION:#06x})"
        )));
    }
    if compat_version > LZOP_VERSION {
        return Err(invalid(format!(
            "compressed with incompatible lzop version {compat_version:#06x}"
        )));
    }
    let strategy = LzopStrategy::from_method(method)
        .ok_or_else(|| invalid(format!("invalid lzop method {method}")))?;
    if flags & F_MULTIPART != 0 {
        return Err(invalid("multipart lzop not supported".into()));
    }
    if flags & F_H_FILTER != 0 {
        return Err(invalid("lzop filter not supported".into()));
    }
    if flags & F_RESERVED != 0 {
        return Err(invalid("unknown flags in header".into()));
    }

    if filename_len > 0 {
        let mut name = vec![0u8; filename_len];
        input.read_exact(&mut name)?;
        fields.extend_from_slice(&name);
    }

    let expected = if flags & F_H_CRC32 != 0 {
        super::checksum::crc32(&fields)
    } else {
        super::checksum::adler32(adler, &fields)
    };
    let actual = input.read_u32::<BigEndian>()?;
    if actual != expected {
        return Err(invalid(format!(
            "invalid header checksum {actual:#010x} (computed {expected:#010x})"
        )));
    }

    // lzop itself ultimately ignores the extra field; skip it, but keep
    // its checksum honest.
    if flags & F_H_EXTRA_FIELD != 0 {
        log::debug!("extra header field present, ignored");
        let mut extra = vec![0u8; 4];
        input.read_exact(&mut extra)?;
        let extra_len = u32::from_be_bytes([extra[0], extra[1], extra[2], extra[3]]) as usize;
        let mut body = vec![0u8; extra_len];
        input.read_exact(&mut body)?;
        extra.extend_from_slice(&body);
        let expected = if flags & F_H_CRC32 != 0 {
            super::checksum::crc32(&extra)
        } else {
            super::checksum::adler32(adler, &extra)
        };
        if input.read_u32::<BigEndian>()? != expected {
            return Err(invalid("invalid checksum for extra header field".into()));
        }
    }

    Ok(LzopHeader { lzop_version, lib_version, strategy, level, flags, mode, mtime })
}
