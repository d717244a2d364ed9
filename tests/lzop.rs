//! lzop container round-trips and header handling.
//!
//! Skips (with a notice) when liblzo2 cannot be loaded.

use lzodyn::library::LzoLibrary;
use lzodyn::lzop::{self, LzopReader, LzopStrategy, LzopWriter};
use std::fs::File;
use std::io::{Read, Write};
use tempfile::NamedTempFile;

macro_rules! require_native {
    () => {
        if !LzoLibrary::is_available() {
            eprintln!("liblzo2 not loadable; skipping");
            return;
        }
    };
}

fn sample_data(len: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(len);
    let mut n = 0usize;
    while data.len() < len {
        data.extend_from_slice(format!("record {n:08} payload lorem ipsum dolor\n").as_bytes());
        n += 1;
    }
    data.truncate(len);
    data
}

fn incompressible_data(len: usize) -> Vec<u8> {
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 56) as u8
        })
        .collect()
}

fn write_stream(data: &[u8], strategy: LzopStrategy, block_size: usize) -> Vec<u8> {
    let mut writer = LzopWriter::with_block_size(Vec::new(), strategy, block_size).unwrap();
    writer.write_all(data).unwrap();
    writer.into_inner().unwrap()
}

fn read_stream(bytes: &[u8]) -> Vec<u8> {
    let mut reader = LzopReader::new(bytes).unwrap();
    let mut out = Vec::new();
    reader.read_to_end(&mut out).unwrap();
    out
}

#[test]
fn file_round_trip_every_strategy() {
    require_native!();
    let data = sample_data(40 * 1024);
    for strategy in [LzopStrategy::Lzo1x1, LzopStrategy::Lzo1x15, LzopStrategy::Lzo1x999] {
        let temp = NamedTempFile::new().unwrap();

        {
            let file = File::create(temp.path()).unwrap();
            let mut writer = LzopWriter::new(file, strategy).unwrap();
            writer.write_all(&data).unwrap();
            writer.finish().unwrap();
        }

        let mut reader = LzopReader::new(File::open(temp.path()).unwrap()).unwrap();
        assert_eq!(reader.header().strategy, strategy);
        let mut restored = Vec::new();
        reader.read_to_end(&mut restored).unwrap();
        assert_eq!(restored, data, "{} did not round-trip", strategy.name());
    }
}

#[test]
fn multi_block_streams_round_trip() {
    require_native!();
    let data = sample_data(100 * 1024);
    let bytes = write_stream(&data, LzopStrategy::Lzo1x1, 8 * 1024);
    assert_eq!(read_stream(&bytes), data);
}

#[test]
fn incompressible_blocks_are_stored_verbatim() {
    require_native!();
    let data = incompressible_data(32 * 1024);
    let bytes = write_stream(&data, LzopStrategy::Lzo1x1, 8 * 1024);
    // Stored blocks cost 8 framing bytes each, never expansion.
    assert!(bytes.len() < data.len() + 1024);
    assert_eq!(read_stream(&bytes), data);
}

#[test]
fn empty_input_yields_a_bare_header_and_terminator() {
    require_native!();
    let bytes = write_stream(&[], LzopStrategy::Lzo1x1, 64 * 1024);
    assert_eq!(bytes[..9], lzop::LZOP_MAGIC);
    // Terminator only, no blocks.
    assert_eq!(bytes[bytes.len() - 4..], [0, 0, 0, 0]);
    assert_eq!(read_stream(&bytes), Vec::<u8>::new());
}

#[test]
fn header_fields_survive_the_trip() {
    require_native!();
    let bytes = write_stream(b"abc", LzopStrategy::Lzo1x999, 64 * 1024);
    let reader = LzopReader::new(&bytes[..]).unwrap();
    let header = reader.header();
    assert_eq!(header.lzop_version, lzop::LZOP_VERSION);
    assert_eq!(header.strategy, LzopStrategy::Lzo1x999);
    assert_eq!(header.level, 9);
    assert_eq!(header.flags, 0);
    assert_eq!(header.mode, 0o100644);
}

#[test]
fn missing_terminator_is_forgiven() {
    require_native!();
    let data = sample_data(10 * 1024);
    let bytes = write_stream(&data, LzopStrategy::Lzo1x1, 64 * 1024);
    let truncated = &bytes[..bytes.len() - 4];
    assert_eq!(read_stream(truncated), data);
}

#[test]
fn bad_magic_is_rejected() {
    require_native!();
    let mut bytes = write_stream(b"abc", LzopStrategy::Lzo1x1, 64 * 1024);
    bytes[0] ^= 0xff;
    assert!(LzopReader::new(&bytes[..]).is_err());
}

#[test]
fn corrupted_header_checksum_is_rejected() {
    require_native!();
    let mut bytes = write_stream(b"abc", LzopStrategy::Lzo1x1, 64 * 1024);
    // Flip the mtime field inside the checksummed region.
    bytes[9 + 16] ^= 0xff;
    let err = LzopReader::new(&bytes[..]).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}

#[test]
fn corrupted_block_payload_is_rejected() {
    require_native!();
    let data = sample_data(10 * 1024);
    let mut bytes = write_stream(&data, LzopStrategy::Lzo1x1, 64 * 1024);
    // Flip a byte in the middle of the (single) block payload.
    let mid = (bytes.len() - 4 + 40) / 2;
    bytes[mid] ^= 0xff;
    let mut reader = LzopReader::new(&bytes[..]).unwrap();
    let mut out = Vec::new();
    let result = reader.read_to_end(&mut out);
    // Either the safe decompressor flags the stream, or the output no
    // longer matches; silent success with intact data is the one
    // impossible outcome.
    match result {
        Err(e) => assert_eq!(e.kind(), std::io::ErrorKind::InvalidData),
        Ok(_) => assert_ne!(out, data),
    }
}

#[test]
fn explicit_level_still_round_trips() {
    require_native!();
    let data = sample_data(64 * 1024);
    let mut writer =
        LzopWriter::with_block_size(Vec::new(), LzopStrategy::Lzo1x999, 64 * 1024).unwrap();
    writer.set_compression_level(Some(1));
    writer.write_all(&data).unwrap();
    let bytes = writer.into_inner().unwrap();
    assert_eq!(read_stream(&bytes), data);
}

#[test]
fn tiny_block_size_is_rejected() {
    // Validated before the library is touched, so no gate needed.
    let err = LzopWriter::with_block_size(Vec::new(), LzopStrategy::Lzo1x1, 64).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
}
