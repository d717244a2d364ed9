//! Dynamically-loaded bindings to the LZO compression family.
//!
//! liblzo2 is mapped at runtime (never linked) and its 43 compressor and
//! 28 decompressor entry points are resolved by name from two frozen
//! selector tables. Codec streams drive those entry points over
//! caller-owned buffers; the [`lzop`] module wraps them in the lzop file
//! format.
//!
//! The shared object is found via the `LZO_LIBRARY` environment variable
//! or the platform's usual sonames, loaded once per process, and checked
//! for ABI compatibility through `__lzo_init_v2` before any codec call.

pub mod buffer;
pub mod compress;
pub mod decompress;
pub mod error;
pub mod ffi;
pub mod library;
pub mod lzop;
pub mod registry;

pub use buffer::DirectBuffer;
pub use compress::LzoCompressor;
pub use decompress::LzoDecompressor;
pub use error::LzoError;
pub use library::LzoLibrary;
pub use lzop::{LzopReader, LzopStrategy, LzopWriter};
