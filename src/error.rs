//! Error taxonomy for the bridge.
//!
//! Every failure path carries a human-readable native diagnostic (library
//! path, symbol name, or the raw status code) so an operator can tell
//! "library not found" from "symbol missing" from "codec rejected input".
//!
//! All fields are owned values: the one-shot library initializer caches its
//! `Result` for the life of the process and hands out clones.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LzoError {
    /// Caller passed an algorithm selector outside the registry table.
    /// A defect in calling code, never retryable.
    #[error("invalid algorithm selector {selector} (table holds {table_len} entries)")]
    InvalidSelector { selector: u32, table_len: usize },

    /// The native shared library could not be mapped into the process.
    #[error("cannot load {path}: {diagnostic}")]
    LibraryLoad { path: String, diagnostic: String },

    /// A required entry point is absent from the loaded library (version
    /// skew). Fatal for the selector that needs it; other selectors whose
    /// symbols exist keep working.
    #[error("symbol {symbol} not found: {diagnostic}")]
    SymbolNotFound { symbol: String, diagnostic: String },

    /// `__lzo_init_v2` rejected the ABI fingerprint. The loaded library is
    /// binary-incompatible with this process; no codec call is safe after
    /// this.
    #[error("could not initialize lzo library (status {status})")]
    FatalInit { status: i32 },

    /// A native compress/decompress entry returned a non-OK status. The
    /// message format mirrors the native diagnostic verbatim.
    #[error("{symbol} returned: {status}")]
    Codec { symbol: &'static str, status: i32 },

    /// Host-runtime misuse: a violated buffer contract or a poisoned pin
    /// lock. Should never occur in practice.
    #[error("internal error: {0}")]
    Internal(String),
}
