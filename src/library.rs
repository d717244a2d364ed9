//! Process-wide liblzo2 handle: load once, fingerprint once, resolve by name.
//!
//! # Discovery
//! The shared object is looked up in this order: the `LZO_LIBRARY`
//! environment variable (exact path, no fallback), then the platform's
//! usual sonames. Whatever wins is loaded exactly once per process and the
//! handle is cached; it is never closed, so every function pointer resolved
//! through it stays valid for the life of the process.
//!
//! # Initialization
//! The first [`LzoLibrary::get`] runs the whole sequence: map the library,
//! read `lzo_version` (a missing version symbol degrades to 0, not an
//! error), then call `__lzo_init_v2` with the host ABI fingerprint. A non-OK
//! status means the mapped library disagrees with this process about basic
//! struct layouts — that result is cached as fatal and every later `get()`
//! returns it; no codec stream can be constructed past it.

use crate::error::LzoError;
use crate::ffi::{self, Fingerprint, InitFn, VersionFn};
use std::sync::OnceLock;

#[cfg(target_os = "windows")]
const SONAME_CANDIDATES: &[&str] = &["lzo2.dll"];
#[cfg(target_os = "macos")]
const SONAME_CANDIDATES: &[&str] = &["liblzo2.2.dylib", "liblzo2.dylib"];
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const SONAME_CANDIDATES: &[&str] = &["liblzo2.so.2", "liblzo2.so"];

static LIBRARY: OnceLock<Result<LzoLibrary, LzoError>> = OnceLock::new();

/// The loaded native library plus its cached version number.
pub struct LzoLibrary {
    lib:     &'static libloading::Library,
    path:    String,
    version: u32,
}

impl LzoLibrary {
    /// The process-wide instance, loading and initializing on first use.
    ///
    /// After the first call this is a pure read; concurrent first calls are
    /// serialized by the `OnceLock`.
    pub fn get() -> Result<&'static LzoLibrary, LzoError> {
        match LIBRARY.get_or_init(|| LzoLibrary::load_with(&Fingerprint::host())) {
            Ok(lib) => Ok(lib),
            Err(e) => Err(e.clone()),
        }
    }

    /// True when the native library is present and binary-compatible.
    pub fn is_available() -> bool {
        LzoLibrary::get().is_ok()
    }

    /// Load and initialize an instance against an explicit fingerprint,
    /// bypassing the process-wide cache.
    ///
    /// This is the testable seam for the fatal-init path; everything else
    /// goes through [`LzoLibrary::get`]. The mapped library is deliberately
    /// leaked — resolution hands out `'static` function pointers and the
    /// library must outlive all of them.
    pub fn load_with(fingerprint: &Fingerprint) -> Result<LzoLibrary, LzoError> {
        let (lib, path) = open_library()?;
        let lib: &'static libloading::Library = Box::leak(Box::new(lib));

        // Version is diagnostic only: absence degrades to 0.
        let version = match unsafe { lib.get::<VersionFn>(b"lzo_version") } {
            Ok(f) => unsafe { f() },
            Err(_) => {
                log::warn!("{path}: no lzo_version symbol, reporting version 0");
                0
            }
        };

        let init: InitFn = unsafe { lib.get::<InitFn>(b"__lzo_init_v2") }
            .map(|s| *s)
            .map_err(|e| LzoError::SymbolNotFound {
                symbol: "__lzo_init_v2".into(),
                diagnostic: e.to_string(),
            })?;
        let rv = unsafe {
            init(
                fingerprint.version,
                fingerprint.sizeof_short,
                fingerprint.sizeof_int,
                fingerprint.sizeof_long,
                fingerprint.sizeof_lzo_uint32,
                fingerprint.sizeof_lzo_uint,
                fingerprint.sizeof_dict,
                fingerprint.sizeof_charp,
                fingerprint.sizeof_voidp,
                fingerprint.sizeof_callback,
            )
        };
        if rv != ffi::status::OK {
            return Err(LzoError::FatalInit { status: rv });
        }

        log::debug!("loaded {path} (lzo version {version:#06x})");
        Ok(LzoLibrary { lib, path, version })
    }

    /// The library's self-reported version number (0 when the symbol was
    /// absent).
    pub fn version(&self) -> u32 {
        self.version
    }

    /// The path or soname the library was loaded from.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Resolve `symbol` to a callable of type `T`.
    ///
    /// The returned pointer is a plain copy out of the (never-unloaded)
    /// library, so it carries no lifetime.
    ///
    /// # Safety
    /// `T` must be the exact `unsafe extern "C"` signature of the named
    /// entry point.
    pub(crate) unsafe fn resolve<T: Copy>(&self, symbol: &'static str) -> Result<T, LzoError> {
        match self.lib.get::<T>(symbol.as_bytes()) {
            Ok(s) => Ok(*s),
            Err(e) => Err(LzoError::SymbolNotFound {
                symbol: symbol.into(),
                diagnostic: e.to_string(),
            }),
        }
    }
}

/// Map the shared object, trying each discovery candidate in order.
fn open_library() -> Result<(libloading::Library, String), LzoError> {
    let candidates: Vec<String> = match std::env::var("LZO_LIBRARY") {
        Ok(path) if !path.is_empty() => vec![path],
        _ => SONAME_CANDIDATES.iter().map(|s| s.to_string()).collect(),
    };

    let mut last_diagnostic = String::new();
    for name in &candidates {
        match unsafe { libloading::Library::new(name) } {
            Ok(lib) => return Ok((lib, name.clone())),
            Err(e) => last_diagnostic = e.to_string(),
        }
    }
    Err(LzoError::LibraryLoad {
        path: candidates.join(", "),
        diagnostic: last_diagnostic,
    })
}
