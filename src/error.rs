//! Typed error kinds for font loading, resolution and rasterization.

use std::path::PathBuf;

use thiserror::Error;

use crate::cache::FontHandle;

/// Everything that can go wrong between a font request and a filled bitmap.
#[derive(Debug, Error)]
pub enum FontError {
    /// The font file could not be opened or read.
    #[error("font file not found: {path} ({source})")]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rasterization engine rejected the file bytes or the face index.
    #[error("not a valid font: {path} (face {face_index})")]
    InvalidFont { path: PathBuf, face_index: u32 },

    /// The platform font catalog is unavailable on this host.
    #[error("installed-font catalog is not available on this platform")]
    PlatformUnsupported,

    /// Catalog enumeration failed for a transient reason; retrying may succeed.
    #[error("font catalog enumeration failed: {0}")]
    CatalogIo(String),

    /// The catalog was enumerated but holds no entry to match against.
    #[error("font name not resolved: \"{name}\"")]
    NameNotResolved { name: String },

    /// The handle does not refer to a resident font (never loaded or released).
    #[error("unknown font handle: {handle:?}")]
    UnknownHandle { handle: FontHandle },

    /// The composite target buffer is smaller than the layout requires.
    #[error("target buffer too small: need {needed} bytes, got {actual}")]
    BufferSizingFault { needed: usize, actual: usize },
}
