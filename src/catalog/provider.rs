//! Platform font-catalog providers
//!
//! A capability interface over the host's installed-font registry. One
//! concrete provider queries the system database through `fontdb`; the null
//! provider stands in on hosts without a usable catalog. Registry-style
//! providers (raw display names, files relative to a font directory) feed
//! the record expansion in [`crate::catalog`].

use std::path::PathBuf;

use log::{info, warn};

/// Format class of a catalog record; only scalable fonts are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatClass {
    /// TrueType/OpenType outline font.
    Scalable,
    /// Fixed-size bitmap font.
    Raster,
    /// Stroke/vector font.
    Vector,
}

/// One record as the platform reports it, before expansion.
#[derive(Debug, Clone)]
pub struct RawFontRecord {
    /// Display name; may carry a type annotation and an `&`-joined
    /// sub-name list for multi-face container files.
    pub name: String,
    /// Font file; absolute, or relative to [`CatalogProvider::font_dir`].
    pub file: PathBuf,
    /// Face index when the platform already reports per-face records.
    /// `None` for registry-style sources, where the index is derived from
    /// the sub-name position during expansion.
    pub face_index: Option<u32>,
    pub format: FormatClass,
}

/// Reasons catalog enumeration can fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No catalog exists on this host; permanent, cached by the resolver.
    Unsupported,
    /// Transient failure (I/O, registry busy); retried on the next call.
    Io(String),
}

/// Capability interface over the platform's installed-font catalog.
pub trait CatalogProvider {
    /// Enumerate every installed font record.
    fn enumerate(&self) -> Result<Vec<RawFontRecord>, CatalogError>;

    /// Base directory for records with relative file names, when the
    /// platform keeps fonts in one well-known place.
    fn font_dir(&self) -> Option<PathBuf> {
        None
    }
}

/// System catalog backed by `fontdb`.
///
/// fontdb reports one record per face with its true index and an absolute
/// path, so records from here bypass the `&`-split during expansion.
#[derive(Debug, Default)]
pub struct SystemCatalog;

impl CatalogProvider for SystemCatalog {
    fn enumerate(&self) -> Result<Vec<RawFontRecord>, CatalogError> {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        if db.is_empty() {
            warn!("system font database is empty");
            return Err(CatalogError::Unsupported);
        }

        let mut records = Vec::with_capacity(db.len());
        for face in db.faces() {
            let path = match &face.source {
                fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => path.clone(),
                // In-memory faces have no file to hand to the cache.
                fontdb::Source::Binary(_) => continue,
            };
            let Some((family, _)) = face.families.first() else {
                continue;
            };
            records.push(RawFontRecord {
                name: family.clone(),
                file: path,
                face_index: Some(face.index),
                format: FormatClass::Scalable,
            });
        }
        info!("system font catalog: {} face records", records.len());
        Ok(records)
    }
}

/// Null provider for hosts without an installed-font catalog.
#[derive(Debug, Default)]
pub struct NullCatalog;

impl CatalogProvider for NullCatalog {
    fn enumerate(&self) -> Result<Vec<RawFontRecord>, CatalogError> {
        Err(CatalogError::Unsupported)
    }
}
