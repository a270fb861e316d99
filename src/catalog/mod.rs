//! Installed-font catalog and fuzzy name resolution
//!
//! Enumerates the platform catalog once (lazily), expands raw records into
//! per-face entries, and maps human-entered font names to entries by edit
//! distance. An exact match wins immediately; otherwise the globally
//! closest entry does, first-seen on ties.

pub mod distance;
pub mod provider;

use std::path::PathBuf;

use log::{info, warn};

use crate::catalog::distance::levenshtein;
use crate::catalog::provider::{CatalogError, CatalogProvider, FormatClass, RawFontRecord};
use crate::error::FontError;

/// Windows-style annotation appended to scalable font display names.
const TYPE_SUFFIX: &str = " (TrueType)";

/// Delimiter joining the sub-names of a multi-face container file.
const NAME_DELIMITER: &str = " & ";

/// One installed face: display name, font file, face index within the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub file: PathBuf,
    pub face_index: u32,
}

/// Expand raw platform records into per-face catalog entries.
///
/// Non-scalable records are discarded. The type annotation is stripped from
/// every display name. Records without an explicit face index follow
/// registry semantics: a multi-face container file contributes one entry per
/// `&`-joined sub-name with face indices in enumeration order, anything else
/// a single entry with face index 0.
pub fn expand_records(records: Vec<RawFontRecord>) -> Vec<CatalogEntry> {
    let mut entries = Vec::with_capacity(records.len());
    for record in records {
        if record.format != FormatClass::Scalable {
            continue;
        }
        let name = record.name.strip_suffix(TYPE_SUFFIX).unwrap_or(&record.name);

        if let Some(face_index) = record.face_index {
            entries.push(CatalogEntry { name: name.to_string(), file: record.file, face_index });
        } else if is_collection_file(&record.file) {
            for (i, sub_name) in name.split(NAME_DELIMITER).enumerate() {
                entries.push(CatalogEntry {
                    name: sub_name.to_string(),
                    file: record.file.clone(),
                    face_index: i as u32,
                });
            }
        } else {
            entries.push(CatalogEntry { name: name.to_string(), file: record.file, face_index: 0 });
        }
    }
    entries
}

fn is_collection_file(file: &std::path::Path) -> bool {
    file.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ttc") || e.eq_ignore_ascii_case("otc"))
}

enum CatalogState {
    Unloaded,
    Loaded(Vec<CatalogEntry>),
    /// The host has no catalog; sticky until [`NameResolver::reset`].
    Unsupported,
}

/// Resolves font names against the lazily loaded catalog.
pub struct NameResolver {
    provider: Box<dyn CatalogProvider>,
    state: CatalogState,
}

impl NameResolver {
    pub fn new(provider: Box<dyn CatalogProvider>) -> Self {
        Self { provider, state: CatalogState::Unloaded }
    }

    /// Map a font name to the closest catalog entry.
    ///
    /// The first call enumerates the catalog; a permanent enumeration
    /// failure makes this and all later calls fail with
    /// [`FontError::PlatformUnsupported`] until [`reset`](Self::reset),
    /// while transient failures are retried on the next call.
    pub fn resolve(&mut self, name: &str) -> Result<&CatalogEntry, FontError> {
        self.ensure_loaded()?;
        let CatalogState::Loaded(entries) = &self.state else {
            return Err(FontError::PlatformUnsupported);
        };
        if entries.is_empty() {
            return Err(FontError::NameNotResolved { name: name.to_string() });
        }

        let mut best = 0;
        let mut best_distance = usize::MAX;
        for (i, entry) in entries.iter().enumerate() {
            let distance = levenshtein(name, &entry.name);
            if distance == 0 {
                return Ok(&entries[i]);
            }
            if distance < best_distance {
                best = i;
                best_distance = distance;
            }
        }

        let entry = &entries[best];
        info!(
            "font name resolved: \"{}\" → \"{}\" ({} #{}, distance {})",
            name,
            entry.name,
            entry.file.display(),
            entry.face_index,
            best_distance
        );
        Ok(entry)
    }

    /// Absolute path for a resolved entry, joining the provider's font
    /// directory when the catalog reports relative file names.
    pub fn full_path(&self, entry: &CatalogEntry) -> Result<PathBuf, FontError> {
        if entry.file.is_absolute() {
            return Ok(entry.file.clone());
        }
        match self.provider.font_dir() {
            Some(dir) => Ok(dir.join(&entry.file)),
            None => Err(FontError::PlatformUnsupported),
        }
    }

    /// The loaded catalog, enumerating it first if needed.
    pub fn entries(&mut self) -> Result<&[CatalogEntry], FontError> {
        self.ensure_loaded()?;
        match &self.state {
            CatalogState::Loaded(entries) => Ok(entries),
            _ => Err(FontError::PlatformUnsupported),
        }
    }

    /// Drop the cached catalog (including a sticky unsupported result) so
    /// the next call enumerates again.
    pub fn reset(&mut self) {
        self.state = CatalogState::Unloaded;
    }

    fn ensure_loaded(&mut self) -> Result<(), FontError> {
        match self.state {
            CatalogState::Loaded(_) => Ok(()),
            CatalogState::Unsupported => Err(FontError::PlatformUnsupported),
            CatalogState::Unloaded => match self.provider.enumerate() {
                Ok(records) => {
                    let entries = expand_records(records);
                    info!("font catalog loaded: {} entries", entries.len());
                    self.state = CatalogState::Loaded(entries);
                    Ok(())
                }
                Err(CatalogError::Unsupported) => {
                    warn!("font catalog unavailable on this platform");
                    self.state = CatalogState::Unsupported;
                    Err(FontError::PlatformUnsupported)
                }
                Err(CatalogError::Io(message)) => {
                    warn!("font catalog enumeration failed: {message}");
                    Err(FontError::CatalogIo(message))
                }
            },
        }
    }
}
