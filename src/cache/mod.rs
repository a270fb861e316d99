//! Font resource cache
//!
//! Loads each (file path, face index) pair exactly once into a resident
//! font. Raw file bytes are shared between faces of the same file through a
//! refcounted buffer, so releasing one face never invalidates its siblings
//! and teardown frees each buffer exactly once.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, info};

use crate::error::FontError;
use crate::raster::{FaceInfo, FaceLoader, TtfFaceLoader, VerticalMetrics};

/// Stable identifier of a resident font. Valid until the font is released;
/// slot indices may be reused by later loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontHandle(pub(crate) u32);

/// A loaded font face with its shared file buffer and cached metrics.
pub struct ResidentFont {
    pub(crate) buffer: Arc<Vec<u8>>,
    pub(crate) face_index: u32,
    pub(crate) path: PathBuf,
    pub(crate) vertical: VerticalMetrics,
    pub(crate) units_per_em: u16,
}

impl ResidentFont {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn face_index(&self) -> u32 {
        self.face_index
    }

    pub fn vertical_metrics(&self) -> VerticalMetrics {
        self.vertical
    }

    /// Design units per em, as the face declares them.
    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }
}

/// Arena of resident fonts with tombstoned slots.
pub struct FontStore {
    fonts: Vec<Option<ResidentFont>>,
    loader: Box<dyn FaceLoader>,
}

impl Default for FontStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FontStore {
    pub fn new() -> Self {
        Self::with_loader(Box::new(TtfFaceLoader))
    }

    /// Build a store over a custom engine loader (tests, alternate engines).
    pub fn with_loader(loader: Box<dyn FaceLoader>) -> Self {
        Self { fonts: Vec::new(), loader }
    }

    /// Load a font file/face pair, deduplicating against resident fonts.
    ///
    /// A repeated request returns the existing handle without touching the
    /// file; a new face of an already-read file reuses its buffer.
    pub fn load(&mut self, path: &Path, face_index: u32) -> Result<FontHandle, FontError> {
        if let Some(handle) = self.find(path, face_index) {
            debug!("font already resident: {} #{}", path.display(), face_index);
            return Ok(handle);
        }

        let buffer = match self.find_buffer(path) {
            Some(shared) => {
                debug!("reusing buffer of {} for face {}", path.display(), face_index);
                shared
            }
            None => {
                let bytes = std::fs::read(path).map_err(|source| FontError::FileNotFound {
                    path: path.to_path_buf(),
                    source,
                })?;
                Arc::new(bytes)
            }
        };

        // A rejected face registers nothing; a freshly read buffer is
        // dropped here with the error.
        let FaceInfo { vertical, units_per_em } = self.loader.init(&buffer, face_index, path)?;

        let resident = ResidentFont {
            buffer,
            face_index,
            path: path.to_path_buf(),
            vertical,
            units_per_em,
        };
        let handle = self.insert(resident);
        info!("font loaded: {} #{} → handle {:?}", path.display(), face_index, handle);
        Ok(handle)
    }

    /// The resident font behind a handle, failing cleanly when it was
    /// released or never existed.
    pub fn get(&self, handle: FontHandle) -> Result<&ResidentFont, FontError> {
        self.fonts
            .get(handle.0 as usize)
            .and_then(Option::as_ref)
            .ok_or(FontError::UnknownHandle { handle })
    }

    /// Release one resident font. Its buffer stays alive while other faces
    /// of the same file still reference it.
    pub fn release(&mut self, handle: FontHandle) -> Result<(), FontError> {
        let slot = self
            .fonts
            .get_mut(handle.0 as usize)
            .ok_or(FontError::UnknownHandle { handle })?;
        match slot.take() {
            Some(font) => {
                debug!("font released: {} #{}", font.path.display(), font.face_index);
                Ok(())
            }
            None => Err(FontError::UnknownHandle { handle }),
        }
    }

    /// Release every resident font. Shared buffers are freed exactly once
    /// when their last reference drops. Safe to call on an empty store.
    pub fn release_all(&mut self) {
        let count = self.resident_count();
        self.fonts.clear();
        if count > 0 {
            info!("released {count} resident fonts");
        }
    }

    pub fn resident_count(&self) -> usize {
        self.fonts.iter().filter(|slot| slot.is_some()).count()
    }

    fn find(&self, path: &Path, face_index: u32) -> Option<FontHandle> {
        self.fonts.iter().enumerate().find_map(|(i, slot)| {
            slot.as_ref()
                .filter(|font| font.face_index == face_index && font.path == path)
                .map(|_| FontHandle(i as u32))
        })
    }

    fn find_buffer(&self, path: &Path) -> Option<Arc<Vec<u8>>> {
        self.fonts
            .iter()
            .flatten()
            .find(|font| font.path == path)
            .map(|font| Arc::clone(&font.buffer))
    }

    fn insert(&mut self, resident: ResidentFont) -> FontHandle {
        // Reuse the first tombstoned slot before growing the arena.
        for (i, slot) in self.fonts.iter_mut().enumerate() {
            if slot.is_none() {
                *slot = Some(resident);
                return FontHandle(i as u32);
            }
        }
        self.fonts.push(Some(resident));
        FontHandle((self.fonts.len() - 1) as u32)
    }
}
