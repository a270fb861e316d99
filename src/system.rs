//! Caller-facing facade
//!
//! Owns the font store and the name resolver behind one API: load by path or
//! installed name, measure text, composite into a caller buffer, or render
//! straight into a freshly allocated bitmap.
//!
//! The facade is synchronous and single-threaded: loading and resolution take
//! `&mut self`, measuring and compositing borrow immutably and keep no
//! scratch state, so callers wanting cross-thread use hold their own lock.

use std::path::Path;

use crate::cache::{FontHandle, FontStore};
use crate::catalog::provider::{CatalogProvider, SystemCatalog};
use crate::catalog::{CatalogEntry, NameResolver};
use crate::compose::composite;
use crate::error::FontError;
use crate::layout::{measure, LayoutResult};
use crate::raster::{FaceLoader, TtfSource};

/// Point size to pixel size at the classic 96 dpi ratio.
pub fn points_to_pixels(points: i32) -> i32 {
    points * 4 / 3
}

/// A rendered text bitmap: row-major 8-bit coverage, one byte per pixel.
#[derive(Debug, Clone)]
pub struct Bitmap {
    pub width: i32,
    pub height: i32,
    /// Vertical offset callers apply when placing the bitmap, negative when
    /// a tall first-line glyph shifted the content down.
    pub y_offset: i32,
    pub alphas: Vec<u8>,
}

/// Font loading, name resolution, layout and rasterization in one place.
pub struct FontSystem {
    store: FontStore,
    resolver: NameResolver,
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl FontSystem {
    /// A system over the host's installed-font catalog.
    pub fn new() -> Self {
        Self {
            store: FontStore::new(),
            resolver: NameResolver::new(Box::new(SystemCatalog)),
        }
    }

    /// A system over a custom catalog provider and engine loader.
    pub fn with_components(provider: Box<dyn CatalogProvider>, loader: Box<dyn FaceLoader>) -> Self {
        Self {
            store: FontStore::with_loader(loader),
            resolver: NameResolver::new(provider),
        }
    }

    /// Load the first face of a font file.
    pub fn load_font(&mut self, path: &Path) -> Result<FontHandle, FontError> {
        self.store.load(path, 0)
    }

    /// Load one face of a font file, `face_index` counting from 0.
    pub fn load_font_with_face(&mut self, path: &Path, face_index: u32) -> Result<FontHandle, FontError> {
        self.store.load(path, face_index)
    }

    /// Resolve an installed-font name and load the closest match.
    pub fn load_font_by_name(&mut self, name: &str) -> Result<FontHandle, FontError> {
        let entry = self.resolver.resolve(name)?.clone();
        let path = self.resolver.full_path(&entry)?;
        self.store.load(&path, entry.face_index)
    }

    /// Load by font-file path or installed name, telling them apart by a
    /// font-file extension on the spec.
    pub fn load(&mut self, spec: &str) -> Result<FontHandle, FontError> {
        if has_font_extension(spec) {
            self.load_font(Path::new(spec))
        } else {
            self.load_font_by_name(spec)
        }
    }

    /// Release one font; its handle becomes invalid.
    pub fn release(&mut self, handle: FontHandle) -> Result<(), FontError> {
        self.store.release(handle)
    }

    /// Release every font and drop the cached catalog.
    pub fn release_all(&mut self) {
        self.store.release_all();
        self.resolver.reset();
    }

    /// Lay out `text` at `pixel_size`, wrapping at `max_width` pixels
    /// (0 for unlimited).
    pub fn measure(
        &self,
        handle: FontHandle,
        text: &str,
        pixel_size: i32,
        max_width: i32,
        line_spacing: f32,
    ) -> Result<LayoutResult, FontError> {
        let units: Vec<u16> = text.encode_utf16().collect();
        self.measure_utf16(handle, &units, pixel_size, max_width, line_spacing)
    }

    /// `measure` over raw UTF-16 code units; placements stay parallel to
    /// the input.
    pub fn measure_utf16(
        &self,
        handle: FontHandle,
        text: &[u16],
        pixel_size: i32,
        max_width: i32,
        line_spacing: f32,
    ) -> Result<LayoutResult, FontError> {
        let font = self.store.get(handle)?;
        let source = TtfSource::new(&font.buffer, font.face_index(), font.path())?;
        Ok(measure(
            &source,
            font.vertical_metrics(),
            handle,
            text,
            pixel_size,
            max_width,
            line_spacing,
        ))
    }

    /// Stamp a layout's glyphs into `target`, a row-major coverage buffer
    /// of `target_width` columns. The font is the one the layout was
    /// measured with.
    pub fn composite(
        &self,
        layout: &LayoutResult,
        target: &mut [u8],
        target_width: usize,
    ) -> Result<(), FontError> {
        let font = self.store.get(layout.handle())?;
        let source = TtfSource::new(&font.buffer, font.face_index(), font.path())?;
        composite(&source, layout, target, target_width)
    }

    /// Measure and composite into a freshly allocated bitmap.
    pub fn render(
        &self,
        handle: FontHandle,
        text: &str,
        pixel_size: i32,
        max_width: i32,
        line_spacing: f32,
    ) -> Result<Bitmap, FontError> {
        let layout = self.measure(handle, text, pixel_size, max_width, line_spacing)?;
        self.render_layout(&layout, layout.width)
    }

    /// Like [`render`](Self::render) but the bitmap is at least `max_width`
    /// wide, padding short lines on the right.
    pub fn render_force_width(
        &self,
        handle: FontHandle,
        text: &str,
        pixel_size: i32,
        max_width: i32,
        line_spacing: f32,
    ) -> Result<Bitmap, FontError> {
        let layout = self.measure(handle, text, pixel_size, max_width, line_spacing)?;
        self.render_layout(&layout, layout.width.max(max_width))
    }

    fn render_layout(&self, layout: &LayoutResult, width: i32) -> Result<Bitmap, FontError> {
        let width = width.max(0);
        let height = layout.height.max(0);
        let mut alphas = vec![0u8; width as usize * height as usize];
        self.composite(layout, &mut alphas, width as usize)?;
        Ok(Bitmap { width, height, y_offset: layout.y_offset(), alphas })
    }

    /// Every installed font the catalog knows, enumerating it first if
    /// needed.
    pub fn installed_fonts(&mut self) -> Result<&[CatalogEntry], FontError> {
        self.resolver.entries()
    }

    /// Drop the cached catalog so the next name lookup enumerates again.
    pub fn reset_catalog(&mut self) {
        self.resolver.reset();
    }
}

fn has_font_extension(spec: &str) -> bool {
    Path::new(spec)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            e.eq_ignore_ascii_case("ttf")
                || e.eq_ignore_ascii_case("otf")
                || e.eq_ignore_ascii_case("ttc")
                || e.eq_ignore_ascii_case("otc")
        })
}
