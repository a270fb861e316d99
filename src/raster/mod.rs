//! Rasterization-engine seam
//!
//! The layout engine and compositor talk to the font rasterizer through
//! these traits, so the concrete engine (ttf-parser + ab_glyph_rasterizer,
//! in `ttf`) stays swappable and the algorithms stay testable against
//! synthetic metric tables.

pub mod ttf;

pub use ttf::{TtfFaceLoader, TtfSource};

use std::path::Path;

use crate::error::FontError;

/// Vertical face metrics in font design units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerticalMetrics {
    /// Distance from baseline to the highest point of the face.
    pub ascent: i32,
    /// Distance from baseline to the lowest point (negative).
    pub descent: i32,
    /// Extra gap between lines.
    pub line_gap: i32,
}

/// Horizontal metrics for one codepoint, in font design units.
#[derive(Debug, Clone, Copy, Default)]
pub struct HorizontalMetrics {
    /// Pen advance to the next glyph.
    pub advance_width: i32,
    /// Offset from the pen position to the glyph's left edge.
    pub left_side_bearing: i32,
}

/// Device-pixel bounding box of a glyph rendered at some scale.
///
/// Coordinates are relative to the pen position on the baseline, y growing
/// downward: `y0` is usually negative (above the baseline), `y1` at or below
/// it. An empty glyph (space, missing outline) is all zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitmapBox {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl BitmapBox {
    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }
}

/// Per-glyph queries the layout engine and compositor need from a face.
///
/// Codepoints are UTF-16 code units; a unit with no glyph in the face maps
/// to the missing-glyph slot, mirroring how the engine itself behaves.
pub trait RasterSource {
    /// Advance width and left-side bearing for one codepoint.
    fn h_metrics(&self, codepoint: u16) -> HorizontalMetrics;

    /// Kerning adjustment between two adjacent codepoints, design units.
    /// Zero when the pair is unknown (including the terminator).
    fn kern_advance(&self, left: u16, right: u16) -> i32;

    /// Device bounding box of the codepoint's bitmap at `scale`.
    fn bitmap_box(&self, codepoint: u16, scale: f32) -> BitmapBox;

    /// Rasterize the codepoint at `scale` into `out`, a `width` by `height`
    /// region written with row stride `stride` bytes. Bytes are 0..=255
    /// coverage and overwrite whatever the region held.
    fn rasterize(&self, codepoint: u16, scale: f32, out: &mut [u8], width: i32, height: i32, stride: usize);
}

/// Face metadata captured once at load time.
#[derive(Debug, Clone, Copy)]
pub struct FaceInfo {
    pub vertical: VerticalMetrics,
    pub units_per_em: u16,
}

/// Engine entry point used by the font cache to validate a buffer/face pair.
///
/// Must not retain the buffer; the cache owns sharing and lifetime.
pub trait FaceLoader {
    /// Locate `face_index` inside `data` and read its vertical metrics.
    /// Fails with [`FontError::InvalidFont`] when the bytes are not a font
    /// or the index does not name a face in them.
    fn init(&self, data: &[u8], face_index: u32, path: &Path) -> Result<FaceInfo, FontError>;
}

/// Scale factor mapping design units to the requested pixel height.
///
/// Matches the engine's pixel-height policy: the full ascent-to-descent
/// extent of the face spans exactly `pixel_height` pixels.
pub fn scale_for_pixel_height(vertical: VerticalMetrics, pixel_height: f32) -> f32 {
    pixel_height / (vertical.ascent - vertical.descent) as f32
}
