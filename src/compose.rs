//! Glyph compositor
//!
//! Stamps every placed glyph of a layout into a caller-owned byte buffer.
//! The buffer is a row-major 8-bit coverage bitmap of `target_width`
//! columns; the caller sizes it to at least `target_width * layout.height`
//! bytes and owns the final color compositing.

use log::debug;

use crate::error::FontError;
use crate::layout::LayoutResult;
use crate::raster::RasterSource;

/// Rasterize each nonzero placement of `layout` into `target`.
///
/// Placements with the zero-codepoint sentinel or an empty box are
/// skipped. A buffer too small for the layout is rejected before any byte
/// is written.
pub fn composite<S: RasterSource>(
    source: &S,
    layout: &LayoutResult,
    target: &mut [u8],
    target_width: usize,
) -> Result<(), FontError> {
    let needed = target_width * layout.height.max(0) as usize;
    if target.len() < needed {
        return Err(FontError::BufferSizingFault { needed, actual: target.len() });
    }

    for glyph in &layout.glyphs {
        if glyph.codepoint == 0 || glyph.width <= 0 || glyph.height <= 0 {
            continue;
        }
        let row = i64::from(glyph.offset_y + layout.top_offset);
        let col = i64::from(glyph.offset_x);
        // Layout keeps offsets inside the bitmap; a pathological face
        // could still place a glyph outside, which is not recoverable.
        if row < 0 || col < 0 {
            debug!("skipping glyph U+{:04X} placed outside the bitmap", glyph.codepoint);
            continue;
        }
        let offset = row as usize * target_width + col as usize;
        let span = (glyph.height as usize - 1) * target_width + glyph.width as usize;
        if offset + span > target.len() {
            return Err(FontError::BufferSizingFault {
                needed: offset + span,
                actual: target.len(),
            });
        }
        source.rasterize(
            glyph.codepoint,
            layout.scale,
            &mut target[offset..],
            glyph.width,
            glyph.height,
            target_width,
        );
    }
    Ok(())
}
