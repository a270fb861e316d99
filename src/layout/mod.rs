//! Text layout engine
//!
//! Single pass over UTF-16 code units with one unit of lookahead for
//! kerning. Produces per-glyph placements and the overall bounding box,
//! word-wrapping on spaces when a maximum width is set. The scan runs one
//! unit past the end so the synthetic terminator flushes the last line.

use crate::cache::FontHandle;
use crate::raster::{scale_for_pixel_height, RasterSource, VerticalMetrics};

const SPACE: u16 = 0x0020;
const CR: u16 = 0x000D;
const LF: u16 = 0x000A;

/// One placed glyph, device pixels relative to the bitmap's top-left.
///
/// A zero codepoint marks a slot that was never placed (line breaks,
/// carriage returns) and must not be rasterized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlyphPlacement {
    pub codepoint: u16,
    pub offset_x: i32,
    pub offset_y: i32,
    pub width: i32,
    pub height: i32,
}

/// Result of one `measure` call, consumed by the compositor.
///
/// Placements are parallel to the input's UTF-16 code units. The layout
/// carries the handle and scale it was measured with, so it can only be
/// composited against the font it came from.
#[derive(Debug, Clone)]
pub struct LayoutResult {
    /// Bitmap width in pixels.
    pub width: i32,
    /// Bitmap height in pixels, top correction included.
    pub height: i32,
    /// Downward shift applied to every glyph so that ascenders which
    /// overshoot the top of the first line stay inside the bitmap.
    pub top_offset: i32,
    pub(crate) scale: f32,
    pub(crate) handle: FontHandle,
    pub glyphs: Vec<GlyphPlacement>,
}

impl LayoutResult {
    /// Vertical offset callers apply to the bitmap origin, the negated
    /// top correction.
    pub fn y_offset(&self) -> i32 {
        -self.top_offset
    }

    pub fn handle(&self) -> FontHandle {
        self.handle
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}

/// Lay out `text` at `pixel_size`, wrapping lines that would exceed
/// `max_width` at the last space of the line. `max_width == 0` means
/// unlimited width.
///
/// A line with no space that still overflows is left unwrapped; forcing a
/// mid-word break was never part of the contract.
pub fn measure<S: RasterSource>(
    source: &S,
    vertical: VerticalMetrics,
    handle: FontHandle,
    text: &[u16],
    pixel_size: i32,
    max_width: i32,
    line_spacing: f32,
) -> LayoutResult {
    let max_width = if max_width == 0 { i32::MAX } else { max_width };
    let n = text.len();
    let mut glyphs = vec![GlyphPlacement::default(); n];

    let scale = scale_for_pixel_height(vertical, pixel_size as f32);
    let ascent = vertical.ascent as f32 * scale;
    // Integer-truncated halves, so odd pixel sizes round the same way on
    // both terms.
    let line_y_increment = (pixel_size / 2) as f32 + (pixel_size / 2) as f32 * line_spacing;

    let (mut x, mut y): (f32, f32) = (0.0, 0.0);
    let (mut max_x, mut max_y): (f32, f32) = (0.0, 0.0);
    let mut line_max_x: i32 = 0;
    let mut extra_y_offset: i32 = 0;
    // Wrap candidate on the current line: unit index of the space and the
    // line width up to it, capped at max_width.
    let mut last_space: Option<(usize, i32)> = None;

    let mut i = 0usize;
    while i <= n {
        let unit = if i == n { 0 } else { text[i] };
        if unit == CR {
            i += 1;
            continue;
        }
        if unit == LF || unit == 0 {
            max_x = max_x.max(line_max_x as f32);
            x = 0.0;
            y += line_y_increment;
            last_space = None;
            i += 1;
            continue;
        }

        let next = if i + 1 < n { text[i + 1] } else { 0 };
        let kern = source.kern_advance(unit, next);
        let metrics = source.h_metrics(unit);
        let bbox = source.bitmap_box(unit, scale);

        glyphs[i].codepoint = unit;
        glyphs[i].width = bbox.width();
        glyphs[i].height = bbox.height();
        glyphs[i].offset_y = bbox.y0 + (y + ascent) as i32;

        // Ascenders above the top of the first line shift the whole bitmap
        // down by the worst overshoot.
        if glyphs[i].offset_y < 0 && extra_y_offset < -glyphs[i].offset_y {
            extra_y_offset = -glyphs[i].offset_y;
        }

        let last_x = x as i32;
        if x == 0.0 && metrics.left_side_bearing < 0 {
            // First glyph of a line with a negative bearing: keep it at the
            // raw pen position instead of pushing it off the left edge, but
            // advance the pen as if the bearing had applied.
            glyphs[i].offset_x = x as i32;
            x += (metrics.advance_width + kern - metrics.left_side_bearing) as f32 * scale;
        } else {
            glyphs[i].offset_x = (x + metrics.left_side_bearing as f32 * scale) as i32;
            x += (metrics.advance_width + kern) as f32 * scale;
        }
        x = ((x + 0.5) as i32) as f32;

        // Visual right edge of the glyph, not the advance-based pen.
        line_max_x = x as i32 - ((metrics.advance_width as f32 * scale) as i32 - bbox.x1);
        max_y = max_y.max(((y + ascent) as i32 + bbox.y1) as f32);

        if unit == SPACE {
            last_space = Some((i, line_max_x.min(max_width)));
        }
        if line_max_x > max_width {
            if let Some((space_at, width_at_space)) = last_space {
                max_x = max_x.max(width_at_space as f32);
                x = 0.0;
                y += line_y_increment;
                last_space = None;
                if last_x != 0 {
                    // Rewind to just after the space; the units between it
                    // and the overflow are reprocessed on the new line.
                    i = space_at + 1;
                    continue;
                }
                i += 1;
                continue;
            }
            // No space on this line yet: overflow rather than break
            // mid-word.
        }
        i += 1;
    }

    LayoutResult {
        width: max_x as i32,
        height: max_y as i32 + extra_y_offset,
        top_offset: extra_y_offset,
        scale,
        handle,
        glyphs,
    }
}
