//! Concrete rasterization engine
//!
//! Metrics and face parsing come from `ttf-parser`; coverage filling from
//! `ab_glyph_rasterizer`. Rounding follows the classic bitmap-box
//! convention: floor on the min edges, ceil on the max edges, y flipped so
//! device rows grow downward from the glyph's top.

use std::path::Path;

use ab_glyph_rasterizer::{point, Point, Rasterizer};
use log::debug;
use ttf_parser::{Face, GlyphId, OutlineBuilder};

use crate::error::FontError;
use crate::raster::{BitmapBox, FaceInfo, FaceLoader, HorizontalMetrics, RasterSource, VerticalMetrics};

/// Validates a buffer/face pair and reads its vertical metrics.
#[derive(Debug, Default, Clone, Copy)]
pub struct TtfFaceLoader;

impl FaceLoader for TtfFaceLoader {
    fn init(&self, data: &[u8], face_index: u32, path: &Path) -> Result<FaceInfo, FontError> {
        // A nonzero face index only makes sense inside a collection file.
        match ttf_parser::fonts_in_collection(data) {
            None if face_index > 0 => {
                return Err(FontError::InvalidFont { path: path.to_path_buf(), face_index });
            }
            Some(count) if face_index >= count => {
                return Err(FontError::InvalidFont { path: path.to_path_buf(), face_index });
            }
            _ => {}
        }

        let face = Face::parse(data, face_index)
            .map_err(|_| FontError::InvalidFont { path: path.to_path_buf(), face_index })?;

        let info = FaceInfo {
            vertical: VerticalMetrics {
                ascent: i32::from(face.ascender()),
                descent: i32::from(face.descender()),
                line_gap: i32::from(face.line_gap()),
            },
            units_per_em: face.units_per_em(),
        };
        debug!(
            "face initialized: {} #{} (ascent {}, descent {}, upem {})",
            path.display(),
            face_index,
            info.vertical.ascent,
            info.vertical.descent,
            info.units_per_em
        );
        Ok(info)
    }
}

/// A parsed face bound to a shared font buffer for one operation.
///
/// Parsing is zero-copy table slicing, so deriving this per measure or
/// composite call is cheap; the cache keeps only the raw buffer resident.
pub struct TtfSource<'a> {
    face: Face<'a>,
}

impl<'a> TtfSource<'a> {
    pub fn new(data: &'a [u8], face_index: u32, path: &Path) -> Result<Self, FontError> {
        let face = Face::parse(data, face_index)
            .map_err(|_| FontError::InvalidFont { path: path.to_path_buf(), face_index })?;
        Ok(Self { face })
    }

    /// UTF-16 unit to glyph, falling back to the missing-glyph slot.
    /// Lone surrogates cannot name a character and map to glyph 0.
    fn glyph(&self, codepoint: u16) -> GlyphId {
        char::from_u32(u32::from(codepoint))
            .and_then(|c| self.face.glyph_index(c))
            .unwrap_or(GlyphId(0))
    }
}

impl RasterSource for TtfSource<'_> {
    fn h_metrics(&self, codepoint: u16) -> HorizontalMetrics {
        let glyph = self.glyph(codepoint);
        HorizontalMetrics {
            advance_width: self.face.glyph_hor_advance(glyph).map_or(0, i32::from),
            left_side_bearing: self.face.glyph_hor_side_bearing(glyph).map_or(0, i32::from),
        }
    }

    fn kern_advance(&self, left: u16, right: u16) -> i32 {
        let Some(kern) = self.face.tables().kern else {
            return 0;
        };
        let (left, right) = (self.glyph(left), self.glyph(right));
        for subtable in kern.subtables {
            if !subtable.horizontal || subtable.variable {
                continue;
            }
            if let Some(value) = subtable.glyphs_kerning(left, right) {
                return i32::from(value);
            }
        }
        0
    }

    fn bitmap_box(&self, codepoint: u16, scale: f32) -> BitmapBox {
        let Some(rect) = self.face.glyph_bounding_box(self.glyph(codepoint)) else {
            return BitmapBox::default();
        };
        BitmapBox {
            x0: (f32::from(rect.x_min) * scale).floor() as i32,
            y0: (-f32::from(rect.y_max) * scale).floor() as i32,
            x1: (f32::from(rect.x_max) * scale).ceil() as i32,
            y1: (-f32::from(rect.y_min) * scale).ceil() as i32,
        }
    }

    fn rasterize(&self, codepoint: u16, scale: f32, out: &mut [u8], width: i32, height: i32, stride: usize) {
        if width <= 0 || height <= 0 {
            return;
        }
        let bbox = self.bitmap_box(codepoint, scale);
        let mut outline = OutlineSink::new(scale, bbox.x0 as f32, bbox.y0 as f32, width as usize, height as usize);
        // No outline (space, empty glyph) still clears the region below.
        let _ = self.face.outline_glyph(self.glyph(codepoint), &mut outline);

        let (width, height) = (width as usize, height as usize);
        outline.rasterizer.for_each_pixel_2d(|x, y, coverage| {
            let (x, y) = (x as usize, y as usize);
            if x < width && y < height {
                out[y * stride + x] = (coverage.min(1.0) * 255.0 + 0.5) as u8;
            }
        });
    }
}

/// Walks a glyph outline into the coverage rasterizer, mapping font units
/// (y up, relative to the baseline) to device pixels inside the bitmap box.
struct OutlineSink {
    rasterizer: Rasterizer,
    scale: f32,
    shift_x: f32,
    shift_y: f32,
    start: Point,
    current: Point,
}

impl OutlineSink {
    fn new(scale: f32, box_x0: f32, box_y0: f32, width: usize, height: usize) -> Self {
        Self {
            rasterizer: Rasterizer::new(width, height),
            scale,
            shift_x: box_x0,
            shift_y: box_y0,
            start: point(0.0, 0.0),
            current: point(0.0, 0.0),
        }
    }

    fn device(&self, x: f32, y: f32) -> Point {
        point(x * self.scale - self.shift_x, -y * self.scale - self.shift_y)
    }
}

impl OutlineBuilder for OutlineSink {
    fn move_to(&mut self, x: f32, y: f32) {
        self.start = self.device(x, y);
        self.current = self.start;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let to = self.device(x, y);
        self.rasterizer.draw_line(self.current, to);
        self.current = to;
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let control = self.device(x1, y1);
        let to = self.device(x, y);
        self.rasterizer.draw_quad(self.current, control, to);
        self.current = to;
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let c0 = self.device(x1, y1);
        let c1 = self.device(x2, y2);
        let to = self.device(x, y);
        self.rasterizer.draw_cubic(self.current, c0, c1, to);
        self.current = to;
    }

    fn close(&mut self) {
        if self.current != self.start {
            self.rasterizer.draw_line(self.current, self.start);
        }
        self.current = self.start;
    }
}
