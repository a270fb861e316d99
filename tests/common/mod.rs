//! Minimal TrueType builder for hermetic integration tests.
//!
//! Emits just the tables the engine reads (head, hhea, maxp, hmtx, cmap
//! format 4, long loca, glyf, optional kern format 0). Glyph outlines are
//! axis-aligned rectangles, which rasterize to fully covered interiors and
//! make coverage assertions exact.

/// One mapped character: advance/bearing in design units, rectangle
/// outline bounds, `None` for an empty glyph (space).
pub struct GlyphSpec {
    pub ch: char,
    pub advance: u16,
    pub lsb: i16,
    pub rect: Option<(i16, i16, i16, i16)>,
}

/// One face worth of design-unit metrics and glyphs.
pub struct FaceSpec {
    pub units_per_em: u16,
    pub ascent: i16,
    pub descent: i16,
    pub line_gap: i16,
    pub glyphs: Vec<GlyphSpec>,
    /// Kerning pairs `(left, right, adjustment)`.
    pub kerning: Vec<(char, char, i16)>,
}

impl FaceSpec {
    /// The face every layout test expects: 2000 design units from ascent
    /// to descent, so pixel size 20 gives scale 0.01.
    pub fn standard() -> Self {
        let boxed = |ch| GlyphSpec { ch, advance: 1000, lsb: 100, rect: Some((100, 0, 900, 1400)) };
        Self {
            units_per_em: 2048,
            ascent: 1500,
            descent: -500,
            line_gap: 0,
            glyphs: vec![
                GlyphSpec { ch: ' ', advance: 500, lsb: 0, rect: None },
                boxed('A'),
                boxed('V'),
                boxed('a'),
                boxed('b'),
            ],
            kerning: vec![('A', 'V', -100)],
        }
    }
}

/// A single-face font file.
pub fn build_font(spec: &FaceSpec) -> Vec<u8> {
    let mut out = Vec::new();
    write_sfnt(&mut out, &make_tables(spec));
    out
}

/// A font collection file, one directory per face.
pub fn build_collection(specs: &[FaceSpec]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"ttcf");
    w32(&mut out, 0x0001_0000);
    w32(&mut out, specs.len() as u32);
    let offsets_at = out.len();
    for _ in specs {
        w32(&mut out, 0);
    }
    for (i, spec) in specs.iter().enumerate() {
        let offset = out.len() as u32;
        out[offsets_at + i * 4..offsets_at + i * 4 + 4].copy_from_slice(&offset.to_be_bytes());
        write_sfnt(&mut out, &make_tables(spec));
    }
    out
}

fn make_tables(spec: &FaceSpec) -> Vec<([u8; 4], Vec<u8>)> {
    let mut glyphs: Vec<&GlyphSpec> = spec.glyphs.iter().collect();
    glyphs.sort_by_key(|g| g.ch as u32);
    // Glyph 0 is the missing glyph; mapped characters start at 1.
    let num_glyphs = glyphs.len() as u16 + 1;

    let (glyf, loca) = build_glyf(&glyphs);
    let mut tables = vec![
        (*b"cmap", build_cmap(&glyphs)),
        (*b"glyf", glyf),
        (*b"head", build_head(spec, &glyphs)),
        (*b"hhea", build_hhea(spec, num_glyphs)),
        (*b"hmtx", build_hmtx(&glyphs)),
        (*b"loca", loca),
        (*b"maxp", build_maxp(num_glyphs)),
    ];
    if !spec.kerning.is_empty() {
        tables.push((*b"kern", build_kern(spec, &glyphs)));
        tables.sort_by_key(|(tag, _)| *tag);
    }
    tables
}

/// Append an sfnt directory plus table data; offsets are absolute within
/// `out`, so this also works inside a collection file.
fn write_sfnt(out: &mut Vec<u8>, tables: &[([u8; 4], Vec<u8>)]) {
    let n = tables.len() as u16;
    let pow2 = floor_pow2(n as u32);
    w32(out, 0x0001_0000);
    w16(out, n);
    w16(out, (pow2 * 16) as u16);
    w16(out, pow2.trailing_zeros() as u16);
    w16(out, n * 16 - (pow2 * 16) as u16);

    let dir_at = out.len();
    out.resize(out.len() + tables.len() * 16, 0);
    for (i, (tag, data)) in tables.iter().enumerate() {
        while out.len() % 4 != 0 {
            out.push(0);
        }
        let offset = out.len() as u32;
        out.extend_from_slice(data);

        let entry = dir_at + i * 16;
        out[entry..entry + 4].copy_from_slice(tag);
        out[entry + 8..entry + 12].copy_from_slice(&offset.to_be_bytes());
        out[entry + 12..entry + 16].copy_from_slice(&(data.len() as u32).to_be_bytes());
    }
}

fn build_head(spec: &FaceSpec, glyphs: &[&GlyphSpec]) -> Vec<u8> {
    let rects = glyphs.iter().filter_map(|g| g.rect);
    let (mut x0, mut y0, mut x1, mut y1) = (0i16, 0i16, 0i16, 0i16);
    for (rx0, ry0, rx1, ry1) in rects {
        x0 = x0.min(rx0);
        y0 = y0.min(ry0);
        x1 = x1.max(rx1);
        y1 = y1.max(ry1);
    }

    let mut t = Vec::new();
    w32(&mut t, 0x0001_0000); // version
    w32(&mut t, 0); // fontRevision
    w32(&mut t, 0); // checkSumAdjustment
    w32(&mut t, 0x5F0F_3CF5); // magicNumber
    w16(&mut t, 0); // flags
    w16(&mut t, spec.units_per_em);
    t.extend_from_slice(&[0; 16]); // created + modified
    wi16(&mut t, x0);
    wi16(&mut t, y0);
    wi16(&mut t, x1);
    wi16(&mut t, y1);
    w16(&mut t, 0); // macStyle
    w16(&mut t, 8); // lowestRecPPEM
    wi16(&mut t, 2); // fontDirectionHint
    wi16(&mut t, 1); // indexToLocFormat: long
    wi16(&mut t, 0); // glyphDataFormat
    t
}

fn build_hhea(spec: &FaceSpec, num_glyphs: u16) -> Vec<u8> {
    let mut t = Vec::new();
    w32(&mut t, 0x0001_0000);
    wi16(&mut t, spec.ascent);
    wi16(&mut t, spec.descent);
    wi16(&mut t, spec.line_gap);
    w16(&mut t, 0); // advanceWidthMax
    wi16(&mut t, 0); // minLeftSideBearing
    wi16(&mut t, 0); // minRightSideBearing
    wi16(&mut t, 0); // xMaxExtent
    wi16(&mut t, 1); // caretSlopeRise
    wi16(&mut t, 0); // caretSlopeRun
    wi16(&mut t, 0); // caretOffset
    t.extend_from_slice(&[0; 8]); // reserved
    wi16(&mut t, 0); // metricDataFormat
    w16(&mut t, num_glyphs); // numberOfHMetrics: full metrics per glyph
    t
}

fn build_maxp(num_glyphs: u16) -> Vec<u8> {
    let mut t = Vec::new();
    w32(&mut t, 0x0001_0000);
    w16(&mut t, num_glyphs);
    t.resize(32, 0);
    t
}

fn build_hmtx(glyphs: &[&GlyphSpec]) -> Vec<u8> {
    let mut t = Vec::new();
    // Missing glyph first.
    w16(&mut t, 0);
    wi16(&mut t, 0);
    for glyph in glyphs {
        w16(&mut t, glyph.advance);
        wi16(&mut t, glyph.lsb);
    }
    t
}

/// Format 4 subtable, one segment per mapped character.
fn build_cmap(glyphs: &[&GlyphSpec]) -> Vec<u8> {
    let seg_count = glyphs.len() as u16 + 1; // plus the 0xFFFF terminator
    let pow2 = floor_pow2(seg_count as u32);
    let search_range = (pow2 * 2) as u16;

    let mut sub = Vec::new();
    w16(&mut sub, 4); // format
    w16(&mut sub, 16 + seg_count * 8); // length
    w16(&mut sub, 0); // language
    w16(&mut sub, seg_count * 2);
    w16(&mut sub, search_range);
    w16(&mut sub, pow2.trailing_zeros() as u16);
    w16(&mut sub, seg_count * 2 - search_range);
    for glyph in glyphs {
        w16(&mut sub, glyph.ch as u16); // endCode
    }
    w16(&mut sub, 0xFFFF);
    w16(&mut sub, 0); // reservedPad
    for glyph in glyphs {
        w16(&mut sub, glyph.ch as u16); // startCode
    }
    w16(&mut sub, 0xFFFF);
    for (i, glyph) in glyphs.iter().enumerate() {
        // gid = code + delta (mod 65536); gids start at 1.
        w16(&mut sub, (i as u16 + 1).wrapping_sub(glyph.ch as u16));
    }
    w16(&mut sub, 1);
    for _ in 0..seg_count {
        w16(&mut sub, 0); // idRangeOffset
    }

    let mut t = Vec::new();
    w16(&mut t, 0); // version
    w16(&mut t, 1); // numTables
    w16(&mut t, 3); // platformID: Windows
    w16(&mut t, 1); // encodingID: Unicode BMP
    w32(&mut t, 12); // subtable offset
    t.extend_from_slice(&sub);
    t
}

fn build_glyf(glyphs: &[&GlyphSpec]) -> (Vec<u8>, Vec<u8>) {
    let mut glyf = Vec::new();
    let mut loca = Vec::new();
    w32(&mut loca, 0); // missing glyph: empty
    w32(&mut loca, 0);
    for glyph in glyphs {
        if let Some(rect) = glyph.rect {
            glyf.extend_from_slice(&rect_outline(rect));
            while glyf.len() % 4 != 0 {
                glyf.push(0);
            }
        }
        w32(&mut loca, glyf.len() as u32);
    }
    (glyf, loca)
}

/// One closed rectangle contour, all points on-curve with full i16 deltas.
fn rect_outline((x0, y0, x1, y1): (i16, i16, i16, i16)) -> Vec<u8> {
    let mut g = Vec::new();
    wi16(&mut g, 1); // numberOfContours
    wi16(&mut g, x0);
    wi16(&mut g, y0);
    wi16(&mut g, x1);
    wi16(&mut g, y1);
    w16(&mut g, 3); // endPtsOfContours
    w16(&mut g, 0); // instructionLength
    g.extend_from_slice(&[0x01; 4]); // on-curve flags
    for dx in [x0, x1 - x0, 0, x0 - x1] {
        wi16(&mut g, dx);
    }
    for dy in [y0, 0, y1 - y0, 0] {
        wi16(&mut g, dy);
    }
    g
}

/// Format 0 horizontal kerning.
fn build_kern(spec: &FaceSpec, glyphs: &[&GlyphSpec]) -> Vec<u8> {
    let gid = |ch: char| -> u16 {
        glyphs
            .iter()
            .position(|g| g.ch == ch)
            .map(|i| i as u16 + 1)
            .unwrap_or(0)
    };
    let mut pairs: Vec<(u16, u16, i16)> = spec
        .kerning
        .iter()
        .map(|&(left, right, value)| (gid(left), gid(right), value))
        .collect();
    pairs.sort_by_key(|&(left, right, _)| (u32::from(left) << 16) | u32::from(right));

    let n = pairs.len() as u16;
    let pow2 = floor_pow2(n as u32);
    let mut t = Vec::new();
    w16(&mut t, 0); // table version
    w16(&mut t, 1); // nTables
    w16(&mut t, 0); // subtable version
    w16(&mut t, 14 + n * 6); // subtable length
    w16(&mut t, 0x0001); // coverage: horizontal, format 0
    w16(&mut t, n);
    w16(&mut t, (pow2 * 6) as u16);
    w16(&mut t, pow2.trailing_zeros() as u16);
    w16(&mut t, n * 6 - (pow2 * 6) as u16);
    for (left, right, value) in pairs {
        w16(&mut t, left);
        w16(&mut t, right);
        wi16(&mut t, value);
    }
    t
}

/// Largest power of two at most `n`; the binary-search hints the sfnt and
/// cmap headers carry. `n` is never zero here.
fn floor_pow2(n: u32) -> u32 {
    1 << (31 - n.leading_zeros())
}

fn w16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn wi16(out: &mut Vec<u8>, v: i16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn w32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_be_bytes());
}
