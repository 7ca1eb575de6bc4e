//! A [`FontProvider`] backed by `ttf-parser`.
//!
//! Grounded on `examples/original_source/text.go`'s
//! `FontInfo`/`Font.GetGeometry`. `ttf-parser` borrows from a byte slice
//! rather than owning it, so the face is re-parsed from the stored bytes on
//! each `layout()` call instead of holding a `Face<'a>` across calls — this
//! keeps `TtfFontProvider` free of a self-referential lifetime at the cost
//! of a cheap re-parse per paragraph-sized run.

use ttf_parser::{Face, GlyphId};

use crate::error::EngineError;
use crate::text::{FontGeometry, FontHandle, FontProvider, GlyphBBox, GlyphInfo, GlyphSeq};

pub struct TtfFontProvider {
    data: Vec<u8>,
    handle: FontHandle,
    geometry: FontGeometry,
}

impl TtfFontProvider {
    /// Parse `data` (a whole TTF/OTF file) and precompute the geometry
    /// record a `FontProvider` needs: units-per-em, ascent, descent, and a
    /// per-glyph bounding-box table (absent glyphs fall back to
    /// ascent/descent in `TextBox::extent`).
    pub fn load(handle: impl Into<String>, data: Vec<u8>) -> Result<Self, EngineError> {
        let face = Face::parse(&data, 0)
            .map_err(|e| EngineError::SinkFailure(format!("invalid font data: {e}")))?;

        let units_per_em = face.units_per_em() as f64;
        let ascent = face.ascender() as f64;
        let descent = -(face.descender() as f64);
        let baseline_skip = ascent + descent + face.line_gap() as f64;

        let glyph_extents = (0..face.number_of_glyphs())
            .map(|gid| {
                face.glyph_bounding_box(GlyphId(gid))
                    .map(|bbox| GlyphBBox {
                        llx: bbox.x_min as f64,
                        lly: bbox.y_min as f64,
                        urx: bbox.x_max as f64,
                        ury: bbox.y_max as f64,
                    })
                    .unwrap_or(GlyphBBox {
                        llx: 0.0,
                        lly: 0.0,
                        urx: 0.0,
                        ury: 0.0,
                    })
            })
            .collect();

        Ok(TtfFontProvider {
            data,
            handle: FontHandle(handle.into()),
            geometry: FontGeometry {
                units_per_em,
                ascent,
                descent,
                baseline_skip,
                glyph_extents: Some(glyph_extents),
            },
        })
    }

    fn face(&self) -> Face<'_> {
        Face::parse(&self.data, 0).expect("re-parsing bytes already validated at load() time")
    }

    /// The raw font file bytes this provider was loaded from, so a caller
    /// can hand the same bytes to a `PageSink::register_font`-style call
    /// without keeping a second copy around.
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }
}

impl FontProvider for TtfFontProvider {
    fn handle(&self) -> FontHandle {
        self.handle.clone()
    }

    fn geometry(&self) -> &FontGeometry {
        &self.geometry
    }

    /// Shapes `text` glyph-by-glyph with no kerning or ligature
    /// substitution (bidi/complex-script shaping is out of scope). Advances
    /// are returned in font design units; the caller scales by
    /// `size / units_per_em`.
    fn layout(&self, text: &str, _size: f64) -> GlyphSeq {
        let face = self.face();
        text.chars()
            .map(|c| {
                let gid = face.glyph_index(c).unwrap_or(GlyphId(0));
                let advance = face.glyph_hor_advance(gid).unwrap_or(0) as f64;
                GlyphInfo {
                    gid: gid.0,
                    advance,
                    x_offset: 0.0,
                    y_offset: 0.0,
                }
            })
            .collect()
    }
}
