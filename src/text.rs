//! Text boxes and the font-provider interface.
//!
//! `FontProvider` is the external collaborator: given a string and a size,
//! it returns a sequence of positioned glyphs with per-glyph advance widths
//! and a font geometry record. The core never parses font files itself;
//! `adapters::ttf_font` ships one concrete provider on top of `ttf-parser`.

use std::rc::Rc;

use crate::boxes::{BoxExtent, LayoutBox};
use crate::error::EngineError;
use crate::sink::{Color, PageSink};

/// Opaque identifier a `PageSink` uses to look up its own font resource.
/// The core never inspects the string; it is round-tripped from whatever
/// the `FontProvider` was constructed with (a file path, a PostScript name,
/// …).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontHandle(pub String);

/// A positioned, shaped glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphInfo {
    pub gid: u16,
    pub advance: f64,
    pub x_offset: f64,
    pub y_offset: f64,
}

pub type GlyphSeq = Vec<GlyphInfo>;

/// A glyph's ink bounding box in font units, or absent (falls back to
/// ascent/descent).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphBBox {
    pub llx: f64,
    pub lly: f64,
    pub urx: f64,
    pub ury: f64,
}

impl GlyphBBox {
    pub fn is_zero(&self) -> bool {
        self.llx == 0.0 && self.lly == 0.0 && self.urx == 0.0 && self.ury == 0.0
    }
}

/// Font-wide geometry, in font design units.
#[derive(Debug, Clone)]
pub struct FontGeometry {
    pub units_per_em: f64,
    pub ascent: f64,
    pub descent: f64,
    pub baseline_skip: f64,
    /// Per-GID bounding boxes, indexed by `gid`. Absent (`None`) means "no
    /// bbox table available", and the extent computation falls back to
    /// ascent/descent for every glyph; when the table is present, a glyph
    /// with a zero bbox ("no ink", e.g. space) is skipped entirely and
    /// contributes no height/depth of its own, matching
    /// `original_source/text.go`'s `TextBox.Extent`.
    pub glyph_extents: Option<Vec<GlyphBBox>>,
}

impl FontGeometry {
    fn glyph_bbox(&self, gid: u16) -> Option<&GlyphBBox> {
        self.glyph_extents
            .as_ref()
            .and_then(|v| v.get(gid as usize))
    }
}

/// The font-provider interface consumed by the core.
pub trait FontProvider {
    fn handle(&self) -> FontHandle;
    fn geometry(&self) -> &FontGeometry;
    /// Shape `text` at `size` (in the same units as the geometry's
    /// `units_per_em`-relative advances, scaled by the caller) into
    /// positioned glyphs. No reordering/substitution beyond what the
    /// concrete provider implements — bidi/complex-script shaping is out
    /// of scope.
    fn layout(&self, text: &str, size: f64) -> GlyphSeq;
}

/// A styled run of text, laid out by a `FontProvider`.
///
/// Holds a shared handle to its font rather than borrowing one: a document
/// tree routinely holds many `TextBox`es outliving any single stack frame,
/// and `Rc` is how the rest of the box tree (`Box<dyn LayoutBox>`) is
/// already owned.
pub struct TextBox {
    pub font: Rc<dyn FontProvider>,
    pub size: f64,
    pub glyphs: GlyphSeq,
    pub text: String,
    pub color: Option<Color>,
}

impl TextBox {
    pub fn new(font: Rc<dyn FontProvider>, size: f64, text: &str) -> Self {
        let glyphs = font.layout(text, size);
        TextBox {
            font,
            size,
            glyphs,
            text: text.to_string(),
            color: None,
        }
    }

    /// Sum of advance widths, in user-space units ("pt"), scaled from font
    /// design units by `size / units_per_em`.
    pub fn advance_width(&self) -> f64 {
        let q = self.size / self.font.geometry().units_per_em;
        self.glyphs.iter().map(|g| g.advance * q).sum()
    }
}

impl LayoutBox for TextBox {
    fn extent(&self) -> BoxExtent {
        let geom = self.font.geometry();
        let q = self.size / geom.units_per_em;

        let mut width = 0.0;
        let mut height = f64::NEG_INFINITY;
        let mut depth = f64::NEG_INFINITY;
        for g in &self.glyphs {
            width += g.advance * q;

            let mut this_depth = geom.descent * q;
            let mut this_height = geom.ascent * q;
            if let Some(bbox) = geom.glyph_bbox(g.gid) {
                if bbox.is_zero() {
                    continue;
                }
                this_depth = -(bbox.lly + g.y_offset) * q;
                this_height = (bbox.ury + g.y_offset) * q;
            }
            if this_depth > depth {
                depth = this_depth;
            }
            if this_height > height {
                height = this_height;
            }
        }
        if height.is_infinite() {
            height = 0.0;
        }
        if depth.is_infinite() {
            depth = 0.0;
        }

        BoxExtent {
            width,
            height,
            depth,
            white_space_only: false,
        }
    }

    fn draw(&self, sink: &mut dyn PageSink, x: f64, y: f64) -> Result<(), EngineError> {
        let ext = self.extent();
        if ext.height + ext.depth <= 0.0 {
            #[cfg(feature = "logging")]
            log::trace!("skipping empty-extent text box {:?}", self.text);
            return Ok(());
        }
        sink.begin_text()?;
        sink.set_font(&self.font.handle(), self.size)?;
        sink.set_fill_color(self.color.unwrap_or(Color::BLACK))?;
        sink.move_text_origin(x, y)?;
        sink.show_glyphs(&self.text)?;
        sink.end_text()?;
        Ok(())
    }
}
