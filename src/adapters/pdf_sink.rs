//! A [`PageSink`] backed by `printpdf`.
//!
//! This adapter is the only place in the crate that imports `printpdf`;
//! everything upstream of it only knows the `PageSink` trait.

use std::collections::HashMap;

use printpdf::{IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use crate::error::EngineError;
use crate::sink::{Color, PageSink};
use crate::text::FontHandle;

const PT_PER_MM: f64 = 72.0 / 25.4;

fn pt_to_mm(pt: f64) -> Mm {
    Mm(pt / PT_PER_MM)
}

pub struct PdfPageSink {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    /// `printpdf` always creates page 1 at document construction; the
    /// first `append_page` call reuses it rather than adding a second,
    /// otherwise shipped documents would carry a leading blank page.
    first_page_used: bool,
    page_count: usize,
    fonts: HashMap<FontHandle, IndirectFontRef>,

    cur_font: Option<FontHandle>,
    cur_size: f64,
    cur_fill: Color,
    cur_stroke: Color,
    cur_line_width: f64,
    text_origin: (f64, f64),
    path: Vec<(f64, f64)>,
}

impl PdfPageSink {
    /// `title` becomes the PDF document title; `page_width`/`page_height`
    /// (in user-space "pt") size the first page, matching whatever
    /// `EngineConfig::page_width`/`page_height` the caller is about to
    /// drive the engine with.
    pub fn new(title: impl Into<String>, page_width: f64, page_height: f64) -> Self {
        let (doc, page, layer) =
            PdfDocument::new(title, pt_to_mm(page_width), pt_to_mm(page_height), "Layer 1");
        let layer_ref = doc.get_page(page).get_layer(layer);
        PdfPageSink {
            doc,
            layer: layer_ref,
            first_page_used: false,
            page_count: 1,
            fonts: HashMap::new(),
            cur_font: None,
            cur_size: 0.0,
            cur_fill: Color::BLACK,
            cur_stroke: Color::BLACK,
            cur_line_width: 1.0,
            text_origin: (0.0, 0.0),
            path: Vec::new(),
        }
    }

    /// Embed `ttf_bytes` under `handle` so later `set_font(handle, ...)`
    /// calls resolve to a real PDF font resource. Must be called once per
    /// font before the engine draws any text using that handle.
    pub fn register_font(&mut self, handle: FontHandle, ttf_bytes: &[u8]) -> Result<(), EngineError> {
        let font_ref = self
            .doc
            .add_external_font(ttf_bytes)
            .map_err(|e| EngineError::SinkFailure(format!("failed to embed font: {e}")))?;
        self.fonts.insert(handle, font_ref);
        Ok(())
    }

    /// Serialize the accumulated document to PDF bytes. Callers invoke this
    /// once after the final `append_pages(sink, true)`.
    pub fn finish(self) -> Result<Vec<u8>, EngineError> {
        let mut buffer = Vec::new();
        self.doc
            .save(&mut std::io::BufWriter::new(&mut buffer))
            .map_err(|e| EngineError::SinkFailure(format!("failed to serialize PDF: {e}")))?;
        Ok(buffer)
    }

    fn to_pdf_color(c: Color) -> printpdf::Color {
        printpdf::Color::Rgb(printpdf::Rgb::new(c.r, c.g, c.b, None))
    }
}

impl PageSink for PdfPageSink {
    fn begin_text(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    fn set_font(&mut self, font: &FontHandle, size: f64) -> Result<(), EngineError> {
        if !self.fonts.contains_key(font) {
            return Err(EngineError::SinkFailure(format!(
                "font handle {:?} was never registered",
                font.0
            )));
        }
        self.cur_font = Some(font.clone());
        self.cur_size = size;
        Ok(())
    }

    fn set_fill_color(&mut self, color: Color) -> Result<(), EngineError> {
        self.cur_fill = color;
        Ok(())
    }

    fn move_text_origin(&mut self, x: f64, y: f64) -> Result<(), EngineError> {
        self.text_origin = (x, y);
        Ok(())
    }

    fn show_glyphs(&mut self, text: &str) -> Result<(), EngineError> {
        let handle = self
            .cur_font
            .clone()
            .ok_or_else(|| EngineError::SinkFailure("show_glyphs with no font set".into()))?;
        let font_ref = self.fonts.get(&handle).expect("checked in set_font").clone();
        let layer = self.layer.clone();
        layer.set_fill_color(Self::to_pdf_color(self.cur_fill));
        layer.use_text(
            text,
            self.cur_size,
            pt_to_mm(self.text_origin.0),
            pt_to_mm(self.text_origin.1),
            &font_ref,
        );
        Ok(())
    }

    fn end_text(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    fn rectangle(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<(), EngineError> {
        self.path = vec![(x, y), (x + w, y), (x + w, y + h), (x, y + h)];
        Ok(())
    }

    fn fill(&mut self) -> Result<(), EngineError> {
        self.emit_path(true, false)
    }

    fn stroke(&mut self) -> Result<(), EngineError> {
        self.emit_path(false, true)
    }

    fn move_to(&mut self, x: f64, y: f64) -> Result<(), EngineError> {
        self.path.clear();
        self.path.push((x, y));
        Ok(())
    }

    fn line_to(&mut self, x: f64, y: f64) -> Result<(), EngineError> {
        self.path.push((x, y));
        Ok(())
    }

    fn curve_to(
        &mut self,
        _x1: f64,
        _y1: f64,
        _x2: f64,
        _y2: f64,
        x3: f64,
        y3: f64,
    ) -> Result<(), EngineError> {
        // printpdf's `Line` is a polyline; a cubic Bezier is approximated
        // by its endpoint. Acceptable for the straight rules/underlines
        // the core itself draws (`Rule`); a caller needing true curves
        // should bypass this adapter's path helpers.
        self.path.push((x3, y3));
        Ok(())
    }

    fn push_graphics_state(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    fn pop_graphics_state(&mut self) -> Result<(), EngineError> {
        Ok(())
    }

    fn set_line_width(&mut self, width: f64) -> Result<(), EngineError> {
        self.cur_line_width = width;
        Ok(())
    }

    fn set_stroke_color(&mut self, color: Color) -> Result<(), EngineError> {
        self.cur_stroke = color;
        Ok(())
    }

    /// Starts a new page. The first call after construction reuses the
    /// page `new()` already created (matching its requested dimensions);
    /// every subsequent call adds a genuinely new page.
    fn append_page(&mut self, width: f64, height: f64) -> Result<(), EngineError> {
        if !self.first_page_used {
            self.first_page_used = true;
            return Ok(());
        }
        let (w, h) = (pt_to_mm(width), pt_to_mm(height));
        let (page, layer) = self.doc.add_page(w, h, format!("Layer {}", self.page_count + 1));
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.page_count += 1;
        Ok(())
    }
}

impl PdfPageSink {
    fn emit_path(&mut self, has_fill: bool, has_stroke: bool) -> Result<(), EngineError> {
        if self.path.len() < 2 {
            return Ok(());
        }
        let points: Vec<(printpdf::Point, bool)> = self
            .path
            .iter()
            .map(|&(x, y)| (printpdf::Point::new(pt_to_mm(x), pt_to_mm(y)), false))
            .collect();
        let layer = self.layer.clone();
        if has_fill {
            layer.set_fill_color(Self::to_pdf_color(self.cur_fill));
        }
        if has_stroke {
            layer.set_outline_color(Self::to_pdf_color(self.cur_stroke));
            layer.set_outline_thickness(self.cur_line_width);
        }
        layer.add_line(printpdf::Line {
            points,
            is_closed: has_fill,
        });
        self.path.clear();
        Ok(())
    }
}
