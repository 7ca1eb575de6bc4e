//! The page sink: a drawing surface the engine draws into.
//!
//! Spec.md §6 names this as an external collaborator consumed by the core —
//! "a drawing surface offering stroke/fill/path/text primitives and a
//! page-append operation. The core calls into it but specifies no wire
//! format." `PageSink` is that interface; `adapters::pdf_sink` ships one
//! concrete implementation on top of `printpdf`.

use crate::error::EngineError;
use crate::text::FontHandle;

/// RGB color in `[0, 1]` per channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
}

/// A drawing surface. Every call may fail (`SinkFailure`, spec.md §7); the
/// engine propagates the error upward without partial state — callers may
/// retry after addressing the sink.
pub trait PageSink {
    fn begin_text(&mut self) -> Result<(), EngineError>;
    fn set_font(&mut self, font: &FontHandle, size: f64) -> Result<(), EngineError>;
    fn set_fill_color(&mut self, color: Color) -> Result<(), EngineError>;
    fn move_text_origin(&mut self, x: f64, y: f64) -> Result<(), EngineError>;
    fn show_glyphs(&mut self, text: &str) -> Result<(), EngineError>;
    fn end_text(&mut self) -> Result<(), EngineError>;

    fn rectangle(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<(), EngineError>;
    fn fill(&mut self) -> Result<(), EngineError>;
    fn stroke(&mut self) -> Result<(), EngineError>;
    fn move_to(&mut self, x: f64, y: f64) -> Result<(), EngineError>;
    fn line_to(&mut self, x: f64, y: f64) -> Result<(), EngineError>;
    fn curve_to(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
    ) -> Result<(), EngineError>;

    fn push_graphics_state(&mut self) -> Result<(), EngineError>;
    fn pop_graphics_state(&mut self) -> Result<(), EngineError>;
    fn set_line_width(&mut self, width: f64) -> Result<(), EngineError>;
    fn set_stroke_color(&mut self, color: Color) -> Result<(), EngineError>;

    /// Finish the current page and start a new one. Implementations choose
    /// their own page-dictionary representation; the core never inspects it.
    fn append_page(&mut self, width: f64, height: f64) -> Result<(), EngineError>;
}
