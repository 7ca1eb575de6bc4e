//! Concrete implementations of the core's two external collaborators:
//! a [`FontProvider`](crate::text::FontProvider) on top of
//! `ttf-parser`, and a [`PageSink`](crate::sink::PageSink) on top of
//! `printpdf`. Neither is imported by the core itself — `engine.rs` and
//! below only know the traits — so a caller can swap either adapter out
//! without touching the layout engine.

pub mod pdf_sink;
pub mod ttf_font;

pub use pdf_sink::PdfPageSink;
pub use ttf_font::TtfFontProvider;
