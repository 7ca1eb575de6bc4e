//! Drives the `Engine` from the parsed/expanded AST.
//!
//! Spec.md §1 explicitly scopes "all input parsing" out of the core; this
//! module is the demo client that walks a document and issues the H-mode
//! operations spec.md §6 names, grounded on
//! `examples/BigRathna-latex_rs/src/layout.rs`'s `flatten_ast` — same
//! walk-the-AST shape (inject a join between successive siblings), but
//! emitting `Engine` calls instead of building a bespoke `HBox`/`Page` list.

use std::rc::Rc;

use crate::ast::{Node, TextStyle};
use crate::engine::Engine;
use crate::text::FontProvider;

/// The three font faces the kept front-end's `\textbf`/`\emph` macros
/// (expanded to `TextStyle::Bold`/`Italic` by `expand.rs`) can select.
pub struct Fonts {
    pub normal: Rc<dyn FontProvider>,
    pub bold: Rc<dyn FontProvider>,
    pub italic: Rc<dyn FontProvider>,
}

impl Fonts {
    fn for_style(&self, style: &TextStyle) -> &Rc<dyn FontProvider> {
        match style {
            TextStyle::Normal => &self.normal,
            TextStyle::Bold => &self.bold,
            TextStyle::Italic => &self.italic,
        }
    }
}

/// Feed the whole document into `engine` as a single paragraph and close it
/// (the kept front-end has no `\par`-equivalent macro, so every document is
/// one H-mode run terminated by one `end_paragraph`).
pub fn drive(engine: &mut Engine, fonts: &Fonts, size: f64, ast: &Node) {
    let mut first = true;
    walk(engine, fonts, size, ast, &mut first);
    let _ = engine.end_paragraph();
}

fn walk(engine: &mut Engine, fonts: &Fonts, size: f64, node: &Node, first: &mut bool) {
    match node {
        Node::Text(s) => emit(engine, &fonts.normal.clone(), size, s, first),
        Node::StyledText(s, style) => {
            let font = fonts.for_style(style).clone();
            emit(engine, &font, size, s, first);
        }
        Node::Seq(children) => {
            for child in children {
                walk(engine, fonts, size, child, first);
            }
        }
        Node::Macro { args, .. } => {
            for arg in args {
                walk(engine, fonts, size, arg, first);
            }
        }
    }
}

/// Push `text` in `font`, first re-inserting the inter-sibling space the
/// lexer discarded (`lexer.rs`'s `Text` token is a run of non-whitespace,
/// so consecutive word siblings in the AST carry no whitespace of their
/// own) so the H-mode composer's space/xspace glue selection (spec.md
/// §4.3) still runs at the join.
fn emit(engine: &mut Engine, font: &Rc<dyn FontProvider>, size: f64, text: &str, first: &mut bool) {
    if text.is_empty() {
        return;
    }
    if !*first {
        engine.h_add_text(font, size, " ");
    }
    engine.h_add_text(font, size, text);
    *first = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use crate::error::EngineError;
    use crate::glue::{Glue, GlueAmount};
    use crate::sink::{Color, PageSink};
    use crate::text::{FontGeometry, FontHandle, GlyphInfo, GlyphSeq};

    struct FakeFont {
        geom: FontGeometry,
    }

    impl FontProvider for FakeFont {
        fn handle(&self) -> FontHandle {
            FontHandle("fake".into())
        }
        fn geometry(&self) -> &FontGeometry {
            &self.geom
        }
        fn layout(&self, text: &str, _size: f64) -> GlyphSeq {
            text.chars()
                .map(|_| GlyphInfo {
                    gid: 1,
                    advance: 500.0,
                    x_offset: 0.0,
                    y_offset: 0.0,
                })
                .collect()
        }
    }

    fn fake_font() -> Rc<dyn FontProvider> {
        Rc::new(FakeFont {
            geom: FontGeometry {
                units_per_em: 1000.0,
                ascent: 750.0,
                descent: 250.0,
                baseline_skip: 1200.0,
                glyph_extents: None,
            },
        })
    }

    fn fonts() -> Fonts {
        Fonts {
            normal: fake_font(),
            bold: fake_font(),
            italic: fake_font(),
        }
    }

    fn engine_config() -> EngineConfig {
        let mut config = EngineConfig::defaults(10.0, 7.5, 1000.0, 500.0);
        config.par_fill_skip = Some(Glue::new(0.0, GlueAmount::new(1.0, 1), GlueAmount::ZERO));
        config
    }

    /// A `PageSink` that records nothing but that every call succeeded, so
    /// tests can assert a document drove at least one page without needing
    /// a real font or PDF writer.
    struct CountingSink {
        pages: usize,
        glyphs_shown: usize,
    }
    impl PageSink for CountingSink {
        fn begin_text(&mut self) -> Result<(), EngineError> {
            Ok(())
        }
        fn set_font(&mut self, _f: &FontHandle, _s: f64) -> Result<(), EngineError> {
            Ok(())
        }
        fn set_fill_color(&mut self, _c: Color) -> Result<(), EngineError> {
            Ok(())
        }
        fn move_text_origin(&mut self, _x: f64, _y: f64) -> Result<(), EngineError> {
            Ok(())
        }
        fn show_glyphs(&mut self, t: &str) -> Result<(), EngineError> {
            self.glyphs_shown += t.chars().count();
            Ok(())
        }
        fn end_text(&mut self) -> Result<(), EngineError> {
            Ok(())
        }
        fn rectangle(&mut self, _x: f64, _y: f64, _w: f64, _h: f64) -> Result<(), EngineError> {
            Ok(())
        }
        fn fill(&mut self) -> Result<(), EngineError> {
            Ok(())
        }
        fn stroke(&mut self) -> Result<(), EngineError> {
            Ok(())
        }
        fn move_to(&mut self, _x: f64, _y: f64) -> Result<(), EngineError> {
            Ok(())
        }
        fn line_to(&mut self, _x: f64, _y: f64) -> Result<(), EngineError> {
            Ok(())
        }
        fn curve_to(
            &mut self,
            _x1: f64,
            _y1: f64,
            _x2: f64,
            _y2: f64,
            _x3: f64,
            _y3: f64,
        ) -> Result<(), EngineError> {
            Ok(())
        }
        fn push_graphics_state(&mut self) -> Result<(), EngineError> {
            Ok(())
        }
        fn pop_graphics_state(&mut self) -> Result<(), EngineError> {
            Ok(())
        }
        fn set_line_width(&mut self, _w: f64) -> Result<(), EngineError> {
            Ok(())
        }
        fn set_stroke_color(&mut self, _c: Color) -> Result<(), EngineError> {
            Ok(())
        }
        fn append_page(&mut self, _w: f64, _h: f64) -> Result<(), EngineError> {
            self.pages += 1;
            Ok(())
        }
    }

    #[test]
    fn joins_sibling_words_with_a_space() {
        let mut engine = Engine::new(engine_config());
        let ast = Node::Seq(vec![Node::text("Hello"), Node::text("world")]);
        drive(&mut engine, &fonts(), 10.0, &ast);

        let mut sink = CountingSink {
            pages: 0,
            glyphs_shown: 0,
        };
        engine.append_pages(&mut sink, true).unwrap();
        assert_eq!(sink.pages, 1);
        // The re-inserted join space becomes glue, not a shown glyph, so
        // only the two words' characters are counted.
        assert_eq!(sink.glyphs_shown, "Hello".len() + "world".len());
    }

    #[test]
    fn styled_text_uses_its_own_font_without_erroring() {
        let mut engine = Engine::new(engine_config());
        let ast = Node::Seq(vec![
            Node::StyledText("Bold".into(), TextStyle::Bold),
            Node::text("plain"),
        ]);
        drive(&mut engine, &fonts(), 10.0, &ast);

        let mut sink = CountingSink {
            pages: 0,
            glyphs_shown: 0,
        };
        engine.append_pages(&mut sink, true).unwrap();
        assert_eq!(sink.pages, 1);
        assert_eq!(sink.glyphs_shown, "Bold".len() + "plain".len());
    }

    #[test]
    fn empty_document_produces_no_page() {
        let mut engine = Engine::new(engine_config());
        drive(&mut engine, &fonts(), 10.0, &Node::Seq(vec![]));
        let mut sink = CountingSink {
            pages: 0,
            glyphs_shown: 0,
        };
        engine.append_pages(&mut sink, true).unwrap();
        assert_eq!(sink.pages, 0);
    }
}
