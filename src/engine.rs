//! The top-level `Engine`: owns the H-list/V-list and exposes the
//! operations spec.md §6 names (`h_add_*`, `end_paragraph`, `v_add_*`,
//! `append_pages`).
//!
//! Grounded on `examples/original_source/engine.go`'s `Engine` struct
//! (field names carried over almost verbatim) together with
//! `linebreak.go`'s `EndParagraph` and `pagebreak.go`'s `AppendPage`, which
//! this module stitches together rather than re-deriving.

use std::rc::Rc;

use crate::error::EngineError;
use crate::glue::Glue;
use crate::hmode::HModeComposer;
use crate::knuth::BreakerParams;
use crate::linebreak::{self, LinePenalties, ParagraphSkips};
use crate::pagebreak;
use crate::sink::PageSink;
use crate::text::FontProvider;
use crate::vmode::{BoxRecord, VModeComposer};

/// Page and paragraph geometry plus the named glue roles of spec.md §6.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Physical page size, for the `PageSink::append_page` call.
    pub page_width: f64,
    pub page_height: f64,
    /// Distance from the page edge to the text area's left/bottom edge.
    pub margin_x: f64,
    pub margin_y: f64,

    pub text_width: f64,
    pub text_height: f64,

    pub left_skip: Option<Glue>,
    pub right_skip: Option<Glue>,
    pub par_fill_skip: Option<Glue>,
    pub par_indent: Option<Glue>,
    pub par_skip: Option<Glue>,

    pub top_skip: f64,
    pub bottom_glue: Glue,
    pub base_line_skip: f64,

    pub inter_line_penalty: f64,
    pub club_penalty: f64,
    pub widow_penalty: f64,

    pub breaker_params: BreakerParams,

    /// `append_pages(sink, final: false)` ships pages while the V-list's
    /// natural height exceeds `ship_threshold_factor * text_height`
    /// (spec.md §6 default: 2.0).
    pub ship_threshold_factor: f64,
}

impl EngineConfig {
    /// Defaults named in spec.md §6: `BaseLineSkip = 1.2 × font_size`,
    /// `TopSkip = font_ascent`, all penalties 0. Callers still need to set
    /// `text_width`/`text_height` and the margin/page-size fields for their
    /// own page geometry; everything else is a sensible starting point for
    /// a single-font document at `font_size`.
    pub fn defaults(font_size: f64, font_ascent: f64, text_width: f64, text_height: f64) -> Self {
        EngineConfig {
            page_width: text_width,
            page_height: text_height,
            margin_x: 0.0,
            margin_y: 0.0,
            text_width,
            text_height,
            left_skip: None,
            right_skip: None,
            par_fill_skip: None,
            par_indent: None,
            par_skip: None,
            top_skip: font_ascent,
            bottom_glue: Glue::ZERO,
            base_line_skip: 1.2 * font_size,
            inter_line_penalty: 0.0,
            club_penalty: 0.0,
            widow_penalty: 0.0,
            breaker_params: BreakerParams::default(),
            ship_threshold_factor: 2.0,
        }
    }
}

/// Owns the H-list and V-list and drives the composers/breakers described
/// in spec.md §4 (single-threaded, cooperative — spec.md §5).
pub struct Engine {
    config: EngineConfig,
    hmode: HModeComposer,
    vmode: VModeComposer,
    page_number: usize,
    /// Called after each page is drawn, before the sink moves to the next
    /// one (spec.md §2 "Observer/record hook" row; `original_source/
    /// engine.go`'s `AfterPageFunc`). Not named by spec.md's `append_pages`
    /// operation itself, but cheap and purely additive — useful for
    /// stamping running page numbers or a post-draw sanity check.
    after_page_fn: Option<Box<dyn FnMut(usize) -> Result<(), EngineError>>>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let vmode = VModeComposer::new(config.base_line_skip);
        Engine {
            config,
            hmode: HModeComposer::new(),
            vmode,
            page_number: 0,
            after_page_fn: None,
        }
    }

    /// Install a callback run after each page is shipped, receiving the
    /// 1-based page number just drawn.
    pub fn set_after_page_fn(
        &mut self,
        f: impl FnMut(usize) -> Result<(), EngineError> + 'static,
    ) {
        self.after_page_fn = Some(Box::new(f));
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn page_number(&self) -> usize {
        self.page_number
    }

    /// Ingest `text` shaped by `font` at `size` (spec.md §6 `h_add_text`).
    /// If this is the first item of a fresh paragraph and `ParIndent` is
    /// configured, the indent glue is pushed first.
    pub fn h_add_text(&mut self, font: &Rc<dyn FontProvider>, size: f64, text: &str) {
        if self.hmode.is_empty() {
            if let Some(indent) = self.config.par_indent {
                self.hmode.push_par_indent(indent);
            }
        }
        self.hmode.add_text(font, size, text);
    }

    pub fn h_add_glue(&mut self, g: Glue) {
        self.hmode.add_glue(g);
    }

    pub fn h_add_penalty(&mut self, cost: f64, flagged: bool) {
        self.hmode.add_penalty(cost, flagged);
    }

    /// Run the line-breaker over the accumulated H-list and transfer the
    /// resulting lines into the V-list with inter-line/club/widow
    /// penalties (spec.md §6 `end_paragraph`, §4.4).
    ///
    /// A no-op if no H-mode material has been accumulated (matches
    /// `EndParagraph` being safely callable between paragraphs).
    pub fn end_paragraph(&mut self) -> Result<(), EngineError> {
        if self.hmode.is_empty() {
            return Ok(());
        }
        let h_list = self.hmode.take();

        if !self.vmode.is_empty() {
            if let Some(par_skip) = self.config.par_skip {
                self.vmode.add_glue(par_skip)?;
            }
        }

        let skips = ParagraphSkips {
            left_skip: self.config.left_skip,
            right_skip: self.config.right_skip,
            par_fill_skip: self.config.par_fill_skip,
        };
        let penalties = LinePenalties {
            inter_line: self.config.inter_line_penalty,
            club: self.config.club_penalty,
            widow: self.config.widow_penalty,
        };

        let lines = linebreak::end_paragraph(
            h_list,
            self.config.text_width,
            &skips,
            &penalties,
            &self.config.breaker_params,
        )?;

        for line in lines {
            if let Some(p) = line.penalty_before {
                self.vmode.add_penalty(p);
            }
            self.vmode.add_box(Box::new(line.hbox));
        }
        Ok(())
    }

    pub fn v_add_box(&mut self, b: Box<dyn crate::boxes::LayoutBox>) {
        self.vmode.add_box(b);
    }

    pub fn v_add_glue(&mut self, g: Glue) -> Result<(), EngineError> {
        self.vmode.add_glue(g)
    }

    pub fn v_add_penalty(&mut self, cost: f64) {
        self.vmode.add_penalty(cost);
    }

    pub fn v_record_next_box(&mut self, cb: impl FnMut(BoxRecord) + 'static) {
        self.vmode.record_next_box(cb);
    }

    /// Ship pages to `sink` (spec.md §6 `append_pages`). When `final` is
    /// `false`, ships only while the V-list's natural height exceeds
    /// `ship_threshold_factor * text_height`, leaving enough material
    /// behind for widow/orphan control on later lines. When `final` is
    /// `true`, drains the V-list completely.
    pub fn append_pages(&mut self, sink: &mut dyn PageSink, final_flush: bool) -> Result<(), EngineError> {
        let threshold = self.config.ship_threshold_factor * self.config.text_height;
        loop {
            if !final_flush && self.vmode.natural_height() <= threshold {
                break;
            }
            let page = pagebreak::make_page(
                &mut self.vmode,
                self.config.top_skip,
                self.config.bottom_glue,
                self.config.text_height,
            )?;
            let vbox = match page {
                Some(vbox) => vbox,
                None => break,
            };

            self.page_number += 1;
            self.vmode.set_current_page(self.page_number);

            sink.append_page(self.config.page_width, self.config.page_height)?;
            vbox.draw(sink, self.config.margin_x, self.config.margin_y)?;

            if let Some(cb) = self.after_page_fn.as_mut() {
                cb(self.page_number)?;
            }
        }
        Ok(())
    }
}
