//! H-mode composer: ingests text and explicit items into an H-mode list
//! (spec.md §4.3).
//!
//! Grounded on `examples/original_source/engine.go`'s `HAddText` (space/
//! xspace glue selection, zero-width-space handling, `AfterSpace`/
//! `AfterPunct` flags) and `hmode.go`'s `TokenizeParagraph`. Run splitting
//! walks grapheme clusters via `unicode-segmentation` rather than raw
//! `char`s, so a combining-mark sequence is never torn across a word/space
//! boundary.

use std::rc::Rc;

use unicode_segmentation::UnicodeSegmentation;

use crate::boxes::LayoutBox;
use crate::glue::{Glue, GlueAmount};
use crate::text::{FontProvider, TextBox};

/// One element of an H-mode list (spec.md §3 "H-mode item").
///
/// `Box` wraps a plain [`LayoutBox`] produced by the composer (currently
/// always a [`TextBox`], but the variant is not specialised to that so a
/// future caller can push any box via a lower-level API). Width for
/// breakpoint search is read straight off `extent()` rather than cached
/// separately, since extent is a pure function of the box (spec.md §3
/// invariant).
pub enum HModeItem {
    Box(Box<dyn LayoutBox>),
    Glue(Glue),
    Penalty { cost: f64, flagged: bool, width: f64 },
}

/// Accumulates text and explicit glue/penalty items into an H-mode list,
/// tracking the two one-bit state flags spec.md §4.3 names: `afterSpace`
/// (to collapse consecutive space runs into one glue) and `afterPunct` (to
/// select xspace glue after end-of-sentence punctuation).
pub struct HModeComposer {
    items: Vec<HModeItem>,
    after_space: bool,
    after_punct: bool,
}

impl HModeComposer {
    pub fn new() -> Self {
        HModeComposer {
            items: Vec::new(),
            after_space: true,
            after_punct: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drain the accumulated list, resetting the composer's state flags for
    /// the next paragraph.
    pub fn take(&mut self) -> Vec<HModeItem> {
        self.after_space = true;
        self.after_punct = false;
        std::mem::take(&mut self.items)
    }

    pub fn add_glue(&mut self, g: Glue) {
        self.items.push(HModeItem::Glue(g));
        self.after_space = false;
        self.after_punct = false;
    }

    pub fn add_penalty(&mut self, cost: f64, flagged: bool) {
        self.items.push(HModeItem::Penalty {
            cost,
            flagged,
            width: 0.0,
        });
    }

    /// Push the paragraph's optional leading `ParIndent` glue (spec.md
    /// §4.3 invariant) without touching `afterSpace`/`afterPunct`: an
    /// indent is not inter-word spacing, so it must not suppress the glue
    /// before the paragraph's first real word.
    pub(crate) fn push_par_indent(&mut self, g: Glue) {
        self.items.push(HModeItem::Glue(g));
    }

    /// Segment `text` into word runs and breaking-whitespace runs, emitting
    /// a Text box per word run and a glue item per space run (spec.md
    /// §4.3). U+200B ZERO WIDTH SPACE becomes a zero-cost optional-break
    /// penalty rather than glue.
    pub fn add_text(&mut self, font: &Rc<dyn FontProvider>, size: f64, text: &str) {
        let geom = font.geometry();
        let q = size / geom.units_per_em;

        let space_glyphs = font.layout(" ", size);
        let space_width = if space_glyphs.len() == 1 && space_glyphs[0].gid != 0 {
            space_glyphs[0].advance * q
        } else {
            (geom.units_per_em / 4.0) * q
        };

        let space_glue = Glue::new(
            space_width,
            GlueAmount::new(space_width / 2.0, 0),
            GlueAmount::new(space_width / 3.0, 0),
        );
        let xspace_glue = Glue::new(
            1.5 * space_width,
            GlueAmount::new(1.5 * space_width, 0),
            GlueAmount::new(space_width, 0),
        );

        let mut run = String::new();
        for grapheme in text.graphemes(true) {
            let c = grapheme.chars().next().unwrap_or(' ');
            if grapheme == "\u{200B}" {
                self.flush_run(font, size, &mut run);
                self.items.push(HModeItem::Penalty {
                    cost: 0.0,
                    flagged: false,
                    width: 0.0,
                });
            } else if is_breaking_whitespace(c) {
                self.flush_run(font, size, &mut run);
                if !self.after_space {
                    let g = if self.after_punct {
                        xspace_glue
                    } else {
                        space_glue
                    };
                    self.items.push(HModeItem::Glue(g));
                }
                self.after_space = true;
                self.after_punct = false;
            } else {
                run.push_str(grapheme);
                self.after_space = false;
                self.after_punct = c == '.' || c == '!' || c == '?';
            }
        }
        self.flush_run(font, size, &mut run);
    }

    fn flush_run(&mut self, font: &Rc<dyn FontProvider>, size: f64, run: &mut String) {
        if run.is_empty() {
            return;
        }
        let tb = TextBox::new(font.clone(), size, run);
        self.items.push(HModeItem::Box(Box::new(tb)));
        run.clear();
    }
}

impl Default for HModeComposer {
    fn default() -> Self {
        HModeComposer::new()
    }
}

/// Breaking whitespace = Unicode whitespace minus NBSP (U+00A0), FIGURE
/// SPACE (U+2007), NARROW NBSP (U+202F) (spec.md §4.3).
fn is_breaking_whitespace(c: char) -> bool {
    c.is_whitespace() && c != '\u{00A0}' && c != '\u{2007}' && c != '\u{202F}'
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn box_count(items: &[HModeItem]) -> usize {
        items
            .iter()
            .filter(|i| matches!(i, HModeItem::Box(_)))
            .count()
    }

    fn glue_count(items: &[HModeItem]) -> usize {
        items
            .iter()
            .filter(|i| matches!(i, HModeItem::Glue(_)))
            .count()
    }

    #[test]
    fn words_and_single_glue_between_them() {
        let mut h = HModeComposer::new();
        h.add_text(&fake_font(), 10.0, "Hello world");
        let items = h.take();
        assert_eq!(box_count(&items), 2);
        assert_eq!(glue_count(&items), 1);
    }

    #[test]
    fn consecutive_spaces_collapse_to_one_glue() {
        let mut h = HModeComposer::new();
        h.add_text(&fake_font(), 10.0, "Hello   world");
        let items = h.take();
        assert_eq!(glue_count(&items), 1);
    }

    #[test]
    fn punctuation_selects_xspace_glue() {
        let mut h = HModeComposer::new();
        h.add_text(&fake_font(), 10.0, "Hi. There");
        let items = h.take();
        let glue = items
            .iter()
            .find_map(|i| match i {
                HModeItem::Glue(g) => Some(*g),
                _ => None,
            })
            .unwrap();
        // xspace length is 1.5x the plain-space length (spec.md §4.3).
        let mut plain = HModeComposer::new();
        plain.add_text(&fake_font(), 10.0, "Hi There");
        let plain_items = plain.take();
        let plain_glue = plain_items
            .iter()
            .find_map(|i| match i {
                HModeItem::Glue(g) => Some(*g),
                _ => None,
            })
            .unwrap();
        assert!((glue.length - 1.5 * plain_glue.length).abs() < 1e-9);
    }

    #[test]
    fn zero_width_space_becomes_zero_cost_penalty() {
        let mut h = HModeComposer::new();
        h.add_text(&fake_font(), 10.0, "foo\u{200B}bar");
        let items = h.take();
        assert_eq!(box_count(&items), 2);
        assert!(items.iter().any(|i| matches!(
            i,
            HModeItem::Penalty {
                cost,
                flagged: false,
                ..
            } if *cost == 0.0
        )));
    }

    #[test]
    fn nbsp_does_not_break() {
        let mut h = HModeComposer::new();
        h.add_text(&fake_font(), 10.0, "a\u{00A0}b");
        let items = h.take();
        // NBSP is not breaking whitespace, so "a\u{00A0}b" is one run/box.
        assert_eq!(box_count(&items), 1);
        assert_eq!(glue_count(&items), 0);
    }
}
