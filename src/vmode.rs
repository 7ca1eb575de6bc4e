//! V-mode composer: accumulates paragraphs and display material into a
//! V-list, inserting baseline-skip glue (spec.md §4.5).
//!
//! Grounded on `examples/original_source/engine.go`'s `VAddBox`
//! (baseline-skip kern insertion) and `record.go` (`recordPageLocation`,
//! the record-next-box decorator).

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::boxes::{BoxExtent, GlueBox, Kern, LayoutBox, PenaltyBox};
use crate::error::EngineError;
use crate::glue::{Glue, GlueAmount};
use crate::sink::PageSink;

/// One element of a V-list (spec.md §3, §4.5). Unlike the H-list, V-list
/// items are tagged explicitly by kind (rather than folded into a generic
/// `Box` variant) because the page-breaker's candidate rule (spec.md §4.6)
/// dispatches on exactly this distinction — glue, kern, and penalty each
/// have a different breakability rule.
pub enum VModeItem {
    Box(Box<dyn LayoutBox>),
    Kern(f64),
    Glue(Glue),
    Penalty(f64),
}

pub(crate) fn item_extent(item: &VModeItem) -> BoxExtent {
    match item {
        VModeItem::Box(b) => b.extent(),
        VModeItem::Kern(k) => Kern(*k).extent(),
        VModeItem::Glue(g) => GlueBox(*g).extent(),
        VModeItem::Penalty(_) => PenaltyBox.extent(),
    }
}

pub(crate) fn item_stretch(item: &VModeItem) -> GlueAmount {
    match item {
        VModeItem::Glue(g) => g.stretch,
        _ => GlueAmount::ZERO,
    }
}

pub(crate) fn item_shrink(item: &VModeItem) -> GlueAmount {
    match item {
        VModeItem::Glue(g) => g.shrink,
        _ => GlueAmount::ZERO,
    }
}

pub(crate) fn is_discardable(item: &VModeItem) -> bool {
    !matches!(item, VModeItem::Box(_))
}

pub(crate) fn into_layout_box(item: VModeItem) -> Box<dyn LayoutBox> {
    match item {
        VModeItem::Box(b) => b,
        VModeItem::Kern(k) => Box::new(Kern(k)),
        VModeItem::Glue(g) => Box::new(GlueBox(g)),
        VModeItem::Penalty(_) => Box::new(PenaltyBox),
    }
}

/// Record of a box's final page placement, reported to a
/// `record_next_box` callback (spec.md §4.5).
#[derive(Debug, Clone, Copy)]
pub struct BoxRecord {
    /// `(llx, lly, urx, ury)` in default user-space units.
    pub bbox: (f64, f64, f64, f64),
    pub page_no: usize,
}

/// Transparent decorator: draws its inner box unchanged, but first reports
/// the box's final page coordinates to a callback (spec.md §4.5
/// `record_next_box`). `page_no` is a shared cell the engine updates just
/// before drawing each shipped page, since a box's page number is only
/// known once the page-breaker has decided which page it lands on.
struct RecordBox {
    inner: Box<dyn LayoutBox>,
    cb: RefCell<Box<dyn FnMut(BoxRecord)>>,
    page_no: Rc<Cell<usize>>,
}

impl LayoutBox for RecordBox {
    fn extent(&self) -> BoxExtent {
        self.inner.extent()
    }

    fn draw(&self, sink: &mut dyn PageSink, x: f64, y: f64) -> Result<(), EngineError> {
        let ext = self.extent();
        (self.cb.borrow_mut())(BoxRecord {
            bbox: (x, y - ext.depth, x + ext.width, y + ext.height),
            page_no: self.page_no.get(),
        });
        self.inner.draw(sink, x, y)
    }
}

pub struct VModeComposer {
    items: Vec<VModeItem>,
    prev_depth: f64,
    base_line_skip: f64,
    pending_cb: Option<Box<dyn FnMut(BoxRecord)>>,
    current_page: Rc<Cell<usize>>,
}

impl VModeComposer {
    pub fn new(base_line_skip: f64) -> Self {
        VModeComposer {
            items: Vec::new(),
            prev_depth: 0.0,
            base_line_skip,
            pending_cb: None,
            current_page: Rc::new(Cell::new(0)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[VModeItem] {
        &self.items
    }

    pub fn set_current_page(&mut self, page_no: usize) {
        self.current_page.set(page_no);
    }

    /// Sum of `height + depth` over the whole list, ignoring stretch/shrink.
    /// Used by `Engine::append_pages` to decide whether the accumulated
    /// material exceeds the shipping threshold (spec.md §6).
    pub fn natural_height(&self) -> f64 {
        self.items
            .iter()
            .map(|it| {
                let ext = item_extent(it);
                ext.height + ext.depth
            })
            .sum()
    }

    /// Append `b`, inserting a baseline-skip kern first if the gap between
    /// the previous box's depth and this box's height would otherwise be
    /// smaller than `BaseLineSkip` (spec.md §4.5).
    pub fn add_box(&mut self, b: Box<dyn LayoutBox>) {
        let ext = b.extent();
        if !self.items.is_empty() {
            let gap = ext.height + self.prev_depth;
            if gap + 1e-3 < self.base_line_skip {
                self.items.push(VModeItem::Kern(self.base_line_skip - gap));
            }
        }
        let boxed: Box<dyn LayoutBox> = match self.pending_cb.take() {
            Some(cb) => Box::new(RecordBox {
                inner: b,
                cb: RefCell::new(cb),
                page_no: self.current_page.clone(),
            }),
            None => b,
        };
        self.items.push(VModeItem::Box(boxed));
        self.prev_depth = ext.depth;
    }

    /// Append `g`. Rejects glue with infinite-order shrink (spec.md §4.5,
    /// §7 `InfiniteShrink`): such glue would let the page-breaker collapse
    /// an arbitrary amount of vertical material to nothing.
    pub fn add_glue(&mut self, g: Glue) -> Result<(), EngineError> {
        if g.shrink.order > 0 {
            return Err(EngineError::InfiniteShrink {
                order: g.shrink.order,
            });
        }
        self.items.push(VModeItem::Glue(g));
        Ok(())
    }

    pub fn add_penalty(&mut self, cost: f64) {
        self.items.push(VModeItem::Penalty(cost));
    }

    /// The next `add_box` call wraps its box in a page-location recorder
    /// (spec.md §4.5).
    pub fn record_next_box(&mut self, cb: impl FnMut(BoxRecord) + 'static) {
        self.pending_cb = Some(Box::new(cb));
    }

    /// Remove and return the first `n` items, used by the page-breaker to
    /// ship a page prefix.
    pub(crate) fn take_prefix(&mut self, n: usize) -> Vec<VModeItem> {
        let rest = self.items.split_off(n);
        std::mem::replace(&mut self.items, rest)
    }

    /// Drop leading discardable items (spec.md §4.6, final step of
    /// `MakePage`). Idempotent: calling it again once the head is already a
    /// non-discardable box is a no-op (spec.md §8 invariant 6).
    pub(crate) fn drop_leading_discardable(&mut self) {
        while let Some(item) = self.items.first() {
            if matches!(item, VModeItem::Box(_)) {
                break;
            }
            self.items.remove(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::Rule;

    fn rule(h: f64, d: f64) -> Box<dyn LayoutBox> {
        Box::new(Rule {
            width: 10.0,
            height: h,
            depth: d,
        })
    }

    #[test]
    fn inserts_baseline_skip_kern_when_gap_too_small() {
        let mut v = VModeComposer::new(20.0);
        v.add_box(rule(5.0, 2.0));
        v.add_box(rule(5.0, 2.0));
        assert_eq!(v.items().len(), 3);
        assert!(matches!(v.items()[1], VModeItem::Kern(_)));
    }

    #[test]
    fn no_kern_when_gap_already_sufficient() {
        let mut v = VModeComposer::new(5.0);
        v.add_box(rule(5.0, 2.0));
        v.add_box(rule(5.0, 2.0));
        assert_eq!(v.items().len(), 2);
    }

    #[test]
    fn rejects_infinite_shrink_glue() {
        let mut v = VModeComposer::new(10.0);
        let bad = Glue::new(5.0, GlueAmount::ZERO, GlueAmount::new(1.0, 1));
        assert!(v.add_glue(bad).is_err());
    }

    #[test]
    fn drop_leading_discardable_is_idempotent() {
        let mut v = VModeComposer::new(10.0);
        v.add_glue(Glue::fixed(3.0)).unwrap();
        v.add_penalty(0.0);
        v.add_box(rule(5.0, 0.0));
        v.drop_leading_discardable();
        let len_after_first = v.items().len();
        v.drop_leading_discardable();
        assert_eq!(v.items().len(), len_after_first);
        assert_eq!(len_after_first, 1);
    }

    #[test]
    fn record_next_box_reports_bbox_and_page() {
        let mut v = VModeComposer::new(10.0);
        let seen: Rc<RefCell<Vec<BoxRecord>>> = Rc::new(RefCell::new(Vec::new()));
        let seen2 = seen.clone();
        v.record_next_box(move |r| seen2.borrow_mut().push(r));
        v.add_box(rule(5.0, 1.0));
        v.set_current_page(3);

        struct FakeSink;
        impl PageSink for FakeSink {
            fn begin_text(&mut self) -> Result<(), EngineError> {
                Ok(())
            }
            fn set_font(
                &mut self,
                _font: &crate::text::FontHandle,
                _size: f64,
            ) -> Result<(), EngineError> {
                Ok(())
            }
            fn set_fill_color(&mut self, _color: crate::sink::Color) -> Result<(), EngineError> {
                Ok(())
            }
            fn move_text_origin(&mut self, _x: f64, _y: f64) -> Result<(), EngineError> {
                Ok(())
            }
            fn show_glyphs(&mut self, _text: &str) -> Result<(), EngineError> {
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
            fn set_line_width(&mut self, _width: f64) -> Result<(), EngineError> {
                Ok(())
            }
            fn set_stroke_color(&mut self, _color: crate::sink::Color) -> Result<(), EngineError> {
                Ok(())
            }
            fn append_page(&mut self, _width: f64, _height: f64) -> Result<(), EngineError> {
                Ok(())
            }
        }
        let mut sink = FakeSink;
        if let VModeItem::Box(b) = &v.items()[0] {
            b.draw(&mut sink, 100.0, 200.0).unwrap();
        }
        let recs = seen.borrow();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].page_no, 3);
        assert_eq!(recs[0].bbox, (100.0, 199.0, 110.0, 205.0));
    }
}
