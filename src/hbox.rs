//! HBox packing and draw-time horizontal distribution.
//!
//! Grounded on `examples/original_source/boxes.go`/`hbox.go`
//! (`HBox`/`HBoxTo`, `horizontalLayout`, `getStretch`/`getShrink`).

use crate::boxes::{BoxExtent, LayoutBox};
use crate::error::EngineError;
use crate::glue::GlueAmount;
use crate::sink::PageSink;

const EPS: f64 = 1e-3;

/// A horizontal row of boxes, optionally packed to a target width.
pub struct HBox {
    contents: Vec<Box<dyn LayoutBox>>,
    extent: BoxExtent,
    /// `Some(width)` for `HBoxTo`; `None` for natural packing.
    target_width: Option<f64>,
}

impl HBox {
    /// Natural packing: width is the sum of child widths; height/depth are
    /// the maxima over non-whitespace children.
    pub fn new(contents: Vec<Box<dyn LayoutBox>>) -> Self {
        let mut width = 0.0;
        let mut height = 0.0;
        let mut depth = 0.0;
        let mut first = true;
        for b in &contents {
            let ext = b.extent();
            width += ext.width;
            if ext.white_space_only {
                continue;
            }
            if ext.height > height || first {
                height = ext.height;
            }
            if ext.depth > depth || first {
                depth = ext.depth;
            }
            first = false;
        }
        HBox {
            contents,
            extent: BoxExtent {
                width,
                height,
                depth,
                white_space_only: false,
            },
            target_width: None,
        }
    }

    /// Packed to `width`; height/depth are still the natural maxima over
    /// non-whitespace children.
    pub fn packed_to(width: f64, contents: Vec<Box<dyn LayoutBox>>) -> Self {
        let mut hbox = HBox::new(contents);
        hbox.extent.width = width;
        hbox.target_width = Some(width);
        hbox
    }

    pub fn contents(&self) -> &[Box<dyn LayoutBox>] {
        &self.contents
    }
}

impl LayoutBox for HBox {
    fn extent(&self) -> BoxExtent {
        self.extent
    }

    fn draw(&self, sink: &mut dyn PageSink, x: f64, y: f64) -> Result<(), EngineError> {
        let width = self.target_width.unwrap_or(self.extent.width);
        let xs = horizontal_layout(x, width, &self.contents);
        for (child, cx) in self.contents.iter().zip(xs) {
            child.draw(sink, cx, y)?;
        }
        Ok(())
    }
}

struct TotalGlue {
    length: f64,
    stretch: GlueAmount,
    shrink: GlueAmount,
}

fn total_width_and_glue(boxes: &[Box<dyn LayoutBox>]) -> TotalGlue {
    let mut stretch = GlueAmount::ZERO;
    let mut shrink = GlueAmount::ZERO;
    let mut length = 0.0;
    for b in boxes {
        length += b.extent().width;
        if let Some(s) = b.stretch() {
            stretch = stretch + s;
        }
        if let Some(s) = b.shrink() {
            shrink = shrink + s;
        }
    }
    TotalGlue {
        length,
        stretch,
        shrink,
    }
}

fn get_stretch(b: &dyn LayoutBox, order: u8) -> f64 {
    match b.stretch() {
        Some(s) if s.order == order => s.val,
        _ => 0.0,
    }
}

fn get_shrink(b: &dyn LayoutBox, order: u8) -> f64 {
    match b.shrink() {
        Some(s) if s.order == order => s.val,
        _ => 0.0,
    }
}

/// Recompute child x-positions at draw time: slack is distributed across
/// the highest nonzero stretch/shrink order present.
pub fn horizontal_layout(x_left: f64, width: f64, boxes: &[Box<dyn LayoutBox>]) -> Vec<f64> {
    let mut x = x_left;
    let mut xs = Vec::with_capacity(boxes.len());
    let total = total_width_and_glue(boxes);

    if total.length < width - EPS && total.stretch.val > 0.0 {
        let q = (width - total.length) / total.stretch.val;
        for b in boxes {
            xs.push(x);
            x += b.extent().width + q * get_stretch(b.as_ref(), total.stretch.order);
        }
    } else if total.length > width + EPS && total.shrink.val > 0.0 {
        let mut q = (total.length - width) / total.shrink.val;
        if total.shrink.order == 0 && q > 1.0 {
            q = 1.0;
        }
        for b in boxes {
            xs.push(x);
            x += b.extent().width - q * get_shrink(b.as_ref(), total.shrink.order);
        }
    } else {
        for b in boxes {
            xs.push(x);
            x += b.extent().width;
        }
    }
    xs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::{GlueBox, Rule};
    use crate::glue::Glue;

    fn rule(w: f64) -> Box<dyn LayoutBox> {
        Box::new(Rule {
            width: w,
            height: 5.0,
            depth: 0.0,
        })
    }

    #[test]
    fn natural_width_is_sum_of_children() {
        let hbox = HBox::new(vec![rule(10.0), rule(20.0), rule(5.0)]);
        assert_eq!(hbox.extent().width, 35.0);
    }

    #[test]
    fn packing_to_natural_width_leaves_positions_unchanged() {
        let boxes = vec![rule(10.0), rule(20.0), rule(5.0)];
        let natural = total_width_and_glue(&boxes).length;
        let xs = horizontal_layout(0.0, natural, &boxes);
        assert_eq!(xs, vec![0.0, 10.0, 30.0]);
    }

    #[test]
    fn stretch_distributes_proportionally_at_highest_order() {
        let boxes: Vec<Box<dyn LayoutBox>> = vec![
            rule(10.0),
            Box::new(GlueBox(Glue::new(
                5.0,
                GlueAmount::new(5.0, 0),
                GlueAmount::ZERO,
            ))),
            rule(10.0),
        ];
        // natural = 25, pack to 35 => 10 extra distributed over 5 stretch units => q=2
        let xs = horizontal_layout(0.0, 35.0, &boxes);
        assert_eq!(xs[0], 0.0);
        assert_eq!(xs[1], 10.0);
        // glue's own width (5) plus q*stretch (2*5=10) = 15
        assert_eq!(xs[2], 10.0 + 15.0);
    }

    #[test]
    fn fil_dominates_finite_stretch() {
        let boxes: Vec<Box<dyn LayoutBox>> = vec![
            Box::new(GlueBox(Glue::new(
                0.0,
                GlueAmount::new(1.0, 0),
                GlueAmount::ZERO,
            ))),
            Box::new(GlueBox(Glue::new(
                0.0,
                GlueAmount::new(1.0, 1),
                GlueAmount::ZERO,
            ))),
        ];
        let xs = horizontal_layout(0.0, 100.0, &boxes);
        // all 100pt of slack go to the fil glue (index 1); the order-0 glue
        // does not move beyond its natural (zero) width.
        assert_eq!(xs[0], 0.0);
        assert_eq!(xs[1], 0.0);
    }

    #[test]
    fn shrink_never_exceeds_order_zero_minimum() {
        let boxes: Vec<Box<dyn LayoutBox>> = vec![Box::new(GlueBox(Glue::new(
            10.0,
            GlueAmount::ZERO,
            GlueAmount::new(2.0, 0),
        )))];
        // ask for width 0 even though shrink only covers 2 of the 10 units:
        // q is capped at 1, so the glue shrinks only by its shrink amount.
        let xs = horizontal_layout(0.0, 0.0, &boxes);
        assert_eq!(xs, vec![0.0]);
        let hbox = HBox::packed_to(0.0, boxes);
        assert_eq!(hbox.extent().width, 0.0);
    }
}
