//! VBox/VTop packing and draw-time vertical distribution.
//!
//! Grounded on `examples/original_source/boxes.go`/`vbox.go` (`VBox`,
//! `VBoxTo`, `VTop`, `verticalLayout`). `VBox`'s reference baseline is the
//! last child's; `VTop`'s is the first child's.

use crate::boxes::{BoxExtent, LayoutBox};
use crate::error::EngineError;
use crate::glue::GlueAmount;
use crate::sink::PageSink;

const EPS: f64 = 1e-3;

enum Baseline {
    Last,
    First,
}

/// A vertical column of boxes.
pub struct VBox {
    contents: Vec<Box<dyn LayoutBox>>,
    extent: BoxExtent,
    target_height: Option<f64>,
    baseline: Baseline,
}

impl VBox {
    /// Natural packing, baseline at the last child.
    pub fn new(contents: Vec<Box<dyn LayoutBox>>) -> Self {
        Self::build(contents, None, Baseline::Last)
    }

    /// Natural packing, baseline at the first child.
    pub fn new_top(contents: Vec<Box<dyn LayoutBox>>) -> Self {
        Self::build(contents, None, Baseline::First)
    }

    /// Packed to `height`, baseline at the last child.
    pub fn packed_to(height: f64, contents: Vec<Box<dyn LayoutBox>>) -> Self {
        Self::build(contents, Some(height), Baseline::Last)
    }

    fn build(contents: Vec<Box<dyn LayoutBox>>, target_height: Option<f64>, baseline: Baseline) -> Self {
        let mut width = 0.0;
        for b in &contents {
            let ext = b.extent();
            if !ext.white_space_only && ext.width > width {
                width = ext.width;
            }
        }

        let (height, depth) = match baseline {
            Baseline::Last => {
                let mut total_h = 0.0;
                for b in &contents {
                    let ext = b.extent();
                    total_h += ext.height + ext.depth;
                }
                let depth = contents.last().map(|b| b.extent().depth).unwrap_or(0.0);
                (total_h - depth, depth)
            }
            Baseline::First => {
                let mut depth_acc = 0.0;
                let mut height = 0.0;
                for (i, b) in contents.iter().enumerate() {
                    let ext = b.extent();
                    if i == 0 {
                        height = ext.height;
                    } else {
                        depth_acc += ext.height;
                    }
                    depth_acc += ext.depth;
                }
                (height, depth_acc)
            }
        };

        let extent = BoxExtent {
            width,
            // For VBoxTo, depth stays the natural depth (last child's,
            // matching `original_source/boxes.go`'s `VBoxTo`) while height
            // absorbs the target: height + depth == target_height.
            height: target_height.map(|h| h - depth).unwrap_or(height),
            depth,
            white_space_only: false,
        };

        VBox {
            contents,
            extent,
            target_height,
            baseline,
        }
    }

    pub fn contents(&self) -> &[Box<dyn LayoutBox>] {
        &self.contents
    }
}

impl LayoutBox for VBox {
    fn extent(&self) -> BoxExtent {
        self.extent
    }

    fn draw(&self, sink: &mut dyn PageSink, x: f64, y: f64) -> Result<(), EngineError> {
        let total_height = self
            .target_height
            .unwrap_or(self.extent.height + self.extent.depth);
        let y_top = y + self.extent.height;
        let ys = match self.baseline {
            Baseline::Last => vertical_layout(y_top, total_height, &self.contents),
            Baseline::First => {
                // VTop never distributes slack: it always lays children out
                // at natural height/depth starting from the first child's
                // baseline.
                natural_vertical_layout(y_top, &self.contents)
            }
        };
        for (child, cy) in self.contents.iter().zip(ys) {
            child.draw(sink, x, cy)?;
        }
        Ok(())
    }
}

struct TotalGlue {
    length: f64,
    stretch: GlueAmount,
    shrink: GlueAmount,
}

fn total_height_and_glue(boxes: &[Box<dyn LayoutBox>]) -> TotalGlue {
    let mut stretch = GlueAmount::ZERO;
    let mut shrink = GlueAmount::ZERO;
    let mut length = 0.0;
    for b in boxes {
        let ext = b.extent();
        length += ext.height + ext.depth;
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

/// Recompute child y-positions at draw time, distributing slack along the
/// highest nonzero stretch/shrink order.
pub fn vertical_layout(y_top: f64, height: f64, boxes: &[Box<dyn LayoutBox>]) -> Vec<f64> {
    let mut y = y_top;
    let mut ys = Vec::with_capacity(boxes.len());
    let total = total_height_and_glue(boxes);

    if total.length < height - EPS && total.stretch.val > 0.0 {
        let q = (height - total.length) / total.stretch.val;
        for b in boxes {
            let ext = b.extent();
            y -= ext.height + q * get_stretch(b.as_ref(), total.stretch.order);
            ys.push(y);
            y -= ext.depth;
        }
    } else if total.length > height + EPS && total.shrink.val > 0.0 {
        let mut q = (total.length - height) / total.shrink.val;
        if total.shrink.order == 0 && q > 1.0 {
            q = 1.0;
        }
        for b in boxes {
            let ext = b.extent();
            y -= ext.height - q * get_shrink(b.as_ref(), total.shrink.order);
            ys.push(y);
            y -= ext.depth;
        }
    } else {
        return natural_vertical_layout(y_top, boxes);
    }
    ys
}

fn natural_vertical_layout(y_top: f64, boxes: &[Box<dyn LayoutBox>]) -> Vec<f64> {
    let mut y = y_top;
    let mut ys = Vec::with_capacity(boxes.len());
    for b in boxes {
        let ext = b.extent();
        y -= ext.height;
        ys.push(y);
        y -= ext.depth;
    }
    ys
}
