//! Box primitives: the `LayoutBox` trait and the leaf box kinds that are not
//! text, HBox, or VBox (those live in `text.rs`, `hbox.rs`, `vbox.rs`).
//!
//! Grounded on `examples/original_source/box.go`/`boxes.go`: the Go `Box`
//! interface (`Extent() *BoxExtent`, `Draw(page, x, y)`) becomes the
//! `LayoutBox` trait; `Rule`, `Kern`, `raiseBox` translate directly.

use crate::error::EngineError;
use crate::glue::{Glue, GlueAmount};
use crate::sink::{Color, PageSink};

/// `(width, height, depth, whiteSpaceOnly)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxExtent {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub white_space_only: bool,
}

impl BoxExtent {
    pub const ZERO: BoxExtent = BoxExtent {
        width: 0.0,
        height: 0.0,
        depth: 0.0,
        white_space_only: false,
    };
}

/// Every renderable element with a known rectangular footprint. An
/// extent is a pure function of the box's contents and construction-time
/// parameters — it must never change between packing and drawing.
pub trait LayoutBox {
    fn extent(&self) -> BoxExtent;
    fn draw(&self, sink: &mut dyn PageSink, x: f64, y: f64) -> Result<(), EngineError>;

    /// Stretch component, for boxes that participate in slack distribution
    /// (glue). `None` for rigid boxes.
    fn stretch(&self) -> Option<GlueAmount> {
        None
    }
    /// Shrink component, for boxes that participate in slack distribution.
    fn shrink(&self) -> Option<GlueAmount> {
        None
    }
}

/// A solid rectangle with fixed extent.
pub struct Rule {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl LayoutBox for Rule {
    fn extent(&self) -> BoxExtent {
        BoxExtent {
            width: self.width,
            height: self.height,
            depth: self.depth,
            white_space_only: false,
        }
    }

    fn draw(&self, sink: &mut dyn PageSink, x: f64, y: f64) -> Result<(), EngineError> {
        // A rule with no on-page extent is skipped silently rather than
        // emitting a degenerate rectangle.
        if self.width <= 0.0 || self.height + self.depth <= 0.0 {
            #[cfg(feature = "logging")]
            log::trace!("skipping empty-extent rule");
            return Ok(());
        }
        sink.rectangle(x, y - self.depth, self.width, self.height + self.depth)?;
        sink.set_fill_color(Color::BLACK)?;
        sink.fill()?;
        Ok(())
    }
}

/// A fixed, rigid amount of space: width = height = amount, depth = 0,
/// whitespace-only, non-discardable except at the page-breaker's kern/glue
/// rule.
#[derive(Debug, Clone, Copy)]
pub struct Kern(pub f64);

impl LayoutBox for Kern {
    fn extent(&self) -> BoxExtent {
        BoxExtent {
            width: self.0,
            height: self.0,
            depth: 0.0,
            white_space_only: true,
        }
    }

    fn draw(&self, _sink: &mut dyn PageSink, _x: f64, _y: f64) -> Result<(), EngineError> {
        Ok(())
    }
}

/// An elastic-length box: natural length, stretch, and shrink. Its
/// extent's width equals its natural length; it carries no visible marks.
#[derive(Debug, Clone, Copy)]
pub struct GlueBox(pub Glue);

impl LayoutBox for GlueBox {
    fn extent(&self) -> BoxExtent {
        BoxExtent {
            width: self.0.length,
            height: self.0.length,
            depth: 0.0,
            white_space_only: true,
        }
    }

    fn draw(&self, _sink: &mut dyn PageSink, _x: f64, _y: f64) -> Result<(), EngineError> {
        Ok(())
    }

    fn stretch(&self) -> Option<GlueAmount> {
        Some(self.0.stretch)
    }

    fn shrink(&self) -> Option<GlueAmount> {
        Some(self.0.shrink)
    }
}

/// Shifts a box's baseline up by `delta`, preserving height + depth.
pub struct Raise<B: LayoutBox> {
    pub delta: f64,
    pub inner: B,
}

impl<B: LayoutBox> Raise<B> {
    pub fn new(delta: f64, inner: B) -> Self {
        Raise { delta, inner }
    }
}

impl<B: LayoutBox> LayoutBox for Raise<B> {
    fn extent(&self) -> BoxExtent {
        let ext = self.inner.extent();
        BoxExtent {
            width: ext.width,
            height: ext.height + self.delta,
            depth: ext.depth - self.delta,
            white_space_only: ext.white_space_only,
        }
    }

    fn draw(&self, sink: &mut dyn PageSink, x: f64, y: f64) -> Result<(), EngineError> {
        self.inner.draw(sink, x, y + self.delta)
    }
}

/// A marker-only box at a potential breakpoint: zero width, whitespace-only,
/// never drawn.
#[derive(Debug, Clone, Copy)]
pub struct PenaltyBox;

impl LayoutBox for PenaltyBox {
    fn extent(&self) -> BoxExtent {
        BoxExtent {
            width: 0.0,
            height: 0.0,
            depth: 0.0,
            white_space_only: true,
        }
    }

    fn draw(&self, _sink: &mut dyn PageSink, _x: f64, _y: f64) -> Result<(), EngineError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raise_preserves_height_plus_depth() {
        let rule = Rule {
            width: 10.0,
            height: 6.0,
            depth: 2.0,
        };
        let before = rule.extent();
        let raised = Raise::new(3.0, rule);
        let after = raised.extent();
        assert_eq!(after.width, before.width);
        assert_eq!(after.height, before.height + 3.0);
        assert_eq!(after.depth, before.depth - 3.0);
        assert_eq!(
            before.height + before.depth,
            after.height + after.depth
        );
    }

    #[test]
    fn kern_is_whitespace_only_with_zero_depth() {
        let k = Kern(5.0);
        let ext = k.extent();
        assert_eq!(ext.width, 5.0);
        assert_eq!(ext.height, 5.0);
        assert_eq!(ext.depth, 0.0);
        assert!(ext.white_space_only);
    }

    #[test]
    fn glue_box_natural_extent() {
        let g = GlueBox(Glue::new(
            12.0,
            GlueAmount::new(4.0, 0),
            GlueAmount::new(3.0, 0),
        ));
        let ext = g.extent();
        assert_eq!(ext.width, 12.0);
        assert!(ext.white_space_only);
        assert_eq!(g.stretch(), Some(GlueAmount::new(4.0, 0)));
        assert_eq!(g.shrink(), Some(GlueAmount::new(3.0, 0)));
    }

    #[test]
    fn penalty_is_zero_width_whitespace() {
        let p = PenaltyBox;
        let ext = p.extent();
        assert_eq!(ext.width, 0.0);
        assert!(ext.white_space_only);
    }
}
