//! Paragraph termination: runs the Knuth-Plass breaker over an H-list and
//! materialises the resulting breakpoints into line HBoxes on the V-list
//! (spec.md §4.4 "Line materialisation").
//!
//! Grounded on `examples/original_source/linebreak.go`'s `EndParagraph`:
//! ParFillSkip + forced break appended to the H-list, LeftSkip/RightSkip
//! wrapping per line, and club/widow/inter-line penalty insertion between
//! produced lines.

use crate::error::EngineError;
use crate::glue::Glue;
use crate::hbox::HBox;
use crate::hmode::HModeItem;
use crate::knuth::{self, BreakerParams};

/// Penalties named in spec.md §4.4/§6 that the paragraph terminator inserts
/// between produced lines.
#[derive(Debug, Clone, Copy)]
pub struct LinePenalties {
    pub inter_line: f64,
    pub club: f64,
    pub widow: f64,
}

/// Glue roles at the margins of a line (spec.md §6 `LeftSkip`/`RightSkip`)
/// and at the end of a paragraph (`ParFillSkip`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ParagraphSkips {
    pub left_skip: Option<Glue>,
    pub right_skip: Option<Glue>,
    pub par_fill_skip: Option<Glue>,
}

/// One produced line, ready to be handed to `VModeComposer::add_box`, plus
/// the inter-line penalty (if any) that must be inserted before it.
pub struct Line {
    pub hbox: HBox,
    /// `None` for the first line (no penalty precedes it).
    pub penalty_before: Option<f64>,
}

/// Run the line-breaker over `h_list` and materialise the chosen breaks
/// into line HBoxes (spec.md §4.4). `h_list` is the paragraph's H-mode list
/// *without* the trailing ParFillSkip/forced-break — those are appended
/// here, matching `EndParagraph`'s own bookkeeping.
pub fn end_paragraph(
    mut h_list: Vec<HModeItem>,
    text_width: f64,
    skips: &ParagraphSkips,
    penalties: &LinePenalties,
    params: &BreakerParams,
) -> Result<Vec<Line>, EngineError> {
    if let Some(pfs) = skips.par_fill_skip {
        h_list.push(HModeItem::Glue(pfs));
    }
    h_list.push(HModeItem::Penalty {
        cost: f64::NEG_INFINITY,
        flagged: false,
        width: 0.0,
    });

    let line_width = move |_line_no: usize| Glue::fixed(text_width);
    let breaks = knuth::break_paragraph(&h_list, &line_width, params)?;

    // Break positions index into the original `h_list`; take items out by
    // index (rather than draining ranges, which would shift later indices)
    // so each position is consumed exactly once regardless of iteration
    // order.
    let mut slots: Vec<Option<HModeItem>> = h_list.into_iter().map(Some).collect();

    let mut lines = Vec::with_capacity(breaks.len());
    let mut prev_pos = 0usize;
    for (i, &pos) in breaks.iter().enumerate() {
        let mut contents: Vec<Box<dyn crate::boxes::LayoutBox>> = Vec::new();
        if let Some(ls) = skips.left_skip {
            contents.push(Box::new(crate::boxes::GlueBox(ls)));
        }
        for slot in &mut slots[prev_pos..pos] {
            match slot.take() {
                Some(HModeItem::Glue(g)) => contents.push(Box::new(crate::boxes::GlueBox(g))),
                Some(HModeItem::Box(b)) => contents.push(b),
                Some(HModeItem::Penalty { .. }) | None => {}
            }
        }
        if let Some(rs) = skips.right_skip {
            contents.push(Box::new(crate::boxes::GlueBox(rs)));
        }

        let penalty_before = if i > 0 {
            let mut p = penalties.inter_line;
            if i == 1 {
                p += penalties.club;
            }
            if i == breaks.len() - 1 {
                p += penalties.widow;
            }
            Some(p)
        } else {
            None
        };

        lines.push(Line {
            hbox: HBox::packed_to(text_width, contents),
            penalty_before,
        });

        // Advance past the break itself, then skip discardables up to the
        // next box or a second forced break, matching `EndParagraph`'s own
        // `prevPos = pos` plus the breaker's discardable-skip.
        prev_pos = pos;
        while prev_pos < slots.len() {
            match &slots[prev_pos] {
                Some(HModeItem::Box(_)) => break,
                Some(HModeItem::Penalty { cost, .. }) if *cost == f64::NEG_INFINITY => break,
                _ => prev_pos += 1,
            }
        }
    }

    Ok(lines)
}
