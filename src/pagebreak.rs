//! Greedy best-fit page breaker (spec.md §4.6).
//!
//! Grounded on `examples/original_source/pagebreak.go` (`vGetCandidates`,
//! `vCanBreak`, `MakePage`). Unlike the line-breaker this does not search
//! globally: page-break decisions commit once emitted (spec.md §4.6
//! rationale), so badness + penalty at each candidate suffices.

use crate::boxes::LayoutBox;
use crate::error::EngineError;
use crate::glue::{Glue, GlueAmount};
use crate::vbox::VBox;
use crate::vmode::{VModeComposer, VModeItem};

const EPS: f64 = 1e-6;

struct Candidate {
    pos: usize,
    badness: f64,
    penalty: f64,
}

fn can_break(items: &[VModeItem], pos: usize) -> bool {
    if pos == items.len() {
        return true;
    }
    if pos == 0 {
        return false;
    }
    match &items[pos] {
        VModeItem::Glue(_) => !matches!(items[pos - 1], VModeItem::Glue(_) | VModeItem::Kern(_) | VModeItem::Penalty(_)),
        VModeItem::Kern(_) => pos + 1 < items.len() && matches!(items[pos + 1], VModeItem::Glue(_)),
        VModeItem::Penalty(p) => *p < f64::INFINITY,
        VModeItem::Box(_) => false,
    }
}

fn candidates(items: &[VModeItem], top_skip_cfg: f64, bottom_glue: Glue, height: f64) -> Vec<Candidate> {
    if items.is_empty() {
        return Vec::new();
    }

    let ext0 = crate::vmode::item_extent(&items[0]);
    let top_skip = (top_skip_cfg - ext0.height).max(0.0);

    let mut total = Glue {
        length: top_skip,
        stretch: GlueAmount::ZERO,
        shrink: GlueAmount::ZERO,
    };
    total = total.add(bottom_glue);

    let mut res = Vec::new();
    let mut prev_depth = 0.0;
    for i in 0..=items.len() {
        let min_height = total.min_length();
        let max_height = total.max_length();
        if min_height > height && !res.is_empty() {
            break;
        }

        let penalty_val = match items.get(i) {
            Some(VModeItem::Penalty(p)) => *p,
            _ => 0.0,
        };

        if can_break(items, i) && penalty_val < f64::INFINITY {
            let badness = if min_height > height {
                f64::INFINITY
            } else if max_height < height {
                f64::INFINITY
            } else if (total.length - height).abs() < 1e-6 {
                0.0
            } else if total.length < height {
                let need_stretch = height - total.length;
                let can_stretch = if total.stretch.order > 0 {
                    height
                } else {
                    total.stretch.val
                };
                100.0 * (need_stretch / can_stretch).powi(3)
            } else {
                let need_shrink = total.length - height;
                let can_shrink = total.shrink.val;
                (1e4_f64).min(100.0 * (need_shrink / can_shrink).powi(3))
            };

            res.push(Candidate {
                pos: i,
                badness,
                penalty: penalty_val,
            });

            if penalty_val == f64::NEG_INFINITY {
                break;
            }
        }

        if i < items.len() {
            if let VModeItem::Penalty(_) = items[i] {
                // penalties contribute no length
            } else {
                let ext = crate::vmode::item_extent(&items[i]);
                total.length += ext.height + prev_depth;
                prev_depth = ext.depth;
                total.stretch = total.stretch + crate::vmode::item_stretch(&items[i]);
                total.shrink = total.shrink + crate::vmode::item_shrink(&items[i]);
            }
        }
    }
    res
}

/// Select the prefix of `composer`'s V-list that best fills `height`, ship
/// it as a `VBox` packed to `height`, and drop the shipped items (plus any
/// leading discardables) from the composer (spec.md §4.6).
///
/// Returns `None` if the V-list is empty (nothing to ship) — matches
/// `MakePage`'s `nil` return for an empty list, not an error.
pub fn make_page(
    composer: &mut VModeComposer,
    top_skip_cfg: f64,
    bottom_glue: Glue,
    height: f64,
) -> Result<Option<VBox>, EngineError> {
    if composer.items().is_empty() {
        return Ok(None);
    }
    if bottom_glue.shrink.order > 0 {
        return Err(EngineError::InfiniteShrink {
            order: bottom_glue.shrink.order,
        });
    }

    let items = composer.items();
    let cand = candidates(items, top_skip_cfg, bottom_glue, height);

    let mut best_pos: Option<usize> = None;
    let mut best_cost = f64::INFINITY;
    for c in &cand {
        // A forced break (`penalty = -inf`) must win outright: summing it
        // with an overfull/underfull `+inf` badness would produce `NaN`,
        // which compares false against everything and silently loses the
        // selection (spec.md §4.6's forced-break case).
        let cost = if c.penalty == f64::NEG_INFINITY {
            f64::NEG_INFINITY
        } else {
            c.badness + c.penalty
        };
        if cost <= best_cost {
            best_cost = cost;
            best_pos = Some(c.pos);
        }
    }
    let best_pos = match best_pos {
        Some(p) => p,
        None => return Ok(None),
    };

    let ext0 = crate::vmode::item_extent(&items[0]);
    let top_skip = (top_skip_cfg - ext0.height).max(0.0);

    let mut contents: Vec<Box<dyn LayoutBox>> = Vec::new();
    if top_skip > EPS {
        contents.push(Box::new(crate::boxes::Kern(top_skip)));
    }
    for item in composer.take_prefix(best_pos) {
        contents.push(crate::vmode::into_layout_box(item));
    }
    if bottom_glue.length != 0.0 || bottom_glue.stretch.val != 0.0 || bottom_glue.shrink.val != 0.0 {
        contents.push(Box::new(crate::boxes::GlueBox(bottom_glue)));
    }

    composer.drop_leading_discardable();

    Ok(Some(VBox::packed_to(height, contents)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::Rule;

    fn box20() -> Box<dyn LayoutBox> {
        Box::new(Rule {
            width: 50.0,
            height: 20.0,
            depth: 0.0,
        })
    }

    #[test]
    fn s4_page_breaks_at_forced_penalty() {
        // three 20pt boxes with a forced break (-inf) after the second.
        let mut v = VModeComposer::new(0.0);
        v.add_box(box20());
        v.add_box(box20());
        v.add_penalty(f64::NEG_INFINITY);
        v.add_box(box20());

        let page = make_page(&mut v, 0.0, Glue::ZERO, 100.0).unwrap().unwrap();
        use crate::boxes::LayoutBox;
        assert_eq!(page.extent().height + page.extent().depth, 100.0);
        // Only the first two boxes (40pt) should remain on the shipped
        // page; the third stays in the composer for the next page.
        assert_eq!(v.items().len(), 1);
    }

    #[test]
    fn empty_vlist_yields_no_page() {
        let mut v = VModeComposer::new(0.0);
        let page = make_page(&mut v, 0.0, Glue::ZERO, 100.0).unwrap();
        assert!(page.is_none());
    }

    #[test]
    fn rejects_infinite_shrink_bottom_glue() {
        let mut v = VModeComposer::new(0.0);
        v.add_box(box20());
        let bad = Glue::new(0.0, GlueAmount::ZERO, GlueAmount::new(1.0, 1));
        let result = make_page(&mut v, 0.0, bad, 100.0);
        assert!(result.is_err());
    }

    #[test]
    fn candidate_positions_strictly_increase() {
        let mut v = VModeComposer::new(0.0);
        for _ in 0..5 {
            v.add_box(box20());
            v.add_glue(Glue::new(5.0, GlueAmount::new(2.0, 0), GlueAmount::new(1.0, 0)))
                .unwrap();
        }
        let items = v.items();
        let cand = candidates(items, 0.0, Glue::ZERO, 60.0);
        for w in cand.windows(2) {
            assert!(w[0].pos < w[1].pos);
        }
    }
}
