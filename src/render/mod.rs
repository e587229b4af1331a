//! What every renderer of the grid agrees on.
//!
//! The screen and the PDF exporter both implement [`Renderer`] over the same
//! [`RenderFrame`]. Colors, legend entries and block extents come from here
//! so the two targets cannot drift apart.

mod palette;

pub use palette::{category_color, Palette, Rgb, FALLBACK_COLOR};

use crate::schedule::{
    GridLayout, NowCell, PlacedActivity, ScheduleDocument, ScheduleStore, Statistics,
};

/// Characters of a title that fit on a printed block.
pub const LABEL_BUDGET: usize = 15;
const LABEL_ELLIPSIS: &str = "...";

/// Everything a renderer consumes for one pass.
#[derive(Clone, Copy)]
pub struct RenderFrame<'a> {
    pub document: &'a ScheduleDocument,
    pub layout: &'a GridLayout,
    pub statistics: &'a Statistics,
    pub now: Option<NowCell>,
}

impl<'a> RenderFrame<'a> {
    pub fn from_store(store: &'a ScheduleStore, now: Option<NowCell>) -> Self {
        Self {
            document: store.document(),
            layout: store.layout(),
            statistics: store.statistics(),
            now,
        }
    }
}

pub trait Renderer {
    type Output;

    fn render(&mut self, frame: &RenderFrame<'_>) -> Self::Output;
}

/// Vertical extent of a block, in whatever unit `row_height` uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockExtent {
    pub top: f32,
    pub height: f32,
}

/// Scale a placed block by one row's height. Both renderers size blocks
/// through this.
pub fn block_extent(placed: &PlacedActivity, row_height: f32) -> BlockExtent {
    BlockExtent {
        top: placed.top_offset_units * row_height,
        height: placed.height_units * row_height,
    }
}

/// Shorten a title to [`LABEL_BUDGET`] characters, ending in "...".
pub fn truncate_label(title: &str) -> String {
    if title.chars().count() > LABEL_BUDGET {
        let keep = LABEL_BUDGET - 2;
        let mut short: String = title.chars().take(keep).collect();
        short.push_str(LABEL_ELLIPSIS);
        short
    } else {
        title.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::layout;

    #[test]
    fn extents_scale_height_units() {
        let document = ScheduleDocument::default();
        let grid = layout(&document);
        let (_, _, meeting) = grid
            .placed()
            .find(|(_, _, p)| p.duration_minutes == 90)
            .unwrap();

        let screen = block_extent(meeting, 50.0);
        assert_eq!(screen, BlockExtent { top: 0.0, height: 75.0 });

        let paper = block_extent(meeting, 10.0);
        assert!((paper.height / 10.0 - screen.height / 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn long_titles_are_truncated_with_ellipsis() {
        assert_eq!(truncate_label("Client Presentation"), "Client Presen...");
        assert_eq!(truncate_label("Planning Session"), "Planning Sess...");
        assert_eq!(truncate_label("Team Meeting"), "Team Meeting");
        assert_eq!(truncate_label("exactly fifteen"), "exactly fifteen");
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        assert_eq!(truncate_label("Café au lait à midi"), "Café au lait ...");
    }
}
