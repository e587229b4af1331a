//! Grid layout engine.
//!
//! Maps activities onto a `[slot][day]` matrix and sizes each placed block in
//! *row units* (multiples of its starting row's nominal duration). Renderers
//! multiply those units by their own row height, pixels on screen and
//! millimetres on paper, so both targets agree on extents.
//!
//! Placement rules:
//! - an activity is placed only when its `day` names a column and its
//!   `startTime` is textually equal to a slot label; activities starting
//!   between slots are reported as [`Unplaced::OffGrid`];
//! - when several activities share a `(day, startTime)` cell the first one in
//!   document order wins and the rest are reported as [`Unplaced::Shadowed`];
//! - blocks are always flush with the top of their starting row.

use log::warn;

use super::time::{format_minutes, parse_time, TimeError};
use super::types::{Activity, ScheduleDocument};

/// Row duration used for the last slot, or when neighbouring slots do not
/// increase.
pub const DEFAULT_SLOT_MINUTES: u32 = 60;

/// One grid row.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotRow {
    pub label: String,
    /// `None` when the label does not parse; nothing can start in such a row.
    pub minutes: Option<u32>,
    /// Nominal duration of the row: the gap to the next slot, or the default.
    pub nominal_minutes: u32,
}

impl SlotRow {
    /// Label for the time column: canonical form when it parses
    /// (`"09:00 am"` shows as `"9:00 AM"`), verbatim otherwise.
    pub fn display_label(&self) -> String {
        self.minutes.map(format_minutes).unwrap_or_else(|| self.label.clone())
    }
}

/// A block that starts in a given cell.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedActivity {
    /// Index into `ScheduleDocument::activities`.
    pub activity_index: usize,
    pub duration_minutes: u32,
    /// How many rows tall the block is (`duration / nominal_minutes`).
    pub height_units: f32,
    /// Offset from the top of the starting row, in rows. Always zero.
    pub top_offset_units: f32,
    /// Nominal duration of the starting row, copied for renderers.
    pub slot_minutes: u32,
}

impl PlacedActivity {
    /// Whether the block is taller than its own starting row.
    pub fn spans_multiple_rows(&self) -> bool {
        self.duration_minutes > self.slot_minutes
    }

    pub fn activity<'a>(&self, document: &'a ScheduleDocument) -> &'a Activity {
        &document.activities[self.activity_index]
    }
}

/// Why an activity has no block in the grid.
#[derive(Debug, Clone, PartialEq)]
pub enum Unplaced {
    UnknownDay,
    OffGrid,
    MalformedTime(TimeError),
    /// Another activity already starts in the same cell.
    Shadowed { winner: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    pub days: Vec<String>,
    pub rows: Vec<SlotRow>,
    /// `cells[slot][day]`
    pub cells: Vec<Vec<Option<PlacedActivity>>>,
    pub unplaced: Vec<(usize, Unplaced)>,
}

impl GridLayout {
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn slot_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell(&self, slot: usize, day: usize) -> Option<&PlacedActivity> {
        self.cells.get(slot)?.get(day)?.as_ref()
    }

    /// All placed blocks with their `(slot, day)` coordinates, row by row.
    pub fn placed(&self) -> impl Iterator<Item = (usize, usize, &PlacedActivity)> {
        self.cells.iter().enumerate().flat_map(|(slot, row)| {
            row.iter()
                .enumerate()
                .filter_map(move |(day, cell)| cell.as_ref().map(|p| (slot, day, p)))
        })
    }

    /// Find the cell an activity was placed in.
    #[cfg(test)]
    pub fn position_of(&self, activity_index: usize) -> Option<(usize, usize)> {
        self.placed()
            .find(|(_, _, p)| p.activity_index == activity_index)
            .map(|(slot, day, _)| (slot, day))
    }
}

/// Nominal row durations derived from the gaps between consecutive slots.
pub fn slot_rows(time_slots: &[String]) -> Vec<SlotRow> {
    let minutes: Vec<Option<u32>> = time_slots.iter().map(|s| parse_time(s).ok()).collect();

    time_slots
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let nominal_minutes = match (minutes[i], minutes.get(i + 1).copied().flatten()) {
                (Some(here), Some(next)) if next > here => next - here,
                _ => DEFAULT_SLOT_MINUTES,
            };
            SlotRow {
                label: label.clone(),
                minutes: minutes[i],
                nominal_minutes,
            }
        })
        .collect()
}

/// Compute the grid for a document.
///
/// Each `(day, slot)` cell scans the activity list for the first exact match,
/// so cost is `days * slots * activities`; documents are small.
pub fn layout(document: &ScheduleDocument) -> GridLayout {
    let rows = slot_rows(&document.time_slots);
    let day_count = document.week_days.len();
    let mut cells: Vec<Vec<Option<PlacedActivity>>> = vec![vec![None; day_count]; rows.len()];
    let mut placed_or_failed = vec![false; document.activities.len()];
    let mut unplaced = Vec::new();

    for (slot_idx, row) in rows.iter().enumerate() {
        for (day_idx, day) in document.week_days.iter().enumerate() {
            let Some(activity_index) = document
                .activities
                .iter()
                .position(|a| &a.day == day && a.start_time == row.label)
            else {
                continue;
            };
            if placed_or_failed[activity_index] {
                // Same day label listed twice; the first column keeps it.
                continue;
            }
            placed_or_failed[activity_index] = true;

            let activity = &document.activities[activity_index];
            match activity.duration_minutes() {
                Ok(duration_minutes) => {
                    cells[slot_idx][day_idx] = Some(PlacedActivity {
                        activity_index,
                        duration_minutes,
                        height_units: duration_minutes as f32 / row.nominal_minutes as f32,
                        top_offset_units: 0.0,
                        slot_minutes: row.nominal_minutes,
                    });
                }
                Err(e) => unplaced.push((activity_index, Unplaced::MalformedTime(e))),
            }
        }
    }

    for (index, activity) in document.activities.iter().enumerate() {
        if placed_or_failed[index] {
            continue;
        }
        let reason = if document.day_index(&activity.day).is_none() {
            Unplaced::UnknownDay
        } else if let Some(winner) = document.activities[..index]
            .iter()
            .position(|a| a.day == activity.day && a.start_time == activity.start_time)
        {
            Unplaced::Shadowed { winner }
        } else if let Err(e) = parse_time(&activity.start_time) {
            Unplaced::MalformedTime(e)
        } else {
            Unplaced::OffGrid
        };
        unplaced.push((index, reason));
    }

    unplaced.sort_by_key(|(index, _)| *index);
    for (index, reason) in &unplaced {
        let activity = &document.activities[*index];
        warn!(
            "activity {} `{}` ({} {}) not placed: {:?}",
            index, activity.title, activity.day, activity.start_time, reason
        );
    }

    GridLayout {
        days: document.week_days.clone(),
        rows,
        cells,
        unplaced,
    }
}
