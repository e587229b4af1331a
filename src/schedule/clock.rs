//! Locate the "now" cell of the grid.

use chrono::{NaiveDateTime, Timelike};

use super::time::parse_time;
use super::types::ScheduleDocument;

/// A slot matches when it lies strictly less than this many minutes away
/// from the current time, in either direction.
pub const NOW_TOLERANCE_MINUTES: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NowCell {
    pub day: usize,
    pub slot: usize,
}

/// Find the column named `weekday` and the first slot (in display order)
/// within [`NOW_TOLERANCE_MINUTES`] of `minutes`.
///
/// This is a tolerance window, not "nearest slot": with hourly slots, 9:40
/// matches the 9:00 row because it comes first, even though 10:00 is closer.
pub fn locate(document: &ScheduleDocument, weekday: &str, minutes: u32) -> Option<NowCell> {
    let day = document.day_index(weekday)?;
    let slot = document.time_slots.iter().position(|label| {
        parse_time(label)
            .map(|slot_minutes| slot_minutes.abs_diff(minutes) < NOW_TOLERANCE_MINUTES)
            .unwrap_or(false)
    })?;
    Some(NowCell { day, slot })
}

/// [`locate`] for a wall-clock reading; the weekday is matched by its full
/// English name ("Monday").
pub fn locate_at(document: &ScheduleDocument, now: NaiveDateTime) -> Option<NowCell> {
    let weekday = now.format("%A").to_string();
    let minutes = now.hour() * 60 + now.minute();
    locate(document, &weekday, minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn exact_slot_boundary_matches_that_slot() {
        let doc = ScheduleDocument::default();
        // 2025-01-07 is a Tuesday
        let cell = locate_at(&doc, at(2025, 1, 7, 10, 0)).unwrap();
        assert_eq!(cell, NowCell { day: 1, slot: 3 });
    }

    #[test]
    fn first_slot_inside_window_wins_over_nearest() {
        let doc = ScheduleDocument::default();
        // 9:40 is within 60 minutes of both 9:00 and 10:00; 9:00 comes first.
        let cell = locate(&doc, "Monday", 9 * 60 + 40).unwrap();
        assert_eq!(doc.time_slots[cell.slot], "9:00 AM");
    }

    #[test]
    fn time_before_first_slot_can_still_match() {
        let doc = ScheduleDocument::default();
        let cell = locate(&doc, "Monday", 6 * 60 + 30).unwrap();
        assert_eq!(cell.slot, 0);
    }

    #[test]
    fn no_match_outside_the_window() {
        let doc = ScheduleDocument::default();
        assert_eq!(locate(&doc, "Monday", 3 * 60), None);
        assert_eq!(locate(&doc, "Monday", 21 * 60), None);
    }

    #[test]
    fn no_match_when_today_is_not_listed() {
        let mut doc = ScheduleDocument::default();
        doc.week_days.retain(|d| d != "Sunday");
        // 2025-01-05 is a Sunday
        assert_eq!(locate_at(&doc, at(2025, 1, 5, 10, 0)), None);
    }

    #[test]
    fn malformed_slots_are_skipped() {
        let mut doc = ScheduleDocument::default();
        doc.time_slots[0] = "seven".to_string();
        let cell = locate(&doc, "Monday", 7 * 60 + 30).unwrap();
        assert_eq!(doc.time_slots[cell.slot], "8:00 AM");
    }
}
