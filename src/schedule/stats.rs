use std::collections::BTreeMap;

use super::types::{Activity, Category};

/// Hour totals for a set of activities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    /// Every activity counts here, whatever its kind.
    pub total_hours: f64,
    /// Only activities with a known [`Category`].
    pub per_category_hours: BTreeMap<Category, f64>,
    /// Activities per known category.
    pub per_category_count: BTreeMap<Category, usize>,
    pub count: usize,
}

impl Statistics {
    pub fn hours(&self, category: Category) -> f64 {
        self.per_category_hours.get(&category).copied().unwrap_or(0.0)
    }

    /// Share of free time in the total, 0 when nothing is scheduled.
    pub fn free_time_percentage(&self) -> f64 {
        if self.total_hours > 0.0 {
            self.hours(Category::FreeTime) / self.total_hours * 100.0
        } else {
            0.0
        }
    }
}

/// Reduce activities to totals. Activities with unparsable times contribute
/// zero hours but are still counted.
pub fn aggregate(activities: &[Activity]) -> Statistics {
    let mut stats = Statistics {
        count: activities.len(),
        ..Statistics::default()
    };

    for activity in activities {
        let hours = activity.duration_minutes().unwrap_or(0) as f64 / 60.0;
        stats.total_hours += hours;

        if let Some(category) = activity.category() {
            *stats.per_category_hours.entry(category).or_insert(0.0) += hours;
            *stats.per_category_count.entry(category).or_insert(0) += 1;
        }
    }

    stats
}

/// One decimal place, as shown in every hour figure.
pub fn format_hours(hours: f64) -> String {
    format!("{:.1}", hours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::types::ScheduleDocument;

    #[test]
    fn default_week_totals() {
        let doc = ScheduleDocument::default();
        let stats = aggregate(&doc.activities);

        let total_minutes: u32 = doc.activities.iter().map(|a| a.duration_minutes().unwrap()).sum();
        assert_eq!(stats.total_hours, total_minutes as f64 / 60.0);
        assert_eq!(stats.total_hours, 20.5);

        let work_minutes: u32 = doc
            .activities
            .iter()
            .filter(|a| a.kind == "work")
            .map(|a| a.duration_minutes().unwrap())
            .sum();
        assert_eq!(stats.hours(Category::Work), work_minutes as f64 / 60.0);
        assert_eq!(stats.hours(Category::Work), 7.0);
        assert_eq!(stats.hours(Category::FreeTime), 6.0);
        assert_eq!(stats.hours(Category::Meeting), 1.5);
        assert_eq!(stats.hours(Category::Busy), 0.0);
        assert_eq!(stats.count, 8);
        assert_eq!(stats.per_category_count.get(&Category::Personal), Some(&2));
    }

    #[test]
    fn unknown_kinds_only_count_toward_total() {
        let mut doc = ScheduleDocument::default();
        doc.activities.truncate(1);
        doc.activities[0].kind = "nap".to_string();
        let stats = aggregate(&doc.activities);
        assert_eq!(stats.total_hours, 3.0);
        assert!(stats.per_category_hours.is_empty());
        assert_eq!(stats.count, 1);
    }

    #[test]
    fn empty_schedule_has_zero_percentage() {
        let stats = aggregate(&[]);
        assert_eq!(stats.total_hours, 0.0);
        assert_eq!(stats.free_time_percentage(), 0.0);
        assert_eq!(format_hours(stats.total_hours), "0.0");
    }

    #[test]
    fn free_time_percentage_of_default_week() {
        let stats = aggregate(&ScheduleDocument::default().activities);
        assert_eq!(format!("{:.1}", stats.free_time_percentage()), "29.3");
    }

    #[test]
    fn malformed_activity_counts_but_adds_no_hours() {
        let mut doc = ScheduleDocument::default();
        doc.activities.truncate(2);
        doc.activities[1].end_time = "later".to_string();
        let stats = aggregate(&doc.activities);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.total_hours, 3.0);
    }
}
