use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::time::{self, TimeError};

/// The whole week: column labels, row labels and the activities placed on them.
///
/// Field order and the order inside `week_days`/`time_slots` are display order
/// and survive a serialize/deserialize round trip unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleDocument {
    #[serde(rename = "weekDays")]
    pub week_days: Vec<String>,
    #[serde(rename = "timeSlots")]
    pub time_slots: Vec<String>,
    pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub day: String,
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "endTime")]
    pub end_time: String,
    #[serde(default)]
    pub title: String,
    // Kept as free text; unknown kinds still render with the fallback color
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Activity {
    pub fn category(&self) -> Option<Category> {
        Category::parse(&self.kind)
    }

    pub fn duration_minutes(&self) -> Result<u32, TimeError> {
        time::duration(&self.start_time, &self.end_time)
    }

    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// "Team Meeting\n10:00 AM - 11:30 AM\nWeekly team sync"
    pub fn tooltip(&self) -> String {
        format!(
            "{}\n{} - {}\n{}",
            self.title,
            self.start_time,
            self.end_time,
            self.description_text()
        )
    }
}

/// Closed set of activity kinds used for coloring and statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    FreeTime,
    Busy,
    Meeting,
    Work,
    Personal,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::FreeTime,
        Category::Busy,
        Category::Meeting,
        Category::Work,
        Category::Personal,
    ];

    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            "free-time" => Some(Category::FreeTime),
            "busy" => Some(Category::Busy),
            "meeting" => Some(Category::Meeting),
            "work" => Some(Category::Work),
            "personal" => Some(Category::Personal),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::FreeTime => "free-time",
            Category::Busy => "busy",
            Category::Meeting => "meeting",
            Category::Work => "work",
            Category::Personal => "personal",
        }
    }

    /// Label used by the on-screen legend
    pub fn legend_label(self) -> &'static str {
        match self {
            Category::FreeTime => "Free Time",
            Category::Busy => "Busy / Occupied",
            Category::Meeting => "Meetings",
            Category::Work => "Work / Projects",
            Category::Personal => "Personal",
        }
    }

    /// Label used by the printed legend, where the panel is narrow
    pub fn short_label(self) -> &'static str {
        match self {
            Category::FreeTime => "Free Time",
            Category::Busy => "Busy",
            Category::Meeting => "Meeting",
            Category::Work => "Work",
            Category::Personal => "Personal",
        }
    }
}

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("schedule must be a JSON object")]
    NotAnObject,
    #[error("invalid JSON structure: missing `{0}` (must include weekDays, timeSlots, and activities)")]
    MissingField(&'static str),
    #[error("`{0}` must be an array")]
    NotAnArray(&'static str),
}

const REQUIRED_FIELDS: [&str; 3] = ["weekDays", "timeSlots", "activities"];

impl ScheduleDocument {
    /// Parse and structurally validate a document.
    ///
    /// Only the shape is checked: the three top-level arrays must be present.
    /// Day names, slot ordering and time labels are not validated here; the
    /// layout engine skips whatever it cannot place.
    pub fn from_json(text: &str) -> Result<Self, ScheduleError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let object = value.as_object().ok_or(ScheduleError::NotAnObject)?;

        for field in REQUIRED_FIELDS {
            match object.get(field) {
                None | Some(serde_json::Value::Null) => return Err(ScheduleError::MissingField(field)),
                Some(v) if !v.is_array() => return Err(ScheduleError::NotAnArray(field)),
                Some(_) => {}
            }
        }

        Ok(serde_json::from_value(value)?)
    }

    pub fn to_pretty_json(&self) -> Result<String, ScheduleError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn day_index(&self, day: &str) -> Option<usize> {
        self.week_days.iter().position(|d| d == day)
    }
}

impl Default for ScheduleDocument {
    /// Built-in week used when the configured source cannot be loaded.
    fn default() -> Self {
        let week_days = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];
        let time_slots = [
            "7:00 AM", "8:00 AM", "9:00 AM", "10:00 AM", "11:00 AM", "12:00 PM",
            "1:00 PM", "2:00 PM", "3:00 PM", "4:00 PM", "5:00 PM", "6:00 PM", "7:00 PM", "8:00 PM",
        ];
        let activity = |day: &str, start: &str, end: &str, title: &str, kind: &str, description: &str| Activity {
            day: day.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            title: title.to_string(),
            kind: kind.to_string(),
            description: Some(description.to_string()),
        };

        Self {
            week_days: week_days.iter().map(|d| d.to_string()).collect(),
            time_slots: time_slots.iter().map(|s| s.to_string()).collect(),
            activities: vec![
                activity("Monday", "9:00 AM", "12:00 PM", "Project Work", "work", "Working on the quarterly report"),
                activity("Monday", "1:00 PM", "4:00 PM", "Free Time", "free-time", "Available for meetings or personal tasks"),
                activity("Tuesday", "10:00 AM", "11:30 AM", "Team Meeting", "meeting", "Weekly team sync"),
                activity("Wednesday", "2:00 PM", "5:00 PM", "Client Presentation", "work", "Presenting Q3 results"),
                activity("Thursday", "7:00 AM", "9:00 AM", "Gym Session", "personal", "Morning workout"),
                activity("Friday", "3:00 PM", "6:00 PM", "Free Time", "free-time", "Open for scheduling"),
                activity("Saturday", "10:00 AM", "2:00 PM", "Family Time", "personal", "Weekend activities"),
                activity("Sunday", "7:00 PM", "8:00 PM", "Planning Session", "work", "Planning for next week"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_document_has_a_full_week() {
        let doc = ScheduleDocument::default();
        assert_eq!(doc.week_days.len(), 7);
        assert_eq!(doc.time_slots.first().map(String::as_str), Some("7:00 AM"));
        assert_eq!(doc.time_slots.last().map(String::as_str), Some("8:00 PM"));
        assert_eq!(doc.activities.len(), 8);
    }

    #[test]
    fn parses_camel_case_fields() {
        let json = r#"{
            "weekDays": ["Monday"],
            "timeSlots": ["9:00 AM"],
            "activities": [
                {"day": "Monday", "startTime": "9:00 AM", "endTime": "10:00 AM",
                 "title": "Standup", "type": "meeting", "description": "Daily"}
            ]
        }"#;
        let doc = ScheduleDocument::from_json(json).unwrap();
        let activity = &doc.activities[0];
        assert_eq!(activity.start_time, "9:00 AM");
        assert_eq!(activity.category(), Some(Category::Meeting));
        assert_eq!(activity.description_text(), "Daily");
    }

    #[test]
    fn missing_time_slots_is_rejected() {
        let json = r#"{"weekDays": ["Monday"], "activities": []}"#;
        let err = ScheduleDocument::from_json(json).unwrap_err();
        assert!(matches!(err, ScheduleError::MissingField("timeSlots")));
    }

    #[test]
    fn null_and_non_array_fields_are_rejected() {
        let null_days = r#"{"weekDays": null, "timeSlots": [], "activities": []}"#;
        assert!(matches!(
            ScheduleDocument::from_json(null_days),
            Err(ScheduleError::MissingField("weekDays"))
        ));

        let object_activities = r#"{"weekDays": [], "timeSlots": [], "activities": {}}"#;
        assert!(matches!(
            ScheduleDocument::from_json(object_activities),
            Err(ScheduleError::NotAnArray("activities"))
        ));
    }

    #[test]
    fn non_object_and_broken_json_are_rejected() {
        assert!(matches!(ScheduleDocument::from_json("[1, 2]"), Err(ScheduleError::NotAnObject)));
        assert!(matches!(ScheduleDocument::from_json("{ nope"), Err(ScheduleError::Json(_))));
    }

    #[test]
    fn unknown_kind_and_missing_description_are_tolerated() {
        let json = r#"{
            "weekDays": ["Monday"],
            "timeSlots": ["9:00 AM"],
            "activities": [{"day": "Monday", "startTime": "9:00 AM", "endTime": "10:00 AM", "type": "nap"}]
        }"#;
        let doc = ScheduleDocument::from_json(json).unwrap();
        assert_eq!(doc.activities[0].category(), None);
        assert_eq!(doc.activities[0].description, None);
        assert_eq!(doc.activities[0].title, "");
    }

    #[test]
    fn pretty_json_round_trips_in_order() {
        let doc = ScheduleDocument::default();
        let text = doc.to_pretty_json().unwrap();
        let back = ScheduleDocument::from_json(&text).unwrap();
        assert_eq!(back, doc);
        assert!(text.find("weekDays").unwrap() < text.find("timeSlots").unwrap());
    }

    #[test]
    fn category_strings_match_serde_names() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
    }

    #[test]
    fn tooltip_lists_title_range_and_description() {
        let doc = ScheduleDocument::default();
        assert_eq!(
            doc.activities[2].tooltip(),
            "Team Meeting\n10:00 AM - 11:30 AM\nWeekly team sync"
        );
    }
}
