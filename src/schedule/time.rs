//! Time parsing and formatting for 12-hour slot labels like "9:00 AM"

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("time label `{0}` is not of the form `H:MM AM` or `H:MM PM`")]
    Malformed(String),
    #[error("hour {hour} in `{label}` is outside 1..=12")]
    HourOutOfRange { label: String, hour: u32 },
    #[error("minute {minute} in `{label}` is outside 0..=59")]
    MinuteOutOfRange { label: String, minute: u32 },
}

/// Parse a label like "9:00 AM" or "12:30 PM" into minutes since midnight.
///
/// 12 AM is midnight (0), 12 PM is noon (720). Minutes must be two digits.
pub fn parse_time(label: &str) -> Result<u32, TimeError> {
    let malformed = || TimeError::Malformed(label.to_string());

    let mut parts = label.split_whitespace();
    let (Some(clock), Some(meridiem), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(malformed());
    };

    let is_pm = match meridiem {
        "AM" => false,
        "PM" => true,
        _ => return Err(malformed()),
    };

    let (hour_str, minute_str) = clock.split_once(':').ok_or_else(malformed)?;
    if hour_str.is_empty()
        || hour_str.len() > 2
        || minute_str.len() != 2
        || !hour_str.bytes().all(|b| b.is_ascii_digit())
        || !minute_str.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(malformed());
    }

    let hour: u32 = hour_str.parse().map_err(|_| malformed())?;
    let minute: u32 = minute_str.parse().map_err(|_| malformed())?;

    if !(1..=12).contains(&hour) {
        return Err(TimeError::HourOutOfRange { label: label.to_string(), hour });
    }
    if minute > 59 {
        return Err(TimeError::MinuteOutOfRange { label: label.to_string(), minute });
    }

    let hour_24 = match (hour, is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };

    Ok(hour_24 * 60 + minute)
}

/// Format a 24-hour clock reading back into a canonical label ("9:05 AM").
/// Hours past 23 wrap around the day.
pub fn format_time(hour_24: u32, minute: u32) -> String {
    let hour_24 = hour_24 % 24;
    let meridiem = if hour_24 >= 12 { "PM" } else { "AM" };
    let display_hour = match hour_24 % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", display_hour, minute, meridiem)
}

/// Format minutes since midnight as a canonical label.
pub fn format_minutes(minutes: u32) -> String {
    format_time(minutes / 60, minutes % 60)
}

/// Minutes from `start` to `end`, clamped at zero when `end` is not after `start`.
pub fn duration(start: &str, end: &str) -> Result<u32, TimeError> {
    let start = parse_time(start)?;
    let end = parse_time(end)?;
    Ok(end.saturating_sub(start))
}

/// Compact "9:00AM-12:00PM" range used where horizontal room is scarce.
pub fn compact_range(start: &str, end: &str) -> String {
    format!("{}-{}", start.replace(' ', ""), end.replace(' ', ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    // parsed labels are always below this
    const MINUTES_PER_DAY: u32 = 24 * 60;

    #[test]
    fn parses_morning_and_afternoon_labels() {
        assert_eq!(parse_time("7:00 AM"), Ok(420));
        assert_eq!(parse_time("10:30 AM"), Ok(630));
        assert_eq!(parse_time("1:15 PM"), Ok(795));
        assert_eq!(parse_time("8:00 PM"), Ok(1200));
    }

    #[test]
    fn twelve_oclock_is_normalized() {
        assert_eq!(parse_time("12:00 AM"), Ok(0));
        assert_eq!(parse_time("12:45 AM"), Ok(45));
        assert_eq!(parse_time("12:00 PM"), Ok(720));
        assert_eq!(parse_time("11:59 PM"), Ok(MINUTES_PER_DAY - 1));
    }

    #[test]
    fn rejects_malformed_labels() {
        for label in ["", "9:00", "9 AM", "9:0 AM", "9:000 AM", "nine:00 AM", "9:00 am", "9:00 AM extra", "9:-1 AM"] {
            assert!(
                matches!(parse_time(label), Err(TimeError::Malformed(_))),
                "expected `{label}` to be malformed"
            );
        }
    }

    #[test]
    fn rejects_out_of_range_components() {
        assert!(matches!(parse_time("0:30 AM"), Err(TimeError::HourOutOfRange { hour: 0, .. })));
        assert!(matches!(parse_time("13:00 PM"), Err(TimeError::HourOutOfRange { hour: 13, .. })));
        assert!(matches!(parse_time("9:60 AM"), Err(TimeError::MinuteOutOfRange { minute: 60, .. })));
    }

    #[test]
    fn format_renders_midnight_and_noon_as_twelve() {
        assert_eq!(format_time(0, 0), "12:00 AM");
        assert_eq!(format_time(12, 0), "12:00 PM");
        assert_eq!(format_time(9, 5), "9:05 AM");
        assert_eq!(format_time(23, 59), "11:59 PM");
    }

    #[test]
    fn canonical_labels_survive_parse_and_format() {
        for minutes in (0..MINUTES_PER_DAY).step_by(7) {
            let label = format_minutes(minutes);
            let parsed = parse_time(&label).unwrap();
            assert_eq!(parsed, minutes);
            assert_eq!(format_time(parsed / 60, parsed % 60), label);
        }
    }

    #[test]
    fn duration_is_end_minus_start() {
        assert_eq!(duration("9:00 AM", "12:00 PM"), Ok(180));
        assert_eq!(duration("10:00 AM", "11:30 AM"), Ok(90));
    }

    #[test]
    fn duration_clamps_when_end_precedes_start() {
        assert_eq!(duration("11:00 PM", "12:00 AM"), Ok(0));
        assert_eq!(duration("3:00 PM", "3:00 PM"), Ok(0));
    }

    #[test]
    fn duration_propagates_label_errors() {
        assert!(duration("9:00 AM", "noon").is_err());
    }

    #[test]
    fn compact_range_drops_spaces() {
        assert_eq!(compact_range("9:00 AM", "12:00 PM"), "9:00AM-12:00PM");
    }
}
