//! Human-readable durations and reminder times for Discord replies.

use chrono::{Duration, NaiveDateTime};

/// Format a duration as its largest whole unit, e.g. "1 minute", "3 days".
///
/// Negative durations are shown as "0 seconds".
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);

    let (value, unit) = if total_seconds < 60 {
        (total_seconds, "second")
    } else if total_seconds < 3600 {
        (total_seconds / 60, "minute")
    } else if total_seconds < 86400 {
        (total_seconds / 3600, "hour")
    } else {
        (total_seconds / 86400, "day")
    };

    let suffix = if value == 1 { "" } else { "s" };
    format!("{value} {unit}{suffix}")
}

/// Long form used in confirmations: "Monday, Mar 10, 2025 at 02:30 PM"
pub fn format_due_time(instant: NaiveDateTime) -> String {
    instant.format("%A, %b %d, %Y at %I:%M %p").to_string()
}

/// Short form used in embeds and listings: "03/10/2025 14:30"
pub fn format_short_time(instant: NaiveDateTime) -> String {
    instant.format("%m/%d/%Y %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::seconds(0)), "0 seconds");
        assert_eq!(format_duration(Duration::seconds(1)), "1 second");
        assert_eq!(format_duration(Duration::seconds(59)), "59 seconds");
        assert_eq!(format_duration(Duration::seconds(60)), "1 minute");
        assert_eq!(format_duration(Duration::seconds(3599)), "59 minutes");
        assert_eq!(format_duration(Duration::hours(1)), "1 hour");
        assert_eq!(format_duration(Duration::minutes(150)), "2 hours");
        assert_eq!(format_duration(Duration::days(1)), "1 day");
        assert_eq!(format_duration(Duration::days(12)), "12 days");
    }

    #[test]
    fn test_format_duration_negative_clamps() {
        assert_eq!(format_duration(Duration::minutes(-5)), "0 seconds");
    }

    #[test]
    fn test_format_times() {
        let instant = NaiveDate::from_ymd_opt(2025, 3, 10)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(format_due_time(instant), "Monday, Mar 10, 2025 at 02:30 PM");
        assert_eq!(format_short_time(instant), "03/10/2025 14:30");
    }
}
