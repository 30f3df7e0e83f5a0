//! # Reminder Time Parser
//!
//! Resolves free-text reminder times ("in 30 minutes", "tomorrow at 9:00 AM",
//! "10/08/25 2:30 PM", "14:30") against a reference instant.
//!
//! Patterns are tried in a fixed priority order and the first pattern whose
//! format matches decides the outcome. Whether the resolved instant lies in the
//! future is the caller's check, except for relative durations where a
//! non-positive amount is rejected here.
//!
//! - **Version**: 1.0.0
//! - **Since**: 1.0.0

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use log::debug;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Why a reminder time could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No pattern recognized the input
    #[error("unrecognized reminder time format")]
    Unparseable,
    /// Relative duration with a zero or negative amount ("in 0 minutes")
    #[error("relative reminder amount must be positive")]
    NonPositiveAmount,
}

/// Recognized reminder time shapes, in match priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimePattern {
    RelativeDuration,
    TomorrowBare,
    TomorrowAt,
    DateTimeWithYear,
    DateTimeNoYear,
    DateOnlyWithYear,
    DateOnlyNoYear,
    TimeOnly,
}

impl TimePattern {
    /// Every pattern in the order the dispatcher tries them
    pub const ORDERED: [TimePattern; 8] = [
        TimePattern::RelativeDuration,
        TimePattern::TomorrowBare,
        TimePattern::TomorrowAt,
        TimePattern::DateTimeWithYear,
        TimePattern::DateTimeNoYear,
        TimePattern::DateOnlyWithYear,
        TimePattern::DateOnlyNoYear,
        TimePattern::TimeOnly,
    ];

    /// Try this pattern against normalized (trimmed, lowercased) input.
    ///
    /// `None` means the format did not match and the next pattern should be tried.
    /// `Some(Err(..))` means the format matched but the value was rejected.
    pub fn try_match(
        self,
        text: &str,
        now: NaiveDateTime,
    ) -> Option<Result<NaiveDateTime, ParseError>> {
        match self {
            TimePattern::RelativeDuration => match_relative_duration(text, now),
            TimePattern::TomorrowBare => match_tomorrow_bare(text, now).map(Ok),
            TimePattern::TomorrowAt => match_tomorrow_at(text, now).map(Ok),
            TimePattern::DateTimeWithYear => match_date_time_with_year(text).map(Ok),
            TimePattern::DateTimeNoYear => match_date_time_no_year(text, now).map(Ok),
            TimePattern::DateOnlyWithYear => match_date_only_with_year(text, now).map(Ok),
            TimePattern::DateOnlyNoYear => match_date_only_no_year(text, now).map(Ok),
            TimePattern::TimeOnly => match_time_only(text, now).map(Ok),
        }
    }
}

/// Parse a reminder time relative to `now`.
pub fn parse_reminder_time(text: &str, now: NaiveDateTime) -> Result<NaiveDateTime, ParseError> {
    let normalized = text.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(ParseError::Unparseable);
    }

    for pattern in TimePattern::ORDERED {
        if let Some(result) = pattern.try_match(&normalized, now) {
            debug!("Reminder time {normalized:?} matched {pattern:?}: {result:?}");
            return result;
        }
    }

    Err(ParseError::Unparseable)
}

static RELATIVE_RE: OnceLock<Regex> = OnceLock::new();
static TOMORROW_AT_RE: OnceLock<Regex> = OnceLock::new();
static CLOCK_24_RE: OnceLock<Regex> = OnceLock::new();
static CLOCK_12_RE: OnceLock<Regex> = OnceLock::new();
static SLASH_DATE_RE: OnceLock<Regex> = OnceLock::new();
static DASH_DATE_RE: OnceLock<Regex> = OnceLock::new();
static ISO_DATE_RE: OnceLock<Regex> = OnceLock::new();
static MONTH_DAY_RE: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("reminder time pattern must compile"))
}

fn match_relative_duration(
    text: &str,
    now: NaiveDateTime,
) -> Option<Result<NaiveDateTime, ParseError>> {
    let re = compiled(
        &RELATIVE_RE,
        r"^in\s+(-?\d+)\s*(seconds?|secs?|s|minutes?|mins?|m|hours?|hrs?|h|days?|d)$",
    );
    let caps = re.captures(text)?;

    let Ok(amount) = caps[1].parse::<i64>() else {
        return Some(Err(ParseError::Unparseable));
    };
    if amount <= 0 {
        return Some(Err(ParseError::NonPositiveAmount));
    }

    let unit_seconds: i64 = match caps[2].as_bytes().first().copied() {
        Some(b's') => 1,
        Some(b'm') => 60,
        Some(b'h') => 60 * 60,
        _ => 24 * 60 * 60,
    };

    let resolved = amount
        .checked_mul(unit_seconds)
        .and_then(Duration::try_seconds)
        .and_then(|offset| now.checked_add_signed(offset));
    Some(resolved.ok_or(ParseError::Unparseable))
}

fn match_tomorrow_bare(text: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    if !matches!(text, "tomorrow" | "tmr" | "tmrw") {
        return None;
    }
    Some(truncate_to_minute(now + Duration::days(1)))
}

fn match_tomorrow_at(text: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let re = compiled(&TOMORROW_AT_RE, r"^tomorrow(?:\s+at)?\s+(.+)$");
    let caps = re.captures(text)?;
    let time = parse_clock(&caps[1])?;
    Some((now + Duration::days(1)).date().and_time(time))
}

fn match_date_time_with_year(text: &str) -> Option<NaiveDateTime> {
    let (date_part, time_part) = split_date_time(text)?;
    let date = parse_date_with_year(date_part)?;
    let time = parse_clock(time_part)?;
    Some(date.and_time(time))
}

fn match_date_time_no_year(text: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let (date_part, time_part) = split_date_time(text)?;
    let (month, day) = parse_month_day(date_part)?;
    let time = parse_clock(time_part)?;
    resolve_without_year(month, day, time, now)
}

fn match_date_only_with_year(text: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let date = parse_date_with_year(text)?;
    Some(date.and_time(hour_minute_of(now)))
}

fn match_date_only_no_year(text: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let (month, day) = parse_month_day(text)?;
    resolve_without_year(month, day, hour_minute_of(now), now)
}

fn match_time_only(text: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let time = parse_clock(text)?;
    let target = now.date().and_time(time);
    if target <= now {
        Some(target + Duration::days(1))
    } else {
        Some(target)
    }
}

/// Split "<date> <time>" at the first run of whitespace
fn split_date_time(text: &str) -> Option<(&str, &str)> {
    let (date_part, rest) = text.split_once(char::is_whitespace)?;
    let time_part = rest.trim_start();
    if time_part.is_empty() {
        return None;
    }
    Some((date_part, time_part))
}

/// Parse a clock time: 24-hour `H:MM`, or 12-hour `H:MM am`/`H:MMam`. A single minute digit is accepted.
fn parse_clock(text: &str) -> Option<NaiveTime> {
    let clock_24 = compiled(&CLOCK_24_RE, r"^(\d{1,2}):(\d{1,2})$");
    if let Some(caps) = clock_24.captures(text) {
        let hour: u32 = caps[1].parse().ok()?;
        let minute: u32 = caps[2].parse().ok()?;
        return NaiveTime::from_hms_opt(hour, minute, 0);
    }

    let clock_12 = compiled(&CLOCK_12_RE, r"^(\d{1,2}):(\d{1,2})\s*([ap]m)$");
    let caps = clock_12.captures(text)?;
    let hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;
    if !(1..=12).contains(&hour) {
        return None;
    }
    let hour = match &caps[3] {
        "pm" => hour % 12 + 12,
        _ => hour % 12,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Parse `M/D/YYYY`, `M-D-YYYY`, `M/D/YY`, `M-D-YY` or `YYYY-M-D`
fn parse_date_with_year(text: &str) -> Option<NaiveDate> {
    let slash = compiled(&SLASH_DATE_RE, r"^(\d{1,2})/(\d{1,2})/(\d{4}|\d{2})$");
    let dash = compiled(&DASH_DATE_RE, r"^(\d{1,2})-(\d{1,2})-(\d{4}|\d{2})$");

    if let Some(caps) = slash.captures(text).or_else(|| dash.captures(text)) {
        let month: u32 = caps[1].parse().ok()?;
        let day: u32 = caps[2].parse().ok()?;
        let year = expand_year(&caps[3])?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    let iso = compiled(&ISO_DATE_RE, r"^(\d{4})-(\d{1,2})-(\d{1,2})$");
    let caps = iso.captures(text)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Two-digit years always land in 2000-2099
fn expand_year(digits: &str) -> Option<i32> {
    let year: i32 = digits.parse().ok()?;
    if digits.len() == 2 {
        Some(2000 + year)
    } else {
        Some(year)
    }
}

/// Parse `M/D` or `M-D`; Feb 29 is accepted since the year is not known yet
fn parse_month_day(text: &str) -> Option<(u32, u32)> {
    let re = compiled(&MONTH_DAY_RE, r"^(\d{1,2})[/-](\d{1,2})$");
    let caps = re.captures(text)?;
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    // 2000 is a leap year, so this accepts every real month/day pair.
    NaiveDate::from_ymd_opt(2000, month, day)?;
    Some((month, day))
}

/// Place month/day in `year`, mapping Feb 29 to Feb 28 outside leap years
fn date_in_year(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).or_else(|| {
        if month == 2 && day == 29 {
            NaiveDate::from_ymd_opt(year, 2, 28)
        } else {
            None
        }
    })
}

/// Use `now`'s year, rolling forward exactly one year if not strictly after `now`
fn resolve_without_year(
    month: u32,
    day: u32,
    time: NaiveTime,
    now: NaiveDateTime,
) -> Option<NaiveDateTime> {
    let target = date_in_year(now.year(), month, day)?.and_time(time);
    if target > now {
        return Some(target);
    }
    Some(date_in_year(now.year() + 1, month, day)?.and_time(time))
}

fn hour_minute_of(now: NaiveDateTime) -> NaiveTime {
    NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or(now.time())
}

fn truncate_to_minute(instant: NaiveDateTime) -> NaiveDateTime {
    instant.date().and_time(hour_minute_of(instant))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_relative_durations() {
        let now = at(2025, 3, 10, 9, 0, 17);
        assert_eq!(
            parse_reminder_time("in 30 minutes", now),
            Ok(now + Duration::minutes(30))
        );
        assert_eq!(parse_reminder_time("in 45s", now), Ok(now + Duration::seconds(45)));
        assert_eq!(parse_reminder_time("in 2 hrs", now), Ok(now + Duration::hours(2)));
        assert_eq!(parse_reminder_time("in 1 day", now), Ok(now + Duration::days(1)));
        assert_eq!(parse_reminder_time("In 3 D", now), Ok(now + Duration::days(3)));
        assert_eq!(parse_reminder_time("in 5min", now), Ok(now + Duration::minutes(5)));
        assert_eq!(parse_reminder_time("in 10 secs", now), Ok(now + Duration::seconds(10)));
    }

    #[test]
    fn test_relative_non_positive_amount() {
        let now = at(2025, 3, 10, 9, 0, 0);
        assert_eq!(
            parse_reminder_time("in 0 minutes", now),
            Err(ParseError::NonPositiveAmount)
        );
        assert_eq!(
            parse_reminder_time("in -5 m", now),
            Err(ParseError::NonPositiveAmount)
        );
    }

    #[test]
    fn test_relative_overflow_is_unparseable() {
        let now = at(2025, 3, 10, 9, 0, 0);
        assert_eq!(
            parse_reminder_time("in 99999999999999999999 days", now),
            Err(ParseError::Unparseable)
        );
        assert_eq!(
            parse_reminder_time("in 9999999999999 days", now),
            Err(ParseError::Unparseable)
        );
    }

    #[test]
    fn test_tomorrow_bare_zeroes_seconds() {
        let now = at(2025, 3, 10, 9, 41, 33) + Duration::microseconds(250);
        let expected = at(2025, 3, 11, 9, 41, 0);
        assert_eq!(parse_reminder_time("tomorrow", now), Ok(expected));
        assert_eq!(parse_reminder_time("TMR", now), Ok(expected));
        assert_eq!(parse_reminder_time("  tmrw ", now), Ok(expected));
    }

    #[test]
    fn test_tomorrow_at_time() {
        let now = at(2025, 12, 31, 22, 15, 5);
        assert_eq!(
            parse_reminder_time("tomorrow at 9:00 AM", now),
            Ok(at(2026, 1, 1, 9, 0, 0))
        );
        assert_eq!(
            parse_reminder_time("tomorrow 21:30", now),
            Ok(at(2026, 1, 1, 21, 30, 0))
        );
        assert_eq!(
            parse_reminder_time("tomorrow at 12:15pm", now),
            Ok(at(2026, 1, 1, 12, 15, 0))
        );
    }

    #[test]
    fn test_tomorrow_with_bad_time_falls_through() {
        let now = at(2025, 3, 10, 9, 0, 0);
        assert_eq!(TimePattern::TomorrowAt.try_match("tomorrow at noon", now), None);
        assert_eq!(
            parse_reminder_time("tomorrow at noon", now),
            Err(ParseError::Unparseable)
        );
    }

    #[test]
    fn test_date_time_with_two_digit_year() {
        let now = at(2030, 1, 1, 0, 0, 0);
        assert_eq!(
            parse_reminder_time("10/08/25 2:30 PM", now),
            Ok(at(2025, 10, 8, 14, 30, 0))
        );
        assert_eq!(
            parse_reminder_time("10-08-99 2:30pm", now),
            Ok(at(2099, 10, 8, 14, 30, 0))
        );
    }

    #[test]
    fn test_date_time_with_year_formats() {
        let now = at(2025, 3, 10, 9, 0, 0);
        assert_eq!(
            parse_reminder_time("10/08/2025 14:30", now),
            Ok(at(2025, 10, 8, 14, 30, 0))
        );
        assert_eq!(
            parse_reminder_time("2025-10-08 14:30", now),
            Ok(at(2025, 10, 8, 14, 30, 0))
        );
        assert_eq!(
            parse_reminder_time("2025-10-08 2:30 am", now),
            Ok(at(2025, 10, 8, 2, 30, 0))
        );
        assert_eq!(
            parse_reminder_time("10-08-2025 12:00 AM", now),
            Ok(at(2025, 10, 8, 0, 0, 0))
        );
    }

    #[test]
    fn test_explicit_past_year_is_not_rolled() {
        let now = at(2025, 3, 10, 9, 0, 0);
        assert_eq!(
            parse_reminder_time("01/01/2020 10:00", now),
            Ok(at(2020, 1, 1, 10, 0, 0))
        );
        assert_eq!(
            parse_reminder_time("01/01/2020", now),
            Ok(at(2020, 1, 1, 9, 0, 0))
        );
    }

    #[test]
    fn test_date_time_without_year_rolls_forward() {
        let now = at(2025, 6, 1, 12, 0, 0);
        assert_eq!(
            parse_reminder_time("10/08 14:30", now),
            Ok(at(2025, 10, 8, 14, 30, 0))
        );
        assert_eq!(
            parse_reminder_time("03-01 8:00 am", now),
            Ok(at(2026, 3, 1, 8, 0, 0))
        );
        // Same day and time as now is not strictly after now.
        assert_eq!(
            parse_reminder_time("6/1 12:00", now),
            Ok(at(2026, 6, 1, 12, 0, 0))
        );
    }

    #[test]
    fn test_date_only_with_year_uses_current_clock() {
        let now = at(2025, 3, 10, 9, 41, 59);
        assert_eq!(
            parse_reminder_time("10/08/2025", now),
            Ok(at(2025, 10, 8, 9, 41, 0))
        );
        assert_eq!(
            parse_reminder_time("2026-1-2", now),
            Ok(at(2026, 1, 2, 9, 41, 0))
        );
        assert_eq!(
            parse_reminder_time("10-08-26", now),
            Ok(at(2026, 10, 8, 9, 41, 0))
        );
    }

    #[test]
    fn test_date_only_without_year_rolls_forward() {
        let now = at(2025, 6, 1, 8, 5, 30);
        assert_eq!(
            parse_reminder_time("01/01", now),
            Ok(at(2026, 1, 1, 8, 5, 0))
        );
        assert_eq!(
            parse_reminder_time("12-25", now),
            Ok(at(2025, 12, 25, 8, 5, 0))
        );
    }

    #[test]
    fn test_leap_day_rolls_to_feb_28() {
        let now = at(2024, 3, 1, 10, 0, 0);
        assert_eq!(
            parse_reminder_time("02/29", now),
            Ok(at(2025, 2, 28, 10, 0, 0))
        );
        assert_eq!(
            parse_reminder_time("2/29 7:00", now),
            Ok(at(2025, 2, 28, 7, 0, 0))
        );

        // Current-year candidate in a non-leap year
        let early_2025 = at(2025, 1, 10, 9, 0, 0);
        assert_eq!(
            parse_reminder_time("02/29", early_2025),
            Ok(at(2025, 2, 28, 9, 0, 0))
        );

        let before_leap_day = at(2024, 2, 1, 10, 0, 0);
        assert_eq!(
            parse_reminder_time("02/29", before_leap_day),
            Ok(at(2024, 2, 29, 10, 0, 0))
        );
    }

    #[test]
    fn test_time_only_today_or_tomorrow() {
        let morning = at(2025, 3, 10, 9, 0, 0);
        assert_eq!(
            parse_reminder_time("2:30 PM", morning),
            Ok(at(2025, 3, 10, 14, 30, 0))
        );

        let afternoon = at(2025, 3, 10, 15, 0, 0);
        assert_eq!(
            parse_reminder_time("2:30 PM", afternoon),
            Ok(at(2025, 3, 11, 14, 30, 0))
        );
        assert_eq!(
            parse_reminder_time("15:00", afternoon),
            Ok(at(2025, 3, 11, 15, 0, 0))
        );
        assert_eq!(
            parse_reminder_time("23:59", afternoon),
            Ok(at(2025, 3, 10, 23, 59, 0))
        );
    }

    #[test]
    fn test_unparseable_inputs() {
        let now = at(2025, 3, 10, 9, 0, 0);
        for input in [
            "",
            "   ",
            "next week",
            "in five minutes",
            "in 5 fortnights",
            "25:00",
            "13:00 pm",
            "0:30 am",
            "13/45",
            "02/30/2025",
            "10/08/2025 noon",
            "in 5 minutes please",
        ] {
            assert_eq!(
                parse_reminder_time(input, now),
                Err(ParseError::Unparseable),
                "input {input:?}"
            );
        }
    }

    #[test]
    fn test_patterns_match_independently() {
        let now = at(2025, 3, 10, 9, 0, 0);
        assert!(TimePattern::RelativeDuration.try_match("in 5 m", now).is_some());
        assert!(TimePattern::RelativeDuration.try_match("14:30", now).is_none());
        assert!(TimePattern::DateOnlyNoYear.try_match("10/08", now).is_some());
        assert!(TimePattern::DateOnlyNoYear.try_match("10/08/2025", now).is_none());
        assert!(TimePattern::DateTimeWithYear.try_match("10/08 14:30", now).is_none());
        assert!(TimePattern::TimeOnly.try_match("2:30pm", now).is_some());
    }

    #[test]
    fn test_parse_clock_meridiem() {
        assert_eq!(parse_clock("12:00 am"), NaiveTime::from_hms_opt(0, 0, 0));
        assert_eq!(parse_clock("12:00 pm"), NaiveTime::from_hms_opt(12, 0, 0));
        assert_eq!(parse_clock("1:05pm"), NaiveTime::from_hms_opt(13, 5, 0));
        assert_eq!(parse_clock("0:30"), NaiveTime::from_hms_opt(0, 30, 0));
        assert_eq!(parse_clock("1:5 pm"), NaiveTime::from_hms_opt(13, 5, 0));
        assert_eq!(parse_clock("9:5"), NaiveTime::from_hms_opt(9, 5, 0));
        assert_eq!(parse_clock("9:60"), None);
        assert_eq!(parse_clock("9:123"), None);
    }
}
