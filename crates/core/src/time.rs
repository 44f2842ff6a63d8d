//! Business-day arithmetic and Jira-flavored duration formatting
//!
//! Pure helpers used by the checks that reason about elapsed time. Business
//! days are Mon-Fri; public holidays are not considered.

use chrono::{DateTime, Datelike, Days, Months, Utc, Weekday};

/// Seconds in a Jira working day (Jira tracks time against a 7 hour day).
pub const JIRA_DAY_SECONDS: i64 = 7 * 60 * 60;

/// Seconds in an hour.
pub const HOUR_SECONDS: i64 = 60 * 60;

/// Seconds in a minute.
pub const MINUTE_SECONDS: i64 = 60;

/// A broken-down duration, as rendered by [`format_duration`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Duration {
    pub years: i64,
    pub months: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
}

fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}

/// Returns the instant `n` business days before `date`.
///
/// Weekend days are skipped while stepping backwards; the time of day is
/// preserved.
pub fn subtract_business_days(date: DateTime<Utc>, n: u32) -> DateTime<Utc> {
    let mut current = date;
    for _ in 0..n {
        current = current - Days::new(1);
        while is_weekend(current.weekday()) {
            current = current - Days::new(1);
        }
    }
    current
}

/// Signed count of business days between two instants.
///
/// Positive when `a` is after `b`, negative when `a` is before `b`, zero when
/// both fall on the same calendar day.
pub fn difference_in_business_days(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    if a < b {
        return -difference_in_business_days(b, a);
    }

    let mut count = 0;
    let mut day = b.date_naive();
    let end = a.date_naive();
    while day < end {
        day = day + Days::new(1);
        if !is_weekend(day.weekday()) {
            count += 1;
        }
    }
    count
}

/// Signed count of calendar months between two instants.
///
/// Positive when `a` is after `b`. Only the year and month components are
/// compared, matching calendar-month semantics.
pub fn difference_in_calendar_months(a: DateTime<Utc>, b: DateTime<Utc>) -> i64 {
    let years = i64::from(a.year()) - i64::from(b.year());
    let months = i64::from(a.month() as i32) - i64::from(b.month() as i32);
    years * 12 + months
}

/// Renders a duration using the cascading unit rule.
///
/// If years are present, show years, months and days. Otherwise if months are
/// present, show months, days and hours. Otherwise show days, hours and
/// minutes. Zero-valued units are omitted. Months and minutes both render
/// with the letter `m`; they never appear in the same cascade branch.
pub fn format_duration(duration: &Duration) -> String {
    let parts: [(i64, &str); 3] = if duration.years > 0 {
        [
            (duration.years, "y"),
            (duration.months, "m"),
            (duration.days, "d"),
        ]
    } else if duration.months > 0 {
        [
            (duration.months, "m"),
            (duration.days, "d"),
            (duration.hours, "h"),
        ]
    } else {
        [
            (duration.days, "d"),
            (duration.hours, "h"),
            (duration.minutes, "m"),
        ]
    };

    let mut output = String::new();
    for (value, unit) in parts {
        if value > 0 {
            output.push_str(&format!("{value}{unit} "));
        }
    }
    output.trim_end().to_string()
}

/// Renders a raw second count as a Jira-style duration string.
///
/// Days are Jira days of 7 hours; the remainder cascades greedily into hours
/// and minutes.
pub fn format_seconds_as_jira_duration(seconds: i64) -> String {
    let days = seconds / JIRA_DAY_SECONDS;
    let remainder = seconds % JIRA_DAY_SECONDS;
    let hours = remainder / HOUR_SECONDS;
    let minutes = (remainder % HOUR_SECONDS) / MINUTE_SECONDS;

    format_duration(&Duration {
        days,
        hours,
        minutes,
        ..Duration::default()
    })
}

/// Human-readable duration between two instants.
pub fn format_distance(from: DateTime<Utc>, to: DateTime<Utc>) -> String {
    let (start, end) = if from <= to { (from, to) } else { (to, from) };

    // Whole calendar months first, then the day/hour/minute remainder from
    // the month-aligned anchor.
    let mut total_months = difference_in_calendar_months(end, start);
    if total_months > 0 {
        let anchored = start
            .checked_add_months(Months::new(total_months as u32))
            .unwrap_or(start);
        if anchored > end {
            total_months -= 1;
        }
    }
    let anchor = start
        .checked_add_months(Months::new(total_months.max(0) as u32))
        .unwrap_or(start);

    let rest = end - anchor;
    let days = rest.num_days();
    let hours = rest.num_hours() - days * 24;
    let minutes = rest.num_minutes() - rest.num_hours() * 60;

    format_duration(&Duration {
        years: total_months / 12,
        months: total_months % 12,
        days,
        hours,
        minutes,
    })
}

/// Parses a Jira timestamp string into a UTC instant.
///
/// Jira renders timestamps as `2024-01-02T10:00:00.000+0000`; RFC 3339 is
/// accepted as a fallback. Unparseable values yield `None` so that callers
/// stay total.
pub fn parse_jira_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.3f%z")
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Parses a Jira due date (`YYYY-MM-DD`) as midnight UTC.
pub fn parse_jira_date(value: &str) -> Option<DateTime<Utc>> {
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
