use chrono::{DateTime, Local};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// Render an RFC3339 server timestamp as a rough age ("3 days ago"). Falls
/// back to the raw string when it doesn't parse.
pub fn format_age(time: &str) -> String {
    match DateTime::parse_from_rfc3339(time) {
        Ok(parsed) => format_since(parsed.timestamp()),
        Err(_) => time.to_string(),
    }
}

pub fn format_since(timestamp: i64) -> String {
    let now = Local::now().timestamp();
    let duration = now.saturating_sub(timestamp);
    if duration < 30 {
        return String::from("now");
    }

    let (value, unit) = if duration < MINUTE {
        (duration, "second")
    } else if duration < HOUR {
        (duration / MINUTE, "minute")
    } else if duration < DAY {
        (duration / HOUR, "hour")
    } else if duration < WEEK {
        (duration / DAY, "day")
    } else if duration < MONTH {
        (duration / WEEK, "week")
    } else if duration < YEAR {
        (duration / MONTH, "month")
    } else {
        (duration / YEAR, "year")
    };

    if value > 1 {
        format!("{value} {unit}s ago")
    } else {
        format!("last {unit}")
    }
}
