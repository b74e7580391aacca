//! Coarse, human-readable relative times ("3 days ago").

use chrono::{DateTime, TimeDelta, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

fn pluralize(count: i64, singular: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}s", count, singular)
    }
}

/// Render `delta` relative to `source` (default: now).
///
/// A positive delta lies in the past (`"2 hours ago"`), a negative one in the
/// future (`"1 week, 3 days from now"`). At most two adjacent units are shown,
/// following the chain years+months, months, weeks+days, days, hours,
/// minutes. Anything under a minute is `"now"`.
///
/// # Arguments
/// - `delta`: Elapsed time between the event and `source`.
/// - `source`: Reference instant; `None` uses the current time.
pub fn natural_time(delta: TimeDelta, source: Option<DateTime<Utc>>) -> String {
    let now = source.unwrap_or_else(Utc::now);
    let future = now - delta > now;

    // Round to the nearest whole second.
    let millis = delta.num_milliseconds().abs();
    let mut seconds = (millis + 500) / 1000;

    if seconds < MINUTE {
        return "now".to_string();
    }

    let years = seconds / YEAR;
    seconds %= YEAR;
    let months = seconds / MONTH;
    seconds %= MONTH;
    let weeks = seconds / WEEK;
    seconds %= WEEK;
    let days = seconds / DAY;
    seconds %= DAY;
    let hours = seconds / HOUR;
    seconds %= HOUR;
    let minutes = seconds / MINUTE;

    let mut parts: Vec<String> = Vec::with_capacity(2);
    if years > 0 {
        parts.push(pluralize(years, "year"));
        if months > 0 {
            parts.push(pluralize(months, "month"));
        }
    } else if months > 0 {
        parts.push(pluralize(months, "month"));
    } else if weeks > 0 {
        parts.push(pluralize(weeks, "week"));
        if days > 0 {
            parts.push(pluralize(days, "day"));
        }
    } else if days > 0 {
        parts.push(pluralize(days, "day"));
    } else if hours > 0 {
        parts.push(pluralize(hours, "hour"));
    } else if minutes > 0 {
        parts.push(pluralize(minutes, "minute"));
    }

    let rendered = parts.join(", ");
    if future {
        format!("{} from now", rendered)
    } else {
        format!("{} ago", rendered)
    }
}

/// Render how long ago `then` was, as seen from `now`.
pub fn natural_time_since(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    natural_time(now - then, Some(now))
}
