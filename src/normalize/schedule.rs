use chrono::{DateTime, Utc};
use serde_json::Value;

/// Phrase shown when the backend has no next run scheduled.
pub const NO_SCHEDULE: &str = "now";

/// Read the `api/schedule` payload into a UTC timestamp.
///
/// The backend sends `null` when no scheduler is configured. Timestamps come
/// either as RFC 3339 or in Go's `time.Time` string form
/// (`2024-01-01 03:00:00 +0000 UTC`), optionally with fractional seconds and
/// a trailing monotonic clock reading (`m=+12.3`).
pub fn parse_schedule(value: &Value) -> Option<DateTime<Utc>> {
    let raw = value.as_str()?.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    let without_mono = raw.split(" m=").next().unwrap_or(raw);
    let fields: Vec<&str> = without_mono.split_whitespace().take(3).collect();
    if fields.len() == 3 {
        let candidate = fields.join(" ");
        if let Ok(ts) = DateTime::parse_from_str(&candidate, "%Y-%m-%d %H:%M:%S%.f %z") {
            return Some(ts.with_timezone(&Utc));
        }
    }

    tracing::debug!(schedule = raw, "unrecognized schedule timestamp");
    None
}

/// Describe `target` relative to `now`: `"in 3 hours"`, `"5 minutes ago"`.
///
/// `None` renders as [`NO_SCHEDULE`].
pub fn relative_phrase(target: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(target) = target else {
        return NO_SCHEDULE.to_string();
    };

    let delta_ms = (target - now).num_milliseconds();
    let span = humanize(delta_ms.unsigned_abs() as f64 / 1000.0);
    if delta_ms > 0 {
        format!("in {span}")
    } else {
        format!("{span} ago")
    }
}

/// Coarse human wording for a span of `secs` seconds.
///
/// Each unit is the rounded span in that unit, and the first threshold that
/// fits wins.
fn humanize(secs: f64) -> String {
    let seconds = secs.round();
    let minutes = (secs / 60.0).round();
    let hours = (secs / 3_600.0).round();
    let days_exact = secs / 86_400.0;
    let days = days_exact.round();
    let months = (days_exact * 4_800.0 / 146_097.0).round();
    let years = (days_exact * 4_800.0 / 146_097.0 / 12.0).round();

    if seconds < 45.0 {
        "a few seconds".to_string()
    } else if minutes <= 1.0 {
        "a minute".to_string()
    } else if minutes < 45.0 {
        format!("{minutes} minutes")
    } else if hours <= 1.0 {
        "an hour".to_string()
    } else if hours < 22.0 {
        format!("{hours} hours")
    } else if days <= 1.0 {
        "a day".to_string()
    } else if days < 26.0 {
        format!("{days} days")
    } else if months <= 1.0 {
        "a month".to_string()
    } else if months < 11.0 {
        format!("{months} months")
    } else if years <= 1.0 {
        "a year".to_string()
    } else {
        format!("{years} years")
    }
}
