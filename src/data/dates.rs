use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

use super::clean_str;

/// Date-time layouts seen in tracker exports, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    // Jira: "12/Mar/24 3:45 PM"
    "%d/%b/%y %I:%M %p",
    "%d/%b/%Y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%b/%y", "%d/%b/%Y"];

/// Best-effort parse of a date or timestamp cell. Offsets are folded into UTC.
pub fn parse_lenient(raw: &str) -> Option<NaiveDateTime> {
    let s = clean_str(raw);
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.naive_utc());
    }
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt);
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Whole days from `created` to `resolved`, rounded towards negative infinity
/// so a resolution twelve hours *before* creation counts as -1.
pub fn whole_days_between(created: NaiveDateTime, resolved: NaiveDateTime) -> i64 {
    let delta = resolved - created;
    // num_days truncates towards zero
    let days = delta.num_days();
    if delta < Duration::days(days) {
        days - 1
    } else {
        days
    }
}

/// Both ends parsed, or nothing.
pub fn remediation_days(created: Option<&str>, resolved: Option<&str>) -> Option<i64> {
    let created = parse_lenient(created?)?;
    let resolved = parse_lenient(resolved?)?;
    Some(whole_days_between(created, resolved))
}
