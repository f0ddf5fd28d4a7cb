//! Date handling for the daily time axis.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

use crate::error::{VizError, VizResult};

/// Parse a time-axis label into a calendar day.
///
/// Supports:
/// - Date only: "2024-01-15"
/// - Naive datetime: "2024-01-15T00:00:00" (time of day dropped)
/// - RFC 3339: "2024-01-15T00:00:00Z"
pub fn parse_day(s: &str) -> VizResult<NaiveDate> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }

    // numpy datetime64 strings carry fractional seconds
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ndt.date());
        }
    }

    Err(VizError::validation(format!("invalid date: {}", s)))
}

/// `count` consecutive days starting at `start`.
pub fn consecutive_days(start: NaiveDate, count: usize) -> Vec<NaiveDate> {
    (0..count)
        .map(|i| start + Duration::days(i as i64))
        .collect()
}

/// Wire format for a day label.
pub fn format_day(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}
