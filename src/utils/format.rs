//! Formatting utilities for dates and other display values.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse a server timestamp.
///
/// Accepts RFC 3339, naive ISO-8601 (`2024-05-01T10:00:00.123456`, what the
/// document service emits) and RFC 2822 (Flask's default JSON date format).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.naive_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Format a server timestamp as an ISO date (YYYY-MM-DD).
///
/// Unparsable input is shown as-is.
pub fn format_date(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| raw.to_string())
}
