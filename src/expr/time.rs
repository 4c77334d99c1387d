//! time bounds for filters
//!
//! supports formats:
//! - unix seconds: "1700000000"
//! - RFC 3339: "2024-01-31T18:00:00+01:00", "2024-01-31T17:00:00Z"
//! - date and time without offset (UTC): "2024-01-31 17:00", "2024-01-31T17:00:00"
//! - date only (UTC midnight): "2024-01-31"

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// open interval of unix timestamps; both bounds are exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub min: i64,
    pub max: i64,
}

impl Default for TimeRange {
    fn default() -> Self {
        Self {
            min: 0,
            max: i64::MAX,
        }
    }
}

impl TimeRange {
    pub fn new(min: Option<i64>, max: Option<i64>) -> Self {
        let default = Self::default();
        Self {
            min: min.unwrap_or(default.min),
            max: max.unwrap_or(default.max),
        }
    }

    /// check if a timestamp lies strictly between the bounds
    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp > self.min && timestamp < self.max
    }
}

/// parse date/time text into unix seconds
pub fn parse_timestamp(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let digits = s.strip_prefix('-').unwrap_or(s);
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        return s.parse().ok();
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp());
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc().timestamp());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
}
