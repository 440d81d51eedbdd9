// domain/reading.rs
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Numeric reading from sheet or feed text.
///
/// Accepts "1234.5", "1234,5", "1.234,5" and an optional "R$" prefix.
/// Anything else, blanks included, reads as `None`.
pub fn parse_reading(raw: &str) -> Option<f64> {
    let s = raw.trim().trim_start_matches("R$").trim();
    if s.is_empty() {
        return None;
    }

    let s: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    let s = if s.contains(',') {
        s.replace('.', "").replace(',', ".")
    } else {
        s
    };

    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Timestamp from the feed or sheet. Values without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
