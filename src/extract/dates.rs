//! Publication date normalization.
//!
//! Every date leaves this module as an ISO-8601 string. Structured attribute
//! values (RFC 3339 or plain `YYYY-MM-DD`) are accepted as-is after
//! validation; free text is matched against three common patterns and the
//! matched groups are converted. Anything that does not yield a real calendar
//! date falls back to the current local time.
//!
//! | pattern | example | read as |
//! |---------|---------|---------|
//! | `DD/MM/YYYY`, `DD-MM-YYYY` | `05/06/2025` | 5 June 2025 |
//! | `YYYY/MM/DD`, `YYYY-MM-DD` | `2025-06-05` | 5 June 2025 |
//! | `DD Month YYYY` | `5 June 2025`, `05 Jun 2025` | 5 June 2025 |

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, SecondsFormat};
use once_cell::sync::Lazy;
use regex::Regex;

/// Canonical output layout for dates without an explicit offset.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

static DAY_FIRST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})[/\-](\d{1,2})[/\-](\d{4})").expect("valid regex"));
static YEAR_FIRST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})[/\-](\d{1,2})[/\-](\d{1,2})").expect("valid regex"));
static DAY_MONTH_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})\s+([A-Za-z]+)\.?,?\s+(\d{4})").expect("valid regex"));

/// Current local time in canonical form.
pub fn now_iso() -> String {
    Local::now().naive_local().format(CANONICAL_FORMAT).to_string()
}

/// Normalize a value read from a structured `datetime` / `data-date` attribute.
///
/// Returns `None` when the value is not a recognizable timestamp, so the caller
/// can treat it like free text.
pub fn from_attribute(value: &str) -> Option<String> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.to_rfc3339_opts(SecondsFormat::Secs, true));
    }
    for layout in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, layout) {
            return Some(dt.format(CANONICAL_FORMAT).to_string());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(at_midnight)
}

/// Detect a date pattern in free text and convert it to canonical form.
///
/// Patterns are tried in table order; the first that yields a real date wins.
pub fn parse_date_text(text: &str) -> Option<String> {
    if let Some(caps) = DAY_FIRST.captures(text) {
        if let Some(date) = ymd(&caps[3], &caps[2], &caps[1]) {
            return Some(at_midnight(date));
        }
    }
    if let Some(caps) = YEAR_FIRST.captures(text) {
        if let Some(date) = ymd(&caps[1], &caps[2], &caps[3]) {
            return Some(at_midnight(date));
        }
    }
    if let Some(caps) = DAY_MONTH_NAME.captures(text) {
        if let Some(month) = month_number(&caps[2]) {
            if let Some(date) = ymd(&caps[3], &month.to_string(), &caps[1]) {
                return Some(at_midnight(date));
            }
        }
    }
    None
}

/// Structured attribute first, then free-text patterns, then now.
pub fn normalize_or_now(value: &str, from_attr: bool) -> String {
    let parsed = if from_attr {
        from_attribute(value).or_else(|| parse_date_text(value))
    } else {
        parse_date_text(value)
    };
    parsed.unwrap_or_else(now_iso)
}

fn ymd(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn at_midnight(date: NaiveDate) -> String {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.format(CANONICAL_FORMAT).to_string())
        .unwrap_or_else(|| date.format("%Y-%m-%d").to_string())
}

fn month_number(name: &str) -> Option<u32> {
    const MONTHS: [&str; 12] = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    let name = name.to_lowercase();
    if name.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| name.starts_with(m))
        .map(|i| i as u32 + 1)
}
