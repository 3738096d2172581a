//! Lenient completion-date parsing and display
//!
//! Anything that does not parse becomes "no date". Callers never see a
//! parse error.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Default display pattern (day first)
pub const DEFAULT_DISPLAY_FORMAT: &str = "%d/%m/%Y";

/// Pattern used when dates are stored as text
pub const STORAGE_FORMAT: &str = "%Y-%m-%d";

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%Y/%m/%d",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Parse a date written in any of the accepted forms
///
/// Slash-separated dates are read day first (`03/04/2024` is 3 April).
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// Format an optional date for display; "no date" is an empty string
pub fn format_date(date: Option<NaiveDate>, pattern: &str) -> String {
    date.map(|d| d.format(pattern).to_string())
        .unwrap_or_default()
}

/// True if `pattern` is a usable, non-empty chrono format string
pub fn is_valid_pattern(pattern: &str) -> bool {
    !pattern.trim().is_empty() && StrftimeItems::new(pattern).all(|item| item != Item::Error)
}

/// Convert a chrono pattern into the equivalent spreadsheet number format
pub fn excel_number_format(pattern: &str) -> String {
    pattern
        .replace("%d", "dd")
        .replace("%m", "mm")
        .replace("%Y", "yyyy")
        .replace("%y", "yy")
}
