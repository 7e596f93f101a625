//! Date rule: many textual encodings in, ISO `YYYY-MM-DD` out.
//!
//! Order timestamps arrive in mixed shapes such as
//! `09:19:51 P.M., 12-Dec-2024`, `15-December-2024, 08:44:59 P.M.` or
//! `04:49:37 P.M.,03/11/25`. The clock time is discarded; only the calendar
//! date is kept.

use chrono::{Datelike, NaiveDate};

use crate::error::{Result, ValueError};

/// Formats with an unambiguous field order. Two-digit year variants come
/// first; `%Y` alone would read `25` as year 25.
const NAMED_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%d-%b-%y",
    "%d-%b-%Y",
    "%d-%B-%Y",
    "%d %b %y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d %Y",
    "%B %d %Y",
    "%Y-%b-%d",
];

/// Matches with a shorter year come from a four-digit pattern reading a
/// two-digit field and are skipped.
const MIN_YEAR: i32 = 1000;

const MONTH_FIRST: &[&str] = &[
    "%m/%d/%y", "%m/%d/%Y", "%m-%d-%y", "%m-%d-%Y", "%m.%d.%y", "%m.%d.%Y",
];

const DAY_FIRST: &[&str] = &[
    "%d/%m/%y", "%d/%m/%Y", "%d-%m-%y", "%d-%m-%Y", "%d.%m.%y", "%d.%m.%Y",
];

/// Parse a date in any supported encoding.
///
/// Numeric dates are read month-first unless `day_first` is set; the other
/// order is tried when the preferred one yields no valid date.
pub fn parse_date(value: &str, day_first: bool) -> Option<NaiveDate> {
    let candidate = strip_time(&clean_text(value));
    if candidate.is_empty() {
        return None;
    }
    if let Some(date) = parse_compact(&candidate).filter(|date| date.year() >= MIN_YEAR) {
        return Some(date);
    }
    let (preferred, fallback) = if day_first {
        (DAY_FIRST, MONTH_FIRST)
    } else {
        (MONTH_FIRST, DAY_FIRST)
    };
    NAMED_FORMATS
        .iter()
        .chain(preferred)
        .chain(fallback)
        .filter_map(|fmt| NaiveDate::parse_from_str(&candidate, fmt).ok())
        .find(|date| date.year() >= MIN_YEAR)
}

/// Normalize a date to ISO form.
pub fn normalize_date(value: &str, day_first: bool) -> Result<String> {
    parse_date(value, day_first)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .ok_or_else(|| ValueError::Date(value.trim().to_string()))
}

/// Unify meridiem spellings and turn list separators into spaces.
fn clean_text(value: &str) -> String {
    let mut text = value.trim().to_string();
    for (from, to) in [
        ("A.M.", " AM"),
        ("P.M.", " PM"),
        ("a.m.", " AM"),
        ("p.m.", " PM"),
    ] {
        text = text.replace(from, to);
    }
    let mut out = String::with_capacity(text.len());
    let chars: Vec<char> = text.chars().collect();
    for (i, c) in chars.iter().enumerate() {
        match c {
            ',' | ';' => out.push(' '),
            // ISO datetime separator between a date and a time
            'T' if i > 0
                && chars[i - 1].is_ascii_digit()
                && chars.get(i + 1).is_some_and(char::is_ascii_digit) =>
            {
                out.push(' ');
            }
            _ => out.push(*c),
        }
    }
    out
}

/// Drop clock times, meridiem markers and zone suffixes.
fn strip_time(text: &str) -> String {
    text.split_whitespace()
        .filter(|token| !is_time_token(token))
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_time_token(token: &str) -> bool {
    let lower = token.to_ascii_lowercase();
    if matches!(lower.as_str(), "am" | "pm" | "z" | "utc" | "gmt") {
        return true;
    }
    let core = lower
        .trim_end_matches("am")
        .trim_end_matches("pm")
        .trim_end_matches('z');
    core.contains(':')
        && core
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ':' | '.' | '+' | '-'))
}

/// `YYYYMMDD` with no separators.
fn parse_compact(text: &str) -> Option<NaiveDate> {
    if text.len() != 8 || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let year = text[0..4].parse().ok()?;
    let month = text[4..6].parse().ok()?;
    let day = text[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iso(value: &str) -> String {
        normalize_date(value, false).unwrap()
    }

    #[test]
    fn mixed_timestamp_shapes() {
        assert_eq!(iso("09:19:51 P.M., 12-Dec-2024"), "2024-12-12");
        assert_eq!(iso("15-December-2024, 08:44:59 P.M."), "2024-12-15");
        assert_eq!(iso("04:49:37 P.M.,03/11/25"), "2025-03-11");
        assert_eq!(iso("2024-12-03T10:15:00Z"), "2024-12-03");
        assert_eq!(iso("Dec 3, 2024"), "2024-12-03");
        assert_eq!(iso("20241203"), "2024-12-03");
    }

    #[test]
    fn month_first_unless_configured() {
        assert_eq!(iso("03/11/2025"), "2025-03-11");
        assert_eq!(normalize_date("03/11/2025", true).unwrap(), "2025-11-03");
        // Only one reading is valid.
        assert_eq!(iso("25/12/2024"), "2024-12-25");
    }

    #[test]
    fn impossible_date_is_rejected() {
        let err = normalize_date("13/45/2020", false).unwrap_err();
        assert_eq!(err, ValueError::Date("13/45/2020".to_string()));
    }

    #[test]
    fn iso_output_is_stable() {
        assert_eq!(iso("2024-02-29"), "2024-02-29");
        assert!(normalize_date("2023-02-29", false).is_err());
    }
}
