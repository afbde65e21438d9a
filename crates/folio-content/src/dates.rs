//! Free-form date parsing and newest-first ordering.
//!
//! Work entries carry dates like `Jan 2020 - Present`, `2018 – 2019` or
//! `March 3, 2021`. Only the end of a range matters for ordering.

use std::cmp::Ordering;
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;

static RANGE_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s-\s|\u{2013}|\u{2014}|\s+to\s+").expect("Invalid range split regex")
});

static ONGOING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(present|current|now|ongoing)$").expect("Invalid ongoing regex")
});

// chrono lets `%d` swallow the first digits of a year, so "Jan 2020" must be
// matched before the day formats see it.
static MONTH_YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+\s+\d{4}$").expect("Invalid month year regex"));

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// End of a date or date range as milliseconds since the Unix epoch.
///
/// Ongoing ranges end at `now`. Returns `None` when nothing parses.
pub fn end_timestamp(date: &str, now: DateTime<Utc>) -> Option<i64> {
    let trimmed = date.trim();
    if trimmed.is_empty() {
        return None;
    }

    let end = RANGE_SPLIT_RE.split(trimmed).last().unwrap_or("").trim();

    if ONGOING_RE.is_match(end) {
        return Some(now.timestamp_millis());
    }

    parse_date(end).or_else(|| parse_date(trimmed))
}

/// Parse a single date in one of the supported forms.
///
/// Partial dates resolve to the start of their period, in UTC.
pub fn parse_date(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }

    if MONTH_YEAR_RE.is_match(s) {
        // "Jan 2020", "January 2020"
        let date = NaiveDate::parse_from_str(&format!("1 {s}"), "%d %B %Y").ok()?;
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis());
    }

    let date = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        // "2020-06"
        .or_else(|| NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d").ok())
        .or_else(|| parse_year(s))?;

    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis())
}

fn parse_year(s: &str) -> Option<NaiveDate> {
    if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(s.parse().ok()?, 1, 1)
}

/// Order two end timestamps newest first, unparseable last.
pub fn compare_newest_first(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => b.cmp(&a),
    }
}

/// Stable sort by end date, newest first.
pub fn sort_newest_first<T, F>(items: Vec<T>, date_of: F, now: DateTime<Utc>) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let mut keyed: Vec<(Option<i64>, T)> = items
        .into_iter()
        .map(|item| (end_timestamp(date_of(&item), now), item))
        .collect();

    keyed.sort_by(|a, b| compare_newest_first(a.0, b.0));

    keyed.into_iter().map(|(_, item)| item).collect()
}
