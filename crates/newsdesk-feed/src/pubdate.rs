//! Print-edition date inference.
//!
//! The two feed shapes disagree about what a "publish date" is. CMS items
//! carry an explicit print date; syndication items only carry the filing
//! timestamp, and the print date must be derived from it. Production close
//! for the next morning's paper crosses midnight: copy filed before 05:00
//! belongs to that same morning's edition, anything later belongs to the
//! next day's. There is no Sunday edition, so a candidate landing on a
//! Sunday moves to Monday.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Weekday};

/// Filing-time cutoff: before this hour an article still makes the same
/// morning's paper.
const PRINT_CUTOFF_HOUR: u32 = 5;

/// Renders an 8-digit feed date key (`20260112`) as ISO (`2026-01-12`).
///
/// Returns `None` for anything that is not exactly eight ASCII digits.
#[must_use]
pub fn date_key_to_iso(key: &str) -> Option<String> {
    if key.len() != 8 || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(format!("{}-{}-{}", &key[..4], &key[4..6], &key[6..8]))
}

/// Print date for a CMS item: the explicit `YYYYMMDD` publish field when
/// present, otherwise the feed's own date key.
#[must_use]
pub fn cms_print_date(publish_date_raw: &str, feed_date_key: &str) -> String {
    date_key_to_iso(publish_date_raw.trim())
        .or_else(|| date_key_to_iso(feed_date_key))
        .unwrap_or_else(|| feed_date_key.to_string())
}

/// Print date and filing time for a syndication item, derived from its
/// combined `YYYY-MM-DD HH:MM:SS` timestamp.
///
/// Returns `None` when the timestamp is missing or unparsable; the caller
/// falls back to the feed date key with an empty time.
#[must_use]
pub fn syndication_print_date(pub_date_raw: &str) -> Option<(String, String)> {
    let parsed = NaiveDateTime::parse_from_str(pub_date_raw.trim(), "%Y-%m-%d %H:%M:%S").ok()?;

    let mut print_date = if parsed.time().hour() < PRINT_CUTOFF_HOUR {
        parsed.date()
    } else {
        parsed.date() + Duration::days(1)
    };

    if print_date.weekday() == Weekday::Sun {
        print_date += Duration::days(1);
    }

    Some((
        print_date.format("%Y-%m-%d").to_string(),
        parsed.time().format("%H:%M:%S").to_string(),
    ))
}

/// Parses an ISO date, used by callers that window queries by date.
#[must_use]
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
