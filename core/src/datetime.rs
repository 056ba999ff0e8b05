// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Resolve user supplied start and end times to instants.

use std::fmt;
use std::sync::OnceLock;

use jiff::fmt::strtime;
use jiff::tz::TimeZone;
use jiff::{Span, Timestamp, Zoned, civil};
use regex::Regex;

use crate::error::{Error, Result};

/// Hour of day used for phrases naming only a day, e.g. "tomorrow".
const DEFAULT_HOUR: i8 = 9;

/// Human friendly layouts tried after the ISO 8601 forms.
const FORMATS: &[&str] = &[
    "%Y/%m/%d %H:%M",
    "%B %d, %Y %H:%M",
    "%B %d, %Y %I:%M %p",
    "%B %d, %Y %I:%M%p",
    "%b %d, %Y %H:%M",
    "%d %B %Y %H:%M",
];

/// A start or end time as given by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateTimeValue {
    /// A phrase such as `2025-01-10 14:00` or `tomorrow`, resolved when compiled.
    Text(String),

    /// An absolute instant.
    Timestamp(Timestamp),

    /// An instant with its own timezone.
    Zoned(Zoned),

    /// A wall-clock time in the event timezone, or in UTC when the event has none.
    Civil(civil::DateTime),
}

impl DateTimeValue {
    /// Whether the value carries nothing to resolve.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, DateTimeValue::Text(s) if s.trim().is_empty())
    }

    /// Resolves the value to an instant in `tz`.
    ///
    /// # Errors
    /// Returns [`Error::MalformedDateTime`] if a phrase is not understood and
    /// [`Error::TimeRange`] if the result is out of range.
    pub fn resolve(&self, now: Timestamp, tz: &TimeZone) -> Result<Zoned> {
        match self {
            DateTimeValue::Text(text) => parse_datetime(text, now, tz),
            DateTimeValue::Timestamp(ts) => Ok(ts.to_zoned(tz.clone())),
            DateTimeValue::Zoned(zoned) => Ok(zoned.with_time_zone(tz.clone())),
            DateTimeValue::Civil(dt) => Ok(dt.to_zoned(tz.clone())?),
        }
    }
}

impl fmt::Display for DateTimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateTimeValue::Text(text) => write!(f, "{text}"),
            DateTimeValue::Timestamp(ts) => write!(f, "{ts}"),
            DateTimeValue::Zoned(zoned) => write!(f, "{zoned}"),
            DateTimeValue::Civil(dt) => write!(f, "{dt}"),
        }
    }
}

impl From<&str> for DateTimeValue {
    fn from(value: &str) -> Self {
        DateTimeValue::Text(value.to_owned())
    }
}

impl From<String> for DateTimeValue {
    fn from(value: String) -> Self {
        DateTimeValue::Text(value)
    }
}

impl From<Timestamp> for DateTimeValue {
    fn from(value: Timestamp) -> Self {
        DateTimeValue::Timestamp(value)
    }
}

impl From<Zoned> for DateTimeValue {
    fn from(value: Zoned) -> Self {
        DateTimeValue::Zoned(value)
    }
}

impl From<civil::DateTime> for DateTimeValue {
    fn from(value: civil::DateTime) -> Self {
        DateTimeValue::Civil(value)
    }
}

/// Parses a date/time phrase relative to `now`.
///
/// Recognized forms, in order:
///
/// - keywords `now`, `today`, `tomorrow` and `yesterday`, the last three at 09:00
/// - basic iCalendar form `20250110T140000` with an optional `Z`
/// - RFC 9557 / ISO 8601 strings, with or without an offset or a zone annotation
/// - a few human layouts such as `January 10, 2025 14:00`
/// - relative phrases like `in 2 hours`, `30m`, `in 3 days`
///
/// Times without an offset are wall-clock times in `tz`.
///
/// # Errors
/// Returns [`Error::MalformedDateTime`] if the phrase is not understood.
pub fn parse_datetime(text: &str, now: Timestamp, tz: &TimeZone) -> Result<Zoned> {
    let t = text.trim();
    let now = now.to_zoned(tz.clone());

    // Handle keywords
    match t.to_ascii_lowercase().as_str() {
        "now" => return Ok(now),
        "today" => return in_days(&now, 0),
        "tomorrow" => return in_days(&now, 1),
        "yesterday" => return in_days(&now, -1),
        _ => {}
    }

    if let Some(zoned) = parse_basic(t, tz)? {
        Ok(zoned)
    } else if let Ok(zoned) = t.parse::<Zoned>() {
        Ok(zoned.with_time_zone(tz.clone()))
    } else if let Ok(ts) = t.parse::<Timestamp>() {
        Ok(ts.to_zoned(tz.clone()))
    } else if let Ok(dt) = t.parse::<civil::DateTime>() {
        Ok(dt.to_zoned(tz.clone())?)
    } else if let Ok(date) = t.parse::<civil::Date>() {
        Ok(date.to_zoned(tz.clone())?)
    } else if let Some(dt) = parse_layouts(t) {
        Ok(dt.to_zoned(tz.clone())?)
    } else if let Some((n, unit)) = parse_relative(t) {
        match unit {
            RelativeUnit::Minutes => Ok(now.checked_add(Span::new().try_minutes(n)?)?),
            RelativeUnit::Hours => Ok(now.checked_add(Span::new().try_hours(n)?)?),
            RelativeUnit::Days => in_days(&now, n),
            RelativeUnit::Weeks => in_days(&now, n.saturating_mul(7)),
        }
    } else {
        Err(Error::MalformedDateTime {
            input: text.to_owned(),
        })
    }
}

fn in_days(now: &Zoned, days: i64) -> Result<Zoned> {
    let date = now.date().checked_add(Span::new().try_days(days)?)?;
    Ok(date.at(DEFAULT_HOUR, 0, 0, 0).to_zoned(now.time_zone().clone())?)
}

/// Parse `YYYYMMDDTHHMMSS[Z]`.
fn parse_basic(t: &str, tz: &TimeZone) -> Result<Option<Zoned>> {
    const RE: &str = r"(?i)^(\d{4})(\d{2})(\d{2})T(\d{2})(\d{2})(\d{2})(Z)?$";
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| Regex::new(RE).unwrap());

    let Some(captures) = re.captures(t) else {
        return Ok(None);
    };
    let num = |i: usize| lexical::parse::<i8, _>(&captures[i]).unwrap_or(-1);
    let Ok(year) = lexical::parse::<i16, _>(&captures[1]) else {
        return Ok(None);
    };
    let Ok(dt) = civil::DateTime::new(year, num(2), num(3), num(4), num(5), num(6), 0) else {
        return Ok(None);
    };
    let utc = captures.get(7).is_some();

    let zoned = if utc {
        dt.to_zoned(TimeZone::UTC)?.with_time_zone(tz.clone())
    } else {
        dt.to_zoned(tz.clone())?
    };
    Ok(Some(zoned))
}

fn parse_layouts(t: &str) -> Option<civil::DateTime> {
    FORMATS
        .iter()
        .find_map(|fmt| strtime::parse(fmt, t).and_then(|tm| tm.to_datetime()).ok())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RelativeUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
}

/// Parse relative phrases like "10h", "in 10 hours", "in 3days", "45 min"
fn parse_relative(s: &str) -> Option<(i64, RelativeUnit)> {
    const RE: &str = r"(?i)^\s*(?:in\s*)?(\d+)\s*(m|mins?|minutes?|h|hours?|d|days?|w|weeks?)\s*$";
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| Regex::new(RE).unwrap());

    let captures = re.captures(s)?;
    let num = lexical::parse::<i64, _>(&captures[1]).ok()?;
    let unit = match captures[2].chars().next()?.to_ascii_lowercase() {
        'm' => RelativeUnit::Minutes,
        'h' => RelativeUnit::Hours,
        'd' => RelativeUnit::Days,
        'w' => RelativeUnit::Weeks,
        _ => return None,
    };
    Some((num, unit))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> Timestamp {
        "2025-01-10T14:00:00Z".parse().unwrap()
    }

    fn edmonton() -> TimeZone {
        TimeZone::get("America/Edmonton").unwrap()
    }

    fn utc(s: &str) -> Zoned {
        s.parse::<Timestamp>().unwrap().to_zoned(TimeZone::UTC)
    }

    #[test]
    fn test_parse_keywords() {
        let tz = TimeZone::UTC;
        assert_eq!(parse_datetime("now", now(), &tz).unwrap(), utc("2025-01-10T14:00:00Z"));
        assert_eq!(parse_datetime(" NOW ", now(), &tz).unwrap(), utc("2025-01-10T14:00:00Z"));
        assert_eq!(parse_datetime("today", now(), &tz).unwrap(), utc("2025-01-10T09:00:00Z"));
        assert_eq!(parse_datetime("tomorrow", now(), &tz).unwrap(), utc("2025-01-11T09:00:00Z"));
        assert_eq!(parse_datetime("yesterday", now(), &tz).unwrap(), utc("2025-01-09T09:00:00Z"));
    }

    #[test]
    fn test_parse_keywords_in_zone() {
        // 2025-01-10T14:00Z is 07:00 in Edmonton (UTC-7)
        let parsed = parse_datetime("tomorrow", now(), &edmonton()).unwrap();
        assert_eq!(parsed.datetime(), civil::datetime(2025, 1, 11, 9, 0, 0, 0));
        assert_eq!(parsed.timestamp(), "2025-01-11T16:00:00Z".parse::<Timestamp>().unwrap());
    }

    #[test]
    fn test_parse_basic_form() {
        let tz = TimeZone::UTC;
        let parsed = parse_datetime("20250110T143000Z", now(), &tz).unwrap();
        assert_eq!(parsed, utc("2025-01-10T14:30:00Z"));

        let parsed = parse_datetime("20250110T143000", now(), &edmonton()).unwrap();
        assert_eq!(parsed.timestamp(), "2025-01-10T21:30:00Z".parse::<Timestamp>().unwrap());
    }

    #[test]
    fn test_parse_iso_forms() {
        let tz = TimeZone::UTC;
        let parsed = parse_datetime("2025-01-10T14:30:00-07:00", now(), &tz).unwrap();
        assert_eq!(parsed, utc("2025-01-10T21:30:00Z"));

        let parsed =
            parse_datetime("2025-01-10T14:30:00-07:00[America/Edmonton]", now(), &tz).unwrap();
        assert_eq!(parsed, utc("2025-01-10T21:30:00Z"));

        let parsed = parse_datetime("2025-01-10 14:30", now(), &tz).unwrap();
        assert_eq!(parsed, utc("2025-01-10T14:30:00Z"));

        let parsed = parse_datetime("2025-01-10", now(), &tz).unwrap();
        assert_eq!(parsed, utc("2025-01-10T00:00:00Z"));
    }

    #[test]
    fn test_parse_floating_in_zone() {
        let parsed = parse_datetime("2025-07-01T09:30:00", now(), &edmonton()).unwrap();
        assert_eq!(parsed.datetime(), civil::datetime(2025, 7, 1, 9, 30, 0, 0));
        assert_eq!(parsed.timestamp(), "2025-07-01T15:30:00Z".parse::<Timestamp>().unwrap());
    }

    #[test]
    fn test_parse_layouts() {
        let tz = TimeZone::UTC;
        let parsed = parse_datetime("January 10, 2025 14:30", now(), &tz).unwrap();
        assert_eq!(parsed, utc("2025-01-10T14:30:00Z"));

        let parsed = parse_datetime("2025/01/10 14:30", now(), &tz).unwrap();
        assert_eq!(parsed, utc("2025-01-10T14:30:00Z"));
    }

    #[test]
    fn test_parse_relative() {
        let tz = TimeZone::UTC;
        #[rustfmt::skip]
        let cases = [
            ("in 2 hours", "2025-01-10T16:00:00Z"),
            ("10h",        "2025-01-11T00:00:00Z"),
            ("30m",        "2025-01-10T14:30:00Z"),
            ("in 45 min",  "2025-01-10T14:45:00Z"),
            ("in 3 days",  "2025-01-13T09:00:00Z"),
            ("1w",         "2025-01-17T09:00:00Z"),
        ];
        for (src, expected) in cases {
            let parsed = parse_datetime(src, now(), &tz).unwrap();
            assert_eq!(parsed, utc(expected), "Failed to parse: {src}");
        }
    }

    #[test]
    fn test_parse_invalid() {
        for src in ["", "next blue moon", "2025-13-40", "in hours", "20251310T000000Z"] {
            let err = parse_datetime(src, now(), &TimeZone::UTC).unwrap_err();
            assert!(
                matches!(err, Error::MalformedDateTime { .. }),
                "Parse {src} should fail with MalformedDateTime, got {err:?}"
            );
        }
    }

    #[test]
    fn test_resolve_values() {
        let tz = edmonton();
        let ts: Timestamp = "2025-01-10T21:30:00Z".parse().unwrap();

        let resolved = DateTimeValue::from(ts).resolve(now(), &tz).unwrap();
        assert_eq!(resolved.datetime(), civil::datetime(2025, 1, 10, 14, 30, 0, 0));

        let civil = civil::datetime(2025, 1, 10, 14, 30, 0, 0);
        let resolved = DateTimeValue::from(civil).resolve(now(), &tz).unwrap();
        assert_eq!(resolved.timestamp(), ts);

        let zoned = ts.to_zoned(TimeZone::get("Asia/Tokyo").unwrap());
        let resolved = DateTimeValue::from(zoned).resolve(now(), &tz).unwrap();
        assert_eq!(resolved.timestamp(), ts);
        assert_eq!(resolved.time_zone(), &tz);
    }

    #[test]
    fn test_empty_value() {
        assert!(DateTimeValue::from("  ").is_empty());
        assert!(!DateTimeValue::from("now").is_empty());
        assert!(!DateTimeValue::from(now()).is_empty());
    }
}
