// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Turn stored attribute values into their iCalendar text.

use chumsky::prelude::*;
use invitecal_ical::value::value_u32;
use invitecal_ical::{ValueDateTime, ValueDuration};
use jiff::Timestamp;
use jiff::tz::TimeZone;

use crate::attributes::Value;
use crate::datetime::DateTimeValue;
use crate::error::{Error, Result};

type Extra<'src> = extra::Err<Rich<'src, char>>;

/// The conversion applied to a field before it is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastKind {
    /// `YYYYMMDDTHHMMSS`, with `Z` when no timezone is set.
    DateTime,
    /// ISO 8601 duration such as `PT15M`.
    Interval,
    /// IANA timezone name.
    TimeZone,
    /// Upper case, with `req` standing for `request`.
    Upper,
}

/// Inputs a cast may depend on.
#[derive(Debug, Clone, Copy)]
pub struct CastContext<'a> {
    /// Instant relative phrases are resolved against.
    pub now: Timestamp,
    /// Timezone of the event, if any.
    pub timezone: Option<&'a TimeZone>,
}

/// Renders `value` according to `kind`.
///
/// # Errors
/// Returns the error of the typed cast selected by `kind`.
pub fn cast(value: &Value, kind: CastKind, ctx: &CastContext<'_>) -> Result<String> {
    let text = match kind {
        CastKind::DateTime => cast_datetime(&value.to_datetime()?, ctx)?.to_string(),
        CastKind::Interval => cast_interval(value)?.to_string(),
        CastKind::TimeZone => timezone_name(&cast_timezone(value)?)?.to_owned(),
        CastKind::Upper => cast_upper(&value.to_string()),
    };
    Ok(text)
}

/// Resolves a date/time to a wall-clock time in the event timezone, or to UTC without one.
///
/// # Errors
/// Returns [`Error::MalformedDateTime`] for phrases that are not understood.
pub fn cast_datetime(value: &DateTimeValue, ctx: &CastContext<'_>) -> Result<ValueDateTime> {
    match ctx.timezone {
        Some(tz) => {
            let zoned = value.resolve(ctx.now, tz)?;
            Ok(ValueDateTime::from(zoned.datetime()).local())
        }
        None => {
            let zoned = value.resolve(ctx.now, &TimeZone::UTC)?;
            Ok(ValueDateTime::from(zoned.timestamp()))
        }
    }
}

/// Converts a phrase or a structured interval to a duration value.
///
/// # Errors
/// Returns [`Error::MalformedDuration`] for negative, overflowing or unparsable input.
pub fn cast_interval(value: &Value) -> Result<ValueDuration> {
    match value {
        Value::Text(text) => parse_interval_phrase(text),
        Value::Interval(duration) => Ok(*duration),
        Value::Span(span) => ValueDuration::try_from(*span)
            .map_err(|e| Error::malformed_duration(&span.to_string(), e)),
        Value::Duration(duration) => ValueDuration::try_from(*duration)
            .map_err(|e| Error::malformed_duration(&format!("{duration:?}"), e)),
        _ => Err(Error::malformed_duration(
            &value.to_string(),
            "not an interval",
        )),
    }
}

/// Validates a timezone given by name or as a [`TimeZone`].
///
/// # Errors
/// Returns [`Error::InvalidTimezone`] if the name is unknown or the zone has no IANA name.
pub fn cast_timezone(value: &Value) -> Result<TimeZone> {
    let tz = match value {
        Value::Text(name) => TimeZone::get(name.trim()).map_err(|_| Error::InvalidTimezone {
            name: name.clone(),
        })?,
        Value::TimeZone(tz) => tz.clone(),
        _ => {
            return Err(Error::InvalidTimezone {
                name: value.to_string(),
            });
        }
    };
    timezone_name(&tz)?;
    Ok(tz)
}

/// IANA name of a zone.
pub(crate) fn timezone_name(tz: &TimeZone) -> Result<&str> {
    tz.iana_name().ok_or_else(|| Error::InvalidTimezone {
        name: format!("{tz:?}"),
    })
}

/// Upper cases a method name, expanding the `req` alias.
#[must_use]
pub fn cast_upper(value: &str) -> String {
    let value = value.trim();
    if value.eq_ignore_ascii_case("req") {
        "REQUEST".to_owned()
    } else {
        value.to_ascii_uppercase()
    }
}

/// Parses an interval phrase such as `1h 30m` or an ISO 8601 duration such as `PT1H30M`.
///
/// Phrases are whitespace separated `<int><unit>` terms with the units `y`
/// (years), `M` (months), `w` (weeks), `d` (days), `h` (hours), `m` (minutes)
/// and `s` (seconds). Weeks are folded into days and repeated units add up.
/// Input containing a `P` designator is read as ISO 8601.
///
/// # Errors
/// Returns [`Error::MalformedDuration`] if the text matches neither form.
pub fn parse_interval_phrase(text: &str) -> Result<ValueDuration> {
    let t = text.trim();
    if t.contains('P') {
        return t
            .parse::<ValueDuration>()
            .map_err(|e| Error::malformed_duration(text, e));
    }

    interval_phrase()
        .parse(t)
        .into_result()
        .map_err(|errs| {
            let reason = errs
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            Error::malformed_duration(text, reason)
        })
}

fn interval_phrase<'src>() -> impl Parser<'src, &'src str, ValueDuration, Extra<'src>> {
    let term = value_u32()
        .then(one_of("yMwdhms"))
        .try_map(|(n, unit), span| {
            interval_term(n, unit).ok_or_else(|| Rich::custom(span, "interval term is out of range"))
        })
        .padded();

    term.repeated()
        .at_least(1)
        .collect::<Vec<_>>()
        .try_map(|terms, span| {
            terms
                .into_iter()
                .try_fold(ValueDuration::ZERO, ValueDuration::checked_add)
                .ok_or_else(|| Rich::custom(span, "interval is out of range"))
        })
        .then_ignore(end())
}

fn interval_term(n: u32, unit: char) -> Option<ValueDuration> {
    let mut term = ValueDuration::ZERO;
    match unit {
        'y' => term.year = n,
        'M' => term.month = n,
        'w' => term.day = n.checked_mul(7)?,
        'd' => term.day = n,
        'h' => term.hour = n,
        'm' => term.minute = n,
        's' => term.second = n,
        _ => return None,
    }
    Some(term)
}
