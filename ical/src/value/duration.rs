// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Duration value: the ISO 8601 `P...T...` form used by `DURATION` and `TRIGGER`.
//!
//! RFC 5545 Section 3.3.6 only defines weeks, days and time components; the
//! calendar-year and month designators of ISO 8601 are accepted as well since
//! common clients read them.

use std::fmt;
use std::str::FromStr;

use chumsky::prelude::*;

type Extra<'src> = extra::Err<Rich<'src, char>>;

/// Errors produced while building a [`ValueDuration`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DurationError {
    /// The text does not follow the ISO 8601 duration grammar.
    #[error("invalid duration '{input}': {reason}")]
    Syntax {
        /// The rejected input.
        input: String,
        /// What the parser expected.
        reason: String,
    },

    /// The source value is negative.
    #[error("negative durations are not supported: {0}")]
    Negative(String),

    /// A component does not fit in 32 bits.
    #[error("duration component is out of range: {0}")]
    Overflow(String),

    /// The source value has a fraction of a second, which the format cannot carry.
    #[error("sub-second durations are not supported: {0}")]
    SubSecond(String),
}

/// Duration value with calendar and clock components.
///
/// Weeks have no slot of their own: they are folded into days when parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ValueDuration {
    /// Years
    pub year: u32,
    /// Months
    pub month: u32,
    /// Days, including folded weeks
    pub day: u32,
    /// Hours
    pub hour: u32,
    /// Minutes
    pub minute: u32,
    /// Seconds
    pub second: u32,
}

impl ValueDuration {
    /// The zero-length duration, rendered as `P`.
    pub const ZERO: Self = Self {
        year: 0,
        month: 0,
        day: 0,
        hour: 0,
        minute: 0,
        second: 0,
    };

    /// Component-wise addition, `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        Some(Self {
            year: self.year.checked_add(rhs.year)?,
            month: self.month.checked_add(rhs.month)?,
            day: self.day.checked_add(rhs.day)?,
            hour: self.hour.checked_add(rhs.hour)?,
            minute: self.minute.checked_add(rhs.minute)?,
            second: self.second.checked_add(rhs.second)?,
        })
    }

    fn has_time(&self) -> bool {
        self.hour > 0 || self.minute > 0 || self.second > 0
    }
}

/// Format as `P[nY][nM][nD][T[nH][nM][nS]]`, omitting zero components.
impl fmt::Display for ValueDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P")?;
        if self.year > 0 {
            write!(f, "{}Y", self.year)?;
        }
        if self.month > 0 {
            write!(f, "{}M", self.month)?;
        }
        if self.day > 0 {
            write!(f, "{}D", self.day)?;
        }
        if self.has_time() {
            write!(f, "T")?;
            if self.hour > 0 {
                write!(f, "{}H", self.hour)?;
            }
            if self.minute > 0 {
                write!(f, "{}M", self.minute)?;
            }
            if self.second > 0 {
                write!(f, "{}S", self.second)?;
            }
        }
        Ok(())
    }
}

impl FromStr for ValueDuration {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        value_duration()
            .then_ignore(end())
            .parse(s)
            .into_result()
            .map_err(|errs| DurationError::Syntax {
                input: s.to_owned(),
                reason: errs
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            })
    }
}

#[cfg(feature = "jiff")]
impl TryFrom<jiff::Span> for ValueDuration {
    type Error = DurationError;

    fn try_from(span: jiff::Span) -> Result<Self, Self::Error> {
        if span.signum() < 0 {
            return Err(DurationError::Negative(span.to_string()));
        }

        if span.get_milliseconds() != 0
            || span.get_microseconds() != 0
            || span.get_nanoseconds() != 0
        {
            return Err(DurationError::SubSecond(span.to_string()));
        }

        let overflow = || DurationError::Overflow(span.to_string());
        let weeks = u32::try_from(span.get_weeks()).map_err(|_| overflow())?;
        let days = u32::try_from(span.get_days()).map_err(|_| overflow())?;
        Ok(Self {
            year: u32::try_from(span.get_years()).map_err(|_| overflow())?,
            month: u32::try_from(span.get_months()).map_err(|_| overflow())?,
            day: weeks
                .checked_mul(7)
                .and_then(|d| d.checked_add(days))
                .ok_or_else(overflow)?,
            hour: u32::try_from(span.get_hours()).map_err(|_| overflow())?,
            minute: u32::try_from(span.get_minutes()).map_err(|_| overflow())?,
            second: u32::try_from(span.get_seconds()).map_err(|_| overflow())?,
        })
    }
}

/// Splits a clock duration into hours, minutes and seconds.
impl TryFrom<std::time::Duration> for ValueDuration {
    type Error = DurationError;

    fn try_from(duration: std::time::Duration) -> Result<Self, Self::Error> {
        if duration.subsec_nanos() != 0 {
            return Err(DurationError::SubSecond(format!("{duration:?}")));
        }

        let secs = duration.as_secs();
        let hour = u32::try_from(secs / 3600)
            .map_err(|_| DurationError::Overflow(format!("{duration:?}")))?;
        Ok(Self {
            hour,
            // both below 60
            minute: u32::try_from(secs % 3600 / 60).unwrap_or_default(),
            second: u32::try_from(secs % 60).unwrap_or_default(),
            ..Self::ZERO
        })
    }
}

/// Format Definition:
///
/// ```txt
/// dur-value  = "P" [dur-year] [dur-month] [dur-week] [dur-day] [dur-time]
///
/// dur-time   = "T" [dur-hour] [dur-minute] [dur-second]
/// dur-year   = 1*DIGIT "Y"
/// dur-month  = 1*DIGIT "M"
/// dur-week   = 1*DIGIT "W"
/// dur-day    = 1*DIGIT "D"
/// dur-hour   = 1*DIGIT "H"
/// dur-minute = 1*DIGIT "M"
/// dur-second = 1*DIGIT "S"
/// ```
///
/// Signs are rejected: the sign of a trigger is decided by the caller.
pub fn value_duration<'src>() -> impl Parser<'src, &'src str, ValueDuration, Extra<'src>> + Clone
{
    let date = designated('Y')
        .then(designated('M'))
        .then(designated('W'))
        .then(designated('D'));

    // dur-time = "T" (dur-hour / dur-minute / dur-second)
    let time = just('T')
        .ignore_then(designated('H').then(designated('M')).then(designated('S')))
        .or_not();

    just('P')
        .ignore_then(date)
        .then(time)
        .try_map(|((((year, month), week), day), time), span| {
            let ((hour, minute), second) = time.unwrap_or_default();
            let day = week
                .checked_mul(7)
                .and_then(|d| d.checked_add(day))
                .ok_or_else(|| Rich::custom(span, "day count is out of range"))?;
            Ok(ValueDuration {
                year,
                month,
                day,
                hour,
                minute,
                second,
            })
        })
}

/// `1*DIGIT` read as a `u32`, leading zeros included.
pub fn value_u32<'src>() -> impl Parser<'src, &'src str, u32, Extra<'src>> + Clone {
    select! { c @ '0'..='9' => c }
        .repeated()
        .at_least(1)
        .at_most(10) // u32 max is 10 digits: 4_294_967_295
        .collect::<String>()
        .try_map(|digits, span| {
            lexical::parse::<u32, _>(&digits)
                .map_err(|_| Rich::custom(span, format!("number '{digits}' is out of range")))
        })
}

/// `1*DIGIT <designator>`, zero when absent.
fn designated<'src>(designator: char) -> impl Parser<'src, &'src str, u32, Extra<'src>> + Clone {
    value_u32()
        .then_ignore(just(designator))
        .or_not()
        .map(Option::unwrap_or_default)
}
