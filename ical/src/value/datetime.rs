// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Date-time and UTC offset values as defined in RFC 5545 Sections 3.3.5 and 3.3.14.

use std::fmt;

/// Date value in the iCalendar format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueDate {
    /// Year component.
    pub year: i16,

    /// Month component, 1-12.
    pub month: i8,

    /// Day component, 1-31.
    pub day: i8,
}

impl fmt::Display for ValueDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}{:02}", self.year, self.month, self.day)
    }
}

#[cfg(feature = "jiff")]
impl From<jiff::civil::Date> for ValueDate {
    fn from(date: jiff::civil::Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

/// Time value in the iCalendar format, without fractional seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueTime {
    /// Hour component, 0-23.
    pub hour: i8,

    /// Minute component, 0-59.
    pub minute: i8,

    /// Second component, 0-60.
    pub second: i8,
}

impl fmt::Display for ValueTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}{:02}", self.hour, self.minute, self.second)
    }
}

#[cfg(feature = "jiff")]
impl From<jiff::civil::Time> for ValueTime {
    fn from(time: jiff::civil::Time) -> Self {
        Self {
            hour: time.hour(),
            minute: time.minute(),
            second: time.second(),
        }
    }
}

/// Date-time value in the basic format `YYYYMMDDTHHMMSS[Z]`.
///
/// ```txt
/// date-time  = date "T" time ;As specified in the DATE and TIME
///                            ;value definitions
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueDateTime {
    /// Date part.
    pub date: ValueDate,

    /// Time part.
    pub time: ValueTime,

    /// Whether the value is in UTC, rendered with a trailing `Z`.
    pub utc: bool,
}

impl ValueDateTime {
    /// Mark this value as UTC.
    #[must_use]
    pub const fn utc(mut self) -> Self {
        self.utc = true;
        self
    }

    /// Mark this value as local (floating or `TZID`-qualified) time.
    #[must_use]
    pub const fn local(mut self) -> Self {
        self.utc = false;
        self
    }
}

impl fmt::Display for ValueDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}T{}", self.date, self.time)?;
        if self.utc {
            write!(f, "Z")?;
        }
        Ok(())
    }
}

/// Converts a civil datetime into a local (non-UTC) value, dropping sub-second precision.
#[cfg(feature = "jiff")]
impl From<jiff::civil::DateTime> for ValueDateTime {
    fn from(dt: jiff::civil::DateTime) -> Self {
        Self {
            date: dt.date().into(),
            time: dt.time().into(),
            utc: false,
        }
    }
}

/// Converts an instant into a UTC value.
#[cfg(feature = "jiff")]
impl From<jiff::Timestamp> for ValueDateTime {
    fn from(ts: jiff::Timestamp) -> Self {
        let dt = jiff::tz::Offset::UTC.to_datetime(ts);
        Self::from(dt).utc()
    }
}

/// UTC offset value defined in RFC 5545 Section 3.3.14.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueUtcOffset {
    /// Whether the offset is positive
    pub positive: bool,

    /// Hour, 0-23
    pub hour: u8,

    /// Minute, 0-59
    pub minute: u8,

    /// Second, 0-60, optional
    pub second: Option<u8>,
}

impl ValueUtcOffset {
    /// Build an offset from a signed number of seconds east of UTC.
    ///
    /// Hours and minutes are truncated toward the hour boundary: leftover
    /// seconds are dropped, never rounded.
    #[must_use]
    pub fn from_seconds(seconds: i32) -> Self {
        let magnitude = seconds.unsigned_abs();
        let hour = magnitude / 3600;
        let minute = (magnitude - hour * 3600) / 60;
        Self {
            positive: seconds >= 0,
            hour: u8::try_from(hour).unwrap_or(u8::MAX),
            minute: u8::try_from(minute).unwrap_or(0),
            second: None,
        }
    }
}

impl fmt::Display for ValueUtcOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.positive { "+" } else { "-" };
        write!(f, "{sign}{:02}{:02}", self.hour, self.minute)?;
        if let Some(second) = self.second {
            write!(f, "{second:02}")?;
        }
        Ok(())
    }
}

#[cfg(feature = "jiff")]
impl From<jiff::tz::Offset> for ValueUtcOffset {
    fn from(offset: jiff::tz::Offset) -> Self {
        Self::from_seconds(offset.seconds())
    }
}
