// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use invitecal_ical::ValueDuration;
use jiff::tz::TimeZone;
use jiff::{Span, Timestamp, Zoned, civil};

use crate::cast::{cast_interval, cast_timezone};
use crate::datetime::DateTimeValue;
use crate::error::{Error, Result};
use crate::field::Field;

/// A value given to an attribute setter.
#[derive(Debug, Clone)]
pub enum Value {
    /// Text, also used for date/time and interval phrases.
    Text(String),
    /// An absolute instant.
    Timestamp(Timestamp),
    /// An instant with its own timezone.
    Zoned(Zoned),
    /// A wall-clock time.
    Civil(civil::DateTime),
    /// A calendar span.
    Span(Span),
    /// A clock duration.
    Duration(std::time::Duration),
    /// An already parsed interval.
    Interval(ValueDuration),
    /// A timezone.
    TimeZone(TimeZone),
}

impl Value {
    /// Whether the value is blank text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Text(s) if s.trim().is_empty())
    }

    /// Views the value as a date/time.
    ///
    /// # Errors
    /// Returns [`Error::MalformedDateTime`] for intervals and timezones.
    pub fn to_datetime(&self) -> Result<DateTimeValue> {
        match self {
            Value::Text(s) => Ok(DateTimeValue::Text(s.clone())),
            Value::Timestamp(ts) => Ok(DateTimeValue::Timestamp(*ts)),
            Value::Zoned(zoned) => Ok(DateTimeValue::Zoned(zoned.clone())),
            Value::Civil(dt) => Ok(DateTimeValue::Civil(*dt)),
            Value::Span(_) | Value::Duration(_) | Value::Interval(_) | Value::TimeZone(_) => {
                Err(Error::MalformedDateTime {
                    input: self.to_string(),
                })
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Timestamp(ts) => write!(f, "{ts}"),
            Value::Zoned(zoned) => write!(f, "{zoned}"),
            Value::Civil(dt) => write!(f, "{dt}"),
            Value::Span(span) => write!(f, "{span}"),
            Value::Duration(duration) => write!(f, "{duration:?}"),
            Value::Interval(duration) => write!(f, "{duration}"),
            Value::TimeZone(tz) => write!(f, "{}", tz.iana_name().unwrap_or_default()),
        }
    }
}

macro_rules! impl_from_for_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

impl_from_for_value! {
    String => Text,
    Timestamp => Timestamp,
    Zoned => Zoned,
    civil::DateTime => Civil,
    Span => Span,
    std::time::Duration => Duration,
    ValueDuration => Interval,
    TimeZone => TimeZone,
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Text(value.clone())
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<DateTimeValue> for Value {
    fn from(value: DateTimeValue) -> Self {
        match value {
            DateTimeValue::Text(s) => Value::Text(s),
            DateTimeValue::Timestamp(ts) => Value::Timestamp(ts),
            DateTimeValue::Zoned(zoned) => Value::Zoned(zoned),
            DateTimeValue::Civil(dt) => Value::Civil(dt),
        }
    }
}

/// The attributes of one event.
///
/// Intervals and timezones are validated when set; date/time phrases are kept
/// as given and resolved when the event is compiled.
#[derive(Debug, Clone, Default)]
pub struct EventAttributes {
    uid: Option<String>,
    start: Option<DateTimeValue>,
    end: Option<DateTimeValue>,
    duration: Option<ValueDuration>,
    summary: Option<String>,
    location: Option<String>,
    description: Option<String>,
    method: Option<String>,
    sequence: Option<String>,
    timezone: Option<TimeZone>,
    reminder: Option<ValueDuration>,
}

impl EventAttributes {
    /// Creates an empty attribute set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field by name. Names are case-insensitive; unknown names are ignored.
    ///
    /// # Errors
    /// See [`EventAttributes::set`].
    pub fn set_key(&mut self, key: &str, value: Value) -> Result<()> {
        match key.trim().parse::<Field>() {
            Ok(field) => self.set(field, value),
            Err(_) => {
                tracing::debug!(key, "unknown field ignored");
                Ok(())
            }
        }
    }

    /// Sets a field through its setter. Fields outside [`ALLOWED`](crate::field::ALLOWED) are ignored.
    ///
    /// # Errors
    /// Returns [`Error::MalformedDuration`] for bad `duration` or `reminder`
    /// input, [`Error::InvalidTimezone`] for an unknown `timezone` and
    /// [`Error::MalformedDateTime`] if `start` or `end` is not a date/time.
    pub fn set(&mut self, field: Field, value: Value) -> Result<()> {
        match field {
            Field::Start => self.set_start(value.to_datetime()?),
            Field::End => self.set_end(value.to_datetime()?),
            Field::Duration => self.set_duration(&value)?,
            Field::Reminder => self.set_reminder(&value)?,
            Field::Timezone => self.set_timezone(&value)?,
            Field::Uid => self.uid = Some(value.to_string()),
            Field::Summary => self.summary = Some(value.to_string()),
            Field::Location => self.location = Some(value.to_string()),
            Field::Description => self.description = Some(value.to_string()),
            Field::Method => self.method = Some(value.to_string()),
            Field::Sequence => self.sequence = Some(value.to_string()),
            Field::Stamp | Field::Created | Field::Prodid | Field::Version => {
                tracing::debug!(%field, "field is not settable, ignored");
            }
        }
        Ok(())
    }

    /// Applies [`EventAttributes::set_key`] to every entry.
    ///
    /// # Errors
    /// Stops at the first entry whose setter fails.
    pub fn merge<I, K, V>(&mut self, props: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (key, value) in props {
            self.set_key(key.as_ref(), value.into())?;
        }
        Ok(())
    }

    /// Sets the start.
    pub fn set_start(&mut self, value: DateTimeValue) {
        self.start = Some(value);
    }

    /// Sets the end, unless a duration is already set.
    pub fn set_end(&mut self, value: DateTimeValue) {
        if self.has(Field::Duration) {
            tracing::debug!(end = %value, "duration is already set, end ignored");
            return;
        }
        self.end = Some(value);
    }

    /// Sets the duration, unless an end is already set.
    ///
    /// # Errors
    /// Returns [`Error::MalformedDuration`] if the value is not an interval.
    pub fn set_duration(&mut self, value: &Value) -> Result<()> {
        if self.has(Field::End) {
            tracing::debug!(duration = %value, "end is already set, duration ignored");
            return Ok(());
        }
        self.duration = Some(cast_interval(value)?);
        Ok(())
    }

    /// Sets the reminder offset.
    ///
    /// # Errors
    /// Returns [`Error::MalformedDuration`] if the value is not an interval.
    pub fn set_reminder(&mut self, value: &Value) -> Result<()> {
        self.reminder = Some(cast_interval(value)?);
        Ok(())
    }

    /// Sets the timezone.
    ///
    /// # Errors
    /// Returns [`Error::InvalidTimezone`] if the zone is unknown.
    pub fn set_timezone(&mut self, value: &Value) -> Result<()> {
        self.timezone = Some(cast_timezone(value)?);
        Ok(())
    }

    /// Whether the field has a value to render.
    ///
    /// Computed fields always have one.
    #[must_use]
    pub fn has(&self, field: Field) -> bool {
        match field {
            Field::Start => self.start.as_ref().is_some_and(|v| !v.is_empty()),
            Field::End => self.end.as_ref().is_some_and(|v| !v.is_empty()),
            Field::Duration => self.duration.is_some(),
            Field::Reminder => self.reminder.is_some(),
            Field::Timezone => self.timezone.is_some(),
            Field::Uid
            | Field::Summary
            | Field::Location
            | Field::Description
            | Field::Method
            | Field::Sequence => self.text(field).is_some_and(|s| !s.is_empty()),
            Field::Stamp | Field::Created | Field::Prodid | Field::Version => true,
        }
    }

    /// The stored text of a free text field, `None` for other fields.
    #[must_use]
    pub fn text(&self, field: Field) -> Option<&str> {
        let text = match field {
            Field::Uid => &self.uid,
            Field::Summary => &self.summary,
            Field::Location => &self.location,
            Field::Description => &self.description,
            Field::Method => &self.method,
            Field::Sequence => &self.sequence,
            _ => return None,
        };
        text.as_deref()
    }

    /// The stored value of a settable field, as given to its cast.
    ///
    /// `None` for unset and computed fields.
    #[must_use]
    pub fn value(&self, field: Field) -> Option<Value> {
        match field {
            Field::Start => self.start.clone().map(Value::from),
            Field::End => self.end.clone().map(Value::from),
            Field::Duration => self.duration.map(Value::Interval),
            Field::Reminder => self.reminder.map(Value::Interval),
            Field::Timezone => self.timezone.clone().map(Value::TimeZone),
            _ => self.text(field).map(Value::from),
        }
    }

    /// Unique identifier.
    #[must_use]
    pub fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }

    /// Start as given.
    #[must_use]
    pub fn start(&self) -> Option<&DateTimeValue> {
        self.start.as_ref()
    }

    /// End as given.
    #[must_use]
    pub fn end(&self) -> Option<&DateTimeValue> {
        self.end.as_ref()
    }

    /// Duration of the event.
    #[must_use]
    pub fn duration(&self) -> Option<ValueDuration> {
        self.duration
    }

    /// Summary.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Location.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Method as given, see [`cast_upper`](crate::cast::cast_upper) for its rendering.
    #[must_use]
    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }

    /// Sequence number.
    #[must_use]
    pub fn sequence(&self) -> Option<&str> {
        self.sequence.as_deref()
    }

    /// IANA name of the timezone.
    #[must_use]
    pub fn timezone(&self) -> Option<&str> {
        self.timezone.as_ref().and_then(TimeZone::iana_name)
    }

    /// The timezone.
    #[must_use]
    pub fn time_zone(&self) -> Option<&TimeZone> {
        self.timezone.as_ref()
    }

    /// Reminder offset before the start.
    #[must_use]
    pub fn reminder(&self) -> Option<ValueDuration> {
        self.reminder
    }
}
