// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use invitecal_ical::join_lines;

use crate::attributes::{EventAttributes, Value};
use crate::clock::{Clock, SystemClock};
use crate::compiler::compile;
use crate::config::Config;
use crate::datetime::DateTimeValue;
use crate::error::Result;
use crate::field::Field;

/// A calendar invitation for a single event.
///
/// Setters take and return the invite so calls can be chained; the text is
/// compiled anew on every call to [`Invite::raw`], [`Invite::plain`] or
/// [`Invite::file`].
///
/// ```
/// use invitecal_core::Invite;
///
/// let text = Invite::new()
///     .start("2025-01-20 09:00")
///     .duration("1h")?
///     .summary("Planning")
///     .reminder("15m")?
///     .plain()?;
/// assert!(text.starts_with("BEGIN:VCALENDAR\r\n"));
/// assert!(text.contains("DURATION:PT1H\r\n"));
/// assert!(text.contains("TRIGGER:-PT15M\r\n"));
/// # Ok::<(), invitecal_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Invite {
    attributes: EventAttributes,
    config: Config,
    clock: Arc<dyn Clock>,
}

impl Default for Invite {
    fn default() -> Self {
        Self {
            attributes: EventAttributes::default(),
            config: Config::default(),
            clock: Arc::new(SystemClock),
        }
    }
}

impl Invite {
    /// Creates an invite with no attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an invite from `(name, value)` pairs, see [`Invite::merge`].
    ///
    /// # Errors
    /// Returns the first error raised by a setter.
    pub fn build<I, K, V>(props: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        Self::new().merge(props)
    }

    /// Replaces the configuration and applies its default timezone when none is set.
    ///
    /// # Errors
    /// Returns [`Error::InvalidTimezone`](crate::Error::InvalidTimezone) if
    /// the default timezone is unknown.
    pub fn with_config(mut self, config: Config) -> Result<Self> {
        if !self.attributes.has(Field::Timezone)
            && let Some(tz) = config.default_timezone.as_deref()
        {
            self.attributes.set_timezone(&Value::from(tz))?;
        }
        self.config = config;
        Ok(self)
    }

    /// Replaces the clock used for `DTSTAMP`, `CREATED` and relative phrases.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Sets the start.
    #[must_use]
    pub fn start(mut self, start: impl Into<DateTimeValue>) -> Self {
        self.attributes.set_start(start.into());
        self
    }

    /// Sets the end. Ignored if a duration is set.
    #[must_use]
    pub fn end(mut self, end: impl Into<DateTimeValue>) -> Self {
        self.attributes.set_end(end.into());
        self
    }

    /// Sets the duration from a phrase like `1h 30m`, an ISO 8601 string or
    /// a structured interval. Ignored if an end is set.
    ///
    /// # Errors
    /// Returns [`Error::MalformedDuration`](crate::Error::MalformedDuration) if the value is not an interval.
    pub fn duration(mut self, duration: impl Into<Value>) -> Result<Self> {
        self.attributes.set_duration(&duration.into())?;
        Ok(self)
    }

    /// Sets the summary.
    #[must_use]
    pub fn summary(self, summary: impl Into<String>) -> Self {
        self.text(Field::Summary, summary.into())
    }

    /// Sets the location.
    #[must_use]
    pub fn location(self, location: impl Into<String>) -> Self {
        self.text(Field::Location, location.into())
    }

    /// Sets the description.
    #[must_use]
    pub fn description(self, description: impl Into<String>) -> Self {
        self.text(Field::Description, description.into())
    }

    /// Sets the method, e.g. `request` or its alias `req`.
    #[must_use]
    pub fn method(self, method: impl Into<String>) -> Self {
        self.text(Field::Method, method.into())
    }

    /// Sets the sequence number.
    #[must_use]
    pub fn sequence(self, sequence: impl ToString) -> Self {
        self.text(Field::Sequence, sequence.to_string())
    }

    /// Sets the unique identifier. A random one is generated when unset.
    #[must_use]
    pub fn uid(self, uid: impl Into<String>) -> Self {
        self.text(Field::Uid, uid.into())
    }

    /// Sets the timezone by IANA name or as a [`jiff::tz::TimeZone`].
    ///
    /// # Errors
    /// Returns [`Error::InvalidTimezone`](crate::Error::InvalidTimezone) if the zone is unknown.
    pub fn timezone(mut self, timezone: impl Into<Value>) -> Result<Self> {
        self.attributes.set_timezone(&timezone.into())?;
        Ok(self)
    }

    /// Sets the reminder offset before the start, e.g. `15m` or `PT30M`.
    ///
    /// # Errors
    /// Returns [`Error::MalformedDuration`](crate::Error::MalformedDuration) if the value is not an interval.
    pub fn reminder(mut self, reminder: impl Into<Value>) -> Result<Self> {
        self.attributes.set_reminder(&reminder.into())?;
        Ok(self)
    }

    /// Sets a field by name. Unknown names are ignored.
    ///
    /// # Errors
    /// Returns the error of the field's setter.
    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Result<Self> {
        self.attributes.set_key(key, value.into())?;
        Ok(self)
    }

    /// Sets a field by name to the result of `f`, evaluated immediately.
    ///
    /// # Errors
    /// Returns the error of the field's setter.
    pub fn set_with<V, F>(self, key: &str, f: F) -> Result<Self>
    where
        V: Into<Value>,
        F: FnOnce() -> V,
    {
        self.set(key, f())
    }

    /// Sets every `(name, value)` pair through its field setter.
    ///
    /// # Errors
    /// Returns the first error raised by a setter.
    pub fn merge<I, K, V>(mut self, props: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        self.attributes.merge(props)?;
        Ok(self)
    }

    /// The attributes set so far.
    #[must_use]
    pub fn attributes(&self) -> &EventAttributes {
        &self.attributes
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Compiles the invite into content lines.
    ///
    /// # Errors
    /// Returns [`Error::MissingRequiredField`](crate::Error::MissingRequiredField)
    /// if the start is not set, or an error raised while resolving a date/time.
    pub fn raw(&self) -> Result<Vec<String>> {
        compile(&self.attributes, &self.config, self.clock.now())
    }

    /// Compiles the invite into CRLF terminated text.
    ///
    /// # Errors
    /// See [`Invite::raw`].
    pub fn plain(&self) -> Result<String> {
        Ok(join_lines(&self.raw()?))
    }

    /// Compiles the invite and writes it to a new `.ics` file in the temporary directory.
    ///
    /// The file is kept; removing it is up to the caller.
    ///
    /// # Errors
    /// See [`Invite::raw`]; also returns [`Error::Io`](crate::Error::Io) if writing fails.
    #[tracing::instrument(skip(self))]
    pub fn file(&self) -> Result<PathBuf> {
        let text = self.plain()?;

        let mut file = tempfile::Builder::new()
            .prefix("invite-")
            .suffix(".ics")
            .tempfile()?;
        file.write_all(text.as_bytes())?;
        file.flush()?;
        let (_, path) = file.keep().map_err(|e| e.error)?;

        tracing::info!(path = %path.display(), bytes = text.len(), "invitation written");
        Ok(path)
    }

    fn text(mut self, field: Field, value: String) -> Self {
        // text fields have infallible setters
        if let Err(err) = self.attributes.set(field, Value::Text(value)) {
            tracing::warn!(%field, %err, "failed to set field");
        }
        self
    }
}
