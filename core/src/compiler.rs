// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Assemble the `VCALENDAR` text of one event.

use invitecal_ical::keyword::{
    KW_ACTION, KW_ACTION_DISPLAY, KW_DESCRIPTION, KW_PRODID, KW_TRIGGER, KW_TZID, KW_UID,
    KW_VALARM, KW_VCALENDAR, KW_VERSION, KW_VERSION_2_0, KW_VEVENT,
};
use invitecal_ical::{FormatOptions, Formatter};
use jiff::Timestamp;
use uuid::Uuid;

use crate::attributes::{EventAttributes, Value};
use crate::cast::{CastContext, cast};
use crate::config::{Config, MissingFieldPolicy};
use crate::error::{Error, Result};
use crate::field::{ALLOWED, CALENDAR, EVENT, Field};
use crate::timezone::write_vtimezone;

/// Text of the `DESCRIPTION` inside the alarm block.
const ALARM_DESCRIPTION: &str = "Reminder";

/// Compiles the attributes into content lines, without terminators.
///
/// `now` supplies `DTSTAMP` and `CREATED` and anchors relative date/time
/// phrases. Every call starts from an empty buffer.
///
/// # Errors
/// Returns [`Error::MissingRequiredField`] when a required field has no value
/// under [`MissingFieldPolicy::Error`], and any error raised while resolving
/// date/time phrases or the timezone.
#[tracing::instrument(skip_all, fields(timezone = attrs.timezone()))]
pub fn compile(attrs: &EventAttributes, config: &Config, now: Timestamp) -> Result<Vec<String>> {
    let compiler = Compiler {
        attrs,
        config,
        ctx: CastContext {
            now,
            timezone: attrs.time_zone(),
        },
    };

    let options = FormatOptions::default().escape_text(config.escape_text);
    let mut f = Formatter::new(options);
    f.block(KW_VCALENDAR, |f| compiler.write_calendar(f))?;

    tracing::debug!(lines = f.lines().len(), "compiled invitation");
    Ok(f.into_lines())
}

struct Compiler<'a> {
    attrs: &'a EventAttributes,
    config: &'a Config,
    ctx: CastContext<'a>,
}

impl Compiler<'_> {
    fn write_calendar(&self, f: &mut Formatter) -> Result<()> {
        for &field in CALENDAR {
            self.write_field(f, field)?;
        }

        if let Some(tz) = self.ctx.timezone {
            write_vtimezone(f, tz, self.ctx.now)?;
        }

        f.block(KW_VEVENT, |f| self.write_event(f))
    }

    fn write_event(&self, f: &mut Formatter) -> Result<()> {
        match self.attrs.uid().filter(|uid| !uid.is_empty()) {
            Some(uid) => f.property(KW_UID, uid),
            None => f.property(KW_UID, Uuid::new_v4()),
        }

        let params = EVENT
            .iter()
            .chain(ALLOWED)
            .copied()
            .filter(|&field| !matches!(field, Field::Uid | Field::Method | Field::Timezone));
        for field in params {
            self.write_field(f, field)?;
        }
        Ok(())
    }

    /// Writes one field, or nothing if it is optional and unset.
    fn write_field(&self, f: &mut Formatter, field: Field) -> Result<()> {
        if !self.attrs.has(field) {
            if field.required() {
                self.write_missing(f, field)?;
            }
            return Ok(());
        }

        let name = field.property_name();
        match field {
            Field::Prodid => f.property(KW_PRODID, &self.config.prodid),
            Field::Version => f.property(KW_VERSION, KW_VERSION_2_0),
            Field::Stamp | Field::Created => {
                let stamp = self.cast_field(field, &Value::Timestamp(self.ctx.now))?;
                f.property(name, stamp);
            }
            Field::Reminder => {
                if let Some(value) = self.attrs.value(field) {
                    let trigger = self.cast_field(field, &value)?;
                    f.block(KW_VALARM, |f| {
                        f.property(KW_TRIGGER, format_args!("-{trigger}"));
                        f.property(KW_ACTION, KW_ACTION_DISPLAY);
                        f.property(KW_DESCRIPTION, ALARM_DESCRIPTION);
                        Ok::<_, Error>(())
                    })?;
                }
            }
            Field::Summary | Field::Location | Field::Description => {
                if let Some(text) = self.attrs.text(field) {
                    f.text_property(name, text);
                }
            }
            Field::Start
            | Field::End
            | Field::Duration
            | Field::Method
            | Field::Uid
            | Field::Sequence
            | Field::Timezone => {
                if let Some(value) = self.attrs.value(field) {
                    let text = self.cast_field(field, &value)?;
                    self.write_zoned(f, field, text);
                }
            }
        }
        Ok(())
    }

    /// Renders a value with the cast of its field, or as is without one.
    fn cast_field(&self, field: Field, value: &Value) -> Result<String> {
        let Some(kind) = field.cast_kind() else {
            return Ok(value.to_string());
        };

        // times of properties without TZID are written in UTC
        let ctx = if field.zoned() {
            self.ctx
        } else {
            CastContext {
                timezone: None,
                ..self.ctx
            }
        };
        cast(value, kind, &ctx)
    }

    fn write_zoned(&self, f: &mut Formatter, field: Field, value: impl std::fmt::Display) {
        let name = field.property_name();
        match self.attrs.timezone() {
            Some(tzid) if field.zoned() => f.property_with_params(name, &[(KW_TZID, tzid)], value),
            _ => f.property(name, value),
        }
    }

    fn write_missing(&self, f: &mut Formatter, field: Field) -> Result<()> {
        match self.config.missing_field {
            MissingFieldPolicy::Error => Err(Error::MissingRequiredField { field }),
            MissingFieldPolicy::RenderEmpty => {
                tracing::warn!(%field, "required field is not set, rendered empty");
                self.write_zoned(f, field, "");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> Timestamp {
        "2025-01-10T14:00:00Z".parse().unwrap()
    }

    fn attrs(props: &[(&str, &str)]) -> EventAttributes {
        let mut attrs = EventAttributes::new();
        attrs
            .merge(props.iter().map(|&(k, v)| (k, Value::from(v))))
            .unwrap();
        attrs
    }

    #[test]
    fn test_compile_minimal_event() {
        let attrs = attrs(&[("uid", "abc@example.com"), ("start", "2025-01-20T09:00:00Z")]);
        let lines = compile(&attrs, &Config::default(), now()).unwrap();
        assert_eq!(
            lines,
            [
                "BEGIN:VCALENDAR",
                "PRODID:-//invitecal//invitecal//EN",
                "VERSION:2.0",
                "BEGIN:VEVENT",
                "UID:abc@example.com",
                "DTSTAMP:20250110T140000Z",
                "CREATED:20250110T140000Z",
                "DTSTART:20250120T090000Z",
                "END:VEVENT",
                "END:VCALENDAR",
            ]
        );
    }

    #[test]
    fn test_compile_property_order() {
        let attrs = attrs(&[
            ("reminder", "15m"),
            ("sequence", "1"),
            ("description", "Agenda"),
            ("location", "Room 1"),
            ("summary", "Review"),
            ("method", "req"),
            ("start", "2025-01-20 09:00"),
            ("uid", "abc"),
            ("end", "2025-01-20 10:00"),
        ]);
        let lines = compile(&attrs, &Config::default(), now()).unwrap();
        assert_eq!(
            lines,
            [
                "BEGIN:VCALENDAR",
                "PRODID:-//invitecal//invitecal//EN",
                "VERSION:2.0",
                "METHOD:REQUEST",
                "BEGIN:VEVENT",
                "UID:abc",
                "DTSTAMP:20250110T140000Z",
                "CREATED:20250110T140000Z",
                "DTEND:20250120T100000Z",
                "DTSTART:20250120T090000Z",
                "SUMMARY:Review",
                "LOCATION:Room 1",
                "DESCRIPTION:Agenda",
                "SEQUENCE:1",
                "BEGIN:VALARM",
                "TRIGGER:-PT15M",
                "ACTION:DISPLAY",
                "DESCRIPTION:Reminder",
                "END:VALARM",
                "END:VEVENT",
                "END:VCALENDAR",
            ]
        );
    }

    #[test]
    fn test_compile_missing_start() {
        let attrs = attrs(&[("summary", "No start")]);
        let err = compile(&attrs, &Config::default(), now()).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingRequiredField {
                field: Field::Start
            }
        ));
    }

    #[test]
    fn test_compile_missing_start_render_empty() {
        let attrs = attrs(&[("uid", "abc"), ("timezone", "America/Edmonton")]);
        let config = Config {
            missing_field: MissingFieldPolicy::RenderEmpty,
            ..Config::default()
        };
        let lines = compile(&attrs, &config, now()).unwrap();
        assert!(lines.contains(&"DTSTART;TZID=America/Edmonton:".to_owned()));
    }

    #[test]
    fn test_compile_zoned_times() {
        let attrs = attrs(&[
            ("uid", "abc"),
            ("timezone", "America/Edmonton"),
            ("start", "2025-07-01 09:30"),
            ("duration", "1h"),
        ]);
        let lines = compile(&attrs, &Config::default(), now()).unwrap();
        assert!(lines.contains(&"DTSTART;TZID=America/Edmonton:20250701T093000".to_owned()));
        assert!(lines.contains(&"DURATION:PT1H".to_owned()));
        assert!(lines.contains(&"DTSTAMP:20250110T140000Z".to_owned()));
        assert_eq!(lines[3], "BEGIN:VTIMEZONE");
        assert_eq!(lines[4], "TZID:America/Edmonton");
    }

    #[test]
    fn test_compile_casts_each_field() {
        let mut attrs = attrs(&[
            ("uid", "abc"),
            ("timezone", "Asia/Tokyo"),
            ("start", "2025-01-20T09:00:00Z"),
            ("method", "publish"),
            ("sequence", "2"),
        ]);
        attrs
            .set(Field::Reminder, Value::from(std::time::Duration::from_secs(300)))
            .unwrap();
        let lines = compile(&attrs, &Config::default(), now()).unwrap();

        assert!(lines.contains(&"METHOD:PUBLISH".to_owned()));
        assert!(lines.contains(&"DTSTART;TZID=Asia/Tokyo:20250120T180000".to_owned()));
        assert!(lines.contains(&"DTSTAMP:20250110T140000Z".to_owned()));
        assert!(lines.contains(&"SEQUENCE:2".to_owned()));
        assert!(lines.contains(&"TRIGGER:-PT5M".to_owned()));
    }

    #[test]
    fn test_compile_escapes_text_when_configured() {
        let attrs = attrs(&[("uid", "abc"), ("start", "now"), ("summary", "Lunch; maybe, later")]);
        let config = Config {
            escape_text: true,
            ..Config::default()
        };
        let lines = compile(&attrs, &config, now()).unwrap();
        assert!(lines.contains(&"SUMMARY:Lunch\\; maybe\\, later".to_owned()));

        let lines = compile(&attrs, &Config::default(), now()).unwrap();
        assert!(lines.contains(&"SUMMARY:Lunch; maybe, later".to_owned()));
    }

    #[test]
    fn test_compile_generates_uid() {
        let attrs = attrs(&[("start", "now")]);
        let lines = compile(&attrs, &Config::default(), now()).unwrap();
        let uid = lines
            .iter()
            .find_map(|l| l.strip_prefix("UID:"))
            .unwrap();
        let uuid = Uuid::parse_str(uid).unwrap();
        assert_eq!(uuid.get_version_num(), 4);
    }

    #[test]
    fn test_compile_malformed_start() {
        let attrs = attrs(&[("start", "the day after never")]);
        let err = compile(&attrs, &Config::default(), now()).unwrap_err();
        assert!(matches!(err, Error::MalformedDateTime { .. }));
    }
}
