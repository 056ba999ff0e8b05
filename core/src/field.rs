// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use invitecal_ical::keyword::{
    KW_CREATED, KW_DESCRIPTION, KW_DTEND, KW_DTSTAMP, KW_DTSTART, KW_DURATION, KW_LOCATION,
    KW_METHOD, KW_PRODID, KW_SEQUENCE, KW_SUMMARY, KW_TRIGGER, KW_TZID, KW_UID, KW_VERSION,
};

use crate::cast::CastKind;

/// An attribute of the compiled event.
///
/// Names are matched case-insensitively when parsed from user input, e.g. the
/// keys of [`Invite::merge`](crate::Invite::merge).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Field {
    /// Event end, exclusive with [`Field::Duration`].
    End,
    /// Globally unique identifier.
    Uid,
    /// Event start.
    Start,
    /// iTIP method of the calendar, e.g. `REQUEST`.
    Method,
    /// One-line summary.
    Summary,
    /// Free text location.
    Location,
    /// Free text description.
    Description,
    /// Event length, exclusive with [`Field::End`].
    Duration,
    /// Revision counter.
    Sequence,
    /// IANA timezone the event times are written in.
    Timezone,
    /// Offset before the start at which a display alarm fires.
    Reminder,
    /// Time the invitation was compiled.
    Stamp,
    /// Creation time, same as [`Field::Stamp`].
    Created,
    /// Product identifier of the producer.
    Prodid,
    /// iCalendar version, always `2.0`.
    Version,
}

/// Calendar-level fields, in emission order.
pub const CALENDAR: &[Field] = &[Field::Prodid, Field::Version, Field::Method];

/// Fields that every event carries, in emission order.
pub const EVENT: &[Field] = &[Field::Stamp, Field::Created];

/// Fields settable through the public API, in emission order.
pub const ALLOWED: &[Field] = &[
    Field::End,
    Field::Uid,
    Field::Start,
    Field::Method,
    Field::Summary,
    Field::Location,
    Field::Description,
    Field::Duration,
    Field::Sequence,
    Field::Timezone,
    Field::Reminder,
];

/// Fields that must be rendered.
pub const REQUIRED: &[Field] = &[
    Field::Stamp,
    Field::Start,
    Field::Prodid,
    Field::Created,
    Field::Version,
];

impl Field {
    /// Whether the field can be set by the caller.
    #[must_use]
    pub fn allowed(self) -> bool {
        ALLOWED.contains(&self)
    }

    /// Whether the field must be present in the output.
    #[must_use]
    pub fn required(self) -> bool {
        REQUIRED.contains(&self)
    }

    /// How a stored value is turned into text, `None` for values written as is.
    #[must_use]
    pub const fn cast_kind(self) -> Option<CastKind> {
        match self {
            Field::Start | Field::End | Field::Stamp | Field::Created => Some(CastKind::DateTime),
            Field::Duration | Field::Reminder => Some(CastKind::Interval),
            Field::Timezone => Some(CastKind::TimeZone),
            Field::Method => Some(CastKind::Upper),
            Field::Uid
            | Field::Summary
            | Field::Location
            | Field::Description
            | Field::Sequence
            | Field::Prodid
            | Field::Version => None,
        }
    }

    /// The iCalendar property name the field is written as.
    #[must_use]
    pub const fn property_name(self) -> &'static str {
        match self {
            Field::End => KW_DTEND,
            Field::Uid => KW_UID,
            Field::Start => KW_DTSTART,
            Field::Method => KW_METHOD,
            Field::Summary => KW_SUMMARY,
            Field::Location => KW_LOCATION,
            Field::Description => KW_DESCRIPTION,
            Field::Duration => KW_DURATION,
            Field::Sequence => KW_SEQUENCE,
            Field::Timezone => KW_TZID,
            Field::Reminder => KW_TRIGGER,
            Field::Stamp => KW_DTSTAMP,
            Field::Created => KW_CREATED,
            Field::Prodid => KW_PRODID,
            Field::Version => KW_VERSION,
        }
    }

    /// Whether the property carries a `TZID` parameter when the event has a timezone.
    #[must_use]
    pub const fn zoned(self) -> bool {
        matches!(self, Field::Start | Field::End)
    }
}
