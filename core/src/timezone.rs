// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Standard and daylight observances of a timezone around an instant.

use invitecal_ical::keyword::{
    KW_DAYLIGHT, KW_DTSTART, KW_STANDARD, KW_TZID, KW_TZNAME, KW_TZOFFSETFROM, KW_TZOFFSETTO,
    KW_VTIMEZONE, KW_X_LIC_LOCATION,
};
use invitecal_ical::{Formatter, ValueDateTime, ValueUtcOffset};
use jiff::tz::{Offset, TimeZone};
use jiff::{Timestamp, ToSpan};

use crate::cast::timezone_name;
use crate::error::Result;

/// A change of UTC offset in a timezone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Instant the offset takes effect.
    pub at: Timestamp,
    /// UTC offset from then on.
    pub offset: Offset,
    /// Abbreviation, e.g. `MST`.
    pub abbreviation: String,
    /// Whether the offset is daylight saving time.
    pub dst: bool,
}

/// The observances written into a `VTIMEZONE` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observances {
    /// Abbreviation in effect at the start of the window.
    pub abbreviation: String,
    /// Last standard time transition in the window.
    pub standard: Transition,
    /// First daylight saving transition in the window.
    pub daylight: Option<Transition>,
}

impl Observances {
    /// Offset the `STANDARD` block starts from.
    ///
    /// Without daylight saving this is the state at the window start.
    fn standard_from(&self, first: &Transition) -> Offset {
        self.daylight.as_ref().map_or(first.offset, |d| d.offset)
    }
}

/// Transitions of `tz` between one year before and one year after `now`.
///
/// The first record is the state of the zone at the window start.
///
/// # Errors
/// Returns [`Error::TimeRange`](crate::Error::TimeRange) if the window leaves jiff's supported range.
pub fn transitions(tz: &TimeZone, now: Timestamp) -> Result<Vec<Transition>> {
    let now = now.to_zoned(tz.clone());
    let start = now.checked_sub(1.year())?.timestamp();
    let end = now.checked_add(1.year())?.timestamp();

    let info = tz.to_offset_info(start);
    let first = Transition {
        at: start,
        offset: info.offset(),
        abbreviation: info.abbreviation().to_owned(),
        dst: info.dst().is_dst(),
    };

    let following = tz
        .following(start)
        .take_while(|t| t.timestamp() <= end)
        .map(|t| Transition {
            at: t.timestamp(),
            offset: t.offset(),
            abbreviation: t.abbreviation().to_owned(),
            dst: t.dst().is_dst(),
        });

    Ok(std::iter::once(first).chain(following).collect())
}

/// Picks the standard and daylight observances from [`transitions`].
///
/// Returns `None` for an empty list.
#[must_use]
pub fn observances(transitions: &[Transition]) -> Option<Observances> {
    let (first, rest) = transitions.split_first()?;

    let mut standard = first.clone();
    let mut daylight: Option<Transition> = None;
    for t in rest {
        if t.dst {
            if daylight.is_none() {
                daylight = Some(t.clone());
            }
        } else {
            standard = t.clone();
        }
    }

    Some(Observances {
        abbreviation: first.abbreviation.clone(),
        standard,
        daylight,
    })
}

/// Writes the `VTIMEZONE` block of `tz` for an event compiled at `now`.
///
/// # Errors
/// Returns [`Error::InvalidTimezone`](crate::Error::InvalidTimezone) for a
/// zone without an IANA name and [`Error::TimeRange`](crate::Error::TimeRange)
/// if the window is out of range.
pub fn write_vtimezone(f: &mut Formatter, tz: &TimeZone, now: Timestamp) -> Result<()> {
    let name = timezone_name(tz)?;
    let transitions = transitions(tz, now)?;
    let (Some(first), Some(obs)) = (transitions.first(), observances(&transitions)) else {
        return Ok(());
    };

    tracing::debug!(
        timezone = name,
        abbreviation = %obs.abbreviation,
        transitions = transitions.len(),
        daylight = obs.daylight.is_some(),
        "resolved timezone observances"
    );

    f.block(KW_VTIMEZONE, |f| {
        f.property(KW_TZID, name);
        f.property(KW_X_LIC_LOCATION, name);

        let standard_from = obs.standard_from(first);
        write_observance(f, KW_STANDARD, &obs.standard, standard_from)?;
        if let Some(daylight) = &obs.daylight {
            write_observance(f, KW_DAYLIGHT, daylight, obs.standard.offset)?;
        }
        Ok(())
    })
}

fn write_observance(f: &mut Formatter, kind: &str, to: &Transition, from: Offset) -> Result<()> {
    f.block(kind, |f| {
        // local time before the change
        let start = ValueDateTime::from(from.to_datetime(to.at));
        f.property(KW_DTSTART, start);
        f.property(KW_TZOFFSETFROM, ValueUtcOffset::from(from));
        f.property(KW_TZOFFSETTO, ValueUtcOffset::from(to.offset));
        f.property(KW_TZNAME, &to.abbreviation);
        Ok(())
    })
}
