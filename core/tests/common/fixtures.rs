// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Test data factories for integration tests.

use invitecal_core::{FixedClock, Invite};
use jiff::Timestamp;

/// Instant every fixture clock is frozen at.
pub const FIXED_NOW: &str = "2025-01-10T14:00:00Z";

/// Creates a clock frozen at [`FIXED_NOW`].
#[must_use]
pub fn fixed_clock() -> FixedClock {
    FixedClock(FIXED_NOW.parse::<Timestamp>().unwrap())
}

/// Creates an invite with a fixed clock, a known uid and a start time.
///
/// # Example
///
/// ```ignore
/// let text = test_invite().summary("Standup").plain()?;
/// ```
#[must_use]
pub fn test_invite() -> Invite {
    Invite::new()
        .with_clock(fixed_clock())
        .uid("test-uid@invitecal")
        .start("2025-01-20 09:00")
}

/// Drops the `DTSTAMP` and `CREATED` lines, the only ones that depend on the clock.
#[allow(dead_code)]
#[must_use]
pub fn without_timestamps(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .filter(|l| !l.starts_with("DTSTAMP:") && !l.starts_with("CREATED:"))
        .cloned()
        .collect()
}
