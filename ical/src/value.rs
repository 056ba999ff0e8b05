// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Property value types written by the formatter.
//!
//! This module covers the iCalendar value types as defined in RFC 5545
//! Section 3.3 that an event invitation needs: DATE-TIME, DURATION,
//! UTC-OFFSET and TEXT.

mod datetime;
mod duration;
mod text;

pub use datetime::{ValueDate, ValueDateTime, ValueTime, ValueUtcOffset};
pub use duration::{DurationError, ValueDuration, value_duration, value_u32};
pub use text::escape_text;
