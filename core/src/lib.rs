// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Compile a single event into an iCalendar (RFC 5545) invitation.

pub mod attributes;
pub mod cast;
pub mod clock;
pub mod compiler;
pub mod datetime;
pub mod field;
pub mod timezone;

mod config;
mod error;
mod invite;

pub use crate::attributes::{EventAttributes, Value};
pub use crate::clock::{Clock, FixedClock, SystemClock};
pub use crate::config::{Config, DEFAULT_PRODID, MissingFieldPolicy};
pub use crate::datetime::DateTimeValue;
pub use crate::error::{Error, Result};
pub use crate::field::Field;
pub use crate::invite::Invite;
