// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use crate::field::Field;

/// Errors raised while building or compiling an invitation.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required property has no value and no default can be computed.
    #[error("Key \"{field}\" is not set but is required")]
    MissingRequiredField {
        /// The missing field.
        field: Field,
    },

    /// A duration or reminder phrase does not match the recognized grammar.
    #[error("Malformed duration '{input}': {reason}")]
    MalformedDuration {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A date/time phrase could not be understood.
    #[error("Malformed date-time '{input}'")]
    MalformedDateTime {
        /// The rejected input.
        input: String,
    },

    /// The timezone is not a known IANA identifier.
    #[error("Invalid timezone identifier '{name}'")]
    InvalidTimezone {
        /// The rejected name.
        name: String,
    },

    /// A date computation fell outside the supported range.
    #[error("Date-time out of range: {0}")]
    TimeRange(#[from] jiff::Error),

    /// Writing the calendar text failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn malformed_duration(input: &str, reason: impl ToString) -> Self {
        Self::MalformedDuration {
            input: input.to_owned(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for invitation operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
