// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use serde::de;

/// Product identifier written when none is configured.
pub const DEFAULT_PRODID: &str = "-//invitecal//invitecal//EN";

/// Configuration for compiling invitations.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    /// Value of the `PRODID` property.
    pub prodid: String,

    /// What to do when a required field has no value.
    pub missing_field: MissingFieldPolicy,

    /// Escape `SUMMARY`, `LOCATION` and `DESCRIPTION` as RFC 5545 TEXT.
    pub escape_text: bool,

    /// Timezone given to invitations that do not set one.
    pub default_timezone: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prodid: DEFAULT_PRODID.to_owned(),
            missing_field: MissingFieldPolicy::default(),
            escape_text: false,
            default_timezone: None,
        }
    }
}

/// Handling of required fields without a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingFieldPolicy {
    /// Fail the compilation with [`Error::MissingRequiredField`](crate::Error::MissingRequiredField).
    #[default]
    Error,

    /// Write the property with an empty value, e.g. `DTSTART:`.
    RenderEmpty,
}

impl<'de> serde::Deserialize<'de> for MissingFieldPolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct PolicyVisitor;

        impl de::Visitor<'_> for PolicyVisitor {
            type Value = MissingFieldPolicy;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str(r#"one of "error" or "render-empty""#)
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                match value.trim().to_ascii_lowercase().as_str() {
                    "error" => Ok(MissingFieldPolicy::Error),
                    "render-empty" | "empty" => Ok(MissingFieldPolicy::RenderEmpty),
                    _ => Err(de::Error::invalid_value(de::Unexpected::Str(value), &self)),
                }
            }
        }

        deserializer.deserialize_str(PolicyVisitor)
    }
}
