// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! iCalendar (RFC 5545) formatter module.
//!
//! This module accumulates content lines in emission order. The caller decides
//! what goes into each block; the formatter keeps the `BEGIN`/`END` pairing and
//! the `NAME;PARAM=VALUE:VALUE` shape of every line, and joins the result with
//! CRLF.
//!
//! # Example
//!
//! ```
//! use invitecal_ical::formatter::{FormatOptions, Formatter};
//! use invitecal_ical::keyword::{KW_VCALENDAR, KW_VERSION};
//!
//! let mut f = Formatter::new(FormatOptions::default());
//! f.block(KW_VCALENDAR, |f| {
//!     f.property(KW_VERSION, "2.0");
//!     Ok::<_, std::convert::Infallible>(())
//! })
//! .unwrap();
//! assert_eq!(f.to_text(), "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nEND:VCALENDAR\r\n");
//! ```

use std::fmt::{Display, Write};

use crate::keyword::{KW_BEGIN, KW_END};
use crate::value::escape_text;

/// Line separator mandated by RFC 5545 Section 3.1.
pub const CRLF: &str = "\r\n";

/// Formatting options for the iCalendar formatter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Escape TEXT values (`\`, `;`, `,`, newlines) as RFC 5545 Section 3.3.11 requires.
    ///
    /// Default: `false`, values are written verbatim.
    pub escape_text: bool,
}

impl FormatOptions {
    /// Set the text escaping option.
    #[must_use]
    pub const fn escape_text(mut self, escape_text: bool) -> Self {
        self.escape_text = escape_text;
        self
    }
}

/// iCalendar formatter that collects content lines.
#[derive(Debug, Clone, Default)]
pub struct Formatter {
    /// Lines emitted so far, without terminators.
    lines: Vec<String>,
    /// Formatting options.
    options: FormatOptions,
}

impl Formatter {
    /// Create a new formatter with options.
    #[must_use]
    pub fn new(options: FormatOptions) -> Self {
        Self {
            lines: Vec::new(),
            options,
        }
    }

    /// Write `BEGIN:<name>`, the content produced by `write_content`, then `END:<name>`.
    ///
    /// # Errors
    /// Returns the first error produced by `write_content`; the `END` line is
    /// not written in that case.
    pub fn block<E, F>(&mut self, name: &str, write_content: F) -> Result<(), E>
    where
        F: FnOnce(&mut Self) -> Result<(), E>,
    {
        self.lines.push(format!("{KW_BEGIN}:{name}"));
        write_content(self)?;
        self.lines.push(format!("{KW_END}:{name}"));
        Ok(())
    }

    /// Write `NAME:VALUE`.
    pub fn property(&mut self, name: &str, value: impl Display) {
        self.property_with_params(name, &[], value);
    }

    /// Write `NAME;P1=V1;P2=V2:VALUE`.
    pub fn property_with_params(&mut self, name: &str, params: &[(&str, &str)], value: impl Display) {
        let mut line = String::from(name);
        for (key, val) in params {
            // infallible for String
            let _ = write!(line, ";{key}={val}");
        }
        let _ = write!(line, ":{value}");
        self.lines.push(line);
    }

    /// Write a TEXT property, escaping the value when [`FormatOptions::escape_text`] is set.
    pub fn text_property(&mut self, name: &str, value: &str) {
        if self.options.escape_text {
            self.property(name, escape_text(value));
        } else {
            self.property(name, value);
        }
    }

    /// Lines written so far.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Consumes this formatter, returning the lines.
    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Join the lines, terminating every one of them with CRLF.
    #[must_use]
    pub fn to_text(&self) -> String {
        join_lines(&self.lines)
    }
}

/// Join content lines, terminating every one of them with CRLF.
#[must_use]
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let capacity = lines.iter().map(|l| l.as_ref().len() + CRLF.len()).sum();
    let mut text = String::with_capacity(capacity);
    for line in lines {
        text.push_str(line.as_ref());
        text.push_str(CRLF);
    }
    text
}
