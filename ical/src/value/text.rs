// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Text value escaping as defined in RFC 5545 Section 3.3.11.

use std::borrow::Cow;

/// Escape a text value for iCalendar output.
///
/// - Backslash → \\
/// - Semicolon → \;
/// - Comma → \,
/// - Newline → \n
///
/// Carriage returns are dropped. Borrows the input when nothing needs escaping.
#[must_use]
pub fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['\\', ';', ',', '\n', '\r']) {
        return Cow::Borrowed(text);
    }

    let mut result = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            ';' => result.push_str("\\;"),
            ',' => result.push_str("\\,"),
            '\n' => result.push_str("\\n"),
            '\r' => {} // Skip CR characters
            _ => result.push(c),
        }
    }
    Cow::Owned(result)
}
