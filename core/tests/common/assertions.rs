// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Custom assertion helpers for integration tests.
//!
//! This module provides helpers for inspecting compiled calendar lines.

/// Asserts that `lines` contains `expected` verbatim.
///
/// # Panics
///
/// Panics with the full calendar text if the line is missing.
pub fn assert_has_line(lines: &[String], expected: &str) {
    assert!(
        lines.iter().any(|l| l == expected),
        "Expected line {expected:?} in:\n{}",
        lines.join("\n")
    );
}

/// Asserts that no line of `lines` equals `unexpected`.
///
/// # Panics
///
/// Panics with the full calendar text if the line is present.
#[allow(dead_code)]
pub fn assert_no_line(lines: &[String], unexpected: &str) {
    assert!(
        !lines.iter().any(|l| l == unexpected),
        "Unexpected line {unexpected:?} in:\n{}",
        lines.join("\n")
    );
}

/// Asserts that every line of `text` ends with CRLF, the last one included.
///
/// # Panics
///
/// Panics if a bare LF is found or the text does not end with CRLF.
#[allow(dead_code)]
pub fn assert_crlf_terminated(text: &str) {
    assert!(text.ends_with("\r\n"), "Text is not CRLF terminated:\n{text}");
    assert_eq!(
        text.matches('\n').count(),
        text.matches("\r\n").count(),
        "Bare LF found in:\n{text}"
    );
}

/// Returns the value of the first property named `name`, parameters included in the name.
///
/// # Example
///
/// ```ignore
/// assert_eq!(property(&lines, "DURATION"), Some("PT1H"));
/// ```
#[allow(dead_code)]
#[must_use]
pub fn property<'a>(lines: &'a [String], name: &str) -> Option<&'a str> {
    lines
        .iter()
        .find_map(|l| l.strip_prefix(name).and_then(|rest| rest.strip_prefix(':')))
}

/// Returns the lines between `BEGIN:<name>` and the matching `END:<name>`, both included.
#[allow(dead_code)]
#[must_use]
pub fn block<'a>(lines: &'a [String], name: &str) -> Option<&'a [String]> {
    let begin = format!("BEGIN:{name}");
    let end = format!("END:{name}");
    let start = lines.iter().position(|l| *l == begin)?;
    let len = lines.get(start..)?.iter().position(|l| *l == end)?;
    lines.get(start..=start + len)
}
