// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Common test utilities for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - Invite factories with a frozen clock (fixtures)
//! - Helpers to slice and check compiled calendar text

mod assertions;
mod fixtures;

#[allow(unused_imports)]
pub use assertions::{assert_crlf_terminated, assert_has_line, assert_no_line, block, property};
#[allow(unused_imports)]
pub use fixtures::{FIXED_NOW, fixed_clock, test_invite, without_timestamps};
