// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

//! Almanac - recurrence expansion and scheduling conflicts for shared calendars

use std::process::ExitCode;

fn main() -> ExitCode {
    almanac_cli::run()
}
