// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

//! End-to-end workflow tests for the almanac-core crate.
//!
//! These tests drive the engine through stored rows, the way a front end
//! does: decoding, expansion, caching, day views and conflict checks.

mod config_driven;
mod day_view;
mod expansion;
mod file_cache;
mod scheduling;
