// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

//! Common test utilities for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - Entry row builders and a populated in-memory store (fixtures)
//! - Temporary cache directories with auto-cleanup

mod fixtures;
mod temp_dir;

#[allow(unused_imports)]
pub use fixtures::{RowBuilder, office_store, test_config};
pub use temp_dir::TempCacheDir;
