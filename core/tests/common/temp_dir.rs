// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

//! Temporary cache directory for integration tests.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A temporary expansion cache directory, removed when dropped.
#[derive(Debug)]
pub struct TempCacheDir {
    dir: TempDir,
}

#[allow(dead_code)]
impl TempCacheDir {
    /// Creates a new temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of a cache subdirectory that does not exist yet.
    #[must_use]
    pub fn nested(&self) -> PathBuf {
        self.dir.path().join("state").join("cache")
    }

    /// Names of the files currently in `dir`.
    #[must_use]
    pub fn files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .filter_map(|e| e.file_name().into_string().ok())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }
}
