// SPDX-FileCopyrightText: 2026 The Almanac Authors
//
// SPDX-License-Identifier: Apache-2.0

use std::io;

/// Result alias used across the engine.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by the scheduling engine.
///
/// Malformed recurrence data is never an error: the expander degrades to an
/// empty occurrence list and logs the rule instead.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backing store failed to answer a query.
    #[error("store query failed: {0}")]
    Store(String),

    /// The expansion cache could not be read or written.
    #[error("expansion cache I/O failed: {0}")]
    Cache(#[from] io::Error),

    /// A cache blob could not be encoded or decoded.
    #[error("expansion cache blob is malformed: {0}")]
    CacheFormat(#[from] serde_json::Error),

    /// The configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A stored code could not be decoded.
    #[error("invalid {kind} value '{value}'")]
    InvalidValue {
        /// What kind of value was being decoded
        kind: &'static str,
        /// The raw value found in the row
        value: String,
    },
}

impl Error {
    pub(crate) fn invalid(kind: &'static str, value: impl ToString) -> Self {
        Error::InvalidValue {
            kind,
            value: value.to_string(),
        }
    }
}
